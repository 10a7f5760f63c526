/// Declarator utilities shared by fields, typedefs and parameters.
impl<'a> Parser<'a> {
    /// Split `tokens` at top-level commas.
    ///
    /// Template argument lists are only tracked before an `=`, where `<` cannot be a comparison.
    fn split_declarators(&self, tokens: &[usize]) -> Vec<Vec<usize>> {
        let mut out = Vec::new();
        let mut current = Vec::new();
        let mut depth = 0usize;
        let mut angle = 0usize;
        let mut seen_eq = false;
        for (k, &i) in tokens.iter().enumerate() {
            let token = self.token(i);
            match token.punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    depth = depth.saturating_sub(1)
                }
                Some(PunctuationId::Lt) if !seen_eq && k > 0 && self.ident_at(tokens[k - 1]).is_some() => angle += 1,
                Some(PunctuationId::Gt) if !seen_eq && angle > 0 => angle -= 1,
                // `vector<int>=v`: the `>` of `>=` closes the template argument list.
                Some(PunctuationId::GtEq) if !seen_eq && angle > 0 => {
                    angle -= 1;
                    seen_eq = depth == 0 && angle == 0;
                }
                Some(PunctuationId::Eq | PunctuationId::AmpEq | PunctuationId::StarEq) if depth == 0 && angle == 0 => {
                    seen_eq = true
                }
                Some(PunctuationId::Comma) if depth == 0 && angle == 0 => {
                    out.push(std::mem::take(&mut current));
                    seen_eq = false;
                    continue;
                }
                _ => {}
            }
            current.push(i);
        }
        if !current.is_empty() || !out.is_empty() {
            out.push(current);
        }
        out
    }

    /// Position in `tokens` of the name declared by a declarator.
    ///
    /// The name is the identifier right before the first top-level `[`, `=`, `:`, `{` or `(`,
    /// and only counts when a type precedes it: in `const CString&` or `unsigned long` nothing is
    /// named. A name written as `Owner::name` is accepted only with `allow_qualified`.
    fn declarator_name(&self, tokens: &[usize], allow_qualified: bool) -> Option<usize> {
        if let Some(at) = self.function_pointer_name(tokens) {
            return Some(at);
        }
        let end = self.declarator_end(tokens);
        let at = end.checked_sub(1)?;
        self.ident_at(tokens[at])?;
        if at > 0 && self.token(tokens[at - 1]).is_punct(PunctuationId::ColonColon) {
            return allow_qualified.then_some(at);
        }
        tokens[..at].iter().any(|&i| is_type_anchor(self.token(i))).then_some(at)
    }

    /// Like [`Parser::declarator_name`], without requiring a preceding type (`} a, *b;`).
    fn bare_declarator_name(&self, tokens: &[usize]) -> Option<usize> {
        if let Some(at) = self.function_pointer_name(tokens) {
            return Some(at);
        }
        let end = self.declarator_end(tokens);
        tokens[..end].iter().rposition(|&i| self.ident_at(i).is_some())
    }

    /// `void (*name)(int)` and `int (Class::*name)()` declarators.
    fn function_pointer_name(&self, tokens: &[usize]) -> Option<usize> {
        let mut angle = 0usize;
        for k in 0..tokens.len() {
            let token = self.token(tokens[k]);
            match token.punctuation_id() {
                Some(PunctuationId::Lt) if k > 0 && self.ident_at(tokens[k - 1]).is_some() => angle += 1,
                Some(PunctuationId::Gt) if angle > 0 => angle -= 1,
                Some(PunctuationId::Eq | PunctuationId::LBracket | PunctuationId::LBrace) if angle == 0 => return None,
                Some(PunctuationId::LParen) if angle == 0 => {
                    let next = self.token(*tokens.get(k + 1)?);
                    let pointer = next.is_punct(PunctuationId::Star)
                        || next.is_punct(PunctuationId::Amp)
                        || next.is_punct(PunctuationId::Caret)
                        || (next.kind.ident().is_some()
                            && tokens.get(k + 2).is_some_and(|&i| self.token(i).is_punct(PunctuationId::ColonColon)));
                    if !pointer {
                        return None;
                    }
                    let close = self.group_end(tokens, k)?;
                    return (k + 1..close).rev().find(|&p| {
                        self.ident_at(tokens[p]).is_some() && !self.token(tokens[p + 1]).is_punct(PunctuationId::ColonColon)
                    });
                }
                _ => {}
            }
        }
        None
    }

    /// First top-level position where the declarator name can no longer appear.
    fn declarator_end(&self, tokens: &[usize]) -> usize {
        let mut angle = 0usize;
        for (k, &i) in tokens.iter().enumerate() {
            match self.token(i).punctuation_id() {
                Some(PunctuationId::Lt) if k > 0 && self.ident_at(tokens[k - 1]).is_some() => angle += 1,
                Some(PunctuationId::Gt) if angle > 0 => angle -= 1,
                Some(
                    PunctuationId::LBracket
                    | PunctuationId::Eq
                    | PunctuationId::Colon
                    | PunctuationId::LBrace
                    | PunctuationId::LParen,
                ) if angle == 0 => return k,
                _ => {}
            }
        }
        tokens.len()
    }
}

/// Tokens that make the following identifier a declared name rather than part of the type.
fn is_type_anchor(token: &Token) -> bool {
    match &token.kind {
        TokenKind::Ident(_) => true,
        TokenKind::Keyword(id) => {
            cppmatch_core::lang::keywords::is_type_keyword(*id)
                && !matches!(id, KeywordId::Const | KeywordId::Volatile | KeywordId::Typename)
        }
        TokenKind::Punctuation(PunctuationId::Gt) => true,
        _ => false,
    }
}
