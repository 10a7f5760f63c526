/// Where a parameter's default value starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefaultSeparator {
    /// A plain `=` token.
    Eq(usize),
    /// A compound token (`&=`, `*=`, `>=`) whose first character belongs to the type.
    Glued(usize),
}

/// Parameter lists.
impl<'a> Parser<'a> {
    /// Parse the tokens between a function's parentheses.
    ///
    /// `()` and `(void)` are both the empty list. Default values are kept as spans and never
    /// interpreted.
    fn parameters(&self, inner: &[usize]) -> PResult<Vec<Param>> {
        if inner.is_empty() || (inner.len() == 1 && self.token(inner[0]).is_keyword(KeywordId::Void)) {
            return Ok(Vec::new());
        }

        let mut params = Vec::new();
        for piece in self.split_declarators(inner) {
            let Some(span) = self.span_of(&piece) else {
                let at = inner.first().map_or_else(|| self.current_span(), |&i| self.token(i).span);
                return Err(errors::unexpected_token(",", "in parameter list", at));
            };
            let separator = self.default_separator(&piece);
            let (declarator, default) = match separator {
                Some(DefaultSeparator::Eq(eq) | DefaultSeparator::Glued(eq)) => {
                    (&piece[..eq], self.span_of(&piece[eq + 1..]))
                }
                None => (&piece[..], None),
            };
            // `&=`, `*=` and `>=` lexed as one token: the first character closes the type.
            let suffix = match separator {
                Some(DefaultSeparator::Glued(eq)) => Some(self.token(piece[eq])),
                _ => None,
            };
            if declarator.is_empty() {
                return Err(errors::unexpected_token("=", "without a parameter type", span));
            }

            let name_at = match suffix {
                Some(_) => None,
                None => self.declarator_name(declarator, false),
            };
            let ty_tokens: Vec<usize> = declarator
                .iter()
                .enumerate()
                .filter(|(k, _)| Some(*k) != name_at)
                .map(|(_, &i)| i)
                .collect();
            let mut ty = self.join(&ty_tokens);
            if let Some(token) = suffix {
                let prev_end = ty_tokens.last().map(|&i| self.token(i).span.end);
                if prev_end.is_some_and(|end| token.span.start > end) {
                    ty.push(' ');
                }
                let spelling = token.kind.spelling();
                ty.push_str(spelling.strip_suffix('=').unwrap_or(&spelling));
            }
            params.push(Param {
                ty,
                name: name_at.and_then(|at| self.ident_at(declarator[at])).map(str::to_string),
                default,
                span,
            });
        }
        Ok(params)
    }

    /// Position of the `=` introducing a default value, ignoring `=` inside groups.
    fn default_separator(&self, piece: &[usize]) -> Option<DefaultSeparator> {
        let mut depth = 0usize;
        let mut angle = 0usize;
        for (k, &i) in piece.iter().enumerate() {
            match self.token(i).punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket | PunctuationId::RBrace) => {
                    depth = depth.saturating_sub(1)
                }
                Some(PunctuationId::Lt) if k > 0 && self.ident_at(piece[k - 1]).is_some() => angle += 1,
                Some(PunctuationId::Gt) if angle > 0 => angle -= 1,
                Some(PunctuationId::Eq) if depth == 0 && angle == 0 => return Some(DefaultSeparator::Eq(k)),
                Some(PunctuationId::AmpEq | PunctuationId::StarEq) if depth == 0 && angle == 0 && k > 0 => {
                    return Some(DefaultSeparator::Glued(k));
                }
                Some(PunctuationId::GtEq) if depth == 0 && angle == 1 => return Some(DefaultSeparator::Glued(k)),
                _ => {}
            }
        }
        None
    }
}
