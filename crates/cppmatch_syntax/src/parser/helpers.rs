/// Token-stream helpers, comment attachment and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming significant tokens (`peek`, `advance`, `token`)
/// - Matching / expecting keywords and punctuation
/// - Leading/trailing comment attachment over the raw stream
/// - `#define` declarations interleaved in source order
/// - Error recovery (`synchronize`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Significant-token access
    // ========================================================================

    /// Return the significant token at index `i` (or `Eof` past the end).
    fn token(&self, i: usize) -> &Token {
        match self.sig.get(i) {
            Some(&raw) => &self.tokens[raw],
            None => &self.eof,
        }
    }

    /// Raw stream index of significant token `i` (`tokens.len()` past the end).
    fn raw_index(&self, i: usize) -> usize {
        self.sig.get(i).copied().unwrap_or(self.tokens.len())
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.sig.len()
    }

    fn peek(&self) -> &Token {
        self.token(self.pos)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.token(self.pos + offset)
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.token(self.pos.saturating_sub(1))
    }

    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().is_punct(id)
    }

    fn check_keyword(&self, id: KeywordId) -> bool {
        self.peek().is_keyword(id)
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_keyword(&mut self, id: KeywordId) -> bool {
        if self.check_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, id: PunctuationId, context: &str) -> PResult<usize> {
        if self.check_punct(id) {
            self.advance();
            Ok(self.pos - 1)
        } else if self.is_at_end() {
            Err(errors::unterminated_body(context, self.current_span()))
        } else {
            Err(errors::unexpected_token(
                &self.peek().kind.spelling(),
                context,
                self.current_span(),
            ))
        }
    }

    fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Span from significant token `start` to the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        let first = self.token(start).span;
        if self.pos > start {
            first.merge(self.token(self.pos - 1).span)
        } else {
            first
        }
    }

    /// Span covering significant tokens `indices` (first to last).
    fn span_of(&self, indices: &[usize]) -> Option<Span> {
        let first = indices.first()?;
        let last = indices.last()?;
        Some(self.token(*first).span.merge(self.token(*last).span))
    }

    // ========================================================================
    // Token text
    // ========================================================================

    /// Join token spellings, inserting one space wherever the source had whitespace or comments.
    fn join(&self, indices: &[usize]) -> String {
        let mut out = String::new();
        let mut prev_end: Option<usize> = None;
        for &i in indices {
            let token = self.token(i);
            if prev_end.is_some_and(|end| token.span.start > end) {
                out.push(' ');
            }
            out.push_str(&token.kind.spelling());
            prev_end = Some(token.span.end);
        }
        out
    }

    /// Join significant tokens `begin..end`.
    fn join_range(&self, begin: usize, end: usize) -> String {
        self.join(&(begin..end).collect::<Vec<_>>())
    }

    fn ident_at(&self, i: usize) -> Option<&str> {
        self.token(i).kind.ident()
    }

    // ========================================================================
    // Balanced groups
    // ========================================================================

    /// Index of the token closing the group opened at `open`, scanning significant tokens.
    ///
    /// Returns `None` when the group is not closed before end of file.
    fn matching_close(&self, open: usize) -> Option<usize> {
        let (open_id, close_id) = match self.token(open).punctuation_id()? {
            PunctuationId::LParen => (PunctuationId::LParen, PunctuationId::RParen),
            PunctuationId::LBracket => (PunctuationId::LBracket, PunctuationId::RBracket),
            PunctuationId::LBrace => (PunctuationId::LBrace, PunctuationId::RBrace),
            PunctuationId::Lt => (PunctuationId::Lt, PunctuationId::Gt),
            _ => return None,
        };
        let mut depth = 0usize;
        for i in open..self.sig.len() {
            let token = self.token(i);
            if token.is_punct(open_id) {
                depth += 1;
            } else if token.is_punct(close_id) {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            } else if open_id == PunctuationId::Lt
                && (token.is_punct(PunctuationId::Semi) || token.is_punct(PunctuationId::LBrace))
            {
                return None;
            }
        }
        None
    }

    /// Consume a `{ ... }` block at the current position and return `(open, close)` indices.
    fn skip_brace_block(&mut self, what: &str) -> PResult<(usize, usize)> {
        let open = self.pos;
        match self.matching_close(open) {
            Some(close) => {
                self.pos = close + 1;
                Ok((open, close))
            }
            None => {
                let span = self.token(open).span;
                self.pos = self.sig.len();
                Err(errors::unterminated_body(what, span))
            }
        }
    }

    /// Consume a `<...>` template parameter/argument list.
    fn skip_angles(&mut self) -> PResult<()> {
        match self.matching_close(self.pos) {
            Some(close) => {
                self.pos = close + 1;
                Ok(())
            }
            None => Err(errors::unexpected_token("<", "without a matching `>`", self.current_span())),
        }
    }

    /// Skip `[[attribute]]` sequences.
    fn skip_attributes(&mut self) -> PResult<()> {
        while self.check_punct(PunctuationId::LBracket) && self.peek_at(1).is_punct(PunctuationId::LBracket) {
            match self.matching_close(self.pos) {
                Some(close) => self.pos = close + 1,
                None => return Err(errors::unexpected_token("[[", "without a matching `]]`", self.current_span())),
            }
        }
        Ok(())
    }

    /// Skip to the end of a declaration we do not model (`friend`, `static_assert`, ...).
    fn skip_declaration(&mut self) -> PResult<()> {
        while !self.is_at_end() {
            if self.check_punct(PunctuationId::Semi) {
                self.advance();
                return Ok(());
            }
            if self.check_punct(PunctuationId::LBrace) {
                self.skip_brace_block("declaration body")?;
                self.match_punct(PunctuationId::Semi);
                return Ok(());
            }
            if self.check_punct(PunctuationId::RBrace) {
                return Ok(());
            }
            self.advance();
        }
        Ok(())
    }

    // ========================================================================
    // Error recovery
    // ========================================================================

    /// Skip to the end of a damaged declaration.
    ///
    /// Stops after a `;` at brace depth 0, after a brace block that returns to depth 0 (plus an
    /// optional `;`), or before an unmatched `}`. Parentheses are ignored so that a missing `)`
    /// cannot swallow the rest of the scope.
    fn synchronize(&mut self) {
        let begin = self.pos;
        let mut depth = 0usize;
        while !self.is_at_end() {
            if self.check_punct(PunctuationId::LBrace) {
                depth += 1;
            } else if self.check_punct(PunctuationId::RBrace) {
                if depth == 0 {
                    break;
                }
                depth -= 1;
                if depth == 0 {
                    self.advance();
                    self.match_punct(PunctuationId::Semi);
                    break;
                }
            } else if depth == 0 && self.check_punct(PunctuationId::Semi) {
                self.advance();
                break;
            }
            self.advance();
        }
        if self.pos == begin && !self.is_at_end() && !self.check_punct(PunctuationId::RBrace) {
            self.advance();
        }
    }

    // ========================================================================
    // Comments and directives
    // ========================================================================

    /// Advance the directive cursor past everything consumed so far.
    fn mark_consumed(&mut self) {
        if self.pos > 0 {
            let raw = self.raw_index(self.pos - 1) + 1;
            self.directive_cursor = self.directive_cursor.max(raw);
        }
    }

    /// Emit `#define` declarations for directives between the cursor and the current token.
    fn flush_defines(&mut self, decls: &mut Vec<Declaration>) {
        let upto = self.raw_index(self.pos).min(self.tokens.len());
        if self.in_body {
            self.directive_cursor = self.directive_cursor.max(upto);
            return;
        }
        for raw in self.directive_cursor..upto {
            let token = &self.tokens[raw];
            let TokenKind::Directive(text) = &token.kind else {
                continue;
            };
            if let DirectiveKind::Define { name, params, value } = preprocessor::classify(text) {
                decls.push(Declaration {
                    name,
                    owner: None,
                    visibility: Visibility::Public,
                    span: token.span,
                    leading_comment: self.leading_comment(raw),
                    kind: DeclKind::Define(DefineDecl { params, value }),
                });
            }
        }
        self.directive_cursor = self.directive_cursor.max(upto);
    }

    /// Leading comment for the declaration starting at significant token `i`.
    fn leading_comment_at(&self, i: usize) -> Option<Span> {
        if i >= self.sig.len() {
            return None;
        }
        self.leading_comment(self.raw_index(i))
    }

    /// The contiguous comment block immediately before raw token `raw`.
    ///
    /// The block may not be separated from the token by a blank line or a directive, and a
    /// comment that trails code on its own line belongs to that code instead.
    fn leading_comment(&self, raw: usize) -> Option<Span> {
        let mut first = None;
        let mut next_line = self.tokens.get(raw)?.line;
        let mut i = raw;
        while i > 0 {
            let prev = &self.tokens[i - 1];
            if !prev.kind.is_comment() || prev.end_line() + 1 < next_line {
                break;
            }
            first = Some(i - 1);
            next_line = prev.line;
            i -= 1;
        }
        let mut first = first?;
        let last = raw - 1;
        if first > 0 && self.tokens[first - 1].end_line() == self.tokens[first].line {
            first += 1;
            if first > last {
                return None;
            }
        }
        Some(self.tokens[first].span.merge(self.tokens[last].span))
    }

    /// Same-line comment directly after the last consumed token.
    fn trailing_comment(&self) -> Option<Span> {
        if self.pos == 0 {
            return None;
        }
        let raw = self.raw_index(self.pos - 1);
        let anchor = &self.tokens[raw];
        let next = self.tokens.get(raw + 1)?;
        (next.kind.is_comment() && next.line == anchor.end_line()).then_some(next.span)
    }

    /// Comments before the first directive or declaration of the file.
    ///
    /// Comments that attach to the first declaration as its leading comment are excluded.
    fn header_comment(&self) -> Option<Span> {
        let first_code = self.tokens.iter().position(|t| !t.kind.is_comment())?;
        if first_code == 0 {
            return None;
        }
        let mut last = first_code - 1;
        if !matches!(self.tokens[first_code].kind, TokenKind::Directive(_) | TokenKind::Eof) {
            if let Some(attached) = self.leading_comment(first_code) {
                let attached_first = (0..first_code).find(|&i| self.tokens[i].span.start == attached.start)?;
                if attached_first == 0 {
                    return None;
                }
                last = attached_first - 1;
            }
        }
        Some(self.tokens[0].span.merge(self.tokens[last].span))
    }
}
