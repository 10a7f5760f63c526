/// Function bodies.
///
/// Bodies are opaque brace groups. The only thing recorded from inside one is a local
/// `struct`/`class`/`union` definition, which becomes a `LocalType` on the owning method.
impl<'a> Parser<'a> {
    /// Collect local type definitions between the body braces at `open` and `close`.
    ///
    /// The parser position is restored afterwards. A local definition that fails to parse is
    /// dropped along with its diagnostics; the body itself is never damaged by it.
    fn local_types(&mut self, open: usize, close: usize) -> Vec<Declaration> {
        let saved_pos = self.pos;
        let saved_in_body = self.in_body;
        let saved_cursor = self.directive_cursor;
        self.in_body = true;

        let mut found = Vec::new();
        let mut i = open + 1;
        while i < close {
            let token = self.token(i);
            let is_aggregate_keyword = |t: &Token| {
                matches!(
                    t.keyword_id(),
                    Some(KeywordId::Class | KeywordId::Struct | KeywordId::Union)
                )
            };
            let is_typedef = token.is_keyword(KeywordId::Typedef)
                && is_aggregate_keyword(self.token(i + 1))
                && self.is_class_definition(i + 1);
            let is_type = !is_typedef && is_aggregate_keyword(token) && self.is_class_definition(i);
            if !is_typedef && !is_type {
                i += 1;
                continue;
            }

            let start = i;
            self.pos = if is_typedef { i + 1 } else { i };
            let checkpoint = self.diagnostics.len();
            match self.class_definition(&Scope::File {
                nested: true,
                namespace: None,
            }) {
                Ok((head, class)) if self.pos <= close => {
                    let declarators = self.trailing_declarators(&head.name);
                    let typedef_name = if is_typedef {
                        declarators
                            .first()
                            .and_then(|d| self.bare_declarator_name(d).and_then(|at| self.ident_at(d[at])))
                            .map(str::to_string)
                    } else {
                        None
                    };
                    found.push(Declaration {
                        name: typedef_name.unwrap_or(head.name),
                        owner: None,
                        visibility: Visibility::Public,
                        span: self.span_from(start),
                        leading_comment: self.leading_comment_at(start),
                        kind: DeclKind::LocalType(class),
                    });
                    i = self.pos.max(i + 1);
                }
                _ => {
                    self.diagnostics.truncate(checkpoint);
                    i += 1;
                }
            }
        }

        self.pos = saved_pos;
        self.in_body = saved_in_body;
        self.directive_cursor = saved_cursor;
        found
    }
}
