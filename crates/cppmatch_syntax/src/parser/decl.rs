/// Declaration dispatch and type definitions.
///
/// This chunk handles:
/// - access labels and declaration prefixes (`template<...>`, attributes, `extern "C"`)
/// - namespaces and linkage blocks (flattened into the enclosing list)
/// - `class`/`struct`/`union` definitions, `enum`, `typedef` and `using` aliases
/// - constructs that are recognized and skipped (forward declarations, `friend`, macro calls)
///
/// Everything else goes to `member_or_function` in `members.rs`.

/// Class header facts gathered before the body is parsed.
#[derive(Debug, Clone)]
struct ClassHead {
    keyword: KeywordId,
    name: String,
    /// The name was taken from the first declarator after the body (`struct { ... } Name;`).
    named_by_declarator: bool,
}

impl<'a> Parser<'a> {
    /// Parse one declaration at the current position.
    ///
    /// Returns zero declarations for skipped constructs, and several for flattened scopes or
    /// trailing declarators after a type definition.
    fn declaration(&mut self, scope: &Scope, access: &mut Visibility) -> PResult<Vec<Declaration>> {
        let start = self.pos;
        if self.match_punct(PunctuationId::Semi) {
            return Ok(Vec::new());
        }
        if scope.class().is_some() {
            if let Some(visibility) = self.access_label() {
                *access = visibility;
                return Ok(Vec::new());
            }
        }

        let mut prefix = Prefix::default();
        loop {
            if self.check_keyword(KeywordId::Template) {
                self.advance();
                if self.check_punct(PunctuationId::Lt) {
                    self.skip_angles()?;
                }
                prefix.is_template = true;
            } else if self.check_punct(PunctuationId::LBracket) && self.peek_at(1).is_punct(PunctuationId::LBracket) {
                self.skip_attributes()?;
            } else if self.check_keyword(KeywordId::Extern) && matches!(self.peek_at(1).kind, TokenKind::String(_)) {
                self.advance();
                self.advance();
                if self.check_punct(PunctuationId::LBrace) {
                    let namespace = scope.namespace().map(str::to_string);
                    return Ok(self.flattened_block("`extern` block", namespace));
                }
            } else if self.check_keyword(KeywordId::Inline) && self.peek_at(1).is_keyword(KeywordId::Namespace) {
                self.advance();
            } else {
                break;
            }
        }

        let Some(keyword) = self.peek().keyword_id() else {
            if self.is_macro_invocation() {
                self.advance();
                self.skip_paren_group()?;
                return Ok(Vec::new());
            }
            return self.member_or_function(scope, *access, start, prefix);
        };

        match keyword {
            KeywordId::Namespace => self.namespace(scope),
            KeywordId::Using => self.using_declaration(scope, *access, start),
            KeywordId::Typedef => self.typedef_declaration(scope, *access, start),
            KeywordId::Friend | KeywordId::StaticAssert => {
                self.skip_declaration()?;
                Ok(Vec::new())
            }
            KeywordId::Enum => {
                if self.is_enum_definition() {
                    self.enum_declaration(scope, *access, start)
                } else if self.is_forward_declaration() {
                    self.skip_declaration()?;
                    Ok(Vec::new())
                } else {
                    self.member_or_function(scope, *access, start, prefix)
                }
            }
            KeywordId::Class | KeywordId::Struct | KeywordId::Union => {
                if self.is_class_definition(self.pos) {
                    self.class_declaration(scope, *access, start)
                } else if self.is_forward_declaration() {
                    self.skip_declaration()?;
                    Ok(Vec::new())
                } else {
                    self.member_or_function(scope, *access, start, prefix)
                }
            }
            _ => self.member_or_function(scope, *access, start, prefix),
        }
    }

    /// `public:`, `protected:`, `private:` (also `public slots:` style labels).
    fn access_label(&mut self) -> Option<Visibility> {
        let visibility = match self.peek().keyword_id()? {
            KeywordId::Public => Visibility::Public,
            KeywordId::Protected => Visibility::Protected,
            KeywordId::Private => Visibility::Private,
            _ => return None,
        };
        let mut offset = 1;
        while self.peek_at(offset).kind.ident().is_some() {
            offset += 1;
        }
        if !self.peek_at(offset).is_punct(PunctuationId::Colon) {
            return None;
        }
        self.pos += offset + 1;
        Some(visibility)
    }

    /// Skip a `( ... )` group at the current position.
    fn skip_paren_group(&mut self) -> PResult<()> {
        match self.matching_close(self.pos) {
            Some(close) => {
                self.pos = close + 1;
                Ok(())
            }
            None => Err(errors::unbalanced_parens(self.current_span())),
        }
    }

    // ========================================================================
    // Flattened scopes
    // ========================================================================

    /// `namespace A::B { ... }`. Anonymous namespaces keep the enclosing path.
    fn namespace(&mut self, scope: &Scope) -> PResult<Vec<Declaration>> {
        self.advance();
        let mut path: Vec<String> = scope.namespace().map(str::to_string).into_iter().collect();
        while !self.is_at_end()
            && !self.check_punct(PunctuationId::LBrace)
            && !self.check_punct(PunctuationId::Eq)
            && !self.check_punct(PunctuationId::Semi)
        {
            if self.check_punct(PunctuationId::LBracket) && self.peek_at(1).is_punct(PunctuationId::LBracket) {
                self.skip_attributes()?;
                continue;
            }
            if let Some(ident) = self.peek().kind.ident() {
                path.push(ident.to_string());
            }
            self.advance();
        }
        if self.check_punct(PunctuationId::LBrace) {
            let namespace = (!path.is_empty()).then(|| path.join("::"));
            return Ok(self.flattened_block("namespace", namespace));
        }
        // namespace alias
        self.skip_declaration()?;
        Ok(Vec::new())
    }

    /// Parse `{ ... }` whose contents belong to the enclosing file scope.
    ///
    /// A missing `}` at end of file is reported but the contents are kept.
    fn flattened_block(&mut self, what: &str, namespace: Option<String>) -> Vec<Declaration> {
        let open = self.current_span();
        self.advance();
        self.mark_consumed();
        let decls = self.scope_members(&Scope::File { nested: true, namespace });
        if !self.match_punct(PunctuationId::RBrace) {
            self.diagnostics.push(errors::unterminated_body(what, open));
        }
        decls
    }

    // ========================================================================
    // Aliases
    // ========================================================================

    fn using_declaration(&mut self, scope: &Scope, access: Visibility, start: usize) -> PResult<Vec<Declaration>> {
        self.advance();
        let alias = self.peek().kind.ident().map(str::to_string);
        let Some(name) = alias.filter(|_| self.peek_at(1).is_punct(PunctuationId::Eq)) else {
            // `using namespace std;`, `using Base::Base;`
            self.skip_declaration()?;
            return Ok(Vec::new());
        };
        self.advance();
        self.advance();
        let begin = self.pos;
        while !self.is_at_end()
            && !self.check_punct(PunctuationId::Semi)
            && !self.check_punct(PunctuationId::LBrace)
            && !self.check_punct(PunctuationId::RBrace)
        {
            self.advance();
        }
        let target = self.join_range(begin, self.pos);
        self.expect_punct(PunctuationId::Semi, "after alias declaration")?;
        Ok(vec![Declaration {
            name,
            owner: scope.owner(),
            visibility: access,
            span: self.span_from(start),
            leading_comment: self.leading_comment_at(start),
            kind: DeclKind::Typedef(TypedefDecl { target, aggregate: None }),
        }])
    }

    fn typedef_declaration(&mut self, scope: &Scope, access: Visibility, start: usize) -> PResult<Vec<Declaration>> {
        self.advance();
        let is_aggregate = matches!(
            self.peek().keyword_id(),
            Some(KeywordId::Class | KeywordId::Struct | KeywordId::Union)
        );
        if is_aggregate && self.is_class_definition(self.pos) {
            return self.typedef_aggregate(scope, access, start);
        }

        let begin = self.pos;
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.peek().punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBracket) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket) => depth = depth.saturating_sub(1),
                Some(PunctuationId::Semi) if depth == 0 => break,
                Some(PunctuationId::LBrace | PunctuationId::RBrace) => {
                    return Err(errors::unexpected_token(
                        &self.peek().kind.spelling(),
                        "in typedef",
                        self.current_span(),
                    ));
                }
                _ => {}
            }
            self.advance();
        }
        let tokens: Vec<usize> = (begin..self.pos).collect();
        self.expect_punct(PunctuationId::Semi, "after typedef")?;

        let declarators = self.split_declarators(&tokens);
        let mut decls = Vec::new();
        let mut base: Vec<usize> = Vec::new();
        for (n, declarator) in declarators.iter().enumerate() {
            let Some(at) = self.declarator_name(declarator, false) else {
                let span = self.span_of(declarator).unwrap_or_else(|| self.current_span());
                return Err(errors::unexpected_token(&self.join(declarator), "in typedef: no alias name", span));
            };
            let name = self.ident_at(declarator[at]).unwrap_or_default().to_string();
            let rest: Vec<usize> = declarator.iter().enumerate().filter(|(k, _)| *k != at).map(|(_, &i)| i).collect();
            let target = if n == 0 {
                base = strip_pointer_ops(self, &declarator[..at]);
                self.join(&rest)
            } else {
                let mut combined = base.clone();
                combined.extend(rest);
                self.join(&combined)
            };
            decls.push(Declaration {
                name,
                owner: scope.owner(),
                visibility: access,
                span: self.span_from(start),
                leading_comment: self.leading_comment_at(start),
                kind: DeclKind::Typedef(TypedefDecl { target, aggregate: None }),
            });
        }
        Ok(decls)
    }

    /// `typedef struct [Tag] { ... } Name, *PName;`
    fn typedef_aggregate(&mut self, scope: &Scope, access: Visibility, start: usize) -> PResult<Vec<Declaration>> {
        let (head, class) = self.class_definition(scope)?;
        let declarators = self.trailing_declarators(&head.name);
        let tag = if head.named_by_declarator {
            keyword_name(head.keyword).to_string()
        } else {
            format!("{} {}", keyword_name(head.keyword), head.name)
        };

        let span = self.span_from(start);
        let leading_comment = self.leading_comment_at(start);
        let mut aggregate = Some(class);
        let mut decls = Vec::new();
        for declarator in &declarators {
            let Some(at) = self.bare_declarator_name(declarator) else {
                continue;
            };
            let pointers = self.join(&declarator[..at]);
            decls.push(Declaration {
                name: self.ident_at(declarator[at]).unwrap_or_default().to_string(),
                owner: scope.owner(),
                visibility: access,
                span,
                leading_comment,
                kind: DeclKind::Typedef(TypedefDecl {
                    target: format!("{tag}{pointers}"),
                    aggregate: aggregate.take(),
                }),
            });
        }
        if let Some(class) = aggregate {
            decls.push(type_declaration(head, class, scope, access, span, leading_comment));
        }
        Ok(decls)
    }

    // ========================================================================
    // Enums
    // ========================================================================

    /// `enum [class] Name [: T] {` ahead (the brace comes before any `;`).
    fn is_enum_definition(&self) -> bool {
        let mut i = self.pos + 1;
        while i < self.sig.len() {
            match self.token(i).punctuation_id() {
                Some(PunctuationId::LBrace) => return true,
                Some(PunctuationId::Colon | PunctuationId::ColonColon | PunctuationId::Lt | PunctuationId::Gt) => {}
                Some(_) => return false,
                None => {}
            }
            i += 1;
        }
        false
    }

    fn enum_declaration(&mut self, scope: &Scope, access: Visibility, start: usize) -> PResult<Vec<Declaration>> {
        self.advance();
        let scoped = self.match_keyword(KeywordId::Class) || self.match_keyword(KeywordId::Struct);
        self.skip_attributes()?;
        let mut name = match self.peek().kind.ident() {
            Some(ident) => ident.to_string(),
            None => String::new(),
        };
        if !name.is_empty() {
            self.advance();
        }
        let underlying = if self.match_punct(PunctuationId::Colon) {
            let begin = self.pos;
            while !self.is_at_end() && !self.check_punct(PunctuationId::LBrace) {
                self.advance();
            }
            Some(self.join_range(begin, self.pos))
        } else {
            None
        };

        let open = self.pos;
        let Some(close) = self.matching_close(open) else {
            let span = self.token(open).span;
            self.pos = self.sig.len();
            return Err(errors::unterminated_body("enum", span));
        };
        let mut enumerators = Vec::new();
        let mut expect_name = true;
        let mut depth = 0usize;
        for i in open + 1..close {
            let token = self.token(i);
            match token.punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBrace | PunctuationId::LBracket) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBrace | PunctuationId::RBracket) => {
                    depth = depth.saturating_sub(1)
                }
                Some(PunctuationId::Comma) if depth == 0 => expect_name = true,
                _ => {
                    if expect_name {
                        if let Some(ident) = token.kind.ident() {
                            enumerators.push(ident.to_string());
                        }
                        expect_name = false;
                    }
                }
            }
        }
        self.pos = close + 1;

        let mut declarators = self.trailing_declarators(&name);
        let mut named_by_declarator = false;
        if name.is_empty() {
            if let Some(first) = declarators.first().and_then(|d| self.bare_declarator_name(d)) {
                name = self.ident_at(declarators[0][first]).unwrap_or_default().to_string();
                named_by_declarator = true;
            }
        }
        let span = self.span_from(start);
        let leading_comment = self.leading_comment_at(start);
        let mut decls = vec![Declaration {
            name: name.clone(),
            owner: scope.owner(),
            visibility: access,
            span,
            leading_comment,
            kind: DeclKind::Enum(EnumDecl {
                scoped,
                underlying,
                enumerators,
            }),
        }];
        if named_by_declarator {
            declarators.remove(0);
        }
        for declarator in &declarators {
            decls.push(self.declarator_field(&name, declarator, scope, access, span)?);
        }
        Ok(decls)
    }

    // ========================================================================
    // Classes
    // ========================================================================

    /// `class`/`struct`/`union` at `at` starts a definition (a `{` or base list follows the name).
    fn is_class_definition(&self, at: usize) -> bool {
        let mut i = at + 1;
        while i < self.sig.len() {
            let token = self.token(i);
            match token.punctuation_id() {
                Some(PunctuationId::LBrace | PunctuationId::Colon) => return true,
                Some(PunctuationId::ColonColon) => {}
                Some(PunctuationId::LParen) if self.token(i - 1).kind.ident().is_none() => return false,
                Some(PunctuationId::Lt | PunctuationId::LParen | PunctuationId::LBracket) => match self.matching_close(i) {
                    Some(close) => i = close,
                    None => return false,
                },
                Some(_) => return false,
                None if token.keyword_id().is_some() => return false,
                None => {}
            }
            i += 1;
        }
        false
    }

    /// `class Name;`, `struct A::B;`, `enum class E : int;`
    fn is_forward_declaration(&self) -> bool {
        let mut i = self.pos + 1;
        while self.token(i).is_keyword(KeywordId::Class) || self.token(i).is_keyword(KeywordId::Struct) {
            i += 1;
        }
        while self.token(i).kind.ident().is_some() || self.token(i).is_punct(PunctuationId::ColonColon) {
            i += 1;
        }
        if self.token(i).is_punct(PunctuationId::Colon) {
            while !self.token(i).is_punct(PunctuationId::Semi) && i < self.sig.len() {
                i += 1;
            }
        }
        i > self.pos + 1 && self.token(i).is_punct(PunctuationId::Semi)
    }

    fn class_declaration(&mut self, scope: &Scope, access: Visibility, start: usize) -> PResult<Vec<Declaration>> {
        let (head, class) = self.class_definition(scope)?;
        let span = self.span_from(start);
        let leading_comment = self.leading_comment_at(start);
        let mut declarators = self.trailing_declarators(&head.name);
        if head.named_by_declarator && !declarators.is_empty() {
            declarators.remove(0);
        }
        let type_name = head.name.clone();
        let mut decls = vec![type_declaration(head, class, scope, access, span, leading_comment)];
        for declarator in &declarators {
            decls.push(self.declarator_field(&type_name, declarator, scope, access, span)?);
        }
        Ok(decls)
    }

    /// Parse a class head and body, from the class keyword through the closing `}`.
    fn class_definition(&mut self, scope: &Scope) -> PResult<(ClassHead, ClassDecl)> {
        let keyword = self.peek().keyword_id().unwrap_or(KeywordId::Struct);
        self.advance();

        let mut export_markers = Vec::new();
        let mut candidates: Vec<String> = Vec::new();
        loop {
            if self.check_punct(PunctuationId::LBracket) && self.peek_at(1).is_punct(PunctuationId::LBracket) {
                let begin = self.pos;
                self.skip_attributes()?;
                export_markers.push(self.join_range(begin, self.pos));
            } else if let Some(ident) = self.peek().kind.ident().map(str::to_string) {
                let begin = self.pos;
                self.advance();
                if self.check_punct(PunctuationId::LParen) {
                    // __declspec(dllexport), __attribute__((packed)), alignas(16)
                    self.skip_paren_group()?;
                    export_markers.push(self.join_range(begin, self.pos));
                } else {
                    candidates.push(ident);
                }
            } else if self.check_punct(PunctuationId::ColonColon) {
                self.advance();
                if let Some(segment) = self.peek().kind.ident().map(str::to_string) {
                    self.advance();
                    match candidates.last_mut() {
                        Some(last) => {
                            last.push_str("::");
                            last.push_str(&segment);
                        }
                        None => candidates.push(segment),
                    }
                }
            } else if self.check_punct(PunctuationId::Lt) {
                self.skip_angles()?;
            } else {
                break;
            }
        }

        let mut name = candidates.pop();
        if matches!(name.as_deref(), Some("final" | "sealed")) {
            name = candidates.pop();
        }
        export_markers.extend(candidates);

        let default_base_access = if keyword == KeywordId::Class {
            Visibility::Private
        } else {
            Visibility::Public
        };
        let mut bases = Vec::new();
        if self.match_punct(PunctuationId::Colon) {
            loop {
                bases.push(self.base_specifier(default_base_access)?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }

        if !self.check_punct(PunctuationId::LBrace) {
            return Err(errors::unexpected_token(
                &self.peek().kind.spelling(),
                "in class header",
                self.current_span(),
            ));
        }
        let open = self.pos;

        let (name, named_by_declarator) = match name {
            Some(name) => (name, false),
            None => match self.matching_close(open).and_then(|close| self.ident_at(close + 1)) {
                Some(declarator) => (declarator.to_string(), true),
                None => (String::new(), false),
            },
        };
        let short_name = name.rsplit("::").next().unwrap_or_default().to_string();
        let qualified = match scope.class() {
            Some(outer) if name.is_empty() => outer.qualified.clone(),
            Some(outer) => format!("{}::{}", outer.qualified, name),
            None => scope.in_namespace(&name),
        };

        self.advance();
        self.mark_consumed();
        let class_scope = Scope::Class(ClassScope {
            name: short_name,
            qualified,
            is_class: keyword == KeywordId::Class,
        });
        let members = self.scope_members(&class_scope);
        if !self.check_punct(PunctuationId::RBrace) {
            let what = format!("{} `{}`", keyword_name(keyword), name);
            return Err(errors::unterminated_body(&what, self.token(open).span));
        }
        let close = self.pos;
        self.advance();

        let (nested, members): (Vec<_>, Vec<_>) = members
            .into_iter()
            .partition(|d| matches!(d.kind, DeclKind::Class(_) | DeclKind::Struct(_)));
        let class = ClassDecl {
            bases,
            members,
            nested,
            export_markers,
            body: self.token(open).span.merge(self.token(close).span),
            is_union: keyword == KeywordId::Union,
        };
        let head = ClassHead {
            keyword,
            name,
            named_by_declarator,
        };
        Ok((head, class))
    }

    /// One entry of a base list: `public virtual Base<T>`.
    fn base_specifier(&mut self, default_access: Visibility) -> PResult<BaseSpecifier> {
        let mut access = None;
        let mut is_virtual = false;
        loop {
            match self.peek().keyword_id() {
                Some(KeywordId::Public) => access = Some(Visibility::Public),
                Some(KeywordId::Protected) => access = Some(Visibility::Protected),
                Some(KeywordId::Private) => access = Some(Visibility::Private),
                Some(KeywordId::Virtual) => is_virtual = true,
                _ => break,
            }
            self.advance();
        }

        let begin = self.pos;
        let mut angle = 0usize;
        while !self.is_at_end() {
            match self.peek().punctuation_id() {
                Some(PunctuationId::Comma | PunctuationId::LBrace) if angle == 0 => break,
                Some(PunctuationId::Lt) => angle += 1,
                Some(PunctuationId::Gt) => angle = angle.saturating_sub(1),
                Some(PunctuationId::Semi | PunctuationId::RBrace) => break,
                _ => {}
            }
            self.advance();
        }
        if self.pos == begin || !(self.check_punct(PunctuationId::Comma) || self.check_punct(PunctuationId::LBrace)) {
            return Err(errors::unexpected_token(
                &self.peek().kind.spelling(),
                "in base class list",
                self.current_span(),
            ));
        }
        Ok(BaseSpecifier {
            name: self.join_range(begin, self.pos),
            access: access.unwrap_or(default_access),
            is_virtual,
        })
    }

    /// Declarators after a type definition's closing brace (`} a, *b;`), consuming the `;`.
    ///
    /// A missing `;` is reported as a warning and nothing is consumed.
    fn trailing_declarators(&mut self, type_name: &str) -> Vec<Vec<usize>> {
        let starts_declarator = self.peek().kind.ident().is_some()
            || self.check_punct(PunctuationId::Star)
            || self.check_punct(PunctuationId::Amp)
            || self.check_keyword(KeywordId::Const)
            || self.check_keyword(KeywordId::Volatile);
        if !starts_declarator {
            if !self.match_punct(PunctuationId::Semi) {
                let span = self.token(self.pos.saturating_sub(1)).span;
                self.diagnostics.push(errors::missing_semicolon_after_type(type_name, span));
            }
            return Vec::new();
        }

        let begin = self.pos;
        let mut depth = 0usize;
        while !self.is_at_end() {
            match self.peek().punctuation_id() {
                Some(PunctuationId::LParen | PunctuationId::LBracket | PunctuationId::LBrace) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket) => depth = depth.saturating_sub(1),
                Some(PunctuationId::RBrace) if depth == 0 => break,
                Some(PunctuationId::RBrace) => depth -= 1,
                Some(PunctuationId::Semi) if depth == 0 => break,
                _ => {}
            }
            self.advance();
        }
        let tokens: Vec<usize> = (begin..self.pos).collect();
        if !self.match_punct(PunctuationId::Semi) {
            let span = self.token(self.pos.saturating_sub(1)).span;
            self.diagnostics.push(errors::missing_semicolon_after_type(type_name, span));
        }
        self.split_declarators(&tokens)
    }

    // ========================================================================
    // Macro invocations
    // ========================================================================

    /// `IMPLEMENT_DYNAMIC(CFoo, CBase)` on its own line, with no terminating `;`.
    fn is_macro_invocation(&self) -> bool {
        let Some(name) = self.peek().kind.ident() else {
            return false;
        };
        if !is_macro_name(name) || !self.peek_at(1).is_punct(PunctuationId::LParen) {
            return false;
        }
        let Some(close) = self.matching_close(self.pos + 1) else {
            return false;
        };
        let next = self.token(close + 1);
        if next.kind == TokenKind::Eof {
            return true;
        }
        let continues = matches!(
            next.punctuation_id(),
            Some(PunctuationId::Semi | PunctuationId::LBrace | PunctuationId::Colon | PunctuationId::Eq | PunctuationId::Arrow)
        ) || next.is_keyword(KeywordId::Const)
            || next.is_keyword(KeywordId::Noexcept)
            || next.kind.is_ident("override");
        next.line > self.token(close).end_line() && !continues
    }
}

fn is_macro_name(name: &str) -> bool {
    name.len() > 1
        && name.chars().any(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn keyword_name(keyword: KeywordId) -> &'static str {
    cppmatch_core::lang::keywords::as_str(keyword)
}

/// Build the `Class`/`Struct` declaration for a parsed definition.
fn type_declaration(
    head: ClassHead,
    class: ClassDecl,
    scope: &Scope,
    access: Visibility,
    span: Span,
    leading_comment: Option<Span>,
) -> Declaration {
    let kind = if head.keyword == KeywordId::Class {
        DeclKind::Class(class)
    } else {
        DeclKind::Struct(class)
    };
    Declaration {
        name: head.name,
        owner: scope.owner().or_else(|| scope.namespace().map(str::to_string)),
        visibility: access,
        span,
        leading_comment,
        kind,
    }
}

/// Drop trailing `*`, `&` and `&&` from a declarator prefix.
fn strip_pointer_ops(parser: &Parser<'_>, tokens: &[usize]) -> Vec<usize> {
    let mut out = tokens.to_vec();
    while let Some(&last) = out.last() {
        let token = parser.token(last);
        if token.is_punct(PunctuationId::Star) || token.is_punct(PunctuationId::Amp) || token.is_punct(PunctuationId::AmpAmp) {
            out.pop();
        } else {
            break;
        }
    }
    out
}
