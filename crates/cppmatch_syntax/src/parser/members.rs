/// Methods, free functions, fields and static member definitions.
///
/// Member declarations are parsed in two steps: the head (every token up to the terminating `;`
/// or body `{`) is collected first, then classified as a function when it contains a parameter
/// list after a name, or as a field/variable otherwise.

/// How a member head ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    /// `;` (consumed).
    Semi,
    /// `{` of a function body (not consumed).
    Body,
}

#[derive(Debug, Clone)]
struct MemberHead {
    /// Significant-token indices with attribute groups and calling conventions removed.
    tokens: Vec<usize>,
    terminator: Terminator,
}

/// Positions (within `MemberHead::tokens`) describing a function declarator.
#[derive(Debug, Clone)]
struct FunctionShape {
    name: String,
    /// First token of the name (`~`, `operator` or the identifier).
    name_start: usize,
    open: usize,
    close: usize,
    kind: MethodKind,
}

const CALLING_CONVENTIONS: &[&str] = &["__cdecl", "__stdcall", "__fastcall", "__thiscall", "__vectorcall", "WINAPI"];

impl<'a> Parser<'a> {
    fn member_or_function(
        &mut self,
        scope: &Scope,
        access: Visibility,
        start: usize,
        prefix: Prefix,
    ) -> PResult<Vec<Declaration>> {
        let head = self.collect_head()?;
        let tokens = self.strip_decorations(&head.tokens);
        match self.function_shape(&tokens) {
            Some(shape) => self.function(scope, access, start, prefix, &tokens, shape, head.terminator),
            None if head.terminator == Terminator::Body => Err(errors::unexpected_token(
                "{",
                "after a declaration that is not a function",
                self.current_span(),
            )),
            None => self.fields(scope, access, start, &tokens),
        }
    }

    /// Collect a member head up to `;` (consumed) or a body `{` (not consumed).
    ///
    /// Brace initializers (`int m_a{1};`, `m_x{0}` in an initializer list, `= { ... }`) are
    /// part of the head.
    fn collect_head(&mut self) -> PResult<MemberHead> {
        let mut tokens = Vec::new();
        let mut depth = 0usize;
        let mut seen_group = false;
        let mut seen_eq = false;
        let mut ctor_init = false;
        loop {
            if self.is_at_end() {
                return Err(errors::unterminated_body("declaration", self.current_span()));
            }
            let id = self.peek().punctuation_id();
            match id {
                Some(PunctuationId::LParen | PunctuationId::LBracket) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket) => {
                    if depth == 0 {
                        return Err(errors::unbalanced_parens(self.current_span()));
                    }
                    depth -= 1;
                    if depth == 0 && id == Some(PunctuationId::RParen) {
                        seen_group = true;
                    }
                }
                Some(PunctuationId::Semi | PunctuationId::LBrace | PunctuationId::RBrace) if depth > 0 => {
                    return Err(errors::unbalanced_parens(self.current_span()));
                }
                Some(PunctuationId::Semi) => {
                    self.advance();
                    return Ok(MemberHead {
                        tokens,
                        terminator: Terminator::Semi,
                    });
                }
                Some(PunctuationId::RBrace) => {
                    return Err(errors::unexpected_token("}", "where `;` was expected", self.current_span()));
                }
                Some(PunctuationId::LBrace) => {
                    let after_name = tokens.last().is_some_and(|&i| {
                        let prev = self.token(i);
                        prev.kind.ident().is_some() || prev.is_punct(PunctuationId::Gt)
                    });
                    let brace_init = seen_eq || (after_name && (ctor_init || !seen_group));
                    if !brace_init {
                        return Ok(MemberHead {
                            tokens,
                            terminator: Terminator::Body,
                        });
                    }
                    let open = self.pos;
                    let close = self
                        .matching_close(open)
                        .ok_or_else(|| errors::unterminated_body("initializer", self.current_span()))?;
                    tokens.extend(open..=close);
                    self.pos = close + 1;
                    continue;
                }
                Some(PunctuationId::Colon) if depth == 0 && seen_group => ctor_init = true,
                Some(PunctuationId::Eq) if depth == 0 => seen_eq = true,
                _ => {}
            }
            tokens.push(self.pos);
            self.advance();
        }
    }

    /// Remove `__declspec(...)`, `__attribute__((...))`, `alignas(...)`, `[[...]]` and calling
    /// conventions.
    fn strip_decorations(&self, tokens: &[usize]) -> Vec<usize> {
        let mut out = Vec::with_capacity(tokens.len());
        let mut k = 0;
        while k < tokens.len() {
            let i = tokens[k];
            let token = self.token(i);
            let group_marker = token
                .kind
                .ident()
                .is_some_and(|name| matches!(name, "__declspec" | "__attribute__" | "alignas"));
            let skip_to = if group_marker && self.token(i + 1).is_punct(PunctuationId::LParen) {
                self.matching_close(i + 1)
            } else if token.is_punct(PunctuationId::LBracket) && self.token(i + 1).is_punct(PunctuationId::LBracket) {
                self.matching_close(i)
            } else {
                None
            };
            if let Some(close) = skip_to {
                while k < tokens.len() && tokens[k] <= close {
                    k += 1;
                }
                continue;
            }
            if !token.kind.ident().is_some_and(|name| CALLING_CONVENTIONS.contains(&name)) {
                out.push(i);
            }
            k += 1;
        }
        out
    }

    /// Recognize `name(params)` or `operator@(params)` at paren depth 0 in a member head.
    fn function_shape(&self, tokens: &[usize]) -> Option<FunctionShape> {
        if let Some(at) = tokens.iter().position(|&i| self.token(i).is_keyword(KeywordId::Operator)) {
            return self.operator_shape(tokens, at);
        }

        let mut depth = 0usize;
        let mut angle = 0usize;
        for k in 0..tokens.len() {
            let token = self.token(tokens[k]);
            match token.punctuation_id() {
                Some(PunctuationId::Eq) if depth == 0 && angle == 0 => return None,
                Some(PunctuationId::Lt) if k > 0 && self.ident_at(tokens[k - 1]).is_some() => angle += 1,
                Some(PunctuationId::Gt) if angle > 0 => angle -= 1,
                Some(PunctuationId::LParen) if depth == 0 && angle == 0 => {
                    if k == 0 || self.ident_at(tokens[k - 1]).is_none() {
                        depth += 1;
                        continue;
                    }
                    let close = self.group_end(tokens, k)?;
                    if close > k + 1 && !self.starts_parameter_list(tokens[k + 1]) {
                        return None;
                    }
                    let name = self.ident_at(tokens[k - 1]).unwrap_or_default().to_string();
                    if k >= 2 && self.token(tokens[k - 2]).is_punct(PunctuationId::Tilde) {
                        return Some(FunctionShape {
                            name: format!("~{name}"),
                            name_start: k - 2,
                            open: k,
                            close,
                            kind: MethodKind::Destructor,
                        });
                    }
                    return Some(FunctionShape {
                        name,
                        name_start: k - 1,
                        open: k,
                        close,
                        kind: MethodKind::Regular,
                    });
                }
                Some(PunctuationId::LParen | PunctuationId::LBracket) => depth += 1,
                Some(PunctuationId::RParen | PunctuationId::RBracket) => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        None
    }

    /// `operator==(...)`, `operator()(...)`, `operator new[](...)`, `operator const char*()`.
    fn operator_shape(&self, tokens: &[usize], at: usize) -> Option<FunctionShape> {
        let mut j = at + 1;
        if j + 1 < tokens.len()
            && self.token(tokens[j]).is_punct(PunctuationId::LParen)
            && self.token(tokens[j + 1]).is_punct(PunctuationId::RParen)
        {
            j += 2;
        } else {
            while j < tokens.len() && !self.token(tokens[j]).is_punct(PunctuationId::LParen) {
                j += 1;
            }
        }
        if j >= tokens.len() || !self.token(tokens[j]).is_punct(PunctuationId::LParen) {
            return None;
        }
        let symbol = &tokens[at + 1..j];
        let name = match symbol.first() {
            Some(&first) if self.token(first).kind.is_word() => format!("operator {}", self.join(symbol)),
            _ => {
                let spelled: String = symbol.iter().map(|&i| self.token(i).kind.spelling()).collect();
                format!("operator{spelled}")
            }
        };
        let close = self.group_end(tokens, j)?;
        Some(FunctionShape {
            name,
            name_start: at,
            open: j,
            close,
            kind: MethodKind::Operator,
        })
    }

    /// A parameter list starts with a type, `...` or `void`, never a literal or a declarator
    /// operator (`int x(5);` and `void (*fp)(int);` are not functions).
    fn starts_parameter_list(&self, first: usize) -> bool {
        let token = self.token(first);
        match &token.kind {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(id) => {
                cppmatch_core::lang::keywords::is_type_keyword(*id)
                    || matches!(id, KeywordId::Struct | KeywordId::Class | KeywordId::Enum | KeywordId::Union)
            }
            TokenKind::Punctuation(id) => matches!(id, PunctuationId::Ellipsis | PunctuationId::ColonColon),
            _ => false,
        }
    }

    /// Position (within `tokens`) of the group closer matching the opener at `open`.
    fn group_end(&self, tokens: &[usize], open: usize) -> Option<usize> {
        let close = self.matching_close(tokens[open])?;
        tokens[open..].iter().position(|&i| i == close).map(|p| open + p)
    }

    // ========================================================================
    // Functions
    // ========================================================================

    #[allow(clippy::too_many_arguments)]
    fn function(
        &mut self,
        scope: &Scope,
        access: Visibility,
        start: usize,
        prefix: Prefix,
        tokens: &[usize],
        shape: FunctionShape,
        terminator: Terminator,
    ) -> PResult<Vec<Declaration>> {
        let (qualifier_start, qualifiers_path) = self.name_qualifiers(tokens, shape.name_start);

        let mut qualifiers = MethodQualifiers::default();
        let mut return_tokens = Vec::new();
        let mut k = 0;
        while k < qualifier_start {
            let token = self.token(tokens[k]);
            match token.keyword_id() {
                Some(KeywordId::Virtual) => qualifiers.is_virtual = true,
                Some(KeywordId::Static) => qualifiers.is_static = true,
                Some(KeywordId::Inline) => qualifiers.is_inline = true,
                Some(KeywordId::Explicit) => qualifiers.is_explicit = true,
                Some(KeywordId::Constexpr | KeywordId::Friend) => {}
                Some(KeywordId::Extern) => {
                    if k + 1 < qualifier_start && matches!(self.token(tokens[k + 1]).kind, TokenKind::String(_)) {
                        k += 1;
                    }
                }
                _ if token.kind.is_ident("__forceinline") || token.kind.is_ident("__inline") => {
                    qualifiers.is_inline = true
                }
                _ => return_tokens.push(tokens[k]),
            }
            k += 1;
        }
        let mut return_type = (!return_tokens.is_empty()).then(|| self.join(&return_tokens));

        let params = self.parameters(&tokens[shape.open + 1..shape.close])?;

        let mut initializers = Vec::new();
        let mut is_try = false;
        let mut k = shape.close + 1;
        while k < tokens.len() {
            let token = self.token(tokens[k]);
            if token.is_keyword(KeywordId::Const) {
                qualifiers.is_const = true;
            } else if token.is_keyword(KeywordId::Volatile)
                || token.is_punct(PunctuationId::Amp)
                || token.is_punct(PunctuationId::AmpAmp)
            {
                // cv/ref qualifiers other than `const` do not affect identity
            } else if token.is_keyword(KeywordId::Noexcept) || token.is_keyword(KeywordId::Throw) {
                if k + 1 < tokens.len() && self.token(tokens[k + 1]).is_punct(PunctuationId::LParen) {
                    k = self.group_end(tokens, k + 1).unwrap_or(tokens.len() - 1);
                }
            } else if token.kind.is_ident("override") {
                qualifiers.is_override = true;
            } else if token.kind.is_ident("final") || token.kind.is_ident("sealed") {
                qualifiers.is_final = true;
            } else if token.is_punct(PunctuationId::Arrow) {
                let begin = k + 1;
                let mut end = begin;
                while end < tokens.len() {
                    let t = self.token(tokens[end]);
                    if t.is_punct(PunctuationId::Eq)
                        || t.is_punct(PunctuationId::Colon)
                        || t.kind.is_ident("override")
                        || t.kind.is_ident("final")
                    {
                        break;
                    }
                    end += 1;
                }
                return_type = Some(self.join(&tokens[begin..end]));
                k = end;
                continue;
            } else if token.is_punct(PunctuationId::Eq) {
                let value = tokens.get(k + 1).map(|&i| self.token(i));
                match value {
                    Some(t) if matches!(&t.kind, TokenKind::Number(n) if n == "0") => qualifiers.is_pure_virtual = true,
                    Some(t) if t.is_keyword(KeywordId::Default) => qualifiers.is_defaulted = true,
                    Some(t) if t.is_keyword(KeywordId::Delete) => qualifiers.is_deleted = true,
                    _ => {
                        return Err(errors::unexpected_token("=", "after parameter list", token.span)
                            .with_hint("only `= 0`, `= default` and `= delete` may follow a parameter list"));
                    }
                }
                k += 2;
                continue;
            } else if token.is_punct(PunctuationId::Colon) {
                initializers = self.member_initializers(&tokens[k + 1..]);
                break;
            } else if token.is_keyword(KeywordId::Try) {
                is_try = true;
            } else {
                return Err(errors::unexpected_token(
                    &token.kind.spelling(),
                    "after parameter list",
                    token.span,
                ));
            }
            k += 1;
        }

        let mut body = None;
        let mut body_range = None;
        if terminator == Terminator::Body {
            let (open, close) = self.skip_brace_block("function body")?;
            let mut span = self.token(open).span.merge(self.token(close).span);
            if is_try {
                while self.check_keyword(KeywordId::Catch) {
                    self.advance();
                    self.skip_paren_group()?;
                    let (_, handler_close) = self.skip_brace_block("catch handler")?;
                    span = span.merge(self.token(handler_close).span);
                }
            }
            body = Some(span);
            body_range = Some((open, close));
        }

        let class_name = scope.class().map(|c| c.name.as_str());
        let short_qualifier = qualifiers_path.last().map(String::as_str);
        let kind = match shape.kind {
            MethodKind::Regular
                if return_type.is_none()
                    && (Some(shape.name.as_str()) == short_qualifier
                        || (qualifiers_path.is_empty() && Some(shape.name.as_str()) == class_name)) =>
            {
                MethodKind::Constructor
            }
            other => other,
        };

        // Function-like macro invocations (`DECLARE_SERIAL(CFoo);`, `MAIN(rep01) { ... }`).
        if kind == MethodKind::Regular && return_type.is_none() && (qualifiers_path.is_empty() || scope.class().is_some()) {
            return Ok(Vec::new());
        }

        let (owner, out_of_class) = match scope.class() {
            Some(class) => {
                if !qualifiers_path.is_empty() {
                    let written = qualifiers_path.join("::");
                    if written != class.name && written != class.qualified {
                        let span = self.span_from(start);
                        self.diagnostics
                            .push(errors::mismatched_member_qualifier(&written, &class.qualified, span));
                    }
                }
                (Some(class.qualified.clone()), false)
            }
            None if qualifiers_path.is_empty() => (None, false),
            None => (Some(scope.in_namespace(&qualifiers_path.join("::"))), true),
        };

        let local_types = match body_range {
            Some((open, close)) => {
                let resume = self.pos;
                let found = self.local_types(open, close);
                self.pos = resume;
                found
            }
            None => Vec::new(),
        };

        Ok(vec![Declaration {
            name: shape.name,
            owner,
            visibility: access,
            span: self.span_from(start),
            leading_comment: self.leading_comment_at(start),
            kind: DeclKind::Method(MethodDecl {
                return_type,
                params,
                qualifiers,
                kind,
                initializers,
                body,
                local_types,
                overload_index: 0,
                out_of_class,
                is_template: prefix.is_template,
            }),
        }])
    }

    /// Walk back over `A::B<T>::` before the name at `name_start`.
    ///
    /// Returns the position where the qualified name begins and the qualifier segments (template
    /// arguments dropped). A leading global `::` is skipped.
    fn name_qualifiers(&self, tokens: &[usize], name_start: usize) -> (usize, Vec<String>) {
        let mut segments = Vec::new();
        let mut q = name_start;
        while q >= 1 && self.token(tokens[q - 1]).is_punct(PunctuationId::ColonColon) {
            let mut p = q as isize - 2;
            if p >= 0 && self.token(tokens[p as usize]).is_punct(PunctuationId::Gt) {
                let mut depth = 0isize;
                while p >= 0 {
                    let t = self.token(tokens[p as usize]);
                    if t.is_punct(PunctuationId::Gt) {
                        depth += 1;
                    } else if t.is_punct(PunctuationId::Lt) {
                        depth -= 1;
                        if depth == 0 {
                            p -= 1;
                            break;
                        }
                    }
                    p -= 1;
                }
            }
            match (p >= 0).then(|| self.ident_at(tokens[p as usize])).flatten() {
                Some(segment) => {
                    segments.push(segment.to_string());
                    q = p as usize;
                }
                None => {
                    q -= 1;
                    break;
                }
            }
        }
        segments.reverse();
        (q, segments)
    }

    /// `: m_a(1), m_b{2}, Base(x)`
    fn member_initializers(&self, tokens: &[usize]) -> Vec<MemberInit> {
        let mut out = Vec::new();
        let mut k = 0;
        while k < tokens.len() {
            let begin = k;
            while k < tokens.len()
                && !self.token(tokens[k]).is_punct(PunctuationId::LParen)
                && !self.token(tokens[k]).is_punct(PunctuationId::LBrace)
            {
                k += 1;
            }
            let Some(close) = (k < tokens.len()).then(|| self.group_end(tokens, k)).flatten() else {
                break;
            };
            let (open_token, close_token) = (tokens[k], tokens[close]);
            let value = if close_token > open_token + 1 {
                self.token(open_token + 1).span.merge(self.token(close_token - 1).span)
            } else {
                Span::new(self.token(open_token).span.end, self.token(close_token).span.start)
            };
            out.push(MemberInit {
                member: self.join(&tokens[begin..k]),
                value,
            });
            k = close + 1;
            if k < tokens.len() && self.token(tokens[k]).is_punct(PunctuationId::Comma) {
                k += 1;
            }
        }
        out
    }

    // ========================================================================
    // Fields and static member definitions
    // ========================================================================

    fn fields(&mut self, scope: &Scope, access: Visibility, start: usize, tokens: &[usize]) -> PResult<Vec<Declaration>> {
        let mut is_static = false;
        let mut is_mutable = false;
        let mut kept = Vec::with_capacity(tokens.len());
        let mut k = 0;
        while k < tokens.len() {
            let token = self.token(tokens[k]);
            let before_init = !tokens[..k].iter().any(|&i| {
                let t = self.token(i);
                t.is_punct(PunctuationId::Eq) || t.is_punct(PunctuationId::LBrace) || t.is_punct(PunctuationId::LParen)
            });
            if before_init {
                match token.keyword_id() {
                    Some(KeywordId::Static) => is_static = true,
                    Some(KeywordId::Mutable) => is_mutable = true,
                    Some(KeywordId::Constexpr | KeywordId::Inline | KeywordId::Register | KeywordId::ThreadLocal) => {}
                    Some(KeywordId::Extern) => {
                        if k + 1 < tokens.len() && matches!(self.token(tokens[k + 1]).kind, TokenKind::String(_)) {
                            k += 1;
                        }
                    }
                    _ => kept.push(tokens[k]),
                }
            } else {
                kept.push(tokens[k]);
            }
            k += 1;
        }

        let span = self.span_from(start);
        let leading_comment = self.leading_comment_at(start);
        let trailing_comment = self.trailing_comment();
        let declarators = self.split_declarators(&kept);
        let mut decls = Vec::new();
        let mut base: Vec<usize> = Vec::new();
        for (n, declarator) in declarators.iter().enumerate() {
            let named = if n == 0 {
                self.declarator_name(declarator, true)
            } else {
                self.bare_declarator_name(declarator)
            };
            let Some(at) = named else {
                let found = declarator.first().map(|&i| self.token(i).kind.spelling().into_owned());
                let at_span = self.span_of(declarator).unwrap_or(span);
                return Err(errors::unexpected_token(
                    found.as_deref().unwrap_or(";"),
                    "where a declaration was expected",
                    at_span,
                ));
            };
            let name = self.ident_at(declarator[at]).unwrap_or_default().to_string();
            let (qualifier_start, qualifiers_path) = self.name_qualifiers(declarator, at);
            let (array_dims, bit_width, initializer) = self.declarator_suffix(&declarator[at + 1..]);

            let ty_tokens: Vec<usize> = if self.function_pointer_name(declarator).is_some() {
                declarator.iter().enumerate().filter(|(p, _)| *p != at).map(|(_, &i)| i).collect()
            } else if n == 0 {
                base = strip_pointer_ops(self, &declarator[..qualifier_start]);
                declarator[..qualifier_start].to_vec()
            } else {
                let mut combined = base.clone();
                combined.extend_from_slice(&declarator[..qualifier_start]);
                combined
            };
            let is_const = ty_tokens.iter().any(|&i| self.token(i).is_keyword(KeywordId::Const));
            let ty = self.join(&ty_tokens);

            if scope.class().is_none() && !qualifiers_path.is_empty() {
                let owner = scope.in_namespace(&qualifiers_path.join("::"));
                let ty = (!ty.is_empty()).then_some(ty);
                if ty.is_none() {
                    let at_span = self.span_of(declarator).unwrap_or(span);
                    self.diagnostics.push(errors::missing_static_type(&owner, &name, at_span));
                }
                decls.push(Declaration {
                    name,
                    owner: Some(owner),
                    visibility: Visibility::Public,
                    span,
                    leading_comment,
                    kind: DeclKind::StaticFieldDefinition(StaticFieldDef {
                        ty,
                        array_dims,
                        initializer,
                    }),
                });
                continue;
            }

            decls.push(Declaration {
                name,
                owner: scope.owner(),
                visibility: access,
                span,
                leading_comment,
                kind: DeclKind::Field(FieldDecl {
                    ty,
                    array_dims,
                    initializer,
                    bit_width,
                    is_static,
                    is_const,
                    is_mutable,
                    trailing_comment,
                }),
            });
        }
        Ok(decls)
    }

    /// Field named by a declarator after a type definition (`struct S { ... } s, *ps;`).
    fn declarator_field(
        &self,
        type_name: &str,
        declarator: &[usize],
        scope: &Scope,
        access: Visibility,
        span: Span,
    ) -> PResult<Declaration> {
        let Some(at) = self.bare_declarator_name(declarator) else {
            let at_span = self.span_of(declarator).unwrap_or(span);
            return Err(errors::unexpected_token(
                &self.join(declarator),
                "after type definition",
                at_span,
            ));
        };
        let pointers = self.join(&declarator[..at]);
        let is_const = declarator[..at].iter().any(|&i| self.token(i).is_keyword(KeywordId::Const));
        let (array_dims, bit_width, initializer) = self.declarator_suffix(&declarator[at + 1..]);
        Ok(Declaration {
            name: self.ident_at(declarator[at]).unwrap_or_default().to_string(),
            owner: scope.owner(),
            visibility: access,
            span,
            leading_comment: None,
            kind: DeclKind::Field(FieldDecl {
                ty: format!("{type_name}{pointers}"),
                array_dims,
                initializer,
                bit_width,
                is_static: false,
                is_const,
                is_mutable: false,
                trailing_comment: self.trailing_comment(),
            }),
        })
    }

    /// Array dimensions, bit width and initializer following a declarator name.
    fn declarator_suffix(&self, rest: &[usize]) -> (Vec<String>, Option<String>, Option<Span>) {
        let mut array_dims = Vec::new();
        let mut bit_width = None;
        let mut initializer = None;
        let mut k = 0;
        while k < rest.len() {
            match self.token(rest[k]).punctuation_id() {
                Some(PunctuationId::LBracket) => {
                    let Some(close) = self.group_end(rest, k) else {
                        break;
                    };
                    array_dims.push(self.join(&rest[k + 1..close]));
                    k = close + 1;
                }
                Some(PunctuationId::Colon) => {
                    let end = rest[k + 1..]
                        .iter()
                        .position(|&i| {
                            let t = self.token(i);
                            t.is_punct(PunctuationId::Eq) || t.is_punct(PunctuationId::LBrace)
                        })
                        .map_or(rest.len(), |p| k + 1 + p);
                    bit_width = Some(self.join(&rest[k + 1..end]));
                    k = end;
                }
                Some(PunctuationId::Eq) => {
                    initializer = self.span_of(&rest[k + 1..]);
                    break;
                }
                Some(PunctuationId::LBrace | PunctuationId::LParen) => {
                    initializer = self.span_of(&rest[k..]);
                    break;
                }
                _ => k += 1,
            }
        }
        (array_dims, bit_width, initializer)
    }
}
