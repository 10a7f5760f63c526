/// Parser core types and entrypoint.
///
/// This chunk defines the [`Parser`] type, the scope model and the top-level `parse()` loop.
///
/// ## Notes
/// - This file is `include!`'d into `crate::parser` to keep all parser methods in a
///   single module while avoiding a single “god file”.
type PResult<T> = Result<T, Diagnostic>;

/// Output of [`parse`]: declarations in source order plus parser diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedFile {
    pub declarations: Vec<Declaration>,
    pub header_comment: Option<Span>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Brace scope currently being parsed.
#[derive(Debug, Clone)]
enum Scope {
    /// File scope. Namespaces and `extern "C"` blocks are flattened into it (`nested`).
    /// `namespace` is the enclosing namespace path (`A::B`) that qualifies class owners.
    File { nested: bool, namespace: Option<String> },
    Class(ClassScope),
}

#[derive(Debug, Clone)]
struct ClassScope {
    /// Unqualified name, used to recognize constructors and redundant qualifiers.
    name: String,
    /// Owner name given to members (`Outer::Inner` for nested classes).
    qualified: String,
    /// `class` (private by default) rather than `struct`/`union`.
    is_class: bool,
}

impl Scope {
    fn owner(&self) -> Option<String> {
        match self {
            Scope::Class(c) => Some(c.qualified.clone()),
            Scope::File { .. } => None,
        }
    }

    /// Namespace path of a file scope.
    fn namespace(&self) -> Option<&str> {
        match self {
            Scope::File { namespace, .. } => namespace.as_deref(),
            Scope::Class(_) => None,
        }
    }

    /// `name` prefixed with the enclosing namespace path.
    fn in_namespace(&self, name: &str) -> String {
        match self.namespace() {
            Some(ns) if !name.is_empty() => format!("{ns}::{name}"),
            _ => name.to_string(),
        }
    }

    fn class(&self) -> Option<&ClassScope> {
        match self {
            Scope::Class(c) => Some(c),
            Scope::File { .. } => None,
        }
    }

    fn default_access(&self) -> Visibility {
        match self {
            Scope::Class(c) if c.is_class => Visibility::Private,
            _ => Visibility::Public,
        }
    }
}

/// Declaration prefix consumed before dispatch (`template<...>`).
#[derive(Debug, Clone, Copy, Default)]
struct Prefix {
    is_template: bool,
}

/// Parser state.
///
/// ## Notes
/// - The grammar only sees significant tokens; comments and directives stay in `tokens` and
///   are consulted for comment attachment and `#define` declarations.
/// - The parser is single-pass and recovers from errors by synchronizing at declaration
///   boundaries.
pub struct Parser<'a> {
    /// Full token stream, trivia included.
    tokens: &'a [Token],
    /// Indices into `tokens` of significant (non-trivia, non-Eof) tokens.
    sig: Vec<usize>,
    pos: usize,
    /// Raw index up to which directives have been turned into declarations or skipped.
    directive_cursor: usize,
    /// Inside a function body: directives are not declarations there.
    in_body: bool,
    eof: Token,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `cppmatch_syntax::lexer`.
    pub fn new(tokens: &'a [Token]) -> Self {
        let sig = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
            .map(|(i, _)| i)
            .collect();
        let eof = match tokens.last() {
            Some(last) if last.kind == TokenKind::Eof => last.clone(),
            Some(last) => Token::new(
                TokenKind::Eof,
                Span::new(last.span.end, last.span.end),
                last.end_line(),
                last.column,
            ),
            None => Token::new(TokenKind::Eof, Span::default(), 1, 1),
        };
        Self {
            tokens,
            sig,
            pos: 0,
            directive_cursor: 0,
            in_body: false,
            eof,
            diagnostics: Vec::new(),
        }
    }

    /// Parse the entire token stream.
    ///
    /// Never fails: errors are reported as diagnostics and `Damaged` declarations.
    pub fn parse(mut self) -> ParsedFile {
        let header_comment = self.header_comment();
        let mut declarations = self.scope_members(&Scope::File {
            nested: false,
            namespace: None,
        });
        assign_overload_indices(&mut declarations);
        ParsedFile {
            declarations,
            header_comment,
            diagnostics: self.diagnostics,
        }
    }

    /// Parse declarations until end of file or the `}` closing the current scope (not consumed).
    fn scope_members(&mut self, scope: &Scope) -> Vec<Declaration> {
        let mut decls = Vec::new();
        let mut access = scope.default_access();
        loop {
            self.flush_defines(&mut decls);
            if self.is_at_end() {
                break;
            }
            if self.check_punct(PunctuationId::RBrace) {
                if matches!(scope, Scope::File { nested: false, .. }) {
                    self.diagnostics.push(errors::stray_closing_brace(self.current_span()));
                    self.advance();
                    self.mark_consumed();
                    continue;
                }
                break;
            }

            let start = self.pos;
            match self.declaration(scope, &mut access) {
                Ok(mut parsed) => decls.append(&mut parsed),
                Err(diagnostic) => decls.push(self.recover(start, diagnostic, scope, access)),
            }
            self.mark_consumed();
        }
        decls
    }

    /// Record `diagnostic`, skip the damaged declaration and return its marker.
    fn recover(&mut self, start: usize, diagnostic: Diagnostic, scope: &Scope, access: Visibility) -> Declaration {
        let reason = diagnostic.message.clone();
        self.diagnostics.push(diagnostic);
        self.pos = start;
        self.synchronize();
        Declaration {
            name: String::new(),
            owner: scope.owner(),
            visibility: access,
            span: self.span_from(start),
            leading_comment: self.leading_comment_at(start),
            kind: DeclKind::Damaged(DamagedDecl { reason }),
        }
    }
}

/// Number same-name methods per owner in source order.
fn assign_overload_indices(decls: &mut [Declaration]) {
    let mut counts: HashMap<(Option<String>, String), u32> = HashMap::new();
    assign_overload_indices_in(decls, &mut counts);
}

fn assign_overload_indices_in(decls: &mut [Declaration], counts: &mut HashMap<(Option<String>, String), u32>) {
    for decl in decls {
        match &mut decl.kind {
            DeclKind::Method(method) => {
                let count = counts.entry((decl.owner.clone(), decl.name.clone())).or_insert(0);
                method.overload_index = *count;
                *count += 1;
            }
            DeclKind::Class(class)
            | DeclKind::Struct(class)
            | DeclKind::Typedef(TypedefDecl {
                aggregate: Some(class), ..
            }) => {
                assign_overload_indices_in(&mut class.members, counts);
                assign_overload_indices_in(&mut class.nested, counts);
            }
            _ => {}
        }
    }
}
