//! Declaration model for parsed C++ files.
//!
//! A file parses into an ordered list of [`Declaration`]s. Every declaration carries the same
//! common record (name, owner, visibility, span, leading comment) plus a tagged [`DeclKind`].
//!
//! ## Notes
//! - Spans are byte offsets into the original file text, so CRLF and comments are preserved.
//! - `owner` is a by-name back-reference (e.g. `"CSample"` or `"Outer::Inner"`), never ownership.
//! - Raw type text is whitespace-collapsed but otherwise verbatim; identity comparisons go through
//!   signature normalization in the matcher, not through these strings.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::preprocessor::{Preprocessed, RegionMarker};

/// Source location span (byte offsets, end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return `true` if `other` lies entirely within `self`.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Caller-assigned file identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct FileId(pub u32);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A span qualified by the file it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Provenance {
    pub file: FileId,
    pub file_name: String,
    pub span: Span,
}

/// Role of a file in a header/implementation pairing.
///
/// Reported with the file only. Matching looks at what a declaration is (in-class member, body-less
/// prototype, definition), never at the file it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    Header,
    Implementation,
}

/// Member access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A parsed declaration: common record plus kind-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    pub name: String,
    /// Qualified name of the owning class, if any.
    pub owner: Option<String>,
    pub visibility: Visibility,
    pub span: Span,
    /// Span of the comment block immediately preceding the declaration.
    pub leading_comment: Option<Span>,
    pub kind: DeclKind,
}

/// Kind-specific declaration payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DeclKind {
    Class(ClassDecl),
    Struct(ClassDecl),
    Method(MethodDecl),
    Field(FieldDecl),
    /// A struct/class declared inside a method body.
    LocalType(ClassDecl),
    Typedef(TypedefDecl),
    Enum(EnumDecl),
    Define(DefineDecl),
    StaticFieldDefinition(StaticFieldDef),
    Damaged(DamagedDecl),
}

impl Declaration {
    /// `Owner::name`, or just `name` for unowned declarations.
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}::{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn as_method(&self) -> Option<&MethodDecl> {
        match &self.kind {
            DeclKind::Method(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_field(&self) -> Option<&FieldDecl> {
        match &self.kind {
            DeclKind::Field(f) => Some(f),
            _ => None,
        }
    }

    /// Return the class payload for `Class`, `Struct` and `LocalType` declarations.
    pub fn as_class(&self) -> Option<&ClassDecl> {
        match &self.kind {
            DeclKind::Class(c) | DeclKind::Struct(c) | DeclKind::LocalType(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_damaged(&self) -> bool {
        matches!(self.kind, DeclKind::Damaged(_))
    }

    /// Short lowercase label for the declaration kind.
    pub fn kind_label(&self) -> &'static str {
        match &self.kind {
            DeclKind::Class(_) => "class",
            DeclKind::Struct(_) => "struct",
            DeclKind::Method(_) => "method",
            DeclKind::Field(_) => "field",
            DeclKind::LocalType(_) => "local type",
            DeclKind::Typedef(_) => "typedef",
            DeclKind::Enum(_) => "enum",
            DeclKind::Define(_) => "define",
            DeclKind::StaticFieldDefinition(_) => "static definition",
            DeclKind::Damaged(_) => "damaged",
        }
    }
}

/// Base class specifier (`public virtual Base`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaseSpecifier {
    pub name: String,
    pub access: Visibility,
    pub is_virtual: bool,
}

/// Body of a class, struct or union definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassDecl {
    pub bases: Vec<BaseSpecifier>,
    /// Members in source order (nested class/struct definitions live in `nested`).
    pub members: Vec<Declaration>,
    pub nested: Vec<Declaration>,
    /// Tokens between the class keyword and the name (`__declspec(dllexport)`, export macros).
    pub export_markers: Vec<String>,
    /// Span of the `{ ... }` body.
    pub body: Span,
    pub is_union: bool,
}

impl ClassDecl {
    /// Member methods in source order.
    pub fn methods(&self) -> impl Iterator<Item = (&Declaration, &MethodDecl)> {
        self.members.iter().filter_map(|d| d.as_method().map(|m| (d, m)))
    }

    /// Member fields in source order.
    pub fn fields(&self) -> impl Iterator<Item = (&Declaration, &FieldDecl)> {
        self.members.iter().filter_map(|d| d.as_field().map(|f| (d, f)))
    }

    /// A class is an interface when it has pure virtual methods and no instance fields.
    pub fn is_interface(&self) -> bool {
        let has_pure = self.methods().any(|(_, m)| m.qualifiers.is_pure_virtual);
        let has_instance_field = self.fields().any(|(_, f)| !f.is_static);
        has_pure && !has_instance_field
    }

    /// A class is static-only when every field and every ordinary method is static.
    ///
    /// Constructors and destructors are ignored; a class with no fields and no ordinary methods is
    /// not static-only.
    pub fn is_static_only(&self) -> bool {
        let mut any = false;
        for (_, f) in self.fields() {
            any = true;
            if !f.is_static {
                return false;
            }
        }
        for (_, m) in self.methods() {
            if matches!(m.kind, MethodKind::Constructor | MethodKind::Destructor) {
                continue;
            }
            any = true;
            if !m.qualifiers.is_static {
                return false;
            }
        }
        any
    }

    /// Return `true` if an export marker requests DLL export.
    pub fn is_exported(&self) -> bool {
        self.export_markers.iter().any(|m| m.contains("dllexport"))
    }
}

/// A single function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    /// Raw type text with the parameter name removed.
    pub ty: String,
    pub name: Option<String>,
    /// Span of the default-value expression.
    pub default: Option<Span>,
    pub span: Span,
}

/// Method/function qualifiers and specifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MethodQualifiers {
    pub is_const: bool,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_inline: bool,
    pub is_pure_virtual: bool,
    pub is_explicit: bool,
    pub is_override: bool,
    pub is_final: bool,
    pub is_defaulted: bool,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    Regular,
    Constructor,
    Destructor,
    Operator,
}

/// One entry of a constructor's member-initializer list (`member(value)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberInit {
    pub member: String,
    /// Span of the initializer arguments, without the surrounding parentheses/braces.
    pub value: Span,
}

/// A method or free function, declared and/or defined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDecl {
    /// Raw return type; `None` for constructors, destructors and conversion operators.
    pub return_type: Option<String>,
    pub params: Vec<Param>,
    pub qualifiers: MethodQualifiers,
    pub kind: MethodKind,
    pub initializers: Vec<MemberInit>,
    /// Span of the `{ ... }` body, if this is a definition.
    pub body: Option<Span>,
    pub local_types: Vec<Declaration>,
    /// Position among same-name methods of the same owner within one file, in source order.
    pub overload_index: u32,
    /// Defined at namespace scope with a qualified `Owner::Name`.
    pub out_of_class: bool,
    pub is_template: bool,
}

impl MethodDecl {
    /// Every method with a body is an implementation.
    pub fn is_implementation(&self) -> bool {
        self.body.is_some()
    }

    /// Methods that need no implementation anywhere.
    pub fn is_abstract_or_synthesized(&self) -> bool {
        self.qualifiers.is_pure_virtual || self.qualifiers.is_defaulted || self.qualifiers.is_deleted
    }
}

/// A data member or namespace-scope variable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDecl {
    pub ty: String,
    /// Raw text of each `[...]` dimension (empty string for `[]`).
    pub array_dims: Vec<String>,
    pub initializer: Option<Span>,
    pub bit_width: Option<String>,
    pub is_static: bool,
    pub is_const: bool,
    pub is_mutable: bool,
    /// Comment on the same line after the terminating `;`.
    pub trailing_comment: Option<Span>,
}

/// `typedef T Name;` or `using Name = T;`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypedefDecl {
    pub target: String,
    /// Inline aggregate for `typedef struct [Tag] { ... } Name;`.
    pub aggregate: Option<ClassDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumDecl {
    pub scoped: bool,
    pub underlying: Option<String>,
    pub enumerators: Vec<String>,
}

/// `#define NAME value` or `#define NAME(params) value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefineDecl {
    pub params: Option<Vec<String>>,
    pub value: String,
}

/// Out-of-class static member definition (`agrint CSample::m_iIndex = -1;`).
///
/// The class is the declaration's `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticFieldDef {
    /// `None` when the definition omits the type.
    pub ty: Option<String>,
    pub array_dims: Vec<String>,
    pub initializer: Option<Span>,
}

/// Marker for a span that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DamagedDecl {
    pub reason: String,
}

// ============================================================================
// Per-file result
// ============================================================================

/// Everything parsed from one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDeclarationSet {
    pub file: FileId,
    pub name: String,
    pub role: FileRole,
    #[serde(skip)]
    pub source: Arc<str>,
    pub declarations: Vec<Declaration>,
    /// Comments before the first directive or declaration.
    pub header_comment: Option<Span>,
    pub preprocessor: Preprocessed,
    pub diagnostics: Vec<Diagnostic>,
}

impl FileDeclarationSet {
    /// Return the source text for `span` (empty if the span is out of range).
    pub fn text(&self, span: Span) -> &str {
        self.source.get(span.start..span.end).unwrap_or("")
    }

    pub fn provenance(&self, span: Span) -> Provenance {
        Provenance {
            file: self.file,
            file_name: self.name.clone(),
            span,
        }
    }

    /// Regions covering `span`, outermost first.
    pub fn enclosing_regions(&self, span: Span) -> Vec<&RegionMarker> {
        let mut regions: Vec<&RegionMarker> = self
            .preprocessor
            .regions
            .iter()
            .filter(|r| r.span.contains(span))
            .collect();
        regions.sort_by_key(|r| (r.span.start, std::cmp::Reverse(r.span.end)));
        regions
    }

    /// Methods at file scope and inside classes (recursively), in source order.
    ///
    /// Aggregates defined inline in a `typedef` are visited too. Local types inside method bodies are not visited.
    pub fn methods(&self) -> Vec<(&Declaration, &MethodDecl)> {
        let mut out = Vec::new();
        collect_methods(&self.declarations, &mut out);
        out
    }

    /// Class and struct definitions at file scope and nested, in source order.
    pub fn classes(&self) -> Vec<(&Declaration, &ClassDecl)> {
        let mut out = Vec::new();
        collect_classes(&self.declarations, &mut out);
        out
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

fn collect_methods<'a>(decls: &'a [Declaration], out: &mut Vec<(&'a Declaration, &'a MethodDecl)>) {
    for decl in decls {
        match &decl.kind {
            DeclKind::Method(m) => out.push((decl, m)),
            DeclKind::Class(c)
            | DeclKind::Struct(c)
            | DeclKind::Typedef(TypedefDecl {
                aggregate: Some(c), ..
            }) => {
                collect_methods(&c.members, out);
                collect_methods(&c.nested, out);
            }
            _ => {}
        }
    }
}

fn collect_classes<'a>(decls: &'a [Declaration], out: &mut Vec<(&'a Declaration, &'a ClassDecl)>) {
    for decl in decls {
        if let DeclKind::Class(c) | DeclKind::Struct(c) = &decl.kind {
            out.push((decl, c));
            collect_classes(&c.nested, out);
        }
    }
}
