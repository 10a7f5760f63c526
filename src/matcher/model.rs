//! Merged declaration model.
//!
//! Everything here borrows from the [`FileDeclarationSet`]s passed to [`merge`](super::merge): a
//! [`MergedModel`] never outlives the files of its run.

use cppmatch_syntax::ast::{ClassDecl, Declaration, FileDeclarationSet, MethodDecl, Provenance, Span};
use serde::Serialize;

use crate::signature::SignatureKey;

/// A method declaration or implementation together with the file it came from.
#[derive(Debug, Clone, Serialize)]
pub struct MethodRef<'a> {
    pub provenance: Provenance,
    pub declaration: &'a Declaration,
    #[serde(skip)]
    pub method: &'a MethodDecl,
    #[serde(skip)]
    pub file: &'a FileDeclarationSet,
}

impl<'a> MethodRef<'a> {
    pub(crate) fn new(file: &'a FileDeclarationSet, declaration: &'a Declaration, method: &'a MethodDecl) -> Self {
        Self {
            provenance: file.provenance(declaration.span),
            declaration,
            method,
            file,
        }
    }

    /// Body text, or the empty string for body-less definitions (`= default`).
    pub fn body_text(&self) -> &'a str {
        match self.method.body {
            Some(span) => self.file.text(span),
            None => "",
        }
    }

    /// Return `true` if both refer to the very same declaration.
    pub fn same_declaration(&self, other: &MethodRef<'_>) -> bool {
        std::ptr::eq(self.declaration, other.declaration)
    }
}

/// One signature with its declaring entry and every implementation.
#[derive(Debug, Clone, Serialize)]
pub struct MergedEntry<'a> {
    pub key: SignatureKey,
    /// First declaration seen; `None` for orphan implementations and local functions.
    pub declaration: Option<MethodRef<'a>>,
    /// Implementations in input order. An inline method appears here and in `declaration`.
    pub implementations: Vec<MethodRef<'a>>,
    /// Further declarations of the same key (the first one wins).
    pub redeclarations: Vec<MethodRef<'a>>,
}

/// A parameter with the implementation's name and the declaration's default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedParam {
    pub ty: String,
    pub name: Option<String>,
    /// Default-value text from the declaration.
    pub default: Option<String>,
}

impl<'a> MergedEntry<'a> {
    pub fn is_implemented(&self) -> bool {
        !self.implementations.is_empty()
    }

    /// Return `true` if the declaration is also the (only) implementation.
    pub fn is_inline(&self) -> bool {
        match (&self.declaration, self.implementations.as_slice()) {
            (Some(decl), [only]) => decl.same_declaration(only),
            _ => false,
        }
    }

    /// Parameters combining the implementation's names with the declaration's defaults.
    ///
    /// Names fall back to the declaration when the implementation leaves a parameter unnamed;
    /// types come from the declaration when there is one.
    pub fn merged_parameters(&self) -> Vec<MergedParam> {
        let decl = self.declaration.as_ref();
        let imp = self.implementations.first();
        let Some(primary) = decl.or(imp) else {
            return Vec::new();
        };

        primary
            .method
            .params
            .iter()
            .enumerate()
            .map(|(i, param)| {
                let imp_param = imp.and_then(|r| r.method.params.get(i));
                let decl_param = decl.and_then(|r| r.method.params.get(i).map(|p| (r, p)));
                MergedParam {
                    ty: param.ty.clone(),
                    name: imp_param
                        .and_then(|p| p.name.clone())
                        .or_else(|| decl_param.and_then(|(_, p)| p.name.clone())),
                    default: decl_param
                        .and_then(|(r, p)| p.default.map(|span| r.file.text(span).trim().to_string())),
                }
            })
            .collect()
    }
}

/// Summary of one class or struct across all files.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSummary<'a> {
    /// Qualified class name (`Outer::Inner`).
    pub name: String,
    /// Where the class body is defined (first definition in input order).
    pub provenance: Provenance,
    pub bases: Vec<String>,
    pub is_interface: bool,
    pub is_static_only: bool,
    pub is_exported: bool,
    pub declared_methods: usize,
    pub implemented_methods: usize,
    pub fields: usize,
    /// Files holding implementations of this class's methods, in input order.
    pub implementation_files: Vec<String>,
    #[serde(skip)]
    pub class: &'a ClassDecl,
}

/// An out-of-class static member definition and the static field it defines.
#[derive(Debug, Clone, Serialize)]
pub struct StaticFieldLink<'a> {
    pub owner: String,
    pub name: String,
    pub definition: Provenance,
    /// Declaration of the static field in its class, if found.
    pub field: Option<Provenance>,
    #[serde(skip)]
    pub declaration: &'a Declaration,
}

/// Result of merging every file of a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergedModel<'a> {
    /// Entries ordered by key.
    pub entries: Vec<MergedEntry<'a>>,
    /// Class summaries ordered by qualified name.
    pub classes: Vec<ClassSummary<'a>>,
    /// Static definitions in input order.
    pub static_fields: Vec<StaticFieldLink<'a>>,
}

impl<'a> MergedModel<'a> {
    pub fn get(&self, key: &SignatureKey) -> Option<&MergedEntry<'a>> {
        self.entries
            .binary_search_by(|e| e.key.cmp(key))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Entries whose key displays as `qualified` (`Owner::Name`), across all overloads.
    pub fn by_name<'m>(&'m self, qualified: &str) -> impl Iterator<Item = &'m MergedEntry<'a>> {
        let qualified = qualified.to_string();
        self.entries.iter().filter(move |e| e.key.qualified_name() == qualified)
    }

    /// Entries owned by `class`, in key order.
    pub fn methods_of<'m>(&'m self, class: &str) -> impl Iterator<Item = &'m MergedEntry<'a>> {
        let class = class.to_string();
        self.entries.iter().filter(move |e| e.key.owner.as_deref() == Some(class.as_str()))
    }

    pub fn class(&self, name: &str) -> Option<&ClassSummary<'a>> {
        self.classes
            .binary_search_by(|c| c.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.classes[i])
    }
}

/// A finding of the match report: what it is about and every place involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// `Owner::Name(T1,T2) const` for methods, `Owner::name` for static definitions.
    pub subject: String,
    pub signature: Option<SignatureKey>,
    pub provenance: Vec<Provenance>,
}

impl Finding {
    pub(crate) fn for_key(key: &SignatureKey, provenance: Vec<Provenance>) -> Self {
        Self {
            subject: key.to_string(),
            signature: Some(key.clone()),
            provenance,
        }
    }

    /// Span of the first provenance (for diagnostics).
    pub fn primary_span(&self) -> Span {
        self.provenance.first().map(|p| p.span).unwrap_or_default()
    }
}
