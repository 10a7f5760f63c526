//! Declaration-level syntax frontend for C++: lexer, preprocessor-region tracker, parser and
//! declaration model.
//!
//! This crate is dependency-light and performs no IO. Every entry point is total: malformed input
//! produces a best-effort result plus [`diagnostics::Diagnostic`]s, never an `Err`.
//!
//! ## Notes
//! - This crate is intentionally “declaration-only”: function bodies are opaque brace groups
//!   (apart from local struct/class definitions), and macros are never expanded.
//! - Vocabulary identity (keywords/punctuation) comes from `cppmatch_core::lang` registries.
//!
//! ## Examples
//! ```rust
//! use cppmatch_syntax::ast::{FileId, FileRole};
//! use cppmatch_syntax::parse_file;
//!
//! let set = parse_file(FileId(0), "a.h", "class A { public: void f(int x = 1); };", FileRole::Header);
//! assert_eq!(set.declarations.len(), 1);
//! assert!(set.diagnostics.is_empty());
//! ```
//!
//! ## See also
//! - `cppmatch_core::lang` for registry-backed language vocabulary.

pub mod ast;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod preprocessor;
pub mod token_helpers;

use std::sync::Arc;

use ast::{FileDeclarationSet, FileId, FileRole};

/// Lex, scan and parse one file into its [`FileDeclarationSet`].
///
/// Diagnostics from every stage are collected on the returned set and stamped with `file`.
#[tracing::instrument(skip_all, fields(file = %name, source_len = tracing::field::Empty))]
pub fn parse_file(file: FileId, name: &str, text: impl Into<Arc<str>>, role: FileRole) -> FileDeclarationSet {
    let source: Arc<str> = text.into();
    tracing::Span::current().record("source_len", source.len());

    let lexed = lexer::lex(&source);
    let mut preprocessed = preprocessor::scan(&lexed.tokens);
    let parsed = parser::parse(&lexed.tokens);

    let mut diagnostics = lexed.diagnostics;
    diagnostics.append(&mut preprocessed.diagnostics);
    diagnostics.extend(parsed.diagnostics);
    diagnostics.sort_by_key(|d| d.span.start);
    let diagnostics = diagnostics.into_iter().map(|d| d.in_file(file)).collect();

    let set = FileDeclarationSet {
        file,
        name: name.to_string(),
        role,
        source,
        declarations: parsed.declarations,
        header_comment: parsed.header_comment,
        preprocessor: preprocessed,
        diagnostics,
    };
    tracing::debug!(
        declarations = set.declarations.len(),
        diagnostics = set.diagnostics.len(),
        "parsed file"
    );
    set
}
