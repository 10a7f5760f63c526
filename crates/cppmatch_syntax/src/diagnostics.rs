//! Diagnostics collected while lexing, scanning, parsing and matching.
//!
//! Nothing in the syntax frontend is fatal: every stage returns its best-effort result together
//! with a list of [`Diagnostic`]s. Common diagnostics are built through the [`errors`] catalog so
//! wording stays consistent across stages.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::ast::{FileId, Span};

/// A located message with severity, kind, notes and hints.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{severity}: {message}")]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub file: Option<FileId>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, severity: Severity, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            span,
            file: None,
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn error(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self::new(kind, Severity::Error, message, span)
    }

    pub fn warning(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self::new(kind, Severity::Warning, message, span)
    }

    pub fn note(kind: DiagnosticKind, message: impl Into<String>, span: Span) -> Self {
        Self::new(kind, Severity::Note, message, span)
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Attach the file this diagnostic belongs to (kept if already set).
    pub fn in_file(mut self, file: FileId) -> Self {
        self.file.get_or_insert(file);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

/// Which stage or check produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Unterminated literal or comment.
    Lex,
    /// Unbalanced braces/parentheses or an unexpected token.
    Parse,
    /// Mismatched or unclosed region/conditional.
    Region,
    /// Several implementations of one signature with differing bodies.
    SignatureConflict,
    DuplicateDeclaration,
    OrphanDeclaration,
    OrphanImplementation,
    OrphanStaticDefinition,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::Lex => write!(f, "lex"),
            DiagnosticKind::Parse => write!(f, "parse"),
            DiagnosticKind::Region => write!(f, "region"),
            DiagnosticKind::SignatureConflict => write!(f, "signature conflict"),
            DiagnosticKind::DuplicateDeclaration => write!(f, "duplicate declaration"),
            DiagnosticKind::OrphanDeclaration => write!(f, "orphan declaration"),
            DiagnosticKind::OrphanImplementation => write!(f, "orphan implementation"),
            DiagnosticKind::OrphanStaticDefinition => write!(f, "orphan static definition"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Get the 1-based line number, 1-based column and line text for a byte offset.
///
/// The returned line text excludes the line terminator (`\n` or `\r\n`).
pub fn get_line_info(source: &str, offset: usize) -> (usize, usize, &str) {
    let mut offset = offset.min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_num = source[..line_start].matches('\n').count() + 1;
    let line_end = source[line_start..]
        .find('\n')
        .map(|i| line_start + i)
        .unwrap_or(source.len());
    let line_text = source[line_start..line_end].trim_end_matches('\r');
    let col_num = source[line_start..offset].chars().count() + 1;
    (line_num, col_num, line_text)
}

// ============================================================================
// Diagnostic catalog
// ============================================================================

/// Constructors for the common diagnostics of each stage.
pub mod errors {
    use super::*;

    pub fn unterminated_string(span: Span) -> Diagnostic {
        Diagnostic::warning(DiagnosticKind::Lex, "unterminated string literal", span)
            .with_note("the literal was closed at the end of the line")
    }

    pub fn unterminated_char(span: Span) -> Diagnostic {
        Diagnostic::warning(DiagnosticKind::Lex, "unterminated character literal", span)
            .with_note("the literal was closed at the end of the line")
    }

    pub fn unterminated_raw_string(span: Span) -> Diagnostic {
        Diagnostic::warning(DiagnosticKind::Lex, "unterminated raw string literal", span)
            .with_note("the literal was closed at the end of the file")
    }

    pub fn unterminated_block_comment(span: Span) -> Diagnostic {
        Diagnostic::warning(DiagnosticKind::Lex, "unterminated block comment", span)
            .with_note("the comment was closed at the end of the file")
    }

    pub fn region_style_mismatch(open: &str, close: &str, span: Span) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::Region,
            format!("region opened with `{open}` is closed with `{close}`"),
            span,
        )
        .with_hint(format!("use the matching end marker for `{open}`"))
    }

    pub fn orphan_region_end(span: Span) -> Diagnostic {
        Diagnostic::warning(DiagnosticKind::Region, "region end marker without an open region", span)
    }

    pub fn region_end_in_nested_scope(label: &str, span: Span) -> Diagnostic {
        let label = if label.is_empty() { "<unnamed>" } else { label };
        Diagnostic::warning(
            DiagnosticKind::Region,
            format!("end marker for region `{label}` is inside a nested scope"),
            span,
        )
        .with_hint("close a region in the same brace scope that opened it")
    }

    pub fn unclosed_region(label: &str, span: Span) -> Diagnostic {
        let label = if label.is_empty() { "<unnamed>" } else { label };
        Diagnostic::warning(DiagnosticKind::Region, format!("region `{label}` is never closed"), span)
            .with_note("the region extends to the end of its enclosing scope")
    }

    pub fn unmatched_endif(span: Span) -> Diagnostic {
        Diagnostic::warning(DiagnosticKind::Region, "`#endif` without a matching `#if`", span)
    }

    pub fn unclosed_conditional(span: Span) -> Diagnostic {
        Diagnostic::warning(DiagnosticKind::Region, "conditional block is never closed", span)
            .with_hint("add the missing `#endif`")
    }

    pub fn unexpected_token(found: &str, context: &str, span: Span) -> Diagnostic {
        Diagnostic::error(DiagnosticKind::Parse, format!("unexpected `{found}` {context}"), span)
    }

    pub fn unbalanced_parens(span: Span) -> Diagnostic {
        Diagnostic::error(DiagnosticKind::Parse, "unbalanced parentheses in declaration", span)
            .with_hint("check for a missing `)`")
    }

    pub fn unterminated_body(what: &str, span: Span) -> Diagnostic {
        Diagnostic::error(DiagnosticKind::Parse, format!("unterminated {what} at end of file"), span)
            .with_hint("check for a missing `}`")
    }

    pub fn missing_semicolon_after_type(name: &str, span: Span) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::Parse,
            format!("expected `;` after definition of `{name}`"),
            span,
        )
    }

    pub fn stray_closing_brace(span: Span) -> Diagnostic {
        Diagnostic::error(DiagnosticKind::Parse, "unmatched `}` at file scope", span)
    }

    pub fn missing_static_type(owner: &str, name: &str, span: Span) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::Parse,
            format!("static member definition `{owner}::{name}` has no type"),
            span,
        )
        .with_hint("out-of-class definitions repeat the member type, e.g. `int Owner::name = 0;`")
    }

    pub fn mismatched_member_qualifier(qualifier: &str, class: &str, span: Span) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::Parse,
            format!("member qualified with `{qualifier}` inside class `{class}`"),
            span,
        )
    }

    pub fn duplicate_declaration(signature: &str, span: Span) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::DuplicateDeclaration,
            format!("`{signature}` is declared more than once"),
            span,
        )
        .with_note("the first declaration is kept")
    }

    pub fn orphan_declaration(signature: &str, span: Span) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::OrphanDeclaration,
            format!("`{signature}` is declared but never implemented"),
            span,
        )
    }

    pub fn orphan_implementation(signature: &str, span: Span) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::OrphanImplementation,
            format!("`{signature}` is implemented but never declared"),
            span,
        )
        .with_hint("check the parameter types against the declaration")
    }

    pub fn local_function(signature: &str, span: Span) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::OrphanImplementation,
            format!("free function `{signature}` has no prototype"),
            span,
        )
    }

    pub fn conflicting_implementations(signature: &str, count: usize, span: Span) -> Diagnostic {
        Diagnostic::error(
            DiagnosticKind::SignatureConflict,
            format!("`{signature}` has {count} implementations with differing bodies"),
            span,
        )
    }

    pub fn identical_implementations(signature: &str, count: usize, span: Span) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::SignatureConflict,
            format!("`{signature}` is implemented {count} times with identical bodies"),
            span,
        )
    }

    pub fn orphan_static_definition(owner: &str, name: &str, span: Span) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticKind::OrphanStaticDefinition,
            format!("`{owner}::{name}` is defined but no static field `{name}` is declared in `{owner}`"),
            span,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_info_handles_crlf() {
        let src = "a\r\nbc\r\nd";
        assert_eq!(get_line_info(src, 0), (1, 1, "a"));
        assert_eq!(get_line_info(src, 4), (2, 2, "bc"));
        assert_eq!(get_line_info(src, 7), (3, 1, "d"));
        assert_eq!(get_line_info(src, 100), (3, 2, "d"));
    }

    #[test]
    fn builders_accumulate() {
        let d = errors::unterminated_string(Span::new(1, 4))
            .with_hint("close it")
            .in_file(FileId(3))
            .in_file(FileId(4));
        assert_eq!(d.kind, DiagnosticKind::Lex);
        assert!(d.is_warning());
        assert_eq!(d.file, Some(FileId(3)));
        assert_eq!(d.hints, vec!["close it".to_string()]);
        assert_eq!(d.to_string(), "warning: unterminated string literal");
    }
}
