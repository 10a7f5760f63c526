//! Matching configuration.
//!
//! [`MatchConfig`] is a plain value with builder-style setters. The CLI maps its flags onto the
//! `with_*` methods; library callers usually start from [`MatchConfig::default`].

use std::path::Path;

use cppmatch_syntax::ast::FileRole;
use serde::Serialize;

/// How implementation bodies are compared when one signature has several implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyComparison {
    /// Byte-identical body text.
    #[default]
    Exact,
    /// Body text with all whitespace removed.
    IgnoreWhitespace,
}

impl BodyComparison {
    /// Return `true` if `a` and `b` count as the same body under this comparison.
    pub fn same_body(self, a: &str, b: &str) -> bool {
        match self {
            BodyComparison::Exact => a == b,
            BodyComparison::IgnoreWhitespace => {
                let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
                strip(a) == strip(b)
            }
        }
    }
}

const DEFAULT_HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp", "hxx", "inl"];
const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx"];

/// Options for the cross-file matcher and the file pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchConfig {
    pub header_extensions: Vec<String>,
    pub source_extensions: Vec<String>,
    pub body_comparison: BodyComparison,
    /// Report free-function definitions without a prototype as orphan implementations.
    pub report_free_function_orphans: bool,
    pub report_exact_duplicates: bool,
    /// When `false`, orphan declarations are reported as notes instead of warnings.
    pub orphan_declarations_are_warnings: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            header_extensions: DEFAULT_HEADER_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            source_extensions: DEFAULT_SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            body_comparison: BodyComparison::Exact,
            report_free_function_orphans: false,
            report_exact_duplicates: true,
            orphan_declarations_are_warnings: true,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_body_comparison(mut self, comparison: BodyComparison) -> Self {
        self.body_comparison = comparison;
        self
    }

    pub fn with_free_function_orphans(mut self, report: bool) -> Self {
        self.report_free_function_orphans = report;
        self
    }

    pub fn with_exact_duplicates(mut self, report: bool) -> Self {
        self.report_exact_duplicates = report;
        self
    }

    pub fn with_orphan_declarations_as_warnings(mut self, warn: bool) -> Self {
        self.orphan_declarations_are_warnings = warn;
        self
    }

    /// Role of a file, decided by its extension (case-insensitive).
    ///
    /// Unknown or missing extensions are treated as implementation files.
    pub fn role_for(&self, path: impl AsRef<Path>) -> FileRole {
        let Some(ext) = path.as_ref().extension().and_then(|e| e.to_str()) else {
            return FileRole::Implementation;
        };
        if self.header_extensions.iter().any(|h| h.eq_ignore_ascii_case(ext)) {
            FileRole::Header
        } else {
            FileRole::Implementation
        }
    }

    /// Return `true` if the extension is configured as either a header or a source extension.
    pub fn is_known_extension(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.header_extensions
                    .iter()
                    .chain(self.source_extensions.iter())
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.body_comparison, BodyComparison::Exact);
        assert!(!config.report_free_function_orphans);
        assert!(config.report_exact_duplicates);
        assert!(config.orphan_declarations_are_warnings);
        assert_eq!(config, MatchConfig::new());
    }

    #[test]
    fn test_role_for_extensions() {
        let config = MatchConfig::default();
        assert_eq!(config.role_for("CSample.h"), FileRole::Header);
        assert_eq!(config.role_for("dir/CSample.HPP"), FileRole::Header);
        assert_eq!(config.role_for("CSample.cpp"), FileRole::Implementation);
        assert_eq!(config.role_for("Makefile"), FileRole::Implementation);
        assert_eq!(config.role_for("notes.txt"), FileRole::Implementation);
    }

    #[test]
    fn test_builder_setters() {
        let config = MatchConfig::new()
            .with_header_extensions(["hpp"])
            .with_source_extensions(vec!["cpp".to_string()])
            .with_body_comparison(BodyComparison::IgnoreWhitespace)
            .with_free_function_orphans(true)
            .with_exact_duplicates(false)
            .with_orphan_declarations_as_warnings(false);
        assert_eq!(config.role_for("a.h"), FileRole::Implementation);
        assert_eq!(config.role_for("a.hpp"), FileRole::Header);
        assert!(config.is_known_extension("a.cpp"));
        assert!(!config.is_known_extension("a.cc"));
        assert!(config.report_free_function_orphans);
        assert!(!config.report_exact_duplicates);
        assert!(!config.orphan_declarations_are_warnings);
    }

    #[test]
    fn test_body_comparison() {
        let a = "{\r\n  return 1;\r\n}";
        let b = "{ return 1; }";
        assert!(!BodyComparison::Exact.same_body(a, b));
        assert!(BodyComparison::IgnoreWhitespace.same_body(a, b));
        assert!(!BodyComparison::IgnoreWhitespace.same_body(a, "{ return 2; }"));
    }
}
