//! Match report: orphans, duplicates and conflicts found while merging.

use cppmatch_syntax::diagnostics::{Diagnostic, Severity};
use serde::Serialize;

use super::model::Finding;

/// Everything the merge found worth telling the caller.
///
/// Every finding keeps the provenance of all instances involved. `diagnostics` carries the same
/// findings as file-stamped [`Diagnostic`]s, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    /// Declared, never implemented (inline, pure virtual, defaulted and deleted methods excluded).
    pub orphan_declarations: Vec<Finding>,
    /// Implemented with no matching declaration.
    pub orphan_implementations: Vec<Finding>,
    /// Free-function definitions without a prototype.
    pub local_functions: Vec<Finding>,
    pub duplicate_declarations: Vec<Finding>,
    /// Several implementations with the same body.
    pub exact_duplicates: Vec<Finding>,
    /// Several implementations with differing bodies.
    pub conflicting_duplicates: Vec<Finding>,
    pub orphan_static_definitions: Vec<Finding>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MatchReport {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicting_duplicates.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// No diagnostics at warning level or above.
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0 && self.warning_count() == 0
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }
}
