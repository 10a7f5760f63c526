//! Cross-file matcher for the cppmatch toolkit.
//!
//! Merges the declarations of several parsed files into one [`MergedModel`] keyed by
//! [`SignatureKey`], and reports what does not line up in a [`MatchReport`].
//!
//! ## Notes
//!
//! - **Two passes**: the first pass collects every declaration (methods declared in class bodies
//!   and free-function prototypes) from all files; the second attaches implementations (methods
//!   with bodies). File order therefore does not matter for matching, only for provenance order.
//! - **Exact identity only**: entries merge on normalized-signature equality. There is no fuzzy or
//!   heuristic matching; a parameter type mismatch yields an orphan on each side.
//! - **Never overwrites**: duplicate declarations and duplicate implementations are kept and
//!   reported with every provenance.
//!
//! ## Examples
//!
//! ```rust
//! use cppmatch::config::MatchConfig;
//! use cppmatch::matcher::merge;
//! use cppmatch_syntax::ast::{FileId, FileRole};
//! use cppmatch_syntax::parse_file;
//!
//! let files = vec![
//!     parse_file(FileId(0), "a.h", "class A { public: int Get(int x = 1) const; };", FileRole::Header),
//!     parse_file(FileId(1), "a.cpp", "int A::Get(int value) const { return value; }", FileRole::Implementation),
//! ];
//! let (model, report) = merge(&files, &MatchConfig::default());
//! assert_eq!(model.entries.len(), 1);
//! assert!(report.is_clean());
//! ```

mod model;
mod report;


pub use model::{ClassSummary, Finding, MergedEntry, MergedModel, MergedParam, MethodRef, StaticFieldLink};
pub use report::MatchReport;

use std::collections::HashMap;

use cppmatch_syntax::ast::{DeclKind, Declaration, FileDeclarationSet, FileId, MethodDecl, Provenance};
use cppmatch_syntax::diagnostics::{Diagnostic, Severity, errors};

use crate::config::MatchConfig;
use crate::signature::{self, SignatureKey};

/// Merge parsed files into a model and a report.
///
/// Deterministic: the same files in the same order always give the same result. Entries are
/// ordered by key and class summaries by name.
#[tracing::instrument(skip_all, fields(files = sets.len()))]
pub fn merge<'a>(sets: &'a [FileDeclarationSet], config: &MatchConfig) -> (MergedModel<'a>, MatchReport) {
    let mut matcher = Matcher::new(config);
    for set in sets {
        matcher.collect_declarations(set);
    }
    for set in sets {
        matcher.attach_implementations(set);
    }
    let (model, report) = matcher.finish(sets);
    tracing::debug!(
        entries = model.entries.len(),
        classes = model.classes.len(),
        diagnostics = report.diagnostics.len(),
        "merged files"
    );
    (model, report)
}

/// Merge state: an index from key to entry plus accumulated findings.
struct Matcher<'a, 'c> {
    config: &'c MatchConfig,
    index: HashMap<SignatureKey, usize>,
    entries: Vec<MergedEntry<'a>>,
    report: MatchReport,
}

impl<'a, 'c> Matcher<'a, 'c> {
    fn new(config: &'c MatchConfig) -> Self {
        Self {
            config,
            index: HashMap::new(),
            entries: Vec::new(),
            report: MatchReport::default(),
        }
    }

    // ========================================================================
    // Pass 1: declarations
    // ========================================================================

    fn collect_declarations(&mut self, set: &'a FileDeclarationSet) {
        for (decl, method) in set.methods() {
            if !is_declaration(decl, method) {
                continue;
            }
            let key = signature::normalize(decl, method);
            let entry = self.entry(key);
            let method_ref = MethodRef::new(set, decl, method);
            match entry.declaration.as_ref().map(|first| first.provenance.clone()) {
                None => entry.declaration = Some(method_ref),
                Some(first) => {
                    let key = entry.key.clone();
                    let provenance = vec![first, method_ref.provenance.clone()];
                    entry.redeclarations.push(method_ref);
                    self.report.diagnostics.push(
                        errors::duplicate_declaration(&key.to_string(), decl.span)
                            .in_file(set.file)
                            .with_note(format!("first declared in {}", provenance[0].file_name)),
                    );
                    self.report.duplicate_declarations.push(Finding::for_key(&key, provenance));
                }
            }
        }
    }

    // ========================================================================
    // Pass 2: implementations
    // ========================================================================

    fn attach_implementations(&mut self, set: &'a FileDeclarationSet) {
        for (decl, method) in set.methods() {
            if !is_implementation(method) {
                continue;
            }
            let key = signature::normalize(decl, method);
            let entry = self.entry(key);
            entry.implementations.push(MethodRef::new(set, decl, method));
        }
    }

    fn entry(&mut self, key: SignatureKey) -> &mut MergedEntry<'a> {
        let next = self.entries.len();
        let at = *self.index.entry(key.clone()).or_insert(next);
        if at == next {
            self.entries.push(MergedEntry {
                key,
                declaration: None,
                implementations: Vec::new(),
                redeclarations: Vec::new(),
            });
        }
        &mut self.entries[at]
    }

    // ========================================================================
    // Findings
    // ========================================================================

    fn finish(mut self, sets: &'a [FileDeclarationSet]) -> (MergedModel<'a>, MatchReport) {
        let mut entries = std::mem::take(&mut self.entries);
        entries.sort_by(|a, b| a.key.cmp(&b.key));

        for entry in &entries {
            self.check_entry(entry);
        }

        let classes = summarize_classes(sets, &entries);
        let static_fields = self.link_static_fields(sets, &classes);

        let model = MergedModel {
            entries,
            classes,
            static_fields,
        };
        (model, self.report)
    }

    fn check_entry(&mut self, entry: &MergedEntry<'a>) {
        let key = &entry.key;
        let name = key.to_string();

        match (&entry.declaration, entry.implementations.as_slice()) {
            (Some(decl), []) => {
                let exempt = decl.method.is_abstract_or_synthesized() || decl.method.qualifiers.is_inline;
                let free_prototype = key.is_free_function() && !self.config.report_free_function_orphans;
                if !exempt && !free_prototype {
                    let severity = if self.config.orphan_declarations_are_warnings {
                        Severity::Warning
                    } else {
                        Severity::Note
                    };
                    self.report.diagnostics.push(
                        errors::orphan_declaration(&name, decl.declaration.span)
                            .with_severity(severity)
                            .in_file(decl.provenance.file),
                    );
                    self.report
                        .orphan_declarations
                        .push(Finding::for_key(key, vec![decl.provenance.clone()]));
                }
            }
            (None, imps) if !imps.is_empty() => {
                let provenance: Vec<Provenance> = imps.iter().map(|r| r.provenance.clone()).collect();
                let first = &imps[0];
                if key.is_free_function() {
                    self.report.local_functions.push(Finding::for_key(key, provenance.clone()));
                    if self.config.report_free_function_orphans {
                        self.report.diagnostics.push(
                            errors::local_function(&name, first.declaration.span).in_file(first.provenance.file),
                        );
                        self.report.orphan_implementations.push(Finding::for_key(key, provenance));
                    }
                } else {
                    self.report.diagnostics.push(
                        errors::orphan_implementation(&name, first.declaration.span).in_file(first.provenance.file),
                    );
                    self.report.orphan_implementations.push(Finding::for_key(key, provenance));
                }
            }
            _ => {}
        }

        if entry.implementations.len() >= 2 {
            self.check_duplicates(entry);
        }
    }

    fn check_duplicates(&mut self, entry: &MergedEntry<'a>) {
        let imps = &entry.implementations;
        let name = entry.key.to_string();
        let first_body = imps[0].body_text();
        let identical = imps[1..]
            .iter()
            .all(|r| self.config.body_comparison.same_body(first_body, r.body_text()));
        let provenance: Vec<Provenance> = imps.iter().map(|r| r.provenance.clone()).collect();
        let files: Vec<&str> = provenance.iter().map(|p| p.file_name.as_str()).collect();
        let note = format!("implemented in {}", files.join(", "));

        if identical {
            if !self.config.report_exact_duplicates {
                return;
            }
            self.report.diagnostics.push(
                errors::identical_implementations(&name, imps.len(), imps[1].declaration.span)
                    .in_file(imps[1].provenance.file)
                    .with_note(note),
            );
            self.report.exact_duplicates.push(Finding::for_key(&entry.key, provenance));
        } else {
            self.report.diagnostics.push(
                errors::conflicting_implementations(&name, imps.len(), imps[0].declaration.span)
                    .in_file(imps[0].provenance.file)
                    .with_note(note),
            );
            self.report.conflicting_duplicates.push(Finding::for_key(&entry.key, provenance));
        }
    }

    /// Link every out-of-class static definition to the static field of its class.
    fn link_static_fields(
        &mut self,
        sets: &'a [FileDeclarationSet],
        classes: &[ClassSummary<'a>],
    ) -> Vec<StaticFieldLink<'a>> {
        let mut links = Vec::new();
        for set in sets {
            for decl in &set.declarations {
                let DeclKind::StaticFieldDefinition(_) = &decl.kind else {
                    continue;
                };
                let owner = decl.owner.clone().unwrap_or_default();
                let class = classes
                    .binary_search_by(|c| c.name.as_str().cmp(owner.as_str()))
                    .ok()
                    .map(|i| &classes[i]);
                let field = class.and_then(|summary| {
                    summary
                        .class
                        .fields()
                        .find(|(d, f)| f.is_static && d.name == decl.name)
                        .map(|(d, _)| Provenance {
                            span: d.span,
                            ..summary.provenance.clone()
                        })
                });
                let definition = set.provenance(decl.span);
                if field.is_none() {
                    self.report
                        .diagnostics
                        .push(errors::orphan_static_definition(&owner, &decl.name, decl.span).in_file(set.file));
                    self.report.orphan_static_definitions.push(Finding {
                        subject: decl.qualified_name(),
                        signature: None,
                        provenance: vec![definition.clone()],
                    });
                }
                links.push(StaticFieldLink {
                    owner,
                    name: decl.name.clone(),
                    definition,
                    field,
                    declaration: decl,
                });
            }
        }
        links
    }
}

/// Methods declared in a class body and free-function prototypes.
fn is_declaration(decl: &Declaration, method: &MethodDecl) -> bool {
    let in_class = decl.owner.is_some() && !method.out_of_class;
    let prototype = method.body.is_none() && !method.out_of_class;
    in_class || prototype
}

/// Methods with a body, plus out-of-class `= default` definitions.
fn is_implementation(method: &MethodDecl) -> bool {
    method.body.is_some() || (method.out_of_class && method.qualifiers.is_defaulted)
}

/// Summaries of every class and struct defined in any file, ordered by qualified name.
///
/// The first definition in input order wins. Partial classes merge through their methods, so a
/// later definition of the same name contributes nothing here.
fn summarize_classes<'a>(sets: &'a [FileDeclarationSet], entries: &[MergedEntry<'a>]) -> Vec<ClassSummary<'a>> {
    let mut by_name: HashMap<String, ClassSummary<'a>> = HashMap::new();
    for set in sets {
        for (decl, class) in set.classes() {
            let name = decl.qualified_name();
            if by_name.contains_key(&name) {
                continue;
            }
            by_name.insert(
                name.clone(),
                ClassSummary {
                    name,
                    provenance: set.provenance(decl.span),
                    bases: class.bases.iter().map(|b| b.name.clone()).collect(),
                    is_interface: class.is_interface(),
                    is_static_only: class.is_static_only(),
                    is_exported: class.is_exported(),
                    declared_methods: class.methods().count(),
                    implemented_methods: 0,
                    fields: class.fields().count(),
                    implementation_files: Vec::new(),
                    class,
                },
            );
        }
    }

    let mut files: HashMap<String, Vec<(FileId, String)>> = HashMap::new();
    for entry in entries {
        let Some(owner) = entry.key.owner.as_ref() else {
            continue;
        };
        let Some(summary) = by_name.get_mut(owner) else {
            continue;
        };
        if entry.declaration.is_some() && entry.is_implemented() {
            summary.implemented_methods += 1;
        }
        let seen = files.entry(owner.clone()).or_default();
        seen.extend(entry.implementations.iter().map(|r| (r.provenance.file, r.provenance.file_name.clone())));
    }
    for (owner, mut seen) in files {
        seen.sort();
        seen.dedup();
        if let Some(summary) = by_name.get_mut(&owner) {
            summary.implementation_files = seen.into_iter().map(|(_, name)| name).collect();
        }
    }

    let mut classes: Vec<ClassSummary<'a>> = by_name.into_values().collect();
    classes.sort_by(|a, b| a.name.cmp(&b.name));
    classes
}

/// Diagnostic severities present in a report, for the CLI exit code.
pub fn worst_severity(diagnostics: &[Diagnostic]) -> Option<Severity> {
    diagnostics.iter().map(|d| d.severity).max()
}
