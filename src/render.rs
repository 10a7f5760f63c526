//! Human-readable and JSON output for parsed files and match results.
//!
//! Diagnostics are rendered through `miette` with the offending source snippet; outlines and
//! match summaries are plain text; JSON goes through `serde_json`.

use std::fmt::Write as _;

use cppmatch_syntax::ast::{DeclKind, Declaration, FileDeclarationSet, Provenance};
use cppmatch_syntax::diagnostics::{Diagnostic, Severity, get_line_info};
use miette::{GraphicalReportHandler, GraphicalTheme, LabeledSpan, MietteDiagnostic, NamedSource, Report};
use serde::Serialize;

use crate::matcher::{Finding, MatchReport, MergedModel};
use crate::signature;

// ============================================================================
// Diagnostics
// ============================================================================

/// Build a `miette` report for `diag` with `source` attached under `file_name`.
///
/// Notes and hints become the report's help text.
pub fn to_report(diag: &Diagnostic, file_name: &str, source: &str) -> Report {
    let severity = match diag.severity {
        Severity::Error => miette::Severity::Error,
        Severity::Warning => miette::Severity::Warning,
        Severity::Note => miette::Severity::Advice,
    };
    let mut miette_diag = MietteDiagnostic::new(diag.message.clone())
        .with_severity(severity)
        .with_code(format!("cppmatch::{}", diag.kind).replace(' ', "_"))
        .with_label(LabeledSpan::at(diag.span.start..diag.span.end, diag.kind.to_string()));

    let help: Vec<String> = diag
        .notes
        .iter()
        .map(|n| format!("note: {n}"))
        .chain(diag.hints.iter().cloned())
        .collect();
    if !help.is_empty() {
        miette_diag = miette_diag.with_help(help.join("\n"));
    }

    Report::new(miette_diag).with_source_code(NamedSource::new(file_name, source.to_string()))
}

/// Render `diag` as a colorless graphical report.
pub fn render_diagnostic(diag: &Diagnostic, file_name: &str, source: &str) -> String {
    let report = to_report(diag, file_name, source);
    let mut out = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor()).with_width(100);
    if handler.render_report(&mut out, &*report).is_err() {
        return render_plain(diag, file_name, source);
    }
    out
}

/// One-line `file:line:col: severity: message` rendering.
pub fn render_plain(diag: &Diagnostic, file_name: &str, source: &str) -> String {
    let (line, col, _) = get_line_info(source, diag.span.start);
    format!("{file_name}:{line}:{col}: {}: {}", diag.severity, diag.message)
}

/// Find the file a diagnostic belongs to among `sets`.
pub fn owning_set<'a>(diag: &Diagnostic, sets: &'a [FileDeclarationSet]) -> Option<&'a FileDeclarationSet> {
    let file = diag.file?;
    sets.iter().find(|s| s.file == file)
}

// ============================================================================
// Outline
// ============================================================================

/// Indented outline of the declarations of one file.
pub fn outline(set: &FileDeclarationSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({} declarations)", set.name, set.declarations.len());
    for decl in &set.declarations {
        outline_decl(&mut out, set, decl, 1);
    }
    for region in &set.preprocessor.regions {
        let (line, _, _) = get_line_info(&set.source, region.start.start);
        let bounded = if region.unbounded { " (unbounded)" } else { "" };
        let _ = writeln!(out, "  region `{}` at line {line}{bounded}", region.label);
    }
    out
}

fn outline_decl(out: &mut String, set: &FileDeclarationSet, decl: &Declaration, depth: usize) {
    let pad = "  ".repeat(depth);
    match &decl.kind {
        DeclKind::Class(class) | DeclKind::Struct(class) | DeclKind::LocalType(class) => {
            let _ = write!(out, "{pad}{} {}", decl.kind_label(), decl.qualified_name());
            if !class.bases.is_empty() {
                let bases: Vec<String> = class.bases.iter().map(|b| format!("{} {}", b.access, b.name)).collect();
                let _ = write!(out, " : {}", bases.join(", "));
            }
            let _ = writeln!(out);
            for member in class.members.iter().chain(class.nested.iter()) {
                outline_decl(out, set, member, depth + 1);
            }
        }
        DeclKind::Method(method) => {
            let key = signature::normalize(decl, method);
            let state = if method.body.is_some() { "def" } else { "decl" };
            let _ = write!(out, "{pad}{} {key} [{state}]", decl.visibility);
            if let Some(ret) = &method.return_type {
                let _ = write!(out, " -> {ret}");
            }
            let _ = writeln!(out);
            for local in &method.local_types {
                outline_decl(out, set, local, depth + 1);
            }
        }
        DeclKind::Field(field) => {
            let _ = write!(out, "{pad}{} field {}: {}", decl.visibility, decl.name, field.ty);
            for dim in &field.array_dims {
                let _ = write!(out, "[{dim}]");
            }
            if field.is_static {
                let _ = write!(out, " (static)");
            }
            let _ = writeln!(out);
        }
        DeclKind::Typedef(typedef) => {
            let _ = writeln!(out, "{pad}typedef {} = {}", decl.name, typedef.target);
        }
        DeclKind::Enum(e) => {
            let _ = writeln!(out, "{pad}enum {} {{{}}}", decl.qualified_name(), e.enumerators.join(", "));
        }
        DeclKind::Define(define) => {
            let _ = writeln!(out, "{pad}define {} {}", decl.name, define.value);
        }
        DeclKind::StaticFieldDefinition(def) => {
            let ty = def.ty.as_deref().unwrap_or("<no type>");
            let _ = writeln!(out, "{pad}static definition {}: {ty}", decl.qualified_name());
        }
        DeclKind::Damaged(damaged) => {
            let (line, _, _) = get_line_info(&set.source, decl.span.start);
            let _ = writeln!(out, "{pad}damaged at line {line}: {}", damaged.reason);
        }
    }
}

// ============================================================================
// Match summary
// ============================================================================

/// Plain-text summary of a merge: counts, then every finding with the files involved.
pub fn summary(file_count: usize, model: &MergedModel<'_>, report: &MatchReport) -> String {
    let matched = model
        .entries
        .iter()
        .filter(|e| e.declaration.is_some() && e.is_implemented())
        .count();
    let inline = model.entries.iter().filter(|e| e.is_inline()).count();

    let mut out = String::new();
    let _ = writeln!(out, "files: {file_count}");
    let _ = writeln!(
        out,
        "signatures: {} ({matched} matched, {inline} inline)",
        model.entries.len()
    );
    let _ = writeln!(out, "classes: {}", model.classes.len());
    for class in &model.classes {
        let mut traits = Vec::new();
        if class.is_interface {
            traits.push("interface");
        }
        if class.is_static_only {
            traits.push("static");
        }
        if class.is_exported {
            traits.push("exported");
        }
        let traits = if traits.is_empty() {
            String::new()
        } else {
            format!(" [{}]", traits.join(", "))
        };
        let _ = writeln!(
            out,
            "  {}{traits}: {}/{} methods implemented",
            class.name, class.implemented_methods, class.declared_methods
        );
    }

    section(&mut out, "orphan declarations", &report.orphan_declarations);
    section(&mut out, "orphan implementations", &report.orphan_implementations);
    section(&mut out, "local functions", &report.local_functions);
    section(&mut out, "duplicate declarations", &report.duplicate_declarations);
    section(&mut out, "exact duplicates", &report.exact_duplicates);
    section(&mut out, "conflicting duplicates", &report.conflicting_duplicates);
    section(&mut out, "orphan static definitions", &report.orphan_static_definitions);

    let _ = write!(
        out,
        "{} errors, {} warnings",
        report.error_count(),
        report.warning_count()
    );
    out
}

fn section(out: &mut String, title: &str, findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}: {}", findings.len());
    for finding in findings {
        let _ = writeln!(out, "  {} [{}]", finding.subject, files_of(&finding.provenance));
    }
}

fn files_of(provenance: &[Provenance]) -> String {
    provenance
        .iter()
        .map(|p| p.file_name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Serialize)]
struct MatchOutput<'r, 'a> {
    files: &'r [FileDeclarationSet],
    model: &'r MergedModel<'a>,
    report: &'r MatchReport,
}

/// Pretty JSON for one parsed file.
pub fn file_json(set: &FileDeclarationSet) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(set)
}

/// Pretty JSON for a whole run: parsed files, merged model and report.
pub fn match_json(
    sets: &[FileDeclarationSet],
    model: &MergedModel<'_>,
    report: &MatchReport,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&MatchOutput {
        files: sets,
        model,
        report,
    })
}
