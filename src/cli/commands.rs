//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::{BodyComparison, MatchConfig};
use crate::matcher::{self, MatchReport};
use crate::pipeline::{self, SourceFile};
use crate::render;
use cppmatch_syntax::ast::{FileDeclarationSet, FileId};
use cppmatch_syntax::diagnostics::{Diagnostic, Severity};
use cppmatch_syntax::lexer::{self, TokenKind};

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// while lexing.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Failure to read one input file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot access file '{path}': {source}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Source file '{path}' is too large ({size} bytes, max {max} bytes)")]
    TooLarge { path: PathBuf, size: u64, max: u64 },
    #[error("Error reading file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<SourceError> for CliError {
    fn from(err: SourceError) -> Self {
        CliError::failure(err.to_string())
    }
}

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error, invalid UTF-8)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &Path) -> Result<String, SourceError> {
    let metadata = fs::metadata(file_path).map_err(|source| SourceError::Metadata {
        path: file_path.to_path_buf(),
        source,
    })?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(SourceError::TooLarge {
            path: file_path.to_path_buf(),
            size: metadata.len(),
            max: MAX_SOURCE_SIZE,
        });
    }

    fs::read_to_string(file_path).map_err(|source| SourceError::Read {
        path: file_path.to_path_buf(),
        source,
    })
}

fn display_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Print every diagnostic with its source snippet to stderr.
fn emit_diagnostics<'d>(diagnostics: impl IntoIterator<Item = &'d Diagnostic>, sets: &[FileDeclarationSet]) {
    for diag in diagnostics {
        match render::owning_set(diag, sets) {
            Some(set) => eprintln!("{:?}", render::to_report(diag, &set.name, &set.source)),
            None => eprintln!("{}: {}", diag.severity, diag.message),
        }
    }
}

// ============================================================================
// lex
// ============================================================================

/// Tokenize a file and print one token per line.
pub fn lex_file(file_path: &Path) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let lexed = lexer::lex(&source);

    for tok in &lexed.tokens {
        let kind = match &tok.kind {
            TokenKind::Keyword(_) => "keyword",
            TokenKind::Punctuation(_) => "punct",
            TokenKind::Ident(_) => "ident",
            TokenKind::Number(_) => "number",
            TokenKind::String(_) => "string",
            TokenKind::Char(_) => "char",
            TokenKind::LineComment(_) => "line-comment",
            TokenKind::BlockComment(_) => "block-comment",
            TokenKind::Directive(_) => "directive",
            TokenKind::Unknown(_) => "unknown",
            TokenKind::Eof => "eof",
        };
        println!("{}:{}\t{kind}\t{:?}", tok.line, tok.column, tok.kind.spelling());
    }

    if !lexed.diagnostics.is_empty() {
        let name = display_name(file_path);
        for diag in &lexed.diagnostics {
            eprintln!("{:?}", render::to_report(diag, &name, &source));
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// parse
// ============================================================================

/// Parse a file and print its declaration outline (or JSON).
///
/// Exits with failure when the file has error diagnostics.
pub fn parse_file(file_path: &Path, json: bool, config: &MatchConfig) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let name = display_name(file_path);
    let role = config.role_for(file_path);
    let set = cppmatch_syntax::parse_file(FileId(0), &name, source, role);

    if json {
        let text = render::file_json(&set).map_err(|e| CliError::failure(format!("Error writing JSON: {e}")))?;
        println!("{text}");
    } else {
        print!("{}", render::outline(&set));
    }

    let sets = std::slice::from_ref(&set);
    emit_diagnostics(&set.diagnostics, sets);

    if set.has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

// ============================================================================
// match
// ============================================================================

/// Options of the `match` subcommand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOptions {
    pub json: bool,
    pub ignore_whitespace: bool,
    pub free_function_orphans: bool,
    pub deny_warnings: bool,
}

impl MatchOptions {
    /// Matcher configuration for these options.
    pub fn config(&self) -> MatchConfig {
        let comparison = if self.ignore_whitespace {
            BodyComparison::IgnoreWhitespace
        } else {
            BodyComparison::Exact
        };
        MatchConfig::new()
            .with_body_comparison(comparison)
            .with_free_function_orphans(self.free_function_orphans)
    }
}

/// Parse every file, merge them and print the summary (or JSON) plus diagnostics.
pub fn match_files(paths: &[PathBuf], options: MatchOptions) -> CliResult<ExitCode> {
    if paths.is_empty() {
        return Err(CliError::failure("Error: match requires at least one file"));
    }
    let config = options.config();

    let mut files = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        let text = read_source(path)?;
        files.push(SourceFile::new(FileId(i as u32), display_name(path), text));
    }
    for file in &files {
        if !config.is_known_extension(&file.name) {
            tracing::warn!(file = %file.name, "unknown extension, treating as implementation file");
        }
    }

    let sets = pipeline::parse_all(&files, &config);
    let (model, report) = matcher::merge(&sets, &config);

    if options.json {
        let text = render::match_json(&sets, &model, &report)
            .map_err(|e| CliError::failure(format!("Error writing JSON: {e}")))?;
        println!("{text}");
    } else {
        println!("{}", render::summary(sets.len(), &model, &report));
    }

    let parse_diagnostics = sets.iter().flat_map(|s| s.diagnostics.iter());
    emit_diagnostics(parse_diagnostics.chain(report.diagnostics.iter()), &sets);

    Ok(match_exit_code(&sets, &report, options.deny_warnings))
}

/// Failure when there are conflicts or error diagnostics, or any warning with `deny_warnings`.
pub fn match_exit_code(sets: &[FileDeclarationSet], report: &MatchReport, deny_warnings: bool) -> ExitCode {
    let all: Vec<&Diagnostic> = sets
        .iter()
        .flat_map(|s| s.diagnostics.iter())
        .chain(report.diagnostics.iter())
        .collect();
    let worst = all.iter().map(|d| d.severity).max();
    let threshold = if deny_warnings { Severity::Warning } else { Severity::Error };

    if report.has_conflicts() || worst.is_some_and(|w| w >= threshold) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
