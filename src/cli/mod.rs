//! CLI module for cppmatch
//!
//! This module provides the command-line interface around the parser and matcher.
//!
//! ## Commands
//!
//! - `lex <file>` - Print the token stream
//! - `parse <file>` - Print the declaration outline (or JSON)
//! - `match <files>...` - Parse, merge and report orphans, duplicates and conflicts
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::config::MatchConfig;
use commands::MatchOptions;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create an error with a custom exit code.
    pub fn with_code(message: impl Into<String>, code: i32) -> Self {
        Self::new(message, ExitCode(code))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// C++ declaration parser and cross-file matcher
#[derive(Parser, Debug)]
#[command(name = "cppmatch")]
#[command(version = VERSION)]
#[command(about = "Parse C++ declarations and match them across header and implementation files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream of a file
    Lex {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print the declarations of a file
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Emit JSON instead of an outline
        #[arg(long)]
        json: bool,
    },

    /// Merge declarations across files and report mismatches
    Match {
        /// Header and implementation files, in any order
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,
        /// Emit JSON instead of a summary
        #[arg(long)]
        json: bool,
        /// Compare duplicate bodies with whitespace removed
        #[arg(long)]
        ignore_whitespace: bool,
        /// Report free functions without a prototype (and prototypes without a definition)
        #[arg(long)]
        free_function_orphans: bool,
        /// Exit with failure on any warning
        #[arg(long)]
        deny_warnings: bool,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Lex { file } => commands::lex_file(&file),
        Command::Parse { file, json } => commands::parse_file(&file, json, &MatchConfig::default()),
        Command::Match {
            files,
            json,
            ignore_whitespace,
            free_function_orphans,
            deny_warnings,
        } => commands::match_files(
            &files,
            MatchOptions {
                json,
                ignore_whitespace,
                free_function_orphans,
                deny_warnings,
            },
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_lex() {
        let cli = Cli::try_parse_from(["cppmatch", "lex", "CSample.h"]).unwrap();
        assert!(matches!(cli.command, Command::Lex { .. }));
    }

    #[test]
    fn test_cli_parse_parse_json() {
        let cli = Cli::try_parse_from(["cppmatch", "parse", "CSample.cpp", "--json"]).unwrap();
        if let Command::Parse { file, json } = cli.command {
            assert_eq!(file, PathBuf::from("CSample.cpp"));
            assert!(json);
        } else {
            panic!("Expected Parse command");
        }
    }

    #[test]
    fn test_cli_parse_match_flags() {
        let cli = Cli::try_parse_from([
            "cppmatch",
            "match",
            "CPartialSample.h",
            "CPartialSample.cpp",
            "CPartialSampleMethods.cpp",
            "--ignore-whitespace",
            "--deny-warnings",
        ])
        .unwrap();
        if let Command::Match {
            files,
            json,
            ignore_whitespace,
            free_function_orphans,
            deny_warnings,
        } = cli.command
        {
            assert_eq!(files.len(), 3);
            assert!(!json);
            assert!(ignore_whitespace);
            assert!(!free_function_orphans);
            assert!(deny_warnings);
        } else {
            panic!("Expected Match command");
        }
    }

    #[test]
    fn test_cli_match_requires_files() {
        assert!(Cli::try_parse_from(["cppmatch", "match"]).is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["cppmatch"]).is_err());
    }

    #[test]
    fn test_cli_error_codes() {
        let err = CliError::with_code("boom", 3);
        assert_eq!(err.exit_code, ExitCode(3));
        assert_eq!(err.to_string(), "boom");
        assert_eq!(CliError::failure("x").exit_code, ExitCode::FAILURE);
    }
}
