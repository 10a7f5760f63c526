#![forbid(unsafe_code)]
//! cppmatch: C++ declaration parser and cross-file structural matcher
//!
//! Parses class/struct declarations split across header and implementation files and merges them
//! by signature identity (owner, name, normalized parameter types, `const`). The syntax frontend
//! lives in `cppmatch_syntax`; this crate adds signature normalization, the matcher, the parallel
//! file pipeline, rendering and the CLI.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`. The parser and matcher never fail: problems become diagnostics.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.
//!
//! ## Examples
//!
//! ```rust
//! use cppmatch::config::MatchConfig;
//! use cppmatch::pipeline::{number_files, parse_all};
//! use cppmatch::matcher::merge;
//!
//! let files = number_files([
//!     ("CSample.h", "class CSample { public: bool MethodP1(const TDimValue&, bool=false); };"),
//!     ("CSample.cpp", "bool CSample::MethodP1(const TDimValue& dim, bool bError) { return bError; }"),
//! ]);
//! let config = MatchConfig::default();
//! let sets = parse_all(&files, &config);
//! let (model, report) = merge(&sets, &config);
//! assert_eq!(model.entries[0].key.to_string(), "CSample::MethodP1(const TDimValue&,bool)");
//! assert!(report.is_clean());
//! ```

pub mod cli;
pub mod config;
pub mod matcher;
pub mod pipeline;
pub mod render;
pub mod signature;

pub use cppmatch_syntax::ast;
pub use cppmatch_syntax::diagnostics;
pub use cppmatch_syntax::lexer;
pub use cppmatch_syntax::parser;
pub use cppmatch_syntax::preprocessor;

pub use config::{BodyComparison, MatchConfig};
pub use matcher::{MatchReport, MergedModel, merge};
pub use pipeline::{SourceFile, parse_all};
pub use signature::{SignatureKey, normalize, normalize_type};
