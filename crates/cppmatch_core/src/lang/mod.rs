//! C++ vocabulary registries.
//!
//! Callers work with **stable IDs** (`KeywordId`, `PunctuationId`) and look up spellings and
//! metadata via registry tables, instead of comparing strings across the parser.
//!
//! ## Notes
//! - Registries are **pure**: no AST types, no IO, no side effects.
//! - Contextual identifiers (`override`, `final`, `__declspec`, ...) are deliberately *not*
//!   keywords; the parser recognizes them by spelling where they matter.

pub mod keywords;
pub mod punctuation;
