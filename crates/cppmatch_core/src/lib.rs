//! Canonical C++ vocabulary for the cppmatch lexer, parser and tooling.
//!
//! This crate is intentionally small and dependency-light. It holds pure lookup tables only:
//! no AST types, no IO, no global state.
//!
//! ## Examples
//! ```rust
//! use cppmatch_core::lang::keywords::{self, KeywordId};
//!
//! assert_eq!(keywords::from_str("virtual"), Some(KeywordId::Virtual));
//! assert_eq!(keywords::as_str(KeywordId::Virtual), "virtual");
//! ```

pub mod lang;
