//! Token types for the C++ lexer.
//!
//! The lexer uses **registry-backed IDs** for language vocabulary:
//! - `Keyword(KeywordId)` for reserved words
//! - `Punctuation(PunctuationId)` for punctuators and operators
//!
//! ## Notes
//! - Identifiers, literals, comments and directives carry their verbatim source text.
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use std::borrow::Cow;

use serde::Serialize;

use crate::ast::Span;
use cppmatch_core::lang::keywords::{self, KeywordId};
use cppmatch_core::lang::punctuation::{self, PunctuationId};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // ========== Keyword / punctuation (ID-based) ==========
    #[serde(serialize_with = "serialize_keyword")]
    Keyword(KeywordId),
    #[serde(serialize_with = "serialize_punctuation")]
    Punctuation(PunctuationId),

    // ========== Identifiers and literals (verbatim text) ==========
    Ident(String),
    Number(String),
    /// String literal including prefix and quotes.
    String(String),
    /// Character literal including prefix and quotes.
    Char(String),

    // ========== Trivia ==========
    LineComment(String),
    BlockComment(String),
    /// Whole directive line(s) starting at `#`, continuations included.
    Directive(String),

    // ========== Special ==========
    Unknown(char),
    Eof,
}

impl TokenKind {
    /// Source spelling of the token (empty for `Eof`).
    pub fn spelling(&self) -> Cow<'_, str> {
        match self {
            TokenKind::Keyword(id) => Cow::Borrowed(keywords::as_str(*id)),
            TokenKind::Punctuation(id) => Cow::Borrowed(punctuation::as_str(*id)),
            TokenKind::Ident(s)
            | TokenKind::Number(s)
            | TokenKind::String(s)
            | TokenKind::Char(s)
            | TokenKind::LineComment(s)
            | TokenKind::BlockComment(s)
            | TokenKind::Directive(s) => Cow::Borrowed(s.as_str()),
            TokenKind::Unknown(c) => Cow::Owned(c.to_string()),
            TokenKind::Eof => Cow::Borrowed(""),
        }
    }
}

/// A token with its kind, byte span and 1-based start position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub line: u32,
    pub column: u32,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span, line: u32, column: u32) -> Self {
        Self {
            kind,
            span,
            line,
            column,
        }
    }

    /// Line on which the token ends (differs from `line` for multi-line comments and directives).
    pub fn end_line(&self) -> u32 {
        let breaks = match &self.kind {
            TokenKind::BlockComment(s) | TokenKind::Directive(s) | TokenKind::String(s) => {
                s.matches('\n').count()
            }
            _ => 0,
        };
        self.line + breaks as u32
    }
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn keyword_id(name: &str) -> Option<KeywordId> {
    keywords::from_str(name)
}

fn serialize_keyword<S: serde::Serializer>(id: &KeywordId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(keywords::as_str(*id))
}

fn serialize_punctuation<S: serde::Serializer>(id: &PunctuationId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(punctuation::as_str(*id))
}
