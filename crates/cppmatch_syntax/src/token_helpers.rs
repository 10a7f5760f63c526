//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy
//! to work with ID-based tokens.

use crate::lexer::{Token, TokenKind};
use cppmatch_core::lang::keywords::{self, KeywordId};
use cppmatch_core::lang::punctuation::PunctuationId;

impl TokenKind {
    /// Return the keyword id, if this is a keyword token.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        match self {
            TokenKind::Keyword(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given keyword.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        matches!(self, TokenKind::Keyword(k) if *k == id)
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return the identifier text, if this is an identifier token.
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Return `true` if this is an identifier with the given spelling.
    pub fn is_ident(&self, spelling: &str) -> bool {
        self.ident() == Some(spelling)
    }

    /// Return `true` for comments.
    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::LineComment(_) | TokenKind::BlockComment(_))
    }

    /// Return `true` for tokens the declaration grammar skips (comments and directives).
    pub fn is_trivia(&self) -> bool {
        self.is_comment() || matches!(self, TokenKind::Directive(_))
    }

    /// Return `true` if the token is a word: identifier or keyword.
    pub fn is_word(&self) -> bool {
        matches!(self, TokenKind::Ident(_) | TokenKind::Keyword(_))
    }

    /// Return `true` if the token can be part of a type name (`unsigned`, `const`, identifiers).
    pub fn is_type_word(&self) -> bool {
        match self {
            TokenKind::Ident(_) => true,
            TokenKind::Keyword(id) => keywords::is_type_keyword(*id),
            _ => false,
        }
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.keyword_id()`.
    pub fn keyword_id(&self) -> Option<KeywordId> {
        self.kind.keyword_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }

    /// Convenience wrapper for `self.kind.is_punctuation(id)`.
    pub fn is_punct(&self, id: PunctuationId) -> bool {
        self.kind.is_punctuation(id)
    }

    /// Convenience wrapper for `self.kind.is_keyword(id)`.
    pub fn is_keyword(&self, id: KeywordId) -> bool {
        self.kind.is_keyword(id)
    }
}
