//! Lexer for C++ source text.
//!
//! Handles tokenization including:
//! - Keywords and identifiers (via the `cppmatch_core` keyword registry)
//! - Line and block comments, kept as tokens for comment attachment
//! - Preprocessor directive lines (with backslash-newline continuation)
//! - String/char literals with escapes, encoding prefixes and raw strings
//! - Numbers (decimal/hex/binary, digit separators, exponents, suffixes)
//! - Punctuators by maximal munch (via the punctuation registry)
//!
//! ## Notes
//! - The lexer never fails. Anomalies (unterminated literals/comments) become warnings and
//!   unrecognized characters become [`TokenKind::Unknown`].
//! - `>>` is lexed as two `>` tokens so nested template argument lists close correctly.
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token)

pub mod tokens;

pub use tokens::{Token, TokenKind, keyword_id};

use serde::Serialize;

use crate::ast::Span;
use crate::diagnostics::{Diagnostic, errors};
use cppmatch_core::lang::punctuation;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Directive detection (simplified):
//
// [Start of line] → skip blanks → see '#' → [Directive until unescaped newline]
//                                   ↓
//                                  other → [Inside code] → see '\n' → [Start of line]
// ============================================================================

/// Output of [`lex`]: the token stream (always ending with `Eof`) plus lexer diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lexer for C++ source code.
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
    line: u32,
    line_start: usize,
    /// No token has started on the current line yet.
    at_line_start: bool,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            line_start: 0,
            at_line_start: true,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire source code.
    ///
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(mut self) -> Lexed {
        loop {
            self.skip_whitespace();
            if self.is_at_end() {
                break;
            }
            self.scan_token();
        }

        let (line, column) = self.position_of(self.current_pos);
        self.tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(self.current_pos, self.current_pos),
            line,
            column,
        ));

        Lexed {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.source[self.current_pos..].chars();
        iter.next();
        iter.next()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.current_pos..]
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.line_start = self.current_pos;
            self.at_line_start = true;
        }
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Return `true` if a backslash-newline (`\` + `\n` or `\r\n`) starts at the current position.
    fn at_line_splice(&self) -> bool {
        let rest = self.rest();
        rest.starts_with("\\\n") || rest.starts_with("\\\r\n")
    }

    fn consume_line_splice(&mut self) {
        self.advance();
        if self.peek() == Some('\r') {
            self.advance();
        }
        self.advance();
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c') => {
                    self.advance();
                }
                Some('\\') if self.at_line_splice() => self.consume_line_splice(),
                _ => break,
            }
        }
    }

    /// 1-based line/column of a byte offset on the current line.
    fn position_of(&self, offset: usize) -> (u32, u32) {
        let column = self.source[self.line_start..offset].chars().count() + 1;
        (self.line, column as u32)
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        let start = self.current_pos;
        let (line, column) = self.position_of(start);
        let directive_allowed = self.at_line_start;

        let Some(c) = self.advance() else {
            return;
        };

        let kind = match c {
            '/' if self.peek() == Some('/') => self.scan_line_comment(start),
            '/' if self.peek() == Some('*') => self.scan_block_comment(start),
            '#' if directive_allowed => self.scan_directive(start),
            '"' => self.scan_quoted(start, '"'),
            '\'' => self.scan_quoted(start, '\''),
            '0'..='9' => self.scan_number(start),
            '.' if self.peek().is_some_and(|n| n.is_ascii_digit()) => self.scan_number(start),
            _ if is_ident_start(c) => self.scan_identifier(start),
            _ => self.scan_punctuation(start, c),
        };

        self.at_line_start = false;
        self.tokens.push(Token::new(kind, Span::new(start, self.current_pos), line, column));
    }

    // ========================================================================
    // Comments and directives
    // ========================================================================

    fn scan_line_comment(&mut self, start: usize) -> TokenKind {
        while let Some(c) = self.peek() {
            if c == '\n' || (c == '\r' && self.peek_next() == Some('\n')) {
                break;
            }
            self.advance();
        }
        TokenKind::LineComment(self.source[start..self.current_pos].to_string())
    }

    fn scan_block_comment(&mut self, start: usize) -> TokenKind {
        self.advance(); // '*'
        loop {
            if self.rest().starts_with("*/") {
                self.advance();
                self.advance();
                break;
            }
            if self.advance().is_none() {
                self.diagnostics
                    .push(errors::unterminated_block_comment(Span::new(start, self.current_pos)));
                break;
            }
        }
        TokenKind::BlockComment(self.source[start..self.current_pos].to_string())
    }

    /// Scan a directive line starting at `#`.
    ///
    /// Continues across backslash-newline and stops before a `//` comment outside string literals;
    /// trailing blanks are excluded from the token.
    fn scan_directive(&mut self, start: usize) -> TokenKind {
        let mut in_string: Option<char> = None;
        loop {
            if self.at_line_splice() {
                self.consume_line_splice();
                continue;
            }
            let Some(c) = self.peek() else { break };
            if c == '\n' || (c == '\r' && self.peek_next() == Some('\n')) {
                break;
            }
            match in_string {
                Some(q) => {
                    if c == '\\' {
                        self.advance();
                    } else if c == q {
                        in_string = None;
                    }
                }
                None => {
                    if c == '/' && self.peek_next() == Some('/') {
                        break;
                    }
                    if is_blank(c) && self.only_trivia_left_on_line() {
                        break;
                    }
                    if c == '"' || c == '\'' {
                        in_string = Some(c);
                    }
                }
            }
            self.advance();
        }
        TokenKind::Directive(self.source[start..self.current_pos].to_string())
    }

    /// Return `true` if only blanks, an optional `//` comment and the line end remain.
    fn only_trivia_left_on_line(&self) -> bool {
        let after = self.rest().trim_start_matches(is_blank);
        after.is_empty() || after.starts_with('\n') || after.starts_with("\r\n") || after.starts_with("//")
    }

    // ========================================================================
    // Literals
    // ========================================================================

    /// Scan a quoted literal whose opening quote was just consumed.
    ///
    /// An unterminated literal ends before the end of the line.
    fn scan_quoted(&mut self, start: usize, quote: char) -> TokenKind {
        loop {
            if self.at_line_splice() {
                self.consume_line_splice();
                continue;
            }
            match self.peek() {
                None => {
                    self.unterminated_literal(start, quote);
                    break;
                }
                Some('\n') => {
                    self.unterminated_literal(start, quote);
                    break;
                }
                Some('\r') if self.peek_next() == Some('\n') => {
                    self.unterminated_literal(start, quote);
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if !matches!(self.peek(), None | Some('\n')) {
                        self.advance();
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
        let text = self.source[start..self.current_pos].to_string();
        if quote == '"' {
            TokenKind::String(text)
        } else {
            TokenKind::Char(text)
        }
    }

    fn unterminated_literal(&mut self, start: usize, quote: char) {
        let span = Span::new(start, self.current_pos);
        let diagnostic = if quote == '"' {
            errors::unterminated_string(span)
        } else {
            errors::unterminated_char(span)
        };
        self.diagnostics.push(diagnostic);
    }

    /// Scan a raw string after its `R"` prefix has been consumed: `delim( ... )delim"`.
    fn scan_raw_string(&mut self, start: usize) -> TokenKind {
        let delim_start = self.current_pos;
        while let Some(c) = self.peek() {
            if c == '(' || c.is_whitespace() || c == ')' || c == '\\' || c == '"' {
                break;
            }
            self.advance();
        }
        let delimiter = self.source[delim_start..self.current_pos].to_string();
        if !self.match_char('(') {
            // Not a well-formed raw string opener; fall back to ordinary string rules.
            return self.scan_quoted(start, '"');
        }
        let terminator = format!("){delimiter}\"");
        match self.rest().find(&terminator) {
            Some(offset) => {
                let end = self.current_pos + offset + terminator.len();
                while self.current_pos < end {
                    self.advance();
                }
            }
            None => {
                while self.advance().is_some() {}
                self.diagnostics
                    .push(errors::unterminated_raw_string(Span::new(start, self.current_pos)));
            }
        }
        TokenKind::String(self.source[start..self.current_pos].to_string())
    }

    /// Scan a preprocessing number: digits, letters, `_`, `.`, digit separators and signed exponents.
    fn scan_number(&mut self, start: usize) -> TokenKind {
        while let Some(c) = self.peek() {
            let prev = self.source[start..self.current_pos].chars().last();
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.advance();
            } else if c == '\'' && self.peek_next().is_some_and(|n| n.is_ascii_alphanumeric()) {
                self.advance();
            } else if (c == '+' || c == '-') && matches!(prev, Some('e' | 'E' | 'p' | 'P')) {
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Number(self.source[start..self.current_pos].to_string())
    }

    // ========================================================================
    // Identifiers and punctuation
    // ========================================================================

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }

        let spelling = &self.source[start..self.current_pos];

        // Encoding prefixes glue onto a directly following literal.
        match (spelling, self.peek()) {
            ("R" | "LR" | "uR" | "UR" | "u8R", Some('"')) => {
                self.advance();
                return self.scan_raw_string(start);
            }
            ("L" | "u" | "U" | "u8", Some(q @ ('"' | '\''))) => {
                self.advance();
                return self.scan_quoted(start, q);
            }
            _ => {}
        }

        // Look up identifier spelling in the reserved-word registry.
        match keyword_id(spelling) {
            Some(id) => TokenKind::Keyword(id),
            None => TokenKind::Ident(spelling.to_string()),
        }
    }

    fn scan_punctuation(&mut self, start: usize, c: char) -> TokenKind {
        match punctuation::longest_prefix(&self.source[start..]) {
            Some((id, len)) => {
                // The first character is already consumed; punctuators are ASCII.
                for _ in 1..len {
                    self.advance();
                }
                TokenKind::Punctuation(id)
            }
            None => TokenKind::Unknown(c),
        }
    }
}

// ============================================================================
// Helper functions
// ============================================================================

/// Horizontal whitespace inside a line.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0b' | '\x0c')
}

/// Check if a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

/// Check if a character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Lexed {
    let lexed = Lexer::new(source).tokenize();
    tracing::trace!(token_count = lexed.tokens.len(), "lexed");
    lexed
}

#[cfg(test)]
mod tests {
    use super::*;
    use cppmatch_core::lang::keywords::KeywordId;
    use cppmatch_core::lang::punctuation::PunctuationId;
    use proptest::prelude::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_idents_and_punctuation() {
        assert_eq!(
            kinds("virtual bool Foo::Bar() const;"),
            vec![
                TokenKind::Keyword(KeywordId::Virtual),
                TokenKind::Keyword(KeywordId::Bool),
                TokenKind::Ident("Foo".into()),
                TokenKind::Punctuation(PunctuationId::ColonColon),
                TokenKind::Ident("Bar".into()),
                TokenKind::Punctuation(PunctuationId::LParen),
                TokenKind::Punctuation(PunctuationId::RParen),
                TokenKind::Keyword(KeywordId::Const),
                TokenKind::Punctuation(PunctuationId::Semi),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn nested_template_closers_are_split() {
        let ks = kinds("std::vector<std::vector<int>> v;");
        let gts = ks
            .iter()
            .filter(|k| **k == TokenKind::Punctuation(PunctuationId::Gt))
            .count();
        assert_eq!(gts, 2);
    }

    #[test]
    fn comment_markers_inside_strings_are_inert() {
        let ks = kinds(r#"const char* s = "/* not a comment */"; // tail"#);
        assert!(ks.contains(&TokenKind::String(r#""/* not a comment */""#.into())));
        assert!(ks.contains(&TokenKind::LineComment("// tail".into())));
        assert!(!ks.iter().any(|k| matches!(k, TokenKind::BlockComment(_))));
    }

    #[test]
    fn directive_with_trailing_comment_and_continuation() {
        let ks = kinds("#define A 1 \\\r\n  + 2 // note\r\nint x;");
        assert_eq!(ks[0], TokenKind::Directive("#define A 1 \\\r\n  + 2".into()));
        assert_eq!(ks[1], TokenKind::LineComment("// note".into()));
        assert_eq!(ks[2], TokenKind::Keyword(KeywordId::Int));
    }

    #[test]
    fn hash_in_middle_of_line_is_not_a_directive() {
        let ks = kinds("x # y");
        assert_eq!(ks[1], TokenKind::Punctuation(PunctuationId::Hash));
    }

    #[test]
    fn indented_directive() {
        let ks = kinds("  \t#pragma once\n");
        assert_eq!(ks[0], TokenKind::Directive("#pragma once".into()));
    }

    #[test]
    fn literal_prefixes_and_raw_strings() {
        let ks = kinds(r#"L"wide" u8"utf" R"x(a)" b)x" 'c' U'd'"#);
        assert_eq!(
            ks,
            vec![
                TokenKind::String(r#"L"wide""#.into()),
                TokenKind::String(r#"u8"utf""#.into()),
                TokenKind::String(r#"R"x(a)" b)x""#.into()),
                TokenKind::Char("'c'".into()),
                TokenKind::Char("U'd'".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers() {
        let ks = kinds("0x1F 1'000'000 3.5e-2f .5 0b1010ull");
        assert_eq!(
            ks,
            vec![
                TokenKind::Number("0x1F".into()),
                TokenKind::Number("1'000'000".into()),
                TokenKind::Number("3.5e-2f".into()),
                TokenKind::Number(".5".into()),
                TokenKind::Number("0b1010ull".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_ends_at_line_end() {
        let lexed = lex("s = \"abc\nint x;");
        assert_eq!(lexed.tokens[2].kind, TokenKind::String("\"abc".into()));
        assert_eq!(lexed.tokens[3].kind, TokenKind::Keyword(KeywordId::Int));
        assert_eq!(lexed.diagnostics.len(), 1);
        assert!(lexed.diagnostics[0].is_warning());
    }

    #[test]
    fn unterminated_block_comment_runs_to_eof() {
        let lexed = lex("int a; /* open\nforever");
        assert!(matches!(lexed.tokens[3].kind, TokenKind::BlockComment(_)));
        assert_eq!(lexed.tokens[4].kind, TokenKind::Eof);
        assert_eq!(lexed.diagnostics.len(), 1);
    }

    #[test]
    fn unknown_characters_do_not_fail() {
        let ks = kinds("a @ b `");
        assert_eq!(ks[1], TokenKind::Unknown('@'));
        assert_eq!(ks[3], TokenKind::Unknown('`'));
    }

    #[test]
    fn positions_are_one_based_and_spans_index_source() {
        let src = "int a;\r\n  bool b;";
        let lexed = lex(src);
        let b = &lexed.tokens[3];
        assert_eq!((b.line, b.column), (2, 3));
        assert_eq!(&src[b.span.start..b.span.end], "bool");
    }

    #[test]
    fn stream_snapshot() {
        let rendered: Vec<String> = lex("#pragma once\nclass A; // x")
            .tokens
            .iter()
            .map(|t| format!("{}:{} {:?}", t.line, t.column, t.kind))
            .collect();
        insta::assert_snapshot!(rendered.join("\n"), @r##"
        1:1 Directive("#pragma once")
        2:1 Keyword(Class)
        2:7 Ident("A")
        2:8 Punctuation(Semi)
        2:10 LineComment("// x")
        2:14 Eof
        "##);
    }

    proptest! {
        #[test]
        fn lexing_never_panics_and_ends_with_eof(source in "\\PC*") {
            let lexed = lex(&source);
            prop_assert!(matches!(lexed.tokens.last().map(|t| &t.kind), Some(TokenKind::Eof)));
            for token in &lexed.tokens {
                prop_assert!(token.span.start <= token.span.end);
                prop_assert!(source.is_char_boundary(token.span.start));
                prop_assert!(source.is_char_boundary(token.span.end));
            }
        }
    }
}
