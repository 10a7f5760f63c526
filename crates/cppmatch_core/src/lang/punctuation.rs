//! C++ punctuator vocabulary.
//!
//! Delimiters, separators, scope/access markers and operators, each with a stable
//! [`PunctuationId`] and canonical spelling.
//!
//! ## Notes
//! - `>>` and `>>=` are deliberately absent: they are lexed as two `>` tokens so that nested
//!   template argument lists (`std::vector<std::vector<int>>`) close correctly. Spans still cover
//!   the original text, so nothing is lost for verbatim reproduction.
//! - [`longest_prefix`] implements maximal munch for the lexer.
//!
//! ## Examples
//! ```rust
//! use cppmatch_core::lang::punctuation::{self, PunctuationId};
//!
//! assert_eq!(punctuation::from_str("::"), Some(PunctuationId::ColonColon));
//! assert_eq!(punctuation::longest_prefix("->*x"), Some((PunctuationId::ArrowStar, 3)));
//! assert_eq!(punctuation::longest_prefix(">>"), Some((PunctuationId::Gt, 1)));
//! ```

/// Broad syntactic grouping for punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationCategory {
    /// Brackets and braces.
    Delimiter,
    /// `,` `;` `:`.
    Separator,
    /// `::` `.` `->` and member-pointer access.
    Access,
    /// Arithmetic, logical, comparison and assignment operators.
    Operator,
    /// `#`, `##`, `...`, `?`.
    Marker,
}

/// Stable identifier for punctuation tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PunctuationId {
    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // Separators
    Semi,
    Comma,
    Colon,

    // Access
    ColonColon,
    Dot,
    Arrow,
    DotStar,
    ArrowStar,

    // Operators
    Tilde,
    Bang,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Amp,
    Pipe,
    Eq,
    Lt,
    Gt,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    CaretEq,
    AmpEq,
    PipeEq,
    Shl,
    ShlEq,
    EqEq,
    NotEq,
    LtEq,
    GtEq,
    Spaceship,
    AmpAmp,
    PipePipe,
    PlusPlus,
    MinusMinus,

    // Markers
    Question,
    Hash,
    HashHash,
    Ellipsis,
}

/// Metadata for a punctuation token.
#[derive(Debug, Clone, Copy)]
pub struct PunctuationInfo {
    pub id: PunctuationId,
    pub canonical: &'static str,
    pub category: PunctuationCategory,
}

/// Registry of all punctuation tokens.
pub const PUNCTUATION: &[PunctuationInfo] = &[
    // Delimiters
    info(PunctuationId::LParen, "(", PunctuationCategory::Delimiter),
    info(PunctuationId::RParen, ")", PunctuationCategory::Delimiter),
    info(PunctuationId::LBracket, "[", PunctuationCategory::Delimiter),
    info(PunctuationId::RBracket, "]", PunctuationCategory::Delimiter),
    info(PunctuationId::LBrace, "{", PunctuationCategory::Delimiter),
    info(PunctuationId::RBrace, "}", PunctuationCategory::Delimiter),
    // Separators
    info(PunctuationId::Semi, ";", PunctuationCategory::Separator),
    info(PunctuationId::Comma, ",", PunctuationCategory::Separator),
    info(PunctuationId::Colon, ":", PunctuationCategory::Separator),
    // Access
    info(PunctuationId::ColonColon, "::", PunctuationCategory::Access),
    info(PunctuationId::Dot, ".", PunctuationCategory::Access),
    info(PunctuationId::Arrow, "->", PunctuationCategory::Access),
    info(PunctuationId::DotStar, ".*", PunctuationCategory::Access),
    info(PunctuationId::ArrowStar, "->*", PunctuationCategory::Access),
    // Operators
    info(PunctuationId::Tilde, "~", PunctuationCategory::Operator),
    info(PunctuationId::Bang, "!", PunctuationCategory::Operator),
    info(PunctuationId::Plus, "+", PunctuationCategory::Operator),
    info(PunctuationId::Minus, "-", PunctuationCategory::Operator),
    info(PunctuationId::Star, "*", PunctuationCategory::Operator),
    info(PunctuationId::Slash, "/", PunctuationCategory::Operator),
    info(PunctuationId::Percent, "%", PunctuationCategory::Operator),
    info(PunctuationId::Caret, "^", PunctuationCategory::Operator),
    info(PunctuationId::Amp, "&", PunctuationCategory::Operator),
    info(PunctuationId::Pipe, "|", PunctuationCategory::Operator),
    info(PunctuationId::Eq, "=", PunctuationCategory::Operator),
    info(PunctuationId::Lt, "<", PunctuationCategory::Operator),
    info(PunctuationId::Gt, ">", PunctuationCategory::Operator),
    info(PunctuationId::PlusEq, "+=", PunctuationCategory::Operator),
    info(PunctuationId::MinusEq, "-=", PunctuationCategory::Operator),
    info(PunctuationId::StarEq, "*=", PunctuationCategory::Operator),
    info(PunctuationId::SlashEq, "/=", PunctuationCategory::Operator),
    info(PunctuationId::PercentEq, "%=", PunctuationCategory::Operator),
    info(PunctuationId::CaretEq, "^=", PunctuationCategory::Operator),
    info(PunctuationId::AmpEq, "&=", PunctuationCategory::Operator),
    info(PunctuationId::PipeEq, "|=", PunctuationCategory::Operator),
    info(PunctuationId::Shl, "<<", PunctuationCategory::Operator),
    info(PunctuationId::ShlEq, "<<=", PunctuationCategory::Operator),
    info(PunctuationId::EqEq, "==", PunctuationCategory::Operator),
    info(PunctuationId::NotEq, "!=", PunctuationCategory::Operator),
    info(PunctuationId::LtEq, "<=", PunctuationCategory::Operator),
    info(PunctuationId::GtEq, ">=", PunctuationCategory::Operator),
    info(PunctuationId::Spaceship, "<=>", PunctuationCategory::Operator),
    info(PunctuationId::AmpAmp, "&&", PunctuationCategory::Operator),
    info(PunctuationId::PipePipe, "||", PunctuationCategory::Operator),
    info(PunctuationId::PlusPlus, "++", PunctuationCategory::Operator),
    info(PunctuationId::MinusMinus, "--", PunctuationCategory::Operator),
    // Markers
    info(PunctuationId::Question, "?", PunctuationCategory::Marker),
    info(PunctuationId::Hash, "#", PunctuationCategory::Marker),
    info(PunctuationId::HashHash, "##", PunctuationCategory::Marker),
    info(PunctuationId::Ellipsis, "...", PunctuationCategory::Marker),
];

/// Longest spelling in [`PUNCTUATION`], in bytes.
const MAX_SPELLING_LEN: usize = 3;

/// Return the canonical spelling for a punctuation token.
pub fn as_str(id: PunctuationId) -> &'static str {
    info_for(id).canonical
}

/// Return the category for a punctuation token.
pub fn category(id: PunctuationId) -> PunctuationCategory {
    info_for(id).category
}

/// Return the full metadata entry for a punctuation token.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: PunctuationId) -> &'static PunctuationInfo {
    PUNCTUATION
        .iter()
        .find(|p| p.id == id)
        .expect("INVARIANT: every PunctuationId has a registry entry")
}

/// Resolve a punctuation spelling to its identifier.
pub fn from_str(s: &str) -> Option<PunctuationId> {
    PUNCTUATION.iter().find(|p| p.canonical == s).map(|p| p.id)
}

/// Find the longest punctuator at the start of `input`.
///
/// Returns the matched id and its length in bytes.
pub fn longest_prefix(input: &str) -> Option<(PunctuationId, usize)> {
    let limit = MAX_SPELLING_LEN.min(input.len());
    (1..=limit).rev().find_map(|len| {
        let candidate = input.get(..len)?;
        from_str(candidate).map(|id| (id, len))
    })
}

const fn info(id: PunctuationId, canonical: &'static str, category: PunctuationCategory) -> PunctuationInfo {
    PunctuationInfo { id, canonical, category }
}
