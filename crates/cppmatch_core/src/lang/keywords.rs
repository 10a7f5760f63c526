//! Reserved C++ keyword vocabulary.
//!
//! A stable identifier ([`KeywordId`]) plus a const metadata table ([`KEYWORDS`]) that records the
//! spelling and a coarse category for each keyword the declaration parser cares about.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - Keywords that only appear inside function bodies are still registered so that the lexer
//!   classifies them consistently; the parser treats bodies as opaque brace groups.
//!
//! ## Examples
//! ```rust
//! use cppmatch_core::lang::keywords::{self, KeywordCategory, KeywordId};
//!
//! assert_eq!(keywords::from_str("struct"), Some(KeywordId::Struct));
//! assert_eq!(keywords::category(KeywordId::Unsigned), KeywordCategory::FundamentalType);
//! assert_eq!(keywords::from_str("Struct"), None);
//! ```

/// Stable identifier for every registered keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordId {
    // Type definitions / scopes
    Class,
    Struct,
    Union,
    Enum,
    Typedef,
    Using,
    Namespace,
    Template,
    Typename,

    // Access
    Public,
    Protected,
    Private,

    // Declaration specifiers
    Virtual,
    Static,
    Inline,
    Const,
    Volatile,
    Mutable,
    Explicit,
    Friend,
    Extern,
    Constexpr,
    Register,
    ThreadLocal,
    Operator,
    Noexcept,

    // Fundamental types
    Void,
    Bool,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Signed,
    Unsigned,
    Auto,
    WcharT,

    // Statements (bodies only)
    Return,
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Break,
    Continue,
    Goto,
    Try,
    Catch,
    Throw,

    // Expressions
    New,
    Delete,
    This,
    Sizeof,
    Decltype,
    StaticAssert,
    Nullptr,
    True,
    False,
}

/// Coarse grouping for tooling and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Introduces a type, scope or alias (`class`, `namespace`, `typedef`).
    TypeDefinition,
    /// Access specifier (`public`, `protected`, `private`).
    Access,
    /// Declaration specifier or qualifier (`static`, `const`, `virtual`).
    Specifier,
    /// Builtin type spelling (`int`, `unsigned`, `void`).
    FundamentalType,
    /// Statement keyword, only meaningful inside bodies.
    Statement,
    /// Expression keyword or literal.
    Expression,
}

/// Metadata for a keyword.
#[derive(Debug, Clone, Copy)]
pub struct KeywordInfo {
    pub id: KeywordId,
    pub canonical: &'static str,
    pub category: KeywordCategory,
}

/// Registry of all keywords.
///
/// ## Notes
/// - The ordering is not semantically meaningful, but is grouped for readability.
pub const KEYWORDS: &[KeywordInfo] = &[
    // Type definitions / scopes
    info(KeywordId::Class, "class", KeywordCategory::TypeDefinition),
    info(KeywordId::Struct, "struct", KeywordCategory::TypeDefinition),
    info(KeywordId::Union, "union", KeywordCategory::TypeDefinition),
    info(KeywordId::Enum, "enum", KeywordCategory::TypeDefinition),
    info(KeywordId::Typedef, "typedef", KeywordCategory::TypeDefinition),
    info(KeywordId::Using, "using", KeywordCategory::TypeDefinition),
    info(KeywordId::Namespace, "namespace", KeywordCategory::TypeDefinition),
    info(KeywordId::Template, "template", KeywordCategory::TypeDefinition),
    info(KeywordId::Typename, "typename", KeywordCategory::TypeDefinition),
    // Access
    info(KeywordId::Public, "public", KeywordCategory::Access),
    info(KeywordId::Protected, "protected", KeywordCategory::Access),
    info(KeywordId::Private, "private", KeywordCategory::Access),
    // Declaration specifiers
    info(KeywordId::Virtual, "virtual", KeywordCategory::Specifier),
    info(KeywordId::Static, "static", KeywordCategory::Specifier),
    info(KeywordId::Inline, "inline", KeywordCategory::Specifier),
    info(KeywordId::Const, "const", KeywordCategory::Specifier),
    info(KeywordId::Volatile, "volatile", KeywordCategory::Specifier),
    info(KeywordId::Mutable, "mutable", KeywordCategory::Specifier),
    info(KeywordId::Explicit, "explicit", KeywordCategory::Specifier),
    info(KeywordId::Friend, "friend", KeywordCategory::Specifier),
    info(KeywordId::Extern, "extern", KeywordCategory::Specifier),
    info(KeywordId::Constexpr, "constexpr", KeywordCategory::Specifier),
    info(KeywordId::Register, "register", KeywordCategory::Specifier),
    info(KeywordId::ThreadLocal, "thread_local", KeywordCategory::Specifier),
    info(KeywordId::Operator, "operator", KeywordCategory::Specifier),
    info(KeywordId::Noexcept, "noexcept", KeywordCategory::Specifier),
    // Fundamental types
    info(KeywordId::Void, "void", KeywordCategory::FundamentalType),
    info(KeywordId::Bool, "bool", KeywordCategory::FundamentalType),
    info(KeywordId::Char, "char", KeywordCategory::FundamentalType),
    info(KeywordId::Short, "short", KeywordCategory::FundamentalType),
    info(KeywordId::Int, "int", KeywordCategory::FundamentalType),
    info(KeywordId::Long, "long", KeywordCategory::FundamentalType),
    info(KeywordId::Float, "float", KeywordCategory::FundamentalType),
    info(KeywordId::Double, "double", KeywordCategory::FundamentalType),
    info(KeywordId::Signed, "signed", KeywordCategory::FundamentalType),
    info(KeywordId::Unsigned, "unsigned", KeywordCategory::FundamentalType),
    info(KeywordId::Auto, "auto", KeywordCategory::FundamentalType),
    info(KeywordId::WcharT, "wchar_t", KeywordCategory::FundamentalType),
    // Statements
    info(KeywordId::Return, "return", KeywordCategory::Statement),
    info(KeywordId::If, "if", KeywordCategory::Statement),
    info(KeywordId::Else, "else", KeywordCategory::Statement),
    info(KeywordId::For, "for", KeywordCategory::Statement),
    info(KeywordId::While, "while", KeywordCategory::Statement),
    info(KeywordId::Do, "do", KeywordCategory::Statement),
    info(KeywordId::Switch, "switch", KeywordCategory::Statement),
    info(KeywordId::Case, "case", KeywordCategory::Statement),
    info(KeywordId::Default, "default", KeywordCategory::Statement),
    info(KeywordId::Break, "break", KeywordCategory::Statement),
    info(KeywordId::Continue, "continue", KeywordCategory::Statement),
    info(KeywordId::Goto, "goto", KeywordCategory::Statement),
    info(KeywordId::Try, "try", KeywordCategory::Statement),
    info(KeywordId::Catch, "catch", KeywordCategory::Statement),
    info(KeywordId::Throw, "throw", KeywordCategory::Statement),
    // Expressions
    info(KeywordId::New, "new", KeywordCategory::Expression),
    info(KeywordId::Delete, "delete", KeywordCategory::Expression),
    info(KeywordId::This, "this", KeywordCategory::Expression),
    info(KeywordId::Sizeof, "sizeof", KeywordCategory::Expression),
    info(KeywordId::Decltype, "decltype", KeywordCategory::Expression),
    info(KeywordId::StaticAssert, "static_assert", KeywordCategory::Expression),
    info(KeywordId::Nullptr, "nullptr", KeywordCategory::Expression),
    info(KeywordId::True, "true", KeywordCategory::Expression),
    info(KeywordId::False, "false", KeywordCategory::Expression),
];

/// Return the canonical spelling for a keyword.
pub fn as_str(id: KeywordId) -> &'static str {
    info_for(id).canonical
}

/// Return the category for a keyword.
pub fn category(id: KeywordId) -> KeywordCategory {
    info_for(id).category
}

/// Return the full metadata entry for a keyword.
///
/// ## Panics
/// - If the registry is missing an entry for `id` (this indicates a programming error).
pub fn info_for(id: KeywordId) -> &'static KeywordInfo {
    KEYWORDS
        .iter()
        .find(|k| k.id == id)
        .expect("INVARIANT: every KeywordId has a registry entry")
}

/// Resolve an identifier spelling to a keyword id, if reserved.
pub fn from_str(s: &str) -> Option<KeywordId> {
    KEYWORDS.iter().find(|k| k.canonical == s).map(|k| k.id)
}

/// Return `true` if the keyword can appear inside a type name (`unsigned long`, `const char`).
pub fn is_type_keyword(id: KeywordId) -> bool {
    matches!(category(id), KeywordCategory::FundamentalType)
        || matches!(id, KeywordId::Const | KeywordId::Volatile | KeywordId::Typename)
}

const fn info(id: KeywordId, canonical: &'static str, category: KeywordCategory) -> KeywordInfo {
    KeywordInfo { id, canonical, category }
}
