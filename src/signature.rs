//! Signature normalization.
//!
//! A [`SignatureKey`] is the identity of a method across files: owner, name, the ordered list of
//! normalized parameter types and the `const` flag. Parameter names, default values and comments
//! never take part, so a header prototype and its out-of-class definition produce equal keys.
//!
//! Type text is normalized token by token (through the same lexer that parses the files):
//! - comments are dropped and whitespace collapsed;
//! - symbols are glued to their neighbours (`const T &` → `const T&`, `std :: string` → `std::string`);
//! - adjacent words keep one space (`unsigned long`);
//! - east-const is moved west (`T const&` → `const T&`).
//!
//! Semantic qualifiers are never stripped: `const T&` and `T` stay distinct.

use std::fmt;

use cppmatch_core::lang::keywords::KeywordId;
use cppmatch_core::lang::punctuation::PunctuationId;
use cppmatch_syntax::ast::{Declaration, MethodDecl};
use cppmatch_syntax::lexer::{self, TokenKind};
use serde::Serialize;

/// Identity of a method or free function.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SignatureKey {
    /// Normalized owner (`CSample`, `Outer::Inner`); `None` for free functions.
    pub owner: Option<String>,
    pub name: String,
    /// Normalized parameter types, in order.
    pub params: Vec<String>,
    pub is_const: bool,
}

impl SignatureKey {
    /// `Owner::Name` without the parameter list.
    pub fn qualified_name(&self) -> String {
        match &self.owner {
            Some(owner) => format!("{owner}::{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn is_free_function(&self) -> bool {
        self.owner.is_none()
    }
}

impl fmt::Display for SignatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.qualified_name(), self.params.join(","))?;
        if self.is_const {
            write!(f, " const")?;
        }
        Ok(())
    }
}

/// Compute the signature key of a method declaration.
pub fn normalize(decl: &Declaration, method: &MethodDecl) -> SignatureKey {
    let mut params: Vec<String> = method.params.iter().map(|p| normalize_type(&p.ty)).collect();
    if params.len() == 1 && params[0] == "void" {
        params.clear();
    }
    SignatureKey {
        owner: decl
            .owner
            .as_deref()
            .map(|o| normalize_type(o).trim_start_matches("::").to_string())
            .filter(|o| !o.is_empty()),
        name: normalize_type(&decl.name),
        params,
        is_const: method.qualifiers.is_const,
    }
}

/// Normalize raw type text into its canonical spelling.
pub fn normalize_type(raw: &str) -> String {
    let lexed = lexer::lex(raw);
    let mut pieces: Vec<Piece> = lexed
        .tokens
        .iter()
        .filter(|t| !t.kind.is_trivia() && !matches!(t.kind, TokenKind::Eof))
        .map(|t| Piece {
            text: t.kind.spelling().into_owned(),
            is_word: matches!(t.kind, TokenKind::Keyword(_) | TokenKind::Ident(_) | TokenKind::Number(_)),
            is_const: t.kind.is_keyword(KeywordId::Const),
            is_indirection: matches!(
                t.kind.punctuation_id(),
                Some(PunctuationId::Star | PunctuationId::Amp | PunctuationId::AmpAmp)
            ),
        })
        .collect();

    west_const(&mut pieces);

    let mut out = String::with_capacity(raw.len());
    let mut prev_word = false;
    let mut prev_indirection = false;
    for piece in &pieces {
        // `char* const`: a word after `*`/`&` keeps one space so cv-qualified pointers read apart.
        if piece.is_word && (prev_word || prev_indirection) {
            out.push(' ');
        }
        out.push_str(&piece.text);
        prev_word = piece.is_word;
        prev_indirection = piece.is_indirection;
    }
    out
}

struct Piece {
    text: String,
    is_word: bool,
    is_const: bool,
    is_indirection: bool,
}

/// Move a `const` that directly follows the base type to the front.
///
/// Only the first `const` before any `*`/`&` is moved; `T* const` is a different type and stays.
fn west_const(pieces: &mut Vec<Piece>) {
    let Some(at) = pieces.iter().position(|p| p.is_const || p.is_indirection) else {
        return;
    };
    if at == 0 || !pieces[at].is_const {
        return;
    }
    let moved = pieces.remove(at);
    if pieces.first().is_some_and(|p| p.is_const) {
        return;
    }
    pieces.insert(0, moved);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cppmatch_syntax::ast::{FileId, FileRole};
    use cppmatch_syntax::parse_file;
    use proptest::prelude::*;

    fn keys(src: &str) -> Vec<SignatureKey> {
        let set = parse_file(FileId(0), "t.cpp", src, FileRole::Implementation);
        set.methods().into_iter().map(|(d, m)| normalize(d, m)).collect()
    }

    #[test]
    fn test_normalize_type_spacing() {
        assert_eq!(normalize_type("const  TDimValue &"), "const TDimValue&");
        assert_eq!(normalize_type("std :: vector < int >"), "std::vector<int>");
        assert_eq!(normalize_type("std::map<int, std::vector<int>>"), "std::map<int,std::vector<int>>");
        assert_eq!(normalize_type("unsigned   long\tint"), "unsigned long int");
        assert_eq!(normalize_type("char * *"), "char**");
        assert_eq!(normalize_type("int [ 4 ]"), "int[4]");
        assert_eq!(normalize_type("void (*)(int)"), "void(*)(int)");
    }

    #[test]
    fn test_normalize_type_drops_comments() {
        assert_eq!(normalize_type("const /* in */ agrint& // tail"), "const agrint&");
    }

    #[test]
    fn test_word_after_indirection_keeps_one_space() {
        assert_eq!(normalize_type("char *const"), "char* const");
        assert_eq!(normalize_type("char*   const"), "char* const");
        assert_eq!(normalize_type("CAgrMT * volatile *"), "CAgrMT* volatile*");
        assert_eq!(normalize_type("const agrint &"), "const agrint&");
    }

    #[test]
    fn test_east_const_moves_west() {
        assert_eq!(normalize_type("TDimValue const &"), "const TDimValue&");
        assert_eq!(normalize_type("char const*"), "const char*");
        assert_eq!(normalize_type("const char* const"), "const char* const");
        assert_eq!(normalize_type("char* const"), "char* const");
        assert_eq!(normalize_type("const int const"), "const int const");
    }

    #[test]
    fn test_qualifiers_are_kept() {
        assert_ne!(normalize_type("const agrint&"), normalize_type("agrint"));
        assert_ne!(normalize_type("agrint&"), normalize_type("agrint&&"));
    }

    #[test]
    fn test_header_and_source_signatures_match() {
        let header = keys(
            "class CSample { public:\n  bool MethodP1(const TDimValue&, const agrint&, const agrint&=0, bool=false);\n};",
        );
        let source = keys(
            "bool CSample::MethodP1(const TDimValue& dimPd, const agrint& lLimitHorizon, const agrint& iValue, bool bError)\n{\n  return true;\n}",
        );
        assert_eq!(header, source);
        assert_eq!(
            header[0].to_string(),
            "CSample::MethodP1(const TDimValue&,const agrint&,const agrint&,bool)"
        );
    }

    #[test]
    fn test_namespaced_class_and_qualified_definition_match() {
        let header = keys("namespace N { class C { void F(int); }; }");
        let qualified = keys("void N :: C::F(int v) {}");
        let reopened = keys("namespace N {\nvoid C::F(int v) {}\n}");
        assert_eq!(header[0].owner.as_deref(), Some("N::C"));
        assert_eq!(header, qualified);
        assert_eq!(header, reopened);
        assert_ne!(header, keys("class C { void F(int); };"));
    }

    #[test]
    fn test_overloads_are_distinct() {
        let k = keys(
            "class C {\n  void MethodWithOverloads(const TDimValue& a);\n  void MethodWithOverloads(const TDimValue& a, const agrint& b);\n};",
        );
        assert_eq!(k.len(), 2);
        assert_ne!(k[0], k[1]);
    }

    #[test]
    fn test_void_list_and_const_flag() {
        let k = keys("class C { int Get(void) const; int Get(); };");
        assert_eq!(k[0].params, Vec::<String>::new());
        assert!(k[0].is_const);
        assert!(!k[1].is_const);
        assert_ne!(k[0], k[1]);
        assert_eq!(k[0].to_string(), "C::Get() const");
    }

    #[test]
    fn test_free_function_key() {
        let k = keys("static int helper(int a, char* b) { return a; }");
        assert!(k[0].is_free_function());
        assert_eq!(k[0].to_string(), "helper(int,char*)");
    }

    #[test]
    fn test_operator_names_normalize() {
        let a = keys("class C { bool operator == (const C& o) const; };");
        let b = keys("bool C::operator==(const C &o) const { return true; }");
        assert_eq!(a, b);
    }

    fn type_word() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["int", "agrint", "TDimValue", "char", "bool", "double"])
    }

    proptest! {
        #[test]
        fn prop_whitespace_names_and_defaults_do_not_change_keys(
            types in prop::collection::vec((type_word(), any::<bool>(), any::<bool>()), 0..5),
            pad in prop::sample::select(vec![" ", "  ", "\t", " /* c */ ", "\r\n  "]),
        ) {
            let mut decl_params = Vec::new();
            let mut def_params = Vec::new();
            for (i, (ty, is_const, is_ref)) in types.iter().enumerate() {
                let cst = if *is_const { "const" } else { "" };
                let amp = if *is_ref { "&" } else { "" };
                decl_params.push(format!("{cst} {ty}{amp} = {i}"));
                def_params.push(format!("{pad}{cst}{pad}{ty}{pad}{amp}{pad}arg{i}{pad}"));
            }
            let header = format!("class C {{ void F({}); }};", decl_params.join(", "));
            let source = format!("void C::F({}) {{ }}", def_params.join(","));
            let a = keys(&header);
            let b = keys(&source);
            prop_assert_eq!(a.len(), 1);
            prop_assert_eq!(a, b);
        }
    }
}
