//! Property-based tests for cppmatch
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use cppmatch::ast::{FileId, FileRole};
use cppmatch::config::MatchConfig;
use cppmatch::lexer::{self, TokenKind};
use cppmatch::matcher::merge;
use cppmatch::pipeline::{number_files, parse_all};
use proptest::prelude::*;

// =============================================================================
// Lexer Properties
// =============================================================================

#[cfg(test)]
mod lexer_tests {
    use super::*;

    proptest! {
        /// Property: lexing never fails and always ends with `Eof`
        #[test]
        fn lexing_is_total(source in any::<String>()) {
            let lexed = lexer::lex(&source);
            prop_assert_eq!(lexed.tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
        }

        /// Property: token spans are ordered, disjoint and inside the source
        #[test]
        fn token_spans_are_ordered(source in "[ -~\\r\\n\\t]{0,200}") {
            let lexed = lexer::lex(&source);
            let mut previous_end = 0;
            for tok in &lexed.tokens {
                prop_assert!(tok.span.start >= previous_end);
                prop_assert!(tok.span.end <= source.len());
                prop_assert!(source.is_char_boundary(tok.span.start));
                previous_end = tok.span.end;
            }
        }
    }
}

// =============================================================================
// Parser Properties
// =============================================================================

#[cfg(test)]
mod parser_tests {
    use super::*;

    proptest! {
        /// Property: parsing arbitrary text never panics and is deterministic
        #[test]
        fn parsing_is_total_and_deterministic(source in "[ -~\\r\\n]{0,300}") {
            let first = cppmatch_syntax::parse_file(FileId(0), "gen.cpp", source.as_str(), FileRole::Implementation);
            let second = cppmatch_syntax::parse_file(FileId(0), "gen.cpp", source.as_str(), FileRole::Implementation);
            prop_assert_eq!(&first, &second);
            for decl in &first.declarations {
                prop_assert!(decl.span.end <= source.len());
            }
        }

        /// Property: C++-looking fragments with unbalanced delimiters still parse
        #[test]
        fn fragments_parse_without_panic(
            parts in prop::collection::vec(
                prop::sample::select(vec![
                    "class", "struct", "C", "::", "(", ")", "{", "}", ";", "const", "int", "&", "*",
                    "=", "0", ",", "public:", "#region X\n", "#endregion\n", "// c\n", "/* b */",
                    "virtual", "~", "operator", "<", ">", "\"s\"", "static",
                ]),
                0..60,
            )
        ) {
            let source = parts.join(" ");
            let set = cppmatch_syntax::parse_file(FileId(0), "frag.h", source.as_str(), FileRole::Header);
            prop_assert!(set.declarations.iter().all(|d| d.span.end <= source.len()));
        }
    }
}

// =============================================================================
// Matcher Properties
// =============================================================================

#[cfg(test)]
mod matcher_tests {
    use super::*;

    fn method_names() -> impl Strategy<Value = Vec<String>> {
        prop::collection::btree_set("[A-Z][a-zA-Z0-9]{0,8}", 1..6)
            .prop_map(|names| names.into_iter().map(|n| format!("Method{n}")).collect())
    }

    fn param_types() -> impl Strategy<Value = Vec<&'static str>> {
        prop::collection::vec(
            prop::sample::select(vec!["int", "const CString&", "CAgrMT*", "const agrint &", "bool", "double*"]),
            0..4,
        )
    }

    fn spaced(ty: &str, pad: usize) -> String {
        ty.replace(' ', &" ".repeat(pad + 1))
    }

    proptest! {
        /// Property: a header and a source that agree on signatures merge without orphans
        #[test]
        fn matching_signatures_have_no_orphans(
            names in method_names(),
            params in param_types(),
            pad in 0usize..3,
        ) {
            let header_params = params.join(", ");
            let source_params = params
                .iter()
                .enumerate()
                .map(|(i, ty)| format!("{} p{i}", spaced(ty, pad)))
                .collect::<Vec<_>>()
                .join(",\n    ");

            let mut header = String::from("class CGen\n{\npublic:\n");
            let mut source = String::from("#include \"CGen.h\"\n\n");
            for name in &names {
                header.push_str(&format!("    bool {name}({header_params});\n"));
                source.push_str(&format!("bool CGen::{name}({source_params})\n{{\n    return true;\n}}\n\n"));
            }
            header.push_str("};\n");

            let files = number_files([("CGen.h", header), ("CGen.cpp", source)]);
            let config = MatchConfig::default();
            let sets = parse_all(&files, &config);
            let (model, report) = merge(&sets, &config);

            prop_assert_eq!(model.entries.len(), names.len());
            prop_assert!(model.entries.iter().all(|e| e.declaration.is_some() && e.implementations.len() == 1));
            prop_assert!(report.is_clean(), "{:?}", report);
        }

        /// Property: the merged report does not depend on file order
        #[test]
        fn merge_is_independent_of_file_order(names in method_names(), reversed in any::<bool>()) {
            let header = format!(
                "class CGen {{\npublic:\n{}}};\n",
                names.iter().map(|n| format!("    void {n}(int);\n")).collect::<String>()
            );
            // Only every other method is implemented; the rest are orphan declarations.
            let source: String = names
                .iter()
                .step_by(2)
                .map(|n| format!("void CGen::{n}(int v) {{ }}\n"))
                .collect();

            let mut inputs = vec![("CGen.h", header), ("CGen.cpp", source)];
            let config = MatchConfig::default();
            let baseline = {
                let files = number_files(inputs.clone());
                let sets = parse_all(&files, &config);
                let (_, report) = merge(&sets, &config);
                report
                    .orphan_declarations
                    .iter()
                    .map(|f| f.subject.clone())
                    .collect::<Vec<_>>()
            };
            if reversed {
                inputs.reverse();
            }
            let files = number_files(inputs);
            let sets = parse_all(&files, &config);
            let (_, report) = merge(&sets, &config);
            let orphans: Vec<_> = report.orphan_declarations.iter().map(|f| f.subject.clone()).collect();

            prop_assert_eq!(orphans.len(), names.len() / 2);
            prop_assert_eq!(orphans, baseline);
        }
    }
}
