//! Preprocessor-region tracker.
//!
//! Classifies directive tokens into a side list and pairs region and conditional markers into
//! opaque annotated spans. Nothing is ever expanded: `#define` bodies, `#include` targets and
//! conditional expressions are recorded verbatim.
//!
//! ## Notes
//! - `#pragma region` / `#region` may be closed by either `#pragma endregion` or `#endregion`; a
//!   style mismatch still pairs but produces a warning.
//! - A region that is still open when the brace scope it started in closes (or at end of file) is
//!   recorded as unbounded and extends to the closing `}` (or EOF).

use serde::Serialize;

use crate::ast::Span;
use crate::diagnostics::{Diagnostic, errors};
use crate::lexer::{Token, TokenKind};
use cppmatch_core::lang::punctuation::PunctuationId;

/// A classified directive line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub span: Span,
    pub line: u32,
    /// Verbatim directive text, continuations included.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum DirectiveKind {
    Define {
        name: String,
        params: Option<Vec<String>>,
        value: String,
    },
    Undef {
        name: String,
    },
    Include {
        target: String,
        system: bool,
    },
    PragmaOnce,
    RegionStart {
        label: String,
        style: RegionStyle,
    },
    RegionEnd {
        style: RegionStyle,
    },
    Conditional {
        kind: ConditionalKind,
        condition: String,
    },
    Other {
        name: String,
    },
}

/// Spelling family of a region marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionStyle {
    /// `#pragma region` / `#pragma endregion`
    Pragma,
    /// `#region` / `#endregion`
    Hash,
}

impl RegionStyle {
    fn open_spelling(self) -> &'static str {
        match self {
            RegionStyle::Pragma => "#pragma region",
            RegionStyle::Hash => "#region",
        }
    }

    fn close_spelling(self) -> &'static str {
        match self {
            RegionStyle::Pragma => "#pragma endregion",
            RegionStyle::Hash => "#endregion",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionalKind {
    If,
    Ifdef,
    Ifndef,
    Elif,
    Else,
    Endif,
}

/// A paired (or unbounded) region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionMarker {
    pub label: String,
    pub style: RegionStyle,
    /// From the start marker to the end marker (or the end of the enclosing scope).
    pub span: Span,
    /// Span of the start directive.
    pub start: Span,
    /// Span of the end directive, if one was found.
    pub end: Option<Span>,
    pub unbounded: bool,
}

/// An `#if…#endif` block, recorded as an opaque span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionalBlock {
    /// Text of the opening directive (`#ifdef _DEBUG`).
    pub opening: String,
    pub span: Span,
    pub closed: bool,
}

/// Directive side list for one file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Preprocessed {
    pub directives: Vec<Directive>,
    /// Regions ordered by start offset.
    pub regions: Vec<RegionMarker>,
    pub conditionals: Vec<ConditionalBlock>,
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

/// Classify a directive's text (starting at `#`).
pub fn classify(text: &str) -> DirectiveKind {
    let logical = join_continuations(text);
    let body = logical.trim_start().trim_start_matches('#').trim_start();
    let name_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    let (name, rest) = body.split_at(name_len);
    let rest = rest.trim();

    match name {
        "define" => classify_define(rest),
        "undef" => DirectiveKind::Undef {
            name: rest.split_whitespace().next().unwrap_or("").to_string(),
        },
        "include" => classify_include(rest),
        "pragma" => {
            let (word, remainder) = split_word(rest);
            match word {
                "once" => DirectiveKind::PragmaOnce,
                "region" => DirectiveKind::RegionStart {
                    label: remainder.to_string(),
                    style: RegionStyle::Pragma,
                },
                "endregion" => DirectiveKind::RegionEnd {
                    style: RegionStyle::Pragma,
                },
                _ => DirectiveKind::Other {
                    name: "pragma".to_string(),
                },
            }
        }
        "region" => DirectiveKind::RegionStart {
            label: rest.to_string(),
            style: RegionStyle::Hash,
        },
        "endregion" => DirectiveKind::RegionEnd {
            style: RegionStyle::Hash,
        },
        "if" | "ifdef" | "ifndef" | "elif" | "else" | "endif" => {
            let kind = match name {
                "if" => ConditionalKind::If,
                "ifdef" => ConditionalKind::Ifdef,
                "ifndef" => ConditionalKind::Ifndef,
                "elif" => ConditionalKind::Elif,
                "else" => ConditionalKind::Else,
                _ => ConditionalKind::Endif,
            };
            DirectiveKind::Conditional {
                kind,
                condition: rest.to_string(),
            }
        }
        other => DirectiveKind::Other {
            name: other.to_string(),
        },
    }
}

fn join_continuations(text: &str) -> String {
    text.replace("\\\r\n", " ").replace("\\\n", " ")
}

fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim()),
        None => (s, ""),
    }
}

fn classify_define(rest: &str) -> DirectiveKind {
    let name_len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .unwrap_or(rest.len());
    let (name, after) = rest.split_at(name_len);

    // Function-like only when `(` directly follows the name.
    if let Some(params_src) = after.strip_prefix('(') {
        if let Some(close) = params_src.find(')') {
            let params = params_src[..close]
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            return DirectiveKind::Define {
                name: name.to_string(),
                params: Some(params),
                value: params_src[close + 1..].trim().to_string(),
            };
        }
    }

    DirectiveKind::Define {
        name: name.to_string(),
        params: None,
        value: after.trim().to_string(),
    }
}

fn classify_include(rest: &str) -> DirectiveKind {
    let (target, system) = if let Some(inner) = rest.strip_prefix('"') {
        (inner.split('"').next().unwrap_or(inner), false)
    } else if let Some(inner) = rest.strip_prefix('<') {
        (inner.split('>').next().unwrap_or(inner), true)
    } else {
        (rest, false)
    };
    DirectiveKind::Include {
        target: target.to_string(),
        system,
    }
}

struct OpenRegion {
    label: String,
    style: RegionStyle,
    start: Span,
    depth: usize,
}

/// Classify all directives in `tokens` and pair regions and conditionals.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn scan(tokens: &[Token]) -> Preprocessed {
    let mut out = Preprocessed::default();
    let mut open_regions: Vec<OpenRegion> = Vec::new();
    let mut open_conditionals: Vec<(String, Span)> = Vec::new();
    let mut depth = 0usize;

    for token in tokens {
        match &token.kind {
            TokenKind::Directive(text) => {
                let kind = classify(text);
                match &kind {
                    DirectiveKind::RegionStart { label, style } => open_regions.push(OpenRegion {
                        label: label.clone(),
                        style: *style,
                        start: token.span,
                        depth,
                    }),
                    DirectiveKind::RegionEnd { style } => match open_regions.pop() {
                        // Opened in an outer scope: the region stays open and ends up unbounded.
                        Some(open) if open.depth != depth => {
                            out.diagnostics
                                .push(errors::region_end_in_nested_scope(&open.label, token.span));
                            open_regions.push(open);
                        }
                        Some(open) => {
                            if open.style != *style {
                                out.diagnostics.push(errors::region_style_mismatch(
                                    open.style.open_spelling(),
                                    style.close_spelling(),
                                    token.span,
                                ));
                            }
                            out.regions.push(RegionMarker {
                                label: open.label,
                                style: open.style,
                                span: open.start.merge(token.span),
                                start: open.start,
                                end: Some(token.span),
                                unbounded: false,
                            });
                        }
                        None => out.diagnostics.push(errors::orphan_region_end(token.span)),
                    },
                    DirectiveKind::Conditional { kind: cond, .. } => match cond {
                        ConditionalKind::If | ConditionalKind::Ifdef | ConditionalKind::Ifndef => {
                            open_conditionals.push((text.clone(), token.span));
                        }
                        ConditionalKind::Endif => match open_conditionals.pop() {
                            Some((opening, start)) => out.conditionals.push(ConditionalBlock {
                                opening,
                                span: start.merge(token.span),
                                closed: true,
                            }),
                            None => out.diagnostics.push(errors::unmatched_endif(token.span)),
                        },
                        ConditionalKind::Elif | ConditionalKind::Else => {}
                    },
                    _ => {}
                }
                out.directives.push(Directive {
                    kind,
                    span: token.span,
                    line: token.line,
                    text: text.clone(),
                });
            }
            TokenKind::Punctuation(PunctuationId::LBrace) => depth += 1,
            TokenKind::Punctuation(PunctuationId::RBrace) => {
                depth = depth.saturating_sub(1);
                close_unbounded(&mut out, &mut open_regions, depth, token.span.start);
            }
            TokenKind::Eof => {
                close_all(&mut out, &mut open_regions, token.span.start);
                for (opening, start) in open_conditionals.drain(..).rev() {
                    out.diagnostics.push(errors::unclosed_conditional(start));
                    out.conditionals.push(ConditionalBlock {
                        opening,
                        span: Span::new(start.start, token.span.start),
                        closed: false,
                    });
                }
            }
            _ => {}
        }
    }

    out.regions.sort_by_key(|r| r.span.start);
    out.conditionals.sort_by_key(|c| c.span.start);
    tracing::trace!(
        directives = out.directives.len(),
        regions = out.regions.len(),
        "scanned directives"
    );
    out
}

/// Close every region opened deeper than `depth`, extending it to `end`.
fn close_unbounded(out: &mut Preprocessed, open: &mut Vec<OpenRegion>, depth: usize, end: usize) {
    while open.last().is_some_and(|r| r.depth > depth) {
        if let Some(region) = open.pop() {
            push_unbounded(out, region, end);
        }
    }
}

/// At end of file every remaining region is unbounded, whatever its depth.
fn close_all(out: &mut Preprocessed, open: &mut Vec<OpenRegion>, end: usize) {
    while let Some(region) = open.pop() {
        push_unbounded(out, region, end);
    }
}

fn push_unbounded(out: &mut Preprocessed, region: OpenRegion, end: usize) {
    out.diagnostics.push(errors::unclosed_region(&region.label, region.start));
    out.regions.push(RegionMarker {
        label: region.label,
        style: region.style,
        span: Span::new(region.start.start, end.max(region.start.end)),
        start: region.start,
        end: None,
        unbounded: true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::lexer::lex;

    fn scan_str(source: &str) -> Preprocessed {
        scan(&lex(source).tokens)
    }

    #[test]
    fn classify_defines() {
        assert_eq!(
            classify("#define MY_DEFINE3 3"),
            DirectiveKind::Define {
                name: "MY_DEFINE3".into(),
                params: None,
                value: "3".into()
            }
        );
        assert_eq!(
            classify("#define MAX(a, b) ((a) > (b) ? (a) : (b))"),
            DirectiveKind::Define {
                name: "MAX".into(),
                params: Some(vec!["a".into(), "b".into()]),
                value: "((a) > (b) ? (a) : (b))".into()
            }
        );
        assert_eq!(
            classify("#define PAREN (1)"),
            DirectiveKind::Define {
                name: "PAREN".into(),
                params: None,
                value: "(1)".into()
            }
        );
        assert_eq!(
            classify("#  define LONG 1 + \\\n 2"),
            DirectiveKind::Define {
                name: "LONG".into(),
                params: None,
                value: "1 +   2".into()
            }
        );
    }

    #[test]
    fn classify_includes_and_pragmas() {
        assert_eq!(
            classify("#include \"CSample.h\""),
            DirectiveKind::Include {
                target: "CSample.h".into(),
                system: false
            }
        );
        assert_eq!(
            classify("#include <vector>"),
            DirectiveKind::Include {
                target: "vector".into(),
                system: true
            }
        );
        assert_eq!(classify("#pragma once"), DirectiveKind::PragmaOnce);
        assert_eq!(
            classify("#pragma region Just a h-file pragma test"),
            DirectiveKind::RegionStart {
                label: "Just a h-file pragma test".into(),
                style: RegionStyle::Pragma
            }
        );
        assert_eq!(
            classify("#endregion"),
            DirectiveKind::RegionEnd {
                style: RegionStyle::Hash
            }
        );
        assert_eq!(
            classify("#pragma warning(disable: 4996)"),
            DirectiveKind::Other { name: "pragma".into() }
        );
    }

    #[test]
    fn pairs_regions_of_same_style() {
        let pre = scan_str("#region A\nint a;\n#endregion\n");
        assert_eq!(pre.regions.len(), 1);
        assert_eq!(pre.regions[0].label, "A");
        assert!(!pre.regions[0].unbounded);
        assert!(pre.diagnostics.is_empty());
    }

    #[test]
    fn mismatched_styles_pair_with_warning() {
        let pre = scan_str("#region Methods\nvoid f();\n#pragma endregion");
        assert_eq!(pre.regions.len(), 1);
        assert_eq!(pre.diagnostics.len(), 1);
        assert_eq!(pre.diagnostics[0].kind, DiagnosticKind::Region);
    }

    #[test]
    fn orphan_end_produces_no_region() {
        let pre = scan_str("#endregion\n");
        assert!(pre.regions.is_empty());
        assert_eq!(pre.diagnostics.len(), 1);
    }

    #[test]
    fn region_left_open_in_class_ends_at_closing_brace() {
        let src = "class A {\n#pragma region Fields\n int a;\n};\nint b;\n";
        let pre = scan_str(src);
        assert_eq!(pre.regions.len(), 1);
        let region = &pre.regions[0];
        assert!(region.unbounded);
        assert_eq!(region.span.end, src.find('}').unwrap_or_default());
        assert_eq!(pre.diagnostics.len(), 1);
    }

    #[test]
    fn region_left_open_at_file_scope_ends_at_eof() {
        let src = "#region Tail\nint a;\n";
        let pre = scan_str(src);
        assert!(pre.regions[0].unbounded);
        assert_eq!(pre.regions[0].span.end, src.len());
    }

    #[test]
    fn end_marker_in_nested_scope_leaves_region_unbounded() {
        let src = "#pragma region Outer\nclass C {\n#pragma endregion\n void F();\n};\n";
        let pre = scan_str(src);
        assert_eq!(pre.regions.len(), 1);
        let region = &pre.regions[0];
        assert_eq!(region.label, "Outer");
        assert!(region.unbounded);
        assert_eq!(region.end, None);
        assert_eq!(region.span.end, src.len());
        // One warning for the misplaced end marker, one for the region never being closed.
        assert_eq!(pre.diagnostics.len(), 2);
        assert!(pre.diagnostics.iter().all(|d| d.kind == DiagnosticKind::Region));
        assert!(pre.diagnostics[0].message.contains("nested scope"));
    }

    #[test]
    fn region_closed_in_its_own_scope_still_pairs() {
        let pre = scan_str("class C {\n#pragma region Inner\n void F();\n#pragma endregion\n};\n");
        assert_eq!(pre.regions.len(), 1);
        assert!(!pre.regions[0].unbounded);
        assert!(pre.diagnostics.is_empty());
    }

    #[test]
    fn conditionals_are_paired() {
        let pre = scan_str("#ifdef _DEBUG\nint a;\n#else\nint b;\n#endif\n#endif\n#if X\n");
        assert_eq!(pre.conditionals.len(), 2);
        assert!(pre.conditionals[0].closed);
        assert_eq!(pre.conditionals[0].opening, "#ifdef _DEBUG");
        assert!(!pre.conditionals[1].closed);
        assert_eq!(pre.diagnostics.len(), 2);
    }
}
