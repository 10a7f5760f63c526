//! File pipeline: parse many files in parallel, then merge.
//!
//! Per-file lexing and parsing share no state, so [`parse_all`] fans out over a rayon pool and
//! collects the results back in input order. The merge itself runs once every file is parsed.

use std::sync::Arc;

use cppmatch_syntax::ast::{FileDeclarationSet, FileId};
use cppmatch_syntax::parse_file;
use rayon::prelude::*;

use crate::config::MatchConfig;

/// One input file: caller-assigned id, display name and full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: FileId,
    pub name: String,
    pub text: Arc<str>,
}

impl SourceFile {
    pub fn new(id: FileId, name: impl Into<String>, text: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Number files `0..n` in the given order.
pub fn number_files<I, N, T>(files: I) -> Vec<SourceFile>
where
    I: IntoIterator<Item = (N, T)>,
    N: Into<String>,
    T: Into<Arc<str>>,
{
    files
        .into_iter()
        .enumerate()
        .map(|(i, (name, text))| SourceFile::new(FileId(i as u32), name, text))
        .collect()
}

/// Parse every file, in parallel, returning the sets in input order.
///
/// The role of each file comes from [`MatchConfig::role_for`].
#[tracing::instrument(skip_all, fields(files = files.len()))]
pub fn parse_all(files: &[SourceFile], config: &MatchConfig) -> Vec<FileDeclarationSet> {
    files
        .par_iter()
        .map(|file| {
            let role = config.role_for(&file.name);
            let set = parse_file(file.id, &file.name, Arc::clone(&file.text), role);
            if set.has_errors() {
                tracing::warn!(
                    file = %file.name,
                    errors = set.diagnostics.iter().filter(|d| d.is_error()).count(),
                    "file parsed with errors"
                );
            }
            set
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::merge;
    use cppmatch_syntax::ast::FileRole;

    #[test]
    fn test_parse_all_keeps_input_order_and_roles() {
        let files = number_files((0..16).map(|i| {
            let name = if i % 2 == 0 { format!("f{i}.h") } else { format!("f{i}.cpp") };
            (name, format!("class C{i} {{ public: void M{i}(); }};"))
        }));
        let sets = parse_all(&files, &MatchConfig::default());

        assert_eq!(sets.len(), 16);
        for (i, set) in sets.iter().enumerate() {
            assert_eq!(set.file, FileId(i as u32));
            assert_eq!(set.declarations[0].name, format!("C{i}"));
            let expected = if i % 2 == 0 { FileRole::Header } else { FileRole::Implementation };
            assert_eq!(set.role, expected);
        }
    }

    #[test]
    fn test_parallel_parse_matches_sequential_parse() {
        let files = number_files([
            ("a.h", "class A { public: int F(int x = 0) const; };"),
            ("a.cpp", "int A::F(int value) const { return value; }"),
        ]);
        let sets = parse_all(&files, &MatchConfig::default());
        let sequential: Vec<_> = files
            .iter()
            .map(|f| parse_file(f.id, &f.name, Arc::clone(&f.text), MatchConfig::default().role_for(&f.name)))
            .collect();
        assert_eq!(sets, sequential);

        let (model, report) = merge(&sets, &MatchConfig::default());
        assert_eq!(model.entries.len(), 1);
        assert!(report.is_clean());
    }
}
