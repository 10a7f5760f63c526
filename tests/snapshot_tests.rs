//! Snapshot tests for the text the CLI prints
//!
//! These tests use insta inline snapshots to catch unexpected changes in the
//! declaration outline and the match summary.
//!
//! To update snapshots after intentional changes:
//!   cargo insta review
//!
//! Or to accept all changes:
//!   cargo insta accept

use cppmatch::config::MatchConfig;
use cppmatch::matcher::merge;
use cppmatch::pipeline::{SourceFile, number_files, parse_all};
use cppmatch::render::{outline, summary};

const SHAPE_H: &str = "\
class CShape : public IShape
{
public:
    CShape();
    virtual ~CShape();
    double Area(const CString & name, int  n = 0) const;
    virtual void Draw() = 0;
protected:
    static agrint s_count;
private:
    int m_sides[4];
};
";

const SHAPE_CPP: &str = "\
#include \"CShape.h\"

agrint CShape::s_count = 0;
agrint CShape::s_missing = 1;

CShape::CShape() { }

CShape::~CShape() { }

double CShape::Area(const CString& label, int n) const
{
    return 0.0;
}

static void Helper(int x)
{
}
";

fn shape_files() -> Vec<SourceFile> {
    number_files([("CShape.h", SHAPE_H), ("CShape.cpp", SHAPE_CPP)])
}

#[test]
fn test_header_outline() {
    let sets = parse_all(&shape_files(), &MatchConfig::default());
    insta::assert_snapshot!(outline(&sets[0]), @r"
    CShape.h (1 declarations)
      class CShape : public IShape
        public CShape::CShape() [decl]
        public CShape::~CShape() [decl]
        public CShape::Area(const CString&,int) const [decl] -> double
        public CShape::Draw() [decl] -> void
        protected field s_count: agrint (static)
        private field m_sides: int[4]
    ");
}

#[test]
fn test_match_summary() {
    let config = MatchConfig::default();
    let sets = parse_all(&shape_files(), &config);
    let (model, report) = merge(&sets, &config);
    insta::assert_snapshot!(summary(sets.len(), &model, &report), @r"
    files: 2
    signatures: 5 (3 matched, 0 inline)
    classes: 1
      CShape: 3/4 methods implemented
    local functions: 1
      Helper(int) [CShape.cpp]
    orphan static definitions: 1
      CShape::s_missing [CShape.cpp]
    0 errors, 1 warnings
    ");
}
