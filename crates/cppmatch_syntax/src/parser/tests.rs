#[cfg(test)]
/// Parser unit tests.
///
/// These tests cover the declaration forms found in MFC-style header/implementation pairs and
/// the parser's recovery behavior (one damaged declaration never hides its neighbours).
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::lexer;

    fn parse_str(source: &str) -> ParsedFile {
        let tokens = lexer::lex(source).tokens;
        parse(&tokens)
    }

    fn text(source: &str, span: Span) -> &str {
        &source[span.start..span.end]
    }

    fn class_named<'a>(parsed: &'a ParsedFile, name: &str) -> &'a ClassDecl {
        parsed
            .declarations
            .iter()
            .find(|d| d.name == name && d.as_class().is_some())
            .and_then(Declaration::as_class)
            .unwrap_or_else(|| panic!("class `{name}` not found in {:#?}", parsed.declarations))
    }

    fn member<'a>(class: &'a ClassDecl, name: &str) -> (&'a Declaration, &'a MethodDecl) {
        class
            .methods()
            .find(|(d, _)| d.name == name)
            .unwrap_or_else(|| panic!("method `{name}` not found"))
    }

    #[test]
    fn test_inline_method_has_body_and_owner() {
        let parsed = parse_str("class CSample { public: bool MethodTwo() { return cValue1 == cValue2; } };");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let class = class_named(&parsed, "CSample");
        let (decl, method) = member(class, "MethodTwo");
        assert_eq!(decl.owner.as_deref(), Some("CSample"));
        assert_eq!(decl.visibility, Visibility::Public);
        assert_eq!(method.return_type.as_deref(), Some("bool"));
        assert!(method.is_implementation());
        assert!(!method.out_of_class);
    }

    #[test]
    fn test_redundant_class_qualifier_inside_body_is_dropped() {
        let source = "class CSample {\n    bool CSample::MethodPrivInl2(const TDimValue& dimPd, const agrint& lLimitHorizon, const agrint& iValue=0, bool bError=false)\n    { return true; }\n};";
        let parsed = parse_str(source);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let class = class_named(&parsed, "CSample");
        let (decl, method) = member(class, "MethodPrivInl2");
        assert_eq!(decl.owner.as_deref(), Some("CSample"));
        assert_eq!(decl.visibility, Visibility::Private);
        assert!(!method.out_of_class);
        assert_eq!(method.params.len(), 4);
        assert_eq!(method.params[2].ty, "const agrint&");
        assert_eq!(method.params[2].name.as_deref(), Some("iValue"));
        assert_eq!(text(source, method.params[2].default.unwrap()), "0");
        assert_eq!(method.params[3].ty, "bool");
        assert_eq!(text(source, method.params[3].default.unwrap()), "false");
    }

    #[test]
    fn test_mismatched_member_qualifier_warns() {
        let parsed = parse_str("class A { void B::f(); };");
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].severity, Severity::Warning);
        let (decl, _) = member(class_named(&parsed, "A"), "f");
        assert_eq!(decl.owner.as_deref(), Some("A"));
    }

    #[test]
    fn test_out_of_class_constructor_and_destructor() {
        let parsed = parse_str("CSample::CSample()\n{\n    m_value1 = 0;\n};\n\nCSample::~CSample()\n{\n};\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        assert_eq!(parsed.declarations.len(), 2);

        let ctor = &parsed.declarations[0];
        let ctor_method = ctor.as_method().unwrap();
        assert_eq!(ctor.name, "CSample");
        assert_eq!(ctor.owner.as_deref(), Some("CSample"));
        assert_eq!(ctor_method.kind, MethodKind::Constructor);
        assert_eq!(ctor_method.return_type, None);
        assert!(ctor_method.out_of_class);

        let dtor = &parsed.declarations[1];
        assert_eq!(dtor.name, "~CSample");
        assert_eq!(dtor.as_method().unwrap().kind, MethodKind::Destructor);
    }

    #[test]
    fn test_nested_owner_and_template_owner() {
        let parsed = parse_str("void A::B::f(int x) {}\ntemplate <class T> T Box<T>::get() const { return v; }");
        assert_eq!(parsed.declarations[0].owner.as_deref(), Some("A::B"));
        let get = &parsed.declarations[1];
        assert_eq!(get.owner.as_deref(), Some("Box"));
        let method = get.as_method().unwrap();
        assert!(method.is_template);
        assert!(method.qualifiers.is_const);
        assert_eq!(method.return_type.as_deref(), Some("T"));
    }

    #[test]
    fn test_overload_indices_count_per_owner_in_source_order() {
        let parsed = parse_str(
            "class C {\n  bool M(const T& a);\n  bool M(const T& a, const agrint& b);\n  void N();\n};\nbool C::M(const T& a) { return true; }",
        );
        let class = class_named(&parsed, "C");
        let indices: Vec<u32> = class
            .methods()
            .filter(|(d, _)| d.name == "M")
            .map(|(_, m)| m.overload_index)
            .collect();
        assert_eq!(indices, vec![0, 1]);
        assert_eq!(member(class, "N").1.overload_index, 0);
        assert_eq!(parsed.declarations[1].as_method().unwrap().overload_index, 2);
    }

    #[test]
    fn test_default_value_kept_as_raw_span() {
        let source = "class C { int F(const TDimValue& dim1, bool bFlag, const CString& cPar = _T(\"xyz\")) { return 200; } };";
        let parsed = parse_str(source);
        let (_, method) = member(class_named(&parsed, "C"), "F");
        assert_eq!(method.params.len(), 3);
        assert_eq!(method.params[2].ty, "const CString&");
        assert_eq!(text(source, method.params[2].default.unwrap()), "_T(\"xyz\")");
        assert_eq!(method.params[0].default, None);
    }

    #[test]
    fn test_unnamed_parameters_and_void_list() {
        let parsed = parse_str("bool MethodP1(const TDimValue&, const agrint&, const agrint& = 0, bool = false);\nint g(void);\nint h(unsigned long, CString);");
        let p1 = parsed.declarations[0].as_method().unwrap();
        let types: Vec<&str> = p1.params.iter().map(|p| p.ty.as_str()).collect();
        assert_eq!(types, vec!["const TDimValue&", "const agrint&", "const agrint&", "bool"]);
        assert!(p1.params.iter().all(|p| p.name.is_none()));
        assert!(p1.params[3].default.is_some());
        assert!(parsed.declarations[1].as_method().unwrap().params.is_empty());
        let h = parsed.declarations[2].as_method().unwrap();
        assert_eq!(h.params[0].ty, "unsigned long");
        assert_eq!(h.params[1].ty, "CString");
        assert_eq!(h.params[1].name, None);
    }

    #[test]
    fn test_default_glued_to_declarator_punctuation() {
        let source = "bool M(const agrint&=0, CAgrMT*=NULL, std::vector<int>=v, CString &=c, int& r=x);";
        let parsed = parse_str(source);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let m = parsed.declarations[0].as_method().unwrap();
        let types: Vec<&str> = m.params.iter().map(|p| p.ty.as_str()).collect();
        assert_eq!(types, vec!["const agrint&", "CAgrMT*", "std::vector<int>", "CString &", "int&"]);
        let defaults: Vec<&str> = m.params.iter().map(|p| text(source, p.default.unwrap())).collect();
        assert_eq!(defaults, vec!["0", "NULL", "v", "c", "x"]);
        assert!(m.params[..4].iter().all(|p| p.name.is_none()));
        assert_eq!(m.params[4].name.as_deref(), Some("r"));
    }

    #[test]
    fn test_leading_and_trailing_comments_attach() {
        let source = "// Comment for class\nclass CSample\n{\n    // Comment from .h\n    bool MethodP1();\n\n    CAgrMT* m_pmtReport; //Res/Rate-Reporting\n};\n";
        let parsed = parse_str(source);
        let class_decl = &parsed.declarations[0];
        assert_eq!(text(source, class_decl.leading_comment.unwrap()), "// Comment for class");
        assert_eq!(parsed.header_comment, None);

        let class = class_decl.as_class().unwrap();
        let (method_decl, _) = member(class, "MethodP1");
        assert_eq!(text(source, method_decl.leading_comment.unwrap()), "// Comment from .h");

        let (field_decl, field) = class.fields().next().unwrap();
        assert_eq!(field_decl.name, "m_pmtReport");
        assert_eq!(field_decl.leading_comment, None);
        assert_eq!(text(source, field.trailing_comment.unwrap()), "//Res/Rate-Reporting");
    }

    #[test]
    fn test_comment_separated_by_blank_line_does_not_attach() {
        let source = "class C {\n    // Static member\n\n    static agrint m_iIndex;\n};";
        let parsed = parse_str(source);
        let (decl, field) = class_named(&parsed, "C").fields().next().unwrap();
        assert_eq!(decl.leading_comment, None);
        assert!(field.is_static);
    }

    #[test]
    fn test_header_comment_before_first_directive() {
        let source = "// File header\n// Copyright\n\n#include \"x.h\"\nint a;\n";
        let parsed = parse_str(source);
        assert_eq!(text(source, parsed.header_comment.unwrap()), "// File header\n// Copyright");
    }

    #[test]
    fn test_defines_are_declarations_in_file_order() {
        let source = "// Comment for define 3\n#define MY_DEFINE3 3\nclass A {};\n#define MAX(a, b) ((a) > (b) ? (a) : (b))\n";
        let parsed = parse_str(source);
        let kinds: Vec<&str> = parsed.declarations.iter().map(Declaration::kind_label).collect();
        assert_eq!(kinds, vec!["define", "class", "define"]);

        let first = &parsed.declarations[0];
        assert_eq!(first.name, "MY_DEFINE3");
        assert_eq!(text(source, first.leading_comment.unwrap()), "// Comment for define 3");
        let DeclKind::Define(define) = &parsed.declarations[2].kind else {
            panic!("expected define");
        };
        assert_eq!(define.params, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_static_definition_without_type_warns() {
        let source = "CSample::m_iIndex = -1;\nagrint CSample::m_iCount = 0;\n";
        let parsed = parse_str(source);
        assert_eq!(parsed.declarations.len(), 2);
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].severity, Severity::Warning);

        let DeclKind::StaticFieldDefinition(untyped) = &parsed.declarations[0].kind else {
            panic!("expected static definition");
        };
        assert_eq!(parsed.declarations[0].owner.as_deref(), Some("CSample"));
        assert_eq!(untyped.ty, None);
        assert_eq!(text(source, untyped.initializer.unwrap()), "-1");

        let DeclKind::StaticFieldDefinition(typed) = &parsed.declarations[1].kind else {
            panic!("expected static definition");
        };
        assert_eq!(typed.ty.as_deref(), Some("agrint"));
    }

    #[test]
    fn test_resync_after_mismatched_paren_in_class() {
        let parsed = parse_str("class C {\npublic:\n    void Broken(int a;\n    void Good(int b);\n};");
        assert_eq!(parsed.diagnostics.iter().filter(|d| d.is_error()).count(), 1);
        let class = class_named(&parsed, "C");
        assert!(class.members.iter().any(Declaration::is_damaged));
        let (good, _) = member(class, "Good");
        assert_eq!(good.visibility, Visibility::Public);
    }

    #[test]
    fn test_resync_after_damaged_definition_at_file_scope() {
        let parsed = parse_str("void CSample::Broken(int a { return; }\nvoid CSample::Good(int b) { }\n");
        assert!(parsed.declarations[0].is_damaged());
        let good = &parsed.declarations[1];
        assert_eq!(good.name, "Good");
        assert!(good.as_method().unwrap().is_implementation());
    }

    #[test]
    fn test_stray_closing_brace_is_reported_and_skipped() {
        let parsed = parse_str("void f();\n}\nvoid g();\n");
        assert_eq!(parsed.diagnostics.len(), 1);
        let names: Vec<&str> = parsed.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["f", "g"]);
    }

    #[test]
    fn test_unterminated_class_is_damaged() {
        let parsed = parse_str("class A {\n    void f();\n");
        assert_eq!(parsed.declarations.len(), 1);
        assert!(parsed.declarations[0].is_damaged());
        assert!(parsed.diagnostics.iter().any(|d| d.message.contains("end of file")));
    }

    #[test]
    fn test_local_struct_recorded_on_method_only() {
        let source = "void CPartialSample::MethodOneInPartial()\n{\n    struct DistrStruct\n    {\n        int a;\n        double b;\n    };\n    DistrStruct d;\n}\n";
        let parsed = parse_str(source);
        assert_eq!(parsed.declarations.len(), 1);
        let method = parsed.declarations[0].as_method().unwrap();
        assert_eq!(method.local_types.len(), 1);
        let local = &method.local_types[0];
        assert_eq!(local.name, "DistrStruct");
        assert_eq!(local.kind_label(), "local type");
        assert_eq!(local.as_class().unwrap().fields().count(), 2);
    }

    #[test]
    fn test_local_typedef_struct_named_by_alias() {
        let parsed = parse_str("void f()\n{\n    typedef struct attinfotag { int id; } attinfo;\n    attinfo a;\n}\n");
        let method = parsed.declarations[0].as_method().unwrap();
        assert_eq!(method.local_types.len(), 1);
        assert_eq!(method.local_types[0].name, "attinfo");
    }

    #[test]
    fn test_anonymous_struct_named_by_declarator() {
        let parsed = parse_str("struct {\n    int a;\n} RoutineStruct;\n");
        assert_eq!(parsed.declarations.len(), 1);
        assert_eq!(parsed.declarations[0].name, "RoutineStruct");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    }

    #[test]
    fn test_typedefs_and_aliases() {
        let parsed = parse_str(
            "typedef unsigned long DWORD;\ntypedef struct tagX { int a; } X, *PX;\nusing Map = std::map<int, int>;\ntypedef void (*Callback)(int);",
        );
        let typedefs: Vec<(&str, &TypedefDecl)> = parsed
            .declarations
            .iter()
            .filter_map(|d| match &d.kind {
                DeclKind::Typedef(t) => Some((d.name.as_str(), t)),
                _ => None,
            })
            .collect();
        let names: Vec<&str> = typedefs.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["DWORD", "X", "PX", "Map", "Callback"]);
        assert_eq!(typedefs[0].1.target, "unsigned long");
        assert_eq!(typedefs[1].1.target, "struct tagX");
        assert!(typedefs[1].1.aggregate.is_some());
        assert_eq!(typedefs[2].1.target, "struct tagX*");
        assert!(typedefs[2].1.aggregate.is_none());
        assert_eq!(typedefs[3].1.target, "std::map<int, int>");
    }

    #[test]
    fn test_enums() {
        let parsed = parse_str("enum Color { Red, Green = 2, Blue };\nenum class Mode : int { A, B };\nenum class Fwd : short;");
        assert_eq!(parsed.declarations.len(), 2);
        let DeclKind::Enum(color) = &parsed.declarations[0].kind else {
            panic!("expected enum");
        };
        assert_eq!(color.enumerators, vec!["Red", "Green", "Blue"]);
        assert!(!color.scoped);
        let DeclKind::Enum(mode) = &parsed.declarations[1].kind else {
            panic!("expected enum");
        };
        assert!(mode.scoped);
        assert_eq!(mode.underlying.as_deref(), Some("int"));
    }

    #[test]
    fn test_namespace_and_extern_c_are_flattened() {
        let parsed = parse_str("namespace N {\nclass A { void f(); };\n}\nextern \"C\" {\nvoid g();\n}\nusing namespace std;\nclass Fwd;\n");
        let names: Vec<&str> = parsed.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "g"]);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
    }

    #[test]
    fn test_namespace_path_qualifies_class_owners() {
        let src = "namespace N {\nclass C { void F(int); };\nvoid C::G() {}\nint C::s = 0;\nvoid free();\n}\n\
                   namespace A::B { namespace { struct S { void H(); }; } }\n\
                   namespace X { extern \"C\" { struct E { void I(); }; } }\n";
        let parsed = parse_str(src);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);

        let c = &parsed.declarations[0];
        assert_eq!(c.qualified_name(), "N::C");
        let (f, _) = member(c.as_class().unwrap(), "F");
        assert_eq!(f.owner.as_deref(), Some("N::C"));
        assert_eq!(parsed.declarations[1].owner.as_deref(), Some("N::C"));
        assert_eq!(parsed.declarations[2].owner.as_deref(), Some("N::C"));
        assert_eq!(parsed.declarations[3].owner, None);

        let (h, _) = member(class_named(&parsed, "S"), "H");
        assert_eq!(h.owner.as_deref(), Some("A::B::S"));
        let (i, _) = member(class_named(&parsed, "E"), "I");
        assert_eq!(i.owner.as_deref(), Some("X::E"));
    }

    #[test]
    fn test_base_specifiers_and_default_access() {
        let parsed = parse_str("class D : public B1, protected virtual B2 {};\nstruct S : B {};\nclass C : B {};");
        let d = class_named(&parsed, "D");
        assert_eq!(
            d.bases,
            vec![
                BaseSpecifier {
                    name: "B1".to_string(),
                    access: Visibility::Public,
                    is_virtual: false
                },
                BaseSpecifier {
                    name: "B2".to_string(),
                    access: Visibility::Protected,
                    is_virtual: true
                },
            ]
        );
        assert_eq!(class_named(&parsed, "S").bases[0].access, Visibility::Public);
        assert_eq!(class_named(&parsed, "C").bases[0].access, Visibility::Private);
    }

    #[test]
    fn test_export_markers_between_keyword_and_name() {
        let parsed = parse_str("class __declspec(dllexport) AFX_EXT CExported final : public CBase {};");
        let class = class_named(&parsed, "CExported");
        assert_eq!(class.export_markers, vec!["__declspec(dllexport)", "AFX_EXT"]);
        assert!(class.is_exported());
    }

    #[test]
    fn test_operators_and_special_members() {
        let parsed = parse_str(
            "class V {\npublic:\n    bool operator==(const V& o) const;\n    V& operator=(const V&) = default;\n    operator bool() const;\n    V(const V&) = delete;\n    explicit V(int n);\n};",
        );
        let class = class_named(&parsed, "V");
        let names: Vec<&str> = class.methods().map(|(d, _)| d.name.as_str()).collect();
        assert_eq!(names, vec!["operator==", "operator=", "operator bool", "V", "V"]);

        let (_, assign) = member(class, "operator=");
        assert!(assign.qualifiers.is_defaulted);
        assert_eq!(assign.return_type.as_deref(), Some("V&"));
        let (_, conversion) = member(class, "operator bool");
        assert_eq!(conversion.kind, MethodKind::Operator);
        assert_eq!(conversion.return_type, None);
        let ctors: Vec<&MethodDecl> = class.methods().filter(|(d, _)| d.name == "V").map(|(_, m)| m).collect();
        assert!(ctors[0].qualifiers.is_deleted);
        assert!(ctors[1].qualifiers.is_explicit);
        assert!(ctors.iter().all(|m| m.kind == MethodKind::Constructor));
    }

    #[test]
    fn test_pure_virtual_interface() {
        let parsed = parse_str("class ISample {\npublic:\n    virtual void Run() = 0;\n    virtual ~ISample() {}\n    static ISample* GetInstance();\n};");
        let class = class_named(&parsed, "ISample");
        let (_, run) = member(class, "Run");
        assert!(run.qualifiers.is_pure_virtual && run.qualifiers.is_virtual);
        let (_, dtor) = member(class, "~ISample");
        assert_eq!(dtor.kind, MethodKind::Destructor);
        assert!(member(class, "GetInstance").1.qualifiers.is_static);
        assert!(class.is_interface());
    }

    #[test]
    fn test_fields_with_arrays_bitfields_and_declarators() {
        let source = "struct F {\n    unsigned int flag : 1;\n    int a[10][ARR_SIZE], *p, q;\n    static const int k = 5;\n    mutable int m{0};\n};";
        let parsed = parse_str(source);
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let class = class_named(&parsed, "F");
        let fields: Vec<(&str, &FieldDecl)> = class.fields().map(|(d, f)| (d.name.as_str(), f)).collect();
        let names: Vec<&str> = fields.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["flag", "a", "p", "q", "k", "m"]);

        assert_eq!(fields[0].1.bit_width.as_deref(), Some("1"));
        assert_eq!(fields[0].1.ty, "unsigned int");
        assert_eq!(fields[1].1.array_dims, vec!["10", "ARR_SIZE"]);
        assert_eq!(fields[2].1.ty, "int *");
        assert_eq!(fields[3].1.ty, "int");
        assert!(fields[4].1.is_static && fields[4].1.is_const);
        assert_eq!(text(source, fields[4].1.initializer.unwrap()), "5");
        assert!(fields[5].1.is_mutable);
        assert_eq!(text(source, fields[5].1.initializer.unwrap()), "{0}");
    }

    #[test]
    fn test_constructor_initializer_list() {
        let source = "class C {\n    C() : m_a(1), m_b{2} {}\n    int m_a;\n    int m_b;\n};";
        let parsed = parse_str(source);
        let (_, ctor) = member(class_named(&parsed, "C"), "C");
        assert_eq!(ctor.kind, MethodKind::Constructor);
        let inits: Vec<(&str, &str)> = ctor
            .initializers
            .iter()
            .map(|i| (i.member.as_str(), text(source, i.value)))
            .collect();
        assert_eq!(inits, vec![("m_a", "1"), ("m_b", "2")]);
        assert!(ctor.is_implementation());
    }

    #[test]
    fn test_nested_class_owner_is_qualified() {
        let parsed = parse_str("class Outer {\n    class Inner { void f(); };\n    int x;\n};");
        let outer = class_named(&parsed, "Outer");
        assert_eq!(outer.nested.len(), 1);
        assert_eq!(outer.members.len(), 1);
        let inner = outer.nested[0].as_class().unwrap();
        let (f, _) = inner.methods().next().unwrap();
        assert_eq!(f.owner.as_deref(), Some("Outer::Inner"));
    }

    #[test]
    fn test_free_functions_have_no_owner() {
        let parsed = parse_str("int Add(int a, int b);\nstatic int Helper() { return 1; }\n");
        assert_eq!(parsed.declarations.len(), 2);
        assert!(parsed.declarations.iter().all(|d| d.owner.is_none()));
        let helper = parsed.declarations[1].as_method().unwrap();
        assert!(helper.qualifiers.is_static);
        assert!(helper.is_implementation());
    }

    #[test]
    fn test_macro_invocations_are_skipped() {
        let parsed = parse_str("IMPLEMENT_DYNAMIC(CFoo, CObject)\n\nvoid CFoo::Run() {}\n\nMAIN(rep01)\n{\n    return 0;\n}\n");
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        let names: Vec<&str> = parsed.declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Run"]);
    }

    #[test]
    fn test_function_try_block_body_includes_handlers() {
        let source = "void f() try { g(); } catch (...) { h(); }\nvoid k();";
        let parsed = parse_str(source);
        assert_eq!(parsed.declarations.len(), 2);
        let body = parsed.declarations[0].as_method().unwrap().body.unwrap();
        assert!(text(source, body).ends_with("{ h(); }"));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let source = "class A : public B {\npublic:\n    A();\n    int f(int x = 1) const;\n};\nA::A() {}\nint A::f(int x) const { return x; }\n";
        assert_eq!(parse_str(source), parse_str(source));
    }
}
