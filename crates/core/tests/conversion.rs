mod common;

use common::{find, resolve};
use jdt_bridge_api::{NodeKind, Prop, Severity, flags};
use jdt_bridge_core::{CompilationUnitResolver, SourceUnit, check_range_invariants};

#[test]
fn test_if_else_with_return_and_throw() {
    let source = "class A { void m(){ if (x) return; else throw new E(); } }";
    let unit = resolve(source);
    let ast = &unit.ast;

    let types: Vec<_> = ast.list(unit.root, Prop::Types).collect();
    assert_eq!(types.len(), 1);
    let method = ast.list(types[0], Prop::BodyDeclarations).next().unwrap();
    assert!(matches!(
        ast.kind(method),
        NodeKind::MethodDeclaration {
            is_constructor: false,
            ..
        }
    ));
    let name = ast.child(method, Prop::Name).unwrap();
    assert_eq!(unit.text(ast.range(name)), Some("m"));

    let body = ast.child(method, Prop::Body).unwrap();
    let statements: Vec<_> = ast.list(body, Prop::Statements).collect();
    assert_eq!(statements.len(), 1);
    let if_stmt = statements[0];
    assert_eq!(ast.kind(if_stmt), &NodeKind::IfStatement);

    let then = ast.child(if_stmt, Prop::ThenStatement).unwrap();
    assert_eq!(ast.kind(then), &NodeKind::ReturnStatement);
    assert!(ast.child(then, Prop::Expression).is_none());

    let otherwise = ast.child(if_stmt, Prop::ElseStatement).unwrap();
    assert_eq!(ast.kind(otherwise), &NodeKind::ThrowStatement);
    let thrown = ast.child(otherwise, Prop::Expression).unwrap();
    assert_eq!(ast.kind(thrown), &NodeKind::ClassInstanceCreation);
    assert_eq!(unit.text(ast.range(thrown)), Some("new E()"));

    assert!(unit.problems().is_empty());
    assert!(check_range_invariants(&unit).is_empty());
}

#[test]
fn test_multi_declarator_field_is_one_declaration() {
    let unit = resolve("class A { int a = 1, b = 2; }");
    let fields = find(&unit, |k| *k == NodeKind::FieldDeclaration);
    assert_eq!(fields.len(), 1);

    let ast = &unit.ast;
    assert_eq!(unit.text(ast.range(fields[0])), Some("int a = 1, b = 2;"));

    let fragments: Vec<_> = ast.list(fields[0], Prop::Fragments).collect();
    let names: Vec<_> = fragments
        .iter()
        .filter_map(|&f| ast.child(f, Prop::Name))
        .filter_map(|n| ast.identifier(n))
        .collect();
    assert_eq!(names, vec!["a", "b"]);

    let texts: Vec<_> = fragments
        .iter()
        .filter_map(|&f| unit.text(ast.range(f)))
        .collect();
    assert_eq!(texts, vec!["a = 1", "b = 2"]);

    let initializers: Vec<_> = fragments
        .iter()
        .filter_map(|&f| ast.child(f, Prop::Initializer))
        .filter_map(|i| unit.text(ast.range(i)))
        .collect();
    assert_eq!(initializers, vec!["1", "2"]);
}

#[test]
fn test_separate_fields_stay_separate() {
    let unit = resolve("class A { int a = 1; int b = 2; }");
    let fields = find(&unit, |k| *k == NodeKind::FieldDeclaration);
    assert_eq!(fields.len(), 2);
    for field in fields {
        assert_eq!(unit.ast.list_len(field, Prop::Fragments), 1);
    }
}

#[test]
fn test_explicit_constructor_calls() {
    let unit = resolve("class A { A(int x) { this(x, 1); } A(int x, int y) { super(); } }");
    let this_calls = find(&unit, |k| *k == NodeKind::ConstructorInvocation);
    assert_eq!(this_calls.len(), 1);
    assert_eq!(unit.ast.list_len(this_calls[0], Prop::Arguments), 2);

    let super_calls = find(&unit, |k| *k == NodeKind::SuperConstructorInvocation);
    assert_eq!(super_calls.len(), 1);
    assert_eq!(unit.ast.list_len(super_calls[0], Prop::Arguments), 0);

    let constructors = find(&unit, |k| {
        matches!(
            k,
            NodeKind::MethodDeclaration {
                is_constructor: true,
                ..
            }
        )
    });
    assert_eq!(constructors.len(), 2);
    for ctor in constructors {
        let name = unit.ast.child(ctor, Prop::Name).unwrap();
        assert_eq!(unit.ast.identifier(name), Some("A"));
    }
}

#[test]
fn test_malformed_source_still_yields_a_tree() {
    let unit = resolve("class A { void m() { int x = 1 } }");
    assert!(!unit.problems().is_empty());
    assert!(unit.problems().iter().any(|p| p.severity == Severity::Error));
    assert_eq!(find(&unit, |k| k.is_type_declaration()).len(), 1);
    assert!(unit.ast.ids().all(|id| unit.ast.flags(id) & flags::ORIGINAL != 0));
}

#[test]
fn test_clean_unit_keeps_ranges_nested() {
    let source = "package p;\nimport java.util.*;\nclass A<T> extends B implements C {\n  T t;\n  void m() { if (t != null) return; else throw new E(); }\n}\n";
    let unit = resolve(source);
    let violations = check_range_invariants(&unit);
    assert!(violations.is_empty(), "{violations:?}");
    assert_eq!(unit.ast.range(unit.root).length, source.len() as i32);
}

#[test]
fn test_doc_comment_is_attached() {
    let source = "class A {\n  /** Doc. */\n  void m() {}\n}\n";
    let unit = resolve(source);
    let method = find(&unit, |k| matches!(k, NodeKind::MethodDeclaration { .. }))[0];
    let javadoc = unit.ast.child(method, Prop::Javadoc).unwrap();
    assert_eq!(unit.text(unit.ast.range(javadoc)), Some("/** Doc. */"));
    assert_eq!(
        unit.ast.range(method).start,
        source.find("/**").unwrap() as i32
    );
    assert_eq!(unit.comments().len(), 1);
}

#[test]
fn test_resolve_all_keeps_input_order() {
    common::init_tracing();
    let resolver = CompilationUnitResolver::default();
    let units: Vec<SourceUnit> = (0..8)
        .map(|i| SourceUnit::new(format!("C{i}.java"), format!("class C{i} {{}}")))
        .collect();
    let results = resolver.resolve_all(&units, &Default::default());
    assert_eq!(results.len(), 8);
    for (i, result) in results.into_iter().enumerate() {
        let unit = result.unwrap();
        assert_eq!(unit.file, format!("C{i}.java"));
        let class = unit.ast.list(unit.root, Prop::Types).next().unwrap();
        let name = unit.ast.child(class, Prop::Name).unwrap();
        assert_eq!(unit.ast.identifier(name), Some(format!("C{i}").as_str()));
    }
}

#[test]
fn test_array_creation_with_open_dimension_keeps_invariants() {
    let source = "class A { int[][] b = new int[3][]; }";
    let unit = resolve(source);
    let violations = check_range_invariants(&unit);
    assert!(violations.is_empty(), "{violations:?}");

    let creation = find(&unit, |k| *k == NodeKind::ArrayCreation)[0];
    let ty = unit.ast.child(creation, Prop::Type).unwrap();
    assert_eq!(unit.text(unit.ast.range(ty)), Some("int[3][]"));
    assert_eq!(unit.ast.list_len(ty, Prop::Dimensions), 2);
    let dims: Vec<_> = unit.ast.list(creation, Prop::Dimensions).collect();
    assert_eq!(dims.len(), 1);
    assert_eq!(unit.text(unit.ast.range(dims[0])), Some("3"));
}

#[test]
fn test_module_declaration_is_reported() {
    let unit = resolve("module m { }");
    assert!(unit.ast.list(unit.root, Prop::Types).next().is_none());
    assert!(unit.problems().iter().any(|p| p.severity == Severity::Error));
}
