mod common;

use common::{find_all, parse};
use jdt_bridge_javac::{ClassKind, ForeignIndex, JcKind, Tag, flags};

#[test]
fn test_multi_declarator_field_shares_start() {
    let source = "class A { int a, b = 2; }";
    let unit = parse(source);
    let vars = find_all(&unit.root, &|t| t.tag() == Tag::VarDef);
    assert_eq!(vars.len(), 2);

    let decl_start = source.find("int").unwrap() as i32;
    assert!(vars.iter().all(|v| v.start == decl_start));
    assert_eq!(vars[0].pos, source.find("a,").unwrap() as i32);
    assert_eq!(vars[0].end_pos(&unit.end_positions), source.find(',').unwrap() as i32);
    assert_eq!(
        vars[1].end_pos(&unit.end_positions),
        source.find(';').unwrap() as i32 + 1
    );
}

#[test]
fn test_enum_constants_are_flagged_variables() {
    let unit = parse("enum Color { RED, GREEN(1) { }; void m() {} }");
    let class = find_all(&unit.root, &|t| t.tag() == Tag::ClassDef)[0];
    let JcKind::ClassDef {
        class_kind, defs, ..
    } = &class.kind
    else {
        panic!("expected a class");
    };
    assert_eq!(*class_kind, ClassKind::Enum);
    assert_eq!(defs.len(), 3);

    let JcKind::VarDef {
        mods, name, init, ..
    } = &defs[1].kind
    else {
        panic!("expected an enum constant");
    };
    assert_eq!(name, "GREEN");
    assert!(mods.has(flags::ENUM));
    let Some(init) = init else {
        panic!("enum constant should carry a creation expression");
    };
    let JcKind::NewClass { args, def, .. } = &init.kind else {
        panic!("expected a class creation");
    };
    assert_eq!(args.len(), 1);
    assert!(def.is_some());
    assert_eq!(defs[2].tag(), Tag::MethodDef);
}

#[test]
fn test_explicit_constructor_call_is_an_exec_of_apply() {
    let unit = parse("class A { A(int x) { this(x, 1); } A(int x, int y) { super(); } }");
    let applies = find_all(&unit.root, &|t| t.tag() == Tag::Apply);
    assert_eq!(applies.len(), 2);

    let index = ForeignIndex::build(&unit.root);
    for apply in applies {
        assert_eq!(index.parent(apply.id).map(|p| p.tag()), Some(Tag::Exec));
        let JcKind::Apply { meth, .. } = &apply.kind else {
            unreachable!();
        };
        assert!(matches!(meth.ident_name(), Some("this") | Some("super")));
    }
    let ctors = find_all(&unit.root, &|t| {
        matches!(&t.kind, JcKind::MethodDef { name, restype: None, .. } if name == "<init>")
    });
    assert_eq!(ctors.len(), 2);
}

#[test]
fn test_binary_operators_keep_their_tags() {
    let unit = parse("class A { boolean f = 1 + 2 * 3 > 4 && true; }");
    let tags: Vec<Tag> = find_all(&unit.root, &|t| {
        matches!(t.kind, JcKind::Binary { .. })
    })
    .iter()
    .map(|t| t.tag())
    .collect();
    assert_eq!(tags, vec![Tag::And, Tag::Gt, Tag::Plus, Tag::Mul]);
}

#[test]
fn test_select_position_is_the_dot() {
    let source = "class A { Object o = java.util.List.of(); }";
    let unit = parse(source);
    let selects = find_all(&unit.root, &|t| t.tag() == Tag::Select);
    let of = selects
        .iter()
        .find(|t| matches!(&t.kind, JcKind::Select { name, .. } if name == "of"))
        .unwrap();
    assert_eq!(of.pos, source.find(".of").unwrap() as i32);
    assert_eq!(of.start, source.find("java").unwrap() as i32);
}

#[test]
fn test_syntax_errors_become_diagnostics() {
    let unit = parse("class A { void m() { int x = 1 } }");
    assert!(!unit.diagnostics.is_empty());
    assert!(
        unit.diagnostics
            .iter()
            .all(|d| d.code.starts_with("compiler.err."))
    );
    assert!(unit.diagnostics.iter().all(|d| d.line == 1));
}

#[test]
fn test_repeated_modifier_is_reported_on_the_declaration() {
    let unit = parse("class A { public public int x; }");
    let diagnostic = unit
        .diagnostics
        .iter()
        .find(|d| d.code == "compiler.err.repeated.modifier")
        .expect("repeated modifier should be reported");
    let var = find_all(&unit.root, &|t| t.tag() == Tag::VarDef)[0];
    assert_eq!(diagnostic.tree, Some(var.id));
}

#[test]
fn test_clean_source_has_no_diagnostics() {
    let unit = parse(
        "package p;\nimport java.util.*;\nclass A<T> extends B implements C {\n  T t;\n  void m() { if (t != null) return; else throw new E(); }\n}\n",
    );
    assert!(unit.diagnostics.is_empty(), "{:?}", unit.diagnostics);
    let JcKind::CompilationUnit {
        package, imports, ..
    } = &unit.root.kind
    else {
        panic!("root should be a compilation unit");
    };
    assert!(package.is_some());
    let JcKind::Import { qualid, .. } = &imports[0].kind else {
        panic!("expected an import");
    };
    assert!(matches!(&qualid.kind, JcKind::Select { name, .. } if name == "*"));
}

#[test]
fn test_module_declaration_is_erroneous_with_a_diagnostic() {
    let source = "module m { }";
    let unit = parse(source);
    let JcKind::CompilationUnit { defs, .. } = &unit.root.kind else {
        panic!("root should be a compilation unit");
    };
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].tag(), Tag::Erroneous);

    let diagnostic = unit
        .diagnostics
        .iter()
        .find(|d| d.tree == Some(defs[0].id))
        .expect("module declaration should be reported");
    assert!(diagnostic.code.starts_with("compiler.err."));
    assert_eq!((diagnostic.start, diagnostic.end), (0, source.len() as i32));
}

#[test]
fn test_string_template_is_erroneous_with_a_diagnostic() {
    let unit = parse("class A { String s = STR.\"x\"; }");
    assert!(!unit.diagnostics.is_empty());
    assert!(
        unit.diagnostics
            .iter()
            .all(|d| d.code.starts_with("compiler.err."))
    );
    let erroneous = find_all(&unit.root, &|t| t.tag() == Tag::Erroneous);
    assert!(!erroneous.is_empty());
}
