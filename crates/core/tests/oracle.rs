mod common;

use common::{find, resolve, resolve_with};
use jdt_bridge_api::{ApiLevel, NodeKind, flags};
use jdt_bridge_core::{
    AstMatcher, CompilationUnitResolver, CompilerOptions, compare, compare_units,
};

const SOURCE: &str = "class A {\n  int a = 1, b = -2;\n  String s = \"x\" + \"y\";\n  void m(A o) { o.a = a; }\n}\n";

#[test]
fn test_unit_compares_equal_to_itself() {
    let left = resolve(SOURCE);
    let right = resolve(SOURCE);
    assert!(compare_units(&left, &right).is_ok());
    assert!(AstMatcher::new().matches(&left.ast, left.root, &right.ast, right.root));
}

#[test]
fn test_bookkeeping_flags_do_not_diverge() {
    let left = resolve(SOURCE);
    let mut right = resolve(SOURCE);
    let fields = find(&right, |k| *k == NodeKind::FieldDeclaration);
    right.ast.add_flags(fields[0], flags::RECOVERED | flags::PROTECT);
    assert!(compare(&left.ast, left.root, &right.ast, right.root).is_ok());
}

#[test]
fn test_shifted_source_diverges_but_still_matches() {
    let left = resolve(SOURCE);
    let right = resolve(&format!("\n{SOURCE}"));
    let err = compare_units(&left, &right).unwrap_err();
    assert!(err.message.contains("start position"), "{err}");
    assert!(AstMatcher::new().matches(&left.ast, left.root, &right.ast, right.root));
}

#[test]
fn test_extra_member_is_a_size_divergence() {
    // Same length, so the roots agree and the member lists decide.
    let left = resolve("class A { int a;        }");
    let right = resolve("class A { int a; int b; }");
    let err = compare_units(&left, &right).unwrap_err();
    assert!(err.message.contains("sizes differ"), "{err}");
    assert!(!AstMatcher::new().matches(&left.ast, left.root, &right.ast, right.root));
}

#[test]
fn test_legacy_units_compare_modifier_words() {
    let legacy = CompilationUnitResolver::new(
        ApiLevel::JLS2,
        CompilerOptions::default(),
    );
    let left = resolve_with(&legacy, "class A { public static void m() {} }");
    let right = resolve_with(&legacy, "class A { static public void m() {} }");
    assert!(compare_units(&left, &right).is_ok());

    let left = resolve("class A { public static void m() {} }");
    let right = resolve("class A { static public void m() {} }");
    assert!(compare_units(&left, &right).is_err());
}
