mod common;

use common::resolve_with;
use jdt_bridge_api::{ApiLevel, Severity};
use jdt_bridge_core::{CompilationUnitResolver, CompilerOptions};
use std::io::Write;

#[test]
fn test_prefs_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# exported settings").unwrap();
    writeln!(file, "org.eclipse.jdt.core.compiler.source=17").unwrap();
    writeln!(file, "org.eclipse.jdt.core.compiler.problem.rawTypeReference=error").unwrap();
    let options = CompilerOptions::from_prefs_file(file.path()).unwrap();
    assert_eq!(options.len(), 2);
    assert_eq!(options.source_version().0, 17);

    let json = options.to_json().unwrap();
    assert_eq!(CompilerOptions::from_json(&json).unwrap(), options);
}

#[test]
fn test_malformed_prefs_line_is_rejected() {
    assert!(CompilerOptions::from_prefs_str("no separator here").is_err());
}

#[test]
fn test_syntax_errors_keep_error_severity_under_any_options() {
    let options = CompilerOptions::new().with(
        "org.eclipse.jdt.core.compiler.problem.rawTypeReference",
        "ignore",
    );
    let resolver = CompilationUnitResolver::new(ApiLevel::latest(), options);
    let unit = resolve_with(&resolver, "class A { void m() { int x = 1 } }");
    assert!(unit.problems().iter().all(|p| p.severity == Severity::Error));
    assert!(!unit.problems().is_empty());
}
