use jdt_bridge_api::{CompilationUnit, NodeId, NodeKind};
use jdt_bridge_core::{CompilationUnitResolver, SourceUnit};
use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn resolve(source: &str) -> CompilationUnit {
    resolve_with(&CompilationUnitResolver::default(), source)
}

pub fn resolve_with(resolver: &CompilationUnitResolver, source: &str) -> CompilationUnit {
    init_tracing();
    resolver
        .resolve(&SourceUnit::new("A.java", source))
        .expect("source should convert")
}

/// Every node of the unit whose kind satisfies `pred`, in pre-order.
#[allow(dead_code)]
pub fn find(unit: &CompilationUnit, pred: impl Fn(&NodeKind) -> bool) -> Vec<NodeId> {
    unit.ast
        .preorder(unit.root)
        .into_iter()
        .filter(|id| pred(unit.ast.kind(*id)))
        .collect()
}
