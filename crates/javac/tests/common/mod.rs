use jdt_bridge_javac::{JavacFrontend, JcTree, ParsedForeignUnit};
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

pub fn parse(source: &str) -> ParsedForeignUnit {
    init_tracing();
    JavacFrontend::new()
        .parse(source)
        .expect("front end should always produce a tree")
}

/// Pre-order search for every tree matching `pred`.
#[allow(dead_code)]
pub fn find_all<'a>(root: &'a JcTree, pred: &dyn Fn(&JcTree) -> bool) -> Vec<&'a JcTree> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(tree) = stack.pop() {
        if pred(tree) {
            out.push(tree);
        }
        let mut children = tree.children();
        children.reverse();
        stack.extend(children);
    }
    out
}
