use crate::ResolveArgs;
use jdt_bridge_core::{AstMatcher, SourceUnit, compare_units};
use std::path::Path;

pub fn run(left: &Path, right: &Path, args: &ResolveArgs) -> anyhow::Result<()> {
    let resolver = args.resolver()?;
    let left = resolver.resolve(&SourceUnit::read(left)?)?;
    let right = resolver.resolve(&SourceUnit::read(right)?)?;

    let matches = AstMatcher::new().matches(&left.ast, left.root, &right.ast, right.root);
    match compare_units(&left, &right) {
        Ok(()) => {
            println!("{} and {} are equivalent", left.file, right.file);
            Ok(())
        }
        Err(divergence) => {
            if matches {
                println!("Trees match structurally; positions diverge");
            }
            Err(divergence.into())
        }
    }
}
