use crate::ResolveArgs;
use crate::view::CheckView;
use jdt_bridge_core::{Cancellation, SourceUnit, check_range_invariants};
use std::path::PathBuf;
use tabled::Table;

pub fn run(files: &[PathBuf], args: &ResolveArgs) -> anyhow::Result<()> {
    let resolver = args.resolver()?;
    let mut rows = Vec::new();
    let mut units = Vec::new();
    for path in files {
        match SourceUnit::read(path) {
            Ok(unit) => units.push(unit),
            Err(e) => rows.push(CheckView::failed(&path.display().to_string(), &e.to_string())),
        }
    }

    let mut failures = rows.len();
    let results = resolver.resolve_all(&units, &Cancellation::new());
    for (source, result) in units.iter().zip(results) {
        match result {
            Ok(unit) => {
                let violations = check_range_invariants(&unit);
                for violation in &violations {
                    tracing::warn!("{}: {}", unit.file, violation);
                }
                if !violations.is_empty() {
                    failures += 1;
                }
                rows.push(CheckView::new(&unit, &violations));
            }
            Err(e) => {
                failures += 1;
                rows.push(CheckView::failed(&source.file, &e.to_string()));
            }
        }
    }

    println!("{}", Table::new(rows));
    if failures > 0 {
        anyhow::bail!("{} of {} files failed the check", failures, files.len());
    }
    Ok(())
}
