use crate::ResolveArgs;
use crate::view::{ProblemView, outline};
use jdt_bridge_core::SourceUnit;
use std::path::Path;
use tabled::Table;

pub fn run(file: &Path, args: &ResolveArgs, json: bool) -> anyhow::Result<()> {
    let resolver = args.resolver()?;
    let unit = resolver.resolve(&SourceUnit::read(file)?)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&unit.snapshot())?);
        return Ok(());
    }

    print!("{}", outline(&unit.ast, unit.root));
    if !unit.problems().is_empty() {
        let rows: Vec<ProblemView> = unit.problems().iter().map(ProblemView::from_problem).collect();
        println!("\n{}", Table::new(rows));
    }
    Ok(())
}
