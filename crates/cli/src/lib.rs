mod check;
mod compare;
mod parse;
mod view;

use clap::{Parser, Subcommand};
use jdt_bridge_core::logging::LogSettings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jdt-bridge",
    version,
    about = "Converts javac-style syntax trees into the unified Java AST",
    long_about = "jdt-bridge parses Java sources with its javac-style front end, converts the trees \
                  into the unified AST with reconciled positions, comments and problems, and checks \
                  the result for structural consistency."
)]
pub struct Cli {
    /// Also log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for the rolling log files [default: ~/.jdt-bridge/logs]
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log filter directives, overriding RUST_LOG
    #[arg(long, global = true, value_name = "DIRECTIVES")]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Args, Clone)]
pub struct ResolveArgs {
    /// API level ordinal (2, 3, 4, 8..=21). Defaults to the latest
    #[arg(long, value_name = "N")]
    pub api_level: Option<u32>,

    /// Eclipse compiler preferences file (`key=value` lines)
    #[arg(long, value_name = "PREFS")]
    pub options: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the unified tree and problems of one file
    Parse {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        resolve: ResolveArgs,

        /// Print the unit as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare the unified trees of two files
    #[command(
        long_about = "Converts both files and walks the two trees in lock-step. Exits with an error \
                      on the first divergence that is not one of the tolerated shapes."
    )]
    Compare {
        #[arg(value_name = "LEFT")]
        left: PathBuf,

        #[arg(value_name = "RIGHT")]
        right: PathBuf,

        #[command(flatten)]
        resolve: ResolveArgs,
    },
    /// Convert several files in parallel and check their range invariants
    Check {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        resolve: ResolveArgs,
    },
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = LogSettings::new("cli")
        .dir(cli.log_dir.clone())
        .filter(cli.log_filter.clone())
        .stderr(cli.verbose)
        .init()?;

    match cli.command {
        Commands::Parse {
            file,
            resolve,
            json,
        } => parse::run(&file, &resolve, json),
        Commands::Compare {
            left,
            right,
            resolve,
        } => compare::run(&left, &right, &resolve),
        Commands::Check { files, resolve } => check::run(&files, &resolve),
    }
}

impl ResolveArgs {
    pub(crate) fn resolver(&self) -> anyhow::Result<jdt_bridge_core::CompilationUnitResolver> {
        use anyhow::Context;
        use jdt_bridge_api::ApiLevel;
        use jdt_bridge_core::CompilerOptions;

        let api_level = match self.api_level {
            Some(ordinal) => jdt_bridge_core::options::api_level(ordinal)?,
            None => ApiLevel::latest(),
        };
        let options = match &self.options {
            Some(path) => CompilerOptions::from_prefs_file(path)
                .with_context(|| format!("Failed to read options from {}", path.display()))?,
            None => CompilerOptions::default(),
        };
        tracing::debug!("Resolving at API level {} with {} options", api_level, options.len());
        Ok(jdt_bridge_core::CompilationUnitResolver::new(api_level, options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_flags_are_global() {
        let cli = Cli::try_parse_from([
            "jdt-bridge",
            "check",
            "A.java",
            "--log-dir",
            "/tmp/logs",
            "--log-filter",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(cli.log_filter.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Check { ref files, .. } if files.len() == 1));
    }
}
