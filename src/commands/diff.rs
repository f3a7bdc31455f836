//! pgdelta diff - compare two snapshot files offline

use super::{declared_renames, output, read_snapshot};
use anyhow::{Context, Result};
use pgdelta::config::Config;
use pgdelta::ddl::Ddl;
use pgdelta::diff;
use pgdelta::resolver::Resolvers;
use std::path::PathBuf;
use tracing::info;

#[derive(clap::ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum DiffFormat {
    /// Statements only, ready to run
    #[default]
    Sql,
    /// Steps, statements and grouped statements as JSON
    Json,
    /// One line per step followed by the statements
    Summary,
}

#[derive(Debug, Clone)]
pub struct DiffCommand {
    /// Omitted means an empty database.
    pub from: Option<PathBuf>,
    pub to: PathBuf,
    pub format: DiffFormat,
    pub output: Option<PathBuf>,
}

/// Returns whether the snapshots differ.
pub fn cmd_diff(config: &Config, args: &DiffCommand) -> Result<bool> {
    let from = match &args.from {
        Some(path) => read_snapshot(path)?,
        None => Ddl::new(),
    };
    let to = read_snapshot(&args.to)?;
    let filter = config.filter();
    let from = filter.apply(from);
    let to = filter.apply(to);

    let renames = declared_renames(config)?;
    let result = diff::diff(&from, &to, &Resolvers::uniform(&renames), config.diff.mode)?;
    info!("{} statement(s)", result.sql_statements.len());

    let sql_text = || {
        let mut sql = result.sql_statements.join("\n\n");
        if !sql.is_empty() {
            sql.push('\n');
        }
        sql
    };

    let rendered = match args.format {
        DiffFormat::Sql => sql_text(),
        DiffFormat::Json => {
            serde_json::to_string_pretty(&result).context("Failed to serialize diff")? + "\n"
        }
        DiffFormat::Summary => {
            if result.is_empty() {
                println!("✅ No differences found");
            } else {
                output::print_plan_header(&result);
                output::print_concise_plan(&result);
                output::print_statements(&result);
            }
            // The summary goes to the terminal; a file still gets plain SQL.
            if args.output.is_some() {
                sql_text()
            } else {
                String::new()
            }
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Wrote {} statement(s) to {}",
                result.sql_statements.len(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(!result.is_empty())
}
