//! pgdelta introspect - dump a live database as a snapshot

use super::database_url;
use anyhow::{Context, Result};
use pgdelta::config::Config;
use pgdelta::db::PgDatabase;
use pgdelta::db::introspect::introspect;
use pgdelta::progress::ProgressReporter;
use std::path::Path;

pub async fn cmd_introspect(
    config: &Config,
    output: Option<&Path>,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    let db = PgDatabase::connect(database_url(config)?).await?;
    let ddl = introspect(&db, &config.filter(), progress).await?;
    let json = ddl.to_json().context("Failed to serialize snapshot")?;

    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "✅ Wrote {} table(s) to {}",
                ddl.tables.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
