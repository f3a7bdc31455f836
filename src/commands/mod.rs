pub mod diff;
pub mod introspect;
pub mod output;
pub mod push;

pub use diff::{DiffFormat, cmd_diff};
pub use introspect::cmd_introspect;
pub use push::cmd_push;

use anyhow::{Context, Result};
use pgdelta::Ddl;
use pgdelta::config::Config;
use pgdelta::resolver::DeclaredRenames;
use std::path::Path;

/// Reads a JSON snapshot file.
pub fn read_snapshot(path: &Path) -> Result<Ddl> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    Ddl::from_json(&contents)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

pub fn declared_renames(config: &Config) -> Result<DeclaredRenames> {
    Ok(DeclaredRenames::parse(&config.diff.renames)?)
}

pub fn database_url(config: &Config) -> Result<&str> {
    config
        .database
        .url
        .as_deref()
        .context("No database URL given; pass --url or set DATABASE_URL")
}
