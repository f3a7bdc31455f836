use crate::ddl::EntityKind;
use std::fmt;
use thiserror::Error;

/// Failures that stop a diff before any statement is produced.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("{0}")]
    Schema(SchemaErrors),

    #[error("refusing to {action} on {table}: {reason}")]
    UnsupportedTransition {
        table: String,
        action: String,
        reason: String,
    },

    #[error("invalid rename declaration '{0}': expected '<old>-><new>'")]
    InvalidRename(String),

    #[error(
        "schema still differs after push ({} statement(s) remain):\n{}",
        .0.len(),
        .0.join("\n")
    )]
    ResidualDiff(Vec<String>),
}

/// One duplicate name found while validating a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaIssue {
    pub kind: EntityKind,
    /// Where the name must be unique, e.g. `table public.users` or `schema public`.
    pub scope: String,
    pub name: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate {} name \"{}\" in {}", self.kind, self.name, self.scope)
    }
}

/// Every duplicate found in a snapshot, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaErrors(pub Vec<SchemaIssue>);

impl SchemaErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn issues(&self) -> &[SchemaIssue] {
        &self.0
    }
}

impl fmt::Display for SchemaErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "schema has {} naming conflict(s):", self.0.len())?;
        for issue in &self.0 {
            writeln!(f, "  - {}", issue)?;
        }
        Ok(())
    }
}

impl From<SchemaErrors> for DiffError {
    fn from(errors: SchemaErrors) -> Self {
        DiffError::Schema(errors)
    }
}
