//! Database access: the capability the live flows are written against, and
//! its PostgreSQL implementation.

pub mod connection;
pub mod error_context;
pub mod introspect;

pub use connection::{PgDatabase, connect_to_database, mask_url_password};

use anyhow::{Result, anyhow};
use std::future::Future;

/// One result row with every value decoded as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub columns: Vec<String>,
    pub values: Vec<Option<String>>,
}

impl Row {
    pub fn new(columns: Vec<String>, values: Vec<Option<String>>) -> Self {
        Self { columns, values }
    }

    /// Builds a row from `(column, value)` pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, Option<&'a str>)>) -> Self {
        let (columns, values) = pairs
            .into_iter()
            .map(|(c, v)| (c.to_string(), v.map(str::to_string)))
            .unzip();
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|idx| self.values.get(idx))
            .and_then(|v| v.as_deref())
    }

    pub fn text(&self, column: &str) -> Result<String> {
        self.get(column)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("column '{}' is missing or NULL", column))
    }

    pub fn flag(&self, column: &str) -> bool {
        matches!(self.get(column), Some("t" | "true"))
    }

    pub fn int(&self, column: &str) -> Result<Option<i64>> {
        self.get(column)
            .map(|v| {
                v.parse::<i64>()
                    .map_err(|e| anyhow!("column '{}' is not an integer ({}): {}", column, v, e))
            })
            .transpose()
    }
}

/// Query and execute access to a live database.
pub trait Database {
    fn query(&self, sql: &str) -> impl Future<Output = Result<Vec<Row>>> + Send;

    fn execute(&self, sql: &str) -> impl Future<Output = Result<()>> + Send;
}
