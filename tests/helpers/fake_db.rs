//! An in-memory [`Database`] that answers introspection queries from canned rows.

use anyhow::{Result, anyhow};
use pgdelta::db::{Database, Row};
use std::future::Future;
use std::sync::Mutex;

/// Fragments that identify each introspection query.
pub const TABLES: &str = "c.relrowsecurity";
pub const COLUMNS: &str = "FROM pg_attribute a";
pub const CONSTRAINTS: &str = "con.contype IN ('p', 'u', 'c')";
pub const ENUMS: &str = "FROM pg_enum";

/// Queries are answered by the first registered fragment they contain;
/// anything else returns no rows. Executed statements are recorded.
#[derive(Default)]
pub struct FakeDatabase {
    responses: Vec<(String, Vec<Row>)>,
    failures: Vec<String>,
    executed: Mutex<Vec<String>>,
    queried: Mutex<Vec<String>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds rows to the answer for queries containing `fragment`.
    pub fn respond(mut self, fragment: &str, rows: Vec<Row>) -> Self {
        match self.responses.iter_mut().find(|(f, _)| f == fragment) {
            Some((_, existing)) => existing.extend(rows),
            None => self.responses.push((fragment.to_string(), rows)),
        }
        self
    }

    /// Makes every query or statement containing `fragment` fail.
    pub fn fail_on(mut self, fragment: &str) -> Self {
        self.failures.push(fragment.to_string());
        self
    }

    /// A `public` table with `(name, type, not_null)` columns.
    pub fn with_table(self, name: &str, columns: &[(&str, &str, bool)]) -> Self {
        let table = Row::from_pairs([
            ("schema", Some("public")),
            ("name", Some(name)),
            ("rls_enabled", Some("false")),
        ]);
        let columns = columns
            .iter()
            .map(|(column, type_name, not_null)| column_row(name, column, type_name, *not_null))
            .collect();
        self.respond(TABLES, vec![table]).respond(COLUMNS, columns)
    }

    pub fn with_primary_key(self, table: &str, name: &str, columns: &[&str]) -> Self {
        let columns = columns.join("\u{1f}");
        let row = Row::from_pairs([
            ("schema", Some("public")),
            ("table_name", Some(table)),
            ("name", Some(name)),
            ("kind", Some("p")),
            ("columns", Some(columns.as_str())),
            ("definition", Some("PRIMARY KEY")),
            ("nulls_not_distinct", Some("false")),
        ]);
        self.respond(CONSTRAINTS, vec![row])
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }

    fn check(&self, sql: &str) -> Result<()> {
        match self.failures.iter().find(|f| sql.contains(f.as_str())) {
            Some(fragment) => Err(anyhow!("simulated failure on '{}'", fragment)),
            None => Ok(()),
        }
    }
}

pub fn column_row(table: &str, name: &str, type_name: &str, not_null: bool) -> Row {
    Row::from_pairs([
        ("schema", Some("public")),
        ("table_name", Some(table)),
        ("name", Some(name)),
        ("type_name", Some(type_name)),
        ("typtype", Some("b")),
        ("type_schema", Some("pg_catalog")),
        ("raw_type", Some(type_name)),
        ("dimensions", Some("0")),
        ("not_null", Some(if not_null { "true" } else { "false" })),
        ("generated_kind", Some("")),
        ("expression", None),
    ])
}

impl Database for FakeDatabase {
    fn query(&self, sql: &str) -> impl Future<Output = Result<Vec<Row>>> + Send {
        self.queried.lock().unwrap().push(sql.to_string());
        let result = self.check(sql).map(|_| {
            self.responses
                .iter()
                .find(|(fragment, _)| sql.contains(fragment.as_str()))
                .map(|(_, rows)| rows.clone())
                .unwrap_or_default()
        });
        std::future::ready(result)
    }

    fn execute(&self, sql: &str) -> impl Future<Output = Result<()>> + Send {
        let result = self.check(sql);
        if result.is_ok() {
            self.executed.lock().unwrap().push(sql.to_string());
        }
        std::future::ready(result)
    }
}
