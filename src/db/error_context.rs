//! Error reports for statements PostgreSQL rejects during a push.

use sqlx::postgres::{PgDatabaseError, PgErrorPosition};

/// What went wrong with one migration statement.
#[derive(Debug, Clone, Default)]
pub struct StatementFailure {
    pub message: String,
    /// SQLSTATE, e.g. `23502` for not_null_violation.
    pub code: Option<String>,
    /// Line of the statement the server pointed at.
    pub line: Option<usize>,
    pub detail: Option<String>,
    pub hint: Option<String>,
}

impl StatementFailure {
    pub fn from_sqlx_error(error: &sqlx::Error, statement: &str) -> Self {
        let Some(pg_error) = error
            .as_database_error()
            .and_then(|e| e.try_downcast_ref::<PgDatabaseError>())
        else {
            return Self {
                message: error.to_string(),
                ..Default::default()
            };
        };

        let position = pg_error.position().map(|pos| match pos {
            PgErrorPosition::Original(p) => p,
            PgErrorPosition::Internal { position, .. } => position,
        });
        Self {
            message: pg_error.message().to_string(),
            code: Some(pg_error.code().to_string()),
            line: position.map(|p| line_of(statement, p)),
            detail: pg_error.detail().map(str::to_string),
            hint: pg_error.hint().map(str::to_string),
        }
    }

    /// Data-dependent failures a schema change commonly runs into.
    pub fn data_guidance(&self) -> Option<&'static str> {
        match self.code.as_deref()? {
            "23502" => Some("existing rows hold NULL in a column that is becoming NOT NULL"),
            "23505" => Some("existing rows hold duplicates for a new unique key"),
            "23503" => Some("existing rows reference keys that do not exist"),
            "23514" => Some("existing rows violate the new check constraint"),
            "2BP01" => Some("other objects depend on the object being dropped"),
            "22P02" | "42804" => Some("existing values cannot be cast to the new type"),
            _ => None,
        }
    }

    pub fn render(&self, statement: &str) -> String {
        let mut out = match &self.code {
            Some(code) => format!("statement failed [{}]: {}", code, self.message),
            None => format!("statement failed: {}", self.message),
        };
        for (label, value) in [("detail", &self.detail), ("hint", &self.hint)] {
            if let Some(value) = value {
                out.push_str(&format!("\n  {}: {}", label, value));
            }
        }
        if let Some(guidance) = self.data_guidance() {
            out.push_str(&format!("\n  likely cause: {}", guidance));
        }
        out.push('\n');
        for (i, text) in statement.lines().enumerate() {
            let marker = if self.line == Some(i + 1) { '>' } else { ' ' };
            out.push_str(&format!("\n  {} {}", marker, text));
        }
        out
    }

    pub fn into_error(self, statement: &str) -> anyhow::Error {
        anyhow::anyhow!("{}", self.render(statement))
    }
}

/// 1-based line for a 1-based character position.
fn line_of(statement: &str, position: usize) -> usize {
    statement
        .chars()
        .take(position.saturating_sub(1))
        .filter(|c| *c == '\n')
        .count()
        + 1
}
