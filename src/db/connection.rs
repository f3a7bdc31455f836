use super::error_context::StatementFailure;
use super::{Database, Row};
use anyhow::{Context, Result};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{Column, PgPool, Row as _};
use std::time::Duration;
use tracing::{debug, info};

/// Mask password in database URL for display
pub fn mask_url_password(url: &str) -> String {
    let Some((protocol, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    // user:pass@host or user@host
    if let Some(at_pos) = rest.rfind('@') {
        let user_info = &rest[..at_pos];
        let host_and_path = &rest[at_pos + 1..];

        if let Some((username, _)) = user_info.split_once(':') {
            return format!("{}://{}:***@{}", protocol, username, host_and_path);
        }
    }

    url.to_string()
}

/// Connect to a database with a 5-second timeout and enriched error messages
///
/// The `label` describes the database role (e.g., "target database") and is
/// included in error messages along with the masked URL.
pub async fn connect_to_database(url: &str, label: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await
        .with_context(|| format!("Failed to connect to {} at {}", label, mask_url_password(url)))
}

/// [`Database`] over a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        let pool = connect_to_database(url, "target database").await?;
        info!("✅ Connected to {}", mask_url_password(url));
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Reads every column as text. Catalog queries cast to `::text`; the numeric
/// and boolean fallbacks cover probes that select bare literals.
fn decode_row(row: &PgRow) -> Row {
    let mut columns = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (idx, column) in row.columns().iter().enumerate() {
        columns.push(column.name().to_string());
        let value = row
            .try_get::<Option<String>, _>(idx)
            .ok()
            .flatten()
            .or_else(|| row.try_get::<Option<i32>, _>(idx).ok().flatten().map(|v| v.to_string()))
            .or_else(|| row.try_get::<Option<i64>, _>(idx).ok().flatten().map(|v| v.to_string()))
            .or_else(|| row.try_get::<Option<bool>, _>(idx).ok().flatten().map(|v| v.to_string()));
        values.push(value);
    }
    Row::new(columns, values)
}

impl Database for PgDatabase {
    async fn query(&self, sql: &str) -> Result<Vec<Row>> {
        let rows = sqlx::query(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StatementFailure::from_sqlx_error(&e, sql).into_error(sql))?;
        debug!("Query returned {} row(s)", rows.len());
        Ok(rows.iter().map(decode_row).collect())
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        sqlx::raw_sql(sql)
            .execute(&self.pool)
            .await
            .map_err(|e| StatementFailure::from_sqlx_error(&e, sql).into_error(sql))?;
        Ok(())
    }
}
