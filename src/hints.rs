//! Advisory probes for steps that can fail on existing data.
//!
//! Nothing here blocks a push: every probe that errors or returns a row turns
//! into a [`Hint`] for the user to read before the statements run.

use crate::db::Database;
use crate::diff::operations::{
    ColumnAction, ColumnOperation, ConstraintOperation, MigrationStep, TableOperation,
};
use crate::render::{qualified_name, quote_ident};
use itertools::Itertools;
use std::collections::BTreeSet;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    /// Description of the step the hint is about.
    pub step: String,
    pub message: String,
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step, self.message)
    }
}

struct Probe {
    step: String,
    sql: String,
    message: String,
}

/// Tables and columns whose current name differs from the one the steps use.
#[derive(Default)]
struct Unprobeable {
    tables: BTreeSet<(String, String)>,
    columns: BTreeSet<(String, String, String)>,
}

impl Unprobeable {
    fn from_steps(steps: &[MigrationStep]) -> Self {
        let mut skip = Self::default();
        for step in steps {
            match step {
                MigrationStep::Table(TableOperation::Create { table, .. }) => {
                    skip.tables.insert((table.schema.clone(), table.name.clone()));
                }
                MigrationStep::Table(TableOperation::Rename { schema, to, .. }) => {
                    skip.tables.insert((schema.clone(), to.clone()));
                }
                MigrationStep::Table(TableOperation::Move {
                    name, to_schema, ..
                }) => {
                    skip.tables.insert((to_schema.clone(), name.clone()));
                }
                MigrationStep::Column(ColumnOperation::Rename {
                    schema, table, to, ..
                }) => {
                    skip.columns
                        .insert((schema.clone(), table.clone(), to.clone()));
                }
                _ => {}
            }
        }
        skip
    }

    fn table(&self, schema: &str, table: &str) -> bool {
        self.tables.contains(&(schema.to_string(), table.to_string()))
    }

    fn any_column(&self, schema: &str, table: &str, columns: &[String]) -> bool {
        self.table(schema, table)
            || columns.iter().any(|c| {
                self.columns
                    .contains(&(schema.to_string(), table.to_string(), c.clone()))
            })
    }
}

fn null_probe(schema: &str, table: &str, columns: &[String]) -> String {
    let condition = columns
        .iter()
        .map(|c| format!("{} IS NULL", quote_ident(c)))
        .join(" OR ");
    format!(
        "SELECT 1 FROM {} WHERE {} LIMIT 1",
        qualified_name(schema, table),
        condition
    )
}

fn duplicate_probe(schema: &str, table: &str, columns: &[String], nulls_distinct: bool) -> String {
    let list = columns.iter().map(|c| quote_ident(c)).join(", ");
    let filter = if nulls_distinct {
        format!(
            " WHERE {}",
            columns
                .iter()
                .map(|c| format!("{} IS NOT NULL", quote_ident(c)))
                .join(" AND ")
        )
    } else {
        String::new()
    };
    format!(
        "SELECT 1 FROM {}{} GROUP BY {} HAVING count(*) > 1 LIMIT 1",
        qualified_name(schema, table),
        filter,
        list
    )
}

fn probes_for(step: &MigrationStep, skip: &Unprobeable) -> Vec<Probe> {
    let describe = || step.describe();
    match step {
        MigrationStep::Column(ColumnOperation::Alter { column, actions })
            if actions.contains(&ColumnAction::SetNotNull) =>
        {
            let columns = std::slice::from_ref(&column.name);
            if skip.any_column(&column.schema, &column.table, columns) {
                return Vec::new();
            }
            vec![Probe {
                step: describe(),
                sql: null_probe(&column.schema, &column.table, columns),
                message: format!(
                    "column {} contains NULL values; SET NOT NULL will fail until they are filled",
                    quote_ident(&column.name)
                ),
            }]
        }
        MigrationStep::Column(ColumnOperation::Add { column })
            if column.not_null
                && column.default.is_none()
                && column.generated.is_none()
                && !column.column_type.is_serial() =>
        {
            if skip.table(&column.schema, &column.table) {
                return Vec::new();
            }
            vec![Probe {
                step: describe(),
                sql: format!(
                    "SELECT 1 FROM {} LIMIT 1",
                    qualified_name(&column.schema, &column.table)
                ),
                message: format!(
                    "table {} has rows; adding NOT NULL column {} without a default will fail",
                    qualified_name(&column.schema, &column.table),
                    quote_ident(&column.name)
                ),
            }]
        }
        MigrationStep::Constraint(ConstraintOperation::AddUnique { unique }) => {
            if skip.any_column(&unique.schema, &unique.table, &unique.columns) {
                return Vec::new();
            }
            vec![Probe {
                step: describe(),
                sql: duplicate_probe(
                    &unique.schema,
                    &unique.table,
                    &unique.columns,
                    !unique.nulls_not_distinct,
                ),
                message: format!(
                    "duplicate values in ({}) will make unique constraint {} fail",
                    unique.columns.join(", "),
                    quote_ident(&unique.name)
                ),
            }]
        }
        MigrationStep::Constraint(
            ConstraintOperation::AddPrimaryKey { primary_key }
            | ConstraintOperation::ReplacePrimaryKey { primary_key, .. },
        ) => {
            let (schema, table, columns) =
                (&primary_key.schema, &primary_key.table, &primary_key.columns);
            if skip.any_column(schema, table, columns) {
                return Vec::new();
            }
            vec![
                Probe {
                    step: describe(),
                    sql: duplicate_probe(schema, table, columns, false),
                    message: format!(
                        "duplicate values in ({}) will make primary key {} fail",
                        columns.join(", "),
                        quote_ident(&primary_key.name)
                    ),
                },
                Probe {
                    step: describe(),
                    sql: null_probe(schema, table, columns),
                    message: format!(
                        "NULL values in ({}) will make primary key {} fail",
                        columns.join(", "),
                        quote_ident(&primary_key.name)
                    ),
                },
            ]
        }
        _ => Vec::new(),
    }
}

/// Probes the live database for data that would make `steps` fail.
pub async fn suggestions<D: Database>(db: &D, steps: &[MigrationStep]) -> Vec<Hint> {
    let skip = Unprobeable::from_steps(steps);
    let mut hints = Vec::new();

    for probe in steps.iter().flat_map(|step| probes_for(step, &skip)) {
        debug!("Probing: {}", probe.sql);
        let message = match db.query(&probe.sql).await {
            Ok(rows) if rows.is_empty() => continue,
            Ok(_) => probe.message,
            Err(e) => format!("could not check existing data ({})", e),
        };
        let hint = Hint {
            step: probe.step,
            message,
        };
        warn!("{}", hint);
        hints.push(hint);
    }

    hints
}
