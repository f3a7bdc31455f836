//! Structural diff between two schema snapshots.
//!
//! The differ works on a private copy of the old snapshot. Each kind is first
//! resolved (renames are replayed onto the copy), then compared attribute by
//! attribute; every resulting step lands in a fixed [`Phase`].

pub mod columns;
pub mod constraints;
pub mod enums;
pub mod indexes;
pub mod mode;
pub mod operations;
pub mod ordering;
pub mod policies;
pub mod rename;
pub mod roles;
pub mod schemas;
pub mod sequences;
pub mod tables;
pub mod views;

pub use mode::Mode;
pub use ordering::Phase;

use crate::ddl::validate::validate;
use crate::ddl::{Ddl, Table};
use crate::error::{DiffError, SchemaErrors};
use crate::render::{RenderedSql, SqlRenderer};
use crate::resolver::{RenameResolver, Resolution, Resolvers};
use operations::MigrationStep;
use ordering::Plan;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// One step with the statements it renders to.
#[derive(Debug, Clone, Serialize)]
pub struct GroupedStatement {
    pub description: String,
    pub step: MigrationStep,
    pub sql_statements: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiffResult {
    pub steps: Vec<MigrationStep>,
    pub sql_statements: Vec<String>,
    pub grouped: Vec<GroupedStatement>,
    /// The snapshot the statements converge to.
    #[serde(skip)]
    pub next: Ddl,
}

impl DiffResult {
    fn new(steps: Vec<MigrationStep>, next: Ddl) -> Self {
        let grouped: Vec<GroupedStatement> = steps
            .iter()
            .map(|step| GroupedStatement {
                description: step.describe(),
                step: step.clone(),
                sql_statements: step.to_sql().into_iter().map(|r| r.sql).collect(),
            })
            .collect();
        let sql_statements = grouped
            .iter()
            .flat_map(|g| g.sql_statements.iter().cloned())
            .collect();
        Self {
            steps,
            sql_statements,
            grouped,
            next,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn rendered(&self) -> Vec<RenderedSql> {
        self.steps.iter().flat_map(|s| s.to_sql()).collect()
    }

    pub fn has_destructive_steps(&self) -> bool {
        self.steps.iter().any(|s| s.is_destructive())
    }
}

pub(crate) type TableKey = (String, String);
pub(crate) type ColumnKey = (String, String, String);

/// Working state shared by the per-kind passes.
pub struct DiffContext<'a> {
    /// The old snapshot with every resolved rename replayed onto it.
    pub state: Ddl,
    pub to: &'a Ddl,
    pub mode: Mode,
    pub plan: Plan,
    pub created_tables: Vec<TableKey>,
    pub dropped_tables: Vec<TableKey>,
    /// Columns whose type and default are handled by an enum recreation.
    pub juggled_columns: BTreeSet<ColumnKey>,
}

impl<'a> DiffContext<'a> {
    pub fn new(state: Ddl, to: &'a Ddl, mode: Mode) -> Self {
        Self {
            state,
            to,
            mode,
            plan: Plan::new(),
            created_tables: Vec::new(),
            dropped_tables: Vec::new(),
            juggled_columns: BTreeSet::new(),
        }
    }

    /// Tables present in both snapshots once renames are applied, in target order.
    pub fn surviving_tables(&self) -> Vec<Table> {
        self.to
            .tables
            .iter()
            .filter(|t| self.state.has_table(&t.schema, &t.name))
            .cloned()
            .collect()
    }

    pub fn is_juggled(&self, schema: &str, table: &str, column: &str) -> bool {
        self.juggled_columns
            .contains(&(schema.to_string(), table.to_string(), column.to_string()))
    }
}

/// Computes the steps that turn `from` into `to`.
pub fn diff(
    from: &Ddl,
    to: &Ddl,
    resolvers: &Resolvers<'_>,
    mode: Mode,
) -> Result<DiffResult, DiffError> {
    info!("Diffing snapshots ({} mode)...", mode);
    let from_normalized = from.normalized();
    let to_normalized = to.normalized();
    check_snapshots(&from_normalized, &to_normalized)?;

    let mut ctx = DiffContext::new(from_normalized, &to_normalized, mode);

    schemas::diff(&mut ctx, resolvers.schemas);
    roles::diff(&mut ctx, resolvers.roles);
    enums::resolve(&mut ctx, resolvers.enums);
    sequences::diff(&mut ctx, resolvers.sequences);
    views::resolve(&mut ctx, resolvers.views);
    tables::resolve(&mut ctx, resolvers.tables);
    columns::resolve(&mut ctx, resolvers.columns);
    constraints::diff(&mut ctx, resolvers)?;
    indexes::diff(&mut ctx, resolvers.indexes);
    policies::diff(&mut ctx, resolvers.policies);
    enums::compare(&mut ctx);
    columns::compare(&mut ctx);
    tables::compare(&mut ctx);
    views::compare(&mut ctx);

    let steps = ctx.plan.into_steps();
    info!("Diff complete: {} step(s)", steps.len());
    Ok(DiffResult::new(steps, to.clone()))
}

fn check_snapshots(from: &Ddl, to: &Ddl) -> Result<(), DiffError> {
    let mut issues = Vec::new();
    for snapshot in [from, to] {
        if let Err(errors) = validate(snapshot) {
            for issue in errors.0 {
                if !issues.contains(&issue) {
                    issues.push(issue);
                }
            }
        }
    }
    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaErrors(issues).into())
    }
}

/// Pairs up entities by key: every old entity in old order (with its match,
/// if any), then the new-only entities in new order.
pub fn diff_list<'t, T, K: Ord>(
    old: &'t [T],
    new: &'t [T],
    key_of: impl Fn(&T) -> K,
) -> Vec<(Option<&'t T>, Option<&'t T>)> {
    let new_map: BTreeMap<K, &T> = new.iter().map(|n| (key_of(n), n)).collect();
    let old_keys: BTreeSet<K> = old.iter().map(&key_of).collect();

    let mut pairs: Vec<(Option<&T>, Option<&T>)> = old
        .iter()
        .map(|o| (Some(o), new_map.get(&key_of(o)).copied()))
        .collect();
    pairs.extend(
        new.iter()
            .filter(|n| !old_keys.contains(&key_of(n)))
            .map(|n| (None, Some(n))),
    );
    pairs
}

/// Splits entities into old-only and new-only by key and asks the resolver
/// which of them are renames.
pub fn resolve_renames<T: Clone, K: Ord>(
    resolver: &dyn RenameResolver<T>,
    old: &[T],
    new: &[T],
    key_of: impl Fn(&T) -> K,
) -> Resolution<T> {
    let mut only_in_from = Vec::new();
    let mut only_in_to = Vec::new();
    for pair in diff_list(old, new, key_of) {
        match pair {
            (Some(o), None) => only_in_from.push(o.clone()),
            (None, Some(n)) => only_in_to.push(n.clone()),
            _ => {}
        }
    }
    if only_in_from.is_empty() || only_in_to.is_empty() {
        return Resolution::unmatched(only_in_from, only_in_to);
    }
    let resolution = resolver.resolve(only_in_from, only_in_to);
    if !resolution.matched.is_empty() {
        debug!("Resolved {} rename(s)", resolution.matched.len());
    }
    resolution
}
