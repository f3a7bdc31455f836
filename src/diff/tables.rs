//! Diff tables: renames and moves, creation with inline constraints, drops in
//! reference order, and row-level security toggles.

use crate::ddl::{EntityKind, Table};
use crate::diff::operations::{
    ConstraintOperation, IndexOperation, MigrationStep, PolicyOperation, TableOperation,
};
use crate::diff::ordering::table_drop_order;
use crate::diff::{DiffContext, Phase, rename, resolve_renames};
use crate::resolver::RenameResolver;

fn key(t: &Table) -> (String, String) {
    (t.schema.clone(), t.name.clone())
}

pub fn resolve(ctx: &mut DiffContext<'_>, resolver: &dyn RenameResolver<Table>) {
    let resolution = resolve_renames(resolver, &ctx.state.tables, &ctx.to.tables, key);

    for (old, new) in resolution.matched {
        if old.schema != new.schema {
            ctx.plan.push(
                Phase::RenameTables,
                MigrationStep::Table(TableOperation::Move {
                    name: old.name.clone(),
                    from_schema: old.schema.clone(),
                    to_schema: new.schema.clone(),
                }),
            );
        }
        if old.name != new.name {
            ctx.plan.push(
                Phase::RenameTables,
                MigrationStep::Table(TableOperation::Rename {
                    schema: new.schema.clone(),
                    from: old.name.clone(),
                    to: new.name.clone(),
                }),
            );
        }
        rename::rename_table(
            &mut ctx.state,
            (&old.schema, &old.name),
            (&new.schema, &new.name),
        );
    }

    ctx.created_tables = resolution.unmatched_to.iter().map(key).collect();
    ctx.dropped_tables = resolution.unmatched_from.iter().map(key).collect();
}

pub fn compare(ctx: &mut DiffContext<'_>) {
    create_tables(ctx);
    drop_tables(ctx);

    for table in ctx.surviving_tables() {
        let Some(old) = ctx.state.table(&table.schema, &table.name) else {
            continue;
        };
        let was_enabled = ctx.state.rls_enabled(old);
        let is_enabled = ctx.to.rls_enabled(&table);
        if was_enabled == is_enabled {
            continue;
        }
        let op = if is_enabled {
            TableOperation::EnableRls {
                schema: table.schema,
                name: table.name,
            }
        } else {
            TableOperation::DisableRls {
                schema: table.schema,
                name: table.name,
            }
        };
        ctx.plan.push(Phase::Rls, MigrationStep::Table(op));
    }
}

/// New tables carry their columns, primary key, unique and check constraints
/// inline; foreign keys, indexes and policies follow as separate steps.
fn create_tables(ctx: &mut DiffContext<'_>) {
    let to = ctx.to;
    for (schema, name) in ctx.created_tables.clone() {
        let Some(table) = to.table(&schema, &name) else {
            continue;
        };

        ctx.plan.push(
            Phase::CreateTables,
            MigrationStep::Table(TableOperation::Create {
                table: table.clone(),
                columns: to.columns_of(&schema, &name).cloned().collect(),
                primary_key: to.primary_key_of(&schema, &name).cloned(),
                uniques: to
                    .uniques
                    .iter()
                    .filter(|u| u.belongs_to(&schema, &name))
                    .cloned()
                    .collect(),
                checks: to
                    .checks
                    .iter()
                    .filter(|c| c.belongs_to(&schema, &name))
                    .cloned()
                    .collect(),
            }),
        );
        if to.rls_enabled(table) {
            ctx.plan.push(
                Phase::CreateTables,
                MigrationStep::Table(TableOperation::EnableRls {
                    schema: schema.clone(),
                    name: name.clone(),
                }),
            );
        }

        ctx.plan.extend(
            Phase::CreateIndexes,
            to.indexes
                .iter()
                .filter(|i| i.belongs_to(&schema, &name))
                .map(|index| {
                    MigrationStep::Index(IndexOperation::Create {
                        index: index.clone(),
                    })
                }),
        );
        ctx.plan.extend(
            Phase::AddForeignKeys,
            to.foreign_keys
                .iter()
                .filter(|fk| fk.belongs_to(&schema, &name))
                .map(|fk| {
                    MigrationStep::Constraint(ConstraintOperation::AddForeignKey {
                        foreign_key: fk.clone(),
                    })
                }),
        );
        ctx.plan.extend(
            Phase::Policies,
            to.policies_of(&schema, &name).map(|policy| {
                MigrationStep::Policy(PolicyOperation::Create {
                    policy: policy.clone(),
                })
            }),
        );
    }
}

/// Everything a dropped table owns goes with it; only foreign keys that tie
/// dropped tables into a cycle are dropped explicitly first.
fn drop_tables(ctx: &mut DiffContext<'_>) {
    if ctx.dropped_tables.is_empty() {
        return;
    }
    let (order, cycle_breakers) =
        table_drop_order(&ctx.dropped_tables, ctx.state.foreign_keys.iter());

    let breakers: Vec<MigrationStep> = cycle_breakers
        .into_iter()
        .map(|fk| {
            MigrationStep::Constraint(ConstraintOperation::Drop {
                schema: fk.schema.clone(),
                table: fk.table.clone(),
                name: fk.name.clone(),
                kind: EntityKind::ForeignKey,
            })
        })
        .collect();
    ctx.plan.extend(Phase::DropForeignKeys, breakers);

    for (schema, name) in order {
        ctx.plan.push(
            Phase::DropTables,
            MigrationStep::Table(TableOperation::Drop { schema, name }),
        );
    }
}
