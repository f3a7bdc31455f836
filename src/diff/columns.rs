//! Diff columns of tables present on both sides.

use crate::ddl::{Column, Ddl, default::equivalent_defaults};
use crate::diff::operations::{ColumnAction, ColumnOperation, MigrationStep};
use crate::diff::{DiffContext, Phase, rename, resolve_renames};
use crate::resolver::RenameResolver;
use tracing::debug;

pub fn resolve(ctx: &mut DiffContext<'_>, resolver: &dyn RenameResolver<Column>) {
    for table in ctx.surviving_tables() {
        let old: Vec<Column> = ctx
            .state
            .columns_of(&table.schema, &table.name)
            .cloned()
            .collect();
        let new: Vec<Column> = ctx
            .to
            .columns_of(&table.schema, &table.name)
            .cloned()
            .collect();
        let resolution = resolve_renames(resolver, &old, &new, |c| c.name.clone());

        for (from, to) in resolution.matched {
            ctx.plan.push(
                Phase::RenameColumns,
                MigrationStep::Column(ColumnOperation::Rename {
                    schema: table.schema.clone(),
                    table: table.name.clone(),
                    from: from.name.clone(),
                    to: to.name.clone(),
                }),
            );
            rename::rename_column(
                &mut ctx.state,
                &table.schema,
                &table.name,
                &from.name,
                &to.name,
            );
        }

        for dropped in resolution.unmatched_from {
            ctx.plan.push(
                Phase::DropColumns,
                MigrationStep::Column(ColumnOperation::Drop {
                    schema: dropped.schema,
                    table: dropped.table,
                    name: dropped.name,
                }),
            );
        }

        for added in resolution.unmatched_to {
            ctx.plan.push(
                Phase::AddColumns,
                MigrationStep::Column(ColumnOperation::Add { column: added }),
            );
        }
    }
}

/// Primary-key membership and serial types imply NOT NULL.
fn effective_not_null(ddl: &Ddl, column: &Column) -> bool {
    column.not_null
        || column.primary_key
        || column.column_type.is_serial()
        || ddl
            .primary_key_of(&column.schema, &column.table)
            .is_some_and(|pk| pk.columns.contains(&column.name))
}

pub fn compare(ctx: &mut DiffContext<'_>) {
    let to = ctx.to;
    for table in ctx.surviving_tables() {
        for new in to.columns_of(&table.schema, &table.name) {
            let Some(old) = ctx.state.column(&new.schema, &new.table, &new.name).cloned() else {
                continue;
            };
            compare_column(ctx, &old, new);
        }
    }
}

fn compare_column(ctx: &mut DiffContext<'_>, old: &Column, new: &Column) {
    let generated_changed = match (&old.generated, &new.generated) {
        (Some(a), Some(b)) => ctx.mode.compares_expression_text() && a.trim() != b.trim(),
        (None, None) => false,
        _ => true,
    };
    if generated_changed {
        debug!("Column {} changes its generation expression, recreating", new.id());
        ctx.plan.push(
            Phase::DropColumns,
            MigrationStep::Column(ColumnOperation::Drop {
                schema: new.schema.clone(),
                table: new.table.clone(),
                name: new.name.clone(),
            }),
        );
        ctx.plan.push(
            Phase::AddColumns,
            MigrationStep::Column(ColumnOperation::Add {
                column: new.clone(),
            }),
        );
        return;
    }

    let juggled = ctx.is_juggled(&new.schema, &new.table, &new.name);
    let same_default = equivalent_defaults(old.default.as_ref(), new.default.as_ref());
    let mut actions = Vec::new();

    if !juggled && !old.column_type.same_type(&new.column_type) {
        if old.default.is_some() && !same_default {
            actions.push(ColumnAction::DropDefault);
        }
        actions.push(ColumnAction::SetType {
            column_type: new.column_type.clone(),
        });
        if let Some(default) = new.default.as_ref().filter(|_| !same_default) {
            actions.push(ColumnAction::SetDefault {
                default: default.clone(),
            });
        }
    } else if !juggled && !same_default {
        actions.push(match &new.default {
            Some(default) => ColumnAction::SetDefault {
                default: default.clone(),
            },
            None => ColumnAction::DropDefault,
        });
    }

    let was_not_null = effective_not_null(&ctx.state, old);
    let is_not_null = effective_not_null(ctx.to, new);
    if was_not_null != is_not_null {
        actions.push(if is_not_null {
            ColumnAction::SetNotNull
        } else {
            ColumnAction::DropNotNull
        });
    }

    if !actions.is_empty() {
        ctx.plan.push(
            Phase::AlterColumns,
            MigrationStep::Column(ColumnOperation::Alter {
                column: new.clone(),
                actions,
            }),
        );
    }
}
