//! Diff enum types.
//!
//! Appending labels, or inserting them without disturbing the relative order
//! of existing ones, is done with `ADD VALUE`. Any removal or reordering
//! recreates the type and round-trips dependent columns through `text`.

use crate::ddl::EnumType;
use crate::diff::operations::{EnumColumnUse, EnumOperation, MigrationStep};
use crate::diff::{DiffContext, Phase, diff_list, rename, resolve_renames};
use crate::resolver::RenameResolver;
use tracing::debug;

fn key(e: &EnumType) -> (String, String) {
    (e.schema.clone(), e.name.clone())
}

pub fn resolve(ctx: &mut DiffContext<'_>, resolver: &dyn RenameResolver<EnumType>) {
    let resolution = resolve_renames(resolver, &ctx.state.enums, &ctx.to.enums, key);

    for (old, new) in resolution.matched {
        if old.schema != new.schema {
            ctx.plan.push(
                Phase::EnumsMove,
                MigrationStep::Enum(EnumOperation::Move {
                    name: old.name.clone(),
                    from_schema: old.schema.clone(),
                    to_schema: new.schema.clone(),
                }),
            );
            rename::rename_enum(
                &mut ctx.state,
                (&old.schema, &old.name),
                (&new.schema, &old.name),
            );
        }
        if old.name != new.name {
            ctx.plan.push(
                Phase::EnumsRename,
                MigrationStep::Enum(EnumOperation::Rename {
                    schema: new.schema.clone(),
                    from: old.name.clone(),
                    to: new.name.clone(),
                }),
            );
            rename::rename_enum(
                &mut ctx.state,
                (&new.schema, &old.name),
                (&new.schema, &new.name),
            );
        }
    }

    for created in resolution.unmatched_to {
        ctx.plan.push(
            Phase::EnumsCreate,
            MigrationStep::Enum(EnumOperation::Create { enum_type: created }),
        );
    }

    for dropped in resolution.unmatched_from {
        ctx.plan.push(
            Phase::DropEnums,
            MigrationStep::Enum(EnumOperation::Drop {
                schema: dropped.schema,
                name: dropped.name,
            }),
        );
    }
}

/// Compares the labels of enums present on both sides. Runs after column
/// resolution so that recreation sees columns under their new names.
pub fn compare(ctx: &mut DiffContext<'_>) {
    let changed: Vec<(EnumType, EnumType)> = diff_list(&ctx.state.enums, &ctx.to.enums, key)
        .into_iter()
        .filter_map(|pair| match pair {
            (Some(old), Some(new)) if old.values != new.values => Some((old.clone(), new.clone())),
            _ => None,
        })
        .collect();

    for (old, new) in changed {
        match added_values(&old.values, &new.values) {
            Some(additions) => {
                for (value, before) in additions {
                    ctx.plan.push(
                        Phase::EnumValues,
                        MigrationStep::Enum(EnumOperation::AddValue {
                            schema: new.schema.clone(),
                            name: new.name.clone(),
                            value,
                            before,
                        }),
                    );
                }
            }
            None => {
                debug!("Enum {}.{} lost or reordered labels, recreating", new.schema, new.name);
                let columns = dependent_columns(ctx, &new);
                for usage in &columns {
                    ctx.juggled_columns.insert((
                        usage.schema.clone(),
                        usage.table.clone(),
                        usage.column.clone(),
                    ));
                }
                ctx.plan.push(
                    Phase::RecreateEnums,
                    MigrationStep::Enum(EnumOperation::Recreate {
                        enum_type: new,
                        columns,
                    }),
                );
            }
        }
    }
}

/// Columns that use the enum on both sides.
fn dependent_columns(ctx: &DiffContext<'_>, enum_type: &EnumType) -> Vec<EnumColumnUse> {
    ctx.to
        .columns
        .iter()
        .filter(|c| c.column_type.refers_to(&enum_type.schema, &enum_type.name))
        .filter_map(|new| {
            let old = ctx.state.column(&new.schema, &new.table, &new.name)?;
            old.column_type
                .refers_to(&enum_type.schema, &enum_type.name)
                .then(|| EnumColumnUse {
                    schema: new.schema.clone(),
                    table: new.table.clone(),
                    column: new.name.clone(),
                    dimensions: new.column_type.dimensions,
                    old_default: old.default.clone(),
                    new_default: new.default.clone(),
                })
        })
        .collect()
}

/// When `new` keeps every label of `old` in the same relative order, returns
/// the labels to add, each with the existing label it must precede (`None`
/// appends).
pub fn added_values(old: &[String], new: &[String]) -> Option<Vec<(String, Option<String>)>> {
    let kept: Vec<&String> = new.iter().filter(|v| old.contains(*v)).collect();
    if kept.len() != old.len() || kept.iter().zip(old).any(|(a, b)| *a != b) {
        return None;
    }

    let additions = new
        .iter()
        .enumerate()
        .filter(|(_, v)| !old.contains(*v))
        .map(|(i, v)| {
            let before = new[i + 1..].iter().find(|next| old.contains(*next)).cloned();
            (v.clone(), before)
        })
        .collect();
    Some(additions)
}
