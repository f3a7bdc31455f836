//! Diff indexes of tables present on both sides. Indexes are never altered:
//! any definition change drops and recreates them.

use crate::ddl::Index;
use crate::ddl::naming::default_name_for_index;
use crate::diff::operations::{IndexOperation, MigrationStep};
use crate::diff::{DiffContext, Phase, diff_list, resolve_renames};
use crate::resolver::RenameResolver;
use tracing::debug;

fn indexes_of(indexes: &[Index], schema: &str, table: &str) -> Vec<Index> {
    indexes
        .iter()
        .filter(|i| i.belongs_to(schema, table))
        .cloned()
        .collect()
}

fn drop_step(index: &Index) -> MigrationStep {
    MigrationStep::Index(IndexOperation::Drop {
        schema: index.schema.clone(),
        name: index.name.clone(),
    })
}

pub fn diff(ctx: &mut DiffContext<'_>, resolver: &dyn RenameResolver<Index>) {
    for table in ctx.surviving_tables() {
        let old = indexes_of(&ctx.state.indexes, &table.schema, &table.name);
        let new = indexes_of(&ctx.to.indexes, &table.schema, &table.name);
        let resolution = resolve_renames(resolver, &old, &new, |i| i.name.clone());

        for (from, to) in resolution.matched {
            ctx.plan.push(
                Phase::RenameConstraints,
                MigrationStep::Index(IndexOperation::Rename {
                    schema: from.schema.clone(),
                    from: from.name.clone(),
                    to: to.name.clone(),
                }),
            );
            for index in ctx.state.indexes.iter_mut() {
                if index.belongs_to(&from.schema, &from.table) && index.name == from.name {
                    index.name = to.name.clone();
                }
            }
        }

        let mut unmatched_from = resolution.unmatched_from;
        let mut unmatched_to = Vec::new();
        for created in resolution.unmatched_to {
            // Index names survive table renames; a generated target name is
            // satisfied by an identical existing index.
            let generated = created.name == default_name_for_index(&created.table, &created.columns);
            match unmatched_from
                .iter()
                .position(|old| generated && old.same_definition(&created))
            {
                Some(pos) => {
                    let existing = unmatched_from.remove(pos);
                    debug!("Index {} already exists as {}", created.name, existing.name);
                }
                None => unmatched_to.push(created),
            }
        }

        for dropped in &unmatched_from {
            ctx.plan.push(Phase::DropIndexes, drop_step(dropped));
        }
        for created in unmatched_to {
            ctx.plan.push(
                Phase::CreateIndexes,
                MigrationStep::Index(IndexOperation::Create { index: created }),
            );
        }

        let old = indexes_of(&ctx.state.indexes, &table.schema, &table.name);
        let changed: Vec<(Index, Index)> = diff_list(&old, &new, |i| i.name.clone())
            .into_iter()
            .filter_map(|pair| match pair {
                (Some(o), Some(n)) if !o.same_definition(n) => Some((o.clone(), n.clone())),
                _ => None,
            })
            .collect();
        for (old, new) in changed {
            debug!("Index {} changed, recreating", new.name);
            ctx.plan.push(Phase::DropIndexes, drop_step(&old));
            ctx.plan.push(
                Phase::CreateIndexes,
                MigrationStep::Index(IndexOperation::Create { index: new }),
            );
        }
    }
}
