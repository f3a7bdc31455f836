//! Diff sequences: every parameter is alterable in place.

use crate::ddl::Sequence;
use crate::diff::operations::{MigrationStep, SequenceOperation};
use crate::diff::{DiffContext, Phase, diff_list, rename, resolve_renames};
use crate::resolver::RenameResolver;

fn key(s: &Sequence) -> (String, String) {
    (s.schema.clone(), s.name.clone())
}

pub fn diff(ctx: &mut DiffContext<'_>, resolver: &dyn RenameResolver<Sequence>) {
    let resolution = resolve_renames(resolver, &ctx.state.sequences, &ctx.to.sequences, key);

    for (old, new) in resolution.matched {
        if old.schema != new.schema {
            ctx.plan.push(
                Phase::Sequences,
                MigrationStep::Sequence(SequenceOperation::Move {
                    name: old.name.clone(),
                    from_schema: old.schema.clone(),
                    to_schema: new.schema.clone(),
                }),
            );
        }
        if old.name != new.name {
            ctx.plan.push(
                Phase::Sequences,
                MigrationStep::Sequence(SequenceOperation::Rename {
                    schema: new.schema.clone(),
                    from: old.name.clone(),
                    to: new.name.clone(),
                }),
            );
        }
        rename::rename_sequence(
            &mut ctx.state,
            (&old.schema, &old.name),
            (&new.schema, &new.name),
        );
    }

    for created in resolution.unmatched_to {
        ctx.plan.push(
            Phase::Sequences,
            MigrationStep::Sequence(SequenceOperation::Create { sequence: created }),
        );
    }

    for dropped in resolution.unmatched_from {
        ctx.plan.push(
            Phase::DropSequences,
            MigrationStep::Sequence(SequenceOperation::Drop {
                schema: dropped.schema,
                name: dropped.name,
            }),
        );
    }

    let altered: Vec<Sequence> = diff_list(&ctx.state.sequences, &ctx.to.sequences, key)
        .into_iter()
        .filter_map(|pair| match pair {
            (Some(old), Some(new)) if old.params() != new.params() => Some(new.clone()),
            _ => None,
        })
        .collect();
    for sequence in altered {
        ctx.plan.push(
            Phase::Sequences,
            MigrationStep::Sequence(SequenceOperation::Alter { sequence }),
        );
    }
}
