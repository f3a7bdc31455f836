//! Diff schemas: CREATE new, DROP missing, RENAME resolved pairs.
//!
//! `public` and schemas flagged `existing` on either side are never touched.

use crate::ddl::Schema;
use crate::diff::operations::{MigrationStep, SchemaOperation};
use crate::diff::{DiffContext, Phase, rename, resolve_renames};
use crate::resolver::RenameResolver;
use std::collections::BTreeSet;

pub fn diff(ctx: &mut DiffContext<'_>, resolver: &dyn RenameResolver<Schema>) {
    let resolution = {
        let unmanaged: BTreeSet<&str> = ctx
            .state
            .schemas
            .iter()
            .chain(&ctx.to.schemas)
            .filter(|s| !s.is_managed())
            .map(|s| s.name.as_str())
            .collect();
        let managed = |schemas: &[Schema]| -> Vec<Schema> {
            schemas
                .iter()
                .filter(|s| !unmanaged.contains(s.name.as_str()))
                .cloned()
                .collect()
        };
        resolve_renames(
            resolver,
            &managed(&ctx.state.schemas),
            &managed(&ctx.to.schemas),
            |s| s.name.clone(),
        )
    };

    for (old, new) in resolution.matched {
        ctx.plan.push(
            Phase::RenameSchemas,
            MigrationStep::Schema(SchemaOperation::Rename {
                from: old.name.clone(),
                to: new.name.clone(),
            }),
        );
        rename::rename_schema(&mut ctx.state, &old.name, &new.name);
    }

    for created in resolution.unmatched_to {
        ctx.plan.push(
            Phase::CreateSchemas,
            MigrationStep::Schema(SchemaOperation::Create { name: created.name }),
        );
    }

    for dropped in resolution.unmatched_from {
        ctx.plan.push(
            Phase::DropSchemas,
            MigrationStep::Schema(SchemaOperation::Drop { name: dropped.name }),
        );
    }
}
