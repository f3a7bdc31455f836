//! Diff views and materialized views.
//!
//! Views are never altered in place: a changed definition drops and creates
//! the view. Views flagged `existing` on either side are left alone.

use crate::ddl::View;
use crate::diff::operations::{MigrationStep, ViewOperation};
use crate::diff::{DiffContext, Phase, diff_list, rename, resolve_renames};
use crate::resolver::RenameResolver;
use std::collections::BTreeSet;
use tracing::debug;

fn key(v: &View) -> (String, String) {
    (v.schema.clone(), v.name.clone())
}

fn drop_step(view: &View) -> MigrationStep {
    MigrationStep::View(ViewOperation::Drop {
        schema: view.schema.clone(),
        name: view.name.clone(),
        materialized: view.materialized,
    })
}

fn managed(views: &[View], unmanaged: &BTreeSet<(String, String)>) -> Vec<View> {
    views
        .iter()
        .filter(|v| !unmanaged.contains(&key(v)))
        .cloned()
        .collect()
}

pub fn resolve(ctx: &mut DiffContext<'_>, resolver: &dyn RenameResolver<View>) {
    let unmanaged: BTreeSet<(String, String)> = ctx
        .state
        .views
        .iter()
        .chain(&ctx.to.views)
        .filter(|v| v.existing)
        .map(key)
        .collect();
    let resolution = resolve_renames(
        resolver,
        &managed(&ctx.state.views, &unmanaged),
        &managed(&ctx.to.views, &unmanaged),
        key,
    );

    for (old, new) in resolution.matched {
        if old.schema != new.schema {
            ctx.plan.push(
                Phase::RenameViews,
                MigrationStep::View(ViewOperation::Move {
                    name: old.name.clone(),
                    from_schema: old.schema.clone(),
                    to_schema: new.schema.clone(),
                    materialized: old.materialized,
                }),
            );
        }
        if old.name != new.name {
            ctx.plan.push(
                Phase::RenameViews,
                MigrationStep::View(ViewOperation::Rename {
                    schema: new.schema.clone(),
                    from: old.name.clone(),
                    to: new.name.clone(),
                    materialized: old.materialized,
                }),
            );
        }
        rename::rename_view(
            &mut ctx.state,
            (&old.schema, &old.name),
            (&new.schema, &new.name),
        );
    }

    for created in resolution.unmatched_to {
        ctx.plan.push(
            Phase::CreateViews,
            MigrationStep::View(ViewOperation::Create { view: created }),
        );
    }

    for dropped in &resolution.unmatched_from {
        ctx.plan.push(Phase::DropViews, drop_step(dropped));
    }
}

/// Drops and recreates managed views whose definition changed.
pub fn compare(ctx: &mut DiffContext<'_>) {
    let mode = ctx.mode;
    let changed: Vec<(View, View)> = diff_list(&ctx.state.views, &ctx.to.views, key)
        .into_iter()
        .filter_map(|pair| match pair {
            (Some(old), Some(new)) if !old.existing && !new.existing => {
                Some((old.clone(), new.clone()))
            }
            _ => None,
        })
        .filter(|(old, new)| {
            let structural = old.materialized != new.materialized
                || (new.materialized && old.with_no_data != new.with_no_data);
            let text = mode.expressions_differ(old.definition.as_deref(), new.definition.as_deref());
            if !structural && !text && old.definition != new.definition {
                debug!("Ignoring definition text change of view {}.{}", new.schema, new.name);
            }
            structural || text
        })
        .collect();

    for (old, new) in changed {
        ctx.plan.push(Phase::DropViews, drop_step(&old));
        ctx.plan.push(
            Phase::CreateViews,
            MigrationStep::View(ViewOperation::Create { view: new }),
        );
    }
}
