//! Diff roles: create, rename, alter flags, drop.

use crate::ddl::Role;
use crate::diff::operations::{MigrationStep, RoleOperation};
use crate::diff::{DiffContext, Phase, diff_list, rename, resolve_renames};
use crate::resolver::RenameResolver;

pub fn diff(ctx: &mut DiffContext<'_>, resolver: &dyn RenameResolver<Role>) {
    let resolution = resolve_renames(resolver, &ctx.state.roles, &ctx.to.roles, |r| {
        r.name.clone()
    });

    for (old, new) in resolution.matched {
        ctx.plan.push(
            Phase::Roles,
            MigrationStep::Role(RoleOperation::Rename {
                from: old.name.clone(),
                to: new.name.clone(),
            }),
        );
        rename::rename_role(&mut ctx.state, &old.name, &new.name);
    }

    for created in resolution.unmatched_to {
        ctx.plan.push(
            Phase::Roles,
            MigrationStep::Role(RoleOperation::Create { role: created }),
        );
    }

    for dropped in resolution.unmatched_from {
        ctx.plan.push(
            Phase::DropRoles,
            MigrationStep::Role(RoleOperation::Drop { name: dropped.name }),
        );
    }

    let altered: Vec<Role> = diff_list(&ctx.state.roles, &ctx.to.roles, |r| r.name.clone())
        .into_iter()
        .filter_map(|pair| match pair {
            (Some(old), Some(new)) if !old.same_flags(new) => Some(new.clone()),
            _ => None,
        })
        .collect();
    for role in altered {
        ctx.plan
            .push(Phase::Roles, MigrationStep::Role(RoleOperation::Alter { role }));
    }
}
