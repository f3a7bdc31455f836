//! Diff row-level security policies of tables present on both sides.
//!
//! `ALTER POLICY` can change roles and expressions but can neither change
//! `AS`/`FOR` nor remove an expression, so those changes recreate the policy.

use crate::ddl::Policy;
use crate::diff::operations::{MigrationStep, PolicyOperation};
use crate::diff::{DiffContext, Mode, Phase, diff_list, resolve_renames};
use crate::resolver::RenameResolver;

fn drop_step(policy: &Policy) -> MigrationStep {
    MigrationStep::Policy(PolicyOperation::Drop {
        schema: policy.schema.clone(),
        table: policy.table.clone(),
        name: policy.name.clone(),
    })
}

fn create_step(policy: Policy) -> MigrationStep {
    MigrationStep::Policy(PolicyOperation::Create { policy })
}

pub fn diff(ctx: &mut DiffContext<'_>, resolver: &dyn RenameResolver<Policy>) {
    let mode = ctx.mode;
    for table in ctx.surviving_tables() {
        let old: Vec<Policy> = ctx.state.policies_of(&table.schema, &table.name).cloned().collect();
        let new: Vec<Policy> = ctx.to.policies_of(&table.schema, &table.name).cloned().collect();
        let resolution = resolve_renames(resolver, &old, &new, |p| p.name.clone());

        for (from, to) in resolution.matched {
            ctx.plan.push(
                Phase::Policies,
                MigrationStep::Policy(PolicyOperation::Rename {
                    schema: from.schema.clone(),
                    table: from.table.clone(),
                    from: from.name.clone(),
                    to: to.name.clone(),
                }),
            );
            for policy in ctx.state.policies.iter_mut() {
                if policy.belongs_to(&from.schema, &from.table) && policy.name == from.name {
                    policy.name = to.name.clone();
                }
            }
        }

        for dropped in &resolution.unmatched_from {
            ctx.plan.push(Phase::DropPolicies, drop_step(dropped));
        }
        for created in resolution.unmatched_to {
            ctx.plan.push(Phase::Policies, create_step(created));
        }

        let old: Vec<Policy> = ctx.state.policies_of(&table.schema, &table.name).cloned().collect();
        let pairs: Vec<(Policy, Policy)> = diff_list(&old, &new, |p| p.name.clone())
            .into_iter()
            .filter_map(|pair| match pair {
                (Some(o), Some(n)) => Some((o.clone(), n.clone())),
                _ => None,
            })
            .collect();
        for (old, new) in pairs {
            compare_policy(ctx, mode, &old, new);
        }
    }
}

fn compare_policy(ctx: &mut DiffContext<'_>, mode: Mode, old: &Policy, new: Policy) {
    let loses_expression = (old.using.is_some() && new.using.is_none())
        || (old.with_check.is_some() && new.with_check.is_none());
    if old.as_clause != new.as_clause || old.for_clause != new.for_clause || loses_expression {
        ctx.plan.push(Phase::DropPolicies, drop_step(old));
        ctx.plan.push(Phase::Policies, create_step(new));
        return;
    }

    let roles = old.roles_sorted() != new.roles_sorted();
    let using = mode.expressions_differ(old.using.as_deref(), new.using.as_deref());
    let with_check = mode.expressions_differ(old.with_check.as_deref(), new.with_check.as_deref());
    if roles || using || with_check {
        ctx.plan.push(
            Phase::Policies,
            MigrationStep::Policy(PolicyOperation::Alter {
                policy: new,
                roles,
                using,
                with_check,
            }),
        );
    }
}
