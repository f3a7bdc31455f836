//! Diff primary keys, unique, check and foreign key constraints of tables
//! present on both sides. Constraints of created tables are emitted with the
//! table; those of dropped tables go with it.

use crate::ddl::naming::{default_name_for_fk, default_name_for_pk, default_name_for_unique};
use crate::ddl::{
    CheckConstraint, Ddl, EntityKind, ForeignKey, PrimaryKey, Table, UniqueConstraint,
};
use crate::diff::operations::{ConstraintOperation, MigrationStep};
use crate::diff::{DiffContext, Mode, Phase, diff_list, resolve_renames};
use crate::error::DiffError;
use crate::resolver::{RenameResolver, Renameable, Resolvers};
use tracing::debug;

pub fn diff(ctx: &mut DiffContext<'_>, resolvers: &Resolvers<'_>) -> Result<(), DiffError> {
    for table in ctx.surviving_tables() {
        diff_primary_key(ctx, &table, resolvers.primary_keys)?;
        diff_kind::<UniqueConstraint>(ctx, &table, resolvers.uniques);
        diff_kind::<CheckConstraint>(ctx, &table, resolvers.checks);
        diff_kind::<ForeignKey>(ctx, &table, resolvers.foreign_keys);
    }
    Ok(())
}

fn diff_primary_key(
    ctx: &mut DiffContext<'_>,
    table: &Table,
    resolver: &dyn RenameResolver<PrimaryKey>,
) -> Result<(), DiffError> {
    let old = ctx.state.primary_key_of(&table.schema, &table.name).cloned();
    let new = ctx.to.primary_key_of(&table.schema, &table.name).cloned();

    match (old, new) {
        (None, None) => {}
        (None, Some(new)) => ctx.plan.push(
            Phase::AddConstraints,
            MigrationStep::Constraint(ConstraintOperation::AddPrimaryKey { primary_key: new }),
        ),
        (Some(old), None) => {
            if ctx.mode == Mode::Push {
                return Err(DiffError::UnsupportedTransition {
                    table: format!("{}.{}", table.schema, table.name),
                    action: "drop the primary key".to_string(),
                    reason: format!(
                        "constraint \"{}\" would be removed without a replacement",
                        old.name
                    ),
                });
            }
            ctx.plan.push(
                Phase::DropConstraints,
                drop_step(&old.schema, &old.table, &old.name, EntityKind::PrimaryKey),
            );
        }
        (Some(mut old), Some(new)) => {
            // PostgreSQL keeps constraint names across table renames, so an
            // unnamed key is satisfied by the existing one.
            if old.name != new.name
                && old.columns == new.columns
                && new.name == default_name_for_pk(&new.table)
            {
                return Ok(());
            }
            if old.name != new.name {
                let resolution = resolver.resolve(vec![old.clone()], vec![new.clone()]);
                if !resolution.matched.is_empty() {
                    ctx.plan.push(
                        Phase::RenameConstraints,
                        rename_step(
                            &old.schema,
                            &old.table,
                            &old.name,
                            &new.name,
                            EntityKind::PrimaryKey,
                        ),
                    );
                    for pk in ctx.state.primary_keys.iter_mut() {
                        if pk.belongs_to(&old.schema, &old.table) {
                            pk.name = new.name.clone();
                        }
                    }
                    old.name = new.name.clone();
                }
            }
            if old == new {
                return Ok(());
            }

            let loses_column = old
                .columns
                .iter()
                .any(|c| ctx.to.column(&table.schema, &table.name, c).is_none());
            let key_columns_exist = new
                .columns
                .iter()
                .all(|c| ctx.state.column(&table.schema, &table.name, c).is_some());
            if loses_column && key_columns_exist {
                // Swap the key before its old column is dropped.
                ctx.plan.push(
                    Phase::ReplacePrimaryKeys,
                    MigrationStep::Constraint(ConstraintOperation::ReplacePrimaryKey {
                        old_name: old.name,
                        primary_key: new,
                    }),
                );
            } else if loses_column {
                // The new key needs a column that is only added later.
                ctx.plan.push(
                    Phase::DropConstraints,
                    drop_step(&old.schema, &old.table, &old.name, EntityKind::PrimaryKey),
                );
                ctx.plan.push(
                    Phase::AddConstraints,
                    MigrationStep::Constraint(ConstraintOperation::AddPrimaryKey {
                        primary_key: new,
                    }),
                );
            } else {
                ctx.plan.push(
                    Phase::AddConstraints,
                    MigrationStep::Constraint(ConstraintOperation::ReplacePrimaryKey {
                        old_name: old.name,
                        primary_key: new,
                    }),
                );
            }
        }
    }
    Ok(())
}

fn drop_step(schema: &str, table: &str, name: &str, kind: EntityKind) -> MigrationStep {
    MigrationStep::Constraint(ConstraintOperation::Drop {
        schema: schema.to_string(),
        table: table.to_string(),
        name: name.to_string(),
        kind,
    })
}

fn rename_step(schema: &str, table: &str, from: &str, to: &str, kind: EntityKind) -> MigrationStep {
    MigrationStep::Constraint(ConstraintOperation::Rename {
        schema: schema.to_string(),
        table: table.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        kind,
    })
}

/// Named constraints that are compared as a whole: any change is a drop
/// followed by an add.
trait TableConstraint: Clone + Renameable {
    const DROP_PHASE: Phase;
    const ADD_PHASE: Phase;

    fn list(ddl: &Ddl) -> &Vec<Self>;
    fn list_mut(ddl: &mut Ddl) -> &mut Vec<Self>;
    fn location(&self) -> (&str, &str, &str);
    fn set_name(&mut self, name: &str);
    fn same_definition(&self, other: &Self) -> bool;
    fn into_add(self) -> ConstraintOperation;

    /// The name PostgreSQL would generate, for kinds that have one.
    fn derived_name(&self) -> Option<String> {
        None
    }
}

impl TableConstraint for UniqueConstraint {
    const DROP_PHASE: Phase = Phase::DropConstraints;
    const ADD_PHASE: Phase = Phase::AddConstraints;

    fn list(ddl: &Ddl) -> &Vec<Self> {
        &ddl.uniques
    }
    fn list_mut(ddl: &mut Ddl) -> &mut Vec<Self> {
        &mut ddl.uniques
    }
    fn location(&self) -> (&str, &str, &str) {
        (&self.schema, &self.table, &self.name)
    }
    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
    fn same_definition(&self, other: &Self) -> bool {
        self.columns == other.columns && self.nulls_not_distinct == other.nulls_not_distinct
    }
    fn into_add(self) -> ConstraintOperation {
        ConstraintOperation::AddUnique { unique: self }
    }
    fn derived_name(&self) -> Option<String> {
        Some(default_name_for_unique(&self.table, &self.columns))
    }
}

impl TableConstraint for CheckConstraint {
    const DROP_PHASE: Phase = Phase::DropConstraints;
    const ADD_PHASE: Phase = Phase::AddConstraints;

    fn list(ddl: &Ddl) -> &Vec<Self> {
        &ddl.checks
    }
    fn list_mut(ddl: &mut Ddl) -> &mut Vec<Self> {
        &mut ddl.checks
    }
    fn location(&self) -> (&str, &str, &str) {
        (&self.schema, &self.table, &self.name)
    }
    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
    fn same_definition(&self, other: &Self) -> bool {
        self.value.trim() == other.value.trim()
    }
    fn into_add(self) -> ConstraintOperation {
        ConstraintOperation::AddCheck { check: self }
    }
}

impl TableConstraint for ForeignKey {
    const DROP_PHASE: Phase = Phase::DropForeignKeys;
    const ADD_PHASE: Phase = Phase::AddForeignKeys;

    fn list(ddl: &Ddl) -> &Vec<Self> {
        &ddl.foreign_keys
    }
    fn list_mut(ddl: &mut Ddl) -> &mut Vec<Self> {
        &mut ddl.foreign_keys
    }
    fn location(&self) -> (&str, &str, &str) {
        (&self.schema, &self.table, &self.name)
    }
    fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
    fn same_definition(&self, other: &Self) -> bool {
        self.columns == other.columns
            && self.schema_to == other.schema_to
            && self.table_to == other.table_to
            && self.columns_to == other.columns_to
            && self.on_delete == other.on_delete
            && self.on_update == other.on_update
    }
    fn into_add(self) -> ConstraintOperation {
        ConstraintOperation::AddForeignKey { foreign_key: self }
    }
    fn derived_name(&self) -> Option<String> {
        Some(default_name_for_fk(
            &self.table,
            &self.columns,
            &self.table_to,
            &self.columns_to,
        ))
    }
}

fn of_table<C: TableConstraint>(ddl: &Ddl, table: &Table) -> Vec<C> {
    C::list(ddl)
        .iter()
        .filter(|c| {
            let (schema, owner, _) = c.location();
            schema == table.schema && owner == table.name
        })
        .cloned()
        .collect()
}

/// Pairs up constraints whose only difference is that the target carries the
/// generated name, as happens after a table or column rename.
fn skip_derived_renames<C: TableConstraint>(from: Vec<C>, to: Vec<C>) -> (Vec<C>, Vec<C>) {
    let mut from = from;
    let mut unmatched_to = Vec::new();
    for added in to {
        let generated = added
            .derived_name()
            .is_some_and(|name| name == added.location().2);
        let existing = generated
            .then(|| from.iter().position(|old| old.same_definition(&added)))
            .flatten();
        match existing {
            Some(pos) => {
                debug!(
                    "{} {} already exists as {}",
                    C::KIND,
                    added.location().2,
                    from[pos].location().2
                );
                from.remove(pos);
            }
            None => unmatched_to.push(added),
        }
    }
    (from, unmatched_to)
}

fn diff_kind<C: TableConstraint>(
    ctx: &mut DiffContext<'_>,
    table: &Table,
    resolver: &dyn RenameResolver<C>,
) {
    let old: Vec<C> = of_table(&ctx.state, table);
    let new: Vec<C> = of_table(ctx.to, table);
    let name_of = |c: &C| c.location().2.to_string();
    let resolution = resolve_renames(resolver, &old, &new, name_of);

    for (from, to) in &resolution.matched {
        let (schema, owner, from_name) = from.location();
        let to_name = to.location().2;
        ctx.plan.push(
            Phase::RenameConstraints,
            rename_step(schema, owner, from_name, to_name, C::KIND),
        );
        for item in C::list_mut(&mut ctx.state).iter_mut() {
            if item.location() == (schema, owner, from_name) {
                item.set_name(to_name);
            }
        }
    }

    let (unmatched_from, unmatched_to) =
        skip_derived_renames(resolution.unmatched_from, resolution.unmatched_to);

    for dropped in &unmatched_from {
        let (schema, owner, name) = dropped.location();
        ctx.plan.push(C::DROP_PHASE, drop_step(schema, owner, name, C::KIND));
    }
    for added in unmatched_to {
        ctx.plan
            .push(C::ADD_PHASE, MigrationStep::Constraint(added.into_add()));
    }

    let old: Vec<C> = of_table(&ctx.state, table);
    let changed: Vec<(C, C)> = diff_list(&old, &new, name_of)
        .into_iter()
        .filter_map(|pair| match pair {
            (Some(o), Some(n)) if !o.same_definition(n) => Some((o.clone(), n.clone())),
            _ => None,
        })
        .collect();
    for (old, new) in changed {
        let (schema, owner, name) = old.location();
        debug!("{} {} changed, recreating", C::KIND, name);
        ctx.plan.push(C::DROP_PHASE, drop_step(schema, owner, name, C::KIND));
        ctx.plan
            .push(C::ADD_PHASE, MigrationStep::Constraint(new.into_add()));
    }
}
