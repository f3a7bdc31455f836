//! Duplicate-name detection, run on both snapshots before anything is diffed.

use crate::ddl::{Ddl, EntityKind};
use crate::error::{SchemaErrors, SchemaIssue};
use std::collections::HashMap;

#[derive(Default)]
struct Tracker {
    /// (scope, name) -> owning table, when the entry came from a table constraint.
    seen: HashMap<(String, String), Option<String>>,
    issues: Vec<SchemaIssue>,
}

impl Tracker {
    fn check(&mut self, kind: EntityKind, scope: String, name: &str) {
        self.check_owned(kind, scope, name, None);
    }

    fn check_owned(&mut self, kind: EntityKind, scope: String, name: &str, owner: Option<&str>) {
        let key = (scope, name.to_string());
        match self.seen.get(&key) {
            None => {
                self.seen.insert(key, owner.map(str::to_string));
            }
            // Same-table constraint clashes are reported by the table-level pass.
            Some(Some(previous)) if owner == Some(previous.as_str()) => {}
            Some(_) => self.issues.push(SchemaIssue {
                kind,
                scope: key.0,
                name: key.1,
            }),
        }
    }
}

fn table_scope(schema: &str, table: &str) -> String {
    format!("table {}.{}", schema, table)
}

fn schema_scope(schema: &str) -> String {
    format!("schema {}", schema)
}

/// Reports every duplicate name in `ddl`, scoped the way PostgreSQL scopes them:
/// schemas and roles globally, relations (tables, views, sequences) and types per
/// schema, index names (including those backing primary keys and unique
/// constraints) per schema, and columns, constraints and policies per table.
pub fn validate(ddl: &Ddl) -> Result<(), SchemaErrors> {
    let mut globals = Tracker::default();
    for schema in &ddl.schemas {
        globals.check(EntityKind::Schema, "database".to_string(), &schema.name);
    }
    for role in &ddl.roles {
        globals.check(EntityKind::Role, "database".to_string(), &role.name);
    }

    let mut relations = Tracker::default();
    for table in &ddl.tables {
        relations.check(EntityKind::Table, schema_scope(&table.schema), &table.name);
    }
    for view in &ddl.views {
        relations.check(view.kind(), schema_scope(&view.schema), &view.name);
    }
    for sequence in &ddl.sequences {
        relations.check(
            EntityKind::Sequence,
            schema_scope(&sequence.schema),
            &sequence.name,
        );
    }

    let mut types = Tracker::default();
    for enum_type in &ddl.enums {
        types.check(EntityKind::Enum, schema_scope(&enum_type.schema), &enum_type.name);
    }

    let mut columns = Tracker::default();
    for column in &ddl.columns {
        columns.check(
            EntityKind::Column,
            table_scope(&column.schema, &column.table),
            &column.name,
        );
    }

    let mut constraints = Tracker::default();
    for pk in &ddl.primary_keys {
        constraints.check(EntityKind::PrimaryKey, table_scope(&pk.schema, &pk.table), &pk.name);
    }
    for unique in &ddl.uniques {
        constraints.check(
            EntityKind::UniqueConstraint,
            table_scope(&unique.schema, &unique.table),
            &unique.name,
        );
    }
    for fk in &ddl.foreign_keys {
        constraints.check(EntityKind::ForeignKey, table_scope(&fk.schema, &fk.table), &fk.name);
    }
    for check in &ddl.checks {
        constraints.check(
            EntityKind::CheckConstraint,
            table_scope(&check.schema, &check.table),
            &check.name,
        );
    }

    let mut indexes = Tracker::default();
    for pk in &ddl.primary_keys {
        indexes.check_owned(
            EntityKind::PrimaryKey,
            schema_scope(&pk.schema),
            &pk.name,
            Some(&pk.table),
        );
    }
    for unique in &ddl.uniques {
        indexes.check_owned(
            EntityKind::UniqueConstraint,
            schema_scope(&unique.schema),
            &unique.name,
            Some(&unique.table),
        );
    }
    for index in &ddl.indexes {
        indexes.check(EntityKind::Index, schema_scope(&index.schema), &index.name);
    }

    let mut policies = Tracker::default();
    for policy in &ddl.policies {
        policies.check(
            EntityKind::Policy,
            table_scope(&policy.schema, &policy.table),
            &policy.name,
        );
    }

    let issues: Vec<SchemaIssue> = [
        globals, relations, types, columns, constraints, indexes, policies,
    ]
    .into_iter()
    .flat_map(|t| t.issues)
    .collect();

    if issues.is_empty() {
        Ok(())
    } else {
        Err(SchemaErrors(issues))
    }
}
