//! Table constraint operations

use crate::ddl::{CheckConstraint, EntityId, EntityKind, ForeignKey, PrimaryKey, UniqueConstraint};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintOperation {
    AddPrimaryKey {
        primary_key: PrimaryKey,
    },
    /// Swaps the primary key in a single `ALTER TABLE`, so the table is never
    /// observed without one.
    ReplacePrimaryKey {
        old_name: String,
        primary_key: PrimaryKey,
    },
    AddUnique {
        unique: UniqueConstraint,
    },
    AddCheck {
        check: CheckConstraint,
    },
    AddForeignKey {
        foreign_key: ForeignKey,
    },
    Drop {
        schema: String,
        table: String,
        name: String,
        kind: EntityKind,
    },
    Rename {
        schema: String,
        table: String,
        from: String,
        to: String,
        kind: EntityKind,
    },
}

impl ConstraintOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            ConstraintOperation::AddPrimaryKey { .. } => "add primary key",
            ConstraintOperation::ReplacePrimaryKey { .. } => "replace primary key",
            ConstraintOperation::AddUnique { .. } => "add unique",
            ConstraintOperation::AddCheck { .. } => "add check",
            ConstraintOperation::AddForeignKey { .. } => "add foreign key",
            ConstraintOperation::Drop { .. } => "drop",
            ConstraintOperation::Rename { .. } => "rename",
        }
    }

    /// Owning table as `(schema, table)`.
    pub fn table(&self) -> (&str, &str) {
        let (schema, table) = match self {
            ConstraintOperation::AddPrimaryKey { primary_key }
            | ConstraintOperation::ReplacePrimaryKey { primary_key, .. } => {
                (&primary_key.schema, &primary_key.table)
            }
            ConstraintOperation::AddUnique { unique } => (&unique.schema, &unique.table),
            ConstraintOperation::AddCheck { check } => (&check.schema, &check.table),
            ConstraintOperation::AddForeignKey { foreign_key } => {
                (&foreign_key.schema, &foreign_key.table)
            }
            ConstraintOperation::Drop { schema, table, .. }
            | ConstraintOperation::Rename { schema, table, .. } => (schema, table),
        };
        (schema.as_str(), table.as_str())
    }

    pub fn id(&self) -> EntityId {
        let name = match self {
            ConstraintOperation::AddPrimaryKey { primary_key }
            | ConstraintOperation::ReplacePrimaryKey { primary_key, .. } => &primary_key.name,
            ConstraintOperation::AddUnique { unique } => &unique.name,
            ConstraintOperation::AddCheck { check } => &check.name,
            ConstraintOperation::AddForeignKey { foreign_key } => &foreign_key.name,
            ConstraintOperation::Drop { name, .. } => name,
            ConstraintOperation::Rename { to, .. } => to,
        };
        let (schema, table) = self.table();
        EntityId::Constraint {
            schema: schema.to_string(),
            table: table.to_string(),
            name: name.clone(),
        }
    }
}
