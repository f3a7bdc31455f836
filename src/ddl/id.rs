use serde::Serialize;
use std::fmt;

/// Kind tag shared by every entity in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Schema,
    Role,
    Enum,
    Sequence,
    Table,
    Column,
    PrimaryKey,
    ForeignKey,
    UniqueConstraint,
    CheckConstraint,
    Index,
    View,
    MaterializedView,
    Policy,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Schema => "schema",
            EntityKind::Role => "role",
            EntityKind::Enum => "enum",
            EntityKind::Sequence => "sequence",
            EntityKind::Table => "table",
            EntityKind::Column => "column",
            EntityKind::PrimaryKey => "primary key",
            EntityKind::ForeignKey => "foreign key",
            EntityKind::UniqueConstraint => "unique constraint",
            EntityKind::CheckConstraint => "check constraint",
            EntityKind::Index => "index",
            EntityKind::View => "view",
            EntityKind::MaterializedView => "materialized view",
            EntityKind::Policy => "policy",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stable identity of an entity, used to key operations and error reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityId {
    Schema {
        name: String,
    },
    Role {
        name: String,
    },
    Enum {
        schema: String,
        name: String,
    },
    Sequence {
        schema: String,
        name: String,
    },
    Table {
        schema: String,
        name: String,
    },
    Column {
        schema: String,
        table: String,
        name: String,
    },
    Constraint {
        schema: String,
        table: String,
        name: String,
    },
    Index {
        schema: String,
        name: String,
    },
    View {
        schema: String,
        name: String,
    },
    Policy {
        schema: String,
        table: String,
        name: String,
    },
}

impl EntityId {
    pub fn schema(&self) -> Option<&str> {
        match self {
            EntityId::Schema { .. } | EntityId::Role { .. } => None,
            EntityId::Enum { schema, .. }
            | EntityId::Sequence { schema, .. }
            | EntityId::Table { schema, .. }
            | EntityId::Column { schema, .. }
            | EntityId::Constraint { schema, .. }
            | EntityId::Index { schema, .. }
            | EntityId::View { schema, .. }
            | EntityId::Policy { schema, .. } => Some(schema),
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Schema { name } => write!(f, "schema {}", name),
            EntityId::Role { name } => write!(f, "role {}", name),
            EntityId::Enum { schema, name } => write!(f, "enum {}.{}", schema, name),
            EntityId::Sequence { schema, name } => write!(f, "sequence {}.{}", schema, name),
            EntityId::Table { schema, name } => write!(f, "table {}.{}", schema, name),
            EntityId::Column {
                schema,
                table,
                name,
            } => write!(f, "column {}.{}.{}", schema, table, name),
            EntityId::Constraint {
                schema,
                table,
                name,
            } => write!(f, "constraint {} on {}.{}", name, schema, table),
            EntityId::Index { schema, name } => write!(f, "index {}.{}", schema, name),
            EntityId::View { schema, name } => write!(f, "view {}.{}", schema, name),
            EntityId::Policy {
                schema,
                table,
                name,
            } => write!(f, "policy {} on {}.{}", name, schema, table),
        }
    }
}
