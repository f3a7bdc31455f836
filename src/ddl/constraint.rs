use crate::ddl::id::EntityId;
use serde::{Deserialize, Serialize};

fn constraint_id(schema: &str, table: &str, name: &str) -> EntityId {
    EntityId::Constraint {
        schema: schema.to_string(),
        table: table.to_string(),
        name: name.to_string(),
    }
}

/// Table-level primary key. Column order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryKey {
    pub schema: String,
    pub table: String,
    /// Empty means "derive the default name".
    #[serde(default)]
    pub name: String,
    pub columns: Vec<String>,
}

impl PrimaryKey {
    pub fn id(&self) -> EntityId {
        constraint_id(&self.schema, &self.table, &self.name)
    }

    pub fn belongs_to(&self, schema: &str, table: &str) -> bool {
        self.schema == schema && self.table == table
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FkAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl FkAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            FkAction::NoAction => "no action",
            FkAction::Restrict => "restrict",
            FkAction::Cascade => "cascade",
            FkAction::SetNull => "set null",
            FkAction::SetDefault => "set default",
        }
    }

    /// Parses the single-letter codes of `pg_constraint.confdeltype`.
    pub fn from_pg_code(code: &str) -> Self {
        match code {
            "r" => FkAction::Restrict,
            "c" => FkAction::Cascade,
            "n" => FkAction::SetNull,
            "d" => FkAction::SetDefault,
            _ => FkAction::NoAction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub schema: String,
    pub table: String,
    #[serde(default)]
    pub name: String,
    pub columns: Vec<String>,
    pub schema_to: String,
    pub table_to: String,
    pub columns_to: Vec<String>,
    #[serde(default)]
    pub on_delete: FkAction,
    #[serde(default)]
    pub on_update: FkAction,
}

impl ForeignKey {
    pub fn id(&self) -> EntityId {
        constraint_id(&self.schema, &self.table, &self.name)
    }

    pub fn belongs_to(&self, schema: &str, table: &str) -> bool {
        self.schema == schema && self.table == table
    }

    pub fn references(&self, schema: &str, table: &str) -> bool {
        self.schema_to == schema && self.table_to == table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    pub schema: String,
    pub table: String,
    #[serde(default)]
    pub name: String,
    pub columns: Vec<String>,
    #[serde(default)]
    pub nulls_not_distinct: bool,
}

impl UniqueConstraint {
    pub fn id(&self) -> EntityId {
        constraint_id(&self.schema, &self.table, &self.name)
    }

    pub fn belongs_to(&self, schema: &str, table: &str) -> bool {
        self.schema == schema && self.table == table
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConstraint {
    pub schema: String,
    pub table: String,
    pub name: String,
    /// Boolean SQL expression, without the surrounding `CHECK (...)`.
    pub value: String,
}

impl CheckConstraint {
    pub fn id(&self) -> EntityId {
        constraint_id(&self.schema, &self.table, &self.name)
    }

    pub fn belongs_to(&self, schema: &str, table: &str) -> bool {
        self.schema == schema && self.table == table
    }
}
