//! Table and column operations

use crate::ddl::{
    CheckConstraint, Column, ColumnDefault, ColumnType, EntityId, PrimaryKey, Table,
    UniqueConstraint,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableOperation {
    /// Columns, primary key, unique and check constraints are created inline.
    /// Foreign keys and indexes are separate steps.
    Create {
        table: Table,
        columns: Vec<Column>,
        primary_key: Option<PrimaryKey>,
        uniques: Vec<UniqueConstraint>,
        checks: Vec<CheckConstraint>,
    },
    Drop {
        schema: String,
        name: String,
    },
    Rename {
        schema: String,
        from: String,
        to: String,
    },
    Move {
        name: String,
        from_schema: String,
        to_schema: String,
    },
    EnableRls {
        schema: String,
        name: String,
    },
    DisableRls {
        schema: String,
        name: String,
    },
}

impl TableOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            TableOperation::Create { .. } => "create",
            TableOperation::Drop { .. } => "drop",
            TableOperation::Rename { .. } => "rename",
            TableOperation::Move { .. } => "move",
            TableOperation::EnableRls { .. } => "enable row level security on",
            TableOperation::DisableRls { .. } => "disable row level security on",
        }
    }

    pub fn id(&self) -> EntityId {
        let (schema, name) = match self {
            TableOperation::Create { table, .. } => (&table.schema, &table.name),
            TableOperation::Drop { schema, name }
            | TableOperation::EnableRls { schema, name }
            | TableOperation::DisableRls { schema, name } => (schema, name),
            TableOperation::Rename { schema, to, .. } => (schema, to),
            TableOperation::Move {
                name, to_schema, ..
            } => (to_schema, name),
        };
        EntityId::Table {
            schema: schema.clone(),
            name: name.clone(),
        }
    }
}

/// Column-level actions within `ALTER TABLE ... ALTER COLUMN`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAction {
    SetType { column_type: ColumnType },
    SetDefault { default: ColumnDefault },
    DropDefault,
    SetNotNull,
    DropNotNull,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOperation {
    Add {
        column: Column,
    },
    Drop {
        schema: String,
        table: String,
        name: String,
    },
    Rename {
        schema: String,
        table: String,
        from: String,
        to: String,
    },
    /// `column` is the target definition; it supplies the type context for defaults.
    Alter {
        column: Column,
        actions: Vec<ColumnAction>,
    },
}

impl ColumnOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            ColumnOperation::Add { .. } => "add",
            ColumnOperation::Drop { .. } => "drop",
            ColumnOperation::Rename { .. } => "rename",
            ColumnOperation::Alter { .. } => "alter",
        }
    }

    pub fn id(&self) -> EntityId {
        let (schema, table, name) = match self {
            ColumnOperation::Add { column } | ColumnOperation::Alter { column, .. } => {
                (&column.schema, &column.table, &column.name)
            }
            ColumnOperation::Drop {
                schema,
                table,
                name,
            } => (schema, table, name),
            ColumnOperation::Rename {
                schema, table, to, ..
            } => (schema, table, to),
        };
        EntityId::Column {
            schema: schema.clone(),
            table: table.clone(),
            name: name.clone(),
        }
    }
}
