//! Enum type operations

use crate::ddl::{ColumnDefault, EntityId, EnumType};
use serde::Serialize;

/// A column whose type is round-tripped through `text` while its enum is recreated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumColumnUse {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub dimensions: u32,
    pub old_default: Option<ColumnDefault>,
    pub new_default: Option<ColumnDefault>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumOperation {
    Create {
        enum_type: EnumType,
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
    /// `ALTER TYPE ... ADD VALUE 'value' [BEFORE 'before']`
    AddValue {
        schema: String,
        name: String,
        value: String,
        before: Option<String>,
    },
    /// Labels were removed or reordered: drop and create the type, casting
    /// every dependent column through `text`.
    Recreate {
        enum_type: EnumType,
        columns: Vec<EnumColumnUse>,
    },
}

impl EnumOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            EnumOperation::Create { .. } => "create",
            EnumOperation::Drop { .. } => "drop",
            EnumOperation::Rename { .. } => "rename",
            EnumOperation::Move { .. } => "move",
            EnumOperation::AddValue { .. } => "add value to",
            EnumOperation::Recreate { .. } => "recreate",
        }
    }

    pub fn id(&self) -> EntityId {
        let (schema, name) = match self {
            EnumOperation::Create { enum_type } | EnumOperation::Recreate { enum_type, .. } => {
                (&enum_type.schema, &enum_type.name)
            }
            EnumOperation::Drop { schema, name } | EnumOperation::AddValue { schema, name, .. } => {
                (schema, name)
            }
            EnumOperation::Rename { schema, to, .. } => (schema, to),
            EnumOperation::Move {
                name, to_schema, ..
            } => (to_schema, name),
        };
        EntityId::Enum {
            schema: schema.clone(),
            name: name.clone(),
        }
    }
}
