//! Schema operations

use crate::ddl::EntityId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaOperation {
    Create { name: String },
    Drop { name: String },
    Rename { from: String, to: String },
}

impl SchemaOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            SchemaOperation::Create { .. } => "create",
            SchemaOperation::Drop { .. } => "drop",
            SchemaOperation::Rename { .. } => "rename",
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            SchemaOperation::Create { name } | SchemaOperation::Drop { name } => {
                EntityId::Schema { name: name.clone() }
            }
            SchemaOperation::Rename { to, .. } => EntityId::Schema { name: to.clone() },
        }
    }
}
