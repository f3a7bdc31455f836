//! Index operations

use crate::ddl::{EntityId, Index};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexOperation {
    Create { index: Index },
    Drop { schema: String, name: String },
    Rename { schema: String, from: String, to: String },
}

impl IndexOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            IndexOperation::Create { .. } => "create",
            IndexOperation::Drop { .. } => "drop",
            IndexOperation::Rename { .. } => "rename",
        }
    }

    pub fn id(&self) -> EntityId {
        let (schema, name) = match self {
            IndexOperation::Create { index } => (&index.schema, &index.name),
            IndexOperation::Drop { schema, name } => (schema, name),
            IndexOperation::Rename { schema, to, .. } => (schema, to),
        };
        EntityId::Index {
            schema: schema.clone(),
            name: name.clone(),
        }
    }
}
