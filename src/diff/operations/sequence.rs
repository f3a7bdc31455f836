//! Sequence operations

use crate::ddl::{EntityId, Sequence};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceOperation {
    Create {
        sequence: Sequence,
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
    /// Every parameter can be altered in place.
    Alter {
        sequence: Sequence,
    },
}

impl SequenceOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            SequenceOperation::Create { .. } => "create",
            SequenceOperation::Drop { .. } => "drop",
            SequenceOperation::Rename { .. } => "rename",
            SequenceOperation::Move { .. } => "move",
            SequenceOperation::Alter { .. } => "alter",
        }
    }

    pub fn id(&self) -> EntityId {
        let (schema, name) = match self {
            SequenceOperation::Create { sequence } | SequenceOperation::Alter { sequence } => {
                (&sequence.schema, &sequence.name)
            }
            SequenceOperation::Drop { schema, name } => (schema, name),
            SequenceOperation::Rename { schema, to, .. } => (schema, to),
            SequenceOperation::Move {
                name, to_schema, ..
            } => (to_schema, name),
        };
        EntityId::Sequence {
            schema: schema.clone(),
            name: name.clone(),
        }
    }
}
