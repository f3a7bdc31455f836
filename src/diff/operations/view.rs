//! View and materialized view operations

use crate::ddl::{EntityId, View};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewOperation {
    Create {
        view: View,
    },
    Drop {
        schema: String,
        name: String,
        materialized: bool,
    },
    Rename {
        schema: String,
        from: String,
        to: String,
        materialized: bool,
    },
    Move {
        name: String,
        from_schema: String,
        to_schema: String,
        materialized: bool,
    },
}

impl ViewOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            ViewOperation::Create { .. } => "create",
            ViewOperation::Drop { .. } => "drop",
            ViewOperation::Rename { .. } => "rename",
            ViewOperation::Move { .. } => "move",
        }
    }

    pub fn id(&self) -> EntityId {
        let (schema, name) = match self {
            ViewOperation::Create { view } => (&view.schema, &view.name),
            ViewOperation::Drop { schema, name, .. } => (schema, name),
            ViewOperation::Rename { schema, to, .. } => (schema, to),
            ViewOperation::Move {
                name, to_schema, ..
            } => (to_schema, name),
        };
        EntityId::View {
            schema: schema.clone(),
            name: name.clone(),
        }
    }
}
