//! Role operations

use crate::ddl::{EntityId, Role};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleOperation {
    Create { role: Role },
    Drop { name: String },
    Rename { from: String, to: String },
    /// Rewrites every capability flag to the values in `role`.
    Alter { role: Role },
}

impl RoleOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            RoleOperation::Create { .. } => "create",
            RoleOperation::Drop { .. } => "drop",
            RoleOperation::Rename { .. } => "rename",
            RoleOperation::Alter { .. } => "alter",
        }
    }

    pub fn id(&self) -> EntityId {
        let name = match self {
            RoleOperation::Create { role } | RoleOperation::Alter { role } => &role.name,
            RoleOperation::Drop { name } => name,
            RoleOperation::Rename { to, .. } => to,
        };
        EntityId::Role { name: name.clone() }
    }
}
