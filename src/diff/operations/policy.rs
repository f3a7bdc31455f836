//! Row-level security policy operations

use crate::ddl::{EntityId, Policy};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyOperation {
    Create {
        policy: Policy,
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
    /// `ALTER POLICY` with only the clauses that changed.
    Alter {
        policy: Policy,
        roles: bool,
        using: bool,
        with_check: bool,
    },
}

impl PolicyOperation {
    pub fn verb(&self) -> &'static str {
        match self {
            PolicyOperation::Create { .. } => "create",
            PolicyOperation::Drop { .. } => "drop",
            PolicyOperation::Rename { .. } => "rename",
            PolicyOperation::Alter { .. } => "alter",
        }
    }

    pub fn id(&self) -> EntityId {
        let (schema, table, name) = match self {
            PolicyOperation::Create { policy } | PolicyOperation::Alter { policy, .. } => {
                (&policy.schema, &policy.table, &policy.name)
            }
            PolicyOperation::Drop {
                schema,
                table,
                name,
            } => (schema, table, name),
            PolicyOperation::Rename {
                schema, table, to, ..
            } => (schema, table, to),
        };
        EntityId::Policy {
            schema: schema.clone(),
            table: table.clone(),
            name: name.clone(),
        }
    }
}
