use crate::ddl::id::EntityId;
use serde::{Deserialize, Serialize};

fn default_inherit() -> bool {
    true
}

/// A database principal with its capability flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub create_db: bool,
    #[serde(default)]
    pub create_role: bool,
    #[serde(default = "default_inherit")]
    pub inherit: bool,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            create_db: false,
            create_role: false,
            inherit: true,
        }
    }

    pub fn id(&self) -> EntityId {
        EntityId::Role {
            name: self.name.clone(),
        }
    }

    pub fn same_flags(&self, other: &Role) -> bool {
        self.create_db == other.create_db
            && self.create_role == other.create_role
            && self.inherit == other.inherit
    }
}
