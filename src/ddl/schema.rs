use crate::ddl::id::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub name: String,
    /// Already present in the database; referenced but never created or dropped.
    #[serde(default)]
    pub existing: bool,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            existing: false,
        }
    }

    pub fn id(&self) -> EntityId {
        EntityId::Schema {
            name: self.name.clone(),
        }
    }

    /// Whether the differ may create, drop or rename this schema.
    pub fn is_managed(&self) -> bool {
        !self.existing && self.name != crate::constants::DEFAULT_SCHEMA
    }
}
