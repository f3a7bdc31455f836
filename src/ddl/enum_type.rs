use crate::ddl::id::EntityId;
use serde::{Deserialize, Serialize};

/// An enum type. Label order is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub schema: String,
    pub name: String,
    pub values: Vec<String>,
}

impl EnumType {
    pub fn new(schema: impl Into<String>, name: impl Into<String>, values: &[&str]) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn id(&self) -> EntityId {
        EntityId::Enum {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }
}
