use crate::ddl::id::EntityId;
use serde::{Deserialize, Serialize};

fn default_increment() -> i64 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub schema: String,
    pub name: String,
    #[serde(default = "default_increment")]
    pub increment: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_with: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<i64>,
    #[serde(default)]
    pub cycle: bool,
}

/// Sequence parameters with engine defaults filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceParams {
    pub increment: i64,
    pub min_value: i64,
    pub max_value: i64,
    pub start_with: i64,
    pub cache: i64,
    pub cycle: bool,
}

impl Sequence {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            increment: 1,
            min_value: None,
            max_value: None,
            start_with: None,
            cache: None,
            cycle: false,
        }
    }

    pub fn id(&self) -> EntityId {
        EntityId::Sequence {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    /// Ascending sequences default to `1..=i64::MAX`, descending ones to `i64::MIN..=-1`,
    /// and start at the bound they count away from.
    pub fn params(&self) -> SequenceParams {
        let ascending = self.increment > 0;
        let min_value = self
            .min_value
            .unwrap_or(if ascending { 1 } else { i64::MIN });
        let max_value = self
            .max_value
            .unwrap_or(if ascending { i64::MAX } else { -1 });
        SequenceParams {
            increment: self.increment,
            min_value,
            max_value,
            start_with: self
                .start_with
                .unwrap_or(if ascending { min_value } else { max_value }),
            cache: self.cache.unwrap_or(1),
            cycle: self.cycle,
        }
    }
}
