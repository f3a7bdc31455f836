use crate::ddl::id::{EntityId, EntityKind};
use serde::{Deserialize, Serialize};

/// A view or materialized view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    pub schema: String,
    pub name: String,
    /// Query text; absent for `existing` views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// The body is owned elsewhere and must never be managed.
    #[serde(default)]
    pub existing: bool,
    #[serde(default)]
    pub materialized: bool,
    /// Materialized views only: create without populating.
    #[serde(default)]
    pub with_no_data: bool,
}

impl View {
    pub fn new(
        schema: impl Into<String>,
        name: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            definition: Some(definition.into()),
            existing: false,
            materialized: false,
            with_no_data: false,
        }
    }

    pub fn id(&self) -> EntityId {
        EntityId::View {
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        if self.materialized {
            EntityKind::MaterializedView
        } else {
            EntityKind::View
        }
    }
}
