//! Abstract diff operations.
//!
//! Each entity kind has its own operation enum; [`MigrationStep`] wraps them.
//! SQL is produced through [`SqlRenderer`], implemented under `crate::render`.

use crate::ddl::EntityId;
use crate::render::RenderedSql;
use serde::Serialize;

pub use constraint::*;
pub use enum_type::*;
pub use index::*;
pub use policy::*;
pub use role::*;
pub use schema::*;
pub use sequence::*;
pub use table::*;
pub use view::*;

pub mod constraint;
pub mod enum_type;
pub mod index;
pub mod policy;
pub mod role;
pub mod schema;
pub mod sequence;
pub mod table;
pub mod view;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "entity", content = "operation", rename_all = "snake_case")]
pub enum MigrationStep {
    Schema(SchemaOperation),
    Role(RoleOperation),
    Enum(EnumOperation),
    Sequence(SequenceOperation),
    Table(TableOperation),
    Column(ColumnOperation),
    Constraint(ConstraintOperation),
    Index(IndexOperation),
    View(ViewOperation),
    Policy(PolicyOperation),
}

/// Trait for rendering SQL from operations
pub trait SqlRenderer {
    fn to_sql(&self) -> Vec<RenderedSql>;
    fn entity_id(&self) -> EntityId;
    fn is_destructive(&self) -> bool {
        false
    }
}

impl SqlRenderer for MigrationStep {
    fn to_sql(&self) -> Vec<RenderedSql> {
        match self {
            MigrationStep::Schema(op) => op.to_sql(),
            MigrationStep::Role(op) => op.to_sql(),
            MigrationStep::Enum(op) => op.to_sql(),
            MigrationStep::Sequence(op) => op.to_sql(),
            MigrationStep::Table(op) => op.to_sql(),
            MigrationStep::Column(op) => op.to_sql(),
            MigrationStep::Constraint(op) => op.to_sql(),
            MigrationStep::Index(op) => op.to_sql(),
            MigrationStep::View(op) => op.to_sql(),
            MigrationStep::Policy(op) => op.to_sql(),
        }
    }

    fn entity_id(&self) -> EntityId {
        match self {
            MigrationStep::Schema(op) => op.entity_id(),
            MigrationStep::Role(op) => op.entity_id(),
            MigrationStep::Enum(op) => op.entity_id(),
            MigrationStep::Sequence(op) => op.entity_id(),
            MigrationStep::Table(op) => op.entity_id(),
            MigrationStep::Column(op) => op.entity_id(),
            MigrationStep::Constraint(op) => op.entity_id(),
            MigrationStep::Index(op) => op.entity_id(),
            MigrationStep::View(op) => op.entity_id(),
            MigrationStep::Policy(op) => op.entity_id(),
        }
    }

    fn is_destructive(&self) -> bool {
        match self {
            MigrationStep::Schema(op) => op.is_destructive(),
            MigrationStep::Role(op) => op.is_destructive(),
            MigrationStep::Enum(op) => op.is_destructive(),
            MigrationStep::Sequence(op) => op.is_destructive(),
            MigrationStep::Table(op) => op.is_destructive(),
            MigrationStep::Column(op) => op.is_destructive(),
            MigrationStep::Constraint(op) => op.is_destructive(),
            MigrationStep::Index(op) => op.is_destructive(),
            MigrationStep::View(op) => op.is_destructive(),
            MigrationStep::Policy(op) => op.is_destructive(),
        }
    }
}

impl MigrationStep {
    pub fn id(&self) -> EntityId {
        self.entity_id()
    }

    /// Short human label, e.g. `rename table public.users`.
    pub fn describe(&self) -> String {
        let verb = match self {
            MigrationStep::Schema(op) => op.verb(),
            MigrationStep::Role(op) => op.verb(),
            MigrationStep::Enum(op) => op.verb(),
            MigrationStep::Sequence(op) => op.verb(),
            MigrationStep::Table(op) => op.verb(),
            MigrationStep::Column(op) => op.verb(),
            MigrationStep::Constraint(op) => op.verb(),
            MigrationStep::Index(op) => op.verb(),
            MigrationStep::View(op) => op.verb(),
            MigrationStep::Policy(op) => op.verb(),
        };
        format!("{} {}", verb, self.entity_id())
    }
}
