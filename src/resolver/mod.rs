//! Rename resolution: deciding which entities present only in the old snapshot
//! and only in the new one are the same entity under a new name or schema.

pub mod declared;
pub mod interactive;

pub use declared::{DeclaredRenames, NoRenames};
pub use interactive::InteractiveResolver;

use crate::ddl::{
    CheckConstraint, Column, EntityKind, EnumType, ForeignKey, Index, Policy, PrimaryKey, Role,
    Schema, Sequence, Table, UniqueConstraint, View,
};

/// Outcome of resolving one entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<T> {
    /// `(old, new)` pairs that are the same entity.
    pub matched: Vec<(T, T)>,
    pub unmatched_from: Vec<T>,
    pub unmatched_to: Vec<T>,
}

impl<T> Resolution<T> {
    /// Nothing matched: every candidate is an independent drop or create.
    pub fn unmatched(from: Vec<T>, to: Vec<T>) -> Self {
        Self {
            matched: Vec::new(),
            unmatched_from: from,
            unmatched_to: to,
        }
    }
}

pub trait RenameResolver<T> {
    fn resolve(&self, only_in_from: Vec<T>, only_in_to: Vec<T>) -> Resolution<T>;
}

/// Identity used in rename declarations.
///
/// Schemas and roles use `name`; enums, sequences, tables and views use
/// `schema.name`; columns, indexes, constraints and policies use
/// `schema.table.name`.
pub trait Renameable {
    const KIND: EntityKind;

    fn rename_key(&self) -> String;
}

impl Renameable for Schema {
    const KIND: EntityKind = EntityKind::Schema;
    fn rename_key(&self) -> String {
        self.name.clone()
    }
}

impl Renameable for Role {
    const KIND: EntityKind = EntityKind::Role;
    fn rename_key(&self) -> String {
        self.name.clone()
    }
}

macro_rules! schema_scoped {
    ($ty:ty, $kind:expr) => {
        impl Renameable for $ty {
            const KIND: EntityKind = $kind;
            fn rename_key(&self) -> String {
                format!("{}.{}", self.schema, self.name)
            }
        }
    };
}

macro_rules! table_scoped {
    ($ty:ty, $kind:expr) => {
        impl Renameable for $ty {
            const KIND: EntityKind = $kind;
            fn rename_key(&self) -> String {
                format!("{}.{}.{}", self.schema, self.table, self.name)
            }
        }
    };
}

schema_scoped!(EnumType, EntityKind::Enum);
schema_scoped!(Sequence, EntityKind::Sequence);
schema_scoped!(Table, EntityKind::Table);
schema_scoped!(View, EntityKind::View);
table_scoped!(Column, EntityKind::Column);
table_scoped!(Index, EntityKind::Index);
table_scoped!(PrimaryKey, EntityKind::PrimaryKey);
table_scoped!(UniqueConstraint, EntityKind::UniqueConstraint);
table_scoped!(CheckConstraint, EntityKind::CheckConstraint);
table_scoped!(ForeignKey, EntityKind::ForeignKey);
table_scoped!(Policy, EntityKind::Policy);

/// One resolver per entity kind, handed to [`crate::diff::diff`].
#[derive(Clone, Copy)]
pub struct Resolvers<'a> {
    pub schemas: &'a dyn RenameResolver<Schema>,
    pub roles: &'a dyn RenameResolver<Role>,
    pub enums: &'a dyn RenameResolver<EnumType>,
    pub sequences: &'a dyn RenameResolver<Sequence>,
    pub tables: &'a dyn RenameResolver<Table>,
    pub columns: &'a dyn RenameResolver<Column>,
    pub views: &'a dyn RenameResolver<View>,
    pub primary_keys: &'a dyn RenameResolver<PrimaryKey>,
    pub uniques: &'a dyn RenameResolver<UniqueConstraint>,
    pub checks: &'a dyn RenameResolver<CheckConstraint>,
    pub foreign_keys: &'a dyn RenameResolver<ForeignKey>,
    pub indexes: &'a dyn RenameResolver<Index>,
    pub policies: &'a dyn RenameResolver<Policy>,
}

static NO_RENAMES: NoRenames = NoRenames;

impl<'a> Resolvers<'a> {
    /// Uses the same resolver for every kind.
    pub fn uniform<R>(resolver: &'a R) -> Self
    where
        R: RenameResolver<Schema>
            + RenameResolver<Role>
            + RenameResolver<EnumType>
            + RenameResolver<Sequence>
            + RenameResolver<Table>
            + RenameResolver<Column>
            + RenameResolver<View>
            + RenameResolver<PrimaryKey>
            + RenameResolver<UniqueConstraint>
            + RenameResolver<CheckConstraint>
            + RenameResolver<ForeignKey>
            + RenameResolver<Index>
            + RenameResolver<Policy>,
    {
        Self {
            schemas: resolver,
            roles: resolver,
            enums: resolver,
            sequences: resolver,
            tables: resolver,
            columns: resolver,
            views: resolver,
            primary_keys: resolver,
            uniques: resolver,
            checks: resolver,
            foreign_keys: resolver,
            indexes: resolver,
            policies: resolver,
        }
    }
}

impl Resolvers<'static> {
    /// Never detects a rename.
    pub fn none() -> Self {
        Resolvers::uniform(&NO_RENAMES)
    }
}
