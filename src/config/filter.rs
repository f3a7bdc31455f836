use crate::config::types::{MigrationsTable, ObjectExclude, ObjectInclude, Objects};
use crate::ddl::Ddl;
use glob::Pattern;
use tracing::debug;

/// Bookkeeping relations and schemas an installed extension owns, keyed by
/// extension name.
const EXTENSION_OBJECTS: &[(&str, &[&str], &[&str])] = &[(
    "postgis",
    &["spatial_ref_sys", "geography_columns", "geometry_columns"],
    &["topology", "tiger", "tiger_data"],
)];

/// Decides which schemas, tables, views and roles pgdelta manages.
///
/// Patterns are globs; a leading `!` turns a pattern into an exclusion.
/// Exclusions always win, and an empty positive list includes everything.
#[derive(Debug, Clone)]
pub struct EntityFilter {
    include: ObjectInclude,
    exclude: ObjectExclude,
    roles: Vec<String>,
    extensions: Vec<String>,
    migrations: MigrationsTable,
}

impl Default for EntityFilter {
    fn default() -> Self {
        Self::new(&Objects::default(), &MigrationsTable::default())
    }
}

impl EntityFilter {
    pub fn new(objects: &Objects, migrations: &MigrationsTable) -> Self {
        Self {
            include: objects.include.clone(),
            exclude: objects.exclude.clone(),
            roles: objects.roles.clone(),
            extensions: objects.extensions.clone(),
            migrations: migrations.clone(),
        }
    }

    pub fn migrations_table(&self) -> &MigrationsTable {
        &self.migrations
    }

    pub fn include_schema(&self, schema_name: &str) -> bool {
        if matches_any(&self.exclude.schemas, schema_name) {
            return false;
        }
        if self
            .extension_objects()
            .any(|(_, schemas)| schemas.contains(&schema_name))
        {
            return false;
        }
        allowed(&self.include.schemas, schema_name)
    }

    /// Tables and views share the same rules.
    pub fn include_entity(&self, schema_name: &str, name: &str) -> bool {
        if self.is_migrations_table(schema_name, name) {
            return false;
        }
        if !self.include_schema(schema_name) {
            return false;
        }
        if matches_any(&self.exclude.tables, name) {
            return false;
        }
        if self
            .extension_objects()
            .any(|(tables, _)| tables.contains(&name))
        {
            return false;
        }
        allowed(&self.include.tables, name)
    }

    pub fn include_role(&self, role_name: &str) -> bool {
        if role_name.starts_with("pg_") {
            return false;
        }
        allowed(&self.roles, role_name)
    }

    pub fn is_migrations_table(&self, schema_name: &str, table_name: &str) -> bool {
        schema_name == self.migrations.schema && table_name == self.migrations.name
    }

    fn extension_objects(&self) -> impl Iterator<Item = (&'static [&'static str], &'static [&'static str])> + '_ {
        EXTENSION_OBJECTS
            .iter()
            .filter(|(extension, _, _)| self.extensions.iter().any(|e| e == extension))
            .map(|(_, tables, schemas)| (*tables, *schemas))
    }

    /// Removes every entity the filter excludes from a snapshot.
    pub fn apply(&self, mut ddl: Ddl) -> Ddl {
        let before = ddl.tables.len() + ddl.views.len();

        ddl.schemas.retain(|s| self.include_schema(&s.name));
        ddl.roles.retain(|r| self.include_role(&r.name));
        ddl.enums.retain(|e| self.include_schema(&e.schema));
        ddl.sequences.retain(|s| self.include_schema(&s.schema));
        ddl.tables.retain(|t| self.include_entity(&t.schema, &t.name));
        ddl.views.retain(|v| self.include_entity(&v.schema, &v.name));
        ddl.columns.retain(|c| self.include_entity(&c.schema, &c.table));
        ddl.primary_keys
            .retain(|c| self.include_entity(&c.schema, &c.table));
        ddl.uniques.retain(|c| self.include_entity(&c.schema, &c.table));
        ddl.checks.retain(|c| self.include_entity(&c.schema, &c.table));
        ddl.foreign_keys
            .retain(|c| self.include_entity(&c.schema, &c.table));
        ddl.indexes.retain(|i| self.include_entity(&i.schema, &i.table));
        ddl.policies
            .retain(|p| self.include_entity(&p.schema, &p.table));

        let after = ddl.tables.len() + ddl.views.len();
        if before != after {
            debug!("Filtered out {} table(s) and view(s)", before - after);
        }
        ddl
    }
}

fn matches(pattern: &str, name: &str) -> bool {
    Pattern::new(pattern)
        .map(|p| p.matches(name))
        .unwrap_or(false)
}

fn matches_any(patterns: &[String], name: &str) -> bool {
    patterns.iter().any(|pattern| matches(pattern, name))
}

/// Applies a mixed list of `pattern` and `!pattern` entries.
fn allowed(patterns: &[String], name: &str) -> bool {
    let (negative, positive): (Vec<&String>, Vec<&String>) =
        patterns.iter().partition(|p| p.starts_with('!'));

    if negative.iter().any(|p| matches(&p[1..], name)) {
        return false;
    }
    positive.is_empty() || positive.iter().any(|p| matches(p, name))
}
