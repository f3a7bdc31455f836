//! Reads a live database into a [`Ddl`] snapshot through `pg_catalog`.
//!
//! Every selected value is cast to text so that rows decode uniformly; lists
//! are aggregated with the unit separator (`chr(31)`) to survive identifiers
//! that contain commas.

use crate::config::EntityFilter;
use crate::db::{Database, Row};
use crate::ddl::{
    CheckConstraint, Column, ColumnDefault, ColumnType, Ddl, EnumType, FkAction, ForeignKey, Index,
    IndexColumn, Policy, PolicyAs, PolicyFor, PrimaryKey, Role, Schema, Sequence, Table,
    UniqueConstraint, View,
};
use crate::progress::ProgressReporter;
use anyhow::{Context, Result};
use std::time::Instant;
use tracing::{debug, info};

const LIST_SEPARATOR: char = '\u{1f}';

const USER_SCHEMAS: &str = "n.nspname NOT IN ('pg_catalog', 'information_schema', 'pg_toast') \
     AND n.nspname NOT LIKE 'pg_temp_%' AND n.nspname NOT LIKE 'pg_toast_temp_%'";

/// Objects created by `CREATE EXTENSION` are never part of the managed schema.
const NOT_EXTENSION_MEMBER: &str = "NOT EXISTS (SELECT 1 FROM pg_depend ext \
     WHERE ext.objid = c.oid AND ext.deptype = 'e')";

fn split_list(value: Option<&str>) -> Vec<String> {
    match value {
        Some(v) if !v.is_empty() => v.split(LIST_SEPARATOR).map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

fn unquote_identifier(value: &str) -> String {
    match value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) {
        Some(inner) => inner.replace("\"\"", "\""),
        None => value.to_string(),
    }
}

/// `CHECK ((price > 0)) NOT VALID` -> `(price > 0)`.
fn check_expression(definition: &str) -> String {
    let body = definition.trim();
    let body = body.strip_suffix("NOT VALID").unwrap_or(body).trim_end();
    let body = body.strip_prefix("CHECK").unwrap_or(body).trim();
    match body.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
        Some(inner) => inner.trim().to_string(),
        None => body.to_string(),
    }
}

/// Serial columns show up as an integer with a `nextval` default on the
/// sequence PostgreSQL named after the column.
fn serial_type(column_type: &str, table: &str, column: &str, default: &str) -> Option<&'static str> {
    let serial = match column_type {
        "integer" => "serial",
        "bigint" => "bigserial",
        "smallint" => "smallserial",
        _ => return None,
    };
    let sequence = format!("{}_{}_seq", table, column);
    let expected = [
        format!("nextval('{}'::regclass)", sequence),
        format!("nextval('\"{}\"'::regclass)", sequence),
    ];
    let matches = expected.iter().any(|e| default == e)
        || (default.starts_with("nextval('")
            && default.ends_with(&format!(".{}'::regclass)", sequence)));
    matches.then_some(serial)
}

/// Introspects the database behind `db`, keeping only what `filter` manages.
pub async fn introspect<D: Database>(
    db: &D,
    filter: &EntityFilter,
    progress: &dyn ProgressReporter,
) -> Result<Ddl> {
    const STAGE: &str = "Introspecting database";
    let started = Instant::now();
    progress.start_stage(STAGE);

    match introspect_all(db, progress).await {
        Ok(ddl) => {
            let ddl = filter.apply(ddl);
            info!(
                "Introspected {} table(s), {} view(s), {} enum(s)",
                ddl.tables.len(),
                ddl.views.len(),
                ddl.enums.len()
            );
            progress.complete_stage(STAGE, started.elapsed(), Some(ddl.tables.len()));
            Ok(ddl)
        }
        Err(e) => {
            progress.fail_stage(STAGE, &e);
            Err(e)
        }
    }
}

async fn introspect_all<D: Database>(db: &D, progress: &dyn ProgressReporter) -> Result<Ddl> {
    const TOTAL: usize = 11;
    let mut ddl = Ddl::new();

    progress.step(1, TOTAL, "schemas");
    ddl.schemas = fetch_schemas(db).await.context("Failed to fetch schemas")?;
    progress.step(2, TOTAL, "roles");
    ddl.roles = fetch_roles(db).await.context("Failed to fetch roles")?;
    progress.step(3, TOTAL, "enums");
    ddl.enums = fetch_enums(db).await.context("Failed to fetch enums")?;
    progress.step(4, TOTAL, "sequences");
    ddl.sequences = fetch_sequences(db).await.context("Failed to fetch sequences")?;
    progress.step(5, TOTAL, "tables");
    ddl.tables = fetch_tables(db).await.context("Failed to fetch tables")?;
    progress.step(6, TOTAL, "columns");
    ddl.columns = fetch_columns(db).await.context("Failed to fetch columns")?;
    progress.step(7, TOTAL, "constraints");
    fetch_constraints(db, &mut ddl)
        .await
        .context("Failed to fetch constraints")?;
    progress.step(8, TOTAL, "foreign keys");
    ddl.foreign_keys = fetch_foreign_keys(db)
        .await
        .context("Failed to fetch foreign keys")?;
    progress.step(9, TOTAL, "indexes");
    ddl.indexes = fetch_indexes(db).await.context("Failed to fetch indexes")?;
    progress.step(10, TOTAL, "views");
    ddl.views = fetch_views(db).await.context("Failed to fetch views")?;
    progress.step(11, TOTAL, "policies");
    ddl.policies = fetch_policies(db).await.context("Failed to fetch policies")?;

    Ok(ddl)
}

async fn fetch_schemas<D: Database>(db: &D) -> Result<Vec<Schema>> {
    let sql = format!(
        "SELECT n.nspname::text AS name FROM pg_namespace n \
         WHERE {} AND NOT EXISTS (SELECT 1 FROM pg_depend ext \
         WHERE ext.objid = n.oid AND ext.deptype = 'e') \
         ORDER BY n.nspname",
        USER_SCHEMAS
    );
    db.query(&sql)
        .await?
        .iter()
        .map(|row| Ok(Schema::new(row.text("name")?)))
        .collect()
}

async fn fetch_roles<D: Database>(db: &D) -> Result<Vec<Role>> {
    let rows = db
        .query(
            "SELECT rolname::text AS name, rolcreatedb::text AS create_db, \
             rolcreaterole::text AS create_role, rolinherit::text AS inherit \
             FROM pg_roles WHERE rolname NOT LIKE 'pg\\_%' ORDER BY rolname",
        )
        .await?;
    rows.iter()
        .map(|row| {
            Ok(Role {
                name: row.text("name")?,
                create_db: row.flag("create_db"),
                create_role: row.flag("create_role"),
                inherit: row.flag("inherit"),
            })
        })
        .collect()
}

async fn fetch_enums<D: Database>(db: &D) -> Result<Vec<EnumType>> {
    let sql = format!(
        "SELECT n.nspname::text AS schema, t.typname::text AS name, e.enumlabel::text AS value \
         FROM pg_enum e \
         JOIN pg_type t ON t.oid = e.enumtypid \
         JOIN pg_namespace n ON n.oid = t.typnamespace \
         WHERE {} AND NOT EXISTS (SELECT 1 FROM pg_depend ext \
         WHERE ext.objid = t.oid AND ext.deptype = 'e') \
         ORDER BY n.nspname, t.typname, e.enumsortorder",
        USER_SCHEMAS
    );
    let rows = db.query(&sql).await?;

    let mut enums: Vec<EnumType> = Vec::new();
    for row in &rows {
        let schema = row.text("schema")?;
        let name = row.text("name")?;
        let value = row.text("value")?;
        match enums.last_mut() {
            Some(last) if last.schema == schema && last.name == name => last.values.push(value),
            _ => enums.push(EnumType {
                schema,
                name,
                values: vec![value],
            }),
        }
    }
    Ok(enums)
}

async fn fetch_sequences<D: Database>(db: &D) -> Result<Vec<Sequence>> {
    // Sequences owned by serial or identity columns belong to their column.
    let sql = format!(
        "SELECT n.nspname::text AS schema, c.relname::text AS name, \
         s.seqincrement::text AS increment, s.seqmin::text AS min_value, \
         s.seqmax::text AS max_value, s.seqstart::text AS start_with, \
         s.seqcache::text AS cache, s.seqcycle::text AS cycle \
         FROM pg_sequence s \
         JOIN pg_class c ON c.oid = s.seqrelid \
         JOIN pg_namespace n ON n.oid = c.relnamespace \
         WHERE {} AND {} \
         AND NOT EXISTS (SELECT 1 FROM pg_depend d \
             WHERE d.objid = c.oid AND d.classid = 'pg_class'::regclass \
             AND d.refobjsubid > 0 AND d.deptype IN ('a', 'i')) \
         ORDER BY n.nspname, c.relname",
        USER_SCHEMAS, NOT_EXTENSION_MEMBER
    );
    db.query(&sql)
        .await?
        .iter()
        .map(|row| {
            Ok(Sequence {
                schema: row.text("schema")?,
                name: row.text("name")?,
                increment: row.int("increment")?.unwrap_or(1),
                min_value: row.int("min_value")?,
                max_value: row.int("max_value")?,
                start_with: row.int("start_with")?,
                cache: row.int("cache")?,
                cycle: row.flag("cycle"),
            })
        })
        .collect()
}

async fn fetch_tables<D: Database>(db: &D) -> Result<Vec<Table>> {
    let sql = format!(
        "SELECT n.nspname::text AS schema, c.relname::text AS name, \
         c.relrowsecurity::text AS rls_enabled \
         FROM pg_class c JOIN pg_namespace n ON n.oid = c.relnamespace \
         WHERE c.relkind IN ('r', 'p') AND NOT c.relispartition AND {} AND {} \
         ORDER BY n.nspname, c.relname",
        USER_SCHEMAS, NOT_EXTENSION_MEMBER
    );
    db.query(&sql)
        .await?
        .iter()
        .map(|row| {
            Ok(Table {
                schema: row.text("schema")?,
                name: row.text("name")?,
                rls_enabled: row.flag("rls_enabled"),
            })
        })
        .collect()
}

async fn fetch_columns<D: Database>(db: &D) -> Result<Vec<Column>> {
    let sql = format!(
        "SELECT n.nspname::text AS schema, c.relname::text AS table_name, a.attname::text AS name, \
         CASE WHEN t.typcategory = 'A' THEN format_type(t.typelem, a.atttypmod) \
              ELSE format_type(a.atttypid, a.atttypmod) END AS type_name, \
         CASE WHEN t.typcategory = 'A' THEN et.typtype::text ELSE t.typtype::text END AS typtype, \
         CASE WHEN t.typcategory = 'A' THEN etn.nspname::text ELSE tn.nspname::text END AS type_schema, \
         CASE WHEN t.typcategory = 'A' THEN et.typname::text ELSE t.typname::text END AS raw_type, \
         (CASE WHEN t.typcategory = 'A' THEN GREATEST(a.attndims, 1) ELSE 0 END)::text AS dimensions, \
         a.attnotnull::text AS not_null, \
         a.attgenerated::text AS generated_kind, \
         pg_get_expr(ad.adbin, ad.adrelid) AS expression \
         FROM pg_attribute a \
         JOIN pg_class c ON c.oid = a.attrelid \
         JOIN pg_namespace n ON n.oid = c.relnamespace \
         JOIN pg_type t ON t.oid = a.atttypid \
         JOIN pg_namespace tn ON tn.oid = t.typnamespace \
         LEFT JOIN pg_type et ON et.oid = t.typelem \
         LEFT JOIN pg_namespace etn ON etn.oid = et.typnamespace \
         LEFT JOIN pg_attrdef ad ON ad.adrelid = a.attrelid AND ad.adnum = a.attnum \
         WHERE c.relkind IN ('r', 'p') AND NOT c.relispartition AND a.attnum > 0 \
         AND NOT a.attisdropped AND {} AND {} \
         ORDER BY n.nspname, c.relname, a.attnum",
        USER_SCHEMAS, NOT_EXTENSION_MEMBER
    );
    db.query(&sql).await?.iter().map(column_from_row).collect()
}

fn column_from_row(row: &Row) -> Result<Column> {
    let schema = row.text("schema")?;
    let table = row.text("table_name")?;
    let name = row.text("name")?;
    let dimensions = row.int("dimensions")?.unwrap_or(0) as u32;

    let mut column_type = if row.get("typtype") == Some("e") {
        ColumnType::user_defined(row.text("type_schema")?, row.text("raw_type")?)
    } else {
        ColumnType::new(row.text("type_name")?)
    };
    column_type.dimensions = dimensions;

    let mut column = Column::new(schema, table, name, column_type);
    column.not_null = row.flag("not_null");

    if let Some(expression) = row.get("expression") {
        if row.get("generated_kind") == Some("s") {
            column.generated = Some(expression.to_string());
        } else if let Some(serial) = (dimensions == 0)
            .then(|| {
                serial_type(
                    &column.column_type.name,
                    &column.table,
                    &column.name,
                    expression,
                )
            })
            .flatten()
        {
            debug!("Column {}.{} is {}", column.table, column.name, serial);
            column.column_type.name = serial.to_string();
        } else {
            column.default = Some(ColumnDefault::expression(expression));
        }
    }
    Ok(column)
}

const CONSTRAINT_COLUMNS: &str = "(SELECT string_agg(a.attname::text, chr(31) ORDER BY k.ord) \
     FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord) \
     JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum)";

async fn fetch_constraints<D: Database>(db: &D, ddl: &mut Ddl) -> Result<()> {
    let sql = format!(
        "SELECT n.nspname::text AS schema, c.relname::text AS table_name, \
         con.conname::text AS name, con.contype::text AS kind, \
         {} AS columns, \
         pg_get_constraintdef(con.oid) AS definition, \
         COALESCE(to_jsonb(ix)->>'indnullsnotdistinct', 'false') AS nulls_not_distinct \
         FROM pg_constraint con \
         JOIN pg_class c ON c.oid = con.conrelid \
         JOIN pg_namespace n ON n.oid = c.relnamespace \
         LEFT JOIN pg_index ix ON ix.indexrelid = con.conindid \
         WHERE con.contype IN ('p', 'u', 'c') AND c.relkind IN ('r', 'p') AND {} AND {} \
         ORDER BY n.nspname, c.relname, con.conname",
        CONSTRAINT_COLUMNS, USER_SCHEMAS, NOT_EXTENSION_MEMBER
    );

    for row in db.query(&sql).await? {
        let schema = row.text("schema")?;
        let table = row.text("table_name")?;
        let name = row.text("name")?;
        let columns = split_list(row.get("columns"));
        match row.get("kind") {
            Some("p") => ddl.primary_keys.push(PrimaryKey {
                schema,
                table,
                name,
                columns,
            }),
            Some("u") => ddl.uniques.push(UniqueConstraint {
                schema,
                table,
                name,
                columns,
                nulls_not_distinct: row.flag("nulls_not_distinct"),
            }),
            Some("c") => ddl.checks.push(CheckConstraint {
                schema,
                table,
                name,
                value: check_expression(&row.text("definition")?),
            }),
            other => debug!("Skipping constraint {} of kind {:?}", name, other),
        }
    }
    Ok(())
}

async fn fetch_foreign_keys<D: Database>(db: &D) -> Result<Vec<ForeignKey>> {
    let sql = format!(
        "SELECT n.nspname::text AS schema, c.relname::text AS table_name, \
         con.conname::text AS name, {} AS columns, \
         rn.nspname::text AS schema_to, rc.relname::text AS table_to, \
         (SELECT string_agg(a.attname::text, chr(31) ORDER BY k.ord) \
            FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, ord) \
            JOIN pg_attribute a ON a.attrelid = con.confrelid AND a.attnum = k.attnum) AS columns_to, \
         con.confdeltype::text AS on_delete, con.confupdtype::text AS on_update \
         FROM pg_constraint con \
         JOIN pg_class c ON c.oid = con.conrelid \
         JOIN pg_namespace n ON n.oid = c.relnamespace \
         JOIN pg_class rc ON rc.oid = con.confrelid \
         JOIN pg_namespace rn ON rn.oid = rc.relnamespace \
         WHERE con.contype = 'f' AND {} AND {} \
         ORDER BY n.nspname, c.relname, con.conname",
        CONSTRAINT_COLUMNS, USER_SCHEMAS, NOT_EXTENSION_MEMBER
    );
    db.query(&sql)
        .await?
        .iter()
        .map(|row| {
            Ok(ForeignKey {
                schema: row.text("schema")?,
                table: row.text("table_name")?,
                name: row.text("name")?,
                columns: split_list(row.get("columns")),
                schema_to: row.text("schema_to")?,
                table_to: row.text("table_to")?,
                columns_to: split_list(row.get("columns_to")),
                on_delete: FkAction::from_pg_code(row.get("on_delete").unwrap_or("a")),
                on_update: FkAction::from_pg_code(row.get("on_update").unwrap_or("a")),
            })
        })
        .collect()
}

async fn fetch_indexes<D: Database>(db: &D) -> Result<Vec<Index>> {
    // One row per key column; indexes backing constraints are reported with
    // their constraint.
    let sql = format!(
        "SELECT n.nspname::text AS schema, c.relname::text AS table_name, \
         ic.relname::text AS name, ix.indisunique::text AS is_unique, am.amname::text AS method, \
         pg_get_expr(ix.indpred, ix.indrelid) AS predicate, \
         pg_get_indexdef(ix.indexrelid, k.ord, true) AS value, \
         (ix.indkey[k.ord - 1] = 0)::text AS is_expression, \
         ((ix.indoption[k.ord - 1] & 1) = 1)::text AS descending, \
         ((ix.indoption[k.ord - 1] & 2) = 2)::text AS nulls_first, \
         CASE WHEN opc.opcdefault THEN NULL ELSE opc.opcname::text END AS opclass \
         FROM pg_index ix \
         JOIN pg_class ic ON ic.oid = ix.indexrelid \
         JOIN pg_class c ON c.oid = ix.indrelid \
         JOIN pg_namespace n ON n.oid = c.relnamespace \
         JOIN pg_am am ON am.oid = ic.relam \
         CROSS JOIN LATERAL generate_series(1, ix.indnkeyatts::int) AS k(ord) \
         LEFT JOIN pg_opclass opc ON opc.oid = ix.indclass[k.ord - 1] \
         WHERE c.relkind IN ('r', 'p') AND {} AND {} \
         AND NOT EXISTS (SELECT 1 FROM pg_constraint con \
             WHERE con.conindid = ix.indexrelid AND con.contype IN ('p', 'u', 'x')) \
         ORDER BY n.nspname, c.relname, ic.relname, k.ord",
        USER_SCHEMAS, NOT_EXTENSION_MEMBER
    );

    let mut indexes: Vec<Index> = Vec::new();
    for row in db.query(&sql).await? {
        let schema = row.text("schema")?;
        let table = row.text("table_name")?;
        let name = row.text("name")?;

        let is_expression = row.flag("is_expression");
        let value = row.text("value")?;
        let descending = row.flag("descending");
        let nulls_first = row.flag("nulls_first");
        let column = IndexColumn {
            value: if is_expression {
                value
            } else {
                unquote_identifier(&value)
            },
            is_expression,
            asc: !descending,
            // NULLS FIRST is the default for DESC and NULLS LAST for ASC
            nulls_first: (nulls_first != descending).then_some(nulls_first),
            opclass: row.get("opclass").map(str::to_string),
        };

        match indexes.last_mut() {
            Some(last) if last.schema == schema && last.table == table && last.name == name => {
                last.columns.push(column)
            }
            _ => {
                let mut index = Index::new(schema, table, name, vec![column]);
                index.unique = row.flag("is_unique");
                index.method = row.text("method")?;
                index.predicate = row.get("predicate").map(str::to_string);
                indexes.push(index);
            }
        }
    }
    Ok(indexes)
}

async fn fetch_views<D: Database>(db: &D) -> Result<Vec<View>> {
    let sql = format!(
        "SELECT n.nspname::text AS schema, c.relname::text AS name, \
         pg_get_viewdef(c.oid, true) AS definition, \
         (c.relkind = 'm')::text AS materialized, \
         (c.relkind = 'm' AND NOT c.relispopulated)::text AS with_no_data \
         FROM pg_class c JOIN pg_namespace n ON n.oid = c.relnamespace \
         WHERE c.relkind IN ('v', 'm') AND {} AND {} \
         ORDER BY n.nspname, c.relname",
        USER_SCHEMAS, NOT_EXTENSION_MEMBER
    );
    db.query(&sql)
        .await?
        .iter()
        .map(|row| {
            Ok(View {
                schema: row.text("schema")?,
                name: row.text("name")?,
                definition: row.get("definition").map(|d| d.trim().to_string()),
                existing: false,
                materialized: row.flag("materialized"),
                with_no_data: row.flag("with_no_data"),
            })
        })
        .collect()
}

async fn fetch_policies<D: Database>(db: &D) -> Result<Vec<Policy>> {
    let sql = format!(
        "SELECT n.nspname::text AS schema, c.relname::text AS table_name, \
         p.polname::text AS name, p.polpermissive::text AS permissive, p.polcmd::text AS command, \
         (SELECT string_agg(CASE WHEN r = 0 THEN 'public' ELSE pg_get_userbyid(r)::text END, chr(31)) \
            FROM unnest(p.polroles) AS r) AS roles, \
         pg_get_expr(p.polqual, p.polrelid) AS using_expr, \
         pg_get_expr(p.polwithcheck, p.polrelid) AS with_check \
         FROM pg_policy p \
         JOIN pg_class c ON c.oid = p.polrelid \
         JOIN pg_namespace n ON n.oid = c.relnamespace \
         WHERE {} \
         ORDER BY n.nspname, c.relname, p.polname",
        USER_SCHEMAS
    );
    db.query(&sql)
        .await?
        .iter()
        .map(|row| {
            let mut policy = Policy::new(
                row.text("schema")?,
                row.text("table_name")?,
                row.text("name")?,
            );
            policy.as_clause = if row.flag("permissive") {
                PolicyAs::Permissive
            } else {
                PolicyAs::Restrictive
            };
            policy.for_clause = PolicyFor::from_pg_code(row.get("command").unwrap_or("*"));
            let roles = split_list(row.get("roles"));
            if !roles.is_empty() {
                policy.to = roles;
            }
            policy.using = row.get("using_expr").map(str::to_string);
            policy.with_check = row.get("with_check").map(str::to_string);
            Ok(policy)
        })
        .collect()
}
