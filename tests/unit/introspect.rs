use crate::helpers::builders::{SnapshotBuilder, col};
use crate::helpers::fake_db::{COLUMNS, ENUMS, FakeDatabase};
use anyhow::Result;
use pgdelta::config::EntityFilter;
use pgdelta::db::Row;
use pgdelta::db::introspect::introspect;
use pgdelta::ddl::{ColumnType, Index, IndexColumn, Policy, PolicyFor};
use pgdelta::diff::{self, Mode};
use pgdelta::progress::SilentReporter;
use pgdelta::resolver::Resolvers;

fn enum_rows() -> Vec<Row> {
    ["active", "archived"]
        .iter()
        .map(|value| {
            Row::from_pairs([
                ("schema", Some("public")),
                ("name", Some("status")),
                ("value", Some(*value)),
            ])
        })
        .collect()
}

fn status_column() -> Row {
    Row::from_pairs([
        ("schema", Some("public")),
        ("table_name", Some("users")),
        ("name", Some("status")),
        ("type_name", Some("status")),
        ("typtype", Some("e")),
        ("type_schema", Some("public")),
        ("raw_type", Some("status")),
        ("dimensions", Some("0")),
        ("not_null", Some("false")),
        ("generated_kind", Some("")),
        ("expression", None),
    ])
}

fn serial_id() -> Row {
    Row::from_pairs([
        ("schema", Some("public")),
        ("table_name", Some("users")),
        ("name", Some("id")),
        ("type_name", Some("integer")),
        ("typtype", Some("b")),
        ("type_schema", Some("pg_catalog")),
        ("raw_type", Some("int4")),
        ("dimensions", Some("0")),
        ("not_null", Some("true")),
        ("generated_kind", Some("")),
        ("expression", Some("nextval('users_id_seq'::regclass)")),
    ])
}

fn index_row(column: &str) -> Row {
    Row::from_pairs([
        ("schema", Some("public")),
        ("table_name", Some("users")),
        ("name", Some("users_email_lower_idx")),
        ("is_unique", Some("false")),
        ("method", Some("btree")),
        ("predicate", None),
        ("value", Some(column)),
        ("is_expression", Some(if column.contains('(') { "true" } else { "false" })),
        ("descending", Some("true")),
        ("nulls_first", Some("true")),
        ("opclass", None),
    ])
}

fn policy_row() -> Row {
    Row::from_pairs([
        ("schema", Some("public")),
        ("table_name", Some("users")),
        ("name", Some("readers")),
        ("permissive", Some("true")),
        ("command", Some("r")),
        ("roles", Some("reader\u{1f}public")),
        ("using_expr", Some("true")),
        ("with_check", None),
    ])
}

fn database() -> FakeDatabase {
    FakeDatabase::new()
        .respond(ENUMS, enum_rows())
        .with_table("users", &[("email", "text", true)])
        .respond(COLUMNS, vec![status_column(), serial_id()])
        .respond("FROM pg_index ix", vec![index_row("email"), index_row("lower(email)")])
        .respond("FROM pg_policy p", vec![policy_row()])
}

#[tokio::test]
async fn test_introspect_decodes_catalog_rows() -> Result<()> {
    let db = database();
    let ddl = introspect(&db, &EntityFilter::default(), &SilentReporter).await?;

    assert_eq!(ddl.enums.len(), 1);
    assert_eq!(ddl.enums[0].values, vec!["active", "archived"]);

    let status = ddl.column("public", "users", "status").expect("status column");
    assert_eq!(status.column_type, ColumnType::user_defined("public", "status"));

    let id = ddl.column("public", "users", "id").expect("id column");
    assert_eq!(id.column_type.name, "serial");
    assert!(id.default.is_none());

    assert_eq!(ddl.indexes.len(), 1);
    let columns = &ddl.indexes[0].columns;
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].value, "email");
    assert!(!columns[0].asc);
    // NULLS FIRST is already the default for DESC.
    assert_eq!(columns[0].nulls_first, None);
    assert!(columns[1].is_expression);

    assert_eq!(ddl.policies[0].for_clause, PolicyFor::Select);
    assert_eq!(ddl.policies[0].to, vec!["reader", "public"]);
    Ok(())
}

#[tokio::test]
async fn test_introspected_schema_matches_its_declaration() -> Result<()> {
    let db = database();
    let current = introspect(&db, &EntityFilter::default(), &SilentReporter).await?;

    let mut status = col("status", "status");
    status.column_type = ColumnType::user_defined("public", "status");
    let mut policy = Policy::new("public", "users", "readers");
    policy.for_clause = PolicyFor::Select;
    policy.to = vec!["public".to_string(), "reader".to_string()];
    policy.using = Some("true".to_string());

    let declared = SnapshotBuilder::new()
        .enum_type("status", &["active", "archived"])
        .table(
            "users",
            vec![col("email", "text").not_null(), status, col("id", "serial")],
        )
        .index(Index::new(
            "public",
            "users",
            "users_email_lower_idx",
            vec![
                IndexColumn::column("email").desc(),
                IndexColumn::expression("lower(email)").desc(),
            ],
        ))
        .policy(policy)
        .build();

    let result = diff::diff(&current, &declared, &Resolvers::none(), Mode::Push)?;
    assert!(result.is_empty(), "unexpected statements: {:?}", result.sql_statements);
    Ok(())
}
