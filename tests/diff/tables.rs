use crate::helpers::builders::{SnapshotBuilder, col, diff_with, sql};
use pgdelta::ddl::Ddl;
use pgdelta::diff::Mode;
use pgdelta::diff::operations::{MigrationStep, TableOperation};

fn users() -> Ddl {
    SnapshotBuilder::new()
        .table(
            "users",
            vec![col("id", "integer").primary_key(), col("email", "text").not_null()],
        )
        .build()
}

#[test]
fn test_create_table_from_empty() {
    let statements = sql(&Ddl::new(), &users(), &[]);
    assert_eq!(
        statements,
        vec!["CREATE TABLE \"users\" (\n\t\"id\" int4 PRIMARY KEY,\n\t\"email\" text NOT NULL\n);"]
    );
}

#[test]
fn test_drop_table_drops_only_the_table() {
    let statements = sql(&users(), &Ddl::new(), &[]);
    assert_eq!(statements, vec!["DROP TABLE \"users\";"]);
}

#[test]
fn test_declared_table_and_column_rename() {
    let from = SnapshotBuilder::new()
        .table("users", vec![col("id", "integer").primary_key()])
        .build();
    let to = SnapshotBuilder::new()
        .table("users1", vec![col("id1", "integer").primary_key()])
        .build();

    let statements = sql(
        &from,
        &to,
        &["public.users->public.users1", "public.users1.id->public.users1.id1"],
    );
    assert_eq!(
        statements,
        vec![
            "ALTER TABLE \"users\" RENAME TO \"users1\";",
            "ALTER TABLE \"users1\" RENAME COLUMN \"id\" TO \"id1\";",
        ]
    );
}

#[test]
fn test_undeclared_rename_is_drop_and_create() {
    let from = SnapshotBuilder::new()
        .table("users", vec![col("id", "integer")])
        .build();
    let to = SnapshotBuilder::new()
        .table("accounts", vec![col("id", "integer")])
        .build();

    let result = diff_with(&from, &to, &[], Mode::Default).unwrap();
    assert!(matches!(
        result.steps.as_slice(),
        [
            MigrationStep::Table(TableOperation::Drop { .. }),
            MigrationStep::Table(TableOperation::Create { .. }),
        ]
    ));
    assert_eq!(result.sql_statements[0], "DROP TABLE \"users\";");
    assert!(result.sql_statements[1].starts_with("CREATE TABLE \"accounts\""));
}

#[test]
fn test_declared_move_between_schemas() {
    let from = SnapshotBuilder::new()
        .schema("app")
        .table("users", vec![col("id", "integer")])
        .build();
    let to = SnapshotBuilder::new()
        .schema("app")
        .table_in("app", "users", vec![col("id", "integer")])
        .build();

    let statements = sql(&from, &to, &["public.users->app.users"]);
    assert_eq!(statements, vec!["ALTER TABLE \"users\" SET SCHEMA \"app\";"]);
}

#[test]
fn test_referencing_table_is_dropped_first() {
    let from = SnapshotBuilder::new()
        .table("users", vec![col("id", "integer").primary_key()])
        .table(
            "posts",
            vec![col("id", "integer").primary_key(), col("author_id", "integer")],
        )
        .foreign_key("posts", &["author_id"], "users", &["id"])
        .build();

    let statements = sql(&from, &Ddl::new(), &[]);
    assert_eq!(
        statements,
        vec!["DROP TABLE \"posts\";", "DROP TABLE \"users\";"]
    );
}

#[test]
fn test_created_table_gets_foreign_keys_after_creation() {
    let to = SnapshotBuilder::new()
        .table(
            "posts",
            vec![col("id", "integer").primary_key(), col("author_id", "integer")],
        )
        .table("users", vec![col("id", "integer").primary_key()])
        .foreign_key("posts", &["author_id"], "users", &["id"])
        .build();

    let statements = sql(&Ddl::new(), &to, &[]);
    assert_eq!(statements.len(), 3);
    assert!(statements[0].starts_with("CREATE TABLE \"posts\""));
    assert!(statements[1].starts_with("CREATE TABLE \"users\""));
    assert_eq!(
        statements[2],
        "ALTER TABLE \"posts\" ADD CONSTRAINT \"posts_author_id_users_id_fkey\" \
         FOREIGN KEY (\"author_id\") REFERENCES \"users\"(\"id\");"
    );
}
