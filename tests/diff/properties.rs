use crate::helpers::builders::{SnapshotBuilder, col, diff_with, sql};
use pgdelta::ddl::{ColumnDefault, ColumnType, Ddl, EntityKind, Index, IndexColumn, Policy};
use pgdelta::diff::{self, Mode};
use pgdelta::error::DiffError;
use pgdelta::resolver::Resolvers;
use rstest::rstest;

fn app_schema() -> Ddl {
    let mut status = col("status", "status").with_default(ColumnDefault::string("active"));
    status.column_type = ColumnType::user_defined("public", "status");
    let mut policy = Policy::new("public", "posts", "authors_only");
    policy.using = Some("author_id = current_setting('app.user')::int".to_string());

    SnapshotBuilder::new()
        .enum_type("status", &["active", "archived"])
        .table(
            "users",
            vec![
                col("id", "serial").primary_key(),
                col("email", "varchar(256)").not_null(),
                status,
                col("created_at", "timestamptz").with_default(ColumnDefault::expression("now()")),
            ],
        )
        .table(
            "posts",
            vec![
                col("id", "bigint").primary_key(),
                col("author_id", "integer").not_null(),
                col("title", "text"),
            ],
        )
        .unique("users", "users_email_key", &["email"])
        .check("posts", "posts_title_check", "length(title) > 0")
        .foreign_key("posts", &["author_id"], "users", &["id"])
        .index(Index::new("public", "posts", "", vec![IndexColumn::column("author_id")]))
        .view("recent_posts", "SELECT * FROM posts ORDER BY id DESC LIMIT 10")
        .policy(policy)
        .build()
}

#[rstest]
#[case::default_mode(Mode::Default)]
#[case::push_mode(Mode::Push)]
fn test_diff_against_itself_is_empty(#[case] mode: Mode) {
    let schema = app_schema();
    assert!(diff_with(&schema, &schema, &[], mode).unwrap().is_empty());
}

#[test]
fn test_creating_from_empty_converges() {
    let schema = app_schema();
    let result = diff_with(&Ddl::new(), &schema, &[], Mode::Default).unwrap();
    assert!(!result.is_empty());

    let again = diff::diff(&result.next, &schema, &Resolvers::none(), Mode::Default).unwrap();
    assert!(again.is_empty());
}

#[test]
fn test_output_is_deterministic() {
    let first = sql(&Ddl::new(), &app_schema(), &[]);
    for _ in 0..5 {
        assert_eq!(sql(&Ddl::new(), &app_schema(), &[]), first);
    }
}

#[test]
fn test_grouped_statements_match_flat_list() {
    let result = diff_with(&Ddl::new(), &app_schema(), &[], Mode::Default).unwrap();
    let flattened: Vec<String> = result
        .grouped
        .iter()
        .flat_map(|g| g.sql_statements.clone())
        .collect();
    assert_eq!(flattened, result.sql_statements);
    assert_eq!(result.grouped.len(), result.steps.len());
}

#[test]
fn test_duplicate_names_are_reported_together() {
    let broken = SnapshotBuilder::new()
        .table("users", vec![col("id", "int4"), col("id", "text")])
        .table("users", vec![])
        .build();

    let err = diff_with(&Ddl::new(), &broken, &[], Mode::Default).unwrap_err();
    let DiffError::Schema(errors) = err else {
        panic!("expected a schema error, got {:?}", err);
    };
    let kinds: Vec<EntityKind> = errors.issues().iter().map(|i| i.kind).collect();
    assert!(kinds.contains(&EntityKind::Table));
    assert!(kinds.contains(&EntityKind::Column));
}

#[test]
fn test_invalid_rename_declaration_is_rejected() {
    let err = diff_with(&Ddl::new(), &Ddl::new(), &["public.users"], Mode::Default).unwrap_err();
    assert!(matches!(err, DiffError::InvalidRename(ref d) if d == "public.users"));
}
