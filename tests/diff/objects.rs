use crate::helpers::builders::{SnapshotBuilder, col, diff_with, sql};
use pgdelta::ddl::{Ddl, Index, IndexColumn, Policy, Role, Schema, Sequence};
use pgdelta::diff::Mode;

fn users() -> SnapshotBuilder {
    SnapshotBuilder::new().table("users", vec![col("id", "int4"), col("email", "text")])
}

#[test]
fn test_create_and_drop_index() {
    let mut index = Index::new(
        "public",
        "users",
        "users_email_idx",
        vec![IndexColumn::column("email").desc()],
    );
    index.unique = true;
    let with_index = users().index(index).build();

    assert_eq!(
        sql(&users().build(), &with_index, &[]),
        vec!["CREATE UNIQUE INDEX \"users_email_idx\" ON \"users\" (\"email\" DESC);"]
    );
    assert_eq!(
        sql(&with_index, &users().build(), &[]),
        vec!["DROP INDEX \"users_email_idx\";"]
    );
}

#[test]
fn test_unnamed_index_gets_derived_name() {
    let to = users()
        .index(Index::new(
            "public",
            "users",
            "",
            vec![IndexColumn::column("email"), IndexColumn::expression("lower(email)")],
        ))
        .build();

    assert_eq!(
        sql(&users().build(), &to, &[]),
        vec!["CREATE INDEX \"users_email_expr_idx\" ON \"users\" (\"email\", lower(email));"]
    );
}

#[test]
fn test_changed_index_is_recreated() {
    let from = users()
        .index(Index::new("public", "users", "users_email_idx", vec![IndexColumn::column("email")]))
        .build();
    let to = users()
        .index(Index::new(
            "public",
            "users",
            "users_email_idx",
            vec![IndexColumn::column("email"), IndexColumn::column("id")],
        ))
        .build();

    assert_eq!(
        sql(&from, &to, &[]),
        vec![
            "DROP INDEX \"users_email_idx\";",
            "CREATE INDEX \"users_email_idx\" ON \"users\" (\"email\", \"id\");",
        ]
    );
}

#[test]
fn test_view_definition_text_only_counts_in_default_mode() {
    let from = users()
        .view("user_emails", "SELECT email FROM users")
        .build();
    let to = users()
        .view("user_emails", "select email from users")
        .build();

    assert!(diff_with(&from, &to, &[], Mode::Push).unwrap().is_empty());
    assert_eq!(
        sql(&from, &to, &[]),
        vec![
            "DROP VIEW \"user_emails\";",
            "CREATE VIEW \"user_emails\" AS (select email from users);",
        ]
    );
}

#[test]
fn test_policy_enables_row_level_security() {
    let mut policy = Policy::new("public", "users", "own_rows");
    policy.using = Some("id = 1".to_string());
    let to = users().policy(policy).build();

    assert_eq!(
        sql(&users().build(), &to, &[]),
        vec![
            "ALTER TABLE \"users\" ENABLE ROW LEVEL SECURITY;",
            "CREATE POLICY \"own_rows\" ON \"users\" AS PERMISSIVE FOR ALL TO public USING (id = 1);",
        ]
    );
}

#[test]
fn test_policy_roles_compare_as_a_set() {
    let build = |roles: &[&str]| {
        let mut policy = Policy::new("public", "users", "own_rows");
        policy.to = roles.iter().map(|r| r.to_string()).collect();
        users().policy(policy).build()
    };

    assert!(sql(&build(&["admin", "editor"]), &build(&["editor", "admin"]), &[]).is_empty());
}

#[test]
fn test_schema_role_and_sequence_lifecycle() {
    let mut to = Ddl::new();
    to.schemas.push(Schema::new("app"));
    to.roles.push(Role::new("reader"));
    to.sequences.push(Sequence::new("app", "ids"));

    let created = sql(&Ddl::new(), &to, &[]);
    assert_eq!(created[0], "CREATE SCHEMA \"app\";");
    assert_eq!(created[1], "CREATE ROLE \"reader\";");
    assert!(created[2].starts_with("CREATE SEQUENCE \"app\".\"ids\" INCREMENT BY 1"));

    assert_eq!(
        sql(&to, &Ddl::new(), &[]),
        vec![
            "DROP SEQUENCE \"app\".\"ids\";",
            "DROP ROLE \"reader\";",
            "DROP SCHEMA \"app\";",
        ]
    );
}
