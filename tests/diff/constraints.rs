use crate::helpers::builders::{SnapshotBuilder, col, diff_with, sql};
use pgdelta::constants::MAX_IDENTIFIER_LENGTH;
use pgdelta::ddl::Ddl;
use pgdelta::diff::Mode;
use pgdelta::error::DiffError;
use rstest::rstest;

fn keyed(columns: &[&str]) -> Ddl {
    SnapshotBuilder::new()
        .table("t", vec![col("a", "int4").not_null(), col("b", "int4").not_null()])
        .primary_key("t", "t_pkey", columns)
        .build()
}

#[test]
fn test_composite_primary_key_order_matters() {
    let result = diff_with(&keyed(&["a", "b"]), &keyed(&["b", "a"]), &[], Mode::Default).unwrap();
    assert!(!result.is_empty());
    assert!(
        result
            .sql_statements
            .iter()
            .any(|s| s.contains("PRIMARY KEY(\"b\",\"a\")"))
    );
}

#[test]
fn test_primary_key_removal_is_refused_in_push_mode() {
    let from = keyed(&["a"]);
    let to = SnapshotBuilder::new()
        .table("t", vec![col("a", "int4").not_null(), col("b", "int4").not_null()])
        .build();

    let err = diff_with(&from, &to, &[], Mode::Push).unwrap_err();
    assert!(matches!(err, DiffError::UnsupportedTransition { ref table, .. } if table == "public.t"));

    let statements = sql(&from, &to, &[]);
    assert_eq!(statements, vec!["ALTER TABLE \"t\" DROP CONSTRAINT \"t_pkey\";"]);
}

#[rstest]
#[case::default_mode(Mode::Default)]
#[case::push_mode(Mode::Push)]
fn test_primary_key_losing_a_column_is_swapped_in_one_statement(#[case] mode: Mode) {
    let from = SnapshotBuilder::new()
        .table(
            "t",
            vec![
                col("a", "int4").not_null(),
                col("b", "int4").not_null(),
                col("c", "int4").not_null(),
            ],
        )
        .primary_key("t", "t_pkey", &["a", "b"])
        .build();
    let to = SnapshotBuilder::new()
        .table("t", vec![col("a", "int4").not_null(), col("c", "int4").not_null()])
        .primary_key("t", "t_pkey", &["a", "c"])
        .build();

    let result = diff_with(&from, &to, &[], mode).unwrap();
    assert_eq!(
        result.sql_statements,
        vec![
            "ALTER TABLE \"t\" DROP CONSTRAINT \"t_pkey\", ADD CONSTRAINT \"t_pkey\" PRIMARY KEY(\"a\",\"c\");",
            "ALTER TABLE \"t\" DROP COLUMN \"b\";",
        ]
    );
}

#[test]
fn test_primary_key_on_a_new_column_is_added_after_the_column() {
    let to = SnapshotBuilder::new()
        .table("t", vec![col("a", "int4").not_null(), col("c", "int4").not_null()])
        .primary_key("t", "t_pkey", &["a", "c"])
        .build();

    assert_eq!(
        sql(&keyed(&["a", "b"]), &to, &[]),
        vec![
            "ALTER TABLE \"t\" DROP CONSTRAINT \"t_pkey\";",
            "ALTER TABLE \"t\" DROP COLUMN \"b\";",
            "ALTER TABLE \"t\" ADD COLUMN \"c\" int4 NOT NULL;",
            "ALTER TABLE \"t\" ADD CONSTRAINT \"t_pkey\" PRIMARY KEY(\"a\",\"c\");",
        ]
    );
}

#[test]
fn test_add_primary_key_to_existing_table() {
    let from = SnapshotBuilder::new()
        .table("t", vec![col("a", "int4").not_null()])
        .build();
    let to = SnapshotBuilder::new()
        .table("t", vec![col("a", "int4").not_null()])
        .primary_key("t", "t_pkey", &["a"])
        .build();

    assert_eq!(
        sql(&from, &to, &[]),
        vec!["ALTER TABLE \"t\" ADD CONSTRAINT \"t_pkey\" PRIMARY KEY(\"a\");"]
    );
}

#[test]
fn test_unique_and_check_constraints() {
    let from = SnapshotBuilder::new()
        .table("users", vec![col("email", "text"), col("age", "int4")])
        .build();
    let to = SnapshotBuilder::new()
        .table("users", vec![col("email", "text"), col("age", "int4")])
        .unique("users", "users_email_key", &["email"])
        .check("users", "users_age_check", "age >= 0")
        .build();

    assert_eq!(
        sql(&from, &to, &[]),
        vec![
            "ALTER TABLE \"users\" ADD CONSTRAINT \"users_email_key\" UNIQUE(\"email\");",
            "ALTER TABLE \"users\" ADD CONSTRAINT \"users_age_check\" CHECK (age >= 0);",
        ]
    );

    assert_eq!(
        sql(&to, &from, &[]),
        vec![
            "ALTER TABLE \"users\" DROP CONSTRAINT \"users_email_key\";",
            "ALTER TABLE \"users\" DROP CONSTRAINT \"users_age_check\";",
        ]
    );
}

#[test]
fn test_declared_unique_rename() {
    let build = |name: &str| {
        SnapshotBuilder::new()
            .table("users", vec![col("email", "text")])
            .unique("users", name, &["email"])
            .build()
    };

    assert_eq!(
        sql(
            &build("users_email_key"),
            &build("users_email_uniq"),
            &["public.users.users_email_key->public.users.users_email_uniq"],
        ),
        vec!["ALTER TABLE \"users\" RENAME CONSTRAINT \"users_email_key\" TO \"users_email_uniq\";"]
    );
}

fn long_named_snapshot() -> Ddl {
    let parent = "organization_membership_invitations_archive";
    let child = "organization_membership_invitation_audit_entries";
    SnapshotBuilder::new()
        .table(parent, vec![col("id", "int4").primary_key()])
        .table(
            child,
            vec![
                col("id", "int4").primary_key(),
                col("invitation_archive_id", "int4"),
            ],
        )
        .foreign_key(child, &["invitation_archive_id"], parent, &["id"])
        .build()
}

#[test]
fn test_long_foreign_key_names_are_hashed_deterministically() {
    let first = sql(&Ddl::new(), &long_named_snapshot(), &[]);
    let second = sql(&Ddl::new(), &long_named_snapshot(), &[]);
    assert_eq!(first, second);

    let fk = first
        .iter()
        .find(|s| s.contains("FOREIGN KEY"))
        .expect("a foreign key statement");
    let name = fk
        .split('"')
        .nth(3)
        .expect("constraint name");
    assert!(name.len() <= MAX_IDENTIFIER_LENGTH, "{} is too long", name);
    // The child table name leaves no room for a prefix.
    assert_eq!(name, "LWyrioQb2La9_fkey");
}

#[test]
fn test_unnamed_foreign_key_matches_existing_derived_name() {
    let unnamed = long_named_snapshot();
    let mut named = unnamed.clone();
    named.foreign_keys[0].name = unnamed.normalized().foreign_keys[0].name.clone();
    assert!(!named.foreign_keys[0].name.is_empty());

    assert!(sql(&named, &unnamed, &[]).is_empty());
    assert!(sql(&unnamed, &named, &[]).is_empty());
}
