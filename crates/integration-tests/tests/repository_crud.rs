//! Create, find, update and destroy against a real SQLite table.

mod common;

use common::{connection, user, User};
use repokit_core::{AppError, Criteria, CrudRepository, Fields, Record, Repository};
use serde_json::json;

#[tokio::test]
async fn test_create_then_find() {
    let users: Repository<User> = Repository::new(connection(false).await, "users");

    let created = users.create(user(1, "admin"), Fields::All).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.email, "user01@example.com");
    assert!(created.created_at.is_some());
    assert!(created.updated_at.is_none());

    let found = users
        .find_by(Criteria::new().eq("email", "user01@example.com"), Fields::All)
        .await
        .unwrap();
    assert_eq!(found, Some(created));
}

#[tokio::test]
async fn test_find_by_projection_returns_only_requested_fields() {
    let users: Repository = Repository::new(connection(false).await, "users");
    users.create(user(1, "admin"), Fields::All).await.unwrap();

    let found = users
        .find_by(Criteria::new().eq("email", "user01@example.com"), Fields::from(["id"]))
        .await
        .unwrap()
        .unwrap();

    let expected: Record = [("id".to_string(), json!(1))].into_iter().collect();
    assert_eq!(found, expected);
}

#[tokio::test]
async fn test_find_by_miss_is_none() {
    let users: Repository<User> = Repository::new(connection(false).await, "users");

    let found = users
        .find_by(Criteria::new().eq("email", "nobody@example.com"), Fields::All)
        .await
        .unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn test_result_keys_are_camel_case() {
    let users: Repository = Repository::new(connection(false).await, "users");

    let created = users.create(user(1, "admin"), Fields::All).await.unwrap();
    assert!(created.contains_key("createdAt"));
    assert!(created.contains_key("updatedAt"));
    assert!(!created.contains_key("created_at"));
}

#[tokio::test]
async fn test_exists() {
    let users: Repository = Repository::new(connection(false).await, "users");
    users.create(user(1, "admin"), Fields::All).await.unwrap();

    assert!(users.exists(Criteria::new().eq("role", "admin")).await.unwrap());
    assert!(!users.exists(Criteria::new().eq("role", "guest")).await.unwrap());
}

#[tokio::test]
async fn test_null_criteria_value_matches_null_column() {
    let users: Repository = Repository::new(connection(false).await, "users");
    users.create(user(1, "admin"), Fields::All).await.unwrap();

    let criteria = Criteria::new().eq("updatedAt", json!(null));
    assert!(users.exists(criteria).await.unwrap());
}

#[tokio::test]
async fn test_in_criteria() {
    let users: Repository<User> = Repository::new(connection(false).await, "users");
    users
        .create_all(
            json!([user(1, "admin"), user(2, "editor"), user(3, "guest")]),
            Fields::All,
        )
        .await
        .unwrap();

    let removed = users
        .destroy_all(Criteria::new().any_of("role", ["admin", "guest"]))
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let left = users.find_by(Criteria::new(), Fields::All).await.unwrap().unwrap();
    assert_eq!(left.role, "editor");
}

#[tokio::test]
async fn test_singular_update_touches_exactly_one_row() {
    let users: Repository<User> = Repository::new(connection(false).await, "users");
    users
        .create_all(json!([user(1, "admin"), user(2, "admin")]), Fields::All)
        .await
        .unwrap();

    let updated = users
        .update(Criteria::new().eq("role", "admin"), json!({ "role": "owner" }))
        .await
        .unwrap();
    assert!(updated);

    let owners = users
        .update_all(Criteria::new().eq("role", "owner"), json!({ "role": "owner" }))
        .await
        .unwrap();
    assert_eq!(owners, 1);
}

#[tokio::test]
async fn test_bulk_update_counts() {
    let users: Repository<User> = Repository::new(connection(false).await, "users");
    users
        .create_all(
            json!([user(1, "admin"), user(2, "admin"), user(3, "guest")]),
            Fields::All,
        )
        .await
        .unwrap();

    let changed = users
        .update_all(Criteria::new().eq("role", "admin"), json!({ "password": "rotated" }))
        .await
        .unwrap();
    assert_eq!(changed, 2);

    let none = users
        .update_all(Criteria::new().eq("role", "nobody"), json!({ "password": "rotated" }))
        .await
        .unwrap();
    assert_eq!(none, 0);
}

#[tokio::test]
async fn test_singular_forms_report_false_on_no_match() {
    let users: Repository<User> = Repository::new(connection(false).await, "users");

    let updated = users
        .update(Criteria::new().eq("id", 42), json!({ "role": "owner" }))
        .await
        .unwrap();
    assert!(!updated);

    let destroyed = users.destroy(Criteria::new().eq("id", 42)).await.unwrap();
    assert!(!destroyed);
}

#[tokio::test]
async fn test_destroy_removes_one_of_many() {
    let users: Repository<User> = Repository::new(connection(false).await, "users");
    users
        .create_all(json!([user(1, "guest"), user(2, "guest")]), Fields::All)
        .await
        .unwrap();

    assert!(users.destroy(Criteria::new().eq("role", "guest")).await.unwrap());
    assert_eq!(users.destroy_all(Criteria::new().eq("role", "guest")).await.unwrap(), 1);
}

#[tokio::test]
async fn test_camel_case_input_lands_in_snake_case_columns() {
    let users: Repository<User> = Repository::new(connection(false).await, "users");
    users.create(user(1, "admin"), Fields::All).await.unwrap();

    users
        .update_all(
            Criteria::new().eq("email", "user01@example.com"),
            json!({ "updatedAt": "2026-01-01 00:00:00" }),
        )
        .await
        .unwrap();

    let found = users
        .find_by(Criteria::new().eq("updatedAt", "2026-01-01 00:00:00"), Fields::All)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.updated_at.as_deref(), Some("2026-01-01 00:00:00"));
}

#[tokio::test]
async fn test_unique_violation_is_a_constraint_error() {
    let users: Repository<User> = Repository::new(connection(false).await, "users");
    users.create(user(1, "admin"), Fields::All).await.unwrap();

    let err = users.create(user(1, "admin"), Fields::All).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Constraint {
            kind: repokit_core::ConstraintKind::Unique,
            ..
        }
    ));
}

#[tokio::test]
async fn test_empty_changes_are_rejected() {
    let users: Repository<User> = Repository::new(connection(false).await, "users");

    let err = users
        .update_all(Criteria::new(), json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
