//! Shared fixtures: an in-memory database with the tables the scenarios use.

#![allow(dead_code)]

use std::sync::Arc;

use repokit_core::port::Connection;
use repokit_sqlite::{DatabaseSettings, SqliteDatabase};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG=repokit_core=debug cargo test` shows the repository logs
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NULL
    )
    "#,
    r#"
    CREATE TABLE organizations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        display_name TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        modified_at TIMESTAMP NULL
    )
    "#,
];

/// Fresh database; `supports_returning` picks the insert strategy
pub async fn database(supports_returning: bool) -> SqliteDatabase {
    init_tracing();

    let settings = DatabaseSettings {
        supports_returning,
        ..Default::default()
    };
    let db = SqliteDatabase::connect(&settings).await.unwrap();

    for statement in SCHEMA {
        sqlx::query(statement).execute(db.pool()).await.unwrap();
    }

    db
}

pub async fn connection(supports_returning: bool) -> Arc<dyn Connection> {
    Arc::new(database(supports_returning).await)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

pub fn user(n: usize, role: &str) -> serde_json::Value {
    serde_json::json!({
        "email": format!("user{:02}@example.com", n),
        "password": "secret",
        "role": role,
    })
}
