// repokit Infrastructure - SQLite Adapter
// Implements: Connection (query model -> SQL via sqlx::QueryBuilder)

mod connection;
mod database;
mod error;
mod row;
mod settings;
mod sql;

pub use connection::create_pool;
pub use database::{SqliteDatabase, DIALECT_NAME};
pub use error::map_sqlx_error;
pub use settings::{DatabaseSettings, ENV_PREFIX};

// Note: sqlx::Error conversion goes through map_sqlx_error
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
