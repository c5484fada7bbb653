// Insert strategies
//
// Some backends hand back generated ids from an INSERT and need a second
// SELECT to obtain full rows; others return the rows straight from the
// INSERT. The strategy is picked once, when the repository is built.

use crate::domain::{Direction, Fields, InsertQuery, Query, Record};
use crate::error::Result;
use crate::port::{Connection, Dialect};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// How inserted rows are obtained after an INSERT.
///
/// `rows` and `fields` arrive storage-cased; the returned records are keyed
/// by column name.
#[async_trait]
pub trait InsertStrategy: Send + Sync {
    async fn insert(
        &self,
        connection: &dyn Connection,
        table: &str,
        id_column: &str,
        rows: Vec<Record>,
        fields: &Fields,
    ) -> Result<Vec<Record>>;
}

/// INSERT, then `SELECT fields WHERE id IN (generated ids)`
pub struct InsertThenFetchById;

#[async_trait]
impl InsertStrategy for InsertThenFetchById {
    async fn insert(
        &self,
        connection: &dyn Connection,
        table: &str,
        id_column: &str,
        rows: Vec<Record>,
        fields: &Fields,
    ) -> Result<Vec<Record>> {
        let query = InsertQuery {
            table: table.to_string(),
            rows,
        };
        let ids = connection.insert(&query).await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let fetch = Query::table(table)
            .where_in(id_column, ids.into_iter().map(Value::from).collect())
            .select(fields.clone())
            .order_by(id_column, Direction::Asc);

        connection.select(&fetch).await
    }
}

/// `INSERT ... RETURNING fields`
pub struct InsertReturning;

#[async_trait]
impl InsertStrategy for InsertReturning {
    async fn insert(
        &self,
        connection: &dyn Connection,
        table: &str,
        _id_column: &str,
        rows: Vec<Record>,
        fields: &Fields,
    ) -> Result<Vec<Record>> {
        let query = InsertQuery {
            table: table.to_string(),
            rows,
        };
        connection.insert_returning(&query, fields).await
    }
}

/// Pick the strategy matching what the backend declares
pub fn strategy_for(dialect: &Dialect) -> Arc<dyn InsertStrategy> {
    if dialect.supports_returning() {
        Arc::new(InsertReturning)
    } else {
        Arc::new(InsertThenFetchById)
    }
}
