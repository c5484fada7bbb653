// SQLite Connection Implementation

use crate::connection::create_pool;
use crate::error::map_sqlx_error;
use crate::row::into_record;
use crate::settings::DatabaseSettings;
use crate::sql;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use repokit_core::domain::{DeleteQuery, Fields, InsertQuery, Query, Record, UpdateQuery};
use repokit_core::error::Result;
use repokit_core::port::{Connection, Dialect};
use sqlx::SqlitePool;
use tracing::debug;

/// Dialect name reported to repositories
pub const DIALECT_NAME: &str = "sqlite3";

/// [`Connection`] over a sqlx SQLite pool
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
    dialect: Dialect,
}

impl SqliteDatabase {
    /// Wrap an existing pool. `supports_returning` must reflect the linked
    /// SQLite (3.35+ understands `RETURNING`); it is not probed.
    pub fn new(pool: SqlitePool, supports_returning: bool) -> Self {
        Self {
            pool,
            dialect: Dialect::new(DIALECT_NAME, supports_returning),
        }
    }

    /// Open a pool from settings
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let pool = create_pool(settings).await?;
        Ok(Self::new(pool, settings.supports_returning))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Connection for SqliteDatabase {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn select(&self, query: &Query) -> Result<Vec<Record>> {
        let mut qb = sql::select(query)?;
        debug!(sql = qb.sql(), "select");

        qb.build()
            .fetch(&self.pool)
            .map(|row| row.and_then(|row| into_record(&row)))
            .try_collect::<Vec<_>>()
            .await
            .map_err(map_sqlx_error)
    }

    async fn first(&self, query: &Query) -> Result<Option<Record>> {
        let mut qb = sql::select(&query.clone().limit(1))?;
        debug!(sql = qb.sql(), "first");

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(into_record)
            .transpose()
            .map_err(map_sqlx_error)
    }

    async fn insert(&self, query: &InsertQuery) -> Result<Vec<i64>> {
        // One transaction for the batch: all rows land or none do
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let mut ids = Vec::with_capacity(query.rows.len());

        for row in &query.rows {
            let mut qb = sql::insert(&query.table, row, None)?;
            debug!(sql = qb.sql(), "insert");

            let result = qb
                .build()
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
            ids.push(result.last_insert_rowid());
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(ids)
    }

    async fn insert_returning(
        &self,
        query: &InsertQuery,
        returning: &Fields,
    ) -> Result<Vec<Record>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        let mut records = Vec::with_capacity(query.rows.len());

        for row in &query.rows {
            let mut qb = sql::insert(&query.table, row, Some(returning))?;
            debug!(sql = qb.sql(), "insert returning");

            let inserted = qb
                .build()
                .fetch_one(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
            records.push(into_record(&inserted).map_err(map_sqlx_error)?);
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(records)
    }

    async fn update(&self, query: &UpdateQuery) -> Result<u64> {
        let mut qb = sql::update(query)?;
        debug!(sql = qb.sql(), "update");

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, query: &DeleteQuery) -> Result<u64> {
        let mut qb = sql::delete(query)?;
        debug!(sql = qb.sql(), "delete");

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }
}
