// Generic table repository
//
// Criteria, data, projections and orderings are snake_cased on the way in;
// rows are camelCased on the way out and deserialized into `T`.

use crate::application::insert_strategy::{strategy_for, InsertStrategy};
use crate::case::{camel_keys, snake_case, snake_keys};
use crate::domain::{
    Condition, Criteria, DeleteQuery, Fields, PaginationParams, Query, Record, UpdateQuery,
};
use crate::error::{AppError, Result};
use crate::port::{Connection, CrudRepository};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Column holding generated ids, used when inserted rows are fetched back
pub const DEFAULT_ID_COLUMN: &str = "id";

/// CRUD access to one table through a [`Connection`].
///
/// Holds no per-call state: every operation builds its own query, so one
/// instance can be cloned and shared freely.
pub struct Repository<T = Record> {
    connection: Arc<dyn Connection>,
    table: String,
    id_column: String,
    inserter: Arc<dyn InsertStrategy>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            table: self.table.clone(),
            id_column: self.id_column.clone(),
            inserter: Arc::clone(&self.inserter),
            _marker: PhantomData,
        }
    }
}

impl<T> Repository<T> {
    /// Bind a repository to `table`. The insert strategy is chosen here from
    /// the connection's dialect and never re-checked.
    pub fn new(connection: Arc<dyn Connection>, table: impl Into<String>) -> Self {
        let inserter = strategy_for(&connection.dialect());
        Self {
            connection,
            table: table.into(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            inserter,
            _marker: PhantomData,
        }
    }

    /// Use a different generated-id column (application casing)
    pub fn with_id_column(mut self, column: impl AsRef<str>) -> Self {
        self.id_column = snake_case(column.as_ref());
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn connection(&self) -> &Arc<dyn Connection> {
        &self.connection
    }

    /// A fresh query over the table, filtered by `criteria`: equality for
    /// scalar conditions, membership for lists.
    pub fn scoped(&self, criteria: &Criteria) -> Query {
        criteria
            .iter()
            .fold(Query::table(&self.table), |query, (field, condition)| {
                let column = snake_case(field);
                match condition {
                    Condition::Equals(value) => query.where_eq(column, value.clone()),
                    Condition::In(values) => query.where_in(column, values.clone()),
                }
            })
    }

    fn changes(&self, data: Value) -> Result<Record> {
        let changes = snake_keys(record_from(data)?);
        if changes.is_empty() {
            return Err(AppError::Validation(format!(
                "no changes to apply to {}",
                self.table
            )));
        }
        Ok(changes)
    }
}

impl<T: DeserializeOwned> Repository<T> {
    fn into_entity(record: Record) -> Result<T> {
        Ok(serde_json::from_value(Value::Object(camel_keys(record)))?)
    }

    fn into_entities(records: Vec<Record>) -> Result<Vec<T>> {
        records.into_iter().map(Self::into_entity).collect()
    }
}

#[async_trait]
impl<T> CrudRepository<T> for Repository<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn create_all(&self, data: Value, fields: Fields) -> Result<Vec<T>> {
        let rows: Vec<Record> = rows_from(data)?.into_iter().map(snake_keys).collect();
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let count = rows.len();
        let records = self
            .inserter
            .insert(
                self.connection.as_ref(),
                &self.table,
                &self.id_column,
                rows,
                &fields.to_snake(),
            )
            .await?;

        debug!(table = %self.table, rows = count, returned = records.len(), "create_all");
        Self::into_entities(records)
    }

    async fn create(&self, data: Value, fields: Fields) -> Result<T> {
        let record = Value::Object(record_from(data)?);
        self.create_all(record, fields)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                AppError::Internal(format!("insert into {} returned no rows", self.table))
            })
    }

    async fn find_by(&self, criteria: Criteria, fields: Fields) -> Result<Option<T>> {
        let query = self.scoped(&criteria).select(fields.to_snake());
        let record = self.connection.first(&query).await?;

        debug!(table = %self.table, found = record.is_some(), "find_by");
        record.map(Self::into_entity).transpose()
    }

    async fn exists(&self, criteria: Criteria) -> Result<bool> {
        let query = self.scoped(&criteria).limit(1);
        Ok(self.connection.first(&query).await?.is_some())
    }

    async fn list(&self, params: PaginationParams) -> Result<Vec<T>> {
        let page = params.resolve();

        let query = page.order_by.iter().fold(
            self.scoped(&page.criteria)
                .select(page.fields.to_snake())
                .offset(page.offset())
                .limit(page.page_size),
            |query, ordering| query.order_by(snake_case(&ordering.field), ordering.direction()),
        );

        let records = self.connection.select(&query).await?;

        debug!(
            table = %self.table,
            page = page.page,
            page_size = page.page_size,
            returned = records.len(),
            "list"
        );
        Self::into_entities(records)
    }

    async fn update(&self, criteria: Criteria, data: Value) -> Result<bool> {
        let query = UpdateQuery {
            scope: self.scoped(&criteria).limit(1),
            changes: self.changes(data)?,
        };
        let updated = self.connection.update(&query).await?;

        debug!(table = %self.table, updated, "update");
        single_row(&self.table, updated)
    }

    async fn update_all(&self, criteria: Criteria, data: Value) -> Result<u64> {
        let query = UpdateQuery {
            scope: self.scoped(&criteria),
            changes: self.changes(data)?,
        };
        let updated = self.connection.update(&query).await?;

        debug!(table = %self.table, updated, "update_all");
        Ok(updated)
    }

    async fn destroy(&self, criteria: Criteria) -> Result<bool> {
        let query = DeleteQuery {
            scope: self.scoped(&criteria).limit(1),
        };
        let deleted = self.connection.delete(&query).await?;

        debug!(table = %self.table, deleted, "destroy");
        single_row(&self.table, deleted)
    }

    async fn destroy_all(&self, criteria: Criteria) -> Result<u64> {
        let query = DeleteQuery {
            scope: self.scoped(&criteria),
        };
        let deleted = self.connection.delete(&query).await?;

        debug!(table = %self.table, deleted, "destroy_all");
        Ok(deleted)
    }
}

/// A bounded mutation reports 0 or 1; anything else means the adapter
/// ignored the bound.
fn single_row(table: &str, affected: u64) -> Result<bool> {
    match affected {
        0 => Ok(false),
        1 => Ok(true),
        n => Err(AppError::Internal(format!(
            "single-row mutation on {} affected {} rows",
            table, n
        ))),
    }
}

/// A single data object; `null` is an empty one
pub(crate) fn record_from(data: Value) -> Result<Record> {
    match data {
        Value::Null => Ok(Record::new()),
        Value::Object(record) => Ok(record),
        other => Err(AppError::Validation(format!(
            "expected an object, got {}",
            json_kind(&other)
        ))),
    }
}

fn rows_from(data: Value) -> Result<Vec<Record>> {
    match data {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                other => Err(AppError::Validation(format!(
                    "expected an array of objects, found {}",
                    json_kind(&other)
                ))),
            })
            .collect(),
        Value::Object(record) => Ok(vec![record]),
        other => Err(AppError::Validation(format!(
            "expected an object or an array of objects, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
