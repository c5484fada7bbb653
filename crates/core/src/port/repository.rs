// Repository Port (Interface)

use crate::domain::{Criteria, Fields, PaginationParams};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// CRUD-plus-pagination over one table.
///
/// `data` arguments are JSON objects keyed by application (camelCase) field
/// names; `create_all` also accepts an array of them. Results come back with
/// camelCase keys, deserialized into `T`.
#[async_trait]
pub trait CrudRepository<T>: Send + Sync {
    /// Insert records in bulk and return them as stored
    ///
    /// # Errors
    /// Propagates constraint violations from the data store
    async fn create_all(&self, data: Value, fields: Fields) -> Result<Vec<T>>;

    /// Insert a single record and return it as stored
    async fn create(&self, data: Value, fields: Fields) -> Result<T>;

    /// First record matching `criteria`, or `None`
    async fn find_by(&self, criteria: Criteria, fields: Fields) -> Result<Option<T>>;

    /// Whether any record matches `criteria`
    async fn exists(&self, criteria: Criteria) -> Result<bool>;

    /// One page of records matching the params' criteria
    async fn list(&self, params: PaginationParams) -> Result<Vec<T>>;

    /// Update at most one matching record; `true` if one was changed
    async fn update(&self, criteria: Criteria, data: Value) -> Result<bool>;

    /// Update every matching record and return how many changed
    async fn update_all(&self, criteria: Criteria, data: Value) -> Result<u64>;

    /// Delete at most one matching record; `true` if one was removed
    async fn destroy(&self, criteria: Criteria) -> Result<bool>;

    /// Delete every matching record and return how many were removed
    async fn destroy_all(&self, criteria: Criteria) -> Result<u64>;
}
