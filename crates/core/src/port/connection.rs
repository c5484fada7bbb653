// Connection Port (Interface)
//
// The query-builder/driver collaborator. Adapters render the query model to
// their SQL dialect, execute it, and hand rows back as flat records keyed by
// column name.

use crate::domain::{DeleteQuery, Fields, InsertQuery, Query, Record, UpdateQuery};
use crate::error::Result;
use async_trait::async_trait;

/// Capabilities a connection declares about its backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    name: &'static str,
    supports_returning: bool,
}

impl Dialect {
    pub const fn new(name: &'static str, supports_returning: bool) -> Self {
        Self {
            name,
            supports_returning,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether `INSERT ... RETURNING` hands back the inserted rows
    pub fn supports_returning(&self) -> bool {
        self.supports_returning
    }
}

/// Database handle used by repositories
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Connection: Send + Sync {
    /// Backend identity, fixed for the lifetime of the connection
    fn dialect(&self) -> Dialect;

    /// Run a SELECT and map every row to a record
    async fn select(&self, query: &Query) -> Result<Vec<Record>>;

    /// Run a SELECT and return the first row, if any
    async fn first(&self, query: &Query) -> Result<Option<Record>>;

    /// Insert rows and return their generated ids, in row order
    async fn insert(&self, query: &InsertQuery) -> Result<Vec<i64>>;

    /// Insert rows and return them as stored, projected to `returning`
    async fn insert_returning(&self, query: &InsertQuery, returning: &Fields)
        -> Result<Vec<Record>>;

    /// Apply changes and return the number of rows modified
    async fn update(&self, query: &UpdateQuery) -> Result<u64>;

    /// Delete rows and return the number removed
    async fn delete(&self, query: &DeleteQuery) -> Result<u64>;
}
