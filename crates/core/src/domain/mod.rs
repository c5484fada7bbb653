// Domain Layer - Criteria, pagination and the query model

pub mod criteria;
pub mod pagination;
pub mod query;

// Re-exports
pub use criteria::{Condition, Criteria};
pub use pagination::{Direction, Ordering, PaginationParams, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
pub use query::{DeleteQuery, Fields, Filter, InsertQuery, Query, UpdateQuery};

/// One flat row: column (or field) name to value
pub type Record = serde_json::Map<String, serde_json::Value>;
