// Application Layer - Repositories over a Connection

pub mod auditable;
pub mod insert_strategy;
pub mod repository;

// Re-exports
pub use auditable::{AuditPolicy, AuditableRepository, AUDIT_TIMESTAMP_FORMAT, DEFAULT_AUDIT_COLUMN};
pub use insert_strategy::{strategy_for, InsertReturning, InsertStrategy, InsertThenFetchById};
pub use repository::{Repository, DEFAULT_ID_COLUMN};
