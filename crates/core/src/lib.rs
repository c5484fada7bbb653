// repokit Core - Repositories, Query Model & Ports
// NO database driver dependencies: adapters implement `port::Connection`

pub mod application;
pub mod case;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{AuditPolicy, AuditableRepository, Repository};
pub use domain::{Condition, Criteria, Direction, Fields, Ordering, PaginationParams, Record};
pub use error::{AppError, ConstraintKind, Result};
pub use port::{Connection, CrudRepository, Dialect, TimeProvider};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
