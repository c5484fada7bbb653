// Port Layer - Interfaces for external dependencies

pub mod connection;
pub mod repository;
pub mod time_provider;

// Re-exports
pub use connection::{Connection, Dialect};
pub use repository::CrudRepository;
pub use time_provider::{SystemTimeProvider, TimeProvider};

#[cfg(test)]
pub use connection::MockConnection;
