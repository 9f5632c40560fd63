//! Database library providing the storage error taxonomy and the PostgreSQL
//! connection provider used by the domain repositories.
//!
//! # Features
//!
//! - `postgres` (default) - PostgreSQL support with SeaORM
//! - `config` - Configuration support with `core_config::FromEnv`
//! - `all` - All features
//!
//! # Example
//!
//! ```ignore
//! use database::postgres::{ConnectionProvider, PgConnectionProvider, PostgresConfig};
//!
//! let provider = PgConnectionProvider::new(PostgresConfig::new("localhost", 5432, "projects", "projects", "projects"));
//! let db = provider.acquire().await?;
//! // ... one unit of work ...
//! provider.release(db).await;
//! ```

// Always available modules
pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

// Re-exports for convenience
pub use common::{StatementKind, StorageError, StorageResult};
