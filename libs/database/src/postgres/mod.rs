//! PostgreSQL connection provider and error classification

mod config;
mod connector;

pub use config::PostgresConfig;
pub use connector::{classify_db_err, ConnectionProvider, PgConnectionProvider};

// Re-export SeaORM types for convenience
pub use sea_orm::{DatabaseConnection, DbErr};
