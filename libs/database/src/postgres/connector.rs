use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection, DbErr, RuntimeErr, SqlErr};
use tracing::{debug, error, warn};

use super::PostgresConfig;
use crate::common::{StatementKind, StorageError, StorageResult};

/// Yields a live connection for one unit of work, or a typed failure
///
/// Implementations hold no pool and no state across calls: every `acquire`
/// opens a new physical connection, and the caller hands it back through
/// `release` on every exit path.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Open a new connection bound to the configured schema
    async fn acquire(&self) -> StorageResult<DatabaseConnection>;

    /// Close a connection obtained from `acquire`
    async fn release(&self, db: DatabaseConnection);

    /// Credential-free description of the target, for logs and errors
    fn endpoint(&self) -> String;
}

/// Connection provider opening one PostgreSQL connection per request
#[derive(Debug, Clone)]
pub struct PgConnectionProvider {
    config: PostgresConfig,
}

impl PgConnectionProvider {
    pub fn new(config: PostgresConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConnectionProvider for PgConnectionProvider {
    async fn acquire(&self) -> StorageResult<DatabaseConnection> {
        let endpoint = self.config.endpoint();
        let options = self.config.clone().into_connect_options();

        match Database::connect(options).await {
            Ok(db) => {
                debug!(%endpoint, "Obtained database connection");
                Ok(db)
            }
            Err(e) => {
                error!(%endpoint, error = %e, "Unable to get database connection");
                Err(StorageError::ConnectionFailed {
                    endpoint,
                    message: e.to_string(),
                })
            }
        }
    }

    async fn release(&self, db: DatabaseConnection) {
        if let Err(e) = db.close().await {
            warn!(endpoint = %self.config.endpoint(), error = %e, "Failed to close database connection");
        }
    }

    fn endpoint(&self) -> String {
        self.config.endpoint()
    }
}

/// SQLSTATE class 23: integrity constraint violation (not null, foreign key,
/// unique, check, exclusion)
fn is_integrity_violation(sqlstate: &str) -> bool {
    sqlstate.starts_with("23")
}

/// SQLSTATE reported by the server, if the error came from a statement
fn sqlstate(err: &DbErr) -> Option<String> {
    let runtime = match err {
        DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return None,
    };

    match runtime {
        RuntimeErr::SqlxError(e) => e
            .as_database_error()
            .and_then(|db_err| db_err.code())
            .map(|code| code.into_owned()),
        _ => None,
    }
}

/// Translate a driver error into the storage taxonomy
///
/// Constraint violations are recognised first; connection-level failures
/// (including acquire timeouts) map to `ConnectionFailed`; anything else is a
/// generic failure of the given statement kind. The driver text is preserved.
pub fn classify_db_err(err: DbErr, kind: StatementKind, endpoint: &str) -> StorageError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(msg))
        | Some(SqlErr::UniqueConstraintViolation(msg)) => {
            return StorageError::ConstraintViolation(msg);
        }
        _ => {}
    }

    if sqlstate(&err).is_some_and(|code| is_integrity_violation(&code)) {
        return StorageError::ConstraintViolation(err.to_string());
    }

    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StorageError::ConnectionFailed {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        },
        other => StorageError::statement_failed(kind, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> PostgresConfig {
        // Port 1 is never a Postgres listener; connect is refused immediately
        PostgresConfig::new("127.0.0.1", 1, "projects", "projects", "top-secret")
            .with_connect_timeout(2)
    }

    #[tokio::test]
    async fn test_acquire_unreachable_host_fails_with_endpoint() {
        let provider = PgConnectionProvider::new(unreachable_config());

        let err = provider.acquire().await.unwrap_err();

        match err {
            StorageError::ConnectionFailed { endpoint, message } => {
                assert_eq!(endpoint, "127.0.0.1:1/projects");
                assert!(!message.contains("top-secret"));
            }
            other => panic!("Expected ConnectionFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_provider_endpoint_hides_password() {
        let provider = PgConnectionProvider::new(unreachable_config());
        assert!(!provider.endpoint().contains("top-secret"));
    }

    #[test]
    fn test_classify_exec_error_by_kind() {
        let err = DbErr::Exec(RuntimeErr::Internal("syntax error".to_string()));
        assert!(matches!(
            classify_db_err(err, StatementKind::Write, "h:1/s"),
            StorageError::WriteFailed(msg) if msg.contains("syntax error")
        ));

        let err = DbErr::Query(RuntimeErr::Internal("bad column".to_string()));
        assert!(matches!(
            classify_db_err(err, StatementKind::Read, "h:1/s"),
            StorageError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_integrity_violation_covers_whole_class_23() {
        // not null, foreign key, unique, check, exclusion
        for code in ["23502", "23503", "23505", "23514", "23P01"] {
            assert!(is_integrity_violation(code), "{code} is a constraint violation");
        }
        // string too long, undefined table, serialization failure
        for code in ["22001", "42P01", "40001"] {
            assert!(!is_integrity_violation(code), "{code} is not a constraint violation");
        }
    }

    #[test]
    fn test_internal_error_has_no_sqlstate() {
        let err = DbErr::Exec(RuntimeErr::Internal("violates check constraint".to_string()));
        assert_eq!(sqlstate(&err), None);
        assert!(matches!(
            classify_db_err(err, StatementKind::Write, "h:1/s"),
            StorageError::WriteFailed(_)
        ));
    }

    #[test]
    fn test_classify_connection_error() {
        let err = DbErr::Conn(RuntimeErr::Internal("connection reset".to_string()));
        match classify_db_err(err, StatementKind::Write, "h:1/s") {
            StorageError::ConnectionFailed { endpoint, message } => {
                assert_eq!(endpoint, "h:1/s");
                assert!(message.contains("connection reset"));
            }
            other => panic!("Expected ConnectionFailed, got {:?}", other),
        }
    }
}
