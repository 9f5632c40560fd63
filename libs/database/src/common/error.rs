/// Uniform storage error type for repository operations
///
/// Every driver failure is translated into exactly one of these kinds. The
/// original driver diagnostic is kept as text so it can be logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No usable connection (bad credentials, unreachable host, missing schema, timeout).
    /// `endpoint` is `host:port/schema` and never carries the credential.
    #[error("Unable to get connection at {endpoint}: {message}")]
    ConnectionFailed { endpoint: String, message: String },

    /// A read statement failed for a reason other than connectivity
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// An insert/update/delete statement or its commit failed
    #[error("Write failed: {0}")]
    WriteFailed(String),

    /// A write violated a database-enforced constraint (foreign key, unique, ...)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl StorageError {
    pub fn is_connection_failed(&self) -> bool {
        matches!(self, StorageError::ConnectionFailed { .. })
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StorageError::ConstraintViolation(_))
    }

    /// Generic failure of a statement of the given kind
    pub fn statement_failed(kind: StatementKind, message: impl Into<String>) -> Self {
        match kind {
            StatementKind::Read => StorageError::QueryFailed(message.into()),
            StatementKind::Write => StorageError::WriteFailed(message.into()),
        }
    }
}

/// Whether a unit of work only reads or also writes; decides the generic error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Read,
    Write,
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_failed_display_names_endpoint() {
        let err = StorageError::ConnectionFailed {
            endpoint: "db.internal:5432/projects".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unable to get connection at db.internal:5432/projects: connection refused"
        );
        assert!(err.is_connection_failed());
    }

    #[test]
    fn test_statement_failed_by_kind() {
        assert_eq!(
            StorageError::statement_failed(StatementKind::Read, "boom"),
            StorageError::QueryFailed("boom".to_string())
        );
        assert_eq!(
            StorageError::statement_failed(StatementKind::Write, "boom"),
            StorageError::WriteFailed("boom".to_string())
        );
    }
}
