use database::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    /// The id does not resolve to a row; the caller's input was wrong
    #[error("Project with project ID={0} does not exist.")]
    NotFound(i32),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// The system failed; see the storage error kind
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProjectError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProjectError::NotFound(_))
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, ProjectError::Storage(e) if e.is_constraint_violation())
    }

    pub fn is_connection_failed(&self) -> bool {
        matches!(self, ProjectError::Storage(e) if e.is_connection_failed())
    }
}

pub type ProjectResult<T> = Result<T, ProjectError>;
