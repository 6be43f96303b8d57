use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("User already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid user data: {0}")]
    InvalidData(String),

    /// Connection-level failure worth retrying (IO, pool timeout, locked database)
    #[error("Operational error: {0}")]
    Operational(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("All {attempts} attempts failed for {operation}: {last}")]
    RetriesExhausted {
        operation: String,
        attempts: usize,
        last: String,
    },

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error(transparent)]
    Core(#[from] prodev_core::CoreError),
}

/// SQLite busy/locked result codes and the SQLSTATE MySQL reports for deadlocks.
const TRANSIENT_DB_CODES: &[&str] = &["5", "6", "262", "517", "40001"];

impl UserError {
    /// Classify a driver error.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => UserError::Operational(err.to_string()),
            sqlx::Error::RowNotFound => UserError::NotFound(err.to_string()),
            sqlx::Error::Database(ref db_err) => {
                let transient = db_err
                    .code()
                    .is_some_and(|code| TRANSIENT_DB_CODES.contains(&&*code));
                if transient {
                    UserError::Operational(err.to_string())
                } else {
                    UserError::DatabaseError(err.to_string())
                }
            }
            _ => UserError::DatabaseError(err.to_string()),
        }
    }

    /// Whether retrying the same operation may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, UserError::Operational(_))
    }
}

pub type UserResult<T> = Result<T, UserError>;
