use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RepositoryError {
    #[error("Team not found: {team}")]
    NotFound { team: String },

    #[error("IO error: {0}")]
    Io(String),

    #[error("Malformed formation data: {0}")]
    Json(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl RepositoryError {
    /// Whether retrying the same request later can succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            RepositoryError::Io(_) => true,
            RepositoryError::Backend(_) => true,
            RepositoryError::NotFound { .. } => false,
            RepositoryError::Json(_) => false,
        }
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            RepositoryError::Io(err.to_string())
        } else {
            RepositoryError::Json(err.to_string())
        }
    }
}
