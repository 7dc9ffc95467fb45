use thiserror::Error;

/// Failures at the hosted-backend boundary
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode backend response: {0}")]
    Decode(String),

    #[error("backend is not configured: {0}")]
    Config(String),

    #[error("no row with id {id} in {table}")]
    NotFound { table: String, id: String },
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Decode(err.to_string())
    }
}
