use thiserror::Error;

pub type Result<T> = std::result::Result<T, TypefullyError>;

#[derive(Debug, Error)]
pub enum TypefullyError {
    #[error("Missing API key")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for TypefullyError {
    fn from(err: reqwest::Error) -> Self {
        TypefullyError::Network(err.to_string())
    }
}
