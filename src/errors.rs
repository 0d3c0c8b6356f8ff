use thiserror::Error;

#[derive(Error, Debug)]
pub enum GainerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, GainerError>;

impl From<String> for GainerError {
    fn from(s: String) -> Self {
        GainerError::Unknown(s)
    }
}

impl From<&str> for GainerError {
    fn from(s: &str) -> Self {
        GainerError::Unknown(s.to_string())
    }
}
