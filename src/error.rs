use thiserror::Error;

#[derive(Error, Debug)]
pub enum FunderError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Not found on the platform: {0}")]
    NotFound(String),

    #[error("Source still failing after {attempts} attempts: {message}")]
    TransientSource { attempts: u32, message: String },

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL errors for {query}: {errors}")]
    GraphQL { query: String, errors: String },

    #[error("GraphQL response contained no data")]
    NoResponseData,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FunderError>;
