use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResilioError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("API error {code}: {message}")]
    Api { code: i64, message: String },
}

pub type Result<T> = std::result::Result<T, ResilioError>;
