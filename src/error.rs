use thiserror::Error;

#[derive(Error, Debug)]
pub enum TestRankError {
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("config is missing required field(s): {}", .0.join(", "))]
    MissingConfigFields(Vec<String>),

    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("scan input error: {0}")]
    ScanInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TestRankError>;
