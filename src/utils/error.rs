use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    // 以下訊息直接顯示給使用者
    #[error("You must have at least {minimum} URLs.")]
    BelowMinimumSlots { minimum: usize },

    #[error("Please enter at least {minimum} URLs.")]
    InsufficientAddresses { minimum: usize, found: usize },

    #[error("No URL field at position {position} (form has {len})")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("Invalid URL: {address} ({reason})")]
    MalformedAddress { address: String, reason: String },

    #[error("Request failed with status code {status}")]
    HttpStatus { status: u16 },

    #[error("Expected {expected} metadata records but received {received}")]
    RecordCountMismatch { expected: usize, received: usize },

    #[error("{message}")]
    CollaboratorError { message: String },
}

pub type Result<T> = std::result::Result<T, FormError>;
