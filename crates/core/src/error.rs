use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Unsupported construct {tag} at offset {offset}")]
    UnsupportedConstruct { tag: String, offset: i32 },
    #[error("Front end error: {0}")]
    Frontend(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid option {key}={value}")]
    InvalidOption { key: String, value: String },
    #[error("Conversion cancelled")]
    Cancelled,
}

impl ConversionError {
    pub fn unsupported(tag: impl std::fmt::Debug, offset: i32) -> Self {
        ConversionError::UnsupportedConstruct {
            tag: format!("{tag:?}"),
            offset,
        }
    }
}

impl From<jdt_bridge_javac::FrontendError> for ConversionError {
    fn from(err: jdt_bridge_javac::FrontendError) -> Self {
        ConversionError::Frontend(err.to_string())
    }
}

impl From<jdt_bridge_api::ApiError> for ConversionError {
    fn from(err: jdt_bridge_api::ApiError) -> Self {
        match err {
            jdt_bridge_api::ApiError::UnknownApiLevel(ordinal) => ConversionError::InvalidOption {
                key: "apiLevel".to_string(),
                value: ordinal.to_string(),
            },
            other => ConversionError::Frontend(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConversionError>;
