use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Failed to load Java grammar: {0}")]
    Language(String),

    #[error("Parse failed: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, FrontendError>;
