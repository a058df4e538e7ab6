#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unknown API level ordinal: {0}")]
    UnknownApiLevel(u32),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Node {0} does not belong to this tree")]
    DetachedNode(u32),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
