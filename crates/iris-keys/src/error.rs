use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("no upstream keys configured")]
    NoKeys,

    #[error("key storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KeyError>;
