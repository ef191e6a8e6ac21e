use polaroid_studio_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no valid image files among {rejected} selected file(s)")]
    NoValidFiles { rejected: usize },
    #[error("selection is incomplete: {0}")]
    IncompleteSelection(String),
    #[error("no display label registered for presentation type {0}")]
    MissingLabel(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("decode error for {name}: {message}")]
    Decode { name: String, message: String },
    #[error("decode pipeline error: {0}")]
    Pipeline(String),
}
