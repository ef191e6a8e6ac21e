use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("file name must not be empty")]
    EmptyFileName,
    #[error("unknown presentation type code: {0}")]
    UnknownPresentationType(String),
    #[error("unknown color theme: {0}")]
    UnknownColorTheme(String),
}
