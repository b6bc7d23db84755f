use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown value pattern: {0}")]
    UnknownPattern(String),
    #[error("unknown scalar type: {0}")]
    UnknownScalarType(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
