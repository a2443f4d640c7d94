use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("store fault: {0}")]
    StoreFault(String),
}

/// Structured discriminant of [`StorageError`] for callers that branch on failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorKind {
    NotFound,
    Parse,
    Serialization,
    StoreFault,
}

impl StorageError {
    pub fn not_found(key: &str) -> Self { Self::NotFound(format!("no entry for key '{}'", key)) }

    pub fn kind(&self) -> StorageErrorKind {
        match self {
            Self::NotFound(_) => StorageErrorKind::NotFound,
            Self::Parse(_) => StorageErrorKind::Parse,
            Self::Serialization(_) => StorageErrorKind::Serialization,
            Self::StoreFault(_) => StorageErrorKind::StoreFault,
        }
    }
}
