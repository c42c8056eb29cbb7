use factum_store::StoreError;
use factum_types::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrustError {
    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl TrustError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UserNotFound(_) => ErrorCode::NotFound,
            Self::Store(StoreError::NotFound(_)) => ErrorCode::NotFound,
            Self::Store(StoreError::Duplicate(_)) => ErrorCode::Conflict,
            Self::Store(_) => ErrorCode::Internal,
        }
    }
}
