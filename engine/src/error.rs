use factum_moderation::ModerationError;
use factum_store::StoreError;
use factum_trust::TrustError;
use factum_types::ErrorCode;
use factum_voting::VoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("user {0} is blocked pending flag review")]
    UserRestricted(String),

    #[error("user {0} is banned")]
    UserBanned(String),

    #[error("this email address is not allowed to register")]
    EmailBlocked,

    #[error("this IP address is not allowed to register")]
    IpBlocked,

    #[error("users cannot review their own content")]
    ReviewOwnContent,

    #[error(transparent)]
    Trust(#[from] TrustError),

    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error(transparent)]
    Moderation(#[from] ModerationError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UserNotFound(_) => ErrorCode::NotFound,
            Self::UserRestricted(_) | Self::UserBanned(_) => ErrorCode::PermissionDenied,
            Self::EmailBlocked | Self::IpBlocked => ErrorCode::PermissionDenied,
            Self::ReviewOwnContent => ErrorCode::PermissionDenied,
            Self::Trust(e) => e.code(),
            Self::Vote(e) => e.code(),
            Self::Moderation(e) => e.code(),
            Self::Store(StoreError::NotFound(_)) => ErrorCode::NotFound,
            Self::Store(StoreError::Duplicate(_)) => ErrorCode::Conflict,
            Self::Store(_) => ErrorCode::Internal,
        }
    }
}
