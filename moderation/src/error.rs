use factum_store::StoreError;
use factum_types::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("flag {0} not found")]
    FlagNotFound(String),

    #[error("user {0} already has an open flag")]
    AlreadyFlagged(String),

    #[error("flag {0} is already resolved")]
    AlreadyResolved(String),

    #[error("flag {0} is already under review")]
    AlreadyUnderReview(String),

    #[error("reviewer {0} is not a moderator")]
    ReviewerNotModerator(String),

    #[error("reviewers cannot review their own flag")]
    SelfReview,

    #[error("user {0} is already permanently banned")]
    AlreadyPermanentlyBanned(String),

    #[error("ban level for user {0} changed concurrently")]
    ConcurrentEscalation(String),

    #[error("user {0} has no active ban")]
    NoActiveBan(String),

    #[error("user {0} is already a moderator")]
    AlreadyModerator(String),

    #[error("user {0} is not a moderator")]
    NotModerator(String),

    #[error("user {0} cannot hold a moderator role")]
    CannotModerate(String),

    #[error("moderator slots are full ({0} max)")]
    MaxModerators(u32),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl ModerationError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UserNotFound(_) | Self::FlagNotFound(_) => ErrorCode::NotFound,
            Self::AlreadyFlagged(_)
            | Self::AlreadyResolved(_)
            | Self::AlreadyUnderReview(_)
            | Self::AlreadyPermanentlyBanned(_)
            | Self::ConcurrentEscalation(_)
            | Self::NoActiveBan(_)
            | Self::AlreadyModerator(_)
            | Self::NotModerator(_) => ErrorCode::Conflict,
            Self::ReviewerNotModerator(_) | Self::SelfReview => ErrorCode::PermissionDenied,
            Self::CannotModerate(_) => ErrorCode::Validation,
            Self::MaxModerators(_) => ErrorCode::CapacityExceeded,
            Self::Store(StoreError::NotFound(_)) => ErrorCode::NotFound,
            Self::Store(StoreError::Duplicate(_)) => ErrorCode::Conflict,
            Self::Store(_) => ErrorCode::Internal,
        }
    }
}
