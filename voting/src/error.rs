use factum_store::StoreError;
use factum_types::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("fact {0} not found")]
    FactNotFound(String),

    #[error("veto {0} not found")]
    VetoNotFound(String),

    #[error("vote target {0} not found")]
    TargetNotFound(String),

    #[error("veto {0} is already resolved")]
    AlreadyResolved(String),

    #[error("this IP has already voted on this target")]
    DuplicateAnonymousVote,

    #[error("invalid vote value {0}, expected +1 or -1")]
    InvalidVoteValue(i8),

    #[error("a veto requires a non-empty reason")]
    EmptyReason,

    #[error("a veto requires at least one source")]
    NoSources,

    #[error("anonymous voting is disabled")]
    AnonymousVotingDisabled,

    #[error("anonymous votes cannot target vetoes")]
    AnonymousVetoVote,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl VoteError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::FactNotFound(_) | Self::VetoNotFound(_) | Self::TargetNotFound(_) => {
                ErrorCode::NotFound
            }
            Self::AlreadyResolved(_) | Self::DuplicateAnonymousVote => ErrorCode::Conflict,
            Self::InvalidVoteValue(_) | Self::EmptyReason | Self::NoSources
            | Self::AnonymousVetoVote => ErrorCode::Validation,
            Self::AnonymousVotingDisabled => ErrorCode::FeatureDisabled,
            Self::Store(StoreError::NotFound(_)) => ErrorCode::NotFound,
            Self::Store(StoreError::Duplicate(_)) => ErrorCode::Conflict,
            Self::Store(_) => ErrorCode::Internal,
        }
    }
}
