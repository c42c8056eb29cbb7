//! Trust-ledger actions.

use serde::{Deserialize, Serialize};

/// A named action that moves a user's trust score.
///
/// The point value of each action lives in
/// [`TrustDeltas`](crate::params::TrustDeltas) so it stays tunable at
/// runtime; the action itself is what gets recorded in the append-only
/// event log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrustAction {
    /// A fact the user authored was approved.
    FactApproved,
    /// A fact the user authored was found wrong.
    FactWrong,
    /// A fact the user authored was marked outdated (neutral).
    FactOutdated,
    /// A veto the user submitted was approved.
    VetoSuccess,
    /// A veto the user submitted was rejected.
    VetoFail,
    /// A verification review by the user matched the final outcome.
    VerificationCorrect,
    /// A verification review by the user contradicted the final outcome.
    VerificationWrong,
    /// Content the user authored received an upvote.
    Upvoted,
    /// Content the user authored received a downvote.
    Downvoted,
}

impl TrustAction {
    /// Stable machine-readable name, as recorded in the event log.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FactApproved => "fact_approved",
            Self::FactWrong => "fact_wrong",
            Self::FactOutdated => "fact_outdated",
            Self::VetoSuccess => "veto_success",
            Self::VetoFail => "veto_fail",
            Self::VerificationCorrect => "verification_correct",
            Self::VerificationWrong => "verification_wrong",
            Self::Upvoted => "upvoted",
            Self::Downvoted => "downvoted",
        }
    }
}
