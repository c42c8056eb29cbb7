//! Moderation — account flagging, ban escalation, and moderator election.

pub mod bans;
pub mod election;
pub mod error;
pub mod flags;

pub use bans::BanEscalation;
pub use election::{ElectionPhase, ModeratorElection, ReinstateOutcome};
pub use error::ModerationError;
pub use flags::{AccountFlaggingEngine, FlagReview, NEGATIVE_VETO_THRESHOLD};
