//! Status enums for vetoes, flags, and bans.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a veto (a challenge against a published fact).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VetoStatus {
    /// Open for weighted voting.
    Pending,
    /// The community upheld the challenge; the fact is wrong.
    Approved,
    /// The community rejected the challenge; the fact stands.
    Rejected,
}

impl VetoStatus {
    /// Approved and Rejected are terminal — a resolved veto never reopens.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// The lifecycle state of an account flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagStatus {
    /// Raised, awaiting moderator attention.
    Pending,
    /// A moderator has picked it up.
    Reviewing,
    /// Reviewed with a Warn or Ban resolution.
    Resolved,
    /// Reviewed and dismissed as unfounded.
    Dismissed,
}

impl FlagStatus {
    /// Whether the flag still restricts the user (blocks voting, fact
    /// posting, verification submission).
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Reviewing)
    }
}

/// What a moderator decided about a flagged account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlagResolution {
    /// Unfounded; no action.
    Dismiss,
    /// Warn the user, no sanction.
    Warn,
    /// Escalate the user's ban level.
    Ban,
}

/// Escalating ban severity. Level 0 means "never banned".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BanLevel(u8);

impl BanLevel {
    pub const NONE: Self = Self(0);
    pub const MAX: Self = Self(3);

    /// Construct a level, clamped to the valid 0–3 range.
    pub fn new(level: u8) -> Self {
        Self(level.min(3))
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// The level the next ban escalates to.
    pub fn next(&self) -> Self {
        Self((self.0 + 1).min(3))
    }

    /// Level 3 is permanent and propagates to the email/IP blocklists.
    pub fn is_permanent(&self) -> bool {
        self.0 >= 3
    }
}
