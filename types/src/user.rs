//! User classification enums.

use serde::{Deserialize, Serialize};

/// The account tier of a user, as assigned by the account subsystem.
///
/// The tier determines the base vote weight and what the user may do.
/// `Moderator` is a role layered on top of a verified tier; the tier held
/// before promotion is preserved as the user's [`Credential`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    /// Unauthenticated voter, identified only by hashed IP.
    Anonymous,
    /// Registered account with a verified email.
    Verified,
    /// Verified domain expert.
    Expert,
    /// Verified PhD-level credential.
    Phd,
    /// Organizational account (publisher, institution).
    Organization,
    /// Elected or appointed moderator.
    Moderator,
}

impl UserType {
    /// Whether this user type can ever hold a moderator slot.
    /// Organizations are excluded by policy.
    pub fn can_moderate(&self) -> bool {
        !matches!(self, Self::Anonymous | Self::Organization)
    }

    pub fn is_moderator(&self) -> bool {
        matches!(self, Self::Moderator)
    }
}

/// A verified academic credential, preserved across moderator
/// promotion/demotion so demotion can restore the right tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Credential {
    Expert,
    Phd,
}

impl Credential {
    /// The user type this credential entitles its holder to.
    pub fn user_type(&self) -> UserType {
        match self {
            Self::Expert => UserType::Expert,
            Self::Phd => UserType::Phd,
        }
    }
}
