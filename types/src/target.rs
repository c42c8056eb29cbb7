//! Vote targets and vote values.

use crate::ids::{CommentId, DiscussionId, FactId, VetoId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a vote points at.
///
/// A tagged union instead of a stringly-typed discriminator: every variant
/// names the entity kind and carries its id, and the voting routine is
/// parameterized over this type rather than branching on free-form strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteTarget {
    Fact(FactId),
    Discussion(DiscussionId),
    Comment(CommentId),
    Veto(VetoId),
}

impl VoteTarget {
    /// Stable kind discriminator, used in composite store keys and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fact(_) => "fact",
            Self::Discussion(_) => "discussion",
            Self::Comment(_) => "comment",
            Self::Veto(_) => "veto",
        }
    }

    /// The raw id string of the targeted entity.
    pub fn id_str(&self) -> &str {
        match self {
            Self::Fact(id) => id.as_str(),
            Self::Discussion(id) => id.as_str(),
            Self::Comment(id) => id.as_str(),
            Self::Veto(id) => id.as_str(),
        }
    }

    /// Whether this target is authored content (facts, discussions,
    /// comments). Vetoes resolve through their own state machine and carry
    /// no author-credit semantics.
    pub fn is_content(&self) -> bool {
        !matches!(self, Self::Veto(_))
    }
}

impl fmt::Display for VoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id_str())
    }
}

/// A vote's direction. The only two legal raw values are +1 and −1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// Parse a raw ±1 value; anything else is invalid.
    pub fn from_raw(value: i8) -> Option<Self> {
        match value {
            1 => Some(Self::Up),
            -1 => Some(Self::Down),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Up => 1.0,
            Self::Down => -1.0,
        }
    }

    pub fn as_i8(&self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}
