//! Opaque id newtypes for the entities the engine touches.
//!
//! Ids are opaque strings owned by the account/content subsystems. The engine
//! never parses them; it only compares, orders, and stores them. `Ord` on
//! `UserId` matters: the moderator-cutoff tie-break is (trust desc, id asc).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

id_newtype!(
    /// A user account id.
    UserId
);

id_newtype!(
    /// A published fact id.
    FactId
);

id_newtype!(
    /// A discussion thread id.
    DiscussionId
);

id_newtype!(
    /// A comment id.
    CommentId
);

id_newtype!(
    /// A veto (fact challenge) id.
    VetoId
);

id_newtype!(
    /// An account-flag id.
    FlagId
);
