//! Abstract storage traits for the factum moderation engine.
//!
//! Every storage backend (SQL, document store, in-memory for testing)
//! implements these traits. The engines depend only on the traits, and only
//! on the query shapes they actually use: point lookups, composite-key
//! lookups, grouped counts, and conditional ("only if still in state X")
//! updates.

pub mod ban;
pub mod blocklist;
pub mod content;
pub mod error;
pub mod flag;
pub mod moderator;
pub mod trust_event;
pub mod user;
pub mod veto;
pub mod vote;

pub use ban::{BanRecord, BanStore};
pub use blocklist::{BlockedEntry, BlocklistStore};
pub use content::{ContentStore, FactStatus, FactStore};
pub use error::StoreError;
pub use flag::{FlagRecord, FlagStore};
pub use moderator::{ModeratorRecord, ModeratorStore, SlotClaim};
pub use trust_event::{TrustEventRecord, TrustEventStore};
pub use user::{UserRecord, UserStore};
pub use veto::{VetoRecord, VetoStore};
pub use vote::{AnonymousVoteRecord, VoteRecord, VoteStore};

/// Everything the composed engine needs from one storage handle.
pub trait ModerationStore:
    UserStore
    + TrustEventStore
    + VoteStore
    + VetoStore
    + FactStore
    + ContentStore
    + FlagStore
    + BanStore
    + BlocklistStore
    + ModeratorStore
{
}

impl<T> ModerationStore for T where
    T: UserStore
        + TrustEventStore
        + VoteStore
        + VetoStore
        + FactStore
        + ContentStore
        + FlagStore
        + BanStore
        + BlocklistStore
        + ModeratorStore
{
}
