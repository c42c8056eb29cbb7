//! Vote storage trait — registered and anonymous votes.

use crate::StoreError;
use factum_types::{UserId, VoteTarget, VoteValue};
use serde::{Deserialize, Serialize};

/// A registered user's active vote on a target.
///
/// One row per (voter, target); re-voting updates `value`/`weight` in place.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: UserId,
    pub target: VoteTarget,
    pub value: VoteValue,
    pub weight: f64,
}

/// An anonymous vote, identified only by the salted IP digest.
/// One row per (ip_hash, target); anonymous votes are never re-cast.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnonymousVoteRecord {
    pub ip_hash: String,
    pub target: VoteTarget,
    pub value: VoteValue,
}

/// Trait for vote storage operations.
pub trait VoteStore {
    /// Composite-key lookup: the voter's active vote on a target, if any.
    fn get_vote(&self, voter: &UserId, target: &VoteTarget)
        -> Result<Option<VoteRecord>, StoreError>;

    /// Insert or replace the (voter, target) row.
    fn upsert_vote(&self, record: &VoteRecord) -> Result<(), StoreError>;

    /// All active votes on a target.
    fn votes_for_target(&self, target: &VoteTarget) -> Result<Vec<VoteRecord>, StoreError>;

    /// Insert an anonymous vote only if no (ip_hash, target) row exists.
    /// Returns `false` when the row was already present.
    fn insert_anonymous_vote_if_absent(
        &self,
        record: &AnonymousVoteRecord,
    ) -> Result<bool, StoreError>;
}
