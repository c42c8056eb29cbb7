//! The generic weighted-vote routine.
//!
//! One routine for every votable target: it snapshots the voter's current
//! weight, upserts the (voter, target) row, and moves the target's aggregate
//! by the *difference* between the new and the replaced contribution, so a
//! re-vote never double-counts.

use crate::error::VoteError;
use factum_store::{ContentStore, UserRecord, VoteRecord, VoteStore};
use factum_trust::vote_weight;
use factum_types::{ModerationParams, UserId, VoteTarget, VoteValue};
use serde::{Deserialize, Serialize};

/// What a cast vote did.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub target: VoteTarget,
    pub value: VoteValue,
    /// The weight snapshotted into the vote row.
    pub weight: f64,
    /// The target's aggregate weighted score after this vote.
    pub aggregate: f64,
    /// Whether this was the voter's first vote on the target (a re-vote
    /// replaces the old row instead of adding a second one).
    pub first_vote: bool,
    /// The content author, for the caller to credit. `None` for vetoes and
    /// for self-votes.
    pub author: Option<UserId>,
}

/// Cast (or re-cast) a registered user's vote on any target.
pub fn cast_weighted_vote<S>(
    store: &S,
    params: &ModerationParams,
    voter: &UserRecord,
    target: &VoteTarget,
    value: VoteValue,
) -> Result<VoteReceipt, VoteError>
where
    S: VoteStore + ContentStore + ?Sized,
{
    if !store.target_exists(target)? {
        return Err(VoteError::TargetNotFound(target.to_string()));
    }

    let weight = vote_weight(voter.user_type, voter.trust_score, params);
    let previous = store.get_vote(&voter.id, target)?;
    let replaced = previous
        .as_ref()
        .map(|v| v.value.as_f64() * v.weight)
        .unwrap_or(0.0);
    let contribution = value.as_f64() * weight;

    store.upsert_vote(&VoteRecord {
        voter: voter.id.clone(),
        target: target.clone(),
        value,
        weight,
    })?;
    let aggregate = store.apply_target_score_delta(target, contribution - replaced)?;

    let author = if previous.is_none() && target.is_content() {
        store
            .target_author(target)?
            .filter(|author| *author != voter.id)
    } else {
        None
    };

    tracing::debug!(
        voter = %voter.id,
        target = %target,
        value = value.as_i8(),
        weight,
        aggregate,
        "vote cast"
    );

    Ok(VoteReceipt {
        target: target.clone(),
        value,
        weight,
        aggregate,
        first_vote: previous.is_none(),
        author,
    })
}
