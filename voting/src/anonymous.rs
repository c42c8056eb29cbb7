//! The anonymous (unauthenticated) vote path.
//!
//! Anonymous voters have no persistent trust record, so the vote carries the
//! fixed anonymous base weight with no trust modifier. Identity is the
//! salted IP digest: one vote per (ip_hash, target), never re-cast. The
//! per-IP daily quota is enforced upstream by the rate-limiting
//! infrastructure, not here.

use crate::error::VoteError;
use factum_store::{AnonymousVoteRecord, ContentStore, VoteStore};
use factum_types::{ModerationParams, VoteTarget, VoteValue};
use serde::{Deserialize, Serialize};

/// Receipt for an accepted anonymous vote.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnonymousVoteReceipt {
    pub target: VoteTarget,
    pub value: VoteValue,
    pub weight: f64,
    pub aggregate: f64,
}

/// Cast an anonymous vote identified by the salted IP digest.
pub fn cast_anonymous_vote<S>(
    store: &S,
    params: &ModerationParams,
    ip_hash: &str,
    target: &VoteTarget,
    value: VoteValue,
) -> Result<AnonymousVoteReceipt, VoteError>
where
    S: VoteStore + ContentStore + ?Sized,
{
    if !params.allow_anonymous_votes {
        return Err(VoteError::AnonymousVotingDisabled);
    }
    if matches!(target, VoteTarget::Veto(_)) {
        return Err(VoteError::AnonymousVetoVote);
    }
    if !store.target_exists(target)? {
        return Err(VoteError::TargetNotFound(target.to_string()));
    }

    let inserted = store.insert_anonymous_vote_if_absent(&AnonymousVoteRecord {
        ip_hash: ip_hash.to_string(),
        target: target.clone(),
        value,
    })?;
    if !inserted {
        return Err(VoteError::DuplicateAnonymousVote);
    }

    let weight = params.weight_bases.anonymous;
    let aggregate = store.apply_target_score_delta(target, value.as_f64() * weight)?;

    tracing::debug!(target = %target, value = value.as_i8(), weight, "anonymous vote cast");

    Ok(AnonymousVoteReceipt {
        target: target.clone(),
        value,
        weight,
        aggregate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use factum_nullables::MemoryStore;
    use factum_store::UserRecord;
    use factum_types::{FactId, Timestamp, UserId, UserType, VetoId};

    fn seeded() -> (MemoryStore, VoteTarget) {
        let store = MemoryStore::new();
        let author = UserId::new("author");
        store.add_user(UserRecord::new(
            author.clone(),
            UserType::Verified,
            Timestamp::new(0),
        ));
        let fact = FactId::new("f1");
        store.add_fact(&fact, &author);
        (store, VoteTarget::Fact(fact))
    }

    #[test]
    fn anonymous_vote_uses_fixed_base_weight() {
        let (store, target) = seeded();
        let params = ModerationParams::defaults();

        let receipt =
            cast_anonymous_vote(&store, &params, "iphash-1", &target, VoteValue::Up).unwrap();
        assert_eq!(receipt.weight, 0.1);
        assert_eq!(receipt.aggregate, 0.1);
    }

    #[test]
    fn feature_flag_gates_the_path() {
        let (store, target) = seeded();
        let mut params = ModerationParams::defaults();
        params.allow_anonymous_votes = false;

        let result = cast_anonymous_vote(&store, &params, "iphash-1", &target, VoteValue::Up);
        assert!(matches!(result, Err(VoteError::AnonymousVotingDisabled)));
        assert_eq!(
            result.unwrap_err().code(),
            factum_types::ErrorCode::FeatureDisabled
        );
    }

    #[test]
    fn one_vote_per_ip_and_target() {
        let (store, target) = seeded();
        let params = ModerationParams::defaults();

        cast_anonymous_vote(&store, &params, "iphash-1", &target, VoteValue::Up).unwrap();
        let result = cast_anonymous_vote(&store, &params, "iphash-1", &target, VoteValue::Down);
        assert!(matches!(result, Err(VoteError::DuplicateAnonymousVote)));

        // A different IP digest still counts.
        let receipt =
            cast_anonymous_vote(&store, &params, "iphash-2", &target, VoteValue::Up).unwrap();
        assert_eq!(receipt.aggregate, 0.2);
    }

    #[test]
    fn vetoes_are_not_anonymous_votable() {
        let (store, _) = seeded();
        let params = ModerationParams::defaults();
        let result = cast_anonymous_vote(
            &store,
            &params,
            "iphash-1",
            &VoteTarget::Veto(VetoId::new("v1")),
            VoteValue::Up,
        );
        assert!(matches!(result, Err(VoteError::AnonymousVetoVote)));
    }
}
