//! The veto state machine — challenges against published facts.
//!
//! A veto starts `Pending` and resolves exactly once to `Approved` or
//! `Rejected` when the signed weighted vote aggregate reaches the
//! resolution threshold. The Pending→terminal transition is a conditional
//! store update, so concurrent votes crossing the threshold together
//! produce exactly one resolution.

use crate::error::VoteError;
use factum_store::{FactStatus, FactStore, UserRecord, VetoRecord, VetoStore, VoteRecord, VoteStore};
use factum_trust::vote_weight;
use factum_types::{FactId, ModerationParams, Timestamp, UserId, VetoId, VetoStatus, VoteTarget, VoteValue};
use serde::{Deserialize, Serialize};

/// A veto that just resolved, with everything the caller needs to fire the
/// follow-on effects (submitter trust delta, flag notification).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolvedVeto {
    pub veto_id: VetoId,
    pub fact_id: FactId,
    pub submitter: UserId,
    pub status: VetoStatus,
    pub aggregate: f64,
}

/// Outcome of a veto vote.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum VetoVoteOutcome {
    /// Vote recorded; the veto is still pending (or another voter won the
    /// resolution race — the winner fires the side effects).
    Recorded { aggregate: f64 },
    /// This vote pushed the aggregate across the threshold and performed
    /// the one-and-only resolution.
    Resolved(ResolvedVeto),
}

/// Engine governing the veto lifecycle.
pub struct VetoStateMachine;

impl VetoStateMachine {
    /// Submit a challenge against a published fact.
    ///
    /// Requires a non-empty reason and at least one source. The challenged
    /// fact is marked `Disputed` while the veto is open.
    pub fn submit_veto<S>(
        &self,
        store: &S,
        fact_id: &FactId,
        submitter: &UserId,
        reason: &str,
        sources: &[String],
        now: Timestamp,
    ) -> Result<VetoRecord, VoteError>
    where
        S: VetoStore + FactStore + ?Sized,
    {
        if !store.fact_exists(fact_id)? {
            return Err(VoteError::FactNotFound(fact_id.to_string()));
        }
        if reason.trim().is_empty() {
            return Err(VoteError::EmptyReason);
        }
        if sources.is_empty() {
            return Err(VoteError::NoSources);
        }

        let record = VetoRecord {
            id: Self::mint_id(fact_id, submitter, now),
            fact_id: fact_id.clone(),
            submitter: submitter.clone(),
            reason: reason.trim().to_string(),
            sources: sources.to_vec(),
            status: VetoStatus::Pending,
            created_at: now,
            resolved_at: None,
        };
        store.insert_veto(&record)?;
        store.set_fact_status(fact_id, FactStatus::Disputed)?;

        tracing::info!(veto = %record.id, fact = %fact_id, submitter = %submitter, "veto submitted");
        Ok(record)
    }

    /// Cast a weighted vote on a pending veto and run the resolution check.
    ///
    /// Votes on a resolved veto fail with `AlreadyResolved`. Re-votes
    /// replace the voter's previous row. Resolution: the moment the signed
    /// weighted aggregate reaches `±veto_resolution_weight`, the veto
    /// transitions once — positive aggregate approves the challenge,
    /// negative rejects it.
    pub fn vote_on_veto<S>(
        &self,
        store: &S,
        params: &ModerationParams,
        voter: &UserRecord,
        veto_id: &VetoId,
        value: VoteValue,
        now: Timestamp,
    ) -> Result<VetoVoteOutcome, VoteError>
    where
        S: VetoStore + VoteStore + FactStore + ?Sized,
    {
        let veto = store.get_veto(veto_id)?;
        if veto.status.is_terminal() {
            return Err(VoteError::AlreadyResolved(veto_id.to_string()));
        }

        let target = VoteTarget::Veto(veto_id.clone());
        let weight = vote_weight(voter.user_type, voter.trust_score, params);
        store.upsert_vote(&VoteRecord {
            voter: voter.id.clone(),
            target: target.clone(),
            value,
            weight,
        })?;

        let aggregate: f64 = store
            .votes_for_target(&target)?
            .iter()
            .map(|v| v.value.as_f64() * v.weight)
            .sum();

        let threshold = params.veto_resolution_weight;
        let decided = if aggregate >= threshold {
            Some(VetoStatus::Approved)
        } else if aggregate <= -threshold {
            Some(VetoStatus::Rejected)
        } else {
            None
        };

        let Some(status) = decided else {
            return Ok(VetoVoteOutcome::Recorded { aggregate });
        };

        // Single-winner transition: only the call that flips Pending fires
        // the follow-on effects.
        if !store.resolve_veto_if_pending(veto_id, status, now)? {
            return Ok(VetoVoteOutcome::Recorded { aggregate });
        }

        let fact_status = match status {
            VetoStatus::Approved => FactStatus::Retracted,
            _ => FactStatus::Published,
        };
        store.set_fact_status(&veto.fact_id, fact_status)?;

        tracing::info!(
            veto = %veto_id,
            fact = %veto.fact_id,
            ?status,
            aggregate,
            "veto resolved"
        );

        Ok(VetoVoteOutcome::Resolved(ResolvedVeto {
            veto_id: veto_id.clone(),
            fact_id: veto.fact_id,
            submitter: veto.submitter,
            status,
            aggregate,
        }))
    }

    /// Derive a veto id from its defining fields.
    fn mint_id(fact_id: &FactId, submitter: &UserId, now: Timestamp) -> VetoId {
        let digest = factum_crypto::blake2b_256_multi(&[
            fact_id.as_str().as_bytes(),
            submitter.as_str().as_bytes(),
            &now.as_secs().to_le_bytes(),
        ]);
        VetoId::new(hex::encode(&digest[..16]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factum_nullables::MemoryStore;
    use factum_types::{ModerationParams, UserType};

    fn user(name: &str, user_type: UserType, trust: f64) -> UserRecord {
        let mut record = UserRecord::new(UserId::new(name), user_type, Timestamp::new(1_000));
        record.trust_score = trust;
        record
    }

    fn sources() -> Vec<String> {
        vec!["https://example.org/primary".to_string()]
    }

    /// Store with a published fact by `author` and a pending veto by
    /// `challenger`.
    fn seeded() -> (MemoryStore, VetoRecord) {
        let store = MemoryStore::new();
        let author = user("author", UserType::Verified, 0.0);
        let challenger = user("challenger", UserType::Verified, 0.0);
        store.add_user(author.clone());
        store.add_user(challenger.clone());
        let fact = FactId::new("f1");
        store.add_fact(&fact, &author.id);

        let veto = VetoStateMachine
            .submit_veto(
                &store,
                &fact,
                &challenger.id,
                "contradicts the primary source",
                &sources(),
                Timestamp::new(2_000),
            )
            .unwrap();
        (store, veto)
    }

    // ── Submission ──────────────────────────────────────────────────────

    #[test]
    fn submission_creates_pending_veto_and_disputes_fact() {
        let (store, veto) = seeded();
        assert_eq!(veto.status, VetoStatus::Pending);
        assert!(veto.resolved_at.is_none());
        assert_eq!(
            store.fact_status(&veto.fact_id).unwrap(),
            FactStatus::Disputed
        );
    }

    #[test]
    fn submission_against_missing_fact_fails() {
        let store = MemoryStore::new();
        store.add_user(user("challenger", UserType::Verified, 0.0));
        let result = VetoStateMachine.submit_veto(
            &store,
            &FactId::new("ghost"),
            &UserId::new("challenger"),
            "reason",
            &sources(),
            Timestamp::new(0),
        );
        assert!(matches!(result, Err(VoteError::FactNotFound(_))));
    }

    #[test]
    fn submission_requires_reason_and_sources() {
        let store = MemoryStore::new();
        let author = user("author", UserType::Verified, 0.0);
        store.add_user(author.clone());
        let fact = FactId::new("f1");
        store.add_fact(&fact, &author.id);

        let no_reason = VetoStateMachine.submit_veto(
            &store,
            &fact,
            &author.id,
            "   ",
            &sources(),
            Timestamp::new(0),
        );
        assert!(matches!(no_reason, Err(VoteError::EmptyReason)));

        let no_sources = VetoStateMachine.submit_veto(
            &store,
            &fact,
            &author.id,
            "reasoned",
            &[],
            Timestamp::new(0),
        );
        assert!(matches!(no_sources, Err(VoteError::NoSources)));
    }

    // ── Voting & resolution ─────────────────────────────────────────────

    #[test]
    fn votes_below_threshold_stay_pending() {
        let (store, veto) = seeded();
        let params = ModerationParams::defaults();
        let voter = user("v1", UserType::Expert, 0.0); // weight 5
        store.add_user(voter.clone());

        let outcome = VetoStateMachine
            .vote_on_veto(&store, &params, &voter, &veto.id, VoteValue::Up, Timestamp::new(3_000))
            .unwrap();
        assert!(matches!(
            outcome,
            VetoVoteOutcome::Recorded { aggregate } if aggregate == 5.0
        ));
        assert_eq!(store.get_veto(&veto.id).unwrap().status, VetoStatus::Pending);
    }

    #[test]
    fn crossing_positive_threshold_approves_once() {
        let (store, veto) = seeded();
        let params = ModerationParams::defaults();
        let heavy = user("org", UserType::Organization, 0.0); // weight 100
        store.add_user(heavy.clone());

        let outcome = VetoStateMachine
            .vote_on_veto(&store, &params, &heavy, &veto.id, VoteValue::Up, Timestamp::new(3_000))
            .unwrap();
        match outcome {
            VetoVoteOutcome::Resolved(resolved) => {
                assert_eq!(resolved.status, VetoStatus::Approved);
                assert_eq!(resolved.submitter, UserId::new("challenger"));
                assert_eq!(resolved.aggregate, 100.0);
            }
            other => panic!("expected resolution, got {other:?}"),
        }

        let stored = store.get_veto(&veto.id).unwrap();
        assert_eq!(stored.status, VetoStatus::Approved);
        assert_eq!(stored.resolved_at, Some(Timestamp::new(3_000)));
        assert_eq!(
            store.fact_status(&veto.fact_id).unwrap(),
            FactStatus::Retracted
        );
    }

    #[test]
    fn crossing_negative_threshold_rejects_and_republishes() {
        let (store, veto) = seeded();
        let params = ModerationParams::defaults();
        let heavy = user("org", UserType::Organization, 0.0);
        store.add_user(heavy.clone());

        let outcome = VetoStateMachine
            .vote_on_veto(&store, &params, &heavy, &veto.id, VoteValue::Down, Timestamp::new(3_000))
            .unwrap();
        assert!(matches!(
            outcome,
            VetoVoteOutcome::Resolved(ResolvedVeto {
                status: VetoStatus::Rejected,
                ..
            })
        ));
        assert_eq!(
            store.fact_status(&veto.fact_id).unwrap(),
            FactStatus::Published
        );
    }

    #[test]
    fn vote_after_resolution_fails_loudly() {
        let (store, veto) = seeded();
        let params = ModerationParams::defaults();
        let heavy = user("org", UserType::Organization, 0.0);
        let late = user("late", UserType::Verified, 0.0);
        store.add_user(heavy.clone());
        store.add_user(late.clone());

        VetoStateMachine
            .vote_on_veto(&store, &params, &heavy, &veto.id, VoteValue::Up, Timestamp::new(3_000))
            .unwrap();

        let result = VetoStateMachine.vote_on_veto(
            &store,
            &params,
            &late,
            &veto.id,
            VoteValue::Up,
            Timestamp::new(4_000),
        );
        assert!(matches!(result, Err(VoteError::AlreadyResolved(_))));
        assert_eq!(result.unwrap_err().code(), factum_types::ErrorCode::Conflict);
    }

    #[test]
    fn lost_resolution_race_reports_recorded_not_resolved() {
        let (store, veto) = seeded();
        let params = ModerationParams::defaults();
        let heavy = user("org", UserType::Organization, 0.0);
        store.add_user(heavy.clone());

        // Another resolver already flipped the status.
        assert!(store
            .resolve_veto_if_pending(&veto.id, VetoStatus::Approved, Timestamp::new(2_500))
            .unwrap());

        // Re-resolution attempts must re-fire nothing. The status check
        // surfaces the terminal state as a Conflict.
        let result = VetoStateMachine.vote_on_veto(
            &store,
            &params,
            &heavy,
            &veto.id,
            VoteValue::Up,
            Timestamp::new(3_000),
        );
        assert!(matches!(result, Err(VoteError::AlreadyResolved(_))));
    }

    #[test]
    fn revote_replaces_previous_weighted_value() {
        let (store, veto) = seeded();
        let params = ModerationParams::defaults();
        let voter = user("v1", UserType::Expert, 0.0); // weight 5
        store.add_user(voter.clone());

        VetoStateMachine
            .vote_on_veto(&store, &params, &voter, &veto.id, VoteValue::Up, Timestamp::new(3_000))
            .unwrap();
        let outcome = VetoStateMachine
            .vote_on_veto(&store, &params, &voter, &veto.id, VoteValue::Down, Timestamp::new(3_100))
            .unwrap();

        // Flip, not accumulate: -5, never 0 or 10.
        assert!(matches!(
            outcome,
            VetoVoteOutcome::Recorded { aggregate } if aggregate == -5.0
        ));
    }

    #[test]
    fn accumulated_weights_cross_threshold_together() {
        let (store, veto) = seeded();
        let params = ModerationParams::defaults();
        let v1 = user("v1", UserType::Expert, 0.0); // 5
        let v2 = user("v2", UserType::Phd, 0.0); // 8
        store.add_user(v1.clone());
        store.add_user(v2.clone());

        let first = VetoStateMachine
            .vote_on_veto(&store, &params, &v1, &veto.id, VoteValue::Up, Timestamp::new(3_000))
            .unwrap();
        assert!(matches!(first, VetoVoteOutcome::Recorded { .. }));

        let second = VetoStateMachine
            .vote_on_veto(&store, &params, &v2, &veto.id, VoteValue::Up, Timestamp::new(3_100))
            .unwrap();
        assert!(matches!(
            second,
            VetoVoteOutcome::Resolved(ResolvedVeto {
                status: VetoStatus::Approved,
                ..
            })
        ));
    }
}
