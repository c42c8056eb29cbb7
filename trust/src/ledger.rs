//! The trust ledger — append-only reputation events plus a cached score.
//!
//! Every application appends a `TrustEventRecord` and bumps the user's
//! cached score through the store's atomic increment. The cached score is a
//! projection of the log: `reconcile` recomputes it from scratch and repairs
//! drift.

use crate::error::TrustError;
use factum_store::{TrustEventRecord, TrustEventStore, UserStore};
use factum_types::{ModerationParams, Timestamp, TrustAction, UserId};
use serde::{Deserialize, Serialize};

/// Tolerance when comparing the cached score against the recomputed sum.
/// Default deltas are integral, so any real drift is far larger than this.
const DRIFT_EPSILON: f64 = 1e-9;

/// Result of a reconciliation pass over one user's event log.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reconciliation {
    pub user_id: UserId,
    /// The cached score before reconciliation.
    pub cached: f64,
    /// The score recomputed from the event log.
    pub recomputed: f64,
    /// Whether the cache was out of sync and has been repaired.
    pub repaired: bool,
}

/// Engine for applying and auditing trust events.
pub struct TrustLedger;

impl TrustLedger {
    /// Apply a named action to a user: append the event, bump the cached
    /// score additively, return the new score.
    pub fn apply_event<S>(
        &self,
        store: &S,
        params: &ModerationParams,
        user_id: &UserId,
        action: TrustAction,
        now: Timestamp,
    ) -> Result<f64, TrustError>
    where
        S: UserStore + TrustEventStore + ?Sized,
    {
        if !store.user_exists(user_id)? {
            return Err(TrustError::UserNotFound(user_id.to_string()));
        }

        let delta = params.trust_deltas.for_action(action);
        store.append_trust_event(&TrustEventRecord {
            user_id: user_id.clone(),
            action,
            delta,
            timestamp: now,
        })?;
        let new_score = store.add_to_trust_score(user_id, delta)?;

        tracing::debug!(
            user = %user_id,
            action = action.name(),
            delta,
            new_score,
            "trust event applied"
        );
        Ok(new_score)
    }

    /// Recompute a user's score from the event log, repairing the cache if
    /// it has drifted. Safe to run repeatedly.
    pub fn reconcile<S>(&self, store: &S, user_id: &UserId) -> Result<Reconciliation, TrustError>
    where
        S: UserStore + TrustEventStore + ?Sized,
    {
        let user = store
            .get_user(user_id)
            .map_err(|_| TrustError::UserNotFound(user_id.to_string()))?;
        let recomputed: f64 = store
            .trust_events_for(user_id)?
            .iter()
            .map(|e| e.delta)
            .sum();

        let repaired = (user.trust_score - recomputed).abs() > DRIFT_EPSILON;
        if repaired {
            tracing::warn!(
                user = %user_id,
                cached = user.trust_score,
                recomputed,
                "trust score drift repaired"
            );
            store.set_trust_score(user_id, recomputed)?;
        }

        Ok(Reconciliation {
            user_id: user_id.clone(),
            cached: user.trust_score,
            recomputed,
            repaired,
        })
    }

    /// A user's trust events, newest first.
    pub fn history<S>(&self, store: &S, user_id: &UserId) -> Result<Vec<TrustEventRecord>, TrustError>
    where
        S: UserStore + TrustEventStore + ?Sized,
    {
        if !store.user_exists(user_id)? {
            return Err(TrustError::UserNotFound(user_id.to_string()));
        }
        let mut events = store.trust_events_for(user_id)?;
        events.reverse();
        Ok(events)
    }
}
