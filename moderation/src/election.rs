//! Moderator election — population-phased appointment, demotion,
//! inactivity parking, and reinstatement.
//!
//! Policy by eligible population N:
//! - Bootstrap (N ≤ bootstrap_threshold): manual appointment only.
//! - Early (N ≤ early_threshold): manual appointment plus automatic
//!   eligibility for the top trust slice.
//! - Mature (N > early_threshold with enough trusted users): full automatic
//!   election via `run_election`.

use crate::error::ModerationError;
use factum_store::{ModeratorRecord, ModeratorStore, SlotClaim, UserRecord, UserStore};
use factum_types::{ModerationParams, Timestamp, UserId, UserType};
use serde::{Deserialize, Serialize};

/// The current election policy phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElectionPhase {
    Bootstrap,
    Early,
    Mature,
}

/// Outcome of a returning moderator's reinstatement attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReinstateOutcome {
    /// A slot was free; the moderator is active again.
    Reinstated,
    /// No slot was free; the named lowest-trust moderator was demoted to
    /// make room.
    Displaced(UserId),
    /// No slot free and nobody to displace; the record stays parked until
    /// a slot opens.
    Queued,
    /// The returner's trust no longer makes the cutoff; not reinstated.
    NotEligible,
    /// The moderator was never parked in the first place.
    AlreadyActive,
}

/// Engine computing eligibility and managing moderator slots.
pub struct ModeratorElection;

impl ModeratorElection {
    /// The current phase, from the eligible population size and the number
    /// of users meeting the trust criteria.
    pub fn phase<S>(
        &self,
        store: &S,
        params: &ModerationParams,
    ) -> Result<ElectionPhase, ModerationError>
    where
        S: UserStore + ?Sized,
    {
        let eligible = self.base_eligible(store)?;
        let population = eligible.len() as u64;
        if population <= params.bootstrap_threshold {
            return Ok(ElectionPhase::Bootstrap);
        }
        if population <= params.early_threshold {
            return Ok(ElectionPhase::Early);
        }
        let trusted = eligible.iter().filter(|u| u.trust_score > 0.0).count() as u64;
        if trusted >= params.min_trusted_for_auto {
            Ok(ElectionPhase::Mature)
        } else {
            Ok(ElectionPhase::Early)
        }
    }

    /// The auto-eligible pool: qualifying users ranked by (trust desc,
    /// id asc), truncated to the top percentage. Ties on the boundary score
    /// are admitted in id order.
    pub fn eligible_pool<S>(
        &self,
        store: &S,
        params: &ModerationParams,
    ) -> Result<Vec<UserRecord>, ModerationError>
    where
        S: UserStore + ?Sized,
    {
        let mut eligible = self.base_eligible(store)?;
        if eligible.is_empty() {
            return Ok(eligible);
        }
        eligible.sort_by(|a, b| {
            b.trust_score
                .partial_cmp(&a.trust_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        let count = ((eligible.len() as u64 * params.top_percentage_bps as u64) / 10_000)
            .max(1) as usize;
        eligible.truncate(count);
        Ok(eligible)
    }

    /// The trust score of the last admitted pool member — the cutoff a
    /// moderator must stay at or above.
    pub fn cutoff_score<S>(
        &self,
        store: &S,
        params: &ModerationParams,
    ) -> Result<Option<f64>, ModerationError>
    where
        S: UserStore + ?Sized,
    {
        Ok(self.eligible_pool(store, params)?.last().map(|u| u.trust_score))
    }

    /// Whether a user is in the current auto-eligible pool.
    pub fn is_eligible<S>(
        &self,
        store: &S,
        params: &ModerationParams,
        user_id: &UserId,
    ) -> Result<bool, ModerationError>
    where
        S: UserStore + ?Sized,
    {
        Ok(self
            .eligible_pool(store, params)?
            .iter()
            .any(|u| u.id == *user_id))
    }

    /// Manually appoint a moderator. Allowed in every phase.
    pub fn appoint_moderator<S>(
        &self,
        store: &S,
        params: &ModerationParams,
        user_id: &UserId,
        appointer: &UserId,
        now: Timestamp,
    ) -> Result<(), ModerationError>
    where
        S: UserStore + ModeratorStore + ?Sized,
    {
        let user = store
            .get_user(user_id)
            .map_err(|_| ModerationError::UserNotFound(user_id.to_string()))?;
        if !user.user_type.can_moderate() {
            return Err(ModerationError::CannotModerate(user_id.to_string()));
        }
        if user.user_type.is_moderator() || store.get_moderator(user_id)?.is_some() {
            return Err(ModerationError::AlreadyModerator(user_id.to_string()));
        }

        let record = ModeratorRecord {
            user_id: user_id.clone(),
            appointed_at: now,
            active: true,
            prior_type: user.user_type,
        };
        match store.insert_moderator_if_capacity(&record, params.max_moderators)? {
            SlotClaim::Claimed => {}
            SlotClaim::AlreadyPresent => {
                return Err(ModerationError::AlreadyModerator(user_id.to_string()))
            }
            SlotClaim::Full => return Err(ModerationError::MaxModerators(params.max_moderators)),
        }
        store.set_user_type(user_id, UserType::Moderator)?;

        tracing::info!(user = %user_id, by = %appointer, "moderator appointed");
        Ok(())
    }

    /// Fully demote a moderator: drop the slot record and revert the user
    /// type to their credential tier (Expert/Phd) or Verified.
    pub fn demote_moderator<S>(&self, store: &S, user_id: &UserId) -> Result<UserType, ModerationError>
    where
        S: UserStore + ModeratorStore + ?Sized,
    {
        if store.get_moderator(user_id)?.is_none() {
            return Err(ModerationError::NotModerator(user_id.to_string()));
        }
        let user = store
            .get_user(user_id)
            .map_err(|_| ModerationError::UserNotFound(user_id.to_string()))?;

        store.remove_moderator(user_id)?;
        let reverted = user
            .credential
            .map(|c| c.user_type())
            .unwrap_or(UserType::Verified);
        store.set_user_type(user_id, reverted)?;

        tracing::info!(user = %user_id, ?reverted, "moderator demoted");
        Ok(reverted)
    }

    /// Park moderators who have not logged in within `inactive_days`. Their
    /// slot frees up but the record (and user type) survive for possible
    /// reinstatement. Returns the parked user ids. Idempotent.
    pub fn sweep_inactive<S>(
        &self,
        store: &S,
        params: &ModerationParams,
        now: Timestamp,
    ) -> Result<Vec<UserId>, ModerationError>
    where
        S: UserStore + ModeratorStore + ?Sized,
    {
        let inactive_secs = params.inactive_days * 24 * 3600;
        let mut parked = Vec::new();
        for record in store.iter_moderators()? {
            if !record.active {
                continue;
            }
            let user = store.get_user(&record.user_id)?;
            if user.last_login_at.has_expired(inactive_secs, now)
                && store.deactivate_moderator(&record.user_id)?
            {
                tracing::info!(user = %record.user_id, "moderator parked for inactivity");
                parked.push(record.user_id);
            }
        }
        Ok(parked)
    }

    /// Demote every active moderator whose trust fell below the current
    /// cutoff. Distinct from inactivity parking: this is a full demotion.
    pub fn auto_demote_below_cutoff<S>(
        &self,
        store: &S,
        params: &ModerationParams,
    ) -> Result<Vec<UserId>, ModerationError>
    where
        S: UserStore + ModeratorStore + ?Sized,
    {
        let Some(cutoff) = self.cutoff_score(store, params)? else {
            return Ok(Vec::new());
        };
        let mut demoted = Vec::new();
        for record in store.iter_moderators()? {
            if !record.active {
                continue;
            }
            let user = store.get_user(&record.user_id)?;
            if user.trust_score < cutoff {
                self.demote_moderator(store, &record.user_id)?;
                demoted.push(record.user_id);
            }
        }
        Ok(demoted)
    }

    /// Reinstate a returning (parked) moderator with priority.
    pub fn handle_returning_moderator<S>(
        &self,
        store: &S,
        params: &ModerationParams,
        user_id: &UserId,
    ) -> Result<ReinstateOutcome, ModerationError>
    where
        S: UserStore + ModeratorStore + ?Sized,
    {
        let record = store
            .get_moderator(user_id)?
            .ok_or_else(|| ModerationError::NotModerator(user_id.to_string()))?;
        if record.active {
            return Ok(ReinstateOutcome::AlreadyActive);
        }

        let user = store
            .get_user(user_id)
            .map_err(|_| ModerationError::UserNotFound(user_id.to_string()))?;
        let cutoff = self.cutoff_score(store, params)?;
        let within_cutoff = cutoff.is_some_and(|c| user.trust_score >= c);
        if !within_cutoff {
            return Ok(ReinstateOutcome::NotEligible);
        }

        match store.activate_moderator_if_capacity(user_id, params.max_moderators)? {
            SlotClaim::Claimed => {
                tracing::info!(user = %user_id, "moderator reinstated");
                return Ok(ReinstateOutcome::Reinstated);
            }
            SlotClaim::AlreadyPresent => return Ok(ReinstateOutcome::AlreadyActive),
            SlotClaim::Full => {}
        }

        // Slots full: displace the lowest-trust active moderator if the
        // returner outranks them.
        let mut lowest: Option<(UserId, f64)> = None;
        for other in store.iter_moderators()? {
            if !other.active || other.user_id == *user_id {
                continue;
            }
            let score = store.get_user(&other.user_id)?.trust_score;
            if lowest.as_ref().map_or(true, |(_, s)| score < *s) {
                lowest = Some((other.user_id, score));
            }
        }

        match lowest {
            Some((victim, score)) if user.trust_score > score => {
                self.demote_moderator(store, &victim)?;
                match store.activate_moderator_if_capacity(user_id, params.max_moderators)? {
                    SlotClaim::Claimed => {
                        tracing::info!(user = %user_id, displaced = %victim, "moderator reinstated by displacement");
                        Ok(ReinstateOutcome::Displaced(victim))
                    }
                    _ => Ok(ReinstateOutcome::Queued),
                }
            }
            _ => Ok(ReinstateOutcome::Queued),
        }
    }

    /// Mature-phase reconciliation: promote eligible non-moderators into
    /// free slots in descending trust order. No-op outside the mature
    /// phase. Safe to invoke repeatedly and concurrently.
    pub fn run_election<S>(
        &self,
        store: &S,
        params: &ModerationParams,
        now: Timestamp,
    ) -> Result<Vec<UserId>, ModerationError>
    where
        S: UserStore + ModeratorStore + ?Sized,
    {
        if self.phase(store, params)? != ElectionPhase::Mature {
            return Ok(Vec::new());
        }

        let mut promoted = Vec::new();
        for candidate in self.eligible_pool(store, params)? {
            if candidate.user_type.is_moderator()
                || store.get_moderator(&candidate.id)?.is_some()
            {
                continue;
            }
            let record = ModeratorRecord {
                user_id: candidate.id.clone(),
                appointed_at: now,
                active: true,
                prior_type: candidate.user_type,
            };
            match store.insert_moderator_if_capacity(&record, params.max_moderators)? {
                SlotClaim::Claimed => {
                    store.set_user_type(&candidate.id, UserType::Moderator)?;
                    tracing::info!(user = %candidate.id, "moderator elected");
                    promoted.push(candidate.id);
                }
                SlotClaim::AlreadyPresent => {}
                SlotClaim::Full => break,
            }
        }
        Ok(promoted)
    }

    /// Users meeting the base criteria: verified email, unbanned,
    /// neither anonymous nor an organization.
    fn base_eligible<S>(&self, store: &S) -> Result<Vec<UserRecord>, ModerationError>
    where
        S: UserStore + ?Sized,
    {
        Ok(store
            .iter_users()?
            .into_iter()
            .filter(|u| {
                u.email_verified
                    && u.ban_level.as_u8() == 0
                    && !matches!(u.user_type, UserType::Organization | UserType::Anonymous)
            })
            .collect())
    }
}
