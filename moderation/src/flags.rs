//! Account flagging — raising review flags and processing their review.
//!
//! Flags never sanction anyone by themselves: a threshold crossing raises a
//! flag, and only a moderator's explicit `Ban` resolution escalates to
//! BanEscalation (driven by the caller off the returned review).

use crate::error::ModerationError;
use factum_store::{FlagRecord, FlagStore, UserStore, VetoStore};
use factum_types::{FlagId, FlagResolution, FlagStatus, ModerationParams, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Reason string recorded on auto-raised flags.
pub const NEGATIVE_VETO_THRESHOLD: &str = "NEGATIVE_VETO_THRESHOLD";

/// A completed flag review.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlagReview {
    pub flag_id: FlagId,
    pub user_id: UserId,
    pub resolution: FlagResolution,
    /// `true` for Ban resolutions — the caller must invoke ban escalation.
    pub requires_ban: bool,
}

/// Engine for account-flag lifecycle.
pub struct AccountFlaggingEngine;

impl AccountFlaggingEngine {
    /// Raise a flag against a user. Fails `AlreadyFlagged` if the user
    /// already has a Pending/Reviewing flag.
    pub fn flag_account<S>(
        &self,
        store: &S,
        user_id: &UserId,
        reason: &str,
        details: Option<&str>,
        now: Timestamp,
    ) -> Result<FlagRecord, ModerationError>
    where
        S: UserStore + FlagStore + ?Sized,
    {
        if !store.user_exists(user_id)? {
            return Err(ModerationError::UserNotFound(user_id.to_string()));
        }

        let record = FlagRecord {
            id: Self::mint_id(user_id, now),
            user_id: user_id.clone(),
            reason: reason.to_string(),
            details: details.map(str::to_string),
            status: FlagStatus::Pending,
            reviewed_by: None,
            resolution: None,
            resolution_comment: None,
            created_at: now,
        };
        if !store.insert_flag_if_none_open(&record)? {
            return Err(ModerationError::AlreadyFlagged(user_id.to_string()));
        }

        tracing::info!(user = %user_id, reason, "account flagged");
        Ok(record)
    }

    /// Sweep all users whose rejected-veto count crossed the threshold and
    /// flag each one that has no open flag. Idempotent: re-running creates
    /// nothing new while the flags stay open.
    pub fn auto_flag_negative_veto_users<S>(
        &self,
        store: &S,
        params: &ModerationParams,
        now: Timestamp,
    ) -> Result<Vec<FlagRecord>, ModerationError>
    where
        S: UserStore + FlagStore + VetoStore + ?Sized,
    {
        let mut created = Vec::new();
        for (user_id, rejected) in store.rejected_veto_counts()? {
            if rejected < params.failed_veto_threshold {
                continue;
            }
            match self.flag_account(
                store,
                &user_id,
                NEGATIVE_VETO_THRESHOLD,
                Some(&format!("{rejected} rejected vetoes")),
                now,
            ) {
                Ok(record) => created.push(record),
                Err(ModerationError::AlreadyFlagged(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }

    /// Threshold check for one user, invoked when one of their vetoes is
    /// rejected. Returns the flag if this rejection crossed the threshold.
    pub fn note_rejected_veto<S>(
        &self,
        store: &S,
        params: &ModerationParams,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Option<FlagRecord>, ModerationError>
    where
        S: UserStore + FlagStore + VetoStore + ?Sized,
    {
        if store.rejected_veto_count(user_id)? < params.failed_veto_threshold {
            return Ok(None);
        }
        match self.flag_account(store, user_id, NEGATIVE_VETO_THRESHOLD, None, now) {
            Ok(record) => Ok(Some(record)),
            Err(ModerationError::AlreadyFlagged(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Claim a Pending flag for review.
    pub fn begin_review<S>(
        &self,
        store: &S,
        flag_id: &FlagId,
        reviewer: &UserId,
    ) -> Result<(), ModerationError>
    where
        S: UserStore + FlagStore + ?Sized,
    {
        let flag = store
            .get_flag(flag_id)
            .map_err(|_| ModerationError::FlagNotFound(flag_id.to_string()))?;
        self.check_reviewer(store, &flag, reviewer)?;
        match flag.status {
            FlagStatus::Pending => {}
            FlagStatus::Reviewing => {
                return Err(ModerationError::AlreadyUnderReview(flag_id.to_string()))
            }
            _ => return Err(ModerationError::AlreadyResolved(flag_id.to_string())),
        }
        if !store.mark_reviewing_if_pending(flag_id, reviewer)? {
            return Err(ModerationError::AlreadyUnderReview(flag_id.to_string()));
        }
        Ok(())
    }

    /// Resolve a flag. `Dismiss` closes it as Dismissed; `Warn` and `Ban`
    /// close it as Resolved. A `Ban` review does not ban by itself — the
    /// returned `requires_ban` tells the caller to invoke ban escalation.
    pub fn review_flagged_account<S>(
        &self,
        store: &S,
        flag_id: &FlagId,
        reviewer: &UserId,
        resolution: FlagResolution,
        comment: Option<&str>,
    ) -> Result<FlagReview, ModerationError>
    where
        S: UserStore + FlagStore + ?Sized,
    {
        let flag = store
            .get_flag(flag_id)
            .map_err(|_| ModerationError::FlagNotFound(flag_id.to_string()))?;
        if !flag.status.is_open() {
            return Err(ModerationError::AlreadyResolved(flag_id.to_string()));
        }
        self.check_reviewer(store, &flag, reviewer)?;

        let status = match resolution {
            FlagResolution::Dismiss => FlagStatus::Dismissed,
            FlagResolution::Warn | FlagResolution::Ban => FlagStatus::Resolved,
        };
        if !store.close_flag_if_open(flag_id, status, reviewer, resolution, comment)? {
            return Err(ModerationError::AlreadyResolved(flag_id.to_string()));
        }

        tracing::info!(
            flag = %flag_id,
            user = %flag.user_id,
            ?resolution,
            reviewer = %reviewer,
            "flag reviewed"
        );

        Ok(FlagReview {
            flag_id: flag_id.clone(),
            user_id: flag.user_id,
            resolution,
            requires_ban: matches!(resolution, FlagResolution::Ban),
        })
    }

    /// Whether the user is currently blocked from voting, posting facts,
    /// and submitting verifications.
    pub fn is_restricted<S>(&self, store: &S, user_id: &UserId) -> Result<bool, ModerationError>
    where
        S: FlagStore + ?Sized,
    {
        Ok(store.open_flag_for(user_id)?.is_some())
    }

    fn check_reviewer<S>(
        &self,
        store: &S,
        flag: &FlagRecord,
        reviewer: &UserId,
    ) -> Result<(), ModerationError>
    where
        S: UserStore + FlagStore + ?Sized,
    {
        let reviewer_record = store
            .get_user(reviewer)
            .map_err(|_| ModerationError::UserNotFound(reviewer.to_string()))?;
        if !reviewer_record.user_type.is_moderator() {
            return Err(ModerationError::ReviewerNotModerator(reviewer.to_string()));
        }
        if flag.user_id == *reviewer {
            return Err(ModerationError::SelfReview);
        }
        Ok(())
    }

    fn mint_id(user_id: &UserId, now: Timestamp) -> FlagId {
        let digest = factum_crypto::blake2b_256_multi(&[
            b"flag",
            user_id.as_str().as_bytes(),
            &now.as_secs().to_le_bytes(),
        ]);
        FlagId::new(hex::encode(&digest[..16]))
    }
}
