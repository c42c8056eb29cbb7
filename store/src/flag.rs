//! Account-flag storage trait.

use crate::StoreError;
use factum_types::{FlagId, FlagResolution, FlagStatus, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// A pending-review record against a user account.
///
/// Invariant (enforced by [`FlagStore::insert_flag_if_none_open`]): at most
/// one flag per user with status Pending or Reviewing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlagRecord {
    pub id: FlagId,
    pub user_id: UserId,
    pub reason: String,
    pub details: Option<String>,
    pub status: FlagStatus,
    pub reviewed_by: Option<UserId>,
    pub resolution: Option<FlagResolution>,
    pub resolution_comment: Option<String>,
    pub created_at: Timestamp,
}

/// Trait for account-flag storage operations.
pub trait FlagStore {
    fn get_flag(&self, id: &FlagId) -> Result<FlagRecord, StoreError>;

    /// Insert only if the user has no Pending/Reviewing flag. Returns
    /// `false` (inserting nothing) when an open flag already exists — the
    /// duplicate guard for concurrent flag creation.
    fn insert_flag_if_none_open(&self, record: &FlagRecord) -> Result<bool, StoreError>;

    /// The user's open (Pending/Reviewing) flag, if any.
    fn open_flag_for(&self, user_id: &UserId) -> Result<Option<FlagRecord>, StoreError>;

    /// Conditionally move a Pending flag to Reviewing, recording the
    /// reviewer. Returns `true` iff the flag was still Pending.
    fn mark_reviewing_if_pending(
        &self,
        id: &FlagId,
        reviewer: &UserId,
    ) -> Result<bool, StoreError>;

    /// Conditionally close the flag: set the review fields only if the flag
    /// is still open. Returns `true` iff this call performed the transition.
    fn close_flag_if_open(
        &self,
        id: &FlagId,
        status: FlagStatus,
        reviewed_by: &UserId,
        resolution: FlagResolution,
        comment: Option<&str>,
    ) -> Result<bool, StoreError>;

    /// Full flag history for a user, oldest first.
    fn flags_for(&self, user_id: &UserId) -> Result<Vec<FlagRecord>, StoreError>;
}
