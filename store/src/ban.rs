//! Ban storage trait.

use crate::StoreError;
use factum_types::{BanLevel, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// One ban in a user's immutable ban history.
///
/// `expires_at == None` means permanent. A lifted ban keeps its row;
/// `lifted_at`/`lifted_by` record the early unban.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BanRecord {
    pub user_id: UserId,
    pub level: BanLevel,
    pub reason: String,
    pub banned_by: UserId,
    pub expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub lifted_at: Option<Timestamp>,
    pub lifted_by: Option<UserId>,
}

impl BanRecord {
    /// Whether this ban is still in force at `now`.
    pub fn is_active(&self, now: Timestamp) -> bool {
        if self.lifted_at.is_some() {
            return false;
        }
        match self.expires_at {
            None => true,
            Some(expiry) => expiry > now,
        }
    }
}

/// Trait for ban storage operations.
pub trait BanStore {
    /// Append a ban to the history.
    fn insert_ban(&self, record: &BanRecord) -> Result<(), StoreError>;

    /// The user's currently active ban, if any.
    fn active_ban_for(&self, user_id: &UserId, now: Timestamp)
        -> Result<Option<BanRecord>, StoreError>;

    /// Full ban history, oldest first. Rows are never deleted.
    fn ban_history(&self, user_id: &UserId) -> Result<Vec<BanRecord>, StoreError>;

    /// Mark the user's active ban as lifted. Returns `false` if there was
    /// no active ban to lift.
    fn lift_active_ban(
        &self,
        user_id: &UserId,
        lifted_by: &UserId,
        now: Timestamp,
    ) -> Result<bool, StoreError>;
}
