//! User storage trait.

use crate::StoreError;
use factum_types::{BanLevel, Credential, Timestamp, UserId, UserType};
use serde::{Deserialize, Serialize};

/// Per-user information as the engine sees it.
///
/// The account subsystem owns the row; `trust_score` is mutated exclusively
/// through [`UserStore::add_to_trust_score`] (the trust ledger) and the ban
/// fields exclusively through [`UserStore::escalate_ban_if_level`] /
/// [`UserStore::clear_ban_expiry`] (ban escalation).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub user_type: UserType,
    /// Verified academic credential, if any. Survives moderator promotion.
    pub credential: Option<Credential>,
    /// Cached reputation — always equal to the sum of the user's trust events.
    pub trust_score: f64,
    pub ban_level: BanLevel,
    /// Expiry of the active ban. `None` with `ban_level` 3 means permanent;
    /// `None` with a lower level means no active ban.
    pub banned_until: Option<Timestamp>,
    pub email_verified: bool,
    pub last_login_at: Timestamp,
}

impl UserRecord {
    /// A fresh, unbanned record with zero trust. Test/bootstrap convenience.
    pub fn new(id: UserId, user_type: UserType, now: Timestamp) -> Self {
        Self {
            id,
            user_type,
            credential: None,
            trust_score: 0.0,
            ban_level: BanLevel::NONE,
            banned_until: None,
            email_verified: false,
            last_login_at: now,
        }
    }
}

/// Trait for user storage operations.
pub trait UserStore {
    fn get_user(&self, id: &UserId) -> Result<UserRecord, StoreError>;
    fn put_user(&self, record: &UserRecord) -> Result<(), StoreError>;
    fn user_exists(&self, id: &UserId) -> Result<bool, StoreError>;
    fn user_count(&self) -> Result<u64, StoreError>;
    fn iter_users(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Atomically add `delta` to the cached trust score and return the new
    /// value. Additive by contract — concurrent calls must not lose deltas.
    fn add_to_trust_score(&self, id: &UserId, delta: f64) -> Result<f64, StoreError>;

    /// Overwrite the cached trust score (reconciliation repair only).
    fn set_trust_score(&self, id: &UserId, score: f64) -> Result<(), StoreError>;

    /// Replace the user's type (moderator promotion/demotion).
    fn set_user_type(&self, id: &UserId, user_type: UserType) -> Result<(), StoreError>;

    /// Conditionally escalate the ban level: succeeds (returns `true`) only
    /// if the stored level still equals `expected`. The compare-and-swap
    /// guard against double escalation under concurrent ban calls.
    fn escalate_ban_if_level(
        &self,
        id: &UserId,
        expected: BanLevel,
        new_level: BanLevel,
        banned_until: Option<Timestamp>,
    ) -> Result<bool, StoreError>;

    /// Clear the active ban expiry (moderator unban). Level history stays.
    fn clear_ban_expiry(&self, id: &UserId) -> Result<(), StoreError>;
}
