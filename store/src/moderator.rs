//! Moderator-slot storage trait.

use crate::StoreError;
use factum_types::{Timestamp, UserId, UserType};
use serde::{Deserialize, Serialize};

/// A held (or parked) moderator slot.
///
/// `active == false` marks an inactivity-parked moderator: the slot is
/// freed but the record survives so reinstatement can restore it. Only
/// active records count against the slot cap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModeratorRecord {
    pub user_id: UserId,
    pub appointed_at: Timestamp,
    pub active: bool,
    /// The user type held before promotion, restored on demotion.
    pub prior_type: UserType,
}

/// Outcome of a slot-guarded insert/activate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotClaim {
    /// The record was inserted/activated and now occupies a slot.
    Claimed,
    /// The user already holds a record; nothing changed.
    AlreadyPresent,
    /// All `max_active` slots are taken.
    Full,
}

/// Trait for moderator storage operations.
pub trait ModeratorStore {
    fn get_moderator(&self, user_id: &UserId) -> Result<Option<ModeratorRecord>, StoreError>;
    fn iter_moderators(&self) -> Result<Vec<ModeratorRecord>, StoreError>;

    /// Number of records currently occupying a slot (`active == true`).
    fn active_moderator_count(&self) -> Result<u64, StoreError>;

    /// Atomically check the active count against `max_active` and insert the
    /// record. The check-and-insert is one guarded step so concurrent
    /// appointments cannot overshoot the cap.
    fn insert_moderator_if_capacity(
        &self,
        record: &ModeratorRecord,
        max_active: u32,
    ) -> Result<SlotClaim, StoreError>;

    /// Atomically re-activate a parked record under the same capacity guard.
    fn activate_moderator_if_capacity(
        &self,
        user_id: &UserId,
        max_active: u32,
    ) -> Result<SlotClaim, StoreError>;

    /// Park an active record (inactivity). Returns `false` if the record was
    /// missing or already parked.
    fn deactivate_moderator(&self, user_id: &UserId) -> Result<bool, StoreError>;

    /// Drop the record entirely (full demotion). Returns `false` if absent.
    fn remove_moderator(&self, user_id: &UserId) -> Result<bool, StoreError>;
}
