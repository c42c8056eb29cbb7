//! Veto storage trait.

use crate::StoreError;
use factum_types::{FactId, Timestamp, UserId, VetoId, VetoStatus};
use serde::{Deserialize, Serialize};

/// A challenge against a published fact.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VetoRecord {
    pub id: VetoId,
    pub fact_id: FactId,
    pub submitter: UserId,
    pub reason: String,
    pub sources: Vec<String>,
    pub status: VetoStatus,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

/// Trait for veto storage operations.
pub trait VetoStore {
    fn get_veto(&self, id: &VetoId) -> Result<VetoRecord, StoreError>;
    fn insert_veto(&self, record: &VetoRecord) -> Result<(), StoreError>;

    /// Conditionally resolve: set `status`/`resolved_at` only if the veto is
    /// still `Pending`. Returns `true` iff this call performed the
    /// transition — concurrent resolvers see `false` and fire no effects.
    fn resolve_veto_if_pending(
        &self,
        id: &VetoId,
        status: VetoStatus,
        resolved_at: Timestamp,
    ) -> Result<bool, StoreError>;

    /// Grouped count: how many of a user's submitted vetoes were rejected.
    fn rejected_veto_count(&self, submitter: &UserId) -> Result<u64, StoreError>;

    /// Grouped count over all users: (submitter, rejected count) pairs for
    /// every user with at least one rejected veto.
    fn rejected_veto_counts(&self) -> Result<Vec<(UserId, u64)>, StoreError>;
}
