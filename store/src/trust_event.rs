//! Trust-event storage trait.

use crate::StoreError;
use factum_types::{Timestamp, TrustAction, UserId};
use serde::{Deserialize, Serialize};

/// One append-only entry in a user's trust ledger. Never mutated or deleted.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrustEventRecord {
    pub user_id: UserId,
    pub action: TrustAction,
    pub delta: f64,
    pub timestamp: Timestamp,
}

/// Trait for trust-event storage operations.
pub trait TrustEventStore {
    /// Append an event. The log is append-only by contract.
    fn append_trust_event(&self, event: &TrustEventRecord) -> Result<(), StoreError>;

    /// All events for a user in append order.
    fn trust_events_for(&self, user_id: &UserId) -> Result<Vec<TrustEventRecord>, StoreError>;
}
