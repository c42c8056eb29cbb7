//! Permanent email/IP blocklist storage trait.
//!
//! Rows hold only salted digests, never plaintext, and are never deleted
//! through normal flow.

use crate::StoreError;
use factum_types::Timestamp;
use serde::{Deserialize, Serialize};

/// One blocklist entry, keyed by a 64-hex-char salted digest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockedEntry {
    pub hash: String,
    pub created_at: Timestamp,
}

/// Trait for blocklist storage operations.
pub trait BlocklistStore {
    /// Record an email digest. Idempotent — re-adding an existing digest is
    /// not an error.
    fn add_banned_email(&self, hash: &str, now: Timestamp) -> Result<(), StoreError>;

    /// Record an IP digest. Idempotent.
    fn add_banned_ip(&self, hash: &str, now: Timestamp) -> Result<(), StoreError>;

    fn is_email_hash_banned(&self, hash: &str) -> Result<bool, StoreError>;
    fn is_ip_hash_banned(&self, hash: &str) -> Result<bool, StoreError>;
}
