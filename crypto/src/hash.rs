//! Blake2b hashing and the salted blocklist digest.
//!
//! Level-3 bans propagate to email/IP blocklists that must never hold
//! plaintext. Entries are keyed by a salted Blake2b-256 digest rendered as a
//! fixed-length 64-character hex string; the salt is generated once at
//! deployment and shared by every node consulting the lists.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

type Blake2b256 = Blake2b<U32>;

/// Length of a rendered digest: 32 bytes as hex.
pub const DIGEST_HEX_LEN: usize = 64;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// The deployment-wide salt mixed into every blocklist digest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocklistSalt([u8; 32]);

impl BlocklistSalt {
    /// Generate a fresh random salt from the OS entropy source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill_bytes(&mut rand::rng(), &mut bytes);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse a salt from its 64-character hex rendering.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let raw = hex::decode(s).map_err(|e| CryptoError::InvalidSalt(e.to_string()))?;
        let bytes: [u8; 32] = raw
            .try_into()
            .map_err(|_| CryptoError::InvalidSalt("salt must be 32 bytes".into()))?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Salted digest of an arbitrary input, as a 64-character lowercase hex string.
pub fn salted_digest(salt: &BlocklistSalt, input: &[u8]) -> String {
    hex::encode(blake2b_256_multi(&[&salt.0, input]))
}

/// Digest of an email address for the banned-email list.
///
/// Emails are case-insensitive in practice, so the input is trimmed and
/// lowercased before hashing — `Foo@Bar.com` and `foo@bar.com` must collide.
pub fn hash_email(salt: &BlocklistSalt, email: &str) -> String {
    let normalized = email.trim().to_lowercase();
    salted_digest(salt, normalized.as_bytes())
}

/// Digest of an IP address for the banned-IP list.
pub fn hash_ip(salt: &BlocklistSalt, ip: &str) -> String {
    salted_digest(salt, ip.trim().as_bytes())
}
