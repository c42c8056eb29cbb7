//! Cryptographic primitives for the factum moderation engine.
//!
//! - **Blake2b-256** for hashing
//! - The **salted blocklist digest** (64-hex-char) keying the permanent
//!   banned-email / banned-IP tables

pub mod error;
pub mod hash;

pub use error::CryptoError;
pub use hash::{
    blake2b_256, blake2b_256_multi, hash_email, hash_ip, salted_digest, BlocklistSalt,
    DIGEST_HEX_LEN,
};
