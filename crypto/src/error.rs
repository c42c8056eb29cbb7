use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid blocklist salt: {0}")]
    InvalidSalt(String),
}
