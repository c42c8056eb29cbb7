//! Trust — vote-weight computation and the reputation ledger.
//!
//! A user's trust score is the sum of an append-only event log. The weight a
//! vote carries is `base(user type) × modifier(trust score)`.

pub mod error;
pub mod ledger;
pub mod weight;

pub use error::TrustError;
pub use ledger::{Reconciliation, TrustLedger};
pub use weight::{trust_modifier, vote_weight};
