//! Content collaborator traits — facts and votable targets.
//!
//! The fact/discussion/comment subsystems own their rows; the engine only
//! needs existence checks, the author (for vote trust credit), an aggregate
//! score it can nudge, and the fact-status transition fired by veto
//! resolution.

use crate::StoreError;
use factum_types::{FactId, UserId, VoteTarget};
use serde::{Deserialize, Serialize};

/// Publication state of a fact, as far as the moderation engine cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactStatus {
    /// Live and citable.
    Published,
    /// Under an open veto.
    Disputed,
    /// A veto against it was approved; no longer presented as true.
    Retracted,
}

/// Trait for the fact collaborator.
pub trait FactStore {
    fn fact_exists(&self, id: &FactId) -> Result<bool, StoreError>;
    fn fact_author(&self, id: &FactId) -> Result<UserId, StoreError>;
    fn fact_status(&self, id: &FactId) -> Result<FactStatus, StoreError>;
    fn set_fact_status(&self, id: &FactId, status: FactStatus) -> Result<(), StoreError>;
}

/// Trait for any votable target's aggregate state.
pub trait ContentStore {
    fn target_exists(&self, target: &VoteTarget) -> Result<bool, StoreError>;

    /// The author of the targeted content, `None` for targets without
    /// author-credit semantics (vetoes).
    fn target_author(&self, target: &VoteTarget) -> Result<Option<UserId>, StoreError>;

    /// Atomically add `delta` to the target's aggregate weighted score and
    /// return the new aggregate.
    fn apply_target_score_delta(
        &self,
        target: &VoteTarget,
        delta: f64,
    ) -> Result<f64, StoreError>;
}
