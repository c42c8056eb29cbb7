//! Vote-weight computation: base weight by user type × trust modifier.

use factum_types::{ModerationParams, UserType};

/// The trust modifier — a step function of the voter's trust score.
///
/// Band edges are inclusive on the lower side; a score at or below −60 (more
/// precisely, below −50) zeroes out the vote without deleting it.
pub fn trust_modifier(trust_score: f64) -> f64 {
    if trust_score >= 100.0 {
        1.5
    } else if trust_score >= 50.0 {
        1.2
    } else if trust_score >= 0.0 {
        1.0
    } else if trust_score >= -25.0 {
        0.5
    } else if trust_score >= -50.0 {
        0.25
    } else {
        0.0
    }
}

/// The weight a voter's ±1 vote carries.
///
/// Total function: every (type, score) pair yields a weight, no errors.
pub fn vote_weight(user_type: UserType, trust_score: f64, params: &ModerationParams) -> f64 {
    params.weight_bases.for_type(user_type) * trust_modifier(trust_score)
}
