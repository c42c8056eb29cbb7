//! Moderation parameters — every tunable the engines read.
//!
//! Parameters are an explicitly constructed value, loaded once at startup
//! (code defaults, optionally overridden from a TOML file) and injected into
//! each engine. Nothing here is a hidden process-wide cache; runtime tuning
//! replaces the whole value through the owning engine's reload entry point.

use crate::action::TrustAction;
use crate::user::UserType;
use serde::{Deserialize, Serialize};

/// Base vote weight per user type, before the trust modifier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightBases {
    pub anonymous: f64,
    pub verified: f64,
    pub expert: f64,
    pub phd: f64,
    pub organization: f64,
    pub moderator: f64,
}

impl WeightBases {
    pub fn for_type(&self, user_type: UserType) -> f64 {
        match user_type {
            UserType::Anonymous => self.anonymous,
            UserType::Verified => self.verified,
            UserType::Expert => self.expert,
            UserType::Phd => self.phd,
            UserType::Organization => self.organization,
            UserType::Moderator => self.moderator,
        }
    }
}

impl Default for WeightBases {
    fn default() -> Self {
        Self {
            anonymous: 0.1,
            verified: 2.0,
            expert: 5.0,
            phd: 8.0,
            organization: 100.0,
            moderator: 3.0,
        }
    }
}

/// Trust-score delta per ledger action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustDeltas {
    pub fact_approved: f64,
    pub fact_wrong: f64,
    pub fact_outdated: f64,
    pub veto_success: f64,
    pub veto_fail: f64,
    pub verification_correct: f64,
    pub verification_wrong: f64,
    pub upvoted: f64,
    pub downvoted: f64,
}

impl TrustDeltas {
    pub fn for_action(&self, action: TrustAction) -> f64 {
        match action {
            TrustAction::FactApproved => self.fact_approved,
            TrustAction::FactWrong => self.fact_wrong,
            TrustAction::FactOutdated => self.fact_outdated,
            TrustAction::VetoSuccess => self.veto_success,
            TrustAction::VetoFail => self.veto_fail,
            TrustAction::VerificationCorrect => self.verification_correct,
            TrustAction::VerificationWrong => self.verification_wrong,
            TrustAction::Upvoted => self.upvoted,
            TrustAction::Downvoted => self.downvoted,
        }
    }
}

impl Default for TrustDeltas {
    fn default() -> Self {
        Self {
            fact_approved: 10.0,
            fact_wrong: -20.0,
            fact_outdated: 0.0,
            veto_success: 5.0,
            veto_fail: -5.0,
            verification_correct: 3.0,
            verification_wrong: -10.0,
            upvoted: 1.0,
            downvoted: -1.0,
        }
    }
}

/// All moderation parameters held by an engine instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationParams {
    // ── Vote weighting ───────────────────────────────────────────────────
    /// Base vote weight per user type.
    pub weight_bases: WeightBases,

    /// Whether unauthenticated (anonymous) voting is enabled at all.
    pub allow_anonymous_votes: bool,

    // ── Trust ledger ─────────────────────────────────────────────────────
    /// Points applied per trust action.
    pub trust_deltas: TrustDeltas,

    // ── Veto resolution ──────────────────────────────────────────────────
    /// Absolute net weighted score at which a pending veto resolves.
    /// Positive aggregate ⇒ approved, negative ⇒ rejected.
    pub veto_resolution_weight: f64,

    // ── Account flagging ─────────────────────────────────────────────────
    /// Rejected-veto count at which an account is auto-flagged for review.
    pub failed_veto_threshold: u64,

    // ── Ban escalation ───────────────────────────────────────────────────
    /// Duration of a level-1 ban, in days.
    pub level1_duration_days: u64,

    /// Duration of a level-2 ban, in days. Level 3 is permanent.
    pub level2_duration_days: u64,

    // ── Moderator election ───────────────────────────────────────────────
    /// Population at or below which moderators are appointed manually only.
    pub bootstrap_threshold: u64,

    /// Population at or below which appointment is manual plus automatic
    /// eligibility for the trust top slice (the "early" phase).
    pub early_threshold: u64,

    /// Size of the auto-eligible trust slice, in basis points (1000 = 10%).
    pub top_percentage_bps: u32,

    /// Minimum number of users meeting the trust criteria before the mature
    /// phase's full automatic election activates.
    pub min_trusted_for_auto: u64,

    /// Moderator slot cap.
    pub max_moderators: u32,

    /// Days without login before a moderator's slot is freed.
    pub inactive_days: u64,
}

impl ModerationParams {
    /// The shipped defaults.
    pub fn defaults() -> Self {
        Self {
            weight_bases: WeightBases::default(),
            allow_anonymous_votes: true,
            trust_deltas: TrustDeltas::default(),
            veto_resolution_weight: 10.0,
            failed_veto_threshold: 5,
            level1_duration_days: 3,
            level2_duration_days: 30,
            bootstrap_threshold: 100,
            early_threshold: 500,
            top_percentage_bps: 1000,
            min_trusted_for_auto: 100,
            max_moderators: 50,
            inactive_days: 30,
        }
    }
}

impl Default for ModerationParams {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let p = ModerationParams::defaults();
        assert_eq!(p.failed_veto_threshold, 5);
        assert_eq!(p.level1_duration_days, 3);
        assert_eq!(p.level2_duration_days, 30);
        assert_eq!(p.bootstrap_threshold, 100);
        assert_eq!(p.early_threshold, 500);
        assert_eq!(p.top_percentage_bps, 1000);
        assert_eq!(p.max_moderators, 50);
        assert_eq!(p.inactive_days, 30);
    }

    #[test]
    fn weight_bases_cover_every_type() {
        let bases = WeightBases::default();
        assert_eq!(bases.for_type(UserType::Anonymous), 0.1);
        assert_eq!(bases.for_type(UserType::Verified), 2.0);
        assert_eq!(bases.for_type(UserType::Expert), 5.0);
        assert_eq!(bases.for_type(UserType::Phd), 8.0);
        assert_eq!(bases.for_type(UserType::Organization), 100.0);
        assert_eq!(bases.for_type(UserType::Moderator), 3.0);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let params: ModerationParams =
            toml::from_str("failed_veto_threshold = 7\n").unwrap();
        assert_eq!(params.failed_veto_threshold, 7);
        assert_eq!(params.max_moderators, 50);
        assert_eq!(params.trust_deltas, TrustDeltas::default());
    }
}
