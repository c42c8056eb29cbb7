//! The moderation engine facade.
//!
//! One instance composes the sub-engines over a single store handle and a
//! single parameter value. It is also where the cross-component rules live:
//! flagged or banned users are blocked from voting, fact posting, and
//! verification submission; veto resolution feeds the trust ledger and the
//! flagging engine; a `Ban` flag review invokes ban escalation.

use crate::error::EngineError;
use factum_crypto::BlocklistSalt;
use factum_moderation::{
    AccountFlaggingEngine, BanEscalation, ElectionPhase, FlagReview, ModeratorElection,
    ReinstateOutcome,
};
use factum_store::{
    BanRecord, FlagRecord, ModerationStore, TrustEventRecord, UserRecord, VetoRecord,
};
use factum_trust::{Reconciliation, TrustLedger};
use factum_types::{
    FactId, FlagId, FlagResolution, ModerationParams, Timestamp, TrustAction, UserId, UserType,
    VetoId, VetoStatus, VoteTarget, VoteValue,
};
use factum_voting::{
    cast_anonymous_vote, cast_weighted_vote, AnonymousVoteReceipt, VetoStateMachine,
    VetoVoteOutcome, VoteReceipt,
};

/// The flat call surface over the whole trust & moderation core.
pub struct ModerationEngine<S> {
    store: S,
    params: ModerationParams,
    salt: BlocklistSalt,
    ledger: TrustLedger,
    vetoes: VetoStateMachine,
    flags: AccountFlaggingEngine,
    bans: BanEscalation,
    election: ModeratorElection,
}

impl<S: ModerationStore> ModerationEngine<S> {
    pub fn new(store: S, params: ModerationParams, salt: BlocklistSalt) -> Self {
        Self {
            store,
            params,
            salt,
            ledger: TrustLedger,
            vetoes: VetoStateMachine,
            flags: AccountFlaggingEngine,
            bans: BanEscalation,
            election: ModeratorElection,
        }
    }

    /// The active parameter value.
    pub fn params(&self) -> &ModerationParams {
        &self.params
    }

    /// Replace the parameters at runtime (admin tuning).
    pub fn reload_params(&mut self, params: ModerationParams) {
        tracing::info!("moderation parameters reloaded");
        self.params = params;
    }

    /// The underlying store handle (seeding, admin queries).
    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Voting ───────────────────────────────────────────────────────────

    /// Cast a registered user's vote on any target. Applies the author's
    /// Upvoted/Downvoted trust credit on first votes on content.
    pub fn cast_vote(
        &self,
        voter_id: &UserId,
        target: &VoteTarget,
        raw_value: i8,
        now: Timestamp,
    ) -> Result<VoteReceipt, EngineError> {
        let value = parse_value(raw_value)?;
        let voter = self.ensure_active(voter_id, now)?;
        let receipt = cast_weighted_vote(&self.store, &self.params, &voter, target, value)?;

        if let Some(author) = &receipt.author {
            let action = match value {
                VoteValue::Up => TrustAction::Upvoted,
                VoteValue::Down => TrustAction::Downvoted,
            };
            self.ledger
                .apply_event(&self.store, &self.params, author, action, now)?;
        }
        Ok(receipt)
    }

    /// Cast an anonymous vote. The raw IP is hashed here; only its salted
    /// digest reaches storage.
    pub fn cast_anonymous_vote(
        &self,
        ip: &str,
        target: &VoteTarget,
        raw_value: i8,
    ) -> Result<AnonymousVoteReceipt, EngineError> {
        let value = parse_value(raw_value)?;
        let ip_hash = factum_crypto::hash_ip(&self.salt, ip);
        Ok(cast_anonymous_vote(
            &self.store,
            &self.params,
            &ip_hash,
            target,
            value,
        )?)
    }

    // ── Vetoes ───────────────────────────────────────────────────────────

    /// Submit a veto against a published fact.
    pub fn submit_veto(
        &self,
        submitter_id: &UserId,
        fact_id: &FactId,
        reason: &str,
        sources: &[String],
        now: Timestamp,
    ) -> Result<VetoRecord, EngineError> {
        self.ensure_active(submitter_id, now)?;
        Ok(self
            .vetoes
            .submit_veto(&self.store, fact_id, submitter_id, reason, sources, now)?)
    }

    /// Vote on a pending veto. If this vote resolves it, the submitter's
    /// trust delta fires and a rejected outcome is reported to the flagging
    /// engine — each exactly once.
    pub fn vote_on_veto(
        &self,
        voter_id: &UserId,
        veto_id: &VetoId,
        raw_value: i8,
        now: Timestamp,
    ) -> Result<VetoVoteOutcome, EngineError> {
        let value = parse_value(raw_value)?;
        let voter = self.ensure_active(voter_id, now)?;
        let outcome =
            self.vetoes
                .vote_on_veto(&self.store, &self.params, &voter, veto_id, value, now)?;

        if let VetoVoteOutcome::Resolved(resolved) = &outcome {
            let action = match resolved.status {
                VetoStatus::Approved => TrustAction::VetoSuccess,
                _ => TrustAction::VetoFail,
            };
            self.ledger
                .apply_event(&self.store, &self.params, &resolved.submitter, action, now)?;

            if resolved.status == VetoStatus::Rejected {
                self.flags.note_rejected_veto(
                    &self.store,
                    &self.params,
                    &resolved.submitter,
                    now,
                )?;
            }
        }
        Ok(outcome)
    }

    // ── Verification reviews ─────────────────────────────────────────────

    /// Record the outcome of a user's verification review of a fact once
    /// the review is adjudicated. Self-reviews are denied.
    pub fn record_verification_review(
        &self,
        reviewer_id: &UserId,
        fact_id: &FactId,
        correct: bool,
        now: Timestamp,
    ) -> Result<f64, EngineError> {
        self.ensure_active(reviewer_id, now)?;
        if !self.store.fact_exists(fact_id)? {
            return Err(factum_voting::VoteError::FactNotFound(fact_id.to_string()).into());
        }
        if self.store.fact_author(fact_id)? == *reviewer_id {
            return Err(EngineError::ReviewOwnContent);
        }
        let action = if correct {
            TrustAction::VerificationCorrect
        } else {
            TrustAction::VerificationWrong
        };
        Ok(self
            .ledger
            .apply_event(&self.store, &self.params, reviewer_id, action, now)?)
    }

    // ── Trust ledger ─────────────────────────────────────────────────────

    /// Apply a trust action directly (fact approval outcomes and other
    /// events owned by collaborating subsystems).
    pub fn apply_trust_event(
        &self,
        user_id: &UserId,
        action: TrustAction,
        now: Timestamp,
    ) -> Result<f64, EngineError> {
        Ok(self
            .ledger
            .apply_event(&self.store, &self.params, user_id, action, now)?)
    }

    /// Recompute a user's cached score from the event log, repairing drift.
    pub fn reconcile_trust(&self, user_id: &UserId) -> Result<Reconciliation, EngineError> {
        Ok(self.ledger.reconcile(&self.store, user_id)?)
    }

    /// A user's trust events, newest first.
    pub fn trust_history(&self, user_id: &UserId) -> Result<Vec<TrustEventRecord>, EngineError> {
        Ok(self.ledger.history(&self.store, user_id)?)
    }

    // ── Flags ────────────────────────────────────────────────────────────

    /// Manually flag an account for review.
    pub fn flag_account(
        &self,
        user_id: &UserId,
        reason: &str,
        details: Option<&str>,
        now: Timestamp,
    ) -> Result<FlagRecord, EngineError> {
        Ok(self
            .flags
            .flag_account(&self.store, user_id, reason, details, now)?)
    }

    /// Sweep: flag every user whose rejected-veto count crossed the
    /// threshold. Idempotent; driven by an external scheduler.
    pub fn auto_flag_negative_veto_users(
        &self,
        now: Timestamp,
    ) -> Result<Vec<FlagRecord>, EngineError> {
        Ok(self
            .flags
            .auto_flag_negative_veto_users(&self.store, &self.params, now)?)
    }

    /// Claim a pending flag for review.
    pub fn begin_flag_review(
        &self,
        flag_id: &FlagId,
        reviewer_id: &UserId,
    ) -> Result<(), EngineError> {
        Ok(self.flags.begin_review(&self.store, flag_id, reviewer_id)?)
    }

    /// Resolve a flag. A `Ban` resolution escalates the user's ban level;
    /// `email`/`ip` feed the permanent blocklists if that escalation
    /// reaches level 3.
    #[allow(clippy::too_many_arguments)]
    pub fn review_flagged_account(
        &self,
        flag_id: &FlagId,
        reviewer_id: &UserId,
        resolution: FlagResolution,
        comment: Option<&str>,
        email: Option<&str>,
        ip: Option<&str>,
        now: Timestamp,
    ) -> Result<FlagReview, EngineError> {
        let review = self.flags.review_flagged_account(
            &self.store,
            flag_id,
            reviewer_id,
            resolution,
            comment,
        )?;

        if review.requires_ban {
            self.bans.ban_user(
                &self.store,
                &self.params,
                &self.salt,
                &review.user_id,
                "flag review",
                reviewer_id,
                email,
                ip,
                now,
            )?;
        }
        Ok(review)
    }

    /// Whether an open flag currently restricts the user.
    pub fn is_restricted(&self, user_id: &UserId) -> Result<bool, EngineError> {
        Ok(self.flags.is_restricted(&self.store, user_id)?)
    }

    // ── Bans ─────────────────────────────────────────────────────────────

    /// Ban a user at their next escalation level.
    pub fn ban_user(
        &self,
        user_id: &UserId,
        reason: &str,
        banned_by: &UserId,
        email: Option<&str>,
        ip: Option<&str>,
        now: Timestamp,
    ) -> Result<BanRecord, EngineError> {
        Ok(self.bans.ban_user(
            &self.store,
            &self.params,
            &self.salt,
            user_id,
            reason,
            banned_by,
            email,
            ip,
            now,
        )?)
    }

    pub fn is_user_banned(&self, user_id: &UserId, now: Timestamp) -> Result<bool, EngineError> {
        Ok(self.bans.is_user_banned(&self.store, user_id, now)?)
    }

    /// Lift an active ban early. History and level are retained.
    pub fn unban_user(
        &self,
        user_id: &UserId,
        lifted_by: &UserId,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        Ok(self.bans.unban_user(&self.store, user_id, lifted_by, now)?)
    }

    /// Registration guard: reject blocked email/IP before account creation.
    pub fn precheck_registration(&self, email: &str, ip: &str) -> Result<(), EngineError> {
        if self.bans.is_email_blocked(&self.store, &self.salt, email)? {
            return Err(EngineError::EmailBlocked);
        }
        if self.bans.is_ip_blocked(&self.store, &self.salt, ip)? {
            return Err(EngineError::IpBlocked);
        }
        Ok(())
    }

    // ── Moderators ───────────────────────────────────────────────────────

    pub fn election_phase(&self) -> Result<ElectionPhase, EngineError> {
        Ok(self.election.phase(&self.store, &self.params)?)
    }

    /// The auto-eligible moderator pool, ranked.
    pub fn eligible_moderator_pool(&self) -> Result<Vec<UserRecord>, EngineError> {
        Ok(self.election.eligible_pool(&self.store, &self.params)?)
    }

    pub fn appoint_moderator(
        &self,
        user_id: &UserId,
        appointer_id: &UserId,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        Ok(self
            .election
            .appoint_moderator(&self.store, &self.params, user_id, appointer_id, now)?)
    }

    pub fn demote_moderator(&self, user_id: &UserId) -> Result<UserType, EngineError> {
        Ok(self.election.demote_moderator(&self.store, user_id)?)
    }

    /// Park moderators inactive beyond the configured window.
    pub fn sweep_inactive_moderators(&self, now: Timestamp) -> Result<Vec<UserId>, EngineError> {
        Ok(self
            .election
            .sweep_inactive(&self.store, &self.params, now)?)
    }

    /// Fully demote moderators whose trust fell below the cutoff.
    pub fn auto_demote_moderators(&self) -> Result<Vec<UserId>, EngineError> {
        Ok(self
            .election
            .auto_demote_below_cutoff(&self.store, &self.params)?)
    }

    /// Reinstate a parked moderator with priority.
    pub fn handle_returning_moderator(
        &self,
        user_id: &UserId,
    ) -> Result<ReinstateOutcome, EngineError> {
        Ok(self
            .election
            .handle_returning_moderator(&self.store, &self.params, user_id)?)
    }

    /// Mature-phase election sweep.
    pub fn run_election(&self, now: Timestamp) -> Result<Vec<UserId>, EngineError> {
        Ok(self.election.run_election(&self.store, &self.params, now)?)
    }

    // ── Gating ───────────────────────────────────────────────────────────

    /// Fetch a user and verify they may contribute: not banned, no open
    /// flag. The shared precondition for voting, fact posting, veto
    /// submission, and verification reviews.
    pub fn ensure_active(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<UserRecord, EngineError> {
        let user = self
            .store
            .get_user(user_id)
            .map_err(|_| EngineError::UserNotFound(user_id.to_string()))?;
        if self.bans.is_user_banned(&self.store, user_id, now)? {
            return Err(EngineError::UserBanned(user_id.to_string()));
        }
        if self.flags.is_restricted(&self.store, user_id)? {
            return Err(EngineError::UserRestricted(user_id.to_string()));
        }
        Ok(user)
    }
}

fn parse_value(raw: i8) -> Result<VoteValue, EngineError> {
    VoteValue::from_raw(raw).ok_or_else(|| factum_voting::VoteError::InvalidVoteValue(raw).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use factum_nullables::{MemoryStore, NullClock};
    use factum_store::{FlagStore, UserStore};
    use factum_types::ErrorCode;

    fn engine() -> ModerationEngine<MemoryStore> {
        ModerationEngine::new(
            MemoryStore::new(),
            ModerationParams::defaults(),
            BlocklistSalt::from_bytes([3u8; 32]),
        )
    }

    fn add_user(
        engine: &ModerationEngine<MemoryStore>,
        name: &str,
        user_type: UserType,
        trust: f64,
        now: Timestamp,
    ) -> UserId {
        let mut record = UserRecord::new(UserId::new(name), user_type, now);
        record.email_verified = true;
        record.trust_score = trust;
        record.credential = match user_type {
            UserType::Expert => Some(factum_types::Credential::Expert),
            UserType::Phd => Some(factum_types::Credential::Phd),
            _ => None,
        };
        engine.store().add_user(record);
        UserId::new(name)
    }

    fn add_fact(engine: &ModerationEngine<MemoryStore>, id: &str, author: &UserId) -> FactId {
        let fact = FactId::new(id);
        engine.store().add_fact(&fact, author);
        fact
    }

    fn sources() -> Vec<String> {
        vec!["https://example.org/source".to_string()]
    }

    /// Drive a veto to rejection using an organization's heavyweight vote.
    fn reject_a_veto(
        engine: &ModerationEngine<MemoryStore>,
        submitter: &UserId,
        fact: &FactId,
        heavy: &UserId,
        now: Timestamp,
    ) {
        let veto = engine
            .submit_veto(submitter, fact, "doubtful sourcing", &sources(), now)
            .unwrap();
        let outcome = engine.vote_on_veto(heavy, &veto.id, -1, now).unwrap();
        assert!(matches!(outcome, VetoVoteOutcome::Resolved(_)));
    }

    // ── The end-to-end scenario ─────────────────────────────────────────

    #[test]
    fn verified_user_vote_review_and_flagging_scenario() {
        let engine = engine();
        let clock = NullClock::new(10_000);

        let alice = add_user(&engine, "alice", UserType::Verified, 60.0, clock.now());
        let author = add_user(&engine, "author", UserType::Verified, 0.0, clock.now());
        let heavy = add_user(&engine, "press-org", UserType::Organization, 0.0, clock.now());
        let bob = add_user(&engine, "bob", UserType::Verified, 0.0, clock.now());
        let fact = add_fact(&engine, "f-main", &author);

        // A Verified user at trust 60 votes with weight 2 × 1.2.
        let receipt = engine.cast_vote(&alice, &VoteTarget::Fact(fact.clone()), 1, clock.now()).unwrap();
        assert_eq!(receipt.weight, 2.4);
        // The fact's author got the +1 Upvoted credit.
        assert_eq!(engine.store().get_user(&author).unwrap().trust_score, 1.0);

        // Her correct verification review adds +3 trust: 60 → 63.
        clock.advance(60);
        let other_fact = add_fact(&engine, "f-other", &author);
        let score = engine
            .record_verification_review(&alice, &other_fact, true, clock.now())
            .unwrap();
        assert_eq!(score, 63.0);

        // Bob burns through five rejected vetoes.
        for i in 0..5 {
            clock.advance(60);
            let fact = add_fact(&engine, &format!("f-bob-{i}"), &author);
            reject_a_veto(&engine, &bob, &fact, &heavy, clock.now());
        }

        // Exactly one flag, with the threshold reason, and Bob is blocked.
        let flag = engine.store().open_flag_for(&bob).unwrap().unwrap();
        assert_eq!(flag.reason, factum_moderation::NEGATIVE_VETO_THRESHOLD);
        assert!(engine.is_restricted(&bob).unwrap());

        let blocked = engine.cast_vote(&bob, &VoteTarget::Fact(fact), 1, clock.now());
        assert!(matches!(blocked, Err(EngineError::UserRestricted(_))));
        assert_eq!(blocked.unwrap_err().code(), ErrorCode::PermissionDenied);

        // Five VetoFail deltas: 0 − 5×5 = −25.
        assert_eq!(engine.store().get_user(&bob).unwrap().trust_score, -25.0);
    }

    // ── Veto side effects ───────────────────────────────────────────────

    #[test]
    fn approved_veto_rewards_the_submitter_once() {
        let engine = engine();
        let now = Timestamp::new(10_000);
        let author = add_user(&engine, "author", UserType::Verified, 0.0, now);
        let challenger = add_user(&engine, "challenger", UserType::Verified, 0.0, now);
        let heavy = add_user(&engine, "org", UserType::Organization, 0.0, now);
        let fact = add_fact(&engine, "f1", &author);

        let veto = engine
            .submit_veto(&challenger, &fact, "contradicted by primary source", &sources(), now)
            .unwrap();
        let outcome = engine.vote_on_veto(&heavy, &veto.id, 1, now).unwrap();
        assert!(matches!(
            outcome,
            VetoVoteOutcome::Resolved(ref r) if r.status == VetoStatus::Approved
        ));

        // VetoSuccess: +5, applied exactly once.
        assert_eq!(engine.store().get_user(&challenger).unwrap().trust_score, 5.0);
        let history = engine.trust_history(&challenger).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, TrustAction::VetoSuccess);

        // Late votes are a Conflict, and nothing re-fires.
        let late = engine.vote_on_veto(&author, &veto.id, 1, now);
        assert_eq!(late.unwrap_err().code(), ErrorCode::Conflict);
        assert_eq!(engine.store().get_user(&challenger).unwrap().trust_score, 5.0);
    }

    #[test]
    fn invalid_vote_values_are_validation_errors() {
        let engine = engine();
        let now = Timestamp::new(10_000);
        let author = add_user(&engine, "author", UserType::Verified, 0.0, now);
        let fact = add_fact(&engine, "f1", &author);

        let result = engine.cast_vote(&author, &VoteTarget::Fact(fact), 0, now);
        assert_eq!(result.unwrap_err().code(), ErrorCode::Validation);
    }

    #[test]
    fn anonymous_votes_flow_through_the_salted_ip_digest() {
        let engine = engine();
        let now = Timestamp::new(10_000);
        let author = add_user(&engine, "author", UserType::Verified, 0.0, now);
        let fact = add_fact(&engine, "f1", &author);
        let target = VoteTarget::Fact(fact);

        let receipt = engine.cast_anonymous_vote("203.0.113.7", &target, 1).unwrap();
        assert_eq!(receipt.weight, 0.1);

        let dup = engine.cast_anonymous_vote("203.0.113.7", &target, 1);
        assert_eq!(dup.unwrap_err().code(), ErrorCode::Conflict);
    }

    // ── Bans & registration ─────────────────────────────────────────────

    #[test]
    fn level_three_ban_blocks_future_registration() {
        let engine = engine();
        let moderator = add_user(&engine, "mod", UserType::Moderator, 0.0, Timestamp::new(0));
        let repeat = add_user(&engine, "repeat", UserType::Verified, 0.0, Timestamp::new(0));
        let mut now = Timestamp::new(0);

        for _ in 0..3 {
            engine
                .ban_user(
                    &repeat,
                    "coordinated manipulation",
                    &moderator,
                    Some("repeat@example.com"),
                    Some("198.51.100.4"),
                    now,
                )
                .unwrap();
            now = now.plus_days(40);
        }

        assert!(engine.is_user_banned(&repeat, now.plus_days(10_000)).unwrap());
        let email = engine.precheck_registration("repeat@example.com", "192.0.2.1");
        assert!(matches!(email, Err(EngineError::EmailBlocked)));
        let ip = engine.precheck_registration("fresh@example.com", "198.51.100.4");
        assert!(matches!(ip, Err(EngineError::IpBlocked)));
        engine.precheck_registration("fresh@example.com", "192.0.2.1").unwrap();
    }

    #[test]
    fn banned_users_cannot_vote_until_expiry() {
        let engine = engine();
        let now = Timestamp::new(0);
        let moderator = add_user(&engine, "mod", UserType::Moderator, 0.0, now);
        let troll = add_user(&engine, "troll", UserType::Verified, 0.0, now);
        let author = add_user(&engine, "author", UserType::Verified, 0.0, now);
        let fact = add_fact(&engine, "f1", &author);

        engine.ban_user(&troll, "abuse", &moderator, None, None, now).unwrap();
        let blocked = engine.cast_vote(&troll, &VoteTarget::Fact(fact.clone()), 1, now);
        assert!(matches!(blocked, Err(EngineError::UserBanned(_))));

        // Level-1 bans lapse after three days.
        let later = now.plus_days(3).plus_secs(1);
        engine.cast_vote(&troll, &VoteTarget::Fact(fact), 1, later).unwrap();
    }

    #[test]
    fn ban_flag_review_escalates_through_the_facade() {
        let engine = engine();
        let now = Timestamp::new(0);
        let moderator = add_user(&engine, "mod", UserType::Moderator, 0.0, now);
        let spammer = add_user(&engine, "spammer", UserType::Verified, 0.0, now);

        let flag = engine.flag_account(&spammer, "spam ring", None, now).unwrap();
        let review = engine
            .review_flagged_account(
                &flag.id,
                &moderator,
                FlagResolution::Ban,
                Some("clear pattern"),
                None,
                None,
                now,
            )
            .unwrap();
        assert!(review.requires_ban);
        assert!(engine.is_user_banned(&spammer, now).unwrap());
        assert!(!engine.is_restricted(&spammer).unwrap());
    }

    // ── Moderators through the facade ───────────────────────────────────

    #[test]
    fn moderator_lifecycle_through_the_facade() {
        let engine = engine();
        let now = Timestamp::new(1_000);
        let admin = add_user(&engine, "admin", UserType::Moderator, 0.0, now);
        let expert = add_user(&engine, "expert", UserType::Expert, 80.0, now);

        engine.appoint_moderator(&expert, &admin, now).unwrap();
        assert_eq!(
            engine.store().get_user(&expert).unwrap().user_type,
            UserType::Moderator
        );

        let parked = engine.sweep_inactive_moderators(now.plus_days(31)).unwrap();
        assert_eq!(parked, vec![expert.clone()]);

        let outcome = engine.handle_returning_moderator(&expert).unwrap();
        assert_eq!(outcome, ReinstateOutcome::Reinstated);

        assert_eq!(engine.demote_moderator(&expert).unwrap(), UserType::Expert);
    }

    #[test]
    fn reload_params_takes_effect_immediately() {
        let mut engine = engine();
        let now = Timestamp::new(0);
        let author = add_user(&engine, "author", UserType::Verified, 0.0, now);
        let fact = add_fact(&engine, "f1", &author);

        let mut params = ModerationParams::defaults();
        params.allow_anonymous_votes = false;
        engine.reload_params(params);

        let result = engine.cast_anonymous_vote("203.0.113.7", &VoteTarget::Fact(fact), 1);
        assert_eq!(result.unwrap_err().code(), ErrorCode::FeatureDisabled);
    }

    #[test]
    fn reconciliation_is_exposed_end_to_end() {
        let engine = engine();
        let now = Timestamp::new(0);
        let user = add_user(&engine, "u1", UserType::Verified, 0.0, now);

        engine.apply_trust_event(&user, TrustAction::FactApproved, now).unwrap();
        engine.store().set_trust_score(&user, 42.0).unwrap();

        let rec = engine.reconcile_trust(&user).unwrap();
        assert!(rec.repaired);
        assert_eq!(rec.recomputed, 10.0);
    }

    #[test]
    fn auto_flag_sweep_is_idempotent_through_the_facade() {
        let engine = engine();
        let clock = NullClock::new(5_000);
        let author = add_user(&engine, "author", UserType::Verified, 0.0, clock.now());
        let heavy = add_user(&engine, "org", UserType::Organization, 0.0, clock.now());
        let bob = add_user(&engine, "bob", UserType::Verified, 0.0, clock.now());

        for i in 0..5 {
            clock.advance(60);
            let fact = add_fact(&engine, &format!("f{i}"), &author);
            reject_a_veto(&engine, &bob, &fact, &heavy, clock.now());
        }

        // The resolution path already flagged bob; the sweep adds nothing.
        assert!(engine.auto_flag_negative_veto_users(clock.now()).unwrap().is_empty());
        assert!(engine.is_restricted(&bob).unwrap());
    }
}
