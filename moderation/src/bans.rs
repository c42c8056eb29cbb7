//! Progressive ban escalation.
//!
//! Each ban moves the user one level up, capped at 3. Levels 1 and 2 expire;
//! level 3 is permanent and propagates to the email/IP blocklists as salted
//! digests. Escalation is a compare-and-swap on the stored level so
//! concurrent ban calls cannot double-step.

use crate::error::ModerationError;
use factum_crypto::{hash_email, hash_ip, BlocklistSalt};
use factum_store::{BanRecord, BanStore, BlocklistStore, UserStore};
use factum_types::{BanLevel, ModerationParams, Timestamp, UserId};

/// Engine for ban escalation and the permanent blocklists.
pub struct BanEscalation;

impl BanEscalation {
    /// Ban a user at their next escalation level.
    ///
    /// `email`/`ip` are only consulted when the ban reaches level 3: their
    /// salted digests are added to the permanent blocklists. Plaintext is
    /// never stored.
    #[allow(clippy::too_many_arguments)]
    pub fn ban_user<S>(
        &self,
        store: &S,
        params: &ModerationParams,
        salt: &BlocklistSalt,
        user_id: &UserId,
        reason: &str,
        banned_by: &UserId,
        email: Option<&str>,
        ip: Option<&str>,
        now: Timestamp,
    ) -> Result<BanRecord, ModerationError>
    where
        S: UserStore + BanStore + BlocklistStore + ?Sized,
    {
        let user = store
            .get_user(user_id)
            .map_err(|_| ModerationError::UserNotFound(user_id.to_string()))?;

        if user.ban_level.is_permanent() {
            if let Some(active) = store.active_ban_for(user_id, now)? {
                if active.expires_at.is_none() {
                    return Err(ModerationError::AlreadyPermanentlyBanned(
                        user_id.to_string(),
                    ));
                }
            }
        }

        let next = user.ban_level.next();
        let expires_at = if next.is_permanent() {
            None
        } else if next == BanLevel::new(1) {
            Some(now.plus_days(params.level1_duration_days))
        } else {
            Some(now.plus_days(params.level2_duration_days))
        };

        if !store.escalate_ban_if_level(user_id, user.ban_level, next, expires_at)? {
            return Err(ModerationError::ConcurrentEscalation(user_id.to_string()));
        }

        let record = BanRecord {
            user_id: user_id.clone(),
            level: next,
            reason: reason.to_string(),
            banned_by: banned_by.clone(),
            expires_at,
            created_at: now,
            lifted_at: None,
            lifted_by: None,
        };
        store.insert_ban(&record)?;

        if next.is_permanent() {
            if let Some(email) = email {
                store.add_banned_email(&hash_email(salt, email), now)?;
            }
            if let Some(ip) = ip {
                store.add_banned_ip(&hash_ip(salt, ip), now)?;
            }
        }

        tracing::info!(
            user = %user_id,
            level = next.as_u8(),
            permanent = next.is_permanent(),
            "user banned"
        );
        Ok(record)
    }

    /// Whether the user is under an active ban at `now`. Expired bans keep
    /// their level history but no longer enforce.
    pub fn is_user_banned<S>(
        &self,
        store: &S,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<bool, ModerationError>
    where
        S: UserStore + BanStore + ?Sized,
    {
        if !store.user_exists(user_id)? {
            return Err(ModerationError::UserNotFound(user_id.to_string()));
        }
        Ok(store.active_ban_for(user_id, now)?.is_some())
    }

    /// Lift the active ban early (moderator action). Ban history and the
    /// reached level are retained.
    pub fn unban_user<S>(
        &self,
        store: &S,
        user_id: &UserId,
        lifted_by: &UserId,
        now: Timestamp,
    ) -> Result<(), ModerationError>
    where
        S: UserStore + BanStore + ?Sized,
    {
        if !store.user_exists(user_id)? {
            return Err(ModerationError::UserNotFound(user_id.to_string()));
        }
        if !store.lift_active_ban(user_id, lifted_by, now)? {
            return Err(ModerationError::NoActiveBan(user_id.to_string()));
        }
        store.clear_ban_expiry(user_id)?;

        tracing::info!(user = %user_id, by = %lifted_by, "ban lifted");
        Ok(())
    }

    /// Registration guard: is this email on the permanent blocklist?
    pub fn is_email_blocked<S>(
        &self,
        store: &S,
        salt: &BlocklistSalt,
        email: &str,
    ) -> Result<bool, ModerationError>
    where
        S: BlocklistStore + ?Sized,
    {
        Ok(store.is_email_hash_banned(&hash_email(salt, email))?)
    }

    /// Registration guard: is this IP on the permanent blocklist?
    pub fn is_ip_blocked<S>(
        &self,
        store: &S,
        salt: &BlocklistSalt,
        ip: &str,
    ) -> Result<bool, ModerationError>
    where
        S: BlocklistStore + ?Sized,
    {
        Ok(store.is_ip_hash_banned(&hash_ip(salt, ip))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factum_nullables::MemoryStore;
    use factum_store::{UserRecord, UserStore};
    use factum_types::UserType;

    const DAY: u64 = 24 * 3600;

    fn salt() -> BlocklistSalt {
        BlocklistSalt::from_bytes([9u8; 32])
    }

    fn store_with_user(name: &str) -> MemoryStore {
        let store = MemoryStore::new();
        store.add_user(UserRecord::new(
            UserId::new(name),
            UserType::Verified,
            Timestamp::new(0),
        ));
        store
    }

    fn moderator() -> UserId {
        UserId::new("mod")
    }

    #[test]
    fn first_ban_is_level_one_for_three_days() {
        let store = store_with_user("u1");
        let params = ModerationParams::defaults();
        let now = Timestamp::new(100_000);

        let ban = BanEscalation
            .ban_user(&store, &params, &salt(), &UserId::new("u1"), "spam", &moderator(), None, None, now)
            .unwrap();

        assert_eq!(ban.level.as_u8(), 1);
        assert_eq!(ban.expires_at, Some(now.plus_days(3)));
        let user = store.get_user(&UserId::new("u1")).unwrap();
        assert_eq!(user.ban_level.as_u8(), 1);
        assert_eq!(user.banned_until, Some(now.plus_days(3)));
        assert!(BanEscalation
            .is_user_banned(&store, &UserId::new("u1"), now)
            .unwrap());
    }

    #[test]
    fn escalation_runs_one_two_three_with_durations() {
        let store = store_with_user("u1");
        let params = ModerationParams::defaults();
        let user_id = UserId::new("u1");
        let mut now = Timestamp::new(0);

        let first = BanEscalation
            .ban_user(&store, &params, &salt(), &user_id, "spam", &moderator(), None, None, now)
            .unwrap();
        assert_eq!(first.level.as_u8(), 1);
        assert_eq!(first.expires_at, Some(now.plus_days(3)));

        // Let the level-1 ban lapse, then re-offend.
        now = now.plus_days(4);
        assert!(!BanEscalation.is_user_banned(&store, &user_id, now).unwrap());
        let second = BanEscalation
            .ban_user(&store, &params, &salt(), &user_id, "spam again", &moderator(), None, None, now)
            .unwrap();
        assert_eq!(second.level.as_u8(), 2);
        assert_eq!(second.expires_at, Some(now.plus_days(30)));

        now = now.plus_days(31);
        let third = BanEscalation
            .ban_user(
                &store,
                &params,
                &salt(),
                &user_id,
                "incorrigible",
                &moderator(),
                Some("u1@example.com"),
                Some("203.0.113.7"),
                now,
            )
            .unwrap();
        assert_eq!(third.level.as_u8(), 3);
        assert_eq!(third.expires_at, None);
        assert!(BanEscalation.is_user_banned(&store, &user_id, now.plus_days(10_000)).unwrap());

        // Level 3 populated both blocklists.
        assert!(BanEscalation
            .is_email_blocked(&store, &salt(), "u1@example.com")
            .unwrap());
        assert!(BanEscalation
            .is_ip_blocked(&store, &salt(), "203.0.113.7")
            .unwrap());
        assert!(!BanEscalation
            .is_email_blocked(&store, &salt(), "other@example.com")
            .unwrap());
    }

    #[test]
    fn lower_level_bans_do_not_touch_blocklists() {
        let store = store_with_user("u1");
        let params = ModerationParams::defaults();

        BanEscalation
            .ban_user(
                &store,
                &params,
                &salt(),
                &UserId::new("u1"),
                "spam",
                &moderator(),
                Some("u1@example.com"),
                Some("203.0.113.7"),
                Timestamp::new(0),
            )
            .unwrap();

        assert!(!BanEscalation
            .is_email_blocked(&store, &salt(), "u1@example.com")
            .unwrap());
        assert!(!BanEscalation
            .is_ip_blocked(&store, &salt(), "203.0.113.7")
            .unwrap());
    }

    #[test]
    fn ban_expiry_lapses_but_level_history_stays() {
        let store = store_with_user("u1");
        let params = ModerationParams::defaults();
        let user_id = UserId::new("u1");
        let now = Timestamp::new(0);

        BanEscalation
            .ban_user(&store, &params, &salt(), &user_id, "spam", &moderator(), None, None, now)
            .unwrap();

        let after = now.plus_days(3).plus_secs(1);
        assert!(!BanEscalation.is_user_banned(&store, &user_id, after).unwrap());
        assert_eq!(store.get_user(&user_id).unwrap().ban_level.as_u8(), 1);
    }

    #[test]
    fn unban_lifts_early_but_keeps_history_and_level() {
        let store = store_with_user("u1");
        let params = ModerationParams::defaults();
        let user_id = UserId::new("u1");
        let now = Timestamp::new(0);

        BanEscalation
            .ban_user(&store, &params, &salt(), &user_id, "spam", &moderator(), None, None, now)
            .unwrap();
        BanEscalation
            .unban_user(&store, &user_id, &moderator(), now.plus_days(1))
            .unwrap();

        assert!(!BanEscalation
            .is_user_banned(&store, &user_id, now.plus_days(1).plus_secs(1))
            .unwrap());
        let user = store.get_user(&user_id).unwrap();
        assert_eq!(user.ban_level.as_u8(), 1);
        assert_eq!(user.banned_until, None);

        use factum_store::BanStore;
        let history = store.ban_history(&user_id).unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].lifted_at.is_some());
    }

    #[test]
    fn unban_without_active_ban_is_a_conflict() {
        let store = store_with_user("u1");
        let result = BanEscalation.unban_user(
            &store,
            &UserId::new("u1"),
            &moderator(),
            Timestamp::new(0),
        );
        assert!(matches!(result, Err(ModerationError::NoActiveBan(_))));
        assert_eq!(result.unwrap_err().code(), factum_types::ErrorCode::Conflict);
    }

    #[test]
    fn banning_a_permanently_banned_user_is_a_conflict() {
        let store = store_with_user("u1");
        let params = ModerationParams::defaults();
        let user_id = UserId::new("u1");
        let mut now = Timestamp::new(0);

        for _ in 0..3 {
            BanEscalation
                .ban_user(&store, &params, &salt(), &user_id, "spam", &moderator(), None, None, now)
                .unwrap();
            now = now.plus_days(40);
        }

        let result = BanEscalation.ban_user(
            &store,
            &params,
            &salt(),
            &user_id,
            "again",
            &moderator(),
            None,
            None,
            now,
        );
        assert!(matches!(
            result,
            Err(ModerationError::AlreadyPermanentlyBanned(_))
        ));
    }

    #[test]
    fn banning_unknown_user_fails() {
        let store = MemoryStore::new();
        let params = ModerationParams::defaults();
        let result = BanEscalation.ban_user(
            &store,
            &params,
            &salt(),
            &UserId::new("ghost"),
            "spam",
            &moderator(),
            None,
            None,
            Timestamp::new(0),
        );
        assert!(matches!(result, Err(ModerationError::UserNotFound(_))));
    }

    #[test]
    fn custom_durations_are_respected() {
        let store = store_with_user("u1");
        let mut params = ModerationParams::defaults();
        params.level1_duration_days = 7;
        let now = Timestamp::new(0);

        let ban = BanEscalation
            .ban_user(&store, &params, &salt(), &UserId::new("u1"), "spam", &moderator(), None, None, now)
            .unwrap();
        assert_eq!(ban.expires_at, Some(Timestamp::new(7 * DAY)));
    }
}
