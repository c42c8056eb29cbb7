//! Nullable store — thread-safe in-memory storage for testing.
//!
//! One mutex guards every table, which makes the conditional-update methods
//! genuinely atomic: a compare-and-swap observed under the lock matches what
//! a real backend's conditional write would do.

use factum_store::{
    AnonymousVoteRecord, BanRecord, BanStore, BlockedEntry, BlocklistStore, ContentStore,
    FactStatus, FactStore, FlagRecord, FlagStore, ModeratorRecord, ModeratorStore, SlotClaim,
    StoreError, TrustEventRecord, TrustEventStore, UserRecord, UserStore, VetoRecord, VetoStore,
    VoteRecord, VoteStore,
};
use factum_types::{
    BanLevel, FactId, FlagId, FlagResolution, FlagStatus, Timestamp, UserId, VetoId, VetoStatus,
    VoteTarget,
};
use std::collections::HashMap;
use std::sync::Mutex;

/// Seeded content (discussion/comment) row: just an author.
#[derive(Clone, Debug)]
struct ContentSeed {
    author: UserId,
}

/// Seeded fact row.
#[derive(Clone, Debug)]
struct FactSeed {
    author: UserId,
    status: FactStatus,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, UserRecord>,
    trust_events: Vec<TrustEventRecord>,
    votes: HashMap<String, VoteRecord>,
    anonymous_votes: HashMap<String, AnonymousVoteRecord>,
    vetoes: HashMap<String, VetoRecord>,
    facts: HashMap<String, FactSeed>,
    content: HashMap<String, ContentSeed>,
    target_scores: HashMap<String, f64>,
    flags: HashMap<String, FlagRecord>,
    bans: Vec<BanRecord>,
    banned_emails: HashMap<String, BlockedEntry>,
    banned_ips: HashMap<String, BlockedEntry>,
    moderators: HashMap<String, ModeratorRecord>,
}

/// An in-memory implementation of every store trait.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user row.
    pub fn add_user(&self, record: UserRecord) {
        self.inner
            .lock()
            .unwrap()
            .users
            .insert(record.id.to_string(), record);
    }

    /// Seed a published fact.
    pub fn add_fact(&self, id: &FactId, author: &UserId) {
        self.inner.lock().unwrap().facts.insert(
            id.to_string(),
            FactSeed {
                author: author.clone(),
                status: FactStatus::Published,
            },
        );
    }

    /// Seed a votable discussion or comment target.
    pub fn add_content(&self, target: &VoteTarget, author: &UserId) {
        self.inner.lock().unwrap().content.insert(
            target.to_string(),
            ContentSeed {
                author: author.clone(),
            },
        );
    }

    fn vote_key(voter: &UserId, target: &VoteTarget) -> String {
        format!("{voter}|{target}")
    }

    fn anon_key(ip_hash: &str, target: &VoteTarget) -> String {
        format!("{ip_hash}|{target}")
    }
}

impl UserStore for MemoryStore {
    fn get_user(&self, id: &UserId) -> Result<UserRecord, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .users
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn put_user(&self, record: &UserRecord) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .users
            .insert(record.id.to_string(), record.clone());
        Ok(())
    }

    fn user_exists(&self, id: &UserId) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().users.contains_key(id.as_str()))
    }

    fn user_count(&self) -> Result<u64, StoreError> {
        Ok(self.inner.lock().unwrap().users.len() as u64)
    }

    fn iter_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.inner.lock().unwrap().users.values().cloned().collect())
    }

    fn add_to_trust_score(&self, id: &UserId, delta: f64) -> Result<f64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        user.trust_score += delta;
        Ok(user.trust_score)
    }

    fn set_trust_score(&self, id: &UserId, score: f64) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        user.trust_score = score;
        Ok(())
    }

    fn set_user_type(&self, id: &UserId, user_type: factum_types::UserType) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        user.user_type = user_type;
        Ok(())
    }

    fn escalate_ban_if_level(
        &self,
        id: &UserId,
        expected: BanLevel,
        new_level: BanLevel,
        banned_until: Option<Timestamp>,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if user.ban_level != expected {
            return Ok(false);
        }
        user.ban_level = new_level;
        user.banned_until = banned_until;
        Ok(true)
    }

    fn clear_ban_expiry(&self, id: &UserId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        user.banned_until = None;
        Ok(())
    }
}

impl TrustEventStore for MemoryStore {
    fn append_trust_event(&self, event: &TrustEventRecord) -> Result<(), StoreError> {
        self.inner.lock().unwrap().trust_events.push(event.clone());
        Ok(())
    }

    fn trust_events_for(&self, user_id: &UserId) -> Result<Vec<TrustEventRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .trust_events
            .iter()
            .filter(|e| e.user_id == *user_id)
            .cloned()
            .collect())
    }
}

impl VoteStore for MemoryStore {
    fn get_vote(
        &self,
        voter: &UserId,
        target: &VoteTarget,
    ) -> Result<Option<VoteRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .votes
            .get(&Self::vote_key(voter, target))
            .cloned())
    }

    fn upsert_vote(&self, record: &VoteRecord) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .votes
            .insert(Self::vote_key(&record.voter, &record.target), record.clone());
        Ok(())
    }

    fn votes_for_target(&self, target: &VoteTarget) -> Result<Vec<VoteRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .votes
            .values()
            .filter(|v| v.target == *target)
            .cloned()
            .collect())
    }

    fn insert_anonymous_vote_if_absent(
        &self,
        record: &AnonymousVoteRecord,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let key = Self::anon_key(&record.ip_hash, &record.target);
        if inner.anonymous_votes.contains_key(&key) {
            return Ok(false);
        }
        inner.anonymous_votes.insert(key, record.clone());
        Ok(true)
    }
}

impl VetoStore for MemoryStore {
    fn get_veto(&self, id: &VetoId) -> Result<VetoRecord, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .vetoes
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn insert_veto(&self, record: &VetoRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.vetoes.contains_key(record.id.as_str()) {
            return Err(StoreError::Duplicate(record.id.to_string()));
        }
        inner.vetoes.insert(record.id.to_string(), record.clone());
        Ok(())
    }

    fn resolve_veto_if_pending(
        &self,
        id: &VetoId,
        status: VetoStatus,
        resolved_at: Timestamp,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let veto = inner
            .vetoes
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if veto.status != VetoStatus::Pending {
            return Ok(false);
        }
        veto.status = status;
        veto.resolved_at = Some(resolved_at);
        Ok(true)
    }

    fn rejected_veto_count(&self, submitter: &UserId) -> Result<u64, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .vetoes
            .values()
            .filter(|v| v.submitter == *submitter && v.status == VetoStatus::Rejected)
            .count() as u64)
    }

    fn rejected_veto_counts(&self) -> Result<Vec<(UserId, u64)>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut counts: HashMap<UserId, u64> = HashMap::new();
        for veto in inner.vetoes.values() {
            if veto.status == VetoStatus::Rejected {
                *counts.entry(veto.submitter.clone()).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }
}

impl FactStore for MemoryStore {
    fn fact_exists(&self, id: &FactId) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().facts.contains_key(id.as_str()))
    }

    fn fact_author(&self, id: &FactId) -> Result<UserId, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .facts
            .get(id.as_str())
            .map(|f| f.author.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn fact_status(&self, id: &FactId) -> Result<FactStatus, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .facts
            .get(id.as_str())
            .map(|f| f.status)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn set_fact_status(&self, id: &FactId, status: FactStatus) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let fact = inner
            .facts
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        fact.status = status;
        Ok(())
    }
}

impl ContentStore for MemoryStore {
    fn target_exists(&self, target: &VoteTarget) -> Result<bool, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(match target {
            VoteTarget::Fact(id) => inner.facts.contains_key(id.as_str()),
            VoteTarget::Veto(id) => inner.vetoes.contains_key(id.as_str()),
            _ => inner.content.contains_key(&target.to_string()),
        })
    }

    fn target_author(&self, target: &VoteTarget) -> Result<Option<UserId>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(match target {
            VoteTarget::Fact(id) => inner.facts.get(id.as_str()).map(|f| f.author.clone()),
            VoteTarget::Veto(_) => None,
            _ => inner
                .content
                .get(&target.to_string())
                .map(|c| c.author.clone()),
        })
    }

    fn apply_target_score_delta(
        &self,
        target: &VoteTarget,
        delta: f64,
    ) -> Result<f64, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let score = inner.target_scores.entry(target.to_string()).or_default();
        *score += delta;
        Ok(*score)
    }
}

impl FlagStore for MemoryStore {
    fn get_flag(&self, id: &FlagId) -> Result<FlagRecord, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .flags
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn insert_flag_if_none_open(&self, record: &FlagRecord) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let has_open = inner
            .flags
            .values()
            .any(|f| f.user_id == record.user_id && f.status.is_open());
        if has_open {
            return Ok(false);
        }
        inner.flags.insert(record.id.to_string(), record.clone());
        Ok(true)
    }

    fn open_flag_for(&self, user_id: &UserId) -> Result<Option<FlagRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .flags
            .values()
            .find(|f| f.user_id == *user_id && f.status.is_open())
            .cloned())
    }

    fn mark_reviewing_if_pending(
        &self,
        id: &FlagId,
        reviewer: &UserId,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let flag = inner
            .flags
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if flag.status != FlagStatus::Pending {
            return Ok(false);
        }
        flag.status = FlagStatus::Reviewing;
        flag.reviewed_by = Some(reviewer.clone());
        Ok(true)
    }

    fn close_flag_if_open(
        &self,
        id: &FlagId,
        status: FlagStatus,
        reviewed_by: &UserId,
        resolution: FlagResolution,
        comment: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let flag = inner
            .flags
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if !flag.status.is_open() {
            return Ok(false);
        }
        flag.status = status;
        flag.reviewed_by = Some(reviewed_by.clone());
        flag.resolution = Some(resolution);
        flag.resolution_comment = comment.map(str::to_string);
        Ok(true)
    }

    fn flags_for(&self, user_id: &UserId) -> Result<Vec<FlagRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut flags: Vec<FlagRecord> = inner
            .flags
            .values()
            .filter(|f| f.user_id == *user_id)
            .cloned()
            .collect();
        flags.sort_by_key(|f| f.created_at);
        Ok(flags)
    }
}

impl BanStore for MemoryStore {
    fn insert_ban(&self, record: &BanRecord) -> Result<(), StoreError> {
        self.inner.lock().unwrap().bans.push(record.clone());
        Ok(())
    }

    fn active_ban_for(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<Option<BanRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .bans
            .iter()
            .filter(|b| b.user_id == *user_id)
            .find(|b| b.is_active(now))
            .cloned())
    }

    fn ban_history(&self, user_id: &UserId) -> Result<Vec<BanRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .bans
            .iter()
            .filter(|b| b.user_id == *user_id)
            .cloned()
            .collect())
    }

    fn lift_active_ban(
        &self,
        user_id: &UserId,
        lifted_by: &UserId,
        now: Timestamp,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        for ban in inner.bans.iter_mut() {
            if ban.user_id == *user_id && ban.is_active(now) {
                ban.lifted_at = Some(now);
                ban.lifted_by = Some(lifted_by.clone());
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl BlocklistStore for MemoryStore {
    fn add_banned_email(&self, hash: &str, now: Timestamp) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .banned_emails
            .entry(hash.to_string())
            .or_insert(BlockedEntry {
                hash: hash.to_string(),
                created_at: now,
            });
        Ok(())
    }

    fn add_banned_ip(&self, hash: &str, now: Timestamp) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .banned_ips
            .entry(hash.to_string())
            .or_insert(BlockedEntry {
                hash: hash.to_string(),
                created_at: now,
            });
        Ok(())
    }

    fn is_email_hash_banned(&self, hash: &str) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().banned_emails.contains_key(hash))
    }

    fn is_ip_hash_banned(&self, hash: &str) -> Result<bool, StoreError> {
        Ok(self.inner.lock().unwrap().banned_ips.contains_key(hash))
    }
}

impl ModeratorStore for MemoryStore {
    fn get_moderator(&self, user_id: &UserId) -> Result<Option<ModeratorRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .moderators
            .get(user_id.as_str())
            .cloned())
    }

    fn iter_moderators(&self) -> Result<Vec<ModeratorRecord>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .moderators
            .values()
            .cloned()
            .collect())
    }

    fn active_moderator_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .moderators
            .values()
            .filter(|m| m.active)
            .count() as u64)
    }

    fn insert_moderator_if_capacity(
        &self,
        record: &ModeratorRecord,
        max_active: u32,
    ) -> Result<SlotClaim, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.moderators.contains_key(record.user_id.as_str()) {
            return Ok(SlotClaim::AlreadyPresent);
        }
        let active = inner.moderators.values().filter(|m| m.active).count() as u32;
        if active >= max_active {
            return Ok(SlotClaim::Full);
        }
        inner
            .moderators
            .insert(record.user_id.to_string(), record.clone());
        Ok(SlotClaim::Claimed)
    }

    fn activate_moderator_if_capacity(
        &self,
        user_id: &UserId,
        max_active: u32,
    ) -> Result<SlotClaim, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let active = inner.moderators.values().filter(|m| m.active).count() as u32;
        let record = inner
            .moderators
            .get_mut(user_id.as_str())
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;
        if record.active {
            return Ok(SlotClaim::AlreadyPresent);
        }
        if active >= max_active {
            return Ok(SlotClaim::Full);
        }
        record.active = true;
        Ok(SlotClaim::Claimed)
    }

    fn deactivate_moderator(&self, user_id: &UserId) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.moderators.get_mut(user_id.as_str()) {
            Some(record) if record.active => {
                record.active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn remove_moderator(&self, user_id: &UserId) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .moderators
            .remove(user_id.as_str())
            .is_some())
    }
}
