//! Walk the engine through a small moderation scenario.
//!
//! Run with `RUST_LOG=debug cargo run --example moderation_demo` to watch
//! the state transitions in the log output.

use factum_crypto::BlocklistSalt;
use factum_engine::ModerationEngine;
use factum_nullables::MemoryStore;
use factum_store::{UserRecord, UserStore};
use factum_types::{FactId, Timestamp, UserId, UserType, VoteTarget};

fn main() {
    factum_utils::init_tracing();

    let params = factum_utils::load_params(std::path::Path::new("moderation.toml"))
        .expect("config file should parse");
    let engine = ModerationEngine::new(MemoryStore::new(), params, BlocklistSalt::generate());
    let now = Timestamp::now();

    // Seed a tiny community.
    let author = UserId::new("author");
    let alice = UserId::new("alice");
    let press = UserId::new("press-org");
    for (id, user_type, trust) in [
        (&author, UserType::Verified, 12.0),
        (&alice, UserType::Verified, 60.0),
        (&press, UserType::Organization, 0.0),
    ] {
        let mut record = UserRecord::new(id.clone(), user_type, now);
        record.email_verified = true;
        record.trust_score = trust;
        engine.store().add_user(record);
    }
    let fact = FactId::new("fact-1");
    engine.store().add_fact(&fact, &author);

    let receipt = engine
        .cast_vote(&alice, &VoteTarget::Fact(fact.clone()), 1, now)
        .expect("vote should land");
    println!("alice's vote carried weight {}", receipt.weight);

    let veto = engine
        .submit_veto(&alice, &fact, "figure contradicts the cited table", &[
            "https://example.org/primary-source".to_string(),
        ], now)
        .expect("veto should open");
    let outcome = engine
        .vote_on_veto(&press, &veto.id, -1, now)
        .expect("veto vote should land");
    println!("veto outcome: {outcome:?}");
    println!(
        "alice's trust after the failed veto: {}",
        engine.store().get_user(&alice).unwrap().trust_score
    );
}
