//! The composed trust & moderation engine.
//!
//! [`ModerationEngine`] is the flat function-call surface the HTTP handlers,
//! admin tooling, and scheduled jobs consume: every operation returns a
//! typed value or a typed error carrying a stable machine-readable code.

pub mod engine;
pub mod error;

pub use engine::ModerationEngine;
pub use error::EngineError;
