//! `pressroom-session` — the multi-turn dialogue state layer.
//!
//! A [`Session`] is the conversation-scoped record of where a dialogue stands
//! (phase, extracted topic, retrieved article stubs, last briefing text).
//! The [`SessionStore`] keeps sessions in process memory only: there is no
//! persistence across restarts, by design.

pub mod session;
pub mod store;

pub use session::{DialoguePhase, Session};
pub use store::SessionStore;
