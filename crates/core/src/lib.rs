//! `pressroom-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers derived from chat metadata, the domain error model, and the
//! article value object shared by the retrieval and dialogue layers.

pub mod article;
pub mod error;
pub mod key;

pub use article::ArticleStub;
pub use error::{DomainError, DomainResult};
pub use key::{ChannelId, SessionKey, UserName};
