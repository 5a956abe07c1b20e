//! `pressroom-newsfeed` — outbound client for the news-search HTTP API.
//!
//! The service treats the news API as an opaque collaborator: one GET per
//! retrieval, no retries, typed errors for the caller to degrade on.

pub mod client;
pub mod query;

pub use client::{NewsfeedClient, NewsfeedError};
pub use query::NewsQuery;
