//! Strongly-typed identifiers derived from chat metadata.
//!
//! Chat servers hand us opaque strings (channel ids, display names), so these
//! newtypes are string-backed rather than UUID-backed. Construction validates
//! that the value is non-blank; beyond that the strings are passed through
//! untouched so session keys remain stable across restarts of the chat server.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of the conversation the message arrived in (channel, group, or
/// direct-message thread, depending on what the chat server sends).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

/// Display name of the message author as reported by the chat server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserName(String);

macro_rules! impl_chat_str_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Wrap a chat-provided string, rejecting blank values.
            pub fn new(value: impl Into<String>) -> DomainResult<Self> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(DomainError::validation(concat!(
                        $name,
                        " must not be blank"
                    )));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

impl_chat_str_newtype!(ChannelId, "ChannelId");
impl_chat_str_newtype!(UserName, "UserName");

/// Session key: `"{channel}_{user}"`.
///
/// One session per (conversation, author) pair, so two users talking to the
/// bot in the same channel never share dialogue state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn derive(channel: &ChannelId, user: &UserName) -> Self {
        Self(format!("{}_{}", channel.as_str(), user.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_joins_channel_and_user() {
        let channel = ChannelId::new("GENERAL").unwrap();
        let user = UserName::new("ada").unwrap();

        let key = SessionKey::derive(&channel, &user);
        assert_eq!(key.as_str(), "GENERAL_ada");
    }

    #[test]
    fn blank_channel_is_rejected() {
        let err = ChannelId::new("   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn distinct_users_in_same_channel_get_distinct_keys() {
        let channel = ChannelId::new("newsroom").unwrap();
        let a = SessionKey::derive(&channel, &UserName::new("ada").unwrap());
        let b = SessionKey::derive(&channel, &UserName::new("grace").unwrap());
        assert_ne!(a, b);
    }
}
