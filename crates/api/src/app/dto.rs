//! Webhook request/response DTOs.
//!
//! The inbound shape follows the chat server's outgoing-webhook contract:
//! every field may be missing, `bot` may arrive as a bool, a string, or not
//! at all, and the conversation identifier hides behind one of three names.
//! Parsing is therefore deliberately lenient; normalization happens in the
//! accessor methods.

use serde::{Deserialize, Serialize};

/// Fixed message payload of the "how do I use this" button.
pub const MSG_INTERACTION_INFO: &str = "interaction_info";
/// Fixed message payload of the "refine and combine all analysis" button.
pub const MSG_REFINE_ANALYSIS: &str = "refine_analysis";

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub bot: Option<serde_json::Value>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

impl IncomingMessage {
    /// Author display name, `"Unknown"` when absent or blank.
    pub fn author(&self) -> &str {
        match self.user_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => "Unknown",
        }
    }

    /// Trimmed message text (empty when absent).
    pub fn text(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    /// First non-blank of `channel_id` / `conversation_id` / `chat_id`,
    /// falling back to `"default"`.
    pub fn conversation(&self) -> &str {
        [&self.channel_id, &self.conversation_id, &self.chat_id]
            .into_iter()
            .filter_map(|field| field.as_deref().map(str::trim))
            .find(|value| !value.is_empty())
            .unwrap_or("default")
    }

    /// Truthiness of the `bot` flag, whatever JSON type it arrived as.
    pub fn is_bot(&self) -> bool {
        match &self.bot {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(s)) => {
                !s.is_empty() && s != "false" && s != "0"
            }
            Some(serde_json::Value::Number(n)) => n.as_f64() != Some(0.0),
            Some(_) => true,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct OutgoingReply {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
}

impl OutgoingReply {
    /// Plain text reply, no buttons.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: None,
        }
    }

    /// Reply that invites further interaction: the text plus the standard
    /// quick-action buttons.
    pub fn with_actions(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attachments: Some(vec![Attachment {
                title: "Choose an option:".to_string(),
                text: "Select an action below:".to_string(),
                actions: vec![
                    ButtonAction::send_message(
                        "\u{1F4D8} How to interact with the bot",
                        MSG_INTERACTION_INFO,
                    ),
                    ButtonAction::send_message(
                        "\u{1F9E0} Refine and combine all analysis",
                        MSG_REFINE_ANALYSIS,
                    ),
                ],
            }]),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Attachment {
    pub title: String,
    pub text: String,
    pub actions: Vec<ButtonAction>,
}

#[derive(Debug, Serialize)]
pub struct ButtonAction {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
    pub msg: String,
    pub msg_in_chat_window: bool,
    pub msg_processing_type: &'static str,
}

impl ButtonAction {
    /// A button that posts `msg` back into the chat as if the user typed it.
    pub fn send_message(label: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            kind: "button",
            text: label.into(),
            msg: msg.into(),
            msg_in_chat_window: true,
            msg_processing_type: "sendMessage",
        }
    }
}
