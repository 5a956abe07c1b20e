//! The conversational turn handler.
//!
//! One POST per chat message. The handler never surfaces upstream failures
//! as 5xx: the chat server treats non-2xx as a delivery failure, so outbound
//! trouble degrades to an apology reply instead (logged via tracing).

use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::json;
use tracing::{info, warn};

use pressroom_agents::{Feedback, Intent};
use pressroom_core::{ChannelId, SessionKey, UserName};
use pressroom_session::Session;

use crate::app::{
    dto::{self, IncomingMessage, OutgoingReply},
    errors,
    services::AppServices,
};

const HELP_TEXT: &str = "You can interact with the bot by typing your queries \
    directly. You can ask for news summaries, request analysis, or refine \
    previous responses. You can also use the buttons provided for quick actions.";

const NEWS_DOWN_APOLOGY: &str = "Sorry, I couldn't reach the news service just \
    now. Please try again in a moment.";

const LLM_DOWN_APOLOGY: &str = "Sorry, I'm having trouble putting an answer \
    together right now. Please try again in a moment.";

const CLOSING_TEXT: &str = "Glad that helped! Ask me about another topic \
    whenever you like.";

const FOLLOW_UP: &str = "Would you like more details?";

pub async fn receive(
    Extension(services): Extension<Arc<AppServices>>,
    Json(message): Json<IncomingMessage>,
) -> Response {
    if let Some(expected) = services.webhook_token.as_deref() {
        if message.token.as_deref() != Some(expected) {
            return errors::json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "webhook token mismatch",
            );
        }
    }

    // Ignore bot messages and empty input.
    if message.is_bot() || message.text().is_empty() {
        return Json(json!({"status": "ignored"})).into_response();
    }

    // `author()`/`conversation()` fall back to non-blank defaults, so these
    // cannot fail on real webhook payloads.
    let channel = match ChannelId::new(message.conversation()) {
        Ok(channel) => channel,
        Err(err) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_channel", err.to_string());
        }
    };
    let user = match UserName::new(message.author()) {
        Ok(user) => user,
        Err(err) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_user", err.to_string());
        }
    };

    let key = SessionKey::derive(&channel, &user);
    info!(session = %key, "processing webhook message");

    let reply = run_turn(&services, &key, message.text()).await;
    Json(reply).into_response()
}

async fn run_turn(services: &AppServices, key: &SessionKey, text: &str) -> OutgoingReply {
    match text {
        dto::MSG_INTERACTION_INFO => OutgoingReply::plain(HELP_TEXT),
        dto::MSG_REFINE_ANALYSIS => match services.analyst.synthesize_history(key.as_str()).await {
            Ok(text) if !text.is_empty() => OutgoingReply::plain(text),
            Ok(_) => OutgoingReply::plain(LLM_DOWN_APOLOGY),
            Err(err) => {
                warn!(session = %key, error = %err, "history synthesis failed");
                OutgoingReply::plain(LLM_DOWN_APOLOGY)
            }
        },
        _ => dialogue_turn(services, key, text).await,
    }
}

async fn dialogue_turn(services: &AppServices, key: &SessionKey, text: &str) -> OutgoingReply {
    let now = Utc::now();
    let mut session = services
        .store
        .get(key)
        .await
        .unwrap_or_else(|| Session::new(key.clone(), now));

    let reply = if session.is_awaiting_feedback() {
        feedback_turn(services, &mut session, text).await
    } else {
        query_turn(services, &mut session, text).await
    };

    session.touch(Utc::now());
    services.store.upsert(session).await;
    reply
}

/// Fresh-query phase: route the intent, then either run the briefing
/// pipeline or hold a conversational turn.
async fn query_turn(services: &AppServices, session: &mut Session, text: &str) -> OutgoingReply {
    let key = session.key().as_str().to_string();

    match services.analyst.route_intent(&key, text).await {
        Ok(Intent::NewsQuery) => briefing_turn(services, session, text).await,
        Ok(Intent::Smalltalk) => match services.analyst.smalltalk(&key, text).await {
            Ok(reply) if !reply.is_empty() => OutgoingReply::plain(reply),
            Ok(_) => OutgoingReply::plain(LLM_DOWN_APOLOGY),
            Err(err) => {
                warn!(session = %key, error = %err, "smalltalk reply failed");
                OutgoingReply::plain(LLM_DOWN_APOLOGY)
            }
        },
        Err(err) => {
            warn!(session = %key, error = %err, "intent routing failed");
            OutgoingReply::plain(LLM_DOWN_APOLOGY)
        }
    }
}

/// The retrieval-and-summarize pipeline: topic extraction, news search,
/// curation, briefing. Stores the context on the session on success.
async fn briefing_turn(services: &AppServices, session: &mut Session, text: &str) -> OutgoingReply {
    let key = session.key().as_str().to_string();

    let topic = match services.analyst.extract_topic(&key, text).await {
        Ok(topic) if !topic.is_empty() => topic,
        // An empty extraction still lets retrieval run on the raw message.
        Ok(_) => text.to_string(),
        Err(err) => {
            warn!(session = %key, error = %err, "topic extraction failed");
            return OutgoingReply::plain(LLM_DOWN_APOLOGY);
        }
    };

    let query = services.news_query(&topic);
    let articles = match services.newsfeed.search(&query, Utc::now()).await {
        Ok(articles) => articles,
        Err(err) => {
            warn!(session = %key, error = %err, "news search failed");
            return OutgoingReply::plain(NEWS_DOWN_APOLOGY);
        }
    };

    if articles.is_empty() {
        return OutgoingReply::plain(format!(
            "I couldn't find recent coverage of \"{topic}\". Try another topic or phrasing?"
        ));
    }

    let curated = match services.analyst.curate(&key, text, &articles).await {
        Ok(curated) if !curated.is_empty() => curated,
        Ok(_) => articles.clone(),
        Err(err) => {
            warn!(session = %key, error = %err, "curation failed; keeping all articles");
            articles.clone()
        }
    };

    let briefing = match services.analyst.summarize(&key, &topic, &curated).await {
        Ok(briefing) if !briefing.is_empty() => briefing,
        Ok(_) => return OutgoingReply::plain(LLM_DOWN_APOLOGY),
        Err(err) => {
            warn!(session = %key, error = %err, "summarization failed");
            return OutgoingReply::plain(LLM_DOWN_APOLOGY);
        }
    };

    if let Err(err) = session.begin_briefing(topic, curated, briefing.clone(), Utc::now()) {
        warn!(session = %key, error = %err, "failed to store briefing context");
    }

    OutgoingReply::with_actions(format!("{briefing}\n\n{FOLLOW_UP}"))
}

/// Feedback phase: the user just received a briefing.
async fn feedback_turn(services: &AppServices, session: &mut Session, text: &str) -> OutgoingReply {
    let key = session.key().as_str().to_string();

    let feedback = match services.analyst.review_feedback(&key, text).await {
        Ok(feedback) => feedback,
        Err(err) => {
            warn!(session = %key, error = %err, "feedback routing failed");
            return OutgoingReply::plain(LLM_DOWN_APOLOGY);
        }
    };

    match feedback {
        Feedback::NewTopic => briefing_turn(services, session, text).await,
        Feedback::Satisfied => {
            if let Err(err) = session.acknowledge(Utc::now()) {
                warn!(session = %key, error = %err, "acknowledge rejected");
            }
            OutgoingReply::plain(CLOSING_TEXT)
        }
        Feedback::Refine => {
            // A refine verdict without stored context means the session was
            // reset under us; treat the message as a fresh query.
            let Some(current) = session.briefing().map(str::to_string) else {
                return briefing_turn(services, session, text).await;
            };
            let articles = session.articles().to_vec();

            match services.analyst.revise(&key, text, &current, &articles).await {
                Ok(revised) if !revised.is_empty() => {
                    if let Err(err) = session.revise_briefing(revised.clone(), Utc::now()) {
                        warn!(session = %key, error = %err, "failed to store revised briefing");
                    }
                    OutgoingReply::with_actions(format!("{revised}\n\n{FOLLOW_UP}"))
                }
                Ok(_) => OutgoingReply::plain(LLM_DOWN_APOLOGY),
                Err(err) => {
                    warn!(session = %key, error = %err, "briefing revision failed");
                    OutgoingReply::plain(LLM_DOWN_APOLOGY)
                }
            }
        }
    }
}
