//! Black-box conversation tests: the real router on an ephemeral port, with
//! stub axum servers standing in for the news-search and generation APIs.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Query,
    routing::{get, post},
};
use chrono::Duration;
use serde_json::{Value, json};

use pressroom_api::app::{self, services};
use pressroom_api::config::{AppConfig, LlmSettings, NewsSettings};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{addr}");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Scripted generation service. Routes on the system-prompt role and echoes
/// deterministic text, so conversations are fully reproducible.
async fn llm_stub(Json(body): Json<Value>) -> Json<Value> {
    let system = body["system"].as_str().unwrap_or("");
    let query = body["query"].as_str().unwrap_or("");
    let lower = query.to_lowercase();

    let response = if system.contains("intent router") {
        if lower.contains("news") { "news_query" } else { "smalltalk" }.to_string()
    } else if system.contains("search keywords") {
        if lower.contains("obscur") { "obscurum" } else { "rate cuts" }.to_string()
    } else if system.contains("article curator") {
        "1".to_string()
    } else if system.contains("feedback router") {
        if lower.contains("thanks") {
            "satisfied"
        } else if lower.contains("shorter") {
            "refine"
        } else {
            "new_topic"
        }
        .to_string()
    } else if system.contains("Revise the given briefing") {
        "A shorter briefing.".to_string()
    } else if system.contains("combining all previous information") {
        "Combined analysis of the session.".to_string()
    } else if query.starts_with("Summarize the recent coverage") {
        "Here is your briefing on rate cuts.".to_string()
    } else if query.starts_with("The user said") {
        "Hi there! I can look up news for you.".to_string()
    } else {
        String::new()
    };

    Json(json!({ "response": response }))
}

async fn news_stub(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let keyword = params.get("q").cloned().unwrap_or_default();
    if keyword.contains("obscurum") {
        return Json(json!({"status": "ok", "articles": []}));
    }

    Json(json!({
        "status": "ok",
        "articles": [
            {
                "title": "Fed holds rates",
                "description": "The Fed held rates steady.",
                "url": "https://example.org/fed",
                "publishedAt": "2026-08-27T09:00:00Z",
                "source": {"name": "Reuters"}
            },
            {
                "title": "Markets rally",
                "description": "Stocks rose on the decision.",
                "url": "https://example.org/markets",
                "source": {"name": "AP"}
            }
        ]
    }))
}

async fn spawn_stack(webhook_token: Option<&str>, news_router: Router) -> (TestServer, Vec<TestServer>) {
    let news = TestServer::spawn(news_router).await;
    let llm = TestServer::spawn(Router::new().route("/", post(llm_stub))).await;

    let config = AppConfig {
        bind_addr: "unused".to_string(),
        webhook_token: webhook_token.map(str::to_string),
        news: NewsSettings {
            base_url: news.base_url.clone(),
            api_key: "test-news-key".to_string(),
            page_size: 10,
            window_days: 7,
            sort_by: "popularity".to_string(),
        },
        llm: LlmSettings {
            base_url: llm.base_url.clone(),
            api_key: "test-llm-key".to_string(),
            model: "4o-mini".to_string(),
            temperature: 0.7,
        },
        session_max_idle: Duration::hours(24),
    };

    let services = Arc::new(services::build_services(&config).unwrap());
    let api = TestServer::spawn(app::build_app(services)).await;

    (api, vec![news, llm])
}

fn message(user: &str, text: &str) -> Value {
    json!({
        "user_name": user,
        "text": text,
        "channel_id": "GENERAL"
    })
}

async fn send(client: &reqwest::Client, base_url: &str, body: Value) -> Value {
    let response = client
        .post(format!("{base_url}/webhook"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.json().await.unwrap()
}

fn default_news_router() -> Router {
    Router::new().route("/v2/everything", get(news_stub))
}

#[tokio::test]
async fn health_is_public() {
    let (api, _upstreams) = spawn_stack(None, default_news_router()).await;

    let response = reqwest::get(format!("{}/health", api.base_url)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
}

#[tokio::test]
async fn bot_and_empty_messages_are_ignored() {
    let (api, _upstreams) = spawn_stack(None, default_news_router()).await;
    let client = reqwest::Client::new();

    let mut bot_message = message("newsbot", "any news on rates?");
    bot_message["bot"] = json!(true);
    let body = send(&client, &api.base_url, bot_message).await;
    assert_eq!(body["status"], "ignored");

    let body = send(&client, &api.base_url, message("ada", "   ")).await;
    assert_eq!(body["status"], "ignored");
}

#[tokio::test]
async fn webhook_token_is_enforced_when_configured() {
    let (api, _upstreams) = spawn_stack(Some("s3cret"), default_news_router()).await;
    let client = reqwest::Client::new();

    let mut unauthorized = message("ada", "hello");
    unauthorized["token"] = json!("wrong");
    let response = client
        .post(format!("{}/webhook", api.base_url))
        .json(&unauthorized)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

    let mut authorized = message("ada", "hello there");
    authorized["token"] = json!("s3cret");
    let body = send(&client, &api.base_url, authorized).await;
    assert_eq!(body["text"], "Hi there! I can look up news for you.");
}

#[tokio::test]
async fn news_query_turn_delivers_briefing_with_buttons() {
    let (api, _upstreams) = spawn_stack(None, default_news_router()).await;
    let client = reqwest::Client::new();

    let body = send(
        &client,
        &api.base_url,
        message("ada", "any news about rate cuts?"),
    )
    .await;

    let text = body["text"].as_str().unwrap();
    assert!(text.starts_with("Here is your briefing on rate cuts."));
    assert!(text.contains("Would you like more details?"));

    let actions = &body["attachments"][0]["actions"];
    assert_eq!(actions[0]["msg"], "interaction_info");
    assert_eq!(actions[1]["msg"], "refine_analysis");
}

#[tokio::test]
async fn refine_then_confirm_resets_the_session() {
    let (api, _upstreams) = spawn_stack(None, default_news_router()).await;
    let client = reqwest::Client::new();

    let body = send(
        &client,
        &api.base_url,
        message("ada", "any news about rate cuts?"),
    )
    .await;
    assert!(body["text"].as_str().unwrap().contains("briefing on rate cuts"));

    // Feedback phase: ask for a revision.
    let body = send(&client, &api.base_url, message("ada", "make it shorter")).await;
    assert!(body["text"].as_str().unwrap().starts_with("A shorter briefing."));
    assert!(body["attachments"].is_array());

    // Confirm satisfaction: session resets.
    let body = send(&client, &api.base_url, message("ada", "thanks, that's perfect")).await;
    assert!(body["text"].as_str().unwrap().starts_with("Glad that helped!"));
    assert!(body["attachments"].is_null());

    // Next message is routed as a fresh turn, not as feedback.
    let body = send(&client, &api.base_url, message("ada", "hello there")).await;
    assert_eq!(body["text"], "Hi there! I can look up news for you.");
}

#[tokio::test]
async fn new_topic_feedback_reruns_the_pipeline() {
    let (api, _upstreams) = spawn_stack(None, default_news_router()).await;
    let client = reqwest::Client::new();

    send(
        &client,
        &api.base_url,
        message("ada", "any news about rate cuts?"),
    )
    .await;

    let body = send(
        &client,
        &api.base_url,
        message("ada", "what about chip exports instead?"),
    )
    .await;

    let text = body["text"].as_str().unwrap();
    assert!(text.starts_with("Here is your briefing on rate cuts."));
    assert!(body["attachments"].is_array());
}

#[tokio::test]
async fn sessions_are_scoped_per_user() {
    let (api, _upstreams) = spawn_stack(None, default_news_router()).await;
    let client = reqwest::Client::new();

    send(
        &client,
        &api.base_url,
        message("ada", "any news about rate cuts?"),
    )
    .await;

    // Ada is in the feedback phase, but Grace's first message in the same
    // channel must be routed as a fresh turn.
    let body = send(&client, &api.base_url, message("grace", "hello there")).await;
    assert_eq!(body["text"], "Hi there! I can look up news for you.");
}

#[tokio::test]
async fn empty_search_results_apologize_and_stay_in_query_phase() {
    let (api, _upstreams) = spawn_stack(None, default_news_router()).await;
    let client = reqwest::Client::new();

    let body = send(
        &client,
        &api.base_url,
        message("ada", "news about obscurum please"),
    )
    .await;
    let text = body["text"].as_str().unwrap();
    assert!(text.contains("couldn't find recent coverage"));
    assert!(body["attachments"].is_null());

    // Still in the query phase: the next message routes through intent.
    let body = send(&client, &api.base_url, message("ada", "hello there")).await;
    assert_eq!(body["text"], "Hi there! I can look up news for you.");
}

#[tokio::test]
async fn news_outage_degrades_to_apology() {
    let failing_news = Router::new().route(
        "/v2/everything",
        get(|| async { axum::http::StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let (api, _upstreams) = spawn_stack(None, failing_news).await;
    let client = reqwest::Client::new();

    let body = send(
        &client,
        &api.base_url,
        message("ada", "any news about rate cuts?"),
    )
    .await;
    assert!(
        body["text"]
            .as_str()
            .unwrap()
            .contains("couldn't reach the news service")
    );
}

#[tokio::test]
async fn button_payloads_short_circuit_the_state_machine() {
    let (api, _upstreams) = spawn_stack(None, default_news_router()).await;
    let client = reqwest::Client::new();

    let body = send(&client, &api.base_url, message("ada", "interaction_info")).await;
    assert!(
        body["text"]
            .as_str()
            .unwrap()
            .starts_with("You can interact with the bot")
    );

    let body = send(&client, &api.base_url, message("ada", "refine_analysis")).await;
    assert_eq!(body["text"], "Combined analysis of the session.");
}
