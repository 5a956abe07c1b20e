use axum::{Router, routing::post};

pub mod system;
pub mod webhook;

/// Router for the webhook surface (the health route is mounted separately in
/// `build_app`, outside the service Extension layer).
pub fn router() -> Router {
    Router::new().route("/webhook", post(webhook::receive))
}
