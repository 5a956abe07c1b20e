//! Generation request wire shape.

use serde::Serialize;

/// One generation call.
///
/// `lastk` tells the upstream service how many prior turns of the session
/// history (addressed by `session_id`) to feed back into the prompt; `0`
/// makes the call stateless.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub system: String,
    pub query: String,
    pub temperature: f32,
    pub lastk: u32,
    pub session_id: String,
}

impl GenerateRequest {
    pub fn new(
        model: impl Into<String>,
        system: impl Into<String>,
        query: impl Into<String>,
        temperature: f32,
        lastk: u32,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system: system.into(),
            query: query.into(),
            temperature,
            lastk,
            session_id: session_id.into(),
        }
    }
}
