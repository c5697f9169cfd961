use serde::{ Serialize, Deserialize };
use serde_json::Value as JsonValue;

use super::chat::ChatMessage;

#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatMessage>,
}

/// Reply from `/api/ai/chat/`. Actions stay untyped here so one malformed
/// descriptor cannot poison the whole reply.
#[derive(Deserialize, Debug, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub success: bool,
    pub response: Option<String>,
    pub actions: Option<Vec<JsonValue>>,
}

#[derive(Serialize, Debug)]
pub struct TemperatureRequest {
    pub temperature: f64,
}

#[derive(Serialize, Debug, Default)]
pub struct EmptyRequest {}

#[derive(Deserialize, Debug, Default)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
}
