//! Telegram Bot API client for delivering shop reports
//!
//! Only `sendMessage` to a single configured chat is used. Text longer than
//! one Telegram message is sent as consecutive parts.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::{split_message, MAX_MESSAGE_LEN};

use crate::config::TelegramConfig;
use crate::error::{AppError, AppResult};

const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Telegram Bot API client
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    bot_token: String,
    chat_id: String,
    base_url: String,
}

/// `sendMessage` request body
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope every Bot API method answers with
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: i64,
}

impl TelegramClient {
    /// Create a new TelegramClient
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self::with_base_url(bot_token, chat_id, DEFAULT_BASE_URL.to_string())
    }

    /// Create a new TelegramClient with custom base URL (for testing)
    pub fn with_base_url(bot_token: String, chat_id: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            bot_token,
            chat_id,
            base_url,
        }
    }

    /// Build a client when the config carries both token and chat id
    pub fn from_config(config: &TelegramConfig) -> Option<Self> {
        let (token, chat_id) = config.credentials()?;
        Some(Self::new(token.to_string(), chat_id.to_string()))
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bot_token,
            method
        )
    }

    /// Send plain text to the configured chat, split at order-block boundaries
    /// when it exceeds one message. Returns the Telegram message ids in order.
    pub async fn send_message(&self, text: &str) -> AppResult<Vec<i64>> {
        let parts = split_message(text, MAX_MESSAGE_LEN);
        if parts.len() > 1 {
            tracing::debug!(parts = parts.len(), "Splitting long message");
        }

        let mut message_ids = Vec::with_capacity(parts.len());
        for part in &parts {
            message_ids.push(self.send_part(part).await?);
        }
        Ok(message_ids)
    }

    async fn send_part(&self, text: &str) -> AppResult<i64> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await
            // reqwest errors can echo the URL, which carries the token
            .map_err(|e| AppError::TelegramApiError(e.without_url().to_string()))?;

        let status = response.status();
        let body: TelegramResponse = response.json().await.map_err(|e| {
            AppError::TelegramApiError(format!(
                "Failed to parse response ({}): {}",
                status,
                e.without_url()
            ))
        })?;

        parse_send_result(body)
    }
}

fn parse_send_result(body: TelegramResponse) -> AppResult<i64> {
    if !body.ok {
        return Err(AppError::TelegramApiError(
            body.description
                .unwrap_or_else(|| "Unknown error".to_string()),
        ));
    }
    body.result
        .map(|message| message.message_id)
        .ok_or_else(|| AppError::TelegramApiError("Missing message in response".to_string()))
}


/// In-process stand-in for the Bot API that enforces the message length cap
#[cfg(test)]
pub(crate) mod fake_bot_api {
    use std::sync::{Arc, Mutex};

    use axum::{extract::State, routing::post, Json, Router};
    use serde_json::{json, Value};
    use shared::{message_len, MAX_MESSAGE_LEN};

    pub(crate) type Received = Arc<Mutex<Vec<String>>>;

    /// Start the server; returns its base URL and the texts it accepted
    pub(crate) async fn spawn() -> (String, Received) {
        let received: Received = Arc::default();
        let app = Router::new()
            .route("/:bot/sendMessage", post(send_message))
            .with_state(received.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        (format!("http://{}", addr), received)
    }

    async fn send_message(State(received): State<Received>, Json(body): Json<Value>) -> Json<Value> {
        let text = body["text"].as_str().unwrap_or_default().to_string();
        if message_len(&text) > MAX_MESSAGE_LEN {
            return Json(json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: message is too long"
            }));
        }
        let mut received = received.lock().unwrap();
        received.push(text);
        Json(json!({"ok": true, "result": {"message_id": received.len()}}))
    }
}
