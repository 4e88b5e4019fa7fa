use super::{classify_locally, parse_agreement, ChatClient};
use crate::config::ModelConfig;
use crate::conversation::{Message, Role};
use crate::error::ModelError;
use crate::prompts::commit::agreement_question;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Client for OpenAI-compatible chat completion endpoints
pub struct OpenAiChatClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: Option<f32>,
    classify_deadline: Duration,
    total_tokens: AtomicU64,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

impl OpenAiChatClient {
    pub fn new(config: &ModelConfig, api_key: String) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ModelError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            model: config.name.clone(),
            api_key,
            temperature: config.temperature,
            classify_deadline: config.timeout(),
            total_tokens: AtomicU64::new(0),
        })
    }

    /// Tokens reported by the endpoint across every call so far
    pub fn total_tokens(&self) -> u64 {
        self.total_tokens.load(Ordering::Relaxed)
    }

    async fn request(
        &self,
        history: &[Message],
        temperature: Option<f32>,
        deadline: Duration,
    ) -> Result<String, ModelError> {
        let body = build_request(&self.model, history, temperature);
        debug!(
            model = %self.model,
            messages = history.len(),
            "sending chat completion request"
        );

        let exchange = async {
            let response = self
                .http
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .header("HTTP-Referer", "ai-commit")
                .json(&body)
                .send()
                .await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = tokio::time::timeout(deadline, exchange)
            .await
            .map_err(|_| ModelError::Timeout(deadline))?
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(deadline)
                } else {
                    ModelError::Transport(e.to_string())
                }
            })?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        let (reply, tokens) = parse_response(&text)?;
        let total = self.total_tokens.fetch_add(tokens, Ordering::Relaxed) + tokens;
        debug!(tokens, total, "chat completion finished");

        Ok(reply)
    }
}

#[async_trait]
impl ChatClient for OpenAiChatClient {
    async fn complete(
        &self,
        history: &[Message],
        deadline: Duration,
    ) -> Result<String, ModelError> {
        self.request(history, self.temperature, deadline).await
    }

    async fn classify_agreement(&self, feedback: &str) -> bool {
        if let Some(agreed) = classify_locally(feedback) {
            debug!(agreed, "classified feedback locally");
            return agreed;
        }

        let question = [Message::new(Role::Instruction, agreement_question(feedback))];
        match self
            .request(&question, Some(0.0), self.classify_deadline)
            .await
        {
            Ok(reply) => {
                let agreed = parse_agreement(&reply);
                debug!(agreed, reply = %reply, "classified feedback with the model");
                agreed
            }
            Err(e) => {
                warn!("could not classify feedback, treating it as a change request: {e}");
                false
            }
        }
    }
}

fn build_request<'a>(
    model: &'a str,
    history: &'a [Message],
    temperature: Option<f32>,
) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: history
            .iter()
            .map(|message| WireMessage {
                role: message.role.wire_name(),
                content: &message.content,
            })
            .collect(),
        temperature,
    }
}

fn status_error(status: StatusCode, body: &str) -> ModelError {
    let detail = format!("HTTP {}: {}", status, body.trim());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ModelError::Auth(detail),
        _ => ModelError::Transport(detail),
    }
}

/// Extract the first reply and the token count from a response body
fn parse_response(body: &str) -> Result<(String, u64), ModelError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ModelError::Transport(format!("invalid response body: {e}")))?;

    let reply = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| clean_reply(&content))
        .unwrap_or_default();
    let tokens = response.usage.map(|usage| usage.total_tokens).unwrap_or(0);

    Ok((reply, tokens))
}

/// Models like to wrap commit messages in quotes
fn clean_reply(raw: &str) -> String {
    raw.trim().trim_matches('"').trim().to_string()
}
