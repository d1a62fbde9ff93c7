use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Completer, CompletionError, CompletionRequest};
use crate::chat::Message;

/// Base URL of the public OpenAI API.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

// Only one candidate is ever requested.
const CHOICE_COUNT: u8 = 1;

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
    temperature: f64,
    n: u8,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the `/v1/chat/completions` endpoint.
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    fn url(&self) -> String {
        format!("{}/v1/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

impl Completer for OpenAiClient {
    async fn complete(
        &self,
        request: &CompletionRequest<'_>,
    ) -> Result<Message, CompletionError> {
        let url = self.url();

        let body = ChatCompletionRequest {
            model: request.model,
            messages: request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            n: CHOICE_COUNT,
        };

        let mut http_request = self.client.post(&url).json(&body);

        // Add Authorization header if API key is present
        if let Some(api_key) = &self.api_key {
            http_request = http_request.bearer_auth(api_key);
        }

        tracing::debug!(
            model = request.model,
            messages = request.messages.len(),
            "sending completion request"
        );

        let response = http_request
            .send()
            .await
            .map_err(|source| CompletionError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        tracing::debug!(%status, "completion response received");

        let text = response
            .text()
            .await
            .map_err(|source| CompletionError::Transport { url, source })?;

        if !status.is_success() {
            return Err(CompletionError::Api {
                status,
                message: api_error_message(&text),
            });
        }

        parse_reply(&text)
    }
}

/// Extracts the first choice's content as an assistant message.
fn parse_reply(body: &str) -> Result<Message, CompletionError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(CompletionError::NoChoices)?;

    let content = choice.message.content.ok_or_else(|| {
        CompletionError::MalformedResponse("choice has no message content".to_string())
    })?;

    Ok(Message::assistant(content))
}

/// Prefers the service's own error message over the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map_or_else(|_| body.trim().to_string(), |envelope| envelope.error.message)
}
