use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    Client,
};
use async_trait::async_trait;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use secrecy::ExposeSecret;
use serde_json::{json, Value};

use crate::{
    config::Config,
    constants::prompts::{system_prompt, user_prompt},
    document::ContentKind,
    errors::{AppError, AppResult},
    models::dto::request::GenerateContentRequest,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub kind: ContentKind,
    pub topic: String,
    pub subject: Option<String>,
    pub level: String,
    pub additional_info: Option<String>,
}

impl From<&GenerateContentRequest> for GenerationRequest {
    fn from(request: &GenerateContentRequest) -> Self {
        GenerationRequest {
            kind: request.kind,
            topic: request.topic.clone(),
            subject: request.subject.clone(),
            level: request.level.clone(),
            additional_info: request.additional_info.clone(),
        }
    }
}

/// Produces raw study material text for a request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String>;
}

/// Chat-completions backed generator for any OpenAI-compatible endpoint.
pub struct OpenAiContentGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiContentGenerator {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.ai_api_key.expose_secret())
            .with_api_base(&config.ai_api_base);

        Self {
            client: Client::with_config(openai_config).with_backoff(single_attempt()),
            model: config.ai_model.clone(),
        }
    }

    fn chat_request(&self, request: &GenerationRequest) -> Value {
        json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt(request.kind, &request.level) },
                {
                    "role": "user",
                    "content": user_prompt(
                        request.kind,
                        &request.topic,
                        request.subject.as_deref(),
                        &request.level,
                        request.additional_info.as_deref(),
                    ),
                },
            ],
        })
    }
}

#[async_trait]
impl ContentGenerator for OpenAiContentGenerator {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        log::info!(
            "Requesting {} for topic '{}' at {} level",
            request.kind,
            request.topic,
            request.level
        );

        let response: Value = self
            .client
            .chat()
            .create_byot(self.chat_request(request))
            .await
            .map_err(map_provider_error)?;

        let text = first_choice_text(&response);
        if text.is_empty() {
            log::warn!("Provider returned no content for topic '{}'", request.topic);
        } else {
            log::debug!("Provider returned {} characters", text.len());
        }
        Ok(text)
    }
}

/// Quota failures are reported to the caller at once instead of being retried.
fn single_attempt() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build()
}

/// `choices[0].message.content`, or empty when the provider sent none.
pub fn first_choice_text(response: &Value) -> String {
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

const PAYMENT_MARKERS: [&str; 3] = ["insufficient_quota", "payment_required", "insufficient_credits"];
const RATE_LIMIT_MARKERS: [&str; 3] = ["rate_limit", "rate_limit_exceeded", "requests"];

fn map_provider_error(err: OpenAIError) -> AppError {
    log::error!("Content provider request failed: {}", err);
    match &err {
        OpenAIError::ApiError(api) => classify_api_error(api),
        other => classify_provider_failure(&other.to_string()),
    }
}

/// Uses the error object's `type` and `code` first; the HTTP status is not
/// kept by the client, so the message text is the last resort.
fn classify_api_error(api: &ApiError) -> AppError {
    let markers: Vec<&str> = [api.r#type.as_deref(), api.code.as_deref()]
        .into_iter()
        .flatten()
        .collect();

    if markers.iter().any(|m| PAYMENT_MARKERS.contains(m)) {
        AppError::PaymentRequired
    } else if markers.iter().any(|m| RATE_LIMIT_MARKERS.contains(m)) {
        AppError::RateLimited
    } else {
        classify_provider_failure(&api.to_string())
    }
}

/// Maps a provider failure onto the quota-related errors the client can act on.
pub fn classify_provider_failure(detail: &str) -> AppError {
    let lowered = detail.to_lowercase();

    if lowered.contains("429") || lowered.contains("rate limit") || lowered.contains("rate_limit") {
        AppError::RateLimited
    } else if lowered.contains("402")
        || lowered.contains("payment")
        || lowered.contains("insufficient_quota")
        || lowered.contains("credits")
    {
        AppError::PaymentRequired
    } else {
        AppError::UpstreamError(detail.to_string())
    }
}
