//! OpenAI Chat Completions backend.
//!
//! Sends each prompt as a single user message to `/chat/completions` and maps
//! the first choice back into a [`ModelOutput`]. Any OpenAI-compatible server
//! works via [`OpenAIChatModel::with_base_url`].

use crate::error::ModelError;
use crate::model::Model;
use async_trait::async_trait;
use factdiff_core::{Choice, FinishReason, ModelOutput, ModelSettings, Usage};
use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI Chat Completions model.
#[derive(Debug, Clone)]
pub struct OpenAIChatModel {
    model_name: String,
    client: Client,
    api_key: String,
    base_url: String,
    organization: Option<String>,
    default_timeout: Duration,
}

impl OpenAIChatModel {
    /// Create a new OpenAI chat model.
    pub fn new(model_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            organization: None,
            default_timeout: Duration::from_secs(120),
        }
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    ///
    /// `OPENAI_BASE_URL` overrides the endpoint when set.
    pub fn from_env(model_name: impl Into<String>) -> Result<Self, ModelError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ModelError::configuration("OPENAI_API_KEY environment variable not set")
        })?;
        let mut model = Self::new(model_name, api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            model = model.with_base_url(base_url);
        }
        Ok(model)
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the organization ID.
    #[must_use]
    pub fn with_organization(mut self, org: impl Into<String>) -> Self {
        self.organization = Some(org.into());
        self
    }

    /// Set a custom HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Set the default timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    fn endpoint(&self) -> Result<Url, ModelError> {
        let base = self.base_url.trim_end_matches('/');
        Url::parse(&format!("{base}/chat/completions"))
            .map_err(|e| ModelError::configuration(format!("invalid base URL '{base}': {e}")))
    }

    fn build_request<'a>(&'a self, prompt: &'a str, settings: &ModelSettings) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model_name,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_tokens,
            stop: settings.stop.clone(),
            seed: settings.seed,
        }
    }

    fn parse_response(&self, resp: ChatResponse) -> Result<ModelOutput, ModelError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::invalid_response("No choices in response"))?;

        if let Some(refusal) = choice.message.refusal {
            return Err(ModelError::ContentFiltered(refusal));
        }

        let mut output = ModelOutput::new(resp.model).with_choice(Choice {
            message: factdiff_core::AssistantMessage {
                content: choice.message.content.unwrap_or_default(),
            },
            finish_reason: choice
                .finish_reason
                .as_deref()
                .map(FinishReason::from_provider),
        });

        if let Some(usage) = resp.usage {
            output = output.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        Ok(output)
    }

    fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
        headers
            .get("retry-after")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// Handle API error response.
    fn handle_error_response(status: u16, body: &str, headers: &HeaderMap) -> ModelError {
        if status == 429 {
            return ModelError::rate_limited(Self::parse_retry_after(headers));
        }

        if let Ok(err) = serde_json::from_str::<ApiErrorBody>(body) {
            return match status {
                401 => ModelError::auth(err.error.message),
                404 => ModelError::NotFound(err.error.message),
                _ => ModelError::Api {
                    message: err.error.message,
                    code: err.error.code,
                },
            };
        }

        ModelError::http(status, body)
    }
}

#[async_trait]
impl Model for OpenAIChatModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn system(&self) -> &str {
        "openai"
    }

    async fn generate(
        &self,
        prompt: &str,
        settings: &ModelSettings,
    ) -> Result<ModelOutput, ModelError> {
        let body = self.build_request(prompt, settings);
        let timeout = settings.timeout.unwrap_or(self.default_timeout);

        tracing::debug!(model = %self.model_name, prompt_len = prompt.len(), "chat completion request");

        let mut request = self
            .client
            .post(self.endpoint()?)
            .bearer_auth(&self.api_key)
            .timeout(timeout);

        if let Some(ref org) = self.organization {
            request = request.header("OpenAI-Organization", org);
        }

        let response = request.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ModelError::Timeout(timeout)
            } else {
                ModelError::from(e)
            }
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status, model = %self.model_name, "chat completion failed");
            return Err(Self::handle_error_response(status, &body, &headers));
        }

        let resp: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::invalid_response(e.to_string()))?;

        self.parse_response(resp)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion_body(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 5, "total_tokens": 17}
        })
    }

    #[test]
    fn test_build_request() {
        let model = OpenAIChatModel::new("gpt-4o", "sk-test");
        let settings = ModelSettings::new().temperature(0.0).max_tokens(256);
        let value = serde_json::to_value(model.build_request("hi", &settings)).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "hi"}],
                "temperature": 0.0,
                "max_tokens": 256
            })
        );
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let model = OpenAIChatModel::new("gpt-4o", "k").with_base_url("http://localhost:8080/v1/");
        assert_eq!(
            model.endpoint().unwrap().as_str(),
            "http://localhost:8080/v1/chat/completions"
        );

        let bad = OpenAIChatModel::new("gpt-4o", "k").with_base_url("not a url");
        assert!(matches!(bad.endpoint(), Err(ModelError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({"model": "gpt-4o-mini"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("- fact")))
            .expect(1)
            .mount(&server)
            .await;

        let model = OpenAIChatModel::new("gpt-4o-mini", "sk-test").with_base_url(server.uri());
        let output = model
            .generate("extract facts", &ModelSettings::new())
            .await
            .unwrap();

        assert_eq!(output.completion(), "- fact");
        assert_eq!(output.model, "gpt-4o-mini");
        assert_eq!(output.usage, Some(Usage::new(12, 5)));
        assert_eq!(output.choices[0].finish_reason, Some(FinishReason::Stop));
    }

    #[tokio::test]
    async fn test_generate_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "7")
                    .set_body_string("slow down"),
            )
            .mount(&server)
            .await;

        let model = OpenAIChatModel::new("gpt-4o", "sk-test").with_base_url(server.uri());
        let err = model
            .generate("x", &ModelSettings::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ModelError::RateLimited { retry_after: Some(d) } if d == Duration::from_secs(7)
        ));
    }

    #[tokio::test]
    async fn test_generate_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"message": "Incorrect API key provided", "code": "invalid_api_key"}
            })))
            .mount(&server)
            .await;

        let model = OpenAIChatModel::new("gpt-4o", "bad").with_base_url(server.uri());
        let err = model
            .generate("x", &ModelSettings::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ModelError::Authentication(ref m) if m.contains("Incorrect API key")));
    }

    #[tokio::test]
    async fn test_generate_no_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"model": "gpt-4o", "choices": []})),
            )
            .mount(&server)
            .await;

        let model = OpenAIChatModel::new("gpt-4o", "k").with_base_url(server.uri());
        let err = model
            .generate("x", &ModelSettings::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidResponse(_)));
    }
}
