//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends non-streaming requests to `/v1beta/models/{model}:generateContent`
//! with the `x-goog-api-key` header.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::Span;

use mirrorchat_core::llm::provider::LlmProvider;
use mirrorchat_observe::genai_attrs::{
    GEN_AI_RESPONSE_FINISH_REASONS, GEN_AI_USAGE_INPUT_TOKENS, GEN_AI_USAGE_OUTPUT_TOKENS,
    PROVIDER_GEMINI,
};
use mirrorchat_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::types::{
    GeminiContent, GeminiPart, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-05-20";

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini LLM provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and is only exposed when
/// constructing HTTP request headers.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: SecretString, model: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();

        Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
        }
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn resolve_model<'a>(&'a self, request: &'a CompletionRequest) -> &'a str {
        if request.model.is_empty() {
            &self.model
        } else {
            &request.model
        }
    }

    /// Convert a generic [`CompletionRequest`] into a Gemini request body.
    fn to_gemini_request(request: &CompletionRequest) -> GenerateContentRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| GeminiContent {
                role: Some(m.role.to_string()),
                parts: vec![GeminiPart {
                    text: Some(m.content.clone()),
                }],
            })
            .collect();

        let system_instruction = request.system.as_ref().map(|s| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: Some(s.clone()),
            }],
        });

        let generation_config = request
            .temperature
            .map(|temperature| GenerationConfig { temperature });

        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }
}

/// Map a non-2xx status to an [`LlmError`].
fn error_for_status(status: reqwest::StatusCode, body: String) -> LlmError {
    match status.as_u16() {
        401 | 403 => LlmError::AuthenticationFailed,
        429 => LlmError::RateLimited,
        503 => LlmError::Overloaded(body),
        400 => LlmError::InvalidRequest(body),
        _ => LlmError::Provider {
            message: format!("HTTP {status}: {body}"),
        },
    }
}

/// Turn a decoded response into a [`CompletionResponse`].
fn into_completion(
    response: GenerateContentResponse,
    model: &str,
) -> Result<CompletionResponse, LlmError> {
    let Some(candidate) = response.candidates.first() else {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(LlmError::Blocked(reason));
        }
        return Err(LlmError::Provider {
            message: "response contained no candidates".to_string(),
        });
    };

    let content = candidate.text();
    if content.trim().is_empty() {
        return Err(match &candidate.finish_reason {
            Some(reason) if reason != "STOP" => LlmError::Blocked(reason.clone()),
            _ => LlmError::Provider {
                message: "candidate contained no text".to_string(),
            },
        });
    }

    let usage = response.usage_metadata.clone().unwrap_or_default();

    Ok(CompletionResponse {
        content,
        model: response
            .model_version
            .clone()
            .unwrap_or_else(|| model.to_string()),
        finish_reason: candidate.finish_reason.clone(),
        usage: Usage {
            input_tokens: usage.prompt_token_count,
            output_tokens: usage.candidates_token_count,
        },
    })
}

// No Debug derive: keeps the client and key out of formatted output.

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_GEMINI
    }

    fn model(&self) -> &str {
        &self.model
    }

    #[tracing::instrument(
        skip_all,
        fields(
            gen_ai.provider.name = PROVIDER_GEMINI,
            gen_ai.request.model = %self.resolve_model(request),
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
        )
    )]
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = self.resolve_model(request);
        let body = Self::to_gemini_request(request);

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, error_body));
        }

        let decoded: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let completion = into_completion(decoded, model)?;

        let span = Span::current();
        span.record(GEN_AI_USAGE_INPUT_TOKENS, completion.usage.input_tokens);
        span.record(GEN_AI_USAGE_OUTPUT_TOKENS, completion.usage.output_tokens);
        if let Some(reason) = &completion.finish_reason {
            span.record(GEN_AI_RESPONSE_FINISH_REASONS, reason.as_str());
        }

        Ok(completion)
    }
}
