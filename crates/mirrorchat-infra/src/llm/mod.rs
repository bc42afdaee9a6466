//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined
//! in `mirrorchat-core`, plus a factory ([`create_provider`]) that builds a
//! type-erased provider from resolved settings.
//!
//! [`LlmProvider`]: mirrorchat_core::llm::provider::LlmProvider

pub mod gemini;

use secrecy::{ExposeSecret, SecretString};

use mirrorchat_core::llm::box_provider::BoxLlmProvider;
use mirrorchat_types::llm::LlmError;

use crate::config::GeminiSettings;

use self::gemini::GeminiProvider;

/// Create a [`BoxLlmProvider`] from [`GeminiSettings`].
///
/// # Errors
///
/// Returns [`LlmError::AuthenticationFailed`] when no API key is configured.
pub fn create_provider(settings: &GeminiSettings) -> Result<BoxLlmProvider, LlmError> {
    let key = settings
        .api_key
        .as_ref()
        .filter(|k| !k.expose_secret().is_empty())
        .ok_or(LlmError::AuthenticationFailed)?;

    let provider = GeminiProvider::new(
        SecretString::from(key.expose_secret().to_string()),
        settings.model.clone(),
    )
        .with_base_url(settings.base_url.clone());
    Ok(BoxLlmProvider::new(provider))
}
