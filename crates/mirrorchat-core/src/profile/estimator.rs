//! Profile re-estimation via LLM.
//!
//! After every exchange the model is shown the user's latest message and the
//! current profile and asked for an adjusted profile as JSON inside a fenced
//! ```` ```json ```` block. Extraction is best-effort: anything that does not
//! yield a JSON object is reported as `None` and the stored profile stays as
//! it was.

use serde_json::{Map, Value};

use mirrorchat_types::llm::{CompletionRequest, LlmError};
use mirrorchat_types::profile::{Profile, ProfileUpdate};

use crate::llm::box_provider::BoxLlmProvider;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

const ANALYSIS_INSTRUCTIONS: &str = "Based on this information, fine-tune the profile. \
Return the adjusted profile as a JSON object inside a ```json fenced code block. \
Use the keys openness, conscientiousness, extraversion, agreeableness and neuroticism, \
each a number between 0 and 1.";

/// Free-text prompt asking the model to adjust the profile.
pub fn profile_analysis_prompt(user_message: &str, profile: &Profile) -> String {
    format!(
        "User's message: \"{user_message}\"\nCurrent profile: {}\n{ANALYSIS_INSTRUCTIONS}",
        profile.to_json()
    )
}

/// Extract the first ```` ```json ```` fenced block and parse it as a JSON object.
///
/// Returns `None` when there is no opening fence, the block is not valid
/// JSON, or the JSON is not an object. A missing closing fence takes the rest
/// of the text.
pub fn extract_fenced_json(text: &str) -> Option<Map<String, Value>> {
    let start = text.find(FENCE_OPEN)? + FENCE_OPEN.len();
    let rest = &text[start..];
    let body = match rest.find(FENCE_CLOSE) {
        Some(end) => &rest[..end],
        None => rest,
    };

    match serde_json::from_str::<Value>(body.trim()).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Stateless utility for re-estimating a profile.
pub struct ProfileEstimator;

impl ProfileEstimator {
    /// Ask the model for an adjusted profile.
    ///
    /// `Err` means the model call itself failed; `Ok(None)` means the reply
    /// held no usable JSON object (logged at warn).
    #[tracing::instrument(name = "estimate_profile", skip_all, fields(provider = provider.name()))]
    pub async fn estimate(
        provider: &BoxLlmProvider,
        user_message: &str,
        profile: &Profile,
    ) -> Result<Option<ProfileUpdate>, LlmError> {
        let request = CompletionRequest::prompt(profile_analysis_prompt(user_message, profile));
        let response = provider.complete(&request).await?;

        match extract_fenced_json(&response.content) {
            Some(fields) => Ok(Some(ProfileUpdate::from_fields(fields))),
            None => {
                let preview: String = response.content.chars().take(200).collect();
                tracing::warn!(
                    content_preview = %preview,
                    "No JSON profile found in model reply; keeping previous profile"
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_fenced_block() {
        let text = "Here you go:\n```json\n{\"openness\": 0.7, \"neuroticism\": 0.2}\n```\nHope that helps.";
        let map = extract_fenced_json(text).unwrap();
        assert_eq!(map.get("openness"), Some(&json!(0.7)));
        assert_eq!(map.get("neuroticism"), Some(&json!(0.2)));
    }

    #[test]
    fn test_extract_takes_first_block() {
        let text = "```json\n{\"a\": 1}\n```\n```json\n{\"b\": 2}\n```";
        let map = extract_fenced_json(text).unwrap();
        assert!(map.contains_key("a"));
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn test_extract_without_closing_fence() {
        let map = extract_fenced_json("```json {\"openness\": 0.4}").unwrap();
        assert_eq!(map.get("openness"), Some(&json!(0.4)));
    }

    #[test]
    fn test_extract_rejects_unfenced_json() {
        assert!(extract_fenced_json("{\"openness\": 0.4}").is_none());
    }

    #[test]
    fn test_extract_rejects_malformed_json() {
        assert!(extract_fenced_json("```json\n{openness: 0.4,,}\n```").is_none());
    }

    #[test]
    fn test_extract_rejects_non_object() {
        assert!(extract_fenced_json("```json\n[0.1, 0.2]\n```").is_none());
        assert!(extract_fenced_json("```json\n\"text\"\n```").is_none());
    }

    #[test]
    fn test_analysis_prompt_contents() {
        let profile: Profile = serde_json::from_value(json!({"openness": 0.6})).unwrap();
        let prompt = profile_analysis_prompt("I love jazz", &profile);
        assert!(prompt.contains("\"I love jazz\""));
        assert!(prompt.contains(r#"{"openness":0.6}"#));
        assert!(prompt.contains("```json"));
    }
}
