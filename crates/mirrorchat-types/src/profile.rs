//! Personality profile types.
//!
//! A [`Profile`] is a schemaless JSON document: five Big Five trait scores in
//! `[0, 1]`, a `conversationCount`, and whatever other keys the model chose to
//! return when it re-estimated the profile. Accessors are lenient -- a missing,
//! null or non-numeric trait reads as `None` and buckets as the midpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use std::fmt;

/// Document key holding the number of completed exchanges.
pub const CONVERSATION_COUNT_KEY: &str = "conversationCount";

/// Score assumed for a trait with no usable value.
pub const DEFAULT_TRAIT_SCORE: f64 = 0.5;

/// The five Big Five personality dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BigFiveTrait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl BigFiveTrait {
    pub const ALL: [BigFiveTrait; 5] = [
        BigFiveTrait::Openness,
        BigFiveTrait::Conscientiousness,
        BigFiveTrait::Extraversion,
        BigFiveTrait::Agreeableness,
        BigFiveTrait::Neuroticism,
    ];

    /// Document key for this trait.
    pub fn key(&self) -> &'static str {
        match self {
            BigFiveTrait::Openness => "openness",
            BigFiveTrait::Conscientiousness => "conscientiousness",
            BigFiveTrait::Extraversion => "extraversion",
            BigFiveTrait::Agreeableness => "agreeableness",
            BigFiveTrait::Neuroticism => "neuroticism",
        }
    }

    /// Human-readable label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            BigFiveTrait::Openness => "Openness",
            BigFiveTrait::Conscientiousness => "Conscientiousness",
            BigFiveTrait::Extraversion => "Extraversion",
            BigFiveTrait::Agreeableness => "Agreeableness",
            BigFiveTrait::Neuroticism => "Neuroticism",
        }
    }
}

/// Ordinal bucket of a trait score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitLevel {
    VeryHigh,
    High,
    Average,
    Low,
    VeryLow,
}

impl TraitLevel {
    /// Bucket a score. Thresholds are strict: `0.7` is "high", not "very high".
    pub fn from_score(score: Option<f64>) -> Self {
        let score = score.unwrap_or(DEFAULT_TRAIT_SCORE);
        if score > 0.7 {
            TraitLevel::VeryHigh
        } else if score > 0.6 {
            TraitLevel::High
        } else if score > 0.4 {
            TraitLevel::Average
        } else if score > 0.3 {
            TraitLevel::Low
        } else {
            TraitLevel::VeryLow
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TraitLevel::VeryHigh => "very high",
            TraitLevel::High => "high",
            TraitLevel::Average => "average",
            TraitLevel::Low => "low",
            TraitLevel::VeryLow => "very low",
        }
    }
}

impl fmt::Display for TraitLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's personality profile document.
///
/// Serializes transparently as the underlying JSON object, so the stored
/// document and the JSON shown to the model are the same shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Profile {
    fields: Map<String, Value>,
}

impl Profile {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Numeric score for a trait, if the document holds one.
    pub fn score(&self, t: BigFiveTrait) -> Option<f64> {
        self.fields.get(t.key()).and_then(Value::as_f64)
    }

    pub fn level(&self, t: BigFiveTrait) -> TraitLevel {
        TraitLevel::from_score(self.score(t))
    }

    /// Completed exchanges so far; 0 when absent or unusable.
    pub fn conversation_count(&self) -> u64 {
        match self.fields.get(CONVERSATION_COUNT_KEY) {
            Some(v) => v
                .as_u64()
                .or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0),
            None => 0,
        }
    }

    /// Merge-write: overwrite only the top-level keys present in `update`.
    pub fn merge(&mut self, update: &ProfileUpdate) {
        for (key, value) in update.fields() {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Compact JSON rendering for prompts.
    pub fn to_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }
}

/// A partial profile produced by the model, to be merge-written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileUpdate {
    fields: Map<String, Value>,
}

impl ProfileUpdate {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn set_conversation_count(&mut self, count: u64) {
        self.fields
            .insert(CONVERSATION_COUNT_KEY.to_string(), Value::from(count));
    }
}
