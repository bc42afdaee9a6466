//! Prompt construction for the conversation cycle.
//!
//! Everything here is a pure function of its inputs: the same profile always
//! yields the same system instruction.

use mirrorchat_types::profile::{BigFiveTrait, Profile};

const PERSONA_PREAMBLE: &str = "You are the user's conversation partner. Your behaviour is tuned to reflect the user's own personality traits.
The user's current estimated traits (Big Five model) are listed below. Stay in character with these traits in every reply.";

const PERSONA_CLOSING: &str = "Your replies are strongly shaped by this personality profile.
Subtly mimic the user's way of speaking and the words they use, little by little, to build a sense of closeness.";

/// Build the system instruction from a profile.
///
/// Each of the five traits is bucketed into a level; missing or non-numeric
/// scores read as the midpoint.
pub fn build_system_instruction(profile: &Profile) -> String {
    let mut out = String::with_capacity(512);
    out.push_str(PERSONA_PREAMBLE);
    out.push_str("\n\n");
    for t in BigFiveTrait::ALL {
        out.push_str(&format!("- {}: {}\n", t.label(), profile.level(t)));
    }
    out.push('\n');
    out.push_str(PERSONA_CLOSING);
    out
}

/// Whether the exchange about to complete should carry a follow-up question.
///
/// True on every `interval`-th completed exchange, counting the current one.
pub fn is_follow_up_turn(conversation_count: u64, interval: u64) -> bool {
    interval > 0 && (conversation_count + 1) % interval == 0
}

/// Free-text prompt asking for exactly one follow-up question.
pub fn follow_up_question_prompt(profile: &Profile, user_message: &str, reply: &str) -> String {
    format!(
        "The user just said: \"{user_message}\"\n\
         You replied: \"{reply}\"\n\
         Current personality profile of the user: {profile}\n\
         Considering the flow of this conversation and the user's personality, write exactly one natural question \
         that draws out a new side of the user. Return only the question.",
        profile = profile.to_json(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(value: serde_json::Value) -> Profile {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_profile_is_all_average() {
        let prompt = build_system_instruction(&Profile::default());
        for label in ["Openness", "Conscientiousness", "Extraversion", "Agreeableness", "Neuroticism"] {
            assert!(prompt.contains(&format!("- {label}: average")), "missing {label}");
        }
    }

    #[test]
    fn test_levels_reflect_scores() {
        let p = profile(json!({
            "openness": 0.95,
            "conscientiousness": 0.65,
            "extraversion": 0.5,
            "agreeableness": 0.35,
            "neuroticism": 0.1
        }));
        let prompt = build_system_instruction(&p);
        assert!(prompt.contains("- Openness: very high\n"));
        assert!(prompt.contains("- Conscientiousness: high\n"));
        assert!(prompt.contains("- Extraversion: average\n"));
        assert!(prompt.contains("- Agreeableness: low\n"));
        assert!(prompt.contains("- Neuroticism: very low\n"));
    }

    #[test]
    fn test_instruction_is_deterministic_and_mentions_mimicry() {
        let p = profile(json!({"openness": 0.8, "conversationCount": 12}));
        assert_eq!(build_system_instruction(&p), build_system_instruction(&p));
        assert!(build_system_instruction(&p).contains("mimic the user's way of speaking"));
    }

    #[test]
    fn test_follow_up_turns() {
        assert!(!is_follow_up_turn(0, 5));
        assert!(!is_follow_up_turn(3, 5));
        assert!(is_follow_up_turn(4, 5));
        assert!(!is_follow_up_turn(5, 5));
        assert!(is_follow_up_turn(9, 5));
        assert!(!is_follow_up_turn(4, 0));
    }

    #[test]
    fn test_follow_up_prompt_carries_context() {
        let p = profile(json!({"openness": 0.8}));
        let prompt = follow_up_question_prompt(&p, "I like hiking", "Nice!");
        assert!(prompt.contains("I like hiking"));
        assert!(prompt.contains("Nice!"));
        assert!(prompt.contains(r#"{"openness":0.8}"#));
        assert!(prompt.contains("exactly one"));
    }
}
