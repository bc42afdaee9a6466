//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! Field names must match the literal names declared on the span (tracing
//! requires literals at declaration), so these constants are used when
//! recording late values with `Span::record`.

/// The number of input tokens consumed.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// The number of output tokens generated.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// The finish reason reported for the response (e.g., "STOP").
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

// --- Provider name values ---

/// Google Gemini provider identifier.
pub const PROVIDER_GEMINI: &str = "gemini";
