//! OpenTelemetry GenAI Semantic Convention names used on LLM spans.
//!
//! Span macros need field names written literally when the span is opened
//! (`gen_ai.request.model` and friends); fields declared there as
//! `tracing::field::Empty` are filled in later with `Span::record` using the
//! keys below.

// --- Response attributes ---

/// The unique response ID from the provider.
pub const GEN_AI_RESPONSE_ID: &str = "gen_ai.response.id";

/// The model that actually served the response.
pub const GEN_AI_RESPONSE_MODEL: &str = "gen_ai.response.model";

/// The number of input tokens consumed.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// The number of output tokens generated.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

// --- Values ---

/// Standard chat completion operation.
pub const OP_CHAT: &str = "chat";

/// Provider name reported for any OpenAI-compatible endpoint.
pub const PROVIDER_OPENAI_COMPATIBLE: &str = "openai_compatible";
