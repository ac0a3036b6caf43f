//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// Trait for language-model backends
///
/// Implemented by the infrastructure layer (marco-llm). Calls are blocking;
/// callers that need a deadline run them off the async executor.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a single completion for `prompt` with the given model.
    ///
    /// Implementations must use deterministic (temperature zero) decoding and
    /// must not retry on failure.
    fn generate(&self, model: &str, prompt: &str) -> Result<String, Self::Error>;

    /// Human-readable backend name for logs and metadata
    fn backend_name(&self) -> &str;
}
