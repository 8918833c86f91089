//! StepGenerator trait definition
//!
//! The external collaborator that produces thought text. The engine only
//! defines the seam: given the session history so far plus the step
//! counter, return one `ThoughtStep`. Model choice, prompt construction,
//! and retry policy all live behind the implementation.

use async_trait::async_trait;

use crate::domain::ThoughtStep;
use crate::error::GeneratorError;

/// Everything the generator gets to see for one call
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// 1-based index of this generation call within the phase
    pub step_number: u32,

    /// Configured upper bound on generated steps
    pub max_steps: u32,

    /// Main history recorded so far, including any seed step
    pub history: &'a [ThoughtStep],
}

/// External step producer - each call yields one thought step
///
/// Implementations decide how the step text is produced; the engine never
/// retries a failed call (any retry policy belongs behind this trait).
#[async_trait]
pub trait StepGenerator: Send + Sync {
    /// Produce the next thought step
    async fn next_step(&self, ctx: GenerationContext<'_>) -> Result<ThoughtStep, GeneratorError>;
}
