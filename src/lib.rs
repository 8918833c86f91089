//! Ruminate - multi-step reasoning and planning engine
//!
//! A reasoning session accumulates thought steps (with branching,
//! revision, hypothesis testing, and tool planning), a planner decomposes
//! a problem into a dependency-ordered plan with derived scheduling
//! metrics, and an orchestrator drives either mode (or a hybrid) through
//! an explicit state machine and aggregates a uniform result.
//!
//! # Core Concepts
//!
//! - **One sequence per session**: each session owns a fresh
//!   [`ThoughtSequence`]; nothing is shared across sessions
//! - **The generator is external**: thought text comes from a
//!   caller-supplied [`StepGenerator`]; the engine records, validates,
//!   schedules, and aggregates
//! - **Lenient planning**: plan-shape issues are warnings attached to the
//!   plan, never construction failures
//! - **Single failure boundary**: a session ends `completed` with a full
//!   [`ReasoningResult`] or `failed` with one phase-identifying error
//!
//! # Modules
//!
//! - [`domain`] - thought steps, plans, and the result payload
//! - [`sequence`] - per-session thought store
//! - [`generator`] - the external step-generation seam
//! - [`planner`] - plan validation and derived scheduling metrics
//! - [`orchestrator`] - the session state machine and output formatting
//! - [`config`] - session configuration
//! - [`error`] - typed failure taxonomy

pub mod config;
pub mod domain;
pub mod error;
pub mod generator;
pub mod orchestrator;
pub mod planner;
pub mod sequence;

pub use config::{ReasoningConfig, ReasoningMode};
pub use domain::{
    Approach, ComplexityBucket, ComplexityScore, ContextUpdate, ExecutionMetadata, HypothesisVerification, Plan,
    PlanAlternative, PlanMetrics, PlanStep, ReasoningResult, ResourceEstimate, RiskAssessment, ScoredHypothesis,
    ThoughtStep, ToolPlanEntry, ValidationIssue, ValidationIssueKind, VerificationConclusion,
};
pub use error::{EngineError, GeneratorError, SessionError, SessionPhase};
pub use generator::{GenerationContext, StepGenerator};
pub use orchestrator::{
    FormattedOutput, OutputFormat, ReasoningSession, ReasoningSummary, SessionState, format_reasoning_output,
    hypothesis_confidence, reasoning_efficiency,
};
pub use planner::{PlanRequest, Planner, complexity, critical_path, parallel_groups, tool_dependencies, validate_steps};
pub use sequence::ThoughtSequence;
