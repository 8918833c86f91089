//! Domain types for the reasoning engine
//!
//! Thought steps and their optional payloads, plans with derived metrics,
//! and the aggregated result payload. Everything here is serde-serializable
//! with camelCase wire names.

mod plan;
mod result;
mod thought;

pub use plan::{
    Approach, ComplexityBucket, ComplexityScore, Plan, PlanAlternative, PlanMetrics, PlanStep, ResourceEstimate,
    RiskAssessment, ValidationIssue, ValidationIssueKind,
};
pub use result::{ExecutionMetadata, ReasoningResult, ScoredHypothesis};
pub use thought::{ContextUpdate, HypothesisVerification, ThoughtStep, ToolPlanEntry, VerificationConclusion};
