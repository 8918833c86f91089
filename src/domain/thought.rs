//! Thought step domain types
//!
//! A `ThoughtStep` is one recorded unit of reasoning output. The base record
//! carries the fields every step has; revision, branching, hypothesis,
//! tool-planning, and context-update payloads are optional extensions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded unit of reasoning output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtStep {
    /// Position in the main history (monotonically increasing)
    pub step_number: u32,

    /// The thought text itself
    pub thought: String,

    /// Whether another step is expected after this one
    pub next_needed: bool,

    /// Current estimate of how many steps the whole session will take
    pub total_estimate: u32,

    /// Set when this step revises an earlier one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_revision: Option<bool>,

    /// Step number being revised
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revises_step: Option<u32>,

    /// Step number this branch forked from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_origin: Option<u32>,

    /// Branch this step belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,

    /// Generator's signal that the estimate should grow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub needs_more_steps: Option<bool>,

    /// Testable claim generated at this step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis: Option<String>,

    /// Verification outcome for a previously raised hypothesis
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hypothesis_verification: Option<HypothesisVerification>,

    /// Tools this step proposes to use later
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_plan: Option<Vec<ToolPlanEntry>>,

    /// Scratch-context write requested by this step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_update: Option<ContextUpdate>,

    /// When the step was recorded
    pub timestamp: DateTime<Utc>,
}

impl ThoughtStep {
    /// Create a plain step with no optional payloads
    pub fn new(step_number: u32, thought: impl Into<String>, next_needed: bool, total_estimate: u32) -> Self {
        Self {
            step_number,
            thought: thought.into(),
            next_needed,
            total_estimate,
            is_revision: None,
            revises_step: None,
            branch_origin: None,
            branch_id: None,
            needs_more_steps: None,
            hypothesis: None,
            hypothesis_verification: None,
            tool_plan: None,
            context_update: None,
            timestamp: Utc::now(),
        }
    }

    /// Mark this step as a revision of an earlier one
    pub fn with_revision(mut self, revises_step: u32) -> Self {
        self.is_revision = Some(true);
        self.revises_step = Some(revises_step);
        self
    }

    /// Attach this step to a branch rooted at `origin`
    pub fn with_branch(mut self, branch_id: impl Into<String>, origin: u32) -> Self {
        self.branch_id = Some(branch_id.into());
        self.branch_origin = Some(origin);
        self
    }

    /// Raise a hypothesis at this step
    pub fn with_hypothesis(mut self, hypothesis: impl Into<String>) -> Self {
        self.hypothesis = Some(hypothesis.into());
        self
    }

    /// Record a verification outcome at this step
    pub fn with_verification(mut self, verification: HypothesisVerification) -> Self {
        self.hypothesis_verification = Some(verification);
        self
    }

    /// Attach a tool plan to this step
    pub fn with_tool_plan(mut self, entries: Vec<ToolPlanEntry>) -> Self {
        self.tool_plan = Some(entries);
        self
    }

    /// Request a scratch-context write from this step
    pub fn with_context_update(mut self, update: ContextUpdate) -> Self {
        self.context_update = Some(update);
        self
    }

    /// Whether this step is a revision
    pub fn is_revision(&self) -> bool {
        self.is_revision.unwrap_or(false)
    }
}

/// Verification outcome for a hypothesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HypothesisVerification {
    /// The claim being verified
    pub hypothesis: String,

    /// Evidence gathered for or against the claim
    pub evidence: Vec<String>,

    /// Verdict
    pub conclusion: VerificationConclusion,
}

/// Verdict on a tested hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationConclusion {
    Supported,
    Refuted,
    NeedsMoreData,
    Inconclusive,
}

impl std::fmt::Display for VerificationConclusion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VerificationConclusion::Supported => write!(f, "supported"),
            VerificationConclusion::Refuted => write!(f, "refuted"),
            VerificationConclusion::NeedsMoreData => write!(f, "needs_more_data"),
            VerificationConclusion::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

/// One planned tool use
///
/// A small closed struct rather than an open map: tool plans cross the
/// result-payload boundary and consumers depend on these exact fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPlanEntry {
    /// Name of the tool
    pub tool_name: String,

    /// Why the tool is needed
    pub purpose: String,

    /// What the tool is expected to produce
    pub expected_output: String,

    /// Tools that must run before this one
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A scratch-context write requested by a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextUpdate {
    /// Scratch key (last write wins)
    pub key: String,

    /// Arbitrary value
    pub value: serde_json::Value,

    /// Why the write was made
    pub reasoning: String,
}
