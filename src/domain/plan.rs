//! Plan domain types
//!
//! A `Plan` decomposes a problem into dependency-ordered steps plus the
//! derived scheduling metrics the planner computes over them. Core fields
//! are set once at construction; only `metrics` is enrichment.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One unit of a structured, dependency-ordered plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStep {
    /// Position in the plan
    pub step_number: u32,

    /// What this step does
    pub description: String,

    /// Why this step exists
    pub reasoning: String,

    /// What completing the step should produce
    pub expected_output: String,

    /// How to tell the step succeeded
    pub success_criteria: String,

    /// Tools this step will use
    #[serde(default)]
    pub tools: Vec<String>,

    /// Step numbers this step depends on (should be strictly smaller)
    #[serde(default)]
    pub dependencies: Vec<u32>,

    /// Rough time estimate, free-form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
}

impl PlanStep {
    /// Create a step with empty tools and dependencies
    pub fn new(
        step_number: u32,
        description: impl Into<String>,
        reasoning: impl Into<String>,
        expected_output: impl Into<String>,
        success_criteria: impl Into<String>,
    ) -> Self {
        Self {
            step_number,
            description: description.into(),
            reasoning: reasoning.into(),
            expected_output: expected_output.into(),
            success_criteria: success_criteria.into(),
            tools: Vec::new(),
            dependencies: Vec::new(),
            estimated_time: None,
        }
    }

    /// Set the tools this step uses
    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the step numbers this step depends on
    pub fn with_dependencies(mut self, dependencies: Vec<u32>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

/// Overall problem-solving approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Approach {
    Analytical,
    Experimental,
    Creative,
    Systematic,
    Hybrid,
}

impl std::fmt::Display for Approach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Approach::Analytical => write!(f, "analytical"),
            Approach::Experimental => write!(f, "experimental"),
            Approach::Creative => write!(f, "creative"),
            Approach::Systematic => write!(f, "systematic"),
            Approach::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// An alternative way to attack the problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAlternative {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    /// When to prefer this alternative
    pub use_when: String,
}

/// Risks identified for the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    #[serde(default)]
    pub major_risks: Vec<String>,
    #[serde(default)]
    pub mitigations: Vec<String>,
    #[serde(default)]
    pub fallback_plans: Vec<String>,
}

/// Resources the plan expects to consume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEstimate {
    #[serde(default)]
    pub tools_required: Vec<String>,
    #[serde(default)]
    pub data_required: Vec<String>,
    pub time_estimate: String,
    #[serde(default)]
    pub skills_required: Vec<String>,
}

/// Complexity bucket derived from the raw score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplexityBucket {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Raw complexity score plus its bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityScore {
    pub score: f64,
    pub bucket: ComplexityBucket,
}

impl Default for ComplexityScore {
    fn default() -> Self {
        Self {
            score: 0.0,
            bucket: ComplexityBucket::Low,
        }
    }
}

/// A non-fatal issue found while validating plan dependencies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    /// Step the issue was found on
    pub step_number: u32,

    /// What kind of issue
    pub kind: ValidationIssueKind,

    /// Human-readable description
    pub detail: String,
}

/// Kinds of plan-shape issues (warnings, never fatal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationIssueKind {
    MissingDependency,
    ForwardOrSelfDependency,
    DuplicateStepNumber,
}

/// Scheduling metrics derived from the plan's dependency graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetrics {
    /// Complexity score (zero for an empty plan)
    pub complexity: ComplexityScore,

    /// Reachable step numbers in ascending order
    pub critical_path: Vec<u32>,

    /// Levels with more than one schedulable step, in discovery order
    pub parallel_groups: Vec<Vec<u32>>,

    /// Tool name -> predecessor tools (concatenated, not deduplicated)
    pub tool_dependencies: HashMap<String, Vec<String>>,

    /// Advisory strings, never load-bearing
    pub execution_tips: Vec<String>,

    /// Issues found during validation
    pub validation_issues: Vec<ValidationIssue>,
}

/// A validated, metrics-enriched problem-solving plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Problem statement the plan addresses
    pub problem: String,

    /// Chosen approach
    pub approach: Approach,

    /// Ordered plan steps
    pub steps: Vec<PlanStep>,

    /// Alternative approaches considered
    #[serde(default)]
    pub alternatives: Vec<PlanAlternative>,

    /// Risks and mitigations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,

    /// Expected resource consumption
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceEstimate>,

    /// How success is measured
    pub success_metrics: Vec<String>,

    /// Immediate next actions
    pub next_actions: Vec<String>,

    /// Derived scheduling metrics
    pub metrics: PlanMetrics,
}
