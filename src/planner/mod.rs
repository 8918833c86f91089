//! Planner - builds validated, metrics-enriched plans
//!
//! Takes a problem statement and an initial step list and produces a
//! `Plan` with complexity, critical path, parallel groups, and tool
//! dependencies attached. The planner never raises a hard error for
//! malformed input: validation issues are logged, attached to the plan's
//! metrics, and construction proceeds best-effort.

mod metrics;
mod validation;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{Plan, PlanAlternative, PlanMetrics, PlanStep, Approach, ResourceEstimate, RiskAssessment};

pub use metrics::{complexity, critical_path, execution_tips, parallel_groups, tool_dependencies};
pub use validation::validate_steps;

/// Input to plan construction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    /// Problem statement the plan addresses
    pub problem: String,

    /// Chosen approach
    pub approach: Approach,

    /// Initial step list (may be empty; metrics degrade gracefully)
    #[serde(default)]
    pub steps: Vec<PlanStep>,

    /// How success is measured
    #[serde(default)]
    pub success_metrics: Vec<String>,

    /// Immediate next actions
    #[serde(default)]
    pub next_actions: Vec<String>,

    /// Alternative approaches considered
    #[serde(default)]
    pub alternatives: Vec<PlanAlternative>,

    /// Risks and mitigations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,

    /// Expected resource consumption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceEstimate>,
}

impl PlanRequest {
    /// Minimal request: problem, approach, and steps
    pub fn new(problem: impl Into<String>, approach: Approach, steps: Vec<PlanStep>) -> Self {
        Self {
            problem: problem.into(),
            approach,
            steps,
            success_metrics: Vec::new(),
            next_actions: Vec::new(),
            alternatives: Vec::new(),
            risk_assessment: None,
            resources: None,
        }
    }
}

/// Builds plans and their derived metrics
#[derive(Debug, Clone, Copy, Default)]
pub struct Planner;

impl Planner {
    pub fn new() -> Self {
        Self
    }

    /// Build a validated, metrics-enriched plan
    ///
    /// Never fails. An empty step list yields a structurally valid plan
    /// with empty critical path and zero complexity.
    pub fn build(&self, request: PlanRequest) -> Plan {
        debug!(problem = %request.problem, step_count = request.steps.len(), "Planner::build: called");

        let validation_issues = validate_steps(&request.steps);
        let complexity = metrics::complexity(&request.steps, request.alternatives.len());
        let critical_path = metrics::critical_path(&request.steps);
        let parallel_groups = metrics::parallel_groups(&request.steps);
        let tool_dependencies = metrics::tool_dependencies(&request.steps);
        let execution_tips = metrics::execution_tips(request.approach, &complexity, &request.steps);

        info!(
            steps = request.steps.len(),
            issues = validation_issues.len(),
            complexity = complexity.score,
            "Planner::build: plan constructed"
        );

        Plan {
            problem: request.problem,
            approach: request.approach,
            steps: request.steps,
            alternatives: request.alternatives,
            risk_assessment: request.risk_assessment,
            resources: request.resources,
            success_metrics: request.success_metrics,
            next_actions: request.next_actions,
            metrics: PlanMetrics {
                complexity,
                critical_path,
                parallel_groups,
                tool_dependencies,
                execution_tips,
                validation_issues,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComplexityBucket, ValidationIssueKind};

    fn step(number: u32, deps: &[u32]) -> PlanStep {
        PlanStep::new(number, format!("step {number}"), "because", "output", "done")
            .with_dependencies(deps.to_vec())
    }

    #[test]
    fn test_build_attaches_metrics() {
        let request = PlanRequest::new(
            "speed up the import pipeline",
            Approach::Analytical,
            vec![step(1, &[]), step(2, &[1]), step(3, &[1])],
        );
        let plan = Planner::new().build(request);

        assert_eq!(plan.metrics.critical_path, vec![1, 2, 3]);
        assert_eq!(plan.metrics.parallel_groups, vec![vec![2, 3]]);
        assert!(plan.metrics.validation_issues.is_empty());
        assert_eq!(plan.steps.len(), 3);
    }

    #[test]
    fn test_missing_dependency_is_logged_not_fatal() {
        // dependency 5 does not exist; the 2-step plan still comes back
        let request = PlanRequest::new("broken deps", Approach::Systematic, vec![step(1, &[]), step(2, &[5])]);
        let plan = Planner::new().build(request);

        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.metrics.validation_issues.len(), 1);
        assert_eq!(plan.metrics.validation_issues[0].kind, ValidationIssueKind::MissingDependency);
        // step 2 is unreachable, so the path degrades
        assert_eq!(plan.metrics.critical_path, vec![1]);
    }

    #[test]
    fn test_empty_steps_yield_structurally_valid_plan() {
        let request = PlanRequest::new("nothing yet", Approach::Creative, vec![]);
        let plan = Planner::new().build(request);

        assert!(plan.steps.is_empty());
        assert!(plan.metrics.critical_path.is_empty());
        assert_eq!(plan.metrics.complexity.score, 0.0);
        assert_eq!(plan.metrics.complexity.bucket, ComplexityBucket::Low);
        assert!(!plan.metrics.execution_tips.is_empty());
    }

    #[test]
    fn test_request_deserializes_from_minimal_json() {
        let json = r#"{
            "problem": "rank the search results",
            "approach": "experimental",
            "steps": []
        }"#;
        let request: PlanRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.approach, Approach::Experimental);
        assert!(request.success_metrics.is_empty());
    }
}
