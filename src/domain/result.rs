//! Reasoning result payload
//!
//! `ReasoningResult` is the engine's only externally visible output. Field
//! names and shapes are a wire contract: consumers (UIs, log pipelines,
//! downstream agents) deserialize this directly, so the camelCase renames
//! here must not change.

use serde::{Deserialize, Serialize};

use super::plan::Plan;
use super::thought::{ThoughtStep, ToolPlanEntry, VerificationConclusion};

/// Aggregated output of one reasoning session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningResult {
    /// Full thought history (planning projections first in hybrid mode)
    pub thoughts: Vec<ThoughtStep>,

    /// The plan, when planning or hybrid mode ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,

    /// Terminal conclusions, always present (possibly empty)
    pub conclusions: Vec<String>,

    /// Tested hypotheses with derived confidence
    pub hypotheses: Vec<ScoredHypothesis>,

    /// Planned tool uses, deduplicated by tool name
    pub tool_plans: Vec<ToolPlanEntry>,

    /// Session-level counters and ratios
    pub execution_metadata: ExecutionMetadata,
}

/// A verified hypothesis with its derived confidence in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredHypothesis {
    pub hypothesis: String,
    pub evidence: Vec<String>,
    pub conclusion: VerificationConclusion,
    pub confidence: f64,
}

/// Session-level counters and ratios
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMetadata {
    /// Steps produced (seed steps excluded)
    pub total_steps: u32,

    /// Branches created during the session
    pub branches_explored: u32,

    /// Hypotheses that reached a verification verdict
    pub hypotheses_tested: u32,

    /// Distinct tools planned
    pub tools_planned: u32,

    /// Wall-clock session duration in milliseconds
    #[serde(rename = "executionTime")]
    pub execution_time_ms: u64,

    /// Non-repetition proxy in [0, 1]
    pub reasoning_efficiency: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collections_serialize_as_arrays() {
        let result = ReasoningResult {
            thoughts: vec![],
            plan: None,
            conclusions: vec![],
            hypotheses: vec![],
            tool_plans: vec![],
            execution_metadata: ExecutionMetadata::default(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["conclusions"].as_array().unwrap().is_empty());
        assert!(json["hypotheses"].as_array().unwrap().is_empty());
        assert!(json["toolPlans"].as_array().unwrap().is_empty());
        // Absent plan is omitted, not null
        assert!(json.get("plan").is_none());
    }

    #[test]
    fn test_metadata_wire_names() {
        let meta = ExecutionMetadata {
            total_steps: 3,
            execution_time_ms: 120,
            reasoning_efficiency: 0.5,
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["totalSteps"], 3);
        assert_eq!(json["executionTime"], 120);
        assert_eq!(json["reasoningEfficiency"], 0.5);
    }
}
