//! Output formatting
//!
//! The caller picks one view of the aggregated result; formatting only
//! slices what the session already computed, nothing is recomputed here.

use serde::{Deserialize, Serialize};

use crate::domain::{Plan, ReasoningResult, ScoredHypothesis, ThoughtStep, ToolPlanEntry};

/// Which view of the result the caller wants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full thought history only
    Thoughts,
    /// The plan only
    Plan,
    /// Conclusions, hypotheses, and tool plans
    #[default]
    Summary,
    /// Conclusions only
    Conclusions,
    /// The whole aggregated result
    Full,
}

/// Summary slice of a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningSummary {
    pub conclusions: Vec<String>,
    pub hypotheses: Vec<ScoredHypothesis>,
    pub tool_plans: Vec<ToolPlanEntry>,
}

/// One formatted view of a `ReasoningResult`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FormattedOutput {
    Thoughts(Vec<ThoughtStep>),
    Plan(Option<Plan>),
    Summary(ReasoningSummary),
    Conclusions(Vec<String>),
    Full(ReasoningResult),
}

/// Slice an already-aggregated result into the requested view
pub fn format_reasoning_output(result: &ReasoningResult, format: OutputFormat) -> FormattedOutput {
    match format {
        OutputFormat::Thoughts => FormattedOutput::Thoughts(result.thoughts.clone()),
        OutputFormat::Plan => FormattedOutput::Plan(result.plan.clone()),
        OutputFormat::Summary => FormattedOutput::Summary(ReasoningSummary {
            conclusions: result.conclusions.clone(),
            hypotheses: result.hypotheses.clone(),
            tool_plans: result.tool_plans.clone(),
        }),
        OutputFormat::Conclusions => FormattedOutput::Conclusions(result.conclusions.clone()),
        OutputFormat::Full => FormattedOutput::Full(result.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExecutionMetadata;

    fn sample_result() -> ReasoningResult {
        ReasoningResult {
            thoughts: vec![
                ThoughtStep::new(1, "a", true, 2),
                ThoughtStep::new(2, "b", false, 2),
            ],
            plan: None,
            conclusions: vec!["b".to_string()],
            hypotheses: vec![],
            tool_plans: vec![],
            execution_metadata: ExecutionMetadata::default(),
        }
    }

    #[test]
    fn test_thoughts_view_is_exactly_the_thought_list() {
        let result = sample_result();
        match format_reasoning_output(&result, OutputFormat::Thoughts) {
            FormattedOutput::Thoughts(thoughts) => assert_eq!(thoughts, result.thoughts),
            other => panic!("wrong view: {other:?}"),
        }
    }

    #[test]
    fn test_conclusions_view() {
        let result = sample_result();
        match format_reasoning_output(&result, OutputFormat::Conclusions) {
            FormattedOutput::Conclusions(conclusions) => assert_eq!(conclusions, result.conclusions),
            other => panic!("wrong view: {other:?}"),
        }
    }

    #[test]
    fn test_summary_view_slices_three_collections() {
        let result = sample_result();
        match format_reasoning_output(&result, OutputFormat::Summary) {
            FormattedOutput::Summary(summary) => {
                assert_eq!(summary.conclusions, result.conclusions);
                assert!(summary.hypotheses.is_empty());
                assert!(summary.tool_plans.is_empty());
            }
            other => panic!("wrong view: {other:?}"),
        }
    }

    #[test]
    fn test_full_view_round_trips() {
        let result = sample_result();
        match format_reasoning_output(&result, OutputFormat::Full) {
            FormattedOutput::Full(full) => assert_eq!(full, result),
            other => panic!("wrong view: {other:?}"),
        }
    }

    #[test]
    fn test_format_wire_names() {
        assert_eq!(serde_json::to_string(&OutputFormat::Thoughts).unwrap(), "\"thoughts\"");
        let parsed: OutputFormat = serde_json::from_str("\"summary\"").unwrap();
        assert_eq!(parsed, OutputFormat::Summary);
    }
}
