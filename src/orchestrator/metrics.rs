//! Derived session metrics
//!
//! Confidence scoring for tested hypotheses, the non-repetition efficiency
//! proxy, conclusion derivation, and the hybrid-mode metadata merge.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::{
    ExecutionMetadata, HypothesisVerification, ScoredHypothesis, ThoughtStep, ToolPlanEntry, VerificationConclusion,
};

/// Confidence for a tested hypothesis, in [0, 1]
///
/// Base value by verdict, boosted 10% per evidence item, clamped.
pub fn hypothesis_confidence(conclusion: VerificationConclusion, evidence_count: usize) -> f64 {
    let base = match conclusion {
        VerificationConclusion::Supported => 0.8,
        VerificationConclusion::Refuted => 0.2,
        VerificationConclusion::NeedsMoreData | VerificationConclusion::Inconclusive => 0.5,
    };
    let boost = 1.0 + 0.1 * evidence_count as f64;
    (base * boost).clamp(0.0, 1.0)
}

/// Score every verification payload into the result's hypothesis list
pub fn score_hypotheses<'a>(verified: impl IntoIterator<Item = &'a HypothesisVerification>) -> Vec<ScoredHypothesis> {
    verified
        .into_iter()
        .map(|v| ScoredHypothesis {
            hypothesis: v.hypothesis.clone(),
            evidence: v.evidence.clone(),
            conclusion: v.conclusion,
            confidence: hypothesis_confidence(v.conclusion, v.evidence.len()),
        })
        .collect()
}

/// Non-repetition proxy: distinct consecutive thoughts / total steps
///
/// The first step always counts as distinct. Clamped to [0, 1]; a proxy
/// for progress, not a semantic measure.
pub fn reasoning_efficiency(thoughts: &[ThoughtStep], total_steps: u32) -> f64 {
    if total_steps == 0 || thoughts.is_empty() {
        return 0.0;
    }

    let mut distinct = 1u32;
    for pair in thoughts.windows(2) {
        if pair[1].thought != pair[0].thought {
            distinct += 1;
        }
    }

    let efficiency = (distinct as f64 / total_steps as f64).clamp(0.0, 1.0);
    debug!(distinct, total_steps, efficiency, "reasoning_efficiency: computed");
    efficiency
}

/// Thought text of every step that declared itself terminal
pub fn terminal_conclusions(thoughts: &[ThoughtStep]) -> Vec<String> {
    thoughts.iter().filter(|s| !s.next_needed).map(|s| s.thought.clone()).collect()
}

/// Deduplicate tool plans by name over a slice of thoughts
///
/// Same semantics as the sequence-wide registry: first-seen position
/// kept, most recently added entry wins, dependencies never merged.
pub fn dedup_tool_plans(thoughts: &[ThoughtStep]) -> Vec<ToolPlanEntry> {
    let mut plans: Vec<ToolPlanEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in thoughts.iter().filter_map(|s| s.tool_plan.as_ref()).flatten() {
        match index.get(&entry.tool_name) {
            Some(&pos) => plans[pos] = entry.clone(),
            None => {
                index.insert(entry.tool_name.clone(), plans.len());
                plans.push(entry.clone());
            }
        }
    }

    plans
}

/// Merge hybrid-mode phase metadata: sums, max of branches, mean efficiency
pub fn merge_metadata(planning: &ExecutionMetadata, sequential: &ExecutionMetadata) -> ExecutionMetadata {
    ExecutionMetadata {
        total_steps: planning.total_steps + sequential.total_steps,
        branches_explored: planning.branches_explored.max(sequential.branches_explored),
        hypotheses_tested: planning.hypotheses_tested + sequential.hypotheses_tested,
        tools_planned: planning.tools_planned + sequential.tools_planned,
        execution_time_ms: 0, // whole-session elapsed, filled in at completion
        reasoning_efficiency: (planning.reasoning_efficiency + sequential.reasoning_efficiency) / 2.0,
    }
}
