//! ThoughtSequence - per-session store of reasoning state
//!
//! Holds the ordered main history, a branch index, the deduplicated
//! tool-plan registry, and a scratch key/value context. One sequence per
//! session, owned and serially mutated by exactly one orchestrator; it is
//! never shared across sessions. All operations are infallible in-memory
//! reads and writes.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{HypothesisVerification, ThoughtStep, ToolPlanEntry};

/// In-memory step history for one reasoning session
#[derive(Debug, Default)]
pub struct ThoughtSequence {
    /// Main ordered history
    steps: Vec<ThoughtStep>,

    /// Branch id -> branch-local ordered steps
    branches: HashMap<String, Vec<ThoughtStep>>,

    /// Tool plans in first-seen order
    tool_plans: Vec<ToolPlanEntry>,

    /// Tool name -> position in `tool_plans`
    tool_index: HashMap<String, usize>,

    /// Scratch context (last write wins)
    context: HashMap<String, serde_json::Value>,
}

impl ThoughtSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step to the main history
    ///
    /// Mirrors the step into its branch (created on first use) when
    /// `branch_id` is set, registers any tool plan, and applies any
    /// context update. Declared invariants (monotonic step numbers, first
    /// step is not a revision) are checked and logged, never enforced.
    pub fn add_step(&mut self, step: ThoughtStep) {
        debug!(
            step_number = step.step_number,
            branch_id = ?step.branch_id,
            "ThoughtSequence::add_step: called"
        );

        if self.steps.is_empty() && step.is_revision() {
            warn!(step_number = step.step_number, "first step marked as a revision");
        }
        if let Some(last) = self.steps.last()
            && step.step_number <= last.step_number
        {
            warn!(
                step_number = step.step_number,
                previous = last.step_number,
                "step number not monotonically increasing"
            );
        }

        if let Some(entries) = &step.tool_plan {
            for entry in entries {
                self.register_tool_plan(entry.clone());
            }
        }

        if let Some(update) = &step.context_update {
            debug!(key = %update.key, "ThoughtSequence::add_step: applying context update");
            self.context.insert(update.key.clone(), update.value.clone());
        }

        if let Some(branch_id) = &step.branch_id {
            self.branches.entry(branch_id.clone()).or_default().push(step.clone());
        }

        self.steps.push(step);
    }

    /// Full ordered, read-only view of the main history
    pub fn history(&self) -> &[ThoughtStep] {
        &self.steps
    }

    /// Ordered steps of one branch, empty if the branch is unknown
    pub fn branch(&self, branch_id: &str) -> &[ThoughtStep] {
        self.branches.get(branch_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Snapshot of all branches
    pub fn all_branches(&self) -> HashMap<String, Vec<ThoughtStep>> {
        self.branches.clone()
    }

    /// Number of branches created so far
    pub fn branch_count(&self) -> usize {
        self.branches.len()
    }

    /// Steps marked as revisions
    pub fn revisions(&self) -> Vec<&ThoughtStep> {
        self.steps.iter().filter(|s| s.is_revision()).collect()
    }

    /// Steps that raised a hypothesis, paired with the hypothesis text
    pub fn hypotheses(&self) -> Vec<(&ThoughtStep, &str)> {
        self.steps
            .iter()
            .filter_map(|s| s.hypothesis.as_deref().map(|h| (s, h)))
            .collect()
    }

    /// Steps that carry a verification verdict, paired with the payload
    pub fn verified_hypotheses(&self) -> Vec<(&ThoughtStep, &HypothesisVerification)> {
        self.steps
            .iter()
            .filter_map(|s| s.hypothesis_verification.as_ref().map(|v| (s, v)))
            .collect()
    }

    /// Tool plans deduplicated by tool name
    ///
    /// First-seen position is kept; on a duplicate name the most recently
    /// added entry wins wholesale. Dependencies are never merged across
    /// duplicates.
    pub fn planned_tools(&self) -> Vec<ToolPlanEntry> {
        debug!(count = self.tool_plans.len(), "ThoughtSequence::planned_tools: called");
        self.tool_plans.clone()
    }

    /// Read-only view of the scratch context
    pub fn context(&self) -> &HashMap<String, serde_json::Value> {
        &self.context
    }

    /// Highest step number recorded so far, 0 when empty
    pub fn last_step_number(&self) -> u32 {
        self.steps.iter().map(|s| s.step_number).max().unwrap_or(0)
    }

    fn register_tool_plan(&mut self, entry: ToolPlanEntry) {
        match self.tool_index.get(&entry.tool_name) {
            Some(&pos) => {
                debug!(tool = %entry.tool_name, "ThoughtSequence::register_tool_plan: replacing duplicate");
                self.tool_plans[pos] = entry;
            }
            None => {
                self.tool_index.insert(entry.tool_name.clone(), self.tool_plans.len());
                self.tool_plans.push(entry);
            }
        }
    }
}
