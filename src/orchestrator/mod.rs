//! Orchestrator - the reasoning session state machine
//!
//! Drives sequential, planning, or hybrid reasoning over one
//! `ThoughtSequence`, consuming an external `StepGenerator`, and emits a
//! uniform `ReasoningResult`. One session owns one sequence, mutates it
//! serially, and runs exactly once; failures are caught at a single
//! boundary and surfaced as a terminal `SessionError` with the phase that
//! produced them.

mod metrics;
mod output;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::{ReasoningConfig, ReasoningMode};
use crate::domain::{
    Approach, ExecutionMetadata, Plan, PlanStep, ReasoningResult, ScoredHypothesis, ThoughtStep, ToolPlanEntry,
};
use crate::error::{EngineError, GeneratorError, SessionError, SessionPhase};
use crate::generator::{GenerationContext, StepGenerator};
use crate::planner::{PlanRequest, Planner};
use crate::sequence::ThoughtSequence;

pub use metrics::{hypothesis_confidence, reasoning_efficiency};
pub use output::{FormattedOutput, OutputFormat, ReasoningSummary, format_reasoning_output};

/// State of a reasoning session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet running
    Initializing,
    /// Sequential generation in progress
    Thinking,
    /// Plan construction in progress
    Planning,
    /// Finished with a result
    Completed,
    /// Finished with a terminal error
    Failed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Initializing => write!(f, "initializing"),
            SessionState::Thinking => write!(f, "thinking"),
            SessionState::Planning => write!(f, "planning"),
            SessionState::Completed => write!(f, "completed"),
            SessionState::Failed => write!(f, "failed"),
        }
    }
}

/// Per-phase output before final assembly
struct ModeOutcome {
    thoughts: Vec<ThoughtStep>,
    plan: Option<Plan>,
    conclusions: Vec<String>,
    hypotheses: Vec<ScoredHypothesis>,
    tool_plans: Vec<ToolPlanEntry>,
    metadata: ExecutionMetadata,
}

/// One reasoning session over one thought sequence
pub struct ReasoningSession {
    /// Session identifier
    session_id: Uuid,

    /// Session configuration
    config: ReasoningConfig,

    /// External step producer
    generator: Arc<dyn StepGenerator>,

    /// Plan builder
    planner: Planner,

    /// The session's thought sequence (never shared across sessions)
    sequence: ThoughtSequence,

    /// Current state
    state: SessionState,
}

impl ReasoningSession {
    /// Create a session with a fresh, empty thought sequence
    pub fn new(config: ReasoningConfig, generator: Arc<dyn StepGenerator>) -> Self {
        let session_id = Uuid::now_v7();
        info!(%session_id, mode = %config.reasoning_type, "ReasoningSession::new: created");
        Self {
            session_id,
            config,
            generator,
            planner: Planner::new(),
            sequence: ThoughtSequence::new(),
            state: SessionState::Initializing,
        }
    }

    /// Session identifier
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Read-only view of the session's thought sequence
    pub fn sequence(&self) -> &ThoughtSequence {
        &self.sequence
    }

    /// Re-visit a recorded branch
    ///
    /// Recorded-only: returns the branch as captured and logs the visit.
    /// It never re-invokes the generator.
    pub fn explore_branch(&self, branch_id: &str) -> &[ThoughtStep] {
        let steps = self.sequence.branch(branch_id);
        info!(session_id = %self.session_id, branch_id, steps = steps.len(), "explore_branch: returning recorded branch");
        steps
    }

    /// Run the session to completion
    ///
    /// Terminates in `Completed` with a fully shaped result or in `Failed`
    /// with a single phase-identifying error; partial state is discarded.
    pub async fn run(&mut self) -> Result<ReasoningResult, SessionError> {
        let started = Instant::now();
        info!(session_id = %self.session_id, mode = %self.config.reasoning_type, "ReasoningSession::run: starting");

        let outcome = match self.config.reasoning_type {
            ReasoningMode::Sequential => {
                self.transition(SessionState::Thinking);
                self.run_sequential()
                    .await
                    .map_err(|e| SessionError::in_phase(SessionPhase::Thinking, e))
            }
            ReasoningMode::Planning => {
                self.transition(SessionState::Planning);
                Ok(self.run_planning())
            }
            ReasoningMode::Hybrid => self.run_hybrid().await,
        };

        match outcome {
            Ok(outcome) => {
                let mut result = Self::assemble(outcome);
                result.execution_metadata.execution_time_ms = started.elapsed().as_millis() as u64;
                self.transition(SessionState::Completed);
                Ok(result)
            }
            Err(err) => {
                self.transition(SessionState::Failed);
                error!(session_id = %self.session_id, error = %err, "ReasoningSession::run: session failed");
                Err(err)
            }
        }
    }

    /// Sequential mode: seed from the prompt, then loop on the generator
    async fn run_sequential(&mut self) -> Result<ModeOutcome, EngineError> {
        let max_steps = self.config.effective_max_steps();
        let phase_start = self.sequence.history().len();
        let branches_before = self.sequence.branch_count();

        if let Some(prompt) = self.config.initial_prompt.clone() {
            let seed = ThoughtStep::new(self.sequence.last_step_number() + 1, prompt, true, max_steps);
            debug!(step_number = seed.step_number, "run_sequential: recording seed step");
            self.sequence.add_step(seed);
        }

        let mut generated = 0u32;
        for call_index in 1..=max_steps {
            let raw = self.call_generator(call_index, max_steps).await?;
            let mut step = self.apply_policies(raw);
            // Normalize to the next main-history number; the generator's
            // numbering is advisory.
            step.step_number = self.sequence.last_step_number() + 1;
            let done = !step.next_needed;
            self.sequence.add_step(step);
            generated += 1;
            if done {
                break;
            }
        }

        let thoughts: Vec<ThoughtStep> = self.sequence.history()[phase_start..].to_vec();
        let conclusions = metrics::terminal_conclusions(&thoughts);
        let hypotheses =
            metrics::score_hypotheses(thoughts.iter().filter_map(|s| s.hypothesis_verification.as_ref()));
        let tool_plans = metrics::dedup_tool_plans(&thoughts);
        let metadata = ExecutionMetadata {
            total_steps: generated,
            branches_explored: (self.sequence.branch_count() - branches_before) as u32,
            hypotheses_tested: hypotheses.len() as u32,
            tools_planned: tool_plans.len() as u32,
            execution_time_ms: 0,
            reasoning_efficiency: metrics::reasoning_efficiency(&thoughts, generated),
        };

        info!(
            session_id = %self.session_id,
            generated,
            branches = metadata.branches_explored,
            "run_sequential: phase complete"
        );

        Ok(ModeOutcome {
            thoughts,
            plan: None,
            conclusions,
            hypotheses,
            tool_plans,
            metadata,
        })
    }

    /// Planning mode: build a plan, project its steps into thoughts
    fn run_planning(&mut self) -> ModeOutcome {
        let problem = self.config.initial_prompt.clone().unwrap_or_default();
        let request = PlanRequest {
            problem,
            approach: Approach::Analytical,
            steps: vec![default_analysis_step()],
            success_metrics: vec![
                "Every plan step completed".to_string(),
                "Success criteria met for each step".to_string(),
            ],
            next_actions: vec!["Begin with step 1".to_string()],
            alternatives: Vec::new(),
            risk_assessment: None,
            resources: None,
        };
        let plan = self.planner.build(request);

        let phase_start = self.sequence.history().len();
        let total = plan.steps.len() as u32;
        for (i, pstep) in plan.steps.iter().enumerate() {
            // Projection keeps downstream formatting uniform across modes
            let mut thought = ThoughtStep::new(
                pstep.step_number,
                format!("{}: {}", pstep.description, pstep.reasoning),
                (i + 1) < plan.steps.len(),
                total,
            );
            if self.config.enable_tool_planning && !pstep.tools.is_empty() {
                let entries: Vec<ToolPlanEntry> = pstep
                    .tools
                    .iter()
                    .map(|tool| ToolPlanEntry {
                        tool_name: tool.clone(),
                        purpose: pstep.description.clone(),
                        expected_output: pstep.expected_output.clone(),
                        dependencies: plan.metrics.tool_dependencies.get(tool).cloned().unwrap_or_default(),
                    })
                    .collect();
                thought = thought.with_tool_plan(entries);
            }
            self.sequence.add_step(thought);
        }

        let thoughts: Vec<ThoughtStep> = self.sequence.history()[phase_start..].to_vec();
        let conclusions = plan.success_metrics.clone();
        let tool_plans = metrics::dedup_tool_plans(&thoughts);
        let metadata = ExecutionMetadata {
            total_steps: total,
            branches_explored: 0,
            hypotheses_tested: 0,
            tools_planned: tool_plans.len() as u32,
            execution_time_ms: 0,
            reasoning_efficiency: metrics::reasoning_efficiency(&thoughts, total),
        };

        info!(session_id = %self.session_id, steps = total, "run_planning: phase complete");

        ModeOutcome {
            thoughts,
            plan: Some(plan),
            conclusions,
            hypotheses: Vec::new(),
            tool_plans,
            metadata,
        }
    }

    /// Hybrid mode: planning, then sequential, over the same sequence
    async fn run_hybrid(&mut self) -> Result<ModeOutcome, SessionError> {
        self.transition(SessionState::Planning);
        let planning = self.run_planning();

        self.transition(SessionState::Thinking);
        let sequential = self
            .run_sequential()
            .await
            .map_err(|e| SessionError::in_phase(SessionPhase::Thinking, e))?;

        let mut thoughts = planning.thoughts;
        thoughts.extend(sequential.thoughts);
        let mut conclusions = planning.conclusions;
        conclusions.extend(sequential.conclusions);
        let mut hypotheses = planning.hypotheses;
        hypotheses.extend(sequential.hypotheses);
        // Sequence-wide registry re-deduplicates across phases, later wins
        let tool_plans = self.sequence.planned_tools();
        let metadata = metrics::merge_metadata(&planning.metadata, &sequential.metadata);

        Ok(ModeOutcome {
            thoughts,
            plan: planning.plan,
            conclusions,
            hypotheses,
            tool_plans,
            metadata,
        })
    }

    /// One generator call, bounded by the configured timeout
    async fn call_generator(&self, step_number: u32, max_steps: u32) -> Result<ThoughtStep, GeneratorError> {
        let ctx = GenerationContext {
            step_number,
            max_steps,
            history: self.sequence.history(),
        };
        debug!(step_number, max_steps, "call_generator: requesting step");

        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.generator.next_step(ctx))
                .await
                .map_err(|_| GeneratorError::Timeout(limit))?,
            None => self.generator.next_step(ctx).await,
        }
    }

    /// Strip payloads the configuration disables
    fn apply_policies(&self, mut step: ThoughtStep) -> ThoughtStep {
        if !self.config.allow_branching && step.branch_id.is_some() {
            warn!(step_number = step.step_number, "branching disabled; dropping branch payload");
            step.branch_id = None;
            step.branch_origin = None;
        }
        if !self.config.allow_revision && step.is_revision() {
            warn!(step_number = step.step_number, "revision disabled; dropping revision payload");
            step.is_revision = None;
            step.revises_step = None;
        }
        if !self.config.enable_hypothesis_testing
            && (step.hypothesis.is_some() || step.hypothesis_verification.is_some())
        {
            warn!(step_number = step.step_number, "hypothesis testing disabled; dropping hypothesis payload");
            step.hypothesis = None;
            step.hypothesis_verification = None;
        }
        if !self.config.enable_tool_planning && step.tool_plan.is_some() {
            warn!(step_number = step.step_number, "tool planning disabled; dropping tool plan");
            step.tool_plan = None;
        }
        step
    }

    fn assemble(outcome: ModeOutcome) -> ReasoningResult {
        ReasoningResult {
            thoughts: outcome.thoughts,
            plan: outcome.plan,
            conclusions: outcome.conclusions,
            hypotheses: outcome.hypotheses,
            tool_plans: outcome.tool_plans,
            execution_metadata: outcome.metadata,
        }
    }

    fn transition(&mut self, next: SessionState) {
        info!(session_id = %self.session_id, from = %self.state, to = %next, "ReasoningSession: state transition");
        self.state = next;
    }
}

/// The default first step planning mode seeds a request with
fn default_analysis_step() -> PlanStep {
    PlanStep::new(
        1,
        "Analyze the problem and identify key requirements",
        "Understanding the problem space comes before committing to a solution path",
        "A problem breakdown listing constraints and unknowns",
        "Requirements enumerated and restated in concrete terms",
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::generator::mock::{FailingGenerator, ScriptedGenerator};

    fn scripted(steps: Vec<(&str, bool)>) -> Arc<ScriptedGenerator> {
        Arc::new(ScriptedGenerator::new(
            steps
                .into_iter()
                .map(|(thought, next_needed)| ThoughtStep::new(0, thought, next_needed, 0))
                .collect(),
        ))
    }

    #[tokio::test]
    async fn test_sequential_seed_plus_three_steps() {
        // maxSteps=3, prompt seeds one step, generator ends on its third
        let generator = scripted(vec![("step one", true), ("step two", true), ("step three", false)]);
        let config = ReasoningConfig {
            max_steps: 3,
            initial_prompt: Some("X".to_string()),
            ..Default::default()
        };
        let mut session = ReasoningSession::new(config, generator.clone());
        let result = session.run().await.unwrap();

        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(result.thoughts.len(), 4);
        assert_eq!(result.execution_metadata.total_steps, 3);
        assert_eq!(result.conclusions, vec!["step three".to_string()]);
        assert_eq!(generator.call_count(), 3);

        // Main-history numbering stays monotonic across seed and steps
        let numbers: Vec<u32> = result.thoughts.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_sequential_respects_max_steps() {
        // Generator never says stop; the bound ends the loop
        let generator = scripted(vec![("a", true), ("b", true), ("c", true), ("d", true)]);
        let config = ReasoningConfig {
            max_steps: 2,
            ..Default::default()
        };
        let mut session = ReasoningSession::new(config, generator.clone());
        let result = session.run().await.unwrap();

        assert_eq!(result.execution_metadata.total_steps, 2);
        assert_eq!(generator.call_count(), 2);
        // No terminal step was produced, so no conclusions
        assert!(result.conclusions.is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_fails_the_session() {
        let config = ReasoningConfig::default();
        let mut session = ReasoningSession::new(config, Arc::new(FailingGenerator));
        let err = session.run().await.unwrap_err();

        assert_eq!(session.state(), SessionState::Failed);
        assert_eq!(err.phase, SessionPhase::Thinking);
        assert!(err.to_string().contains("during thinking"));
    }

    #[tokio::test]
    async fn test_generator_timeout_fails_the_session() {
        let generator =
            Arc::new(ScriptedGenerator::new(vec![ThoughtStep::new(0, "slow", false, 1)])
                .with_delay(Duration::from_millis(200)));
        let config = ReasoningConfig {
            timeout: Some(Duration::from_millis(20)),
            ..Default::default()
        };
        let mut session = ReasoningSession::new(config, generator);
        let err = session.run().await.unwrap_err();

        assert_eq!(session.state(), SessionState::Failed);
        assert!(matches!(
            err.source,
            EngineError::Generation(GeneratorError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_policy_stripping() {
        let step = ThoughtStep::new(0, "branchy", false, 1)
            .with_branch("b1", 1)
            .with_revision(1)
            .with_hypothesis("h");
        let generator = Arc::new(ScriptedGenerator::new(vec![step]));
        let config = ReasoningConfig {
            allow_branching: false,
            allow_revision: false,
            enable_hypothesis_testing: false,
            ..Default::default()
        };
        let mut session = ReasoningSession::new(config, generator);
        let result = session.run().await.unwrap();

        let recorded = &result.thoughts[0];
        assert!(recorded.branch_id.is_none());
        assert!(!recorded.is_revision());
        assert!(recorded.hypothesis.is_none());
        assert_eq!(session.sequence().branch_count(), 0);
    }

    #[tokio::test]
    async fn test_branch_recording_when_enabled() {
        let steps = vec![
            ThoughtStep::new(0, "main line", true, 2),
            ThoughtStep::new(0, "side quest", false, 2).with_branch("b1", 1),
        ];
        let generator = Arc::new(ScriptedGenerator::new(steps));
        let mut session = ReasoningSession::new(ReasoningConfig::default(), generator);
        let result = session.run().await.unwrap();

        assert_eq!(result.execution_metadata.branches_explored, 1);
        assert_eq!(session.explore_branch("b1").len(), 1);
        assert!(session.explore_branch("b2").is_empty());
    }

    #[tokio::test]
    async fn test_planning_mode_projects_plan_into_thoughts() {
        let config = ReasoningConfig {
            reasoning_type: ReasoningMode::Planning,
            initial_prompt: Some("design a cache layer".to_string()),
            ..Default::default()
        };
        // Planning never calls the generator
        let generator = Arc::new(FailingGenerator);
        let mut session = ReasoningSession::new(config, generator);
        let result = session.run().await.unwrap();

        let plan = result.plan.as_ref().unwrap();
        assert_eq!(plan.problem, "design a cache layer");
        assert_eq!(result.thoughts.len(), plan.steps.len());
        // Last projected thought is terminal
        assert!(!result.thoughts.last().unwrap().next_needed);
        // Planning conclusions are the success metrics
        assert_eq!(result.conclusions, plan.success_metrics);
    }

    #[tokio::test]
    async fn test_hybrid_concatenates_planning_then_sequential() {
        let generator = scripted(vec![("explore", true), ("answer found", false)]);
        let config = ReasoningConfig {
            reasoning_type: ReasoningMode::Hybrid,
            max_steps: 5,
            initial_prompt: Some("tune the query planner".to_string()),
            ..Default::default()
        };
        let mut session = ReasoningSession::new(config, generator);
        let result = session.run().await.unwrap();

        let plan = result.plan.as_ref().unwrap();
        // Conclusions: planning success metrics first, then sequential
        let expected: Vec<String> = plan
            .success_metrics
            .iter()
            .cloned()
            .chain(std::iter::once("answer found".to_string()))
            .collect();
        assert_eq!(result.conclusions, expected);

        // Thoughts: plan projection, seed, then generated steps
        assert_eq!(result.thoughts.len(), plan.steps.len() + 1 + 2);
        // Metadata sums generated counts across phases
        assert_eq!(
            result.execution_metadata.total_steps,
            plan.steps.len() as u32 + 2
        );

        // Numbering continues across phases
        let numbers: Vec<u32> = result.thoughts.iter().map(|s| s.step_number).collect();
        assert!(numbers.windows(2).all(|w| w[1] > w[0]));
    }

    #[tokio::test]
    async fn test_hypotheses_scored_in_result() {
        use crate::domain::{HypothesisVerification, VerificationConclusion};

        let steps = vec![
            ThoughtStep::new(0, "guess", true, 2).with_hypothesis("the index is cold"),
            ThoughtStep::new(0, "verify", false, 2).with_verification(HypothesisVerification {
                hypothesis: "the index is cold".to_string(),
                evidence: vec!["trace".to_string(), "profile".to_string()],
                conclusion: VerificationConclusion::Supported,
            }),
        ];
        let generator = Arc::new(ScriptedGenerator::new(steps));
        let mut session = ReasoningSession::new(ReasoningConfig::default(), generator);
        let result = session.run().await.unwrap();

        assert_eq!(result.execution_metadata.hypotheses_tested, 1);
        assert_eq!(result.hypotheses.len(), 1);
        assert!((result.hypotheses[0].confidence - 0.96).abs() < 1e-9);
    }
}
