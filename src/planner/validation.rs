//! Lenient plan-shape validation
//!
//! Issues are warnings, never errors: a malformed plan is still returned
//! with its issues attached, and metric computation degrades to
//! best-effort over whatever is satisfiable.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::domain::{PlanStep, ValidationIssue, ValidationIssueKind};

/// Check declared dependencies and step numbering
///
/// Flags missing dependencies, forward or self dependencies (one rule
/// covers both, since `d >= step_number` catches same-number references),
/// and duplicate step numbers.
pub fn validate_steps(steps: &[PlanStep]) -> Vec<ValidationIssue> {
    debug!(step_count = steps.len(), "validate_steps: called");

    let known: HashSet<u32> = steps.iter().map(|s| s.step_number).collect();
    let mut seen: HashSet<u32> = HashSet::new();
    let mut issues = Vec::new();

    for step in steps {
        if !seen.insert(step.step_number) {
            issues.push(ValidationIssue {
                step_number: step.step_number,
                kind: ValidationIssueKind::DuplicateStepNumber,
                detail: format!("step number {} appears more than once", step.step_number),
            });
        }

        for &dep in &step.dependencies {
            if !known.contains(&dep) {
                issues.push(ValidationIssue {
                    step_number: step.step_number,
                    kind: ValidationIssueKind::MissingDependency,
                    detail: format!("step {} depends on step {}, which does not exist", step.step_number, dep),
                });
            } else if dep >= step.step_number {
                issues.push(ValidationIssue {
                    step_number: step.step_number,
                    kind: ValidationIssueKind::ForwardOrSelfDependency,
                    detail: format!("step {} depends on step {}, a forward or self reference", step.step_number, dep),
                });
            }
        }
    }

    for issue in &issues {
        warn!(step_number = issue.step_number, kind = ?issue.kind, "{}", issue.detail);
    }

    issues
}
