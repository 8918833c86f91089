//! Derived scheduling metrics over a plan's dependency graph
//!
//! Critical path and parallel groups come from the same level-by-level
//! expansion: start from dependency-free steps, repeatedly admit steps
//! whose dependencies are fully satisfied. This is a breadth-level
//! approximation of the longest chain, not a weighted longest path.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::domain::{Approach, ComplexityBucket, ComplexityScore, PlanStep};

/// Complexity score: steps + total dependencies + 2x distinct tools
/// + 0.5x alternatives, bucketed
pub fn complexity(steps: &[PlanStep], alternative_count: usize) -> ComplexityScore {
    let dependency_total: usize = steps.iter().map(|s| s.dependencies.len()).sum();
    let distinct_tools: HashSet<&str> = steps.iter().flat_map(|s| s.tools.iter().map(String::as_str)).collect();

    let score =
        steps.len() as f64 + dependency_total as f64 + 2.0 * distinct_tools.len() as f64 + 0.5 * alternative_count as f64;

    let bucket = if score <= 5.0 {
        ComplexityBucket::Low
    } else if score <= 15.0 {
        ComplexityBucket::Medium
    } else if score <= 30.0 {
        ComplexityBucket::High
    } else {
        ComplexityBucket::VeryHigh
    };

    debug!(score, ?bucket, "complexity: computed");
    ComplexityScore { score, bucket }
}

/// Level-by-level expansion of the dependency graph
///
/// Each level holds the steps whose dependencies are satisfied by the
/// levels before it, in step order. Steps whose dependencies can never be
/// satisfied (missing references, self references) are never admitted.
fn level_expansion(steps: &[PlanStep]) -> Vec<Vec<u32>> {
    let mut visited: HashSet<u32> = HashSet::new();
    let mut remaining: Vec<&PlanStep> = steps.iter().collect();
    let mut levels = Vec::new();

    loop {
        let (ready, rest): (Vec<&PlanStep>, Vec<&PlanStep>) = remaining
            .into_iter()
            .partition(|s| s.dependencies.iter().all(|d| visited.contains(d)));

        if ready.is_empty() {
            break;
        }

        let level: Vec<u32> = ready.iter().map(|s| s.step_number).collect();
        visited.extend(level.iter().copied());
        levels.push(level);
        remaining = rest;
    }

    levels
}

/// Union of all reachable step numbers, sorted ascending
pub fn critical_path(steps: &[PlanStep]) -> Vec<u32> {
    let path: BTreeSet<u32> = level_expansion(steps).into_iter().flatten().collect();
    debug!(length = path.len(), "critical_path: computed");
    path.into_iter().collect()
}

/// Levels with more than one schedulable step, in discovery order
pub fn parallel_groups(steps: &[PlanStep]) -> Vec<Vec<u32>> {
    level_expansion(steps).into_iter().filter(|level| level.len() > 1).collect()
}

/// Tool name -> tools of the step's dependency steps
///
/// Predecessor tool lists are concatenated verbatim, not deduplicated.
/// Preserved as-is for parity with the reference behavior.
pub fn tool_dependencies(steps: &[PlanStep]) -> HashMap<String, Vec<String>> {
    let by_number: HashMap<u32, &PlanStep> = steps.iter().map(|s| (s.step_number, s)).collect();
    let mut map: HashMap<String, Vec<String>> = HashMap::new();

    for step in steps {
        for tool in &step.tools {
            let entry = map.entry(tool.clone()).or_default();
            for dep in &step.dependencies {
                if let Some(dep_step) = by_number.get(dep) {
                    entry.extend(dep_step.tools.iter().cloned());
                }
            }
        }
    }

    map
}

/// Advisory execution tips keyed by approach and graph shape
///
/// Never affects control flow.
pub fn execution_tips(approach: Approach, complexity: &ComplexityScore, steps: &[PlanStep]) -> Vec<String> {
    let mut tips = Vec::new();

    tips.push(
        match approach {
            Approach::Analytical => "Work from first principles and verify each inference before building on it",
            Approach::Experimental => "Define the expected outcome of each experiment before running it",
            Approach::Creative => "Generate several candidate directions before committing to one",
            Approach::Systematic => "Complete and check each step fully before starting the next",
            Approach::Hybrid => "Alternate between structured execution and open exploration as results come in",
        }
        .to_string(),
    );

    if matches!(complexity.bucket, ComplexityBucket::High | ComplexityBucket::VeryHigh) {
        tips.push("Complexity is high; consider splitting the plan into smaller sub-plans".to_string());
    }

    if !steps.is_empty() {
        let density = steps.iter().map(|s| s.dependencies.len()).sum::<usize>() as f64 / steps.len() as f64;
        if density > 1.5 {
            tips.push("Steps are heavily interdependent; schedule strictly in dependency order".to_string());
        }
    }

    tips
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(number: u32, deps: &[u32]) -> PlanStep {
        PlanStep::new(number, format!("step {number}"), "because", "output", "done")
            .with_dependencies(deps.to_vec())
    }

    fn step_with_tools(number: u32, deps: &[u32], tools: &[&str]) -> PlanStep {
        step(number, deps).with_tools(tools.iter().map(|t| t.to_string()).collect())
    }

    #[test]
    fn test_complexity_formula() {
        // 3 steps + 2 deps + 2x2 distinct tools + 0.5x1 alternative = 9.5
        let steps = vec![
            step_with_tools(1, &[], &["search"]),
            step_with_tools(2, &[1], &["search", "parse"]),
            step(3, &[2]),
        ];
        let score = complexity(&steps, 1);
        assert_eq!(score.score, 9.5);
        assert_eq!(score.bucket, ComplexityBucket::Medium);
    }

    #[test]
    fn test_complexity_buckets() {
        let five = vec![step(1, &[]), step(2, &[]), step(3, &[]), step(4, &[]), step(5, &[])];
        assert_eq!(complexity(&five, 0).bucket, ComplexityBucket::Low);

        let six: Vec<PlanStep> = (1..=6).map(|n| step(n, &[])).collect();
        assert_eq!(complexity(&six, 0).bucket, ComplexityBucket::Medium);

        let sixteen: Vec<PlanStep> = (1..=16).map(|n| step(n, &[])).collect();
        assert_eq!(complexity(&sixteen, 0).bucket, ComplexityBucket::High);

        let many: Vec<PlanStep> = (1..=31).map(|n| step(n, &[])).collect();
        assert_eq!(complexity(&many, 0).bucket, ComplexityBucket::VeryHigh);
    }

    #[test]
    fn test_empty_plan_degrades() {
        assert!(critical_path(&[]).is_empty());
        assert!(parallel_groups(&[]).is_empty());
        assert_eq!(complexity(&[], 0).score, 0.0);
    }

    #[test]
    fn test_critical_path_and_parallel_groups_diamond() {
        // 1 -> {2, 3} -> 4
        let steps = vec![step(1, &[]), step(2, &[1]), step(3, &[1]), step(4, &[2, 3])];
        assert_eq!(critical_path(&steps), vec![1, 2, 3, 4]);
        assert_eq!(parallel_groups(&steps), vec![vec![2, 3]]);
    }

    #[test]
    fn test_root_level_counts_as_parallel_group() {
        let steps = vec![step(1, &[]), step(2, &[]), step(3, &[1, 2])];
        assert_eq!(parallel_groups(&steps), vec![vec![1, 2]]);
    }

    #[test]
    fn test_unsatisfiable_steps_never_visited() {
        let steps = vec![step(1, &[]), step(2, &[5])];
        assert_eq!(critical_path(&steps), vec![1]);
    }

    #[test]
    fn test_tool_dependencies_concatenate_without_dedup() {
        let steps = vec![
            step_with_tools(1, &[], &["search"]),
            step_with_tools(2, &[], &["search"]),
            step_with_tools(3, &[1, 2], &["merge"]),
        ];
        let map = tool_dependencies(&steps);
        // Both predecessors named "search"; concatenation keeps both
        assert_eq!(map["merge"], vec!["search".to_string(), "search".to_string()]);
        assert!(map["search"].is_empty());
    }

    #[test]
    fn test_tips_are_advisory_strings() {
        let steps = vec![step(1, &[])];
        let tips = execution_tips(Approach::Systematic, &complexity(&steps, 0), &steps);
        assert_eq!(tips.len(), 1);

        let dense: Vec<PlanStep> = vec![step(1, &[]), step(2, &[1]), step(3, &[1, 2]), step(4, &[1, 2, 3])];
        let score = ComplexityScore {
            score: 20.0,
            bucket: ComplexityBucket::High,
        };
        let tips = execution_tips(Approach::Analytical, &score, &dense);
        assert_eq!(tips.len(), 3);
    }
}
