//! Session configuration types

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::EngineError;
use crate::orchestrator::OutputFormat;

/// Which reasoning mode the session runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningMode {
    /// Step-by-step generation until the generator signals completion
    #[default]
    Sequential,
    /// One-shot plan construction with derived scheduling metrics
    Planning,
    /// Planning followed by sequential over the same sequence
    Hybrid,
}

impl FromStr for ReasoningMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(ReasoningMode::Sequential),
            "planning" => Ok(ReasoningMode::Planning),
            "hybrid" => Ok(ReasoningMode::Hybrid),
            other => Err(EngineError::UnknownReasoningType(other.to_string())),
        }
    }
}

impl std::fmt::Display for ReasoningMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReasoningMode::Sequential => write!(f, "sequential"),
            ReasoningMode::Planning => write!(f, "planning"),
            ReasoningMode::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Configuration for one reasoning session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReasoningConfig {
    /// Mode to run
    pub reasoning_type: ReasoningMode,

    /// Upper bound on generated steps per sequential phase
    pub max_steps: u32,

    /// Record branch payloads on steps
    pub allow_branching: bool,

    /// Record revision payloads on steps
    pub allow_revision: bool,

    /// Record hypothesis and verification payloads on steps
    pub enable_hypothesis_testing: bool,

    /// Record tool-plan payloads on steps
    pub enable_tool_planning: bool,

    /// Problem statement / seed prompt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_prompt: Option<String>,

    /// Which view of the result the caller wants
    pub output_format: OutputFormat,

    /// Per-generator-call timeout in milliseconds; expiry fails the session
    #[serde(skip_serializing_if = "Option::is_none", with = "opt_duration_ms")]
    pub timeout: Option<Duration>,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            reasoning_type: ReasoningMode::Sequential,
            max_steps: 20,
            allow_branching: true,
            allow_revision: true,
            enable_hypothesis_testing: true,
            enable_tool_planning: true,
            initial_prompt: None,
            output_format: OutputFormat::Summary,
            timeout: None,
        }
    }
}

impl ReasoningConfig {
    /// Effective step bound: `max_steps` clamped up to 1 with a warning
    pub fn effective_max_steps(&self) -> u32 {
        if self.max_steps == 0 {
            warn!("maxSteps of 0 clamped to 1");
            1
        } else {
            self.max_steps
        }
    }
}

mod opt_duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&(d.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let ms: Option<u64> = Option::deserialize(deserializer)?;
        Ok(ms.map(Duration::from_millis))
    }
}
