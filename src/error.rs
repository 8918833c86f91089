//! Error types for the reasoning engine
//!
//! Plan-shape problems are values (`ValidationIssue`), not errors. Real
//! failures are typed: `GeneratorError` from the external step call,
//! `EngineError` inside a phase, and `SessionError` as the single terminal
//! failure surfaced by the orchestrator.

use std::time::Duration;

use thiserror::Error;

/// Errors from the external step-generation call
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("generation was cancelled")]
    Cancelled,

    #[error("generation failed: {0}")]
    Generation(String),

    #[error("generator returned an unusable step: {0}")]
    InvalidStep(String),

    #[error("failed to decode generator output: {0}")]
    Json(#[from] serde_json::Error),
}

impl GeneratorError {
    /// Whether the failure came from cancellation or timeout
    pub fn is_cancellation(&self) -> bool {
        matches!(self, GeneratorError::Timeout(_) | GeneratorError::Cancelled)
    }
}

/// Failures inside a reasoning phase
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Generation(#[from] GeneratorError),

    #[error("unknown reasoning type: '{0}' (supported: sequential, planning, hybrid)")]
    UnknownReasoningType(String),
}

/// Phase a session failure occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Initializing,
    Thinking,
    Planning,
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Initializing => write!(f, "initializing"),
            SessionPhase::Thinking => write!(f, "thinking"),
            SessionPhase::Planning => write!(f, "planning"),
        }
    }
}

/// Terminal failure of a reasoning session
///
/// Caught once at the orchestrator boundary. A failed session surfaces
/// only this error; partial state is discarded, never returned.
#[derive(Debug, Error)]
#[error("reasoning session failed during {phase}: {source}")]
pub struct SessionError {
    /// Phase the failure occurred in
    pub phase: SessionPhase,

    /// Underlying failure
    #[source]
    pub source: EngineError,
}

impl SessionError {
    /// Wrap an engine error with the phase it occurred in
    pub fn in_phase(phase: SessionPhase, source: EngineError) -> Self {
        Self { phase, source }
    }
}
