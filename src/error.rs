//! Error types for the engine.

use std::time::Duration;

use thiserror::Error;

use crate::domain::LevelId;

/// Result type for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Failures reported by an external evaluator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluatorError {
    /// Network or connection failure
    #[error("Evaluator transport failed: {0}")]
    Transport(String),

    /// No answer within the configured bound
    #[error("Evaluator timed out after {0:?}")]
    Timeout(Duration),

    /// Rate limit or quota exhausted
    #[error("Evaluator quota exceeded: {0}")]
    Quota(String),

    /// Evaluator answered with an error
    #[error("Evaluator service error: {0}")]
    Service(String),

    /// Score outside 0..=100
    #[error("Evaluator returned out-of-range score {0}")]
    InvalidScore(u32),
}

/// Errors surfaced by a challenge session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Prompt is empty or whitespace only
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error(transparent)]
    Evaluator(#[from] EvaluatorError),

    /// Level id not known to the content provider
    #[error("Unknown level: {0}")]
    UnknownLevel(LevelId),

    /// Level has not been unlocked yet
    #[error("Level is locked: {0}")]
    LevelLocked(LevelId),

    /// Another live session already owns this level's hint record
    #[error("Level already in progress: {0}")]
    LevelInProgress(LevelId),

    /// No lives left to spend on an attempt
    #[error("No lives remaining")]
    OutOfLives,

    /// Another submission for this attempt is still being evaluated
    #[error("A submission is already being evaluated")]
    SubmissionInFlight,

    /// Attempt already passed or failed; reset to retry
    #[error("Attempt already finished; reset to retry")]
    AttemptFinished,

    /// Response belonged to an abandoned attempt
    #[error("Discarded evaluator response for stale attempt generation {generation}")]
    StaleResponseDiscarded { generation: u64 },
}

impl SessionError {
    /// Whether the UI should show this error to the player.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, SessionError::StaleResponseDiscarded { .. })
    }

    /// Whether the same attempt can simply be submitted again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::EmptyPrompt | SessionError::Evaluator(_) | SessionError::SubmissionInFlight)
    }
}

/// Configuration loading failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
