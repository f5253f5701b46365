//! Seam to the external AI evaluator that produces raw scores.
//!
//! The engine never asks why a prompt scored what it did; it only consumes
//! the number (plus optional feedback text passed through to the player).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::LevelId;
use crate::error::EvaluatorError;

/// Raw evaluation as returned by the evaluator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
  /// 0-100, before hint penalties.
  pub raw_score: u32,
  #[serde(default)] pub feedback: Option<String>,
}

impl Evaluation {
  pub fn score(raw_score: u32) -> Self { Self { raw_score, feedback: None } }

  pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
    self.feedback = Some(feedback.into());
    self
  }
}

#[async_trait]
pub trait Evaluator: Send + Sync {
  async fn evaluate(&self, level_id: &LevelId, prompt: &str) -> Result<Evaluation, EvaluatorError>;
}
