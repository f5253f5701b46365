//! Hint-penalty scoring.
//!
//! Turns the evaluator's raw score into the player-visible final score:
//!
//!   penalty_per_hint = table[difficulty]
//!   penalty_points   = min(hints_used * penalty_per_hint, raw_score)
//!   final_score      = clamp(raw_score - penalty_points, 0, 100)
//!   passed           = final_score >= passing_score
//!
//! A raw score that clears the passing score can still fail once hints are
//! charged. Hints cost points on purpose; this ordering is not a bug.
//!
//! Everything here is pure integer arithmetic, so zero hints returns the raw
//! score unchanged.

use serde::Serialize;

use crate::config::PenaltyTable;
use crate::domain::{Difficulty, Level};

pub const MAX_SCORE: u32 = 100;

/// Inputs to a single scoring pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreInput {
  pub raw_score: u32,
  pub passing_score: u32,
  pub difficulty: Difficulty,
  pub hints_used: usize,
}

impl ScoreInput {
  pub fn for_level(level: &Level, raw_score: u32, hints_used: usize) -> Self {
    Self { raw_score, passing_score: level.passing_score, difficulty: level.difficulty, hints_used }
  }
}

/// Score after hint penalties, with everything the result screen shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
  pub raw_score: u32,
  pub hints_used: usize,
  pub penalty_per_hint: u32,
  pub penalty_points: u32,
  pub final_score: u32,
  pub passing_score: u32,
  pub passed: bool,
}

/// Compute the breakdown for one attempt.
///
/// Raw scores above 100 are clamped here; callers that care (the session)
/// reject them before getting this far.
pub fn compute_breakdown(table: &PenaltyTable, input: ScoreInput) -> ScoreBreakdown {
  let raw = input.raw_score.min(MAX_SCORE);
  let per_hint = table.per_hint(input.difficulty);
  let hints = u32::try_from(input.hints_used).unwrap_or(u32::MAX);
  let penalty_points = hints.saturating_mul(per_hint).min(raw);
  let final_score = raw.saturating_sub(penalty_points).min(MAX_SCORE);

  ScoreBreakdown {
    raw_score: raw,
    hints_used: input.hints_used,
    penalty_per_hint: per_hint,
    penalty_points,
    final_score,
    passing_score: input.passing_score,
    passed: final_score >= input.passing_score,
  }
}
