//! Single-attempt orchestration.
//!
//! Phases: `Idle -> Submitting -> Scored -> Passed | Failed`. A retry goes
//! back to `Idle` through `reset`, which also clears the hint ledger entry
//! and bumps the attempt generation.
//!
//! Ordering rules:
//!   - one submission in flight at a time; a second `submit` is rejected
//!   - the evaluator call is the only await made without the state lock
//!   - hint usage is read after the evaluator answers, so hints revealed
//!     while waiting are charged to that attempt
//!   - a response whose generation was superseded by `reset` is dropped and
//!     never reaches the progress store
//!   - at most one live session per level; the claim is released on
//!     `teardown` or drop

use std::{
  collections::HashSet,
  sync::{Arc, Mutex as StdMutex},
  time::Duration,
};

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::catalog::LevelProvider;
use crate::config::PenaltyTable;
use crate::domain::{Level, LevelId};
use crate::error::{EvaluatorError, SessionError, SessionResult};
use crate::evaluator::{Evaluation, Evaluator};
use crate::hints::HintLedger;
use crate::progress::ProgressStore;
use crate::scoring::{compute_breakdown, ScoreBreakdown, ScoreInput, MAX_SCORE};
use crate::util::{normalize_prompt, trunc_for_log};

/// Collaborators shared by every session of one player.
#[derive(Clone)]
pub struct SessionContext {
  pub levels: Arc<dyn LevelProvider>,
  pub progress: Arc<dyn ProgressStore>,
  pub evaluator: Arc<dyn Evaluator>,
  pub ledger: Arc<Mutex<HintLedger>>,
  /// Levels with a live session.
  pub active: Arc<StdMutex<HashSet<LevelId>>>,
  pub penalties: PenaltyTable,
  pub evaluator_timeout: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptPhase {
  Idle,
  Submitting,
  /// Transient: held only inside `submit` while the outcome is applied
  /// under the state lock. Callers never observe it.
  Scored,
  Passed,
  Failed,
}

impl AttemptPhase {
  pub fn is_finished(&self) -> bool {
    matches!(self, AttemptPhase::Passed | AttemptPhase::Failed)
  }
}

/// Everything the result screen needs after a scored attempt.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AttemptReport {
  pub level_id: LevelId,
  pub generation: u64,
  pub breakdown: ScoreBreakdown,
  pub feedback: Option<String>,
  pub best_score: Option<u32>,
  pub new_best: bool,
  pub completed: bool,
  /// Level unlocked by this pass, if it was locked before.
  pub unlocked_level: Option<LevelId>,
  pub lives_remaining: u32,
  pub out_of_lives: bool,
}

impl AttemptReport {
  pub fn passed(&self) -> bool { self.breakdown.passed }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RevealedHint {
  pub index: usize,
  pub text: String,
  pub remaining: usize,
}

/// Ownership of a level's hint record; released on drop.
struct LevelClaim {
  active: Arc<StdMutex<HashSet<LevelId>>>,
  level_id: LevelId,
}

impl LevelClaim {
  fn acquire(active: &Arc<StdMutex<HashSet<LevelId>>>, level_id: &LevelId) -> Option<Self> {
    let mut held = active.lock().unwrap_or_else(|e| e.into_inner());
    if !held.insert(level_id.clone()) {
      return None;
    }
    Some(Self { active: Arc::clone(active), level_id: level_id.clone() })
  }
}

impl Drop for LevelClaim {
  fn drop(&mut self) {
    let mut held = self.active.lock().unwrap_or_else(|e| e.into_inner());
    held.remove(&self.level_id);
  }
}

#[derive(Debug)]
struct SessionState {
  phase: AttemptPhase,
  generation: u64,
  last_report: Option<AttemptReport>,
}

pub struct ChallengeSession {
  ctx: SessionContext,
  level: Level,
  state: Mutex<SessionState>,
  _claim: LevelClaim,
}

impl ChallengeSession {
  /// Enter a level: resolve it, check it is unlocked and not already being
  /// played, seed a clean hint record.
  #[instrument(level = "info", skip_all, fields(%level_id))]
  pub async fn start(ctx: SessionContext, level_id: &LevelId) -> SessionResult<Self> {
    let level = ctx
      .levels
      .get_level(level_id)
      .await
      .ok_or_else(|| SessionError::UnknownLevel(level_id.clone()))?;
    if !ctx.progress.is_unlocked(level_id).await {
      warn!(target: "challenge", level = %level_id, "Refusing to start locked level");
      return Err(SessionError::LevelLocked(level_id.clone()));
    }
    let Some(claim) = LevelClaim::acquire(&ctx.active, &level.id) else {
      warn!(target: "challenge", level = %level_id, "Refusing second session for level in progress");
      return Err(SessionError::LevelInProgress(level_id.clone()));
    };

    ctx.ledger.lock().await.reset(&level.id, level.hint_count());
    info!(target: "challenge", level = %level.id, difficulty = %level.difficulty, kind = ?level.kind(), "Attempt started");

    Ok(Self {
      ctx,
      level,
      state: Mutex::new(SessionState { phase: AttemptPhase::Idle, generation: 1, last_report: None }),
      _claim: claim,
    })
  }

  pub fn level(&self) -> &Level { &self.level }

  pub async fn phase(&self) -> AttemptPhase { self.state.lock().await.phase }

  pub async fn generation(&self) -> u64 { self.state.lock().await.generation }

  pub async fn last_report(&self) -> Option<AttemptReport> { self.state.lock().await.last_report.clone() }

  pub async fn hints_used(&self) -> usize { self.ctx.ledger.lock().await.usage_count(&self.level.id) }

  /// Reveal the next hint for this attempt. `Ok(None)` once all are shown.
  #[instrument(level = "info", skip(self), fields(level = %self.level.id))]
  pub async fn reveal_hint(&self) -> SessionResult<Option<RevealedHint>> {
    let st = self.state.lock().await;
    if st.phase.is_finished() {
      return Err(SessionError::AttemptFinished);
    }
    let mut ledger = self.ctx.ledger.lock().await;
    let Some(index) = ledger.reveal_next(&self.level.id) else {
      debug!(target: "challenge", level = %self.level.id, "No hints left");
      return Ok(None);
    };
    let text = self.level.hint_text(index).unwrap_or_default().to_string();
    Ok(Some(RevealedHint { index, text, remaining: ledger.remaining(&self.level.id) }))
  }

  /// Score a prompt against this level.
  #[instrument(level = "info", skip(self, prompt), fields(level = %self.level.id, prompt_len = prompt.len()))]
  pub async fn submit(&self, prompt: &str) -> SessionResult<AttemptReport> {
    let prompt = normalize_prompt(prompt).ok_or(SessionError::EmptyPrompt)?;

    let generation = {
      let mut st = self.state.lock().await;
      match st.phase {
        AttemptPhase::Idle => {}
        AttemptPhase::Submitting => return Err(SessionError::SubmissionInFlight),
        _ => return Err(SessionError::AttemptFinished),
      }
      if self.ctx.progress.current_lives().await == 0 {
        return Err(SessionError::OutOfLives);
      }
      st.phase = AttemptPhase::Submitting;
      st.generation
    };
    debug!(target: "challenge", level = %self.level.id, generation, prompt = %trunc_for_log(prompt, 60), "Submitting prompt");

    let result = self.evaluate(prompt).await;

    let mut st = self.state.lock().await;
    if st.generation != generation {
      debug!(target: "challenge", level = %self.level.id, generation, current = st.generation, "Dropping stale evaluator response");
      return Err(SessionError::StaleResponseDiscarded { generation });
    }

    let evaluation = match result {
      Ok(e) => e,
      Err(e) => {
        st.phase = AttemptPhase::Idle;
        warn!(target: "challenge", level = %self.level.id, generation, error = %e, "Evaluation failed; attempt stays open");
        return Err(e.into());
      }
    };

    let hints_used = self.ctx.ledger.lock().await.usage_count(&self.level.id);
    let breakdown = compute_breakdown(
      &self.ctx.penalties,
      ScoreInput::for_level(&self.level, evaluation.raw_score, hints_used),
    );
    st.phase = AttemptPhase::Scored;
    info!(
      target: "challenge",
      level = %self.level.id,
      generation,
      raw = breakdown.raw_score,
      hints_used,
      penalty = breakdown.penalty_points,
      final_score = breakdown.final_score,
      passed = breakdown.passed,
      "Attempt scored"
    );

    let report = self.apply_outcome(generation, breakdown, evaluation.feedback).await;
    st.phase = if report.passed() { AttemptPhase::Passed } else { AttemptPhase::Failed };
    st.last_report = Some(report.clone());
    Ok(report)
  }

  /// Start a new attempt at the same level. In-flight responses from the
  /// previous generation will be discarded. Returns the new generation.
  #[instrument(level = "info", skip(self), fields(level = %self.level.id))]
  pub async fn reset(&self) -> u64 {
    let mut st = self.state.lock().await;
    st.generation += 1;
    st.phase = AttemptPhase::Idle;
    st.last_report = None;
    self.ctx.ledger.lock().await.reset(&self.level.id, self.level.hint_count());
    info!(target: "challenge", level = %self.level.id, generation = st.generation, "Attempt reset");
    st.generation
  }

  /// Leave the level and drop its hint record. The level can be started
  /// again once this returns.
  pub async fn teardown(self) {
    self.ctx.ledger.lock().await.forget(&self.level.id);
    debug!(target: "challenge", level = %self.level.id, "Session torn down");
  }

  async fn evaluate(&self, prompt: &str) -> Result<Evaluation, EvaluatorError> {
    let limit = self.ctx.evaluator_timeout;
    let evaluation = tokio::time::timeout(limit, self.ctx.evaluator.evaluate(&self.level.id, prompt))
      .await
      .map_err(|_| EvaluatorError::Timeout(limit))??;
    if evaluation.raw_score > MAX_SCORE {
      return Err(EvaluatorError::InvalidScore(evaluation.raw_score));
    }
    Ok(evaluation)
  }

  async fn apply_outcome(&self, generation: u64, breakdown: ScoreBreakdown, feedback: Option<String>) -> AttemptReport {
    let progress = &self.ctx.progress;
    let recorded = progress.record_attempt(&self.level.id, breakdown.final_score, breakdown.passed).await;

    let mut unlocked_level = None;
    let lives_remaining = if breakdown.passed {
      if let Some(next) = self.ctx.levels.next_level(&self.level.id).await {
        if progress.unlock_level(&next).await {
          unlocked_level = Some(next);
        }
      }
      progress.current_lives().await
    } else {
      progress.deduct_life().await
    };

    AttemptReport {
      level_id: self.level.id.clone(),
      generation,
      breakdown,
      feedback,
      best_score: recorded.best_score,
      new_best: recorded.new_best,
      completed: recorded.completed,
      unlocked_level,
      lives_remaining,
      out_of_lives: lives_remaining == 0,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_passed_and_failed_are_finished() {
    assert!(AttemptPhase::Passed.is_finished());
    assert!(AttemptPhase::Failed.is_finished());
    assert!(!AttemptPhase::Idle.is_finished());
    assert!(!AttemptPhase::Submitting.is_finished());
    assert!(!AttemptPhase::Scored.is_finished());
  }

  #[test]
  fn level_claim_is_exclusive_until_dropped() {
    let active = Arc::new(StdMutex::new(HashSet::new()));
    let id = LevelId::new("a");
    let claim = LevelClaim::acquire(&active, &id).expect("first claim");
    assert!(LevelClaim::acquire(&active, &id).is_none());
    assert!(LevelClaim::acquire(&active, &LevelId::new("b")).is_some());
    drop(claim);
    assert!(LevelClaim::acquire(&active, &id).is_some());
  }
}
