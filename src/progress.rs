//! Cross-level player progress: lives, best scores, attempts, unlocks.
//!
//! `ProgressState` is plain data and only changes through the outcome
//! methods below. `ProgressStore` is the async seam the session talks to;
//! `InMemoryProgressStore` serialises all mutations behind one lock, so
//! best-score and unlock updates never race.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::LevelId;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
  pub best_score: Option<u32>,
  pub attempts: u32,
  pub unlocked: bool,
  /// Set on the first pass and never cleared.
  pub completed: bool,
}

/// What recording an attempt changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedAttempt {
  pub best_score: Option<u32>,
  pub new_best: bool,
  pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
  pub current_lives: u32,
  pub max_lives: u32,
  #[serde(default)] pub levels: HashMap<LevelId, LevelProgress>,
}

impl ProgressState {
  pub fn new(max_lives: u32) -> Self {
    Self { current_lives: max_lives, max_lives, levels: HashMap::new() }
  }

  pub fn with_unlocked(mut self, ids: impl IntoIterator<Item = LevelId>) -> Self {
    for id in ids {
      self.levels.entry(id).or_default().unlocked = true;
    }
    self
  }

  pub fn level(&self, id: &LevelId) -> Option<&LevelProgress> { self.levels.get(id) }

  pub fn is_unlocked(&self, id: &LevelId) -> bool {
    self.levels.get(id).map(|l| l.unlocked).unwrap_or(false)
  }

  /// Count the attempt; on a pass also mark completion and keep the best score.
  /// Only passing scores count toward the best score.
  pub fn record_attempt(&mut self, id: &LevelId, final_score: u32, passed: bool) -> RecordedAttempt {
    let entry = self.levels.entry(id.clone()).or_default();
    entry.attempts = entry.attempts.saturating_add(1);
    let mut new_best = false;
    if passed {
      entry.completed = true;
      if entry.best_score.map_or(true, |b| final_score > b) {
        entry.best_score = Some(final_score);
        new_best = true;
      }
    }
    RecordedAttempt { best_score: entry.best_score, new_best, completed: entry.completed }
  }

  /// Lose one life, never going below zero. Returns lives left.
  pub fn deduct_life(&mut self) -> u32 {
    self.current_lives = self.current_lives.saturating_sub(1);
    self.current_lives
  }

  /// Returns true if the level was locked before.
  pub fn unlock(&mut self, id: &LevelId) -> bool {
    let entry = self.levels.entry(id.clone()).or_default();
    let was_locked = !entry.unlocked;
    entry.unlocked = true;
    was_locked
  }

  pub fn refill_lives(&mut self) {
    self.current_lives = self.max_lives;
  }

  pub fn to_json(&self) -> Result<String, serde_json::Error> { serde_json::to_string(self) }

  pub fn from_json(s: &str) -> Result<Self, serde_json::Error> { serde_json::from_str(s) }
}

/// Contract the session uses to apply attempt outcomes.
#[async_trait]
pub trait ProgressStore: Send + Sync {
  async fn record_attempt(&self, level_id: &LevelId, final_score: u32, passed: bool) -> RecordedAttempt;

  /// Lose one life (floor 0). Returns lives left.
  async fn deduct_life(&self) -> u32;

  async fn current_lives(&self) -> u32;

  /// Returns true if the level was newly unlocked.
  async fn unlock_level(&self, level_id: &LevelId) -> bool;

  async fn is_unlocked(&self, level_id: &LevelId) -> bool;

  async fn refill_lives(&self);

  async fn snapshot(&self) -> ProgressState;
}

/// Progress kept in memory; persistence is up to whoever owns the snapshot.
#[derive(Debug)]
pub struct InMemoryProgressStore {
  state: Mutex<ProgressState>,
}

impl InMemoryProgressStore {
  pub fn new(state: ProgressState) -> Self {
    Self { state: Mutex::new(state) }
  }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
  async fn record_attempt(&self, level_id: &LevelId, final_score: u32, passed: bool) -> RecordedAttempt {
    let mut st = self.state.lock().await;
    let rec = st.record_attempt(level_id, final_score, passed);
    debug!(target: "challenge", level = %level_id, final_score, passed, new_best = rec.new_best, "Attempt recorded");
    rec
  }

  async fn deduct_life(&self) -> u32 {
    let left = self.state.lock().await.deduct_life();
    if left == 0 {
      warn!(target: "challenge", "Out of lives");
    } else {
      info!(target: "challenge", lives = left, "Life deducted");
    }
    left
  }

  async fn current_lives(&self) -> u32 { self.state.lock().await.current_lives }

  async fn unlock_level(&self, level_id: &LevelId) -> bool {
    let newly = self.state.lock().await.unlock(level_id);
    if newly {
      info!(target: "challenge", level = %level_id, "Level unlocked");
    }
    newly
  }

  async fn is_unlocked(&self, level_id: &LevelId) -> bool { self.state.lock().await.is_unlocked(level_id) }

  async fn refill_lives(&self) {
    self.state.lock().await.refill_lives();
  }

  async fn snapshot(&self) -> ProgressState { self.state.lock().await.clone() }
}
