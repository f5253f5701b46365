//! Per-level hint ledger.
//!
//! One record per level attempt: which hint indices were revealed and when.
//! `reset` starts an attempt with a clean slate. Unknown levels behave like
//! "not started yet": zero usage and nothing to reveal.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::domain::LevelId;

/// A revealed hint and the moment it was shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HintReveal {
  pub index: usize,
  pub revealed_at: DateTime<Utc>,
}

/// Hint usage for one level attempt.
#[derive(Clone, Debug, Default, Serialize)]
pub struct HintUsageRecord {
  pub total_hints: usize,
  pub revealed: Vec<HintReveal>,
}

impl HintUsageRecord {
  fn new(total_hints: usize) -> Self {
    Self { total_hints, revealed: Vec::with_capacity(total_hints) }
  }

  pub fn used(&self) -> usize { self.revealed.len() }

  pub fn remaining(&self) -> usize { self.total_hints - self.revealed.len() }
}

#[derive(Debug, Default)]
pub struct HintLedger {
  records: HashMap<LevelId, HintUsageRecord>,
}

impl HintLedger {
  pub fn new() -> Self { Self::default() }

  /// Start a fresh attempt for `level_id` with `total_hints` available.
  /// Any previous reveals for that level are forgotten.
  pub fn reset(&mut self, level_id: &LevelId, total_hints: usize) {
    debug!(target: "challenge", level = %level_id, total_hints, "Hint ledger reset");
    self.records.insert(level_id.clone(), HintUsageRecord::new(total_hints));
  }

  /// Reveal the next hint (ascending, 0-based). `None` once all are shown
  /// or when the level was never started.
  pub fn reveal_next(&mut self, level_id: &LevelId) -> Option<usize> {
    self.reveal_next_at(level_id, Utc::now())
  }

  pub(crate) fn reveal_next_at(&mut self, level_id: &LevelId, at: DateTime<Utc>) -> Option<usize> {
    let rec = self.records.get_mut(level_id)?;
    if rec.revealed.len() >= rec.total_hints {
      return None;
    }
    let index = rec.revealed.len();
    rec.revealed.push(HintReveal { index, revealed_at: at });
    debug!(target: "challenge", level = %level_id, index, remaining = rec.remaining(), "Hint revealed");
    Some(index)
  }

  pub fn usage_count(&self, level_id: &LevelId) -> usize {
    self.records.get(level_id).map(HintUsageRecord::used).unwrap_or(0)
  }

  pub fn remaining(&self, level_id: &LevelId) -> usize {
    self.records.get(level_id).map(HintUsageRecord::remaining).unwrap_or(0)
  }

  pub fn revealed(&self, level_id: &LevelId) -> &[HintReveal] {
    self.records.get(level_id).map(|r| r.revealed.as_slice()).unwrap_or(&[])
  }

  /// Drop the record entirely (level left, session torn down).
  pub fn forget(&mut self, level_id: &LevelId) {
    self.records.remove(level_id);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  fn lvl(id: &str) -> LevelId { LevelId::new(id) }

  #[test]
  fn reset_is_idempotent() {
    let mut ledger = HintLedger::new();
    let id = lvl("a");
    ledger.reset(&id, 3);
    ledger.reveal_next(&id);
    ledger.reset(&id, 3);
    assert_eq!(ledger.usage_count(&id), 0);
    ledger.reset(&id, 3);
    assert_eq!(ledger.usage_count(&id), 0);
  }

  #[test]
  fn reveals_each_index_once_then_runs_out() {
    let mut ledger = HintLedger::new();
    let id = lvl("a");
    ledger.reset(&id, 4);
    let mut seen = HashSet::new();
    for expected in 0..4 {
      let idx = ledger.reveal_next(&id).expect("hint left");
      assert_eq!(idx, expected);
      assert!(seen.insert(idx));
    }
    assert_eq!(ledger.reveal_next(&id), None);
    assert_eq!(ledger.reveal_next(&id), None);
    assert_eq!(ledger.usage_count(&id), 4);
    assert_eq!(ledger.remaining(&id), 0);
  }

  #[test]
  fn unknown_level_reports_zero_usage() {
    let mut ledger = HintLedger::new();
    let id = lvl("never-started");
    assert_eq!(ledger.usage_count(&id), 0);
    assert_eq!(ledger.reveal_next(&id), None);
    assert!(ledger.revealed(&id).is_empty());
  }

  #[test]
  fn levels_are_independent() {
    let mut ledger = HintLedger::new();
    let (a, b) = (lvl("a"), lvl("b"));
    ledger.reset(&a, 2);
    ledger.reset(&b, 2);
    ledger.reveal_next(&a);
    ledger.reveal_next(&a);
    assert_eq!(ledger.usage_count(&a), 2);
    assert_eq!(ledger.usage_count(&b), 0);
    ledger.reset(&a, 2);
    assert_eq!(ledger.usage_count(&a), 0);
  }

  #[test]
  fn reveal_records_timestamp() {
    let mut ledger = HintLedger::new();
    let id = lvl("a");
    ledger.reset(&id, 1);
    let at = Utc::now();
    ledger.reveal_next_at(&id, at);
    assert_eq!(ledger.revealed(&id), &[HintReveal { index: 0, revealed_at: at }]);
  }

  #[test]
  fn level_without_hints_has_nothing_to_reveal() {
    let mut ledger = HintLedger::new();
    let id = lvl("bare");
    ledger.reset(&id, 0);
    assert_eq!(ledger.reveal_next(&id), None);
    assert_eq!(ledger.usage_count(&id), 0);
  }

  #[test]
  fn forget_drops_record() {
    let mut ledger = HintLedger::new();
    let id = lvl("a");
    ledger.reset(&id, 2);
    ledger.reveal_next(&id);
    ledger.forget(&id);
    assert_eq!(ledger.usage_count(&id), 0);
  }
}
