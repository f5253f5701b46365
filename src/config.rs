//! Loading engine configuration (penalty policy, lives, evaluator timeout, optional level bank) from TOML.
//!
//! Example:
//!
//! ```toml
//! max_lives = 5
//! evaluator_timeout_secs = 15
//!
//! [penalties]
//! easy = 10
//!
//! [[levels]]
//! id = "visual-01"
//! title = "Sunset"
//! difficulty = "easy"
//! passing_score = 70
//! hints = ["Mention the colours", "Name the time of day"]
//! content = { kind = "visual", target_image_url = "https://cdn.example/sunset.png" }
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{ChallengeContent, Difficulty, Level, LevelId};
use crate::error::ConfigError;

/// Env var pointing at the TOML config file.
pub const CONFIG_PATH_ENV: &str = "PROMPT_ARENA_CONFIG_PATH";

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  pub penalties: PenaltyTable,
  pub max_lives: u32,
  pub evaluator_timeout_secs: u64,
  pub levels: Vec<LevelCfg>,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self {
      penalties: PenaltyTable::default(),
      max_lives: 3,
      evaluator_timeout_secs: 20,
      levels: Vec::new(),
    }
  }
}

/// Points deducted per revealed hint, by difficulty.
/// Harder tiers charge less because they legitimately need more help.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyTable {
  pub easy: u32,
  pub medium: u32,
  pub hard: u32,
  pub expert: u32,
}

impl Default for PenaltyTable {
  fn default() -> Self {
    Self { easy: 8, medium: 6, hard: 4, expert: 3 }
  }
}

impl PenaltyTable {
  pub fn per_hint(&self, difficulty: Difficulty) -> u32 {
    match difficulty {
      Difficulty::Easy => self.easy,
      Difficulty::Medium => self.medium,
      Difficulty::Hard => self.hard,
      Difficulty::Expert => self.expert,
    }
  }
}

/// Level entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct LevelCfg {
  #[serde(default)] pub id: Option<String>,
  #[serde(default)] pub title: String,
  pub difficulty: Difficulty,
  pub passing_score: u32,
  #[serde(default)] pub hints: Vec<String>,
  pub content: ChallengeContent,
}

impl LevelCfg {
  /// Build the immutable level; bank entries without an id get a random one.
  pub fn into_level(self) -> Level {
    let id = self.id.filter(|s| !s.trim().is_empty()).unwrap_or_else(|| Uuid::new_v4().to_string());
    Level {
      id: LevelId::new(id),
      title: self.title,
      difficulty: self.difficulty,
      passing_score: self.passing_score,
      hints: self.hints,
      content: self.content,
    }
  }
}

impl EngineConfig {
  pub fn evaluator_timeout(&self) -> Duration { Duration::from_secs(self.evaluator_timeout_secs) }

  /// Parse and validate a TOML document.
  pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
    let cfg: EngineConfig = toml::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
  }

  /// Read, parse and validate a TOML file.
  pub fn from_path(path: &str) -> Result<Self, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_string(), source })?;
    Self::from_toml_str(&s)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.max_lives == 0 {
      return Err(ConfigError::Invalid("max_lives must be at least 1".into()));
    }
    if self.evaluator_timeout_secs == 0 {
      return Err(ConfigError::Invalid("evaluator_timeout_secs must be at least 1".into()));
    }
    for lc in &self.levels {
      if lc.passing_score > 100 {
        let id = lc.id.as_deref().unwrap_or("<unnamed>");
        return Err(ConfigError::Invalid(format!("level {id}: passing_score {} exceeds 100", lc.passing_score)));
      }
    }
    Ok(())
  }
}

/// Attempt to load `EngineConfig` from PROMPT_ARENA_CONFIG_PATH.
/// Missing variable or any IO/parse/validation error yields the defaults.
pub fn load_engine_config_from_env() -> EngineConfig {
  let path = match std::env::var(CONFIG_PATH_ENV) {
    Ok(p) => p,
    Err(_) => return EngineConfig::default(),
  };
  match EngineConfig::from_path(&path) {
    Ok(cfg) => {
      info!(target: "prompt_arena", %path, levels = cfg.levels.len(), "Loaded engine config (TOML)");
      cfg
    }
    Err(e) => {
      error!(target: "prompt_arena", %path, error = %e, "Failed to load engine config; using defaults");
      EngineConfig::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::ChallengeKind;

  #[test]
  fn defaults_match_documented_policy() {
    let cfg = EngineConfig::default();
    assert_eq!(cfg.penalties.per_hint(Difficulty::Easy), 8);
    assert_eq!(cfg.penalties.per_hint(Difficulty::Medium), 6);
    assert_eq!(cfg.penalties.per_hint(Difficulty::Hard), 4);
    assert_eq!(cfg.penalties.per_hint(Difficulty::Expert), 3);
    assert_eq!(cfg.max_lives, 3);
    assert_eq!(cfg.evaluator_timeout(), Duration::from_secs(20));
  }

  #[test]
  fn partial_penalty_override_keeps_other_tiers() {
    let cfg = EngineConfig::from_toml_str("[penalties]\neasy = 10\n").expect("cfg");
    assert_eq!(cfg.penalties.easy, 10);
    assert_eq!(cfg.penalties.expert, 3);
  }

  #[test]
  fn level_bank_parses_tagged_content() {
    let toml = r#"
      max_lives = 5

      [[levels]]
      id = "copy-01"
      title = "Launch tweet"
      difficulty = "medium"
      passing_score = 65
      hints = ["Keep it under 280 characters"]
      content = { kind = "textual", brief = "Announce a coffee shop opening", tone = "playful" }

      [[levels]]
      difficulty = "hard"
      passing_score = 80
      content = { kind = "visual", target_image_url = "https://cdn.example/cat.png" }
    "#;
    let cfg = EngineConfig::from_toml_str(toml).expect("cfg");
    assert_eq!(cfg.max_lives, 5);
    let levels: Vec<Level> = cfg.levels.into_iter().map(LevelCfg::into_level).collect();
    assert_eq!(levels[0].id.as_str(), "copy-01");
    assert_eq!(levels[0].kind(), ChallengeKind::Textual);
    assert_eq!(levels[0].hint_count(), 1);
    assert!(!levels[1].id.as_str().is_empty());
    assert_eq!(levels[1].kind(), ChallengeKind::Visual);
  }

  #[test]
  fn rejects_passing_score_above_100() {
    let toml = r#"
      [[levels]]
      id = "bad"
      difficulty = "easy"
      passing_score = 101
      content = { kind = "logic", requirement = "FizzBuzz" }
    "#;
    let err = EngineConfig::from_toml_str(toml).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
  }

  #[test]
  fn rejects_zero_lives() {
    assert!(matches!(EngineConfig::from_toml_str("max_lives = 0"), Err(ConfigError::Invalid(_))));
  }
}
