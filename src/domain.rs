//! Domain models: difficulty tiers, challenge kinds, per-kind content, and the level itself.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable level identifier (e.g. "visual-01").
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelId(String);

impl LevelId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for LevelId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for LevelId {
  fn from(s: &str) -> Self { Self(s.to_string()) }
}

impl From<String> for LevelId {
  fn from(s: String) -> Self { Self(s) }
}

/// Difficulty tier. Declaration order is the tier order: easy < medium < hard < expert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  Medium,
  Hard,
  Expert,
}

impl Difficulty {
  pub const ALL: [Difficulty; 4] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard, Difficulty::Expert];

  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
      Difficulty::Expert => "expert",
    }
  }
}

impl fmt::Display for Difficulty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// What kind of artifact does the player have to reproduce with a prompt?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
  /// Recreate a target image.
  Visual,
  /// Get a model to write code meeting a requirement.
  Logic,
  /// Get a model to write copy for a brief.
  Textual,
}

/// Kind-specific content. Each variant carries only what its screen needs;
/// scoring never looks inside.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeContent {
  Visual {
    target_image_url: String,
    #[serde(default)] description: String,
  },
  Logic {
    requirement: String,
    #[serde(default)] language: String,
    #[serde(default)] examples: Vec<String>,
  },
  Textual {
    brief: String,
    #[serde(default)] audience: String,
    #[serde(default)] tone: String,
  },
}

impl ChallengeContent {
  pub fn kind(&self) -> ChallengeKind {
    match self {
      ChallengeContent::Visual { .. } => ChallengeKind::Visual,
      ChallengeContent::Logic { .. } => ChallengeKind::Logic,
      ChallengeContent::Textual { .. } => ChallengeKind::Textual,
    }
  }
}

/// Immutable level content as served by a level provider.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Level {
  pub id: LevelId,
  pub title: String,
  pub difficulty: Difficulty,
  /// Minimum final score (0-100) needed to pass.
  pub passing_score: u32,
  /// Progressive hints; hint N assumes hints 0..N were already shown.
  #[serde(default)] pub hints: Vec<String>,
  pub content: ChallengeContent,
}

impl Level {
  pub fn hint_count(&self) -> usize { self.hints.len() }

  pub fn kind(&self) -> ChallengeKind { self.content.kind() }

  pub fn hint_text(&self, index: usize) -> Option<&str> { self.hints.get(index).map(String::as_str) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn difficulty_tiers_are_ordered() {
    assert!(Difficulty::Easy < Difficulty::Medium);
    assert!(Difficulty::Medium < Difficulty::Hard);
    assert!(Difficulty::Hard < Difficulty::Expert);
  }

  #[test]
  fn content_is_tagged_by_kind() {
    let json = r#"{"kind":"logic","requirement":"Reverse a string"}"#;
    let content: ChallengeContent = serde_json::from_str(json).expect("content");
    assert_eq!(content.kind(), ChallengeKind::Logic);
    match content {
      ChallengeContent::Logic { requirement, language, examples } => {
        assert_eq!(requirement, "Reverse a string");
        assert!(language.is_empty());
        assert!(examples.is_empty());
      }
      other => panic!("unexpected variant: {other:?}"),
    }
  }
}
