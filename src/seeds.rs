//! Built-in levels so the engine is playable without an external level bank.

use crate::domain::{ChallengeContent, Difficulty, Level, LevelId};

pub fn seed_levels() -> Vec<Level> {
  vec![
    Level {
      id: LevelId::new("visual-01"),
      title: "Red Apple".into(),
      difficulty: Difficulty::Easy,
      passing_score: 70,
      hints: vec![
        "Name the main object and its colour.".into(),
        "Describe the background: plain white studio.".into(),
        "Mention soft light from the left.".into(),
      ],
      content: ChallengeContent::Visual {
        target_image_url: "assets/levels/red-apple.png".into(),
        description: "A single red apple on a white table.".into(),
      },
    },
    Level {
      id: LevelId::new("textual-01"),
      title: "Coffee Shop Opening".into(),
      difficulty: Difficulty::Medium,
      passing_score: 75,
      hints: vec![
        "State who the copy is for.".into(),
        "Ask for a friendly, upbeat tone.".into(),
        "Limit the length to two sentences.".into(),
      ],
      content: ChallengeContent::Textual {
        brief: "Announce the grand opening of a neighbourhood coffee shop.".into(),
        audience: "Local residents".into(),
        tone: "Warm".into(),
      },
    },
    Level {
      id: LevelId::new("logic-01"),
      title: "Palindrome Check".into(),
      difficulty: Difficulty::Hard,
      passing_score: 80,
      hints: vec![
        "Specify the language and function signature.".into(),
        "Say how case and punctuation should be handled.".into(),
        "Ask for unit tests with edge cases.".into(),
        "Request O(n) time.".into(),
      ],
      content: ChallengeContent::Logic {
        requirement: "A function that returns true if a string is a palindrome, ignoring case and non-letters.".into(),
        language: "typescript".into(),
        examples: vec!["isPalindrome(\"A man, a plan\") === false".into(), "isPalindrome(\"Racecar\") === true".into()],
      },
    },
    Level {
      id: LevelId::new("visual-02"),
      title: "Neon Alley".into(),
      difficulty: Difficulty::Expert,
      passing_score: 85,
      hints: vec![
        "Set the scene: a narrow alley at night.".into(),
        "Mention rain-soaked pavement reflecting signs.".into(),
        "Name the palette: magenta and cyan neon.".into(),
        "Ask for a low camera angle.".into(),
        "Add a lone figure with an umbrella.".into(),
      ],
      content: ChallengeContent::Visual {
        target_image_url: "assets/levels/neon-alley.png".into(),
        description: "Cyberpunk alley in the rain.".into(),
      },
    },
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn seed_ids_are_unique_and_thresholds_valid() {
    let levels = seed_levels();
    let ids: HashSet<_> = levels.iter().map(|l| l.id.clone()).collect();
    assert_eq!(ids.len(), levels.len());
    assert!(levels.iter().all(|l| l.passing_score <= 100 && !l.hints.is_empty()));
  }
}
