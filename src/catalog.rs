//! Level content provider: levels by id plus the play order used to decide
//! which level a pass unlocks.
//!
//! Config-bank levels come first in play order, followed by the built-in
//! seeds. Seeds never overwrite a bank level with the same id. Content is
//! fixed once the catalog is built.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::config::{EngineConfig, LevelCfg};
use crate::domain::{Level, LevelId};
use crate::seeds::seed_levels;

/// Read-only access to level content.
#[async_trait]
pub trait LevelProvider: Send + Sync {
    async fn get_level(&self, id: &LevelId) -> Option<Level>;

    /// Level that follows `id` in play order, if any.
    async fn next_level(&self, id: &LevelId) -> Option<LevelId>;
}

#[derive(Clone, Debug, Default)]
pub struct LevelCatalog {
    by_id: HashMap<LevelId, Level>,
    order: Vec<LevelId>,
}

impl LevelCatalog {
    /// Build from config bank + built-in seeds.
    #[instrument(level = "info", skip_all)]
    pub fn from_config(cfg: &EngineConfig) -> Self {
        let bank = cfg.levels.iter().cloned().map(LevelCfg::into_level);
        Self::from_levels(bank.chain(seed_levels()))
    }

    /// Build from an explicit level list; later duplicates of an id are skipped.
    pub fn from_levels(levels: impl IntoIterator<Item = Level>) -> Self {
        let mut by_id = HashMap::<LevelId, Level>::new();
        let mut order = Vec::<LevelId>::new();

        for level in levels {
            if by_id.contains_key(&level.id) {
                warn!(target: "prompt_arena", id = %level.id, "Skipping duplicate level id");
                continue;
            }
            order.push(level.id.clone());
            by_id.insert(level.id.clone(), level);
        }

        info!(target: "prompt_arena", count = order.len(), first = ?order.first(), "Level catalog built");
        Self { by_id, order }
    }

    /// First level in play order; unlocked for new players.
    pub fn first_level(&self) -> Option<LevelId> {
        self.order.first().cloned()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[async_trait]
impl LevelProvider for LevelCatalog {
    async fn get_level(&self, id: &LevelId) -> Option<Level> {
        self.by_id.get(id).cloned()
    }

    async fn next_level(&self, id: &LevelId) -> Option<LevelId> {
        let pos = self.order.iter().position(|x| x == id)?;
        self.order.get(pos + 1).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChallengeContent, Difficulty};

    fn level(id: &str, difficulty: Difficulty) -> Level {
        Level {
            id: LevelId::new(id),
            title: id.to_string(),
            difficulty,
            passing_score: 50,
            hints: vec![],
            content: ChallengeContent::Textual {
                brief: "brief".into(),
                audience: String::new(),
                tone: String::new(),
            },
        }
    }

    #[tokio::test]
    async fn play_order_follows_insertion() {
        let cat = LevelCatalog::from_levels([
            level("a", Difficulty::Easy),
            level("b", Difficulty::Hard),
            level("c", Difficulty::Easy),
        ]);
        assert_eq!(cat.first_level(), Some(LevelId::new("a")));
        assert_eq!(cat.next_level(&LevelId::new("a")).await, Some(LevelId::new("b")));
        assert_eq!(cat.next_level(&LevelId::new("c")).await, None);
        assert_eq!(cat.next_level(&LevelId::new("zzz")).await, None);
        assert_eq!(cat.len(), 3);
    }

    #[tokio::test]
    async fn duplicate_ids_keep_first() {
        let mut dup = level("a", Difficulty::Expert);
        dup.title = "second".into();
        let cat = LevelCatalog::from_levels([level("a", Difficulty::Easy), dup]);
        assert_eq!(cat.len(), 1);
        let got = cat.get_level(&LevelId::new("a")).await.expect("level");
        assert_eq!(got.difficulty, Difficulty::Easy);
    }

    #[tokio::test]
    async fn config_bank_precedes_seeds() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            [[levels]]
            id = "bank-01"
            difficulty = "easy"
            passing_score = 60
            content = { kind = "logic", requirement = "Sum two numbers" }
            "#,
        )
        .expect("cfg");
        let cat = LevelCatalog::from_config(&cfg);
        assert_eq!(cat.first_level(), Some(LevelId::new("bank-01")));
        assert!(cat.get_level(&LevelId::new("visual-01")).await.is_some());
    }

    #[test]
    fn empty_catalog_has_no_first_level() {
        let cat = LevelCatalog::default();
        assert!(cat.is_empty());
        assert_eq!(cat.first_level(), None);
    }
}
