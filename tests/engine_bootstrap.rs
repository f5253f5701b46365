//! Engine construction from environment defaults and built-in seed levels.

use std::sync::Arc;

use prompt_arena::fakes::ScriptedEvaluator;
use prompt_arena::{Engine, LevelId, LevelProvider, SessionError};

#[tokio::test]
async fn defaults_unlock_only_the_first_seed_level() {
    // PROMPT_ARENA_CONFIG_PATH is not set in the test environment.
    let engine = Engine::from_env(Arc::new(ScriptedEvaluator::scores([88]))).await;
    assert_eq!(engine.config.max_lives, 3);
    assert_eq!(engine.catalog.first_level(), Some(LevelId::new("visual-01")));
    assert_eq!(engine.progress().current_lives().await, 3);

    let locked = engine.start_level(&LevelId::new("textual-01")).await.err();
    assert_eq!(locked, Some(SessionError::LevelLocked(LevelId::new("textual-01"))));

    let session = engine.start_level(&LevelId::new("visual-01")).await.expect("start");
    assert_eq!(session.level().hint_count(), 3);
    let report = session.submit("a single red apple, studio light").await.expect("scored");
    assert!(report.passed());
    assert_eq!(report.unlocked_level, Some(LevelId::new("textual-01")));

    let next = engine.catalog.next_level(&LevelId::new("visual-01")).await;
    assert_eq!(next, Some(LevelId::new("textual-01")));
    assert!(engine.start_level(&LevelId::new("textual-01")).await.is_ok());
}
