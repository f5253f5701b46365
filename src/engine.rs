//! Player-level controller: owns config, level catalog, hint ledger and
//! progress store, and hands out challenge sessions wired to them.

use std::collections::HashSet;
use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::catalog::LevelCatalog;
use crate::config::{load_engine_config_from_env, EngineConfig};
use crate::domain::LevelId;
use crate::error::SessionResult;
use crate::evaluator::Evaluator;
use crate::hints::HintLedger;
use crate::progress::{InMemoryProgressStore, ProgressState, ProgressStore};
use crate::session::{ChallengeSession, SessionContext};

#[derive(Clone)]
pub struct Engine {
    pub config: EngineConfig,
    pub catalog: LevelCatalog,
    ctx: SessionContext,
}

impl Engine {
    /// Build from PROMPT_ARENA_CONFIG_PATH (or defaults) with a fresh
    /// in-memory progress store where only the first level is unlocked.
    #[instrument(level = "info", skip_all)]
    pub async fn from_env(evaluator: Arc<dyn Evaluator>) -> Self {
        let config = load_engine_config_from_env();
        let catalog = LevelCatalog::from_config(&config);
        let state = Self::initial_progress(&config, &catalog);
        Self::new(config, catalog, Arc::new(InMemoryProgressStore::new(state)), evaluator)
    }

    /// Build with explicit collaborators (restored progress, custom stores).
    pub fn new(
        config: EngineConfig,
        catalog: LevelCatalog,
        progress: Arc<dyn ProgressStore>,
        evaluator: Arc<dyn Evaluator>,
    ) -> Self {
        let ctx = SessionContext {
            levels: Arc::new(catalog.clone()),
            progress,
            evaluator,
            ledger: Arc::new(Mutex::new(HintLedger::new())),
            active: Arc::new(StdMutex::new(HashSet::new())),
            penalties: config.penalties,
            evaluator_timeout: config.evaluator_timeout(),
        };
        info!(
            target: "prompt_arena",
            max_lives = config.max_lives,
            timeout_secs = config.evaluator_timeout_secs,
            penalties = ?config.penalties,
            "Engine ready"
        );
        Self { config, catalog, ctx }
    }

    /// Progress for a new player: full lives, first level in play order unlocked.
    pub fn initial_progress(config: &EngineConfig, catalog: &LevelCatalog) -> ProgressState {
        ProgressState::new(config.max_lives).with_unlocked(catalog.first_level())
    }

    pub fn progress(&self) -> &Arc<dyn ProgressStore> {
        &self.ctx.progress
    }

    pub async fn start_level(&self, level_id: &LevelId) -> SessionResult<ChallengeSession> {
        ChallengeSession::start(self.ctx.clone(), level_id).await
    }
}
