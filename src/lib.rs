//! Prompt Arena · scoring and hint-economy engine
//!
//! - Hint ledger per level attempt (progressive disclosure, reveal timestamps)
//! - Hint-penalty scoring on top of an external evaluator's raw score
//! - Single-attempt session state machine with stale-response protection
//! - Cross-level progress: lives, best scores, unlocks
//!
//! The evaluator, persistence and UI are collaborators behind traits.
//!
//! Important env variables:
//!   PROMPT_ARENA_CONFIG_PATH : path to TOML config (penalties, lives, timeout, level bank)
//!   LOG_LEVEL                : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT               : "pretty" (default) or "json"

pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod fakes;
pub mod hints;
pub mod progress;
pub mod scoring;
pub mod seeds;
pub mod session;
pub mod telemetry;
pub mod util;

pub use catalog::{LevelCatalog, LevelProvider};
pub use config::{EngineConfig, PenaltyTable};
pub use domain::{ChallengeContent, ChallengeKind, Difficulty, Level, LevelId};
pub use engine::Engine;
pub use error::{ConfigError, EvaluatorError, SessionError, SessionResult};
pub use evaluator::{Evaluation, Evaluator};
pub use hints::HintLedger;
pub use progress::{InMemoryProgressStore, ProgressState, ProgressStore};
pub use scoring::{compute_breakdown, ScoreBreakdown, ScoreInput};
pub use session::{AttemptPhase, AttemptReport, ChallengeSession, RevealedHint, SessionContext};
