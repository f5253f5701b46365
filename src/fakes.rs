//! In-memory evaluator fakes (testing and offline demos only).
//!
//! - `ScriptedEvaluator` answers from a queue of canned results.
//! - `GatedEvaluator` blocks until released, for exercising in-flight races.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::LevelId;
use crate::error::EvaluatorError;
use crate::evaluator::{Evaluation, Evaluator};

/// Replays queued results in order; an empty queue is a service error.
#[derive(Debug, Default)]
pub struct ScriptedEvaluator {
    script: Mutex<VecDeque<Result<Evaluation, EvaluatorError>>>,
    calls: AtomicUsize,
}

impl ScriptedEvaluator {
    pub fn new(script: impl IntoIterator<Item = Result<Evaluation, EvaluatorError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Shorthand for a queue of plain raw scores.
    pub fn scores(scores: impl IntoIterator<Item = u32>) -> Self {
        Self::new(scores.into_iter().map(|s| Ok(Evaluation::score(s))))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    async fn evaluate(&self, _level_id: &LevelId, _prompt: &str) -> Result<Evaluation, EvaluatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap_or_else(|e| e.into_inner()).pop_front();
        next.unwrap_or_else(|| Err(EvaluatorError::Service("script exhausted".into())))
    }
}

/// Waits for `release()` before answering with the next queued score.
/// `release()` before the call starts is remembered, so there is no lost wakeup.
#[derive(Debug, Default)]
pub struct GatedEvaluator {
    inner: ScriptedEvaluator,
    gate: Notify,
    started: AtomicUsize,
}

impl GatedEvaluator {
    pub fn scores(scores: impl IntoIterator<Item = u32>) -> Self {
        Self {
            inner: ScriptedEvaluator::scores(scores),
            gate: Notify::new(),
            started: AtomicUsize::new(0),
        }
    }

    /// Let one waiting (or the next) evaluation finish.
    pub fn release(&self) {
        self.gate.notify_one();
    }

    /// Number of evaluations that have started waiting.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.inner.calls()
    }
}

#[async_trait]
impl Evaluator for GatedEvaluator {
    async fn evaluate(&self, level_id: &LevelId, prompt: &str) -> Result<Evaluation, EvaluatorError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        self.inner.evaluate(level_id, prompt).await
    }
}

/// Never answers; pair with the session timeout.
#[derive(Debug, Default)]
pub struct SilentEvaluator;

#[async_trait]
impl Evaluator for SilentEvaluator {
    async fn evaluate(&self, _level_id: &LevelId, _prompt: &str) -> Result<Evaluation, EvaluatorError> {
        std::future::pending().await
    }
}
