use std::sync::Arc;

use crate::adaptive::{label_accuracy_trend, DifficultyAdapter};
use crate::config::GameDefinition;
use crate::engine::{GamePhase, Response, TrialEngine};
use crate::error::GenerationError;
use crate::store::PerformanceStore;
use crate::types::{DifficultyRecommendation, PerformanceRecord, SessionResult};

/// Everything the host needs once a session finishes: the raw aggregate, the
/// persisted record, and what to play next.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub result: SessionResult,
    pub record: PerformanceRecord,
    pub recommendation: DifficultyRecommendation,
}

/// Wraps one engine run into a user-facing game session: drives the engine,
/// persists the outcome, and asks the adapter for the next difficulty. A lost
/// write or a failed history read degrades the recommendation, never the
/// session itself.
pub struct SessionController {
    user_id: String,
    engine: TrialEngine,
    store: Arc<dyn PerformanceStore>,
    adapter: DifficultyAdapter,
    summary: Option<SessionSummary>,
}

impl SessionController {
    pub fn new(
        user_id: impl Into<String>,
        definition: GameDefinition,
        store: Arc<dyn PerformanceStore>,
    ) -> Self {
        Self::with_engine(user_id, TrialEngine::new(definition), store)
    }

    pub fn with_engine(
        user_id: impl Into<String>,
        engine: TrialEngine,
        store: Arc<dyn PerformanceStore>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            engine,
            store,
            adapter: DifficultyAdapter::default(),
            summary: None,
        }
    }

    pub fn engine(&self) -> &TrialEngine {
        &self.engine
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn start(&mut self) -> Result<(), GenerationError> {
        self.engine.start()
    }

    pub fn tick(&mut self, delta_ms: i64) -> Option<&SessionSummary> {
        self.engine.tick(delta_ms);
        self.finalize_if_done();
        self.summary.as_ref()
    }

    pub fn submit_response(&mut self, response: Option<Response>) -> Option<&SessionSummary> {
        self.engine.submit_response(response);
        self.finalize_if_done();
        self.summary.as_ref()
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn resume(&mut self) {
        self.engine.resume();
    }

    fn finalize_if_done(&mut self) {
        if self.summary.is_some() || self.engine.phase() != GamePhase::Completed {
            return;
        }
        let Some(result) = self.engine.result().cloned() else {
            return;
        };

        let definition = self.engine.definition();
        let game_type = definition.game_type;

        // a failed read only costs recommendation quality
        let history = match self.store.query(&self.user_id, Some(game_type), 10, true) {
            Ok(mut records) => {
                // back to chronological order for trend fitting
                records.reverse();
                records
            }
            Err(err) => {
                tracing::warn!(user_id = %self.user_id, error = %err, "history read failed, treating as empty");
                Vec::new()
            }
        };

        let mut accuracies: Vec<f64> = history.iter().map(|r| r.accuracy).collect();
        accuracies.push(result.accuracy);
        let trend = label_accuracy_trend(&accuracies);

        let record = PerformanceRecord::new(
            self.user_id.clone(),
            game_type,
            definition.level as f64,
            result.score,
            result.accuracy,
            result.time_spent_ms as f64 / 1000.0,
            result.avg_reaction_time_ms,
            result.mistakes,
            trend,
        );

        if let Err(err) = self.store.append(record.clone()) {
            tracing::warn!(user_id = %self.user_id, error = %err, "record append failed, dropping");
        }

        let recommendation = self.adapter.recommend(&record, &history);
        self.summary = Some(SessionSummary { result, record, recommendation });
    }
}
