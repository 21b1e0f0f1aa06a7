pub mod phase;
pub mod scoring;
pub mod stimulus;

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::GameDefinition;
use crate::error::GenerationError;
use crate::types::{GameType, SessionResult};

pub use phase::GamePhase;
pub use scoring::{score_response, TrialOutcome};
pub use stimulus::{Answer, Dot, FlexTask, Response, SpeedKind, Stimulus, Trial};

struct ActiveTrial {
    trial: Trial,
    remaining_ms: i64,
    elapsed_ms: i64,
}

/// Drives one timed exercise instance through its phase sequence and scores
/// player input. The engine holds no timers of its own: the host calls
/// `tick(delta_ms)` on a periodic clock (typically 100ms) and `submit_response`
/// on input, and both are processed strictly in arrival order.
pub struct TrialEngine {
    definition: GameDefinition,
    phase: GamePhase,
    rng: StdRng,
    pending: VecDeque<Trial>,
    current: Option<ActiveTrial>,
    flex_task: FlexTask,
    paused: bool,
    completed_trials: u32,
    outcomes: Vec<TrialOutcome>,
    session_elapsed_ms: i64,
    feedback_remaining_ms: i64,
    result: Option<SessionResult>,
}

impl TrialEngine {
    pub fn new(definition: GameDefinition) -> Self {
        Self::with_rng(definition, StdRng::from_os_rng())
    }

    /// Deterministic engine for tests and replays.
    pub fn with_seed(definition: GameDefinition, seed: u64) -> Self {
        Self::with_rng(definition, StdRng::seed_from_u64(seed))
    }

    fn with_rng(definition: GameDefinition, rng: StdRng) -> Self {
        Self {
            definition,
            phase: GamePhase::Instruction,
            rng,
            pending: VecDeque::new(),
            current: None,
            flex_task: FlexTask::Color,
            paused: false,
            completed_trials: 0,
            outcomes: Vec::new(),
            session_elapsed_ms: 0,
            feedback_remaining_ms: 0,
            result: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn definition(&self) -> &GameDefinition {
        &self.definition
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_trial(&self) -> Option<&Trial> {
        self.current.as_ref().map(|a| &a.trial)
    }

    /// Remaining time on the current trial clock, frozen while paused.
    pub fn remaining_ms(&self) -> Option<i64> {
        self.current.as_ref().map(|a| a.remaining_ms)
    }

    /// Running session score. Penalties clamp at zero as they land, so an
    /// early distractor click never eats points earned afterwards.
    pub fn score(&self) -> i64 {
        self.outcomes
            .iter()
            .fold(0i64, |acc, o| (acc + o.points).max(0))
    }

    pub fn outcomes(&self) -> &[TrialOutcome] {
        &self.outcomes
    }

    /// Terminal aggregate, present once the phase is `Completed`.
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Transition Instruction -> Playing and produce the first trial. Spatial
    /// and problem games pre-generate their full batch; reaction-style games
    /// stream one trial at a time.
    pub fn start(&mut self) -> Result<(), GenerationError> {
        if self.phase != GamePhase::Instruction {
            return Ok(());
        }

        if matches!(self.definition.game_type, GameType::Memory | GameType::ProblemSolving) {
            for _ in 0..self.definition.trial_count {
                let trial = stimulus::generate_trial(&self.definition, self.flex_task, &mut self.rng)?;
                self.pending.push_back(trial);
            }
        } else {
            let trial = stimulus::generate_trial(&self.definition, self.flex_task, &mut self.rng)?;
            self.pending.push_back(trial);
        }

        self.phase = GamePhase::Playing;
        self.activate_next();
        tracing::debug!(
            game = self.definition.game_type.as_str(),
            level = self.definition.level,
            trials = self.definition.trial_count,
            "session started"
        );
        Ok(())
    }

    /// Score the player's answer for the current trial. `None` represents a
    /// timeout. Calls outside the Playing phase, while paused, or after
    /// completion are silent no-ops: UI double-submits must never corrupt a
    /// session.
    pub fn submit_response(&mut self, response: Option<Response>) {
        if !self.phase.accepts_response() || self.paused {
            return;
        }
        let Some(active) = self.current.take() else {
            return;
        };
        let latency = match response {
            Some(_) => active.elapsed_ms,
            None => active.trial.time_limit_ms,
        };
        self.resolve(active, response, latency);
    }

    /// Advance all engine clocks by `delta_ms`. A tick that exhausts the trial
    /// clock is equivalent to `submit_response(None)` at expiry.
    pub fn tick(&mut self, delta_ms: i64) {
        if delta_ms <= 0 || self.paused {
            return;
        }
        match self.phase {
            GamePhase::Instruction | GamePhase::Completed => {}
            GamePhase::Feedback => {
                self.session_elapsed_ms += delta_ms;
                self.feedback_remaining_ms -= delta_ms;
                if self.feedback_remaining_ms <= 0 {
                    self.advance();
                }
            }
            GamePhase::Playing => {
                self.session_elapsed_ms += delta_ms;
                let timed_out = self.current.as_mut().map_or(false, |active| {
                    active.elapsed_ms += delta_ms;
                    active.remaining_ms -= delta_ms;
                    active.remaining_ms <= 0
                });
                if timed_out {
                    if let Some(active) = self.current.take() {
                        let limit = active.trial.time_limit_ms;
                        self.resolve(active, None, limit);
                    }
                }
            }
        }
    }

    /// Freeze every outstanding timer. Idempotent and fully reversible;
    /// pausing never changes the correctness of an already-submitted answer.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    fn resolve(&mut self, active: ActiveTrial, response: Option<Response>, latency_ms: i64) {
        let correct = response
            .as_ref()
            .map(|r| active.trial.is_correct(r))
            .unwrap_or(false);
        let points = scoring::score_response(
            &self.definition.score,
            correct,
            latency_ms,
            active.trial.time_limit_ms,
        );
        self.outcomes.push(TrialOutcome { correct, latency_ms, points });
        self.completed_trials += 1;
        tracing::debug!(
            trial = self.completed_trials,
            correct,
            latency_ms,
            points,
            "trial resolved"
        );

        if self.completed_trials >= self.definition.trial_count {
            self.complete();
        } else {
            self.phase = GamePhase::Feedback;
            self.feedback_remaining_ms = self.definition.feedback_ms;
        }
    }

    fn advance(&mut self) {
        if self.pending.is_empty() {
            if let Some(params) = self.definition.flexibility {
                self.flex_task =
                    stimulus::next_flex_task(self.flex_task, params.switch_probability, &mut self.rng);
            }
            match stimulus::generate_trial(&self.definition, self.flex_task, &mut self.rng) {
                Ok(trial) => self.pending.push_back(trial),
                Err(err) => {
                    // streaming generators cannot run out of unique values,
                    // but a broken definition must not wedge the session
                    tracing::error!(error = %err, "trial generation failed, completing early");
                    self.complete();
                    return;
                }
            }
        }
        self.phase = GamePhase::Playing;
        self.activate_next();
    }

    fn activate_next(&mut self) {
        if let Some(trial) = self.pending.pop_front() {
            let remaining_ms = trial.time_limit_ms;
            self.current = Some(ActiveTrial { trial, remaining_ms, elapsed_ms: 0 });
        }
    }

    fn complete(&mut self) {
        self.phase = GamePhase::Completed;
        self.current = None;

        let total = self.outcomes.len() as u32;
        let correct = self.outcomes.iter().filter(|o| o.correct).count() as u32;
        let accuracy = if total > 0 {
            (correct as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let correct_latencies: Vec<i64> = self
            .outcomes
            .iter()
            .filter(|o| o.correct)
            .map(|o| o.latency_ms)
            .collect();
        let avg_reaction_time_ms = if correct_latencies.is_empty() {
            0.0
        } else {
            correct_latencies.iter().sum::<i64>() as f64 / correct_latencies.len() as f64
        };

        self.result = Some(SessionResult {
            score: self.score(),
            accuracy,
            time_spent_ms: self.session_elapsed_ms,
            avg_reaction_time_ms,
            correct_count: correct,
            total_count: total,
            mistakes: total - correct,
        });
        tracing::debug!(
            score = self.score(),
            accuracy,
            elapsed_ms = self.session_elapsed_ms,
            "session completed"
        );
    }
}
