use serde::{Deserialize, Serialize};

use crate::config::ScoreParams;

/// Outcome of one answered (or timed-out) trial. Folded into the session
/// aggregate when the engine completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialOutcome {
    pub correct: bool,
    pub latency_ms: i64,
    pub points: i64,
}

/// Uniform scoring rule. A correct answer earns the base plus a speed bonus
/// that shrinks linearly with elapsed time; an incorrect answer earns the
/// game's penalty (zero for most games, negative for distractor clicks).
pub fn score_response(
    params: &ScoreParams,
    correct: bool,
    elapsed_ms: i64,
    time_limit_ms: i64,
) -> i64 {
    if !correct {
        return params.penalty;
    }
    let remaining = (time_limit_ms - elapsed_ms).max(0) as f64;
    (params.base as f64 + remaining * params.bonus_factor).floor() as i64
}
