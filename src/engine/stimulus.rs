use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{AttentionParams, GameDefinition, MemoryParams};
use crate::error::GenerationError;
use crate::types::GameType;

const COLORS: [&str; 5] = ["red", "blue", "green", "yellow", "purple"];
const SHAPES: [&str; 5] = ["circle", "square", "triangle", "diamond", "star"];
const SIZES: [&str; 3] = ["small", "medium", "large"];

/// Retries per unique draw before generation fails fast instead of spinning
/// on a pathological parameter combination. Generous enough that a legal
/// draw of every remaining cell cannot plausibly exhaust it.
const UNIQUE_DRAW_ATTEMPTS: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexTask {
    Color,
    Shape,
    Number,
    Size,
}

impl FlexTask {
    pub const ALL: [FlexTask; 4] = [Self::Color, Self::Shape, Self::Number, Self::Size];

    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Color => "What COLOR is it?",
            Self::Shape => "What SHAPE is it?",
            Self::Number => "What NUMBER is shown?",
            Self::Size => "What SIZE is it?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedKind {
    Reaction,
    Comparison,
    Arithmetic,
    Matching,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dot {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub is_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Stimulus {
    /// Spatial recall: distinct grid cells lit in order.
    TileSequence { grid_side: u32, sequence: Vec<u32> },
    /// Attention field: tap targets, avoid distractors.
    DotField { dots: Vec<Dot> },
    /// Multiple-choice prompt (problem solving, speed trials).
    Prompt {
        text: String,
        speed_kind: Option<SpeedKind>,
        onset_delay_ms: i64,
    },
    /// Task-switching prompt with the attribute bundle being judged.
    TaskSwitch {
        task: FlexTask,
        color: String,
        shape: String,
        number: u32,
        size: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Response {
    Tiles(Vec<u32>),
    Choice(u32),
    Hit(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", content = "value", tag = "kind")]
pub enum Answer {
    Tiles(Vec<u32>),
    Choice(u32),
    /// Any target dot in the field counts.
    AnyTarget,
}

/// One stimulus-response unit. Created at round start, consumed once answered
/// or timed out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    pub stimulus: Stimulus,
    pub options: Vec<String>,
    pub correct: Answer,
    pub time_limit_ms: i64,
    pub created_at: i64,
}

impl Trial {
    pub fn is_correct(&self, response: &Response) -> bool {
        match (&self.correct, response) {
            (Answer::Tiles(expected), Response::Tiles(given)) => expected == given,
            (Answer::Choice(expected), Response::Choice(given)) => expected == given,
            (Answer::AnyTarget, Response::Hit(id)) => match &self.stimulus {
                Stimulus::DotField { dots } => {
                    dots.iter().any(|d| d.id == *id && d.is_target)
                }
                _ => false,
            },
            _ => false,
        }
    }
}

/// Generate one trial for the given definition. `flex_task` carries the
/// task-switching state for flexibility games and is ignored elsewhere.
pub fn generate_trial(
    definition: &GameDefinition,
    flex_task: FlexTask,
    rng: &mut impl Rng,
) -> Result<Trial, GenerationError> {
    let trial = match definition.game_type {
        GameType::Memory => tile_sequence_trial(definition, rng)?,
        GameType::Attention => dot_field_trial(definition, rng),
        GameType::ProblemSolving => problem_trial(definition, rng),
        GameType::Flexibility => task_switch_trial(definition, flex_task, rng),
        GameType::Speed => speed_trial(definition, rng),
    };
    Ok(trial)
}

/// Decide the task for the next flexibility trial. A switch draws uniformly
/// from the other three tasks.
pub fn next_flex_task(
    current: FlexTask,
    switch_probability: f64,
    rng: &mut impl Rng,
) -> FlexTask {
    if rng.random::<f64>() >= switch_probability {
        return current;
    }
    let others: Vec<FlexTask> = FlexTask::ALL
        .iter()
        .copied()
        .filter(|t| *t != current)
        .collect();
    *others.choose(rng).unwrap_or(&current)
}

fn tile_sequence_trial(
    definition: &GameDefinition,
    rng: &mut impl Rng,
) -> Result<Trial, GenerationError> {
    let params = definition.memory.unwrap_or(MemoryParams {
        grid_side: 3,
        sequence_len: 3,
        memorize_ms: 2000,
    });
    let cell_count = params.grid_side * params.grid_side;
    let sequence = draw_unique(params.sequence_len, cell_count, rng)?;

    Ok(Trial {
        stimulus: Stimulus::TileSequence {
            grid_side: params.grid_side,
            sequence: sequence.clone(),
        },
        options: Vec::new(),
        correct: Answer::Tiles(sequence),
        time_limit_ms: definition.trial_time_ms,
        created_at: chrono::Utc::now().timestamp_millis(),
    })
}

/// Rejection sampling with a bounded retry budget per cell. Exhausting the
/// budget means the request was impossible (or absurdly tight), so fail fast.
fn draw_unique(
    requested: u32,
    available: u32,
    rng: &mut impl Rng,
) -> Result<Vec<u32>, GenerationError> {
    let mut drawn: Vec<u32> = Vec::with_capacity(requested as usize);
    for _ in 0..requested {
        let mut attempts = 0;
        loop {
            let candidate = rng.random_range(0..available.max(1));
            if !drawn.contains(&candidate) {
                drawn.push(candidate);
                break;
            }
            attempts += 1;
            if attempts >= UNIQUE_DRAW_ATTEMPTS {
                return Err(GenerationError::UniqueDrawExhausted {
                    requested,
                    available,
                    attempts,
                });
            }
        }
    }
    Ok(drawn)
}

fn dot_field_trial(definition: &GameDefinition, rng: &mut impl Rng) -> Trial {
    let params = definition.attention.unwrap_or(AttentionParams {
        target_count: 3,
        distractor_count: 7,
    });
    let size_variation = match definition.tier {
        crate::types::DifficultyTier::Easy => 0.8,
        crate::types::DifficultyTier::Medium => 0.6,
        crate::types::DifficultyTier::Hard => 0.4,
        crate::types::DifficultyTier::Expert => 0.2,
        crate::types::DifficultyTier::Master => 0.1,
    };

    let mut dots = Vec::with_capacity((params.target_count + params.distractor_count) as usize);
    let mut id = 0;
    for _ in 0..params.target_count {
        dots.push(Dot {
            id,
            x: rng.random::<f64>(),
            y: rng.random::<f64>(),
            size: 20.0 + rng.random::<f64>() * 10.0 * size_variation,
            is_target: true,
        });
        id += 1;
    }
    for _ in 0..params.distractor_count {
        dots.push(Dot {
            id,
            x: rng.random::<f64>(),
            y: rng.random::<f64>(),
            size: 15.0 + rng.random::<f64>() * 15.0 * size_variation,
            is_target: false,
        });
        id += 1;
    }
    dots.shuffle(rng);

    Trial {
        stimulus: Stimulus::DotField { dots },
        options: Vec::new(),
        correct: Answer::AnyTarget,
        time_limit_ms: definition.trial_time_ms,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

struct BankProblem {
    question: &'static str,
    options: [&'static str; 4],
    correct: u32,
}

const LOGIC_BANK: [BankProblem; 3] = [
    BankProblem {
        question: "All roses are flowers. Some flowers fade quickly. Therefore:",
        options: [
            "All roses fade quickly",
            "Some roses may fade quickly",
            "No roses fade quickly",
            "Roses are not flowers",
        ],
        correct: 1,
    },
    BankProblem {
        question: "If it takes 5 machines 5 minutes to make 5 widgets, how long for 100 machines to make 100 widgets?",
        options: ["5 minutes", "100 minutes", "20 minutes", "1 minute"],
        correct: 0,
    },
    BankProblem {
        question: "A farmer has 17 sheep. All but 9 run away. How many are left?",
        options: ["8", "9", "17", "0"],
        correct: 1,
    },
];

const PATTERN_BANK: [BankProblem; 3] = [
    BankProblem {
        question: "Which shape completes the pattern? \u{25cb} \u{25b3} \u{25cb} \u{25b3} \u{25cb} ?",
        options: ["\u{25cb}", "\u{25b3}", "\u{25a1}", "\u{25c7}"],
        correct: 1,
    },
    BankProblem {
        question: "What number comes next: 1, 4, 9, 16, 25, ?",
        options: ["30", "36", "42", "49"],
        correct: 1,
    },
    BankProblem {
        question: "Complete the pattern: A1, C3, E5, G7, ?",
        options: ["H8", "I9", "I8", "J9"],
        correct: 1,
    },
];

fn problem_trial(definition: &GameDefinition, rng: &mut impl Rng) -> Trial {
    match rng.random_range(0..3) {
        0 => math_problem(definition, rng),
        1 => bank_problem(definition, &LOGIC_BANK, rng),
        _ => bank_problem(definition, &PATTERN_BANK, rng),
    }
}

fn bank_problem(definition: &GameDefinition, bank: &[BankProblem], rng: &mut impl Rng) -> Trial {
    let problem = &bank[rng.random_range(0..bank.len())];
    Trial {
        stimulus: Stimulus::Prompt {
            text: problem.question.to_string(),
            speed_kind: None,
            onset_delay_ms: 0,
        },
        options: problem.options.iter().map(|s| s.to_string()).collect(),
        correct: Answer::Choice(problem.correct),
        time_limit_ms: definition.trial_time_ms,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

fn math_problem(definition: &GameDefinition, rng: &mut impl Rng) -> Trial {
    let complexity = definition.complexity();
    let max_number = (10.0 + complexity * 5.0) as i64;

    let (text, answer) = if complexity < 2.0 {
        let a = rng.random_range(1..=max_number);
        let b = rng.random_range(1..=max_number);
        if rng.random::<f64>() < 0.5 {
            (format!("{a} + {b} = ?"), a + b)
        } else {
            let larger = a.max(b);
            let smaller = a.min(b);
            (format!("{larger} - {smaller} = ?"), larger - smaller)
        }
    } else {
        let a = rng.random_range(1..=max_number);
        let b = rng.random_range(1..=max_number);
        let c = rng.random_range(1..=max_number.min(9));
        (format!("({a} + {b}) \u{00d7} {c} = ?"), (a + b) * c)
    };

    let (options, correct) = choice_options(answer, rng);
    Trial {
        stimulus: Stimulus::Prompt { text, speed_kind: None, onset_delay_ms: 0 },
        options,
        correct: Answer::Choice(correct),
        time_limit_ms: definition.trial_time_ms,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

/// Build four distinct numeric options around the answer and shuffle them,
/// returning the shuffled list and the correct index.
fn choice_options(answer: i64, rng: &mut impl Rng) -> (Vec<String>, u32) {
    let mut values = vec![answer];
    let candidates = [
        answer + rng.random_range(1..=5),
        answer - rng.random_range(1..=5),
        answer + 5 + rng.random_range(0..10),
    ];
    for mut candidate in candidates {
        while values.contains(&candidate) {
            candidate += 1;
        }
        values.push(candidate);
    }
    values.shuffle(rng);
    let correct = values.iter().position(|v| *v == answer).unwrap_or(0) as u32;
    (values.into_iter().map(|v| v.to_string()).collect(), correct)
}

fn task_switch_trial(
    definition: &GameDefinition,
    task: FlexTask,
    rng: &mut impl Rng,
) -> Trial {
    let color = *COLORS.choose(rng).unwrap_or(&COLORS[0]);
    let shape = *SHAPES.choose(rng).unwrap_or(&SHAPES[0]);
    let number = rng.random_range(1..=9u32);
    let size = *SIZES.choose(rng).unwrap_or(&SIZES[1]);

    let (mut options, answer_value): (Vec<String>, String) = match task {
        FlexTask::Color => (
            COLORS.iter().map(|s| s.to_string()).collect(),
            color.to_string(),
        ),
        FlexTask::Shape => (
            SHAPES.iter().map(|s| s.to_string()).collect(),
            shape.to_string(),
        ),
        FlexTask::Number => (
            (1..=9u32).map(|n| n.to_string()).collect(),
            number.to_string(),
        ),
        FlexTask::Size => (
            SIZES.iter().map(|s| s.to_string()).collect(),
            size.to_string(),
        ),
    };
    options.shuffle(rng);
    let correct = options.iter().position(|o| *o == answer_value).unwrap_or(0) as u32;

    Trial {
        stimulus: Stimulus::TaskSwitch {
            task,
            color: color.to_string(),
            shape: shape.to_string(),
            number,
            size: size.to_string(),
        },
        options,
        correct: Answer::Choice(correct),
        time_limit_ms: definition.trial_time_ms,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

fn speed_trial(definition: &GameDefinition, rng: &mut impl Rng) -> Trial {
    match rng.random_range(0..4) {
        0 => reaction_trial(definition, rng),
        1 => comparison_trial(definition, rng),
        2 => arithmetic_trial(definition, rng),
        _ => matching_trial(definition, rng),
    }
}

fn reaction_trial(definition: &GameDefinition, rng: &mut impl Rng) -> Trial {
    Trial {
        stimulus: Stimulus::Prompt {
            text: "Click as soon as the circle appears!".to_string(),
            speed_kind: Some(SpeedKind::Reaction),
            // the host delays the cue; the trial clock covers delay + response
            onset_delay_ms: rng.random_range(1000..4000),
        },
        options: vec!["click".to_string()],
        correct: Answer::Choice(0),
        time_limit_ms: definition.trial_time_ms + 4000,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

fn comparison_trial(definition: &GameDefinition, rng: &mut impl Rng) -> Trial {
    let a = rng.random_range(1..=50);
    let b = rng.random_range(1..=50);
    let correct = if a > b { 0 } else { 1 };
    Trial {
        stimulus: Stimulus::Prompt {
            text: format!("Is {a} greater than {b}?"),
            speed_kind: Some(SpeedKind::Comparison),
            onset_delay_ms: 0,
        },
        options: vec!["yes".to_string(), "no".to_string()],
        correct: Answer::Choice(correct),
        time_limit_ms: definition.trial_time_ms,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

fn arithmetic_trial(definition: &GameDefinition, rng: &mut impl Rng) -> Trial {
    let bonus = definition.tier.complexity_bonus() as i64;
    let max_number = 10 + bonus * 5;
    let a = rng.random_range(1..=max_number);
    let b = rng.random_range(1..=max_number);
    let (text, answer) = if rng.random::<f64>() < 0.5 {
        (format!("{a} + {b} = ?"), a + b)
    } else {
        let larger = a.max(b);
        let smaller = a.min(b);
        (format!("{larger} - {smaller} = ?"), larger - smaller)
    };
    let (options, correct) = choice_options(answer, rng);
    Trial {
        stimulus: Stimulus::Prompt {
            text,
            speed_kind: Some(SpeedKind::Arithmetic),
            onset_delay_ms: 0,
        },
        options,
        correct: Answer::Choice(correct),
        time_limit_ms: definition.trial_time_ms,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}

fn matching_trial(definition: &GameDefinition, rng: &mut impl Rng) -> Trial {
    let shape_idx = rng.random_range(0..SHAPES.len());
    let color_idx = rng.random_range(0..COLORS.len());
    let target = format!("{} {}", SHAPES[shape_idx], COLORS[color_idx]);

    let mut options = vec![
        target.clone(),
        format!("{} {}", SHAPES[(shape_idx + 1) % SHAPES.len()], COLORS[color_idx]),
        format!("{} {}", SHAPES[shape_idx], COLORS[(color_idx + 1) % COLORS.len()]),
        format!(
            "{} {}",
            SHAPES[(shape_idx + 2) % SHAPES.len()],
            COLORS[(color_idx + 2) % COLORS.len()]
        ),
    ];
    options.shuffle(rng);
    let correct = options.iter().position(|o| *o == target).unwrap_or(0) as u32;

    Trial {
        stimulus: Stimulus::Prompt {
            text: format!("Find: {target}"),
            speed_kind: Some(SpeedKind::Matching),
            onset_delay_ms: 0,
        },
        options,
        correct: Answer::Choice(correct),
        time_limit_ms: definition.trial_time_ms,
        created_at: chrono::Utc::now().timestamp_millis(),
    }
}
