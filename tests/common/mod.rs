#![allow(dead_code)]

use std::time::Duration;

use quizbattle::{
    engine::QuizEngine,
    progress::{MemoryProgressStore, ProgressStore},
    question::{Difficulty, Question, QuestionBank, OPTION_COUNT},
    session::{SessionConfig, REVEAL_DELAY_MS, ROUND_SECONDS},
    sound::RecordingEmitter,
};
use rand::{rngs::StdRng, SeedableRng};

pub const ROUND: Duration = Duration::from_secs(ROUND_SECONDS as u64);
pub const REVEAL: Duration = Duration::from_millis(REVEAL_DELAY_MS);

pub fn question(n: usize, difficulty: Difficulty) -> Question {
    Question {
        text: format!("question {n}"),
        options: [
            format!("{n}a"),
            format!("{n}b"),
            format!("{n}c"),
            format!("{n}d"),
        ],
        correct_index: n % OPTION_COUNT,
        difficulty,
        topic: "Testing".to_string(),
    }
}

pub fn bank(count: usize, difficulty: Difficulty) -> QuestionBank {
    QuestionBank::new(
        "scenario",
        (0..count).map(|n| question(n, difficulty)).collect(),
    )
    .unwrap()
}

pub fn engine_with_store(
    bank: QuestionBank,
    store: impl ProgressStore + 'static,
    seed: u64,
) -> QuizEngine<StdRng> {
    QuizEngine::with_rng(
        bank,
        SessionConfig::default(),
        StdRng::seed_from_u64(seed),
        Box::new(store),
        Box::new(RecordingEmitter::new()),
    )
}

pub fn engine(bank: QuestionBank) -> QuizEngine<StdRng> {
    engine_with_store(bank, MemoryProgressStore::new(), 7)
}

pub fn correct(engine: &QuizEngine<StdRng>) -> usize {
    engine.state().current_question().unwrap().correct_index
}

pub fn wrong(engine: &QuizEngine<StdRng>) -> usize {
    (correct(engine) + 1) % OPTION_COUNT
}

/// Answer the open question and wait out the reveal delay.
pub fn answer_and_advance(engine: &mut QuizEngine<StdRng>, right: bool) {
    let choice = if right { correct(engine) } else { wrong(engine) };
    engine.submit_answer(choice).unwrap();
    engine.tick(REVEAL);
}

/// Let the open question run out and wait out the reveal delay.
pub fn time_out_and_advance(engine: &mut QuizEngine<StdRng>) {
    engine.tick(ROUND);
    engine.tick(REVEAL);
}
