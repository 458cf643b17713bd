use std::time::Duration;

use crate::question::Question;
use crate::rewards::SessionOutcome;
use crate::scoring::Scoreboard;

pub const ROUND_SECONDS: u32 = 15;
pub const QUESTIONS_PER_SESSION: usize = 5;
pub const REVEAL_DELAY_MS: u64 = 2000;
/// At or below this many seconds the countdown is shown as urgent.
pub const LOW_TIME_SECS: u32 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub round_secs: u32,
    pub questions_per_session: usize,
    pub reveal_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            round_secs: ROUND_SECONDS,
            questions_per_session: QUESTIONS_PER_SESSION,
            reveal_delay: Duration::from_millis(REVEAL_DELAY_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Menu,
    Playing,
    Result,
    Leaderboard,
}

/// How Buddy reacts to the game so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum BuddyMood {
    #[default]
    Idle,
    Thinking,
    Happy,
    Sad,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    pub active_questions: Vec<Question>,
    pub current_index: usize,
    pub selected_answer: Option<usize>,
    pub revealed: bool,
    pub time_remaining: u32,
    pub scoreboard: Scoreboard,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(ROUND_SECONDS)
    }
}

impl SessionState {
    pub fn new(round_secs: u32) -> Self {
        Self {
            phase: Phase::Menu,
            active_questions: Vec::new(),
            current_index: 0,
            selected_answer: None,
            revealed: false,
            time_remaining: round_secs,
            scoreboard: Scoreboard::default(),
        }
    }

    /// `None` once the last question has been passed.
    pub fn current_question(&self) -> Option<&Question> {
        self.active_questions.get(self.current_index)
    }

    pub fn player_score(&self) -> u32 {
        self.scoreboard.player_score
    }

    pub fn opponent_score(&self) -> u32 {
        self.scoreboard.opponent_score
    }

    pub fn current_streak(&self) -> u32 {
        self.scoreboard.current_streak
    }

    pub fn outcome(&self) -> SessionOutcome {
        SessionOutcome {
            player_score: self.scoreboard.player_score,
            opponent_score: self.scoreboard.opponent_score,
            best_streak: self.scoreboard.best_streak,
            questions_played: self.scoreboard.resolved,
        }
    }
}
