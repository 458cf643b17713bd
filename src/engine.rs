//! The quiz battle state machine.
//!
//! [`QuizEngine`] owns one session at a time and moves it through
//! `Menu -> Playing -> Result`, with `Leaderboard` reachable from the menu.
//! Time never passes on its own: the host calls [`QuizEngine::tick`] with
//! the elapsed wall time, which fires the round countdown, the reveal delay
//! and the win fanfare through a cancellable [`Scheduler`].

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::progress::{CumulativeProgress, ProgressStore, SessionRecord};
use crate::question::{Question, QuestionBank, OPTION_COUNT};
use crate::rewards::{self, RewardId, SessionOutcome, Verdict};
use crate::sampler::sample;
use crate::scoring::{AnswerKind, Resolution};
use crate::session::{BuddyMood, Phase, SessionConfig, SessionState, LOW_TIME_SECS};
use crate::sound::{cues, SoundEmitter, Tone};
use crate::timer::{Scheduler, TaskHandle};

/// Rows shown on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

const ROUND_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Task {
    RoundTick { question: usize },
    Advance { question: usize },
    Chime(Tone),
}

/// What the last completed session produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub outcome: SessionOutcome,
    pub new_rewards: Vec<RewardId>,
}

impl SessionSummary {
    pub fn verdict(&self) -> Verdict {
        self.outcome.verdict()
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub question: Option<Question>,
    /// 1-based position of `question`.
    pub question_number: usize,
    pub total_questions: usize,
    pub selected_answer: Option<usize>,
    pub revealed: bool,
    pub time_remaining: u32,
    pub round_secs: u32,
    pub player_score: u32,
    pub opponent_score: u32,
    pub current_streak: u32,
    pub mood: BuddyMood,
    pub last_resolution: Option<Resolution>,
    pub summary: Option<SessionSummary>,
    pub progress: CumulativeProgress,
    pub leaderboard: Vec<SessionRecord>,
}

impl Snapshot {
    pub fn low_time(&self) -> bool {
        self.time_remaining <= LOW_TIME_SECS
    }

    /// Share of the round still left, from 1.0 down to 0.0.
    pub fn time_fraction(&self) -> f64 {
        if self.round_secs == 0 {
            return 0.0;
        }
        f64::from(self.time_remaining) / f64::from(self.round_secs)
    }
}

pub struct QuizEngine<R: Rng = StdRng> {
    bank: QuestionBank,
    config: SessionConfig,
    rng: R,
    store: Box<dyn ProgressStore>,
    sound: Box<dyn SoundEmitter>,
    scheduler: Scheduler<Task>,
    round_timer: Option<TaskHandle>,
    reveal_delay: Option<TaskHandle>,
    state: SessionState,
    progress: CumulativeProgress,
    mood: BuddyMood,
    last_resolution: Option<Resolution>,
    summary: Option<SessionSummary>,
    leaderboard: Vec<SessionRecord>,
}

impl QuizEngine<StdRng> {
    pub fn new(
        bank: QuestionBank,
        config: SessionConfig,
        store: Box<dyn ProgressStore>,
        sound: Box<dyn SoundEmitter>,
    ) -> Self {
        Self::with_rng(bank, config, StdRng::from_entropy(), store, sound)
    }
}

impl<R: Rng> QuizEngine<R> {
    pub fn with_rng(
        bank: QuestionBank,
        config: SessionConfig,
        rng: R,
        store: Box<dyn ProgressStore>,
        sound: Box<dyn SoundEmitter>,
    ) -> Self {
        let progress = match store.load() {
            Ok(Some(progress)) => progress,
            Ok(None) => {
                debug!("no stored progress, starting fresh");
                CumulativeProgress::default()
            }
            Err(e) => {
                warn!("progress store unavailable, starting fresh: {}", e);
                CumulativeProgress::default()
            }
        };

        let config = SessionConfig {
            round_secs: config.round_secs.max(1),
            questions_per_session: config.questions_per_session.max(1),
            ..config
        };

        Self {
            bank,
            state: SessionState::new(config.round_secs),
            config,
            rng,
            store,
            sound,
            scheduler: Scheduler::new(),
            round_timer: None,
            reveal_delay: None,
            progress,
            mood: BuddyMood::Idle,
            last_resolution: None,
            summary: None,
            leaderboard: Vec::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn progress(&self) -> &CumulativeProgress {
        &self.progress
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn mood(&self) -> BuddyMood {
        self.mood
    }

    pub fn last_resolution(&self) -> Option<&Resolution> {
        self.last_resolution.as_ref()
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn leaderboard(&self) -> &[SessionRecord] {
        &self.leaderboard
    }

    /// Timers and delays still waiting to fire.
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn snapshot(&self) -> Snapshot {
        let question = self.state.current_question().cloned();
        Snapshot {
            phase: self.state.phase,
            question_number: (self.state.current_index + 1).min(self.state.active_questions.len()),
            question,
            total_questions: self.state.active_questions.len(),
            selected_answer: self.state.selected_answer,
            revealed: self.state.revealed,
            time_remaining: self.state.time_remaining,
            round_secs: self.config.round_secs,
            player_score: self.state.player_score(),
            opponent_score: self.state.opponent_score(),
            current_streak: self.state.current_streak(),
            mood: self.mood,
            last_resolution: self.last_resolution,
            summary: self.summary.clone(),
            progress: self.progress.clone(),
            leaderboard: self.leaderboard.clone(),
        }
    }

    /// Begin a new session with freshly sampled questions. Allowed from any
    /// phase; a session in progress is abandoned without being counted.
    pub fn start_session(&mut self) {
        if self.state.phase == Phase::Playing {
            debug!(
                "abandoning session at question {}",
                self.state.current_index + 1
            );
        }
        self.cancel_all();

        let questions = sample(&self.bank, self.config.questions_per_session, &mut self.rng);
        self.state = SessionState {
            phase: Phase::Playing,
            active_questions: questions,
            ..SessionState::new(self.config.round_secs)
        };
        self.last_resolution = None;
        self.summary = None;
        self.mood = BuddyMood::Thinking;
        self.sound.play(cues::START);

        debug!(
            "session started with {} questions",
            self.state.active_questions.len()
        );
        self.begin_question();
    }

    /// Answer the current question. Ignored (returns `None`) outside of
    /// play, once the question is revealed, or for an out-of-range option.
    pub fn submit_answer(&mut self, index: usize) -> Option<Resolution> {
        if self.state.phase != Phase::Playing || self.state.revealed {
            trace!("ignoring answer {} outside of an open question", index);
            return None;
        }
        if index >= OPTION_COUNT {
            return None;
        }
        self.resolve(Some(index))
    }

    /// Close the game view. Every pending timer is dropped and nothing is
    /// mutated or saved afterwards until a new command arrives.
    pub fn close_session(&mut self) {
        if self.state.phase == Phase::Playing {
            debug!(
                "session closed at question {}",
                self.state.current_index + 1
            );
        }
        self.cancel_all();
        self.state.phase = Phase::Menu;
        self.mood = BuddyMood::Idle;
    }

    pub fn go_to_leaderboard(&mut self) -> bool {
        if self.state.phase != Phase::Menu {
            return false;
        }

        self.leaderboard = match self.store.top_sessions(LEADERBOARD_SIZE) {
            Ok(sessions) => sessions,
            Err(e) => {
                warn!("unable to load session history: {}", e);
                Vec::new()
            }
        };
        self.state.phase = Phase::Leaderboard;
        debug!("phase -> {}", self.state.phase);
        true
    }

    pub fn return_to_menu(&mut self) -> bool {
        if !matches!(self.state.phase, Phase::Result | Phase::Leaderboard) {
            return false;
        }

        self.cancel_all();
        self.state.phase = Phase::Menu;
        self.mood = BuddyMood::Idle;
        debug!("phase -> {}", self.state.phase);
        true
    }

    /// Advance the engine's clock, firing whatever fell due in order.
    pub fn tick(&mut self, elapsed: Duration) {
        let until = self.scheduler.now() + elapsed;
        while let Some((_, task)) = self.scheduler.pop_due(until) {
            self.run(task);
        }
        self.scheduler.settle(until);
    }

    fn run(&mut self, task: Task) {
        match task {
            Task::Chime(tone) => self.sound.play(tone),
            Task::RoundTick { question } => {
                if !self.is_live(question) || self.state.revealed {
                    trace!("dropping stale round tick for question {}", question);
                    return;
                }
                self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
                if self.state.time_remaining == 0 {
                    self.resolve(None);
                }
            }
            Task::Advance { question } => {
                if !self.is_live(question) || !self.state.revealed {
                    trace!("dropping stale advance for question {}", question);
                    return;
                }
                self.reveal_delay = None;
                self.advance();
            }
        }
    }

    fn is_live(&self, question: usize) -> bool {
        self.state.phase == Phase::Playing && self.state.current_index == question
    }

    fn begin_question(&mut self) {
        self.cancel_question_tasks();
        self.state.selected_answer = None;
        self.state.revealed = false;
        self.state.time_remaining = self.config.round_secs;

        let question = self.state.current_index;
        self.round_timer = Some(self.scheduler.every(ROUND_TICK, Task::RoundTick { question }));
    }

    /// Settle the current question; `None` means the round timed out.
    fn resolve(&mut self, selected: Option<usize>) -> Option<Resolution> {
        let index = self.state.current_index;
        let question = self.state.active_questions.get(index)?;
        let difficulty = question.difficulty;
        let kind = match selected {
            Some(answer) if question.is_correct(answer) => AnswerKind::Correct,
            Some(_) => AnswerKind::Incorrect,
            None => AnswerKind::Timeout,
        };

        if let Some(handle) = self.round_timer.take() {
            self.scheduler.cancel(handle);
        }
        self.state.selected_answer = selected;
        self.state.revealed = true;

        let resolution = self
            .state
            .scoreboard
            .record(index, difficulty, kind, selected);

        if resolution.is_correct() {
            self.mood = BuddyMood::Sad;
            for tone in cues::CORRECT {
                self.sound.play(tone);
            }
        } else {
            self.mood = BuddyMood::Happy;
            self.sound.play(cues::MISS);
        }

        debug!(
            "question {} resolved: {} ({} to {})",
            index + 1,
            resolution.kind,
            resolution.points,
            resolution.awarded_to
        );

        self.reveal_delay = Some(
            self.scheduler
                .after(self.config.reveal_delay, Task::Advance { question: index }),
        );
        self.last_resolution = Some(resolution);
        Some(resolution)
    }

    fn advance(&mut self) {
        self.state.current_index += 1;
        if self.state.current_index < self.state.active_questions.len() {
            self.mood = BuddyMood::Thinking;
            self.begin_question();
        } else {
            self.end_session();
        }
    }

    fn end_session(&mut self) {
        self.cancel_question_tasks();
        self.state.phase = Phase::Result;

        let outcome = self.state.outcome();
        self.progress.record_session(&outcome);

        if outcome.won() {
            self.mood = BuddyMood::Sad;
            self.play_fanfare();
        } else {
            self.mood = BuddyMood::Happy;
            self.sound.play(cues::DEFEAT);
        }

        let new_rewards = rewards::evaluate(&outcome, &self.progress);
        for reward in &new_rewards {
            self.progress.unlock(*reward);
            self.sound.play(cues::REWARD);
            info!("reward unlocked: {}", reward);
        }

        self.persist(&outcome);

        info!(
            "session finished: {} ({} vs {}), {} games played",
            outcome.verdict(),
            outcome.player_score,
            outcome.opponent_score,
            self.progress.games_played
        );
        self.summary = Some(SessionSummary {
            outcome,
            new_rewards,
        });
    }

    fn play_fanfare(&mut self) {
        for (step, tone) in cues::FANFARE.into_iter().enumerate() {
            if step == 0 {
                self.sound.play(tone);
            } else {
                let delay = Duration::from_millis(cues::FANFARE_STEP_MS * step as u64);
                self.scheduler.after(delay, Task::Chime(tone));
            }
        }
    }

    /// Best effort: a failed write only costs this session's stats.
    fn persist(&mut self, outcome: &SessionOutcome) {
        if let Err(e) = self.store.save(&self.progress) {
            warn!("unable to save progress: {}", e);
        }
        let record = SessionRecord::new(outcome, Local::now());
        if let Err(e) = self.store.record_session(&record) {
            warn!("unable to record session history: {}", e);
        }
    }

    fn cancel_question_tasks(&mut self) {
        for handle in [self.round_timer.take(), self.reveal_delay.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(handle);
        }
    }

    fn cancel_all(&mut self) {
        self.round_timer = None;
        self.reveal_delay = None;
        self.scheduler.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryProgressStore;
    use crate::question::{test_question, Difficulty};
    use crate::scoring::Party;
    use crate::sound::RecordingEmitter;
    use assert_matches::assert_matches;

    fn bank(difficulties: &[Difficulty]) -> QuestionBank {
        let questions = difficulties
            .iter()
            .enumerate()
            .map(|(i, d)| test_question(&format!("q{i}"), *d, i % OPTION_COUNT))
            .collect();
        QuestionBank::new("test", questions).unwrap()
    }

    fn engine_with(
        bank: QuestionBank,
        store: MemoryProgressStore,
        sound: RecordingEmitter,
    ) -> QuizEngine<StdRng> {
        QuizEngine::with_rng(
            bank,
            SessionConfig::default(),
            StdRng::seed_from_u64(11),
            Box::new(store),
            Box::new(sound),
        )
    }

    fn engine(bank: QuestionBank) -> QuizEngine<StdRng> {
        engine_with(bank, MemoryProgressStore::new(), RecordingEmitter::new())
    }

    fn correct_answer(engine: &QuizEngine<StdRng>) -> usize {
        engine.state().current_question().unwrap().correct_index
    }

    fn wrong_answer(engine: &QuizEngine<StdRng>) -> usize {
        (correct_answer(engine) + 1) % OPTION_COUNT
    }

    #[test]
    fn test_starts_in_menu() {
        let engine = engine(bank(&[Difficulty::Easy]));
        assert_eq!(engine.phase(), Phase::Menu);
        assert_eq!(engine.mood(), BuddyMood::Idle);
        assert_eq!(engine.pending_tasks(), 0);
    }

    #[test]
    fn test_start_session_resets_and_arms_timer() {
        let mut engine = engine(bank(&[Difficulty::Easy; 8]));
        engine.start_session();

        let state = engine.state();
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.active_questions.len(), 5);
        assert_eq!(state.current_index, 0);
        assert_eq!(state.time_remaining, 15);
        assert!(!state.revealed);
        assert_eq!(engine.mood(), BuddyMood::Thinking);
        assert_eq!(engine.pending_tasks(), 1);
    }

    #[test]
    fn test_countdown_decrements_each_second() {
        let mut engine = engine(bank(&[Difficulty::Easy; 5]));
        engine.start_session();

        engine.tick(Duration::from_millis(999));
        assert_eq!(engine.state().time_remaining, 15);
        engine.tick(Duration::from_millis(1));
        assert_eq!(engine.state().time_remaining, 14);
        engine.tick(Duration::from_secs(3));
        assert_eq!(engine.state().time_remaining, 11);
    }

    #[test]
    fn test_correct_answer() {
        let mut engine = engine(bank(&[Difficulty::Medium; 5]));
        engine.start_session();

        let r = engine.submit_answer(correct_answer(&engine)).unwrap();
        assert_eq!(r.kind, AnswerKind::Correct);
        assert_eq!(r.points, 2);
        assert_eq!(engine.state().player_score(), 2);
        assert_eq!(engine.state().current_streak(), 1);
        assert!(engine.state().revealed);
        assert_eq!(engine.mood(), BuddyMood::Sad);
    }

    #[test]
    fn test_wrong_answer_feeds_buddy() {
        let mut engine = engine(bank(&[Difficulty::Hard; 5]));
        engine.start_session();

        let r = engine.submit_answer(wrong_answer(&engine)).unwrap();
        assert_eq!(r.kind, AnswerKind::Incorrect);
        assert_eq!(r.awarded_to, Party::Buddy);
        assert_eq!(engine.state().opponent_score(), 2);
        assert_eq!(engine.mood(), BuddyMood::Happy);
    }

    #[test]
    fn test_second_submission_is_ignored() {
        let mut engine = engine(bank(&[Difficulty::Easy; 5]));
        engine.start_session();

        let answer = correct_answer(&engine);
        assert!(engine.submit_answer(answer).is_some());
        let before = engine.state().clone();
        assert!(engine.submit_answer(answer).is_none());
        assert!(engine.submit_answer(wrong_answer(&engine)).is_none());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_answer_outside_play_is_ignored() {
        let mut engine = engine(bank(&[Difficulty::Easy]));
        assert!(engine.submit_answer(0).is_none());
        assert_eq!(engine.state().player_score(), 0);
    }

    #[test]
    fn test_out_of_range_answer_is_ignored() {
        let mut engine = engine(bank(&[Difficulty::Easy]));
        engine.start_session();
        assert!(engine.submit_answer(OPTION_COUNT).is_none());
        assert!(!engine.state().revealed);
    }

    #[test]
    fn test_answer_stops_countdown() {
        let mut engine = engine(bank(&[Difficulty::Easy; 5]));
        engine.start_session();
        engine.tick(Duration::from_secs(4));
        engine.submit_answer(correct_answer(&engine));

        engine.tick(Duration::from_millis(1900));
        assert_eq!(engine.state().time_remaining, 11);
        assert_eq!(engine.state().current_index, 0);
    }

    #[test]
    fn test_reveal_delay_advances() {
        let mut engine = engine(bank(&[Difficulty::Easy; 5]));
        engine.start_session();
        engine.submit_answer(correct_answer(&engine));

        engine.tick(Duration::from_secs(2));
        let state = engine.state();
        assert_eq!(state.current_index, 1);
        assert!(!state.revealed);
        assert_eq!(state.selected_answer, None);
        assert_eq!(state.time_remaining, 15);
        assert_eq!(engine.mood(), BuddyMood::Thinking);
    }

    #[test]
    fn test_timeout_resolves_once() {
        let mut engine = engine(bank(&[Difficulty::Medium; 5]));
        engine.start_session();

        engine.tick(Duration::from_secs(15));
        assert_matches!(
            engine.last_resolution(),
            Some(Resolution { kind: AnswerKind::Timeout, points: 1, .. })
        );
        assert_eq!(engine.state().opponent_score(), 1);
        assert_eq!(engine.state().time_remaining, 0);
        assert!(engine.submit_answer(0).is_none());

        engine.tick(Duration::from_millis(1999));
        assert_eq!(engine.state().opponent_score(), 1);
        assert_eq!(engine.state().scoreboard.resolved, 1);
    }

    #[test]
    fn test_single_big_tick_plays_out_whole_session() {
        let mut engine = engine(bank(&[Difficulty::Easy; 5]));
        engine.start_session();

        engine.tick(Duration::from_secs(5 * 17));
        assert_eq!(engine.phase(), Phase::Result);
        assert_eq!(engine.state().opponent_score(), 5);
        assert_eq!(engine.state().scoreboard.resolved, 5);
        assert_eq!(engine.state().current_index, 5);
    }

    #[test]
    fn test_close_cancels_everything() {
        let store = MemoryProgressStore::new();
        let mut engine = engine_with(
            bank(&[Difficulty::Easy; 5]),
            store.clone(),
            RecordingEmitter::new(),
        );
        engine.start_session();
        engine.tick(Duration::from_secs(3));
        engine.close_session();

        let frozen = engine.state().clone();
        engine.tick(Duration::from_secs(600));
        assert_eq!(engine.pending_tasks(), 0);
        assert_eq!(engine.state().time_remaining, frozen.time_remaining);
        assert_eq!(engine.state().scoreboard, frozen.scoreboard);
        assert_eq!(engine.phase(), Phase::Menu);
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_close_during_reveal_delay() {
        let mut engine = engine(bank(&[Difficulty::Easy; 5]));
        engine.start_session();
        engine.submit_answer(correct_answer(&engine));
        engine.close_session();

        engine.tick(Duration::from_secs(10));
        assert_eq!(engine.state().current_index, 0);
        assert_eq!(engine.progress().games_played, 0);
    }

    #[test]
    fn test_restart_mid_session_drops_old_timers() {
        let mut engine = engine(bank(&[Difficulty::Easy; 8]));
        engine.start_session();
        engine.tick(Duration::from_millis(14_500));
        engine.start_session();

        engine.tick(Duration::from_millis(600));
        assert_eq!(engine.state().time_remaining, 15);
        assert_eq!(engine.state().opponent_score(), 0);
        assert_eq!(engine.pending_tasks(), 1);
    }

    #[test]
    fn test_leaderboard_only_from_menu() {
        let mut engine = engine(bank(&[Difficulty::Easy; 5]));
        assert!(engine.go_to_leaderboard());
        assert_eq!(engine.phase(), Phase::Leaderboard);
        assert!(!engine.go_to_leaderboard());
        assert!(engine.return_to_menu());
        assert_eq!(engine.phase(), Phase::Menu);

        engine.start_session();
        assert!(!engine.go_to_leaderboard());
        assert!(!engine.return_to_menu());
        assert_eq!(engine.phase(), Phase::Playing);
    }

    #[test]
    fn test_win_fanfare_is_scheduled_and_cancellable() {
        let sound = RecordingEmitter::new();
        let mut engine = engine_with(
            bank(&[Difficulty::Easy]),
            MemoryProgressStore::new(),
            sound.clone(),
        );
        engine.start_session();
        engine.submit_answer(correct_answer(&engine));
        engine.tick(Duration::from_secs(2));

        assert_eq!(engine.phase(), Phase::Result);
        assert_eq!(sound.count(cues::FANFARE[0]), 2);
        assert_eq!(engine.pending_tasks(), 2);

        engine.tick(Duration::from_millis(200));
        assert_eq!(sound.count(cues::FANFARE[1]), 2);
        engine.return_to_menu();
        engine.tick(Duration::from_secs(1));
        assert_eq!(sound.count(cues::FANFARE[2]), 0);
    }

    #[test]
    fn test_loss_plays_defeat() {
        let sound = RecordingEmitter::new();
        let mut engine = engine_with(
            bank(&[Difficulty::Easy]),
            MemoryProgressStore::new(),
            sound.clone(),
        );
        engine.start_session();
        engine.submit_answer(wrong_answer(&engine));
        engine.tick(Duration::from_secs(2));

        assert_eq!(engine.summary().unwrap().verdict(), Verdict::Loss);
        assert_eq!(sound.count(cues::DEFEAT), 1);
        assert_eq!(engine.mood(), BuddyMood::Happy);
    }

    #[test]
    fn test_session_end_persists_progress() {
        let store = MemoryProgressStore::new();
        let mut engine = engine_with(
            bank(&[Difficulty::Easy]),
            store.clone(),
            RecordingEmitter::new(),
        );
        engine.start_session();
        engine.submit_answer(correct_answer(&engine));
        engine.tick(Duration::from_secs(2));

        let saved = store.load().unwrap().unwrap();
        assert_eq!(saved.games_played, 1);
        assert_eq!(saved.wins, 1);
        assert!(saved.is_unlocked(RewardId::FirstWin));
        assert_eq!(store.top_sessions(5).unwrap().len(), 1);
    }

    #[test]
    fn test_offline_store_does_not_interrupt_play() {
        let mut engine = engine_with(
            bank(&[Difficulty::Easy; 5]),
            MemoryProgressStore::offline(),
            RecordingEmitter::new(),
        );
        engine.start_session();
        engine.tick(Duration::from_secs(5 * 17));

        assert_eq!(engine.phase(), Phase::Result);
        assert_eq!(engine.progress().games_played, 1);
        assert!(engine.return_to_menu());
        assert!(engine.go_to_leaderboard());
        assert!(engine.leaderboard().is_empty());
    }

    #[test]
    fn test_loads_stored_progress() {
        let store = MemoryProgressStore::with_raw(
            r#"{"bestStreak":2,"totalGamesPlayed":4,"wins":1,"rewards":[true,false,false,false,false]}"#,
        );
        let engine = engine_with(bank(&[Difficulty::Easy]), store, RecordingEmitter::new());

        assert_eq!(engine.progress().games_played, 4);
        assert_eq!(engine.progress().best_streak, 2);
        assert!(engine.progress().is_unlocked(RewardId::FirstWin));
    }

    #[test]
    fn test_snapshot_while_playing() {
        let mut engine = engine(bank(&[Difficulty::Hard; 5]));
        engine.start_session();
        engine.tick(Duration::from_secs(10));

        let snap = engine.snapshot();
        assert_eq!(snap.phase, Phase::Playing);
        assert_eq!(snap.question_number, 1);
        assert_eq!(snap.total_questions, 5);
        assert!(snap.question.is_some());
        assert_eq!(snap.time_remaining, 5);
        assert!(snap.low_time());
        assert!((snap.time_fraction() - 5.0 / 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_is_clamped() {
        let engine = QuizEngine::with_rng(
            bank(&[Difficulty::Easy]),
            SessionConfig {
                round_secs: 0,
                questions_per_session: 0,
                reveal_delay: Duration::ZERO,
            },
            StdRng::seed_from_u64(0),
            Box::new(MemoryProgressStore::new()),
            Box::new(RecordingEmitter::new()),
        );
        assert_eq!(engine.config().round_secs, 1);
        assert_eq!(engine.config().questions_per_session, 1);
    }
}
