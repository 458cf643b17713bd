use crate::question::Difficulty;

/// Points the player earns for a correct answer.
pub fn player_points(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Hard => 3,
        Difficulty::Medium => 2,
        Difficulty::Easy => 1,
    }
}

/// Points Buddy earns when the player misses or runs out of time.
pub fn opponent_points(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Hard => 2,
        Difficulty::Medium | Difficulty::Easy => 1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum AnswerKind {
    Correct,
    Incorrect,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Party {
    Player,
    Buddy,
}

/// How a single question was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub question_index: usize,
    pub kind: AnswerKind,
    pub selected: Option<usize>,
    pub points: u32,
    pub awarded_to: Party,
}

impl Resolution {
    pub fn is_correct(&self) -> bool {
        self.kind == AnswerKind::Correct
    }
}

/// Per-session scores and streaks. Scores only ever go up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub player_score: u32,
    pub opponent_score: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub resolved: usize,
}

impl Scoreboard {
    pub fn record(
        &mut self,
        question_index: usize,
        difficulty: Difficulty,
        kind: AnswerKind,
        selected: Option<usize>,
    ) -> Resolution {
        self.resolved += 1;

        let (points, awarded_to) = if kind == AnswerKind::Correct {
            let points = player_points(difficulty);
            self.player_score += points;
            self.current_streak += 1;
            self.best_streak = self.best_streak.max(self.current_streak);
            (points, Party::Player)
        } else {
            let points = opponent_points(difficulty);
            self.opponent_score += points;
            self.current_streak = 0;
            (points, Party::Buddy)
        };

        Resolution {
            question_index,
            kind,
            selected,
            points,
            awarded_to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_tables() {
        assert_eq!(player_points(Difficulty::Easy), 1);
        assert_eq!(player_points(Difficulty::Medium), 2);
        assert_eq!(player_points(Difficulty::Hard), 3);

        assert_eq!(opponent_points(Difficulty::Easy), 1);
        assert_eq!(opponent_points(Difficulty::Medium), 1);
        assert_eq!(opponent_points(Difficulty::Hard), 2);
    }

    #[test]
    fn test_correct_answer_scores_for_player() {
        let mut board = Scoreboard::default();
        let r = board.record(0, Difficulty::Hard, AnswerKind::Correct, Some(2));

        assert_eq!(r.points, 3);
        assert_eq!(r.awarded_to, Party::Player);
        assert!(r.is_correct());
        assert_eq!(board.player_score, 3);
        assert_eq!(board.opponent_score, 0);
        assert_eq!(board.current_streak, 1);
    }

    #[test]
    fn test_timeout_scores_for_buddy() {
        let mut board = Scoreboard::default();
        let r = board.record(0, Difficulty::Hard, AnswerKind::Timeout, None);

        assert_eq!(r.points, 2);
        assert_eq!(r.awarded_to, Party::Buddy);
        assert_eq!(r.selected, None);
        assert_eq!(board.opponent_score, 2);
    }

    #[test]
    fn test_streak_resets_but_best_is_kept() {
        let mut board = Scoreboard::default();
        for i in 0..3 {
            board.record(i, Difficulty::Easy, AnswerKind::Correct, Some(0));
        }
        board.record(3, Difficulty::Easy, AnswerKind::Incorrect, Some(1));
        board.record(4, Difficulty::Easy, AnswerKind::Correct, Some(0));

        assert_eq!(board.current_streak, 1);
        assert_eq!(board.best_streak, 3);
        assert_eq!(board.resolved, 5);
        assert_eq!(board.player_score, 4);
        assert_eq!(board.opponent_score, 1);
    }
}
