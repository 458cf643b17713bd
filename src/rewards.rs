use crate::progress::CumulativeProgress;

/// One-way unlockable achievements, in their persisted order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum_macros::Display,
)]
pub enum RewardId {
    #[strum(serialize = "First Win")]
    FirstWin,
    #[strum(serialize = "3-Streak")]
    ThreeStreak,
    #[strum(serialize = "Perfect Score")]
    PerfectScore,
    #[strum(serialize = "Chemistry Pro")]
    ChemistryPro,
    #[strum(serialize = "5 Games")]
    FiveGames,
}

pub const STREAK_TARGET: u32 = 3;
pub const PRO_WINS: u32 = 3;
pub const GAMES_TARGET: u32 = 5;

impl RewardId {
    pub const ALL: [RewardId; 5] = [
        RewardId::FirstWin,
        RewardId::ThreeStreak,
        RewardId::PerfectScore,
        RewardId::ChemistryPro,
        RewardId::FiveGames,
    ];

    /// Position in the persisted reward flags.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn description(self) -> &'static str {
        match self {
            RewardId::FirstWin => "Win your first quiz battle",
            RewardId::ThreeStreak => "Get 3 correct answers in a row",
            RewardId::PerfectScore => "Win without Buddy scoring",
            RewardId::ChemistryPro => "Win 3 quiz battles",
            RewardId::FiveGames => "Play 5 quiz games",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Verdict {
    Win,
    Loss,
    Tie,
}

/// Final numbers of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOutcome {
    pub player_score: u32,
    pub opponent_score: u32,
    pub best_streak: u32,
    pub questions_played: usize,
}

impl SessionOutcome {
    pub fn won(&self) -> bool {
        self.player_score > self.opponent_score
    }

    pub fn verdict(&self) -> Verdict {
        match self.player_score.cmp(&self.opponent_score) {
            std::cmp::Ordering::Greater => Verdict::Win,
            std::cmp::Ordering::Less => Verdict::Loss,
            std::cmp::Ordering::Equal => Verdict::Tie,
        }
    }
}

fn earned(reward: RewardId, outcome: &SessionOutcome, progress: &CumulativeProgress) -> bool {
    match reward {
        RewardId::FirstWin => outcome.won(),
        RewardId::ThreeStreak => outcome.best_streak >= STREAK_TARGET,
        RewardId::PerfectScore => outcome.opponent_score == 0 && outcome.questions_played > 0,
        RewardId::ChemistryPro => progress.wins >= PRO_WINS,
        RewardId::FiveGames => progress.games_played >= GAMES_TARGET,
    }
}

/// Rewards newly earned by `outcome`.
///
/// `progress` must already include this session's game and win. Rewards
/// that are unlocked are never reported again.
pub fn evaluate(outcome: &SessionOutcome, progress: &CumulativeProgress) -> Vec<RewardId> {
    RewardId::ALL
        .into_iter()
        .filter(|r| !progress.is_unlocked(*r))
        .filter(|r| earned(*r, outcome, progress))
        .collect()
}
