pub mod leaderboard;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use crate::engine::Snapshot;
use crate::progress::CumulativeProgress;
use crate::question::{Difficulty, Question};
use crate::rewards::{RewardId, Verdict};
use crate::scoring::AnswerKind;
use crate::session::{BuddyMood, Phase};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Label shown in front of each option, matching the answer keys.
pub fn option_label(index: usize) -> char {
    (b'A' + index as u8) as char
}

pub fn buddy_face(mood: BuddyMood) -> &'static str {
    match mood {
        BuddyMood::Idle => "(•‿•)",
        BuddyMood::Thinking => "(•_•)?",
        BuddyMood::Happy => "(^‿^)",
        BuddyMood::Sad => "(╥_╥)",
    }
}

fn difficulty_style(difficulty: Difficulty) -> Style {
    let color = match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

impl Widget for &Snapshot {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.phase {
            Phase::Menu => render_menu(self, area, buf),
            Phase::Playing => render_playing(self, area, buf),
            Phase::Result => render_result(self, area, buf),
            Phase::Leaderboard => leaderboard::render_leaderboard(self, area, buf),
        }
    }
}

fn render_menu(snap: &Snapshot, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Length(2), // buddy
            Constraint::Length(2), // stats
            Constraint::Min(RewardId::ALL.len() as u16 + 2),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(vec![
        Line::from(Span::styled(
            "Chemistry Quiz Battle",
            bold_style.fg(Color::Cyan),
        )),
        Line::from(Span::styled("beat Buddy before the clock runs out", dim_style)),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(format!("Buddy {}", buddy_face(snap.mood)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let progress = &snap.progress;
    Paragraph::new(Span::styled(
        format!(
            "games {}   wins {}   best streak {}",
            progress.games_played, progress.wins, progress.best_streak
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(reward_lines(progress, false))
        .block(Block::default().borders(Borders::ALL).title("Rewards"))
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(enter) start   (l) leaderboard   (q) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}

/// One line per reward; locked ones show their description only when `describe_locked`.
pub(crate) fn reward_lines(
    progress: &CumulativeProgress,
    describe_locked: bool,
) -> Vec<Line<'static>> {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    RewardId::ALL
        .iter()
        .map(|reward| {
            let unlocked = progress.is_unlocked(*reward);
            let mut spans = if unlocked {
                vec![Span::styled(format!("★ {reward}"), bold_style.fg(Color::Yellow))]
            } else {
                vec![Span::styled(format!("☆ {reward}"), dim_style)]
            };
            if unlocked || describe_locked {
                spans.push(Span::styled(format!("  {}", reward.description()), dim_style));
            }
            Line::from(spans)
        })
        .collect()
}

fn render_playing(snap: &Snapshot, area: Rect, buf: &mut Buffer) {
    let Some(question) = snap.question.as_ref() else {
        return;
    };
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // scores
            Constraint::Length(1), // timer
            Constraint::Length(1),
            Constraint::Min(3), // question
            Constraint::Length(question.options.len() as u16 + 1),
            Constraint::Length(1), // feedback
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Line::from(vec![
        Span::styled(format!("You {}", snap.player_score), bold_style.fg(Color::Green)),
        Span::raw("   vs   "),
        Span::styled(
            format!("Buddy {} {}", snap.opponent_score, buddy_face(snap.mood)),
            bold_style.fg(Color::Magenta),
        ),
        Span::raw(format!("   streak {}", snap.current_streak)),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let gauge_color = if snap.low_time() {
        Color::Red
    } else {
        Color::Cyan
    };
    Gauge::default()
        .gauge_style(Style::default().fg(gauge_color))
        .ratio(snap.time_fraction().clamp(0.0, 1.0))
        .label(format!("{}s", snap.time_remaining))
        .render(chunks[1], buf);

    Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("Question {}/{}  ", snap.question_number, snap.total_questions),
                Style::default().add_modifier(Modifier::DIM),
            ),
            Span::styled(question.difficulty.to_string(), difficulty_style(question.difficulty)),
            Span::styled(
                format!("  {}", question.topic),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(question.text.clone(), bold_style)),
    ])
    .wrap(Wrap { trim: true })
    .render(chunks[3], buf);

    Paragraph::new(option_lines(snap, question)).render(chunks[4], buf);

    if let Some(feedback) = feedback_line(snap, question) {
        Paragraph::new(feedback)
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }

    Paragraph::new(Span::styled(
        "(a-d) answer   (esc) back to menu",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[6], buf);
}

fn option_lines<'a>(snap: &Snapshot, question: &'a Question) -> Vec<Line<'a>> {
    question
        .options
        .iter()
        .enumerate()
        .map(|(idx, option)| {
            let mut style = Style::default();
            if snap.revealed {
                if idx == question.correct_index {
                    style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
                } else if snap.selected_answer == Some(idx) {
                    style = style.fg(Color::Red).add_modifier(Modifier::CROSSED_OUT);
                } else {
                    style = style.add_modifier(Modifier::DIM);
                }
            }
            Line::from(vec![
                Span::styled(format!("  {}) ", option_label(idx)), Style::default()),
                Span::styled(option.as_str(), style),
            ])
        })
        .collect()
}

fn feedback_line(snap: &Snapshot, question: &Question) -> Option<Line<'static>> {
    if !snap.revealed {
        return None;
    }
    let resolution = snap.last_resolution?;
    let line = match resolution.kind {
        AnswerKind::Correct => Line::from(Span::styled(
            format!("Correct! +{}", resolution.points),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        AnswerKind::Incorrect => Line::from(Span::styled(
            format!(
                "Wrong, it was {}. Buddy +{}",
                question.correct_option(),
                resolution.points
            ),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        AnswerKind::Timeout => Line::from(Span::styled(
            format!("Time's up! Buddy +{}", resolution.points),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    };
    Some(line)
}

fn verdict_text(verdict: Verdict) -> (&'static str, Color) {
    match verdict {
        Verdict::Win => ("You beat Buddy!", Color::Green),
        Verdict::Loss => ("Buddy wins this one", Color::Red),
        Verdict::Tie => ("It's a tie", Color::Yellow),
    }
}

fn render_result(snap: &Snapshot, area: Rect, buf: &mut Buffer) {
    let Some(summary) = snap.summary.as_ref() else {
        return;
    };
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let outcome = &summary.outcome;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // verdict
            Constraint::Length(2), // score
            Constraint::Length(2), // streak + totals
            Constraint::Min(1),    // new rewards
            Constraint::Length(1), // legend
        ])
        .split(area);

    let (text, color) = verdict_text(summary.verdict());
    Paragraph::new(Line::from(vec![
        Span::styled(text, bold_style.fg(color)),
        Span::raw(format!("  {}", buddy_face(snap.mood))),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        format!(
            "You {}  -  {} Buddy",
            outcome.player_score, outcome.opponent_score
        ),
        bold_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!(
            "best streak {}   games {}   wins {}",
            outcome.best_streak, snap.progress.games_played, snap.progress.wins
        ),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    let rewards: Vec<Line> = summary
        .new_rewards
        .iter()
        .map(|reward| {
            Line::from(vec![
                Span::styled(format!("New reward: {reward}"), bold_style.fg(Color::Yellow)),
                Span::raw(format!("  {}", reward.description())),
            ])
        })
        .collect();
    Paragraph::new(rewards)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(enter) play again   (m) menu",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);
}
