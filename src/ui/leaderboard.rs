use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::engine::Snapshot;
use crate::progress::SessionRecord;
use crate::rewards::{RewardId, Verdict};
use crate::ui::reward_lines;

/// Pure presenter for a single leaderboard row
pub fn present_row(rank: usize, record: &SessionRecord) -> Row<'static> {
    let verdict_color = match record.verdict() {
        Verdict::Win => Color::Green,
        Verdict::Loss => Color::Red,
        Verdict::Tie => Color::Yellow,
    };

    Row::new(vec![
        Cell::from(format!("#{rank}")).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(format!(
            "{} - {}",
            record.player_score, record.opponent_score
        )),
        Cell::from(record.verdict().to_string()).style(Style::default().fg(verdict_color)),
        Cell::from(record.best_streak.to_string()),
        Cell::from(record.questions.to_string()),
        Cell::from(record.played_at.format("%Y-%m-%d %H:%M").to_string()),
    ])
}

pub fn render_leaderboard(snap: &Snapshot, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Table
            Constraint::Length(RewardId::ALL.len() as u16 + 2),
            Constraint::Length(1), // Instructions
        ])
        .split(area);

    Paragraph::new("Best sessions against Buddy")
        .block(Block::default().borders(Borders::ALL).title("Leaderboard"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if snap.leaderboard.is_empty() {
        Paragraph::new("No sessions yet. Finish a game to get on the board.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .render(chunks[1], buf);
    } else {
        let header = Row::new(vec![
            Cell::from("Rank"),
            Cell::from("You - Buddy"),
            Cell::from("Result"),
            Cell::from("Streak"),
            Cell::from("Questions"),
            Cell::from("Played"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = snap
            .leaderboard
            .iter()
            .enumerate()
            .map(|(idx, record)| present_row(idx + 1, record))
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Min(16),
        ];

        Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Top 10"))
            .column_spacing(2)
            .render(chunks[1], buf);
    }

    Paragraph::new(reward_lines(&snap.progress, true))
        .block(Block::default().borders(Borders::ALL).title("Rewards"))
        .render(chunks[2], buf);

    Paragraph::new("(b/esc) back")
        .alignment(Alignment::Center)
        .render(chunks[3], buf);
}
