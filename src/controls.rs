use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::Rng;

use crate::engine::QuizEngine;
use crate::runtime::{QuizEvent, Step};
use crate::session::Phase;

/// Everything a key press can ask of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Answer(usize),
    Close,
    Leaderboard,
    Menu,
    Quit,
}

/// Map a key press to a command for the phase on screen.
pub fn command_for(phase: Phase, key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match phase {
        Phase::Menu => match key.code {
            KeyCode::Enter | KeyCode::Char('s') => Some(Command::Start),
            KeyCode::Char('l') => Some(Command::Leaderboard),
            KeyCode::Char('q') | KeyCode::Esc => Some(Command::Quit),
            _ => None,
        },
        Phase::Playing => match key.code {
            KeyCode::Char(c @ 'a'..='d') => Some(Command::Answer(c as usize - 'a' as usize)),
            KeyCode::Char(c @ '1'..='4') => Some(Command::Answer(c as usize - '1' as usize)),
            KeyCode::Esc => Some(Command::Close),
            _ => None,
        },
        Phase::Result => match key.code {
            KeyCode::Enter | KeyCode::Char('r') => Some(Command::Start),
            KeyCode::Char('m') | KeyCode::Esc => Some(Command::Menu),
            _ => None,
        },
        Phase::Leaderboard => match key.code {
            KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace => Some(Command::Menu),
            _ => None,
        },
    }
}

/// Apply a command. Returns false when the app should exit.
pub fn apply<R: Rng>(engine: &mut QuizEngine<R>, command: Command) -> bool {
    match command {
        Command::Start => engine.start_session(),
        Command::Answer(index) => {
            engine.submit_answer(index);
        }
        Command::Close => engine.close_session(),
        Command::Leaderboard => {
            engine.go_to_leaderboard();
        }
        Command::Menu => {
            engine.return_to_menu();
        }
        Command::Quit => {
            engine.close_session();
            return false;
        }
    }
    true
}

/// Let time pass, then react to whatever woke the loop up.
/// Returns false when the app should exit.
pub fn drive<R: Rng>(engine: &mut QuizEngine<R>, step: Step) -> bool {
    engine.tick(step.elapsed);
    match step.event {
        QuizEvent::Key(key) => match command_for(engine.phase(), key) {
            Some(command) => apply(engine, command),
            None => true,
        },
        QuizEvent::Resize | QuizEvent::Tick => true,
    }
}
