//! Keyboard input mapping
//!
//! Arrow keys (and WASD in the terminal) become player moves. Anything that
//! does not map is dropped here and never reaches the simulation.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::Direction;

/// Upper bound on events drained per frame
const MAX_EVENTS_PER_FRAME: usize = 32;

/// A front-end command produced from one input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Pause,
    Restart,
    Quit,
    Resize(u16, u16),
}

/// Map a browser-style key code (37-40) to a direction
pub fn direction_from_key_code(code: u32) -> Option<Direction> {
    match code {
        37 => Some(Direction::Left),
        38 => Some(Direction::Up),
        39 => Some(Direction::Right),
        40 => Some(Direction::Down),
        _ => None,
    }
}

/// Map a terminal key to a direction
pub fn direction_from_key(key: KeyCode) -> Option<Direction> {
    match key {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        _ => None,
    }
}

/// Map a key press to a command
pub fn map_key_event(ev: KeyEvent) -> Option<Command> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }
    if ev.modifiers.contains(KeyModifiers::CONTROL) && ev.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        code => direction_from_key(code).map(Command::Move),
    }
}

/// Drain pending terminal events without blocking
pub fn poll_commands() -> io::Result<Vec<Command>> {
    let mut out = Vec::new();
    while event::poll(Duration::from_millis(0))? {
        let command = match event::read()? {
            Event::Key(k) => map_key_event(k),
            Event::Resize(w, h) => Some(Command::Resize(w, h)),
            _ => None,
        };
        out.extend(command);
        if out.len() >= MAX_EVENTS_PER_FRAME {
            break;
        }
    }
    Ok(out)
}
