use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::core::screen::Key;

/// TUI-specific input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TuiEvent {
    ForceQuit, // Ctrl+C, regardless of mode
    InputChar(char),
    Submit,
    Backspace,
    Escape,
    ScrollUp,
    ScrollDown,
    Resize,
}

impl TuiEvent {
    /// The phone key this event stands for while the phone is open.
    ///
    /// Keypad characters map to themselves; Enter / `c` is CALL,
    /// Backspace / `b` is BACK and Esc / `e` is END.
    pub fn phone_key(&self) -> Option<Key> {
        match self {
            TuiEvent::InputChar('c') | TuiEvent::Submit => Some(Key::Call),
            TuiEvent::InputChar('b') | TuiEvent::Backspace => Some(Key::Back),
            TuiEvent::InputChar('e') | TuiEvent::Escape => Some(Key::End),
            TuiEvent::InputChar(c) => Key::keypad(*c),
            _ => None,
        }
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`
pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    let event = match event::read()? {
        // Some platforms report presses and releases; only presses count
        Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            log::debug!(
                "Key event: {:?} with modifiers {:?}",
                key_event.code,
                key_event.modifiers
            );
            match (key_event.modifiers, key_event.code) {
                (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
                (_, KeyCode::Char(c)) => Some(TuiEvent::InputChar(c)),
                (_, KeyCode::Enter) => Some(TuiEvent::Submit),
                (_, KeyCode::Backspace) => Some(TuiEvent::Backspace),
                (_, KeyCode::Esc) => Some(TuiEvent::Escape),
                (_, KeyCode::Up) => Some(TuiEvent::ScrollUp),
                (_, KeyCode::Down) => Some(TuiEvent::ScrollDown),
                _ => None,
            }
        }
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    };
    Ok(event)
}
