//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the phone and
//! translates keyboard events into [`Key`] presses for the navigator.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop only redraws after input or after the
//! navigator reports a change. The poll timeout is bounded by the navigator's
//! next deadline so an auto-revert lands on time even when no key is pressed.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::core::config::ResolvedConfig;
use crate::core::navigator::{Effect, Navigator};
use crate::core::screen::Key;
use crate::device::{CommandNarrator, LogNarrator, Narrator, Silent, TerminalBell, Tone, TonePlayer};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Longest the loop sleeps when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of the navigator)
pub struct TuiState {
    pub status_message: String,
    /// Scroll offset of the phone display
    pub screen_scroll: u16,
    /// Last phone key pressed, highlighted on the keypad
    pub last_key: Option<Key>,
    pub dial_code: String,
}

impl TuiState {
    pub fn new(dial_code: String) -> Self {
        Self {
            status_message: String::new(),
            screen_scroll: 0,
            last_key: None,
            dial_code,
        }
    }
}

/// Where navigator effects end up.
pub struct Devices {
    pub tone_player: Box<dyn TonePlayer>,
    pub tone: Tone,
    pub narrator: Box<dyn Narrator>,
}

impl Devices {
    pub fn from_config(config: &ResolvedConfig) -> Self {
        let tone_player: Box<dyn TonePlayer> = if config.tone_enabled {
            Box::new(TerminalBell)
        } else {
            Box::new(Silent)
        };
        let narrator: Box<dyn Narrator> = match config.narration_command.as_deref() {
            Some(command) if config.narration_enabled => {
                match CommandNarrator::from_command_line(command) {
                    Some(narrator) => {
                        let narrator = narrator.with_timeout(config.narration_timeout);
                        info!("Narrating through `{}`", narrator.program());
                        Box::new(narrator)
                    }
                    None => {
                        warn!("Empty narration command; narrating to the log");
                        Box::new(LogNarrator)
                    }
                }
            }
            _ => Box::new(LogNarrator),
        };
        Self {
            tone_player,
            tone: config.tone,
            narrator,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        execute!(stdout(), Hide)?;
        info!("Terminal modes enabled (cursor hidden)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

/// How long to wait for input before the navigator needs attention again.
pub fn poll_timeout(deadline: Option<Instant>, now: Instant) -> Duration {
    deadline
        .map(|due| due.saturating_duration_since(now))
        .map_or(IDLE_POLL, |until| until.min(IDLE_POLL))
}

/// Hand navigator effects to the devices and reflect them in the TUI state.
pub fn apply_effects(effects: Vec<Effect>, tui: &mut TuiState, devices: &Devices) {
    for effect in effects {
        match effect {
            Effect::Opened => tui.status_message = "Connected".to_string(),
            Effect::Closed => {
                tui.status_message = "Call ended".to_string();
                tui.last_key = None;
            }
            Effect::ScreenChanged => tui.screen_scroll = 0,
            Effect::PlayTone => devices.tone_player.play(&devices.tone),
            Effect::Narrate(text) => {
                devices.narrator.narrate(&text);
                tui.status_message = format!("🔊 {text}");
            }
        }
    }
}

/// Route one input event. Returns true when the app should quit.
pub fn handle_event(
    navigator: &mut Navigator,
    tui: &mut TuiState,
    devices: &Devices,
    event: TuiEvent,
    now: Instant,
) -> bool {
    match event {
        TuiEvent::ForceQuit => return true,
        TuiEvent::Resize => {}
        TuiEvent::ScrollUp if navigator.is_open() => {
            tui.screen_scroll = tui.screen_scroll.saturating_sub(1);
        }
        TuiEvent::ScrollDown if navigator.is_open() => {
            // Clamped to the content on the next draw
            tui.screen_scroll = tui.screen_scroll.saturating_add(1);
        }
        _ if navigator.is_open() => {
            if let Some(key) = event.phone_key() {
                debug!("Phone key: {}", key);
                tui.last_key = Some(key);
                let effects = navigator.press_key(key, now);
                apply_effects(effects, tui, devices);
            }
        }
        TuiEvent::InputChar('o') | TuiEvent::Submit => {
            let effects = navigator.open();
            apply_effects(effects, tui, devices);
        }
        TuiEvent::InputChar('q') | TuiEvent::Escape => return true,
        _ => {}
    }
    false
}

pub fn run(config: &ResolvedConfig, navigator: Navigator) -> io::Result<()> {
    let devices = Devices::from_config(config);
    let mut tui = TuiState::new(config.dial_code.clone());

    let mut terminal = ratatui::init();
    let result = match TerminalModeGuard::new() {
        Ok(_guard) => event_loop(&mut terminal, navigator, &mut tui, &devices),
        Err(e) => Err(e),
    };
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    mut navigator: Navigator,
    tui: &mut TuiState,
    devices: &Devices,
) -> io::Result<()> {
    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &navigator, tui))?;
            needs_redraw = false;
        }

        let timeout = poll_timeout(navigator.next_deadline(), Instant::now());
        let first_event = poll_event_timeout(timeout)?;

        // Process first event + drain all pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        let mut next = first_event;
        while let Some(event) = next {
            if handle_event(&mut navigator, tui, devices, event, Instant::now()) {
                should_quit = true;
                break;
            }
            next = poll_event_immediate()?;
        }

        if should_quit {
            info!("Quit requested");
            break;
        }

        let effects = navigator.tick(Instant::now());
        if !effects.is_empty() {
            needs_redraw = true;
            apply_effects(effects, tui, devices);
        }
    }

    // Leave the session cleanly so a pending revert is dropped
    navigator.close();
    Ok(())
}
