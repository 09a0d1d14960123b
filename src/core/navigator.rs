//! # Menu Navigator
//!
//! The state machine behind the basic-phone simulator. It owns the
//! navigation state and is the only thing that changes it.
//!
//! ```text
//!            open()                      press_key(k)
//!   Closed ─────────► Open(main, [])  ─────────────────► Open(screen, history)
//!     ▲                                                        │
//!     └──────────────── close() / END / exit entry ────────────┘
//! ```
//!
//! Keypad keys follow the current screen's option table. A screen entry
//! pushes the current screen onto the history; an action entry pushes it
//! too, shows a transient response screen and schedules a revert; BACK pops.
//!
//! The navigator does no I/O. Every call returns a list of [`Effect`]s (play
//! a tone, narrate a line, redraw) for the caller to carry out, and time is
//! passed in as an [`Instant`] so tests can drive the revert timer with
//! simulated time.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use chrono::Local;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::core::menu::Menu;
use crate::core::places::{DEFAULT_POSITION, FixedLocation, LocationProvider, PlaceDirectory};
use crate::core::screen::{ActionId, Destination, Key, Screen, ScreenId};
use crate::core::template::RenderContext;
use crate::core::timer::RevertTimer;

/// How long an action response stays up before the navigator returns.
pub const DEFAULT_REVERT_DELAY: Duration = Duration::from_millis(3000);

/// Case numbers are drawn below this bound.
const CASE_ID_BOUND: u32 = 100_000;

/// Where the caller is in the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub current: ScreenId,
    /// Ancestors of `current`, oldest first. Never contains `current`.
    pub history: Vec<ScreenId>,
    /// The keypad key that led to the current screen.
    pub input: String,
}

impl NavigationState {
    fn at(root: &ScreenId) -> Self {
        Self {
            current: root.clone(),
            history: Vec::new(),
            input: String::new(),
        }
    }
}

/// Side effects requested by the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The phone surface became visible.
    Opened,
    /// The phone surface was hidden.
    Closed,
    /// The screen on display changed.
    ScreenChanged,
    /// Key-press tone cue.
    PlayTone,
    /// Speak an announcement.
    Narrate(String),
}

pub struct Navigator {
    menu: Menu,
    places: PlaceDirectory,
    location: Box<dyn LocationProvider>,
    rng: StdRng,
    state: NavigationState,
    /// Response screen of the last action, while it is on display.
    transient: Option<Screen>,
    timer: RevertTimer,
    revert_delay: Duration,
    visible: bool,
    session_id: Option<Uuid>,
}

impl Navigator {
    pub fn new(menu: Menu) -> Self {
        let state = NavigationState::at(menu.root());
        Self {
            menu,
            places: PlaceDirectory::builtin(),
            location: Box::new(FixedLocation::default()),
            rng: StdRng::from_entropy(),
            state,
            transient: None,
            timer: RevertTimer::new(),
            revert_delay: DEFAULT_REVERT_DELAY,
            visible: false,
            session_id: None,
        }
    }

    pub fn with_revert_delay(mut self, delay: Duration) -> Self {
        self.revert_delay = delay;
        self
    }

    pub fn with_location(mut self, location: Box<dyn LocationProvider>) -> Self {
        self.location = location;
        self
    }

    pub fn with_places(mut self, places: PlaceDirectory) -> Self {
        self.places = places;
        self
    }

    /// Seed the case-number generator (for reproducible output).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Id of the current phone session; `None` while closed.
    pub fn session_id(&self) -> Option<Uuid> {
        self.session_id
    }

    /// The screen on display.
    pub fn current_screen(&self) -> &Screen {
        self.resolve(&self.state.current)
            .unwrap_or_else(|| self.root_screen())
    }

    /// When the pending auto-revert is due, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    fn resolve(&self, id: &ScreenId) -> Option<&Screen> {
        match &self.transient {
            Some(screen) if &screen.id == id => Some(screen),
            _ => self.menu.screen(id),
        }
    }

    fn root_screen(&self) -> &Screen {
        let root = self.menu.root();
        match self.menu.screen(root) {
            Some(screen) => screen,
            // Menu::compile rejects menus without a root screen
            None => unreachable!("compiled menu is missing root screen '{root}'"),
        }
    }

    // ------------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------------

    /// Show the phone at the root screen with an empty history.
    pub fn open(&mut self) -> Vec<Effect> {
        self.timer.cancel();
        self.transient = None;
        self.state = NavigationState::at(self.menu.root());
        self.visible = true;
        let session = Uuid::new_v4();
        self.session_id = Some(session);
        info!("USSD session {session} opened at '{}'", self.state.current);
        vec![Effect::Opened, Effect::ScreenChanged]
    }

    /// Hide the phone and forget the session. Safe to call repeatedly.
    pub fn close(&mut self) -> Vec<Effect> {
        if self.timer.cancel() {
            debug!("Cancelled pending auto-revert on close");
        }
        self.transient = None;
        self.state = NavigationState::at(self.menu.root());
        let was_visible = std::mem::replace(&mut self.visible, false);
        match self.session_id.take() {
            Some(session) if was_visible => {
                info!("USSD session {session} closed");
                vec![Effect::Closed]
            }
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Handle one key. Ignored while the phone is closed.
    pub fn press_key(&mut self, key: Key, now: Instant) -> Vec<Effect> {
        if !self.visible {
            debug!("Ignoring key '{key}' while closed");
            return Vec::new();
        }

        let mut effects = vec![Effect::PlayTone];
        match key {
            Key::End => effects.extend(self.close()),
            Key::Back => {
                self.timer.cancel();
                self.return_to_previous();
                effects.push(Effect::ScreenChanged);
            }
            Key::Call => {
                let call = self
                    .menu
                    .emergency()
                    .filter(|(screen, _)| **screen == self.state.current)
                    .map(|(_, action)| action.clone());
                match call {
                    Some(action) => effects.extend(self.dispatch(&action, "call", now)),
                    None => debug!("CALL ignored on '{}'", self.state.current),
                }
            }
            Key::Keypad(c) => {
                let destination = self.current_screen().destination(c).cloned();
                match destination {
                    None => debug!("Key '{c}' unmapped on '{}'", self.state.current),
                    Some(Destination::Exit) => effects.extend(self.close()),
                    Some(Destination::Screen(target)) => {
                        if self.forward(target, c) {
                            effects.push(Effect::ScreenChanged);
                        }
                    }
                    Some(Destination::Action(action)) => {
                        effects.extend(self.dispatch(&action, &c.to_string(), now));
                    }
                }
            }
        }
        effects
    }

    /// Fire the auto-revert if it is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let Some(revert) = self.timer.take_due(now) else {
            return Vec::new();
        };
        if !self.timer.is_current(&revert) || revert.screen != self.state.current {
            debug!(
                "Stale auto-revert for '{}' ignored (now on '{}')",
                revert.screen, self.state.current
            );
            return Vec::new();
        }
        debug!("Auto-revert from '{}'", revert.screen);
        self.return_to_previous();
        vec![Effect::ScreenChanged]
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    fn forward(&mut self, target: ScreenId, key: char) -> bool {
        if self.menu.screen(&target).is_none() {
            warn!("Refusing to navigate to unknown screen '{target}'");
            return false;
        }
        self.timer.cancel();
        self.transient = None;
        let previous = std::mem::replace(&mut self.state.current, target);
        debug!("'{previous}' -[{key}]-> '{}'", self.state.current);
        // A cyclic menu can lead back to an ancestor (or the screen itself);
        // unwind instead of stacking it twice
        match self.state.history.iter().position(|id| *id == self.state.current) {
            Some(index) => self.state.history.truncate(index),
            None if previous != self.state.current => self.state.history.push(previous),
            None => {}
        }
        self.state.input = key.to_string();
        true
    }

    /// Pop the history, landing on the root when it is empty.
    fn return_to_previous(&mut self) {
        let previous = self
            .state
            .history
            .pop()
            .unwrap_or_else(|| self.menu.root().clone());
        debug!("'{}' <- '{previous}'", self.state.current);
        self.state.current = previous;
        self.state.input.clear();
        self.transient = None;
    }

    /// Show the action's response on a transient screen and schedule the
    /// return to the screen that fired it.
    fn dispatch(&mut self, action: &ActionId, input: &str, now: Instant) -> Vec<Effect> {
        let Some(template) = self.menu.action(action) else {
            warn!("No response defined for action '{action}'");
            return Vec::new();
        };

        let case_id = format!("SV{}", self.rng.gen_range(0..CASE_ID_BOUND));
        let position = self.location.current_position().unwrap_or(DEFAULT_POSITION);
        let ctx = RenderContext {
            now: Local::now(),
            case_id: &case_id,
            position,
            places: &self.places,
        };
        let screen = Screen {
            id: ScreenId::transient_for(action),
            title: template.title.clone(),
            lines: template.lines.iter().map(|line| line.render(&ctx)).collect(),
            options: BTreeMap::new(),
            action_required: false,
        };
        let narration = template.narration.clone();

        let due = now + self.revert_delay;
        self.timer.schedule(screen.id.clone(), due);
        let previous = std::mem::replace(&mut self.state.current, screen.id.clone());
        self.state.history.push(previous);
        self.state.input = input.to_string();
        self.transient = Some(screen);

        info!(
            "Action '{action}' dispatched (case {case_id}), reverting in {}ms",
            self.revert_delay.as_millis()
        );

        let mut effects = vec![Effect::ScreenChanged];
        if let Some(text) = narration {
            effects.push(Effect::Narrate(text));
        }
        effects
    }
}
