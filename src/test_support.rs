//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use crate::core::builtin::builtin_menu;
use crate::core::navigator::Navigator;
use crate::core::screen::ScreenId;
use crate::device::{Narrator, Tone, TonePlayer};

/// A fixed starting instant so simulated times line up within a test.
pub fn epoch() -> Instant {
    static EPOCH: OnceLock<Instant> = OnceLock::new();
    *EPOCH.get_or_init(Instant::now)
}

/// Navigator over the built-in menu with a fixed case-number seed.
pub fn builtin_navigator() -> Navigator {
    let menu = builtin_menu().compile().expect("built-in menu compiles");
    Navigator::new(menu).with_seed(42)
}

pub fn ids(names: &[&str]) -> Vec<ScreenId> {
    names.iter().map(|n| ScreenId::new(*n)).collect()
}

/// Narrator that remembers what it was asked to say.
#[derive(Clone, Default)]
pub struct RecordingNarrator {
    pub spoken: Arc<Mutex<Vec<String>>>,
}

impl Narrator for RecordingNarrator {
    fn narrate(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

/// Tone player that counts beeps.
#[derive(Clone, Default)]
pub struct RecordingTone {
    pub played: Arc<Mutex<Vec<Tone>>>,
}

impl TonePlayer for RecordingTone {
    fn play(&self, tone: &Tone) {
        self.played.lock().unwrap().push(*tone);
    }
}
