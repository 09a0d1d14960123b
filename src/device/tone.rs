//! Key-press tone cues.

use std::io::{Write, stdout};

use log::{debug, warn};

/// A short beep. Frequency and duration are cosmetic; a terminal bell can
/// honour neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u64,
}

impl Default for Tone {
    fn default() -> Self {
        Self {
            frequency_hz: 400,
            duration_ms: 100,
        }
    }
}

pub trait TonePlayer: Send {
    fn play(&self, tone: &Tone);
}

/// Rings the terminal bell (`BEL`).
pub struct TerminalBell;

impl TonePlayer for TerminalBell {
    fn play(&self, tone: &Tone) {
        debug!("Tone {}Hz for {}ms", tone.frequency_hz, tone.duration_ms);
        let mut out = stdout();
        if let Err(e) = out.write_all(b"\x07").and_then(|()| out.flush()) {
            warn!("Failed to ring terminal bell: {}", e);
        }
    }
}

/// Plays nothing (muted).
pub struct Silent;

impl TonePlayer for Silent {
    fn play(&self, _tone: &Tone) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tone() {
        let tone = Tone::default();
        assert_eq!(tone.frequency_hz, 400);
        assert_eq!(tone.duration_ms, 100);
    }
}
