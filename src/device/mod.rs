//! # Device Capabilities
//!
//! Fire-and-forget outputs of the simulated phone: the key-press tone and the
//! spoken announcements. The navigator only asks for them through
//! [`crate::core::navigator::Effect`]s; these are the implementations the
//! front end hands the effects to.
//!
//! Implementations never report failure to the caller. A missing speaker or
//! TTS program is logged and otherwise ignored.

pub mod narrator;
pub mod tone;

pub use narrator::{CommandNarrator, LogNarrator, Narrator};
pub use tone::{Silent, TerminalBell, Tone, TonePlayer};
