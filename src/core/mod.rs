//! # Core Application Logic
//!
//! This module contains the menu state machine and everything it runs on.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Menu (screen table)  │
//!                    │  • Navigator (state)    │
//!                    │  • Effect (requests)    │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effects
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │   Tone     │      │  Narrator  │
//!     │  Adapter   │      │  (bell)    │      │  (TTS/log) │
//!     │ (ratatui)  │      │            │      │            │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`screen`]: Screen, destination and key types
//! - [`menu`]: Menu definitions and their validation
//! - [`builtin`]: The SafeVoice USSD menu
//! - [`template`]: Placeholders in action responses
//! - [`places`]: Help-location directory and position query
//! - [`timer`]: The cancellable auto-revert timer
//! - [`navigator`]: The state machine itself
//! - [`config`]: Settings and their override hierarchy

pub mod builtin;
pub mod config;
pub mod menu;
pub mod navigator;
pub mod places;
pub mod screen;
pub mod template;
pub mod timer;

// Re-export commonly used types for convenience
pub use navigator::{Effect, NavigationState, Navigator};
pub use screen::{Key, Screen, ScreenId};
