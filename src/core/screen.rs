//! # Screens
//!
//! The vocabulary of the menu state machine: screen and action identifiers,
//! the destination a keypad key leads to, the screen record itself, and the
//! input keys a phone can send.
//!
//! ```text
//! Screen "report"
//! ├── title: "📝 REPORT INCIDENT"
//! ├── lines: ["====", "1. Harassment", ...]
//! └── options
//!     ├── '1' → Action("reportHarassment")
//!     ├── '2' → Action("reportAssault")
//!     └── ...
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix reserved for screens synthesized at dispatch time.
/// Static screen ids may not start with it, so transient ids never collide.
pub const TRANSIENT_PREFIX: &str = "temp:";

/// Identifier of a screen in the menu (static or transient).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(String);

impl ScreenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The transient screen id an action's response is shown under.
    pub fn transient_for(action: &ActionId) -> Self {
        Self(format!("{TRANSIENT_PREFIX}{}", action.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_transient(&self) -> bool {
        self.0.starts_with(TRANSIENT_PREFIX)
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScreenId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Identifier of a terminal action (e.g. `call911`, `reportHarassment`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Where a keypad key leads. Every mapping entry says explicitly what it is,
/// so nothing is inferred from how an identifier is spelled.
///
/// In TOML: `{ screen = "report" }`, `{ action = "call911" }` or `"exit"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Screen(ScreenId),
    Action(ActionId),
    Exit,
}

/// An immutable menu screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub id: ScreenId,
    pub title: String,
    pub lines: Vec<String>,
    pub options: BTreeMap<char, Destination>,
    /// The screen expects a committed action (e.g. the SOS menu) rather than
    /// free browsing.
    pub action_required: bool,
}

impl Screen {
    pub fn destination(&self, key: char) -> Option<&Destination> {
        self.options.get(&key)
    }

    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

/// Keypad characters a phone can send.
pub const KEYPAD: [char; 12] = ['1', '2', '3', '4', '5', '6', '7', '8', '9', '*', '0', '#'];

/// A single input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// One of `0`–`9`, `*`, `#`.
    Keypad(char),
    Call,
    End,
    Back,
}

impl Key {
    /// Keypad key for `c`, or `None` if `c` is not on a phone keypad.
    pub fn keypad(c: char) -> Option<Self> {
        KEYPAD.contains(&c).then_some(Key::Keypad(c))
    }

    /// Parse an input token: a keypad character or `call` / `end` / `back`.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "call" => Some(Key::Call),
            "end" => Some(Key::End),
            "back" => Some(Key::Back),
            _ => {
                let mut chars = token.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::keypad(c),
                    _ => None,
                }
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Keypad(c) => write!(f, "{c}"),
            Key::Call => f.write_str("call"),
            Key::End => f.write_str("end"),
            Key::Back => f.write_str("back"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_id_is_namespaced() {
        let id = ScreenId::transient_for(&ActionId::new("call911"));
        assert_eq!(id.as_str(), "temp:call911");
        assert!(id.is_transient());
        assert!(!ScreenId::new("main").is_transient());
    }

    #[test]
    fn test_key_parse_tokens() {
        assert_eq!(Key::parse("back"), Some(Key::Back));
        assert_eq!(Key::parse("end"), Some(Key::End));
        assert_eq!(Key::parse("call"), Some(Key::Call));
        assert_eq!(Key::parse("7"), Some(Key::Keypad('7')));
        assert_eq!(Key::parse("#"), Some(Key::Keypad('#')));
        assert_eq!(Key::parse("a"), None);
        assert_eq!(Key::parse("12"), None);
        assert_eq!(Key::parse(""), None);
    }

    #[test]
    fn test_destination_toml_forms() {
        #[derive(Deserialize)]
        struct Wrapper {
            a: Destination,
            b: Destination,
            c: Destination,
        }
        let parsed: Wrapper = toml::from_str(
            r#"
a = { screen = "report" }
b = { action = "call911" }
c = "exit"
"#,
        )
        .unwrap();
        assert_eq!(parsed.a, Destination::Screen(ScreenId::new("report")));
        assert_eq!(parsed.b, Destination::Action(ActionId::new("call911")));
        assert_eq!(parsed.c, Destination::Exit);
    }
}
