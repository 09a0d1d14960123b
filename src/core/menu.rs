//! # Menu Definitions
//!
//! The menu is data: a set of screens, a set of canned action responses, and
//! which screen is the root. A [`MenuDefinition`] is the serializable form
//! (built in, or read from a TOML file). [`MenuDefinition::compile`] checks
//! it once at startup and produces the [`Menu`] the navigator runs on.
//!
//! ```text
//! menu.toml ──parse──► MenuDefinition ──compile()──► Menu
//!                          ▲                          │
//!        builtin() ────────┘              validated:  ├─ every target resolves
//!                                                     ├─ ids unique, not reserved
//!                                                     ├─ keys are keypad chars
//!                                                     └─ templates parse
//! ```
//!
//! After compilation nothing about the menu can fail at runtime.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::screen::{ActionId, Destination, KEYPAD, Screen, ScreenId, TRANSIENT_PREFIX};
use crate::core::template::{LineTemplate, TemplateError};

// ============================================================================
// Serializable definition
// ============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MenuDefinition {
    pub root: ScreenId,
    /// Screen on which the CALL control fires `call_action`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency: Option<ScreenId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_action: Option<ActionId>,
    #[serde(default)]
    pub screens: Vec<ScreenDef>,
    #[serde(default)]
    pub actions: Vec<ActionDef>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScreenDef {
    pub id: ScreenId,
    pub title: String,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub action_required: bool,
    /// Keyed by keypad character as a string (`"1"`, `"#"`).
    #[serde(default)]
    pub options: BTreeMap<String, Destination>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ActionDef {
    pub id: ActionId,
    pub title: String,
    #[serde(default)]
    pub lines: Vec<String>,
    /// Announcement spoken when the action fires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum MenuError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    MissingRoot(ScreenId),
    MissingEmergency(ScreenId),
    DuplicateScreen(ScreenId),
    DuplicateAction(ActionId),
    ReservedId(String),
    InvalidKey { screen: ScreenId, key: String },
    UnknownScreen { screen: ScreenId, target: ScreenId },
    UnknownAction { screen: ScreenId, target: ActionId },
    EmergencyWithoutCall,
    Template { action: ActionId, source: TemplateError },
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::Io(e) => write!(f, "menu I/O error: {e}"),
            MenuError::Parse(e) => write!(f, "menu parse error: {e}"),
            MenuError::MissingRoot(id) => write!(f, "root screen '{id}' is not defined"),
            MenuError::MissingEmergency(id) => {
                write!(f, "emergency screen '{id}' is not defined")
            }
            MenuError::DuplicateScreen(id) => write!(f, "screen '{id}' is defined twice"),
            MenuError::DuplicateAction(id) => write!(f, "action '{id}' is defined twice"),
            MenuError::ReservedId(id) => {
                write!(f, "id '{id}' uses the reserved prefix '{TRANSIENT_PREFIX}'")
            }
            MenuError::InvalidKey { screen, key } => {
                write!(f, "screen '{screen}' maps '{key}', which is not a keypad key")
            }
            MenuError::UnknownScreen { screen, target } => {
                write!(f, "screen '{screen}' leads to undefined screen '{target}'")
            }
            MenuError::UnknownAction { screen, target } => {
                write!(f, "screen '{screen}' leads to undefined action '{target}'")
            }
            MenuError::EmergencyWithoutCall => {
                write!(f, "'emergency' and 'call_action' must be set together")
            }
            MenuError::Template { action, source } => {
                write!(f, "action '{action}': {source}")
            }
        }
    }
}

impl std::error::Error for MenuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MenuError::Io(e) => Some(e),
            MenuError::Parse(e) => Some(e),
            MenuError::Template { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Compiled menu
// ============================================================================

/// A canned response, parsed and ready to render.
#[derive(Debug, Clone)]
pub struct ActionTemplate {
    pub id: ActionId,
    pub title: String,
    pub lines: Vec<LineTemplate>,
    pub narration: Option<String>,
}

/// A validated menu. Only obtainable through [`MenuDefinition::compile`].
#[derive(Debug, Clone)]
pub struct Menu {
    root: ScreenId,
    emergency: Option<(ScreenId, ActionId)>,
    screens: HashMap<ScreenId, Screen>,
    actions: HashMap<ActionId, ActionTemplate>,
}

impl Menu {
    pub fn root(&self) -> &ScreenId {
        &self.root
    }

    pub fn screen(&self, id: &ScreenId) -> Option<&Screen> {
        self.screens.get(id)
    }

    pub fn action(&self, id: &ActionId) -> Option<&ActionTemplate> {
        self.actions.get(id)
    }

    /// The emergency screen and the action CALL fires on it.
    pub fn emergency(&self) -> Option<(&ScreenId, &ActionId)> {
        self.emergency.as_ref().map(|(screen, action)| (screen, action))
    }

    pub fn screen_ids(&self) -> impl Iterator<Item = &ScreenId> {
        self.screens.keys()
    }

    pub fn screen_count(&self) -> usize {
        self.screens.len()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

impl MenuDefinition {
    /// Validate the definition and build the runtime menu.
    pub fn compile(&self) -> Result<Menu, MenuError> {
        let mut actions = HashMap::new();
        for def in &self.actions {
            if def.id.as_str().starts_with(TRANSIENT_PREFIX) {
                return Err(MenuError::ReservedId(def.id.to_string()));
            }
            let lines = def
                .lines
                .iter()
                .map(|line| LineTemplate::parse(line))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| MenuError::Template {
                    action: def.id.clone(),
                    source,
                })?;
            let template = ActionTemplate {
                id: def.id.clone(),
                title: def.title.clone(),
                lines,
                narration: def.narration.clone(),
            };
            if actions.insert(def.id.clone(), template).is_some() {
                return Err(MenuError::DuplicateAction(def.id.clone()));
            }
        }

        let mut screens = HashMap::new();
        for def in &self.screens {
            if def.id.is_transient() {
                return Err(MenuError::ReservedId(def.id.to_string()));
            }
            let mut options = BTreeMap::new();
            for (key, destination) in &def.options {
                let c = keypad_char(key).ok_or_else(|| MenuError::InvalidKey {
                    screen: def.id.clone(),
                    key: key.clone(),
                })?;
                options.insert(c, destination.clone());
            }
            let screen = Screen {
                id: def.id.clone(),
                title: def.title.clone(),
                lines: def.lines.clone(),
                options,
                action_required: def.action_required,
            };
            if screens.insert(def.id.clone(), screen).is_some() {
                return Err(MenuError::DuplicateScreen(def.id.clone()));
            }
        }

        if !screens.contains_key(&self.root) {
            return Err(MenuError::MissingRoot(self.root.clone()));
        }

        // Every transition target must resolve
        for def in &self.screens {
            for destination in def.options.values() {
                match destination {
                    Destination::Screen(target) if !screens.contains_key(target) => {
                        return Err(MenuError::UnknownScreen {
                            screen: def.id.clone(),
                            target: target.clone(),
                        });
                    }
                    Destination::Action(target) if !actions.contains_key(target) => {
                        return Err(MenuError::UnknownAction {
                            screen: def.id.clone(),
                            target: target.clone(),
                        });
                    }
                    _ => {}
                }
            }
        }

        let emergency = match (&self.emergency, &self.call_action) {
            (None, None) => None,
            (Some(screen), Some(action)) => {
                if !screens.contains_key(screen) {
                    return Err(MenuError::MissingEmergency(screen.clone()));
                }
                if !actions.contains_key(action) {
                    return Err(MenuError::UnknownAction {
                        screen: screen.clone(),
                        target: action.clone(),
                    });
                }
                Some((screen.clone(), action.clone()))
            }
            _ => return Err(MenuError::EmergencyWithoutCall),
        };

        debug!(
            "Compiled menu: {} screens, {} actions, root '{}'",
            screens.len(),
            actions.len(),
            self.root
        );

        Ok(Menu {
            root: self.root.clone(),
            emergency,
            screens,
            actions,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, MenuError> {
        toml::from_str(contents).map_err(MenuError::Parse)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn keypad_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if KEYPAD.contains(&c) => Some(c),
        _ => None,
    }
}

/// Read and compile a menu file.
pub fn load_menu_file(path: &Path) -> Result<Menu, MenuError> {
    let contents = fs::read_to_string(path).map_err(MenuError::Io)?;
    let menu = MenuDefinition::from_toml(&contents)?.compile()?;
    info!(
        "Loaded menu from {} ({} screens, {} actions)",
        path.display(),
        menu.screen_count(),
        menu.action_count()
    );
    Ok(menu)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> MenuDefinition {
        MenuDefinition::from_toml(
            r#"
root = "main"

[[screens]]
id = "main"
title = "Main"
lines = ["1. Help", "0. Exit"]
options = { "1" = { screen = "help" }, "0" = "exit" }

[[screens]]
id = "help"
title = "Help"
options = { "1" = { action = "hotlines" } }

[[actions]]
id = "hotlines"
title = "Hotlines"
lines = ["National: 116 123"]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_minimal_menu_compiles() {
        let menu = minimal().compile().unwrap();
        assert_eq!(menu.root().as_str(), "main");
        assert_eq!(menu.screen_count(), 2);
        assert_eq!(menu.action_count(), 1);
        let main = menu.screen(&ScreenId::new("main")).unwrap();
        assert_eq!(main.destination('0'), Some(&Destination::Exit));
        assert!(menu.emergency().is_none());
    }

    #[test]
    fn test_missing_root() {
        let mut def = minimal();
        def.root = ScreenId::new("nowhere");
        assert!(matches!(def.compile(), Err(MenuError::MissingRoot(_))));
    }

    #[test]
    fn test_unknown_screen_target() {
        let mut def = minimal();
        def.screens[0]
            .options
            .insert("2".into(), Destination::Screen(ScreenId::new("ghost")));
        let err = def.compile().unwrap_err();
        assert!(matches!(err, MenuError::UnknownScreen { .. }));
        assert_eq!(err.to_string(), "screen 'main' leads to undefined screen 'ghost'");
    }

    #[test]
    fn test_unknown_action_target() {
        let mut def = minimal();
        def.screens[1]
            .options
            .insert("2".into(), Destination::Action(ActionId::new("callGhost")));
        assert!(matches!(def.compile(), Err(MenuError::UnknownAction { .. })));
    }

    #[test]
    fn test_invalid_key() {
        let mut def = minimal();
        def.screens[0].options.insert("a".into(), Destination::Exit);
        assert!(matches!(def.compile(), Err(MenuError::InvalidKey { .. })));
        let mut def = minimal();
        def.screens[0].options.insert("12".into(), Destination::Exit);
        assert!(matches!(def.compile(), Err(MenuError::InvalidKey { .. })));
    }

    #[test]
    fn test_reserved_prefix_rejected() {
        let mut def = minimal();
        def.screens[1].id = ScreenId::new("temp:help");
        def.screens[0]
            .options
            .insert("1".into(), Destination::Screen(ScreenId::new("temp:help")));
        assert!(matches!(def.compile(), Err(MenuError::ReservedId(_))));
    }

    #[test]
    fn test_duplicate_screen() {
        let mut def = minimal();
        let copy = def.screens[1].clone();
        def.screens.push(copy);
        assert!(matches!(def.compile(), Err(MenuError::DuplicateScreen(_))));
    }

    #[test]
    fn test_duplicate_action() {
        let mut def = minimal();
        let copy = def.actions[0].clone();
        def.actions.push(copy);
        assert!(matches!(def.compile(), Err(MenuError::DuplicateAction(_))));
    }

    #[test]
    fn test_bad_template_names_action() {
        let mut def = minimal();
        def.actions[0].lines.push("{weather}".into());
        let err = def.compile().unwrap_err();
        assert_eq!(
            err.to_string(),
            "action 'hotlines': unknown placeholder '{weather}'"
        );
    }

    #[test]
    fn test_emergency_requires_call_action() {
        let mut def = minimal();
        def.emergency = Some(ScreenId::new("help"));
        assert!(matches!(def.compile(), Err(MenuError::EmergencyWithoutCall)));
        def.call_action = Some(ActionId::new("hotlines"));
        let menu = def.compile().unwrap();
        let (screen, action) = menu.emergency().unwrap();
        assert_eq!(screen.as_str(), "help");
        assert_eq!(action.as_str(), "hotlines");
    }

    #[test]
    fn test_toml_round_trip() {
        let def = minimal();
        let text = def.to_toml().unwrap();
        assert_eq!(MenuDefinition::from_toml(&text).unwrap(), def);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_menu_file(Path::new("/definitely/not/here/menu.toml")).unwrap_err();
        assert!(matches!(err, MenuError::Io(_)));
    }
}
