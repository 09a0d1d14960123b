use std::time::{Duration, Instant};

use safevoice::core::builtin::builtin_menu;
use safevoice::core::menu::{MenuDefinition, MenuError};
use safevoice::core::navigator::{Effect, Navigator};
use safevoice::core::places::{FixedLocation, Position};
use safevoice::core::screen::{Key, ScreenId};

// ============================================================================
// Helper Functions
// ============================================================================

fn navigator() -> Navigator {
    let menu = builtin_menu().compile().expect("built-in menu compiles");
    Navigator::new(menu).with_seed(7)
}

fn ids(names: &[&str]) -> Vec<ScreenId> {
    names.iter().map(|n| ScreenId::new(*n)).collect()
}

fn press(nav: &mut Navigator, token: &str, now: Instant) -> Vec<Effect> {
    let key = Key::parse(token).expect("valid key token");
    nav.press_key(key, now)
}

const SMALL_MENU: &str = r#"
root = "home"
emergency = "sos"
call_action = "dial"

[[screens]]
id = "home"
title = "Home"
lines = ["1. Help", "0. Exit"]
options = { "1" = { screen = "sos" }, "2" = { action = "where" }, "0" = "exit" }

[[screens]]
id = "sos"
title = "SOS"
action_required = true
options = { "1" = { action = "dial" } }

[[actions]]
id = "dial"
title = "Calling"
lines = ["Case {case_id}"]
narration = "Calling for help"

[[actions]]
id = "where"
title = "Nearest police"
lines = ["{nearest:police}", "Call {phone:police}", "You are at {position}"]
"#;

// ============================================================================
// Built-in menu scenarios
// ============================================================================

#[test]
fn test_open_then_report_menu() {
    let t0 = Instant::now();
    let mut nav = navigator();
    let effects = nav.open();
    assert_eq!(effects, vec![Effect::Opened, Effect::ScreenChanged]);

    press(&mut nav, "2", t0);

    assert_eq!(nav.state().current.as_str(), "report");
    assert_eq!(nav.state().history, ids(&["main"]));
    assert_eq!(nav.state().input, "2");
}

#[test]
fn test_report_action_shows_confirmation_then_reverts() {
    let t0 = Instant::now();
    let mut nav = navigator();
    nav.open();
    press(&mut nav, "2", t0);

    press(&mut nav, "1", t0);

    let state = nav.state();
    assert!(state.current.is_transient());
    assert_eq!(state.history, ids(&["main", "report"]));
    let screen = nav.current_screen();
    assert!(screen.title.contains("REPORTING"));
    assert!(screen.lines.iter().any(|l| l.contains("Case ID: SV")));

    // Not yet due
    assert!(nav.tick(t0 + Duration::from_millis(2999)).is_empty());
    assert!(nav.state().current.is_transient());

    assert_eq!(
        nav.tick(t0 + Duration::from_millis(3000)),
        vec![Effect::ScreenChanged]
    );
    assert_eq!(nav.state().current.as_str(), "report");
    assert_eq!(nav.state().history, ids(&["main"]));
    assert!(nav.next_deadline().is_none());
}

#[test]
fn test_back_at_root_stays_at_root() {
    let t0 = Instant::now();
    let mut nav = navigator();
    nav.open();

    let effects = press(&mut nav, "back", t0);

    assert_eq!(effects, vec![Effect::PlayTone, Effect::ScreenChanged]);
    assert_eq!(nav.state().current.as_str(), "main");
    assert!(nav.state().history.is_empty());
}

#[test]
fn test_call_on_emergency_screen_dispatches_and_narrates() {
    let t0 = Instant::now();
    let mut nav = navigator();
    nav.open();
    press(&mut nav, "1", t0);

    let effects = press(&mut nav, "call", t0);

    assert_eq!(effects[0], Effect::PlayTone);
    assert!(effects.contains(&Effect::ScreenChanged));
    assert!(effects.iter().any(|e| matches!(e, Effect::Narrate(_))));
    assert_eq!(nav.state().current.as_str(), "temp:call911");
    assert_eq!(nav.state().history, ids(&["main", "emergency"]));
    assert_eq!(nav.state().input, "call");
}

#[test]
fn test_call_elsewhere_only_beeps() {
    let t0 = Instant::now();
    let mut nav = navigator();
    nav.open();
    let before = nav.state().clone();

    let effects = press(&mut nav, "call", t0);

    assert_eq!(effects, vec![Effect::PlayTone]);
    assert_eq!(nav.state(), &before);
}

#[test]
fn test_exit_option_closes_the_session() {
    let t0 = Instant::now();
    let mut nav = navigator();
    nav.open();
    assert!(nav.session_id().is_some());

    let effects = press(&mut nav, "0", t0);

    assert_eq!(effects, vec![Effect::PlayTone, Effect::Closed]);
    assert!(!nav.is_open());
    assert!(nav.session_id().is_none());
    // Further keys are ignored until reopened
    assert!(press(&mut nav, "1", t0).is_empty());
}

#[test]
fn test_end_during_pending_revert_drops_the_timer() {
    let t0 = Instant::now();
    let mut nav = navigator();
    nav.open();
    press(&mut nav, "3", t0);
    press(&mut nav, "1", t0);
    assert!(nav.next_deadline().is_some());

    press(&mut nav, "end", t0);

    assert!(nav.next_deadline().is_none());
    let after_close = nav.state().clone();
    assert!(nav.tick(t0 + Duration::from_secs(60)).is_empty());
    assert_eq!(nav.state(), &after_close);
}

#[test]
fn test_reopen_starts_a_fresh_session() {
    let t0 = Instant::now();
    let mut nav = navigator();
    nav.open();
    let first = nav.session_id();
    press(&mut nav, "5", t0);
    nav.close();

    nav.open();

    assert_ne!(nav.session_id(), first);
    assert_eq!(nav.state().current.as_str(), "main");
    assert!(nav.state().history.is_empty());
}

#[test]
fn test_configured_revert_delay_is_used() {
    let t0 = Instant::now();
    let mut nav = navigator().with_revert_delay(Duration::from_millis(500));
    nav.open();
    press(&mut nav, "4", t0);
    press(&mut nav, "1", t0);

    assert_eq!(nav.next_deadline(), Some(t0 + Duration::from_millis(500)));
    nav.tick(t0 + Duration::from_millis(500));
    assert_eq!(nav.state().current.as_str(), "legal");
}

// ============================================================================
// Custom menus
// ============================================================================

#[test]
fn test_custom_menu_renders_templates() {
    let t0 = Instant::now();
    let menu = MenuDefinition::from_toml(SMALL_MENU)
        .and_then(|def| def.compile())
        .expect("small menu compiles");
    let mut nav = Navigator::new(menu)
        .with_seed(1)
        .with_location(Box::new(FixedLocation(Some(Position::new(-33.9212, 18.4193)))));
    nav.open();

    press(&mut nav, "2", t0);

    let lines = &nav.current_screen().lines;
    assert_eq!(lines[0], "Cape Town Central Police Station (0.0 km)");
    assert_eq!(lines[1], "Call +27214007000");
    assert_eq!(lines[2], "You are at -33.9212, 18.4193");
}

#[test]
fn test_custom_menu_call_control() {
    let t0 = Instant::now();
    let menu = MenuDefinition::from_toml(SMALL_MENU)
        .and_then(|def| def.compile())
        .expect("small menu compiles");
    let mut nav = Navigator::new(menu);
    nav.open();
    press(&mut nav, "1", t0);

    let effects = press(&mut nav, "call", t0);

    assert!(effects.contains(&Effect::Narrate("Calling for help".to_string())));
    assert_eq!(nav.state().current.as_str(), "temp:dial");
    assert!(nav.current_screen().lines[0].starts_with("Case SV"));
}

#[test]
fn test_custom_menu_with_dangling_target_is_rejected() {
    let broken = SMALL_MENU.replace(r#"{ screen = "sos" }"#, r#"{ screen = "nowhere" }"#);
    let err = MenuDefinition::from_toml(&broken)
        .and_then(|def| def.compile())
        .unwrap_err();

    assert!(matches!(err, MenuError::UnknownScreen { .. }));
    assert!(err.to_string().contains("nowhere"));
}

#[test]
fn test_custom_menu_cycle_keeps_history_acyclic() {
    let cyclic = r#"
root = "a"

[[screens]]
id = "a"
title = "A"
options = { "1" = { screen = "b" } }

[[screens]]
id = "b"
title = "B"
options = { "1" = { screen = "a" }, "2" = { screen = "b" } }
"#;
    let t0 = Instant::now();
    let menu = MenuDefinition::from_toml(cyclic)
        .and_then(|def| def.compile())
        .expect("cyclic menu compiles");
    let mut nav = Navigator::new(menu);
    nav.open();

    press(&mut nav, "1", t0);
    press(&mut nav, "1", t0);

    assert_eq!(nav.state().current.as_str(), "a");
    assert!(nav.state().history.is_empty());

    // A screen that links to itself does not stack up
    press(&mut nav, "1", t0);
    press(&mut nav, "2", t0);
    assert_eq!(nav.state().current.as_str(), "b");
    assert_eq!(nav.state().history, ids(&["a"]));
    assert!(!nav.state().history.contains(&nav.state().current));
}

#[test]
fn test_builtin_menu_survives_toml_round_trip() {
    let toml = builtin_menu().to_toml().unwrap();
    let reparsed = MenuDefinition::from_toml(&toml).unwrap();
    assert_eq!(reparsed, builtin_menu());
    assert!(reparsed.compile().is_ok());
}
