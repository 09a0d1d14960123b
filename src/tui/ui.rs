use crate::core::navigator::Navigator;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Landing, Phone, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

/// Short form of the session id for the title bar.
fn session_tag(navigator: &Navigator) -> Option<String> {
    navigator.session_id().map(|id| {
        let mut tag = id.simple().to_string();
        tag.truncate(8);
        tag
    })
}

pub fn draw_ui(frame: &mut Frame, navigator: &Navigator, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0)]);
    let [title_area, main_area] = layout.areas(frame.area());

    TitleBar::new(session_tag(navigator), tui.status_message.clone()).render(frame, title_area);

    if navigator.is_open() {
        let state = navigator.state();
        Phone {
            screen: navigator.current_screen(),
            input: &state.input,
            scroll: &mut tui.screen_scroll,
            pressed: tui.last_key,
            dial_code: &tui.dial_code,
        }
        .render(frame, main_area);
    } else {
        Landing {
            dial_code: &tui.dial_code,
        }
        .render(frame, main_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::screen::Key;
    use crate::test_support::{builtin_navigator, epoch};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(navigator: &Navigator, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, navigator, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_closed_navigator_draws_landing() {
        let navigator = builtin_navigator();
        let mut tui = TuiState::new("*384*SOS#".to_string());
        let text = draw(&navigator, &mut tui);

        assert!(text.contains("to open the phone"));
        assert!(!text.contains("Basic Phone"));
        assert!(!text.contains("session"));
    }

    #[test]
    fn test_open_navigator_draws_main_menu() {
        let mut navigator = builtin_navigator();
        navigator.open();
        let mut tui = TuiState::new("*384*SOS#".to_string());
        let text = draw(&navigator, &mut tui);

        assert!(text.contains("Basic Phone - SafeVoice"));
        assert!(text.contains("SafeVoice USSD"));
        assert!(text.contains("Emergency SOS"));
        assert!(text.contains("Select option or BACK"));
        assert!(text.contains("session "));
    }

    #[test]
    fn test_emergency_screen_prompts_for_call() {
        let mut navigator = builtin_navigator();
        navigator.open();
        navigator.press_key(Key::Keypad('1'), epoch());
        let mut tui = TuiState::new("*384*SOS#".to_string());
        let text = draw(&navigator, &mut tui);

        assert!(text.contains("Choose an action or press CALL"));
        assert!(text.contains("> 1"));
    }

    #[test]
    fn test_session_tag_is_short() {
        let mut navigator = builtin_navigator();
        assert_eq!(session_tag(&navigator), None);
        navigator.open();
        assert_eq!(session_tag(&navigator).map(|t| t.len()), Some(8));
    }
}
