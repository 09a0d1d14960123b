//! # TitleBar Component
//!
//! Top status bar: which session is on the line and what the phone last did
//! ("Connected", "🔊 Emergency services contacted...", "Call ended").
//!
//! Purely presentational. All data arrives as props:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(Some("1a2b3c4d".into()), "Connected".into());
//! title_bar.render(frame, area);
//! ```
//!
//! Formatting priority keeps the product name visible on narrow terminals:
//!
//! 1. **Session + status**: `"SafeVoice Offline Mode | session 1a2b3c4d | Connected"`
//! 2. **Status only**: `"SafeVoice Offline Mode | Call ended"`
//! 3. **Default**: `"SafeVoice Offline Mode"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

const PRODUCT: &str = "SafeVoice Offline Mode";

/// Top status bar component showing session and status.
pub struct TitleBar {
    /// Short session tag while the phone is open
    pub session: Option<String>,
    /// Last status line (e.g. "Connected", a narrated announcement)
    pub status_message: String,
}

impl TitleBar {
    pub fn new(session: Option<String>, status_message: String) -> Self {
        Self {
            session,
            status_message,
        }
    }

    fn text(&self) -> String {
        match (&self.session, self.status_message.is_empty()) {
            (Some(session), false) => {
                format!("{PRODUCT} | session {session} | {}", self.status_message)
            }
            (Some(session), true) => format!("{PRODUCT} | session {session}"),
            (None, false) => format!("{PRODUCT} | {}", self.status_message),
            (None, true) => PRODUCT.to_string(),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let span = Span::styled(self.text(), Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(span, area);
    }
}
