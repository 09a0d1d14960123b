//! # Phone Component
//!
//! The simulated handset: a bordered frame containing the display, the keypad,
//! the control row and a footer with key bindings and the dial code.
//!
//! ```text
//! ┌ Basic Phone - SafeVoice ─────────┐
//! │ ┌──────────────────────────────┐ │
//! │ │        SafeVoice USSD        │ │  <- PhoneDisplay (scrolls)
//! │ │ 1. Emergency SOS             │ │
//! │ │ ...                          │ │
//! │ └──────────────────────────────┘ │
//! │   1     2     3                  │  <- Keypad
//! │  ...                             │
//! │ [CALL] [END] [BACK]              │  <- Controls
//! │ Enter=CALL Esc=END Bksp=BACK     │  <- footer
//! └──────────────────────────────────┘
//! ```

use crate::core::screen::{Key, Screen};
use crate::tui::component::Component;
use crate::tui::components::keypad::{CONTROLS_HEIGHT, Controls, KEYPAD_HEIGHT, Keypad};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph, Wrap};

/// Preferred handset size; shrinks to fit small terminals.
pub const PHONE_WIDTH: u16 = 46;
pub const PHONE_HEIGHT: u16 = 34;

const FOOTER_HEIGHT: u16 = 2;

/// Prompt shown under the screen content.
pub fn hint(screen: &Screen) -> &'static str {
    if !screen.has_options() {
        "Press BACK to continue"
    } else if screen.action_required {
        "Choose an action or press CALL"
    } else {
        "Select option or BACK"
    }
}

fn is_rule(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c == '=')
}

/// The handset display. Scrolls when the screen is taller than the area.
pub struct PhoneDisplay<'a> {
    pub screen: &'a Screen,
    /// Key that led here, echoed under the prompt
    pub input: &'a str,
    /// Scroll offset, clamped to the content on every render
    pub scroll: &'a mut u16,
}

impl PhoneDisplay<'_> {
    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.screen.lines.len() + 5);
        lines.push(
            Line::styled(
                self.screen.title.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center),
        );
        lines.push(Line::raw(""));
        for line in &self.screen.lines {
            let style = if is_rule(line) {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Green)
            };
            lines.push(Line::styled(line.clone(), style));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            hint(self.screen),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ));
        if !self.input.is_empty() {
            lines.push(Line::styled(
                format!("> {}", self.input),
                Style::default().fg(Color::White),
            ));
        }
        lines
    }
}

impl Component for PhoneDisplay<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().border_style(Style::default().fg(Color::Green));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let paragraph = Paragraph::new(self.lines()).wrap(Wrap { trim: false });
        let total = u16::try_from(paragraph.line_count(inner.width)).unwrap_or(u16::MAX);
        let max_scroll = total.saturating_sub(inner.height);
        *self.scroll = (*self.scroll).min(max_scroll);

        let paragraph = paragraph
            .style(Style::default().bg(Color::Black))
            .scroll((*self.scroll, 0));
        frame.render_widget(paragraph, inner);
    }
}

/// The whole handset.
pub struct Phone<'a> {
    pub screen: &'a Screen,
    pub input: &'a str,
    pub scroll: &'a mut u16,
    pub pressed: Option<Key>,
    pub dial_code: &'a str,
}

impl Component for Phone<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = PHONE_WIDTH.min(area.width);
        let height = PHONE_HEIGHT.min(area.height);
        let [_, column, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(width),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [handset] = Layout::vertical([Constraint::Length(height)]).areas(column);

        let block = Block::bordered()
            .title(" Basic Phone - SafeVoice ")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(handset);
        frame.render_widget(block, handset);

        let [display_area, keypad_area, controls_area, footer_area] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(KEYPAD_HEIGHT),
            Constraint::Length(CONTROLS_HEIGHT),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .areas(inner);

        PhoneDisplay {
            screen: self.screen,
            input: self.input,
            scroll: &mut *self.scroll,
        }
        .render(frame, display_area);

        Keypad {
            pressed: self.pressed,
        }
        .render(frame, keypad_area);

        Controls {
            pressed: self.pressed,
            call_armed: self.screen.action_required,
        }
        .render(frame, controls_area);

        let footer = Paragraph::new(vec![
            Line::raw("Enter=CALL  Esc=END  Bksp=BACK  ↑↓=scroll"),
            Line::styled(
                format!("Dial {} on a real phone", self.dial_code),
                Style::default().fg(Color::DarkGray),
            ),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(footer, footer_area);
    }
}
