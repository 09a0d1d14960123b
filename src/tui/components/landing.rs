//! # Landing Component
//!
//! Shown while the phone surface is closed: what the offline mode is, how to
//! open it, and the code to dial on a real handset.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

pub struct Landing<'a> {
    pub dial_code: &'a str,
}

impl Landing<'_> {
    fn lines(&self) -> Vec<Line<'static>> {
        let key = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        vec![
            Line::styled(
                "📱 SafeVoice Offline Mode",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::raw("No data connection? Use the basic-phone menu."),
            Line::raw(""),
            Line::from(vec![
                Span::raw("Press "),
                Span::styled("o", key),
                Span::raw(" or "),
                Span::styled("Enter", key),
                Span::raw(" to open the phone, "),
                Span::styled("q", key),
                Span::raw(" to quit"),
            ]),
            Line::raw(""),
            Line::styled(
                format!("To access in real life, dial {} from any mobile phone", self.dial_code),
                Style::default().fg(Color::DarkGray),
            ),
        ]
    }
}

impl Component for Landing<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = self.lines();
        let height = lines.len() as u16 + 2;
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .areas(area);

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::bordered().border_style(Style::default().fg(Color::DarkGray)));
        frame.render_widget(paragraph, middle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_landing_shows_open_hint_and_dial_code() {
        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut landing = Landing {
            dial_code: "*384*SOS#",
        };

        terminal.draw(|f| landing.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("SafeVoice Offline Mode"));
        assert!(text.contains("to open the phone"));
        assert!(text.contains("*384*SOS#"));
    }
}
