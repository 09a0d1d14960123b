//! # Keypad and Controls
//!
//! The twelve-key grid and the CALL / END / BACK row beneath it. Both only
//! display; key presses arrive through the event loop. The last key pressed is
//! highlighted so the caller can see what the phone registered.

use crate::core::screen::{KEYPAD, Key};
use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Paragraph};

/// Rows the keypad grid occupies.
pub const KEYPAD_HEIGHT: u16 = 8;
/// Rows the control row occupies.
pub const CONTROLS_HEIGHT: u16 = 3;

/// Letters printed under a keypad digit.
pub fn letters(key: char) -> &'static str {
    match key {
        '2' => "ABC",
        '3' => "DEF",
        '4' => "GHI",
        '5' => "JKL",
        '6' => "MNO",
        '7' => "PQRS",
        '8' => "TUV",
        '9' => "WXYZ",
        '0' => "+",
        _ => "",
    }
}

fn highlight(pressed: bool, base: Style) -> Style {
    if pressed {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        base
    }
}

pub struct Keypad {
    pub pressed: Option<Key>,
}

impl Component for Keypad {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([Constraint::Length(2); 4]).split(area);
        for (row_area, keys) in rows.iter().zip(KEYPAD.chunks(3)) {
            let cells = Layout::horizontal([Constraint::Fill(1); 3])
                .spacing(1)
                .split(*row_area);
            for (cell, &key) in cells.iter().zip(keys) {
                let style = highlight(
                    self.pressed == Some(Key::Keypad(key)),
                    Style::default().fg(Color::White).bg(Color::DarkGray),
                );
                let paragraph = Paragraph::new(vec![
                    Line::styled(key.to_string(), Style::default().add_modifier(Modifier::BOLD)),
                    Line::styled(letters(key), Style::default().add_modifier(Modifier::DIM)),
                ])
                .alignment(Alignment::Center)
                .style(style);
                frame.render_widget(paragraph, *cell);
            }
        }
    }
}

pub struct Controls {
    pub pressed: Option<Key>,
    /// The current screen commits to an action with CALL.
    pub call_armed: bool,
}

impl Component for Controls {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let cells = Layout::horizontal([Constraint::Fill(1); 3])
            .spacing(1)
            .split(area);
        let call_style = if self.call_armed {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        let buttons = [
            (Key::Call, "CALL", call_style),
            (Key::End, "END", Style::default().fg(Color::Red)),
            (Key::Back, "BACK", Style::default().fg(Color::Yellow)),
        ];
        for (cell, (key, label, style)) in cells.iter().zip(buttons) {
            let style = highlight(self.pressed == Some(key), style);
            let button = Paragraph::new(label)
                .alignment(Alignment::Center)
                .block(Block::bordered().border_style(style))
                .style(style);
            frame.render_widget(button, *cell);
        }
    }
}
