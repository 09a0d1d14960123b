//! # Response Templates
//!
//! Action responses are canned text, but a few lines carry live values: the
//! time of the dispatch, a freshly drawn case number, the caller's position
//! or the nearest police station. Each response line is parsed once when the
//! menu is compiled and rendered on every dispatch.
//!
//! | Placeholder        | Expands to                                   |
//! |--------------------|----------------------------------------------|
//! | `{time}`           | local time, `14:05:09`                       |
//! | `{date}`           | local date, `2026-10-15`                     |
//! | `{datetime}`       | both, `2026-10-15 14:05:09`                  |
//! | `{case_id}`        | `SV` + number drawn for this dispatch        |
//! | `{position}`       | caller position, `-33.9249, 18.4241`         |
//! | `{nearest:<kind>}` | nearest place of a kind, with its distance   |
//! | `{phone:<kind>}`   | phone number of that nearest place           |
//!
//! `{{` and `}}` produce literal braces.

use std::fmt;

use chrono::{DateTime, Local};

use crate::core::places::{PlaceDirectory, PlaceKind, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    UnknownPlaceholder(String),
    Unclosed(String),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UnknownPlaceholder(name) => write!(f, "unknown placeholder '{{{name}}}'"),
            TemplateError::Unclosed(line) => write!(f, "unclosed '{{' in line \"{line}\""),
        }
    }
}

impl std::error::Error for TemplateError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    Time,
    Date,
    DateTime,
    CaseId,
    Position,
    Nearest(PlaceKind),
    Phone(PlaceKind),
}

impl Placeholder {
    fn parse(name: &str) -> Result<Self, TemplateError> {
        let unknown = || TemplateError::UnknownPlaceholder(name.to_string());
        match name {
            "time" => Ok(Placeholder::Time),
            "date" => Ok(Placeholder::Date),
            "datetime" => Ok(Placeholder::DateTime),
            "case_id" => Ok(Placeholder::CaseId),
            "position" => Ok(Placeholder::Position),
            _ => match name.split_once(':') {
                Some(("nearest", kind)) => kind
                    .parse()
                    .map(Placeholder::Nearest)
                    .map_err(|_| unknown()),
                Some(("phone", kind)) => kind.parse().map(Placeholder::Phone).map_err(|_| unknown()),
                _ => Err(unknown()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Value(Placeholder),
}

/// Values available while rendering one dispatch.
pub struct RenderContext<'a> {
    pub now: DateTime<Local>,
    pub case_id: &'a str,
    pub position: Position,
    pub places: &'a PlaceDirectory,
}

/// A parsed response line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTemplate {
    segments: Vec<Segment>,
}

impl LineTemplate {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(TemplateError::Unclosed(source.to_string()));
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Value(Placeholder::parse(name.trim())?));
                }
                _ => text.push(c),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self { segments })
    }

    pub fn render(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Value(value) => out.push_str(&render_value(*value, ctx)),
            }
        }
        out
    }
}

fn render_value(value: Placeholder, ctx: &RenderContext<'_>) -> String {
    match value {
        Placeholder::Time => ctx.now.format("%H:%M:%S").to_string(),
        Placeholder::Date => ctx.now.format("%Y-%m-%d").to_string(),
        Placeholder::DateTime => ctx.now.format("%Y-%m-%d %H:%M:%S").to_string(),
        Placeholder::CaseId => ctx.case_id.to_string(),
        Placeholder::Position => ctx.position.to_string(),
        Placeholder::Nearest(kind) => ctx
            .places
            .nearest(&ctx.position, kind)
            .map(|nearby| nearby.to_string())
            .unwrap_or_else(|| "unavailable".to_string()),
        Placeholder::Phone(kind) => ctx
            .places
            .nearest(&ctx.position, kind)
            .map(|nearby| nearby.place.phone.clone())
            .unwrap_or_else(|| "unavailable".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::places::DEFAULT_POSITION;
    use chrono::TimeZone;

    fn render(src: &str) -> String {
        let places = PlaceDirectory::builtin();
        let ctx = RenderContext {
            now: Local.with_ymd_and_hms(2026, 10, 15, 14, 5, 9).unwrap(),
            case_id: "SV4242",
            position: DEFAULT_POSITION,
            places: &places,
        };
        LineTemplate::parse(src).unwrap().render(&ctx)
    }

    #[test]
    fn test_plain_text_is_static() {
        assert_eq!(render("1. Harassment 😠"), "1. Harassment 😠");
    }

    #[test]
    fn test_time_and_case_id() {
        assert_eq!(render("⏰ Time: {time}"), "⏰ Time: 14:05:09");
        assert_eq!(render("🆔 Case ID: {case_id}"), "🆔 Case ID: SV4242");
        assert_eq!(render("{datetime}"), "2026-10-15 14:05:09");
        assert_eq!(render("{date}"), "2026-10-15");
    }

    #[test]
    fn test_nearest_and_phone() {
        assert_eq!(
            render("👮 {nearest:police}"),
            "👮 Cape Town Central Police Station (0.6 km)"
        );
        assert_eq!(render("📞 {phone:police}"), "📞 +27214007000");
    }

    #[test]
    fn test_position() {
        assert_eq!(render("📍 {position}"), "📍 -33.9249, 18.4241");
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(render("{{literal}}"), "{literal}");
    }

    #[test]
    fn test_unknown_placeholder_rejected() {
        assert_eq!(
            LineTemplate::parse("{weather}"),
            Err(TemplateError::UnknownPlaceholder("weather".to_string()))
        );
        assert_eq!(
            LineTemplate::parse("{nearest:bakery}"),
            Err(TemplateError::UnknownPlaceholder("nearest:bakery".to_string()))
        );
    }

    #[test]
    fn test_unclosed_placeholder_rejected() {
        assert!(matches!(
            LineTemplate::parse("Case {case_id"),
            Err(TemplateError::Unclosed(_))
        ));
    }
}
