//! The line-oriented pen command protocol.
//!
//! ```text
//! PEN_DOWN <x> <y>
//! PEN_MOVE <x> <y>
//! PEN_UP
//! GET_CURSOR
//! DELAY <ms>
//! ```
//!
//! Coordinates are logical display pixels. Blank lines and `#` comments
//! carry no command.

use std::str::{FromStr, SplitWhitespace};
use std::time::Duration;

use crate::error::ParseError;

/// Longest accepted DELAY.
pub const MAX_DELAY_MS: u64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PenDown { x: i32, y: i32 },
    PenMove { x: i32, y: i32 },
    PenUp,
    /// Log the last genuine pen position.
    GetCursor,
    /// Pause the command stream.
    Delay(Duration),
}

impl Command {
    /// Parse one protocol line. `Ok(None)` for blank lines and comments.
    pub fn parse_line(line: &str) -> Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        line.parse().map(Some)
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split_whitespace();
        let verb = fields.next().unwrap_or_default();

        let command = match verb {
            "PEN_DOWN" => {
                let (x, y) = point("PEN_DOWN", &mut fields)?;
                Command::PenDown { x, y }
            }
            "PEN_MOVE" => {
                let (x, y) = point("PEN_MOVE", &mut fields)?;
                Command::PenMove { x, y }
            }
            "PEN_UP" => Command::PenUp,
            "GET_CURSOR" => Command::GetCursor,
            "DELAY" => {
                let ms: u64 = number("DELAY", "ms", &mut fields)?;
                Command::Delay(Duration::from_millis(ms))
            }
            other => return Err(ParseError::UnknownVerb(other.to_string())),
        };

        let rest: Vec<&str> = fields.collect();
        if !rest.is_empty() {
            return Err(ParseError::TrailingInput {
                verb: command.verb(),
                rest: rest.join(" "),
            });
        }
        Ok(command)
    }
}

impl Command {
    pub fn verb(&self) -> &'static str {
        match self {
            Command::PenDown { .. } => "PEN_DOWN",
            Command::PenMove { .. } => "PEN_MOVE",
            Command::PenUp => "PEN_UP",
            Command::GetCursor => "GET_CURSOR",
            Command::Delay(_) => "DELAY",
        }
    }
}

fn point(verb: &'static str, fields: &mut SplitWhitespace<'_>) -> Result<(i32, i32), ParseError> {
    let x = number(verb, "x", fields)?;
    let y = number(verb, "y", fields)?;
    Ok((x, y))
}

fn number<T: FromStr>(
    verb: &'static str,
    field: &'static str,
    fields: &mut SplitWhitespace<'_>,
) -> Result<T, ParseError> {
    let raw = fields.next().ok_or(ParseError::MissingField { verb, field })?;
    raw.parse().map_err(|_| ParseError::InvalidNumber {
        verb,
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse_line("PEN_DOWN 10 20"),
            Ok(Some(Command::PenDown { x: 10, y: 20 }))
        );
        assert_eq!(
            Command::parse_line("  PEN_MOVE\t702   936 "),
            Ok(Some(Command::PenMove { x: 702, y: 936 }))
        );
        assert_eq!(Command::parse_line("PEN_UP"), Ok(Some(Command::PenUp)));
        assert_eq!(Command::parse_line("GET_CURSOR\r"), Ok(Some(Command::GetCursor)));
        assert_eq!(
            Command::parse_line("DELAY 50"),
            Ok(Some(Command::Delay(Duration::from_millis(50))))
        );
    }

    #[test]
    fn test_negative_coordinates_are_accepted() {
        // Clamped by the transformer, not rejected here.
        assert_eq!(
            Command::parse_line("PEN_MOVE -5 99999"),
            Ok(Some(Command::PenMove { x: -5, y: 99999 }))
        );
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(Command::parse_line(""), Ok(None));
        assert_eq!(Command::parse_line("   "), Ok(None));
        assert_eq!(Command::parse_line("# stroke 3"), Ok(None));
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            Command::parse_line("GARBAGE"),
            Err(ParseError::UnknownVerb("GARBAGE".into()))
        );
        assert_eq!(
            Command::parse_line("pen_up"),
            Err(ParseError::UnknownVerb("pen_up".into()))
        );
        assert_eq!(
            Command::parse_line("PEN_DOWN 10"),
            Err(ParseError::MissingField { verb: "PEN_DOWN", field: "y" })
        );
        assert_eq!(
            Command::parse_line("PEN_MOVE 1.5 2"),
            Err(ParseError::InvalidNumber {
                verb: "PEN_MOVE",
                field: "x",
                value: "1.5".into()
            })
        );
        assert_eq!(
            Command::parse_line("PEN_UP now"),
            Err(ParseError::TrailingInput { verb: "PEN_UP", rest: "now".into() })
        );
        assert!(Command::parse_line("DELAY -1").is_err());
    }
}
