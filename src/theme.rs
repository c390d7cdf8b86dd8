//! Theme loading: `theme[key]="value"` lines and hex → ratatui Color.

use crate::catalog::{CATALOG, CATALOG_LEN};
use crate::render::Paint;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Piece colours (catalog order) and UI colours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub pieces: [Color; CATALOG_LEN],
    /// Playfield background.
    pub bg: Color,
    /// Board border.
    pub border: Color,
    /// Score and help text.
    pub text: Color,
    /// Titles.
    pub title: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            pieces: CATALOG.map(|e| parse_hex(e.color).unwrap_or(Color::White)),
            bg: Color::Rgb(0, 0, 0),
            border: Color::Rgb(0x3F, 0x44, 0x4F),
            text: Color::Rgb(0xAB, 0xB2, 0xBF),
            title: Color::Rgb(0xE5, 0xC0, 0x7B),
        }
    }
}

impl Theme {
    /// Load overrides from a file; keys are `piece0`..`piece6`, `background`,
    /// `border`, `text` and `title`. No path means the default theme.
    pub fn load(path: Option<&Path>) -> Result<Self, ThemeError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let s = std::fs::read_to_string(path)?;
        Self::from_map(&parse_theme_file(&s))
    }

    fn from_map(map: &HashMap<String, String>) -> Result<Self, ThemeError> {
        let mut theme = Self::default();
        let get = |key: &str| map.get(key).map(|v| parse_hex(v)).transpose();
        for (i, slot) in theme.pieces.iter_mut().enumerate() {
            if let Some(c) = get(format!("piece{i}").as_str())? {
                *slot = c;
            }
        }
        if let Some(c) = get("background")? {
            theme.bg = c;
        }
        if let Some(c) = get("border")? {
            theme.border = c;
        }
        if let Some(c) = get("text")? {
            theme.text = c;
        }
        if let Some(c) = get("title")? {
            theme.title = c;
        }
        Ok(theme)
    }

    /// Terminal colour for a render token.
    #[inline]
    pub fn paint(&self, paint: Paint) -> Color {
        match paint {
            Paint::Background => self.bg,
            Paint::Piece(i) => self.pieces[i % CATALOG_LEN],
        }
    }
}

/// Parse theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("theme[") {
            if let Some(end) = stripped.find(']') {
                let key = stripped[..end].trim();
                let rest = stripped[end + 1..].trim();
                if let Some(eq) = rest.find('=') {
                    let value = rest[eq + 1..]
                        .trim()
                        .trim_matches('"')
                        .trim_matches('\'')
                        .to_string();
                    if !value.is_empty() {
                        map.insert(key.to_string(), value);
                    }
                }
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&s[range], 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))
    };
    let (r, g, b) = match s.len() {
        6 if s.is_ascii() => (channel(0..2)?, channel(2..4)?, channel(4..6)?),
        3 if s.is_ascii() => (channel(0..1)? * 17, channel(1..2)? * 17, channel(2..3)? * 17),
        _ => return Err(ThemeError::InvalidHex(s.to_string())),
    };
    Ok(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#9518E2").unwrap();
        assert!(matches!(c, Color::Rgb(0x95, 0x18, 0xE2)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("#GGGGGG").is_err());
    }

    #[test]
    fn test_parse_theme_line() {
        let map = parse_theme_file(r##"theme[background]="#101010""##);
        assert_eq!(map.get("background"), Some(&"#101010".to_string()));
    }

    #[test]
    fn test_default_matches_catalog() {
        let theme = Theme::default();
        assert_eq!(theme.paint(Paint::Piece(6)), Color::Rgb(0x1E, 0xBB, 0x95));
        assert_eq!(theme.paint(Paint::Background), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_overrides() {
        let map = parse_theme_file("theme[piece2]=\"#010203\"\ntheme[title]='#FFF'\n");
        let theme = Theme::from_map(&map).unwrap();
        assert_eq!(theme.pieces[2], Color::Rgb(1, 2, 3));
        assert_eq!(theme.title, Color::Rgb(255, 255, 255));
        assert_eq!(theme.pieces[0], Theme::default().pieces[0]);
    }

    #[test]
    fn test_bad_override_is_an_error() {
        let map = parse_theme_file("theme[border]=\"nope\"");
        assert!(matches!(Theme::from_map(&map), Err(ThemeError::InvalidHex(_))));
    }
}
