//! Hex RGB colors as the device expects them (`#RRGGBB`).

use crate::{Error, Result};
use serde::{Serialize, Serializer};
use std::str::FromStr;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(0xFF, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 0xFF, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 0xFF);
    pub const YELLOW: Color = Color::rgb(0xFF, 0xFF, 0);

    /// Creates a color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a hex color; the leading `#` is optional.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::rgb(r, g, b))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse_hex(s)
            .ok_or_else(|| Error::invalid(format!("invalid color {:?}, expected #RRGGBB", s)))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(Color::parse_hex("#FF0000"), Some(Color::RED));
        assert_eq!(Color::parse_hex("00ff00"), Some(Color::GREEN));
        assert_eq!(Color::parse_hex("#FFF"), None);
        assert_eq!(Color::parse_hex("invalid"), None);
        assert!("#12345G".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_is_uppercase_hex() {
        assert_eq!(Color::rgb(0x0a, 0xbc, 0x01).to_string(), "#0ABC01");
        assert_eq!(
            serde_json::to_value(Color::YELLOW).unwrap(),
            serde_json::json!("#FFFF00")
        );
    }
}
