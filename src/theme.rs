//! Brand colours for front-ends rendering TTZ data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::errors::AppError;

/// A `#RGB` or `#RRGGBB` colour, stored as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(String);

impl Color {
    /// Expanded `(r, g, b)` components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = &self.0[1..];
        let channel = |i: usize, width: usize| {
            let raw = u8::from_str_radix(&hex[i * width..i * width + width], 16).unwrap_or(0);
            if width == 1 { raw * 17 } else { raw }
        };
        let width = if hex.len() == 3 { 1 } else { 2 };
        (channel(0, width), channel(1, width), channel(2, width))
    }
}

impl FromStr for Color {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| AppError::Config(format!("colour '{}' must start with '#'", s)))?;
        if !matches!(hex.len(), 3 | 6) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AppError::Config(format!("colour '{}' is not #RGB or #RRGGBB", s)));
        }
        Ok(Color(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = AppError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub info: Color,
    /// Extra named colours beyond the four semantic slots.
    #[serde(flatten)]
    pub custom: BTreeMap<String, Color>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub icon_font: String,
    pub light: Palette,
}

impl Theme {
    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn color(s: &str) -> Color {
    // Only called with the literals below, all of which are well-formed.
    Color(s.to_string())
}

impl Default for Theme {
    fn default() -> Self {
        let custom = [
            ("gold", "#f6dea6"),
            ("green", "#009933"),
            ("bluegrey", "#607d8b"),
            ("white", "#fff"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), color(v)))
        .collect();

        Theme {
            icon_font: "md".to_string(),
            light: Palette {
                primary: color("#AB000B"),   // red
                secondary: color("#607d8b"), // blue-gray
                success: color("#009933"),
                info: color("#F2BE31"),      // gold
                custom,
            },
        }
    }
}
