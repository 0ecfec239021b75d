use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, StroopError};

/// 24-bit color. Serialized as `"#rrggbb"`; `[r, g, b]` is also accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hue in `[0, 1)`, full saturation and value.
    pub fn from_hue(hue: f64) -> Self {
        let h = hue.rem_euclid(1.0) * 6.0;
        let x = 1.0 - (h % 2.0 - 1.0).abs();
        let (r, g, b) = match h as u8 {
            0 => (1.0, x, 0.0),
            1 => (x, 1.0, 0.0),
            2 => (0.0, 1.0, x),
            3 => (0.0, x, 1.0),
            4 => (x, 0.0, 1.0),
            _ => (1.0, 0.0, x),
        };
        let scale = |c: f64| (c * 255.0).round() as u8;
        Self::new(scale(r), scale(g), scale(b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = StroopError;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(StroopError::config(format!("'{s}' is not a #rrggbb color")));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| StroopError::config(format!("'{s}': {e}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Channels([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => s.parse().map_err(serde::de::Error::custom),
            Repr::Channels([r, g, b]) => Ok(Rgb::new(r, g, b)),
        }
    }
}

/// A named color the player can be asked about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorEntry {
    pub name: String,
    pub color: Rgb,
}

impl ColorEntry {
    pub fn new(name: impl Into<String>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

pub fn default_colors() -> Vec<ColorEntry> {
    vec![
        ColorEntry::new("Red", Rgb::new(220, 40, 40)),
        ColorEntry::new("Green", Rgb::new(40, 200, 70)),
        ColorEntry::new("Blue", Rgb::new(50, 90, 235)),
        ColorEntry::new("Yellow", Rgb::new(240, 220, 40)),
        ColorEntry::new("Magenta", Rgb::new(220, 60, 220)),
        ColorEntry::new("Cyan", Rgb::new(40, 210, 220)),
        ColorEntry::new("White", Rgb::new(245, 245, 245)),
        ColorEntry::new("Orange", Rgb::new(255, 150, 20)),
    ]
}

/// Validated, immutable list of colors. Names are unique ignoring case and
/// no two entries share a color.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCatalog {
    entries: Vec<ColorEntry>,
}

impl ColorCatalog {
    pub fn new(entries: Vec<ColorEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(StroopError::config("color catalog is empty"));
        }

        let mut names = HashSet::new();
        let mut colors = HashSet::new();
        for entry in &entries {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(StroopError::config(format!(
                    "color {} has an empty name",
                    entry.color
                )));
            }
            if !names.insert(name.to_lowercase()) {
                return Err(StroopError::config(format!(
                    "duplicate color name '{name}'"
                )));
            }
            if !colors.insert(entry.color) {
                return Err(StroopError::config(format!(
                    "color {} is used by more than one entry ('{name}')",
                    entry.color
                )));
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ColorEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ColorCatalog {
    fn default() -> Self {
        Self {
            entries: default_colors(),
        }
    }
}
