//! Theme colors
//!
//! Each color id has a light and a dark variant. `colors.json` holds only the
//! ids the user changed:
//! ```json
//! { "accent": { "light": "#006666", "dark": "#649999" } }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;
use crate::overridable::{ApplyTarget, KeyPolicy, OverridableSet};

pub const FILE_NAME: &str = "colors.json";

/// Framework-agnostic 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Convert from hex u32 (0xRRGGBB)
    pub const fn from_hex(hex: u32) -> Self {
        Self::from_rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (leading `#` optional)
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        let a = if hex.len() == 8 { channel(6)? } else { 0xFF };
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }

    /// Channels scaled to 0.0..=1.0, for toolkits that want floats
    pub fn to_f32(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| c as f32 / 255.0)
    }
}

/// `#rrggbb`, with an alpha pair only when not opaque
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xFF {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s).ok_or_else(|| ConfigError::InvalidValue {
            key: s.to_string(),
            message: "expected #RRGGBB or #RRGGBBAA".to_string(),
        })
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Appearance {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemedColor {
    pub light: Color,
    pub dark: Color,
}

impl ThemedColor {
    pub const fn new(light: u32, dark: u32) -> Self {
        Self {
            light: Color::from_hex(light),
            dark: Color::from_hex(dark),
        }
    }

    pub fn resolve(&self, appearance: Appearance) -> Color {
        match appearance {
            Appearance::Light => self.light,
            Appearance::Dark => self.dark,
        }
    }
}

/// Built-in palette: (id, title, light, dark)
pub const COLORS: &[(&str, &str, u32, u32)] = &[
    ("background", "Background", 0xeeeeee, 0x303030),
    ("on_background", "On Background", 0x000000, 0xdddddd),
    ("content", "Content", 0xf8f8f8, 0x202020),
    ("on_content", "On Content", 0x000000, 0xdddddd),
    ("banding", "Banding", 0xebebdc, 0x2a2a2a),
    ("divider", "Divider", 0xc0c0c0, 0x666666),
    ("header", "Header", 0x2b2b2b, 0x404040),
    ("on_header", "On Header", 0xffffff, 0xc0c0c0),
    ("editable", "Editable", 0xffffff, 0x181818),
    ("on_editable", "On Editable", 0x0000a0, 0x649999),
    ("selection", "Selection", 0x0060a0, 0x0060a0),
    ("on_selection", "On Selection", 0xffffff, 0xffffff),
    ("inactive_selection", "Inactive Selection", 0x004080, 0x004080),
    ("search_match", "Search Match", 0xffd700, 0x8a7400),
    ("accent", "Accent", 0x006666, 0x649999),
    ("warning", "Warning", 0xe07000, 0xc06000),
    ("error", "Error", 0xc04040, 0x732525),
    ("page", "Page", 0xffffff, 0x101010),
    ("on_page", "On Page", 0x000000, 0xa0a0a0),
    ("link", "Link", 0x739925, 0x00cc66),
];

static FACTORY: Lazy<Arc<BTreeMap<String, ThemedColor>>> = Lazy::new(|| {
    Arc::new(
        COLORS
            .iter()
            .map(|&(id, _, light, dark)| (id.to_string(), ThemedColor::new(light, dark)))
            .collect(),
    )
});

pub type ThemeColors = OverridableSet<ThemedColor>;

pub fn factory() -> Arc<BTreeMap<String, ThemedColor>> {
    Arc::clone(&FACTORY)
}

pub fn default_colors() -> ThemeColors {
    OverridableSet::shared(factory(), KeyPolicy::Closed)
}

pub fn color_title(id: &str) -> Option<&'static str> {
    COLORS.iter().find(|c| c.0 == id).map(|c| c.1)
}

/// Colors resolved for one appearance, ready for a renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    pub appearance: Appearance,
    pub colors: BTreeMap<String, Color>,
}

impl Palette {
    pub fn new(appearance: Appearance) -> Self {
        Self {
            appearance,
            colors: BTreeMap::new(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Color> {
        self.colors.get(id).copied()
    }
}

impl ApplyTarget<ThemedColor> for Palette {
    fn apply(&mut self, id: &str, value: &ThemedColor) {
        self.colors.insert(id.to_string(), value.resolve(self.appearance));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let color = Color::parse_hex("#3b82f6").unwrap();
        assert_eq!(color, Color::from_rgb(0x3b, 0x82, 0xf6));
        assert_eq!(Color::parse_hex("3B82F680").unwrap().a, 0x80);
        assert!(Color::parse_hex("#3b82f").is_none());
        assert!(Color::parse_hex("#zzzzzz").is_none());
        assert!(Color::parse_hex("#ééé").is_none());
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(Color::from_hex(0x006666).to_string(), "#006666");
        let translucent = Color { a: 0x40, ..Color::from_hex(0xff0000) };
        assert_eq!(translucent.to_string(), "#ff000040");
    }

    #[test]
    fn test_to_f32() {
        let [r, g, b, a] = Color::from_hex(0xff0000).to_f32();
        assert_eq!((r, g, b, a), (1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_override_written_as_light_dark_pair() {
        let mut colors = default_colors();
        colors
            .set(
                "accent",
                ThemedColor {
                    light: Color::from_hex(0x112233),
                    dark: Color::from_hex(0x445566),
                },
            )
            .unwrap();
        let json = colors.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["accent"]["light"], "#112233");
        assert_eq!(value["accent"]["dark"], "#445566");
        assert_eq!(value.as_object().map(|o| o.len()), Some(1));
    }

    #[test]
    fn test_bad_hex_in_file_rejects_whole_file() {
        let mut colors = default_colors();
        let result = colors.merge_json(r##"{"accent": {"light": "#nothex", "dark": "#000000"}}"##);
        assert!(result.is_err());
        assert!(colors.is_default());
    }

    #[test]
    fn test_palette_resolves_appearance() {
        let colors = default_colors();
        let mut dark = Palette::new(Appearance::Dark);
        colors.apply(&mut dark);
        assert_eq!(dark.colors.len(), COLORS.len());
        assert_eq!(dark.get("accent"), Some(Color::from_hex(0x649999)));

        let mut light = Palette::new(Appearance::Light);
        colors.apply(&mut light);
        assert_eq!(light.get("accent"), Some(Color::from_hex(0x006666)));
    }

    #[test]
    fn test_titles() {
        assert_eq!(color_title("on_header"), Some("On Header"));
        assert_eq!(color_title("nope"), None);
    }
}
