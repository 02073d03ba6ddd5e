//! Theme presets and resolution
//!
//! A `Theme` owns the four semantic colors a deck uses. The preset table is
//! built once and only ever read; concurrent lookups need no locking.
//! Resolution never fails: an unknown identifier falls back to a neutral
//! default so a bad theme id can never abort a compilation.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Normalized RGB color, each channel in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    /// Parse a `#RRGGBB` hex color into normalized channels
    ///
    /// Panics on malformed input; only called on the compiled-in preset
    /// table, so a bad value is a programming error caught by tests.
    fn from_hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        assert_eq!(hex.len(), 6, "hex color must be 6 digits: {hex}");
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).expect("invalid hex digit") as f64 / 255.0
        };
        Self {
            red: channel(0),
            green: channel(2),
            blue: channel(4),
        }
    }

    /// Wire encoding for the authoring service
    pub fn to_wire(&self) -> serde_json::Value {
        serde_json::json!({
            "red": self.red,
            "green": self.green,
            "blue": self.blue,
        })
    }
}

/// A named color preset for a deck
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub background: Rgb,
    pub title_text: Rgb,
    pub body_text: Rgb,
    pub shape_fill: Rgb,
}

/// Entry in the theme catalog, for caller-facing listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeChoice {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

fn preset(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    colors: [&str; 4],
) -> Theme {
    Theme {
        id,
        name,
        description,
        background: Rgb::from_hex(colors[0]),
        title_text: Rgb::from_hex(colors[1]),
        body_text: Rgb::from_hex(colors[2]),
        shape_fill: Rgb::from_hex(colors[3]),
    }
}

static PRESETS: LazyLock<Vec<Theme>> = LazyLock::new(|| {
    vec![
        preset(
            "corporate",
            "Corporate",
            "Clean and professional",
            ["#FFFFFF", "#003366", "#000000", "#E6EEF4"],
        ),
        preset(
            "elegant",
            "Elegant",
            "Soft, classy tones",
            ["#FDFDFD", "#5C5470", "#333333", "#EAEAEA"],
        ),
        preset(
            "vibrant",
            "Vibrant",
            "Energetic and colorful",
            ["#FFFBEC", "#FF6F00", "#212121", "#FFD180"],
        ),
        preset(
            "minimal",
            "Minimal",
            "Modern and clean",
            ["#FAFAFA", "#212121", "#424242", "#BDBDBD"],
        ),
        preset(
            "dark",
            "Dark Mode",
            "High contrast",
            ["#1E1E1E", "#F5F5F5", "#E0E0E0", "#333333"],
        ),
    ]
});

/// Neutral fallback used when the requested theme id is unknown
static DEFAULT_THEME: LazyLock<Theme> = LazyLock::new(|| {
    preset(
        "default",
        "Default",
        "Neutral fallback",
        ["#FFFFFF", "#1F1F1F", "#333333", "#EEEEEE"],
    )
});

/// Resolve a theme identifier to its preset
///
/// Unknown identifiers resolve to the neutral default rather than failing.
pub fn resolve(theme_id: &str) -> &'static Theme {
    match PRESETS.iter().find(|t| t.id == theme_id) {
        Some(theme) => theme,
        None => {
            debug!(theme_id, "resolve: unknown theme id, using default");
            &DEFAULT_THEME
        }
    }
}

/// List the available presets for caller-facing selection
pub fn choices() -> Vec<ThemeChoice> {
    PRESETS
        .iter()
        .map(|t| ThemeChoice {
            id: t.id,
            name: t.name,
            description: t.description,
        })
        .collect()
}
