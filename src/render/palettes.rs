//! Chart color palettes
//!
//! `palettes.json` is embedded at compile time and parsed once into plotters
//! colors. Categorical palettes color series and stacks by index (wrapping
//! after the last color); sequential palettes are sampled continuously for
//! heatmap cells and the color key.

use crate::error::{DashboardError, Result};
use once_cell::sync::Lazy;
use plotters::style::RGBColor;
use serde::Deserialize;
use std::collections::HashMap;

const PALETTES_JSON: &str = include_str!("../../palettes.json");

pub static PALETTE_REGISTRY: Lazy<PaletteRegistry> = Lazy::new(|| {
    PaletteRegistry::from_json(PALETTES_JSON).unwrap_or_else(|e| {
        tracing::error!("Failed to load palettes.json: {}", e);
        PaletteRegistry::default()
    })
});

pub const DEFAULT_CATEGORICAL_PALETTE: &str = "Palette-1";
pub const DEFAULT_SEQUENTIAL_PALETTE: &str = "Viridis";

const GRAY: RGBColor = RGBColor(128, 128, 128);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteKind {
    Categorical,
    Sequential,
}

/// Entry as written in palettes.json
#[derive(Deserialize)]
struct PaletteEntry {
    name: String,
    #[serde(rename = "type")]
    kind: PaletteKind,
    colors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Palette {
    pub name: String,
    pub kind: PaletteKind,
    colors: Vec<RGBColor>,
}

impl Palette {
    fn from_entry(entry: PaletteEntry) -> Result<Self> {
        let colors = entry
            .colors
            .iter()
            .map(|hex| {
                parse_hex_color(hex).ok_or_else(|| {
                    DashboardError::Config(format!(
                        "palette '{}': invalid color '{}'",
                        entry.name, hex
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: entry.name,
            kind: entry.kind,
            colors,
        })
    }

    /// Color of the `index`-th series
    pub fn series(&self, index: usize) -> RGBColor {
        if self.colors.is_empty() {
            return GRAY;
        }
        self.colors[index % self.colors.len()]
    }

    /// Color at `t` in [0, 1] along the palette, linearly blended between stops
    pub fn scale(&self, t: f64) -> RGBColor {
        let n = self.colors.len();
        if n < 2 {
            return self.series(0);
        }

        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (n - 1) as f64;
        let lower = (pos.floor() as usize).min(n - 2);
        let frac = pos - lower as f64;

        let RGBColor(r0, g0, b0) = self.colors[lower];
        let RGBColor(r1, g1, b1) = self.colors[lower + 1];
        let blend = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
        RGBColor(blend(r0, r1), blend(g0, g1), blend(b0, b1))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Palettes keyed by lowercase name
#[derive(Debug, Clone, Default)]
pub struct PaletteRegistry {
    palettes: HashMap<String, Palette>,
}

impl PaletteRegistry {
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<PaletteEntry> = serde_json::from_str(json)?;
        let mut palettes = HashMap::with_capacity(entries.len());
        for entry in entries {
            let palette = Palette::from_entry(entry)?;
            palettes.insert(palette.name.to_lowercase(), palette);
        }
        tracing::debug!("Loaded {} palettes", palettes.len());
        Ok(Self { palettes })
    }

    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.palettes.get(&name.to_lowercase())
    }

    /// Palette `name` if it exists with the wanted kind, otherwise `default`
    pub fn resolve(&self, name: &str, kind: PaletteKind, default: &str) -> Result<&Palette> {
        match self.get(name) {
            Some(palette) if palette.kind == kind => return Ok(palette),
            Some(_) => tracing::warn!(
                "Palette '{}' is not {:?}, using '{}'",
                name,
                kind,
                default
            ),
            None => tracing::warn!("Unknown palette '{}', using '{}'", name, default),
        }

        self.get(default).ok_or_else(|| {
            DashboardError::Config(format!("default palette '{}' not found", default))
        })
    }
}

/// `#RRGGBB`, with optional `#` and an ignored alpha byte
fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !matches!(digits.len(), 6 | 8) {
        return None;
    }
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF0000"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_hex_color("1F78B4"), Some(RGBColor(31, 120, 180)));
        assert_eq!(parse_hex_color("#440154FF"), Some(RGBColor(68, 1, 84)));
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("GGGGGG"), None);
    }

    #[test]
    fn test_embedded_palettes() {
        let palette = PALETTE_REGISTRY.get("palette-1").unwrap();
        assert_eq!(palette.kind, PaletteKind::Categorical);
        assert_eq!(palette.series(0), RGBColor(31, 120, 180));
        assert_eq!(palette.series(1), RGBColor(227, 26, 28));
        assert_eq!(palette.series(palette.len()), palette.series(0));
    }

    #[test]
    fn test_scale_endpoints() {
        let viridis = PALETTE_REGISTRY.get("Viridis").unwrap();
        assert_eq!(viridis.scale(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis.scale(1.0), RGBColor(253, 231, 37));
        assert_eq!(viridis.scale(2.0), RGBColor(253, 231, 37));
        assert_eq!(viridis.scale(f64::NAN), RGBColor(68, 1, 84));
    }

    #[test]
    fn test_invalid_color_rejected() {
        let json = r##"[{"name": "Bad", "type": "categorical", "colors": ["#12"]}]"##;
        assert!(PaletteRegistry::from_json(json).is_err());
    }

    #[test]
    fn test_resolve_falls_back() {
        let registry = &*PALETTE_REGISTRY;
        let blues = registry
            .resolve("Blues", PaletteKind::Sequential, DEFAULT_SEQUENTIAL_PALETTE)
            .unwrap();
        assert_eq!(blues.name, "Blues");

        let wrong_kind = registry
            .resolve("Set1", PaletteKind::Sequential, DEFAULT_SEQUENTIAL_PALETTE)
            .unwrap();
        assert_eq!(wrong_kind.name, "Viridis");

        let unknown = registry
            .resolve("nope", PaletteKind::Categorical, DEFAULT_CATEGORICAL_PALETTE)
            .unwrap();
        assert_eq!(unknown.name, "Palette-1");
    }
}
