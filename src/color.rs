use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            // Start at violet so the first series matches the accent colour.
            let hue = (260.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.70, 0.58);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Fixed colours
// ---------------------------------------------------------------------------

pub const ACCENT: Color32 = Color32::from_rgb(139, 92, 246);
pub const STATIONS: Color32 = Color32::from_rgb(6, 182, 212);
pub const POOR: Color32 = Color32::from_rgb(239, 68, 68);
pub const GOOD: Color32 = Color32::from_rgb(16, 185, 129);

/// Conventional colour for an air-quality status / AQI category name.
pub fn status_color(status: &str) -> Color32 {
    match status {
        "Good" => Color32::from_rgb(16, 185, 129),
        "Satisfactory" => Color32::from_rgb(132, 204, 22),
        "Moderate" => Color32::from_rgb(234, 179, 8),
        "Poor" => Color32::from_rgb(249, 115, 22),
        "Very Poor" => Color32::from_rgb(239, 68, 68),
        "Severe" => Color32::from_rgb(159, 18, 57),
        _ => Color32::GRAY,
    }
}

/// Badge colour for the top of a ranking.
pub fn rank_color(rank: usize) -> Color32 {
    match rank {
        0 => Color32::from_rgb(220, 38, 38),
        1 => Color32::from_rgb(234, 88, 12),
        2 => Color32::from_rgb(202, 138, 4),
        _ => Color32::from_rgb(75, 85, 99),
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category name → Color32
// ---------------------------------------------------------------------------

/// Maps category names (e.g. pollutant codes) to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from names in display order.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        let palette = generate_palette(names.len());
        let mapping = names
            .into_iter()
            .zip(palette)
            .map(|(name, c)| (name.to_string(), c))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given name.
    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping.get(name).copied().unwrap_or(self.default_color)
    }
}
