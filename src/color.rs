use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Outline palette
// ---------------------------------------------------------------------------

/// Scatter colour of the selected listings, `rgba(200, 30, 0, 160)`.
const HIGHLIGHT: [u8; 4] = [200, 30, 0, 160];

/// Hues stay inside `[30°, 330°)` so no outline reads as the red highlight.
const HUE_START: f32 = 30.0;
const HUE_SPAN: f32 = 300.0;

/// `n` outline colours with evenly spaced hues, sharing the highlight's
/// alpha so outlines and points blend the same way over the map.
pub fn outline_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = HUE_START + (i as f32 / n as f32) * HUE_SPAN;
            let rgb: Srgb = Hsl::new(hue, 0.65, 0.45).into_color();
            let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
            Color32::from_rgba_unmultiplied(
                channel(rgb.red),
                channel(rgb.green),
                channel(rgb.blue),
                HIGHLIGHT[3],
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: neighbourhood → Color32
// ---------------------------------------------------------------------------

/// Assigns each neighbourhood a distinct colour for the map.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(neighbourhoods: &[String]) -> Self {
        let mapping = neighbourhoods
            .iter()
            .cloned()
            .zip(outline_palette(neighbourhoods.len()))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::from_rgba_unmultiplied(
                HIGHLIGHT[0],
                HIGHLIGHT[1],
                HIGHLIGHT[2],
                HIGHLIGHT[3],
            ),
        }
    }

    pub fn color_for(&self, neighbourhood: &str) -> Color32 {
        self.mapping
            .get(neighbourhood)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// The colour used for the selected listings' scatter points.
    pub fn highlight(&self) -> Color32 {
        self.default_color
    }
}
