use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

const CUTOFF_HUE: f32 = 225.0; // royal blue
const RATIO_HUE: f32 = 39.0; // orange
const FILL_HUE: f32 = 120.0; // green

fn hsl_color(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Line colours of the trend chart for the active theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesColors {
    pub cutoff: Color32,
    pub ratio: Color32,
    pub fill: Color32,
}

impl SeriesColors {
    /// Same hues in both themes; lighter on a dark background.
    pub fn for_theme(dark_mode: bool) -> Self {
        let lightness = if dark_mode { 0.68 } else { 0.45 };
        SeriesColors {
            cutoff: hsl_color(CUTOFF_HUE, 0.75, lightness),
            ratio: hsl_color(RATIO_HUE, 0.95, lightness),
            fill: hsl_color(FILL_HUE, 0.6, lightness),
        }
    }
}
