use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Blue colour scales for the bar charts
// ---------------------------------------------------------------------------

const BLUE_HUE: f32 = 212.0;

/// Colours for the with-suite / without-suite comparison bars.
pub const WITH_SUITE: Color32 = Color32::from_rgb(0x1f, 0x77, 0xb4);
pub const WITHOUT_SUITE: Color32 = Color32::from_rgb(0xff, 0x7f, 0x0e);

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Blue at position `t` in `[0, 1]`: pale for 0, deep for 1.
pub fn blue_at(t: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let lightness = 0.85 - 0.55 * t;
    hsl_to_color32(Hsl::new(BLUE_HUE, 0.70, lightness))
}

/// Generates `n` blues from deep to pale, one per category.
pub fn sequential_blues(n: usize) -> Vec<Color32> {
    match n {
        0 => Vec::new(),
        1 => vec![blue_at(1.0)],
        _ => (0..n)
            .map(|i| blue_at(1.0 - i as f32 / (n - 1) as f32))
            .collect(),
    }
}

/// Continuous blue scale: the colour of `value` within `[min, max]`.
pub fn blue_scale(value: f64, min: f64, max: f64) -> Color32 {
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return blue_at(1.0);
    }
    blue_at(((value - min) / range) as f32)
}
