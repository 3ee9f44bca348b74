use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Categorical palette: pie slices, box-plot groups
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Diverging scale: correlation heatmaps
// ---------------------------------------------------------------------------

/// Colour for a coefficient in `[-1, 1]`: blue → grey → red, blended in
/// linear light. NaN and infinities map to a flat grey.
pub fn diverging(value: f64) -> Color32 {
    if !value.is_finite() {
        return Color32::GRAY;
    }
    let t = ((value.clamp(-1.0, 1.0) + 1.0) / 2.0) as f32;

    let cold: LinSrgb = Srgb::new(0.23f32, 0.30, 0.75).into_linear();
    let neutral: LinSrgb = Srgb::new(0.87f32, 0.87, 0.87).into_linear();
    let warm: LinSrgb = Srgb::new(0.71f32, 0.02, 0.15).into_linear();

    let mixed = if t < 0.5 {
        cold.mix(neutral, t * 2.0)
    } else {
        neutral.mix(warm, (t - 0.5) * 2.0)
    };
    to_color32(Srgb::from_linear(mixed))
}

/// Black or white, whichever reads better on `background`.
pub fn contrasting_text(background: Color32) -> Color32 {
    let luma = 0.299 * background.r() as f32
        + 0.587 * background.g() as f32
        + 0.114 * background.b() as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size() {
        assert!(generate_palette(0).is_empty());
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        assert_ne!(colors[0], colors[1]);
    }

    #[test]
    fn test_diverging_ends() {
        let low = diverging(-1.0);
        let high = diverging(1.0);
        assert!(low.b() > low.r());
        assert!(high.r() > high.b());
        assert_eq!(diverging(f64::NAN), Color32::GRAY);
        assert_eq!(diverging(5.0), high);
    }

    #[test]
    fn test_contrasting_text() {
        assert_eq!(contrasting_text(Color32::WHITE), Color32::BLACK);
        assert_eq!(contrasting_text(Color32::BLACK), Color32::WHITE);
    }
}
