use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Sequential palette generator
// ---------------------------------------------------------------------------

/// Generates `n` colours sweeping from deep violet (low) to yellow (high),
/// close to the plasma scale used by most plotting tools.
pub fn sequential_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.5 } else { i as f32 / (n - 1) as f32 };
            let hue = 270.0 + t * 150.0; // 270° → 420° (= 60°), through magenta and red
            let lightness = 0.35 + t * 0.25;
            let hsl = Hsl::new(hue % 360.0, 0.85, lightness);
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
// Continuous colour scale: numeric value → Color32
// ---------------------------------------------------------------------------

/// Maps a numeric range onto a fixed number of palette steps.
#[derive(Debug, Clone)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
    steps: Vec<Color32>,
}

impl ColorScale {
    /// Build a scale over the finite values in `values`.
    pub fn from_values(values: impl Iterator<Item = f64>, steps: usize) -> Self {
        let (min, max) = values
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let (min, max) = if min.is_finite() { (min, max) } else { (0.0, 1.0) };
        Self::new(min, max, steps)
    }

    pub fn new(min: f64, max: f64, steps: usize) -> Self {
        ColorScale {
            min,
            max,
            steps: sequential_palette(steps.max(1)),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Step index for `value`; out-of-range values clamp to the ends.
    pub fn bucket(&self, value: f64) -> usize {
        let span = self.max - self.min;
        if !value.is_finite() || span.abs() < f64::EPSILON {
            return 0;
        }
        let t = ((value - self.min) / span).clamp(0.0, 1.0);
        ((t * self.steps.len() as f64) as usize).min(self.steps.len() - 1)
    }

    pub fn color(&self, bucket: usize) -> Color32 {
        self.steps
            .get(bucket)
            .copied()
            .unwrap_or(Color32::GRAY)
    }

    /// Value range `[lo, hi)` covered by a bucket, for legends.
    pub fn bucket_range(&self, bucket: usize) -> (f64, f64) {
        let w = (self.max - self.min) / self.steps.len() as f64;
        let lo = self.min + bucket as f64 * w;
        (lo, lo + w)
    }
}
