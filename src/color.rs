//! HSL colour model and conversion to RGB.

/// RGB triple in the 0..=1 range (sRGB encoded)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Convert from sRGB encoding to linear light, for sRGB render targets
    pub fn to_linear(self) -> Self {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }

    /// RGBA array with opaque alpha
    pub fn to_rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

/// Hue/saturation/lightness triple
///
/// Hue is in degrees and wraps at 360 (negative hues wrap too).
/// Saturation and lightness are fractions and are clamped to 0..=1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub hue_deg: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Hsl {
    pub fn new(hue_deg: f32, saturation: f32, lightness: f32) -> Self {
        Self {
            hue_deg,
            saturation,
            lightness,
        }
    }

    /// Fully saturated, mid-lightness colour for a hue (`hsl(h, 100%, 50%)`)
    pub fn vivid(hue_deg: f32) -> Self {
        Self::new(hue_deg, 1.0, 0.5)
    }

    /// Hue normalised into [0, 360)
    pub fn wrapped_hue(&self) -> f32 {
        self.hue_deg.rem_euclid(360.0)
    }

    pub fn to_rgb(self) -> Color {
        let h = self.wrapped_hue() / 360.0;
        let s = self.saturation.clamp(0.0, 1.0);
        let l = self.lightness.clamp(0.0, 1.0);

        if s == 0.0 {
            return Color::new(l, l, l);
        }

        let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Color::new(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }
}

impl From<Hsl> for Color {
    fn from(hsl: Hsl) -> Self {
        hsl.to_rgb()
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}
