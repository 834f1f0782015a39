/// Linear RGBA colour with components nominally in `[0,1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Rgba::WHITE
    }
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);
    pub const GREEN: Rgba = Rgba::new(0.0, 1.0, 0.0, 1.0);
    pub const CLEAR: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    #[inline]
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Hue, saturation and value of the colour channels; alpha is dropped.
    pub fn to_hsv(self) -> Hsv {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let delta = max - min;
        let s = if max > 0.0 { delta / max } else { 0.0 };
        let h = if delta <= 0.0 {
            0.0
        } else if max == self.r {
            ((self.g - self.b) / delta).rem_euclid(6.0) / 6.0
        } else if max == self.g {
            ((self.b - self.r) / delta + 2.0) / 6.0
        } else {
            ((self.r - self.g) / delta + 4.0) / 6.0
        };
        Hsv { h, s, v: max }
    }

    /// Largest per-channel HSV difference, hue measured around the wheel.
    /// Alpha takes part so fully transparent colours never match opaque ones.
    pub fn hsv_distance(self, other: Rgba) -> f32 {
        let a = self.to_hsv();
        let b = other.to_hsv();
        a.distance(b).max((self.a - other.a).abs())
    }

    /// Mask test used by painting. A zero tolerance accepts only the exact colour.
    pub fn matches(self, mask: Rgba, tolerance: f32) -> bool {
        self == mask || self.hsv_distance(mask) < tolerance
    }
}

/// Hue in `[0,1)`, saturation and value in `[0,1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: f32,
    pub v: f32,
}

impl Hsv {
    /// Hue difference is weighted by the lower saturation, so near-greys
    /// compare on saturation and value alone.
    pub fn distance(self, other: Hsv) -> f32 {
        let dh = (self.h - other.h).abs();
        let dh = dh.min(1.0 - dh) * self.s.min(other.s).clamp(0.0, 1.0);
        dh.max((self.s - other.s).abs()).max((self.v - other.v).abs())
    }
}
