/// Piecewise-linear curve over `[0,1]` used to weight brush strength by distance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FalloffCurve {
    keys: Vec<(f32, f32)>,
}

impl FalloffCurve {
    /// 0 at the brush edge rising to 1 at its centre.
    pub fn linear() -> Self {
        Self {
            keys: vec![(0.0, 0.0), (1.0, 1.0)],
        }
    }

    pub fn from_keys(keys: &[[f32; 2]]) -> Self {
        let mut keys: Vec<(f32, f32)> = keys.iter().map(|[t, v]| (*t, *v)).collect();
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { keys }
    }

    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }

    /// Samples the curve; with no keys the curve is a constant 1.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 1.0;
        };
        let v = if t <= first.0 {
            first.1
        } else if t >= last.0 {
            last.1
        } else {
            let i = self.keys.partition_point(|k| k.0 <= t);
            let (t0, v0) = self.keys[i - 1];
            let (t1, v1) = self.keys[i];
            if t1 - t0 <= f32::EPSILON {
                v1
            } else {
                v0 + (v1 - v0) * (t - t0) / (t1 - t0)
            }
        };
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_curve_is_one() {
        let c = FalloffCurve::default();
        assert_eq!(c.evaluate(0.0), 1.0);
        assert_eq!(c.evaluate(0.7), 1.0);
    }

    #[test]
    fn interpolates_between_keys() {
        let c = FalloffCurve::from_keys(&[[1.0, 1.0], [0.0, 0.0], [0.5, 0.25]]);
        assert_eq!(c.keys()[0], (0.0, 0.0));
        assert!((c.evaluate(0.25) - 0.125).abs() < 1e-6);
        assert!((c.evaluate(0.75) - 0.625).abs() < 1e-6);
        assert_eq!(c.evaluate(2.0), 1.0);
        assert_eq!(c.evaluate(-1.0), 0.0);
        assert_eq!(c.evaluate(f32::NAN), 0.0);
    }

    #[test]
    fn output_is_clamped() {
        let c = FalloffCurve::from_keys(&[[0.0, -2.0], [1.0, 3.0]]);
        assert_eq!(c.evaluate(0.0), 0.0);
        assert_eq!(c.evaluate(1.0), 1.0);
    }
}
