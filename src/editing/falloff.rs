//! Strength falloff curves for terrain edits.

/// A piecewise-linear curve evaluated over a normalized parameter.
///
/// Keys are `(position, value)` pairs kept sorted by position. Evaluation
/// clamps to the first and last key outside their range, so a single-key
/// curve is a constant.
#[derive(Clone, Debug)]
pub struct FalloffCurve {
    keys: Vec<(f32, f32)>,
}

impl FalloffCurve {
    /// A curve that returns the same value everywhere.
    pub fn constant(value: f32) -> Self {
        FalloffCurve {
            keys: vec![(0.0, value)],
        }
    }

    /// Builds a curve from `(position, value)` keys.
    ///
    /// Keys are sorted by position; an empty key list yields a constant 1.0
    /// curve so that edits without a configured falloff apply full strength.
    pub fn from_keys(mut keys: Vec<(f32, f32)>) -> Self {
        if keys.is_empty() {
            return Self::constant(1.0);
        }
        keys.sort_by(|a, b| a.0.total_cmp(&b.0));
        FalloffCurve { keys }
    }

    /// Evaluates the curve at `t`, interpolating linearly between keys.
    pub fn evaluate(&self, t: f32) -> f32 {
        let first = self.keys[0];
        if t <= first.0 {
            return first.1;
        }
        let last = self.keys[self.keys.len() - 1];
        if t >= last.0 {
            return last.1;
        }

        for window in self.keys.windows(2) {
            let (p0, v0) = window[0];
            let (p1, v1) = window[1];
            if t <= p1 {
                let span = p1 - p0;
                if span <= f32::EPSILON {
                    return v1;
                }
                let fraction = (t - p0) / span;
                return v0 + (v1 - v0) * fraction;
            }
        }
        last.1
    }
}

impl Default for FalloffCurve {
    fn default() -> Self {
        Self::constant(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_curve_is_flat() {
        let curve = FalloffCurve::constant(0.6);
        assert_eq!(curve.evaluate(-1.0), 0.6);
        assert_eq!(curve.evaluate(0.5), 0.6);
        assert_eq!(curve.evaluate(10.0), 0.6);
    }

    #[test]
    fn evaluation_interpolates_between_keys() {
        let curve = FalloffCurve::from_keys(vec![(0.0, 0.0), (1.0, 1.0)]);
        assert!((curve.evaluate(0.25) - 0.25).abs() < 1e-6);
        assert!((curve.evaluate(0.75) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn evaluation_clamps_outside_the_key_range() {
        let curve = FalloffCurve::from_keys(vec![(0.2, 1.0), (0.8, 0.0)]);
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert_eq!(curve.evaluate(1.0), 0.0);
    }

    #[test]
    fn keys_are_sorted_on_construction() {
        let curve = FalloffCurve::from_keys(vec![(1.0, 0.0), (0.0, 1.0)]);
        assert_eq!(curve.evaluate(0.0), 1.0);
        assert_eq!(curve.evaluate(1.0), 0.0);
        assert!((curve.evaluate(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_keys_fall_back_to_full_strength() {
        let curve = FalloffCurve::from_keys(Vec::new());
        assert_eq!(curve.evaluate(0.5), 1.0);
    }
}
