//! Easing curves for route drawing

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    /// CSS `ease-in-out`, i.e. `cubic-bezier(0.42, 0, 0.58, 1)`
    EaseInOut,
    /// CSS `cubic-bezier(x1, y1, x2, y2)`
    CubicBezier(f32, f32, f32, f32),
}

impl Easing {
    /// Map linear progress (0.0 to 1.0) to eased progress
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        match *self {
            Easing::Linear => t,
            Easing::EaseInOut => solve_cubic_bezier(t, 0.42, 0.0, 0.58, 1.0),
            Easing::CubicBezier(x1, y1, x2, y2) => solve_cubic_bezier(t, x1, y1, x2, y2),
        }
    }
}

/// One coordinate of a unit cubic bezier whose outer control points are
/// fixed at 0 and 1.
#[inline]
fn bezier_axis(p: f64, c1: f64, c2: f64) -> f64 {
    let u = 1.0 - p;
    3.0 * u * u * p * c1 + 3.0 * u * p * p * c2 + p * p * p
}

#[inline]
fn bezier_axis_slope(p: f64, c1: f64, c2: f64) -> f64 {
    let u = 1.0 - p;
    3.0 * u * u * c1 + 6.0 * u * p * (c2 - c1) + 3.0 * p * p * (1.0 - c2)
}

/// Find the curve parameter whose x equals `t` and return its y.
///
/// Newton iterations first, bisection when the slope flattens out or Newton
/// leaves the unit interval.
fn solve_cubic_bezier(t: f32, x1: f32, y1: f32, x2: f32, y2: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let target = f64::from(t);
    let (x1, y1, x2, y2) = (
        f64::from(x1),
        f64::from(y1),
        f64::from(x2),
        f64::from(y2),
    );

    let mut p = target;
    for _ in 0..6 {
        let err = bezier_axis(p, x1, x2) - target;
        if err.abs() < 1e-6 {
            return bezier_axis(p, y1, y2) as f32;
        }
        let slope = bezier_axis_slope(p, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        p -= err / slope;
        if !(0.0..=1.0).contains(&p) {
            break;
        }
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    p = target;
    for _ in 0..32 {
        let x = bezier_axis(p, x1, x2);
        if (x - target).abs() < 1e-6 {
            break;
        }
        if x < target {
            lo = p;
        } else {
            hi = p;
        }
        p = 0.5 * (lo + hi);
    }

    bezier_axis(p, y1, y2) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in [
            Easing::Linear,
            Easing::EaseInOut,
            Easing::CubicBezier(0.4, 0.0, 0.2, 1.0),
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let e = Easing::EaseInOut;
        assert!((e.apply(0.5) - 0.5).abs() < 1e-4);
        assert!((e.apply(0.25) + e.apply(0.75) - 1.0).abs() < 1e-4);
        assert!(e.apply(0.1) < 0.1);
        assert!(e.apply(0.9) > 0.9);
    }

    #[test]
    fn test_monotonic() {
        let e = Easing::CubicBezier(0.4, 0.0, 0.2, 1.0);
        let mut prev = 0.0;
        for i in 1..=100 {
            let v = e.apply(i as f32 / 100.0);
            assert!(v + 1e-5 >= prev, "non-monotonic at {i}");
            prev = v;
        }
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_eq!(Easing::Linear.apply(-3.0), 0.0);
        assert_eq!(Easing::Linear.apply(7.0), 1.0);
        assert_eq!(Easing::EaseInOut.apply(f32::NAN), 0.0);
    }
}
