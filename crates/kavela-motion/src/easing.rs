//! CSS-compatible timing functions for reveal transitions and smooth scrolling.
//!
//! ```
//! use kavela_motion::easing::EasingFunction;
//!
//! let ease = EasingFunction::EaseOut;
//! let progress = ease.evaluate(0.5);
//! assert!(progress > 0.5);
//! ```

/// Maps linear progress in `[0, 1]` to eased progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EasingFunction {
    Linear,
    /// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`
    #[default]
    Ease,
    /// `cubic-bezier(0.42, 0, 1, 1)`
    EaseIn,
    /// `cubic-bezier(0, 0, 0.58, 1)`
    EaseOut,
    /// `cubic-bezier(0.42, 0, 0.58, 1)`
    EaseInOut,
    /// Custom curve; x values must be in `[0, 1]`.
    CubicBezier { x1: f32, y1: f32, x2: f32, y2: f32 },
}

impl EasingFunction {
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(*x1, *y1, *x2, *y2, t),
        }
    }

    /// Custom curve, or `None` when an x control point leaves `[0, 1]`.
    pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32) -> Option<Self> {
        ((0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2))
            .then_some(Self::CubicBezier { x1, y1, x2, y2 })
    }

    /// Look up a named curve as written in configuration.
    ///
    /// Accepts both `ease_out` and `ease-out` spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "linear" => Some(Self::Linear),
            "ease" => Some(Self::Ease),
            "ease_in" => Some(Self::EaseIn),
            "ease_out" => Some(Self::EaseOut),
            "ease_in_out" => Some(Self::EaseInOut),
            _ => None,
        }
    }
}

/// Newton-Raphson solve for the curve parameter at `progress`, then sample y.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_component(y1, y2, t)
}

fn solve_bezier_x(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;
    for _ in 0..8 {
        let x = bezier_component(x1, x2, t) - target_x;
        if x.abs() < 1e-6 {
            break;
        }
        let dx = bezier_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }
    t
}

/// `3(1-t)²t·p1 + 3(1-t)t²·p2 + t³`
#[inline]
fn bezier_component(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

#[inline]
fn bezier_derivative(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_endpoints_for_every_named_curve() {
        for name in ["linear", "ease", "ease_in", "ease-out", "ease_in_out"] {
            let ease = EasingFunction::from_name(name).unwrap();
            assert!(approx_eq(ease.evaluate(0.0), 0.0), "{name} at 0");
            assert!(approx_eq(ease.evaluate(1.0), 1.0), "{name} at 1");
        }
        assert!(EasingFunction::from_name("bounce").is_none());
    }

    #[test]
    fn test_ease_out_front_loads_progress() {
        let ease = EasingFunction::EaseOut;
        assert!(ease.evaluate(0.25) > 0.25);
        assert!(ease.evaluate(0.5) > 0.5);
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let ease = EasingFunction::EaseInOut;
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(0.25) + ease.evaluate(0.75), 1.0));
    }

    #[test]
    fn test_ease_is_monotonic() {
        let ease = EasingFunction::Ease;
        let mut previous = 0.0;
        for step in 1..=20 {
            let value = ease.evaluate(step as f32 / 20.0);
            assert!(value >= previous, "ease dipped at step {step}");
            previous = value;
        }
    }

    #[test]
    fn test_custom_bezier_validation() {
        assert!(EasingFunction::cubic_bezier(0.4, 0.0, 0.2, 1.0).is_some());
        assert!(EasingFunction::cubic_bezier(1.4, 0.0, 0.2, 1.0).is_none());
        let linear = EasingFunction::cubic_bezier(0.0, 0.0, 1.0, 1.0).unwrap();
        assert!(approx_eq(linear.evaluate(0.5), 0.5));
    }

    #[test]
    fn test_clamping() {
        let ease = EasingFunction::Ease;
        assert!(approx_eq(ease.evaluate(-0.5), 0.0));
        assert!(approx_eq(ease.evaluate(1.5), 1.0));
    }
}
