//! Easing descriptors and their progress-remapping evaluation.
//!
//! The preset curves delegate to the `keyframe` crate's standard timing
//! functions; custom curves evaluate a CSS-style cubic bezier by solving
//! X(t) = p with Newton-Raphson, then returning Y(t).

use glam::DVec2;
use keyframe::EasingFunction;
use serde::{Deserialize, Serialize};

/// How progress is remapped between two keyframes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Step function: holds the left keyframe's value for the whole segment.
    Hold,
    /// Custom cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1).
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Easing {
    /// Remaps linear progress `p` in `[0,1]` to eased progress.
    pub fn eval(&self, p: f64) -> f64 {
        match self {
            Easing::Linear => keyframe::functions::Linear.y(p),
            Easing::EaseIn => keyframe::functions::EaseIn.y(p),
            Easing::EaseOut => keyframe::functions::EaseOut.y(p),
            Easing::EaseInOut => keyframe::functions::EaseInOut.y(p),
            Easing::Hold => 0.0,
            Easing::CubicBezier { x1, y1, x2, y2 } => {
                solve_cubic_bezier(DVec2::new(*x1, *y1), DVec2::new(*x2, *y2), p)
            }
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::Linear
    }
}

/// Solves a cubic bezier timing curve for the eased Y at input X = `x`.
///
/// There is no closed form for t given X, so this runs Newton-Raphson on
/// X(t) to a 1e-5 tolerance with a derivative guard, matching standard
/// CSS timing-function implementations.
pub fn solve_cubic_bezier(p1: DVec2, p2: DVec2, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let mut t = x;
    for _ in 0..8 {
        let one_minus_t = 1.0 - t;
        let x_est = 3.0 * one_minus_t * one_minus_t * t * p1.x
            + 3.0 * one_minus_t * t * t * p2.x
            + t * t * t;

        let err = x_est - x;
        if err.abs() < 1e-5 {
            break;
        }

        let dx_dt = 3.0 * one_minus_t * one_minus_t * p1.x
            + 6.0 * one_minus_t * t * (p2.x - p1.x)
            + 3.0 * t * t * (1.0 - p2.x);

        if dx_dt.abs() < 1e-6 {
            break;
        }
        t -= err / dx_dt;
    }
    t = t.clamp(0.0, 1.0);

    let one_minus_t = 1.0 - t;
    3.0 * one_minus_t * one_minus_t * t * p1.y + 3.0 * one_minus_t * t * t * p2.y + t * t * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_is_identity() {
        assert_eq!(Easing::Linear.eval(0.25), 0.25);
        assert_eq!(Easing::Linear.eval(1.0), 1.0);
    }

    #[test]
    fn hold_never_advances() {
        assert_eq!(Easing::Hold.eval(0.0), 0.0);
        assert_eq!(Easing::Hold.eval(0.999), 0.0);
    }

    #[test]
    fn presets_pin_the_endpoints() {
        for e in [Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert!(e.eval(0.0).abs() < 1e-6);
            assert!((e.eval(1.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn ease_in_starts_slow_ease_out_starts_fast() {
        assert!(Easing::EaseIn.eval(0.25) < 0.25);
        assert!(Easing::EaseOut.eval(0.25) > 0.25);
    }

    #[test]
    fn custom_bezier_linear_control_points_are_identity() {
        let e = Easing::CubicBezier {
            x1: 1.0 / 3.0,
            y1: 1.0 / 3.0,
            x2: 2.0 / 3.0,
            y2: 2.0 / 3.0,
        };
        for p in [0.0, 0.1, 0.5, 0.9, 1.0] {
            assert!((e.eval(p) - p).abs() < 1e-3, "p={p}");
        }
    }

    #[test]
    fn custom_bezier_matches_css_ease_shape() {
        // cubic-bezier(0.42, 0, 0.58, 1) is symmetric around the midpoint.
        let e = Easing::CubicBezier {
            x1: 0.42,
            y1: 0.0,
            x2: 0.58,
            y2: 1.0,
        };
        assert!((e.eval(0.5) - 0.5).abs() < 1e-3);
        assert!(e.eval(0.2) < 0.2);
        assert!(e.eval(0.8) > 0.8);
    }

    #[test]
    fn solver_clamps_outside_domain() {
        let p1 = DVec2::new(0.42, 0.0);
        let p2 = DVec2::new(0.58, 1.0);
        assert_eq!(solve_cubic_bezier(p1, p2, -0.5), 0.0);
        assert_eq!(solve_cubic_bezier(p1, p2, 1.5), 1.0);
    }
}
