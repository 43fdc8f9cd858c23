//! Easing curves for animation timing.
//!
//! Two families are supported:
//! - CSS timing functions (`ease`, `ease-in`, `ease-out`, `ease-in-out`,
//!   `cubic-bezier`, `steps`)
//! - Named tween curves (`none`, `power1`..`power4`, `back`) with `.in`,
//!   `.out` and `.inOut` variants, e.g. `power3.out` or `back.out(1.7)`
//!
//! Every curve maps 0 to exactly 0 and 1 to exactly 1, so a finished tween
//! lands on its target value without drift.
//!
//! ```
//! use glide_motion::easing::Easing;
//!
//! let ease: Easing = "power2.out".parse().unwrap();
//! assert_eq!(ease.evaluate(1.0), 1.0);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionError;

/// Overshoot used by `back` when no amount is given.
pub const DEFAULT_BACK_OVERSHOOT: f64 = 1.70158;

/// Position for stepped curves.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPosition {
    /// Jump at the start of each interval.
    Start,
    /// Jump at the end of each interval.
    #[default]
    End,
}

/// Which end of a named curve is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseKind {
    In,
    #[default]
    Out,
    InOut,
}

/// Time-remapping curve applied to linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Easing {
    /// No easing (`none` / `linear`).
    Linear,

    /// CSS `ease`, `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,

    /// CSS `ease-in`, `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,

    /// CSS `ease-out`, `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,

    /// CSS `ease-in-out`, `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,

    /// Custom cubic bezier curve. x values must be in [0, 1].
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },

    /// Stepped curve with `count` discrete jumps.
    Steps { count: u32, position: StepPosition },

    /// Polynomial curve. `power1` is quadratic, `power4` is quintic.
    Power { degree: u8, kind: EaseKind },

    /// Curve that overshoots by `overshoot` before settling.
    Back { overshoot: f64, kind: EaseKind },
}

impl Default for Easing {
    fn default() -> Self {
        Self::Power {
            degree: 1,
            kind: EaseKind::Out,
        }
    }
}

impl Easing {
    pub fn power(degree: u8, kind: EaseKind) -> Self {
        Self::Power { degree, kind }
    }

    pub fn back_out(overshoot: f64) -> Self {
        Self::Back {
            overshoot,
            kind: EaseKind::Out,
        }
    }

    /// Create a custom cubic bezier curve.
    ///
    /// # Panics
    /// Panics if x1 or x2 are outside [0, 1].
    pub fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&x1) && (0.0..=1.0).contains(&x2),
            "Bezier x values must be in [0, 1]"
        );
        Self::CubicBezier { x1, y1, x2, y2 }
    }

    /// Create a stepped curve.
    ///
    /// # Panics
    /// Panics if steps is 0.
    pub fn steps(steps: u32, position: StepPosition) -> Self {
        assert!(steps >= 1, "Steps must be at least 1");
        Self::Steps {
            count: steps,
            position,
        }
    }

    /// Evaluate the curve at progress `t`, clamped to [0, 1].
    ///
    /// The result may leave [0, 1] in between (`back`, some beziers) but is
    /// exactly 0 at `t = 0` and exactly 1 at `t = 1`.
    pub fn evaluate(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 {
            return 0.0;
        }
        if t == 1.0 {
            return 1.0;
        }

        match *self {
            Self::Linear => t,
            Self::Ease => cubic_bezier(0.25, 0.1, 0.25, 1.0, t),
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Self::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, t),
            Self::Steps { count, position } => stepped(count, position, t),
            Self::Power { degree, kind } => {
                let exponent = i32::from(degree) + 1;
                shaped(kind, t, |p| p.powi(exponent))
            }
            Self::Back { overshoot, kind } => {
                shaped(kind, t, |p| p * p * ((overshoot + 1.0) * p - overshoot))
            }
        }
    }
}

/// Apply an ease-in curve `f` as in, out (mirrored) or in-out (both halves).
fn shaped(kind: EaseKind, t: f64, f: impl Fn(f64) -> f64) -> f64 {
    match kind {
        EaseKind::In => f(t),
        EaseKind::Out => 1.0 - f(1.0 - t),
        EaseKind::InOut => {
            if t < 0.5 {
                f(t * 2.0) / 2.0
            } else {
                1.0 - f((1.0 - t) * 2.0) / 2.0
            }
        }
    }
}

impl FromStr for Easing {
    type Err = MotionError;

    /// Parse a curve name such as `none`, `ease-out`, `power3.out`,
    /// `power2` (defaults to `.out`) or `back.out(1.2)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let unknown = || MotionError::UnknownEase(name.to_string());

        match name {
            "none" | "linear" => return Ok(Self::Linear),
            "ease" => return Ok(Self::Ease),
            "ease-in" => return Ok(Self::EaseIn),
            "ease-out" => return Ok(Self::EaseOut),
            "ease-in-out" => return Ok(Self::EaseInOut),
            _ => {}
        }

        // Split off an optional `(amount)` argument.
        let (head, arg) = match name.split_once('(') {
            Some((head, rest)) => {
                let inner = rest.strip_suffix(')').ok_or_else(unknown)?;
                let amount = inner.trim().parse::<f64>().map_err(|_| unknown())?;
                (head, Some(amount))
            }
            None => (name, None),
        };

        let (family, kind) = match head.split_once('.') {
            Some((family, "in")) => (family, EaseKind::In),
            Some((family, "out")) => (family, EaseKind::Out),
            Some((family, "inOut")) => (family, EaseKind::InOut),
            Some(_) => return Err(unknown()),
            None => (head, EaseKind::Out),
        };

        match (family, arg) {
            ("back", amount) => Ok(Self::Back {
                overshoot: amount.unwrap_or(DEFAULT_BACK_OVERSHOOT),
                kind,
            }),
            (power, None) if power.starts_with("power") => {
                let degree = power["power".len()..]
                    .parse::<u8>()
                    .map_err(|_| unknown())?;
                if !(1..=4).contains(&degree) {
                    return Err(unknown());
                }
                Ok(Self::Power { degree, kind })
            }
            _ => Err(unknown()),
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = |kind: &EaseKind| match kind {
            EaseKind::In => "in",
            EaseKind::Out => "out",
            EaseKind::InOut => "inOut",
        };
        match self {
            Self::Linear => f.write_str("none"),
            Self::Ease => f.write_str("ease"),
            Self::EaseIn => f.write_str("ease-in"),
            Self::EaseOut => f.write_str("ease-out"),
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier { x1, y1, x2, y2 } => {
                write!(f, "cubic-bezier({x1}, {y1}, {x2}, {y2})")
            }
            Self::Steps { count, position } => {
                let pos = match position {
                    StepPosition::Start => "start",
                    StepPosition::End => "end",
                };
                write!(f, "steps({count}, {pos})")
            }
            Self::Power { degree, kind } => write!(f, "power{degree}.{}", suffix(kind)),
            Self::Back { overshoot, kind } => write!(f, "back.{}({overshoot})", suffix(kind)),
        }
    }
}

/// Evaluate a cubic bezier curve at progress `progress`.
///
/// Newton-Raphson finds the curve parameter whose x equals the progress,
/// then the y coordinate at that parameter is returned.
fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, progress: f64) -> f64 {
    let t = solve_bezier_x(x1, x2, progress);
    bezier_coord(y1, y2, t)
}

fn solve_bezier_x(x1: f64, x2: f64, target_x: f64) -> f64 {
    let mut t = target_x;

    for _ in 0..8 {
        let x = bezier_coord(x1, x2, t) - target_x;
        if x.abs() < 1e-7 {
            break;
        }

        let dx = bezier_x_derivative(x1, x2, t);
        if dx.abs() < 1e-7 {
            break;
        }

        t -= x / dx;
        t = t.clamp(0.0, 1.0);
    }

    t
}

/// c(t) = 3(1-t)²t·c1 + 3(1-t)t²·c2 + t³
#[inline]
fn bezier_coord(c1: f64, c2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * c1 + 3.0 * mt * t * t * c2 + t * t * t
}

/// dx/dt = 3(1-t)²·x1 + 6(1-t)t·(x2-x1) + 3t²·(1-x2)
#[inline]
fn bezier_x_derivative(x1: f64, x2: f64, t: f64) -> f64 {
    let mt = 1.0 - t;
    3.0 * mt * mt * x1 + 6.0 * mt * t * (x2 - x1) + 3.0 * t * t * (1.0 - x2)
}

fn stepped(steps: u32, position: StepPosition, t: f64) -> f64 {
    if steps == 0 {
        return t;
    }

    let steps_f = f64::from(steps);
    match position {
        StepPosition::Start => (t * steps_f).ceil() / steps_f,
        StepPosition::End => (t * steps_f).floor() / steps_f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn all_curves() -> Vec<Easing> {
        vec![
            Easing::Linear,
            Easing::Ease,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::cubic_bezier(0.4, 0.0, 0.2, 1.0),
            Easing::steps(4, StepPosition::End),
            Easing::power(1, EaseKind::Out),
            Easing::power(3, EaseKind::InOut),
            Easing::power(4, EaseKind::In),
            Easing::back_out(1.7),
            Easing::Back {
                overshoot: 1.2,
                kind: EaseKind::InOut,
            },
        ]
    }

    #[test]
    fn test_endpoints_are_exact() {
        for ease in all_curves() {
            assert_eq!(ease.evaluate(0.0), 0.0, "{ease} at 0");
            assert_eq!(ease.evaluate(1.0), 1.0, "{ease} at 1");
        }
    }

    #[test]
    fn test_linear() {
        let ease = Easing::Linear;
        assert_eq!(ease.evaluate(0.25), 0.25);
        assert_eq!(ease.evaluate(0.5), 0.5);
        assert_eq!(ease.evaluate(0.75), 0.75);
    }

    #[test]
    fn test_ease_in_out_symmetry() {
        let ease = Easing::EaseInOut;
        assert!(approx_eq(ease.evaluate(0.5), 0.5));
        assert!(approx_eq(ease.evaluate(0.25) + ease.evaluate(0.75), 1.0));
    }

    #[test]
    fn test_css_ease_midpoint() {
        let mid = Easing::Ease.evaluate(0.5);
        assert!(mid > 0.7 && mid < 0.9, "CSS ease mid-point should be ~0.8, got {mid}");
    }

    #[test]
    fn test_power_curves() {
        let out = Easing::power(2, EaseKind::Out);
        // 1 - (1 - 0.5)^3
        assert!(approx_eq(out.evaluate(0.5), 0.875));

        let inn = Easing::power(2, EaseKind::In);
        assert!(approx_eq(inn.evaluate(0.5), 0.125));

        let in_out = Easing::power(1, EaseKind::InOut);
        assert!(approx_eq(in_out.evaluate(0.5), 0.5));
        assert!(approx_eq(in_out.evaluate(0.25), 0.125));
    }

    #[test]
    fn test_back_overshoots() {
        let ease = Easing::back_out(1.7);
        let peak = (1..100)
            .map(|i| ease.evaluate(f64::from(i) / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0, "back.out should overshoot, peak {peak}");
    }

    #[test]
    fn test_steps_end() {
        let ease = Easing::steps(4, StepPosition::End);
        assert!(approx_eq(ease.evaluate(0.24), 0.0));
        assert!(approx_eq(ease.evaluate(0.25), 0.25));
        assert!(approx_eq(ease.evaluate(0.99), 0.75));
    }

    #[test]
    fn test_steps_start() {
        let ease = Easing::steps(4, StepPosition::Start);
        assert!(approx_eq(ease.evaluate(0.01), 0.25));
        assert!(approx_eq(ease.evaluate(0.26), 0.5));
    }

    #[test]
    fn test_clamping() {
        let ease = Easing::Ease;
        assert_eq!(ease.evaluate(-0.5), 0.0);
        assert_eq!(ease.evaluate(1.5), 1.0);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("none".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!("linear".parse::<Easing>().unwrap(), Easing::Linear);
        assert_eq!("ease-out".parse::<Easing>().unwrap(), Easing::EaseOut);
        assert_eq!(
            "power3.out".parse::<Easing>().unwrap(),
            Easing::power(3, EaseKind::Out)
        );
        assert_eq!(
            "power2".parse::<Easing>().unwrap(),
            Easing::power(2, EaseKind::Out)
        );
        assert_eq!(
            "power1.inOut".parse::<Easing>().unwrap(),
            Easing::power(1, EaseKind::InOut)
        );
        assert_eq!(
            "back.out(1.7)".parse::<Easing>().unwrap(),
            Easing::back_out(1.7)
        );
        assert_eq!(
            "back.in".parse::<Easing>().unwrap(),
            Easing::Back {
                overshoot: DEFAULT_BACK_OVERSHOOT,
                kind: EaseKind::In
            }
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        for bad in ["elastic.out", "power9.out", "power2.sideways", "back.out(x)", "power2(1)"] {
            let err = bad.parse::<Easing>().unwrap_err();
            assert!(matches!(err, MotionError::UnknownEase(_)), "{bad}");
        }
    }

    #[test]
    fn test_display_parses_back() {
        for ease in [
            Easing::Linear,
            Easing::power(3, EaseKind::Out),
            Easing::back_out(1.2),
        ] {
            assert_eq!(ease.to_string().parse::<Easing>().unwrap(), ease);
        }
    }

    #[test]
    fn test_default() {
        assert_eq!(Easing::default(), Easing::power(1, EaseKind::Out));
        assert_eq!(StepPosition::default(), StepPosition::End);
    }

    #[test]
    #[should_panic(expected = "Bezier x values must be in [0, 1]")]
    fn test_invalid_bezier_x1() {
        Easing::cubic_bezier(-0.1, 0.0, 0.5, 1.0);
    }

    #[test]
    #[should_panic(expected = "Steps must be at least 1")]
    fn test_invalid_steps() {
        Easing::steps(0, StepPosition::End);
    }
}
