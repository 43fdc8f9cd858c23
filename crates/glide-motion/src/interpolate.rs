//! Interpolation between property values.
//!
//! Numbers interpolate linearly. Templated values interpolate their scalar
//! and keep the template, so `blur(0px)` → `blur(10px)` passes through
//! `blur(5px)`. Keywords cannot be interpolated; callers check
//! [`interpolable`] first and skip the property otherwise.

use crate::types::PropertyValue;

/// Trait for types that can be interpolated between two values.
pub trait Interpolate: Sized {
    /// Interpolate between self and `to`.
    ///
    /// When t = 0.0, returns self. When t = 1.0, returns `to`.
    /// Values outside [0, 1] extrapolate.
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

#[inline]
fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for PropertyValue {
    /// Both values must have the same shape. On mismatch, returns self unchanged.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        match (self, to) {
            (Self::Number { value: from }, Self::Number { value: to_val }) => Self::Number {
                value: from.interpolate(to_val, t),
            },
            (
                Self::Templated {
                    template,
                    value: from,
                },
                Self::Templated {
                    template: to_template,
                    value: to_val,
                },
            ) if template == to_template => Self::Templated {
                template: template.clone(),
                value: from.interpolate(to_val, t),
            },
            _ => self.clone(),
        }
    }
}

/// Returns true when `from` can be interpolated towards `to`.
pub fn interpolable(from: &PropertyValue, to: &PropertyValue) -> bool {
    match (from, to) {
        (PropertyValue::Number { value: a }, PropertyValue::Number { value: b }) => {
            a.is_finite() && b.is_finite()
        }
        (
            PropertyValue::Templated {
                template: ta,
                value: a,
            },
            PropertyValue::Templated {
                template: tb,
                value: b,
            },
        ) => ta == tb && a.is_finite() && b.is_finite(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 0.0001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_f64_interpolation() {
        let from = 0.0_f64;
        let to = 100.0_f64;

        assert!(approx_eq(from.interpolate(&to, 0.0), 0.0));
        assert!(approx_eq(from.interpolate(&to, 0.25), 25.0));
        assert!(approx_eq(from.interpolate(&to, 0.5), 50.0));
        assert!(approx_eq(from.interpolate(&to, 1.0), 100.0));
    }

    #[test]
    fn test_extrapolation() {
        let from = 0.0_f64;
        let to = 100.0_f64;
        assert!(approx_eq(from.interpolate(&to, 1.5), 150.0));
        assert!(approx_eq(from.interpolate(&to, -0.5), -50.0));
    }

    #[test]
    fn test_number_values() {
        let from = PropertyValue::number(-50.0);
        let to = PropertyValue::number(50.0);
        let mid = from.interpolate(&to, 0.5);
        assert_eq!(mid.as_number(), Some(0.0));
    }

    #[test]
    fn test_templated_values() {
        let from = PropertyValue::blur(0.0);
        let to = PropertyValue::blur(10.0);
        let mid = from.interpolate(&to, 0.5);
        assert_eq!(mid, PropertyValue::blur(5.0));
        assert_eq!(mid.render(), "blur(5px)");
    }

    #[test]
    fn test_mismatch_returns_self() {
        let from = PropertyValue::number(3.0);
        let to = PropertyValue::percent(10.0);
        assert_eq!(from.interpolate(&to, 0.5), from);

        let from = PropertyValue::blur(1.0);
        let to = PropertyValue::percent(10.0);
        assert_eq!(from.interpolate(&to, 0.5), from);
    }

    #[test]
    fn test_interpolable() {
        assert!(interpolable(
            &PropertyValue::number(0.0),
            &PropertyValue::number(1.0)
        ));
        assert!(interpolable(
            &PropertyValue::percent(100.0),
            &PropertyValue::percent(0.0)
        ));
        assert!(!interpolable(
            &PropertyValue::blur(0.0),
            &PropertyValue::percent(0.0)
        ));
        assert!(!interpolable(
            &PropertyValue::keyword("auto"),
            &PropertyValue::number(1.0)
        ));
        assert!(!interpolable(
            &PropertyValue::number(f64::NAN),
            &PropertyValue::number(1.0)
        ));
    }
}
