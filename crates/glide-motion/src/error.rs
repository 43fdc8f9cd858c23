//! Error types for the motion engine.
//!
//! Only construction-time mistakes are errors. Runtime degradation (detached
//! elements, properties that cannot be interpolated, coarse pointers) is
//! handled silently by the subsystems themselves.

use thiserror::Error;

use crate::types::ElementId;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, MotionError>;

/// Errors that can occur while building or registering animations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// An animation step was built without any target element.
    #[error("animation step has no targets")]
    EmptyTargets,

    /// `from` and `to` do not animate the same set of properties.
    #[error("from/to property sets differ: {0}")]
    MismatchedProperties(String),

    /// Duration, delay or stagger is negative or not finite.
    #[error("invalid timing: {field} = {value}")]
    InvalidTiming { field: &'static str, value: f64 },

    /// Trigger thresholds must satisfy `0 <= start < end <= 1`.
    #[error("invalid trigger thresholds: start {start}, end {end}")]
    InvalidThresholds { start: f64, end: f64 },

    /// Easing name could not be parsed.
    #[error("unknown ease: {0}")]
    UnknownEase(String),

    /// Scroll anchor such as `"top 80%"` could not be parsed.
    #[error("unknown scroll anchor: {0}")]
    UnknownAnchor(String),

    /// Element is not (or no longer) part of the document.
    #[error("unknown element {0}")]
    UnknownElement(ElementId),
}
