//! Core engine types.
//!
//! This module defines the fundamental types shared by every subsystem:
//! - `ElementId`: reference to an element in the [`Document`](crate::Document)
//! - Handle types returned by registrations (`PlaybackHandle`, `TriggerHandle`, ...)
//! - `Property` / `PropertyValue`: what is animated and the value it holds
//! - `PlaybackState` / `Direction`: runtime state of a playback

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Reference to an element owned by a [`Document`](crate::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Generate a new unique handle.
            pub fn new() -> Self {
                static COUNTER: AtomicU64 = AtomicU64::new(1);
                Self(COUNTER.fetch_add(1, Ordering::Relaxed))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_handle!(
    /// Identity of a built [`AnimationStep`](crate::AnimationStep).
    StepId
);
define_handle!(
    /// Handle to a running playback in the [`TimelinePlayer`](crate::TimelinePlayer).
    PlaybackHandle
);
define_handle!(
    /// Subscription handle returned by the intersection tracker.
    TriggerHandle
);
define_handle!(
    /// Subscription handle returned by the scroll-progress mapper.
    ProgressHandle
);
define_handle!(
    /// Subscription handle returned by the pointer tracker.
    PointerHandle
);
define_handle!(
    /// Identity of a [`SectionScope`](crate::SectionScope) opened on a stage.
    ScopeId
);

/// Current state of a playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Created, still inside its delay.
    #[default]
    Pending,
    /// Actively interpolating.
    Running,
    /// Reached its end (or its start, when reversed).
    Finished,
    /// Stopped before completion.
    Cancelled,
}

/// Direction the playback clock runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// A visual property the engine can write to an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    /// Horizontal translation.
    X,
    /// Vertical translation.
    Y,
    Scale,
    /// Rotation in degrees.
    Rotate,
    RotateX,
    RotateY,
    /// CSS-like filter string, usually a template such as `blur({}px)`.
    Filter,
    StrokeDashoffset,
    /// Any other named property.
    Custom(String),
}

impl Property {
    /// Scalar the property has when nothing has been written to it yet.
    pub fn default_scalar(&self) -> f64 {
        match self {
            Self::Opacity | Self::Scale => 1.0,
            _ => 0.0,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Opacity => "opacity",
            Self::X => "x",
            Self::Y => "y",
            Self::Scale => "scale",
            Self::Rotate => "rotate",
            Self::RotateX => "rotateX",
            Self::RotateY => "rotateY",
            Self::Filter => "filter",
            Self::StrokeDashoffset => "strokeDashoffset",
            Self::Custom(name) => name,
        }
    }

    /// Returns true for properties that end up in the element transform.
    pub fn is_transform(&self) -> bool {
        matches!(
            self,
            Self::X | Self::Y | Self::Scale | Self::Rotate | Self::RotateX | Self::RotateY
        )
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Property {
    fn from(name: &str) -> Self {
        match name {
            "opacity" => Self::Opacity,
            "x" => Self::X,
            "y" => Self::Y,
            "scale" => Self::Scale,
            "rotate" => Self::Rotate,
            "rotateX" => Self::RotateX,
            "rotateY" => Self::RotateY,
            "filter" => Self::Filter,
            "strokeDashoffset" => Self::StrokeDashoffset,
            other => Self::Custom(other.to_string()),
        }
    }
}

/// Value held by an animated property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    /// Plain number (opacity, pixels, degrees).
    Number { value: f64 },
    /// A scalar rendered through a template, e.g. `blur({}px)` or `{}%`.
    /// The first `{}` is replaced by the scalar.
    Templated { template: String, value: f64 },
    /// Non-interpolable keyword such as `auto`.
    Keyword { value: String },
}

impl PropertyValue {
    pub fn number(value: f64) -> Self {
        Self::Number { value }
    }

    pub fn templated(template: impl Into<String>, value: f64) -> Self {
        Self::Templated {
            template: template.into(),
            value,
        }
    }

    /// Percentage value, rendered as `{value}%`.
    pub fn percent(value: f64) -> Self {
        Self::templated("{}%", value)
    }

    /// Blur filter, rendered as `blur({value}px)`.
    pub fn blur(px: f64) -> Self {
        Self::templated("blur({}px)", px)
    }

    pub fn keyword(value: impl Into<String>) -> Self {
        Self::Keyword {
            value: value.into(),
        }
    }

    /// Try to extract a plain number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number { value } => Some(*value),
            _ => None,
        }
    }

    /// The interpolatable scalar of this value, if any.
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Self::Number { value } | Self::Templated { value, .. } => Some(*value),
            Self::Keyword { .. } => None,
        }
    }

    /// Same shape, different scalar. Keywords are returned unchanged.
    pub fn with_scalar(&self, scalar: f64) -> Self {
        match self {
            Self::Number { .. } => Self::Number { value: scalar },
            Self::Templated { template, .. } => Self::Templated {
                template: template.clone(),
                value: scalar,
            },
            Self::Keyword { .. } => self.clone(),
        }
    }

    /// Render the value the way it would be written to a style attribute.
    pub fn render(&self) -> String {
        match self {
            Self::Number { value } => value.to_string(),
            Self::Templated { template, value } => template.replacen("{}", &value.to_string(), 1),
            Self::Keyword { value } => value.clone(),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number { value }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_uniqueness() {
        let a = PlaybackHandle::new();
        let b = PlaybackHandle::new();
        assert_ne!(a, b);

        let s1 = StepId::new();
        let s2 = StepId::new();
        assert_ne!(s1, s2);
    }

    #[test]
    fn test_playback_state_default() {
        assert_eq!(PlaybackState::default(), PlaybackState::Pending);
        assert_eq!(Direction::default().flipped(), Direction::Backward);
    }

    #[test]
    fn test_property_names_roundtrip() {
        for prop in [
            Property::Opacity,
            Property::X,
            Property::Y,
            Property::Scale,
            Property::RotateX,
            Property::Filter,
            Property::StrokeDashoffset,
        ] {
            assert_eq!(Property::from(prop.name()), prop);
        }
        assert_eq!(
            Property::from("letterSpacing"),
            Property::Custom("letterSpacing".to_string())
        );
    }

    #[test]
    fn test_property_defaults() {
        assert_eq!(Property::Opacity.default_scalar(), 1.0);
        assert_eq!(Property::Scale.default_scalar(), 1.0);
        assert_eq!(Property::Y.default_scalar(), 0.0);
        assert!(Property::RotateY.is_transform());
        assert!(!Property::Filter.is_transform());
    }

    #[test]
    fn test_value_render() {
        assert_eq!(PropertyValue::number(0.5).render(), "0.5");
        assert_eq!(PropertyValue::blur(4.0).render(), "blur(4px)");
        assert_eq!(PropertyValue::percent(100.0).render(), "100%");
        assert_eq!(PropertyValue::keyword("auto").render(), "auto");
    }

    #[test]
    fn test_value_scalar_access() {
        let v = PropertyValue::blur(2.5);
        assert_eq!(v.scalar(), Some(2.5));
        assert_eq!(v.as_number(), None);
        assert_eq!(v.with_scalar(7.0), PropertyValue::blur(7.0));
        assert_eq!(PropertyValue::keyword("auto").scalar(), None);
    }
}
