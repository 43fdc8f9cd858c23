//! Declarative animation steps and timelines.
//!
//! An [`AnimationStep`] describes one `from → to` interpolation over one or
//! more targets. Steps are immutable once built; the builder validates them.
//! A [`Timeline`] is an explicit ordered list of steps with start offsets,
//! interpreted by the [`TimelinePlayer`](crate::TimelinePlayer).
//!
//! ```
//! use glide_motion::{AnimationStep, ElementId, Property};
//!
//! let step = AnimationStep::builder([ElementId(0)])
//!     .from_to(Property::Opacity, 0.0, 1.0)
//!     .from_to(Property::Y, 50.0, 0.0)
//!     .duration(0.8)
//!     .ease_named("power3.out")
//!     .build()
//!     .unwrap();
//! assert_eq!(step.total_duration(), 0.8);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::error::{MotionError, Result};
use crate::types::{ElementId, Property, PropertyValue, StepId};

/// How many times a step plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// Play once.
    #[default]
    Once,
    /// Play once, then repeat `n` more times.
    Times(u32),
    /// Loop until cancelled.
    Forever,
}

impl Repeat {
    /// Whether another cycle should start after `completed` repeats.
    pub fn should_repeat(&self, completed: u32) -> bool {
        match self {
            Self::Once => false,
            Self::Times(n) => completed < *n,
            Self::Forever => true,
        }
    }
}

/// One interpolation over a set of targets.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationStep {
    id: StepId,
    targets: Vec<ElementId>,
    from: BTreeMap<Property, PropertyValue>,
    to: BTreeMap<Property, PropertyValue>,
    duration: f64,
    delay: f64,
    ease: Easing,
    stagger: f64,
    repeat: Repeat,
}

impl AnimationStep {
    pub fn builder(targets: impl IntoIterator<Item = ElementId>) -> AnimationStepBuilder {
        AnimationStepBuilder::new(targets)
    }

    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn targets(&self) -> &[ElementId] {
        &self.targets
    }

    pub fn from_values(&self) -> &BTreeMap<Property, PropertyValue> {
        &self.from
    }

    pub fn to_values(&self) -> &BTreeMap<Property, PropertyValue> {
        &self.to
    }

    /// Animated properties with their `from` and `to` values.
    pub fn properties(&self) -> impl Iterator<Item = (&Property, &PropertyValue, &PropertyValue)> {
        self.from
            .iter()
            .filter_map(|(prop, from)| self.to.get(prop).map(|to| (prop, from, to)))
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn ease(&self) -> Easing {
        self.ease
    }

    pub fn stagger(&self) -> f64 {
        self.stagger
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    /// Start time of the target at `index`, relative to `play`.
    pub fn target_offset(&self, index: usize) -> f64 {
        self.delay + self.stagger * index as f64
    }

    /// Time from `play` until the last target reaches its `to` values
    /// (one cycle, ignoring repeats).
    pub fn total_duration(&self) -> f64 {
        let last = self.targets.len().saturating_sub(1);
        self.target_offset(last) + self.duration
    }
}

/// Builder for [`AnimationStep`].
#[derive(Debug, Clone)]
pub struct AnimationStepBuilder {
    targets: Vec<ElementId>,
    from: BTreeMap<Property, PropertyValue>,
    to: BTreeMap<Property, PropertyValue>,
    duration: f64,
    delay: f64,
    ease: Easing,
    ease_error: Option<MotionError>,
    stagger: f64,
    repeat: Repeat,
}

impl AnimationStepBuilder {
    fn new(targets: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            from: BTreeMap::new(),
            to: BTreeMap::new(),
            duration: 0.5,
            delay: 0.0,
            ease: Easing::default(),
            ease_error: None,
            stagger: 0.0,
            repeat: Repeat::Once,
        }
    }

    pub fn from(mut self, property: Property, value: impl Into<PropertyValue>) -> Self {
        self.from.insert(property, value.into());
        self
    }

    pub fn to(mut self, property: Property, value: impl Into<PropertyValue>) -> Self {
        self.to.insert(property, value.into());
        self
    }

    pub fn from_to(
        self,
        property: Property,
        from: impl Into<PropertyValue>,
        to: impl Into<PropertyValue>,
    ) -> Self {
        self.from(property.clone(), from).to(property, to)
    }

    /// Duration in seconds.
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    /// Delay before the first target starts, in seconds.
    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = seconds;
        self
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = ease;
        self
    }

    /// Parse a named ease. A bad name is reported by [`build`](Self::build).
    pub fn ease_named(mut self, name: &str) -> Self {
        match name.parse() {
            Ok(ease) => self.ease = ease,
            Err(err) => self.ease_error = Some(err),
        }
        self
    }

    /// Seconds between successive targets' start times.
    pub fn stagger(mut self, seconds: f64) -> Self {
        self.stagger = seconds;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn build(self) -> Result<AnimationStep> {
        if let Some(err) = self.ease_error {
            return Err(err);
        }
        if self.targets.is_empty() {
            return Err(MotionError::EmptyTargets);
        }
        if !self.from.keys().eq(self.to.keys()) {
            let describe = |map: &BTreeMap<Property, PropertyValue>| {
                map.keys().map(Property::name).collect::<Vec<_>>().join(",")
            };
            return Err(MotionError::MismatchedProperties(format!(
                "from [{}] vs to [{}]",
                describe(&self.from),
                describe(&self.to)
            )));
        }
        for (field, value) in [
            ("duration", self.duration),
            ("delay", self.delay),
            ("stagger", self.stagger),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MotionError::InvalidTiming { field, value });
            }
        }

        Ok(AnimationStep {
            id: StepId::new(),
            targets: self.targets,
            from: self.from,
            to: self.to,
            duration: self.duration,
            delay: self.delay,
            ease: self.ease,
            stagger: self.stagger,
            repeat: self.repeat,
        })
    }
}

/// A step placed at an offset on a timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub offset: f64,
    pub step: AnimationStep,
}

/// Ordered list of steps, decoupled from their execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step that starts when the timeline's current content ends.
    pub fn then(mut self, step: AnimationStep) -> Self {
        let offset = self.end();
        self.entries.push(TimelineEntry { offset, step });
        self
    }

    /// Place a step at an absolute offset (seconds).
    pub fn at(mut self, offset: f64, step: AnimationStep) -> Self {
        self.entries.push(TimelineEntry {
            offset: offset.max(0.0),
            step,
        });
        self
    }

    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// End time of the latest-finishing entry.
    pub fn end(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.offset + e.step.total_duration())
            .fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
