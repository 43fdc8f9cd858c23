//! Viewport intersection tracking.
//!
//! The tracker watches the visible fraction of registered elements and calls
//! back when that fraction crosses a trigger's start threshold. It holds no
//! animation state of its own; callbacks decide what to play.
//!
//! # State machine
//!
//! ```text
//! one-shot:       Armed -> Fired (terminal until unregister)
//! repeat, scrub:  Armed -> Fired -> Armed -> Fired -> ...
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::document::Document;
use crate::error::{MotionError, Result};
use crate::geometry::FrameSnapshot;
use crate::types::{ElementId, TriggerHandle};

/// Callback invoked on threshold crossings.
pub type TriggerCallback = Box<dyn FnMut(&TriggerEvent)>;

/// Callback invoked with scrub progress in [0, 1].
pub type ScrubCallback = Box<dyn FnMut(f64)>;

/// How a trigger reacts to repeated crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Fire `on_enter` for the first upward crossing only.
    #[default]
    OneShot,
    /// Like `Repeat`, plus continuous progress between the thresholds.
    Scrub,
    /// Fire `on_enter` and `on_leave` on every crossing.
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPhase {
    Armed,
    Fired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crossing {
    Entering,
    Leaving,
}

/// Passed to `on_enter` / `on_leave`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerEvent {
    pub handle: TriggerHandle,
    pub element: ElementId,
    /// Visible fraction that caused the crossing.
    pub fraction: f64,
    pub crossing: Crossing,
}

/// A visibility trigger on one element.
///
/// ```
/// use glide_motion::{ElementId, TrackedTrigger, TriggerMode};
///
/// let trigger = TrackedTrigger::new(ElementId(3))
///     .start_threshold(0.2)
///     .mode(TriggerMode::Repeat)
///     .on_enter(|event| println!("entered at {:.2}", event.fraction));
/// assert_eq!(trigger.thresholds(), (0.2, 1.0));
/// ```
pub struct TrackedTrigger {
    element: ElementId,
    start: f64,
    end: f64,
    mode: TriggerMode,
    on_enter: Option<TriggerCallback>,
    on_leave: Option<TriggerCallback>,
    on_update: Option<ScrubCallback>,
}

impl TrackedTrigger {
    pub const DEFAULT_START: f64 = 0.1;
    pub const DEFAULT_END: f64 = 1.0;

    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            start: Self::DEFAULT_START,
            end: Self::DEFAULT_END,
            mode: TriggerMode::default(),
            on_enter: None,
            on_leave: None,
            on_update: None,
        }
    }

    pub fn start_threshold(mut self, fraction: f64) -> Self {
        self.start = fraction;
        self
    }

    pub fn end_threshold(mut self, fraction: f64) -> Self {
        self.end = fraction;
        self
    }

    pub fn mode(mut self, mode: TriggerMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn on_enter(mut self, callback: impl FnMut(&TriggerEvent) + 'static) -> Self {
        self.on_enter = Some(Box::new(callback));
        self
    }

    pub fn on_leave(mut self, callback: impl FnMut(&TriggerEvent) + 'static) -> Self {
        self.on_leave = Some(Box::new(callback));
        self
    }

    /// Progress callback; only called in [`TriggerMode::Scrub`].
    pub fn on_update(mut self, callback: impl FnMut(f64) + 'static) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn thresholds(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    pub fn trigger_mode(&self) -> TriggerMode {
        self.mode
    }

    /// Whether `fraction` is at or beyond the start threshold. A zero start
    /// threshold needs at least some of the element to be visible.
    fn is_past(&self, fraction: f64) -> bool {
        if self.start <= 0.0 {
            fraction > 0.0
        } else {
            fraction >= self.start
        }
    }

    fn scrub_progress(&self, fraction: f64) -> f64 {
        ((fraction - self.start) / (self.end - self.start)).clamp(0.0, 1.0)
    }
}

impl fmt::Debug for TrackedTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackedTrigger")
            .field("element", &self.element)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("mode", &self.mode)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_leave", &self.on_leave.is_some())
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

#[derive(Debug)]
struct Registration {
    handle: TriggerHandle,
    trigger: TrackedTrigger,
    phase: TriggerPhase,
    past: bool,
    last_fraction: Option<f64>,
}

/// Watches registered elements for threshold crossings.
#[derive(Debug, Default)]
pub struct IntersectionTracker {
    registrations: Vec<Registration>,
}

impl IntersectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger. Thresholds must satisfy `0 <= start < end <= 1`.
    pub fn register(&mut self, trigger: TrackedTrigger) -> Result<TriggerHandle> {
        let (start, end) = trigger.thresholds();
        let valid = (0.0..=1.0).contains(&start) && (0.0..=1.0).contains(&end) && start < end;
        if !valid {
            return Err(MotionError::InvalidThresholds { start, end });
        }

        let handle = TriggerHandle::new();
        trace!(handle = handle.0, element = %trigger.element, start, end, mode = ?trigger.mode, "trigger registered");
        self.registrations.push(Registration {
            handle,
            trigger,
            phase: TriggerPhase::Armed,
            past: false,
            last_fraction: None,
        });
        Ok(handle)
    }

    pub fn unregister(&mut self, handle: TriggerHandle) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.handle != handle);
        self.registrations.len() != before
    }

    /// Recompute visibility for every trigger and fire crossings, in
    /// registration order.
    pub fn update(&mut self, doc: &Document, snapshot: FrameSnapshot) {
        self.registrations.retain(|r| {
            let attached = doc.is_attached(r.trigger.element);
            if !attached {
                debug!(handle = r.handle.0, element = %r.trigger.element, "dropping trigger for detached element");
            }
            attached
        });

        for reg in &mut self.registrations {
            let Some(rect) = doc.rect(reg.trigger.element) else {
                continue;
            };
            let fraction = snapshot.visible_fraction(&rect);
            let past = reg.trigger.is_past(fraction);
            let crossed = past != reg.past;

            if crossed {
                reg.past = past;
                let crossing = if past {
                    Crossing::Entering
                } else {
                    Crossing::Leaving
                };
                let event = TriggerEvent {
                    handle: reg.handle,
                    element: reg.trigger.element,
                    fraction,
                    crossing,
                };

                match crossing {
                    Crossing::Entering => {
                        let spent = reg.trigger.mode == TriggerMode::OneShot
                            && reg.phase == TriggerPhase::Fired;
                        if !spent {
                            reg.phase = TriggerPhase::Fired;
                            trace!(handle = reg.handle.0, fraction, "trigger entered");
                            if let Some(on_enter) = reg.trigger.on_enter.as_mut() {
                                on_enter(&event);
                            }
                        }
                    }
                    Crossing::Leaving => {
                        if reg.trigger.mode != TriggerMode::OneShot
                            && reg.phase == TriggerPhase::Fired
                        {
                            reg.phase = TriggerPhase::Armed;
                            trace!(handle = reg.handle.0, fraction, "trigger left");
                            if let Some(on_leave) = reg.trigger.on_leave.as_mut() {
                                on_leave(&event);
                            }
                        }
                    }
                }
            }

            let changed = reg.last_fraction != Some(fraction);
            if reg.trigger.mode == TriggerMode::Scrub && changed && (past || crossed) {
                let progress = reg.trigger.scrub_progress(fraction);
                if let Some(on_update) = reg.trigger.on_update.as_mut() {
                    on_update(progress);
                }
            }
            reg.last_fraction = Some(fraction);
        }
    }

    pub fn phase(&self, handle: TriggerHandle) -> Option<TriggerPhase> {
        self.registrations
            .iter()
            .find(|r| r.handle == handle)
            .map(|r| r.phase)
    }

    pub fn contains(&self, handle: TriggerHandle) -> bool {
        self.registrations.iter().any(|r| r.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}
