//! Scroll-progress mapping.
//!
//! Maps the scroll position within a tracked element's bounds to a progress
//! value in `[0, 1]` and forwards it to a callback on every update while the
//! element intersects the viewport. This backs parallax and blur-on-scroll
//! effects.
//!
//! Ranges are expressed with [`Anchor`]s: "element edge meets viewport
//! line". The default range starts when the element's top meets the
//! viewport bottom and ends when its bottom meets the viewport top.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::document::Document;
use crate::error::MotionError;
use crate::geometry::{FrameSnapshot, Rect};
use crate::types::{ElementId, ProgressHandle};

/// Callback receiving clamped progress.
pub type ProgressCallback = Box<dyn FnMut(f64)>;

/// A point where an element edge meets a viewport line.
///
/// Both fields are fractions: `edge` 0 is the element top and 1 its bottom;
/// `viewport` 0 is the viewport top and 1 its bottom.
///
/// Parses the usual two-word form, `"<edge> <viewport>"`, with keywords
/// `top`, `center`, `bottom` or percentages:
///
/// ```
/// use glide_motion::Anchor;
///
/// let anchor: Anchor = "top 80%".parse().unwrap();
/// assert_eq!(anchor, Anchor::new(0.0, 0.8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub edge: f64,
    pub viewport: f64,
}

impl Anchor {
    pub const fn new(edge: f64, viewport: f64) -> Self {
        Self { edge, viewport }
    }

    /// Scroll offset at which this anchor is met for `rect`.
    pub fn scroll_offset(&self, rect: &Rect, viewport_height: f64) -> f64 {
        rect.top() + self.edge * rect.height - self.viewport * viewport_height
    }
}

fn parse_position(word: &str) -> Option<f64> {
    match word {
        "top" => Some(0.0),
        "center" => Some(0.5),
        "bottom" => Some(1.0),
        _ => word
            .strip_suffix('%')
            .and_then(|n| n.parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .map(|n| n / 100.0),
    }
}

impl FromStr for Anchor {
    type Err = MotionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let parsed = match (words.next(), words.next(), words.next()) {
            (Some(edge), Some(viewport), None) => parse_position(edge).zip(parse_position(viewport)),
            _ => None,
        };
        parsed
            .map(|(edge, viewport)| Self::new(edge, viewport))
            .ok_or_else(|| MotionError::UnknownAnchor(s.to_string()))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% {}%", self.edge * 100.0, self.viewport * 100.0)
    }
}

/// Start and end anchors of a scroll range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollRange {
    pub start: Anchor,
    pub end: Anchor,
}

impl ScrollRange {
    pub const fn new(start: Anchor, end: Anchor) -> Self {
        Self { start, end }
    }

    /// Progress of `scroll_y` through this range for `rect`, clamped to [0, 1].
    pub fn progress(&self, rect: &Rect, snapshot: &FrameSnapshot) -> f64 {
        let start = self.start.scroll_offset(rect, snapshot.height);
        let end = self.end.scroll_offset(rect, snapshot.height);
        let span = end - start;
        if span <= 0.0 {
            return if snapshot.scroll_y >= start { 1.0 } else { 0.0 };
        }
        ((snapshot.scroll_y - start) / span).clamp(0.0, 1.0)
    }
}

impl Default for ScrollRange {
    /// Element top at viewport bottom to element bottom at viewport top.
    fn default() -> Self {
        Self::new(Anchor::new(0.0, 1.0), Anchor::new(1.0, 0.0))
    }
}

struct Tracked {
    handle: ProgressHandle,
    element: ElementId,
    range: ScrollRange,
    on_progress: ProgressCallback,
    was_intersecting: bool,
    last: Option<f64>,
}

/// Forwards per-element scroll progress to subscribers.
#[derive(Default)]
pub struct ScrollProgressMapper {
    tracked: Vec<Tracked>,
    last_timestamp: Option<f64>,
}

impl ScrollProgressMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track an element over the default range.
    pub fn track(&mut self, element: ElementId, on_progress: impl FnMut(f64) + 'static) -> ProgressHandle {
        self.track_range(element, ScrollRange::default(), on_progress)
    }

    pub fn track_range(
        &mut self,
        element: ElementId,
        range: ScrollRange,
        on_progress: impl FnMut(f64) + 'static,
    ) -> ProgressHandle {
        let handle = ProgressHandle::new();
        self.tracked.push(Tracked {
            handle,
            element,
            range,
            on_progress: Box::new(on_progress),
            was_intersecting: false,
            last: None,
        });
        handle
    }

    pub fn untrack(&mut self, handle: ProgressHandle) -> bool {
        let before = self.tracked.len();
        self.tracked.retain(|t| t.handle != handle);
        self.tracked.len() != before
    }

    /// Deliver progress for every tracked element that intersects the
    /// viewport, in registration order.
    ///
    /// The frame on which an element stops intersecting still delivers its
    /// clamped value so consumers settle on 0 or 1. Snapshots older than the
    /// last processed one are ignored.
    pub fn update(&mut self, doc: &Document, snapshot: FrameSnapshot) {
        if let Some(last) = self.last_timestamp {
            if snapshot.timestamp < last {
                trace!(timestamp = snapshot.timestamp, last, "ignoring stale snapshot");
                return;
            }
        }
        self.last_timestamp = Some(snapshot.timestamp);

        self.tracked.retain(|t| {
            let attached = doc.is_attached(t.element);
            if !attached {
                debug!(handle = t.handle.0, element = %t.element, "dropping progress callback for detached element");
            }
            attached
        });

        for tracked in &mut self.tracked {
            let Some(rect) = doc.rect(tracked.element) else {
                continue;
            };
            let intersecting = snapshot.intersects(&rect);
            if intersecting || tracked.was_intersecting {
                let progress = tracked.range.progress(&rect, &snapshot);
                tracked.last = Some(progress);
                (tracked.on_progress)(progress);
            }
            tracked.was_intersecting = intersecting;
        }
    }

    /// Last progress delivered for `handle`.
    pub fn progress(&self, handle: ProgressHandle) -> Option<f64> {
        self.tracked
            .iter()
            .find(|t| t.handle == handle)
            .and_then(|t| t.last)
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }
}

impl fmt::Debug for ScrollProgressMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollProgressMapper")
            .field("tracked", &self.tracked.len())
            .field("last_timestamp", &self.last_timestamp)
            .finish()
    }
}
