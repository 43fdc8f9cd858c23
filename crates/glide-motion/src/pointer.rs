//! Pointer tracking.
//!
//! Raw pointer-move events are recorded as they arrive; subscribers are fed
//! once per display refresh from [`PointerTracker::tick`]. Smoothed
//! subscribers chase the latest raw sample with a fixed time constant, so the
//! result is frame-rate independent.
//!
//! The tracker also knows whether the pointer is inside the document.
//! Presence subscribers hear about enter and leave transitions on the next
//! tick; the first move counts as entering.
//!
//! Devices reporting coarse (touch-only) input are detected once, at
//! construction. On those the tracker is inert: it does not listen and never
//! invokes a subscriber.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::types::PointerHandle;

/// Distance below which a smoothed position snaps onto the raw sample.
const SETTLE_EPSILON: f64 = 0.01;

/// Callback receiving pointer samples.
pub type PointerCallback = Box<dyn FnMut(PointerSample)>;

/// Callback receiving `true` on enter and `false` on leave.
pub type PresenceCallback = Box<dyn FnMut(bool)>;

/// A pointer position in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub timestamp: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, timestamp: f64) -> Self {
        Self { x, y, timestamp }
    }
}

/// Input capabilities, as reported by the host once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerCapabilities {
    /// Only coarse (touch) pointers are available.
    pub coarse_only: bool,
}

impl PointerCapabilities {
    pub fn fine() -> Self {
        Self { coarse_only: false }
    }

    pub fn coarse() -> Self {
        Self { coarse_only: true }
    }
}

/// How a subscriber receives positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerMode {
    /// Latest raw sample, once per new sample.
    Raw,
    /// Exponentially smoothed toward the latest raw sample.
    Smoothed { time_constant: f64 },
}

/// Blend factor for one tick of exponential smoothing.
///
/// A zero or negative time constant means no smoothing.
pub fn smoothing_factor(dt: f64, time_constant: f64) -> f64 {
    if time_constant <= 0.0 {
        1.0
    } else {
        1.0 - (-dt.max(0.0) / time_constant).exp()
    }
}

struct Subscriber {
    handle: PointerHandle,
    mode: PointerMode,
    on_move: PointerCallback,
    position: Option<(f64, f64)>,
}

/// Samples the pointer and forwards positions to subscribers.
pub struct PointerTracker {
    capabilities: PointerCapabilities,
    listening: bool,
    latest: Option<PointerSample>,
    fresh: bool,
    inside: bool,
    /// Presence last delivered to presence subscribers.
    reported_inside: bool,
    subscribers: Vec<Subscriber>,
    presence: Vec<(PointerHandle, PresenceCallback)>,
}

impl PointerTracker {
    pub fn new(capabilities: PointerCapabilities) -> Self {
        let listening = !capabilities.coarse_only;
        if !listening {
            debug!("coarse pointer detected, pointer tracking disabled");
        }
        Self {
            capabilities,
            listening,
            latest: None,
            fresh: false,
            inside: false,
            reported_inside: false,
            subscribers: Vec::new(),
            presence: Vec::new(),
        }
    }

    pub fn capabilities(&self) -> PointerCapabilities {
        self.capabilities
    }

    /// Whether a pointer-move listener is attached.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Subscribe to pointer positions.
    ///
    /// Subscribing to an inert tracker succeeds, but the callback is never
    /// invoked.
    pub fn subscribe(&mut self, mode: PointerMode, on_move: impl FnMut(PointerSample) + 'static) -> PointerHandle {
        let handle = PointerHandle::new();
        self.subscribers.push(Subscriber {
            handle,
            mode,
            on_move: Box::new(on_move),
            position: None,
        });
        handle
    }

    /// Subscribe to the pointer entering and leaving the document.
    pub fn subscribe_presence(&mut self, on_change: impl FnMut(bool) + 'static) -> PointerHandle {
        let handle = PointerHandle::new();
        self.presence.push((handle, Box::new(on_change)));
        handle
    }

    /// Drop a position or presence subscription.
    pub fn unsubscribe(&mut self, handle: PointerHandle) -> bool {
        let before = self.len();
        self.subscribers.retain(|s| s.handle != handle);
        self.presence.retain(|(h, _)| *h != handle);
        self.len() != before
    }

    /// Record a raw pointer-move event. Returns false when inert.
    pub fn pointer_moved(&mut self, x: f64, y: f64, timestamp: f64) -> bool {
        if !self.listening {
            return false;
        }
        self.latest = Some(PointerSample::new(x, y, timestamp));
        self.fresh = true;
        self.inside = true;
        true
    }

    /// Record the pointer entering the document. Returns false when inert.
    pub fn pointer_entered(&mut self) -> bool {
        if !self.listening {
            return false;
        }
        self.inside = true;
        true
    }

    /// Record the pointer leaving the document. Returns false when inert.
    pub fn pointer_left(&mut self) -> bool {
        if !self.listening {
            return false;
        }
        self.inside = false;
        true
    }

    /// Whether the pointer is currently inside the document.
    pub fn is_inside(&self) -> bool {
        self.inside
    }

    /// Latest sample while the pointer is inside the document.
    pub fn position(&self) -> Option<PointerSample> {
        self.latest.filter(|_| self.inside)
    }

    /// Latest raw sample, if any has been recorded.
    pub fn latest(&self) -> Option<PointerSample> {
        self.latest
    }

    /// Forward positions for one display refresh.
    pub fn tick(&mut self, timestamp: f64, dt: f64) {
        if !self.listening {
            return;
        }
        if self.inside != self.reported_inside {
            self.reported_inside = self.inside;
            debug!(inside = self.inside, "pointer presence changed");
            for (_, on_change) in &mut self.presence {
                on_change(self.inside);
            }
        }
        let Some(raw) = self.latest else {
            return;
        };

        for sub in &mut self.subscribers {
            match sub.mode {
                PointerMode::Raw => {
                    if self.fresh {
                        sub.position = Some((raw.x, raw.y));
                        (sub.on_move)(raw);
                    }
                }
                PointerMode::Smoothed { time_constant } => {
                    let (x, y) = match sub.position {
                        None => (raw.x, raw.y),
                        Some((sx, sy)) => {
                            let alpha = smoothing_factor(dt, time_constant);
                            let x = sx + (raw.x - sx) * alpha;
                            let y = sy + (raw.y - sy) * alpha;
                            if (raw.x - x).abs() < SETTLE_EPSILON && (raw.y - y).abs() < SETTLE_EPSILON {
                                (raw.x, raw.y)
                            } else {
                                (x, y)
                            }
                        }
                    };
                    if sub.position != Some((x, y)) {
                        sub.position = Some((x, y));
                        trace!(handle = sub.handle.0, x, y, "smoothed pointer");
                        (sub.on_move)(PointerSample::new(x, y, timestamp));
                    }
                }
            }
        }
        self.fresh = false;
    }

    pub fn len(&self) -> usize {
        self.subscribers.len() + self.presence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(PointerCapabilities::default())
    }
}

impl fmt::Debug for PointerTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerTracker")
            .field("capabilities", &self.capabilities)
            .field("listening", &self.listening)
            .field("latest", &self.latest)
            .field("inside", &self.inside)
            .field("subscribers", &self.subscribers.len())
            .field("presence", &self.presence.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<PointerSample>>>, impl FnMut(PointerSample) + 'static) {
        let samples = Rc::new(RefCell::new(Vec::new()));
        let inner = samples.clone();
        (samples, move |s| inner.borrow_mut().push(s))
    }

    #[test]
    fn test_coarse_pointer_is_inert() {
        let mut tracker = PointerTracker::new(PointerCapabilities::coarse());
        let (raw, on_raw) = recorder();
        let (smooth, on_smooth) = recorder();
        tracker.subscribe(PointerMode::Raw, on_raw);
        tracker.subscribe(PointerMode::Smoothed { time_constant: 0.08 }, on_smooth);

        assert!(!tracker.is_listening());
        for i in 0..10 {
            assert!(!tracker.pointer_moved(i as f64 * 10.0, 5.0, i as f64));
            tracker.tick(i as f64, 1.0 / 60.0);
        }

        assert!(raw.borrow().is_empty());
        assert!(smooth.borrow().is_empty());
        assert!(tracker.latest().is_none());
    }

    #[test]
    fn test_raw_delivers_once_per_sample() {
        let mut tracker = PointerTracker::new(PointerCapabilities::fine());
        let (raw, on_raw) = recorder();
        tracker.subscribe(PointerMode::Raw, on_raw);

        tracker.tick(0.0, 0.016);
        tracker.pointer_moved(10.0, 20.0, 0.01);
        tracker.pointer_moved(30.0, 40.0, 0.02);
        tracker.tick(0.032, 0.016);
        tracker.tick(0.048, 0.016);

        let raw = raw.borrow();
        assert_eq!(raw.len(), 1);
        assert_eq!((raw[0].x, raw[0].y), (30.0, 40.0));
    }

    #[test]
    fn test_smoothed_converges() {
        let mut tracker = PointerTracker::new(PointerCapabilities::fine());
        let (smooth, on_smooth) = recorder();
        tracker.subscribe(PointerMode::Smoothed { time_constant: 0.08 }, on_smooth);

        tracker.pointer_moved(0.0, 0.0, 0.0);
        tracker.tick(0.0, 1.0 / 60.0);
        tracker.pointer_moved(100.0, 0.0, 0.01);

        let dt = 1.0 / 60.0;
        tracker.tick(dt, dt);
        let first = smooth.borrow().last().copied().unwrap();
        let expected = 100.0 * smoothing_factor(dt, 0.08);
        assert!((first.x - expected).abs() < 1e-9);

        for frame in 2..120 {
            tracker.tick(frame as f64 * dt, dt);
        }
        let samples = smooth.borrow();
        assert!(samples.windows(2).all(|w| w[1].x >= w[0].x));
        assert_eq!(samples.last().map(|s| s.x), Some(100.0));

        // Settled: further ticks deliver nothing.
        let settled = samples.len();
        drop(samples);
        tracker.tick(3.0, dt);
        assert_eq!(smooth.borrow().len(), settled);
    }

    #[test]
    fn test_smoothing_factor() {
        assert_eq!(smoothing_factor(0.016, 0.0), 1.0);
        assert_eq!(smoothing_factor(0.0, 0.08), 0.0);
        let a = smoothing_factor(0.08, 0.08);
        assert!((a - (1.0 - (-1.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_presence_follows_enter_and_leave() {
        let mut tracker = PointerTracker::new(PointerCapabilities::fine());
        let changes = Rc::new(RefCell::new(Vec::new()));
        let inner = changes.clone();
        let handle = tracker.subscribe_presence(move |inside| inner.borrow_mut().push(inside));

        tracker.tick(0.0, 0.016);
        assert!(changes.borrow().is_empty());

        // First move enters.
        tracker.pointer_moved(5.0, 5.0, 0.01);
        tracker.tick(0.016, 0.016);
        assert!(tracker.position().is_some());

        tracker.pointer_left();
        tracker.tick(0.032, 0.016);
        assert!(tracker.position().is_none());
        assert!(tracker.latest().is_some());

        // Leave and re-enter within one frame is not a change.
        tracker.pointer_entered();
        tracker.pointer_left();
        tracker.tick(0.048, 0.016);

        tracker.pointer_entered();
        tracker.tick(0.064, 0.016);
        assert_eq!(*changes.borrow(), vec![true, false, true]);

        assert_eq!(tracker.len(), 1);
        assert!(tracker.unsubscribe(handle));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_coarse_pointer_never_reports_presence() {
        let mut tracker = PointerTracker::new(PointerCapabilities::coarse());
        let changes = Rc::new(RefCell::new(0));
        let inner = changes.clone();
        tracker.subscribe_presence(move |_| *inner.borrow_mut() += 1);

        assert!(!tracker.pointer_entered());
        assert!(!tracker.pointer_left());
        tracker.tick(0.0, 0.016);
        assert_eq!(*changes.borrow(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut tracker = PointerTracker::new(PointerCapabilities::fine());
        let (raw, on_raw) = recorder();
        let handle = tracker.subscribe(PointerMode::Raw, on_raw);
        assert!(tracker.unsubscribe(handle));
        assert!(!tracker.unsubscribe(handle));

        tracker.pointer_moved(1.0, 1.0, 0.0);
        tracker.tick(0.0, 0.016);
        assert!(raw.borrow().is_empty());
    }
}
