//! Element geometry and per-frame viewport snapshots.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Point containment, edges inclusive.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// Read-only view of the global UI state for one event-loop tick.
///
/// Snapshots are taken once per tick and handed by value to every
/// subsystem, so no subsystem observes a half-updated scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Monotonic event time in seconds.
    pub timestamp: f64,
    /// Page offset of the viewport top.
    pub scroll_y: f64,
    /// Viewport width.
    pub width: f64,
    /// Viewport height.
    pub height: f64,
}

impl FrameSnapshot {
    pub fn new(timestamp: f64, scroll_y: f64, width: f64, height: f64) -> Self {
        Self {
            timestamp,
            scroll_y,
            width,
            height,
        }
    }

    pub fn viewport_top(&self) -> f64 {
        self.scroll_y
    }

    pub fn viewport_bottom(&self) -> f64 {
        self.scroll_y + self.height
    }

    /// True when `rect` overlaps the viewport vertically, edges inclusive.
    pub fn intersects(&self, rect: &Rect) -> bool {
        rect.bottom() >= self.viewport_top() && rect.top() <= self.viewport_bottom()
    }

    /// Fraction of `rect`'s height that lies inside the viewport.
    ///
    /// Zero-height elements report 1.0 while inside the viewport.
    pub fn visible_fraction(&self, rect: &Rect) -> f64 {
        if rect.height <= 0.0 {
            let inside = rect.top() >= self.viewport_top() && rect.top() <= self.viewport_bottom();
            return if inside { 1.0 } else { 0.0 };
        }

        let top = rect.top().max(self.viewport_top());
        let bottom = rect.bottom().min(self.viewport_bottom());
        ((bottom - top) / rect.height).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 70.0);
        assert_eq!(r.right(), 110.0);
        assert!(r.contains(10.0, 70.0));
        assert!(!r.contains(9.0, 30.0));
    }

    #[test]
    fn test_visible_fraction() {
        let el = Rect::new(0.0, 1000.0, 100.0, 200.0);

        let above = FrameSnapshot::new(0.0, 0.0, 1000.0, 800.0);
        assert_eq!(above.visible_fraction(&el), 0.0);

        // Viewport bottom at 1060 → 60 of 200 px visible.
        let partial = FrameSnapshot::new(0.0, 260.0, 1000.0, 800.0);
        assert!((partial.visible_fraction(&el) - 0.3).abs() < 1e-9);

        let full = FrameSnapshot::new(0.0, 900.0, 1000.0, 800.0);
        assert_eq!(full.visible_fraction(&el), 1.0);
    }

    #[test]
    fn test_zero_height_fraction() {
        let marker = Rect::new(0.0, 500.0, 10.0, 0.0);
        assert_eq!(FrameSnapshot::new(0.0, 0.0, 10.0, 600.0).visible_fraction(&marker), 1.0);
        assert_eq!(FrameSnapshot::new(0.0, 0.0, 10.0, 400.0).visible_fraction(&marker), 0.0);
    }

    #[test]
    fn test_intersects_inclusive() {
        let el = Rect::new(0.0, 800.0, 10.0, 100.0);
        let snap = FrameSnapshot::new(0.0, 0.0, 10.0, 800.0);
        assert!(snap.intersects(&el));
        let past = FrameSnapshot::new(0.0, 900.0, 10.0, 800.0);
        assert!(past.intersects(&el));
        let gone = FrameSnapshot::new(0.0, 901.0, 10.0, 800.0);
        assert!(!gone.intersects(&el));
    }
}
