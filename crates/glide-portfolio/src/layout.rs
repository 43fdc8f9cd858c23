//! Page layout: builds the document the engine animates.
//!
//! Sections are stacked vertically at full viewport width. Geometry is a
//! rough stand-in for the real page; only relative positions matter for the
//! scroll and visibility maths.

use std::collections::BTreeMap;

use glide_motion::{Anchor, Document, ElementId, FrameSnapshot, Rect};
use serde::{Deserialize, Serialize};

use crate::actions::OutboundAction;

/// Highest start threshold an anchor can map to; thresholds must stay below 1.
const MAX_THRESHOLD: f64 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Horizontal page padding (`px-6` / `lg:px-12`).
    pub fn gutter(&self) -> f64 {
        if self.width >= 1024.0 { 48.0 } else { 24.0 }
    }

    /// Usable content width inside the gutters, capped like `max-w-7xl`.
    pub fn content_width(&self) -> f64 {
        (self.width - 2.0 * self.gutter()).clamp(0.0, 1280.0)
    }

    /// Left edge of centred content.
    pub fn content_left(&self) -> f64 {
        (self.width - self.content_width()) / 2.0
    }
}

/// The laid-out page.
#[derive(Debug)]
pub struct Page {
    pub document: Document,
    pub height: f64,
    /// Links and buttons, in layout order. Hover is tracked for these only.
    pub interactive: Vec<ElementId>,
    /// What clicking an interactive element does.
    pub actions: BTreeMap<ElementId, OutboundAction>,
}

impl Page {
    /// Largest scroll offset for `viewport`.
    pub fn max_scroll(&self, viewport: Viewport) -> f64 {
        (self.height - viewport.height).max(0.0)
    }

    pub fn action_for(&self, element: ElementId) -> Option<&OutboundAction> {
        self.actions.get(&element)
    }
}

/// Accumulates elements top to bottom.
#[derive(Debug)]
pub struct PageBuilder {
    document: Document,
    viewport: Viewport,
    cursor: f64,
    interactive: Vec<ElementId>,
    actions: BTreeMap<ElementId, OutboundAction>,
}

impl PageBuilder {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            document: Document::new(),
            viewport,
            cursor: 0.0,
            interactive: Vec::new(),
            actions: BTreeMap::new(),
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Page offset where the next section starts.
    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    /// Append a full-width section and advance the cursor past it.
    pub fn section(&mut self, name: &str, height: f64) -> (ElementId, Rect) {
        let rect = Rect::new(0.0, self.cursor, self.viewport.width, height);
        let id = self.document.insert(name, rect);
        self.cursor += height;
        (id, rect)
    }

    /// Interactive elements laid out so far.
    pub fn interactive(&self) -> &[ElementId] {
        &self.interactive
    }

    /// Insert an element without affecting the flow.
    pub fn element(&mut self, name: impl Into<String>, rect: Rect) -> ElementId {
        self.document.insert(name, rect)
    }

    /// Insert a hoverable element that performs `action` when clicked.
    pub fn link(&mut self, name: impl Into<String>, rect: Rect, action: OutboundAction) -> ElementId {
        let id = self.document.insert(name, rect);
        self.interactive.push(id);
        self.actions.insert(id, action);
        id
    }

    /// Insert a hoverable element with no outbound action.
    pub fn hoverable(&mut self, name: impl Into<String>, rect: Rect) -> ElementId {
        let id = self.document.insert(name, rect);
        self.interactive.push(id);
        id
    }

    pub fn finish(self) -> Page {
        Page {
            document: self.document,
            height: self.cursor,
            interactive: self.interactive,
            actions: self.actions,
        }
    }
}

/// Vertical flow inside a section.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub left: f64,
    pub width: f64,
    pub y: f64,
    pub gap: f64,
}

impl Column {
    pub fn new(left: f64, width: f64, top: f64, gap: f64) -> Self {
        Self {
            left,
            width,
            y: top,
            gap,
        }
    }

    /// Next full-width block of `height`.
    pub fn next(&mut self, height: f64) -> Rect {
        let rect = Rect::new(self.left, self.y, self.width, height);
        self.y += height + self.gap;
        rect
    }

    /// `count` equal blocks side by side in one row.
    pub fn row(&mut self, count: usize, height: f64) -> Vec<Rect> {
        if count == 0 {
            return Vec::new();
        }
        let cell = (self.width - self.gap * (count - 1) as f64) / count as f64;
        let rects = (0..count)
            .map(|i| Rect::new(self.left + i as f64 * (cell + self.gap), self.y, cell, height))
            .collect();
        self.y += height + self.gap;
        rects
    }
}

/// Visible fraction of `rect` at the scroll offset where `anchor` is met.
///
/// Translates a "top 80%" style start position into an intersection
/// threshold for this element's size.
pub fn anchor_threshold(anchor: Anchor, rect: &Rect, viewport_height: f64) -> f64 {
    let scroll = anchor.scroll_offset(rect, viewport_height);
    let snapshot = FrameSnapshot::new(0.0, scroll, 0.0, viewport_height);
    snapshot.visible_fraction(rect).clamp(0.0, MAX_THRESHOLD)
}
