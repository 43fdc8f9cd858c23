//! Hover state for a fixed set of interactive elements.
//!
//! Only elements passed to [`HoverTracker::watch`] are tracked. Elements
//! added to the document later do not gain hover behaviour on their own;
//! the owner has to watch them explicitly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::Document;
use crate::geometry::FrameSnapshot;
use crate::pointer::PointerSample;
use crate::types::ElementId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "element", rename_all = "snake_case")]
pub enum HoverChange {
    Entered(ElementId),
    Left(ElementId),
}

impl HoverChange {
    pub fn element(&self) -> ElementId {
        match self {
            Self::Entered(id) | Self::Left(id) => *id,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Watched {
    element: ElementId,
    hovered: bool,
}

#[derive(Debug, Default)]
pub struct HoverTracker {
    watched: Vec<Watched>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking `element`. Returns false if it was already watched.
    pub fn watch(&mut self, element: ElementId) -> bool {
        if self.watched.iter().any(|w| w.element == element) {
            return false;
        }
        self.watched.push(Watched {
            element,
            hovered: false,
        });
        true
    }

    pub fn unwatch(&mut self, element: ElementId) -> bool {
        let before = self.watched.len();
        self.watched.retain(|w| w.element != element);
        self.watched.len() != before
    }

    /// Recompute hover state from the pointer position (viewport
    /// coordinates) and return the transitions, in watch order.
    ///
    /// A hovered element that is detached reports `Left` and is dropped.
    pub fn update(
        &mut self,
        doc: &Document,
        pointer: Option<PointerSample>,
        snapshot: FrameSnapshot,
    ) -> Vec<HoverChange> {
        let mut changes = Vec::new();

        self.watched.retain(|w| {
            if doc.is_attached(w.element) {
                return true;
            }
            debug!(element = %w.element, "dropping hover watch for detached element");
            if w.hovered {
                changes.push(HoverChange::Left(w.element));
            }
            false
        });

        for watched in &mut self.watched {
            let hovered = match (pointer, doc.rect(watched.element)) {
                (Some(p), Some(rect)) => rect.contains(p.x, p.y + snapshot.scroll_y),
                _ => false,
            };
            if hovered != watched.hovered {
                watched.hovered = hovered;
                changes.push(if hovered {
                    HoverChange::Entered(watched.element)
                } else {
                    HoverChange::Left(watched.element)
                });
            }
        }

        changes
    }

    pub fn is_hovered(&self, element: ElementId) -> bool {
        self.watched
            .iter()
            .any(|w| w.element == element && w.hovered)
    }

    pub fn is_any_hovered(&self) -> bool {
        self.watched.iter().any(|w| w.hovered)
    }

    pub fn len(&self) -> usize {
        self.watched.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn test_enter_and_leave() {
        let mut doc = Document::new();
        let button = doc.insert("button", Rect::new(100.0, 1100.0, 80.0, 40.0));
        let mut hover = HoverTracker::new();
        assert!(hover.watch(button));
        assert!(!hover.watch(button));

        let snap = FrameSnapshot::new(0.0, 1000.0, 1440.0, 900.0);
        let over = PointerSample::new(120.0, 120.0, 0.0);
        let away = PointerSample::new(500.0, 120.0, 0.1);

        assert_eq!(hover.update(&doc, Some(over), snap), vec![HoverChange::Entered(button)]);
        assert!(hover.is_any_hovered());
        assert!(hover.update(&doc, Some(over), snap).is_empty());
        assert_eq!(hover.update(&doc, Some(away), snap), vec![HoverChange::Left(button)]);
        assert!(!hover.is_hovered(button));
    }

    #[test]
    fn test_unwatched_elements_ignored() {
        let mut doc = Document::new();
        let link = doc.insert("link", Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut hover = HoverTracker::new();

        let snap = FrameSnapshot::new(0.0, 0.0, 1440.0, 900.0);
        let changes = hover.update(&doc, Some(PointerSample::new(50.0, 50.0, 0.0)), snap);
        assert!(changes.is_empty());
        assert!(!hover.is_hovered(link));
    }

    #[test]
    fn test_detached_hovered_element_leaves() {
        let mut doc = Document::new();
        let card = doc.insert("card", Rect::new(0.0, 0.0, 100.0, 100.0));
        let mut hover = HoverTracker::new();
        hover.watch(card);

        let snap = FrameSnapshot::new(0.0, 0.0, 1440.0, 900.0);
        let p = Some(PointerSample::new(50.0, 50.0, 0.0));
        hover.update(&doc, p, snap);
        doc.detach(card);

        assert_eq!(hover.update(&doc, p, snap), vec![HoverChange::Left(card)]);
        assert!(hover.is_empty());
    }
}
