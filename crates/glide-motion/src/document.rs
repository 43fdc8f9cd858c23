//! Minimal element tree the engine reads geometry from and writes styles to.
//!
//! The engine never creates or destroys elements; the page owner inserts
//! them and may detach them at any time. Reads of a detached element return
//! `None` and writes are ignored, which is what lets the trackers and the
//! player drop stale references without erroring.

use std::collections::BTreeMap;

use crate::geometry::Rect;
use crate::types::{ElementId, Property, PropertyValue};

#[derive(Debug, Clone)]
struct Element {
    name: String,
    rect: Rect,
    attached: bool,
    properties: BTreeMap<Property, PropertyValue>,
}

/// Flat store of elements addressed by [`ElementId`].
#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attached element and return its id.
    pub fn insert(&mut self, name: impl Into<String>, rect: Rect) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element {
            name: name.into(),
            rect,
            attached: true,
            properties: BTreeMap::new(),
        });
        id
    }

    /// Detach an element from the document. Returns false if it was not attached.
    pub fn detach(&mut self, id: ElementId) -> bool {
        match self.elements.get_mut(id.0 as usize) {
            Some(el) if el.attached => {
                el.attached = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        self.get(id).is_some()
    }

    /// Look up an attached element by name.
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|el| el.attached && el.name == name)
            .map(|index| ElementId(index as u32))
    }

    pub fn name(&self, id: ElementId) -> Option<&str> {
        self.get(id).map(|el| el.name.as_str())
    }

    /// Bounding rectangle in page coordinates.
    pub fn rect(&self, id: ElementId) -> Option<Rect> {
        self.get(id).map(|el| el.rect)
    }

    pub fn set_rect(&mut self, id: ElementId, rect: Rect) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.rect = rect;
                true
            }
            None => false,
        }
    }

    pub fn property(&self, id: ElementId, property: &Property) -> Option<&PropertyValue> {
        self.get(id).and_then(|el| el.properties.get(property))
    }

    /// Current scalar of a property, falling back to the property default.
    pub fn scalar(&self, id: ElementId, property: &Property) -> f64 {
        self.property(id, property)
            .and_then(PropertyValue::scalar)
            .unwrap_or_else(|| property.default_scalar())
    }

    /// Write a property. Writes to detached elements are ignored.
    pub fn set_property(&mut self, id: ElementId, property: Property, value: PropertyValue) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.properties.insert(property, value);
                true
            }
            None => false,
        }
    }

    pub fn properties(&self, id: ElementId) -> Option<&BTreeMap<Property, PropertyValue>> {
        self.get(id).map(|el| &el.properties)
    }

    /// Ids of all attached elements, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| el.attached)
            .map(|(index, _)| ElementId(index as u32))
    }

    /// Number of attached elements.
    pub fn len(&self) -> usize {
        self.elements.iter().filter(|el| el.attached).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements
            .get(id.0 as usize)
            .filter(|el| el.attached)
    }

    fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements
            .get_mut(id.0 as usize)
            .filter(|el| el.attached)
    }
}
