//! Scroll-reactive animation engine.
//!
//! This crate provides:
//! - **Timeline Player**: interpolates element properties over time, with
//!   delays, stagger, reversal and repeats
//! - **Viewport Intersection Tracker**: fires callbacks when elements cross a
//!   visibility threshold
//! - **Scroll-Progress Mapper**: continuous `[0, 1]` progress for parallax
//! - **Pointer Tracker**: raw and smoothed pointer positions, inert on touch
//!   devices
//! - **Stage**: runs all of the above once per tick and owns scoped
//!   registrations
//!
//! # Architecture
//!
//! ```text
//! Stage::frame(snapshot, dt)
//!   ├── IntersectionTracker   (visible fraction → on_enter / on_leave)
//!   ├── ScrollProgressMapper  (scroll offset  → on_progress)
//!   ├── PointerTracker        (raw samples    → on_move)
//!   │      callbacks push Commands ──┐
//!   ├── TimelinePlayer  <────────────┘  (writes Document properties)
//!   └── HoverTracker          (pointer + rects → HoverChange)
//! ```
//!
//! Everything is single-threaded and synchronous. The engine reads element
//! geometry from a [`Document`] and writes properties back to it; it never
//! creates or destroys elements.

pub mod document;
pub mod easing;
pub mod error;
pub mod events;
pub mod geometry;
pub mod hover;
pub mod interpolate;
pub mod intersection;
pub mod player;
pub mod pointer;
pub mod scroll;
pub mod stage;
pub mod step;
pub mod types;

pub use document::Document;
pub use easing::{EaseKind, Easing, StepPosition};
pub use error::{MotionError, Result};
pub use events::{EventQueue, PlaybackEvent};
pub use geometry::{FrameSnapshot, Rect};
pub use hover::{HoverChange, HoverTracker};
pub use interpolate::{Interpolate, interpolable};
pub use intersection::{
    Crossing, IntersectionTracker, TrackedTrigger, TriggerEvent, TriggerMode, TriggerPhase,
};
pub use player::TimelinePlayer;
pub use pointer::{
    PointerCapabilities, PointerMode, PointerSample, PointerTracker, smoothing_factor,
};
pub use scroll::{Anchor, ScrollProgressMapper, ScrollRange};
pub use stage::{Command, CommandSink, FrameReport, SectionScope, Stage};
pub use step::{AnimationStep, AnimationStepBuilder, Repeat, Timeline, TimelineEntry};
pub use types::{
    Direction, ElementId, PlaybackHandle, PlaybackState, PointerHandle, ProgressHandle, Property,
    PropertyValue, ScopeId, StepId, TriggerHandle,
};
