//! Timeline player: runs animation steps against a document.
//!
//! The `TimelinePlayer` is the central coordinator for every in-flight
//! interpolation. It handles:
//! - Starting playbacks from [`AnimationStep`]s and [`Timeline`]s
//! - Advancing every playback once per display refresh
//! - Last-writer-wins ownership per (element, property)
//! - Cancellation, reversal and repeat cycles
//!
//! # Usage
//!
//! ```
//! use glide_motion::{AnimationStep, Document, Easing, Property, Rect, TimelinePlayer};
//!
//! let mut doc = Document::new();
//! let card = doc.insert("card", Rect::new(0.0, 0.0, 100.0, 100.0));
//!
//! let step = AnimationStep::builder([card])
//!     .from_to(Property::Opacity, 0.0, 1.0)
//!     .duration(1.0)
//!     .ease(Easing::Linear)
//!     .build()
//!     .unwrap();
//!
//! let mut player = TimelinePlayer::new();
//! player.play(&step, &mut doc);
//! player.update(0.5, &mut doc);
//! assert_eq!(doc.scalar(card, &Property::Opacity), 0.5);
//! ```

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::document::Document;
use crate::easing::Easing;
use crate::error::{MotionError, Result};
use crate::events::{EventQueue, PlaybackEvent};
use crate::interpolate::{Interpolate, interpolable};
use crate::step::{AnimationStep, Repeat, Timeline};
use crate::types::{
    Direction, ElementId, PlaybackHandle, PlaybackState, Property, PropertyValue, StepId,
};

/// Clock slack when comparing against an end time, so frame-accumulated
/// time that lands a few ulps short still counts as finished.
const END_EPSILON: f64 = 1e-9;

/// One property of one target inside a playback.
#[derive(Debug, Clone)]
struct Tween {
    target: ElementId,
    property: Property,
    from: PropertyValue,
    to: PropertyValue,
    /// Playback clock time at which this tween starts.
    offset: f64,
    duration: f64,
}

impl Tween {
    fn value_at(&self, clock: f64, ease: &Easing) -> PropertyValue {
        let local = clock - self.offset;
        if self.duration <= 0.0 {
            return if local >= 0.0 {
                self.to.clone()
            } else {
                self.from.clone()
            };
        }
        if local <= 0.0 {
            return self.from.clone();
        }
        if local >= self.duration - END_EPSILON {
            return self.to.clone();
        }
        let eased = ease.evaluate(local / self.duration);
        self.from.interpolate(&self.to, eased)
    }
}

enum Advance {
    Continue,
    Repeated(u32),
    Finished,
}

#[derive(Debug, Clone)]
struct Playback {
    step: StepId,
    ease: Easing,
    tweens: Vec<Tween>,
    clock: f64,
    /// Clock time at which every tween has reached `to`.
    end: f64,
    /// Clock time a repeat cycle restarts from (delays are not repeated).
    loop_start: f64,
    /// Earliest tween offset; before it the playback is pending.
    first_offset: f64,
    direction: Direction,
    repeat: Repeat,
    cycles: u32,
    state: PlaybackState,
}

impl Playback {
    fn advance(&mut self, dt: f64) -> Advance {
        let outcome = match self.direction {
            Direction::Forward => {
                self.clock += dt;
                if self.clock >= self.end - END_EPSILON {
                    let cycle_len = self.end - self.loop_start;
                    if self.repeat.should_repeat(self.cycles) && cycle_len > 0.0 {
                        self.cycles += 1;
                        let overflow = (self.clock - self.end).max(0.0) % cycle_len;
                        self.clock = self.loop_start + overflow;
                        Advance::Repeated(self.cycles)
                    } else {
                        self.clock = self.end;
                        Advance::Finished
                    }
                } else {
                    Advance::Continue
                }
            }
            Direction::Backward => {
                self.clock -= dt;
                if self.clock <= END_EPSILON {
                    self.clock = 0.0;
                    Advance::Finished
                } else {
                    Advance::Continue
                }
            }
        };

        self.state = match outcome {
            Advance::Finished => PlaybackState::Finished,
            _ if self.clock < self.first_offset => PlaybackState::Pending,
            _ => PlaybackState::Running,
        };
        outcome
    }

    fn write(&self, doc: &mut Document) {
        for tween in &self.tweens {
            let value = tween.value_at(self.clock, &self.ease);
            trace!(target_el = %tween.target, property = %tween.property, %value, "write");
            doc.set_property(tween.target, tween.property.clone(), value);
        }
    }

    /// Land exactly on the end values for the current direction.
    fn write_final(&self, doc: &mut Document) {
        for tween in &self.tweens {
            let value = match self.direction {
                Direction::Forward => tween.to.clone(),
                Direction::Backward => tween.from.clone(),
            };
            doc.set_property(tween.target, tween.property.clone(), value);
        }
    }

    fn progress(&self) -> f64 {
        if self.end > 0.0 {
            (self.clock / self.end).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Runs animation steps and owns every in-flight interpolation.
#[derive(Debug, Default)]
pub struct TimelinePlayer {
    playbacks: HashMap<PlaybackHandle, Playback>,

    /// Owner of each animated (element, property). Only one playback may
    /// write a given property at a time.
    property_index: HashMap<(ElementId, Property), PlaybackHandle>,

    /// Live playback of each step. Re-playing a step replaces it.
    step_index: HashMap<StepId, PlaybackHandle>,

    event_queue: EventQueue,
}

impl TimelinePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play a step forward from its `from` values.
    ///
    /// The `from` values are written immediately, so targets sit at their
    /// start state while the delay elapses. A previous run of the same step is
    /// cancelled, and any property already owned by another playback is taken
    /// over.
    pub fn play(&mut self, step: &AnimationStep, doc: &mut Document) -> PlaybackHandle {
        self.start(step, 0.0, Direction::Forward, doc)
    }

    /// Start a step at its end state and run it backward to `from`.
    pub fn play_reversed(&mut self, step: &AnimationStep, doc: &mut Document) -> PlaybackHandle {
        self.start(step, 0.0, Direction::Backward, doc)
    }

    /// Play every entry of a timeline, each delayed by its offset.
    pub fn play_timeline(&mut self, timeline: &Timeline, doc: &mut Document) -> Vec<PlaybackHandle> {
        timeline
            .entries()
            .iter()
            .map(|entry| self.start(&entry.step, entry.offset, Direction::Forward, doc))
            .collect()
    }

    /// Tween a target from its current values to `to`.
    ///
    /// Properties the element has never been given start from their default
    /// (opacity and scale 1, everything else 0). A current value whose shape
    /// differs from the target value adopts the target's shape.
    pub fn tween_to(
        &mut self,
        target: ElementId,
        to: impl IntoIterator<Item = (Property, PropertyValue)>,
        duration: f64,
        ease: Easing,
        doc: &mut Document,
    ) -> Result<PlaybackHandle> {
        if !doc.is_attached(target) {
            return Err(MotionError::UnknownElement(target));
        }

        let mut builder = AnimationStep::builder([target]).duration(duration).ease(ease);
        for (property, value) in to {
            let current = match doc.property(target, &property) {
                Some(current) if interpolable(current, &value) => current.clone(),
                Some(current) => value.with_scalar(
                    current
                        .scalar()
                        .unwrap_or_else(|| property.default_scalar()),
                ),
                None => value.with_scalar(property.default_scalar()),
            };
            builder = builder.from(property.clone(), current).to(property, value);
        }

        let step = builder.build()?;
        Ok(self.play(&step, doc))
    }

    /// Write a step's values at `progress` (0..=1 of its total duration)
    /// without starting a playback. Used for scroll-scrubbed animations.
    ///
    /// Returns the number of values written.
    pub fn render_at(&mut self, step: &AnimationStep, progress: f64, doc: &mut Document) -> usize {
        if let Some(previous) = self.step_index.get(&step.id()).copied() {
            self.cancel(previous);
        }

        let clock = progress.clamp(0.0, 1.0) * step.total_duration();
        let ease = step.ease();
        let mut written = 0;

        for (index, &target) in step.targets().iter().enumerate() {
            let offset = step.target_offset(index);
            for (property, from, to) in step.properties() {
                if !interpolable(from, to) {
                    continue;
                }
                if let Some(owner) = self.property_index.remove(&(target, property.clone())) {
                    self.release(owner, target, property);
                }
                let tween = Tween {
                    target,
                    property: property.clone(),
                    from: from.clone(),
                    to: to.clone(),
                    offset,
                    duration: step.duration(),
                };
                if doc.set_property(target, property.clone(), tween.value_at(clock, &ease)) {
                    written += 1;
                }
            }
        }

        written
    }

    /// Stop a playback immediately.
    ///
    /// Properties keep whatever value they last had; nothing is reverted.
    pub fn cancel(&mut self, handle: PlaybackHandle) -> bool {
        match self.playbacks.remove(&handle) {
            Some(playback) => {
                self.forget(handle, &playback);
                self.event_queue.push(PlaybackEvent::Cancelled {
                    playback: handle,
                    step: playback.step,
                });
                true
            }
            None => false,
        }
    }

    /// Flip the direction of a live playback.
    pub fn reverse(&mut self, handle: PlaybackHandle) -> bool {
        match self.playbacks.get_mut(&handle) {
            Some(playback) => {
                playback.direction = playback.direction.flipped();
                self.event_queue.push(PlaybackEvent::Reversed {
                    playback: handle,
                    step: playback.step,
                });
                true
            }
            None => false,
        }
    }

    /// Advance every playback by `dt` seconds and write the new values.
    pub fn update(&mut self, dt: f64, doc: &mut Document) {
        if self.playbacks.is_empty() {
            return;
        }

        let mut finished = Vec::new();
        for (handle, playback) in self.playbacks.iter_mut() {
            match playback.advance(dt) {
                Advance::Continue => playback.write(doc),
                Advance::Repeated(cycle) => {
                    playback.write(doc);
                    self.event_queue.push(PlaybackEvent::Repeated {
                        playback: *handle,
                        step: playback.step,
                        cycle,
                    });
                }
                Advance::Finished => {
                    playback.write_final(doc);
                    finished.push(*handle);
                }
            }
        }

        finished.sort();
        for handle in finished {
            if let Some(playback) = self.playbacks.remove(&handle) {
                self.forget(handle, &playback);
                self.event_queue.push(PlaybackEvent::Completed {
                    playback: handle,
                    step: playback.step,
                });
            }
        }
    }

    pub fn state(&self, handle: PlaybackHandle) -> Option<PlaybackState> {
        self.playbacks.get(&handle).map(|p| p.state)
    }

    pub fn direction(&self, handle: PlaybackHandle) -> Option<Direction> {
        self.playbacks.get(&handle).map(|p| p.direction)
    }

    /// Clock position as a fraction of the playback's end time.
    pub fn progress(&self, handle: PlaybackHandle) -> Option<f64> {
        self.playbacks.get(&handle).map(Playback::progress)
    }

    pub fn is_active(&self, handle: PlaybackHandle) -> bool {
        self.playbacks.contains_key(&handle)
    }

    /// The live playback of a step, if any.
    pub fn playback_for_step(&self, step: StepId) -> Option<PlaybackHandle> {
        self.step_index.get(&step).copied()
    }

    /// The playback currently writing `property` on `target`.
    pub fn owner_of(&self, target: ElementId, property: &Property) -> Option<PlaybackHandle> {
        self.property_index
            .get(&(target, property.clone()))
            .copied()
    }

    pub fn active_count(&self) -> usize {
        self.playbacks.len()
    }

    pub fn has_active_playbacks(&self) -> bool {
        !self.playbacks.is_empty()
    }

    /// Cancel every playback.
    pub fn clear(&mut self) {
        let mut handles: Vec<_> = self.playbacks.keys().copied().collect();
        handles.sort();
        for handle in handles {
            self.cancel(handle);
        }
    }

    /// Drain all pending lifecycle events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = PlaybackEvent> + '_ {
        self.event_queue.drain()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    fn start(
        &mut self,
        step: &AnimationStep,
        lead: f64,
        direction: Direction,
        doc: &mut Document,
    ) -> PlaybackHandle {
        if let Some(previous) = self.step_index.get(&step.id()).copied() {
            debug!(step = step.id().0, previous = previous.0, "step replayed, cancelling previous run");
            self.cancel(previous);
        }

        let handle = PlaybackHandle::new();
        let mut tweens = Vec::new();
        for (index, &target) in step.targets().iter().enumerate() {
            if !doc.is_attached(target) {
                debug!(%target, "skipping detached target");
                continue;
            }
            let offset = lead + step.target_offset(index);
            for (property, from, to) in step.properties() {
                if !interpolable(from, to) {
                    debug!(%target, %property, %from, %to, "skipping property that cannot be interpolated");
                    continue;
                }
                tweens.push(Tween {
                    target,
                    property: property.clone(),
                    from: from.clone(),
                    to: to.clone(),
                    offset,
                    duration: step.duration(),
                });
            }
        }

        for tween in &tweens {
            let key = (tween.target, tween.property.clone());
            if let Some(owner) = self.property_index.insert(key, handle) {
                if owner != handle {
                    self.release(owner, tween.target, &tween.property);
                }
            }
        }

        let end = lead + step.total_duration();
        let first_offset = tweens.iter().map(|t| t.offset).fold(end, f64::min);
        let mut playback = Playback {
            step: step.id(),
            ease: step.ease(),
            tweens,
            clock: match direction {
                Direction::Forward => 0.0,
                Direction::Backward => end,
            },
            end,
            loop_start: lead + step.delay(),
            first_offset,
            direction,
            repeat: step.repeat(),
            cycles: 0,
            state: PlaybackState::Pending,
        };
        playback.state = if playback.clock < first_offset {
            PlaybackState::Pending
        } else {
            PlaybackState::Running
        };
        playback.write(doc);

        self.event_queue.push(PlaybackEvent::Started {
            playback: handle,
            step: step.id(),
        });
        self.step_index.insert(step.id(), handle);
        self.playbacks.insert(handle, playback);
        handle
    }

    /// Remove one (target, property) tween from `owner`. A playback left with
    /// nothing to animate is cancelled.
    fn release(&mut self, owner: PlaybackHandle, target: ElementId, property: &Property) {
        let Some(playback) = self.playbacks.get_mut(&owner) else {
            return;
        };
        playback
            .tweens
            .retain(|t| !(t.target == target && &t.property == property));
        trace!(owner = owner.0, %target, %property, "property taken over");

        if playback.tweens.is_empty() {
            self.cancel(owner);
        }
    }

    fn forget(&mut self, handle: PlaybackHandle, playback: &Playback) {
        for tween in &playback.tweens {
            let key = (tween.target, tween.property.clone());
            if self.property_index.get(&key) == Some(&handle) {
                self.property_index.remove(&key);
            }
        }
        if self.step_index.get(&playback.step) == Some(&handle) {
            self.step_index.remove(&playback.step);
        }
    }
}

static_assertions::assert_impl_all!(TimelinePlayer: Send);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn doc_with(n: usize) -> (Document, Vec<ElementId>) {
        let mut doc = Document::new();
        let ids = (0..n)
            .map(|i| doc.insert(format!("el{i}"), Rect::new(0.0, i as f64 * 100.0, 100.0, 100.0)))
            .collect();
        (doc, ids)
    }

    fn opacity(doc: &Document, id: ElementId) -> f64 {
        doc.property(id, &Property::Opacity)
            .and_then(PropertyValue::as_number)
            .unwrap()
    }

    #[test]
    fn test_linear_midpoint() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(1.0)
            .delay(0.0)
            .ease_named("linear")
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        player.play(&step, &mut doc);
        assert_eq!(opacity(&doc, ids[0]), 0.0);

        player.update(0.5, &mut doc);
        assert!((opacity(&doc, ids[0]) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_lands_exactly_on_to_values() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.1, 0.7)
            .from_to(Property::Y, 33.3, -12.9)
            .duration(0.8)
            .delay(0.2)
            .ease_named("back.out(1.7)")
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let handle = player.play(&step, &mut doc);
        for _ in 0..7 {
            player.update(1.0 / 7.0, &mut doc);
        }

        assert!(!player.is_active(handle));
        assert_eq!(opacity(&doc, ids[0]), 0.7);
        assert_eq!(doc.scalar(ids[0], &Property::Y), -12.9);
    }

    #[test]
    fn test_accumulated_frames_finish_on_time() {
        for fps in [24u32, 30, 60, 144] {
            let (mut doc, ids) = doc_with(1);
            let step = AnimationStep::builder([ids[0]])
                .from_to(Property::Opacity, 0.0, 1.0)
                .duration(1.0)
                .ease(Easing::Linear)
                .build()
                .unwrap();

            let mut player = TimelinePlayer::new();
            let handle = player.play(&step, &mut doc);
            for _ in 0..fps {
                player.update(1.0 / f64::from(fps), &mut doc);
            }

            assert_eq!(opacity(&doc, ids[0]), 1.0, "{fps} fps");
            assert!(!player.is_active(handle), "{fps} fps");
        }
    }

    #[test]
    fn test_accumulated_reverse_finishes_on_time() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(1.0)
            .ease(Easing::Linear)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let handle = player.play_reversed(&step, &mut doc);
        for _ in 0..30 {
            player.update(1.0 / 30.0, &mut doc);
        }

        assert_eq!(opacity(&doc, ids[0]), 0.0);
        assert!(!player.is_active(handle));
    }

    #[test]
    fn test_from_written_before_delay() {
        let (mut doc, ids) = doc_with(1);
        doc.set_property(ids[0], Property::Opacity, 1.0.into());
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .delay(1.5)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let handle = player.play(&step, &mut doc);
        assert_eq!(opacity(&doc, ids[0]), 0.0);
        assert_eq!(player.state(handle), Some(PlaybackState::Pending));

        player.update(1.0, &mut doc);
        assert_eq!(opacity(&doc, ids[0]), 0.0);
        player.update(0.75, &mut doc);
        assert_eq!(player.state(handle), Some(PlaybackState::Running));
        assert!(opacity(&doc, ids[0]) > 0.0);
    }

    #[test]
    fn test_cancel_keeps_current_value() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(2.0)
            .ease(Easing::Linear)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let handle = player.play(&step, &mut doc);
        player.update(1.0, &mut doc);
        let halfway = opacity(&doc, ids[0]);
        assert!((halfway - 0.5).abs() < 1e-9);

        assert!(player.cancel(handle));
        assert!(!player.cancel(handle));
        player.update(1.0, &mut doc);
        player.update(1.0, &mut doc);
        assert_eq!(opacity(&doc, ids[0]), halfway);
        assert!(player.owner_of(ids[0], &Property::Opacity).is_none());

        let events: Vec<_> = player.drain_events().collect();
        assert!(events.last().unwrap().is_cancelled());
    }

    #[test]
    fn test_replay_restarts_single_run() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(1.0)
            .ease(Easing::Linear)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let first = player.play(&step, &mut doc);
        player.update(0.75, &mut doc);
        let second = player.play(&step, &mut doc);

        assert_ne!(first, second);
        assert!(!player.is_active(first));
        assert_eq!(player.active_count(), 1);
        assert_eq!(player.playback_for_step(step.id()), Some(second));
        assert_eq!(opacity(&doc, ids[0]), 0.0);
    }

    #[test]
    fn test_last_writer_wins_per_property() {
        let (mut doc, ids) = doc_with(1);
        let a = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .from_to(Property::Y, 50.0, 0.0)
            .duration(1.0)
            .build()
            .unwrap();
        let b = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 1.0, 0.2)
            .duration(1.0)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let ha = player.play(&a, &mut doc);
        let hb = player.play(&b, &mut doc);

        assert!(player.is_active(ha));
        assert_eq!(player.owner_of(ids[0], &Property::Opacity), Some(hb));
        assert_eq!(player.owner_of(ids[0], &Property::Y), Some(ha));

        player.update(2.0, &mut doc);
        assert_eq!(opacity(&doc, ids[0]), 0.2);
        assert_eq!(doc.scalar(ids[0], &Property::Y), 0.0);
    }

    #[test]
    fn test_fully_taken_over_playback_is_cancelled() {
        let (mut doc, ids) = doc_with(1);
        let a = AnimationStep::builder([ids[0]])
            .from_to(Property::X, 0.0, 10.0)
            .build()
            .unwrap();
        let b = AnimationStep::builder([ids[0]])
            .from_to(Property::X, 5.0, 20.0)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let ha = player.play(&a, &mut doc);
        player.play(&b, &mut doc);
        assert!(!player.is_active(ha));
        assert!(player.drain_events().any(|e| e.is_cancelled() && e.playback() == ha));
    }

    #[test]
    fn test_stagger() {
        let (mut doc, ids) = doc_with(3);
        let step = AnimationStep::builder(ids.clone())
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(0.5)
            .stagger(0.25)
            .ease(Easing::Linear)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let handle = player.play(&step, &mut doc);

        player.update(0.25, &mut doc);
        assert!((opacity(&doc, ids[0]) - 0.5).abs() < 1e-9);
        assert_eq!(opacity(&doc, ids[1]), 0.0);
        assert_eq!(opacity(&doc, ids[2]), 0.0);

        player.update(0.5, &mut doc);
        assert_eq!(opacity(&doc, ids[0]), 1.0);
        assert!((opacity(&doc, ids[1]) - 1.0).abs() < 1e-9);
        assert!((opacity(&doc, ids[2]) - 0.5).abs() < 1e-9);

        player.update(0.25, &mut doc);
        assert!(!player.is_active(handle));
        assert_eq!(opacity(&doc, ids[2]), 1.0);
    }

    #[test]
    fn test_reverse_returns_to_from() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(1.0)
            .ease(Easing::Linear)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let handle = player.play(&step, &mut doc);
        player.update(0.5, &mut doc);

        assert!(player.reverse(handle));
        assert_eq!(player.direction(handle), Some(Direction::Backward));
        player.update(0.25, &mut doc);
        assert!((opacity(&doc, ids[0]) - 0.25).abs() < 1e-9);

        player.update(1.0, &mut doc);
        assert!(!player.is_active(handle));
        assert_eq!(opacity(&doc, ids[0]), 0.0);
    }

    #[test]
    fn test_play_reversed_starts_at_end() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Y, 50.0, 0.0)
            .duration(0.5)
            .delay(0.2)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        player.play_reversed(&step, &mut doc);
        assert_eq!(doc.scalar(ids[0], &Property::Y), 0.0);

        player.update(1.0, &mut doc);
        assert_eq!(doc.scalar(ids[0], &Property::Y), 50.0);
        assert!(!player.has_active_playbacks());
    }

    #[test]
    fn test_repeat_times() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Y, 0.0, -100.0)
            .duration(1.0)
            .delay(0.5)
            .ease(Easing::Linear)
            .repeat(Repeat::Times(1))
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let handle = player.play(&step, &mut doc);

        // Delay, first cycle, then half of the repeat (delay not repeated).
        player.update(0.5, &mut doc);
        player.update(1.0, &mut doc);
        player.update(0.5, &mut doc);
        assert!(player.is_active(handle));
        assert!((doc.scalar(ids[0], &Property::Y) + 50.0).abs() < 1e-9);

        player.update(0.5, &mut doc);
        assert!(!player.is_active(handle));
        assert_eq!(doc.scalar(ids[0], &Property::Y), -100.0);

        let repeats = player
            .drain_events()
            .filter(|e| matches!(e, PlaybackEvent::Repeated { cycle: 1, .. }))
            .count();
        assert_eq!(repeats, 1);
    }

    #[test]
    fn test_repeat_forever_keeps_running() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Y, 0.0, -900.0)
            .duration(10.0)
            .ease(Easing::Linear)
            .repeat(Repeat::Forever)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let handle = player.play(&step, &mut doc);
        for _ in 0..100 {
            player.update(1.0, &mut doc);
        }
        assert!(player.is_active(handle));
        let y = doc.scalar(ids[0], &Property::Y);
        assert!((-900.0..=0.0).contains(&y));
    }

    #[test]
    fn test_unsupported_property_skipped() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .from_to(
                Property::Custom("width".to_string()),
                PropertyValue::keyword("auto"),
                PropertyValue::number(200.0),
            )
            .duration(1.0)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        player.play(&step, &mut doc);
        player.update(1.0, &mut doc);

        assert_eq!(opacity(&doc, ids[0]), 1.0);
        assert!(doc
            .property(ids[0], &Property::Custom("width".to_string()))
            .is_none());
    }

    #[test]
    fn test_templated_filter() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Filter, PropertyValue::blur(0.0), PropertyValue::blur(10.0))
            .duration(1.0)
            .ease(Easing::Linear)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        player.play(&step, &mut doc);
        player.update(0.5, &mut doc);

        let filter = doc.property(ids[0], &Property::Filter).unwrap();
        assert_eq!(filter.render(), "blur(5px)");
    }

    #[test]
    fn test_detached_target_skipped() {
        let (mut doc, ids) = doc_with(2);
        doc.detach(ids[1]);
        let step = AnimationStep::builder(ids.clone())
            .from_to(Property::Opacity, 0.0, 1.0)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        player.play(&step, &mut doc);
        assert!(player.owner_of(ids[1], &Property::Opacity).is_none());
        assert!(player.owner_of(ids[0], &Property::Opacity).is_some());
    }

    #[test]
    fn test_tween_to_reads_current_value() {
        let (mut doc, ids) = doc_with(1);
        doc.set_property(ids[0], Property::X, 10.0.into());

        let mut player = TimelinePlayer::new();
        player
            .tween_to(
                ids[0],
                [
                    (Property::X, PropertyValue::number(30.0)),
                    (Property::Opacity, PropertyValue::number(0.0)),
                ],
                1.0,
                Easing::Linear,
                &mut doc,
            )
            .unwrap();

        player.update(0.5, &mut doc);
        assert!((doc.scalar(ids[0], &Property::X) - 20.0).abs() < 1e-9);
        // Opacity had no value: starts from its default of 1.
        assert!((opacity(&doc, ids[0]) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_tween_to_detached_errors() {
        let (mut doc, ids) = doc_with(1);
        doc.detach(ids[0]);
        let mut player = TimelinePlayer::new();
        let err = player
            .tween_to(ids[0], [(Property::X, 1.0.into())], 0.5, Easing::Linear, &mut doc)
            .unwrap_err();
        assert_eq!(err, MotionError::UnknownElement(ids[0]));
    }

    #[test]
    fn test_render_at_scrubs() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::StrokeDashoffset, 1200.0, 0.0)
            .duration(2.0)
            .ease(Easing::Linear)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        assert_eq!(player.render_at(&step, 0.25, &mut doc), 1);
        assert_eq!(doc.scalar(ids[0], &Property::StrokeDashoffset), 900.0);
        assert_eq!(player.render_at(&step, 2.0, &mut doc), 1);
        assert_eq!(doc.scalar(ids[0], &Property::StrokeDashoffset), 0.0);
        assert!(!player.has_active_playbacks());
    }

    #[test]
    fn test_timeline_offsets() {
        let (mut doc, ids) = doc_with(2);
        let first = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(1.0)
            .ease(Easing::Linear)
            .build()
            .unwrap();
        let second = AnimationStep::builder([ids[1]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(1.0)
            .ease(Easing::Linear)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let handles = player.play_timeline(&Timeline::new().then(first).then(second), &mut doc);
        assert_eq!(handles.len(), 2);

        player.update(1.5, &mut doc);
        assert_eq!(opacity(&doc, ids[0]), 1.0);
        assert!((opacity(&doc, ids[1]) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_lifecycle_events() {
        let (mut doc, ids) = doc_with(1);
        let step = AnimationStep::builder([ids[0]])
            .from_to(Property::Opacity, 0.0, 1.0)
            .duration(0.5)
            .build()
            .unwrap();

        let mut player = TimelinePlayer::new();
        let handle = player.play(&step, &mut doc);
        player.update(1.0, &mut doc);

        let events: Vec<_> = player.drain_events().collect();
        assert_eq!(
            events,
            vec![
                PlaybackEvent::Started {
                    playback: handle,
                    step: step.id()
                },
                PlaybackEvent::Completed {
                    playback: handle,
                    step: step.id()
                },
            ]
        );
        assert!(!player.has_pending_events());
    }
}
