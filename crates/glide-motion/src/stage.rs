//! Stage: one event-loop tick over every subsystem.
//!
//! The stage owns the document, the player and the trackers, and runs them in
//! a fixed order on each [`Stage::frame`]:
//!
//! 1. intersection pass (trigger callbacks)
//! 2. scroll-progress pass (parallax callbacks)
//! 3. pointer tick (presence and cursor callbacks)
//! 4. queued commands applied to the player
//! 5. player update
//! 6. hover pass
//!
//! Tracker callbacks cannot reach the player directly. They push
//! [`Command`]s through a [`CommandSink`], and the stage applies them in
//! step 4 of the same tick.
//!
//! Every registration made through the stage is recorded in a
//! [`SectionScope`]. [`Stage::dispose`] releases all of them; nothing is
//! cleaned up implicitly.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info, trace};

use crate::document::Document;
use crate::easing::Easing;
use crate::error::Result;
use crate::events::PlaybackEvent;
use crate::geometry::FrameSnapshot;
use crate::hover::{HoverChange, HoverTracker};
use crate::intersection::{IntersectionTracker, TrackedTrigger, TriggerMode};
use crate::player::TimelinePlayer;
use crate::pointer::{PointerCapabilities, PointerMode, PointerSample, PointerTracker};
use crate::scroll::{ScrollProgressMapper, ScrollRange};
use crate::step::{AnimationStep, Timeline};
use crate::types::{
    Direction, ElementId, PlaybackHandle, PointerHandle, ProgressHandle, Property,
    PropertyValue, ScopeId, StepId, TriggerHandle,
};

/// Deferred player operation queued by a callback.
#[derive(Debug, Clone)]
pub enum Command {
    /// Play a step from the start, replacing any live forward run of it. A
    /// live backward run is flipped forward from where it is instead.
    Play(Rc<AnimationStep>),
    /// Run a step backward toward its `from` values.
    Rewind(Rc<AnimationStep>),
    /// Render a step at a fixed progress.
    Seek {
        step: Rc<AnimationStep>,
        progress: f64,
    },
    /// Tween an element from its current values.
    TweenTo {
        target: ElementId,
        values: Vec<(Property, PropertyValue)>,
        duration: f64,
        ease: Easing,
    },
    /// Write a value immediately.
    Set {
        target: ElementId,
        property: Property,
        value: PropertyValue,
    },
    /// Cancel the live run of a step.
    Cancel(StepId),
}

type CommandQueue = Rc<RefCell<VecDeque<(ScopeId, Command)>>>;

/// Cloneable handle for queueing commands on behalf of one scope.
#[derive(Debug, Clone)]
pub struct CommandSink {
    scope: ScopeId,
    queue: CommandQueue,
}

impl CommandSink {
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn push(&self, command: Command) {
        self.queue.borrow_mut().push_back((self.scope, command));
    }

    pub fn play(&self, step: &Rc<AnimationStep>) {
        self.push(Command::Play(Rc::clone(step)));
    }

    pub fn rewind(&self, step: &Rc<AnimationStep>) {
        self.push(Command::Rewind(Rc::clone(step)));
    }

    pub fn seek(&self, step: &Rc<AnimationStep>, progress: f64) {
        self.push(Command::Seek {
            step: Rc::clone(step),
            progress,
        });
    }

    pub fn tween_to(
        &self,
        target: ElementId,
        values: impl IntoIterator<Item = (Property, PropertyValue)>,
        duration: f64,
        ease: Easing,
    ) {
        self.push(Command::TweenTo {
            target,
            values: values.into_iter().collect(),
            duration,
            ease,
        });
    }

    pub fn set(&self, target: ElementId, property: Property, value: impl Into<PropertyValue>) {
        self.push(Command::Set {
            target,
            property,
            value: value.into(),
        });
    }

    pub fn cancel(&self, step: StepId) {
        self.push(Command::Cancel(step));
    }
}

/// Every handle a section acquired, released together on dispose.
#[derive(Debug, Default)]
pub struct SectionScope {
    name: String,
    triggers: Vec<TriggerHandle>,
    progress: Vec<ProgressHandle>,
    pointer: Vec<PointerHandle>,
    hovers: Vec<ElementId>,
    steps: Vec<StepId>,
    playbacks: Vec<PlaybackHandle>,
}

impl SectionScope {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn triggers(&self) -> &[TriggerHandle] {
        &self.triggers
    }

    pub fn progress_handles(&self) -> &[ProgressHandle] {
        &self.progress
    }

    pub fn pointer_handles(&self) -> &[PointerHandle] {
        &self.pointer
    }

    pub fn hovers(&self) -> &[ElementId] {
        &self.hovers
    }

    pub fn steps(&self) -> &[StepId] {
        &self.steps
    }

    pub fn playbacks(&self) -> &[PlaybackHandle] {
        &self.playbacks
    }

    /// Number of live registrations, excluding steps and playbacks.
    pub fn registration_count(&self) -> usize {
        self.triggers.len() + self.progress.len() + self.pointer.len() + self.hovers.len()
    }
}

/// What happened during one frame.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FrameReport {
    pub commands_applied: usize,
    pub hover_changes: Vec<HoverChange>,
    pub events: Vec<PlaybackEvent>,
}

/// Owns the engine subsystems and drives them once per tick.
#[derive(Debug)]
pub struct Stage {
    document: Document,
    player: TimelinePlayer,
    intersection: IntersectionTracker,
    scroll: ScrollProgressMapper,
    pointer: PointerTracker,
    hover: HoverTracker,
    scopes: BTreeMap<ScopeId, SectionScope>,
    queue: CommandQueue,
    last_snapshot: FrameSnapshot,
}

impl Stage {
    pub fn new(document: Document, capabilities: PointerCapabilities) -> Self {
        Self {
            document,
            player: TimelinePlayer::new(),
            intersection: IntersectionTracker::new(),
            scroll: ScrollProgressMapper::new(),
            pointer: PointerTracker::new(capabilities),
            hover: HoverTracker::new(),
            scopes: BTreeMap::new(),
            queue: Rc::new(RefCell::new(VecDeque::new())),
            last_snapshot: FrameSnapshot::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn player(&self) -> &TimelinePlayer {
        &self.player
    }

    pub fn intersection(&self) -> &IntersectionTracker {
        &self.intersection
    }

    pub fn scroll(&self) -> &ScrollProgressMapper {
        &self.scroll
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn hover(&self) -> &HoverTracker {
        &self.hover
    }

    /// Snapshot passed to the most recent frame.
    pub fn last_snapshot(&self) -> FrameSnapshot {
        self.last_snapshot
    }

    /// Open a new, empty scope.
    pub fn open_scope(&mut self, name: impl Into<String>) -> ScopeId {
        let id = ScopeId::new();
        let name = name.into();
        debug!(scope = %name, "scope opened");
        self.scopes.insert(
            id,
            SectionScope {
                name,
                ..SectionScope::default()
            },
        );
        id
    }

    pub fn scope(&self, id: ScopeId) -> Option<&SectionScope> {
        self.scopes.get(&id)
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Command sink whose commands are attributed to `scope`.
    pub fn sink(&self, scope: ScopeId) -> CommandSink {
        CommandSink {
            scope,
            queue: Rc::clone(&self.queue),
        }
    }

    pub fn register_trigger(&mut self, scope: ScopeId, trigger: TrackedTrigger) -> Result<TriggerHandle> {
        let handle = self.intersection.register(trigger)?;
        if let Some(record) = self.scopes.get_mut(&scope) {
            record.triggers.push(handle);
        }
        Ok(handle)
    }

    pub fn track_progress(
        &mut self,
        scope: ScopeId,
        element: ElementId,
        range: ScrollRange,
        on_progress: impl FnMut(f64) + 'static,
    ) -> ProgressHandle {
        let handle = self.scroll.track_range(element, range, on_progress);
        if let Some(record) = self.scopes.get_mut(&scope) {
            record.progress.push(handle);
        }
        handle
    }

    pub fn subscribe_pointer(
        &mut self,
        scope: ScopeId,
        mode: PointerMode,
        on_move: impl FnMut(PointerSample) + 'static,
    ) -> PointerHandle {
        let handle = self.pointer.subscribe(mode, on_move);
        if let Some(record) = self.scopes.get_mut(&scope) {
            record.pointer.push(handle);
        }
        handle
    }

    /// Subscribe to the pointer entering (`true`) and leaving (`false`) the document.
    pub fn subscribe_presence(
        &mut self,
        scope: ScopeId,
        on_change: impl FnMut(bool) + 'static,
    ) -> PointerHandle {
        let handle = self.pointer.subscribe_presence(on_change);
        if let Some(record) = self.scopes.get_mut(&scope) {
            record.pointer.push(handle);
        }
        handle
    }

    pub fn watch_hover(&mut self, scope: ScopeId, element: ElementId) -> bool {
        let added = self.hover.watch(element);
        if added {
            if let Some(record) = self.scopes.get_mut(&scope) {
                record.hovers.push(element);
            }
        }
        added
    }

    /// Play a step right away, on behalf of `scope`.
    pub fn play(&mut self, scope: ScopeId, step: &AnimationStep) -> PlaybackHandle {
        let handle = self.player.play(step, &mut self.document);
        self.record_playback(scope, step.id(), handle);
        handle
    }

    pub fn play_timeline(&mut self, scope: ScopeId, timeline: &Timeline) -> Vec<PlaybackHandle> {
        let handles = self.player.play_timeline(timeline, &mut self.document);
        for (entry, handle) in timeline.entries().iter().zip(&handles) {
            self.record_playback(scope, entry.step.id(), *handle);
        }
        handles
    }

    /// Play `step` when `element` crosses `threshold`.
    ///
    /// In [`TriggerMode::Repeat`] the step is rewound when the element
    /// scrolls back out. [`TriggerMode::Scrub`] seeks the step to the
    /// trigger's progress instead of playing it.
    pub fn entrance(
        &mut self,
        scope: ScopeId,
        element: ElementId,
        threshold: f64,
        mode: TriggerMode,
        step: AnimationStep,
    ) -> Result<TriggerHandle> {
        let step = Rc::new(step);
        let sink = self.sink(scope);
        let mut trigger = TrackedTrigger::new(element)
            .start_threshold(threshold)
            .mode(mode);

        trigger = match mode {
            TriggerMode::OneShot => {
                let play = Rc::clone(&step);
                trigger.on_enter(move |_| sink.play(&play))
            }
            TriggerMode::Repeat => {
                let play = Rc::clone(&step);
                let rewind = Rc::clone(&step);
                let leave_sink = sink.clone();
                trigger
                    .on_enter(move |_| sink.play(&play))
                    .on_leave(move |_| leave_sink.rewind(&rewind))
            }
            TriggerMode::Scrub => {
                let seek = Rc::clone(&step);
                trigger.on_update(move |progress| sink.seek(&seek, progress))
            }
        };

        let handle = self.register_trigger(scope, trigger)?;
        if let Some(record) = self.scopes.get_mut(&scope) {
            record.steps.push(step.id());
        }
        Ok(handle)
    }

    /// Seek `step` to the scroll progress of `element` through `range`.
    pub fn scrub(
        &mut self,
        scope: ScopeId,
        element: ElementId,
        range: ScrollRange,
        step: AnimationStep,
    ) -> ProgressHandle {
        let step = Rc::new(step);
        let sink = self.sink(scope);
        if let Some(record) = self.scopes.get_mut(&scope) {
            record.steps.push(step.id());
        }
        self.track_progress(scope, element, range, move |progress| sink.seek(&step, progress))
    }

    /// Record a raw pointer-move event.
    pub fn pointer_moved(&mut self, x: f64, y: f64, timestamp: f64) -> bool {
        self.pointer.pointer_moved(x, y, timestamp)
    }

    pub fn pointer_entered(&mut self) -> bool {
        self.pointer.pointer_entered()
    }

    /// Record the pointer leaving the document. Hovers clear on the next frame.
    pub fn pointer_left(&mut self) -> bool {
        self.pointer.pointer_left()
    }

    /// Run one tick.
    pub fn frame(&mut self, snapshot: FrameSnapshot, dt: f64) -> FrameReport {
        self.last_snapshot = snapshot;

        self.intersection.update(&self.document, snapshot);
        self.scroll.update(&self.document, snapshot);
        self.pointer.tick(snapshot.timestamp, dt);
        let commands_applied = self.apply_commands();
        self.player.update(dt, &mut self.document);
        let hover_changes = self
            .hover
            .update(&self.document, self.pointer.position(), snapshot);

        for record in self.scopes.values_mut() {
            let player = &self.player;
            record.playbacks.retain(|h| player.is_active(*h));
        }

        let events: Vec<_> = self.player.drain_events().collect();
        trace!(
            timestamp = snapshot.timestamp,
            scroll_y = snapshot.scroll_y,
            commands_applied,
            events = events.len(),
            "frame"
        );

        FrameReport {
            commands_applied,
            hover_changes,
            events,
        }
    }

    /// Release everything `scope` acquired and cancel its playbacks.
    pub fn dispose(&mut self, scope: ScopeId) -> bool {
        let Some(record) = self.scopes.remove(&scope) else {
            return false;
        };

        for handle in &record.triggers {
            self.intersection.unregister(*handle);
        }
        for handle in &record.progress {
            self.scroll.untrack(*handle);
        }
        for handle in &record.pointer {
            self.pointer.unsubscribe(*handle);
        }
        for element in &record.hovers {
            self.hover.unwatch(*element);
        }

        let mut cancelled = 0;
        for step in &record.steps {
            if let Some(handle) = self.player.playback_for_step(*step) {
                cancelled += usize::from(self.player.cancel(handle));
            }
        }
        for handle in &record.playbacks {
            cancelled += usize::from(self.player.cancel(*handle));
        }

        self.queue.borrow_mut().retain(|(owner, _)| *owner != scope);

        info!(
            scope = %record.name,
            triggers = record.triggers.len(),
            progress = record.progress.len(),
            pointer = record.pointer.len(),
            hovers = record.hovers.len(),
            cancelled,
            "scope disposed"
        );
        true
    }

    /// Dispose every open scope.
    pub fn dispose_all(&mut self) {
        let ids: Vec<_> = self.scopes.keys().copied().collect();
        for id in ids {
            self.dispose(id);
        }
    }

    fn apply_commands(&mut self) -> usize {
        let commands: Vec<_> = self.queue.borrow_mut().drain(..).collect();
        let mut applied = 0;

        for (scope, command) in commands {
            if !self.scopes.contains_key(&scope) {
                trace!(?command, "dropping command from disposed scope");
                continue;
            }
            match command {
                Command::Play(step) => match self.player.playback_for_step(step.id()) {
                    Some(handle) if self.player.direction(handle) == Some(Direction::Backward) => {
                        self.player.reverse(handle);
                    }
                    _ => {
                        let handle = self.player.play(&step, &mut self.document);
                        self.record_playback(scope, step.id(), handle);
                    }
                },
                Command::Rewind(step) => {
                    match self.player.playback_for_step(step.id()) {
                        Some(handle) => {
                            if self.player.direction(handle) == Some(Direction::Forward) {
                                self.player.reverse(handle);
                            }
                        }
                        None => {
                            let handle = self.player.play_reversed(&step, &mut self.document);
                            self.record_playback(scope, step.id(), handle);
                        }
                    }
                }
                Command::Seek { step, progress } => {
                    self.player.render_at(&step, progress, &mut self.document);
                }
                Command::TweenTo {
                    target,
                    values,
                    duration,
                    ease,
                } => match self
                    .player
                    .tween_to(target, values, duration, ease, &mut self.document)
                {
                    Ok(handle) => {
                        if let Some(record) = self.scopes.get_mut(&scope) {
                            record.playbacks.push(handle);
                        }
                    }
                    Err(err) => {
                        debug!(%target, error = %err, "tween skipped");
                        continue;
                    }
                },
                Command::Set {
                    target,
                    property,
                    value,
                } => {
                    self.document.set_property(target, property, value);
                }
                Command::Cancel(step) => {
                    if let Some(handle) = self.player.playback_for_step(step) {
                        self.player.cancel(handle);
                    }
                }
            }
            applied += 1;
        }

        applied
    }

    fn record_playback(&mut self, scope: ScopeId, step: StepId, handle: PlaybackHandle) {
        if let Some(record) = self.scopes.get_mut(&scope) {
            if !record.steps.contains(&step) {
                record.steps.push(step);
            }
            record.playbacks.push(handle);
        }
    }
}
