//! Playback lifecycle events.
//!
//! The player queues an event whenever a playback starts, completes, is
//! cancelled, reverses or begins another repeat cycle. Drain them after each
//! update to react to lifecycle changes.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::types::{PlaybackHandle, StepId};

/// Event emitted when a playback changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    Started {
        playback: PlaybackHandle,
        step: StepId,
    },
    /// Reached its end, or its start when running backward.
    Completed {
        playback: PlaybackHandle,
        step: StepId,
    },
    /// Stopped by `cancel`, by a re-play of the same step, or because every
    /// property was taken over by newer playbacks.
    Cancelled {
        playback: PlaybackHandle,
        step: StepId,
    },
    Reversed {
        playback: PlaybackHandle,
        step: StepId,
    },
    /// Began repeat cycle `cycle` (1-based).
    Repeated {
        playback: PlaybackHandle,
        step: StepId,
        cycle: u32,
    },
}

impl PlaybackEvent {
    pub fn playback(&self) -> PlaybackHandle {
        match self {
            Self::Started { playback, .. }
            | Self::Completed { playback, .. }
            | Self::Cancelled { playback, .. }
            | Self::Reversed { playback, .. }
            | Self::Repeated { playback, .. } => *playback,
        }
    }

    pub fn step(&self) -> StepId {
        match self {
            Self::Started { step, .. }
            | Self::Completed { step, .. }
            | Self::Cancelled { step, .. }
            | Self::Reversed { step, .. }
            | Self::Repeated { step, .. } => *step,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Queue for collecting playback events during update cycles.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<PlaybackEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PlaybackEvent) {
        self.events.push_back(event);
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn pop(&mut self) -> Option<PlaybackEvent> {
        self.events.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = PlaybackEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Pending events for one playback, without removing them.
    pub fn events_for(&self, playback: PlaybackHandle) -> Vec<&PlaybackEvent> {
        self.events
            .iter()
            .filter(|e| e.playback() == playback)
            .collect()
    }
}
