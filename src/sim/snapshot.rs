//! Snapshot queue
//!
//! The propagation engine records one frame per step; a renderer drains them
//! later, one at a time, at its own pace.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::board::Board;
use crate::error::{Error, Result};

/// Immutable copy of the board after one propagation step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot(Board);

impl Snapshot {
    pub fn new(board: &Board) -> Self {
        Self(board.clone())
    }

    pub fn board(&self) -> &Board {
        &self.0
    }

    pub fn into_board(self) -> Board {
        self.0
    }
}

/// Destination for propagation frames
pub trait SnapshotSink {
    fn record(&mut self, snapshot: Snapshot);
}

/// Sink that drops every frame (used by search lookahead)
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSnapshots;

impl SnapshotSink for DiscardSnapshots {
    fn record(&mut self, _snapshot: Snapshot) {}
}

/// FIFO buffer of frames
#[derive(Debug, Default, Clone)]
pub struct SnapshotQueue {
    frames: VecDeque<Snapshot>,
}

impl SnapshotQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.frames.push_back(snapshot);
    }

    /// Take the oldest frame
    pub fn dequeue(&mut self) -> Result<Snapshot> {
        self.frames
            .pop_front()
            .ok_or(Error::EmptyContainer("snapshot queue"))
    }

    /// Oldest frame without removing it
    pub fn front(&self) -> Option<&Snapshot> {
        self.frames.front()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Drop the newest frames so at most `len` remain
    pub fn truncate(&mut self, len: usize) {
        self.frames.truncate(len);
    }

    /// Remove and yield every frame, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = Snapshot> + '_ {
        self.frames.drain(..)
    }
}

impl SnapshotSink for SnapshotQueue {
    fn record(&mut self, snapshot: Snapshot) {
        self.push(snapshot);
    }
}
