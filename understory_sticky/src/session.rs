// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-session context shared by every region of one tracker.

use crate::direction::{DirectionSample, DirectionTracker, ScrollDirection};
use crate::threshold::StackHeight;

/// Previous scroll position, scroll direction and cumulative stack height.
///
/// One session exists per tracker, so independent pages (or tests) never share
/// counters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollSession {
    pub(crate) direction: DirectionTracker,
    pub(crate) stack: StackHeight,
}

impl ScrollSession {
    /// Creates a session starting at `scroll_y` with nothing pinned.
    #[must_use]
    pub fn new(scroll_y: f64) -> Self {
        Self {
            direction: DirectionTracker::new(scroll_y),
            stack: StackHeight::new(),
        }
    }

    /// Last sampled scroll position.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.direction.scroll_y()
    }

    /// Current scroll direction.
    #[must_use]
    pub fn direction(&self) -> ScrollDirection {
        self.direction.direction()
    }

    /// Total height of every pinned region.
    #[must_use]
    pub fn stack_height(&self) -> f64 {
        self.stack.get()
    }

    pub(crate) fn sample(&mut self, scroll_y: f64) -> DirectionSample {
        self.direction.sample(scroll_y)
    }
}
