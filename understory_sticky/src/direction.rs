// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll direction tracking: turn consecutive scroll samples into edge-triggered
//! direction changes.
//!
//! ## Usage
//!
//! 1) Create a [`DirectionTracker`] with the scroll position the host starts at.
//! 2) Feed every scroll sample through [`DirectionTracker::sample`].
//! 3) Inspect [`DirectionSample::changed`] to decide whether to notify listeners.
//!
//! The delta follows the convention `previous - current`, so scrolling towards the
//! end of the document yields a negative delta and [`ScrollDirection::Down`].
//! A zero delta never changes the direction: [`ScrollDirection::Stable`] is only
//! the initial value and is never re-entered once motion occurs.
//!
//! ## Minimal example
//!
//! ```
//! use understory_sticky::direction::{DirectionTracker, ScrollDirection};
//!
//! let mut tracker = DirectionTracker::new(0.0);
//! assert_eq!(tracker.direction(), ScrollDirection::Stable);
//!
//! let s = tracker.sample(40.0);
//! assert_eq!(s.delta, -40.0);
//! assert_eq!(s.direction, ScrollDirection::Down);
//! assert!(s.changed);
//!
//! // Still going down: no new edge.
//! assert!(!tracker.sample(80.0).changed);
//!
//! // Standing still keeps the last direction.
//! let s = tracker.sample(80.0);
//! assert_eq!(s.direction, ScrollDirection::Down);
//! assert!(!s.changed);
//! ```

/// Vertical scroll direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum ScrollDirection {
    /// No motion has been observed yet.
    #[default]
    Stable,
    /// Scrolling towards the start of the document.
    Up,
    /// Scrolling towards the end of the document.
    Down,
}

impl ScrollDirection {
    /// Direction implied by a `previous - current` delta, or `None` for no motion.
    #[must_use]
    pub fn from_delta(delta: f64) -> Option<Self> {
        if delta < 0.0 {
            Some(Self::Down)
        } else if delta > 0.0 {
            Some(Self::Up)
        } else {
            None
        }
    }
}

/// Result of feeding one scroll position to a [`DirectionTracker`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionSample {
    /// `previous - current` scroll position.
    pub delta: f64,
    /// Direction after this sample.
    pub direction: ScrollDirection,
    /// Whether `direction` differs from the direction before this sample.
    pub changed: bool,
    /// The sampled scroll position.
    pub scroll_y: f64,
}

/// Tracks the previous scroll position and the current scroll direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectionTracker {
    previous_scroll_y: f64,
    direction: ScrollDirection,
}

impl DirectionTracker {
    /// Creates a tracker that starts at `scroll_y` with a [`ScrollDirection::Stable`] direction.
    #[must_use]
    pub fn new(scroll_y: f64) -> Self {
        Self {
            previous_scroll_y: scroll_y,
            direction: ScrollDirection::Stable,
        }
    }

    /// Returns the current direction.
    #[must_use]
    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    /// Returns the last sampled scroll position.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.previous_scroll_y
    }

    /// Feeds a scroll position and reports the delta and any direction edge.
    ///
    /// The stored scroll position is updated unconditionally.
    pub fn sample(&mut self, scroll_y: f64) -> DirectionSample {
        let delta = self.previous_scroll_y - scroll_y;
        self.previous_scroll_y = scroll_y;

        let mut changed = false;
        if let Some(direction) = ScrollDirection::from_delta(delta) {
            if direction != self.direction {
                self.direction = direction;
                changed = true;
            }
        }

        DirectionSample {
            delta,
            direction: self.direction,
            changed,
            scroll_y,
        }
    }
}
