// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-region sticky state machine.
//!
//! [`StickyState::advance`] turns a continuous scroll position into discrete,
//! de-duplicated pin transitions. It owns no geometry: callers describe the
//! region for one evaluation with a [`PinGeometry`].
//!
//! Two rules exist:
//!
//! - **Unbounded**: the region is pinned while `scroll_y + threshold > wrapper_top`.
//! - **Bounded** (parent bounds known): the region is pinned while it has reached
//!   its trigger point *and* the bottom edge of its content
//!   (`scroll_y + threshold + content_height`) has not passed the parent's bottom.
//!   Every pin flip also re-derives the [`ParentZone`].
//!
//! The first evaluation always reports a transition, since any concrete value
//! differs from [`PinState::Unset`].
//!
//! ```
//! use understory_sticky::state::{Bounds, ParentZone, PinGeometry, PinState, StickyState};
//!
//! let mut state = StickyState::default();
//! let geom = PinGeometry {
//!     wrapper_top: 100.0,
//!     threshold: 0.0,
//!     content_height: 50.0,
//!     parent: Some(Bounds::new(100.0, 500.0)),
//! };
//!
//! // Initial evaluation is always a change.
//! assert!(state.advance(0.0, &geom).is_some());
//! assert_eq!(state.zone, ParentZone::Above);
//!
//! // Past the wrapper top: pinned and inside the parent.
//! assert_eq!(state.advance(120.0, &geom).map(|t| t.pinned), Some(true));
//! assert_eq!(state.zone, ParentZone::Inside);
//!
//! // Content bottom passes the parent bottom: unpinned, below.
//! assert_eq!(state.advance(460.0, &geom).map(|t| t.pinned), Some(false));
//! assert_eq!(state.pin, PinState::Unpinned);
//! assert_eq!(state.zone, ParentZone::Below);
//! ```

/// Tri-state pin flag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum PinState {
    /// Never evaluated.
    #[default]
    Unset,
    /// The content has crossed its trigger point and is held fixed.
    Pinned,
    /// The content flows normally.
    Unpinned,
}

impl PinState {
    /// Returns `true` for [`PinState::Pinned`].
    #[must_use]
    pub fn is_pinned(self) -> bool {
        self == Self::Pinned
    }

    fn from_pinned(pinned: bool) -> Self {
        if pinned { Self::Pinned } else { Self::Unpinned }
    }
}

/// Position of a bounded region relative to its containing region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum ParentZone {
    /// Not evaluated, or the region is unbounded.
    #[default]
    Unset,
    /// The trigger point has not been reached yet.
    Above,
    /// Pinned within the parent's limits.
    Inside,
    /// The content's bottom edge has passed the parent's bottom edge.
    Below,
}

/// Vertical extent of a containing region, in document space.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl Bounds {
    /// Creates bounds from a top and bottom edge.
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Creates bounds from a top edge and a height.
    #[must_use]
    pub fn from_top_height(top: f64, height: f64) -> Self {
        Self::new(top, top + height)
    }

    /// Returns `true` if both edges are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.top.is_finite() && self.bottom.is_finite()
    }
}

/// Geometry needed for one evaluation of a region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PinGeometry {
    /// Document-space top of the region's placeholder.
    pub wrapper_top: f64,
    /// Cumulative height of pinned regions ordered before this one.
    pub threshold: f64,
    /// Rendered height of the pinned content.
    pub content_height: f64,
    /// Containing region limits; `None` selects the unbounded rule.
    pub parent: Option<Bounds>,
}

impl PinGeometry {
    /// Returns `true` if every value that takes part in the pin test is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.wrapper_top.is_finite()
            && self.threshold.is_finite()
            && self.content_height.is_finite()
            && self.parent.is_none_or(|b| b.is_finite())
    }

    fn reached(&self, scroll_y: f64) -> bool {
        scroll_y + self.threshold > self.wrapper_top
    }

    fn not_reached(&self, scroll_y: f64) -> bool {
        scroll_y + self.threshold < self.wrapper_top
    }

    fn past_bottom(&self, scroll_y: f64, parent: Bounds) -> bool {
        scroll_y + self.threshold + self.content_height > parent.bottom
    }

    /// Evaluates the pin test for `scroll_y`.
    #[must_use]
    pub fn is_pinned(&self, scroll_y: f64) -> bool {
        match self.parent {
            None => self.reached(scroll_y),
            Some(parent) => self.reached(scroll_y) && !self.past_bottom(scroll_y, parent),
        }
    }

    /// Derives the parent zone for `scroll_y`; [`ParentZone::Unset`] when unbounded.
    #[must_use]
    pub fn zone(&self, scroll_y: f64) -> ParentZone {
        let Some(parent) = self.parent else {
            return ParentZone::Unset;
        };
        if self.not_reached(scroll_y) {
            ParentZone::Above
        } else if self.is_pinned(scroll_y) {
            ParentZone::Inside
        } else if self.past_bottom(scroll_y, parent) {
            ParentZone::Below
        } else {
            // Trigger point sits exactly on the wrapper top.
            tracing::debug!(
                scroll_y,
                wrapper_top = self.wrapper_top,
                "parent zone undetermined, assuming inside"
            );
            ParentZone::Inside
        }
    }
}

/// A pin flip reported by [`StickyState::advance`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// State before the flip.
    pub from: PinState,
    /// Whether the region is now pinned.
    pub pinned: bool,
}

impl Transition {
    /// Returns `true` if this is the first evaluation of the region.
    #[must_use]
    pub fn is_initial(&self) -> bool {
        self.from == PinState::Unset
    }
}

/// Externally observable state of one region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickyState {
    /// Pin flag.
    pub pin: PinState,
    /// Parent sub-state; only maintained for bounded regions.
    pub zone: ParentZone,
}

impl StickyState {
    /// Evaluates the region at `scroll_y` and returns the flip, if any.
    ///
    /// The parent zone is only re-derived when the pin flag flips; it is never
    /// polled on its own.
    pub fn advance(&mut self, scroll_y: f64, geometry: &PinGeometry) -> Option<Transition> {
        let pinned = geometry.is_pinned(scroll_y);
        let next = PinState::from_pinned(pinned);
        if self.pin == next {
            return None;
        }
        let from = self.pin;
        self.pin = next;
        if geometry.parent.is_some() {
            self.zone = geometry.zone(scroll_y);
        }
        Some(Transition { from, pinned })
    }

    /// Forgets the evaluated state so the next evaluation reports a transition.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
