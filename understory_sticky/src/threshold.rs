// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Threshold accumulation for stacked sticky regions.
//!
//! A region's threshold is the total height of the regions ordered before it
//! that are currently pinned. It offsets the region's trigger point so stacked
//! regions pin underneath one another instead of on top.
//!
//! Per-region thresholds are always recomputed with a fresh scan
//! ([`threshold_before`]); only the global [`StackHeight`] is maintained
//! incrementally.
//!
//! ```
//! use understory_sticky::threshold::threshold_before;
//!
//! // (content height, pinned) in document order.
//! let stack = [(50.0, true), (80.0, false), (30.0, true)];
//! assert_eq!(threshold_before(stack, 0), 0.0);
//! assert_eq!(threshold_before(stack, 1), 50.0);
//! assert_eq!(threshold_before(stack, 2), 50.0);
//! assert_eq!(threshold_before(stack, 3), 80.0);
//! ```

/// Sums the heights of pinned entries strictly before `index`.
///
/// `entries` yields `(content_height, pinned)` pairs in registry order.
pub fn threshold_before<I>(entries: I, index: usize) -> f64
where
    I: IntoIterator<Item = (f64, bool)>,
{
    entries
        .into_iter()
        .take(index)
        .filter(|&(_, pinned)| pinned)
        .fold(0.0, |acc, (height, _)| acc + height)
}

/// Running height of every currently pinned region.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StackHeight(f64);

impl StackHeight {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self(0.0)
    }

    /// Returns the current stack height.
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }

    /// Adds a pinned region's height.
    pub fn push(&mut self, height: f64) {
        if height.is_finite() {
            self.0 += height;
        }
    }

    /// Removes a previously pushed height; never drops below zero.
    pub fn pop(&mut self, height: f64) {
        if height.is_finite() {
            self.0 = (self.0 - height).max(0.0);
        }
    }
}
