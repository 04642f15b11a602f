// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor highlight tracking: pick the navigation anchor the reader is currently in.
//!
//! [`AnchorTracker`] keeps the destinations of a navigation's in-page links,
//! sorted by their top edge. On every scroll sample it computes a selection
//! line `scroll_y + viewport_height * trigger_fraction` and selects the **last**
//! target whose top lies above that line. There is no per-anchor state machine:
//!
//! - if no target qualifies, the previous selection is kept (a selection never
//!   regresses to "none" once made);
//! - a change is reported only when the selected target's id differs from the
//!   previously reported one.
//!
//! The host rebuilds the target list wholesale with [`AnchorTracker::refresh`]
//! whenever layout may have changed.
//!
//! ## Minimal example
//!
//! ```
//! use understory_sticky::anchor::{AnchorTarget, AnchorTracker};
//!
//! let mut anchors = AnchorTracker::new();
//! anchors.refresh([
//!     AnchorTarget::new("intro", 100.0, 300.0, "#intro"),
//!     AnchorTarget::new("usage", 300.0, 600.0, "#usage"),
//!     AnchorTarget::new("faq", 600.0, 900.0, "#faq"),
//! ]);
//!
//! // Viewport 400 tall: the selection line sits 100 below the scroll position.
//! let current = anchors.on_scroll(250.0, 400.0).map(|t| t.id);
//! assert_eq!(current, Some("usage"));
//!
//! // Nothing above the line at the very top: the selection is kept.
//! assert!(anchors.on_scroll(0.0, 400.0).is_none());
//! assert_eq!(anchors.current().map(|t| t.id), Some("usage"));
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::event::ListenerId;
use crate::options::AnchorOptions;

/// A link destination: where it sits in the document and which link points at it.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorTarget<K, L> {
    /// Identifier of the destination.
    pub id: K,
    /// Document-space top of the destination.
    pub top: f64,
    /// Document-space bottom of the destination.
    pub bottom: f64,
    /// The navigation link pointing at the destination.
    pub link: L,
}

impl<K, L> AnchorTarget<K, L> {
    /// Creates a target.
    #[must_use]
    pub fn new(id: K, top: f64, bottom: f64, link: L) -> Self {
        Self {
            id,
            top,
            bottom,
            link,
        }
    }
}

type AnchorListener<K, L> = Box<dyn FnMut(&AnchorTarget<K, L>)>;

/// Selects the current anchor from scroll position.
pub struct AnchorTracker<K, L> {
    options: AnchorOptions,
    targets: Vec<AnchorTarget<K, L>>,
    current: Option<AnchorTarget<K, L>>,
    listeners: Vec<(ListenerId, AnchorListener<K, L>)>,
    next_listener: u64,
}

impl<K: fmt::Debug, L: fmt::Debug> fmt::Debug for AnchorTracker<K, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorTracker")
            .field("options", &self.options)
            .field("targets", &self.targets)
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<K, L> Default for AnchorTracker<K, L>
where
    K: Clone + PartialEq + fmt::Debug,
    L: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, L> AnchorTracker<K, L>
where
    K: Clone + PartialEq + fmt::Debug,
    L: Clone,
{
    /// Creates an empty tracker using the default trigger fraction.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(AnchorOptions::default())
    }

    /// Creates an empty tracker with explicit options.
    #[must_use]
    pub fn with_options(options: AnchorOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
            current: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> AnchorOptions {
        self.options
    }

    /// Targets, sorted by top.
    #[must_use]
    pub fn targets(&self) -> &[AnchorTarget<K, L>] {
        &self.targets
    }

    /// The last reported selection.
    #[must_use]
    pub fn current(&self) -> Option<&AnchorTarget<K, L>> {
        self.current.as_ref()
    }

    /// Replaces every target; equal tops keep their given order.
    ///
    /// The current selection is kept, even if its target is no longer present.
    pub fn refresh<I>(&mut self, targets: I)
    where
        I: IntoIterator<Item = AnchorTarget<K, L>>,
    {
        self.targets.clear();
        self.targets.extend(targets);
        self.targets.sort_by(|a, b| a.top.total_cmp(&b.top));
    }

    /// Attaches a listener called with each newly selected target.
    pub fn on<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&AnchorTarget<K, L>) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Detaches a listener; returns `false` if it was not attached.
    pub fn off(&mut self, listener: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != listener);
        self.listeners.len() != before
    }

    /// The target that would be selected at `line`, without updating state.
    #[must_use]
    pub fn target_at(&self, line: f64) -> Option<&AnchorTarget<K, L>> {
        self.targets
            .iter()
            .rev()
            .find(|t| t.top.is_finite() && t.top < line)
    }

    /// Processes a scroll sample; returns the new selection if it changed.
    pub fn on_scroll(
        &mut self,
        scroll_y: f64,
        viewport_height: f64,
    ) -> Option<&AnchorTarget<K, L>> {
        let line = scroll_y + viewport_height * self.options.trigger_fraction;
        let candidate = self.target_at(line)?;
        if self.current.as_ref().is_some_and(|c| c.id == candidate.id) {
            return None;
        }

        let selected = candidate.clone();
        tracing::trace!(anchor = ?selected.id, scroll_y, line, "current anchor changed");
        for (_, listener) in &mut self.listeners {
            listener(&selected);
        }
        self.current = Some(selected);
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    fn tracker() -> AnchorTracker<u32, &'static str> {
        let mut anchors = AnchorTracker::new();
        anchors.refresh([
            AnchorTarget::new(600, 600.0, 800.0, "#c"),
            AnchorTarget::new(100, 100.0, 300.0, "#a"),
            AnchorTarget::new(300, 300.0, 600.0, "#b"),
        ]);
        anchors
    }

    #[test]
    fn refresh_sorts_by_top() {
        let anchors = tracker();
        let tops: Vec<f64> = anchors.targets().iter().map(|t| t.top).collect();
        assert_eq!(tops, [100.0, 300.0, 600.0]);
    }

    #[test]
    fn selects_closest_preceding_anchor() {
        let mut anchors = tracker();
        assert_eq!(anchors.on_scroll(250.0, 400.0).map(|t| t.id), Some(300));
    }

    #[test]
    fn no_qualifying_anchor_keeps_previous() {
        let mut anchors = tracker();
        anchors.on_scroll(250.0, 400.0);
        assert!(anchors.on_scroll(0.0, 400.0).is_none());
        assert_eq!(anchors.current().map(|t| t.id), Some(300));
    }

    #[test]
    fn no_qualifying_anchor_without_previous_stays_none() {
        let mut anchors = tracker();
        assert!(anchors.on_scroll(0.0, 400.0).is_none());
        assert!(anchors.current().is_none());
    }

    #[test]
    fn line_is_exclusive() {
        let mut anchors = tracker();
        // Line at exactly 300: anchor@300 does not qualify yet.
        assert_eq!(anchors.on_scroll(200.0, 400.0).map(|t| t.id), Some(100));
        assert_eq!(anchors.on_scroll(200.5, 400.0).map(|t| t.id), Some(300));
    }

    #[test]
    fn same_anchor_is_reported_once() {
        let mut anchors = tracker();
        assert!(anchors.on_scroll(250.0, 400.0).is_some());
        assert!(anchors.on_scroll(260.0, 400.0).is_none());
        assert!(anchors.on_scroll(400.0, 400.0).is_none());
        assert_eq!(anchors.on_scroll(520.0, 400.0).map(|t| t.id), Some(600));
    }

    #[test]
    fn scrolling_back_selects_earlier_anchor() {
        let mut anchors = tracker();
        anchors.on_scroll(700.0, 400.0);
        assert_eq!(anchors.on_scroll(150.0, 400.0).map(|t| t.id), Some(100));
    }

    #[test]
    fn custom_trigger_fraction() {
        let mut anchors = AnchorTracker::with_options(AnchorOptions {
            trigger_fraction: 0.5,
        });
        anchors.refresh([AnchorTarget::new(1_u8, 300.0, 400.0, ())]);
        assert!(anchors.on_scroll(100.0, 400.0).is_none());
        assert!(anchors.on_scroll(101.0, 400.0).is_some());
    }

    #[test]
    fn non_finite_tops_never_qualify() {
        let mut anchors = AnchorTracker::new();
        anchors.refresh([
            AnchorTarget::new(1_u8, f64::NAN, f64::NAN, ()),
            AnchorTarget::new(2, 10.0, 20.0, ()),
        ]);
        assert_eq!(anchors.on_scroll(1_000.0, 400.0).map(|t| t.id), Some(2));
    }

    #[test]
    fn listeners_see_each_change_until_detached() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut anchors = tracker();
        let sink = Rc::clone(&seen);
        let id = anchors.on(move |t| sink.borrow_mut().push(t.id));

        anchors.on_scroll(250.0, 400.0);
        anchors.on_scroll(260.0, 400.0);
        anchors.on_scroll(600.0, 400.0);
        assert!(anchors.off(id));
        assert!(!anchors.off(id));
        anchors.on_scroll(0.0, 400.0);
        anchors.on_scroll(150.0, 400.0);

        assert_eq!(*seen.borrow(), vec![300, 600]);
    }

    #[test]
    fn refresh_keeps_selection() {
        let mut anchors = tracker();
        anchors.on_scroll(250.0, 400.0);
        anchors.refresh([AnchorTarget::new(900, 900.0, 1_000.0, "#z")]);
        assert_eq!(anchors.current().map(|t| t.id), Some(300));
        assert!(anchors.on_scroll(0.0, 400.0).is_none());
    }
}
