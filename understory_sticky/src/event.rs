// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notification kinds and payloads.

use crate::direction::{DirectionSample, ScrollDirection};
use crate::registry::RegionId;
use crate::state::StickyState;

/// Kind of notification a listener subscribes to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum EventKind {
    /// The region's pin state (and parent zone) changed.
    StateChanged,
    /// The global scroll direction changed.
    DirectionChanged,
    /// The region's media gate opened or closed.
    MatchChanged,
}

impl EventKind {
    /// All kinds, in dispatch order.
    pub const ALL: [Self; 3] = [Self::DirectionChanged, Self::StateChanged, Self::MatchChanged];

    /// Stable event name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::StateChanged => "state-changed",
            Self::DirectionChanged => "direction-changed",
            Self::MatchChanged => "match-changed",
        }
    }

    pub(crate) const fn flag(self) -> Subscriptions {
        match self {
            Self::StateChanged => Subscriptions::STATE,
            Self::DirectionChanged => Subscriptions::DIRECTION,
            Self::MatchChanged => Subscriptions::MATCH,
        }
    }
}

bitflags::bitflags! {
    /// Set of event kinds a region has listeners for.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Subscriptions: u8 {
        /// `state-changed` listeners are attached.
        const STATE     = 0b0000_0001;
        /// `direction-changed` listeners are attached.
        const DIRECTION = 0b0000_0010;
        /// `match-changed` listeners are attached.
        const MATCH     = 0b0000_0100;
    }
}

/// Identifies an attached listener so it can be detached later.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

/// Region data carried by every notification.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionSnapshot {
    /// Region handle.
    pub id: RegionId,
    /// Document-space top of the wrapper.
    pub wrapper_top: f64,
    /// Rendered height of the content.
    pub content_height: f64,
    /// Threshold in effect for the region.
    pub threshold: f64,
    /// Pin state and parent zone.
    pub state: StickyState,
    /// Media gate state; `None` when ungated or not evaluated yet.
    pub media_matched: Option<bool>,
}

/// A notification delivered to listeners.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StickyEvent {
    /// What happened.
    pub kind: EventKind,
    /// The region concerned, as of the notification.
    pub region: RegionSnapshot,
    /// Scroll position the notification was computed for.
    pub scroll_y: f64,
    /// `previous - current` scroll delta; absent for synthetic notifications.
    pub delta: Option<f64>,
    /// Scroll direction at the time of the notification.
    pub direction: Option<ScrollDirection>,
}

impl StickyEvent {
    pub(crate) fn sampled(
        kind: EventKind,
        region: RegionSnapshot,
        sample: &DirectionSample,
    ) -> Self {
        Self {
            kind,
            region,
            scroll_y: sample.scroll_y,
            delta: Some(sample.delta),
            direction: Some(sample.direction),
        }
    }

    pub(crate) fn synthetic(
        kind: EventKind,
        region: RegionSnapshot,
        scroll_y: f64,
        direction: ScrollDirection,
    ) -> Self {
        Self {
            kind,
            region,
            scroll_y,
            delta: None,
            direction: Some(direction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_distinct_flags() {
        let all = EventKind::ALL
            .iter()
            .fold(Subscriptions::empty(), |acc, k| acc | k.flag());
        assert_eq!(all, Subscriptions::all());
    }

    #[test]
    fn names_are_stable() {
        assert_eq!(EventKind::StateChanged.name(), "state-changed");
        assert_eq!(EventKind::DirectionChanged.name(), "direction-changed");
        assert_eq!(EventKind::MatchChanged.name(), "match-changed");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn kinds_serialize_with_event_names() {
        for kind in EventKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, alloc::format!("\"{}\"", kind.name()));
        }
    }
}
