// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Sticky: scroll-driven state machines for sticky regions and anchor highlighting.
//!
//! This crate decides *when* scroll-dependent UI state changes and *what* the new
//! state is. It does not render, position, or style anything; hosts react to the
//! notifications it emits.
//!
//! The core concepts are:
//!
//! - [`StickyTracker`]: a registry of sticky regions sharing one
//!   [`ScrollSession`]. Each scroll sample updates the scroll direction, notifies
//!   `direction-changed` subscribers on a direction edge, and evaluates every
//!   `state-changed` subscriber in document order.
//! - [`state::StickyState`]: the per-region machine turning continuous scroll
//!   positions into de-duplicated pin flips, plus the above/inside/below
//!   [`ParentZone`] for regions bounded by a containing region.
//! - [`threshold`]: stacking. A region's trigger point is offset by the height of
//!   the pinned regions ordered before it, so stacked headers pin beneath one
//!   another.
//! - [`direction::DirectionTracker`]: edge-triggered up/down detection.
//! - [`anchor::AnchorTracker`]: an independent selector picking the navigation
//!   anchor closest above a line a quarter of the viewport below the scroll
//!   position.
//!
//! Hosts supply layout through [`Geometry`] and resolve element roles and media
//! queries through [`Document`]. Everything runs synchronously inside the host's
//! scroll or resize handler; nothing blocks or suspends.
//!
//! ## Stacked regions
//!
//! ```rust
//! use understory_sticky::{Document, EventKind, Geometry, StickyOptions, StickyTracker};
//!
//! // Two headers: wrappers 1 and 3 (tops 200 and 400), contents 2 and 4
//! // (heights 50 and 80).
//! struct Page;
//!
//! impl Geometry for Page {
//!     type Element = u32;
//!     fn top(&self, element: &u32) -> Option<f64> {
//!         match element {
//!             1 => Some(200.0),
//!             3 => Some(400.0),
//!             _ => None,
//!         }
//!     }
//!     fn height(&self, element: &u32) -> Option<f64> {
//!         match element {
//!             2 => Some(50.0),
//!             4 => Some(80.0),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl Document for Page {
//!     fn matches(&self, element: &u32, selector: &str) -> bool {
//!         selector == "[data-sticky-wrapper]" && element % 2 == 1
//!     }
//!     fn first_descendant(&self, element: &u32, selector: &str) -> Option<u32> {
//!         (selector == "[data-sticky-content]").then_some(element + 1)
//!     }
//!     fn closest_ancestor(&self, _: &u32, _: &str) -> Option<u32> {
//!         None
//!     }
//! }
//!
//! let mut tracker = StickyTracker::new(Page, 0.0);
//! let first = tracker.register(1, StickyOptions::default()).unwrap();
//! let second = tracker.register(3, StickyOptions::default()).unwrap();
//! for id in [first, second] {
//!     tracker.on(id, EventKind::StateChanged, |_| {}).unwrap();
//! }
//!
//! // The first header pins and pushes the second one's trigger point up by 50.
//! tracker.on_scroll(210.0);
//! assert_eq!(tracker.current_threshold(), 50.0);
//! assert_eq!(tracker.find_by_handle_id(second).unwrap().threshold(), 50.0);
//!
//! // 350 + 50 is not past 400 yet; 351 + 50 is.
//! assert!(tracker.on_scroll(350.0).is_empty());
//! assert_eq!(tracker.on_scroll(351.0).len(), 1);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forward `std` to the logging and error crates.
//! - `serde`: derive `Serialize`/`Deserialize` for options, states, and
//!   notification payloads.
//!
//! This crate is `no_std` and uses `alloc`. It logs through `tracing` and never
//! installs a subscriber.

#![no_std]

extern crate alloc;

pub mod anchor;
pub mod direction;
pub mod state;
pub mod threshold;

mod error;
mod event;
mod geometry;
mod hooks;
mod options;
mod registry;
mod session;
mod tracker;

pub use direction::{DirectionSample, DirectionTracker, ScrollDirection};
pub use error::{ConfigurationError, GeometryUnavailable, StickyError};
pub use event::{EventKind, ListenerId, RegionSnapshot, StickyEvent, Subscriptions};
pub use geometry::{Document, Geometry, Role};
pub use options::{
    AnchorOptions, DEFAULT_CONTENT_SELECTOR, DEFAULT_PARENT_SELECTOR, DEFAULT_TRIGGER_FRACTION,
    DEFAULT_WRAPPER_SELECTOR, StickyOptions,
};
pub use registry::{Region, RegionGeometry, RegionId};
pub use session::ScrollSession;
pub use state::{Bounds, ParentZone, PinState, StickyState};
pub use tracker::StickyTracker;
