// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sticky region registry and scroll dispatcher.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;

use crate::direction::ScrollDirection;
use crate::error::{ConfigurationError, StickyError};
use crate::event::{EventKind, ListenerId, StickyEvent};
use crate::geometry::Document;
use crate::hooks::{self, Phase};
use crate::options::StickyOptions;
use crate::registry::{Region, RegionId, Registry};
use crate::session::ScrollSession;

type Listener = Box<dyn FnMut(&StickyEvent)>;

struct ListenerEntry {
    id: ListenerId,
    region: RegionId,
    kind: EventKind,
    callback: Listener,
}

/// Tracks sticky regions of one document and turns scroll samples into notifications.
///
/// The tracker owns its host (see [`Document`]) and a [`ScrollSession`]. Each
/// scroll sample is processed synchronously:
///
/// 1. the scroll direction is updated,
/// 2. if it changed, every region with `direction-changed` listeners is notified,
/// 3. every region with `state-changed` listeners is evaluated in document order
///    and notified only if its pin state flipped.
///
/// Notifications are collected from a snapshot of the membership views first and
/// delivered afterwards, so nothing a listener observes is half-updated. They are
/// also returned to the caller, which is free to register, unregister, or
/// re-subscribe regions afterwards without affecting the pass that produced them.
///
/// ```
/// use understory_sticky::{Document, EventKind, Geometry, StickyOptions, StickyTracker};
///
/// // A one-region document: element 1 is the wrapper, element 2 its content.
/// struct Page;
///
/// impl Geometry for Page {
///     type Element = u32;
///     fn top(&self, element: &u32) -> Option<f64> {
///         Some(if *element == 1 { 200.0 } else { 0.0 })
///     }
///     fn height(&self, _: &u32) -> Option<f64> {
///         Some(50.0)
///     }
/// }
///
/// impl Document for Page {
///     fn matches(&self, element: &u32, selector: &str) -> bool {
///         (*element == 1 && selector == "[data-sticky-wrapper]")
///             || (*element == 2 && selector == "[data-sticky-content]")
///     }
///     fn first_descendant(&self, element: &u32, selector: &str) -> Option<u32> {
///         (*element == 1 && selector == "[data-sticky-content]").then_some(2)
///     }
///     fn closest_ancestor(&self, element: &u32, selector: &str) -> Option<u32> {
///         (*element == 2 && selector == "[data-sticky-wrapper]").then_some(1)
///     }
/// }
///
/// let mut tracker = StickyTracker::new(Page, 0.0);
/// let id = tracker.register(2, StickyOptions::default()).unwrap();
///
/// // Subscribing delivers the initial state right away.
/// tracker.on(id, EventKind::StateChanged, |_| {}).unwrap();
/// assert!(!tracker.find_by_handle_id(id).unwrap().state().pin.is_pinned());
///
/// let events = tracker.on_scroll(250.0);
/// assert_eq!(events.len(), 1);
/// assert!(events[0].region.state.pin.is_pinned());
/// assert_eq!(tracker.current_threshold(), 50.0);
/// ```
pub struct StickyTracker<H: Document> {
    host: H,
    session: ScrollSession,
    registry: Registry<H::Element>,
    listeners: Vec<ListenerEntry>,
    next_listener: u64,
}

impl<H: Document> fmt::Debug for StickyTracker<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StickyTracker")
            .field("session", &self.session)
            .field("regions", &self.registry.len())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<H: Document> StickyTracker<H> {
    /// Creates a tracker whose scroll session starts at `scroll_y`.
    #[must_use]
    pub fn new(host: H, scroll_y: f64) -> Self {
        Self {
            host,
            session: ScrollSession::new(scroll_y),
            registry: Registry::default(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Returns the host mutably, e.g. to apply layout changes before [`Self::refresh`].
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Returns the scroll session.
    #[must_use]
    pub fn session(&self) -> &ScrollSession {
        &self.session
    }

    /// Last sampled scroll position.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.session.scroll_y()
    }

    /// Current scroll direction.
    #[must_use]
    pub fn direction(&self) -> ScrollDirection {
        self.session.direction()
    }

    /// Total height of every pinned region.
    #[must_use]
    pub fn current_threshold(&self) -> f64 {
        self.session.stack_height()
    }

    /// Regions in document order.
    #[must_use]
    pub fn regions(&self) -> &[Region<H::Element>] {
        self.registry.regions()
    }

    /// Looks up a region by handle.
    #[must_use]
    pub fn find_by_handle_id(&self, id: RegionId) -> Option<&Region<H::Element>> {
        self.registry.get(id)
    }

    /// Looks up the region registered for `element`.
    #[must_use]
    pub fn find_by_element(&self, element: &H::Element) -> Option<&Region<H::Element>> {
        self.registry.id_of(element).and_then(|id| self.registry.get(id))
    }

    /// Registers `element` as a sticky region, or returns its existing handle.
    ///
    /// `element` may be either the wrapper or the content; the other role is
    /// resolved through the host with the selectors in `options`. The closest
    /// parent-selector ancestor of the wrapper, if any, bounds the region.
    /// Geometry is measured immediately.
    pub fn register(
        &mut self,
        element: H::Element,
        options: StickyOptions,
    ) -> Result<RegionId, StickyError> {
        if let Some(id) = self.registry.id_of(&element) {
            tracing::debug!(region = %id, "element already registered");
            return Ok(id);
        }

        let (wrapper, content) = resolve_roles(&self.host, &element, &options)?;
        let parent = self
            .host
            .closest_ancestor(&wrapper, &options.parent_selector);
        let bounded = parent.is_some();

        let id = self.registry.allocate_id();
        let mut region = Region::new(id, element, wrapper, content, parent, options.match_media);
        if let Err(err) = region.measure(&self.host) {
            tracing::debug!(region = %id, %err, "registered region could not be measured");
        }
        let index = self.registry.insert(region);
        tracing::debug!(region = %id, index, bounded, "registered sticky region");
        Ok(id)
    }

    /// Removes a region from the registry, every view, and drops its listeners.
    ///
    /// Stack height held by the region is released.
    pub fn unregister(&mut self, id: RegionId) -> Result<Region<H::Element>, StickyError> {
        let region = self
            .registry
            .remove(id, &mut self.session.stack)
            .ok_or(StickyError::UnknownRegion(id))?;
        self.listeners.retain(|l| l.region != id);
        tracing::debug!(region = %id, "unregistered sticky region");
        Ok(region)
    }

    /// Attaches a listener for `kind` notifications of a region.
    ///
    /// The first `state-changed` listener of a region immediately evaluates it
    /// against the current scroll position, delivering its initial state.
    /// For regions gated by a media query, the gate is re-evaluated and one
    /// `match-changed` notification is emitted; `direction-changed` and
    /// `state-changed` listeners only take effect while the query matches.
    pub fn on<F>(
        &mut self,
        id: RegionId,
        kind: EventKind,
        listener: F,
    ) -> Result<ListenerId, StickyError>
    where
        F: FnMut(&StickyEvent) + 'static,
    {
        let region = self
            .registry
            .get_mut(id)
            .ok_or(StickyError::UnknownRegion(id))?;
        region.subscriptions |= kind.flag();
        let gated = region.match_media().is_some();

        let listener_id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push(ListenerEntry {
            id: listener_id,
            region: id,
            kind,
            callback: Box::new(listener),
        });

        let mut events = Vec::new();
        if gated {
            self.apply_media(id, true, &mut events);
        } else {
            self.enable(id, kind, &mut events);
        }
        self.deliver(&events);
        Ok(listener_id)
    }

    /// Detaches a listener; returns `false` if it was not attached.
    ///
    /// Once the last listener of a kind is gone the region leaves the
    /// corresponding view but stays registered.
    pub fn off(
        &mut self,
        id: RegionId,
        kind: EventKind,
        listener: ListenerId,
    ) -> Result<bool, StickyError> {
        if self.registry.get(id).is_none() {
            return Err(StickyError::UnknownRegion(id));
        }
        let before = self.listeners.len();
        self.listeners
            .retain(|l| !(l.id == listener && l.region == id && l.kind == kind));
        if self.listeners.len() == before {
            return Ok(false);
        }

        let remaining = self.listeners.iter().any(|l| l.region == id && l.kind == kind);
        if !remaining {
            if let Some(region) = self.registry.get_mut(id) {
                region.subscriptions.remove(kind.flag());
            }
            self.disable(id, kind);
        }
        Ok(true)
    }

    /// Processes one scroll sample and returns the notifications it produced.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Vec<StickyEvent> {
        let sample = self.session.sample(scroll_y);
        let mut events = Vec::new();

        if sample.changed {
            tracing::trace!(
                direction = ?sample.direction,
                delta = sample.delta,
                "scroll direction changed"
            );
            for id in self.registry.direction_view.snapshot() {
                if let Some(region) = self.registry.get(id) {
                    events.push(StickyEvent::sampled(
                        EventKind::DirectionChanged,
                        region.snapshot(),
                        &sample,
                    ));
                }
            }
        }

        for id in self.registry.state_view.snapshot() {
            if self
                .registry
                .evaluate(id, &mut self.session, scroll_y)
                .is_none()
            {
                continue;
            }
            if let Some(region) = self.registry.get(id) {
                events.push(StickyEvent::sampled(
                    EventKind::StateChanged,
                    region.snapshot(),
                    &sample,
                ));
            }
        }

        self.deliver(&events);
        events
    }

    /// Re-measures every region and re-evaluates media gates.
    ///
    /// Returns the `match-changed` notifications for gates that flipped, followed
    /// by initial `state-changed` notifications of regions whose gate opened.
    pub fn on_resize(&mut self) -> Vec<StickyEvent> {
        self.refresh();
        let ids: SmallVec<[RegionId; 8]> =
            self.registry.regions().iter().map(Region::id).collect();
        let mut events = Vec::new();
        for id in ids {
            self.apply_media(id, false, &mut events);
        }
        self.deliver(&events);
        events
    }

    /// Re-measures every region, restores document order and recomputes thresholds.
    ///
    /// Call this after content that may change layout finished loading, or on a
    /// timer, to heal stale cached geometry.
    pub fn refresh(&mut self) {
        self.registry.measure_all(&self.host);
    }

    /// Adds the region to the view for `kind` if its gate is open.
    fn enable(&mut self, id: RegionId, kind: EventKind, events: &mut Vec<StickyEvent>) {
        if kind == EventKind::MatchChanged || self.registry.is_member(kind, id) {
            return;
        }
        if !self.registry.get(id).is_some_and(Region::gate_open) {
            return;
        }
        if !hooks::run(kind, Phase::BeforeOn, &mut self.registry, &mut self.session, id) {
            return;
        }
        hooks::run(kind, Phase::AfterOn, &mut self.registry, &mut self.session, id);

        if kind == EventKind::StateChanged {
            let scroll_y = self.session.scroll_y();
            if self.registry.evaluate(id, &mut self.session, scroll_y).is_some() {
                if let Some(region) = self.registry.get(id) {
                    events.push(StickyEvent::synthetic(
                        EventKind::StateChanged,
                        region.snapshot(),
                        scroll_y,
                        self.session.direction(),
                    ));
                }
            }
        }
    }

    fn disable(&mut self, id: RegionId, kind: EventKind) {
        if !self.registry.is_member(kind, id) {
            return;
        }
        if hooks::run(kind, Phase::BeforeOff, &mut self.registry, &mut self.session, id) {
            hooks::run(kind, Phase::AfterOff, &mut self.registry, &mut self.session, id);
        }
    }

    /// Re-evaluates a region's media gate.
    ///
    /// Without `force`, `match-changed` is only emitted when the gate flips (or
    /// first opens); with `force` it is always emitted.
    fn apply_media(&mut self, id: RegionId, force: bool, events: &mut Vec<StickyEvent>) {
        let Some(region) = self.registry.get(id) else {
            return;
        };
        let Some(query) = region.match_media() else {
            return;
        };
        let matched = self.host.media_matches(query);
        let previous = region.media;
        let subscriptions = region.subscriptions;

        let flipped = previous.is_some_and(|p| p != matched);
        let first_match = previous.is_none() && matched;
        if !(force || flipped || first_match) {
            if previous.is_none() {
                if let Some(region) = self.registry.get_mut(id) {
                    region.media = Some(matched);
                }
            }
            return;
        }

        let Some(region) = self.registry.get_mut(id) else {
            return;
        };
        region.media = Some(matched);
        tracing::debug!(region = %id, matched, force, "media gate evaluated");
        events.push(StickyEvent::synthetic(
            EventKind::MatchChanged,
            region.snapshot(),
            self.session.scroll_y(),
            self.session.direction(),
        ));

        for kind in [EventKind::DirectionChanged, EventKind::StateChanged] {
            if matched {
                if subscriptions.contains(kind.flag()) {
                    self.enable(id, kind, events);
                }
            } else {
                self.disable(id, kind);
            }
        }
    }

    fn deliver(&mut self, events: &[StickyEvent]) {
        for event in events {
            for entry in self
                .listeners
                .iter_mut()
                .filter(|l| l.region == event.region.id && l.kind == event.kind)
            {
                (entry.callback)(event);
            }
        }
    }
}

/// Resolves the wrapper and content of a registered element.
fn resolve_roles<D: Document + ?Sized>(
    host: &D,
    element: &D::Element,
    options: &StickyOptions,
) -> Result<(D::Element, D::Element), ConfigurationError> {
    if host.matches(element, &options.wrapper_selector) {
        return host
            .first_descendant(element, &options.content_selector)
            .map(|content| (element.clone(), content))
            .ok_or_else(|| ConfigurationError::MissingContent {
                content_selector: options.content_selector.clone(),
            });
    }
    if host.matches(element, &options.content_selector) {
        return host
            .closest_ancestor(element, &options.wrapper_selector)
            .map(|wrapper| (wrapper, element.clone()))
            .ok_or_else(|| ConfigurationError::MissingWrapper {
                wrapper_selector: options.wrapper_selector.clone(),
            });
    }
    Err(ConfigurationError::Unresolvable {
        wrapper_selector: options.wrapper_selector.clone(),
        content_selector: options.content_selector.clone(),
    })
}
