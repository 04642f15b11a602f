// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered region storage and membership views.
//!
//! Regions are kept in ascending `wrapper_top` order; regions sharing a top keep
//! their registration order. Membership views list the regions taking part in
//! direction and state dispatch, in the same order.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::error::GeometryUnavailable;
use crate::event::{EventKind, RegionSnapshot, Subscriptions};
use crate::geometry::{Geometry, Role};
use crate::session::ScrollSession;
use crate::state::{Bounds, PinGeometry, StickyState, Transition};
use crate::threshold::{StackHeight, threshold_before};

/// Stable handle of a registered region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RegionId(u32);

impl RegionId {
    /// Returns the raw id.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{}", self.0)
    }
}

/// Cached layout of a region, refreshed on resize and on demand.
///
/// Values the host could not measure are NaN; such a region is skipped by
/// dispatch until it measures again.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegionGeometry {
    /// Document-space top of the wrapper.
    pub wrapper_top: f64,
    /// Rendered height of the content.
    pub content_height: f64,
    /// Limits of the bounding parent, for bounded regions.
    pub parent_bounds: Option<Bounds>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParentLink<E> {
    Unbounded,
    Bounded(E),
    /// The parent could not be measured; the region stays unbounded for good.
    Degraded,
}

/// A tracked sticky region.
#[derive(Clone, Debug)]
pub struct Region<E> {
    id: RegionId,
    element: E,
    wrapper: E,
    content: E,
    parent: ParentLink<E>,
    match_media: Option<String>,
    geometry: RegionGeometry,
    threshold: f64,
    state: StickyState,
    held: f64,
    pub(crate) media: Option<bool>,
    pub(crate) subscriptions: Subscriptions,
}

impl<E: Clone + Eq + Hash + fmt::Debug> Region<E> {
    pub(crate) fn new(
        id: RegionId,
        element: E,
        wrapper: E,
        content: E,
        parent: Option<E>,
        match_media: Option<String>,
    ) -> Self {
        Self {
            id,
            element,
            wrapper,
            content,
            parent: parent.map_or(ParentLink::Unbounded, ParentLink::Bounded),
            match_media,
            geometry: RegionGeometry {
                wrapper_top: f64::NAN,
                content_height: f64::NAN,
                parent_bounds: None,
            },
            threshold: 0.0,
            state: StickyState::default(),
            held: 0.0,
            media: None,
            subscriptions: Subscriptions::empty(),
        }
    }

    /// Re-reads the region's geometry from the host.
    ///
    /// A missing parent permanently downgrades the region to the unbounded rule.
    /// The downgrade is reported once, as a [`Role::Parent`] error, after the
    /// wrapper and content were measured; the region stays usable.
    pub(crate) fn measure<G>(&mut self, host: &G) -> Result<(), GeometryUnavailable>
    where
        G: Geometry<Element = E> + ?Sized,
    {
        let mut degraded = false;
        if let ParentLink::Bounded(parent) = &self.parent {
            match host.bounds(parent).filter(Bounds::is_finite) {
                Some(bounds) => self.geometry.parent_bounds = Some(bounds),
                None => {
                    tracing::warn!(
                        region = %self.id,
                        "parent geometry unavailable, region is now unbounded"
                    );
                    self.parent = ParentLink::Degraded;
                    self.geometry.parent_bounds = None;
                    degraded = true;
                }
            }
        }

        let wrapper_top = host.top(&self.wrapper);
        let content_height = host.height(&self.content);
        self.geometry.wrapper_top = wrapper_top.unwrap_or(f64::NAN);
        self.geometry.content_height = content_height.unwrap_or(f64::NAN);
        if wrapper_top.is_none() {
            return Err(GeometryUnavailable {
                role: Role::Wrapper,
            });
        }
        if content_height.is_none() {
            return Err(GeometryUnavailable {
                role: Role::Content,
            });
        }
        if degraded {
            return Err(GeometryUnavailable { role: Role::Parent });
        }
        Ok(())
    }

    /// Returns the region's handle.
    #[must_use]
    pub fn id(&self) -> RegionId {
        self.id
    }

    /// Returns the element the region was registered with.
    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Returns the wrapper (placeholder) element.
    #[must_use]
    pub fn wrapper(&self) -> &E {
        &self.wrapper
    }

    /// Returns the content element.
    #[must_use]
    pub fn content(&self) -> &E {
        &self.content
    }

    /// Returns the bounding parent element, if the region is still bounded.
    #[must_use]
    pub fn parent(&self) -> Option<&E> {
        match &self.parent {
            ParentLink::Bounded(parent) => Some(parent),
            ParentLink::Unbounded | ParentLink::Degraded => None,
        }
    }

    /// Returns `true` if the region lost its parent and fell back to the unbounded rule.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self.parent, ParentLink::Degraded)
    }

    /// Returns the media query gating the region, if any.
    #[must_use]
    pub fn match_media(&self) -> Option<&str> {
        self.match_media.as_deref()
    }

    /// Returns the cached geometry.
    #[must_use]
    pub fn geometry(&self) -> RegionGeometry {
        self.geometry
    }

    /// Returns the threshold currently offsetting the region's trigger point.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the last evaluated state.
    #[must_use]
    pub fn state(&self) -> StickyState {
        self.state
    }

    /// Returns the event kinds the region has listeners for.
    #[must_use]
    pub fn subscriptions(&self) -> Subscriptions {
        self.subscriptions
    }

    /// Returns `true` if dispatch may include the region.
    ///
    /// Ungated regions always participate; gated ones only while their query matches.
    #[must_use]
    pub fn gate_open(&self) -> bool {
        self.match_media.is_none() || self.media == Some(true)
    }

    /// Captures the data carried by notifications.
    #[must_use]
    pub fn snapshot(&self) -> RegionSnapshot {
        RegionSnapshot {
            id: self.id,
            wrapper_top: self.geometry.wrapper_top,
            content_height: self.geometry.content_height,
            threshold: self.threshold,
            state: self.state,
            media_matched: self.match_media.as_ref().and(self.media),
        }
    }

    /// Geometry for one evaluation, or `None` if any value is unusable.
    fn pin_geometry(&self) -> Option<PinGeometry> {
        let geometry = PinGeometry {
            wrapper_top: self.geometry.wrapper_top,
            threshold: self.threshold,
            content_height: self.geometry.content_height,
            parent: match self.parent {
                ParentLink::Bounded(_) => self.geometry.parent_bounds,
                ParentLink::Unbounded | ParentLink::Degraded => None,
            },
        };
        geometry.is_finite().then_some(geometry)
    }

    fn stacked_height(&self) -> (f64, bool) {
        let height = self.geometry.content_height;
        (
            if height.is_finite() { height } else { 0.0 },
            self.state.pin.is_pinned(),
        )
    }
}

/// Ordered list of region ids taking part in one kind of dispatch.
#[derive(Clone, Debug, Default)]
pub(crate) struct MembershipView {
    ids: SmallVec<[RegionId; 8]>,
}

impl MembershipView {
    pub(crate) fn contains(&self, id: RegionId) -> bool {
        self.ids.contains(&id)
    }

    /// Adds `id` in registry order; returns `false` if it was already present.
    pub(crate) fn insert<E>(&mut self, id: RegionId, regions: &[Region<E>]) -> bool {
        if self.contains(id) {
            return false;
        }
        let rank = position(regions, id);
        let at = self
            .ids
            .iter()
            .position(|&other| position(regions, other) > rank)
            .unwrap_or(self.ids.len());
        self.ids.insert(at, id);
        true
    }

    pub(crate) fn remove(&mut self, id: RegionId) -> bool {
        match self.ids.iter().position(|&other| other == id) {
            Some(at) => {
                self.ids.remove(at);
                true
            }
            None => false,
        }
    }

    /// Copies the current members so callers can mutate the registry while iterating.
    pub(crate) fn snapshot(&self) -> SmallVec<[RegionId; 8]> {
        self.ids.clone()
    }

    pub(crate) fn reorder<E>(&mut self, regions: &[Region<E>]) {
        self.ids.sort_by_key(|&id| position(regions, id));
    }

    #[cfg(test)]
    pub(crate) fn ids(&self) -> &[RegionId] {
        &self.ids
    }
}

fn position<E>(regions: &[Region<E>], id: RegionId) -> usize {
    regions
        .iter()
        .position(|r| r.id == id)
        .unwrap_or(usize::MAX)
}

/// All regions plus the direction and state membership views.
#[derive(Debug)]
pub(crate) struct Registry<E> {
    regions: Vec<Region<E>>,
    by_element: HashMap<E, RegionId>,
    pub(crate) direction_view: MembershipView,
    pub(crate) state_view: MembershipView,
    next_id: u32,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            by_element: HashMap::new(),
            direction_view: MembershipView::default(),
            state_view: MembershipView::default(),
            next_id: 0,
        }
    }
}

impl<E: Clone + Eq + Hash + fmt::Debug> Registry<E> {
    pub(crate) fn allocate_id(&mut self) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn regions(&self) -> &[Region<E>] {
        &self.regions
    }

    pub(crate) fn len(&self) -> usize {
        self.regions.len()
    }

    pub(crate) fn id_of(&self, element: &E) -> Option<RegionId> {
        self.by_element.get(element).copied()
    }

    pub(crate) fn index_of(&self, id: RegionId) -> Option<usize> {
        self.regions.iter().position(|r| r.id == id)
    }

    pub(crate) fn get(&self, id: RegionId) -> Option<&Region<E>> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: RegionId) -> Option<&mut Region<E>> {
        self.regions.iter_mut().find(|r| r.id == id)
    }

    fn view_mut(&mut self, kind: EventKind) -> Option<&mut MembershipView> {
        match kind {
            EventKind::DirectionChanged => Some(&mut self.direction_view),
            EventKind::StateChanged => Some(&mut self.state_view),
            EventKind::MatchChanged => None,
        }
    }

    /// Adds a region to the view dispatching `kind`; returns `false` if already a member.
    pub(crate) fn join(&mut self, kind: EventKind, id: RegionId) -> bool {
        let regions = &self.regions;
        match kind {
            EventKind::DirectionChanged => self.direction_view.insert(id, regions),
            EventKind::StateChanged => self.state_view.insert(id, regions),
            EventKind::MatchChanged => false,
        }
    }

    /// Removes a region from the view dispatching `kind`; returns `false` if it was not a member.
    pub(crate) fn leave(&mut self, kind: EventKind, id: RegionId) -> bool {
        self.view_mut(kind).is_some_and(|view| view.remove(id))
    }

    /// Returns `true` if the region is a member of the view dispatching `kind`.
    pub(crate) fn is_member(&self, kind: EventKind, id: RegionId) -> bool {
        match kind {
            EventKind::DirectionChanged => self.direction_view.contains(id),
            EventKind::StateChanged => self.state_view.contains(id),
            EventKind::MatchChanged => false,
        }
    }

    /// Inserts after every region with a top at or above its own, then derives its threshold.
    pub(crate) fn insert(&mut self, region: Region<E>) -> usize {
        let top = region.geometry.wrapper_top;
        let at = self
            .regions
            .iter()
            .position(|r| r.geometry.wrapper_top.total_cmp(&top) == Ordering::Greater)
            .unwrap_or(self.regions.len());
        self.by_element.insert(region.element.clone(), region.id);
        self.regions.insert(at, region);
        self.recompute_thresholds_from(at);
        at
    }

    /// Removes a region from every view; its held stack height is released.
    pub(crate) fn remove(&mut self, id: RegionId, stack: &mut StackHeight) -> Option<Region<E>> {
        let at = self.index_of(id)?;
        self.direction_view.remove(id);
        self.state_view.remove(id);
        self.release(at, stack);
        let region = self.regions.remove(at);
        self.by_element.remove(&region.element);
        self.recompute_thresholds_from(at);
        Some(region)
    }

    /// Forgets the evaluated state of the region at `at`, giving back its stack height.
    pub(crate) fn release(&mut self, at: usize, stack: &mut StackHeight) {
        let region = &mut self.regions[at];
        let was_pinned = region.state.pin.is_pinned();
        if was_pinned {
            stack.pop(region.held);
        }
        region.held = 0.0;
        region.state.reset();
        if was_pinned {
            self.recompute_thresholds_from(at + 1);
        }
    }

    /// Recomputes thresholds of every region at or after `start` with a fresh scan.
    pub(crate) fn recompute_thresholds_from(&mut self, start: usize) {
        for i in start..self.regions.len() {
            let threshold = threshold_before(self.regions.iter().map(Region::stacked_height), i);
            self.regions[i].threshold = threshold;
        }
    }

    /// Re-measures every region, restores order and recomputes thresholds.
    pub(crate) fn measure_all<G>(&mut self, host: &G)
    where
        G: Geometry<Element = E> + ?Sized,
    {
        for region in &mut self.regions {
            match region.measure(host) {
                // Degraded regions keep being evaluated with the unbounded rule.
                Ok(()) | Err(GeometryUnavailable { role: Role::Parent }) => {}
                Err(err) => tracing::debug!(
                    region = %region.id,
                    %err,
                    "region skipped until it measures again"
                ),
            }
        }
        self.regions
            .sort_by(|a, b| a.geometry.wrapper_top.total_cmp(&b.geometry.wrapper_top));
        self.direction_view.reorder(&self.regions);
        self.state_view.reorder(&self.regions);
        self.recompute_thresholds_from(0);
    }

    /// Evaluates one region against `scroll_y`, maintaining the stack height.
    ///
    /// Returns `None` when nothing flipped or when the region cannot be evaluated.
    pub(crate) fn evaluate(
        &mut self,
        id: RegionId,
        session: &mut ScrollSession,
        scroll_y: f64,
    ) -> Option<Transition> {
        let at = self.index_of(id)?;
        let region = &mut self.regions[at];
        let Some(geometry) = region.pin_geometry() else {
            tracing::trace!(region = %id, "skipping region with unusable geometry");
            return None;
        };
        let transition = region.state.advance(scroll_y, &geometry)?;

        if transition.pinned {
            region.held = geometry.content_height;
            session.stack.push(region.held);
        } else {
            session.stack.pop(region.held);
            region.held = 0.0;
        }
        tracing::trace!(
            region = %id,
            scroll_y,
            pinned = transition.pinned,
            zone = ?region.state.zone,
            stack = session.stack.get(),
            "sticky state changed"
        );
        self.recompute_thresholds_from(at);
        Some(transition)
    }
}
