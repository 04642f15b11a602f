// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lifecycle hooks run when listeners are enabled or disabled.
//!
//! Hooks are looked up by `(event kind, phase)` in [`hook`]. A hook returning
//! `false` vetoes the operation; a missing entry always proceeds.

use core::fmt;
use core::hash::Hash;

use crate::event::EventKind;
use crate::registry::{RegionId, Registry};
use crate::session::ScrollSession;

/// When a hook runs relative to enabling or disabling a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Phase {
    BeforeOn,
    AfterOn,
    BeforeOff,
    AfterOff,
}

pub(crate) type Hook<E> = fn(&mut Registry<E>, &mut ScrollSession, RegionId) -> bool;

/// Returns the hook registered for `kind` in `phase`, if any.
pub(crate) fn hook<E>(kind: EventKind, phase: Phase) -> Option<Hook<E>>
where
    E: Clone + Eq + Hash + fmt::Debug,
{
    match (kind, phase) {
        (EventKind::DirectionChanged, Phase::BeforeOn) => Some(join_direction as Hook<E>),
        (EventKind::DirectionChanged, Phase::BeforeOff) => Some(leave_direction as Hook<E>),
        (EventKind::StateChanged, Phase::BeforeOn) => Some(join_state as Hook<E>),
        (EventKind::StateChanged, Phase::BeforeOff) => Some(leave_state as Hook<E>),
        (EventKind::MatchChanged, _) | (_, Phase::AfterOn | Phase::AfterOff) => None,
    }
}

/// Runs the hook for `kind` in `phase`; absent hooks proceed.
pub(crate) fn run<E>(
    kind: EventKind,
    phase: Phase,
    registry: &mut Registry<E>,
    session: &mut ScrollSession,
    id: RegionId,
) -> bool
where
    E: Clone + Eq + Hash + fmt::Debug,
{
    hook(kind, phase).is_none_or(|hook| hook(registry, session, id))
}

fn join_direction<E>(registry: &mut Registry<E>, _: &mut ScrollSession, id: RegionId) -> bool
where
    E: Clone + Eq + Hash + fmt::Debug,
{
    registry.join(EventKind::DirectionChanged, id);
    true
}

fn leave_direction<E>(registry: &mut Registry<E>, _: &mut ScrollSession, id: RegionId) -> bool
where
    E: Clone + Eq + Hash + fmt::Debug,
{
    registry.leave(EventKind::DirectionChanged, id);
    true
}

fn join_state<E>(registry: &mut Registry<E>, _: &mut ScrollSession, id: RegionId) -> bool
where
    E: Clone + Eq + Hash + fmt::Debug,
{
    registry.join(EventKind::StateChanged, id);
    true
}

/// Leaving the state view gives back the region's stack height and forgets
/// its state, so re-joining reports an initial state again.
fn leave_state<E>(registry: &mut Registry<E>, session: &mut ScrollSession, id: RegionId) -> bool
where
    E: Clone + Eq + Hash + fmt::Debug,
{
    if registry.leave(EventKind::StateChanged, id) {
        if let Some(at) = registry.index_of(id) {
            registry.release(at, &mut session.stack);
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_membership_kinds_have_hooks() {
        for phase in [Phase::BeforeOn, Phase::BeforeOff] {
            assert!(hook::<u32>(EventKind::DirectionChanged, phase).is_some());
            assert!(hook::<u32>(EventKind::StateChanged, phase).is_some());
            assert!(hook::<u32>(EventKind::MatchChanged, phase).is_none());
        }
        for kind in EventKind::ALL {
            assert!(hook::<u32>(kind, Phase::AfterOn).is_none());
            assert!(hook::<u32>(kind, Phase::AfterOff).is_none());
        }
    }

    #[test]
    fn missing_hooks_proceed() {
        let mut registry = Registry::<u32>::default();
        let mut session = ScrollSession::new(0.0);
        let id = registry.allocate_id();
        assert!(run(
            EventKind::MatchChanged,
            Phase::BeforeOn,
            &mut registry,
            &mut session,
            id
        ));
    }
}
