// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host collaborators: geometry lookups and role resolution.
//!
//! The trackers in this crate never walk a document or measure layout on their
//! own. Hosts implement [`Geometry`] to report post-layout measurements, and
//! [`Document`] to resolve the wrapper/content/parent roles of a registered
//! element and to evaluate media queries.
//!
//! Every lookup returns `Option`: `None` means the element is gone (detached,
//! never laid out) and the tracker recovers locally instead of failing.

use core::fmt::Debug;
use core::hash::Hash;

use crate::state::Bounds;

/// Post-layout measurements in document space.
///
/// Implementations must reflect layout at call time.
pub trait Geometry {
    /// Host element handle.
    type Element: Clone + Eq + Hash + Debug;

    /// Document-space top of `element`.
    fn top(&self, element: &Self::Element) -> Option<f64>;

    /// Rendered height of `element`.
    fn height(&self, element: &Self::Element) -> Option<f64>;

    /// Vertical extent of `element`.
    fn bounds(&self, element: &Self::Element) -> Option<Bounds> {
        let top = self.top(element)?;
        let height = self.height(element)?;
        Some(Bounds::from_top_height(top, height))
    }
}

/// Role resolution and media evaluation on top of [`Geometry`].
pub trait Document: Geometry {
    /// Returns `true` if `element` matches `selector`.
    fn matches(&self, element: &Self::Element, selector: &str) -> bool;

    /// First descendant of `element` matching `selector`.
    fn first_descendant(&self, element: &Self::Element, selector: &str) -> Option<Self::Element>;

    /// Closest proper ancestor of `element` matching `selector`.
    fn closest_ancestor(&self, element: &Self::Element, selector: &str) -> Option<Self::Element>;

    /// Evaluates a media query against the current viewport.
    ///
    /// The default treats every query as matching.
    fn media_matches(&self, _query: &str) -> bool {
        true
    }
}

/// Which part of a region a lookup concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The placeholder that stays in flow.
    Wrapper,
    /// The content that gets pinned.
    Content,
    /// The containing region limiting how long the content stays pinned.
    Parent,
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Wrapper => "wrapper",
            Self::Content => "content",
            Self::Parent => "parent",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Strip;

    impl Geometry for Strip {
        type Element = u8;

        fn top(&self, element: &u8) -> Option<f64> {
            (*element < 4).then(|| f64::from(*element) * 10.0)
        }

        fn height(&self, _element: &u8) -> Option<f64> {
            Some(10.0)
        }
    }

    impl Document for Strip {
        fn matches(&self, _element: &u8, _selector: &str) -> bool {
            false
        }

        fn first_descendant(&self, _element: &u8, _selector: &str) -> Option<u8> {
            None
        }

        fn closest_ancestor(&self, _element: &u8, _selector: &str) -> Option<u8> {
            None
        }
    }

    #[test]
    fn media_queries_match_by_default() {
        assert!(Strip.media_matches("(max-width: 600px)"));
        assert!(Strip.media_matches(""));
    }

    #[test]
    fn bounds_default_to_top_plus_height() {
        assert_eq!(Strip.bounds(&2), Some(Bounds::new(20.0, 30.0)));
        assert_eq!(Strip.bounds(&9), None);
    }

    #[test]
    fn roles_display_lowercase() {
        assert_eq!(alloc::format!("{}", Role::Parent), "parent");
    }
}
