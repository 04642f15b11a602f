// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only registration and subscription can fail. Steady-state scroll processing
//! never returns an error: a region whose geometry cannot be read is skipped
//! for that sample, and a bounded region whose parent disappears is downgraded
//! to the unbounded rule.

use alloc::string::String;

use thiserror::Error;

use crate::geometry::Role;
use crate::registry::RegionId;

/// A registered element could not be resolved into wrapper and content roles.
///
/// Registration is aborted and nothing is added to the registry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The element is a wrapper but contains no content.
    #[error("wrapper element contains no content matching `{content_selector}`")]
    MissingContent {
        /// Selector used to find the content.
        content_selector: String,
    },
    /// The element is content but has no wrapper ancestor.
    #[error("content element has no ancestor matching `{wrapper_selector}`")]
    MissingWrapper {
        /// Selector used to find the wrapper.
        wrapper_selector: String,
    },
    /// The element is neither a wrapper nor content.
    #[error("element matches neither `{wrapper_selector}` nor `{content_selector}`")]
    Unresolvable {
        /// Selector identifying wrappers.
        wrapper_selector: String,
        /// Selector identifying content.
        content_selector: String,
    },
}

/// A geometry lookup returned nothing for one of a region's elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
#[error("geometry unavailable for {role} element")]
pub struct GeometryUnavailable {
    /// Which element could not be measured.
    pub role: Role,
}

/// Errors returned by [`StickyTracker`](crate::StickyTracker).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StickyError {
    /// Registration failed to resolve the region's roles.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// No region is registered under this id.
    #[error("no sticky region registered with id {0}")]
    UnknownRegion(RegionId),
}
