// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration options.
//!
//! [`StickyOptions`] names the selectors used to resolve a region's roles and an
//! optional media query gating whether the region participates at all.
//! Fields left out when deserializing (with the `serde` feature) fall back to
//! the defaults.
//!
//! ```
//! use understory_sticky::StickyOptions;
//!
//! let options = StickyOptions::default().with_match_media("(min-width: 768px)");
//! assert_eq!(options.wrapper_selector, "[data-sticky-wrapper]");
//! assert_eq!(options.match_media.as_deref(), Some("(min-width: 768px)"));
//! ```

use alloc::string::String;

/// Default selector for the in-flow placeholder.
pub const DEFAULT_WRAPPER_SELECTOR: &str = "[data-sticky-wrapper]";
/// Default selector for the pinned content.
pub const DEFAULT_CONTENT_SELECTOR: &str = "[data-sticky-content]";
/// Default selector for the bounding parent.
pub const DEFAULT_PARENT_SELECTOR: &str = "[data-sticky-parent]";

/// Options for [`StickyTracker::register`](crate::StickyTracker::register).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "kebab-case")
)]
pub struct StickyOptions {
    /// Selector identifying the wrapper (placeholder) element.
    pub wrapper_selector: String,
    /// Selector identifying the content element.
    pub content_selector: String,
    /// Selector identifying a containing region that bounds the pinned content.
    pub parent_selector: String,
    /// Media query that must match for the region to participate.
    pub match_media: Option<String>,
}

impl Default for StickyOptions {
    fn default() -> Self {
        Self {
            wrapper_selector: DEFAULT_WRAPPER_SELECTOR.into(),
            content_selector: DEFAULT_CONTENT_SELECTOR.into(),
            parent_selector: DEFAULT_PARENT_SELECTOR.into(),
            match_media: None,
        }
    }
}

impl StickyOptions {
    /// Replaces the wrapper selector.
    #[must_use]
    pub fn with_wrapper_selector(mut self, selector: impl Into<String>) -> Self {
        self.wrapper_selector = selector.into();
        self
    }

    /// Replaces the content selector.
    #[must_use]
    pub fn with_content_selector(mut self, selector: impl Into<String>) -> Self {
        self.content_selector = selector.into();
        self
    }

    /// Replaces the parent selector.
    #[must_use]
    pub fn with_parent_selector(mut self, selector: impl Into<String>) -> Self {
        self.parent_selector = selector.into();
        self
    }

    /// Gates the region behind a media query.
    #[must_use]
    pub fn with_match_media(mut self, query: impl Into<String>) -> Self {
        self.match_media = Some(query.into());
        self
    }
}

/// Default fraction of the viewport height added to the scroll position when
/// picking the current anchor.
pub const DEFAULT_TRIGGER_FRACTION: f64 = 0.25;

/// Options for [`AnchorTracker`](crate::anchor::AnchorTracker).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "kebab-case")
)]
pub struct AnchorOptions {
    /// Fraction of the viewport height below the scroll position used as the
    /// selection line.
    pub trigger_fraction: f64,
}

impl Default for AnchorOptions {
    fn default() -> Self {
        Self {
            trigger_fraction: DEFAULT_TRIGGER_FRACTION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let options = StickyOptions::default()
            .with_wrapper_selector(".wrap")
            .with_content_selector(".content")
            .with_parent_selector("section");
        assert_eq!(options.wrapper_selector, ".wrap");
        assert_eq!(options.content_selector, ".content");
        assert_eq!(options.parent_selector, "section");
        assert_eq!(options.match_media, None);
    }

    #[test]
    fn anchor_trigger_defaults_to_a_quarter() {
        assert_eq!(AnchorOptions::default().trigger_fraction, 0.25);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_options_merge_with_defaults() {
        let options: StickyOptions =
            serde_json::from_str(r#"{ "content-selector": ".c", "match-media": "print" }"#)
                .unwrap();
        assert_eq!(options.wrapper_selector, DEFAULT_WRAPPER_SELECTOR);
        assert_eq!(options.content_selector, ".c");
        assert_eq!(options.parent_selector, DEFAULT_PARENT_SELECTOR);
        assert_eq!(options.match_media.as_deref(), Some("print"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn anchor_options_deserialize_with_defaults() {
        let options: AnchorOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, AnchorOptions::default());
    }
}
