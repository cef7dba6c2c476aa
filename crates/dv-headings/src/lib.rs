//! Heading normalization, anchor slugs and table-of-contents building.
//!
//! Three of the standard pipeline passes live here, in execution order:
//!
//! - [`normalize_headings`]: detect ATX, setext and implicit headings and
//!   rewrite them into the canonical `## Text {#anchor}` form with unique,
//!   stable anchors.
//! - [`sanitize_attr_tokens`]: strip stray `{#slug}`-shaped tokens from
//!   non-heading prose so they never leak into rendered output.
//! - [`build_toc`]: reconstruct the heading hierarchy, assign dotted section
//!   numbers and insert a navigable contents block behind an HTML-comment
//!   placeholder.
//!
//! Ordering between the passes matters: the sanitizer must run after the
//! normalizer so it does not strip anchors the normalizer just created, and
//! the TOC builder depends on normalized anchors. Content inside fenced code
//! blocks is never touched by any pass.

mod fence;
mod normalize;
mod sanitize;
mod slug;
mod toc;

pub use fence::FenceTracker;
pub use normalize::normalize_headings;
pub use sanitize::sanitize_attr_tokens;
pub use slug::{SlugCounter, slugify};
pub use toc::{TOC_PLACEHOLDER_END, TOC_PLACEHOLDER_START, build_toc};
