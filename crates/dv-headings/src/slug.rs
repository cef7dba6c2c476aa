//! Anchor slug derivation and per-document collision resolution.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static REPEAT_HYPHEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Derive a URL-safe anchor slug from heading text.
///
/// Lowercases, strips characters outside word characters/space/hyphen,
/// collapses whitespace to single hyphens, collapses repeated hyphens and
/// trims leading/trailing hyphens. May return an empty string; callers wanting
/// a non-empty anchor use [`SlugCounter::assign`], which falls back to
/// `"section"`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let s = text.trim().to_lowercase();
    let s = NON_SLUG_RE.replace_all(&s, "");
    let s = WHITESPACE_RE.replace_all(&s, "-");
    let s = REPEAT_HYPHEN_RE.replace_all(&s, "-");
    s.trim_matches('-').to_owned()
}

/// Per-document anchor uniqueness counter, keyed by base slug.
///
/// The first occurrence of a base slug keeps the bare slug; subsequent
/// occurrences append `-2`, `-3`, … in first-seen order. Anchors explicitly
/// authored by the user are seeded before assignment so auto-generated slugs
/// never collide with user-chosen ones.
#[derive(Debug, Default)]
pub struct SlugCounter {
    counts: HashMap<String, u32>,
}

impl SlugCounter {
    /// Create an empty counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a slug as already taken (an explicit user-authored anchor).
    ///
    /// Seeding the same slug twice has no further effect.
    pub fn seed(&mut self, slug: &str) {
        self.counts.entry(slug.to_owned()).or_insert(1);
    }

    /// Assign a unique anchor for the given heading text.
    pub fn assign(&mut self, text: &str) -> String {
        let base = match slugify(text) {
            s if s.is_empty() => "section".to_owned(),
            s => s,
        };
        let count = self.counts.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        }
    }
}
