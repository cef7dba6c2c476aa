//! Stray attribute-token cleanup.
//!
//! The normalizer writes `{#anchor}` tokens onto heading lines. Tokens of the
//! same shape anywhere else are author mistakes or copy-paste artifacts and
//! would leak into rendered output as literal braces, so they are stripped.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::FenceTracker;

static HEADING_WITH_ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#{1,6}\s+.*\{#[A-Za-z0-9_-]+\}\s*$").unwrap());
static TRAILING_ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\{#([A-Za-z0-9_-]+)\}\s*$").unwrap());
static STRAY_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\{#?[A-Za-z0-9_-]+\}").unwrap());
static SETEXT_UNDERLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[=-]{3,}\s*$").unwrap());

/// Remove `{#token}`-shaped attribute tokens from non-heading lines.
///
/// Heading lines keep their trailing anchor, normalized to a single leading
/// space. Lines under a setext underline are left alone so an anchor-carrying
/// setext heading survives. Fenced code is never touched.
#[must_use]
pub fn sanitize_attr_tokens(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let n = lines.len();
    let mut fence = FenceTracker::new();
    let mut out: Vec<String> = Vec::with_capacity(n);
    let mut i = 0;
    while i < n {
        let line = lines[i];
        if fence.update(line) || fence.in_fence() {
            out.push(line.to_owned());
            i += 1;
            continue;
        }

        if HEADING_WITH_ANCHOR_RE.is_match(line) {
            let cleaned = TRAILING_ANCHOR_RE.replace(line, " {#$1}");
            out.push(cleaned.trim_end().to_owned());
            i += 1;
            continue;
        }

        // Setext heading text plus its underline pass through as a pair
        if i + 1 < n && SETEXT_UNDERLINE_RE.is_match(lines[i + 1]) && !line.trim().is_empty() {
            out.push(line.to_owned());
            out.push(lines[i + 1].to_owned());
            i += 2;
            continue;
        }

        out.push(STRAY_TOKEN_RE.replace_all(line, "").into_owned());
        i += 1;
    }

    out.join("\n")
}
