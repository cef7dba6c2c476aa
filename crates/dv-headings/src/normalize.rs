//! Heading detection and canonical rewriting.
//!
//! Recognizes ATX headings, setext headings and "implicit" title-like lines,
//! and rewrites each into the canonical `## Text {#anchor}` form. Detection is
//! purely heuristic; per line the first matching rule wins and anything
//! ambiguous is left alone.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::FenceTracker;
use crate::slug::SlugCounter;

/// Maximum length of a setext level-2 heading text.
pub const SETEXT_MAX_LEN: usize = 100;

/// Maximum length of an implicit heading line.
pub const IMPLICIT_MAX_LEN: usize = 80;

/// Maximum word count for the Title-Case test.
pub const TITLE_CASE_MAX_WORDS: usize = 15;

/// Minimum ratio of capitalized words for the Title-Case test.
pub const TITLE_CASE_MIN_RATIO: f64 = 0.6;

/// Maximum stop-word ratio for an implicit heading.
pub const STOPWORD_MAX_RATIO: f64 = 0.5;

static ATX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})\s+(.*?)(\s*\{#([A-Za-z0-9_-]+)\})?\s*$").unwrap()
});
static SETEXT_EQ_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^={3,}\s*$").unwrap());
static SETEXT_DASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-{3,}\s*$").unwrap());
static LIST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([*\-+]\s+|\d+[.)]\s+)").unwrap());
static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(-{3,}|\*{3,}|_{3,})\s*$").unwrap());
static INLINE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]\([^)]+\)").unwrap());
static ENUMERATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)*|[IVXLCDM]+|[A-Z])(?:[.)])?\s+").unwrap());
static NUMERIC_PART_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*$").unwrap());
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z']+").unwrap());

/// Common English function words; a title-like line dominated by these is
/// almost certainly a sentence fragment, not a heading.
const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "then", "than", "because", "as", "of", "at", "by",
    "for", "with", "about", "into", "through", "during", "before", "after", "above", "below",
    "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
];

/// Auxiliary verbs; their presence marks a line as running prose.
const AUX_VERBS: &[&str] = &[
    "is", "are", "was", "were", "be", "being", "been", "have", "has", "had", "do", "does", "did",
    "will", "shall", "can", "should", "may", "might", "must",
];

/// Normalize all recognized headings to `## Text {#anchor}` form.
///
/// Anchors are unique per document; an existing explicit `{#anchor}` on an
/// ATX heading is preserved, which makes the pass idempotent. Content inside
/// fenced code blocks is never scanned.
#[must_use]
pub fn normalize_headings(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let n = lines.len();
    let mut slugs = SlugCounter::new();

    // Seed the counter with user-authored anchors so auto-generated slugs
    // never collide with them.
    let mut fence = FenceTracker::new();
    for line in &lines {
        if fence.update(line) || fence.in_fence() {
            continue;
        }
        if let Some(caps) = ATX_RE.captures(line)
            && let Some(anchor) = caps.get(4)
        {
            slugs.seed(anchor.as_str());
        }
    }

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

        if let Some(caps) = ATX_RE.captures(line) {
            if caps.get(4).is_some() {
                // Explicit anchor: keep the line exactly as authored
                out.push(line.to_owned());
            } else {
                let level = caps[1].len();
                let heading_text = caps[2].trim();
                let slug = slugs.assign(heading_text);
                out.push(format!("{} {heading_text} {{#{slug}}}", "#".repeat(level)));
            }
            i += 1;
            continue;
        }

        // Setext level 1: text underlined with ===
        if i + 1 < n && SETEXT_EQ_RE.is_match(lines[i + 1]) {
            let heading_text = line.trim();
            if !heading_text.is_empty() {
                let slug = slugs.assign(heading_text);
                out.push(format!("# {heading_text} {{#{slug}}}"));
                i += 2;
                continue;
            }
        }

        // Setext level 2: text underlined with ---. A dash line after a blank
        // line is a horizontal rule, not an underline.
        if i + 1 < n && SETEXT_DASH_RE.is_match(lines[i + 1]) {
            let heading_text = line.trim();
            let prev_blank = i == 0 || lines[i - 1].trim().is_empty();
            if !heading_text.is_empty()
                && !prev_blank
                && heading_text.chars().count() <= SETEXT_MAX_LEN
            {
                let slug = slugs.assign(heading_text);
                out.push(format!("## {heading_text} {{#{slug}}}"));
                i += 2;
                continue;
            }
        }

        if let Some(rewritten) = implicit_heading(&lines, i, &mut slugs) {
            out.push(rewritten);
            i += 1;
            continue;
        }

        out.push(line.to_owned());
        i += 1;
    }

    out.join("\n")
}

/// Try to promote a blank-line-sandwiched, title-like line to a heading.
fn implicit_heading(lines: &[&str], i: usize, slugs: &mut SlugCounter) -> Option<String> {
    let line = lines[i];
    let trimmed = line.trim();
    let n = lines.len();

    let prev_blank = i == 0 || lines[i - 1].trim().is_empty();
    let next_blank = i + 1 >= n || lines[i + 1].trim().is_empty();
    if !prev_blank || !next_blank {
        return None;
    }

    let is_table_like = line.contains('|') && line.trim_start().starts_with('|');
    if LIST_RE.is_match(line)
        || is_table_like
        || trimmed.starts_with('>')
        || RULE_RE.is_match(line)
        || is_link_heavy(line)
    {
        return None;
    }
    if trimmed.chars().count() > IMPLICIT_MAX_LEN || trimmed.ends_with('.') {
        return None;
    }

    let num_level = numeric_heading_level(line);
    if !(is_title_case(trimmed) || is_all_caps(trimmed) || num_level > 0) {
        return None;
    }

    // Stop-word ratio and auxiliary verbs guard against promoting sentences
    let words: Vec<String> = WORD_RE
        .find_iter(line)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    if !words.is_empty() {
        let stops = words.iter().filter(|w| STOPWORDS.contains(&w.as_str())).count();
        #[allow(clippy::cast_precision_loss)]
        let stop_ratio = stops as f64 / words.len() as f64;
        if stop_ratio > STOPWORD_MAX_RATIO {
            return None;
        }
        if words.iter().any(|w| AUX_VERBS.contains(&w.as_str())) {
            return None;
        }
    }

    let level = if num_level > 0 {
        (1 + num_level).min(6)
    } else {
        2
    };
    let heading_text = ENUMERATOR_RE.replace(line, "").trim().to_owned();
    let slug = slugs.assign(&heading_text);
    Some(format!("{} {heading_text} {{#{slug}}}", "#".repeat(level)))
}

fn is_link_heavy(line: &str) -> bool {
    line.contains("http://") || line.contains("https://") || INLINE_LINK_RE.is_match(line)
}

/// Title-Case test: at least 60% of at most 15 words start with a capital.
fn is_title_case(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || words.len() > TITLE_CASE_MAX_WORDS {
        return false;
    }
    let capitalized = words
        .iter()
        .filter(|w| {
            w.chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() && c.is_uppercase())
        })
        .count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = capitalized as f64 / words.len() as f64;
    ratio >= TITLE_CASE_MIN_RATIO
}

/// ALL-CAPS test: has letters and every letter is uppercase.
fn is_all_caps(text: &str) -> bool {
    let mut has_letter = false;
    for c in text.chars().filter(char::is_ascii_alphabetic) {
        has_letter = true;
        if !c.is_uppercase() {
            return false;
        }
    }
    has_letter
}

/// Depth of a leading enumerator, or 0 if none.
///
/// Numeric enumerators (`2.1`) map to their dotted depth; roman numerals and
/// single capital letters count as depth 1.
fn numeric_heading_level(line: &str) -> usize {
    let Some(caps) = ENUMERATOR_RE.captures(line) else {
        return 0;
    };
    let part = &caps[1];
    if NUMERIC_PART_RE.is_match(part) {
        part.matches('.').count() + 1
    } else {
        1
    }
}
