//! Table-of-contents construction and placement.
//!
//! Scans normalized headings, rebuilds the section hierarchy, assigns dotted
//! section numbers and emits a nested `<ol>` block wrapped in HTML-comment
//! placeholder markers. The downstream renderer splices the block into the
//! final page at the marker position.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::fence::FenceTracker;
use crate::slug::slugify;

/// Opens the generated contents block.
pub const TOC_PLACEHOLDER_START: &str = "<!--TOC_PLACEHOLDER_START-->";
/// Closes the generated contents block.
pub const TOC_PLACEHOLDER_END: &str = "<!--TOC_PLACEHOLDER_END-->";

/// The contents block goes under the first H1 only when that H1 appears
/// within this many lines from the top; otherwise it goes to the very top.
const FIRST_H1_WINDOW: usize = 50;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static TRAILING_ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\{#([A-Za-z0-9_-]+)\}\s*$").unwrap());
static ENUM_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:\d+(?:\.\d+)*\.|[IVXLCDMivxlcdm]+\.|[A-Z]\.)\s*").unwrap()
});
static BOLD_STAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());
static BOLD_UNDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__([^_]+)__").unwrap());
static ITALIC_STAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());
static ITALIC_UNDER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_([^_]+)_").unwrap());
static CODE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static STRIKE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~([^~]+)~~").unwrap());

struct TocNode {
    level: usize,
    text: String,
    anchor: String,
    number: String,
    children: Vec<usize>,
}

/// Insert a numbered table of contents into the document.
///
/// Headings missing an anchor get one derived from their text. A document
/// that already carries a contents block, or has no headings at all, is
/// returned unchanged.
#[must_use]
pub fn build_toc(text: &str) -> String {
    if text.contains(TOC_PLACEHOLDER_START) {
        return text.to_owned();
    }

    let mut lines: Vec<String> = text.lines().map(str::to_owned).collect();

    // Collect headings outside fences: (level, raw text, line index)
    let mut headings: Vec<(usize, String, usize)> = Vec::new();
    let mut first_h1: Option<usize> = None;
    let mut fence = FenceTracker::new();
    for (idx, line) in lines.iter().enumerate() {
        if fence.update(line) || fence.in_fence() {
            continue;
        }
        if let Some(caps) = HEADING_RE.captures(line) {
            let level = caps[1].len();
            headings.push((level, caps[2].to_owned(), idx));
            if level == 1 && first_h1.is_none() {
                first_h1 = Some(idx);
            }
        }
    }
    if headings.is_empty() {
        return text.to_owned();
    }
    debug!(headings = headings.len(), "building table of contents");

    // Headings the normalizer never saw may still lack anchors
    for (_, raw, idx) in &headings {
        if TRAILING_ANCHOR_RE.is_match(raw) {
            continue;
        }
        let display = TRAILING_ANCHOR_RE.replace(raw, "");
        let anchor = match slugify(&display) {
            s if s.is_empty() => "section".to_owned(),
            s => s,
        };
        lines[*idx] = format!("{} {{#{anchor}}}", lines[*idx].trim_end());
    }

    // Rebuild the hierarchy with a stack of open sections
    let mut arena: Vec<TocNode> = Vec::with_capacity(headings.len());
    let mut roots: Vec<usize> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    for (level, raw, idx) in &headings {
        let Some(display) = display_text(raw) else {
            continue;
        };
        let anchor = TRAILING_ANCHOR_RE
            .captures(&lines[*idx])
            .map_or_else(|| slugify(&display), |c| c[1].to_owned());
        let id = arena.len();
        arena.push(TocNode {
            level: *level,
            text: display,
            anchor,
            number: String::new(),
            children: Vec::new(),
        });
        while stack.last().is_some_and(|&top| arena[top].level >= *level) {
            stack.pop();
        }
        match stack.last() {
            Some(&parent) => arena[parent].children.push(id),
            None => roots.push(id),
        }
        stack.push(id);
    }
    if arena.is_empty() {
        return lines.join("\n");
    }

    let mut counters: BTreeMap<usize, u32> = BTreeMap::new();
    let roots_copy = roots.clone();
    assign_numbers(&mut arena, &roots_copy, "", &mut counters);

    let mut rows = vec![
        r#"<div class="generated-toc" role="navigation" aria-label="Table of contents">"#.to_owned(),
        r#"<div class="toc-title">Contents</div>"#.to_owned(),
        r#"<div class="toc-list">"#.to_owned(),
    ];
    render_list(&arena, &roots, 0, &mut rows);
    rows.push("</div>".to_owned());
    rows.push("</div>".to_owned());
    let placeholder = format!("{TOC_PLACEHOLDER_START}{}{TOC_PLACEHOLDER_END}", rows.join("\n"));

    let insert_at = insertion_index(&lines, first_h1);
    lines.splice(insert_at..insert_at, [placeholder, String::new()]);
    lines.join("\n")
}

/// Heading text as shown in the contents: anchor token, leading enumerator
/// and inline markup removed. `None` when nothing displayable remains.
fn display_text(raw: &str) -> Option<String> {
    let s = TRAILING_ANCHOR_RE.replace(raw, "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let s = ENUM_PREFIX_RE.replace(s, "");
    let s = BOLD_STAR_RE.replace_all(&s, "$1");
    let s = BOLD_UNDER_RE.replace_all(&s, "$1");
    let s = ITALIC_STAR_RE.replace_all(&s, "$1");
    let s = ITALIC_UNDER_RE.replace_all(&s, "$1");
    let s = CODE_SPAN_RE.replace_all(&s, "$1");
    let s = STRIKE_RE.replace_all(&s, "$1");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    Some(s.to_owned())
}

/// Dotted section numbering over the sibling lists.
///
/// Counters are shared per level across the whole tree and reset for all
/// deeper levels whenever a shallower heading advances, so `1.2` is followed
/// by `1.2.1` and a later `2` restarts its subsections at `2.1`.
fn assign_numbers(
    arena: &mut [TocNode],
    ids: &[usize],
    parent: &str,
    counters: &mut BTreeMap<usize, u32>,
) {
    for &id in ids {
        let level = arena[id].level;
        let deeper: Vec<usize> = counters.range(level + 1..).map(|(&l, _)| l).collect();
        for l in deeper {
            counters.insert(l, 0);
        }
        let count = counters.entry(level).or_insert(0);
        *count += 1;
        let number = if parent.is_empty() {
            count.to_string()
        } else {
            format!("{parent}.{count}")
        };
        arena[id].number.clone_from(&number);
        let children = arena[id].children.clone();
        assign_numbers(arena, &children, &number, counters);
    }
}

fn render_list(arena: &[TocNode], ids: &[usize], depth: usize, rows: &mut Vec<String>) {
    rows.push(format!(r#"<ol class="toc-ol toc-depth-{depth}">"#));
    for &id in ids {
        let node = &arena[id];
        let has_children = !node.children.is_empty();
        let toggle = if has_children {
            r#"<button class="toc-toggle" aria-expanded="true" title="Collapse section"></button>"#
        } else {
            ""
        };
        let mut item_class = if depth > 0 {
            format!("toc-item toc-l{}", node.level)
        } else {
            "toc-item toc-section".to_owned()
        };
        if has_children {
            item_class.push_str(" toc-collapsible");
        }
        rows.push(format!(
            r##"<li class="{item_class}"><span class="toc-num">{}</span><span class="toc-main">{toggle}<a href="#{}" class="toc-link">{}</a></span>"##,
            node.number, node.anchor, node.text
        ));
        if has_children {
            render_list(arena, &node.children, depth + 1, rows);
        }
        rows.push("</li>".to_owned());
    }
    rows.push("</ol>".to_owned());
}

/// Directly after the first H1 when it sits near the top, skipping the blank
/// lines that follow it; otherwise line zero.
fn insertion_index(lines: &[String], first_h1: Option<usize>) -> usize {
    match first_h1 {
        Some(idx) if idx < FIRST_H1_WINDOW => {
            let mut at = idx + 1;
            while at < lines.len() && lines[at].trim().is_empty() {
                at += 1;
            }
            at
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_no_headings_unchanged() {
        let doc = "just some prose\n\nno headings here";
        assert_eq!(build_toc(doc), doc);
    }

    #[test]
    fn test_existing_placeholder_unchanged() {
        let doc = format!("# T {{#t}}\n\n{TOC_PLACEHOLDER_START}x{TOC_PLACEHOLDER_END}\n\n## S {{#s}}");
        assert_eq!(build_toc(&doc), doc);
    }

    #[test]
    fn test_idempotent() {
        let doc = "# Title {#title}\n\n## Section {#section}\n\nbody";
        let once = build_toc(doc);
        assert_eq!(build_toc(&once), once);
    }

    #[test]
    fn test_placeholder_after_first_h1() {
        let out = build_toc("# Title {#title}\n\n## Section {#section}");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "# Title {#title}");
        assert_eq!(lines[1], "");
        assert!(lines[2].starts_with(TOC_PLACEHOLDER_START));
        assert!(lines[2].ends_with(TOC_PLACEHOLDER_END) || out.contains(TOC_PLACEHOLDER_END));
    }

    #[test]
    fn test_placeholder_at_top_when_h1_late() {
        let mut doc = "filler\n".repeat(60);
        doc.push_str("# Late Title {#late-title}\n## Sub {#sub}");
        let out = build_toc(&doc);
        assert!(out.starts_with(TOC_PLACEHOLDER_START));
    }

    #[test]
    fn test_placeholder_at_top_without_h1() {
        let out = build_toc("## Only Section {#only-section}\n\nbody");
        assert!(out.starts_with(TOC_PLACEHOLDER_START));
    }

    #[test]
    fn test_dotted_numbering() {
        let doc = "# A {#a}\n## B {#b}\n## C {#c}\n### D {#d}\n## E {#e}\n# F {#f}\n## G {#g}";
        let out = build_toc(doc);
        for num in ["1", "1.1", "1.2", "1.2.1", "1.3", "2", "2.1"] {
            assert!(
                out.contains(&format!(r#"<span class="toc-num">{num}</span>"#)),
                "missing section number {num}"
            );
        }
        assert!(!out.contains(r#"<span class="toc-num">1.2.2</span>"#));
    }

    #[test]
    fn test_counter_reset_after_shallower_heading() {
        let doc = "## A {#a}\n### B {#b}\n## C {#c}\n### D {#d}";
        let out = build_toc(doc);
        // second level-3 restarts under its new parent
        assert!(out.contains(r#"<span class="toc-num">2.1</span>"#));
        assert!(!out.contains(r#"<span class="toc-num">2.2</span>"#));
    }

    #[test]
    fn test_entries_link_to_anchors() {
        let out = build_toc("# Guide {#guide}\n## Setup Steps {#setup-steps}");
        assert!(out.contains(r##"href="#guide""##));
        assert!(out.contains(r##"href="#setup-steps""##));
    }

    #[test]
    fn test_missing_anchor_added_to_heading_line() {
        let out = build_toc("## Raw Heading\n\nbody");
        assert!(out.contains("## Raw Heading {#raw-heading}"));
        assert!(out.contains(r##"href="#raw-heading""##));
    }

    #[test]
    fn test_display_text_strips_markup_and_enumerator() {
        assert_eq!(display_text("**Bold** and `code` {#x}").as_deref(), Some("Bold and code"));
        assert_eq!(display_text("2.1. Design Notes").as_deref(), Some("Design Notes"));
        assert_eq!(display_text("IV. Results").as_deref(), Some("Results"));
        assert_eq!(display_text("{#only-anchor}"), None);
    }

    #[test]
    fn test_fenced_headings_ignored() {
        let doc = "```\n# fake {#fake}\n```\n\nprose only";
        assert_eq!(build_toc(doc), doc);
    }

    #[test]
    fn test_nested_list_depth_classes() {
        let out = build_toc("# A {#a}\n## B {#b}\n### C {#c}");
        assert!(out.contains(r#"<ol class="toc-ol toc-depth-0">"#));
        assert!(out.contains(r#"<ol class="toc-ol toc-depth-1">"#));
        assert!(out.contains(r#"<ol class="toc-ol toc-depth-2">"#));
    }

    #[test]
    fn test_collapsible_items_get_toggle() {
        let out = build_toc("# A {#a}\n## B {#b}");
        assert!(out.contains(r#"class="toc-item toc-section toc-collapsible""#));
        assert!(out.contains(r#"<button class="toc-toggle""#));
        assert!(out.contains(r#"class="toc-item toc-l2""#));
    }
}
