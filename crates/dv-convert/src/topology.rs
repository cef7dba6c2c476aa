//! ASCII network topology art to flowcharts.
//!
//! Box-drawing diagrams naming known network entities become a left-to-right
//! Mermaid flowchart: one node per distinct entity in first-seen order,
//! chained with a generic transport label.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::annotate::BlockMarker;
use crate::consts::{BOX_CHARS, BOX_CHAR_THRESHOLD, TOPOLOGY_TERMS, TOPOLOGY_TERM_THRESHOLD};
use crate::context::{HeadingContext, is_skip_lang, marker_before};
use crate::fences::rewrite_blocks;

/// `Name (detail)` where the name is a known entity, optionally numbered.
static NODE_WITH_DETAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b((?:UAC|UAS|Router|Server|Switch|Gateway|Proxy)(?: ?\d+)?)\s*\(([^)]+)\)")
        .unwrap()
});
static NODE_BARE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b((?:UAC|UAS|Router|Server|Switch|Gateway|Proxy)(?: ?\d+)?)\b").unwrap()
});
static IP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.\d+\.\d+\.\d+").unwrap());

const NODE_STYLE: &str =
    "    classDef default fill:#e3f2fd,stroke:#1976d2,stroke-width:2px,color:#000";

/// Convert qualifying fenced blocks into Mermaid flowcharts.
#[must_use]
pub fn convert_topology(text: &str) -> String {
    rewrite_blocks(text, |block| {
        if is_skip_lang(&block.lang) {
            return None;
        }
        if marker_before(block.doc, block.start, BlockMarker::CodeOnly) {
            return None;
        }
        let ctx = HeadingContext::before(block.doc, block.start);
        if ctx == HeadingContext::Signaling {
            return None;
        }
        if ctx != HeadingContext::Topology
            && !marker_before(block.doc, block.start, BlockMarker::CandidateTopology)
        {
            return None;
        }
        if !detect_topology(block.body) {
            return None;
        }
        let converted = render_flowchart(block.body);
        if converted.is_some() {
            debug!("converted topology block to flowchart");
        }
        converted
    })
}

/// Box-drawing density plus either known entity names or IP addresses.
fn detect_topology(body: &str) -> bool {
    let box_count: usize = BOX_CHARS.iter().map(|c| body.matches(*c).count()).sum();
    if box_count < BOX_CHAR_THRESHOLD {
        return false;
    }
    let term_hits = TOPOLOGY_TERMS.iter().filter(|t| body.contains(**t)).count();
    term_hits >= TOPOLOGY_TERM_THRESHOLD || IP_RE.is_match(body)
}

/// Build the flowchart, or `None` when fewer than two entities are found.
fn render_flowchart(body: &str) -> Option<String> {
    let mut nodes: Vec<String> = Vec::new();
    let mut details: Vec<Option<String>> = Vec::new();

    for caps in NODE_WITH_DETAIL_RE.captures_iter(body) {
        push_node(&mut nodes, &mut details, caps[1].trim(), Some(caps[2].trim()));
    }
    for caps in NODE_BARE_RE.captures_iter(body) {
        push_node(&mut nodes, &mut details, caps[1].trim(), None);
    }
    if nodes.len() < 2 {
        return None;
    }

    let mut mer = vec!["```mermaid".to_owned(), "flowchart LR".to_owned()];
    for (i, (node, detail)) in nodes.iter().zip(&details).enumerate() {
        let label = match detail {
            Some(d) => format!("{node}<br/>{d}"),
            None => node.clone(),
        };
        mer.push(format!("    N{i}[\"{label}\"]"));
    }
    for i in 0..nodes.len() - 1 {
        mer.push(format!("    N{i} -->|TCP/RTP| N{}", i + 1));
    }
    mer.push(NODE_STYLE.to_owned());
    mer.push("```".to_owned());
    Some(mer.join("\n"))
}

/// Record an entity the first time it is seen (case-insensitive identity).
fn push_node(nodes: &mut Vec<String>, details: &mut Vec<Option<String>>, name: &str, detail: Option<&str>) {
    if nodes.iter().any(|n| n.eq_ignore_ascii_case(name)) {
        return;
    }
    nodes.push(name.to_owned());
    details.push(detail.map(str::to_owned));
}
