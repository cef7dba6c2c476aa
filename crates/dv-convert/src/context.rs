//! Context signals around a fenced block.
//!
//! Converters never look at a block in isolation: the nearest preceding
//! heading and any annotation marker stamped shortly before the fence both
//! weigh into whether a conversion is trusted.

use crate::annotate::BlockMarker;
use crate::consts::{
    HEADING_SCAN_LINES, MARKER_WINDOW, SIGNALING_HEADING_KEYWORDS, SKIP_LANGS,
    TOPOLOGY_HEADING_KEYWORDS,
};

/// What the nearest preceding heading suggests about a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingContext {
    Topology,
    Signaling,
    Neutral,
}

impl HeadingContext {
    /// Classify the nearest heading within [`HEADING_SCAN_LINES`] lines above
    /// the byte offset `start`.
    pub fn before(doc: &str, start: usize) -> Self {
        let Some(heading) = heading_before(doc, start) else {
            return Self::Neutral;
        };
        // Topology outranks signaling when a heading matches both
        if TOPOLOGY_HEADING_KEYWORDS.iter().any(|k| heading.contains(k)) {
            Self::Topology
        } else if SIGNALING_HEADING_KEYWORDS.iter().any(|k| heading.contains(k)) {
            Self::Signaling
        } else {
            Self::Neutral
        }
    }
}

/// Nearest heading line above `start`, lowercased, within the scan window.
pub fn heading_before(doc: &str, start: usize) -> Option<String> {
    let lines: Vec<&str> = doc[..start].lines().collect();
    lines
        .iter()
        .rev()
        .take(HEADING_SCAN_LINES)
        .find(|line| line.trim_start().starts_with('#'))
        .map(|line| line.trim().to_lowercase())
}

/// Whether `marker` was stamped within [`MARKER_WINDOW`] characters before
/// the fence at byte offset `start`.
pub fn marker_before(doc: &str, start: usize, marker: BlockMarker) -> bool {
    let from = start.saturating_sub(MARKER_WINDOW);
    // Clamp to a character boundary; the window size is approximate anyway
    let from = (0..=from).rev().find(|&i| doc.is_char_boundary(i)).unwrap_or(0);
    doc[from..start].contains(&marker.comment())
}

/// Fence language tags that opt a block out of conversion entirely.
pub fn is_skip_lang(lang: &str) -> bool {
    SKIP_LANGS.contains(&lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_before_finds_nearest() {
        let doc = "## First\ntext\n## Second Flow\nmore\nblock starts here";
        let start = doc.len();
        assert_eq!(heading_before(doc, start).as_deref(), Some("## second flow"));
    }

    #[test]
    fn test_heading_before_window_limited() {
        let filler = "line\n".repeat(HEADING_SCAN_LINES + 2);
        let doc = format!("## Far Away\n{filler}end");
        assert_eq!(heading_before(&doc, doc.len()), None);
    }

    #[test]
    fn test_context_topology() {
        let doc = "## Network Topology\n\n";
        assert_eq!(HeadingContext::before(doc, doc.len()), HeadingContext::Topology);
    }

    #[test]
    fn test_context_signaling() {
        let doc = "## Call Flow\n\n";
        assert_eq!(HeadingContext::before(doc, doc.len()), HeadingContext::Signaling);
    }

    #[test]
    fn test_context_neutral_without_heading() {
        assert_eq!(HeadingContext::before("plain text\n", 11), HeadingContext::Neutral);
    }

    #[test]
    fn test_topology_beats_signaling_in_same_heading() {
        let doc = "## SIP Network Setup\n\n";
        assert_eq!(HeadingContext::before(doc, doc.len()), HeadingContext::Topology);
    }

    #[test]
    fn test_marker_before() {
        let doc = "<!-- dv:block=candidate-sip -->\n```\nx\n```";
        let start = doc.find("```").unwrap();
        assert!(marker_before(doc, start, BlockMarker::CandidateSip));
        assert!(!marker_before(doc, start, BlockMarker::CodeOnly));
    }

    #[test]
    fn test_marker_outside_window_ignored() {
        let filler = "x".repeat(MARKER_WINDOW + 10);
        let doc = format!("<!-- dv:block=candidate-sip -->\n{filler}\n```\nx\n```");
        let start = doc.find("```").unwrap();
        assert!(!marker_before(&doc, start, BlockMarker::CandidateSip));
    }

    #[test]
    fn test_skip_langs() {
        assert!(is_skip_lang("rust"));
        assert!(is_skip_lang("mermaid"));
        assert!(!is_skip_lang(""));
        assert!(!is_skip_lang("text"));
    }
}
