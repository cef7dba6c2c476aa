//! Fenced-block classification markers.
//!
//! Every fenced block gets a `<!-- dv:block=... -->` comment stamped on the
//! line before its opening fence. The markers are advisory: downstream
//! converters read them as corroborating evidence, and they stay in the text
//! for the renderer to strip.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::consts::{BOX_CHARS, CODE_TOKEN_THRESHOLD, CODE_TOKENS, MIN_ARROWS};
use crate::fences::rewrite_blocks;
use crate::knowledge::SipKnowledge;

const MARKER_PREFIX: &str = "<!-- dv:block=";

static RESPONSE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[1-6]\d\d\b").unwrap());
static FLOWCHART_EDGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_.-]{2,}\s*->\s*[A-Za-z0-9_.-]{2,}").unwrap());

/// Heuristic classification of a fenced block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockMarker {
    /// Reads as program source; converters must leave it alone.
    CodeOnly,
    /// Arrows plus SIP vocabulary: likely a signaling transcript.
    CandidateSip,
    /// Box-drawing art without message arrows: likely a network diagram.
    CandidateTopology,
    /// Plain `a -> b` arrow pairs without SIP vocabulary.
    CandidateFlowchart,
    /// No strong signal either way.
    CodeBlock,
}

impl BlockMarker {
    /// Classify a block body, first match wins.
    pub fn classify(body: &str) -> Self {
        let token_score: usize = CODE_TOKENS.iter().map(|tok| body.matches(tok).count()).sum();
        if token_score >= CODE_TOKEN_THRESHOLD {
            return Self::CodeOnly;
        }

        let arrows = body.matches("->").count() + body.matches("=>").count();
        let kb = SipKnowledge::shared();
        if arrows >= MIN_ARROWS
            && (kb.find_method(body).is_some() || RESPONSE_LINE_RE.is_match(body))
        {
            return Self::CandidateSip;
        }

        let boxy = body.contains("+---") || BOX_CHARS.iter().any(|c| body.contains(*c));
        if boxy && !body.contains("->") {
            return Self::CandidateTopology;
        }

        if FLOWCHART_EDGE_RE.find_iter(body).count() >= MIN_ARROWS {
            return Self::CandidateFlowchart;
        }

        Self::CodeBlock
    }

    /// Marker key as embedded in the comment.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CodeOnly => "code-only",
            Self::CandidateSip => "candidate-sip",
            Self::CandidateTopology => "candidate-topology",
            Self::CandidateFlowchart => "candidate-flowchart",
            Self::CodeBlock => "code-block",
        }
    }

    /// The full HTML comment form of the marker.
    pub fn comment(self) -> String {
        format!("{MARKER_PREFIX}{self} -->")
    }
}

impl fmt::Display for BlockMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stamp a classification marker before every fenced block.
///
/// Block content is untouched; a block already carrying a marker on the
/// preceding line is not re-stamped.
#[must_use]
pub fn annotate_blocks(text: &str) -> String {
    rewrite_blocks(text, |block| {
        if already_marked(block.doc, block.start) {
            return None;
        }
        let marker = BlockMarker::classify(block.body);
        debug!(marker = marker.as_str(), "classified fenced block");
        Some(format!("{}\n{}", marker.comment(), block.raw))
    })
}

/// The line directly above the fence is already a marker comment.
fn already_marked(doc: &str, fence_start: usize) -> bool {
    let before = &doc[..fence_start];
    let Some(line_start) = before.trim_end_matches('\n').rfind('\n').map(|i| i + 1) else {
        return before.trim_start().starts_with(MARKER_PREFIX);
    };
    before[line_start..].trim().starts_with(MARKER_PREFIX)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_classify_code_only() {
        let body = "int x = 0;\nfor (i = 0; i < n; i++) {\n}";
        assert_eq!(BlockMarker::classify(body), BlockMarker::CodeOnly);
    }

    #[test]
    fn test_classify_candidate_sip() {
        let body = "UAC -> Proxy: INVITE\nProxy -> UAS: INVITE";
        assert_eq!(BlockMarker::classify(body), BlockMarker::CandidateSip);
    }

    #[test]
    fn test_classify_sip_by_response_code() {
        let body = "a -> b\n180 Ringing\nb -> a";
        assert_eq!(BlockMarker::classify(body), BlockMarker::CandidateSip);
    }

    #[test]
    fn test_classify_candidate_topology() {
        let body = "┌────────┐\n│ Router │\n└────────┘";
        assert_eq!(BlockMarker::classify(body), BlockMarker::CandidateTopology);
    }

    #[test]
    fn test_topology_needs_absence_of_arrows() {
        let body = "+---+ a -> b\n+---+ c -> d";
        assert_ne!(BlockMarker::classify(body), BlockMarker::CandidateTopology);
    }

    #[test]
    fn test_classify_candidate_flowchart() {
        let body = "start -> middle\nmiddle -> end";
        assert_eq!(BlockMarker::classify(body), BlockMarker::CandidateFlowchart);
    }

    #[test]
    fn test_classify_default() {
        assert_eq!(BlockMarker::classify("just some text"), BlockMarker::CodeBlock);
    }

    #[test]
    fn test_single_arrow_is_not_sip() {
        let body = "INVITE -> proxy";
        assert_ne!(BlockMarker::classify(body), BlockMarker::CandidateSip);
    }

    #[test]
    fn test_annotate_stamps_marker() {
        let out = annotate_blocks("intro\n```\nstart -> a\na -> end\n```");
        assert_eq!(
            out,
            "intro\n<!-- dv:block=candidate-flowchart -->\n```\nstart -> a\na -> end\n```"
        );
    }

    #[test]
    fn test_annotate_keeps_body_byte_identical() {
        let doc = "```\n  weird   spacing\t\n```";
        let out = annotate_blocks(doc);
        assert!(out.ends_with(doc));
    }

    #[test]
    fn test_annotate_idempotent() {
        let doc = "text\n```\nplain\n```\nmore";
        let once = annotate_blocks(doc);
        assert_eq!(annotate_blocks(&once), once);
    }

    #[test]
    fn test_annotate_block_at_document_start() {
        let out = annotate_blocks("```\nplain\n```");
        assert_eq!(out, "<!-- dv:block=code-block -->\n```\nplain\n```");
    }
}
