//! SIP call-flow transcripts to sequence diagrams.
//!
//! Handles two transcript shapes: `A -> B: msg` edge lists, and column
//! ladders where participants head the block and box-drawing arrows carry
//! messages between adjacent columns. Conversion is gated on heading context
//! or an annotation marker and fails closed on every weak signal.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::annotate::BlockMarker;
use crate::consts::{CODE_TOKEN_THRESHOLD, CODE_TOKENS, MAX_PARTICIPANTS, MIN_ARROWS, MIN_PARTICIPANTS, NOTE_MAX_LEN};
use crate::context::{HeadingContext, is_skip_lang, marker_before};
use crate::fences::rewrite_blocks;
use crate::knowledge::SipKnowledge;

/// Participants assumed when a ladder header is unreadable.
const DEFAULT_PARTICIPANTS: &[&str] = &["UAC", "Router1", "Router2", "UAS"];

const RIGHT_ARROWS: &[&str] = &["──>", "→"];
const LEFT_ARROWS: &[&str] = &["<──", "←"];
const NOTE_CHARS: &[char] = &['┌', '├', '└'];

static EDGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_.-]{2,})\s*(?:->|=>)\s*([A-Za-z0-9_.-]{2,})\s*:?\s*(.*)$").unwrap()
});
static RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[1-6]\d\d\b").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(T\+\d+\w*)").unwrap());
static MULTISPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());
static UNSAFE_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_]").unwrap());

/// Convert qualifying fenced blocks into Mermaid sequence diagrams.
#[must_use]
pub fn convert_sip_flows(text: &str) -> String {
    rewrite_blocks(text, |block| {
        if is_skip_lang(&block.lang) {
            return None;
        }
        if marker_before(block.doc, block.start, BlockMarker::CodeOnly) {
            return None;
        }
        let ctx = HeadingContext::before(block.doc, block.start);
        if ctx == HeadingContext::Topology {
            return None;
        }
        // Without a signaling heading a stamped candidate marker still
        // qualifies the block
        if ctx != HeadingContext::Signaling
            && !marker_before(block.doc, block.start, BlockMarker::CandidateSip)
        {
            return None;
        }
        if looks_like_program_code(block.body) || !has_flow_signals(block.body) {
            return None;
        }

        let lines: Vec<&str> = block.body.lines().filter(|l| !l.trim().is_empty()).collect();
        let kb = SipKnowledge::shared();
        if !lines
            .iter()
            .any(|l| kb.find_method(l).is_some() || RESPONSE_RE.is_match(l))
        {
            return None;
        }

        // Column ladders carry box-drawing arrows; edge lists use ASCII ->
        let is_ladder = lines.iter().any(|l| {
            RIGHT_ARROWS.iter().chain(LEFT_ARROWS).any(|a| l.contains(a))
        });
        let converted = if is_ladder {
            let header = ladder_participants(&lines).unwrap_or_default();
            convert_ladder(&lines, &header, kb)
        } else {
            convert_edges(&lines, kb)
        };
        if converted.is_some() {
            debug!("converted signaling block to sequence diagram");
        }
        converted
    })
}

/// Summed programming-token occurrences reach the code threshold.
fn looks_like_program_code(body: &str) -> bool {
    let score: usize = CODE_TOKENS.iter().map(|tok| body.matches(tok).count()).sum();
    score >= CODE_TOKEN_THRESHOLD
}

/// At least two arrows plus SIP vocabulary somewhere in the body.
fn has_flow_signals(body: &str) -> bool {
    let arrows = body.matches("->").count()
        + body.matches("=>").count()
        + body.matches("──>").count()
        + body.matches("<──").count()
        + body.matches('→').count()
        + body.matches('←').count();
    if arrows < MIN_ARROWS {
        return false;
    }
    let kb = SipKnowledge::shared();
    kb.find_method(body).is_some() || RESPONSE_RE.is_match(body)
}

/// Participant names from the ladder header: the first early line splitting
/// into three or more multi-space-separated columns. Parenthetical address
/// annotations and timing columns are dropped.
fn ladder_participants(lines: &[&str]) -> Option<Vec<String>> {
    for line in lines.iter().take(5) {
        if line.trim_start().starts_with('-') || line.contains("Time") {
            continue;
        }
        let parts: Vec<&str> = MULTISPACE_RE.split(line.trim()).collect();
        if parts.len() < 3 {
            continue;
        }
        let cleaned: Vec<String> = parts
            .iter()
            .filter(|p| !p.starts_with("T+"))
            .map(|p| PAREN_RE.replace_all(p, "").trim().to_owned())
            .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("time"))
            .collect();
        return Some(cleaned);
    }
    None
}

/// Column-ladder transcript to a sequence diagram.
fn convert_ladder(lines: &[&str], header: &[String], kb: &SipKnowledge) -> Option<String> {
    if header.len() > MAX_PARTICIPANTS {
        return None;
    }
    let participants: Vec<String> = if header.len() < MIN_PARTICIPANTS {
        DEFAULT_PARTICIPANTS.iter().map(|p| (*p).to_owned()).collect()
    } else {
        header.to_vec()
    };

    let mut mer = vec!["```mermaid".to_owned(), "sequenceDiagram".to_owned()];
    for p in &participants {
        mer.push(format!("    participant {} as {p}", safe_id(p)));
    }

    let first = safe_id(&participants[0]);
    let second = safe_id(&participants[1]);
    let last = safe_id(&participants[participants.len() - 1]);
    let penultimate = safe_id(&participants[participants.len() - 2]);

    let mut interactions = 0;
    let mut current_time: Option<String> = None;
    for line in lines.iter().skip(1) {
        if line.trim_start().starts_with("---") {
            continue;
        }
        if let Some(caps) = TIME_RE.captures(line) {
            current_time = Some(caps[1].to_owned());
        }

        if RIGHT_ARROWS.iter().any(|a| line.contains(a)) {
            let message = name_message(line, kb, current_time.as_deref(), 10);
            mer.push(format!("    {first}->>{second}: {message}"));
            interactions += 1;
        } else if LEFT_ARROWS.iter().any(|a| line.contains(a)) {
            let message = name_response(line, kb, current_time.as_deref());
            mer.push(format!("    {last}-->>{penultimate}: {message}"));
            interactions += 1;
        } else if line.contains(NOTE_CHARS) {
            let note: String = line.replace(['┌', '├', '└', '─'], "");
            let note = note.trim();
            if note.chars().count() > 3 {
                mer.push(format!("    Note over {second}: {}", truncate_note(note)));
                interactions += 1;
            }
        }
    }
    if interactions == 0 {
        return None;
    }
    mer.push("```".to_owned());
    Some(mer.join("\n"))
}

/// Edge-list transcript (`A -> B: msg` lines) to a sequence diagram.
fn convert_edges(lines: &[&str], kb: &SipKnowledge) -> Option<String> {
    let mut participants: Vec<String> = Vec::new();
    let mut edges: Vec<(String, String, String)> = Vec::new();
    for line in lines {
        let Some(caps) = EDGE_RE.captures(line) else {
            continue;
        };
        let (a, b) = (caps[1].to_owned(), caps[2].to_owned());
        let msg = match caps[3].trim() {
            "" => name_message(line, kb, None, 10),
            m => m.to_owned(),
        };
        for p in [&a, &b] {
            if !participants.contains(p) {
                participants.push(p.clone());
            }
        }
        edges.push((a, b, msg));
    }
    if participants.len() < MIN_PARTICIPANTS || participants.len() > MAX_PARTICIPANTS {
        return None;
    }

    let mut mer = vec!["```mermaid".to_owned(), "sequenceDiagram".to_owned()];
    for p in &participants {
        mer.push(format!("    participant {} as {p}", safe_id(p)));
    }
    for (a, b, msg) in edges {
        mer.push(format!("    {}->>{}: {msg}", safe_id(&a), safe_id(&b)));
    }
    mer.push("```".to_owned());
    Some(mer.join("\n"))
}

/// Label a rightbound message: method, response code, timing suffix and a
/// parenthesized SDP attribute when present.
fn name_message(line: &str, kb: &SipKnowledge, time: Option<&str>, code_prefix: usize) -> String {
    let mut message = if let Some(method) = kb.find_method(line) {
        method.to_owned()
    } else if let Some((code, reason)) = kb.find_response(line, code_prefix) {
        format!("{code} {reason}")
    } else {
        "Message".to_owned()
    };
    if let Some(t) = time {
        message = format!("{message} [{t}]");
    }
    if let Some(attr) = kb.find_sdp_attribute(line)
        && !message.contains(attr)
    {
        message = format!("{message} ({attr})");
    }
    message
}

/// Label a leftbound message; responses dominate, a bare method reads as the
/// success response to it.
fn name_response(line: &str, kb: &SipKnowledge, time: Option<&str>) -> String {
    let mut message = if let Some((code, reason)) = kb.find_response(line, 20) {
        format!("{code} {reason}")
    } else if let Some(method) = kb.find_method(line) {
        format!("200 OK ({method})")
    } else {
        "Response".to_owned()
    };
    if let Some(t) = time {
        message = format!("{message} [{t}]");
    }
    message
}

fn truncate_note(note: &str) -> String {
    if note.chars().count() > NOTE_MAX_LEN {
        let cut: String = note.chars().take(NOTE_MAX_LEN - 3).collect();
        format!("{cut}...")
    } else {
        note.to_owned()
    }
}

/// Mermaid participant identifier: anything outside `[a-zA-Z0-9_]` becomes
/// an underscore.
fn safe_id(name: &str) -> String {
    UNSAFE_ID_RE.replace_all(name, "_").into_owned()
}
