//! Classification thresholds.
//!
//! All values are empirically tuned; changing any of them changes which
//! blocks convert and is a deliberate behavior change, not a cleanup.

/// Summed occurrences of programming tokens at which a block counts as code.
pub const CODE_TOKEN_THRESHOLD: usize = 3;

/// Minimum arrow-like sequences for a block to read as a message flow.
pub const MIN_ARROWS: usize = 2;

/// How far back (in characters) an annotation marker still applies to a fence.
pub const MARKER_WINDOW: usize = 400;

/// How many lines above a fence to scan for a context heading.
pub const HEADING_SCAN_LINES: usize = 10;

/// Box-drawing character occurrences at which a block reads as a diagram.
pub const BOX_CHAR_THRESHOLD: usize = 5;

/// Distinct topology keyword hits required alongside box characters.
pub const TOPOLOGY_TERM_THRESHOLD: usize = 2;

/// Participant bounds for a sequence diagram; outside them the signal is
/// considered too noisy and the block is left unchanged.
pub const MIN_PARTICIPANTS: usize = 2;
pub const MAX_PARTICIPANTS: usize = 8;

/// Longest note text carried into a sequence diagram.
pub const NOTE_MAX_LEN: usize = 50;

/// Substring counts that mark a block as program source rather than a diagram.
pub const CODE_TOKENS: &[&str] = &[
    ";", "=", "++", "--", "{", "}", "return ", "for ", "while ", "if (",
];

/// Fence language tags that are never converted.
pub const SKIP_LANGS: &[&str] = &[
    "c",
    "cpp",
    "c++",
    "java",
    "go",
    "rust",
    "js",
    "ts",
    "javascript",
    "typescript",
    "python",
    "py",
    "json",
    "xml",
    "mermaid",
];

/// Unicode box-drawing characters used by ASCII-art diagrams.
pub const BOX_CHARS: &[char] = &['┌', '─', '┐', '│', '└', '┘', '├', '┤', '┬', '┴'];

/// Entity names recognized in topology diagrams.
pub const TOPOLOGY_TERMS: &[&str] = &["UAC", "UAS", "Router", "Server", "Switch", "Gateway", "Proxy"];

/// Headings containing one of these suggest a network topology diagram.
pub const TOPOLOGY_HEADING_KEYWORDS: &[&str] =
    &["topology", "network", "architecture", "setup", "configuration"];

/// Headings containing one of these suggest a signaling/sequence diagram.
pub const SIGNALING_HEADING_KEYWORDS: &[&str] =
    &["flow", "signaling", "sequence", "call flow", "message flow", "sip"];
