//! Fenced-block location and replacement.
//!
//! All converters walk the document with the same non-greedy fence pattern;
//! an unterminated fence never matches and passes through verbatim.

use std::sync::LazyLock;

use regex::Regex;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?P<lang>[^\n]*)\n(?P<body>.*?)\n```").unwrap());

/// One fenced block in its surrounding document.
pub struct FencedBlock<'a> {
    /// Full document text.
    pub doc: &'a str,
    /// Byte offset of the opening fence.
    pub start: usize,
    /// Language tag, trimmed and lowercased; empty for a bare fence.
    pub lang: String,
    /// Content between the fences.
    pub body: &'a str,
    /// The complete match including both fence lines.
    pub raw: &'a str,
}

/// Rewrite fenced blocks through `f`; `None` keeps a block unchanged.
pub fn rewrite_blocks<F>(doc: &str, mut f: F) -> String
where
    F: FnMut(&FencedBlock<'_>) -> Option<String>,
{
    let mut out = String::with_capacity(doc.len());
    let mut last = 0;
    for caps in FENCE_RE.captures_iter(doc) {
        let whole = caps.get(0).unwrap();
        let block = FencedBlock {
            doc,
            start: whole.start(),
            lang: caps["lang"].trim().to_lowercase(),
            body: caps.name("body").unwrap().as_str(),
            raw: whole.as_str(),
        };
        out.push_str(&doc[last..whole.start()]);
        match f(&block) {
            Some(replacement) => out.push_str(&replacement),
            None => out.push_str(block.raw),
        }
        last = whole.end();
    }
    out.push_str(&doc[last..]);
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_rewrite_replaces_only_matched_blocks() {
        let doc = "before\n```txt\nbody\n```\nafter";
        let out = rewrite_blocks(doc, |b| {
            assert_eq!(b.lang, "txt");
            assert_eq!(b.body, "body");
            Some("X".to_owned())
        });
        assert_eq!(out, "before\nX\nafter");
    }

    #[test]
    fn test_none_keeps_block() {
        let doc = "```\na\n```";
        assert_eq!(rewrite_blocks(doc, |_| None), doc);
    }

    #[test]
    fn test_unterminated_fence_passes_through() {
        let doc = "```\nnever closed";
        assert_eq!(rewrite_blocks(doc, |_| Some("X".to_owned())), doc);
    }

    #[test]
    fn test_multiple_blocks_independent() {
        let doc = "```\none\n```\nmid\n```\ntwo\n```";
        let out = rewrite_blocks(doc, |b| (b.body == "two").then(|| "T".to_owned()));
        assert_eq!(out, "```\none\n```\nmid\nT");
    }
}
