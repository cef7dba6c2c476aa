//! Markdown-to-HTML boundary.
//!
//! The pipeline emits Markdown plus two comment contracts: the TOC
//! placeholder pair and the per-block `dv:block` markers. Rendering pulls
//! the TOC HTML out before parsing so the Markdown parser never sees it,
//! renders the rest, then splices the TOC back and strips the advisory
//! markers from the page.

use std::sync::LazyLock;

use dv_headings::{TOC_PLACEHOLDER_END, TOC_PLACEHOLDER_START};
use pulldown_cmark::{Options, Parser, html};
use regex::Regex;
use tracing::debug;

use crate::enrich;

/// Stand-in comment that survives Markdown parsing at the TOC position.
const TOC_INSERTION_POINT: &str = "<!--TOC_INSERTION_POINT-->";

static TOC_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?s){TOC_PLACEHOLDER_START}(.*?){TOC_PLACEHOLDER_END}")).unwrap()
});
static MARKER_COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!-- dv:block=[a-z-]+ -->\n?").unwrap());

/// Enrich Markdown and render it to an HTML fragment.
///
/// Heading anchors use the `{#slug}` attribute syntax, which the parser
/// turns into element ids, so TOC links resolve within the page. When `gfm`
/// is set the parser supports tables, strikethrough and task lists.
#[must_use]
pub fn render_html(text: &str, experimental: bool, gfm: bool) -> String {
    let enriched = enrich(text, experimental);

    // Lift the TOC HTML out so the parser does not reinterpret it
    let toc_html = TOC_BLOCK_RE
        .captures(&enriched)
        .map(|caps| caps[1].to_owned());
    let markdown = TOC_BLOCK_RE.replace(&enriched, TOC_INSERTION_POINT);

    let mut options = Options::ENABLE_HEADING_ATTRIBUTES;
    if gfm {
        options |= Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
    }
    let parser = Parser::new_ext(&markdown, options);
    let mut rendered = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut rendered, parser);

    if let Some(toc) = toc_html {
        debug!("splicing table of contents into rendered page");
        rendered = rendered.replace(TOC_INSERTION_POINT, &toc);
    }
    MARKER_COMMENT_RE.replace_all(&rendered, "").into_owned()
}
