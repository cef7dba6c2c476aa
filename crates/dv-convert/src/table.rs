//! Whitespace-aligned ASCII tables to pipe tables.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::annotate::BlockMarker;
use crate::consts::{CODE_TOKEN_THRESHOLD, CODE_TOKENS};
use crate::context::{is_skip_lang, marker_before};
use crate::fences::rewrite_blocks;

static MULTISPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());

/// Convert fenced blocks holding column-aligned data into Markdown tables.
///
/// A block qualifies when splitting its lines on runs of two or more spaces
/// yields at least two multi-column rows whose column counts differ by at
/// most one. The first row becomes the header and fixes the width; data rows
/// are padded or truncated to it.
#[must_use]
pub fn convert_ascii_tables(text: &str) -> String {
    rewrite_blocks(text, |block| {
        if is_skip_lang(&block.lang) {
            return None;
        }
        if marker_before(block.doc, block.start, BlockMarker::CodeOnly) {
            return None;
        }
        let token_score: usize = CODE_TOKENS.iter().map(|t| block.body.matches(t).count()).sum();
        if token_score >= CODE_TOKEN_THRESHOLD {
            return None;
        }
        let converted = render_table(block.body);
        if converted.is_some() {
            debug!("converted aligned block to pipe table");
        }
        converted
    })
}

fn render_table(body: &str) -> Option<String> {
    let rows: Vec<Vec<String>> = body
        .lines()
        .filter_map(|line| {
            let cols: Vec<String> = MULTISPACE_RE
                .split(line.trim())
                .map(str::to_owned)
                .collect();
            (cols.len() > 1).then_some(cols)
        })
        .collect();
    if rows.len() < 2 {
        return None;
    }
    let widths: Vec<usize> = rows.iter().map(Vec::len).collect();
    let (min, max) = (widths.iter().min()?, widths.iter().max()?);
    if max - min > 1 {
        return None;
    }

    let width = rows[0].len();
    let mut out = vec![pipe_row(&rows[0], width), pipe_row(&vec!["---".to_owned(); width], width)];
    for row in &rows[1..] {
        out.push(pipe_row(row, width));
    }
    Some(out.join("\n"))
}

/// Render one row padded or truncated to `width` cells.
fn pipe_row(cells: &[String], width: usize) -> String {
    let mut cells: Vec<&str> = cells.iter().take(width).map(String::as_str).collect();
    while cells.len() < width {
        cells.push("");
    }
    format!("| {} |", cells.join(" | "))
}
