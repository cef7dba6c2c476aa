//! Default enrichment pipeline and the HTML rendering boundary.
//!
//! Wires the standard passes (heading normalization, attribute sanitation,
//! TOC building, block annotation) and the experimental converters (topology,
//! signaling, tables) into one [`FeatureRegistry`], in the order the passes
//! depend on each other. [`enrich`] is the Markdown-to-Markdown contract;
//! [`render_html`] additionally hands the result to the collaborating
//! Markdown renderer and splices the TOC block into the final page.

mod render;

use dv_convert::{annotate_blocks, convert_ascii_tables, convert_sip_flows, convert_topology};
use dv_headings::{build_toc, normalize_headings, sanitize_attr_tokens};
use dv_pipeline::{FeatureRegistry, FeatureTier};

pub use render::render_html;

/// The full feature set in canonical execution order.
///
/// Standard passes always run; converters are experimental and opt-in. The
/// order is load-bearing: sanitation must follow normalization, the TOC
/// depends on normalized anchors, annotation must precede the converters
/// that read its markers, and topology outranks signaling which outranks
/// tables when a block could match more than one.
#[must_use]
pub fn default_registry() -> FeatureRegistry {
    let mut registry = FeatureRegistry::new();
    registry.register("STD_NORMALIZE", FeatureTier::Standard, normalize_headings);
    registry.register("STD_SANITIZE_ATTR", FeatureTier::Standard, sanitize_attr_tokens);
    registry.register("STD_TOC", FeatureTier::Standard, build_toc);
    registry.register("STD_ANNOTATE", FeatureTier::Standard, annotate_blocks);
    registry.register("SMART_TOPOLOGY", FeatureTier::Experimental, convert_topology);
    registry.register("SMART_SIP", FeatureTier::Experimental, convert_sip_flows);
    registry.register("SMART_TABLES", FeatureTier::Experimental, convert_ascii_tables);
    registry
}

/// Run the enrichment pipeline over Markdown text.
#[must_use]
pub fn enrich(text: &str, experimental: bool) -> String {
    default_registry().build_pipeline(experimental).run(text)
}

#[cfg(test)]
mod tests {
    use dv_headings::TOC_PLACEHOLDER_START;
    use pretty_assertions::assert_eq;

    use super::*;

    const DOC: &str = "# User Guide\n\n## Overview\n\nSome prose.\n\n## Overview\n\nMore prose.\n";

    #[test]
    fn test_registry_order() {
        let names: Vec<_> = default_registry().feature_names().collect();
        assert_eq!(
            names,
            [
                "STD_NORMALIZE",
                "STD_SANITIZE_ATTR",
                "STD_TOC",
                "STD_ANNOTATE",
                "SMART_TOPOLOGY",
                "SMART_SIP",
                "SMART_TABLES",
            ]
        );
    }

    #[test]
    fn test_standard_pipeline_length() {
        let registry = default_registry();
        assert_eq!(registry.build_pipeline(false).len(), 4);
        assert_eq!(registry.build_pipeline(true).len(), 7);
    }

    #[test]
    fn test_enrich_assigns_unique_anchors() {
        let out = enrich(DOC, false);
        assert!(out.contains("## Overview {#overview}"));
        assert!(out.contains("## Overview {#overview-2}"));
    }

    #[test]
    fn test_enrich_inserts_toc() {
        let out = enrich(DOC, false);
        assert!(out.contains(TOC_PLACEHOLDER_START));
        assert!(out.contains(r##"href="#overview-2""##));
    }

    #[test]
    fn test_standard_pipeline_idempotent() {
        let once = enrich(DOC, false);
        assert_eq!(enrich(&once, false), once);
    }

    #[test]
    fn test_toc_anchors_resolve_to_headings() {
        let out = enrich("# A\n\n## Section One\n\n### Deep Dive\n\n## Section Two\n", false);
        for anchor in ["a", "section-one", "deep-dive", "section-two"] {
            assert!(out.contains(&format!(r##"href="#{anchor}""##)), "missing link {anchor}");
            assert!(out.contains(&format!("{{#{anchor}}}")), "missing heading anchor {anchor}");
        }
    }

    #[test]
    fn test_experimental_converts_sip_block() {
        let doc = "## Call Flow\n\n```\nUAC -> Proxy: INVITE\nProxy -> UAC: 200 OK\n```\n";
        let out = enrich(doc, true);
        assert!(out.contains("sequenceDiagram"));
        assert!(!enrich(doc, false).contains("sequenceDiagram"));
    }

    #[test]
    fn test_annotation_marker_stamped() {
        let out = enrich("# T\n\n```\nplain text\n```\n", false);
        assert!(out.contains("<!-- dv:block=code-block -->"));
    }
}
