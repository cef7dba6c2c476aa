//! Heuristic classification and conversion of fenced blocks.
//!
//! Two tiers of functionality share one fence scanner:
//!
//! - [`annotate_blocks`] stamps every fenced block with an advisory
//!   `<!-- dv:block=... -->` classification marker and never alters content.
//! - The converters ([`convert_topology`], [`convert_sip_flows`],
//!   [`convert_ascii_tables`]) replace block content with Mermaid diagram
//!   markup or pipe tables, but only under corroborating context: a matching
//!   nearby heading or a previously stamped marker. Anything ambiguous is
//!   left byte-for-byte unchanged.
//!
//! When several converters run, topology goes first, then signaling, then
//! tables; an earlier conversion retags the fence as `mermaid`, which the
//! later converters skip.

mod annotate;
mod consts;
mod context;
mod fences;
mod knowledge;
mod sip;
mod table;
mod topology;

pub use annotate::{BlockMarker, annotate_blocks};
pub use consts::{BOX_CHAR_THRESHOLD, CODE_TOKEN_THRESHOLD, MAX_PARTICIPANTS, MIN_ARROWS};
pub use knowledge::SipKnowledge;
pub use sip::convert_sip_flows;
pub use table::convert_ascii_tables;
pub use topology::convert_topology;
