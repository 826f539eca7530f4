//! Chat markdown dialect parser and derived text transforms.
//!
//! Parses the platform's message dialect (mentions, spoilers, quotes, fenced
//! code, emphasis) into a typed node tree, and derives the transforms the
//! rest of the bot consumes: sanitized plain text for the archive index,
//! escaped text for safe redisplay, and structural scans over parsed trees.

pub mod escape;
pub mod ir;
pub mod parser;
mod rules;
pub mod sanitize;
pub mod scan;

pub use escape::escape;
pub use ir::Node;
pub use parser::{parse, ParseContext};
pub use sanitize::sanitize;
pub use scan::{collect_mentions, extract_code_blocks, MentionSet};
