//! Parser engine driving the grammar rule table.
//!
//! The engine walks the input from the current offset, asking the ordered
//! rule table for the first rule that matches there, and appends the node it
//! produces. The catch-all text rule matches at least one character, so the
//! loop always makes forward progress and `parse` cannot fail.

use crate::ir::Node;
use crate::rules;

/// Per-invocation parse state. Derived by value for nested parses so sibling
/// branches can never observe each other's flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseContext {
    /// Inside a quoted region; suppresses re-entering quote parsing.
    pub in_quote: bool,
    /// Restricted to inline-only constructs.
    pub inline: bool,
}

impl ParseContext {
    /// Entry context for a chat message: single-block inline content.
    pub fn message() -> Self {
        ParseContext {
            in_quote: false,
            inline: true,
        }
    }
}

/// Parse a chat message into its node sequence.
///
/// The returned nodes cover the entire input: every character is consumed by
/// exactly one rule invocation, with no gaps and no overlaps.
pub fn parse(text: &str) -> Vec<Node> {
    parse_with(text, ParseContext::message())
}

/// Parse with an explicit context. Rules recurse through this for nested
/// content (quotes, spoilers, emphasis bodies).
pub(crate) fn parse_with(text: &str, ctx: ParseContext) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut offset = 0;
    while offset < text.len() {
        let (prev, rest) = text.split_at(offset);
        let matched = rules::apply_first(rest, prev, ctx, parse_with);
        debug_assert!(matched.consumed > 0, "rule consumed no input");
        offset += matched.consumed;
        nodes.push(matched.node);
    }
    nodes
}
