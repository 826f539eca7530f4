//! Reduce parsed messages to plain text for the archive index.
//!
//! Formatting is unwrapped, platform references are redacted down to a
//! single space (identity is dropped, the word boundary kept), and literal
//! content passes through untouched.

use tracing::warn;

use crate::ir::Node;
use crate::parser::parse;

/// Strip all markup and platform references from a message.
pub fn sanitize(text: &str) -> String {
    fold(&parse(text))
}

/// Fold an already-parsed node sequence into plain text.
pub fn fold(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        append(node, &mut out);
    }
    out
}

fn append(node: &Node, out: &mut String) {
    match node {
        Node::Text { text } => out.push_str(text),
        Node::InlineCode { code } => out.push_str(code),
        Node::CodeBlock { content, .. } => out.push_str(content),
        Node::LineBreak => out.push('\n'),

        Node::Strong { children }
        | Node::Em { children }
        | Node::Underline { children }
        | Node::Strike { children }
        | Node::Spoiler { children }
        | Node::BlockQuote { children }
        | Node::Autolink { children, .. }
        | Node::Url { children, .. } => {
            for child in children {
                append(child, out);
            }
        }
        Node::Link { label, .. } => {
            for child in label {
                append(child, out);
            }
        }

        Node::UserMention { .. }
        | Node::RoleMention { .. }
        | Node::ChannelMention { .. }
        | Node::Emoji { .. }
        | Node::Everyone
        | Node::Here => out.push(' '),

        // Node is non_exhaustive; a kind added later must degrade to nothing
        // instead of crashing the archive pipeline.
        #[allow(unreachable_patterns)]
        other => warn!(node = ?other, "unrecognized node kind dropped during sanitize"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_is_unwrapped() {
        assert_eq!(sanitize("**bold** and _em_ and __u__ and ~~s~~"), "bold and em and u and s");
        assert_eq!(sanitize("||secret||"), "secret");
    }

    #[test]
    fn mentions_become_one_space() {
        assert_eq!(sanitize("<@123456789012345678>"), " ");
        assert_eq!(sanitize("<@&123456789012345678>"), " ");
        assert_eq!(sanitize("<#123456789012345678>"), " ");
        assert_eq!(sanitize("<a:wave:123456789012345678>"), " ");
        assert_eq!(sanitize("ping @everyone!"), "ping  !");
        assert_eq!(sanitize("hey @here"), "hey  ");
    }

    #[test]
    fn single_line_quote() {
        assert_eq!(sanitize("> hello"), "hello");
    }

    #[test]
    fn block_quote_keeps_lines() {
        assert_eq!(sanitize(">>> multi\nline\nquote"), "multi\nline\nquote");
    }

    #[test]
    fn code_passes_through_verbatim() {
        assert_eq!(sanitize("```js\ncode\n```"), "code");
        assert_eq!(sanitize("before ```js\nlet a = \"*x*\";\n``` after"), "before let a = \"*x*\"; after");
        assert_eq!(sanitize("`**inline**`"), "**inline**");
    }

    #[test]
    fn shrug_is_untouched() {
        assert_eq!(sanitize(r"¯\_(ツ)_/¯"), r"¯\_(ツ)_/¯");
    }

    #[test]
    fn urls_keep_their_text() {
        assert_eq!(sanitize("see <https://example.com>"), "see https://example.com");
        assert_eq!(sanitize("https://example.com"), "https://example.com");
        assert_eq!(sanitize("[docs](https://example.com)"), "docs");
    }

    #[test]
    fn line_breaks_survive() {
        assert_eq!(sanitize("a\nb"), "a\nb");
    }

    #[test]
    fn nested_formatting_flattens() {
        assert_eq!(sanitize("> **_deep_** <@123456789012345678>"), "deep  ");
    }
}
