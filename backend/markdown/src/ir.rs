//! Typed node tree for parsed chat messages.
//!
//! Every parse produces a flat sequence of these nodes covering the whole
//! input; container kinds nest recursively. Serializes to tagged JSON so the
//! archive pipeline can store structure alongside the raw text.

use serde::{Deserialize, Serialize};

/// One unit of parsed message structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
#[non_exhaustive]
pub enum Node {
    /// Literal text with no markup meaning.
    Text { text: String },
    /// Backtick-delimited inline code, content verbatim.
    InlineCode { code: String },
    /// Triple-backtick fenced block. The body is never re-parsed; `in_quote`
    /// records whether the fence appeared inside a quoted region.
    CodeBlock {
        lang: String,
        content: String,
        in_quote: bool,
    },
    /// A single newline.
    LineBreak,

    Strong { children: Vec<Node> },
    Em { children: Vec<Node> },
    Underline { children: Vec<Node> },
    Strike { children: Vec<Node> },
    Spoiler { children: Vec<Node> },
    BlockQuote { children: Vec<Node> },

    /// Markdown hyperlink `[label](target)`.
    Link { label: Vec<Node>, target: String },
    /// Angle-bracketed URL. Children hold the literal URL text; `target`
    /// carries the same text — these are not separately-labelled links.
    Autolink { children: Vec<Node>, target: String },
    /// Bare URL spotted in running text; same shape as [`Node::Autolink`].
    Url { children: Vec<Node>, target: String },

    UserMention { id: String },
    RoleMention { id: String },
    ChannelMention { id: String },
    Emoji {
        animated: bool,
        name: String,
        id: String,
    },
    Everyone,
    Here,
}

impl Node {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Node::Text { text: text.into() }
    }
}
