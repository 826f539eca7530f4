//! Structural queries over parsed node trees.
//!
//! The archive pipeline wants code blocks and mention targets without
//! re-walking raw text, so these helpers recurse through containers and
//! collect what they find.

use crate::ir::Node;

/// Mention targets found in a message, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentionSet {
    pub users: Vec<String>,
    pub roles: Vec<String>,
    pub channels: Vec<String>,
    pub everyone: bool,
    pub here: bool,
}

impl MentionSet {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
            && self.roles.is_empty()
            && self.channels.is_empty()
            && !self.everyone
            && !self.here
    }
}

/// Extract all fenced code blocks as `(lang, content)` pairs.
pub fn extract_code_blocks(nodes: &[Node]) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    walk(nodes, &mut |node| {
        if let Node::CodeBlock { lang, content, .. } = node {
            blocks.push((lang.clone(), content.clone()));
        }
    });
    blocks
}

/// Collect every mention target, including those nested in quotes and
/// spoilers.
pub fn collect_mentions(nodes: &[Node]) -> MentionSet {
    let mut set = MentionSet::default();
    walk(nodes, &mut |node| match node {
        Node::UserMention { id } => set.users.push(id.clone()),
        Node::RoleMention { id } => set.roles.push(id.clone()),
        Node::ChannelMention { id } => set.channels.push(id.clone()),
        Node::Everyone => set.everyone = true,
        Node::Here => set.here = true,
        _ => {}
    });
    set
}

fn walk(nodes: &[Node], visit: &mut impl FnMut(&Node)) {
    for node in nodes {
        visit(node);
        match node {
            Node::Strong { children }
            | Node::Em { children }
            | Node::Underline { children }
            | Node::Strike { children }
            | Node::Spoiler { children }
            | Node::BlockQuote { children }
            | Node::Autolink { children, .. }
            | Node::Url { children, .. } => walk(children, visit),
            Node::Link { label, .. } => walk(label, visit),
            _ => {}
        }
    }
}
