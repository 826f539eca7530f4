//! Grammar rule table for the chat markdown dialect.
//!
//! Rules are declared once in a fixed table, each with an integer precedence;
//! ties are broken by declaration order through a stable sort at startup. At
//! every input position the engine tries rules in that order and takes the
//! first match. Matching is context-sensitive: each rule sees the unconsumed
//! remainder, the already-consumed prefix (for start-of-line checks), and the
//! current [`ParseContext`]. The text rule at the bottom of the table matches
//! any input, so rule selection always succeeds.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::Node;
use crate::parser::ParseContext;

/// A successful rule application: the node produced and the bytes consumed.
pub(crate) struct Matched {
    pub consumed: usize,
    pub node: Node,
}

/// Recursive parse capability handed to rules that nest.
pub(crate) type Recurse = fn(&str, ParseContext) -> Vec<Node>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RuleKind {
    Spoiler,
    EscapedChar,
    BlockQuote,
    CodeBlock,
    InlineCode,
    Autolink,
    Url,
    Link,
    Everyone,
    Here,
    UserMention,
    RoleMention,
    ChannelMention,
    Emoji,
    Strong,
    Underline,
    Em,
    Strike,
    LineBreak,
    Shrug,
    Text,
}

#[derive(Clone, Copy)]
struct Rule {
    kind: RuleKind,
    precedence: u8,
}

/// Declaration order breaks precedence ties, so the table below is the
/// single source of truth for rule selection.
const RULES: &[Rule] = &[
    Rule { kind: RuleKind::Spoiler, precedence: 0 },
    Rule { kind: RuleKind::EscapedChar, precedence: 1 },
    Rule { kind: RuleKind::BlockQuote, precedence: 2 },
    Rule { kind: RuleKind::CodeBlock, precedence: 3 },
    Rule { kind: RuleKind::InlineCode, precedence: 4 },
    Rule { kind: RuleKind::Autolink, precedence: 5 },
    Rule { kind: RuleKind::Url, precedence: 5 },
    Rule { kind: RuleKind::Link, precedence: 6 },
    Rule { kind: RuleKind::Everyone, precedence: 6 },
    Rule { kind: RuleKind::Here, precedence: 6 },
    Rule { kind: RuleKind::UserMention, precedence: 6 },
    Rule { kind: RuleKind::RoleMention, precedence: 6 },
    Rule { kind: RuleKind::ChannelMention, precedence: 6 },
    Rule { kind: RuleKind::Emoji, precedence: 6 },
    Rule { kind: RuleKind::Strong, precedence: 6 },
    Rule { kind: RuleKind::Underline, precedence: 6 },
    Rule { kind: RuleKind::Em, precedence: 6 },
    Rule { kind: RuleKind::Strike, precedence: 6 },
    Rule { kind: RuleKind::LineBreak, precedence: 7 },
    Rule { kind: RuleKind::Shrug, precedence: 8 },
    Rule { kind: RuleKind::Text, precedence: 8 },
];

static ORDERED: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = RULES.to_vec();
    // stable sort keeps declaration order within a precedence tier
    rules.sort_by_key(|r| r.precedence);
    rules
});

/// Apply the first rule that matches at the current position.
pub(crate) fn apply_first(
    rest: &str,
    prev: &str,
    ctx: ParseContext,
    recurse: Recurse,
) -> Matched {
    for rule in ORDERED.iter() {
        if let Some(matched) = rule.kind.try_apply(rest, prev, ctx, recurse) {
            return matched;
        }
    }
    // The text rule above matches any non-empty input; this tail only runs
    // on an empty remainder, which the engine never passes in.
    Matched {
        consumed: rest.len().max(1),
        node: Node::text(rest),
    }
}

impl RuleKind {
    fn try_apply(
        self,
        rest: &str,
        prev: &str,
        ctx: ParseContext,
        recurse: Recurse,
    ) -> Option<Matched> {
        match self {
            RuleKind::Spoiler => spoiler(rest, ctx, recurse),
            RuleKind::EscapedChar => escaped_char(rest),
            RuleKind::BlockQuote => block_quote(rest, prev, ctx, recurse),
            RuleKind::CodeBlock => code_block(rest, ctx),
            RuleKind::InlineCode => inline_code(rest),
            RuleKind::Autolink => autolink(rest),
            RuleKind::Url => bare_url(rest),
            RuleKind::Link => link(rest, ctx, recurse),
            RuleKind::Everyone => literal(rest, "@everyone", Node::Everyone),
            RuleKind::Here => literal(rest, "@here", Node::Here),
            RuleKind::UserMention => user_mention(rest),
            RuleKind::RoleMention => role_mention(rest),
            RuleKind::ChannelMention => channel_mention(rest),
            RuleKind::Emoji => emoji(rest),
            RuleKind::Strong => paired(rest, "**", ctx, recurse, |c| c == '*', |children| {
                Node::Strong { children }
            }),
            RuleKind::Underline => paired(rest, "__", ctx, recurse, |c| c == '_', |children| {
                Node::Underline { children }
            }),
            RuleKind::Em => em(rest, ctx, recurse),
            RuleKind::Strike => paired(rest, "~~", ctx, recurse, |c| c == '_', |children| {
                Node::Strike { children }
            }),
            RuleKind::LineBreak => line_break(rest),
            RuleKind::Shrug => shrug(rest),
            RuleKind::Text => Some(plain_text(rest)),
        }
    }
}

// ---------------------------------------------------------------------------
// Compiled matchers
// ---------------------------------------------------------------------------

static CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^```(?:([a-z0-9-]+?)\n+)?\n*(.+?)\n*```").unwrap());
static AUTOLINK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<([^: >]+:/[^ >]+)>").unwrap());
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^((?:https?|steam)://[^\s<]+[^<.,:;"')\]\s])"#).unwrap());
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\[([^\]]*)\]\(\s*<?([^)\s]*?)>?\s*\)").unwrap());
static USER_MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<@!?([0-9]+)>").unwrap());
static ROLE_MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<@&([0-9]+)>").unwrap());
static CHANNEL_MENTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<#?([0-9]+)>").unwrap());
static EMOJI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<(a?):(\w+):([0-9]+)>").unwrap());
static TRIPLE_QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)^ *>>> (.*)").unwrap());

const SHRUG: &str = r"¯\_(ツ)_/¯";

// ---------------------------------------------------------------------------
// Rule implementations
// ---------------------------------------------------------------------------

fn spoiler(rest: &str, ctx: ParseContext, recurse: Recurse) -> Option<Matched> {
    let inner = rest.strip_prefix("||")?;
    let (close, _) = inner.match_indices("||").find(|(i, _)| *i >= 1)?;
    Some(Matched {
        consumed: 2 + close + 2,
        node: Node::Spoiler {
            children: recurse(&inner[..close], ctx),
        },
    })
}

/// Backslash before any non-alphanumeric, non-space character yields that
/// character as literal text. This is what makes [`crate::escape`] output
/// re-parse as text only.
fn escaped_char(rest: &str) -> Option<Matched> {
    let inner = rest.strip_prefix('\\')?;
    let c = inner.chars().next()?;
    if c.is_ascii_alphanumeric() || c.is_whitespace() {
        return None;
    }
    Some(Matched {
        consumed: 1 + c.len_utf8(),
        node: Node::text(c),
    })
}

fn block_quote(rest: &str, prev: &str, ctx: ParseContext, recurse: Recurse) -> Option<Matched> {
    if ctx.in_quote || !at_line_start(prev) {
        return None;
    }

    // `>>> ` swallows the rest of the input as one quoted block
    if let Some(caps) = TRIPLE_QUOTE_RE.captures(rest) {
        let content = caps.get(1)?.as_str();
        let quoted = ParseContext { in_quote: true, ..ctx };
        return Some(Matched {
            consumed: caps.get(0)?.end(),
            node: Node::BlockQuote {
                children: recurse(content, quoted),
            },
        });
    }

    // `> ` quotes consecutive prefixed lines; the quoted text is re-parsed
    // inline so a line quote cannot contain block constructs
    let consumed = line_quote_len(rest)?;
    let content = rest[..consumed]
        .split('\n')
        .map(strip_quote_marker)
        .collect::<Vec<_>>()
        .join("\n");
    let quoted = ParseContext { in_quote: true, inline: true };
    Some(Matched {
        consumed,
        node: Node::BlockQuote {
            children: recurse(&content, quoted),
        },
    })
}

/// True when the consumed prefix ends at start of input or right after a
/// newline (trailing spaces allowed). Quote markers only count there.
fn at_line_start(prev: &str) -> bool {
    match prev.rfind('\n') {
        Some(i) => prev[i + 1..].bytes().all(|b| b == b' '),
        None => prev.is_empty(),
    }
}

/// Byte length of ` *> [^\n]*(\n *> [^\n]*)*\n?` at the start of `rest`.
fn line_quote_len(rest: &str) -> Option<usize> {
    let mut end = quote_line_len(rest)?;
    loop {
        let after = &rest[end..];
        if !after.starts_with('\n') {
            break;
        }
        match quote_line_len(&after[1..]) {
            Some(len) => end += 1 + len,
            None => {
                // a trailing newline after the last quoted line belongs to
                // the quote
                end += 1;
                break;
            }
        }
    }
    Some(end)
}

/// Byte length of one ` *> [^\n]*` line, or None if `s` is not a quote line.
fn quote_line_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    if i + 1 >= bytes.len() || bytes[i] != b'>' || bytes[i + 1] != b' ' {
        return None;
    }
    i += 2;
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    Some(i)
}

fn strip_quote_marker(line: &str) -> &str {
    let after_spaces = line.trim_start_matches(' ');
    match after_spaces.strip_prefix('>') {
        Some(r) => r.strip_prefix(' ').unwrap_or(r),
        None => line,
    }
}

fn code_block(rest: &str, ctx: ParseContext) -> Option<Matched> {
    let caps = CODE_BLOCK_RE.captures(rest)?;
    Some(Matched {
        consumed: caps.get(0)?.end(),
        node: Node::CodeBlock {
            lang: caps
                .get(1)
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default(),
            content: caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default(),
            in_quote: ctx.in_quote,
        },
    })
}

fn inline_code(rest: &str) -> Option<Matched> {
    let open = rest.bytes().take_while(|&b| b == b'`').count();
    if open == 0 {
        return None;
    }
    let bytes = rest.as_bytes();
    let mut i = open;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run_start = i;
            while i < bytes.len() && bytes[i] == b'`' {
                i += 1;
            }
            // closing run must mirror the opening exactly, with content
            if i - run_start == open && run_start > open {
                return Some(Matched {
                    consumed: i,
                    node: Node::InlineCode {
                        code: rest[open..run_start].to_string(),
                    },
                });
            }
        } else {
            i += 1;
        }
    }
    None
}

fn autolink(rest: &str) -> Option<Matched> {
    let caps = AUTOLINK_RE.captures(rest)?;
    let url = caps.get(1)?.as_str();
    Some(Matched {
        consumed: caps.get(0)?.end(),
        node: Node::Autolink {
            children: vec![Node::text(url)],
            target: url.to_string(),
        },
    })
}

fn bare_url(rest: &str) -> Option<Matched> {
    let caps = URL_RE.captures(rest)?;
    let url = caps.get(1)?.as_str();
    Some(Matched {
        consumed: caps.get(0)?.end(),
        node: Node::Url {
            children: vec![Node::text(url)],
            target: url.to_string(),
        },
    })
}

fn link(rest: &str, ctx: ParseContext, recurse: Recurse) -> Option<Matched> {
    let caps = LINK_RE.captures(rest)?;
    Some(Matched {
        consumed: caps.get(0)?.end(),
        node: Node::Link {
            label: recurse(caps.get(1)?.as_str(), ctx),
            target: caps.get(2)?.as_str().to_string(),
        },
    })
}

fn literal(rest: &str, token: &str, node: Node) -> Option<Matched> {
    rest.strip_prefix(token).map(|_| Matched {
        consumed: token.len(),
        node,
    })
}

fn user_mention(rest: &str) -> Option<Matched> {
    let caps = USER_MENTION_RE.captures(rest)?;
    Some(Matched {
        consumed: caps.get(0)?.end(),
        node: Node::UserMention {
            id: caps.get(1)?.as_str().to_string(),
        },
    })
}

fn role_mention(rest: &str) -> Option<Matched> {
    let caps = ROLE_MENTION_RE.captures(rest)?;
    Some(Matched {
        consumed: caps.get(0)?.end(),
        node: Node::RoleMention {
            id: caps.get(1)?.as_str().to_string(),
        },
    })
}

fn channel_mention(rest: &str) -> Option<Matched> {
    let caps = CHANNEL_MENTION_RE.captures(rest)?;
    Some(Matched {
        consumed: caps.get(0)?.end(),
        node: Node::ChannelMention {
            id: caps.get(1)?.as_str().to_string(),
        },
    })
}

fn emoji(rest: &str) -> Option<Matched> {
    let caps = EMOJI_RE.captures(rest)?;
    Some(Matched {
        consumed: caps.get(0)?.end(),
        node: Node::Emoji {
            animated: !caps.get(1)?.as_str().is_empty(),
            name: caps.get(2)?.as_str().to_string(),
            id: caps.get(3)?.as_str().to_string(),
        },
    })
}

/// Paired-delimiter constructs: `**strong**`, `__underline__`, `~~strike~~`.
/// `reject_next` refuses a closing delimiter followed by a character that
/// would split an adjacent marker (strike must not eat into `_`).
fn paired(
    rest: &str,
    delim: &str,
    ctx: ParseContext,
    recurse: Recurse,
    reject_next: impl Fn(char) -> bool,
    build: impl FnOnce(Vec<Node>) -> Node,
) -> Option<Matched> {
    let inner = rest.strip_prefix(delim)?;
    let close = find_closing(inner, delim, reject_next)?;
    Some(Matched {
        consumed: delim.len() * 2 + close,
        node: build(recurse(&inner[..close], ctx)),
    })
}

fn em(rest: &str, ctx: ParseContext, recurse: Recurse) -> Option<Matched> {
    if let Some(inner) = rest.strip_prefix('_') {
        // a doubled marker is underline's, and the closing `_` must sit on a
        // word boundary so snake_case identifiers stay literal
        if !inner.starts_with('_') {
            if let Some(close) =
                find_closing(inner, "_", |c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Some(Matched {
                    consumed: 2 + close,
                    node: Node::Em {
                        children: recurse(&inner[..close], ctx),
                    },
                });
            }
        }
    }
    if let Some(inner) = rest.strip_prefix('*') {
        let opens_word = inner.chars().next().is_some_and(|c| !c.is_whitespace());
        if !inner.starts_with('*') && opens_word {
            if let Some(close) = find_closing(inner, "*", |c| c == '*') {
                return Some(Matched {
                    consumed: 2 + close,
                    node: Node::Em {
                        children: recurse(&inner[..close], ctx),
                    },
                });
            }
        }
    }
    None
}

/// First closing delimiter with at least one character of content whose
/// following character is acceptable. Scans every position so a candidate
/// rejected for its successor can still close one character later.
fn find_closing(inner: &str, delim: &str, reject_next: impl Fn(char) -> bool) -> Option<usize> {
    let len = delim.len();
    let mut i = 1;
    while i + len <= inner.len() {
        if inner.is_char_boundary(i) && inner[i..].starts_with(delim) {
            let next = inner[i + len..].chars().next();
            match next {
                Some(c) if reject_next(c) => {}
                _ => return Some(i),
            }
        }
        i += 1;
    }
    None
}

fn line_break(rest: &str) -> Option<Matched> {
    rest.strip_prefix('\n').map(|_| Matched {
        consumed: 1,
        node: Node::LineBreak,
    })
}

/// The shrug emoticon parses as literal text; without this its underscores
/// would read as emphasis markers.
fn shrug(rest: &str) -> Option<Matched> {
    rest.strip_prefix(SHRUG).map(|_| Matched {
        consumed: SHRUG.len(),
        node: Node::text(SHRUG),
    })
}

/// Catch-all: consume up to the next character that could start another
/// construct, a newline, or a `word:` scheme prefix. Always takes at least
/// one character, which is what guarantees parser progress.
fn plain_text(rest: &str) -> Matched {
    let mut end = 0;
    for c in rest.chars() {
        if end > 0 && stops_text(&rest[end..]) {
            break;
        }
        end += c.len_utf8();
    }
    Matched {
        consumed: end,
        node: Node::text(&rest[..end]),
    }
}

fn stops_text(remainder: &str) -> bool {
    let Some(c) = remainder.chars().next() else {
        return true;
    };
    if is_marker_char(c) {
        return true;
    }
    if spaces_then_newline(remainder) {
        return true;
    }
    word_colon_nonspace(remainder)
}

/// ASCII punctuation and symbols (plus the Latin-1 block below U+00C0) can
/// all open another rule; letters, digits, whitespace, and the rest of
/// Unicode cannot.
fn is_marker_char(c: char) -> bool {
    (c as u32) < 0xC0 && !c.is_ascii_alphanumeric() && !c.is_whitespace()
}

fn spaces_then_newline(s: &str) -> bool {
    s.trim_start_matches(' ').starts_with('\n')
}

/// `word:` directly followed by non-space reads as a URI scheme, so text
/// stops there and gives the URL rules a chance on the next iteration.
fn word_colon_nonspace(s: &str) -> bool {
    let word_len = s
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
        .count();
    if word_len == 0 {
        return false;
    }
    let after = &s[word_len..];
    if !after.starts_with(':') {
        return false;
    }
    after[1..].chars().next().is_some_and(|c| !c.is_whitespace())
}
