//! Escape text so it re-parses as literal text only.
//!
//! Every character the grammar treats as a marker gets a backslash prefix.
//! The backslash itself is escaped too, otherwise the escapes added for the
//! other characters could be re-read as escape sequences of the input. Fenced
//! code is deliberately not offered as an alternative literal rendering: the
//! rendering surface cannot escape a backtick inside a fence, so this
//! character scheme is the only safe path.

/// Characters the grammar can reinterpret, in escape order: backslash first,
/// then the markup and reference delimiters.
const SPECIALS: &[char] = &['\\', '*', '_', '`', '|', '~', '>', '<'];

/// Escape `text` so that parsing and sanitizing the result yields `text`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 4);
    for c in text.chars() {
        if SPECIALS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
