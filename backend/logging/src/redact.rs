//! Log Redaction Layer
//!
//! Scrubs webhook tokens and bot credentials from strings prior to logging.
//! Webhook URLs embed a bearer-equivalent token right after the webhook id,
//! so any link echoed into a log line goes through here first.

use regex::Regex;
use std::sync::LazyLock;

static WEBHOOK_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(/api/webhooks/[0-9]+)/[A-Za-z0-9_-]+").unwrap());
static BOT_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:Bot|Bearer)\s+[A-Za-z0-9_\-.]+").unwrap());

/// Redacts credential-bearing patterns in a string.
pub fn redact_tokens(input: &str) -> String {
    let redacted = WEBHOOK_TOKEN_RE.replace_all(input, "$1/[REDACTED_TOKEN]");
    BOT_TOKEN_RE
        .replace_all(&redacted, "[REDACTED_TOKEN]")
        .to_string()
}
