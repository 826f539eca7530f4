//! Structured logging for Scribe.
//!
//! Subscriber setup plus redaction of platform secrets before strings reach
//! a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_tokens;
