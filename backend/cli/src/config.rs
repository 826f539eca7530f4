use std::path::PathBuf;

/// Scribe CLI runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for rolling NDJSON logs; console-only when unset
    pub log_dir: Option<PathBuf>,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            log_dir: std::env::var("SCRIBE_LOG_DIR").ok().map(PathBuf::from),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
