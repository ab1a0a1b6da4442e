/// Configuration schema and defaults for founders-truth.
///
/// Defines the TOML-serializable configuration structure with three sections:
/// `[server]`, `[provider]`, and `[logging]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default listen address for the embedded web server.
pub const DEFAULT_ADDR: &str = "127.0.0.1:9747";

/// Default generative model.
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

/// Default provider base URL.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level configuration.
///
/// Maps directly to `~/.founders-truth/config.toml` and
/// `.founders-truth.toml`. All sections and fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub provider: ProviderConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [server]
// ---------------------------------------------------------------------------

/// Embedded web server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `127.0.0.1:9747`.
    pub addr: String,
    /// Open the page in the default browser after binding.
    pub open_browser: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [provider]
// ---------------------------------------------------------------------------

/// Generative-language provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Model name used in the `generateContent` path.
    pub model: String,
    /// Provider base URL (no trailing path).
    pub api_url: String,
    /// API credential. Usually supplied through the environment instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in milliseconds. `0` leaves the transport default.
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout_ms: 0,
        }
    }
}

impl ProviderConfig {
    /// Whether a non-blank credential is present.
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Operational event log settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether evaluation events are appended to the JSONL log.
    pub enabled: bool,
    /// Override for the log location. Defaults to
    /// `~/.founders-truth/evaluation-log.jsonl`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Default TOML content
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Generate the annotated default TOML config file content.
    ///
    /// Used by `founders-truth config init`.
    pub fn default_toml() -> String {
        r#"# founders-truth configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (FOUNDERS_TRUTH_*, GEMINI_API_KEY, API_KEY)
#   2. Project config (.founders-truth.toml in current directory)
#   3. User global config (~/.founders-truth/config.toml)
#   4. Built-in defaults

[server]
addr = "127.0.0.1:9747"
open_browser = true

[provider]
model = "gemini-3-pro-preview"
api_url = "https://generativelanguage.googleapis.com"
# api_key = "..."         # prefer GEMINI_API_KEY in the environment
timeout_ms = 0            # 0 = no local timeout

[logging]
enabled = true            # append call metadata to evaluation-log.jsonl
# path = "/tmp/evaluation-log.jsonl"
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
