/// Configuration system for founders-truth.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::AppConfig::default()`]
/// 2. **User global config** — `~/.founders-truth/config.toml`
/// 3. **Project local config** — `.founders-truth.toml` in the current directory
/// 4. **Environment variables** — highest precedence
///
/// The resolved config is passed explicitly to the evaluation client and the
/// web server; nothing below `main` reads the environment on its own.
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::{AppConfig, LoggingConfig, ProviderConfig, ServerConfig};

/// Directory under `$HOME` holding the global config and event log.
pub const APP_DIR: &str = ".founders-truth";

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env.
pub fn load() -> AppConfig {
    let mut config = AppConfig::default();

    if let Some(global) = load_toml_file(global_config_path()) {
        config = global;
    }

    if let Some(project) = load_toml_file(project_config_path()) {
        merge_config(&mut config, &project);
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Malformed files are reported on stderr and otherwise ignored so a typo
/// never keeps the server from starting.
fn load_toml_file(path: Option<PathBuf>) -> Option<AppConfig> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("ignoring malformed config {}: {e}", path.display());
            None
        }
    }
}

/// Merge a project layer over the base.
///
/// Each layer deserializes with defaults filled in, so a field only wins when
/// it differs from the built-in default. That keeps a project file that only
/// sets `[provider] model` from resetting the global `api_key`.
fn merge_config(base: &mut AppConfig, overlay: &AppConfig) {
    let defaults = AppConfig::default();

    if overlay.server.addr != defaults.server.addr {
        base.server.addr = overlay.server.addr.clone();
    }
    if overlay.server.open_browser != defaults.server.open_browser {
        base.server.open_browser = overlay.server.open_browser;
    }

    if overlay.provider.model != defaults.provider.model {
        base.provider.model = overlay.provider.model.clone();
    }
    if overlay.provider.api_url != defaults.provider.api_url {
        base.provider.api_url = overlay.provider.api_url.clone();
    }
    if overlay.provider.api_key.is_some() {
        base.provider.api_key = overlay.provider.api_key.clone();
    }
    if overlay.provider.timeout_ms != defaults.provider.timeout_ms {
        base.provider.timeout_ms = overlay.provider.timeout_ms;
    }

    if overlay.logging.enabled != defaults.logging.enabled {
        base.logging.enabled = overlay.logging.enabled;
    }
    if overlay.logging.path.is_some() {
        base.logging.path = overlay.logging.path.clone();
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.founders-truth/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(APP_DIR).join("config.toml"))
}

/// Path to the project local config: `.founders-truth.toml` in the cwd.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".founders-truth.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `FOUNDERS_TRUTH_ADDR` — listen address
/// - `FOUNDERS_TRUTH_MODEL` — provider model name
/// - `FOUNDERS_TRUTH_API_URL` — provider base URL
/// - `FOUNDERS_TRUTH_API_KEY`, then `GEMINI_API_KEY`, then `API_KEY` — credential
/// - `FOUNDERS_TRUTH_TIMEOUT_MS` — request timeout
/// - `FOUNDERS_TRUTH_LOG` — event log on/off
///
/// `lookup` is injected so tests can supply variables without touching the
/// process environment.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(val) = non_empty("FOUNDERS_TRUTH_ADDR") {
        config.server.addr = val;
    }
    if let Some(val) = non_empty("FOUNDERS_TRUTH_MODEL") {
        config.provider.model = val;
    }
    if let Some(val) = non_empty("FOUNDERS_TRUTH_API_URL") {
        config.provider.api_url = val;
    }
    if let Some(val) = ["FOUNDERS_TRUTH_API_KEY", "GEMINI_API_KEY", "API_KEY"]
        .iter()
        .find_map(|key| non_empty(*key))
    {
        config.provider.api_key = Some(val);
    }
    if let Some(val) = non_empty("FOUNDERS_TRUTH_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.provider.timeout_ms = ms;
    }
    if let Some(val) = lookup("FOUNDERS_TRUTH_LOG") {
        config.logging.enabled = is_truthy(&val);
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / show
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.founders-truth/config.toml`.
///
/// Returns an error if the file already exists and `force` is not set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    write_default_config(&path, force)?;
    Ok(path)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, AppConfig::default_toml()).context("failed to write config file")
}

/// Set a single dotted key (e.g. `provider.model`) in the global config.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let content = if path.exists() {
        fs::read_to_string(path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&AppConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    let updated = toml::to_string_pretty(&root).context("failed to serialize config")?;
    // Refuse to write something the loader would reject.
    toml::from_str::<AppConfig>(&updated)
        .with_context(|| format!("'{value}' is not a valid value for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, updated).context("failed to write config file")
}

/// Known dotted keys and whether each holds a string (`true`) or not.
const KNOWN_KEYS: &[(&str, bool)] = &[
    ("server.addr", true),
    ("server.open_browser", false),
    ("provider.model", true),
    ("provider.api_url", true),
    ("provider.api_key", true),
    ("provider.timeout_ms", false),
    ("logging.enabled", false),
    ("logging.path", true),
];

/// Set a value in a TOML value tree using a dotted `section.field` key.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let Some((_, is_string)) = KNOWN_KEYS.iter().find(|(k, _)| *k == key) else {
        anyhow::bail!("unknown config key: '{key}'");
    };
    let (section, leaf) = key
        .split_once('.')
        .with_context(|| format!("config key must be 'section.field', got '{key}'"))?;

    let root_table = root.as_table_mut().context("config root is not a table")?;
    let table = root_table
        .entry(section.to_string())
        .or_insert_with(|| toml::Value::Table(toml::map::Map::new()))
        .as_table_mut()
        .with_context(|| format!("expected table at '{section}'"))?;

    let new_value = if *is_string {
        toml::Value::String(raw_value.to_string())
    } else if let Ok(n) = raw_value.parse::<i64>() {
        toml::Value::Integer(n)
    } else {
        toml::Value::Boolean(is_truthy(raw_value))
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Show the effective (fully resolved) config as TOML, credential masked.
pub fn show_effective_config() -> Result<String> {
    let mut config = load();
    if config.provider.has_api_key() {
        config.provider.api_key = Some("********".to_string());
    }
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("On"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("FOUNDERS_TRUTH_ADDR", "0.0.0.0:8080"),
                ("FOUNDERS_TRUTH_MODEL", "gemini-2.5-pro"),
                ("FOUNDERS_TRUTH_TIMEOUT_MS", "45000"),
                ("FOUNDERS_TRUTH_LOG", "0"),
            ]),
        );
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert_eq!(config.provider.model, "gemini-2.5-pro");
        assert_eq!(config.provider.timeout_ms, 45_000);
        assert!(!config.logging.enabled);
    }

    #[test]
    fn api_key_precedence() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("API_KEY", "generic"), ("GEMINI_API_KEY", "gemini")]),
        );
        assert_eq!(config.provider.api_key.as_deref(), Some("gemini"));

        apply_env_overrides(
            &mut config,
            env(&[("API_KEY", "generic"), ("FOUNDERS_TRUTH_API_KEY", "own")]),
        );
        assert_eq!(config.provider.api_key.as_deref(), Some("own"));
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[("GEMINI_API_KEY", ""), ("FOUNDERS_TRUTH_TIMEOUT_MS", "soon")]),
        );
        assert!(config.provider.api_key.is_none());
        assert_eq!(config.provider.timeout_ms, 0);
    }

    #[test]
    fn project_layer_keeps_global_key() {
        let mut base = AppConfig::default();
        base.provider.api_key = Some("global".to_string());
        base.server.addr = "127.0.0.1:1".to_string();

        let overlay: AppConfig = toml::from_str("[provider]\nmodel = \"other\"\n").unwrap();
        merge_config(&mut base, &overlay);

        assert_eq!(base.provider.model, "other");
        assert_eq!(base.provider.api_key.as_deref(), Some("global"));
        assert_eq!(base.server.addr, "127.0.0.1:1");
    }

    #[test]
    fn set_toml_value_types_by_key() {
        let mut root: toml::Value = toml::from_str("[provider]\nmodel = \"a\"\n").unwrap();
        set_toml_value(&mut root, "provider.model", "b").unwrap();
        set_toml_value(&mut root, "provider.timeout_ms", "1500").unwrap();
        set_toml_value(&mut root, "server.open_browser", "false").unwrap();

        assert_eq!(root["provider"]["model"].as_str(), Some("b"));
        assert_eq!(root["provider"]["timeout_ms"].as_integer(), Some(1500));
        assert_eq!(root["server"]["open_browser"].as_bool(), Some(false));
    }

    #[test]
    fn set_toml_value_rejects_unknown_key() {
        let mut root: toml::Value = toml::from_str("").unwrap();
        assert!(set_toml_value(&mut root, "provider.temperature", "0.2").is_err());
        assert!(set_toml_value(&mut root, "model", "x").is_err());
    }

    #[test]
    fn init_and_set_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        write_default_config(&path, false).unwrap();
        assert!(write_default_config(&path, false).is_err());
        write_default_config(&path, true).unwrap();

        set_config_value_at(&path, "provider.model", "gemini-2.5-flash").unwrap();
        let config: AppConfig = toml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(config.provider.model, "gemini-2.5-flash");
        assert_eq!(config.server.addr, schema::DEFAULT_ADDR);
    }

    #[test]
    fn set_rejects_mistyped_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(set_config_value_at(&path, "provider.timeout_ms", "-5").is_err());
        assert!(!path.exists());
    }
}
