//! Configuration system for squill.
//!
//! Provides a layered configuration hierarchy:
//!
//! 1. **Built-in defaults**: hardcoded in [`schema::SquillConfig::default()`]
//! 2. **User global config**: `~/.squill/config.toml`
//! 3. **Project local config**: `.squill.toml` in the current working directory
//! 4. **Environment variables**: `SQUILL_*` overrides (highest precedence)
//!
//! # Usage
//!
//! ```rust,ignore
//! use squill::config;
//!
//! let cfg = config::load();
//! let client = squill::api::ApiClient::from_config(&cfg);
//! ```

pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::dashboard::Variant;

pub use schema::SquillConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved squill configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> SquillConfig {
    let layers = [global_config_path(), project_config_path()]
        .into_iter()
        .filter_map(load_toml_file);
    let mut config = resolve_layers(layers);

    apply_env_overrides(&mut config);

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Missing or malformed files yield `None` and the layer is skipped.
fn load_toml_file(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    // A layer the schema cannot load is skipped whole
    toml::from_str::<SquillConfig>(&content).ok()?;
    Some(value)
}

/// Merge file layers in order over the defaults and deserialize once.
fn resolve_layers(layers: impl IntoIterator<Item = toml::Value>) -> SquillConfig {
    let mut merged = toml::Value::Table(toml::map::Map::new());
    for layer in layers {
        merge_config(&mut merged, layer);
    }
    merged.try_into().unwrap_or_default()
}

/// Merge a config layer into the base value, key by key.
///
/// Tables merge recursively; any other overlay value replaces the base.
/// Keys the overlay does not set keep the base value.
fn merge_config(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_config(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.squill/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    squill_home().map(|dir| dir.join("config.toml"))
}

/// Path to the project local config: `.squill.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".squill.toml"))
}

/// The `~/.squill` state directory.
pub fn squill_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".squill"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `SQUILL_API_URL`: billing API base URL
/// - `SQUILL_API_TIMEOUT_MS`: per-request timeout
/// - `SQUILL_VARIANT`: dashboard layout (`minimal`, `bento`, `brutalist`)
/// - `SQUILL_WEB_ADDR`: listen address for `squill serve`
/// - `SQUILL_TOKEN_FILE`: bearer token file
/// - `SQUILL_LOG`: event log on/off
fn apply_env_overrides(config: &mut SquillConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides from an arbitrary key lookup.
fn apply_overrides(config: &mut SquillConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("SQUILL_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Some(val) = lookup("SQUILL_API_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Some(val) = lookup("SQUILL_VARIANT")
        && let Ok(variant) = val.parse::<Variant>()
    {
        config.dashboard.variant = variant;
    }
    if let Some(val) = lookup("SQUILL_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
    if let Some(val) = lookup("SQUILL_TOKEN_FILE")
        && !val.is_empty()
    {
        config.auth.token_file = val;
    }
    if let Some(val) = lookup("SQUILL_LOG") {
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
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.squill/config.toml`.
///
/// Returns an error if the file already exists and `force` is not set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.squill/ directory")?;
    }

    fs::write(&path, SquillConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `dashboard.variant`. The existing value's type
/// decides how `value` is parsed.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let current = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&SquillConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&current).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    // Reject values the schema cannot load, e.g. an unknown variant.
    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    toml::from_str::<SquillConfig>(&output)
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        anyhow::bail!("empty config key segment in '{key}'");
    }

    let mut current = root;
    for &part in &parts[..parts.len() - 1] {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let leaf = parts[parts.len() - 1];
    let table = current.as_table_mut().with_context(|| {
        format!(
            "expected table at '{}'",
            key.rsplit_once('.').map(|(s, _)| s).unwrap_or("")
        )
    })?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(_) => toml::Value::String(raw_value.to_string()),
        None => anyhow::bail!("unknown config key '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn is_truthy_accepts_variants() {
        assert!(is_truthy("1"));
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("yes"));
        assert!(is_truthy("on"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("off"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn env_overrides_replace_api_url_and_variant() {
        let mut cfg = SquillConfig::default();
        apply_overrides(
            &mut cfg,
            lookup_from(&[
                ("SQUILL_API_URL", "http://localhost:4000/api"),
                ("SQUILL_VARIANT", "minimal"),
                ("SQUILL_API_TIMEOUT_MS", "250"),
                ("SQUILL_LOG", "0"),
            ]),
        );
        assert_eq!(cfg.api.base_url, "http://localhost:4000/api");
        assert_eq!(cfg.dashboard.variant, Variant::Minimal);
        assert_eq!(cfg.api.timeout_ms, 250);
        assert!(!cfg.logging.enabled);
    }

    #[test]
    fn env_overrides_ignore_invalid_values() {
        let mut cfg = SquillConfig::default();
        apply_overrides(
            &mut cfg,
            lookup_from(&[
                ("SQUILL_API_URL", ""),
                ("SQUILL_VARIANT", "neon"),
                ("SQUILL_API_TIMEOUT_MS", "soon"),
            ]),
        );
        let defaults = SquillConfig::default();
        assert_eq!(cfg.api.base_url, defaults.api.base_url);
        assert_eq!(cfg.dashboard.variant, defaults.dashboard.variant);
        assert_eq!(cfg.api.timeout_ms, defaults.api.timeout_ms);
    }

    #[test]
    fn expand_home_leaves_plain_paths() {
        assert_eq!(expand_home("/tmp/token"), PathBuf::from("/tmp/token"));
        assert_eq!(expand_home("relative/x"), PathBuf::from("relative/x"));
    }

    #[test]
    fn expand_home_expands_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/.squill/a"), home.join(".squill/a"));
        }
    }

    #[test]
    fn set_toml_value_updates_string() {
        let mut root: toml::Value = toml::from_str("[dashboard]\nvariant = \"bento\"\n").unwrap();
        set_toml_value(&mut root, "dashboard.variant", "minimal").unwrap();
        assert_eq!(root["dashboard"]["variant"].as_str(), Some("minimal"));
    }

    #[test]
    fn set_toml_value_updates_bool_and_integer() {
        let mut root: toml::Value =
            toml::from_str("[web]\nopen_browser = true\n[api]\ntimeout_ms = 100\n").unwrap();
        set_toml_value(&mut root, "web.open_browser", "false").unwrap();
        set_toml_value(&mut root, "api.timeout_ms", "2500").unwrap();
        assert_eq!(root["web"]["open_browser"].as_bool(), Some(false));
        assert_eq!(root["api"]["timeout_ms"].as_integer(), Some(2500));
    }

    #[test]
    fn set_toml_value_rejects_unknown_keys() {
        let mut root: toml::Value = toml::from_str("[api]\ntimeout_ms = 100\n").unwrap();
        assert!(set_toml_value(&mut root, "nonexistent.key", "v").is_err());
        assert!(set_toml_value(&mut root, "api.nope", "v").is_err());
        assert!(set_toml_value(&mut root, "api.timeout_ms", "abc").is_err());
    }

    fn layer(text: &str) -> toml::Value {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn project_layer_keeps_global_keys_it_does_not_set() {
        let global = layer(
            "[api]\nbase_url = \"https://global.example/api\"\ntimeout_ms = 900\n\n[dashboard]\nvariant = \"minimal\"\n",
        );
        let project = layer("[dashboard]\nvariant = \"bento\"\n");

        let cfg = resolve_layers([global, project]);
        assert_eq!(cfg.api.base_url, "https://global.example/api");
        assert_eq!(cfg.api.timeout_ms, 900);
        assert_eq!(cfg.dashboard.variant, Variant::Bento);
        assert_eq!(cfg.web.addr, SquillConfig::default().web.addr);
    }

    #[test]
    fn later_layer_wins_on_shared_keys() {
        let cfg = resolve_layers([
            layer("[api]\ntimeout_ms = 900\n"),
            layer("[api]\ntimeout_ms = 1500\n"),
        ]);
        assert_eq!(cfg.api.timeout_ms, 1500);
        assert_eq!(cfg.api.base_url, SquillConfig::default().api.base_url);
    }

    #[test]
    fn no_layers_gives_defaults() {
        let cfg = resolve_layers(std::iter::empty());
        assert_eq!(cfg.api.base_url, SquillConfig::default().api.base_url);
        assert_eq!(cfg.dashboard.variant, SquillConfig::default().dashboard.variant);
    }

    #[test]
    fn show_effective_config_returns_toml() {
        let toml_str = show_effective_config().unwrap();
        let _: SquillConfig = toml::from_str(&toml_str).unwrap();
    }
}
