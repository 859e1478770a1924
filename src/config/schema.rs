/// Configuration schema and defaults for squill.
///
/// Defines the TOML-serializable configuration structure with the sections
/// `[api]`, `[dashboard]`, `[web]`, `[auth]`, `[logging]` and `[deploy]`.
///
/// Every field has a built-in default. Users only need to set the values
/// they want to override.
use serde::{Deserialize, Serialize};

use crate::dashboard::Variant;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level squill configuration.
///
/// Maps directly to the `~/.squill/config.toml` and `.squill.toml` file
/// schemas. All sections and fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SquillConfig {
    pub api: ApiConfig,
    pub dashboard: DashboardConfig,
    pub web: WebConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub deploy: DeployConfig,
}

// ---------------------------------------------------------------------------
// [api]
// ---------------------------------------------------------------------------

/// Billing API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Credentials that log in locally without touching the network.
    pub demo_email: String,
    pub demo_password: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://a953zu5bnc.execute-api.us-east-1.amazonaws.com/dev".to_string(),
            timeout_ms: 10_000,
            demo_email: "admin@squill.com".to_string(),
            demo_password: "demo123".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [dashboard]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Layout used when no variant is requested: `minimal`, `bento`, `brutalist`.
    pub variant: Variant,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Brutalist,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Listen address for `squill serve`.
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:9820".to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [auth]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// File holding the bearer token. `~` is expanded to the home directory.
    pub token_file: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_file: "~/.squill/auth_token".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

/// Event log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Whether events are appended to the JSONL log.
    pub enabled: bool,
    /// Path to the event log. `~` is expanded to the home directory.
    pub path: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "~/.squill/events.jsonl".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// [deploy]
// ---------------------------------------------------------------------------

/// Settings for the static-site and backend deployment helpers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub region: String,
    /// Bucket names are this prefix followed by a millisecond timestamp.
    pub bucket_prefix: String,
    /// Directory holding the built frontend assets.
    pub build_dir: String,
    /// Cloud provider CLI executable.
    pub aws_cli: String,
    /// Serverless stage deployed by `deploy backend`.
    pub stage: String,
    /// JSON file recording the resulting URLs.
    pub info_file: String,
    /// Print commands instead of running them.
    pub dry_run: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            bucket_prefix: "squill-frontend-bucket-".to_string(),
            build_dir: "frontend/build".to_string(),
            aws_cli: "aws".to_string(),
            stage: "prod".to_string(),
            info_file: "deployment-info.json".to_string(),
            dry_run: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl SquillConfig {
    /// The annotated TOML written by `squill config init`.
    pub fn default_toml() -> String {
        r#"# squill configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SQUILL_*)
#   2. Project config (.squill.toml in current directory)
#   3. User global config (~/.squill/config.toml)
#   4. Built-in defaults

[api]
base_url = "https://a953zu5bnc.execute-api.us-east-1.amazonaws.com/dev"
timeout_ms = 10000
demo_email = "admin@squill.com"
demo_password = "demo123"

[dashboard]
variant = "brutalist"   # minimal | bento | brutalist

[web]
addr = "127.0.0.1:9820"
open_browser = true

[auth]
token_file = "~/.squill/auth_token"

[logging]
enabled = true
path = "~/.squill/events.jsonl"

[deploy]
region = "us-east-1"
bucket_prefix = "squill-frontend-bucket-"
build_dir = "frontend/build"
aws_cli = "aws"
stage = "prod"
info_file = "deployment-info.json"
dry_run = false
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
