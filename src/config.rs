//! Engine configuration.
//!
//! Handles loading, validating, and merging `rendition.toml` files. Stock
//! defaults are overridden by whatever a user file sets; everything else keeps
//! its default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [remote]
//! # repository_id = "delivery-p1234-e5678.adobeaemcloud.com"
//! scheme = "https"
//! metadata_path_template = "/adobe/assets/{asset-id}/metadata"
//! delivery_path_template = "/adobe/dynamicmedia/deliver/{asset-id}/{seo-name}.{format}"
//! original_path_template = "/adobe/assets/{asset-id}/original/as/{seo-name}.{extension}"
//! metadata_cache_ttl_seconds = 600
//!
//! [remote.headers]
//! # X-Api-Key = "my-key"
//!
//! # [remote.auth]
//! # token_url = "https://ims.example.com/token"
//! # client_id = "..."
//! # client_secret = "..."
//! # scope = "openid"
//!
//! [delivery]
//! base_url = "/asset/delivery"
//! supported_formats = ["jpeg", "png", "gif", "webp"]
//! crop_encoding = "relative"      # or "absolute"
//!
//! [http]
//! connect_timeout_seconds = 5
//! request_timeout_seconds = 15
//!
//! [locks]
//! stripes = 64
//! ```
//!
//! A missing `repository_id` is not an error: remote delivery simply reports
//! itself unavailable. Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Name of the config file looked up by [`load_config`].
pub const CONFIG_FILENAME: &str = "rendition.toml";

/// Placeholder substituted with the remote asset id in path templates.
pub const ASSET_ID_PLACEHOLDER: &str = "{asset-id}";

const SEO_NAME_PLACEHOLDER: &str = "{seo-name}";
const FORMAT_PLACEHOLDERS: [&str; 2] = ["{format}", "{extension}"];

/// Substitute the asset id, SEO name and format into a path template.
///
/// `{format}` and `{extension}` are interchangeable.
pub fn fill_template(template: &str, asset_id: &str, seo_name: &str, format: &str) -> String {
    let filled = template
        .replace(ASSET_ID_PLACEHOLDER, asset_id)
        .replace(SEO_NAME_PLACEHOLDER, seo_name);
    FORMAT_PLACEHOLDERS
        .iter()
        .fold(filled, |path, placeholder| path.replace(placeholder, format))
}

/// Output formats both delivery endpoints can produce out of the box.
pub fn default_supported_formats() -> Vec<String> {
    ["jpeg", "png", "gif", "webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Engine configuration loaded from `rendition.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Remote asset repository (metadata lookups and remote delivery).
    pub remote: RemoteConfig,
    /// Repository-native delivery endpoint.
    pub delivery: DeliveryConfig,
    /// HTTP client timeouts.
    pub http: HttpConfig,
    /// Per-asset lock striping.
    pub locks: LockConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delivery.supported_formats.is_empty() {
            return Err(ConfigError::Validation(
                "delivery.supported_formats must not be empty".into(),
            ));
        }
        if self.locks.stripes == 0 {
            return Err(ConfigError::Validation(
                "locks.stripes must be non-zero".into(),
            ));
        }
        if self.http.connect_timeout_seconds == 0 || self.http.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "http timeouts must be non-zero".into(),
            ));
        }
        if let Some(auth) = &self.remote.auth {
            let blank = [
                ("token_url", &auth.token_url),
                ("client_id", &auth.client_id),
                ("client_secret", &auth.client_secret),
                ("scope", &auth.scope),
            ]
            .into_iter()
            .find(|(_, v)| v.trim().is_empty());
            if let Some((key, _)) = blank {
                return Err(ConfigError::Validation(format!(
                    "remote.auth.{key} must not be blank"
                )));
            }
        }
        Ok(())
    }
}

/// Remote asset repository settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    /// Host of the remote repository. Absent means remote delivery is off.
    pub repository_id: Option<String>,
    pub scheme: String,
    /// Metadata path; `{asset-id}` is substituted.
    pub metadata_path_template: Option<String>,
    /// Scaled delivery path; `{asset-id}`, `{seo-name}`, `{format}` are substituted.
    pub delivery_path_template: String,
    /// Original binary path; `{asset-id}`, `{seo-name}`, `{extension}` are substituted.
    pub original_path_template: String,
    /// Static headers sent with every metadata request.
    pub headers: BTreeMap<String, String>,
    pub metadata_cache_ttl_seconds: u64,
    /// Client credentials for bearer tokens. Absent means unauthenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            repository_id: None,
            scheme: "https".to_string(),
            metadata_path_template: Some("/adobe/assets/{asset-id}/metadata".to_string()),
            delivery_path_template: "/adobe/dynamicmedia/deliver/{asset-id}/{seo-name}.{format}"
                .to_string(),
            original_path_template: "/adobe/assets/{asset-id}/original/as/{seo-name}.{extension}"
                .to_string(),
            headers: BTreeMap::new(),
            metadata_cache_ttl_seconds: 600,
            auth: None,
        }
    }
}

impl RemoteConfig {
    /// `scheme://repository_id`, when a non-blank repository is configured.
    pub fn repository_base(&self) -> Option<String> {
        self.repository_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| format!("{}://{}", self.scheme, id))
    }

    pub fn metadata_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.metadata_cache_ttl_seconds)
    }
}

/// OAuth2 client-credentials settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
}

/// How an explicit crop rectangle is spelled for native delivery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropEncoding {
    /// Percentages of the original: `6.5p,55.0p,52.5p,67.0p`.
    #[default]
    Relative,
    /// Raw pixels: `13,55,105,67`.
    Absolute,
}

/// Repository-native delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeliveryConfig {
    pub base_url: String,
    /// Output formats the endpoint can produce. Anything else becomes jpeg.
    pub supported_formats: Vec<String>,
    pub crop_encoding: CropEncoding,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            base_url: "/asset/delivery".to_string(),
            supported_formats: default_supported_formats(),
            crop_encoding: CropEncoding::default(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    pub connect_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: 5,
            request_timeout_seconds: 15,
        }
    }
}

impl HttpConfig {
    /// Build the blocking client shared by token exchange and metadata lookups.
    pub fn client(&self) -> reqwest::Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(self.connect_timeout_seconds))
            .timeout(Duration::from_secs(self.request_timeout_seconds))
            .user_agent(concat!("rendition-resolver/", env!("CARGO_PKG_VERSION")))
            .build()
    }
}

/// Lock striping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockConfig {
    /// Requested stripe count; rounded up to a power of two.
    pub stripes: usize,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self { stripes: 64 }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(Config::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `rendition.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<Config, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `rendition.toml` in the given directory.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    resolve_config(load_raw_config(dir)?)
}

/// Returns a fully-commented stock `rendition.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Rendition Resolver Configuration
# ================================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Remote asset repository
# ---------------------------------------------------------------------------
[remote]
# Host of the remote repository. Leave unset to disable remote delivery.
# repository_id = "delivery-p1234-e5678.adobeaemcloud.com"
scheme = "https"

# Where asset metadata lives. {asset-id} is replaced with the asset id.
metadata_path_template = "/adobe/assets/{asset-id}/metadata"

# Scaled renditions and original binaries.
delivery_path_template = "/adobe/dynamicmedia/deliver/{asset-id}/{seo-name}.{format}"
original_path_template = "/adobe/assets/{asset-id}/original/as/{seo-name}.{extension}"

# How long fetched metadata is reused.
metadata_cache_ttl_seconds = 600

# Static headers sent with every metadata request.
[remote.headers]
# X-Api-Key = "my-key"

# Client credentials for bearer tokens. Omit for unauthenticated requests.
# [remote.auth]
# token_url = "https://ims.example.com/ims/token/v3"
# client_id = "my-client"
# client_secret = "my-secret"
# scope = "openid,AdobeID"

# ---------------------------------------------------------------------------
# Repository-native delivery
# ---------------------------------------------------------------------------
[delivery]
base_url = "/asset/delivery"

# Output formats the endpoint can produce. Anything else is served as jpeg.
supported_formats = ["jpeg", "png", "gif", "webp"]

# "relative" (percentages of the original) or "absolute" (pixels).
crop_encoding = "relative"

# ---------------------------------------------------------------------------
# HTTP client
# ---------------------------------------------------------------------------
[http]
connect_timeout_seconds = 5
request_timeout_seconds = 15

# ---------------------------------------------------------------------------
# Locking
# ---------------------------------------------------------------------------
[locks]
# Per-asset lock stripes, rounded up to a power of two.
stripes = 64
"##
}
