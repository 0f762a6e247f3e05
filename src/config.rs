//! Runtime configuration.
//!
//! Column headers and extraction rules are data, not code: every rule change
//! is a config change that can be inspected through `GET /api/config`.
//! The file format is JSON, every section falls back to its defaults when
//! omitted.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Environment variable naming the config file when no CLI argument is given.
pub const CONFIG_ENV: &str = "FILLER_CONFIG";

/// Environment variable overriding `server.bind_addr`.
pub const ADDR_ENV: &str = "FILLER_ADDR";

/// Process label written into every row: "white-ink heat transfer".
pub const DEFAULT_PROCESS_LABEL: &str = "白墨烫画";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub columns: ColumnConfig,
    pub rules: RuleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Upper bound for an uploaded workbook, in bytes.
    pub max_upload_bytes: usize,
    /// Number of processed rows returned by the preview endpoint.
    pub preview_rows: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: "127.0.0.1:3000".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            preview_rows: 50,
        }
    }
}

/// Source and target header texts, matched after trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Column holding the "color/size" descriptor.
    pub spec: String,
    /// Primary identifier column, used when the preferred one is blank.
    pub identifier: String,
    /// Optional identifier column that wins whenever it is non-empty.
    pub preferred_identifier: Option<String>,
    pub targets: TargetHeaders,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            spec: "规格属性".to_string(),
            identifier: "SKCID".to_string(),
            preferred_identifier: Some("SKU货号".to_string()),
            targets: TargetHeaders::default(),
        }
    }
}

/// Header text of each of the five derived columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetHeaders {
    pub style_code: String,
    pub color: String,
    pub size: String,
    pub image_code: String,
    pub process_type: String,
}

impl Default for TargetHeaders {
    fn default() -> Self {
        TargetHeaders {
            style_code: "*款式编码".to_string(),
            color: "*颜色".to_string(),
            size: "*尺码".to_string(),
            image_code: "*图片编码".to_string(),
            process_type: "*工艺".to_string(),
        }
    }
}

impl TargetHeaders {
    /// Headers in output order: style, color, size, image, process.
    pub fn as_array(&self) -> [&str; 5] {
        [
            &self.style_code,
            &self.color,
            &self.size,
            &self.image_code,
            &self.process_type,
        ]
    }
}

/// How the style code is cut out of the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleCodePolicy {
    /// `A` plus exactly one digit: `A820250603048` -> `A8`.
    #[default]
    SingleDigit,
    /// `A` plus the whole digit run: `A820250603048` -> `A820250603048`.
    DigitRun,
}

/// How the image code is cut out of the identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageCodePolicy {
    /// Four-branch chain: digits after `A<n>-`, then the `A<n>` prefix,
    /// then a leading digit run, then the identifier unchanged.
    #[default]
    FallbackChain,
    /// First whitespace-separated token of the identifier.
    FirstToken,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub style_code: StyleCodePolicy,
    /// Emitted when no `A<digit>` pattern is found.
    pub default_style_code: String,
    pub image_code: ImageCodePolicy,
    pub process_label: String,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            style_code: StyleCodePolicy::default(),
            default_style_code: "A2".to_string(),
            image_code: ImageCodePolicy::default(),
            process_label: DEFAULT_PROCESS_LABEL.to_string(),
        }
    }
}

impl Config {
    /// Load a config file and validate it.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON file; missing sections take their defaults
    ///
    /// # Errors
    /// * `ConfigError::Io` if the file cannot be read
    /// * `ConfigError::Parse` if it is not valid JSON for this schema
    /// * `ConfigError::Invalid` if header names are blank or repeated
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        let config: Config = serde_json::from_str(&contents).map_err(|source| {
            ConfigError::Parse {
                path: display,
                source,
            }
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Resolve the config the way the server binary does: explicit path,
    /// else `FILLER_CONFIG`, else defaults; `FILLER_ADDR` then overrides the
    /// bind address.
    pub fn from_env(cli_path: Option<&str>) -> Result<Self, ConfigError> {
        let env_path = std::env::var(CONFIG_ENV).ok();
        let mut config = match cli_path.or(env_path.as_deref()) {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Ok(addr) = std::env::var(ADDR_ENV) {
            if !addr.trim().is_empty() {
                config.server.bind_addr = addr.trim().to_string();
            }
        }

        Ok(config)
    }

    /// Check that the five target headers and both source headers are
    /// non-blank and that no target header is listed twice.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let columns = &self.columns;
        if columns.spec.trim().is_empty() || columns.identifier.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "source column headers must not be blank".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for header in columns.targets.as_array() {
            let header = header.trim();
            if header.is_empty() {
                return Err(ConfigError::Invalid(
                    "target column headers must not be blank".to_string(),
                ));
            }
            if !seen.insert(header) {
                return Err(ConfigError::Invalid(format!(
                    "target column header '{}' is listed twice",
                    header
                )));
            }
        }

        if self.server.preview_rows == 0 {
            return Err(ConfigError::Invalid(
                "server.preview_rows must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
