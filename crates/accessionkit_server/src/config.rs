//! Layered server configuration.
//!
//! Sources, lowest to highest priority:
//! 1. Built-in defaults
//! 2. `accessionkit.toml` in the working directory, or the file named by
//!    `ACCESSIONKIT_CONFIG`
//! 3. `PORT` (plain port override)
//! 4. `ACCESSIONKIT_*` environment variables, `__` separating sections
//!    (`ACCESSIONKIT_SERVER__PORT` -> `server.port`)

use std::path::PathBuf;

use accessionkit_catalog::{
    EnumAlignmentRule, EnumJoinMode, SpecExportOptions, SpecMergeOptions,
    validate_export_file_name,
};
use accessionkit_io_fs::SpecStoreOptions;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const C_CONFIG_FILE_DEFAULT: &str = "accessionkit.toml";
const C_CONFIG_FILE_ENV: &str = "ACCESSIONKIT_CONFIG";
/// Excel row height ceiling (409 pt) in pixels.
const N_ROW_HEIGHT_PX_MAX: f64 = 409.0 / 0.75;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body cap for `POST /api/save`.
    pub max_body_bytes: usize,
    /// `*` allows any origin.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_body_bytes: 10 * 1024 * 1024,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub primary_file: String,
    pub secondary_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("public"),
            primary_file: "data.json".to_string(),
            secondary_file: "data2.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub file_name: String,
    pub sheet_name: String,
    pub row_height_px: f64,
    pub freeze_header: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let spec_export_options = SpecExportOptions::default();
        Self {
            file_name: spec_export_options.file_name,
            sheet_name: spec_export_options.sheet_name,
            row_height_px: spec_export_options.row_height_px,
            freeze_header: spec_export_options.if_freeze_header,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    #[default]
    Positional,
    Keyed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MergeConfig {
    pub mode: MergeMode,
    /// Join field for keyed mode.
    pub key: String,
    /// Fail instead of warn when positional inputs differ in length.
    pub strict_alignment: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            mode: MergeMode::Positional,
            key: accessionkit_catalog::conf::C_MERGE_KEY_DEFAULT.to_string(),
            strict_alignment: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub export: ExportConfig,
    pub merge: MergeConfig,
    /// Emit JSON log lines instead of plain text.
    pub log_json: bool,
}

impl AppConfig {
    /// Load and validate configuration from all sources.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the provider chain.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let path_config = std::env::var(C_CONFIG_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(C_CONFIG_FILE_DEFAULT));
        if path_config.exists() {
            figment = figment.merge(Toml::file(path_config));
        }

        figment
            .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
            .merge(
                Env::prefixed("ACCESSIONKIT_")
                    .ignore(&["CONFIG"])
                    .split("__"),
            )
    }

    /// Reject values the service cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_export_file_name(&self.export.file_name)
            .map_err(|reason| invalid_value("export.file_name", reason))?;
        if self.export.sheet_name.trim().is_empty() {
            return Err(invalid_value("export.sheet_name", "must not be empty"));
        }
        if !(self.export.row_height_px > 0.0 && self.export.row_height_px <= N_ROW_HEIGHT_PX_MAX)
        {
            return Err(invalid_value(
                "export.row_height_px",
                format!("must be within (0, {N_ROW_HEIGHT_PX_MAX:.2}]"),
            ));
        }
        if self.merge.mode == MergeMode::Keyed && self.merge.key.trim().is_empty() {
            return Err(invalid_value("merge.key", "must not be empty in keyed mode"));
        }
        if self.server.max_body_bytes == 0 {
            return Err(invalid_value("server.max_body_bytes", "must be positive"));
        }
        Ok(())
    }

    pub fn to_store_options(&self) -> SpecStoreOptions {
        SpecStoreOptions::from_dir(
            &self.store.data_dir,
            &self.store.primary_file,
            &self.store.secondary_file,
        )
    }

    pub fn to_merge_options(&self) -> SpecMergeOptions {
        let mode = match self.merge.mode {
            MergeMode::Positional => EnumJoinMode::Positional,
            MergeMode::Keyed => EnumJoinMode::Keyed {
                key: self.merge.key.trim().to_string(),
            },
        };
        let rule_alignment = if self.merge.strict_alignment {
            EnumAlignmentRule::Strict
        } else {
            EnumAlignmentRule::Lenient
        };
        SpecMergeOptions {
            mode,
            rule_alignment,
        }
    }

    pub fn to_export_options(&self) -> SpecExportOptions {
        SpecExportOptions {
            sheet_name: self.export.sheet_name.clone(),
            file_name: self.export.file_name.clone(),
            row_height_px: self.export.row_height_px,
            if_freeze_header: self.export.freeze_header,
        }
    }
}

fn invalid_value(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}
