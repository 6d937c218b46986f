//! Configuration management for record generation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-records.toml)
//! - Environment variables (RECORDS__*)
//!
//! ## Example config file (schema-records.toml):
//! ```toml
//! [generator]
//! root_classname = "VegaLiteSchema"
//! cache_references = true
//!
//! [export]
//! out_dir = "generated"
//! include_checksums = true
//! clean = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::schema::ROOT_CLASSNAME;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Generation settings
    #[serde(default)]
    pub generator: GenerationSettings,

    /// Output settings
    #[serde(default)]
    pub export: ExportConfig,
}

/// Generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Class name of the record generated for the document root
    #[serde(default = "default_root_classname")]
    pub root_classname: String,

    /// Memoize `$ref` resolution within a run
    #[serde(default = "default_true")]
    pub cache_references: bool,
}

/// Export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory generated artifacts are written to
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Write a checksums.sha256 listing
    #[serde(default = "default_true")]
    pub include_checksums: bool,

    /// Remove the output directory before writing
    #[serde(default)]
    pub clean: bool,
}

// Default value functions
fn default_root_classname() -> String {
    ROOT_CLASSNAME.to_string()
}

fn default_true() -> bool {
    true
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("generated")
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            root_classname: default_root_classname(),
            cache_references: true,
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            include_checksums: true,
            clean: false,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the default locations
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-records.toml",
            ".schema-records.toml",
            "config/schema-records.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "schema-records", "schema-records") {
            let xdg_config = config_dir.config_dir().join("schema-records.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // RECORDS__GENERATOR__CACHE_REFERENCES=false etc.
        builder = builder.add_source(
            Environment::with_prefix("RECORDS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Whether the root record keeps the default class name
    pub fn uses_default_root_classname(&self) -> bool {
        self.generator.root_classname == ROOT_CLASSNAME
    }

    /// Get the output directory (resolves relative paths)
    pub fn out_dir(&self) -> PathBuf {
        if self.export.out_dir.is_absolute() {
            self.export.out_dir.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.export.out_dir)
        }
    }
}
