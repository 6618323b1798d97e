//! core::config
//!
//! Optional configuration file for catalog lookup options.
//!
//! # Overview
//!
//! By default the catalog contract is fixed: extended property
//! `MS_Description`, schema `dbo`. An `edmxdoc.toml` file can override both,
//! for databases that keep their tables in a different schema or record
//! documentation under a different property name.
//!
//! # Locations
//!
//! Searched in order (first hit wins):
//! 1. `edmxdoc.toml` next to the input model
//! 2. `edmxdoc.toml` in the current directory
//!
//! A missing file means defaults; a malformed file is a fatal configuration
//! error.
//!
//! # Example
//!
//! ```toml
//! [catalog]
//! schema = "app"
//! property_name = "MS_Description"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "edmxdoc.toml";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Top-level configuration file schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Catalog lookup options.
    pub catalog: CatalogOptions,
}

/// Options controlling how extended properties are looked up.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogOptions {
    /// Schema the documented tables live in.
    pub schema: String,
    /// Extended-property name that carries documentation.
    pub property_name: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            schema: "dbo".to_string(),
            property_name: "MS_Description".to_string(),
        }
    }
}

impl CatalogOptions {
    /// Validate the option values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema.is_empty() {
            return Err(ConfigError::InvalidValue(
                "catalog.schema must not be empty".to_string(),
            ));
        }
        if self.property_name.is_empty() {
            return Err(ConfigError::InvalidValue(
                "catalog.property_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load catalog options, preferring a config file next to the input model.
pub fn load(input_dir: Option<&Path>) -> Result<CatalogOptions, ConfigError> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(dir) = input_dir {
        candidates.push(dir.join(CONFIG_FILE_NAME));
    }
    candidates.push(PathBuf::from(CONFIG_FILE_NAME));

    for path in candidates {
        if !path.is_file() {
            continue;
        }
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config: FileConfig = toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        config.catalog.validate()?;
        return Ok(config.catalog);
    }

    Ok(CatalogOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_catalog_contract() {
        let options = CatalogOptions::default();
        assert_eq!(options.schema, "dbo");
        assert_eq!(options.property_name, "MS_Description");
        assert!(options.validate().is_ok());
    }

    #[test]
    fn parses_overrides() {
        let config: FileConfig = toml::from_str(
            r#"
            [catalog]
            schema = "app"
            "#,
        )
        .unwrap();
        assert_eq!(config.catalog.schema, "app");
        assert_eq!(config.catalog.property_name, "MS_Description");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = toml::from_str::<FileConfig>(
            r#"
            [catalog]
            shcema = "app"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_schema_is_invalid() {
        let options = CatalogOptions {
            schema: String::new(),
            ..CatalogOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let options = load(Some(dir.path())).unwrap();
        assert_eq!(options, CatalogOptions::default());
    }

    #[test]
    fn file_next_to_input_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[catalog]\nschema = \"sales\"\n",
        )
        .unwrap();
        let options = load(Some(dir.path())).unwrap();
        assert_eq!(options.schema, "sales");
    }

    #[test]
    fn malformed_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "not toml [").unwrap();
        let err = load(Some(dir.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
