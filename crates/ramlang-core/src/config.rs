//! Configuration management for ramlang code generation.
//!
//! This module defines the `Config` struct and related functionality for
//! managing generation settings. The configuration can be loaded from a YAML
//! file, created programmatically, or assembled from command-line arguments.
//!
//! # Examples
//!
//! ```no_run
//! use ramlang_core::config::Config;
//!
//! let mut config = Config::new("blog", "api.json", "output");
//! config.all_in_one_file = false;
//! config.selected_resources = vec!["Posts".to_string()];
//! ```

// Internal imports (std, crate)
use std::path::Path;

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Configuration for ramlang client generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the generated Angular module, without the `-api` suffix
    pub module_name: String,

    /// Path or URL of the parsed RAML resource tree (JSON or YAML)
    pub raml_path: String,

    /// Output directory for generated code
    pub output_dir: String,

    /// Write one combined file instead of one file per service
    #[serde(default = "default_all_in_one")]
    pub all_in_one_file: bool,

    /// Display names of the top-level resources to generate; empty means all
    #[serde(default)]
    pub selected_resources: Vec<String>,

    /// Optional path to a template override directory
    #[serde(default)]
    pub template_dir: Option<String>,

    /// Media type extension substituted for the `mediaTypeExtension`
    /// URI parameter, e.g. `.json`
    #[serde(default)]
    pub media_type_extension: Option<String>,
}

impl Config {
    /// Create a new Config with default values
    pub fn new(
        module_name: impl Into<String>,
        raml_path: impl Into<String>,
        output_dir: impl Into<String>,
    ) -> Self {
        Self {
            module_name: module_name.into(),
            raml_path: raml_path.into(),
            output_dir: output_dir.into(),
            all_in_one_file: default_all_in_one(),
            selected_resources: Vec::new(),
            template_dir: None,
            media_type_extension: None,
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

fn default_all_in_one() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_roundtrip() -> crate::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("config.yaml");

        let mut config = Config::new("blog", "api.json", "output");
        config.selected_resources = vec!["Posts".to_string()];
        config.save(&file_path).await?;

        let loaded = Config::from_file(&file_path).await?;
        assert_eq!(loaded.module_name, "blog");
        assert_eq!(loaded.raml_path, "api.json");
        assert_eq!(loaded.output_dir, "output");
        assert!(loaded.all_in_one_file);
        assert_eq!(loaded.selected_resources, vec!["Posts".to_string()]);
        assert_eq!(loaded.template_dir, None);
        assert_eq!(loaded.media_type_extension, None);

        Ok(())
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: Config = serde_yaml::from_str(
            "module_name: blog\nraml_path: api.json\noutput_dir: out\n",
        )
        .unwrap();

        assert!(config.all_in_one_file);
        assert!(config.selected_resources.is_empty());
    }
}
