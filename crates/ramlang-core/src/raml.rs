//! Parsed RAML resource tree model and loading.
//!
//! The RAML text format itself is parsed upstream; this module consumes the
//! already-decoded resource tree serialized as JSON or YAML and provides the
//! typed model the generator walks. Loading supports local files and
//! HTTP/HTTPS URLs.
//!
//! # Examples
//!
//! ```no_run
//! use ramlang_core::raml::RamlSpec;
//! use ramlang_core::error::Result;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//! let spec = RamlSpec::from_file("api.json").await?;
//! if let Some(title) = spec.title.as_deref() {
//!     println!("API title: {}", title);
//! }
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::utils::to_camel_case;
use crate::Error;

// External imports (alphabetized)
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use tokio::fs;

/// Root of a parsed RAML document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RamlSpec {
    /// API title
    pub title: Option<String>,

    /// API version string
    pub version: Option<String>,

    /// Base URI all resources hang off
    #[serde(default, rename = "baseUri")]
    pub base_uri: Option<String>,

    /// Selected media type extension (e.g. `.json`), substituted for the
    /// `mediaTypeExtension` URI parameter during generation
    #[serde(default, rename = "mediaTypeExtension")]
    pub media_type_extension: Option<String>,

    /// Free-text description of the API
    pub description: Option<String>,

    /// Top-level resources, in declaration order
    #[serde(default)]
    pub resources: Vec<ResourceNode>,
}

/// One node of the RAML resource tree
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Path segment relative to the parent, may contain `{name}` placeholders
    #[serde(default, rename = "relativeUri")]
    pub relative_uri: String,

    /// Human-readable name, defaulted from the URI when absent
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,

    /// Free-text description of the resource
    pub description: Option<String>,

    /// URI parameters declared on this node's segment, in declaration order
    #[serde(default, rename = "uriParameters")]
    pub uri_parameters: IndexMap<String, UriParamDecl>,

    /// HTTP operations declared directly on this node, in declaration order
    #[serde(default)]
    pub methods: Vec<MethodDecl>,

    /// Child resources, in declaration order
    #[serde(default)]
    pub resources: Vec<ResourceNode>,
}

/// Declaration of a single URI parameter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UriParamDecl {
    /// Whether the parameter must be present. RAML parsers emit both native
    /// booleans and the strings "true"/"false" here.
    #[serde(default, deserialize_with = "deserialize_required")]
    pub required: bool,

    /// Fixed or example value for the parameter
    #[serde(default)]
    pub value: Option<JsonValue>,

    /// Human-readable name
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,
}

/// Declaration of a single HTTP operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodDecl {
    /// HTTP verb, lower case (`get`, `post`, `put`, `delete`, ...)
    pub method: String,

    /// Explicit name for the generated method
    #[serde(default, rename = "displayName")]
    pub display_name: Option<String>,

    /// Free-text description of the operation
    pub description: Option<String>,
}

impl RamlSpec {
    /// Load a spec from a file or URL (supports both YAML and JSON)
    pub async fn from_file_or_url<P: AsRef<str>>(location: P) -> crate::Result<Self> {
        let location = location.as_ref();

        if location.starts_with("http://") || location.starts_with("https://") {
            return Self::from_url(location).await;
        }

        Self::from_file(location).await
    }

    /// Load a spec from a file (supports both YAML and JSON)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        Self::parse_content(&content).map_err(|e| {
            Error::raml(format!(
                "Failed to parse RAML tree at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load a spec from a URL (supports both YAML and JSON)
    pub async fn from_url(url: &str) -> crate::Result<Self> {
        let response = reqwest::get(url)
            .await
            .map_err(|e| Error::raml(format!("Failed to fetch RAML tree from {}: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(Error::raml(format!(
                "Failed to fetch RAML tree from {}: HTTP {}",
                url,
                response.status()
            )));
        }

        let content = response
            .text()
            .await
            .map_err(|e| Error::raml(format!("Failed to read response from {}: {}", url, e)))?;

        Self::parse_content(&content)
            .map_err(|e| Error::raml(format!("Failed to parse RAML tree from {}: {}", url, e)))
    }

    /// Parse content as either JSON or YAML
    fn parse_content(content: &str) -> Result<Self, String> {
        if let Ok(spec) = serde_json::from_str(content) {
            return Ok(spec);
        }

        if let Ok(spec) = serde_yaml::from_str(content) {
            return Ok(spec);
        }

        Err("content is neither valid JSON nor YAML".to_string())
    }

    /// Check the structural invariants the generator relies on.
    ///
    /// Every node below the root must carry a non-empty `relativeUri`;
    /// anything else is a malformed input tree and aborts the run.
    pub fn validate(&self) -> crate::Result<()> {
        fn check(node: &ResourceNode, parent_uri: &str) -> crate::Result<()> {
            if node.relative_uri.is_empty() {
                return Err(Error::raml(format!(
                    "resource under '{}' is missing a relativeUri",
                    if parent_uri.is_empty() { "/" } else { parent_uri }
                )));
            }
            let uri = format!("{}{}", parent_uri, node.relative_uri);
            for child in &node.resources {
                check(child, &uri)?;
            }
            Ok(())
        }

        for resource in &self.resources {
            check(resource, "")?;
        }
        Ok(())
    }

    /// Keep only the top-level resources whose display name was selected
    pub fn filter_resources(&mut self, selected: &[String]) {
        self.resources
            .retain(|r| r.display_name.as_deref().is_some_and(|name| {
                selected.iter().any(|s| s == name)
            }));
    }

    /// Recursively default missing display names from the relative URI
    pub fn format_display_names(&mut self) {
        fn walk(node: &mut ResourceNode) {
            if node.display_name.is_none() {
                node.display_name = Some(derived_display_name(&node.relative_uri));
            }
            for child in &mut node.resources {
                walk(child);
            }
        }

        for resource in &mut self.resources {
            walk(resource);
        }
    }
}

/// Display name derived from a relative URI, e.g. `/blog-posts` -> `BlogPosts`
fn derived_display_name(relative_uri: &str) -> String {
    let trimmed = relative_uri.strip_prefix('/').unwrap_or(relative_uri);
    to_camel_case(&trimmed.replace('/', "_"), true)
}

impl UriParamDecl {
    /// Whether the parameter is declared required
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// The declared literal value, if it is a string or number
    pub fn value_as_string(&self) -> Option<String> {
        match &self.value {
            Some(JsonValue::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(JsonValue::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Accept both a native boolean and the strings "true"/"false"
fn deserialize_required<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;

    match value {
        JsonValue::Bool(b) => Ok(b),
        JsonValue::String(s) => Ok(s.eq_ignore_ascii_case("true")),
        JsonValue::Null => Ok(false),
        _ => Err(serde::de::Error::custom(
            "expected boolean or \"true\"/\"false\"",
        )),
    }
}
