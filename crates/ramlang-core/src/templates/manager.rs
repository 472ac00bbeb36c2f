//! Loading and rendering of the output templates.

// Internal imports (std, crate)
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

use super::TemplateId;

// External imports (alphabetized)
use tera::{Context, Tera};

/// Manages loading and rendering of the generation templates
#[derive(Debug, Clone)]
pub struct TemplateManager {
    /// Cached Tera template engine instance
    tera: Arc<Tera>,
}

impl TemplateManager {
    /// Create a manager backed by the embedded default templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        for id in TemplateId::all() {
            tera.add_raw_template(id.file_name(), id.default_text())
                .map_err(|e| {
                    Error::template(format!(
                        "Failed to load embedded template '{}': {}",
                        id.file_name(),
                        e
                    ))
                })?;
        }

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Create a manager with file-by-file overrides from a template
    /// directory.
    ///
    /// A file named after a template (e.g. `method.js.tera`) replaces the
    /// embedded default; templates without an override keep it. Unknown
    /// files in the directory are ignored.
    pub async fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut tera = Tera::default();

        for id in TemplateId::all() {
            let override_path = dir.join(id.file_name());
            let text = if override_path.exists() {
                log::debug!("Using template override: {}", override_path.display());
                tokio::fs::read_to_string(&override_path).await?
            } else {
                id.default_text().to_string()
            };

            tera.add_raw_template(id.file_name(), &text).map_err(|e| {
                Error::template(format!(
                    "Failed to load template '{}': {}",
                    id.file_name(),
                    e
                ))
            })?;
        }

        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Render one template with the provided context
    pub fn render(&self, id: TemplateId, context: &Context) -> Result<String> {
        log::debug!("Rendering template: {}", id.file_name());

        self.tera.render(id.file_name(), context).map_err(|e| {
            Error::template(format!(
                "Failed to render template '{}': {}",
                id.file_name(),
                e
            ))
        })
    }

    /// Check if a template is loaded
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template(name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_templates_load() {
        let manager = TemplateManager::new().unwrap();
        for id in TemplateId::all() {
            assert!(manager.has_template(id.file_name()));
        }
        assert!(!manager.has_template("unknown.js.tera"));
    }

    #[test]
    fn test_render_app_template() {
        let manager = TemplateManager::new().unwrap();

        let mut context = Context::new();
        context.insert(
            "app",
            &serde_json::json!({"name": "blog-api", "title": "Blog API", "version": "1.0"}),
        );

        let rendered = manager.render(TemplateId::App, &context).unwrap();
        assert!(rendered.contains("angular.module('blog-api', [])"));
        assert!(rendered.contains("Blog API"));
    }

    #[tokio::test]
    async fn test_directory_override() -> Result<()> {
        let dir = tempfile::tempdir()?;
        tokio::fs::write(
            dir.path().join("app.js.tera"),
            "// custom\nangular.module('{{ app.name }}', [])",
        )
        .await?;

        let manager = TemplateManager::from_dir(dir.path()).await?;

        let mut context = Context::new();
        context.insert("app", &serde_json::json!({"name": "blog-api"}));

        let rendered = manager.render(TemplateId::App, &context)?;
        assert!(rendered.starts_with("// custom"));

        // Templates without an override keep the embedded default
        assert!(manager.has_template(TemplateId::Method.file_name()));

        Ok(())
    }
}
