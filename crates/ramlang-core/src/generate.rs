//! Generation of the AngularJS client from a parsed RAML tree.
//!
//! Renders the application module, the shared `Api` provider, and one
//! factory service per top-level resource, then assembles them either into a
//! single combined file or into one file per service.

// Internal imports (std, crate)
use std::path::Path;

use crate::compose::Composer;
use crate::config::Config;
use crate::docs::format_description;
use crate::error::Result;
use crate::raml::RamlSpec;
use crate::templates::{TemplateId, TemplateManager};
use crate::utils::{dasherize, singularize, strip_module_declaration, to_camel_case};

// External imports (alphabetized)
use serde::Serialize;
use tokio::fs;

/// One generated output file
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// File name relative to the output directory
    pub name: String,
    /// Full file contents
    pub contents: String,
}

/// The generated client plus all non-fatal findings
#[derive(Debug, Clone, Default)]
pub struct GeneratedOutput {
    pub files: Vec<GeneratedFile>,
    pub diagnostics: Vec<String>,
}

/// Application-level context shared by every template
#[derive(Debug, Serialize)]
struct AppContext {
    name: String,
    title: String,
    version: Option<String>,
    base_uri: Option<String>,
}

/// Context handed to the service template
#[derive(Debug, Serialize)]
struct ServiceContext {
    display_name: String,
    description: Option<String>,
    methods: String,
}

/// Generate the client for a parsed RAML tree.
///
/// The spec is cloned so display-name defaulting and resource selection
/// never touch the caller's copy.
pub async fn generate(spec: &RamlSpec, config: &Config) -> Result<GeneratedOutput> {
    let templates = match config.template_dir.as_deref() {
        Some(dir) => TemplateManager::from_dir(dir).await?,
        None => TemplateManager::new()?,
    };

    spec.validate()?;

    let mut spec = spec.clone();
    spec.format_display_names();
    if !config.selected_resources.is_empty() {
        spec.filter_resources(&config.selected_resources);
    }

    let module_name = module_name(&config.module_name);
    let media_type_extension = config
        .media_type_extension
        .as_deref()
        .or(spec.media_type_extension.as_deref());

    let app = AppContext {
        title: spec.title.clone().unwrap_or_else(|| module_name.clone()),
        version: spec.version.clone(),
        base_uri: spec.base_uri.clone(),
        name: module_name.clone(),
    };

    let mut context = tera::Context::new();
    context.insert("app", &app);

    let app_text = templates.render(TemplateId::App, &context)?;
    let provider_text = templates.render(TemplateId::Provider, &context)?;

    let composer = Composer::new(&templates, media_type_extension);
    let mut diagnostics = Vec::new();
    let mut services = Vec::new();

    for resource in &spec.resources {
        let composed = composer.compose(resource)?;
        diagnostics.extend(composed.diagnostics);

        let display_name = resource.display_name.clone().unwrap_or_default();
        let service = ServiceContext {
            display_name: service_name(&display_name),
            description: resource
                .description
                .as_deref()
                .map(|text| format_description(text, true))
                .filter(|text| !text.is_empty()),
            methods: composed.text,
        };

        let mut context = tera::Context::new();
        context.insert("app", &app);
        context.insert("resource", &service);

        log::debug!("Rendering service {} for {}", service.display_name, resource.relative_uri);
        services.push((display_name, templates.render(TemplateId::Service, &context)?));
    }

    let files = if config.all_in_one_file {
        assemble_combined(&module_name, &app_text, &provider_text, &services)
    } else {
        assemble_separate(&module_name, &app_text, &provider_text, &services)
    };

    Ok(GeneratedOutput { files, diagnostics })
}

/// Write every generated file below the output directory
pub async fn write_files<P: AsRef<Path>>(output: &GeneratedOutput, dir: P) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).await?;

    for file in &output.files {
        let path = dir.join(&file.name);
        log::debug!("Writing {}", path.display());
        fs::write(&path, &file.contents).await?;
    }

    Ok(())
}

/// The Angular module name; a `-api` suffix is appended unless the input is
/// already the plain `api`
fn module_name(input: &str) -> String {
    if input == "api" {
        "api".to_string()
    } else {
        format!("{}-api", input)
    }
}

/// The injectable name of one service, e.g. `Posts` -> `PostApi`
fn service_name(display_name: &str) -> String {
    format!("{}Api", singularize(&to_camel_case(display_name, true)))
}

/// One combined file: the module declaration with the provider and every
/// service chained onto it
fn assemble_combined(
    module_name: &str,
    app_text: &str,
    provider_text: &str,
    services: &[(String, String)],
) -> Vec<GeneratedFile> {
    let mut contents = String::from("'use strict';\n\n");
    contents.push_str(app_text.trim_end());

    for fragment in std::iter::once(provider_text)
        .chain(services.iter().map(|(_, text)| text.as_str()))
    {
        contents.push_str("\n\n");
        contents.push_str(strip_module_declaration(fragment).trim_matches('\n'));
    }

    contents.push_str(";\n");

    vec![GeneratedFile {
        name: format!("{}.js", dasherize(module_name)),
        contents,
    }]
}

/// One file per fragment: the module declaration, the provider, and each
/// service re-open the module by name
fn assemble_separate(
    module_name: &str,
    app_text: &str,
    provider_text: &str,
    services: &[(String, String)],
) -> Vec<GeneratedFile> {
    let mut files = vec![
        GeneratedFile {
            name: format!("{}.js", dasherize(module_name)),
            contents: standalone(app_text),
        },
        GeneratedFile {
            name: "api-provider.js".to_string(),
            contents: standalone(provider_text),
        },
    ];

    for (display_name, text) in services {
        files.push(GeneratedFile {
            name: format!("{}.js", dasherize(display_name)),
            contents: standalone(text),
        });
    }

    files
}

fn standalone(fragment: &str) -> String {
    format!("'use strict';\n\n{};\n", fragment.trim_end())
}
