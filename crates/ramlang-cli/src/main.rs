//! ramlang CLI entrypoint
//! Parses command-line arguments and dispatches to the core generator.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use ramlang_core::{Config, RamlSpec};

#[derive(Parser)]
#[command(name = "ramlang")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Generate AngularJS services from a parsed RAML resource tree
    Generate {
        /// Name of the generated Angular module; `-api` is appended unless
        /// the name is the plain `api`
        #[arg(long, default_value = "api")]
        module_name: String,
        /// Path or URL to the parsed RAML resource tree (YAML or JSON)
        ///
        /// Can be a local file path or an HTTP/HTTPS URL
        /// Example: --raml-path path/to/api.json
        /// Example: --raml-path https://example.com/api.json
        #[arg(long)]
        raml_path: String,
        /// Output directory for generated code
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        /// Write one file per service instead of a single combined file
        #[arg(long)]
        separate_files: bool,
        /// Generate only the named top-level resource; repeatable
        #[arg(long = "resource")]
        resources: Vec<String>,
        /// Directory with template overrides
        #[arg(long)]
        template_dir: Option<PathBuf>,
        /// Media type extension to substitute into URIs, e.g. `.json`
        #[arg(long)]
        media_type_extension: Option<String>,
        /// Load settings from a saved YAML config; command-line flags win
        #[arg(long)]
        config: Option<PathBuf>,
        /// Save the effective settings to this YAML file before generating
        #[arg(long)]
        save_config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match &cli.command {
        Commands::Generate {
            module_name,
            raml_path,
            output_dir,
            separate_files,
            resources,
            template_dir,
            media_type_extension,
            config,
            save_config,
        } => {
            let mut effective = match config {
                Some(path) => Config::from_file(path)
                    .await
                    .with_context(|| format!("Failed to load config from {}", path.display()))?,
                None => Config::new(
                    module_name.clone(),
                    raml_path.clone(),
                    output_dir.to_string_lossy().to_string(),
                ),
            };

            // Explicit flags override a loaded config file
            if config.is_some() {
                if module_name != "api" {
                    effective.module_name = module_name.clone();
                }
                effective.raml_path = raml_path.clone();
                effective.output_dir = output_dir.to_string_lossy().to_string();
            }
            effective.all_in_one_file = !separate_files;
            if !resources.is_empty() {
                effective.selected_resources = resources.clone();
            }
            if let Some(dir) = template_dir {
                effective.template_dir = Some(dir.to_string_lossy().to_string());
            }
            if let Some(ext) = media_type_extension {
                effective.media_type_extension = Some(ext.clone());
            }

            if let Some(path) = save_config {
                effective
                    .save(path)
                    .await
                    .with_context(|| format!("Failed to save config to {}", path.display()))?;
            }

            println!("Loading RAML resource tree from: {}", effective.raml_path);
            let spec = RamlSpec::from_file_or_url(&effective.raml_path)
                .await
                .context("Failed to load RAML resource tree")?;

            let output = ramlang_core::generate(&spec, &effective)
                .await
                .context("Failed to generate client")?;

            for finding in &output.diagnostics {
                eprintln!("warning: {}", finding);
            }

            ramlang_core::write_files(&output, &effective.output_dir)
                .await
                .with_context(|| {
                    format!("Failed to write generated files to {}", effective.output_dir)
                })?;

            for file in &output.files {
                println!("Generated {}", file.name);
            }
            println!(
                "Successfully generated {} file(s) in: {}",
                output.files.len(),
                effective.output_dir
            );
        }
    }
    Ok(())
}
