//! Ramlang Core Library
//!
//! This library provides the core functionality for generating AngularJS
//! API clients from parsed RAML resource trees.

pub mod compose;
pub mod config;
pub mod docs;
pub mod error;
pub mod generate;
pub mod methods;
pub mod raml;
pub mod resolver;
pub mod templates;
pub mod utils;

pub use crate::{
    compose::{Composed, Composer},
    config::Config,
    error::{Error, Result},
    generate::{GeneratedFile, GeneratedOutput, generate, write_files},
    raml::RamlSpec,
    templates::{TemplateId, TemplateManager},
};
