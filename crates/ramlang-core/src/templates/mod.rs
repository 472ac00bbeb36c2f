//! Template system for the generated AngularJS output.
//!
//! The default templates ship embedded in the binary; a template directory
//! can override any of them file-by-file.

mod id;
mod manager;

pub use id::TemplateId;
pub use manager::TemplateManager;
