//! Identifiers for the generated output templates.
//!
//! Each identifier maps to one Tera template file. The default text is
//! compiled into the library, so generation works without any template
//! directory on disk.
//!
//! # Examples
//!
//! ```
//! use ramlang_core::templates::TemplateId;
//! use std::str::FromStr;
//!
//! let id = TemplateId::from_str("method").unwrap();
//! assert_eq!(id, TemplateId::Method);
//! assert_eq!(id.file_name(), "method.js.tera");
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

/// The templates that make up the generated client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    /// Method set of one resource node
    Method,
    /// Nested sub-object wrapper inside a service body
    SubResource,
    /// One `.factory(...)` service per top-level resource
    Service,
    /// The shared `Api` provider
    Provider,
    /// The `angular.module(...)` application declaration
    App,
}

impl TemplateId {
    /// Returns the template identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::SubResource => "sub_resource",
            Self::Service => "service",
            Self::Provider => "provider",
            Self::App => "app",
        }
    }

    /// The template file name, used as the Tera template name and as the
    /// override file name inside a template directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Method => "method.js.tera",
            Self::SubResource => "sub_resource.js.tera",
            Self::Service => "service.js.tera",
            Self::Provider => "provider.js.tera",
            Self::App => "app.js.tera",
        }
    }

    /// The embedded default template text
    pub fn default_text(&self) -> &'static str {
        match self {
            Self::Method => include_str!("../../templates/method.js.tera"),
            Self::SubResource => include_str!("../../templates/sub_resource.js.tera"),
            Self::Service => include_str!("../../templates/service.js.tera"),
            Self::Provider => include_str!("../../templates/provider.js.tera"),
            Self::App => include_str!("../../templates/app.js.tera"),
        }
    }

    /// Returns an iterator over all template identifiers
    pub fn all() -> impl Iterator<Item = Self> {
        use TemplateId::*;
        [Method, SubResource, Service, Provider, App].iter().copied()
    }
}

impl FromStr for TemplateId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "method" => Ok(TemplateId::Method),
            "sub_resource" => Ok(TemplateId::SubResource),
            "service" => Ok(TemplateId::Service),
            "provider" => Ok(TemplateId::Provider),
            "app" => Ok(TemplateId::App),
            _ => Err(format!("Unknown template id: {}", s)),
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_as_str_and_display() {
        assert_eq!(TemplateId::Method.as_str(), "method");
        assert_eq!(TemplateId::SubResource.as_str(), "sub_resource");
        assert_eq!(format!("{}", TemplateId::Provider), "provider");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(TemplateId::Service.file_name(), "service.js.tera");
        assert_eq!(TemplateId::App.file_name(), "app.js.tera");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("method".parse::<TemplateId>().unwrap(), TemplateId::Method);
        assert_eq!("Service".parse::<TemplateId>().unwrap(), TemplateId::Service);
        assert!("invalid".parse::<TemplateId>().is_err());
    }

    #[test]
    fn test_all_are_distinct() {
        let all: Vec<_> = TemplateId::all().collect();
        assert_eq!(all.len(), 5);
        let unique: HashSet<_> = TemplateId::all().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_default_text_is_embedded() {
        for id in TemplateId::all() {
            assert!(!id.default_text().is_empty(), "{} has no default", id);
        }
    }
}
