//! Method-set construction for one resource node.
//!
//! A resource node is classified as a collection or an entity, its declared
//! HTTP operations are turned into [`MethodDescriptor`]s with resolved
//! parameter lists, and the set is rendered through the method template as
//! an indented fragment ready for splicing into a service body.

// Internal imports (std, crate)
use crate::compose::INDENT_UNIT;
use crate::docs::format_description;
use crate::error::Result;
use crate::raml::ResourceNode;
use crate::resolver::{self, Verb};
use crate::templates::{TemplateId, TemplateManager};
use crate::utils::{clean_display_name, indent_text, to_camel_case};

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Matches a relative URI that is a single placeholder segment, e.g. `/{id}`
static PURE_PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/\{\w+\}$").expect("valid placeholder uri regex"));

/// How a resource node behaves in the generated client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Addresses a set of entities; its `get` becomes `query`
    Collection,
    /// Addresses a single entity through an identifier
    Entity,
}

/// One generated method, ready for template rendering
#[derive(Debug, Clone, Serialize)]
pub struct MethodDescriptor {
    /// Name of the method on the generated factory object
    pub factory_name: String,
    /// Transport method invoked on the `Api` provider
    pub api_verb: String,
    /// Caller-facing parameter names
    pub call_parameters: Vec<String>,
    /// Arguments forwarded to the transport call, URI expression first
    pub api_call_arguments: Vec<String>,
    /// Rendered JSDoc block, absent when the operation has no description
    pub documentation: Option<String>,
    /// `,` between methods, empty after the last one
    pub separator: String,
}

/// Classify a resource node as a collection or an entity.
///
/// A node is an entity when it declares a required `id` URI parameter or its
/// own relative URI is a single placeholder segment; everything else is a
/// collection. The check is re-derived at every node, never inherited.
pub fn classify(node: &ResourceNode) -> ResourceKind {
    let has_id_param = node
        .uri_parameters
        .iter()
        .any(|(name, decl)| name.eq_ignore_ascii_case("id") && decl.is_required());

    if has_id_param || PURE_PLACEHOLDER_RE.is_match(&node.relative_uri) {
        ResourceKind::Entity
    } else {
        ResourceKind::Collection
    }
}

/// Build the method descriptors for one resource node.
///
/// `uri` is the accumulated URI from the tree root down to this node, which
/// is what the parameter resolver works against; the node itself only
/// carries its own segment.
pub fn build(
    node: &ResourceNode,
    uri: &str,
    media_type_extension: Option<&str>,
) -> Vec<MethodDescriptor> {
    let kind = classify(node);
    let count = node.methods.len();

    node.methods
        .iter()
        .enumerate()
        .map(|(index, decl)| {
            let mut verb = Verb::parse(&decl.method);
            if kind == ResourceKind::Collection && verb == Verb::Get {
                verb = Verb::Query;
            }

            let resolved =
                resolver::resolve(&node.uri_parameters, uri, &verb, media_type_extension);

            let factory_name = decl
                .display_name
                .as_deref()
                .and_then(clean_display_name)
                .unwrap_or_else(|| to_camel_case(verb.as_str(), false));

            let documentation = decl
                .description
                .as_deref()
                .map(|text| format_description(text, true))
                .filter(|text| !text.is_empty());

            MethodDescriptor {
                factory_name,
                api_verb: verb.api_verb().to_string(),
                call_parameters: resolved.call_parameters,
                api_call_arguments: resolved.api_call_arguments,
                documentation,
                separator: if index + 1 < count { ",".to_string() } else { String::new() },
            }
        })
        .collect()
}

/// Render the method set of one node as an indented fragment.
///
/// Returns an empty string when the node declares no operations, so callers
/// can skip splicing without a special case.
pub fn render(
    templates: &TemplateManager,
    node: &ResourceNode,
    uri: &str,
    media_type_extension: Option<&str>,
) -> Result<String> {
    let descriptors = build(node, uri, media_type_extension);
    if descriptors.is_empty() {
        return Ok(String::new());
    }

    let mut context = tera::Context::new();
    context.insert("methods", &descriptors);

    let rendered = templates.render(TemplateId::Method, &context)?;
    Ok(indent_text(INDENT_UNIT, rendered.trim_matches('\n')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(value: serde_json::Value) -> ResourceNode {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_classify_collection() {
        let n = node(json!({"relativeUri": "/posts"}));
        assert_eq!(classify(&n), ResourceKind::Collection);
    }

    #[test]
    fn test_classify_entity_by_id_param() {
        let n = node(json!({
            "relativeUri": "/posts",
            "uriParameters": {"Id": {"required": true}}
        }));
        assert_eq!(classify(&n), ResourceKind::Entity);
    }

    #[test]
    fn test_classify_entity_by_placeholder_uri() {
        let n = node(json!({"relativeUri": "/{postId}"}));
        assert_eq!(classify(&n), ResourceKind::Entity);
    }

    #[test]
    fn test_classify_optional_id_param_stays_collection() {
        let n = node(json!({
            "relativeUri": "/posts",
            "uriParameters": {"id": {"required": false}}
        }));
        assert_eq!(classify(&n), ResourceKind::Collection);
    }

    #[test]
    fn test_build_renames_collection_get_to_query() {
        let n = node(json!({
            "relativeUri": "/posts",
            "methods": [{"method": "get"}, {"method": "post"}]
        }));

        let descriptors = build(&n, "/posts", None);
        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].factory_name, "query");
        assert_eq!(descriptors[0].api_verb, "get");
        assert_eq!(descriptors[0].call_parameters, vec!["query"]);
        assert_eq!(descriptors[0].separator, ",");
        assert_eq!(descriptors[1].factory_name, "post");
        assert_eq!(descriptors[1].separator, "");
    }

    #[test]
    fn test_build_entity_get_keeps_its_name() {
        let n = node(json!({
            "relativeUri": "/{id}",
            "uriParameters": {"id": {"required": true}},
            "methods": [{"method": "get"}]
        }));

        let descriptors = build(&n, "/posts/{id}", None);
        assert_eq!(descriptors[0].factory_name, "get");
        assert_eq!(descriptors[0].api_call_arguments, vec!["'/posts'", "id"]);
    }

    #[test]
    fn test_build_prefers_display_name() {
        let n = node(json!({
            "relativeUri": "/posts",
            "methods": [{"method": "get", "displayName": "list all"}]
        }));

        let descriptors = build(&n, "/posts", None);
        assert_eq!(descriptors[0].factory_name, "listAll");
    }

    #[test]
    fn test_build_formats_documentation() {
        let n = node(json!({
            "relativeUri": "/posts",
            "methods": [{"method": "post", "description": "Creates a post."}]
        }));

        let descriptors = build(&n, "/posts", None);
        assert_eq!(
            descriptors[0].documentation.as_deref(),
            Some("/**\n * Creates a post.\n */")
        );
    }

    #[test]
    fn test_render_empty_method_set() {
        let templates = TemplateManager::new().unwrap();
        let n = node(json!({"relativeUri": "/posts"}));
        assert_eq!(render(&templates, &n, "/posts", None).unwrap(), "");
    }

    #[test]
    fn test_render_method_set() {
        let templates = TemplateManager::new().unwrap();
        let n = node(json!({
            "relativeUri": "/posts",
            "methods": [{"method": "get"}, {"method": "post"}]
        }));

        let rendered = render(&templates, &n, "/posts", None).unwrap();
        let expected = "  query: function(query) {\n    return Api.get('/posts', null, query);\n  },\n  post: function(entity) {\n    return Api.post('/posts', entity);\n  }";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_includes_documentation() {
        let templates = TemplateManager::new().unwrap();
        let n = node(json!({
            "relativeUri": "/posts",
            "methods": [{"method": "post", "description": "Creates a post."}]
        }));

        let rendered = render(&templates, &n, "/posts", None).unwrap();
        let expected = "  /**\n   * Creates a post.\n   */\n  post: function(entity) {\n    return Api.post('/posts', entity);\n  }";
        assert_eq!(rendered, expected);
    }
}
