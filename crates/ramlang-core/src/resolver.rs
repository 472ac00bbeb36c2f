//! Parameter resolution for generated service methods.
//!
//! Given one resource URI and its declared URI parameters, this module works
//! out the caller-facing parameter list of the generated method and the
//! argument list forwarded to the underlying `Api` transport call, including
//! the interpolated URI expression that is always the first transport
//! argument.

// Internal imports (std, crate)
use crate::raml::UriParamDecl;
use crate::utils::{clean_display_name, singularize};

// External imports (alphabetized)
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// Matches a segment that starts with the canonical `{id}` placeholder
static ID_SEGMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\{id\}").expect("valid id segment regex"));

/// Semantic verb of a generated method.
///
/// `Query` is not an HTTP verb: it is the by-collection rename of `get`,
/// with its own parameter set. Verbs outside the CRUD set pass through as
/// `Other` and contribute no extra parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verb {
    Query,
    Get,
    Post,
    Put,
    Delete,
    Other(String),
}

impl Verb {
    /// Parse an HTTP verb as declared in a RAML method. Never fails;
    /// unknown verbs are carried through verbatim.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "query" => Verb::Query,
            "get" => Verb::Get,
            "post" => Verb::Post,
            "put" => Verb::Put,
            "delete" => Verb::Delete,
            other => Verb::Other(other.to_string()),
        }
    }

    /// The name of the generated method, before any display-name override
    pub fn as_str(&self) -> &str {
        match self {
            Verb::Query => "query",
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
            Verb::Other(s) => s,
        }
    }

    /// The transport method invoked on the `Api` provider. A `query` is a
    /// plain `get` on the wire.
    pub fn api_verb(&self) -> &str {
        match self {
            Verb::Query => "get",
            other => other.as_str(),
        }
    }
}

/// Resolved parameter lists for one generated method
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedParameters {
    /// Caller-facing parameter names, in declaration order
    pub call_parameters: Vec<String>,
    /// Arguments forwarded to the transport call; the first entry is the
    /// interpolated URI expression
    pub api_call_arguments: Vec<String>,
}

/// Resolve the parameter lists and URI expression for one method.
///
/// The first URI segment (the mount point) and a trailing `{id}` segment are
/// never call parameters: the trailing identifier is supplied by the verb's
/// own `id` or `entity.id` argument. Mid-path `{id}` segments synthesize a
/// parameter named after the singularized previous segment (`users` ->
/// `userId`), and required declared parameters either substitute their
/// literal value into the URI or become trailing call parameters.
pub fn resolve(
    uri_parameters: &IndexMap<String, UriParamDecl>,
    relative_uri: &str,
    verb: &Verb,
    media_type_extension: Option<&str>,
) -> ResolvedParameters {
    let mut call_parameters: Vec<String> = Vec::new();
    let mut uri_segments: Vec<String> = Vec::new();

    // Required parameters that have no literal value cannot be baked into
    // the URI; they surface as trailing call parameters instead. The
    // canonical `id` is excluded because the verb arguments carry it.
    let manually_resolve: Vec<&String> = uri_parameters
        .iter()
        .filter(|(name, decl)| {
            decl.is_required()
                && !name.eq_ignore_ascii_case("id")
                && parameter_value(name, decl, media_type_extension).is_none()
        })
        .map(|(name, _)| name)
        .collect();

    let segments: Vec<&str> = relative_uri.split('/').skip(1).collect();
    let last_index = segments.len().saturating_sub(1);

    for (index, raw) in segments.iter().enumerate() {
        let mut segment = (*raw).to_string();

        for (name, decl) in uri_parameters {
            if !decl.is_required() {
                continue;
            }
            if let Some(value) = parameter_value(name, decl, media_type_extension) {
                // NoExpand keeps `$` in declared values literal
                segment = placeholder_regex(name)
                    .replace_all(&segment, NoExpand(value.as_str()))
                    .into_owned();
            }
        }

        if ID_SEGMENT_RE.is_match(&segment) {
            if index == last_index {
                // The trailing {id} is addressed by the verb arguments.
                continue;
            }
            let previous = index
                .checked_sub(1)
                .map(|i| segments[i])
                .unwrap_or_default();
            let arg = arg_name(&call_parameters, previous, "Id");
            segment = format!("' + {} + '", arg);
            call_parameters.push(arg);
        }

        uri_segments.push(segment);
    }

    let mut uri_expression = format!("'/{}'", uri_segments.join("/"));

    for name in manually_resolve {
        let arg = arg_name(&call_parameters, name, "");
        let interpolation = format!("' + {} + '", arg);
        uri_expression = placeholder_regex(name)
            .replace_all(&uri_expression, NoExpand(interpolation.as_str()))
            .into_owned();
        call_parameters.push(arg);
    }

    let mut api_call_arguments = vec![uri_expression];

    // Verb parameters are appended in a fixed order; it is part of the
    // generated call contract and must not change.
    match verb {
        Verb::Query => {
            call_parameters.push("query".to_string());
            api_call_arguments.push("null".to_string());
            api_call_arguments.push("query".to_string());
        }
        Verb::Get | Verb::Delete => {
            call_parameters.push("id".to_string());
            api_call_arguments.push("id".to_string());
        }
        Verb::Post => {
            call_parameters.push("entity".to_string());
            api_call_arguments.push("entity".to_string());
        }
        Verb::Put => {
            call_parameters.push("entity".to_string());
            api_call_arguments.push("entity.id".to_string());
            api_call_arguments.push("entity".to_string());
        }
        Verb::Other(_) => {}
    }

    ResolvedParameters {
        call_parameters,
        api_call_arguments,
    }
}

/// The literal value a required parameter resolves to, if any
fn parameter_value(
    name: &str,
    decl: &UriParamDecl,
    media_type_extension: Option<&str>,
) -> Option<String> {
    if name.eq_ignore_ascii_case("mediaTypeExtension") {
        return media_type_extension
            .filter(|ext| !ext.is_empty())
            .map(String::from);
    }
    decl.value_as_string()
}

/// Case-insensitive regex matching the `{name}` placeholder
fn placeholder_regex(name: &str) -> Regex {
    Regex::new(&format!(r"(?i)\{{{}\}}", regex::escape(name))).expect("valid placeholder regex")
}

/// Pick a collision-free argument name for a path segment or parameter.
///
/// The candidate is the singularized, camel-cased segment plus `suffix`;
/// collisions are resolved with an increasing numeric suffix (`userId`,
/// `userId1`, `userId2`, ...). Bounded by the number of names in use.
fn arg_name(used: &[String], segment: &str, suffix: &str) -> String {
    let stem = clean_display_name(segment)
        .map(|name| singularize(&name))
        .unwrap_or_default();

    let mut candidate = format!("{}{}", stem, suffix);
    let mut count = 0usize;
    while used.contains(&candidate) {
        count += 1;
        candidate = format!("{}{}{}", stem, suffix, count);
    }

    candidate
}
