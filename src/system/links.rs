// src/system/links.rs

use crate::constants::PLACEHOLDER_LINK;
use crate::core::item::MenuItem;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use url::Url;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"<([A-Za-z_][A-Za-z0-9_]*)>").expect("placeholder pattern is valid");
}

/// Errors raised while turning an item or a target into a URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The route table has no template for this target.
    #[error("No route is registered for target '{target}'.")]
    UnknownTarget {
        /// The normalized target.
        target: String,
    },
    /// A template placeholder has no matching parameter.
    #[error("Route '{target}' requires parameter '{parameter}', which was not provided.")]
    MissingParameter {
        /// The normalized target.
        target: String,
        /// The unfilled placeholder.
        parameter: String,
    },
    /// The target is empty or not of the form `Group:action`.
    #[error("'{target}' is not a valid action target. Expected 'Group:action'.")]
    InvalidTarget {
        /// The target as given.
        target: String,
    },
    /// The request URL could not be parsed or has no host.
    #[error("Invalid request URL '{url}': {reason}")]
    InvalidRequestUrl {
        /// The URL as given.
        url: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// Produces the destination URL of a menu item.
///
/// Implementations must return `"#"` for items that have neither an action nor a
/// literal link, and must not cache results across requests.
pub trait LinkResolver: Send + Sync {
    /// The link of `item`.
    fn resolve(&self, item: &MenuItem) -> Result<String, LinkError>;
}

/// A static route table mapping symbolic targets to path templates.
///
/// Templates may contain `<name>` placeholders, filled from the action parameters.
/// Parameters that do not appear in the template are appended as a query string,
/// sorted by name so the same parameters always produce the same link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: IndexMap<String, String>,
}

impl RouteTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// A table from target to template pairs.
    pub fn from_routes(routes: IndexMap<String, String>) -> Self {
        let mut table = Self::new();
        for (target, template) in routes {
            table.add_route(&target, template);
        }
        table
    }

    /// Registers (or replaces) the template for a target.
    pub fn add_route(&mut self, target: &str, template: impl Into<String>) {
        self.routes
            .insert(normalize_target(target).to_string(), template.into());
    }

    /// Whether a template is registered for `target`.
    pub fn contains(&self, target: &str) -> bool {
        self.routes.contains_key(normalize_target(target))
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Builds the link for `target` with the given parameters.
    pub fn link(&self, target: &str, parameters: &IndexMap<String, Value>) -> Result<String, LinkError> {
        let key = normalize_target(target);
        if key.is_empty() {
            return Err(LinkError::InvalidTarget {
                target: target.to_string(),
            });
        }

        let template = self.routes.get(key).ok_or_else(|| LinkError::UnknownTarget {
            target: key.to_string(),
        })?;

        // 1. Fill the placeholders of the path template.
        let placeholders: HashSet<&str> = PLACEHOLDER_RE
            .captures_iter(template)
            .filter_map(|captures| captures.get(1))
            .map(|name| name.as_str())
            .collect();
        if let Some(missing) = placeholders.iter().find(|name| !parameters.contains_key(**name)) {
            return Err(LinkError::MissingParameter {
                target: key.to_string(),
                parameter: missing.to_string(),
            });
        }
        let path = PLACEHOLDER_RE
            .replace_all(template, |captures: &regex::Captures<'_>| {
                captures
                    .get(1)
                    .and_then(|name| parameters.get(name.as_str()))
                    .map(parameter_to_string)
                    .unwrap_or_default()
            })
            .into_owned();

        // 2. Everything not consumed by the template goes to the query string.
        let mut leftovers: Vec<(&str, String)> = parameters
            .iter()
            .filter(|(name, _)| !placeholders.contains(name.as_str()))
            .map(|(name, value)| (name.as_str(), parameter_to_string(value)))
            .collect();
        leftovers.sort_by(|a, b| a.0.cmp(b.0));

        if leftovers.is_empty() {
            return Ok(path);
        }

        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(leftovers)
            .finish();
        let joiner = if path.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", path, joiner, query))
    }
}

impl LinkResolver for RouteTable {
    fn resolve(&self, item: &MenuItem) -> Result<String, LinkError> {
        if let Some(action) = item.action() {
            return self.link(&action.target, &action.parameters);
        }
        if let Some(link) = item.link() {
            return Ok(link.to_string());
        }
        Ok(PLACEHOLDER_LINK.to_string())
    }
}

/// Targets may be written absolutely (`":Admin:Users:edit"`); the leading colon is
/// not part of the identity.
pub(crate) fn normalize_target(target: &str) -> &str {
    target.trim().trim_start_matches(':')
}

fn parameter_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Scheme, host and port of the request being served, used for absolute links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl RequestUrl {
    /// A request origin from its parts.
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Parses a full URL such as `https://example.com:8443/some/page`.
    pub fn parse(input: &str) -> Result<Self, LinkError> {
        let invalid = |reason: String| LinkError::InvalidRequestUrl {
            url: input.to_string(),
            reason,
        };

        let url = Url::parse(input).map_err(|e| invalid(e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| invalid("the URL has no host".to_string()))?;

        // `Url::port` already hides the scheme's default port.
        Ok(Self::new(url.scheme(), host, url.port()))
    }

    /// URL scheme, e.g. `"https"`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Host name.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Explicit non-default port, if any.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// `scheme://host[:port]`, omitting the port when it is the scheme's default.
    pub fn origin(&self) -> String {
        match self.port {
            Some(port) if Some(port) != default_port(&self.scheme) => {
                format!("{}://{}:{}", self.scheme, self.host, port)
            }
            _ => format!("{}://{}", self.scheme, self.host),
        }
    }
}

impl fmt::Display for RequestUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin())
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::container::MenuItems;

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table.add_route("Homepage:default", "/");
        table.add_route("Article:show", "/articles/<id>");
        table.add_route(":Admin:Users:edit", "/admin/users/<id>/edit");
        table
    }

    fn params(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_link_fills_placeholders() {
        let link = table()
            .link("Article:show", &params(&[("id", Value::from(42))]))
            .unwrap();
        assert_eq!(link, "/articles/42");
    }

    #[test]
    fn test_link_appends_leftover_parameters_as_query() {
        let link = table()
            .link(
                "Article:show",
                &params(&[
                    ("id", Value::from("intro")),
                    ("page", Value::from(2)),
                    ("q", Value::from("a b")),
                ]),
            )
            .unwrap();
        assert_eq!(link, "/articles/intro?page=2&q=a+b");
    }

    #[test]
    fn test_link_query_does_not_depend_on_parameter_order() {
        let mut table = table();
        table.add_route("List:default", "/list");
        let forward = table
            .link("List:default", &params(&[("a", Value::from(1)), ("b", Value::from(2))]))
            .unwrap();
        let backward = table
            .link("List:default", &params(&[("b", Value::from(2)), ("a", Value::from(1))]))
            .unwrap();
        assert_eq!(forward, "/list?a=1&b=2");
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_link_ignores_leading_colon_of_absolute_targets() {
        let link = table()
            .link("Admin:Users:edit", &params(&[("id", Value::from(1))]))
            .unwrap();
        assert_eq!(link, "/admin/users/1/edit");
        assert!(table().contains(":Homepage:default"));
    }

    #[test]
    fn test_link_errors() {
        assert_eq!(
            table().link("Nope:default", &IndexMap::new()),
            Err(LinkError::UnknownTarget {
                target: "Nope:default".to_string()
            })
        );
        assert_eq!(
            table().link("Article:show", &IndexMap::new()),
            Err(LinkError::MissingParameter {
                target: "Article:show".to_string(),
                parameter: "id".to_string()
            })
        );
        assert!(matches!(
            table().link("  ", &IndexMap::new()),
            Err(LinkError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_resolve_prefers_action_then_link_then_placeholder() {
        let mut items = MenuItems::new();
        let both = items.add_item("both", "Both");
        both.set_action("Homepage:default", IndexMap::new());
        both.set_link("https://elsewhere.test/");
        items.add_item("literal", "Literal").set_link("https://example.com/x");
        items.add_item("bare", "Bare");

        let table = table();
        let resolve = |name: &str| table.resolve(items.get_item(name).unwrap()).unwrap();
        assert_eq!(resolve("both"), "/");
        assert_eq!(resolve("literal"), "https://example.com/x");
        assert_eq!(resolve("bare"), PLACEHOLDER_LINK);
    }

    #[test]
    fn test_request_url_origin_hides_default_ports() {
        assert_eq!(
            RequestUrl::parse("http://example.com/page").unwrap().origin(),
            "http://example.com"
        );
        assert_eq!(
            RequestUrl::parse("https://example.com:443/").unwrap().origin(),
            "https://example.com"
        );
        assert_eq!(
            RequestUrl::parse("https://example.com:8443/").unwrap().origin(),
            "https://example.com:8443"
        );
        assert_eq!(
            RequestUrl::new("http", "localhost", Some(80)).origin(),
            "http://localhost"
        );
        assert_eq!(
            RequestUrl::new("http", "localhost", Some(8080)).origin(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_request_url_without_host_is_rejected() {
        assert!(matches!(
            RequestUrl::parse("mailto:someone@example.com"),
            Err(LinkError::InvalidRequestUrl { .. })
        ));
        assert!(RequestUrl::parse("not a url").is_err());
    }
}
