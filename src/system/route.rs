// src/system/route.rs

use crate::system::links::{LinkError, RouteTable, normalize_target};
use indexmap::IndexMap;
use serde_json::Value;

/// The route of the request being served.
///
/// Active-state resolution compares `self_link` with each item's link, and falls
/// back to matching inclusion patterns against `signature`.
pub trait CurrentRoute {
    /// Handler group, e.g. `"Admin:Users"`.
    fn group(&self) -> &str;

    /// Action inside the group, e.g. `"edit"`.
    fn action(&self) -> &str;

    /// The link navigation would produce if it stayed on the current route.
    fn self_link(&self) -> Result<String, LinkError>;

    /// `"<group>:<action>"`, the string inclusion patterns are matched against.
    fn signature(&self) -> String {
        format!("{}:{}", self.group(), self.action())
    }
}

/// A plain, already resolved route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    group: String,
    action: String,
    link: String,
}

impl Route {
    /// A route from already known parts.
    pub fn new(group: impl Into<String>, action: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            action: action.into(),
            link: link.into(),
        }
    }

    /// Builds the route for `target`, resolving its own link through `table`.
    pub fn from_target(
        target: &str,
        parameters: &IndexMap<String, Value>,
        table: &RouteTable,
    ) -> Result<Self, LinkError> {
        let (group, action) = split_target(target)?;
        let link = table.link(target, parameters)?;
        Ok(Self::new(group, action, link))
    }

    /// The route's own link.
    pub fn link(&self) -> &str {
        &self.link
    }
}

impl CurrentRoute for Route {
    fn group(&self) -> &str {
        &self.group
    }

    fn action(&self) -> &str {
        &self.action
    }

    fn self_link(&self) -> Result<String, LinkError> {
        Ok(self.link.clone())
    }
}

/// Splits `"Admin:Users:edit"` into `("Admin:Users", "edit")`.
pub fn split_target(target: &str) -> Result<(&str, &str), LinkError> {
    let normalized = normalize_target(target);
    match normalized.rsplit_once(':') {
        Some((group, action)) if !group.is_empty() && !action.is_empty() => Ok((group, action)),
        _ => Err(LinkError::InvalidTarget {
            target: target.to_string(),
        }),
    }
}
