// src/models.rs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- `menus.toml` MODELS (What is read from the configuration file) ---
// Field names here are the external contract of the declarative format. The
// loader turns them into `MenuItem`s through the public container API.

/// Root of a `menus.toml` file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MenusConfig {
    /// Route table: action target (`"Article:show"`) to path template (`"/articles/<id>"`).
    #[serde(default)]
    pub routes: IndexMap<String, String>,
    /// Menus by name, in declaration order.
    #[serde(default)]
    pub menus: IndexMap<String, MenuConfig>,
}

/// One named menu.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MenuConfig {
    /// Template overrides for the three views.
    #[serde(default)]
    pub templates: TemplatesConfig,
    /// Top-level items, in declaration order.
    #[serde(default)]
    pub items: IndexMap<String, ItemConfig>,
}

/// Optional template overrides. Relative paths are resolved against the config file.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TemplatesConfig {
    /// Template of the menu view.
    pub menu: Option<String>,
    /// Template of the breadcrumbs view.
    pub breadcrumbs: Option<String>,
    /// Template of the sitemap view.
    pub sitemap: Option<String>,
}

/// Declaration of one menu item and, recursively, its children.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ItemConfig {
    /// Raw title. Defaults to the item's key when omitted.
    pub title: Option<String>,
    /// Symbolic destination.
    pub action: Option<ActionConfig>,
    /// Literal link, used when there is no action.
    pub link: Option<String>,
    /// Free-form data.
    #[serde(default)]
    pub data: IndexMap<String, Value>,
    /// Child items, in declaration order.
    #[serde(default)]
    pub items: IndexMap<String, ItemConfig>,
    /// Per-view visibility.
    #[serde(default)]
    pub visibility: VisibilityConfig,
    /// Inclusion patterns matched against the current route's signature.
    pub include: Option<IncludeConfig>,
}

/// `action = "Target:action"` or `action = { target = "...", parameters = { ... } }`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ActionConfig {
    /// `"Target:action"` without parameters.
    Target(String),
    /// A target with parameters.
    Detailed(DetailedAction),
}

/// The table form of an action.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DetailedAction {
    /// Route target.
    pub target: String,
    /// Route parameters.
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,
}

impl ActionConfig {
    /// The symbolic target, whichever syntax was used.
    pub fn target(&self) -> &str {
        match self {
            Self::Target(target) => target,
            Self::Detailed(detailed) => &detailed.target,
        }
    }

    /// Splits the declaration into a target and its (possibly empty) parameters.
    pub fn to_parts(&self) -> (String, IndexMap<String, Value>) {
        match self {
            Self::Target(target) => (target.clone(), IndexMap::new()),
            Self::Detailed(detailed) => (detailed.target.clone(), detailed.parameters.clone()),
        }
    }
}

/// Per-view visibility flags, each `true` unless stated otherwise.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct VisibilityConfig {
    /// Shown in the menu.
    pub menu: bool,
    /// Shown in breadcrumbs.
    pub breadcrumbs: bool,
    /// Shown in the sitemap.
    pub sitemap: bool,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            menu: true,
            breadcrumbs: true,
            sitemap: true,
        }
    }
}

/// `include = "Pattern"` or `include = ["A:.*", "B:.*"]`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum IncludeConfig {
    /// A single pattern.
    One(String),
    /// Several patterns.
    Many(Vec<String>),
}

impl IncludeConfig {
    /// The patterns, whichever syntax was used.
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::One(pattern) => std::slice::from_ref(pattern),
            Self::Many(patterns) => patterns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_defaults_when_fields_are_omitted() {
        let item: ItemConfig = toml::from_str("").unwrap();
        assert!(item.title.is_none());
        assert!(item.action.is_none());
        assert_eq!(item.visibility, VisibilityConfig::default());
        assert!(item.items.is_empty());
    }

    #[test]
    fn test_action_accepts_both_syntaxes() {
        let simple: ItemConfig = toml::from_str(r#"action = "Homepage:default""#).unwrap();
        assert_eq!(simple.action.unwrap().target(), "Homepage:default");

        let detailed: ItemConfig = toml::from_str(
            r#"action = { target = "Article:show", parameters = { id = 7 } }"#,
        )
        .unwrap();
        let (target, parameters) = detailed.action.unwrap().to_parts();
        assert_eq!(target, "Article:show");
        assert_eq!(parameters.get("id"), Some(&Value::from(7)));
    }

    #[test]
    fn test_include_accepts_string_or_list() {
        let one: ItemConfig = toml::from_str(r#"include = "Article:.*""#).unwrap();
        assert_eq!(one.include.unwrap().patterns(), ["Article:.*".to_string()]);

        let many: ItemConfig = toml::from_str(r#"include = ["A:.*", "B:.*"]"#).unwrap();
        assert_eq!(many.include.unwrap().patterns().len(), 2);
    }

    #[test]
    fn test_partial_visibility_keeps_other_flags_on() {
        let item: ItemConfig = toml::from_str("visibility = { sitemap = false }").unwrap();
        assert!(item.visibility.menu);
        assert!(item.visibility.breadcrumbs);
        assert!(!item.visibility.sitemap);
    }

    #[test]
    fn test_unknown_item_field_is_rejected() {
        let result: Result<ItemConfig, _> = toml::from_str(r#"titel = "Typo""#);
        let error_msg = result.unwrap_err().to_string();
        assert!(
            error_msg.contains("unknown field `titel`"),
            "Error message was: {}",
            error_msg
        );
    }

    #[test]
    fn test_nested_items_keep_declaration_order() {
        let toml_str = r#"
            [items.zeta]
            [items.alpha]
            [items.mid]
        "#;
        let menu: MenuConfig = toml::from_str(toml_str).unwrap();
        let names: Vec<&str> = menu.items.keys().map(String::as_str).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }
}
