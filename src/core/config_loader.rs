//! # Config Loader
//!
//! Turns a `menus.toml` file into a ready `MenuRegistry`.
//!
//! Loading happens in three stages:
//!
//! 1. **Parse:** the file is read and deserialized into `MenusConfig`. Unknown
//!    fields are rejected by the models.
//! 2. **Validate:** item keys, action targets and template paths are checked up
//!    front, so a malformed configuration fails before any menu is queried.
//! 3. **Build:** every menu is built and initialized through a `ConfigMenuLoader`.
//!    Menus are independent of each other and are built in parallel with `rayon`;
//!    the registry keeps the declaration order.

use crate::{
    constants::PATH_SEPARATOR,
    core::{
        errors::MenuError,
        loader::ConfigMenuLoader,
        menu::{Menu, MenuServices, MenuTemplates},
        paths::{self, PathError},
        registry::MenuRegistry,
    },
    models::{ItemConfig, MenuConfig, MenusConfig, TemplatesConfig},
    system::{
        links::{LinkError, RouteTable, normalize_target},
        route::split_target,
    },
};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while reading, validating or building a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Could not read configuration file '{path}': {source}")]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The TOML content is invalid or contains unknown fields.
    #[error("Failed to parse configuration '{origin}': {source}")]
    Parse {
        /// File path or other label of the content.
        origin: String,
        /// The TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// An item key is empty or contains the path separator.
    #[error("Item key '{key}' in menu '{menu}' is invalid: keys must be non-empty and must not contain '{separator}'.")]
    InvalidItemKey {
        /// The menu declaring the item.
        menu: String,
        /// The rejected key.
        key: String,
        /// The path separator.
        separator: char,
    },
    /// An action declares an empty target.
    #[error("Item '{item}' in menu '{menu}' declares an empty action target.")]
    EmptyActionTarget {
        /// The menu declaring the item.
        menu: String,
        /// Path of the item.
        item: String,
    },
    /// An action target is not of the form `Group:action`.
    #[error("Item '{item}' in menu '{menu}' has an invalid action target: {source}")]
    InvalidActionTarget {
        /// The menu declaring the item.
        menu: String,
        /// Path of the item.
        item: String,
        /// Why the target was rejected.
        #[source]
        source: LinkError,
    },
    /// A declared template file does not exist.
    #[error("The {kind} template of menu '{menu}' was not found at '{path}'.")]
    TemplateNotFound {
        /// The menu declaring the template.
        menu: String,
        /// Which view the template is for.
        kind: &'static str,
        /// The resolved template path.
        path: PathBuf,
    },
    /// Building a menu failed, e.g. on an invalid include pattern.
    #[error("Menu '{menu}' could not be built: {source}")]
    Menu {
        /// The menu that failed.
        menu: String,
        /// The underlying menu error.
        #[source]
        source: MenuError,
    },
    /// The configuration file could not be located.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// A parsed configuration together with the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The file the configuration was read from.
    pub path: PathBuf,
    /// The parsed configuration.
    pub config: MenusConfig,
}

impl LoadedConfig {
    /// Directory against which relative template paths are resolved.
    pub fn base_dir(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// Locates (see `paths::resolve_config_path`) and parses the configuration.
pub fn locate_and_load(explicit: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    let path = paths::resolve_config_path(explicit)?;
    let config = load_config(&path)?;
    Ok(LoadedConfig { path, config })
}

/// Reads and parses the configuration at `path`.
pub fn load_config(path: &Path) -> Result<MenusConfig, ConfigError> {
    log::debug!("Reading configuration from '{}'", path.display());
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, &path.display().to_string())
}

/// Parses configuration text. `origin` only appears in error messages.
pub fn parse_config(content: &str, origin: &str) -> Result<MenusConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        origin: origin.to_string(),
        source,
    })
}

/// The route table declared in `[routes]`.
pub fn route_table(config: &MenusConfig) -> RouteTable {
    RouteTable::from_routes(config.routes.clone())
}

/// Checks every menu without building anything.
pub fn validate(config: &MenusConfig, base_dir: Option<&Path>) -> Result<(), ConfigError> {
    for (name, menu_config) in &config.menus {
        resolve_templates(name, &menu_config.templates, base_dir)?;
        validate_items(name, &menu_config.items, None)?;
    }
    Ok(())
}

/// Validates the configuration and builds every menu it declares.
///
/// `services` is called once per menu name and supplies the capabilities that
/// menu resolves links, permissions and titles with.
pub fn build_registry<F>(
    config: &MenusConfig,
    base_dir: Option<&Path>,
    services: F,
) -> Result<MenuRegistry, ConfigError>
where
    F: Fn(&str) -> MenuServices + Sync,
{
    // 1. Fail fast on anything malformed.
    validate(config, base_dir)?;

    // 2. Build the menus in parallel; the indexed collect keeps declaration order.
    let declared: Vec<(&String, &MenuConfig)> = config.menus.iter().collect();
    let menus = declared
        .par_iter()
        .map(|(name, menu_config)| build_menu(name, menu_config, base_dir, &services))
        .collect::<Result<Vec<Menu>, ConfigError>>()?;

    log::debug!("Built {} menus.", menus.len());
    Ok(menus.into_iter().collect())
}

fn build_menu<F>(
    name: &str,
    menu_config: &MenuConfig,
    base_dir: Option<&Path>,
    services: &F,
) -> Result<Menu, ConfigError>
where
    F: Fn(&str) -> MenuServices,
{
    log::trace!("Building menu '{}'", name);
    let templates = resolve_templates(name, &menu_config.templates, base_dir)?;
    let loader = ConfigMenuLoader::new(menu_config.items.clone());

    Menu::builder(name)
        .templates(templates)
        .services(services(name))
        .loader(std::sync::Arc::new(loader))
        .build()
        .map_err(|source| ConfigError::Menu {
            menu: name.to_string(),
            source,
        })
}

/// Template overrides must point at existing files. Omitted templates fall back
/// to the built-in references.
pub fn resolve_templates(
    menu: &str,
    declared: &TemplatesConfig,
    base_dir: Option<&Path>,
) -> Result<MenuTemplates, ConfigError> {
    let mut templates = MenuTemplates::default();

    let slots = [
        ("menu", &declared.menu, &mut templates.menu),
        ("breadcrumbs", &declared.breadcrumbs, &mut templates.breadcrumbs),
        ("sitemap", &declared.sitemap, &mut templates.sitemap),
    ];

    for (kind, declared_path, slot) in slots {
        let Some(raw) = declared_path else {
            continue;
        };
        let path = paths::resolve_relative_to(base_dir, raw)?;
        if !path.is_file() {
            return Err(ConfigError::TemplateNotFound {
                menu: menu.to_string(),
                kind,
                path,
            });
        }
        *slot = path.display().to_string();
    }

    Ok(templates)
}

fn validate_items(
    menu: &str,
    items: &IndexMap<String, ItemConfig>,
    parent_path: Option<&str>,
) -> Result<(), ConfigError> {
    for (key, item) in items {
        if key.is_empty() || key.contains(PATH_SEPARATOR) {
            return Err(ConfigError::InvalidItemKey {
                menu: menu.to_string(),
                key: key.clone(),
                separator: PATH_SEPARATOR,
            });
        }

        let path = match parent_path {
            Some(parent) => format!("{}{}{}", parent, PATH_SEPARATOR, key),
            None => key.clone(),
        };

        if let Some(action) = &item.action {
            let target = normalize_target(action.target());
            if target.is_empty() {
                return Err(ConfigError::EmptyActionTarget {
                    menu: menu.to_string(),
                    item: path,
                });
            }
            split_target(target).map_err(|source| ConfigError::InvalidActionTarget {
                menu: menu.to_string(),
                item: path.clone(),
                source,
            })?;
        }

        validate_items(menu, &item.items, Some(&path))?;
    }
    Ok(())
}

/// Action targets used by `menu` that the route table cannot resolve, as
/// `(item path, target)` pairs in declaration order.
pub fn unrouted_targets(menu_config: &MenuConfig, table: &RouteTable) -> Vec<(String, String)> {
    let mut missing = Vec::new();
    collect_unrouted(&menu_config.items, None, table, &mut missing);
    missing
}

fn collect_unrouted(
    items: &IndexMap<String, ItemConfig>,
    parent_path: Option<&str>,
    table: &RouteTable,
    missing: &mut Vec<(String, String)>,
) {
    for (key, item) in items {
        let path = match parent_path {
            Some(parent) => format!("{}{}{}", parent, PATH_SEPARATOR, key),
            None => key.clone(),
        };
        if let Some(action) = &item.action {
            if !table.contains(action.target()) {
                missing.push((path.clone(), action.target().to_string()));
            }
        }
        collect_unrouted(&item.items, Some(&path), table, missing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::route::Route;
    use std::sync::Arc;
    use tempfile::tempdir;

    const SITE: &str = r#"
        [routes]
        "Homepage:default" = "/"
        "Article:show" = "/articles/<id>"

        [menus.main.items.home]
        title = "Home"
        action = "Homepage:default"

        [menus.main.items.blog]
        title = "Blog"
        include = ["^Article:"]

        [menus.main.items.blog.items.first]
        action = { target = "Article:show", parameters = { id = 1 } }

        [menus.footer.items.contact]
        link = "mailto:hello@example.com"
    "#;

    fn services_for(config: &MenusConfig) -> impl Fn(&str) -> MenuServices + Sync {
        let table = Arc::new(route_table(config));
        move |_| MenuServices::new(table.clone())
    }

    #[test]
    fn test_build_registry_in_declaration_order() {
        let config = parse_config(SITE, "site").unwrap();
        let registry = build_registry(&config, None, services_for(&config)).unwrap();

        assert_eq!(registry.names().collect::<Vec<_>>(), ["main", "footer"]);
        let main = registry.get_menu("main").unwrap();
        assert!(main.is_initialized());
        assert_eq!(main.menu_template(), crate::constants::DEFAULT_MENU_TEMPLATE);

        let mut params = IndexMap::new();
        params.insert("id".to_string(), serde_json::json!(1));
        let route = Route::from_target("Article:show", &params, &route_table(&config)).unwrap();
        let ctx = main.context().with_route(&route);
        let path: Vec<String> = main
            .get_path(&ctx)
            .unwrap()
            .iter()
            .map(|item| item.name().to_string())
            .collect();
        assert_eq!(path, ["blog", "first"]);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let result = parse_config("[menus.main.items.home]\ntitel = \"Home\"\n", "inline");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validation_rejects_malformed_items() {
        let empty_target = parse_config("[menus.main.items.home]\naction = \"\"\n", "inline").unwrap();
        assert!(matches!(
            validate(&empty_target, None),
            Err(ConfigError::EmptyActionTarget { .. })
        ));

        let bad_target = parse_config(
            "[menus.main.items.home.items.deep]\naction = \"nocolon\"\n",
            "inline",
        )
        .unwrap();
        match validate(&bad_target, None) {
            Err(ConfigError::InvalidActionTarget { item, .. }) => assert_eq!(item, "home-deep"),
            other => panic!("expected InvalidActionTarget, got {:?}", other),
        }

        let bad_key = parse_config("[menus.main.items.\"a-b\"]\n", "inline").unwrap();
        assert!(matches!(
            validate(&bad_key, None),
            Err(ConfigError::InvalidItemKey { .. })
        ));
    }

    #[test]
    fn test_invalid_include_fails_the_build() {
        let config = parse_config("[menus.main.items.home]\ninclude = \"(\"\n", "inline").unwrap();
        match build_registry(&config, None, |_| MenuServices::default()) {
            Err(ConfigError::Menu { menu, source }) => {
                assert_eq!(menu, "main");
                assert!(matches!(source, MenuError::InvalidPattern { .. }));
            }
            other => panic!("expected a Menu error, got {:?}", other.map(|r| r.len())),
        }
    }

    #[test]
    fn test_templates_resolve_against_config_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/menu.html"), "<ul></ul>").unwrap();

        let config = parse_config(
            "[menus.main.templates]\nmenu = \"templates/menu.html\"\n",
            "inline",
        )
        .unwrap();
        let registry = build_registry(&config, Some(dir.path()), |_| MenuServices::default()).unwrap();
        let main = registry.get_menu("main").unwrap();
        assert!(main.menu_template().ends_with("menu.html"));
        assert_eq!(main.sitemap_template(), crate::constants::DEFAULT_SITEMAP_TEMPLATE);

        let missing = parse_config(
            "[menus.main.templates]\nbreadcrumbs = \"templates/missing.html\"\n",
            "inline",
        )
        .unwrap();
        assert!(matches!(
            validate(&missing, Some(dir.path())),
            Err(ConfigError::TemplateNotFound { kind: "breadcrumbs", .. })
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("menus.toml");
        fs::write(&path, SITE).unwrap();

        let loaded = locate_and_load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.config.menus.len(), 2);
        assert_eq!(loaded.base_dir(), Some(dunce::canonicalize(dir.path()).unwrap().as_path()));

        let table = route_table(&loaded.config);
        assert!(unrouted_targets(&loaded.config.menus["main"], &table).is_empty());
    }

    #[test]
    fn test_unrouted_targets_are_reported_with_paths() {
        let config = parse_config(
            "[menus.main.items.home]\naction = \"Homepage:default\"\n[menus.main.items.home.items.old]\naction = \"Legacy:index\"\n",
            "inline",
        )
        .unwrap();
        let table = RouteTable::new();
        assert_eq!(
            unrouted_targets(&config.menus["main"], &table),
            [
                ("home".to_string(), "Homepage:default".to_string()),
                ("home-old".to_string(), "Legacy:index".to_string()),
            ]
        );
    }
}
