// src/cli/handlers/commons.rs

use crate::{
    core::{
        config_loader::{self, LoadedConfig},
        container::{MenuItems, Visibility},
        graph_display::{self, DisplayOptions},
        menu::MenuServices,
        paths,
        registry::MenuRegistry,
        render,
    },
    system::{
        links::{RequestUrl, RouteTable},
        localization::CatalogTranslator,
        route::{CurrentRoute, Route},
        security::RoleAuthorizer,
    },
};
use anyhow::{Result, anyhow};
use clap::Args;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;

/// Where the configuration comes from and which capabilities to build menus with.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Path to the menus file. Defaults to $MENUTREE_CONFIG, ./menus.toml, then the user config dir.
    #[arg(long, short)]
    pub config: Option<String>,

    /// Roles of the current user. Items whose `roles` data names none of them are hidden.
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub roles: Vec<String>,

    /// A TOML message catalog used to translate item titles.
    #[arg(long)]
    pub catalog: Option<String>,
}

/// The request being simulated.
#[derive(Args, Debug, Default, Clone)]
pub struct RequestArgs {
    /// The current route as an action target (e.g., "Article:show").
    #[arg(long, short)]
    pub route: Option<String>,

    /// Route parameters (e.g., "id=7"). Repeatable.
    #[arg(long = "param", short = 'p', value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// The request URL, used for absolute links (e.g., "https://example.com").
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Output flags shared by the view commands.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputArgs {
    /// Print the view as JSON instead of a tree.
    #[arg(long)]
    pub json: bool,

    /// Hide the links next to each title.
    #[arg(long)]
    pub no_links: bool,

    /// Show each item's path (usable with `get_item`).
    #[arg(long, short)]
    pub names: bool,

    /// Limit the depth of the tree display.
    #[arg(long, short)]
    pub depth: Option<usize>,
}

impl OutputArgs {
    /// Display options for the tree printer.
    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            show_links: !self.no_links,
            show_names: self.names,
            max_depth: self.depth,
            color: colored::control::SHOULD_COLORIZE.should_colorize(),
        }
    }
}

/// A loaded configuration and the registry built from it.
#[derive(Debug)]
pub struct Site {
    /// The parsed configuration and its location.
    pub loaded: LoadedConfig,
    /// The shared route table.
    pub routes: Arc<RouteTable>,
    /// Every configured menu, built.
    pub registry: MenuRegistry,
}

/// Locates, validates and builds the configuration.
pub fn load_site(source: &SourceArgs) -> Result<Site> {
    // 1. Locate and parse.
    let loaded = config_loader::locate_and_load(source.config.as_deref())?;
    log::debug!("Using configuration at '{}'", loaded.path.display());

    // 2. Capabilities shared by every menu.
    let routes = Arc::new(config_loader::route_table(&loaded.config));
    let mut services = MenuServices::new(routes.clone());
    if !source.roles.is_empty() {
        services = services.with_authorizer(Arc::new(RoleAuthorizer::new(source.roles.iter().cloned())));
    }
    if let Some(raw) = &source.catalog {
        let catalog = CatalogTranslator::from_file(&paths::expand_path(raw)?)?;
        log::debug!("Loaded {} catalog messages from '{}'", catalog.len(), raw);
        services = services.with_translator(Arc::new(catalog));
    }

    // 3. Build.
    let registry = config_loader::build_registry(&loaded.config, loaded.base_dir(), |_| services.clone())?;

    Ok(Site {
        loaded,
        routes,
        registry,
    })
}

/// Parses a slice of "KEY=VALUE" strings. Numbers and booleans keep their type.
pub fn parse_key_value_pairs(pairs: &[String]) -> Result<IndexMap<String, Value>> {
    let mut map = IndexMap::new();
    for pair in pairs {
        match pair.split_once('=') {
            Some((key, value)) => {
                map.insert(key.trim().to_string(), parse_scalar(value.trim()));
            }
            None => {
                return Err(anyhow!(
                    "Invalid format for key-value pair: '{}'. Expected 'KEY=VALUE'.",
                    pair
                ));
            }
        }
    }
    Ok(map)
}

fn parse_scalar(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// The route described by `--route` and `--param`, if any.
pub fn build_route(request: &RequestArgs, routes: &RouteTable) -> Result<Option<Route>> {
    let Some(target) = &request.route else {
        if !request.params.is_empty() {
            log::warn!("Route parameters were given without --route. Ignoring them.");
        }
        return Ok(None);
    };

    let parameters = parse_key_value_pairs(&request.params)?;
    let route = Route::from_target(target, &parameters, routes)?;
    log::debug!("Simulating route {} at '{}'", route.signature(), route.link());
    Ok(Some(route))
}

/// The request URL given by `--base-url`, if any.
pub fn parse_request(request: &RequestArgs) -> Result<Option<RequestUrl>> {
    request
        .base_url
        .as_deref()
        .map(RequestUrl::parse)
        .transpose()
        .map_err(Into::into)
}

/// Common body of `render`, `path` and `sitemap`.
pub fn show_view(
    kind: Visibility,
    menu_name: &str,
    source: &SourceArgs,
    request: &RequestArgs,
    output: &OutputArgs,
) -> Result<()> {
    let site = load_site(source)?;
    let menu = site.registry.get_menu(menu_name)?;
    let route = build_route(request, &site.routes)?;
    let request_url = parse_request(request)?;

    let mut ctx = menu.context();
    ctx.set_active_route(route.as_ref().map(|route| route as &dyn CurrentRoute));
    ctx.set_request(request_url.as_ref());

    let view = render::render_view(menu, &ctx, kind)?;
    if output.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        graph_display::display_view(&view, &output.display_options());
    }
    Ok(())
}

/// Number of items in a container, nested ones included.
pub fn count_items(items: &MenuItems) -> usize {
    items.iter().map(|item| 1 + count_items(item)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value_pairs_keeps_scalar_types() {
        let pairs = vec!["id=7".to_string(), "draft=true".to_string(), "slug= intro ".to_string()];
        let map = parse_key_value_pairs(&pairs).unwrap();
        assert_eq!(map.get("id"), Some(&Value::from(7)));
        assert_eq!(map.get("draft"), Some(&Value::from(true)));
        assert_eq!(map.get("slug"), Some(&Value::from("intro")));

        assert!(parse_key_value_pairs(&["oops".to_string()]).is_err());
    }

    #[test]
    fn test_build_route_uses_route_table() {
        let mut routes = RouteTable::new();
        routes.add_route("Article:show", "/articles/<id>");
        let request = RequestArgs {
            route: Some("Article:show".to_string()),
            params: vec!["id=3".to_string()],
            base_url: None,
        };

        let route = build_route(&request, &routes).unwrap().unwrap();
        assert_eq!(route.signature(), "Article:show");
        assert_eq!(route.link(), "/articles/3");
        assert!(build_route(&RequestArgs::default(), &routes).unwrap().is_none());
    }

    #[test]
    fn test_parse_request_is_optional() {
        assert!(parse_request(&RequestArgs::default()).unwrap().is_none());
        let request = RequestArgs {
            base_url: Some("http://localhost:8080".to_string()),
            ..RequestArgs::default()
        };
        assert_eq!(
            parse_request(&request).unwrap().unwrap().origin(),
            "http://localhost:8080"
        );
    }
}
