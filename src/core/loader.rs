// src/core/loader.rs

use crate::core::container::MenuItems;
use crate::core::errors::MenuResult;
use crate::core::menu::Menu;
use crate::models::ItemConfig;
use indexmap::IndexMap;

/// Populates a freshly created menu. Called once, by `Menu::init`.
pub trait MenuLoader: Send + Sync {
    /// Adds the menu's items.
    fn load(&self, menu: &mut Menu) -> MenuResult<()>;
}

/// Builds the tree from a declarative item table, such as a `[menus.<name>.items]`
/// section of `menus.toml`. Declaration order becomes sibling order.
#[derive(Debug, Clone, Default)]
pub struct ConfigMenuLoader {
    items: IndexMap<String, ItemConfig>,
}

impl ConfigMenuLoader {
    /// A loader for the given item declarations.
    pub fn new(items: IndexMap<String, ItemConfig>) -> Self {
        Self { items }
    }

    /// The item declarations.
    pub fn items(&self) -> &IndexMap<String, ItemConfig> {
        &self.items
    }
}

impl MenuLoader for ConfigMenuLoader {
    fn load(&self, menu: &mut Menu) -> MenuResult<()> {
        log::debug!(
            "Loading {} top-level declarations into menu '{}'.",
            self.items.len(),
            menu.name()
        );
        process_items(menu, &self.items)
    }
}

fn process_items(parent: &mut MenuItems, declarations: &IndexMap<String, ItemConfig>) -> MenuResult<()> {
    for (key, declaration) in declarations {
        let title = declaration.title.clone().unwrap_or_else(|| key.clone());

        parent.add_item_with(key.as_str(), title, |item| -> MenuResult<()> {
            // 1. Destination.
            if let Some(action) = &declaration.action {
                let (target, parameters) = action.to_parts();
                item.set_action(target, parameters);
            }
            if let Some(link) = &declaration.link {
                item.set_link(link.as_str());
            }

            // 2. Presentation.
            if !declaration.data.is_empty() {
                item.set_data(declaration.data.clone());
            }
            item.set_menu_visibility(declaration.visibility.menu);
            item.set_breadcrumbs_visibility(declaration.visibility.breadcrumbs);
            item.set_sitemap_visibility(declaration.visibility.sitemap);

            // 3. Extra routes that keep the item active.
            if let Some(include) = &declaration.include {
                item.set_include(include.patterns())?;
            }

            // 4. Children, in declaration order.
            process_items(item, &declaration.items)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::MenuError;
    use crate::core::menu::MenuServices;
    use crate::models::MenusConfig;
    use crate::system::links::RouteTable;
    use crate::system::route::Route;
    use std::sync::Arc;

    const CONFIG: &str = r#"
        [routes]
        "Homepage:default" = "/"
        "Article:default" = "/articles"
        "Article:show" = "/articles/<id>"

        [menus.main.items.home]
        title = "Home"
        action = "Homepage:default"

        [menus.main.items.articles]
        action = "Article:default"
        include = "^Article:"
        data = { icon = "newspaper" }
        visibility = { sitemap = false }

        [menus.main.items.articles.items.first]
        title = "First article"
        action = { target = "Article:show", parameters = { id = 1 } }

        [menus.main.items.external]
        title = "Docs"
        link = "https://docs.example.com"
    "#;

    fn build() -> (Menu, RouteTable) {
        let config: MenusConfig = toml::from_str(CONFIG).unwrap();
        let table = RouteTable::from_routes(config.routes.clone());
        let items = config.menus.get("main").unwrap().items.clone();
        let menu = Menu::builder("main")
            .services(MenuServices::new(Arc::new(table.clone())))
            .loader(Arc::new(ConfigMenuLoader::new(items)))
            .build()
            .unwrap();
        (menu, table)
    }

    #[test]
    fn test_loader_keeps_declaration_order_and_defaults() {
        let (menu, _) = build();
        let order: Vec<&str> = menu.get_items().keys().map(String::as_str).collect();
        assert_eq!(order, ["home", "articles", "external"]);

        let articles = menu.get_item("articles").unwrap();
        assert_eq!(articles.title(), "articles");
        assert_eq!(articles.get_data("icon"), Some(&serde_json::json!("newspaper")));
        assert!(articles.is_visible_on_menu());
        assert!(!articles.is_visible_on_sitemap());
        assert_eq!(articles.include_patterns().collect::<Vec<_>>(), ["^Article:"]);

        let first = menu.get_item("articles-first").unwrap();
        assert_eq!(first.action().unwrap().target, "Article:show");
        assert_eq!(menu.get_item("external").unwrap().link(), Some("https://docs.example.com"));
    }

    #[test]
    fn test_loaded_menu_resolves_links_and_path() {
        let (menu, table) = build();
        let ctx = menu.context();
        assert_eq!(menu.get_item("articles-first").unwrap().real_link(&ctx).unwrap(), "/articles/1");
        assert_eq!(menu.get_item("external").unwrap().real_link(&ctx).unwrap(), "https://docs.example.com");

        let mut params = IndexMap::new();
        params.insert("id".to_string(), serde_json::json!(1));
        let route = Route::from_target("Article:show", &params, &table).unwrap();
        let ctx = menu.context().with_route(&route);
        let path: Vec<String> = menu
            .get_path(&ctx)
            .unwrap()
            .iter()
            .map(|item| item.name().to_string())
            .collect();
        assert_eq!(path, ["articles", "first"]);
    }

    #[test]
    fn test_invalid_include_pattern_fails_loading() {
        let mut items = IndexMap::new();
        items.insert(
            "broken".to_string(),
            toml::from_str::<ItemConfig>(r#"include = "Article:(""#).unwrap(),
        );
        let result = Menu::builder("main")
            .loader(Arc::new(ConfigMenuLoader::new(items)))
            .build();
        assert!(matches!(result, Err(MenuError::InvalidPattern { .. })));
    }
}
