// src/core/registry.rs

use crate::core::errors::{MenuError, MenuResult};
use crate::core::menu::Menu;
use indexmap::IndexMap;
use indexmap::map::Entry;

/// Named menus of one application, in registration order.
#[derive(Debug, Default)]
pub struct MenuRegistry {
    menus: IndexMap<String, Menu>,
}

impl MenuRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a menu under its own name, replacing any menu of the same name.
    pub fn add_menu(&mut self, menu: Menu) {
        match self.menus.entry(menu.name().to_string()) {
            Entry::Occupied(mut entry) => {
                log::warn!("Menu '{}' is already registered. Replacing it.", entry.key());
                entry.insert(menu);
            }
            Entry::Vacant(entry) => {
                log::debug!("Registered menu '{}'.", entry.key());
                entry.insert(menu);
            }
        }
    }

    /// The menu registered under `name`.
    pub fn get_menu(&self, name: &str) -> MenuResult<&Menu> {
        self.menus.get(name).ok_or_else(|| MenuError::MenuNotFound {
            name: name.to_string(),
        })
    }

    /// Mutable counterpart of [`MenuRegistry::get_menu`].
    pub fn get_menu_mut(&mut self, name: &str) -> MenuResult<&mut Menu> {
        self.menus.get_mut(name).ok_or_else(|| MenuError::MenuNotFound {
            name: name.to_string(),
        })
    }

    /// Menus in registration order.
    pub fn menus(&self) -> impl Iterator<Item = &Menu> {
        self.menus.values()
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.menus.keys().map(String::as_str)
    }

    /// Number of registered menus.
    pub fn len(&self) -> usize {
        self.menus.len()
    }

    /// Whether no menu is registered.
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

impl FromIterator<Menu> for MenuRegistry {
    fn from_iter<I: IntoIterator<Item = Menu>>(iter: I) -> Self {
        let mut registry = Self::new();
        for menu in iter {
            registry.add_menu(menu);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::MenuLoader;
    use std::sync::Arc;

    struct SingleItem(&'static str);

    impl MenuLoader for SingleItem {
        fn load(&self, menu: &mut Menu) -> MenuResult<()> {
            menu.add_item(self.0, self.0);
            Ok(())
        }
    }

    fn menu(name: &str, item: &'static str) -> Menu {
        Menu::builder(name).loader(Arc::new(SingleItem(item))).build().unwrap()
    }

    #[test]
    fn test_registry_lookup_by_name() {
        let registry: MenuRegistry = [menu("main", "home"), menu("footer", "contact")]
            .into_iter()
            .collect();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), ["main", "footer"]);
        assert!(registry.get_menu("footer").unwrap().get_item("contact").is_ok());

        match registry.get_menu("sidebar") {
            Err(MenuError::MenuNotFound { name }) => assert_eq!(name, "sidebar"),
            other => panic!("expected MenuNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_registering_same_name_replaces_menu() {
        let mut registry = MenuRegistry::new();
        registry.add_menu(menu("main", "home"));
        registry.add_menu(menu("main", "about"));

        assert_eq!(registry.len(), 1);
        let main = registry.get_menu_mut("main").unwrap();
        assert!(main.get_item("home").is_err());
        main.get_item_mut("about").unwrap().set_link("/about");
        assert_eq!(registry.get_menu("main").unwrap().get_item("about").unwrap().link(), Some("/about"));
    }
}
