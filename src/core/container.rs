//! # Item Container
//!
//! `MenuItems` is the child-management behavior shared by the root `Menu` and
//! every `MenuItem`. Both embed one and expose it through `Deref`/`DerefMut`, so
//! `menu.get_item("a-b")` and `item.get_item("b")` are the same operation.
//!
//! Children are kept in insertion order. That order is the sibling order of every
//! query: visible items, the active-item search and the breadcrumb walk.

use crate::constants::PATH_SEPARATOR;
use crate::core::context::ActiveContext;
use crate::core::errors::{MenuError, MenuResult};
use crate::core::item::MenuItem;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three independent views an item can be shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// The navigation menu itself.
    Menu,
    /// The breadcrumb trail.
    Breadcrumbs,
    /// The sitemap.
    Sitemap,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Menu => "menu",
            Self::Breadcrumbs => "breadcrumbs",
            Self::Sitemap => "sitemap",
        })
    }
}

/// Ordered, name-keyed children of a menu or menu item.
#[derive(Debug, Default)]
pub struct MenuItems {
    items: IndexMap<String, MenuItem>,
}

impl MenuItems {
    /// An empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a child named `name` and returns it for configuration.
    ///
    /// An existing child with the same name is replaced in place: the new item takes
    /// over the old one's position among its siblings.
    pub fn add_item(&mut self, name: impl Into<String>, title: impl Into<String>) -> &mut MenuItem {
        let name = name.into();
        let item = MenuItem::new(name.clone(), title);

        match self.items.entry(name) {
            Entry::Occupied(mut entry) => {
                log::warn!(
                    "Menu item '{}' already exists. Replacing it with the new declaration.",
                    entry.key()
                );
                entry.insert(item);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(item),
        }
    }

    /// Creates a child and hands it to `configure` before returning.
    pub fn add_item_with<F, E>(
        &mut self,
        name: impl Into<String>,
        title: impl Into<String>,
        configure: F,
    ) -> Result<(), E>
    where
        F: FnOnce(&mut MenuItem) -> Result<(), E>,
    {
        configure(self.add_item(name, title))
    }

    /// Resolves a hyphen-segmented path (`"a-b-c"`) one level at a time.
    pub fn get_item(&self, path: &str) -> MenuResult<&MenuItem> {
        self.lookup(path, path)
    }

    /// Mutable counterpart of [`MenuItems::get_item`].
    pub fn get_item_mut(&mut self, path: &str) -> MenuResult<&mut MenuItem> {
        self.lookup_mut(path, path)
    }

    fn lookup(&self, path: &str, full_path: &str) -> MenuResult<&MenuItem> {
        match path.split_once(PATH_SEPARATOR) {
            None => self.child(path, full_path),
            Some((head, rest)) => self.child(head, full_path)?.items().lookup(rest, full_path),
        }
    }

    fn lookup_mut(&mut self, path: &str, full_path: &str) -> MenuResult<&mut MenuItem> {
        match path.split_once(PATH_SEPARATOR) {
            None => self.child_mut(path, full_path),
            Some((head, rest)) => self
                .child_mut(head, full_path)?
                .items_mut()
                .lookup_mut(rest, full_path),
        }
    }

    fn child(&self, segment: &str, full_path: &str) -> MenuResult<&MenuItem> {
        self.items
            .get(segment)
            .ok_or_else(|| not_found(segment, full_path))
    }

    fn child_mut(&mut self, segment: &str, full_path: &str) -> MenuResult<&mut MenuItem> {
        self.items
            .get_mut(segment)
            .ok_or_else(|| not_found(segment, full_path))
    }

    /// Read-only view of the direct children, in insertion order.
    pub fn get_items(&self) -> &IndexMap<String, MenuItem> {
        &self.items
    }

    /// Direct children in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.values()
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no direct children.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First direct child that is both allowed and active. Does not descend:
    /// an item's activity already accounts for its own descendants.
    pub fn find_active_item(&self, ctx: &ActiveContext<'_>) -> MenuResult<Option<&MenuItem>> {
        for item in self.items.values() {
            if item.is_allowed(ctx) && item.is_active(ctx)? {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }

    /// Direct children shown in `visibility`, in insertion order.
    pub fn get_visible_items_on(&self, visibility: Visibility) -> Vec<&MenuItem> {
        self.items
            .values()
            .filter(|item| item.is_visible_on(visibility))
            .collect()
    }

    /// Whether any direct child is shown in `visibility`.
    pub fn has_visible_items_on(&self, visibility: Visibility) -> bool {
        self.items.values().any(|item| item.is_visible_on(visibility))
    }

    /// Shorthand for `has_visible_items_on(Visibility::Menu)`.
    pub fn has_visible_items_on_menu(&self) -> bool {
        self.has_visible_items_on(Visibility::Menu)
    }

    /// Shorthand for `get_visible_items_on(Visibility::Menu)`.
    pub fn get_visible_items_on_menu(&self) -> Vec<&MenuItem> {
        self.get_visible_items_on(Visibility::Menu)
    }

    /// Shorthand for `has_visible_items_on(Visibility::Breadcrumbs)`.
    pub fn has_visible_items_on_breadcrumbs(&self) -> bool {
        self.has_visible_items_on(Visibility::Breadcrumbs)
    }

    /// Shorthand for `get_visible_items_on(Visibility::Breadcrumbs)`.
    pub fn get_visible_items_on_breadcrumbs(&self) -> Vec<&MenuItem> {
        self.get_visible_items_on(Visibility::Breadcrumbs)
    }

    /// Shorthand for `has_visible_items_on(Visibility::Sitemap)`.
    pub fn has_visible_items_on_sitemap(&self) -> bool {
        self.has_visible_items_on(Visibility::Sitemap)
    }

    /// Shorthand for `get_visible_items_on(Visibility::Sitemap)`.
    pub fn get_visible_items_on_sitemap(&self) -> Vec<&MenuItem> {
        self.get_visible_items_on(Visibility::Sitemap)
    }
}

fn not_found(segment: &str, full_path: &str) -> MenuError {
    MenuError::ItemNotFound {
        path: full_path.to_string(),
        segment: segment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&MenuItem]) -> Vec<String> {
        items.iter().map(|item| item.name().to_string()).collect()
    }

    #[test]
    fn test_get_item_returns_just_added_child() {
        let mut items = MenuItems::new();
        items.add_item("a", "A");
        let item = items.get_item("a").unwrap();
        assert_eq!(item.name(), "a");
        assert_eq!(item.title(), "A");
    }

    #[test]
    fn test_get_item_resolves_nested_paths() {
        let mut items = MenuItems::new();
        let a = items.add_item("a", "A");
        let b = a.add_item("b", "B");
        b.add_item("c", "C");

        assert_eq!(items.get_item("a-b").unwrap().title(), "B");
        assert_eq!(items.get_item("a-b-c").unwrap().title(), "C");

        items.get_item_mut("a-b-c").unwrap().set_link("/c");
        assert_eq!(items.get_item("a-b-c").unwrap().link(), Some("/c"));
    }

    #[test]
    fn test_get_item_missing_segment_fails_at_any_depth() {
        let mut items = MenuItems::new();
        items.add_item("a", "A").add_item("b", "B");

        for (path, missing) in [("x", "x"), ("a-x", "x"), ("a-b-x", "x"), ("x-b", "x")] {
            match items.get_item(path) {
                Err(MenuError::ItemNotFound { path: p, segment }) => {
                    assert_eq!(p, path);
                    assert_eq!(segment, missing);
                }
                other => panic!("expected ItemNotFound for {:?}, got {:?}", path, other),
            }
        }
        assert!(items.get_item_mut("a-x").is_err());
    }

    #[test]
    fn test_add_item_replaces_existing_sibling_in_place() {
        let mut items = MenuItems::new();
        items.add_item("first", "First");
        items.add_item("second", "Second").add_item("child", "Child");
        items.add_item("third", "Third");

        items.add_item("second", "Second, again");

        let order: Vec<&str> = items.get_items().keys().map(String::as_str).collect();
        assert_eq!(order, ["first", "second", "third"]);
        let replaced = items.get_item("second").unwrap();
        assert_eq!(replaced.title(), "Second, again");
        assert!(replaced.is_empty());
    }

    #[test]
    fn test_add_item_with_runs_configuration() {
        let mut items = MenuItems::new();
        items
            .add_item_with("a", "A", |item| -> Result<(), MenuError> {
                item.set_menu_visibility(false);
                item.add_item("b", "B");
                Ok(())
            })
            .unwrap();

        let a = items.get_item("a").unwrap();
        assert!(!a.is_visible_on_menu());
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_visible_queries_filter_and_keep_order() {
        let mut items = MenuItems::new();
        items.add_item("one", "One").set_sitemap_visibility(false);
        items.add_item("two", "Two").set_menu_visibility(false);
        items.add_item("three", "Three").set_breadcrumbs_visibility(false);
        items.add_item("four", "Four");

        assert_eq!(names(&items.get_visible_items_on_menu()), ["one", "three", "four"]);
        assert_eq!(names(&items.get_visible_items_on_breadcrumbs()), ["one", "two", "four"]);
        assert_eq!(names(&items.get_visible_items_on_sitemap()), ["two", "three", "four"]);
    }

    #[test]
    fn test_has_visible_matches_get_visible() {
        let mut items = MenuItems::new();
        let hidden = items.add_item("hidden", "Hidden");
        hidden.set_menu_visibility(false);
        hidden.set_sitemap_visibility(false);

        for visibility in [Visibility::Menu, Visibility::Breadcrumbs, Visibility::Sitemap] {
            assert_eq!(
                items.has_visible_items_on(visibility),
                !items.get_visible_items_on(visibility).is_empty(),
                "mismatch for {}",
                visibility
            );
        }
        assert!(!items.has_visible_items_on_menu());
        assert!(items.has_visible_items_on_breadcrumbs());
        assert!(!items.has_visible_items_on_sitemap());
        assert!(!MenuItems::new().has_visible_items_on_breadcrumbs());
    }
}
