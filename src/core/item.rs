//! # Menu Item
//!
//! A single navigational entry. Every item is itself a container of sub-items
//! (see `container`), so the tree is built by nesting `add_item` calls.
//!
//! ## Active-state resolution
//!
//! `is_active` applies these rules in order, the first match wins:
//!
//! 1. An item the authorizer denies is inactive, whatever else holds.
//! 2. If the item has an action and a route is bound to the context:
//!    a. it is active when the route's own link equals the item's link;
//!    b. otherwise it is active when any inclusion pattern matches the route
//!       signature `"<group>:<action>"` (unanchored, case-sensitive).
//! 3. Otherwise it is active when one of its direct children is allowed and active.
//! 4. Otherwise it is inactive.
//!
//! Results are memoized in the `ActiveContext`, keyed by the item's id and
//! revision. Every mutation of the action, link, include patterns or link
//! resolver bumps the revision, so stale results of this item are never reused.

use crate::core::container::{MenuItems, Visibility};
use crate::core::context::ActiveContext;
use crate::core::errors::{MenuError, MenuResult};
use crate::system::links::LinkResolver;
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use uuid::Uuid;

/// Process-unique identity of a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(Uuid);

impl ItemId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A symbolic destination: a route target plus its parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    /// Route target, e.g. `"Article:show"`.
    pub target: String,
    /// Route parameters, in declaration order.
    pub parameters: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisibilityFlags {
    menu: bool,
    breadcrumbs: bool,
    sitemap: bool,
}

impl Default for VisibilityFlags {
    fn default() -> Self {
        Self {
            menu: true,
            breadcrumbs: true,
            sitemap: true,
        }
    }
}

/// A node of the menu tree. Its children are reachable through `Deref` to [`MenuItems`].
pub struct MenuItem {
    id: ItemId,
    name: String,
    title: String,
    action: Option<Action>,
    link: Option<String>,
    data: IndexMap<String, Value>,
    visibility: VisibilityFlags,
    include: Vec<Regex>,
    link_resolver: Option<Arc<dyn LinkResolver>>,
    revision: u64,
    items: MenuItems,
}

impl MenuItem {
    pub(crate) fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            title: title.into(),
            action: None,
            link: None,
            data: IndexMap::new(),
            visibility: VisibilityFlags::default(),
            include: Vec::new(),
            link_resolver: None,
            revision: 0,
            items: MenuItems::new(),
        }
    }

    /// Identity used to key per-request memoization.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Key of the item among its siblings.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw, untranslated title.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Child items.
    pub fn items(&self) -> &MenuItems {
        &self.items
    }

    /// Mutable child items.
    pub fn items_mut(&mut self) -> &mut MenuItems {
        &mut self.items
    }

    // --- Active state ---

    /// Whether the authorizer of the context allows this item. Never cached.
    pub fn is_allowed(&self, ctx: &ActiveContext<'_>) -> bool {
        ctx.services().authorizer().is_allowed(self)
    }

    /// Whether this item, or one of its descendants, matches the bound route.
    pub fn is_active(&self, ctx: &ActiveContext<'_>) -> MenuResult<bool> {
        if let Some(active) = ctx.recall(self.id, self.revision) {
            return Ok(active);
        }

        let active = self.resolve_active(ctx)?;
        log::trace!("Item '{}' resolved as active={}", self.name, active);
        ctx.remember(self.id, self.revision, active);
        Ok(active)
    }

    fn resolve_active(&self, ctx: &ActiveContext<'_>) -> MenuResult<bool> {
        if !self.is_allowed(ctx) {
            return Ok(false);
        }

        if let (Some(_), Some(route)) = (&self.action, ctx.active_route()) {
            if route.self_link()? == self.real_link(ctx)? {
                return Ok(true);
            }

            if !self.include.is_empty() && self.matches_include(&route.signature()) {
                return Ok(true);
            }
        }

        Ok(self.items.find_active_item(ctx)?.is_some())
    }

    /// Whether any inclusion pattern matches a route signature.
    pub fn matches_include(&self, signature: &str) -> bool {
        self.include.iter().any(|pattern| pattern.is_match(signature))
    }

    // --- Resolved presentation ---

    /// The title passed through the context's translator.
    pub fn real_title(&self, ctx: &ActiveContext<'_>) -> String {
        ctx.services().translator().translate(&self.title)
    }

    /// The item's own link resolver if it has one, the menu's otherwise.
    pub fn real_link(&self, ctx: &ActiveContext<'_>) -> MenuResult<String> {
        let resolver = match &self.link_resolver {
            Some(resolver) => resolver.as_ref(),
            None => ctx.services().link_resolver(),
        };
        Ok(resolver.resolve(self)?)
    }

    /// `scheme://host[:port]` of the bound request followed by `real_link`.
    pub fn real_absolute_link(&self, ctx: &ActiveContext<'_>) -> MenuResult<String> {
        let request = ctx.request().ok_or(MenuError::MissingRequest)?;
        Ok(format!("{}{}", request.origin(), self.real_link(ctx)?))
    }

    // --- Destination ---

    /// The symbolic destination, if any.
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    /// Sets the symbolic destination. It takes precedence over a literal link.
    pub fn set_action(&mut self, target: impl Into<String>, parameters: IndexMap<String, Value>) {
        self.action = Some(Action {
            target: target.into(),
            parameters,
        });
        self.touch();
    }

    /// The literal link, if any.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Sets a literal link, used when there is no action.
    pub fn set_link(&mut self, link: impl Into<String>) {
        self.link = Some(link.into());
        self.touch();
    }

    /// Overrides the menu's link resolver for this item only.
    pub fn set_link_resolver(&mut self, resolver: Arc<dyn LinkResolver>) {
        self.link_resolver = Some(resolver);
        self.touch();
    }

    /// Whether this item carries its own link resolver.
    pub fn has_link_resolver(&self) -> bool {
        self.link_resolver.is_some()
    }

    /// Replaces the inclusion patterns. Nothing changes if any pattern is invalid.
    pub fn set_include<I, S>(&mut self, patterns: I) -> MenuResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).map_err(|source| MenuError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<MenuResult<Vec<_>>>()?;

        self.include = compiled;
        self.touch();
        Ok(())
    }

    /// Source text of the inclusion patterns.
    pub fn include_patterns(&self) -> impl Iterator<Item = &str> {
        self.include.iter().map(Regex::as_str)
    }

    // --- Data ---

    /// Free-form data attached to the item.
    pub fn data(&self) -> &IndexMap<String, Value> {
        &self.data
    }

    /// Whether `key` is present in the item's data.
    pub fn has_data(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// The data value under `key`.
    pub fn get_data(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// The data value under `key`, or `default` when absent.
    pub fn get_data_or(&self, key: &str, default: Value) -> Value {
        self.data.get(key).cloned().unwrap_or(default)
    }

    /// Replaces all data.
    pub fn set_data(&mut self, data: IndexMap<String, Value>) {
        self.data = data;
    }

    /// Inserts or overwrites one data entry.
    pub fn add_data(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.data.insert(key.into(), value.into());
    }

    // --- Visibility ---

    /// Whether the item is shown in `visibility`. All views default to visible.
    pub fn is_visible_on(&self, visibility: Visibility) -> bool {
        match visibility {
            Visibility::Menu => self.visibility.menu,
            Visibility::Breadcrumbs => self.visibility.breadcrumbs,
            Visibility::Sitemap => self.visibility.sitemap,
        }
    }

    /// Shows or hides the item in one view.
    pub fn set_visibility(&mut self, visibility: Visibility, visible: bool) {
        match visibility {
            Visibility::Menu => self.visibility.menu = visible,
            Visibility::Breadcrumbs => self.visibility.breadcrumbs = visible,
            Visibility::Sitemap => self.visibility.sitemap = visible,
        }
    }

    /// Whether the item is shown in the menu.
    pub fn is_visible_on_menu(&self) -> bool {
        self.visibility.menu
    }

    /// Shows or hides the item in the menu.
    pub fn set_menu_visibility(&mut self, visible: bool) {
        self.visibility.menu = visible;
    }

    /// Whether the item is shown in breadcrumbs.
    pub fn is_visible_on_breadcrumbs(&self) -> bool {
        self.visibility.breadcrumbs
    }

    /// Shows or hides the item in breadcrumbs.
    pub fn set_breadcrumbs_visibility(&mut self, visible: bool) {
        self.visibility.breadcrumbs = visible;
    }

    /// Whether the item is shown in the sitemap.
    pub fn is_visible_on_sitemap(&self) -> bool {
        self.visibility.sitemap
    }

    /// Shows or hides the item in the sitemap.
    pub fn set_sitemap_visibility(&mut self, visible: bool) {
        self.visibility.sitemap = visible;
    }
}

impl Deref for MenuItem {
    type Target = MenuItems;

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl DerefMut for MenuItem {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.items
    }
}

impl fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("title", &self.title)
            .field("action", &self.action)
            .field("link", &self.link)
            .field("data", &self.data)
            .field("visibility", &self.visibility)
            .field("include", &self.include)
            .field("custom_link_resolver", &self.link_resolver.is_some())
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}
