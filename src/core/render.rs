//! # Render
//!
//! Produces template-ready views of a menu for one request. A view holds only
//! resolved values (translated titles, links, active flags), so templates and
//! serializers never touch the tree or the context.
//!
//! - `Visibility::Menu` and `Visibility::Sitemap` yield a tree of the items that
//!   are visible on that view and allowed by the authorizer.
//! - `Visibility::Breadcrumbs` yields the flat `get_path` trail, keeping the
//!   items visible on breadcrumbs.

use crate::constants::PATH_SEPARATOR;
use crate::core::container::{MenuItems, Visibility};
use crate::core::context::ActiveContext;
use crate::core::errors::MenuResult;
use crate::core::item::MenuItem;
use crate::core::menu::Menu;
use serde::Serialize;

/// One resolved item of a view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    /// Key of the item among its siblings.
    pub name: String,
    /// Hyphen-joined path from the menu root, usable with `get_item`.
    pub path: String,
    /// Translated title.
    pub title: String,
    /// Resolved link.
    pub link: String,
    /// Link prefixed with the request origin, when a request URL is bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub absolute_link: Option<String>,
    /// Whether the item is active for the current route.
    pub active: bool,
    /// Visible children. Always empty in breadcrumbs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ItemView>,
}

/// A rendered view of one menu.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuView {
    /// Name of the menu.
    pub menu: String,
    /// Which view this is.
    pub kind: Visibility,
    /// Template configured for this view.
    pub template: String,
    /// Top-level items, or the trail for breadcrumbs.
    pub items: Vec<ItemView>,
}

impl MenuView {
    /// Number of items in the view, nested ones included.
    pub fn count(&self) -> usize {
        fn count_all(items: &[ItemView]) -> usize {
            items.iter().map(|item| 1 + count_all(&item.children)).sum()
        }
        count_all(&self.items)
    }

    /// Active items at any depth, in display order.
    pub fn active_items(&self) -> Vec<&ItemView> {
        fn collect<'v>(items: &'v [ItemView], out: &mut Vec<&'v ItemView>) {
            for item in items {
                if item.active {
                    out.push(item);
                }
                collect(&item.children, out);
            }
        }
        let mut out = Vec::new();
        collect(&self.items, &mut out);
        out
    }
}

/// Renders one view of `menu` for the request described by `ctx`.
pub fn render_view(menu: &Menu, ctx: &ActiveContext<'_>, kind: Visibility) -> MenuResult<MenuView> {
    let items = match kind {
        Visibility::Breadcrumbs => render_breadcrumbs(menu, ctx)?,
        Visibility::Menu | Visibility::Sitemap => render_tree(menu, ctx, kind, None)?,
    };

    Ok(MenuView {
        menu: menu.name().to_string(),
        kind,
        template: menu.templates().get(kind).to_string(),
        items,
    })
}

/// Visible and allowed items of `parent`, recursively.
pub fn render_tree(
    parent: &MenuItems,
    ctx: &ActiveContext<'_>,
    kind: Visibility,
    parent_path: Option<&str>,
) -> MenuResult<Vec<ItemView>> {
    let mut views = Vec::new();
    for item in parent.get_visible_items_on(kind) {
        if !item.is_allowed(ctx) {
            continue;
        }
        let path = join_path(parent_path, item.name());
        let children = render_tree(item, ctx, kind, Some(&path))?;
        views.push(item_view(item, ctx, path, children)?);
    }
    Ok(views)
}

/// The breadcrumb trail without children.
pub fn render_breadcrumbs(menu: &Menu, ctx: &ActiveContext<'_>) -> MenuResult<Vec<ItemView>> {
    let mut views = Vec::new();
    let mut path: Option<String> = None;

    for item in menu.get_path(ctx)? {
        let current = join_path(path.as_deref(), item.name());
        path = Some(current.clone());
        if item.is_visible_on_breadcrumbs() {
            views.push(item_view(item, ctx, current, Vec::new())?);
        }
    }
    Ok(views)
}

fn item_view(
    item: &MenuItem,
    ctx: &ActiveContext<'_>,
    path: String,
    children: Vec<ItemView>,
) -> MenuResult<ItemView> {
    let absolute_link = match ctx.request() {
        Some(_) => Some(item.real_absolute_link(ctx)?),
        None => None,
    };

    Ok(ItemView {
        name: item.name().to_string(),
        path,
        title: item.real_title(ctx),
        link: item.real_link(ctx)?,
        absolute_link,
        active: item.is_active(ctx)?,
        children,
    })
}

fn join_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{}{}{}", parent, PATH_SEPARATOR, name),
        None => name.to_string(),
    }
}
