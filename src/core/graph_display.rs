// src/core/graph_display.rs

use crate::core::container::Visibility;
use crate::core::render::{ItemView, MenuView};
use colored::Colorize;

const BREADCRUMB_SEPARATOR: &str = " › ";

/// What to show next to each title.
#[derive(Debug, Clone, Copy)]
pub struct DisplayOptions {
    /// Print each item's link.
    pub show_links: bool,
    /// Print each item's path.
    pub show_names: bool,
    /// Levels to print below the root; `None` prints everything.
    pub max_depth: Option<usize>,
    /// Use terminal colors.
    pub color: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_links: true,
            show_names: false,
            max_depth: None,
            color: true,
        }
    }
}

/// Prints a view: an ASCII tree for menus and sitemaps, a single line for breadcrumbs.
pub fn display_view(view: &MenuView, options: &DisplayOptions) {
    print!("{}", format_view(view, options));
}

/// The text `display_view` prints.
pub fn format_view(view: &MenuView, options: &DisplayOptions) -> String {
    match view.kind {
        Visibility::Breadcrumbs => format_breadcrumbs(view, options),
        Visibility::Menu | Visibility::Sitemap => format_tree(view, options),
    }
}

fn format_tree(view: &MenuView, options: &DisplayOptions) -> String {
    let header = format!("{} ({})", view.menu, view.kind);
    let mut out = format!("{}\n", paint_header(&header, options));

    if view.items.is_empty() {
        out.push_str("   (empty)\n");
        return out;
    }

    for (i, item) in view.items.iter().enumerate() {
        let is_last = i == view.items.len() - 1;
        write_node(&mut out, item, options, "", is_last, 0);
    }
    out
}

/// Recursive function to write a tree node and its descendants.
fn write_node(
    out: &mut String,
    item: &ItemView,
    options: &DisplayOptions,
    prefix: &str,
    is_last: bool,
    depth: usize,
) {
    let connector = if is_last { "└─" } else { "├─" };
    out.push_str(&format!("{}{} {}\n", prefix, connector, label(item, options)));

    if options.max_depth.is_some_and(|max| depth >= max) {
        return;
    }

    let child_prefix = format!("{}{}", prefix, if is_last { "   " } else { "│  " });
    for (i, child) in item.children.iter().enumerate() {
        let is_last_child = i == item.children.len() - 1;
        write_node(out, child, options, &child_prefix, is_last_child, depth + 1);
    }
}

fn format_breadcrumbs(view: &MenuView, options: &DisplayOptions) -> String {
    if view.items.is_empty() {
        return "(no active item)\n".to_string();
    }

    let trail: Vec<String> = view.items.iter().map(|item| label(item, options)).collect();
    format!("{}\n", trail.join(BREADCRUMB_SEPARATOR))
}

fn label(item: &ItemView, options: &DisplayOptions) -> String {
    let mut label = if item.active && options.color {
        item.title.green().bold().to_string()
    } else {
        item.title.clone()
    };

    if item.active {
        label.push_str(" *");
    }
    if options.show_names {
        label.push_str(&format!(" [{}]", item.path));
    }
    if options.show_links {
        let link = item.absolute_link.as_deref().unwrap_or(&item.link);
        if options.color {
            label.push_str(&format!(" {}", link.dimmed()));
        } else {
            label.push_str(&format!(" {}", link));
        }
    }
    label
}

fn paint_header(header: &str, options: &DisplayOptions) -> String {
    if options.color {
        header.bold().to_string()
    } else {
        header.to_string()
    }
}
