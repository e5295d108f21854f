//! Hierarchical navigation menus with breadcrumbs, sitemaps and active-route
//! resolution, declared in TOML and queried per request.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

/// The `menutree` command-line interface.
pub mod cli;
/// Shared constants.
pub mod constants;
/// The menu tree, its queries, loading and rendering.
pub mod core;
/// Serde models of the `menus.toml` format.
pub mod models;
pub mod system;
