// src/core/mod.rs

pub mod config_loader;
pub mod container;
/// Per-request query state.
pub mod context;
/// Menu error types.
pub mod errors;
/// Terminal display of rendered views.
pub mod graph_display;
pub mod item;
/// Menu loaders.
pub mod loader;
/// Menus, their capabilities and builder.
pub mod menu;
/// Configuration file discovery.
pub mod paths;
/// The registry of named menus.
pub mod registry;
pub mod render;
