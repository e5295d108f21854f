// src/cli/handlers/mod.rs

// One module per CLI command. Each handler parses its own arguments.

/// `check`.
pub mod check;
/// Argument groups and helpers shared by the handlers.
pub mod commons;
/// `list`.
pub mod list;
/// `path`.
pub mod path;
/// `render`.
pub mod render;
/// `sitemap`.
pub mod sitemap;
