// src/constants.rs

/// Separator between segments of an item path (`"admin-users-edit"`).
pub const PATH_SEPARATOR: char = '-';

/// Link produced for items that declare neither an action nor a literal link.
pub const PLACEHOLDER_LINK: &str = "#";

/// Name of the configuration file searched for when no path is given.
pub const CONFIG_FILENAME: &str = "menus.toml";

/// Name of the application directory inside the system config directory.
pub const APP_DIR_NAME: &str = "menutree";

/// Environment variable that may point at the configuration file.
pub const CONFIG_ENV_VAR: &str = "MENUTREE_CONFIG";

/// Default template references. They are opaque to the core and only carried along.
pub const DEFAULT_MENU_TEMPLATE: &str = "builtin:menu";
/// Default breadcrumbs template.
pub const DEFAULT_BREADCRUMBS_TEMPLATE: &str = "builtin:breadcrumbs";
/// Default sitemap template.
pub const DEFAULT_SITEMAP_TEMPLATE: &str = "builtin:sitemap";

/// Item data key read by `RoleAuthorizer`.
pub const ROLES_DATA_KEY: &str = "roles";
