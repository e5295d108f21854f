//! # Capability Layer
//!
//! The menu core never talks to a router, a user session or a message catalog
//! directly. Instead it consumes the narrow traits defined here, which a host
//! application implements (or picks from the bundled implementations) and injects
//! through `MenuServices`.
//!
//! ## Modules
//!
//! - **`links`**: `LinkResolver`, the `RouteTable` resolver and `RequestUrl`, the
//!   origin of the current request used for absolute links.
//! - **`route`**: `CurrentRoute`, the per-request route identity, and `Route`.
//! - **`security`**: `Authorizer` with the optimistic and role-based implementations.
//! - **`localization`**: `Translator` with the identity and catalog implementations.

/// Link resolution.
pub mod links;
/// Title translation.
pub mod localization;
/// The current route.
pub mod route;
/// Item authorization.
pub mod security;
