// src/core/errors.rs

use crate::system::links::LinkError;
use thiserror::Error;

/// Errors raised by the menu tree and its queries.
#[derive(Error, Debug)]
pub enum MenuError {
    /// A segment of an item path does not name an existing child.
    #[error("Menu item '{segment}' not found while resolving path '{path}'.")]
    ItemNotFound {
        /// The full path that was requested.
        path: String,
        /// The first segment that could not be resolved.
        segment: String,
    },
    /// No menu with this name is registered.
    #[error("Menu '{name}' is not registered.")]
    MenuNotFound {
        /// The requested name.
        name: String,
    },
    /// An inclusion pattern is not a valid regular expression.
    #[error("Invalid include pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// Why the regex engine rejected it.
        #[source]
        source: regex::Error,
    },
    /// An absolute link was requested but the context has no request URL.
    #[error("An absolute link requires the current request URL, but none is bound.")]
    MissingRequest,
    /// A link could not be resolved.
    #[error("Link Error: {0}")]
    Link(#[from] LinkError),
    /// A loader failed for a reason of its own.
    #[error("Loader Error: {0}")]
    Loader(String),
}

/// Result alias for menu operations.
pub type MenuResult<T> = Result<T, MenuError>;
