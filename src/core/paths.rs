// src/core/paths.rs

use crate::constants::{APP_DIR_NAME, CONFIG_ENV_VAR, CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref MENUTREE_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors raised while locating the configuration file.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// `~` or an environment variable in a path could not be expanded.
    #[error("Could not expand path '{path}': {reason}")]
    Expansion {
        /// The path as given.
        path: String,
        /// The expansion failure.
        reason: String,
    },
    /// An explicitly named configuration file is missing.
    #[error("Configuration file '{path}' does not exist.")]
    ConfigNotFound {
        /// The expanded path.
        path: String,
    },
    /// None of the default locations holds a configuration file.
    #[error("No configuration file found. Searched: {searched}")]
    NoConfigFound {
        /// The locations tried, comma separated.
        searched: String,
    },
}

/// Returns the menutree configuration directory (`~/.config/menutree`).
/// The directory is not created; it is only one of the places searched.
///
/// This function is memoized: the first call computes and caches the path,
/// subsequent calls return the cached value.
pub fn get_menutree_config_dir() -> Result<PathBuf, PathError> {
    let mut cached_path_guard = MENUTREE_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(APP_DIR_NAME);

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Expands `~` and environment variables in a user-supplied path.
pub fn expand_path(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Locates the configuration file.
///
/// Resolution order:
/// 1. The explicit path (`--config`), which must exist.
/// 2. The `MENUTREE_CONFIG` environment variable, which must exist when set.
/// 3. `./menus.toml` in the working directory.
/// 4. `menus.toml` inside the menutree configuration directory.
pub fn resolve_config_path(explicit: Option<&str>) -> Result<PathBuf, PathError> {
    // 1. Explicit flag.
    if let Some(raw) = explicit {
        return existing(raw);
    }

    // 2. Environment.
    if let Ok(raw) = env::var(CONFIG_ENV_VAR) {
        if !raw.trim().is_empty() {
            log::debug!("Using configuration from ${}: {}", CONFIG_ENV_VAR, raw);
            return existing(&raw);
        }
    }

    // 3. and 4. Conventional locations.
    let mut searched = vec![PathBuf::from(CONFIG_FILENAME)];
    if let Ok(dir) = get_menutree_config_dir() {
        searched.push(dir.join(CONFIG_FILENAME));
    }

    for candidate in &searched {
        if candidate.is_file() {
            log::debug!("Found configuration at '{}'.", candidate.display());
            return Ok(canonical(candidate));
        }
    }

    Err(PathError::NoConfigFound {
        searched: searched
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Resolves a path declared inside a config file against the file's directory.
pub fn resolve_relative_to(base_dir: Option<&Path>, declared: &str) -> Result<PathBuf, PathError> {
    let path = expand_path(declared)?;
    Ok(match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path,
    })
}

fn existing(raw: &str) -> Result<PathBuf, PathError> {
    let path = expand_path(raw)?;
    if !path.is_file() {
        return Err(PathError::ConfigNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(canonical(&path))
}

fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("custom.toml");

        let missing = resolve_config_path(Some(file.to_str().unwrap()));
        assert!(matches!(missing, Err(PathError::ConfigNotFound { .. })));

        fs::write(&file, "").unwrap();
        let found = resolve_config_path(Some(file.to_str().unwrap())).unwrap();
        assert_eq!(found, dunce::canonicalize(&file).unwrap());
    }

    #[test]
    fn test_relative_declarations_follow_base_dir() {
        let base = Path::new("/srv/site");
        assert_eq!(
            resolve_relative_to(Some(base), "templates/menu.html").unwrap(),
            base.join("templates/menu.html")
        );
        assert_eq!(
            resolve_relative_to(Some(base), "/abs/menu.html").unwrap(),
            PathBuf::from("/abs/menu.html")
        );
        assert_eq!(
            resolve_relative_to(None, "menu.html").unwrap(),
            PathBuf::from("menu.html")
        );
    }

    #[test]
    fn test_config_dir_is_memoized() {
        if let Ok(first) = get_menutree_config_dir() {
            assert!(first.ends_with(APP_DIR_NAME));
            assert_eq!(get_menutree_config_dir().unwrap(), first);
        }
    }
}
