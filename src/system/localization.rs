// src/system/localization.rs

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a message catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("Could not read catalog '{path}': {source}")]
    Io {
        /// The catalog path.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The catalog is not a flat TOML table of strings.
    #[error("Could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Turns raw item titles into display titles.
pub trait Translator: Send + Sync {
    /// The display form of `message`.
    fn translate(&self, message: &str) -> String;
}

/// Returns every message unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReturnTranslator;

impl Translator for ReturnTranslator {
    fn translate(&self, message: &str) -> String {
        message.to_string()
    }
}

/// A flat message catalog (`"menu.home" = "Domů"`). Unknown messages pass through.
#[derive(Debug, Default, Clone)]
pub struct CatalogTranslator {
    messages: HashMap<String, String>,
}

impl CatalogTranslator {
    /// A catalog from message pairs.
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    /// Parses a flat TOML table of messages.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        Ok(Self::new(toml::from_str(content)?))
    }

    /// Reads a flat TOML table of messages from `path`.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        log::debug!("Loading message catalog from '{}'", path.display());
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the catalog has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Translator for CatalogTranslator {
    fn translate(&self, message: &str) -> String {
        self.messages
            .get(message)
            .cloned()
            .unwrap_or_else(|| message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_catalog_translates_known_and_passes_unknown() {
        let catalog = CatalogTranslator::from_toml_str(
            r#"
            "Home" = "Domů"
            "menu.articles" = "Články"
        "#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.translate("Home"), "Domů");
        assert_eq!(catalog.translate("menu.articles"), "Články");
        assert_eq!(catalog.translate("Contact"), "Contact");
        assert_eq!(ReturnTranslator.translate("Contact"), "Contact");
    }

    #[test]
    fn test_catalog_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"\"Home\" = \"Inicio\"\n").unwrap();
        temp_file.flush().unwrap();

        let catalog = CatalogTranslator::from_file(temp_file.path()).unwrap();
        assert_eq!(catalog.translate("Home"), "Inicio");
    }

    #[test]
    fn test_catalog_errors() {
        assert!(matches!(
            CatalogTranslator::from_file(Path::new("no_such_catalog_for_test.toml")),
            Err(CatalogError::Io { .. })
        ));
        assert!(matches!(
            CatalogTranslator::from_toml_str("nested = { table = 1 }"),
            Err(CatalogError::Parse(_))
        ));
    }
}
