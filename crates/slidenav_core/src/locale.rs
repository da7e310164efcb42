//! Localized menu labels
//!
//! Labels are data: a table keyed by locale tag with one default entry.
//! Adding a language means adding a row, never a branch.
//!
//! Lookup order for a tag like `fr-CA`:
//!
//! 1. exact tag (`fr-ca`, case-insensitive, `_` treated as `-`)
//! 2. primary subtag (`fr`)
//! 3. the default locale

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlidenavError};

/// Locale used when nothing else matches
pub const DEFAULT_LOCALE: &str = "en";

/// The fixed set of strings the overlay shows
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuLabels {
    /// Toggle text while the overlay is closed
    pub open: String,
    /// Toggle text while the overlay is mounted
    pub close: String,
    /// Title of the about link, the first entry of the overlay
    pub about: String,
}

impl MenuLabels {
    pub fn new(open: impl Into<String>, close: impl Into<String>, about: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            about: about.into(),
        }
    }

    pub fn english() -> Self {
        Self::new("Menu", "Close", "About")
    }

    pub fn spanish() -> Self {
        Self::new("Menú", "Cerrar", "Sobre")
    }

    pub fn french() -> Self {
        Self::new("Menu", "Fermer", "À Propos")
    }
}

fn normalize(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

/// Locale tag to labels table with a guaranteed default entry
#[derive(Clone, Debug)]
pub struct LabelCatalog {
    entries: IndexMap<String, MenuLabels>,
    default_locale: String,
}

impl LabelCatalog {
    /// Create a catalog holding only the default locale
    pub fn new(default_locale: &str, labels: MenuLabels) -> Self {
        let default_locale = normalize(default_locale);
        let mut entries = IndexMap::new();
        entries.insert(default_locale.clone(), labels);
        Self {
            entries,
            default_locale,
        }
    }

    /// English default plus Spanish and French
    pub fn builtin() -> Self {
        let mut catalog = Self::new(DEFAULT_LOCALE, MenuLabels::english());
        catalog.insert("es", MenuLabels::spanish());
        catalog.insert("fr", MenuLabels::french());
        catalog
    }

    /// Add or replace the labels for a locale
    pub fn insert(&mut self, locale: &str, labels: MenuLabels) {
        self.entries.insert(normalize(locale), labels);
    }

    /// Switch the fallback locale; it must already have labels
    pub fn set_default_locale(&mut self, locale: &str) -> Result<()> {
        let locale = normalize(locale);
        if !self.entries.contains_key(&locale) {
            return Err(SlidenavError::UnknownLocale(locale));
        }
        self.default_locale = locale;
        Ok(())
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Labels registered for exactly this tag, without fallback
    pub fn get(&self, locale: &str) -> Option<&MenuLabels> {
        self.entries.get(&normalize(locale))
    }

    /// Labels for a tag, walking the fallback chain
    pub fn labels(&self, locale: &str) -> &MenuLabels {
        let tag = normalize(locale);
        if let Some(labels) = self.entries.get(&tag) {
            return labels;
        }
        if let Some(primary) = tag.split('-').next() {
            if let Some(labels) = self.entries.get(primary) {
                return labels;
            }
        }
        tracing::debug!(
            "LabelCatalog: no labels for '{}', using '{}'",
            locale,
            self.default_locale
        );
        &self.entries[&self.default_locale]
    }

    /// Registered locale tags in insertion order
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for LabelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
