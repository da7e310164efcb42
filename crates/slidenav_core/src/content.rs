//! Menu content and the rendered overlay model
//!
//! Content arrives from an external provider as JSON:
//!
//! ```json
//! { "aLetterFrom": "A letter from Lisbon", "menuItems": [{ "slug": "porto", "title": "Porto" }] }
//! ```
//!
//! Every field is optional. A missing list renders no item links, a
//! missing letter renders as empty text, and null items are skipped.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SlidenavError};
use crate::locale::MenuLabels;

/// Path of the fixed first link
pub const ABOUT_PATH: &str = "/about";

/// One navigable page supplied by the content provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
}

/// A null string field reads as empty text
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl NavItem {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.slug)
    }
}

/// Content provider payload
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuData {
    #[serde(default)]
    pub a_letter_from: Option<String>,
    #[serde(default)]
    pub menu_items: Option<Vec<Option<NavItem>>>,
}

impl MenuData {
    pub fn new(letter: impl Into<String>, items: Vec<NavItem>) -> Self {
        Self {
            a_letter_from: Some(letter.into()),
            menu_items: Some(items.into_iter().map(Some).collect()),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load content from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| SlidenavError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Letter text, empty when absent
    pub fn letter(&self) -> &str {
        self.a_letter_from.as_deref().unwrap_or_default()
    }

    /// Present items in input order
    pub fn items(&self) -> impl Iterator<Item = &NavItem> {
        self.menu_items.iter().flatten().flatten()
    }
}

/// A clickable entry of the overlay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuLink {
    pub label: String,
    pub path: String,
}

/// One rendered row of the overlay
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    Link(MenuLink),
    Heading(String),
}

/// The overlay's content, ready to draw
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuView {
    entries: Vec<MenuEntry>,
}

impl MenuView {
    /// About link, then the letter heading, then one link per item
    pub fn build(data: &MenuData, labels: &MenuLabels) -> Self {
        let mut entries = Vec::with_capacity(2 + data.items().count());
        entries.push(MenuEntry::Link(MenuLink {
            label: labels.about.clone(),
            path: ABOUT_PATH.to_string(),
        }));
        entries.push(MenuEntry::Heading(data.letter().to_string()));
        entries.extend(data.items().map(|item| {
            MenuEntry::Link(MenuLink {
                label: item.title.clone(),
                path: item.path(),
            })
        }));
        Self { entries }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn links(&self) -> impl Iterator<Item = &MenuLink> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Link(link) => Some(link),
            MenuEntry::Heading(_) => None,
        })
    }

    pub fn heading(&self) -> Option<&str> {
        self.entries.iter().find_map(|entry| match entry {
            MenuEntry::Heading(text) => Some(text.as_str()),
            MenuEntry::Link(_) => None,
        })
    }

    /// Find a link by its target path
    pub fn link_to(&self, path: &str) -> Option<&MenuLink> {
        self.links().find(|link| link.path == path)
    }
}
