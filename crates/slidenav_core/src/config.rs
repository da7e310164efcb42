//! Slidenav configuration
//!
//! Loaded from a TOML file; every key is optional.
//!
//! ```toml
//! default_locale = "en"
//! target_fps = 120
//!
//! [enter]
//! duration_ms = 700
//! easing = "power2.out"
//!
//! [exit]
//! duration_ms = 700
//! easing = "power2.in"
//!
//! [locales.pt]
//! open = "Menu"
//! close = "Fechar"
//! about = "Sobre"
//! ```

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use slidenav_animation::{
    Easing, TargetOffset, TransitionRequest, DEFAULT_DURATION_MS, DEFAULT_TARGET_FPS,
};

use crate::controller::OverlayTimings;
use crate::error::{Result, SlidenavError};
use crate::locale::{LabelCatalog, MenuLabels, DEFAULT_LOCALE};

/// Duration and curve of one overlay movement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TransitionConfig {
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u32,
    #[serde(default)]
    pub easing: Easing,
}

fn default_duration_ms() -> u32 {
    DEFAULT_DURATION_MS
}

fn default_enter() -> TransitionConfig {
    TransitionConfig {
        duration_ms: DEFAULT_DURATION_MS,
        easing: Easing::Power2Out,
    }
}

fn default_exit() -> TransitionConfig {
    TransitionConfig {
        duration_ms: DEFAULT_DURATION_MS,
        easing: Easing::Power2In,
    }
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

fn default_target_fps() -> u32 {
    DEFAULT_TARGET_FPS
}

/// Partial labels for one locale; missing keys come from the built-in
/// entry for that locale, or from the default locale
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LabelOverrides {
    #[serde(default)]
    pub open: Option<String>,
    #[serde(default)]
    pub close: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
}

impl LabelOverrides {
    fn apply(&self, base: &MenuLabels) -> MenuLabels {
        MenuLabels {
            open: self.open.clone().unwrap_or_else(|| base.open.clone()),
            close: self.close.clone().unwrap_or_else(|| base.close.clone()),
            about: self.about.clone().unwrap_or_else(|| base.about.clone()),
        }
    }
}

/// Top-level configuration
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SlidenavConfig {
    /// Locale used when the host's tag has no labels
    #[serde(default = "default_locale")]
    pub default_locale: String,
    /// Frame rate of the background transition thread
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    #[serde(default = "default_enter")]
    pub enter: TransitionConfig,
    #[serde(default = "default_exit")]
    pub exit: TransitionConfig,
    #[serde(default)]
    pub locales: IndexMap<String, LabelOverrides>,
}

impl Default for SlidenavConfig {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            target_fps: default_target_fps(),
            enter: default_enter(),
            exit: default_exit(),
            locales: IndexMap::new(),
        }
    }
}

impl SlidenavConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| SlidenavError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SlidenavConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_locale.trim().is_empty() {
            return Err(SlidenavError::InvalidConfig(
                "default_locale must not be empty".to_string(),
            ));
        }
        if self.target_fps == 0 {
            return Err(SlidenavError::InvalidConfig(
                "target_fps must be greater than zero".to_string(),
            ));
        }
        // The default locale must resolve to a catalog entry
        self.label_catalog().map(|_| ())
    }

    /// Built-in labels with this file's overrides applied
    pub fn label_catalog(&self) -> Result<LabelCatalog> {
        let mut catalog = LabelCatalog::builtin();
        for (locale, overrides) in &self.locales {
            let base = catalog
                .get(locale)
                .cloned()
                .unwrap_or_else(|| catalog.labels(&self.default_locale).clone());
            catalog.insert(locale, overrides.apply(&base));
        }
        catalog.set_default_locale(&self.default_locale)?;
        Ok(catalog)
    }

    /// Transition requests for the controller
    pub fn timings(&self) -> OverlayTimings {
        OverlayTimings {
            enter: TransitionRequest::new(
                TargetOffset::OnScreen,
                self.enter.duration_ms,
                self.enter.easing,
            ),
            exit: TransitionRequest::new(
                TargetOffset::OffScreenUp,
                self.exit.duration_ms,
                self.exit.easing,
            ),
        }
    }
}
