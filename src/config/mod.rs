//! Persistent presentation preferences, stored beside the ledger data.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::BudgetError;

const SETTINGS_FILE: &str = "settings.json";

/// User-facing presentation preferences. Peripheral to the ledger itself
/// but loaded and saved through the same storage conventions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Bottom navigation bar opacity in percent, 0 to 100.
    pub bottom_nav_opacity: u8,
    pub theme_id: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bottom_nav_opacity: 100,
            theme_id: "dark-graphite".into(),
        }
    }
}

impl Settings {
    fn clamped(mut self) -> Self {
        self.bottom_nav_opacity = self.bottom_nav_opacity.min(100);
        self
    }
}

/// Loads and saves [`Settings`] as one JSON file.
pub struct SettingsManager {
    path: PathBuf,
}

impl SettingsManager {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, BudgetError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            path: dir.join(SETTINGS_FILE),
        })
    }

    pub fn new_default() -> Result<Self, BudgetError> {
        Self::new(Self::default_dir())
    }

    /// Default settings directory under the platform config dir.
    pub fn default_dir() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("home-budget")
    }

    /// Reads the stored settings, falling back to defaults when the file
    /// has never been written. Out-of-range opacity values are clamped.
    pub fn load(&self) -> Result<Settings, BudgetError> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let settings: Settings = serde_json::from_str(&data)?;
        Ok(settings.clamped())
    }

    pub fn save(&self, settings: &Settings) -> Result<(), BudgetError> {
        let json = serde_json::to_string_pretty(settings)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
