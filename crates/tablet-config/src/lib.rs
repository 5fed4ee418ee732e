//! Tablet settings stored as TOML under the user's config directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tablet_input::geometry::Point;
use tablet_input::{SettingsProfile, TabletSettings};

/// Default config directory under `$XDG_CONFIG_HOME`.
const CONFIG_DIR: &str = "tablet-input";
/// Default config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolve the default config file path.
///
/// Returns `$XDG_CONFIG_HOME/tablet-input/config.toml` or
/// `~/.config/tablet-input/config.toml`.
#[must_use]
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}

/// Load the tablet configuration from a TOML file.
///
/// If `path` is `None`, reads from the default location.
/// Returns the default configuration if the file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: Option<&Path>) -> Result<InputConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    if !path.exists() {
        tracing::debug!(?path, "Config file not found, using defaults");
        return Ok(InputConfig::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;

    let config: InputConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;

    tracing::info!(?path, devices = config.device.len(), "Configuration loaded");
    Ok(config)
}

/// Save the tablet configuration to `path`, or the default location.
///
/// Uses atomic write (write to temp file, then rename). Creates the parent
/// directory if it does not exist.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save(config: &InputConfig, path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_path(),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config dir: {}", parent.display()))?;
    }

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;

    let tmp_path = path.with_extension("toml.tmp");
    std::fs::write(&tmp_path, contents)
        .with_context(|| format!("failed to write temp config: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, &path)
        .with_context(|| format!("failed to rename config: {}", path.display()))?;

    tracing::info!(?path, "Configuration saved");
    Ok(())
}

/// Tablet configuration loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Settings for every tablet without an override.
    pub tablet: TabletConfig,

    /// Per-device overrides, matched by diagnostic name.
    pub device: Vec<DeviceConfig>,
}

impl InputConfig {
    /// Convert into the settings the input core applies.
    ///
    /// A later `[[device]]` entry with the same name replaces an earlier one.
    #[must_use]
    pub fn profile(&self) -> SettingsProfile {
        let mut devices = HashMap::with_capacity(self.device.len());
        for entry in &self.device {
            if devices.insert(entry.name.clone(), entry.settings()).is_some() {
                tracing::warn!(name = %entry.name, "Duplicate device section, last one wins");
            }
        }

        SettingsProfile {
            default: self.tablet.settings(),
            devices,
        }
    }
}

/// Defaults applied to every tablet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabletConfig {
    /// Move the cursor by deltas instead of mapping the tablet onto the
    /// output.
    pub relative_input: bool,

    /// Top-left corner of the active area, in millimetres.
    pub active_area_position: [f64; 2],

    /// Size of the active area, in millimetres. Zero means the whole tablet.
    pub active_area_size: [f64; 2],
}

impl Default for TabletConfig {
    fn default() -> Self {
        Self {
            relative_input: false,
            active_area_position: [0.0, 0.0],
            active_area_size: [0.0, 0.0],
        }
    }
}

impl TabletConfig {
    fn settings(&self) -> TabletSettings {
        TabletSettings {
            relative_input: self.relative_input,
            active_area_position: point(self.active_area_position),
            active_area_size: point(self.active_area_size),
        }
    }
}

/// Override for one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Diagnostic name, e.g. `wacom-intuos-pro-m`.
    pub name: String,

    #[serde(flatten)]
    pub settings: TabletConfig,
}

impl DeviceConfig {
    fn settings(&self) -> TabletSettings {
        self.settings.settings()
    }
}

fn point([x, y]: [f64; 2]) -> Point {
    Point::new(x, y)
}
