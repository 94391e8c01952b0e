//! Configuration management

use crate::timeline::{Timestamp, OFFSET_STEP_MS};
use crate::{CuebindError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Names of the bindings that can be switched off in `[bindings]`
pub const BINDING_NAMES: [&str; 11] = [
    "copy",
    "export",
    "seek_to_cue",
    "seek_to_current_cue",
    "seek_backward_or_forward",
    "offset_to_cue",
    "adjust_offset",
    "toggle_subtitles",
    "toggle_track_in_video",
    "toggle_track_in_list",
    "play",
];

/// Persistent settings (~/.cuebind.cfg)
///
/// Chord definitions are fixed; the file only decides which bindings are
/// installed, their listener phase, and the timeline step sizes.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path
    path: PathBuf,
}

impl Config {
    /// Load configuration from the default path, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| CuebindError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| CuebindError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Configuration with defaults only, never written to disk
    pub fn in_memory() -> Self {
        Self {
            ini: Self::default_config(),
            path: PathBuf::new(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| CuebindError::Config(format!("Failed to save config: {}", e)))
    }

    /// Default config file path (~/.cuebind.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cuebind.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        {
            let mut bindings = ini.with_section(Some("bindings"));
            for name in BINDING_NAMES {
                bindings.set(name, "true");
            }
            bindings.set("capture", "false");
        }

        ini.with_section(Some("timeline"))
            .set("offset_step_ms", OFFSET_STEP_MS.to_string())
            .set("seek_step_ms", "10000");

        ini.with_section(Some("clipboard")).set("enabled", "false");

        ini
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    /// Is the named binding installed?
    pub fn binding_enabled(&self, name: &str) -> bool {
        self.get_bool("bindings", name, true)
    }

    /// Should listeners run in the capture phase, ahead of the page's own?
    pub fn capture(&self) -> bool {
        self.get_bool("bindings", "capture", false)
    }

    /// Milliseconds added or removed by one offset step
    pub fn offset_step_ms(&self) -> Timestamp {
        let step = self.get_int("timeline", "offset_step_ms", OFFSET_STEP_MS);
        if step > 0 {
            step
        } else {
            OFFSET_STEP_MS
        }
    }

    /// Milliseconds moved by a fixed-step seek
    pub fn seek_step_ms(&self) -> Timestamp {
        let step = self.get_int("timeline", "seek_step_ms", 10_000);
        if step > 0 {
            step
        } else {
            10_000
        }
    }

    /// Should copied cues also go to the system clipboard?
    pub fn clipboard_enabled(&self) -> bool {
        self.get_bool("clipboard", "enabled", false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::in_memory();
        for name in BINDING_NAMES {
            assert!(config.binding_enabled(name), "{} should default on", name);
        }
        assert!(!config.capture());
        assert_eq!(config.offset_step_ms(), 100);
        assert_eq!(config.seek_step_ms(), 10_000);
        assert!(!config.clipboard_enabled());
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let mut config = Config::in_memory();
        config.set("bindings", "play", "maybe");
        config.set("timeline", "offset_step_ms", "-5");
        assert!(config.binding_enabled("play"));
        assert_eq!(config.offset_step_ms(), 100);
    }
}
