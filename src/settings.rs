//! Game settings
//!
//! Read from a JSON file next to the executable's working directory. Every
//! field is optional in the file; missing ones take their defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Environment variable that overrides the settings path
pub const SETTINGS_ENV: &str = "TANK_CRATES_SETTINGS";
/// Default settings file name
pub const SETTINGS_FILE: &str = "tank_crates.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Window ===
    pub window_width: u32,
    pub window_height: u32,
    pub title: String,
    /// Frame rate cap, also the simulation rate
    pub target_fps: u32,
    /// Append the measured FPS to the window title
    pub show_fps: bool,

    // === Assets ===
    /// Directory holding the sprite PNGs
    pub asset_dir: PathBuf,

    // === Gameplay ===
    /// Crate layout seed; `None` picks one from the clock
    pub seed: Option<u64>,
    pub crate_count: usize,
    pub crate_min_dist: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            title: "Tank Game".to_string(),
            target_fps: TARGET_FPS,
            show_fps: false,

            asset_dir: PathBuf::from("assets"),

            seed: None,
            crate_count: CRATE_COUNT,
            crate_min_dist: CRATE_MIN_DIST,
        }
    }
}

impl Settings {
    /// Path the settings are read from
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load() -> Self {
        let path = Self::path();
        match Self::load_from(&path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings: {}", e);
                Self::default()
            }
        }
    }

    /// Read settings from `path`. A missing file is `Ok(None)`.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::SettingsIo {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::from_json(&json).map(Some)
    }

    /// Parse settings from a JSON string, sanitizing out-of-range values
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Clamp values the game cannot run with
    fn sanitize(&mut self) {
        self.target_fps = self.target_fps.clamp(1, 1000);
        self.window_width = self.window_width.max(1);
        self.window_height = self.window_height.max(1);
        if !self.crate_min_dist.is_finite() || self.crate_min_dist < 0.0 {
            self.crate_min_dist = CRATE_MIN_DIST;
        }
    }

    /// Seconds per simulation step
    pub fn sim_dt(&self) -> f32 {
        1.0 / self.target_fps as f32
    }

    /// Full path of an asset file
    pub fn asset_path(&self, file_name: &str) -> PathBuf {
        self.asset_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.window_width, 1280);
        assert_eq!(settings.window_height, 720);
        assert_eq!(settings.target_fps, 60);
        assert_eq!(settings.crate_count, 3);
        assert!((settings.sim_dt() - 1.0 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "target_fps": 30 }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.target_fps, 30);
        assert_eq!(settings.window_width, WINDOW_WIDTH);
        assert_eq!(settings.asset_dir, PathBuf::from("assets"));
    }

    #[test]
    fn test_sanitize() {
        let settings = Settings::from_json(r#"{ "target_fps": 0, "crate_min_dist": -5.0 }"#).unwrap();
        assert_eq!(settings.target_fps, 1);
        assert_eq!(settings.crate_min_dist, CRATE_MIN_DIST);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(Error::SettingsParse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_none() {
        let path = Path::new("definitely/not/here/tank_crates.json");
        assert!(Settings::load_from(path).unwrap().is_none());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = std::env::temp_dir().join(format!("tank_crates_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(SETTINGS_FILE);

        let settings = Settings {
            seed: Some(1234),
            show_fps: true,
            ..Default::default()
        };
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), Some(settings));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_asset_path() {
        let settings = Settings::default();
        assert_eq!(
            settings.asset_path("crate.png"),
            PathBuf::from("assets").join("crate.png")
        );
    }
}
