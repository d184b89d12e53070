//! Crate-wide error type
//!
//! The simulation itself is total; everything here comes from startup
//! (settings, assets, window, GPU) or from crate placement giving up.

use std::path::PathBuf;

/// Errors that can abort the game
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rejection sampling ran out of attempts
    #[error("could not place crate {index} after {attempts} attempts")]
    CratePlacement { index: usize, attempts: u32 },

    /// Arena leaves no room between the spawn margins
    #[error("arena {width}x{height} is too small to place crates")]
    ArenaTooSmall { width: u32, height: u32 },

    /// Texture file could not be read or decoded
    #[error("failed to load asset {path:?}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Settings file exists but could not be read
    #[error("failed to read settings {path:?}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid JSON for `Settings`
    #[error("invalid settings: {0}")]
    SettingsParse(#[from] serde_json::Error),

    /// Event loop creation or run failure
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Window creation failure
    #[error("window error: {0}")]
    Window(#[from] winit::error::OsError),

    /// GPU adapter/device/surface setup failure
    #[error("graphics error: {0}")]
    Graphics(String),
}

pub type Result<T> = std::result::Result<T, Error>;
