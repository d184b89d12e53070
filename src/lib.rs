//! Tank Crates - A small top-down tank arcade game
//!
//! Core modules:
//! - `math`: Vector/matrix types for 2D rotate-and-translate transforms
//! - `sim`: Deterministic simulation (tank, bullets, crates, tracks)
//! - `renderer`: Sprite scene building and the wgpu pipeline that draws it
//! - `platform`: winit window, keyboard input and frame pacing
//! - `settings`: JSON-backed configuration

pub mod error;
pub mod math;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Default window dimensions
    pub const WINDOW_WIDTH: u32 = 1280;
    pub const WINDOW_HEIGHT: u32 = 720;
    /// Default frame rate cap
    pub const TARGET_FPS: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Tank spawn point
    pub const TANK_START_X: f32 = 400.0;
    pub const TANK_START_Y: f32 = 300.0;
    /// Movement per tick while W/S is held
    pub const TANK_MOVE_STEP: f32 = 2.0;
    /// Body rotation per tick while A/D is held (degrees)
    pub const TANK_TURN_STEP: f32 = 2.0;
    /// Turret rotation per tick while Q/E is held (degrees)
    pub const TURRET_TURN_STEP: f32 = 2.0;
    /// Tank sprite draw scale
    pub const TANK_SCALE: f32 = 1.25;
    /// Turret pivot sits this fraction of the body width ahead of center
    pub const TURRET_PIVOT_FRACTION: f32 = 0.05;
    /// Pulls the bullet spawn point back toward the turret
    pub const MUZZLE_TWEAK: f32 = 10.0;

    /// Bullet travel per tick
    pub const BULLET_SPEED: f32 = 6.0;
    /// Bullet sprite draw scale
    pub const BULLET_SCALE: f32 = 1.15;
    /// Side of the square bullet hit box
    pub const BULLET_HITBOX: f32 = 10.0;

    /// Scale for background, crates and explosions
    pub const GLOBAL_SCALE: f32 = 1.15;

    /// Crate defaults
    pub const CRATE_COUNT: usize = 3;
    pub const CRATE_MIN_DIST: f32 = 150.0;
    /// Crates never spawn closer than this to the arena edge
    pub const CRATE_MARGIN: i32 = 100;
    /// Seconds an explosion stays on screen
    pub const EXPLOSION_DURATION: f32 = 0.5;

    /// Seconds before a track mark disappears
    pub const TRACK_LIFETIME: f64 = 10.0;
    /// Peak track opacity
    pub const TRACK_OPACITY: f32 = 0.2;
}

/// Convert degrees (entity rotation state) to radians (math layer)
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Convert radians back to degrees for sprite rotation
#[inline]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians * 180.0 / std::f32::consts::PI
}
