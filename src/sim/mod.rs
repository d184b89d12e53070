//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, time comes from `GameState::time`
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod bullet;
pub mod collision;
pub mod sprite;
pub mod state;
pub mod tank;
pub mod tick;

pub use bullet::Bullet;
pub use collision::{Rect, circle_contains};
pub use sprite::{Sprite, SpriteSizes};
pub use state::{
    CrateState, DestroyCause, GameEvent, GameState, MAX_PLACEMENT_ATTEMPTS, TrackPoint,
    place_crates,
};
pub use tank::Tank;
pub use tick::{TickInput, tick};
