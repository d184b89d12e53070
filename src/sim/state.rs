//! Game state and core simulation types
//!
//! Everything the tick mutates lives in `GameState`. Track marks are purely
//! visual and are skipped when the state is serialized.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::sprite::{Sprite, SpriteSizes};
use super::tank::Tank;
use crate::consts::*;
use crate::error::{Error, Result};
use crate::math::Vector3;

/// Rejection sampling gives up on a crate after this many candidates
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// What destroyed a crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyCause {
    Bullet,
    Rammed,
}

/// Things that happened during a tick, for logging and effects
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BulletFired { position: Vector3, heading: f32 },
    CrateDestroyed { index: usize, cause: DestroyCause },
    ExplosionFinished { index: usize },
}

/// A timestamped track mark left behind by the tank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub position: Vector3,
    /// Simulation time (seconds) when the mark was laid
    pub timestamp: f64,
    /// Body rotation at the time (degrees)
    pub rotation: f32,
}

impl TrackPoint {
    #[inline]
    pub fn age(&self, now: f64) -> f64 {
        now - self.timestamp
    }

    /// Still visible at `now`. A mark exactly `TRACK_LIFETIME` old is kept.
    #[inline]
    pub fn is_alive(&self, now: f64) -> bool {
        self.age(now) <= TRACK_LIFETIME
    }

    /// Opacity fading linearly from `TRACK_OPACITY` to zero over its lifetime
    pub fn alpha(&self, now: f64) -> f32 {
        let remaining = 1.0 - (self.age(now) / TRACK_LIFETIME) as f32;
        remaining.clamp(0.0, 1.0) * TRACK_OPACITY
    }
}

/// A destructible crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrateState {
    /// Top-left corner
    pub pos: Vec2,
    pub destroyed: bool,
    pub show_explosion: bool,
    /// Seconds of explosion left
    pub timer: f32,
}

impl CrateState {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            destroyed: false,
            show_explosion: false,
            timer: 0.0,
        }
    }

    /// Destroy the crate and start its explosion.
    ///
    /// Returns false (and changes nothing) if it was already destroyed.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.show_explosion = true;
        self.timer = EXPLOSION_DURATION;
        true
    }

    /// Count down the explosion. Returns true on the tick it ends.
    pub fn update_explosion(&mut self, dt: f32) -> bool {
        if !self.show_explosion {
            return false;
        }
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.show_explosion = false;
            return true;
        }
        false
    }

    /// Bullet hit box: the unscaled sprite at the crate position
    pub fn bounds(&self, sizes: &SpriteSizes) -> super::collision::Rect {
        super::collision::Rect::from_pos_size(self.pos, sizes.get(Sprite::Crate))
    }

    /// Center of the crate as drawn (scaled)
    pub fn center(&self, sizes: &SpriteSizes) -> Vec2 {
        self.pos + sizes.get(Sprite::Crate) * GLOBAL_SCALE * 0.5
    }
}

/// Place `count` crates by rejection sampling.
///
/// Candidates are whole-pixel positions at least `CRATE_MARGIN` from the
/// arena edges. Each must be `min_dist` from `avoid` and from every crate
/// already placed.
pub fn place_crates<R: Rng>(
    rng: &mut R,
    avoid: Vec2,
    arena: Vec2,
    count: usize,
    min_dist: f32,
) -> Result<Vec<CrateState>> {
    let (lo_x, hi_x) = (CRATE_MARGIN, arena.x as i32 - CRATE_MARGIN);
    let (lo_y, hi_y) = (CRATE_MARGIN, arena.y as i32 - CRATE_MARGIN);
    if count > 0 && (hi_x <= lo_x || hi_y <= lo_y) {
        return Err(Error::ArenaTooSmall {
            width: arena.x as u32,
            height: arena.y as u32,
        });
    }

    let mut crates: Vec<CrateState> = Vec::with_capacity(count);
    for index in 0..count {
        let mut placed = None;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let candidate = Vec2::new(
                rng.random_range(lo_x..hi_x) as f32,
                rng.random_range(lo_y..hi_y) as f32,
            );
            let clear_of_tank = candidate.distance(avoid) >= min_dist;
            let clear_of_crates = crates
                .iter()
                .all(|other| candidate.distance(other.pos) >= min_dist);
            if clear_of_tank && clear_of_crates {
                placed = Some(candidate);
                break;
            }
        }

        match placed {
            Some(pos) => crates.push(CrateState::new(pos)),
            None => {
                return Err(Error::CratePlacement {
                    index,
                    attempts: MAX_PLACEMENT_ATTEMPTS,
                });
            }
        }
    }

    Ok(crates)
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the crate layout was generated from
    pub seed: u64,
    /// Simulation clock (seconds)
    pub time: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Playable area in pixels (the window size)
    pub arena: Vec2,
    /// Sprite dimensions used for collision and spawning
    pub sizes: SpriteSizes,
    pub tank: Tank,
    pub bullets: Vec<Bullet>,
    pub crates: Vec<CrateState>,
    /// Track marks, oldest first
    #[serde(skip)]
    pub tracks: Vec<TrackPoint>,
}

impl GameState {
    /// New game with the default crate layout rules
    pub fn new(seed: u64, arena: Vec2, sizes: SpriteSizes) -> Result<Self> {
        Self::with_crates(seed, arena, sizes, CRATE_COUNT, CRATE_MIN_DIST)
    }

    /// New game with a custom crate count and spacing
    pub fn with_crates(
        seed: u64,
        arena: Vec2,
        sizes: SpriteSizes,
        crate_count: usize,
        crate_min_dist: f32,
    ) -> Result<Self> {
        let tank = Tank::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let crates = place_crates(
            &mut rng,
            tank.position.xy(),
            arena,
            crate_count,
            crate_min_dist,
        )?;

        Ok(Self {
            seed,
            time: 0.0,
            time_ticks: 0,
            arena,
            sizes,
            tank,
            bullets: Vec::new(),
            crates,
            tracks: Vec::new(),
        })
    }

    /// Track the window size; bullets leave the screen at its edges
    pub fn resize(&mut self, width: f32, height: f32) {
        self.arena = Vec2::new(width, height);
    }

    /// Drop track marks older than `TRACK_LIFETIME`, preserving order
    pub fn expire_tracks(&mut self) -> usize {
        let now = self.time;
        let before = self.tracks.len();
        self.tracks.retain(|t| t.is_alive(now));
        before - self.tracks.len()
    }

    /// Crates still standing
    pub fn crates_remaining(&self) -> usize {
        self.crates.iter().filter(|c| !c.destroyed).count()
    }
}
