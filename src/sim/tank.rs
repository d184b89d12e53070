//! The player's tank
//!
//! Rotations are stored in degrees (the unit the sprites are drawn with) and
//! converted to radians only when a `Matrix3` is built.

use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::sprite::{Sprite, SpriteSizes};
use super::state::TrackPoint;
use super::tick::TickInput;
use crate::consts::*;
use crate::deg_to_rad;
use crate::math::{Matrix3, Vector3};

/// Player tank: a body that drives and a turret that aims independently
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tank {
    pub position: Vector3,
    /// Body rotation (degrees)
    pub rotation: f32,
    /// Turret rotation relative to the body (degrees)
    pub turret_rotation: f32,
}

impl Default for Tank {
    fn default() -> Self {
        Self::at(Vector3::new(TANK_START_X, TANK_START_Y, 0.0))
    }
}

impl Tank {
    pub fn at(position: Vector3) -> Self {
        Self {
            position,
            rotation: 0.0,
            turret_rotation: 0.0,
        }
    }

    /// Combined body + turret heading (degrees)
    #[inline]
    pub fn heading(&self) -> f32 {
        self.rotation + self.turret_rotation
    }

    /// Apply one tick of input. Returns true if a track mark was left.
    ///
    /// Movement uses the body rotation from the start of the tick, so turning
    /// and driving in the same tick moves along the old heading.
    pub fn update(&mut self, input: &TickInput, now: f64, tracks: &mut Vec<TrackPoint>) -> bool {
        let body = Matrix3::from_rotation_z(deg_to_rad(self.rotation));
        let mut leave_track = false;

        if input.turn_left {
            self.rotation -= TANK_TURN_STEP;
            leave_track = true;
        }
        if input.turn_right {
            self.rotation += TANK_TURN_STEP;
            leave_track = true;
        }

        if input.forward {
            self.position += body.multiply(Vector3::new(TANK_MOVE_STEP, 0.0, 0.0));
            leave_track = true;
        }
        if input.backward {
            self.position += body.multiply(Vector3::new(-TANK_MOVE_STEP, 0.0, 0.0));
            leave_track = true;
        }

        if leave_track {
            tracks.push(TrackPoint {
                position: Vector3::new(self.position.x, self.position.y, 0.0),
                timestamp: now,
                rotation: self.rotation,
            });
        }

        // Turret never leaves tracks
        if input.turret_left {
            self.turret_rotation -= TURRET_TURN_STEP;
        }
        if input.turret_right {
            self.turret_rotation += TURRET_TURN_STEP;
        }

        leave_track
    }

    /// World position of the turret pivot, slightly ahead of the body center
    pub fn turret_pivot(&self, sizes: &SpriteSizes) -> Vector3 {
        let offset = sizes.get(Sprite::TankBody).x * TURRET_PIVOT_FRACTION * TANK_SCALE;
        let body = Matrix3::from_rotation_z(deg_to_rad(self.rotation));
        body.multiply(Vector3::new(offset, 0.0, 1.0)) + self.position
    }

    /// Distance from the pivot to the bullet spawn point
    pub fn muzzle_distance(sizes: &SpriteSizes) -> f32 {
        sizes.get(Sprite::Turret).y * TANK_SCALE + sizes.get(Sprite::Bullet).y * 0.5 * TANK_SCALE
            - MUZZLE_TWEAK
    }

    /// Spawn a bullet at the turret tip along the combined heading
    pub fn fire(&self, sizes: &SpriteSizes) -> Bullet {
        let heading = deg_to_rad(self.heading());
        let dir = Vector3::from_angle(heading);
        let spawn = self.turret_pivot(sizes) + dir * Self::muzzle_distance(sizes);
        Bullet::new(spawn, heading)
    }

    /// Radius used for ramming crates
    pub fn collision_radius(sizes: &SpriteSizes) -> f32 {
        let widest = sizes
            .get(Sprite::TankBody)
            .x
            .max(sizes.get(Sprite::Turret).x);
        widest * GLOBAL_SCALE * 0.5
    }
}
