//! Bullets fired from the tank turret

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::{BULLET_HITBOX, BULLET_SPEED};
use crate::math::{Matrix3, Vector3};
use crate::rad_to_deg;

/// A bullet travelling in a straight line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    /// World position
    pub position: Vector3,
    /// Travel direction (radians), fixed at spawn
    angle: f32,
    /// Units per tick
    speed: f32,
}

impl Bullet {
    pub fn new(position: Vector3, angle: f32) -> Self {
        Self::with_speed(position, angle, BULLET_SPEED)
    }

    pub fn with_speed(position: Vector3, angle: f32, speed: f32) -> Self {
        Self {
            position,
            angle,
            speed,
        }
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Heading in degrees for sprite rotation
    pub fn heading_degrees(&self) -> f32 {
        rad_to_deg(self.angle)
    }

    /// Advance one tick along the travel angle
    pub fn update(&mut self) {
        let rot = Matrix3::from_rotation_z(self.angle);
        let local_step = Vector3::new(self.speed, 0.0, 0.0);
        self.position += rot.multiply(local_step);
    }

    /// True once the bullet has left `[0, width] x [0, height]`
    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        let p = self.position;
        p.x < 0.0 || p.x > width || p.y < 0.0 || p.y > height
    }

    /// Hit box anchored at the bullet position
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.position.x,
            self.position.y,
            BULLET_HITBOX,
            BULLET_HITBOX,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_update_angle_zero_moves_along_x() {
        let start = Vector3::new(100.0, 200.0, 0.0);
        let mut bullet = Bullet::with_speed(start, 0.0, 7.5);
        bullet.update();
        assert_eq!(bullet.position - start, Vector3::new(7.5, 0.0, 0.0));
    }

    #[test]
    fn test_update_follows_angle() {
        let mut bullet = Bullet::new(Vector3::ZERO, FRAC_PI_2);
        bullet.update();
        assert!(bullet.position.x.abs() < 1e-5);
        assert!((bullet.position.y - BULLET_SPEED).abs() < 1e-5);

        let mut bullet = Bullet::new(Vector3::ZERO, PI);
        bullet.update();
        bullet.update();
        assert!((bullet.position.x + 2.0 * BULLET_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_off_screen() {
        let bullet = Bullet::new(Vector3::new(-1.0, 50.0, 0.0), 0.0);
        assert!(bullet.is_off_screen(800.0, 600.0));

        let bullet = Bullet::new(Vector3::new(400.0, 300.0, 0.0), 0.0);
        assert!(!bullet.is_off_screen(800.0, 600.0));

        // Edges are still on screen
        let bullet = Bullet::new(Vector3::new(800.0, 600.0, 0.0), 0.0);
        assert!(!bullet.is_off_screen(800.0, 600.0));
        let bullet = Bullet::new(Vector3::new(400.0, 600.5, 0.0), 0.0);
        assert!(bullet.is_off_screen(800.0, 600.0));
    }

    #[test]
    fn test_heading_and_bounds() {
        let bullet = Bullet::new(Vector3::new(5.0, 6.0, 0.0), FRAC_PI_2);
        assert!((bullet.heading_degrees() - 90.0).abs() < 1e-4);
        assert_eq!(bullet.bounds(), Rect::new(5.0, 6.0, BULLET_HITBOX, BULLET_HITBOX));
    }
}
