//! Sprite kinds and their pixel sizes
//!
//! Collision boxes, the tank radius and the muzzle distance all derive from
//! sprite dimensions, so the simulation carries the sizes as plain data.
//! The renderer fills them in from the decoded textures.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Every texture the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    TankBody,
    Turret,
    Bullet,
    Ground,
    Track,
    Crate,
    Explosion,
}

impl Sprite {
    /// All sprites, in load order
    pub const ALL: [Sprite; 7] = [
        Sprite::TankBody,
        Sprite::Turret,
        Sprite::Bullet,
        Sprite::Ground,
        Sprite::Track,
        Sprite::Crate,
        Sprite::Explosion,
    ];

    /// Dense index for per-sprite tables
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Asset file name under the asset directory
    pub fn file_name(self) -> &'static str {
        match self {
            Sprite::TankBody => "tankbody.png",
            Sprite::Turret => "tankturret.png",
            Sprite::Bullet => "bullet.png",
            Sprite::Ground => "sand.png",
            Sprite::Track => "tracks.png",
            Sprite::Crate => "crate.png",
            Sprite::Explosion => "explosion.png",
        }
    }
}

/// Unscaled pixel size of each sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSizes {
    sizes: [Vec2; 7],
}

impl SpriteSizes {
    pub fn new(sizes: [Vec2; 7]) -> Self {
        Self { sizes }
    }

    /// Build from a lookup, called once per sprite in `Sprite::ALL` order
    pub fn from_fn(mut size_of: impl FnMut(Sprite) -> Vec2) -> Self {
        Self {
            sizes: Sprite::ALL.map(&mut size_of),
        }
    }

    #[inline]
    pub fn get(&self, sprite: Sprite) -> Vec2 {
        self.sizes[sprite.index()]
    }

    pub fn set(&mut self, sprite: Sprite, size: Vec2) {
        self.sizes[sprite.index()] = size;
    }
}

impl Default for SpriteSizes {
    /// Sizes of the stock art, used until real textures are loaded
    fn default() -> Self {
        Self::new([
            Vec2::new(83.0, 78.0),  // TankBody
            Vec2::new(24.0, 52.0),  // Turret
            Vec2::new(12.0, 26.0),  // Bullet
            Vec2::new(128.0, 128.0), // Ground
            Vec2::new(42.0, 12.0),  // Track
            Vec2::new(56.0, 56.0),  // Crate
            Vec2::new(96.0, 96.0),  // Explosion
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, sprite) in Sprite::ALL.iter().enumerate() {
            assert_eq!(sprite.index(), i);
        }
    }

    #[test]
    fn test_from_fn_and_set() {
        let mut sizes = SpriteSizes::from_fn(|s| Vec2::splat(s.index() as f32));
        assert_eq!(sizes.get(Sprite::Crate), Vec2::splat(5.0));
        sizes.set(Sprite::Crate, Vec2::new(10.0, 20.0));
        assert_eq!(sizes.get(Sprite::Crate), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_file_names_are_unique() {
        let mut names: Vec<_> = Sprite::ALL.iter().map(|s| s.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Sprite::ALL.len());
    }
}
