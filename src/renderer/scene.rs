//! Scene building: game state to an ordered list of sprite draws
//!
//! Pure and GPU-free. Draws are emitted back to front: ground, tracks,
//! crates and explosions, tank body, turret, bullets.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{GameState, Rect, Sprite, SpriteSizes, Tank};

pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// One textured quad.
///
/// `dest` is positioned at `(x, y)` and rotated `rotation` degrees
/// (clockwise on screen) around `origin`, which is measured from the
/// destination's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteDraw {
    pub sprite: Sprite,
    /// Source rectangle in texture pixels
    pub src: Rect,
    pub dest: Rect,
    pub origin: Vec2,
    /// Degrees
    pub rotation: f32,
    /// RGBA multiplier, alpha included
    pub tint: [f32; 4],
}

impl SpriteDraw {
    /// Whole texture into `dest`, rotated around `origin`
    pub fn pro(
        sprite: Sprite,
        sizes: &SpriteSizes,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: [f32; 4],
    ) -> Self {
        let size = sizes.get(sprite);
        Self {
            sprite,
            src: Rect::new(0.0, 0.0, size.x, size.y),
            dest,
            origin,
            rotation,
            tint,
        }
    }

    /// Whole texture with its top-left at `pos`, uniformly scaled, unrotated
    pub fn scaled(sprite: Sprite, sizes: &SpriteSizes, pos: Vec2, scale: f32) -> Self {
        let size = sizes.get(sprite) * scale;
        Self::pro(
            sprite,
            sizes,
            Rect::from_pos_size(pos, size),
            Vec2::ZERO,
            0.0,
            WHITE,
        )
    }
}

/// Build the full frame for `state`
pub fn build_scene(state: &GameState) -> Vec<SpriteDraw> {
    let sizes = &state.sizes;
    let mut draws = Vec::with_capacity(64 + state.tracks.len() + state.bullets.len());

    draw_ground(&mut draws, sizes, state.arena);
    draw_tracks(&mut draws, state);
    draw_crates(&mut draws, state);
    draw_tank(&mut draws, &state.tank, sizes);

    for bullet in &state.bullets {
        let size = sizes.get(Sprite::Bullet) * BULLET_SCALE;
        draws.push(SpriteDraw::pro(
            Sprite::Bullet,
            sizes,
            Rect::new(bullet.position.x, bullet.position.y, size.x, size.y),
            size * 0.5,
            // Sprite art points up
            bullet.heading_degrees() + 90.0,
            WHITE,
        ));
    }

    draws
}

/// Tile the ground texture over the arena
fn draw_ground(draws: &mut Vec<SpriteDraw>, sizes: &SpriteSizes, arena: Vec2) {
    let tile = sizes.get(Sprite::Ground);
    if tile.x < 1.0 || tile.y < 1.0 {
        return;
    }
    let mut y = 0.0;
    while y < arena.y {
        let mut x = 0.0;
        while x < arena.x {
            draws.push(SpriteDraw::scaled(
                Sprite::Ground,
                sizes,
                Vec2::new(x, y),
                GLOBAL_SCALE,
            ));
            x += tile.x;
        }
        y += tile.y;
    }
}

fn draw_tracks(draws: &mut Vec<SpriteDraw>, state: &GameState) {
    let sizes = &state.sizes;
    let size = sizes.get(Sprite::Track);
    // Expiry happens in the tick; draw whatever is left
    for track in &state.tracks {
        let mut tint = WHITE;
        tint[3] = track.alpha(state.time);
        draws.push(SpriteDraw::pro(
            Sprite::Track,
            sizes,
            Rect::new(track.position.x, track.position.y, size.x, size.y),
            size * 0.5,
            track.rotation - 90.0,
            tint,
        ));
    }
}

fn draw_crates(draws: &mut Vec<SpriteDraw>, state: &GameState) {
    let sizes = &state.sizes;
    let crate_size = sizes.get(Sprite::Crate) * GLOBAL_SCALE;
    let blast_size = sizes.get(Sprite::Explosion) * GLOBAL_SCALE;

    for crate_state in &state.crates {
        if !crate_state.destroyed {
            draws.push(SpriteDraw::scaled(
                Sprite::Crate,
                sizes,
                crate_state.pos,
                GLOBAL_SCALE,
            ));
        }
        if crate_state.show_explosion {
            // Centered over where the crate was
            let pos = crate_state.pos + (crate_size - blast_size) * 0.5;
            draws.push(SpriteDraw::scaled(
                Sprite::Explosion,
                sizes,
                pos,
                GLOBAL_SCALE,
            ));
        }
    }
}

fn draw_tank(draws: &mut Vec<SpriteDraw>, tank: &Tank, sizes: &SpriteSizes) {
    let body = sizes.get(Sprite::TankBody) * TANK_SCALE;
    draws.push(SpriteDraw::pro(
        Sprite::TankBody,
        sizes,
        Rect::new(tank.position.x, tank.position.y, body.x, body.y),
        body * 0.5,
        tank.rotation - 90.0,
        WHITE,
    ));

    // Turret hangs from the middle of its base edge
    let turret = sizes.get(Sprite::Turret) * TANK_SCALE;
    let pivot = tank.turret_pivot(sizes);
    draws.push(SpriteDraw::pro(
        Sprite::Turret,
        sizes,
        Rect::new(pivot.x, pivot.y, turret.x, turret.y),
        Vec2::new(turret.x * 0.5, 0.0),
        tank.heading() - 90.0,
        WHITE,
    ));
}
