//! Fixed timestep simulation tick
//!
//! Advances the tank, bullets, crates and tracks by one step. Order matters:
//! tank, firing, bullets (with bullet/crate hits), ramming, explosion
//! timers, track expiry.

use super::collision::circle_contains;
use super::state::{DestroyCause, GameEvent, GameState};
use super::tank::Tank;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Rotate body counter-clockwise (A)
    pub turn_left: bool,
    /// Rotate body clockwise (D)
    pub turn_right: bool,
    /// Drive forward (W)
    pub forward: bool,
    /// Reverse (S)
    pub backward: bool,
    /// Rotate turret counter-clockwise (Q)
    pub turret_left: bool,
    /// Rotate turret clockwise (E)
    pub turret_right: bool,
    /// Fire, only set on the tick the key went down (Space)
    pub fire: bool,
}

/// Advance the game state by one fixed timestep of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    state.time_ticks += 1;
    state.time += dt as f64;
    let now = state.time;

    // Tank
    state.tank.update(input, now, &mut state.tracks);

    // Firing
    if input.fire {
        let bullet = state.tank.fire(&state.sizes);
        events.push(GameEvent::BulletFired {
            position: bullet.position,
            heading: bullet.heading_degrees(),
        });
        state.bullets.push(bullet);
    }

    // Bullets: move, cull off-screen, hit the first standing crate
    let (width, height) = (state.arena.x, state.arena.y);
    let sizes = &state.sizes;
    let crates = &mut state.crates;
    state.bullets.retain_mut(|bullet| {
        bullet.update();
        if bullet.is_off_screen(width, height) {
            return false;
        }

        let hit_box = bullet.bounds();
        let hit = crates
            .iter_mut()
            .enumerate()
            .find(|(_, c)| !c.destroyed && hit_box.overlaps(&c.bounds(sizes)));
        match hit {
            Some((index, crate_state)) => {
                crate_state.destroy();
                events.push(GameEvent::CrateDestroyed {
                    index,
                    cause: DestroyCause::Bullet,
                });
                false
            }
            None => true,
        }
    });

    // Ramming: the tank flattens crates it drives into and is unharmed
    let tank_center = state.tank.position.xy();
    let radius = Tank::collision_radius(&state.sizes);
    for (index, crate_state) in state.crates.iter_mut().enumerate() {
        if crate_state.destroyed {
            continue;
        }
        if circle_contains(tank_center, radius, crate_state.center(&state.sizes))
            && crate_state.destroy()
        {
            events.push(GameEvent::CrateDestroyed {
                index,
                cause: DestroyCause::Rammed,
            });
        }
    }

    // Explosion timers
    for (index, crate_state) in state.crates.iter_mut().enumerate() {
        if crate_state.update_explosion(dt) {
            events.push(GameEvent::ExplosionFinished { index });
        }
    }

    state.expire_tracks();

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::math::Vector3;
    use crate::sim::bullet::Bullet;
    use crate::sim::sprite::{Sprite, SpriteSizes};
    use crate::sim::state::CrateState;
    use glam::Vec2;

    const DT: f32 = 1.0 / TARGET_FPS as f32;

    /// Empty 800x600 arena with the tank at its usual start
    fn empty_state() -> GameState {
        GameState::with_crates(1, Vec2::new(800.0, 600.0), SpriteSizes::default(), 0, 0.0)
            .unwrap()
    }

    #[test]
    fn test_idle_tick_advances_clock_only() {
        let mut state = empty_state();
        let events = tick(&mut state, &TickInput::default(), DT);
        assert!(events.is_empty());
        assert_eq!(state.time_ticks, 1);
        assert!((state.time - DT as f64).abs() < 1e-9);
        assert!(state.tracks.is_empty());
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_fire_spawns_and_advances_bullet() {
        let mut state = empty_state();
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, DT);
        assert_eq!(state.bullets.len(), 1);

        let GameEvent::BulletFired { position, heading } = events[0] else {
            panic!("expected BulletFired, got {:?}", events[0]);
        };
        assert_eq!(heading, 0.0);
        // Already moved one step this tick
        let moved = state.bullets[0].position - position;
        assert!((moved.x - BULLET_SPEED).abs() < 1e-4);
        assert!(moved.y.abs() < 1e-6);
    }

    #[test]
    fn test_off_screen_bullets_are_removed() {
        let mut state = empty_state();
        state.bullets.push(Bullet::new(Vector3::new(798.0, 300.0, 0.0), 0.0));
        state.bullets.push(Bullet::new(Vector3::new(400.0, 100.0, 0.0), 0.0));
        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.bullets[0].position.y, 100.0);
    }

    #[test]
    fn test_bullet_destroys_crate_once() {
        let mut state = empty_state();
        state.crates.push(CrateState::new(Vec2::new(600.0, 80.0)));
        state.crates.push(CrateState::new(Vec2::new(610.0, 80.0)));
        // Lands inside both crates next tick; only the first is hit
        state.bullets.push(Bullet::new(Vector3::new(614.0, 90.0, 0.0), 0.0));

        let events = tick(&mut state, &TickInput::default(), DT);
        assert!(state.bullets.is_empty());
        assert!(state.crates[0].destroyed);
        assert!(!state.crates[1].destroyed);
        assert_eq!(
            events,
            vec![GameEvent::CrateDestroyed {
                index: 0,
                cause: DestroyCause::Bullet
            }]
        );
        let timer = state.crates[0].timer;
        assert!((timer - (EXPLOSION_DURATION - DT)).abs() < 1e-6);

        // A second bullet through the wreck hits the next standing crate
        state.bullets.push(Bullet::new(Vector3::new(614.0, 90.0, 0.0), 0.0));
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.crates[1].destroyed);
        // First crate's explosion was not restarted
        assert!((state.crates[0].timer - (EXPLOSION_DURATION - 2.0 * DT)).abs() < 1e-6);
    }

    #[test]
    fn test_destroyed_crate_ignores_bullets() {
        let mut state = empty_state();
        let mut wreck = CrateState::new(Vec2::new(600.0, 80.0));
        wreck.destroy();
        wreck.timer = 0.2;
        state.crates.push(wreck);

        for _ in 0..2 {
            state.bullets.push(Bullet::new(Vector3::new(604.0, 90.0, 0.0), 0.0));
            let events = tick(&mut state, &TickInput::default(), DT);
            assert!(!events
                .iter()
                .any(|e| matches!(e, GameEvent::CrateDestroyed { .. })));
        }
        // Bullets pass straight through
        assert_eq!(state.bullets.len(), 2);
        assert!((state.crates[0].timer - (0.2 - 2.0 * DT)).abs() < 1e-6);
    }

    #[test]
    fn test_tank_rams_crate() {
        let mut state = empty_state();
        let size = state.sizes.get(Sprite::Crate) * GLOBAL_SCALE;
        // Crate centered right on the tank
        let pos = state.tank.position.xy() - size * 0.5;
        state.crates.push(CrateState::new(pos));

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(
            events,
            vec![GameEvent::CrateDestroyed {
                index: 0,
                cause: DestroyCause::Rammed
            }]
        );
        assert!(state.crates[0].destroyed);
        assert_eq!(state.tank.position, Vector3::new(TANK_START_X, TANK_START_Y, 0.0));

        // Sitting on the wreck does nothing more
        let events = tick(&mut state, &TickInput::default(), DT);
        assert!(events.is_empty());
    }

    #[test]
    fn test_far_crate_is_not_rammed() {
        let mut state = empty_state();
        state.crates.push(CrateState::new(Vec2::new(700.0, 500.0)));
        tick(&mut state, &TickInput::default(), DT);
        assert!(!state.crates[0].destroyed);
    }

    #[test]
    fn test_explosion_expires() {
        let mut state = empty_state();
        let mut c = CrateState::new(Vec2::new(700.0, 500.0));
        c.destroy();
        state.crates.push(c);

        let ticks = (EXPLOSION_DURATION / DT).ceil() as usize;
        let mut finished = 0;
        for _ in 0..ticks + 2 {
            let events = tick(&mut state, &TickInput::default(), DT);
            finished += events
                .iter()
                .filter(|e| matches!(e, GameEvent::ExplosionFinished { index: 0 }))
                .count();
        }
        assert_eq!(finished, 1);
        assert!(!state.crates[0].show_explosion);
        assert!(state.crates[0].destroyed);
    }

    #[test]
    fn test_tracks_laid_and_expired() {
        let mut state = empty_state();
        let drive = TickInput {
            forward: true,
            ..Default::default()
        };
        tick(&mut state, &drive, DT);
        tick(&mut state, &drive, DT);
        assert_eq!(state.tracks.len(), 2);
        assert!(state.tracks[0].timestamp < state.tracks[1].timestamp);

        // Idle past the lifetime
        let idle_ticks = (TRACK_LIFETIME / DT as f64).ceil() as usize + 1;
        for _ in 0..idle_ticks {
            tick(&mut state, &TickInput::default(), DT);
        }
        assert!(state.tracks.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99, Vec2::new(1280.0, 720.0), SpriteSizes::default()).unwrap();
        let mut b = GameState::new(99, Vec2::new(1280.0, 720.0), SpriteSizes::default()).unwrap();

        let inputs = [
            TickInput {
                forward: true,
                turn_right: true,
                ..Default::default()
            },
            TickInput {
                fire: true,
                turret_left: true,
                ..Default::default()
            },
            TickInput::default(),
        ];
        for _ in 0..40 {
            for input in &inputs {
                assert_eq!(tick(&mut a, input, DT), tick(&mut b, input, DT));
            }
        }
        assert_eq!(a.tank, b.tank);
        assert_eq!(a.bullets, b.bullets);
        assert_eq!(a.crates, b.crates);
    }
}
