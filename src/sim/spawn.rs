//! Procedural entity spawning
//!
//! Enemies are time-gated on the wall clock; coins roll a per-tick
//! probability. Coin placement retries a bounded number of random lanes so
//! a coin is not dropped straight behind an oncoming car, then places
//! anyway: a crowded road must never starve the spawner, and the bounded
//! retry keeps the per-tick spawn cost flat.

use glam::Vec2;
use rand::Rng;

use super::state::{Coin, Enemy, EnemyColor, GameState};
use crate::consts::*;

/// Push a new enemy in a random lane with a frozen palette color
pub fn spawn_enemy(state: &mut GameState) {
    let lane = LANE_X[state.rng.random_range(0..LANE_X.len())];
    let color = EnemyColor::PALETTE[state.rng.random_range(0..EnemyColor::PALETTE.len())];
    state.enemies.push(Enemy {
        pos: Vec2::new(lane - ENEMY_W / 2.0, ENEMY_SPAWN_Y),
        vy: state.speed + FALL_SPEED_OFFSET,
        color,
    });
}

/// Place a coin in a fair lane if one turns up within the retry budget,
/// otherwise in a random lane regardless (availability over fairness)
pub fn spawn_coin(state: &mut GameState) {
    for _ in 0..COIN_PLACE_TRIES {
        let lane = LANE_X[state.rng.random_range(0..LANE_X.len())];
        if !lane_blocked(state, lane) {
            push_coin(state, lane);
            return;
        }
    }
    let lane = LANE_X[state.rng.random_range(0..LANE_X.len())];
    push_coin(state, lane);
}

/// True when an enemy sits close enough to `lane_x` near the top of the
/// road that a coin there would be unreachable
fn lane_blocked(state: &GameState, lane_x: f32) -> bool {
    state.enemies.iter().any(|e| {
        (e.pos.x + ENEMY_W / 2.0 - lane_x).abs() < LANE_BLOCK_RADIUS && e.pos.y < NEAR_SPAWN_Y
    })
}

fn push_coin(state: &mut GameState, lane_x: f32) {
    state.coins.push(Coin {
        pos: Vec2::new(lane_x - COIN_SIZE / 2.0, COIN_SPAWN_Y),
        vy: state.speed + FALL_SPEED_OFFSET,
    });
}
