//! Per-tick simulation update
//!
//! One call per animation frame. The pipeline only runs while the session
//! is `Running`: pausing keeps the frame alive for rendering but skips
//! every mutating stage, and a crash freezes the state until the next
//! start/restart.

use rand::Rng;

use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::*;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Steer-left intent (any bound key held)
    pub left: bool,
    /// Steer-right intent
    pub right: bool,
    /// One-shot pause toggle
    pub pause: bool,
    /// Wall-clock timestamp of this frame, ms
    pub now_ms: f64,
}

/// Advance the game by one frame of `dt` nominal-frame units
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        state.toggle_pause();
    }
    if state.phase != GamePhase::Running {
        return;
    }

    // Scroll the lane dashes; wrapping keeps the pattern continuous
    state.road_offset = (state.road_offset + state.speed * dt) % DASH_PERIOD;

    // Steering: fixed speed toward whichever direction is held; opposing
    // keys cancel out
    state.player.vx = match (input.left, input.right) {
        (true, false) => -STEER_SPEED,
        (false, true) => STEER_SPEED,
        _ => 0.0,
    };
    state.player.pos.x += state.player.vx * dt;

    let min_x = ROAD_X + EDGE_MARGIN;
    let max_x = ROAD_X + ROAD_W - PLAYER_W - EDGE_MARGIN;
    state.player.pos.x = state.player.pos.x.clamp(min_x, max_x);

    // Enemy spawn is gated on the wall clock, not on dt
    if state.last_enemy_spawn_ms == 0.0 {
        state.last_enemy_spawn_ms = input.now_ms;
    }
    if input.now_ms - state.last_enemy_spawn_ms > ENEMY_SPAWN_MS {
        spawn::spawn_enemy(state);
        state.last_enemy_spawn_ms = input.now_ms;
    }

    // Coin spawn rate is per nominal frame, so the roll scales with dt
    if state.rng.random::<f32>() < COIN_CHANCE * dt {
        spawn::spawn_coin(state);
    }

    // Advance entities. Velocity is refreshed to track world speed, so a
    // ramp applies to everything already on the road, not just new spawns.
    let fall = state.speed + FALL_SPEED_OFFSET;
    for enemy in &mut state.enemies {
        enemy.pos.y += enemy.vy * dt;
        enemy.vy = fall;
    }
    state.enemies.retain(|e| e.pos.y < CANVAS_H + ENEMY_CULL_MARGIN);

    for coin in &mut state.coins {
        coin.pos.y += coin.vy * dt;
        coin.vy = fall;
    }
    state.coins.retain(|c| c.pos.y < CANVAS_H + COIN_CULL_MARGIN);

    // Score accrues continuously; the HUD shows the floor
    state.score += dt;
    let shown = state.displayed_score();

    // Speed ramp: at most one step per tick. A frame spike that crosses
    // several thresholds still bumps speed once; the gate catches up on
    // later ticks.
    if shown >= state.next_speed_up_at {
        state.speed += SPEED_STEP;
        state.next_speed_up_at += SPEED_UP_INTERVAL;
    }

    // Coin pickup; removal order follows the container
    let player_rect = state.player.rect();
    let mut i = 0;
    while i < state.coins.len() {
        if player_rect.overlaps(&state.coins[i].rect()) {
            state.coins.remove(i);
            state.coin_count += 1;
            let total_coins = state.coin_count;
            state.push_event(GameEvent::CoinCollected { total_coins });
        } else {
            i += 1;
        }
    }

    // First enemy hit ends the session; only one collision is processed
    // per tick, simultaneous overlaps are not distinguished
    if state
        .enemies
        .iter()
        .any(|e| player_rect.overlaps(&e.rect()))
    {
        state.phase = GamePhase::Ended;
        state.push_event(GameEvent::Crash);
        state.push_event(GameEvent::GameEnd {
            final_score: shown,
            total_coins: state.coin_count,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Coin, Enemy, EnemyColor};
    use glam::Vec2;
    use proptest::prelude::*;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start_session("test".into(), false);
        state.take_events();
        state
    }

    fn plain_input(now_ms: f64) -> TickInput {
        TickInput {
            now_ms,
            ..Default::default()
        }
    }

    fn enemy_at(x: f32, y: f32) -> Enemy {
        Enemy {
            pos: Vec2::new(x, y),
            vy: 0.0,
            color: EnemyColor::Red,
        }
    }

    #[test]
    fn test_ten_ticks_without_input_accrue_ten_points() {
        let mut state = running_state(1);
        for frame in 0..10 {
            tick(&mut state, &plain_input(frame as f64 * NOMINAL_FRAME_MS), 1.0);
        }
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.pos.x, PLAYER_START_X);
        assert!((state.score - 10.0).abs() < 1e-4);
        assert_eq!(state.displayed_score(), 10);
    }

    #[test]
    fn test_zero_dt_tick_is_a_noop() {
        let mut state = running_state(2);
        state.enemies.push(enemy_at(95.0, 100.0));
        tick(&mut state, &plain_input(0.0), 1.0);

        let x = state.player.pos.x;
        let score = state.score;
        let enemy_y = state.enemies[0].pos.y;
        let offset = state.road_offset;

        tick(&mut state, &plain_input(0.0), 0.0);

        assert_eq!(state.player.pos.x, x);
        assert_eq!(state.score, score);
        assert_eq!(state.enemies[0].pos.y, enemy_y);
        assert_eq!(state.road_offset, offset);
    }

    #[test]
    fn test_steering_moves_and_clamps() {
        let mut state = running_state(3);
        let input = TickInput {
            left: true,
            ..plain_input(0.0)
        };
        tick(&mut state, &input, 1.0);
        assert_eq!(state.player.pos.x, PLAYER_START_X - STEER_SPEED);

        // Hold left long enough to hit the edge
        for frame in 1..100 {
            let input = TickInput {
                left: true,
                ..plain_input(frame as f64 * NOMINAL_FRAME_MS)
            };
            tick(&mut state, &input, 1.0);
        }
        assert_eq!(state.player.pos.x, ROAD_X + EDGE_MARGIN);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut state = running_state(4);
        let input = TickInput {
            left: true,
            right: true,
            ..plain_input(0.0)
        };
        tick(&mut state, &input, 1.0);
        assert_eq!(state.player.vx, 0.0);
        assert_eq!(state.player.pos.x, PLAYER_START_X);
    }

    #[test]
    fn test_enemy_spawns_after_wall_clock_gate() {
        let mut state = running_state(5);
        // First running tick only seeds the gate
        tick(&mut state, &plain_input(1000.0), 1.0);
        assert!(state.enemies.is_empty());

        // At the gate exactly: nothing
        tick(&mut state, &plain_input(1000.0 + ENEMY_SPAWN_MS), 1.0);
        assert!(state.enemies.is_empty());

        // Past the gate: one spawn, and the gate re-arms
        tick(&mut state, &plain_input(1001.0 + ENEMY_SPAWN_MS), 1.0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.last_enemy_spawn_ms, 1001.0 + ENEMY_SPAWN_MS);
    }

    #[test]
    fn test_speed_ramp_fires_once_per_threshold_crossing() {
        let mut state = running_state(6);
        state.score = 490.0;

        // One big frame jumps the displayed score straight past 500
        tick(&mut state, &plain_input(0.0), 20.0);

        assert_eq!(state.displayed_score(), 510);
        assert!((state.speed - (BASE_SPEED + SPEED_STEP)).abs() < 1e-5);
        assert_eq!(state.next_speed_up_at, 2 * SPEED_UP_INTERVAL);

        // The next ordinary tick does not fire again below the new threshold
        tick(&mut state, &plain_input(NOMINAL_FRAME_MS), 1.0);
        assert!((state.speed - (BASE_SPEED + SPEED_STEP)).abs() < 1e-5);
    }

    #[test]
    fn test_speed_ramp_propagates_to_live_entities() {
        let mut state = running_state(7);
        state.enemies.push(enemy_at(95.0, 100.0));
        state.coins.push(Coin {
            pos: Vec2::new(320.0, 100.0),
            vy: 0.0,
        });
        state.score = 499.5;

        // First tick crosses the threshold; the ramped speed reaches the
        // live entities on the tick after
        tick(&mut state, &plain_input(1000.0), 1.0);
        assert!((state.speed - (BASE_SPEED + SPEED_STEP)).abs() < 1e-5);
        tick(&mut state, &plain_input(1000.0 + NOMINAL_FRAME_MS), 1.0);

        let fall = state.speed + FALL_SPEED_OFFSET;
        assert_eq!(state.enemies[0].vy, fall);
        assert_eq!(state.coins[0].vy, fall);
    }

    #[test]
    fn test_offscreen_entities_are_culled() {
        let mut state = running_state(8);
        state.enemies.push(enemy_at(95.0, CANVAS_H + ENEMY_CULL_MARGIN + 1.0));
        state.coins.push(Coin {
            pos: Vec2::new(160.0, CANVAS_H + COIN_CULL_MARGIN + 1.0),
            vy: 0.0,
        });

        tick(&mut state, &plain_input(0.0), 0.0);

        assert!(state.enemies.is_empty());
        assert!(state.coins.is_empty());
    }

    #[test]
    fn test_coin_pickup_increments_and_removes() {
        let mut state = running_state(9);
        // Sitting on the player
        state.coins.push(Coin {
            pos: state.player.pos,
            vy: 0.0,
        });
        // Far away
        state.coins.push(Coin {
            pos: Vec2::new(95.0, 50.0),
            vy: 0.0,
        });

        tick(&mut state, &plain_input(0.0), 0.0);

        assert_eq!(state.coin_count, 1);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(
            state.take_events(),
            vec![GameEvent::CoinCollected { total_coins: 1 }]
        );
    }

    #[test]
    fn test_crash_ends_session_and_reports_final_score() {
        let mut state = running_state(10);
        state.score = 41.2;
        // Overlapping the player's rectangle exactly
        state.enemies.push(enemy_at(PLAYER_START_X, PLAYER_Y));

        tick(&mut state, &plain_input(0.0), 1.0);

        assert_eq!(state.phase, GamePhase::Ended);
        assert!(state.can_restart());
        assert_eq!(
            state.take_events(),
            vec![
                GameEvent::Crash,
                GameEvent::GameEnd {
                    final_score: 42,
                    total_coins: 0
                }
            ]
        );
    }

    #[test]
    fn test_only_first_collision_is_processed() {
        let mut state = running_state(11);
        state.enemies.push(enemy_at(PLAYER_START_X, PLAYER_Y));
        state.enemies.push(enemy_at(PLAYER_START_X + 10.0, PLAYER_Y));

        tick(&mut state, &plain_input(0.0), 1.0);

        // One crash, one game end; the second overlap is not distinguished
        assert_eq!(state.take_events().len(), 2);
    }

    #[test]
    fn test_ended_state_is_frozen() {
        let mut state = running_state(12);
        state.enemies.push(enemy_at(PLAYER_START_X, PLAYER_Y));
        tick(&mut state, &plain_input(0.0), 1.0);
        state.take_events();

        let score = state.score;
        tick(&mut state, &plain_input(1000.0), 1.0);
        assert_eq!(state.score, score);
        assert_eq!(state.phase, GamePhase::Ended);
    }

    #[test]
    fn test_pause_skips_mutation_and_resume_continues() {
        let mut state = running_state(13);
        tick(&mut state, &plain_input(0.0), 1.0);

        let pause = TickInput {
            pause: true,
            ..plain_input(NOMINAL_FRAME_MS)
        };
        tick(&mut state, &pause, 1.0);
        assert_eq!(state.phase, GamePhase::Paused);
        let score = state.score;

        // Paused ticks change nothing
        tick(&mut state, &plain_input(2.0 * NOMINAL_FRAME_MS), 1.0);
        assert_eq!(state.score, score);

        let resume = TickInput {
            pause: true,
            ..plain_input(3.0 * NOMINAL_FRAME_MS)
        };
        tick(&mut state, &resume, 1.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(
            state.take_events(),
            vec![GameEvent::Pause, GameEvent::Resume]
        );
    }

    #[test]
    fn test_pause_toggle_while_ended_is_a_noop() {
        let mut state = running_state(14);
        state.enemies.push(enemy_at(PLAYER_START_X, PLAYER_Y));
        tick(&mut state, &plain_input(0.0), 1.0);
        state.take_events();

        let pause = TickInput {
            pause: true,
            ..plain_input(NOMINAL_FRAME_MS)
        };
        tick(&mut state, &pause, 1.0);

        assert_eq!(state.phase, GamePhase::Ended);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_determinism_per_seed() {
        let mut a = running_state(99);
        let mut b = running_state(99);
        for frame in 0..600 {
            let input = plain_input(frame as f64 * NOMINAL_FRAME_MS);
            tick(&mut a, &input, 1.0);
            tick(&mut b, &input, 1.0);
        }
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.coins.len(), b.coins.len());
        assert_eq!(a.score, b.score);
    }

    proptest! {
        #[test]
        fn displayed_score_never_decreases(dts in proptest::collection::vec(0.0f32..5.0, 1..50)) {
            let mut state = running_state(21);
            // Keep the road empty so the session cannot end mid-run
            let mut now = 0.0;
            let mut last_shown = 0;
            for dt in dts {
                now += f64::from(dt) * NOMINAL_FRAME_MS;
                tick(&mut state, &plain_input(now), dt);
                state.enemies.clear();
                prop_assert!(state.displayed_score() >= last_shown);
                prop_assert_eq!(state.displayed_score(), state.score as u32);
                last_shown = state.displayed_score();
            }
        }
    }
}
