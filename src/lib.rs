//! Road Rush - a 2D lane-runner car game for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (timing, spawning, physics, session state)
//! - `telemetry`: Analytics event envelopes and the fire-and-forget sink
//! - `scores`: Best-score high-water mark persisted to LocalStorage
//! - `identity`: Stable player identifier reused across sessions
//! - `render`: Thin Canvas2D drawing over the simulated state (wasm only)

pub mod identity;
#[cfg(target_arch = "wasm32")]
pub mod render;
pub mod scores;
pub mod sim;
pub mod telemetry;

pub use scores::BestScore;
pub use telemetry::{EventSink, Telemetry};

/// Game configuration constants
pub mod consts {
    /// Nominal frame interval in milliseconds (60 Hz); a dt of 1.0 is one such frame
    pub const NOMINAL_FRAME_MS: f64 = 16.6667;

    /// Canvas dimensions
    pub const CANVAS_W: f32 = 420.0;
    pub const CANVAS_H: f32 = 640.0;

    /// Road strip; everything left of ROAD_X and right of ROAD_X + ROAD_W is grass
    pub const ROAD_X: f32 = 60.0;
    pub const ROAD_W: f32 = 300.0;
    /// Inset from the road edges the player may not cross
    pub const EDGE_MARGIN: f32 = 10.0;
    /// Scroll period of the dashed lane markers (dash height + gap)
    pub const DASH_PERIOD: f32 = 65.0;

    /// Lane center x-coordinates
    pub const LANE_X: [f32; 4] = [95.0, 175.0, 255.0, 335.0];

    /// Player geometry and handling
    pub const PLAYER_W: f32 = 50.0;
    pub const PLAYER_H: f32 = 90.0;
    pub const PLAYER_START_X: f32 = 200.0;
    pub const PLAYER_Y: f32 = 560.0;
    /// Horizontal steering speed, px per nominal frame
    pub const STEER_SPEED: f32 = 7.0;

    /// World scroll speed at session start, px per nominal frame
    pub const BASE_SPEED: f32 = 5.0;
    /// Added to world speed to get entity fall speed
    pub const FALL_SPEED_OFFSET: f32 = 2.0;
    /// Speed increment applied at each score threshold
    pub const SPEED_STEP: f32 = 0.6;
    /// Displayed-score spacing between speed-up thresholds
    pub const SPEED_UP_INTERVAL: u32 = 500;

    /// Wall-clock gate between enemy spawns, ms
    pub const ENEMY_SPAWN_MS: f64 = 900.0;
    /// Enemies spawn above the visible area
    pub const ENEMY_SPAWN_Y: f32 = -120.0;
    pub const ENEMY_W: f32 = 50.0;
    pub const ENEMY_H: f32 = 90.0;
    /// Cull margin past the bottom edge for enemies
    pub const ENEMY_CULL_MARGIN: f32 = 140.0;

    /// Per-nominal-frame coin spawn probability (scaled by dt)
    pub const COIN_CHANCE: f32 = 0.01;
    pub const COIN_SPAWN_Y: f32 = -40.0;
    pub const COIN_SIZE: f32 = 30.0;
    /// Cull margin past the bottom edge for coins
    pub const COIN_CULL_MARGIN: f32 = 60.0;
    /// Bounded random lane picks before the fairness check gives up
    pub const COIN_PLACE_TRIES: u32 = 8;
    /// Lateral distance from a lane center within which an enemy blocks it
    pub const LANE_BLOCK_RADIUS: f32 = 25.0;
    /// Enemies above this y still count as "near the spawn area"
    pub const NEAR_SPAWN_Y: f32 = 180.0;
}
