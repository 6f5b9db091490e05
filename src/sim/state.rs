//! Game state and core simulation types
//!
//! Everything the per-tick update mutates lives here. The state owns no
//! platform handles: session identifiers come from the caller, and
//! discrete events leave through `take_events`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::consts::*;

/// Session lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No session yet
    Idle,
    /// Simulation advancing
    Running,
    /// Session alive but ticks are display-only
    Paused,
    /// Crashed; a new start/restart is required to leave
    Ended,
}

/// Enemy paint job, chosen at spawn and frozen so cars don't flicker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyColor {
    Red,
    Orange,
    Magenta,
    Blue,
}

impl EnemyColor {
    pub const PALETTE: [EnemyColor; 4] = [
        EnemyColor::Red,
        EnemyColor::Orange,
        EnemyColor::Magenta,
        EnemyColor::Blue,
    ];

    /// CSS color used by the canvas layer
    pub fn as_css(self) -> &'static str {
        match self {
            EnemyColor::Red => "#ff4d4d",
            EnemyColor::Orange => "#ff8800",
            EnemyColor::Magenta => "#ff00cc",
            EnemyColor::Blue => "#00bfff",
        }
    }
}

/// The player's car; y never changes
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vx: f32,
}

impl Player {
    fn new() -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_Y),
            vx: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(PLAYER_W, PLAYER_H))
    }
}

/// An oncoming car
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vy: f32,
    pub color: EnemyColor,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::new(ENEMY_W, ENEMY_H))
    }
}

/// A collectible coin
#[derive(Debug, Clone)]
pub struct Coin {
    pub pos: Vec2,
    pub vy: f32,
}

impl Coin {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(COIN_SIZE))
    }
}

/// Opaque session identifier; scopes one playthrough from start to crash
pub type SessionId = String;

/// Discrete things that happened during a tick, drained by the outer loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    GameStart { restart: bool },
    Pause,
    Resume,
    CoinCollected { total_coins: u32 },
    Crash,
    GameEnd { final_score: u32, total_coins: u32 },
}

/// Complete simulation state for one client
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub session: Option<SessionId>,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    /// Continuous score accumulator; the HUD shows its floor
    pub score: f32,
    pub coin_count: u32,
    pub speed: f32,
    /// Next displayed-score threshold that bumps `speed`
    pub next_speed_up_at: u32,
    /// Cosmetic scroll offset for the lane dashes, wraps at `DASH_PERIOD`
    pub road_offset: f32,
    /// Wall-clock ms of the last enemy spawn; 0 = none yet this session
    pub last_enemy_spawn_ms: f64,
    pub rng: Pcg32,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle state with the given RNG seed
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Idle,
            session: None,
            player: Player::new(),
            enemies: Vec::new(),
            coins: Vec::new(),
            score: 0.0,
            coin_count: 0,
            speed: BASE_SPEED,
            next_speed_up_at: SPEED_UP_INTERVAL,
            road_offset: 0.0,
            last_enemy_spawn_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Begin a session: full reset, new identifier, start event.
    ///
    /// Restart runs the identical sequence and may interrupt any phase,
    /// including a session that is still running.
    pub fn start_session(&mut self, session: SessionId, restart: bool) {
        self.reset();
        self.session = Some(session);
        self.phase = GamePhase::Running;
        self.events.push(GameEvent::GameStart { restart });
    }

    /// Clear all per-session state; entity containers must be empty before
    /// a new session begins
    fn reset(&mut self) {
        self.phase = GamePhase::Idle;
        self.session = None;
        self.player = Player::new();
        self.enemies.clear();
        self.coins.clear();
        self.score = 0.0;
        self.coin_count = 0;
        self.speed = BASE_SPEED;
        self.next_speed_up_at = SPEED_UP_INTERVAL;
        self.road_offset = 0.0;
        self.last_enemy_spawn_ms = 0.0;
        self.events.clear();
    }

    /// Score shown on the HUD; monotonically non-decreasing while running
    pub fn displayed_score(&self) -> u32 {
        self.score as u32
    }

    /// Whether the restart control should be enabled
    pub fn can_restart(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    /// Toggle pause. Only meaningful while a session is live; in Idle or
    /// Ended this is a no-op and emits nothing.
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => {
                self.phase = GamePhase::Paused;
                self.events.push(GameEvent::Pause);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Running;
                self.events.push(GameEvent::Resume);
            }
            GamePhase::Idle | GamePhase::Ended => {}
        }
    }

    /// Drain the events recorded since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}
