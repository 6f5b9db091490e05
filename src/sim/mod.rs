//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - No rendering, storage, or network dependencies
//! - Session identifiers come from the caller
//! - Discrete events leave through `GameState::take_events`

pub mod clock;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::Rect;
pub use state::{
    Coin, Enemy, EnemyColor, GameEvent, GamePhase, GameState, Player, SessionId,
};
pub use tick::{TickInput, tick};
