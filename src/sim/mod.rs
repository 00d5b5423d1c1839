//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, passed explicitly to every respawn
//! - Stable iteration order (roster order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod state;
pub mod tick;

pub use collision::{Aabb, overlaps};
pub use entity::{
    Collectible, Direction, Enemy, EntityRef, MoveOutcome, Player, SpriteId, TickContext, Tickable,
};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, collect, game_over, handle_input, level_up, spawn_collectible, tick};
