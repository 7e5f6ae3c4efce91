//! Rules engine.
//!
//! Tiles, the board grid, capture eligibility, trigger effects and the turn state machine.
//! Nothing in here knows about pixels, sound or input devices: callers hand in grid
//! coordinates (or a pointer position to snap) and read back snapshots and events.

pub mod types;
pub mod state;

pub mod entities;
pub mod grid;
pub mod systems;

pub use state::{Board, BoardSnapshot, PlacementResult, TickOutcome, TriggerResult};
pub use types::{GameEvent, GameMode, Owner, Position, Rejection, ScreenPos, TileKind};
