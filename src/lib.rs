//! cellwar: rules engine for a two-player territory-capture grid game.
//!
//! Players take turns placing tiles next to their own territory. Some tiles do more than hold
//! ground: bombs clear their neighbours, area tiles absorb every free cell touching the owner's
//! territory, mutators turn into a random tile and scheduled tiles hide a kind that changes
//! every round. Losing your capital loses the game.
//!
//! - [`game`] is the engine: tiles, grid, capture rules, trigger effects, game modes
//! - [`session`] wraps a board in an actor that drives the Blitz countdown
//! - [`config`] holds the tunables

pub mod config;
pub mod error;
pub mod game;
pub mod session;


pub use error::{GameError, GameResult};
pub use game::{Board, GameMode, Owner, Position, TileKind};
