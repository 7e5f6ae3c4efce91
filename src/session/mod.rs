//! Session layer.
//!
//! Actor wrappers around a [`Board`](crate::game::Board):
//! - `GameSessionManager` creates matches and hands out their addresses
//! - `GameSession` owns one board, applies player actions, drives the Blitz countdown and
//!   broadcasts state updates to subscribers

pub mod server;
pub mod messages;
pub mod turn_timer;

pub use server::{GameSession, GameSessionManager};
