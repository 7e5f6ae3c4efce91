//! Game entities module.
//!
//! This module organizes the tile entity and the placement staging (offered tiles).

pub mod tile;
pub mod offer;

pub use tile::{Tile, Triggerable};
pub use offer::{StagedOffer, Staging};
