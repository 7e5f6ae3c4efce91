//! Capture eligibility.
//!
//! Standard and Blitz boards share one rule set; Death boards use their own. Both are kept as
//! separate named functions so that either can change without touching the other.

use crate::game::grid::Grid;
use crate::game::types::{GameMode, Owner, Position, TileKind};

/// Which capture rules a board plays by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureRules {
    Standard,
    Death,
}

impl From<GameMode> for CaptureRules {
    fn from(mode: GameMode) -> Self {
        match mode {
            GameMode::Standard | GameMode::Blitz => CaptureRules::Standard,
            GameMode::Death => CaptureRules::Death,
        }
    }
}

impl CaptureRules {
    pub fn can_capture(self, grid: &Grid, pos: Position, turn_owner: Owner) -> bool {
        match self {
            CaptureRules::Standard => can_capture_standard(grid, pos, turn_owner),
            CaptureRules::Death => can_capture_death(grid, pos, turn_owner),
        }
    }
}

/// A cell can be taken by `turn_owner` when it is not one of their own occupied cells, is not a
/// protected cell of the opponent, and touches their territory.
pub fn can_capture_standard(grid: &Grid, pos: Position, turn_owner: Owner) -> bool {
    let Some(target) = grid.get(pos) else {
        return false;
    };
    if target.owner == turn_owner && target.kind != TileKind::Empty {
        return false;
    }
    if target.owner == turn_owner.opponent() && target.is_protected() {
        return false;
    }
    grid.has_neighbor_owned_by(pos, turn_owner)
}

/// Standard rules, and dead cells can never be taken.
pub fn can_capture_death(grid: &Grid, pos: Position, turn_owner: Owner) -> bool {
    match grid.get(pos) {
        Some(target) if target.kind == TileKind::Dead => false,
        Some(_) => can_capture_standard(grid, pos, turn_owner),
        None => false,
    }
}
