/// Game configuration.
///
/// Default gameplay parameters (board size, capital spacing, Blitz countdown, offers per turn)
/// and the screen geometry used to snap dropped offers onto cells.
use serde::{Serialize, Deserialize};

use crate::error::{GameError, GameResult};
use crate::game::types::{Geometry, Position};

/// Number of cells along one side of the (square) board.
pub const SIDE_SIZE: usize = 8;

/// Capitals must be strictly further apart than this on both axes.
pub const CAPITAL_MIN_DISTANCE: usize = 3;

/// Attempts at drawing a valid pair of capital positions before giving up.
pub const CAPITAL_PLACEMENT_RETRIES: u32 = 10_000;

/// Seconds a Blitz player has to act before the turn is passed for them.
pub const BLITZ_TURN_SECONDS: u32 = 5;

/// Period of the Blitz countdown tick, in milliseconds.
pub const BLITZ_TICK_MILLIS: u64 = 1_000;

/// Number of tiles offered to the current player each turn.
pub const OFFERS_PER_TURN: usize = 3;

/// Upper bound for [`GameConfig::offers_per_turn`].
pub const MAX_OFFERS_PER_TURN: usize = 3;

/// Default screen layout (pixels).
pub const BOARD_LEFT: i32 = 64;
pub const BOARD_TOP: i32 = 32;
pub const CELL_SIZE: i32 = 96;
pub const CELL_GAP: i32 = 6;

/// Parameters of a single match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub side_size: usize,
    pub capital_distance: usize,
    pub capital_retries: u32,
    pub blitz_seconds: u32,
    pub tick_millis: u64,
    pub offers_per_turn: usize,
    pub geometry: Geometry,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            side_size: SIDE_SIZE,
            capital_distance: CAPITAL_MIN_DISTANCE,
            capital_retries: CAPITAL_PLACEMENT_RETRIES,
            blitz_seconds: BLITZ_TURN_SECONDS,
            tick_millis: BLITZ_TICK_MILLIS,
            offers_per_turn: OFFERS_PER_TURN,
            geometry: Geometry {
                left: BOARD_LEFT,
                top: BOARD_TOP,
                cell_size: CELL_SIZE,
                cell_gap: CELL_GAP,
            },
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject parameters no match can be played with.
    pub fn validate(&self) -> GameResult<()> {
        if self.side_size < 2 {
            return Err(GameError::Configuration(format!(
                "side size {} is too small, need at least 2",
                self.side_size
            )));
        }
        // Largest possible gap on one axis is side_size - 1.
        if self.side_size - 1 <= self.capital_distance {
            return Err(GameError::Configuration(format!(
                "capitals cannot be more than {} cells apart on a {}x{} board",
                self.capital_distance, self.side_size, self.side_size
            )));
        }
        if self.capital_retries == 0 {
            return Err(GameError::Configuration("capital_retries must be positive".into()));
        }
        if self.blitz_seconds == 0 || self.tick_millis == 0 {
            return Err(GameError::Configuration("Blitz countdown must be positive".into()));
        }
        if !(1..=MAX_OFFERS_PER_TURN).contains(&self.offers_per_turn) {
            return Err(GameError::Configuration(format!(
                "offers_per_turn must be between 1 and {}, got {}",
                MAX_OFFERS_PER_TURN, self.offers_per_turn
            )));
        }
        if self.geometry.cell_size < 3 || self.geometry.cell_gap < 0 {
            return Err(GameError::Configuration(format!(
                "invalid cell geometry {:?}",
                self.geometry
            )));
        }
        let far_corner = Position::new(self.side_size - 1, self.side_size - 1);
        if self.geometry.checked_anchor(far_corner).is_none() {
            return Err(GameError::Configuration(format!(
                "a {}x{} board with geometry {:?} does not fit in screen coordinates",
                self.side_size, self.side_size, self.geometry
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_unsatisfiable_capital_distance() {
        let config = GameConfig { side_size: 4, capital_distance: 3, ..GameConfig::default() };
        assert!(matches!(config.validate(), Err(GameError::Configuration(_))));

        let config = GameConfig { side_size: 5, capital_distance: 3, ..GameConfig::default() };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_offer_count_bounds() {
        let config = GameConfig { offers_per_turn: 0, ..GameConfig::default() };
        assert!(config.validate().is_err());
        let config = GameConfig { offers_per_turn: 4, ..GameConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_geometry_must_fit_screen_coordinates() {
        let mut config = GameConfig::default();
        config.geometry.cell_size = i32::MAX;
        assert!(matches!(config.validate(), Err(GameError::Configuration(_))));

        let mut config = GameConfig::default();
        config.geometry.left = i32::MAX - 100;
        assert!(matches!(config.validate(), Err(GameError::Configuration(_))));

        let mut config = GameConfig::default();
        config.geometry.top = -500;
        assert_eq!(config.validate(), Ok(()));
    }
}
