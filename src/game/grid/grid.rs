use log::{debug, warn};
use rand::Rng;
use rand::seq::IteratorRandom;

use crate::error::{GameError, GameResult};
use crate::game::entities::Tile;
use crate::game::types::{Owner, Position, TileKind};

/// Square grid of tiles, stored row by row (`cells[y][x]`). Always total: every slot holds a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    side: usize,
    cells: Vec<Vec<Tile>>,
}

/// A `side` × `side` grid of empty, unowned tiles.
pub fn generate_grid(side: usize) -> Grid {
    let cells = (0..side)
        .map(|y| (0..side).map(|x| Tile::empty(Position::new(x, y))).collect())
        .collect();
    Grid { side, cells }
}

impl Grid {
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.side && pos.y < self.side
    }

    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.cells.get(pos.y).and_then(|row| row.get(pos.x))
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        self.cells.get_mut(pos.y).and_then(|row| row.get_mut(pos.x))
    }

    /// Overwrite the slot at `tile.pos`.
    pub fn set(&mut self, tile: Tile) -> GameResult<()> {
        let pos = tile.pos;
        match self.get_mut(pos) {
            Some(slot) => {
                *slot = tile;
                Ok(())
            }
            None => Err(GameError::InvariantViolation(format!(
                "tile written outside the {}x{} grid at {:?}",
                self.side, self.side, pos
            ))),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.cells.iter_mut().flatten()
    }

    pub fn count_owned_by(&self, owner: Owner) -> usize {
        self.iter().filter(|tile| tile.owner == owner).count()
    }

    pub fn live_capitals(&self, owner: Owner) -> usize {
        self.iter()
            .filter(|tile| tile.kind == TileKind::Capital && tile.owner == owner)
            .count()
    }

    /// Whether any in-bounds orthogonal neighbour of `pos` belongs to `owner`.
    pub fn has_neighbor_owned_by(&self, pos: Position, owner: Owner) -> bool {
        pos.neighbors(self.side)
            .filter_map(|n| self.get(n))
            .any(|tile| tile.owner == owner)
    }

    /// The grid is square, total, and every tile sits in the slot it claims.
    pub fn check_invariants(&self) -> GameResult<()> {
        if self.cells.len() != self.side {
            return Err(GameError::InvariantViolation(format!(
                "grid has {} rows, expected {}",
                self.cells.len(),
                self.side
            )));
        }
        for (y, row) in self.cells.iter().enumerate() {
            if row.len() != self.side {
                return Err(GameError::InvariantViolation(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    self.side
                )));
            }
            for (x, tile) in row.iter().enumerate() {
                if tile.pos != Position::new(x, y) {
                    return Err(GameError::InvariantViolation(format!(
                        "tile claiming {:?} stored at ({}, {})",
                        tile.pos, x, y
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Draw two capital positions strictly more than `min_distance` apart on both axes.
///
/// Rejection sampling, capped at `retries` draws.
pub fn create_capitals<R: Rng + ?Sized>(
    grid: &mut Grid,
    min_distance: usize,
    retries: u32,
    rng: &mut R,
) -> GameResult<(Position, Position)> {
    let side = grid.side();
    if side == 0 || side - 1 <= min_distance {
        return Err(GameError::Configuration(format!(
            "no two cells of a {}x{} grid are more than {} apart",
            side, side, min_distance
        )));
    }

    for attempt in 1..=retries {
        let first = Position::new(rng.random_range(0..side), rng.random_range(0..side));
        let second = Position::new(rng.random_range(0..side), rng.random_range(0..side));
        if first.x.abs_diff(second.x) > min_distance && first.y.abs_diff(second.y) > min_distance {
            debug!("[Grid] Capitals placed at {:?} and {:?} after {} draws", first, second, attempt);
            place_capitals(grid, first, second)?;
            return Ok((first, second));
        }
    }

    warn!("[Grid] Gave up placing capitals after {} draws", retries);
    Err(GameError::Configuration(format!(
        "could not place capitals {} apart within {} draws",
        min_distance, retries
    )))
}

/// Put player A's capital at `first` and player B's at `second`.
pub fn place_capitals(grid: &mut Grid, first: Position, second: Position) -> GameResult<()> {
    if first == second {
        return Err(GameError::Configuration(format!(
            "both capitals requested at {:?}",
            first
        )));
    }
    if !grid.contains(first) || !grid.contains(second) {
        return Err(GameError::Configuration(format!(
            "capital positions {:?} / {:?} outside the grid",
            first, second
        )));
    }
    grid.set(Tile::capital(first, Owner::PlayerA))?;
    grid.set(Tile::capital(second, Owner::PlayerB))?;
    Ok(())
}

/// Kill one uniformly chosen unowned cell. Returns `None` once no unowned cell is left.
pub fn eliminate_random_cell<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> GameResult<Option<Position>> {
    let target = grid
        .iter()
        .filter(|tile| tile.owner == Owner::Unowned)
        .map(|tile| tile.pos)
        .choose(rng);

    match target {
        Some(pos) => {
            grid.set(Tile::dead(pos))?;
            Ok(Some(pos))
        }
        None => Ok(None),
    }
}
