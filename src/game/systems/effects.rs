//! Trigger effects.
//!
//! Effects only read the grid and return the tiles to write back. Nothing is applied until
//! the whole patch has been computed.

use rand::Rng;

use crate::error::GameResult;
use crate::game::entities::Tile;
use crate::game::entities::tile::pick;
use crate::game::grid::Grid;
use crate::game::types::{Owner, Position, TileKind};

/// Tiles to write into the grid, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardPatch {
    pub changes: Vec<Tile>,
}

impl BoardPatch {
    pub fn affected(&self) -> Vec<Position> {
        self.changes.iter().map(|tile| tile.pos).collect()
    }

    pub fn apply(self, grid: &mut Grid) -> GameResult<()> {
        for tile in self.changes {
            grid.set(tile)?;
        }
        Ok(())
    }
}

/// Clear the bomb and its orthogonal neighbours to empty, unowned cells.
/// Capitals and dead cells are left standing.
pub fn bomb_blast(grid: &Grid, origin: Position) -> BoardPatch {
    let mut changes: Vec<Tile> = origin
        .neighbors(grid.side())
        .filter(|pos| grid.get(*pos).is_some_and(|tile| !tile.is_indestructible()))
        .map(Tile::empty)
        .collect();
    changes.push(Tile::empty(origin));
    BoardPatch { changes }
}

/// Chain capture: every unowned or neutral cell touching `owner`'s territory becomes an empty
/// cell of `owner`, then the origin itself does.
///
/// Marks are collected over the whole board first, so cells captured by this activation do not
/// extend its reach.
pub fn area_capture(grid: &Grid, origin: Position, owner: Owner) -> BoardPatch {
    let mut changes: Vec<Tile> = grid
        .iter()
        .filter(|tile| matches!(tile.owner, Owner::Unowned | Owner::Neutral))
        .filter(|tile| !tile.is_indestructible())
        .filter(|tile| grid.has_neighbor_owned_by(tile.pos, owner))
        .map(|tile| Tile::new(tile.pos, TileKind::Empty, owner))
        .collect();
    changes.push(Tile::new(origin, TileKind::Empty, owner));
    BoardPatch { changes }
}

/// Replace the origin with a random non-trivial kind, keeping its owner.
pub fn mutate<R: Rng + ?Sized>(origin: Position, owner: Owner, rng: &mut R) -> BoardPatch {
    let kind = pick(&TileKind::MUTATIONS, rng);
    BoardPatch { changes: vec![Tile::spawn(origin, kind, owner, rng)] }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::game::grid::generate_grid;

    fn owned(grid: &mut Grid, x: usize, y: usize, kind: TileKind, owner: Owner) {
        grid.set(Tile::new(Position::new(x, y), kind, owner)).unwrap();
    }

    #[test]
    fn test_bomb_spares_capital_neighbor() {
        let mut grid = generate_grid(8);
        owned(&mut grid, 3, 3, TileKind::Bomb, Owner::PlayerA);
        owned(&mut grid, 3, 4, TileKind::Capital, Owner::PlayerB);
        owned(&mut grid, 4, 3, TileKind::Tower, Owner::PlayerB);
        owned(&mut grid, 2, 3, TileKind::Empty, Owner::PlayerA);

        let patch = bomb_blast(&grid, Position::new(3, 3));
        let affected = patch.affected();
        assert!(!affected.contains(&Position::new(3, 4)));
        assert_eq!(affected.len(), 4);
        patch.apply(&mut grid).unwrap();

        assert_eq!(grid.get(Position::new(3, 4)).unwrap().kind, TileKind::Capital);
        for pos in [Position::new(3, 3), Position::new(4, 3), Position::new(2, 3), Position::new(3, 2)] {
            let tile = grid.get(pos).unwrap();
            assert_eq!((tile.kind, tile.owner), (TileKind::Empty, Owner::Unowned));
        }
    }

    #[test]
    fn test_bomb_in_corner_stays_in_bounds() {
        let grid = generate_grid(8);
        let patch = bomb_blast(&grid, Position::new(0, 0));
        assert_eq!(patch.changes.len(), 3);
    }

    #[test]
    fn test_area_capture_is_single_step() {
        let mut grid = generate_grid(5);
        owned(&mut grid, 0, 0, TileKind::AreaEffect, Owner::PlayerA);

        area_capture(&grid, Position::new(0, 0), Owner::PlayerA).apply(&mut grid).unwrap();

        // Only the two direct neighbours join; (2, 0) would need a second step.
        assert_eq!(grid.count_owned_by(Owner::PlayerA), 3);
        assert_eq!(grid.get(Position::new(1, 0)).unwrap().owner, Owner::PlayerA);
        assert_eq!(grid.get(Position::new(0, 1)).unwrap().owner, Owner::PlayerA);
        assert_eq!(grid.get(Position::new(2, 0)).unwrap().owner, Owner::Unowned);
        assert_eq!(grid.get(Position::new(0, 0)).unwrap().kind, TileKind::Empty);
    }

    #[test]
    fn test_area_capture_skips_capitals_dead_and_enemy_cells() {
        let mut grid = generate_grid(5);
        owned(&mut grid, 2, 2, TileKind::AreaEffect, Owner::PlayerA);
        owned(&mut grid, 2, 1, TileKind::Capital, Owner::Unowned);
        grid.set(Tile::dead(Position::new(1, 2))).unwrap();
        owned(&mut grid, 3, 2, TileKind::Empty, Owner::PlayerB);

        let patch = area_capture(&grid, Position::new(2, 2), Owner::PlayerA);
        let affected = patch.affected();
        assert_eq!(affected, vec![Position::new(2, 3), Position::new(2, 2)]);
    }

    #[test]
    fn test_mutate_keeps_owner() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..30 {
            let patch = mutate(Position::new(1, 1), Owner::PlayerB, &mut rng);
            let tile = &patch.changes[0];
            assert_eq!(tile.owner, Owner::PlayerB);
            assert!(TileKind::MUTATIONS.contains(&tile.kind));
        }
    }
}
