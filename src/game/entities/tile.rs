//! Tile entity.
//!
//! A tile is the occupant of exactly one grid cell. Kind changes never mutate a tile in place:
//! the grid slot is overwritten with a freshly built tile instead. The only in-place state is
//! the arming flag of triggerable tiles and the mask of scheduled tiles.

use rand::Rng;
use rand::seq::IteratorRandom;

use crate::game::grid::Grid;
use crate::game::systems::effects::{self, BoardPatch};
use crate::game::types::{Capabilities, Owner, Position, Rejection, TileKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub pos: Position,
    pub owner: Owner,
    pub kind: TileKind,
    /// Concealed kind of a `TurnScheduled` tile; `None` for every other kind.
    pub mask: Option<TileKind>,
    /// Number of times the mask has been re-rolled.
    pub rerolls: u32,
    armed: bool,
}

/// Two-phase activation: arm on press, fire on release.
pub trait Triggerable {
    /// Arm the tile. Returns whether the tile is now armed.
    fn arm(&mut self) -> bool;

    fn is_armed(&self) -> bool;

    /// Consume the arm and compute the effect on `grid`.
    ///
    /// Refused unless the tile was armed and `turn_owner` owns it.
    fn fire<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        turn_owner: Owner,
        rng: &mut R,
    ) -> Result<BoardPatch, Rejection>;
}

/// Uniform pick from a non-empty pool.
pub(crate) fn pick<R: Rng + ?Sized>(pool: &[TileKind], rng: &mut R) -> TileKind {
    pool.iter().copied().choose(rng).unwrap_or(TileKind::Empty)
}

impl Tile {
    /// A plain tile. Scheduled tiles need a mask, see [`Tile::spawn`].
    pub fn new(pos: Position, kind: TileKind, owner: Owner) -> Self {
        Self {
            pos,
            owner,
            kind,
            mask: None,
            rerolls: 0,
            armed: false,
        }
    }

    /// Empty and unowned.
    pub fn empty(pos: Position) -> Self {
        Self::new(pos, TileKind::Empty, Owner::Unowned)
    }

    pub fn capital(pos: Position, owner: Owner) -> Self {
        Self::new(pos, TileKind::Capital, owner)
    }

    pub fn dead(pos: Position) -> Self {
        Self::new(pos, TileKind::Dead, Owner::Neutral)
    }

    pub fn scheduled(pos: Position, owner: Owner, mask: TileKind) -> Self {
        Self {
            mask: Some(mask),
            ..Self::new(pos, TileKind::TurnScheduled, owner)
        }
    }

    /// Build a tile of any kind, rolling the initial mask for scheduled tiles.
    pub fn spawn<R: Rng + ?Sized>(pos: Position, kind: TileKind, owner: Owner, rng: &mut R) -> Self {
        match kind {
            TileKind::TurnScheduled => Self::scheduled(pos, owner, pick(&TileKind::INITIAL_MASKS, rng)),
            _ => Self::new(pos, kind, owner),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    /// The kind whose behaviour a trigger runs: the mask for scheduled tiles.
    pub fn effective_kind(&self) -> TileKind {
        match (self.kind, self.mask) {
            (TileKind::TurnScheduled, Some(mask)) => mask,
            (kind, _) => kind,
        }
    }

    pub fn is_triggerable(&self) -> bool {
        self.effective_kind().capabilities().triggerable
    }

    pub fn is_protected(&self) -> bool {
        self.capabilities().protected
    }

    /// Capitals and dead cells survive every blast and chain capture.
    pub fn is_indestructible(&self) -> bool {
        matches!(self.kind, TileKind::Capital | TileKind::Dead)
    }

    /// Roll a new mask for a scheduled tile. Does nothing for other kinds.
    pub fn reroll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if !self.capabilities().turn_scheduled {
            return;
        }
        self.mask = Some(pick(&TileKind::REROLLS, rng));
        self.rerolls += 1;
        self.armed = false;
    }
}

impl Triggerable for Tile {
    fn arm(&mut self) -> bool {
        if self.is_triggerable() {
            self.armed = true;
        }
        self.armed
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn fire<R: Rng + ?Sized>(
        &mut self,
        grid: &Grid,
        turn_owner: Owner,
        rng: &mut R,
    ) -> Result<BoardPatch, Rejection> {
        let armed = std::mem::take(&mut self.armed);
        if !self.is_triggerable() {
            return Err(Rejection::NotTriggerable);
        }
        if !armed {
            return Err(Rejection::NotArmed);
        }
        if turn_owner != self.owner {
            return Err(Rejection::OutOfTurn);
        }

        match self.effective_kind() {
            TileKind::Bomb => Ok(effects::bomb_blast(grid, self.pos)),
            TileKind::AreaEffect => Ok(effects::area_capture(grid, self.pos, self.owner)),
            TileKind::RandomMutator => Ok(effects::mutate(self.pos, self.owner, rng)),
            _ => Err(Rejection::NotTriggerable),
        }
    }
}
