use serde::{Serialize, Deserialize};

/// A cell coordinate on the board (`x` = column, `y` = row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbours that lie inside a `side` × `side` board
    /// (below, above, right, left).
    pub fn neighbors(self, side: usize) -> impl Iterator<Item = Position> {
        let Position { x, y } = self;
        [
            Some(Position::new(x, y + 1)),
            y.checked_sub(1).map(|y| Position::new(x, y)),
            Some(Position::new(x + 1, y)),
            x.checked_sub(1).map(|x| Position::new(x, y)),
        ]
        .into_iter()
        .flatten()
        .filter(move |p| p.x < side && p.y < side)
    }
}

/// A point in presentation (pixel) space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPos {
    pub x: i32,
    pub y: i32,
}

impl ScreenPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Screen layout of the board, used for proximity-snapping dropped offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub left: i32,
    pub top: i32,
    pub cell_size: i32,
    pub cell_gap: i32,
}

impl Geometry {
    /// Top-left pixel of the cell at `pos`, or `None` if it does not fit in screen coordinates.
    pub fn checked_anchor(&self, pos: Position) -> Option<ScreenPos> {
        let step = self.cell_size.checked_add(self.cell_gap)?;
        let offset = |origin: i32, index: usize| {
            i32::try_from(index).ok()?.checked_mul(step)?.checked_add(origin)
        };
        Some(ScreenPos::new(offset(self.left, pos.x)?, offset(self.top, pos.y)?))
    }

    /// Top-left pixel of the cell at `pos`.
    ///
    /// Saturates at the `i32` bounds; a validated geometry never reaches them for in-bounds cells.
    pub fn anchor(&self, pos: Position) -> ScreenPos {
        let step = i64::from(self.cell_size) + i64::from(self.cell_gap);
        let offset = |origin: i32, index: usize| {
            let index = i64::try_from(index).unwrap_or(i64::MAX);
            let value = i64::from(origin).saturating_add(step.saturating_mul(index));
            value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
        };
        ScreenPos::new(offset(self.left, pos.x), offset(self.top, pos.y))
    }

    /// Whether `point` is close enough to the anchor of `pos` to snap onto it.
    /// The tolerance is a third of a cell on both axes (exclusive).
    pub fn snaps_to(&self, pos: Position, point: ScreenPos) -> bool {
        let anchor = self.anchor(pos);
        let tolerance = (self.cell_size / 3).unsigned_abs();
        anchor.x.abs_diff(point.x) < tolerance && anchor.y.abs_diff(point.y) < tolerance
    }
}

/// Who a tile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    /// Permanent non-player cells (dead cells).
    Neutral,
    /// Moves first.
    PlayerA,
    PlayerB,
    /// Never played or freshly emptied.
    Unowned,
}

impl Owner {
    /// The other player. Non-player owners have no opponent and map to themselves.
    pub const fn opponent(self) -> Owner {
        match self {
            Owner::PlayerA => Owner::PlayerB,
            Owner::PlayerB => Owner::PlayerA,
            other => other,
        }
    }
}

/// Tag of a tile variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Empty,
    Capital,
    Tower,
    Bomb,
    RandomMutator,
    AreaEffect,
    TurnScheduled,
    Dead,
}

/// What a tile kind is able to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Can be armed and fired by its owner.
    pub triggerable: bool,
    /// Cannot be captured by the opponent.
    pub protected: bool,
    /// Re-rolls a masked kind when its owner's turn ends.
    pub turn_scheduled: bool,
}

impl TileKind {
    /// Kinds a player may be offered for placement.
    pub const OFFERS: [TileKind; 6] = [
        TileKind::TurnScheduled,
        TileKind::RandomMutator,
        TileKind::Empty,
        TileKind::Tower,
        TileKind::Bomb,
        TileKind::AreaEffect,
    ];

    /// Outcomes of a random mutation: non-trivial kinds other than the mutator itself.
    pub const MUTATIONS: [TileKind; 4] = [
        TileKind::TurnScheduled,
        TileKind::Tower,
        TileKind::Bomb,
        TileKind::AreaEffect,
    ];

    /// Masks a scheduled tile may start with.
    pub const INITIAL_MASKS: [TileKind; 5] = [
        TileKind::RandomMutator,
        TileKind::Empty,
        TileKind::Tower,
        TileKind::Bomb,
        TileKind::AreaEffect,
    ];

    /// Masks a scheduled tile re-rolls into: non-trivial kinds other than itself.
    pub const REROLLS: [TileKind; 4] = [
        TileKind::RandomMutator,
        TileKind::Tower,
        TileKind::Bomb,
        TileKind::AreaEffect,
    ];

    pub const fn capabilities(self) -> Capabilities {
        match self {
            TileKind::Empty | TileKind::Capital | TileKind::Dead => Capabilities {
                triggerable: false,
                protected: false,
                turn_scheduled: false,
            },
            TileKind::Tower => Capabilities {
                triggerable: false,
                protected: true,
                turn_scheduled: false,
            },
            TileKind::Bomb | TileKind::RandomMutator => Capabilities {
                triggerable: true,
                protected: false,
                turn_scheduled: false,
            },
            TileKind::AreaEffect => Capabilities {
                triggerable: true,
                protected: true,
                turn_scheduled: false,
            },
            // Triggerability comes from the masked kind.
            TileKind::TurnScheduled => Capabilities {
                triggerable: false,
                protected: false,
                turn_scheduled: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Standard,
    /// Each turn must be played before a countdown runs out.
    Blitz,
    /// One unowned cell dies on every turn change.
    Death,
}

/// Why an action was refused. Refusals leave the board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    GameOver,
    OutOfBounds,
    OutOfTurn,
    /// Target cell fails the capture rules.
    NotCapturable,
    /// No staged offer in that slot, or the kind is not on offer.
    UnknownOffer,
    /// A dropped offer did not land near any capturable cell.
    NoTargetCell,
    NotTriggerable,
    NotArmed,
}

/// Hooks for the presentation layer, drained from the board after each action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    TilePlaced { pos: Position, kind: TileKind, owner: Owner },
    TileTriggered { pos: Position, kind: TileKind, owner: Owner, affected: Vec<Position> },
    CellEliminated { pos: Position },
    TimerExpired { turn_owner: Owner },
    TurnChanged { turn_owner: Owner, turn: u32 },
    GameOver { winner: Owner },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_has_two_neighbors() {
        let n: Vec<_> = Position::new(0, 0).neighbors(8).collect();
        assert_eq!(n, vec![Position::new(0, 1), Position::new(1, 0)]);

        let n: Vec<_> = Position::new(7, 7).neighbors(8).collect();
        assert_eq!(n, vec![Position::new(7, 6), Position::new(6, 7)]);
    }

    #[test]
    fn test_inner_cell_has_four_neighbors() {
        assert_eq!(Position::new(3, 4).neighbors(8).count(), 4);
    }

    #[test]
    fn test_snap_tolerance_is_exclusive() {
        let geometry = Geometry { left: 10, top: 20, cell_size: 30, cell_gap: 5 };
        let pos = Position::new(2, 1);
        assert_eq!(geometry.anchor(pos), ScreenPos::new(80, 55));
        assert!(geometry.snaps_to(pos, ScreenPos::new(89, 46)));
        assert!(!geometry.snaps_to(pos, ScreenPos::new(90, 55)));
    }

    #[test]
    fn test_snap_far_off_screen() {
        let geometry = Geometry { left: 10, top: 20, cell_size: 30, cell_gap: 5 };
        for point in [ScreenPos::new(i32::MIN, i32::MIN), ScreenPos::new(i32::MAX, i32::MAX), ScreenPos::new(i32::MIN, 55)] {
            assert!(!geometry.snaps_to(Position::new(2, 1), point));
        }
    }

    #[test]
    fn test_anchor_out_of_range() {
        let geometry = Geometry { left: 0, top: 0, cell_size: i32::MAX, cell_gap: 6 };
        assert_eq!(geometry.checked_anchor(Position::new(0, 0)), None);
        assert_eq!(geometry.anchor(Position::new(3, 0)), ScreenPos::new(i32::MAX, 0));

        let geometry = Geometry { left: 64, top: 32, cell_size: 96, cell_gap: 6 };
        assert_eq!(geometry.checked_anchor(Position::new(2, 1)), Some(geometry.anchor(Position::new(2, 1))));
        assert_eq!(geometry.checked_anchor(Position::new(usize::MAX, 0)), None);
    }

    #[test]
    fn test_capability_table() {
        assert!(TileKind::Tower.capabilities().protected);
        assert!(TileKind::AreaEffect.capabilities().protected);
        assert!(TileKind::AreaEffect.capabilities().triggerable);
        assert!(!TileKind::Capital.capabilities().protected);
        assert!(TileKind::TurnScheduled.capabilities().turn_scheduled);
        assert!(!TileKind::MUTATIONS.contains(&TileKind::Empty));
        assert!(!TileKind::MUTATIONS.contains(&TileKind::RandomMutator));
        assert!(!TileKind::REROLLS.contains(&TileKind::TurnScheduled));
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Owner::PlayerA.opponent(), Owner::PlayerB);
        assert_eq!(Owner::PlayerB.opponent(), Owner::PlayerA);
        assert_eq!(Owner::Unowned.opponent(), Owner::Unowned);
    }
}
