//! Board state and the turn state machine.
//!
//! A [`Board`] is one match: the grid, whose turn it is, the staged offers, the mode-specific
//! state (Blitz countdown) and the queue of [`GameEvent`]s waiting for the presentation layer.

use log::{debug, error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Serialize, Deserialize};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::game::entities::{StagedOffer, Staging, Tile, Triggerable};
use crate::game::grid::{create_capitals, eliminate_random_cell, generate_grid, place_capitals, Grid};
use crate::game::systems::{BlitzTimer, CaptureRules};
use crate::game::types::{GameEvent, GameMode, Owner, Position, Rejection, ScreenPos, TileKind};

/// Outcome of a placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementResult {
    pub applied: bool,
    /// Turn owner after the attempt.
    pub turn_owner: Owner,
    pub placed_at: Option<Position>,
    pub rejection: Option<Rejection>,
}

/// Outcome of firing a placed tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerResult {
    pub applied: bool,
    pub turn_owner: Owner,
    /// Cells rewritten by the effect.
    pub affected: Vec<Position>,
    pub rejection: Option<Rejection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Not a Blitz board, or the match is over.
    Idle,
    Counting { remaining: u32 },
    /// The countdown ran out and the turn was passed.
    Expired { turn_owner: Owner },
}

/// What the presentation layer needs to draw one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub pos: Position,
    pub owner: Owner,
    pub kind: TileKind,
}

/// Read-only copy of the board for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub mode: GameMode,
    pub side_size: usize,
    pub turn: u32,
    pub turn_owner: Owner,
    /// Row by row.
    pub tiles: Vec<Vec<TileView>>,
    pub offers: Vec<StagedOffer>,
    pub countdown: Option<u32>,
    pub winner: Option<Owner>,
}

/// Initial capital positions, player A first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capitals {
    pub player_a: Position,
    pub player_b: Position,
}

#[derive(Debug, Clone)]
pub struct Board {
    mode: GameMode,
    config: GameConfig,
    grid: Grid,
    turn_owner: Owner,
    turn: u32,
    capitals: Capitals,
    staging: Staging,
    blitz: Option<BlitzTimer>,
    winner: Option<Owner>,
    events: Vec<GameEvent>,
    rng: StdRng,
}

impl Board {
    /// Set up a match with randomly placed capitals.
    pub fn new(mode: GameMode, config: GameConfig) -> GameResult<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut grid = generate_grid(config.side_size);
        let (player_a, player_b) =
            create_capitals(&mut grid, config.capital_distance, config.capital_retries, &mut rng)?;
        Ok(Self::assemble(mode, config, grid, Capitals { player_a, player_b }, rng))
    }

    /// Set up a match with capitals at fixed positions.
    pub fn with_capitals(
        mode: GameMode,
        config: GameConfig,
        player_a: Position,
        player_b: Position,
    ) -> GameResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut grid = generate_grid(config.side_size);
        place_capitals(&mut grid, player_a, player_b)?;
        Ok(Self::assemble(mode, config, grid, Capitals { player_a, player_b }, rng))
    }

    fn assemble(mode: GameMode, config: GameConfig, grid: Grid, capitals: Capitals, mut rng: StdRng) -> Self {
        let staging = Staging::roll(config.offers_per_turn, &mut rng);
        let blitz = (mode == GameMode::Blitz).then(|| BlitzTimer::new(config.blitz_seconds));
        info!(
            "[Board] New {:?} match on a {}x{} grid, capitals at {:?} / {:?}",
            mode, config.side_size, config.side_size, capitals.player_a, capitals.player_b
        );
        Self {
            mode,
            config,
            grid,
            turn_owner: Owner::PlayerA,
            turn: 0,
            capitals,
            staging,
            blitz,
            winner: None,
            events: Vec::new(),
            rng,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn side_size(&self) -> usize {
        self.grid.side()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn tile(&self, x: usize, y: usize) -> Option<&Tile> {
        self.grid.get(Position::new(x, y))
    }

    pub fn turn_owner(&self) -> Owner {
        self.turn_owner
    }

    /// Number of completed turns.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn capitals(&self) -> Capitals {
        self.capitals
    }

    pub fn offers(&self) -> &[StagedOffer] {
        self.staging.offers()
    }

    /// Seconds left in the current Blitz turn.
    pub fn countdown(&self) -> Option<u32> {
        self.blitz.map(|timer| timer.remaining())
    }

    pub fn winner(&self) -> Option<Owner> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    fn rules(&self) -> CaptureRules {
        CaptureRules::from(self.mode)
    }

    /// Whether the current turn owner may place a tile on `(x, y)`.
    pub fn is_cell_can_be_captured(&self, x: usize, y: usize) -> bool {
        self.rules().can_capture(&self.grid, Position::new(x, y), self.turn_owner)
    }

    /// Every cell the current turn owner may place on, row by row.
    pub fn capturable_cells(&self) -> Vec<Position> {
        let rules = self.rules();
        self.grid
            .iter()
            .map(|tile| tile.pos)
            .filter(|pos| rules.can_capture(&self.grid, *pos, self.turn_owner))
            .collect()
    }

    fn rejected(&self, rejection: Rejection) -> PlacementResult {
        debug!("[Board] Placement by {:?} refused: {:?}", self.turn_owner, rejection);
        PlacementResult {
            applied: false,
            turn_owner: self.turn_owner,
            placed_at: None,
            rejection: Some(rejection),
        }
    }

    /// Record where the player is dragging the offer in `slot`.
    pub fn drag_offer(&mut self, slot: usize, pointer: ScreenPos) -> bool {
        self.staging.drag(slot, pointer)
    }

    /// Drop the offer in `slot` at `pointer`: the first capturable cell whose anchor lies within
    /// a third of a cell of the pointer receives the offered tile.
    ///
    /// Cells are scanned column by column; at most one cell can match a given pointer.
    pub fn attempt_place(&mut self, slot: usize, pointer: ScreenPos) -> GameResult<PlacementResult> {
        if self.is_over() {
            return Ok(self.rejected(Rejection::GameOver));
        }
        let Some(kind) = self.staging.get(slot).map(|offer| offer.kind) else {
            return Ok(self.rejected(Rejection::UnknownOffer));
        };
        self.staging.drag(slot, pointer);

        let side = self.side_size();
        let geometry = self.config.geometry;
        let target = (0..side)
            .flat_map(|x| (0..side).map(move |y| Position::new(x, y)))
            .find(|pos| {
                geometry.snaps_to(*pos, pointer) && self.rules().can_capture(&self.grid, *pos, self.turn_owner)
            });

        match target {
            Some(pos) => self.commit_placement(pos, kind),
            None => {
                self.staging.release(slot);
                Ok(self.rejected(Rejection::NoTargetCell))
            }
        }
    }

    /// Place an offered kind directly on a grid cell.
    pub fn place(&mut self, x: usize, y: usize, kind: TileKind) -> GameResult<PlacementResult> {
        let pos = Position::new(x, y);
        if self.is_over() {
            return Ok(self.rejected(Rejection::GameOver));
        }
        if !self.grid.contains(pos) {
            return Ok(self.rejected(Rejection::OutOfBounds));
        }
        if !self.staging.contains(kind) {
            return Ok(self.rejected(Rejection::UnknownOffer));
        }
        if !self.is_cell_can_be_captured(x, y) {
            return Ok(self.rejected(Rejection::NotCapturable));
        }
        self.commit_placement(pos, kind)
    }

    fn commit_placement(&mut self, pos: Position, kind: TileKind) -> GameResult<PlacementResult> {
        let owner = self.turn_owner;
        let tile = Tile::spawn(pos, kind, owner, &mut self.rng);
        self.grid.set(tile)?;
        debug!("[Board] {:?} placed {:?} at {:?}", owner, kind, pos);
        self.events.push(GameEvent::TilePlaced { pos, kind, owner });

        self.change_current_direction()?;
        self.settle()?;
        Ok(PlacementResult {
            applied: true,
            turn_owner: self.turn_owner,
            placed_at: Some(pos),
            rejection: None,
        })
    }

    fn trigger_refused(&self, pos: Position, rejection: Rejection) -> TriggerResult {
        debug!("[Board] Trigger at {:?} refused: {:?}", pos, rejection);
        TriggerResult {
            applied: false,
            turn_owner: self.turn_owner,
            affected: Vec::new(),
            rejection: Some(rejection),
        }
    }

    /// First half of a trigger gesture. Returns whether the tile at `(x, y)` is now armed.
    pub fn arm_tile(&mut self, x: usize, y: usize) -> bool {
        if self.is_over() {
            return false;
        }
        self.grid
            .get_mut(Position::new(x, y))
            .is_some_and(|tile| tile.arm())
    }

    /// Second half of a trigger gesture: fire the armed tile at `(x, y)`.
    pub fn trigger_tile(&mut self, x: usize, y: usize) -> GameResult<TriggerResult> {
        let pos = Position::new(x, y);
        if self.is_over() {
            return Ok(self.trigger_refused(pos, Rejection::GameOver));
        }
        let Some(mut tile) = self.grid.get(pos).cloned() else {
            return Ok(self.trigger_refused(pos, Rejection::OutOfBounds));
        };

        let fired = tile.fire(&self.grid, self.turn_owner, &mut self.rng);
        // Keep the consumed arm even when the fire is refused.
        let kind = tile.effective_kind();
        let owner = tile.owner;
        self.grid.set(tile)?;

        let patch = match fired {
            Ok(patch) => patch,
            Err(rejection) => return Ok(self.trigger_refused(pos, rejection)),
        };
        let affected = patch.affected();
        patch.apply(&mut self.grid)?;
        info!("[Board] {:?} fired {:?} at {:?}, {} cells rewritten", owner, kind, pos, affected.len());
        self.events.push(GameEvent::TileTriggered { pos, kind, owner, affected: affected.clone() });

        self.change_current_direction()?;
        self.settle()?;
        Ok(TriggerResult {
            applied: true,
            turn_owner: self.turn_owner,
            affected,
            rejection: None,
        })
    }

    /// Arm and fire in one call, for callers without a press/release gesture.
    pub fn fire_tile(&mut self, x: usize, y: usize) -> GameResult<TriggerResult> {
        self.arm_tile(x, y);
        self.trigger_tile(x, y)
    }

    /// Give up the current turn without placing anything.
    pub fn pass_turn(&mut self) -> GameResult<PlacementResult> {
        if self.is_over() {
            return Ok(self.rejected(Rejection::GameOver));
        }
        debug!("[Board] {:?} passes", self.turn_owner);
        self.change_current_direction()?;
        self.settle()?;
        Ok(PlacementResult {
            applied: true,
            turn_owner: self.turn_owner,
            placed_at: None,
            rejection: None,
        })
    }

    /// One second of the Blitz countdown. When it runs out the turn is passed.
    pub fn tick_blitz_timer(&mut self) -> GameResult<TickOutcome> {
        if self.is_over() {
            return Ok(TickOutcome::Idle);
        }
        let Some(timer) = self.blitz.as_mut() else {
            return Ok(TickOutcome::Idle);
        };
        if !timer.tick() {
            return Ok(TickOutcome::Counting { remaining: timer.remaining() });
        }

        let expired_for = self.turn_owner;
        info!("[Board] Blitz countdown expired for {:?}", expired_for);
        self.events.push(GameEvent::TimerExpired { turn_owner: expired_for });
        let passed = self.pass_turn()?;
        Ok(TickOutcome::Expired { turn_owner: passed.turn_owner })
    }

    /// Advance to the next turn: re-roll the outgoing player's scheduled tiles, run the Death
    /// ritual, hand the turn over and draw new offers.
    pub fn change_current_direction(&mut self) -> GameResult<()> {
        let outgoing = self.turn_owner;
        for tile in self.grid.iter_mut() {
            if tile.owner == outgoing && tile.capabilities().turn_scheduled {
                tile.reroll(&mut self.rng);
            }
        }

        if self.mode == GameMode::Death {
            match eliminate_random_cell(&mut self.grid, &mut self.rng)? {
                Some(pos) => {
                    debug!("[Board] Cell {:?} died", pos);
                    self.events.push(GameEvent::CellEliminated { pos });
                }
                None => debug!("[Board] No unowned cell left to kill"),
            }
        }

        self.turn_owner = outgoing.opponent();
        self.turn += 1;
        self.staging = Staging::roll(self.config.offers_per_turn, &mut self.rng);
        if let Some(timer) = self.blitz.as_mut() {
            timer.reset();
        }
        self.events.push(GameEvent::TurnChanged { turn_owner: self.turn_owner, turn: self.turn });
        Ok(())
    }

    /// The surviving player once one side has lost every capital.
    ///
    /// Both sides losing their capitals at once cannot happen under the capture rules and is
    /// reported as an invariant violation.
    pub fn is_win(&self) -> GameResult<Option<Owner>> {
        let player_a = self.grid.live_capitals(Owner::PlayerA) > 0;
        let player_b = self.grid.live_capitals(Owner::PlayerB) > 0;
        match (player_a, player_b) {
            (true, true) => Ok(None),
            (true, false) => Ok(Some(Owner::PlayerA)),
            (false, true) => Ok(Some(Owner::PlayerB)),
            (false, false) => Err(GameError::InvariantViolation(
                "neither player holds a capital".into(),
            )),
        }
    }

    /// Post-action bookkeeping: verify the grid and detect the end of the match.
    fn settle(&mut self) -> GameResult<()> {
        match self.grid.check_invariants().and_then(|()| self.is_win()) {
            Ok(Some(winner)) => {
                info!("[Board] {:?} wins after {} turns", winner, self.turn);
                self.winner = Some(winner);
                self.events.push(GameEvent::GameOver { winner });
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => {
                error!("[Board] {}", e);
                Err(e)
            }
        }
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let side = self.side_size();
        let tiles = (0..side)
            .map(|y| {
                (0..side)
                    .filter_map(|x| self.tile(x, y))
                    .map(|tile| TileView { pos: tile.pos, owner: tile.owner, kind: tile.kind })
                    .collect()
            })
            .collect();
        BoardSnapshot {
            mode: self.mode,
            side_size: side,
            turn: self.turn,
            turn_owner: self.turn_owner,
            tiles,
            offers: self.staging.offers().to_vec(),
            countdown: self.countdown(),
            winner: self.winner,
        }
    }

    /// Overwrite one cell. Scenario setup only.
    #[cfg(test)]
    pub(crate) fn set_tile(&mut self, tile: Tile) {
        self.grid.set(tile).expect("tile inside the grid");
    }

    /// Replace the staged offers. Scenario setup only.
    #[cfg(test)]
    pub(crate) fn set_offers(&mut self, kinds: &[TileKind]) {
        self.staging = Staging::from_kinds(kinds);
    }
}
