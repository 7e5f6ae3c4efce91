use actix::prelude::*;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use super::server::GameSession;
use crate::config::GameConfig;
use crate::game::state::BoardSnapshot;
use crate::game::types::{GameEvent, GameMode, Owner, Position, Rejection, ScreenPos, TileKind};

/// A player input, already translated from whatever device produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientAction {
    /// Drag the offer in `slot` to `pointer` without dropping it.
    Drag { slot: usize, pointer: ScreenPos },
    /// Drop the offer in `slot` at `pointer`.
    Drop { slot: usize, pointer: ScreenPos },
    /// Place an offered kind straight onto a cell.
    Place { x: usize, y: usize, kind: TileKind },
    Arm { x: usize, y: usize },
    Trigger { x: usize, y: usize },
    Pass,
}

/// Result of a [`ClientAction`] as seen by the player who sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub applied: bool,
    pub turn_owner: Owner,
    pub affected: Vec<Position>,
    pub rejection: Option<Rejection>,
}

#[derive(Message)]
#[rtype(result = "Result<ActionOutcome, String>")]
pub struct ProcessClientAction {
    pub action: ClientAction,
}

#[derive(Message, Clone, Serialize, Deserialize, Debug)]
#[rtype(result = "()")]
pub struct GameStateUpdate {
    pub game_id: Uuid,
    pub snapshot: BoardSnapshot,
    /// Events produced since the previous update.
    pub events: Vec<GameEvent>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Subscribe(pub Recipient<GameStateUpdate>);

#[derive(Message)]
#[rtype(result = "BoardSnapshot")]
pub struct GetSnapshot;

#[derive(Message)]
#[rtype(result = "Result<Uuid, String>")]
pub struct CreateGame {
    pub mode: GameMode,
    pub config: GameConfig,
}

#[derive(Message)]
#[rtype(result = "Result<Addr<GameSession>, String>")]
pub struct GetGameSession {
    pub game_id: Uuid,
}

/// Sent by a session to its manager once the match has a winner or the actor stops.
#[derive(Message)]
#[rtype(result = "()")]
pub struct GameEnded {
    pub game_id: Uuid,
}
