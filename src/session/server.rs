use actix::prelude::*;
use actix::MessageResult;
use std::collections::HashMap;
use uuid::Uuid;
use log::{debug, error, info, warn};

use crate::error::GameResult;
use crate::game::state::{Board, PlacementResult, TriggerResult};
use crate::game::types::Rejection;
use crate::session::messages::{
    ActionOutcome, ClientAction, CreateGame, GameEnded, GameStateUpdate, GetGameSession,
    GetSnapshot, ProcessClientAction, Subscribe,
};
use crate::session::turn_timer::{start_blitz_timer, stop_blitz_timer};

impl From<PlacementResult> for ActionOutcome {
    fn from(result: PlacementResult) -> Self {
        Self {
            applied: result.applied,
            turn_owner: result.turn_owner,
            affected: result.placed_at.into_iter().collect(),
            rejection: result.rejection,
        }
    }
}

impl From<TriggerResult> for ActionOutcome {
    fn from(result: TriggerResult) -> Self {
        Self {
            applied: result.applied,
            turn_owner: result.turn_owner,
            affected: result.affected,
            rejection: result.rejection,
        }
    }
}

/// One running match.
pub struct GameSession {
    pub game_id: Uuid,
    pub(crate) board: Board,
    subscribers: Vec<Recipient<GameStateUpdate>>,
    pub(crate) blitz_timer: Option<SpawnHandle>,
    manager: Option<Recipient<GameEnded>>,
}

impl Actor for GameSession {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        start_blitz_timer(self, ctx);
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        debug!("[GameSession] Game {} stopped", self.game_id);
        self.notify_ended();
    }
}

impl GameSession {
    /// `manager` is told when the match ends so it can forget the session.
    pub fn new(game_id: Uuid, board: Board, manager: Option<Recipient<GameEnded>>) -> Self {
        Self {
            game_id,
            board,
            subscribers: Vec::new(),
            blitz_timer: None,
            manager,
        }
    }

    fn notify_ended(&mut self) {
        if let Some(manager) = self.manager.take() {
            manager.do_send(GameEnded { game_id: self.game_id });
        }
    }

    /// Broadcast the board and the events produced since the last broadcast.
    pub(crate) fn send_state(&mut self, ctx: &mut Context<Self>) {
        let events = self.board.drain_events();
        for event in &events {
            debug!("[GameSession] Game {} event: {:?}", self.game_id, event);
        }
        let update = GameStateUpdate {
            game_id: self.game_id,
            snapshot: self.board.snapshot(),
            events,
        };
        for subscriber in &self.subscribers {
            subscriber.do_send(update.clone());
        }
        if let Some(winner) = self.board.winner() {
            info!("[GameSession] Game {} over, winner {:?}", self.game_id, winner);
            stop_blitz_timer(self, ctx);
            self.notify_ended();
        }
    }

    fn apply_action(&mut self, action: ClientAction) -> GameResult<ActionOutcome> {
        let turn_owner = self.board.turn_owner();
        let flag = |applied: bool, rejection: Rejection| ActionOutcome {
            applied,
            turn_owner,
            affected: Vec::new(),
            rejection: (!applied).then_some(rejection),
        };
        if self.board.is_over() {
            return Ok(flag(false, Rejection::GameOver));
        }

        Ok(match action {
            ClientAction::Drag { slot, pointer } => {
                flag(self.board.drag_offer(slot, pointer), Rejection::UnknownOffer)
            }
            ClientAction::Drop { slot, pointer } => self.board.attempt_place(slot, pointer)?.into(),
            ClientAction::Place { x, y, kind } => self.board.place(x, y, kind)?.into(),
            ClientAction::Arm { x, y } => flag(self.board.arm_tile(x, y), Rejection::NotTriggerable),
            ClientAction::Trigger { x, y } => self.board.trigger_tile(x, y)?.into(),
            ClientAction::Pass => self.board.pass_turn()?.into(),
        })
    }
}

impl Handler<ProcessClientAction> for GameSession {
    type Result = Result<ActionOutcome, String>;

    fn handle(&mut self, msg: ProcessClientAction, ctx: &mut Context<Self>) -> Self::Result {
        let action = msg.action;
        let outcome = match self.apply_action(action.clone()) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("[GameSession] Game {} aborted on {:?}: {}", self.game_id, action, e);
                stop_blitz_timer(self, ctx);
                ctx.stop();
                return Err(e.to_string());
            }
        };

        if outcome.applied {
            self.send_state(ctx);
        } else {
            warn!(
                "[GameSession] Game {}: {:?} refused ({:?})",
                self.game_id, action, outcome.rejection
            );
        }
        Ok(outcome)
    }
}

impl Handler<Subscribe> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: Subscribe, _: &mut Context<Self>) -> Self::Result {
        let recipient = msg.0;
        recipient.do_send(GameStateUpdate {
            game_id: self.game_id,
            snapshot: self.board.snapshot(),
            events: Vec::new(),
        });
        self.subscribers.push(recipient);
    }
}

impl Handler<GetSnapshot> for GameSession {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _: GetSnapshot, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.board.snapshot())
    }
}

/// Owns every running match.
pub struct GameSessionManager {
    sessions: HashMap<Uuid, Addr<GameSession>>,
}

impl GameSessionManager {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Start a session for `board` and keep its address under a fresh id.
    fn register(&mut self, board: Board, ctx: &mut Context<Self>) -> Uuid {
        let game_id = Uuid::new_v4();
        let session = GameSession::new(game_id, board, Some(ctx.address().recipient())).start();
        self.sessions.insert(game_id, session);
        game_id
    }
}

impl Default for GameSessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

impl Handler<CreateGame> for GameSessionManager {
    type Result = Result<Uuid, String>;

    fn handle(&mut self, msg: CreateGame, ctx: &mut Context<Self>) -> Self::Result {
        let board = Board::new(msg.mode, msg.config).map_err(|e| {
            warn!("[GameSessionManager] Cannot create {:?} game: {}", msg.mode, e);
            e.to_string()
        })?;
        let game_id = self.register(board, ctx);
        info!("[GameSessionManager] Created {:?} game {}", msg.mode, game_id);
        Ok(game_id)
    }
}

impl Handler<GetGameSession> for GameSessionManager {
    type Result = Result<Addr<GameSession>, String>;

    fn handle(&mut self, msg: GetGameSession, _: &mut Context<Self>) -> Self::Result {
        self.sessions.get(&msg.game_id)
            .cloned()
            .ok_or_else(|| "Game session not found".to_string())
    }
}

impl Handler<GameEnded> for GameSessionManager {
    type Result = ();

    fn handle(&mut self, msg: GameEnded, _: &mut Context<Self>) -> Self::Result {
        if self.sessions.remove(&msg.game_id).is_some() {
            info!("[GameSessionManager] Removed game {}", msg.game_id);
        }
    }
}
