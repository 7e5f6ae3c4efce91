/// Blitz countdown scheduling for a GameSession.
///
/// The board only counts ticks; this module decides when they happen. One tick is sent per
/// `tick_millis` while the match runs, and the interval is cancelled once it is over.

use std::time::Duration;
use actix::prelude::*;
use log::{debug, error, info};

use crate::game::types::GameMode;
use crate::game::state::TickOutcome;
use crate::session::server::GameSession;

/// Start the countdown interval. Does nothing for non-Blitz boards or if already running.
pub fn start_blitz_timer(this: &mut GameSession, ctx: &mut Context<GameSession>) {
    if this.board.mode() != GameMode::Blitz || this.blitz_timer.is_some() {
        return;
    }
    let period = Duration::from_millis(this.board.config().tick_millis);
    let handle = ctx.run_interval(period, |act, ctx| {
        on_tick(act, ctx);
    });
    this.blitz_timer = Some(handle);
    debug!("[GameSession] Blitz timer started for game {}", this.game_id);
}

/// Cancel the countdown interval if active.
pub fn stop_blitz_timer(this: &mut GameSession, ctx: &mut Context<GameSession>) {
    if let Some(handle) = this.blitz_timer.take() {
        ctx.cancel_future(handle);
        debug!("[GameSession] Blitz timer stopped for game {}", this.game_id);
    }
}

fn on_tick(this: &mut GameSession, ctx: &mut Context<GameSession>) {
    match this.board.tick_blitz_timer() {
        Ok(TickOutcome::Counting { remaining }) => {
            debug!("[GameSession] Game {}: {}s left", this.game_id, remaining);
            this.send_state(ctx);
        }
        Ok(TickOutcome::Expired { turn_owner }) => {
            info!("[GameSession] Game {}: time is up, {:?} to play", this.game_id, turn_owner);
            this.send_state(ctx);
        }
        Ok(TickOutcome::Idle) => stop_blitz_timer(this, ctx),
        Err(e) => {
            error!("[GameSession] Game {} aborted during tick: {}", this.game_id, e);
            stop_blitz_timer(this, ctx);
            ctx.stop();
        }
    }
}
