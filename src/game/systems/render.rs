//! Plain-text rendering of board snapshots, for the console driver and debug logs.

use std::fmt::Write;

use crate::game::state::{BoardSnapshot, TileView};
use crate::game::types::{Owner, TileKind};

fn owner_symbol(owner: Owner) -> char {
    match owner {
        Owner::PlayerA => 'A',
        Owner::PlayerB => 'B',
        Owner::Neutral => '#',
        Owner::Unowned => '.',
    }
}

pub fn kind_symbol(kind: TileKind) -> char {
    match kind {
        TileKind::Empty => '.',
        TileKind::Capital => '@',
        TileKind::Tower => '^',
        TileKind::Bomb => '*',
        TileKind::RandomMutator => '?',
        TileKind::AreaEffect => '%',
        TileKind::TurnScheduled => '~',
        TileKind::Dead => 'x',
    }
}

/// Two characters per cell: owner then kind. Unowned empty cells are `..`, dead cells `xx`.
pub fn cell_symbol(tile: &TileView) -> String {
    match tile.kind {
        TileKind::Dead => "xx".to_string(),
        kind => format!("{}{}", owner_symbol(tile.owner), kind_symbol(kind)),
    }
}

pub fn render_grid(snapshot: &BoardSnapshot) -> String {
    let mut out = String::from("   ");
    for x in 0..snapshot.side_size {
        let _ = write!(out, "{:<3}", x);
    }
    out.push('\n');

    for (y, row) in snapshot.tiles.iter().enumerate() {
        let _ = write!(out, "{:<3}", y);
        for tile in row {
            let _ = write!(out, "{:<3}", cell_symbol(tile));
        }
        out.push('\n');
    }
    out
}

pub fn render_snapshot(snapshot: &BoardSnapshot) -> String {
    let mut out = format!("--- {:?} | turn {} ---\n", snapshot.mode, snapshot.turn);
    out.push_str(&render_grid(snapshot));

    match snapshot.winner {
        Some(winner) => {
            let _ = writeln!(out, "{:?} wins!", winner);
        }
        None => {
            let _ = write!(out, "{:?} to play", snapshot.turn_owner);
            if let Some(seconds) = snapshot.countdown {
                let _ = write!(out, " ({}s left)", seconds);
            }
            out.push('\n');
            let offers: Vec<String> = snapshot
                .offers
                .iter()
                .enumerate()
                .map(|(slot, offer)| format!("[{}] {:?} '{}'", slot, offer.kind, kind_symbol(offer.kind)))
                .collect();
            let _ = writeln!(out, "Offers: {}", offers.join("  "));
        }
    }
    out
}
