//! Console driver.
//!
//! Starts a game session on the actor system and plays it from stdin, one command per line.
//! The board is printed every time the session broadcasts a state update.

use std::io;

use actix::prelude::*;
use clap::{Parser, ValueEnum};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

use cellwar::config::GameConfig;
use cellwar::config::game::{CAPITAL_MIN_DISTANCE, SIDE_SIZE};
use cellwar::game::systems::render_snapshot;
use cellwar::game::types::{GameMode, Geometry, Position, TileKind};
use cellwar::session::GameSessionManager;
use cellwar::session::messages::{
    ClientAction, CreateGame, GameStateUpdate, GetGameSession, GetSnapshot, ProcessClientAction,
    Subscribe,
};

const HELP: &str = "\
Commands:
  place <slot> <x> <y>   drop the offer in <slot> onto cell (x, y)
  put <x> <y> <kind>     place an offered kind (empty|tower|bomb|random|area|scheduled)
  arm <x> <y>            press on a placed tile
  trigger <x> <y>        release on a placed tile
  fire <x> <y>           arm + trigger
  pass                   end your turn
  show | json            print the board
  help | quit";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Standard,
    Blitz,
    Death,
}

impl From<ModeArg> for GameMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Standard => GameMode::Standard,
            ModeArg::Blitz => GameMode::Blitz,
            ModeArg::Death => GameMode::Death,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "cellwar", about = "Play a territory-capture match in the terminal")]
struct Args {
    #[arg(long, value_enum, default_value_t = ModeArg::Standard)]
    mode: ModeArg,
    /// Cells per board side.
    #[arg(long, default_value_t = SIDE_SIZE)]
    size: usize,
    /// Minimum capital separation on both axes.
    #[arg(long, default_value_t = CAPITAL_MIN_DISTANCE)]
    distance: usize,
    #[arg(long)]
    seed: Option<u64>,
    /// Print state updates as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Actions(Vec<ClientAction>),
    Show,
    Json,
    Help,
    Quit,
}

fn parse_kind(word: &str) -> Result<TileKind, String> {
    match word {
        "empty" => Ok(TileKind::Empty),
        "tower" => Ok(TileKind::Tower),
        "bomb" => Ok(TileKind::Bomb),
        "random" => Ok(TileKind::RandomMutator),
        "area" => Ok(TileKind::AreaEffect),
        "scheduled" => Ok(TileKind::TurnScheduled),
        other => Err(format!("unknown tile kind '{}'", other)),
    }
}

fn parse_numbers<const N: usize>(args: &[&str]) -> Result<[usize; N], String> {
    if args.len() != N {
        return Err(format!("expected {} numbers, got {}", N, args.len()));
    }
    let mut out = [0; N];
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = arg.parse().map_err(|_| format!("'{}' is not a number", arg))?;
    }
    Ok(out)
}

fn parse_command(line: &str, geometry: &Geometry) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = words.split_first() else {
        return Err("empty command, try 'help'".to_string());
    };

    let command = match head {
        "place" => {
            let [slot, x, y] = parse_numbers(args)?;
            let pointer = geometry.anchor(Position::new(x, y));
            Command::Actions(vec![
                ClientAction::Drag { slot, pointer },
                ClientAction::Drop { slot, pointer },
            ])
        }
        "put" => {
            let (kind, coords) = args.split_last().ok_or("usage: put <x> <y> <kind>")?;
            let [x, y] = parse_numbers(coords)?;
            Command::Actions(vec![ClientAction::Place { x, y, kind: parse_kind(kind)? }])
        }
        "arm" => {
            let [x, y] = parse_numbers(args)?;
            Command::Actions(vec![ClientAction::Arm { x, y }])
        }
        "trigger" => {
            let [x, y] = parse_numbers(args)?;
            Command::Actions(vec![ClientAction::Trigger { x, y }])
        }
        "fire" => {
            let [x, y] = parse_numbers(args)?;
            Command::Actions(vec![ClientAction::Arm { x, y }, ClientAction::Trigger { x, y }])
        }
        "pass" => Command::Actions(vec![ClientAction::Pass]),
        "show" => Command::Show,
        "json" => Command::Json,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(command)
}

/// Prints every state update it receives.
struct Printer {
    json: bool,
}

impl Actor for Printer {
    type Context = Context<Self>;
}

impl Handler<GameStateUpdate> for Printer {
    type Result = ();

    fn handle(&mut self, msg: GameStateUpdate, _: &mut Context<Self>) -> Self::Result {
        if self.json {
            match serde_json::to_string(&msg) {
                Ok(text) => println!("{}", text),
                Err(e) => println!("{{\"error\":\"{}\"}}", e),
            }
            return;
        }
        for event in &msg.events {
            println!("> {:?}", event);
        }
        println!("{}", render_snapshot(&msg.snapshot));
    }
}

#[actix::main]
async fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = GameConfig {
        side_size: args.size,
        capital_distance: args.distance,
        seed: args.seed,
        ..GameConfig::default()
    };
    let geometry = config.geometry;

    let manager = GameSessionManager::new().start();
    let game_id = manager
        .send(CreateGame { mode: args.mode.into(), config })
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    let session = manager
        .send(GetGameSession { game_id })
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    info!("[Console] Playing game {}", game_id);

    let printer = Printer { json: args.json }.start();
    session
        .send(Subscribe(printer.recipient()))
        .await
        .map_err(io::Error::other)?;
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line, &geometry) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::Show => {
                let snapshot = session.send(GetSnapshot).await.map_err(io::Error::other)?;
                println!("{}", render_snapshot(&snapshot));
            }
            Command::Json => {
                let snapshot = session.send(GetSnapshot).await.map_err(io::Error::other)?;
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            Command::Actions(actions) => {
                for action in actions {
                    let outcome = session
                        .send(ProcessClientAction { action })
                        .await
                        .map_err(io::Error::other)?
                        .map_err(io::Error::other)?;
                    if !outcome.applied {
                        println!("Refused: {:?}", outcome.rejection);
                        break;
                    }
                }
                let snapshot = session.send(GetSnapshot).await.map_err(io::Error::other)?;
                if snapshot.winner.is_some() {
                    break;
                }
            }
        }
    }

    info!("[Console] Leaving game {}", game_id);
    System::current().stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellwar::game::types::ScreenPos;

    fn geometry() -> Geometry {
        GameConfig::default().geometry
    }

    #[test]
    fn test_parse_place_drops_on_cell_anchor() {
        let command = parse_command("place 1 2 3", &geometry()).unwrap();
        let pointer = geometry().anchor(Position::new(2, 3));
        assert_eq!(
            command,
            Command::Actions(vec![
                ClientAction::Drag { slot: 1, pointer },
                ClientAction::Drop { slot: 1, pointer },
            ])
        );
        assert_ne!(pointer, ScreenPos::new(0, 0));
    }

    #[test]
    fn test_parse_put_and_fire() {
        assert_eq!(
            parse_command("put 4 5 bomb", &geometry()).unwrap(),
            Command::Actions(vec![ClientAction::Place { x: 4, y: 5, kind: TileKind::Bomb }])
        );
        assert_eq!(
            parse_command("fire 1 1", &geometry()).unwrap(),
            Command::Actions(vec![ClientAction::Arm { x: 1, y: 1 }, ClientAction::Trigger { x: 1, y: 1 }])
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("", &geometry()).is_err());
        assert!(parse_command("place 1 2", &geometry()).is_err());
        assert!(parse_command("put 1 2 dragon", &geometry()).is_err());
        assert!(parse_command("arm x 2", &geometry()).is_err());
        assert!(parse_command("dance", &geometry()).is_err());
        assert_eq!(parse_command("quit", &geometry()).unwrap(), Command::Quit);
    }
}
