//! Iris search worker.
//!
//! Reads line commands from stdin and writes responses to stdout. A driver
//! hands over positions as flat tuples and asks for moves:
//!
//! ```text
//! iris                 -> id name iris / protocol_version 1 / irisok
//! isready              -> readyok
//! position <tuple>
//! legal                -> legal 0,1 0,6 ...
//! go                   -> bestmove 0,3
//! play 0,3             -> winner A   (only when the move wins)
//! seed <n>
//! newgame
//! quit
//! ```

use std::io::{self, BufRead, Write};

use iris::engine::Engine;
use iris::protocol::parser::{parse_command, Command};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("worker output failed: {}", e);
        std::process::exit(1);
    }
}

/// Runs the command loop until `quit` or end of input.
fn run() -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut engine = Engine::new();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Iris => engine.handle_iris(&mut out)?,
            Command::IsReady => engine.handle_isready(&mut out)?,
            Command::NewGame => engine.new_game(),
            Command::Position { tuple } => {
                if let Err(e) = engine.set_position(&tuple) {
                    eprintln!("position: {}", e);
                }
            }
            Command::Play { mv } => match engine.play(&mv) {
                Ok(true) => {
                    if let Some(state) = &engine.position {
                        writeln!(out, "winner {:?}", state.turn.opponent())?;
                        out.flush()?;
                    }
                }
                Ok(false) => {}
                Err(e) => eprintln!("play: {}", e),
            },
            Command::Seed(seed) => engine.set_seed(seed),
            Command::Legal => engine.handle_legal(&mut out)?,
            Command::Go => engine.handle_go(&mut out)?,
            Command::Quit => break,
        }
    }
    out.flush()
}
