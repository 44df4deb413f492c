//! Worker state management.
//!
//! Holds the position handed over by the driver and answers `go` with a
//! move from the configured selector.

use std::io::{self, Write};

use crate::board::GameState;
use crate::game::{MoveSelector, RandomSelector};
use crate::movegen::legal_moves;
use crate::protocol::tuple::{format_move, parse_move, parse_tuple, TupleError};
use crate::rules::{apply_checked, RuleError};

/// Errors reported back for a single command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("no position set")]
    NoPosition,

    #[error(transparent)]
    Parse(#[from] TupleError),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Holds the mutable state of the worker between commands.
pub struct Engine {
    pub position: Option<GameState>,
    selector: RandomSelector,
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new()
    }
}

impl Engine {
    /// Creates a worker with no position and an entropy-seeded selector.
    pub fn new() -> Self {
        Engine {
            position: None,
            selector: RandomSelector::new(0),
        }
    }

    pub fn new_game(&mut self) {
        self.position = None;
    }

    /// Reseeds the selector; 0 draws from entropy.
    pub fn set_seed(&mut self, seed: u64) {
        self.selector = RandomSelector::new(seed);
    }

    /// Sets the current position from flat-tuple text.
    pub fn set_position(&mut self, tuple: &str) -> Result<(), CommandError> {
        self.position = Some(parse_tuple(tuple)?);
        Ok(())
    }

    /// Validates and applies a `pawn,node` move to the current position.
    /// Returns true if the move wins.
    pub fn play(&mut self, mv: &str) -> Result<bool, CommandError> {
        let mv = parse_move(mv)?;
        let state = self.position.as_mut().ok_or(CommandError::NoPosition)?;
        Ok(apply_checked(state, mv)?)
    }

    /// Handles the handshake.
    pub fn handle_iris<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name iris")?;
        writeln!(out, "protocol_version 1")?;
        writeln!(out, "irisok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles the `legal` command: every legal move on one line.
    pub fn handle_legal<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let Some(state) = &self.position else {
            eprintln!("legal: no position set");
            return Ok(());
        };
        let moves: Vec<String> = legal_moves(state)
            .into_iter()
            .map(|(_, mv)| format_move(mv))
            .collect();
        writeln!(out, "legal {}", moves.join(" "))?;
        out.flush()
    }

    /// Handles the `go` command.
    pub fn handle_go<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let Some(state) = self.position else {
            eprintln!("go: no position set");
            return Ok(());
        };
        let mv = self.selector.select_move(&state);
        writeln!(out, "bestmove {}", format_move(mv))?;
        out.flush()
    }
}
