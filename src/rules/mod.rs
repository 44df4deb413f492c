//! Game rules.
//!
//! Legality checks and move application for the game state. Everything here
//! is a pure function of the state value passed in.

pub mod apply;
pub mod legality;

pub use apply::{apply_checked, apply_move, pass_turn, play};
pub use legality::{can_move_neutral, exists_legal_move, is_legal, is_legal_step};

use crate::board::{GameState, Move, Side};

/// A move rejected by the checked entry point.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("{side:?} played illegal move {mv:?}")]
    IllegalMove {
        side: Side,
        mv: Move,
        state: GameState,
    },

    #[error("{side:?} passed although a legal move exists")]
    SpuriousPass { side: Side, state: GameState },
}

impl RuleError {
    /// The state in which the offending move was submitted.
    pub fn state(&self) -> &GameState {
        match self {
            RuleError::IllegalMove { state, .. } | RuleError::SpuriousPass { state, .. } => state,
        }
    }
}
