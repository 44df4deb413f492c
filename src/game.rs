//! Game driver.
//!
//! `Game` owns the current state, an undo history and the phase of play.
//! Moves come either from a caller that vouches for their legality
//! (`play_trusted`) or from an untrusted source (`play_checked`), which
//! rejects illegal steps and passes made while a step exists.

use log::{debug, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{GameState, Move, Side};
use crate::movegen::{legal_moves, random_move};
use crate::rules::{apply_checked, apply_move, exists_legal_move, RuleError};

/// Default turn cap after which a game is declared drawn.
pub const DEFAULT_MAX_TURNS: u32 = 100;

/// Where a game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// The side to move has at least one legal step.
    AwaitingMove,
    /// The side to move has no legal step and must pass.
    NoMove,
    Victory(Side),
    /// The turn cap was reached without a winner.
    Draw,
}

impl GamePhase {
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Victory(_) | GamePhase::Draw)
    }
}

/// How submitted moves are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    #[default]
    Checked,
    /// Moves are applied without validation.
    Trusted,
}

/// Errors returned by the driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("game is already over ({0:?})")]
    GameOver(GamePhase),
}

/// Anything that picks a move for the side to move.
///
/// Implementations see a copy of the state and must not assume anything
/// about how often or in which order they are called.
pub trait MoveSelector {
    fn select_move(&mut self, state: &GameState) -> Move;
}

impl<F> MoveSelector for F
where
    F: FnMut(&GameState) -> Move,
{
    fn select_move(&mut self, state: &GameState) -> Move {
        self(state)
    }
}

/// Picks uniformly among the legal moves.
pub struct RandomSelector {
    rng: SmallRng,
}

impl RandomSelector {
    /// Seed 0 draws from entropy.
    pub fn new(seed: u64) -> Self {
        let rng = if seed != 0 {
            SmallRng::seed_from_u64(seed)
        } else {
            SmallRng::from_entropy()
        };
        RandomSelector { rng }
    }
}

impl MoveSelector for RandomSelector {
    fn select_move(&mut self, state: &GameState) -> Move {
        random_move(state, &mut self.rng)
    }
}

/// The result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    /// `None` for a draw.
    pub winner: Option<Side>,
    /// Moves played, passes included.
    pub turns: u32,
}

impl GameOutcome {
    /// +1 for an A win, -1 for a B win, 0 for a draw.
    pub fn value(&self) -> f32 {
        self.winner.map_or(0.0, Side::sign)
    }
}

/// A game in progress.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    history: Vec<GameState>,
    phase: GamePhase,
    turns: u32,
    max_turns: u32,
}

impl Game {
    pub fn new(state: GameState) -> Self {
        Game::with_max_turns(state, DEFAULT_MAX_TURNS)
    }

    /// Creates a game drawn once `max_turns` moves have been played.
    pub fn with_max_turns(state: GameState, max_turns: u32) -> Self {
        let mut game = Game {
            state,
            history: Vec::new(),
            phase: GamePhase::AwaitingMove,
            turns: 0,
            max_turns,
        };
        game.phase = game.idle_phase();
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn turns(&self) -> u32 {
        self.turns
    }

    /// States preceding the current one, oldest first.
    pub fn history(&self) -> &[GameState] {
        &self.history
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_over()
    }

    /// Legal moves of the current state with their policy slots.
    pub fn legal_moves(&self) -> Vec<(usize, Move)> {
        legal_moves(&self.state)
    }

    fn idle_phase(&self) -> GamePhase {
        if self.turns >= self.max_turns {
            GamePhase::Draw
        } else if exists_legal_move(&self.state) {
            GamePhase::AwaitingMove
        } else {
            GamePhase::NoMove
        }
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.phase.is_over() {
            return Err(GameError::GameOver(self.phase));
        }
        Ok(())
    }

    fn record(&mut self, before: GameState, side: Side, won: bool) -> GamePhase {
        self.history.push(before);
        self.turns += 1;
        self.phase = if won {
            GamePhase::Victory(side)
        } else {
            self.idle_phase()
        };
        self.phase
    }

    /// Validates and plays `mv`. On error the game is unchanged.
    pub fn play_checked(&mut self, mv: Move) -> Result<GamePhase, GameError> {
        self.ensure_running()?;
        let before = self.state;
        let side = before.turn;
        let won = apply_checked(&mut self.state, mv)?;
        Ok(self.record(before, side, won))
    }

    /// Plays `mv` without validating it.
    pub fn play_trusted(&mut self, mv: Move) -> Result<GamePhase, GameError> {
        self.ensure_running()?;
        let before = self.state;
        let side = before.turn;
        let won = apply_move(&mut self.state, mv);
        Ok(self.record(before, side, won))
    }

    /// Plays `mv` under the given mode.
    pub fn play(&mut self, mv: Move, mode: PlayMode) -> Result<GamePhase, GameError> {
        match mode {
            PlayMode::Checked => self.play_checked(mv),
            PlayMode::Trusted => self.play_trusted(mv),
        }
    }

    /// Takes back the last move. Returns the restored state, or `None` at
    /// the start of the game.
    pub fn undo(&mut self) -> Option<GameState> {
        let previous = self.history.pop()?;
        self.state = previous;
        self.turns -= 1;
        self.phase = self.idle_phase();
        Some(previous)
    }

    /// The outcome, once the game is over.
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.phase {
            GamePhase::Victory(side) => Some(GameOutcome {
                winner: Some(side),
                turns: self.turns,
            }),
            GamePhase::Draw => Some(GameOutcome {
                winner: None,
                turns: self.turns,
            }),
            GamePhase::AwaitingMove | GamePhase::NoMove => None,
        }
    }
}

/// Plays a full game between two selectors, `a` moving for side A and `b`
/// for side B, starting from `state`.
///
/// In checked mode the first illegal move aborts the game with the
/// offending state attached to the error.
pub fn launch_game<A, B>(
    a: &mut A,
    b: &mut B,
    state: GameState,
    max_turns: u32,
    mode: PlayMode,
) -> Result<GameOutcome, GameError>
where
    A: MoveSelector + ?Sized,
    B: MoveSelector + ?Sized,
{
    let mut game = Game::with_max_turns(state, max_turns);
    loop {
        if let Some(outcome) = game.outcome() {
            debug!(
                "game over after {} turns: {:?}",
                outcome.turns, outcome.winner
            );
            return Ok(outcome);
        }
        let snapshot = *game.state();
        let mv = match snapshot.turn {
            Side::A => a.select_move(&snapshot),
            Side::B => b.select_move(&snapshot),
        };
        if let Err(e) = game.play(mv, mode) {
            warn!("aborting game at turn {}: {}", game.turns(), e);
            return Err(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{bit, MovedPawn, Pawn, TileColor, HUB, NEUTRAL_COUNT};

    fn blocked_state() -> GameState {
        let mut state = GameState::empty();
        state.positions = [16, 19, 6, 11, 20];
        state.tiles[TileColor::B.index()] = bit(12);
        state.last_user = [Side::B; NEUTRAL_COUNT];
        state.streak = [1; NEUTRAL_COUNT];
        state
    }

    #[test]
    fn fresh_game_awaits_move() {
        let game = Game::new(GameState::empty());
        assert_eq!(game.phase(), GamePhase::AwaitingMove);
        assert_eq!(game.legal_moves().len(), 40);
        assert_eq!(game.outcome(), None);
    }

    #[test]
    fn blocked_game_requires_pass() {
        let mut game = Game::new(blocked_state());
        assert_eq!(game.phase(), GamePhase::NoMove);
        let err = game.play_checked(Move::step(MovedPawn::Player, 12)).unwrap_err();
        assert!(matches!(err, GameError::Rule(RuleError::IllegalMove { .. })));
        assert_eq!(game.turns(), 0);
        assert_eq!(game.play_checked(Move::Pass), Ok(GamePhase::AwaitingMove));
        assert_eq!(game.state().position(Pawn::A), HUB);
    }

    #[test]
    fn spurious_pass_is_reported_with_state() {
        let mut game = Game::new(GameState::empty());
        match game.play_checked(Move::Pass) {
            Err(GameError::Rule(e @ RuleError::SpuriousPass { .. })) => {
                assert_eq!(e.state(), &GameState::empty());
            }
            other => panic!("expected spurious pass, got {:?}", other),
        }
    }

    #[test]
    fn victory_ends_the_game() {
        let mut state = GameState::empty();
        state.positions[Pawn::A.index()] = 13;
        let mut game = Game::new(state);
        assert_eq!(
            game.play_checked(Move::step(MovedPawn::Player, 18)),
            Ok(GamePhase::Victory(Side::A))
        );
        assert_eq!(
            game.outcome(),
            Some(GameOutcome {
                winner: Some(Side::A),
                turns: 1
            })
        );
        assert_eq!(
            game.play_trusted(Move::Pass),
            Err(GameError::GameOver(GamePhase::Victory(Side::A)))
        );
    }

    #[test]
    fn undo_restores_previous_state() {
        let mut game = Game::new(GameState::empty());
        game.play_checked(Move::step(MovedPawn::Black, 4)).unwrap();
        game.play_checked(Move::step(MovedPawn::Player, 2)).unwrap();
        assert_eq!(game.history().len(), 2);
        let restored = game.undo().unwrap();
        assert_eq!(restored.turn, Side::B);
        assert_eq!(game.state().position(Pawn::Black), 4);
        assert_eq!(game.state().position(Pawn::B), HUB);
        assert_eq!(game.undo(), Some(GameState::empty()));
        assert_eq!(game.undo(), None);
        assert_eq!(game.turns(), 0);
    }

    #[test]
    fn turn_cap_draws() {
        let mut a = RandomSelector::new(1);
        let mut b = RandomSelector::new(2);
        let outcome = launch_game(&mut a, &mut b, GameState::empty(), 0, PlayMode::Checked).unwrap();
        assert_eq!(outcome, GameOutcome { winner: None, turns: 0 });
        assert_eq!(outcome.value(), 0.0);
    }

    #[test]
    fn random_games_finish() {
        let mut rng = SmallRng::seed_from_u64(5);
        for seed in 1..20 {
            let mut a = RandomSelector::new(seed);
            let mut b = RandomSelector::new(seed + 100);
            let state = GameState::new_random(&mut rng);
            let outcome = launch_game(&mut a, &mut b, state, 200, PlayMode::Checked).unwrap();
            assert!(outcome.turns <= 200);
            if outcome.winner.is_none() {
                assert_eq!(outcome.turns, 200);
            }
        }
    }

    #[test]
    fn checked_mode_rejects_bad_selector() {
        let mut good = RandomSelector::new(3);
        let mut bad = |_: &GameState| Move::step(MovedPawn::Black, 0);
        let err = launch_game(&mut good, &mut bad, GameState::empty(), 50, PlayMode::Checked)
            .unwrap_err();
        match err {
            GameError::Rule(RuleError::IllegalMove { side, .. }) => assert_eq!(side, Side::B),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn closures_select_moves() {
        // A runs 0 -> 3 -> 13 -> 18 while B shuffles between the hub and 1.
        let mut a = |s: &GameState| match s.position(Pawn::A) {
            0 => Move::step(MovedPawn::Player, 3),
            3 => Move::step(MovedPawn::Player, 13),
            _ => Move::step(MovedPawn::Player, 18),
        };
        let mut b = |s: &GameState| match s.position(Pawn::B) {
            0 => Move::step(MovedPawn::Player, 1),
            _ => Move::step(MovedPawn::Player, 0),
        };
        let outcome = launch_game(&mut a, &mut b, GameState::empty(), 20, PlayMode::Trusted).unwrap();
        assert_eq!(outcome.winner, Some(Side::A));
        assert_eq!(outcome.turns, 5);
        assert_eq!(outcome.value(), 1.0);
    }
}
