//! Flat-tuple text notation.
//!
//! A state is written as its 16 tuple fields separated by commas, e.g. the
//! fresh tile-less state:
//!
//! `true,0,0,0,0,0,0,0,0,0,true,true,true,0,0,0`
//!
//! Booleans are `true`/`false` (`1`/`0` are accepted when parsing). An
//! optional pair of surrounding parentheses and whitespace around fields are
//! ignored. A move is written `pawn,node`, with `-1,-1` for a pass.

use crate::board::{GameState, Move, MoveError, StateError, StateTuple};

/// Number of fields in the flat tuple.
pub const TUPLE_FIELDS: usize = 16;

/// Errors that can occur during tuple parsing.
#[derive(Debug, thiserror::Error)]
pub enum TupleError {
    #[error("expected {expected} comma-separated fields, got {got}")]
    WrongFieldCount { expected: usize, got: usize },

    #[error("invalid boolean in field {index}: '{text}'")]
    InvalidBool { index: usize, text: String },

    #[error("invalid integer in field {index}: '{text}'")]
    InvalidInteger { index: usize, text: String },

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Move(#[from] MoveError),
}

fn split_fields(s: &str) -> Vec<&str> {
    let s = s.trim();
    let s = s
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(s);
    s.split(',').map(str::trim).collect()
}

fn parse_bool(fields: &[&str], index: usize) -> Result<bool, TupleError> {
    match fields[index] {
        "true" | "True" | "1" => Ok(true),
        "false" | "False" | "0" => Ok(false),
        text => Err(TupleError::InvalidBool {
            index,
            text: text.to_string(),
        }),
    }
}

fn parse_int<T: std::str::FromStr>(fields: &[&str], index: usize) -> Result<T, TupleError> {
    fields[index].parse().map_err(|_| TupleError::InvalidInteger {
        index,
        text: fields[index].to_string(),
    })
}

/// Encodes a state as tuple text.
pub fn encode_tuple(state: &GameState) -> String {
    let t = state.to_tuple();
    format!(
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
        t.0, t.1, t.2, t.3, t.4, t.5, t.6, t.7, t.8, t.9, t.10, t.11, t.12, t.13, t.14, t.15
    )
}

/// Parses tuple text into a validated state.
pub fn parse_tuple(s: &str) -> Result<GameState, TupleError> {
    let f = split_fields(s);
    if f.len() != TUPLE_FIELDS {
        return Err(TupleError::WrongFieldCount {
            expected: TUPLE_FIELDS,
            got: f.len(),
        });
    }
    let tuple: StateTuple = (
        parse_bool(&f, 0)?,
        parse_int(&f, 1)?,
        parse_int(&f, 2)?,
        parse_int(&f, 3)?,
        parse_int(&f, 4)?,
        parse_int(&f, 5)?,
        parse_int(&f, 6)?,
        parse_int(&f, 7)?,
        parse_int(&f, 8)?,
        parse_int(&f, 9)?,
        parse_bool(&f, 10)?,
        parse_bool(&f, 11)?,
        parse_bool(&f, 12)?,
        parse_int(&f, 13)?,
        parse_int(&f, 14)?,
        parse_int(&f, 15)?,
    );
    Ok(GameState::from_tuple(tuple)?)
}

/// Formats a move as `pawn,node`.
pub fn format_move(mv: Move) -> String {
    let (pawn, node) = mv.to_wire();
    format!("{},{}", pawn, node)
}

/// Parses a `pawn,node` move.
pub fn parse_move(s: &str) -> Result<Move, TupleError> {
    let f = split_fields(s);
    if f.len() != 2 {
        return Err(TupleError::WrongFieldCount {
            expected: 2,
            got: f.len(),
        });
    }
    Ok(Move::from_wire((parse_int(&f, 0)?, parse_int(&f, 1)?))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{bit, MovedPawn, Side};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn fresh_state_text() {
        assert_eq!(
            encode_tuple(&GameState::empty()),
            "true,0,0,0,0,0,0,0,0,0,true,true,true,0,0,0"
        );
    }

    #[test]
    fn roundtrip_random_setup() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut state = GameState::new_random(&mut rng);
        state.turn = Side::B;
        state.positions = [1, 2, 3, 4, 0];
        state.last_user[1] = Side::B;
        state.streak[1] = 2;
        let text = encode_tuple(&state);
        assert_eq!(parse_tuple(&text).unwrap(), state);
    }

    #[test]
    fn tolerates_parens_and_whitespace() {
        let text = format!(
            "( True, 0, 0, 0, 0, 0, {}, 0, 0, 0, 1, 1, 1, 0, 0, 0 )",
            bit(5)
        );
        let state = parse_tuple(&text).unwrap();
        assert_eq!(state.tiles[0], bit(5));
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(matches!(
            parse_tuple("true,0,0"),
            Err(TupleError::WrongFieldCount { expected: 16, got: 3 })
        ));
        assert!(matches!(
            parse_tuple("yes,0,0,0,0,0,0,0,0,0,true,true,true,0,0,0"),
            Err(TupleError::InvalidBool { index: 0, .. })
        ));
        assert!(matches!(
            parse_tuple("true,0,x,0,0,0,0,0,0,0,true,true,true,0,0,0"),
            Err(TupleError::InvalidInteger { index: 2, .. })
        ));
        assert!(matches!(
            parse_tuple("true,0,0,0,0,0,0,0,0,0,true,true,true,0,0,5"),
            Err(TupleError::State(StateError::StreakOutOfRange { .. }))
        ));
    }

    #[test]
    fn move_text() {
        let mv = Move::step(MovedPawn::Orange, 12);
        assert_eq!(format_move(mv), "3,12");
        assert_eq!(parse_move("3,12").unwrap(), mv);
        assert_eq!(parse_move("(-1, -1)").unwrap(), Move::Pass);
        assert!(matches!(parse_move("5,1"), Err(TupleError::Move(MoveError::UnknownPawn(5)))));
        assert!(matches!(parse_move("1"), Err(TupleError::WrongFieldCount { .. })));
    }
}
