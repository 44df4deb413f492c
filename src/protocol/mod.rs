//! Text protocol for handing states and moves across process boundaries.
//!
//! Search workers receive a state snapshot as flat-tuple text and answer
//! with a move in wire form.

pub mod parser;
pub mod tuple;

pub use parser::{parse_command, Command};
pub use tuple::{encode_tuple, format_move, parse_move, parse_tuple, TupleError};
