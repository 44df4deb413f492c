//! Iris game engine library.
//!
//! Exposes the board representation, rules, move generation, feature
//! encoding with its symmetry tables, and the worker protocol for use by
//! integration tests and the binary entry points.

pub mod board;
pub mod engine;
pub mod game;
pub mod movegen;
pub mod nn;
pub mod protocol;
pub mod rules;
pub mod selfplay;
