//! Sliding-tile puzzle engine.
//!
//! [`Puzzle`] owns an NxN arrangement of tiles stored as a flat array, the
//! cached location of the empty slot, move validation, completion testing and
//! a shuffle made only of legal moves. Rendering and input are left to the
//! caller, which talks to the board in terms of flat positions.

pub mod error;
pub mod puzzle;

pub use error::PuzzleError;
pub use puzzle::{Direction, Puzzle, RepeatGuard};
