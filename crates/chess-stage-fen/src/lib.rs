//! Piece-placement notation decoding built on top of `chess-stage-core`.
//!
//! Only the placement field of a FEN record is consumed; trailing fields
//! (side to move, castling rights, clocks) are ignored. Malformed input is
//! rejected outright rather than decoded into a partial board, which departs
//! from the legacy pipeline on purpose: a training image rendered from a
//! half-parsed position is a mislabeled sample.
//!
//! ## Quickstart
//!
//! ```
//! use chess_stage_fen::{parse_placement, STARTING_POSITION};
//!
//! let target = parse_placement(STARTING_POSITION).unwrap();
//! assert_eq!(target.len(), 32);
//! ```

mod parse;
mod position;

pub use parse::{parse_placement, FenError, STARTING_POSITION};
pub use position::TargetPosition;
