//! Core board types for staging chess positions in a 3D scene.
//!
//! This crate is intentionally small and purely geometric. It owns the
//! square/piece vocabulary and the calibrated board grid, and does *not*
//! depend on any concrete scene host or notation format.
//!
//! The central piece is [`BoardGeometry`]: derived once per scene snapshot
//! from the bounding volumes of the playing surface and the outer frame, it
//! converts between continuous world positions and discrete board squares in
//! both directions.

mod geometry;
mod logger;
mod piece;
mod square;

pub use geometry::{BoardGeometry, CalibrationError, REFERENCE_BOARD_SIZE};
pub use logger::init_with_level;
pub use piece::{Color, Piece, PieceKind};
pub use square::{Square, SquareError};
