//! Piece catalog, assignment resolution, and placement application.
//!
//! This crate wires the board codec to a concrete scene: it classifies the
//! scene's named objects into piece instances, matches those instances to the
//! squares a parsed position requires, and applies the resulting plan to the
//! scene. Everything up to [`apply`] is a pure function over snapshots; only
//! the applier mutates scene state.
//!
//! The two placement strategies share one interface, selected by
//! [`PlacementPolicy`]:
//! - displacement: move each required piece from its current square to the
//!   nearest matching target,
//! - pool: draw from per-type stockpiles and place at absolute square
//!   centers.

mod apply;
mod assign;
mod catalog;
mod scene;

pub use apply::{apply, ApplyReport};
pub use assign::{
    resolve, AssignmentPlan, HiddenPiece, MoveKind, PieceMove, PlacementPolicy,
};
pub use catalog::{classify, Catalog, PieceInstance, BLACK_PAWN_NAMES, WHITE_PAWN_NAMES};
pub use scene::{SceneConfig, SceneError, SceneHost, Viewpoint};
