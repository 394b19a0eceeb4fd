//! High-level facade crate for the `chess-stage-*` workspace.
//!
//! This crate provides:
//! - stable, convenient re-exports of the underlying crates
//! - the end-to-end pipeline that calibrates a scene, parses a position,
//!   resolves piece assignments, applies them, and triggers a render
//! - the batch generator used for high-volume dataset synthesis
//! - a JSON scene-snapshot host for running the pipeline without a live 3D
//!   application
//!
//! ## Quickstart
//!
//! ```no_run
//! use chess_stage::{SnapshotScene, Stage, StageConfig, Viewpoint};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scene = SnapshotScene::load_json("scene.json")?;
//! let mut stage = Stage::new(scene, StageConfig::default());
//!
//! let outcome = stage.render_position(
//!     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
//!     Viewpoint::Black,
//!     "opening",
//! )?;
//! println!("rendered {}", outcome.output_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - [`core`](chess_stage_core): squares, pieces, board geometry.
//! - [`fen`](chess_stage_fen): placement-notation decoding.
//! - [`placer`](chess_stage_placer): scene boundary, catalog, assignment.

pub use chess_stage_core as core;
pub use chess_stage_fen as fen;
pub use chess_stage_placer as placer;

pub use chess_stage_core::{
    init_with_level, BoardGeometry, CalibrationError, Color, Piece, PieceKind, Square,
    REFERENCE_BOARD_SIZE,
};
pub use chess_stage_fen::{parse_placement, FenError, TargetPosition, STARTING_POSITION};
pub use chess_stage_placer::{
    apply, classify, resolve, ApplyReport, AssignmentPlan, Catalog, PieceInstance,
    PlacementPolicy, SceneConfig, SceneError, SceneHost, Viewpoint,
};

mod batch;
mod pipeline;
mod snapshot;

pub use batch::{BatchOptions, BatchReport};
pub use pipeline::{
    diagnose, BoardDiagnostic, GeometryMode, RenderOutcome, Stage, StageConfig, StageError,
};
pub use snapshot::{SceneObject, SnapshotError, SnapshotScene};
