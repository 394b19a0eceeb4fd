use std::path::{Path, PathBuf};

use log::info;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use chess_stage_core::{BoardGeometry, CalibrationError, Piece, Square};
use chess_stage_fen::{parse_placement, FenError};
use chess_stage_placer::{
    apply, resolve, Catalog, PlacementPolicy, SceneConfig, SceneError, SceneHost, Viewpoint,
};

/// Errors produced by the end-to-end pipeline.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error(transparent)]
    Fen(#[from] FenError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// How board geometry is obtained for an invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryMode {
    /// Recalibrate from the live scene bounds on every call. Used by the
    /// interactive per-position renderer.
    #[default]
    Dynamic,
    /// Reuse a geometry captured by an earlier calibration or diagnostic
    /// pass. Used by the batch generator, which calibrates once and then
    /// renders thousands of frames.
    Static(BoardGeometry),
}

/// Pipeline configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    #[serde(default)]
    pub scene: SceneConfig,
    #[serde(default)]
    pub policy: PlacementPolicy,
    #[serde(default)]
    pub geometry: GeometryMode,
}

/// What one `render_position` call produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderOutcome {
    pub output_path: PathBuf,
    /// Instances moved onto target squares.
    pub placed: usize,
    /// Instances hidden because the position does not use them.
    pub hidden: usize,
    /// Targets skipped because no instance of the required type was left.
    pub unfulfilled: Vec<(Square, Piece)>,
    /// Per-instance scene failures; the render still ran.
    pub failures: Vec<(String, SceneError)>,
}

/// The staging pipeline: owns the scene host and runs
/// calibrate -> parse -> catalog -> resolve -> apply -> render, strictly in
/// sequence. One invocation assumes exclusive access to the scene; batch
/// drivers serialize their calls.
pub struct Stage<S> {
    scene: S,
    config: StageConfig,
}

impl<S: SceneHost> Stage<S> {
    pub fn new(scene: S, config: StageConfig) -> Stage<S> {
        Stage { scene, config }
    }

    #[inline]
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    #[inline]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn into_scene(self) -> S {
        self.scene
    }

    /// Board geometry for one invocation, per the configured mode.
    pub fn geometry(&self) -> Result<BoardGeometry, StageError> {
        match &self.config.geometry {
            GeometryMode::Static(geometry) => Ok(*geometry),
            GeometryMode::Dynamic => {
                let surface = reference_volume(&self.scene, &self.config.scene.surface_name)?;
                let frame = reference_volume(&self.scene, &self.config.scene.frame_name)?;
                Ok(BoardGeometry::calibrate(&surface, &frame)?)
            }
        }
    }

    /// Stage one position and render it.
    ///
    /// `output_name` gets a `.png` suffix appended when it lacks one.
    pub fn render_position(
        &mut self,
        notation: &str,
        view: Viewpoint,
        output_name: &str,
    ) -> Result<RenderOutcome, StageError> {
        let geometry = self.geometry()?;
        let path = ensure_png(PathBuf::from(output_name));
        self.place_and_render(&geometry, notation, view, &path)
    }

    /// One placement + render against an already-derived geometry. The batch
    /// generator calls this with a geometry cached across the whole run.
    pub(crate) fn place_and_render(
        &mut self,
        geometry: &BoardGeometry,
        notation: &str,
        view: Viewpoint,
        path: &Path,
    ) -> Result<RenderOutcome, StageError> {
        let target = parse_placement(notation)?;
        let catalog = Catalog::detect(&self.scene, geometry, &self.config.scene);
        let plan = resolve(&catalog, &target, geometry, self.config.policy);
        let report = apply(&mut self.scene, &plan);

        self.scene.render(view, path)?;
        info!(
            "rendered {} ({} placed, {} unfulfilled)",
            path.display(),
            report.applied,
            plan.unfulfilled.len()
        );

        Ok(RenderOutcome {
            output_path: path.to_path_buf(),
            placed: report.applied,
            hidden: report.hidden,
            unfulfilled: plan.unfulfilled,
            failures: report.failures,
        })
    }
}

/// Board measurements for a scene, mirroring the standalone diagnostic pass
/// that captures calibration constants for batch runs.
#[derive(Clone, Debug, Serialize)]
pub struct BoardDiagnostic {
    pub geometry: BoardGeometry,
    /// Playing-surface width along x, world units.
    pub width: f64,
    /// Playing-surface height along y, world units.
    pub height: f64,
    /// Piece instances the catalog would pick up.
    pub pieces: usize,
}

/// Measure the board and count cataloged pieces without mutating anything.
pub fn diagnose<S: SceneHost>(
    scene: &S,
    config: &SceneConfig,
) -> Result<BoardDiagnostic, StageError> {
    let surface = reference_volume(scene, &config.surface_name)?;
    let frame = reference_volume(scene, &config.frame_name)?;
    let geometry = BoardGeometry::calibrate(&surface, &frame)?;
    let pieces = Catalog::detect(scene, &geometry, config).len();
    Ok(BoardDiagnostic {
        width: geometry.max_corner().x - geometry.min_corner().x,
        height: geometry.max_corner().y - geometry.min_corner().y,
        geometry,
        pieces,
    })
}

/// Bounding corners of a required reference object. Absence is fatal: no
/// geometry can be derived without both volumes.
fn reference_volume<S: SceneHost + ?Sized>(
    scene: &S,
    name: &str,
) -> Result<[Point3<f64>; 8], StageError> {
    scene
        .bounding_corners(name)
        .ok_or_else(|| StageError::Scene(SceneError::not_found(name)))
}

fn ensure_png(path: PathBuf) -> PathBuf {
    let has_png = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);
    if has_png {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".png");
        PathBuf::from(name)
    }
}
