use std::collections::HashSet;
use std::path::PathBuf;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use chess_stage_placer::{SceneHost, Viewpoint};

use crate::pipeline::{Stage, StageError};

/// Settings for one batch generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Directory the numbered frames are written into.
    pub output_dir: PathBuf,
    /// Maximum number of frames to render.
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Frames are named `{prefix}_{index:04}.png`.
    #[serde(default = "default_prefix")]
    pub file_prefix: String,
    #[serde(default)]
    pub view: Viewpoint,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            output_dir: PathBuf::from("renders"),
            limit: default_limit(),
            file_prefix: default_prefix(),
            view: Viewpoint::default(),
        }
    }
}

fn default_limit() -> usize {
    2000
}

fn default_prefix() -> String {
    "synthetic".to_string()
}

/// Tallies for one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Frames written.
    pub rendered: usize,
    /// Notations dropped because an identical one already rendered.
    pub skipped_duplicates: usize,
    /// Notations dropped because they failed to parse.
    pub malformed: usize,
    /// Sum of unfulfilled targets across all rendered frames.
    pub unfulfilled_total: usize,
}

impl<S: SceneHost> Stage<S> {
    /// Stream notations and render one frame per distinct position.
    ///
    /// Geometry is derived once up front and reused for the whole run, so a
    /// `Dynamic` configuration calibrates exactly once here. Duplicate
    /// notations are skipped, `limit` caps the output, and a malformed
    /// notation is logged and skipped instead of aborting the stream. Scene
    /// and calibration failures remain fatal.
    pub fn render_batch(
        &mut self,
        notations: impl IntoIterator<Item = String>,
        options: &BatchOptions,
    ) -> Result<BatchReport, StageError> {
        let geometry = self.geometry()?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut report = BatchReport::default();

        for notation in notations {
            if report.rendered >= options.limit {
                info!("batch limit of {} frames reached", options.limit);
                break;
            }
            if !seen.insert(notation.clone()) {
                report.skipped_duplicates += 1;
                continue;
            }

            let name = format!("{}_{:04}.png", options.file_prefix, report.rendered);
            let path = options.output_dir.join(name);
            match self.place_and_render(&geometry, &notation, options.view, &path) {
                Ok(outcome) => {
                    report.unfulfilled_total += outcome.unfulfilled.len();
                    report.rendered += 1;
                }
                Err(StageError::Fen(err)) => {
                    warn!("skipping malformed notation {notation:?}: {err}");
                    report.malformed += 1;
                }
                Err(fatal) => return Err(fatal),
            }
        }

        info!(
            "batch finished: {} rendered, {} duplicates, {} malformed",
            report.rendered, report.skipped_duplicates, report.malformed
        );
        Ok(report)
    }
}
