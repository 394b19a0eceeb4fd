use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Errors surfaced by a scene host.
///
/// `ObjectNotFound` covers instances removed externally between catalog and
/// apply time; the applier records it per instance and carries on.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene object {name:?} not found")]
    ObjectNotFound { name: String },
    #[error("render failed: {message}")]
    RenderFailed { message: String },
}

impl SceneError {
    pub fn not_found(name: impl Into<String>) -> SceneError {
        SceneError::ObjectNotFound { name: name.into() }
    }
}

/// Which side of the board the camera renders from. Passed through to the
/// host unchanged; camera placement itself is the host's business.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewpoint {
    White,
    #[default]
    Black,
}

/// Names of the two reference objects the calibrator reads.
///
/// Defaults match the production scene file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_surface_name")]
    pub surface_name: String,
    #[serde(default = "default_frame_name")]
    pub frame_name: String,
}

impl SceneConfig {
    /// True for the playing surface or outer frame, which are never pieces.
    pub fn is_reference_object(&self, name: &str) -> bool {
        name == self.surface_name || name == self.frame_name
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            surface_name: default_surface_name(),
            frame_name: default_frame_name(),
        }
    }
}

fn default_surface_name() -> String {
    "Black & white".to_string()
}

fn default_frame_name() -> String {
    "Outer frame".to_string()
}

/// Boundary to the 3D scene that owns object transforms and executes
/// renders.
///
/// The engine assumes exclusive access to the scene for the duration of one
/// invocation; hosts are not required to tolerate concurrent callers.
pub trait SceneHost {
    /// Names of all objects, in the host's enumeration order.
    ///
    /// The order must be stable for an unchanged scene: the catalog captures
    /// it and the displacement strategy uses it to break distance ties.
    fn object_names(&self) -> Vec<String>;

    /// World-space bounding corners of a named object, or `None` if the
    /// object is absent.
    fn bounding_corners(&self, name: &str) -> Option<[Point3<f64>; 8]>;

    /// Current world position of a named object.
    fn position(&self, name: &str) -> Option<Point3<f64>>;

    /// Move an object to an absolute world position.
    fn set_position(&mut self, name: &str, pos: Point3<f64>) -> Result<(), SceneError>;

    /// Offset an object relative to wherever it currently sits.
    fn translate(&mut self, name: &str, delta: Vector3<f64>) -> Result<(), SceneError> {
        let pos = self
            .position(name)
            .ok_or_else(|| SceneError::not_found(name))?;
        self.set_position(name, pos + delta)
    }

    /// Hide or show an object. Covers both render and interactive
    /// visibility.
    fn set_hidden(&mut self, name: &str, hidden: bool) -> Result<(), SceneError>;

    /// Render the current scene state to `path`. Camera and lighting state
    /// are implicit host state; `view` selects which side the camera faces.
    fn render(&mut self, view: Viewpoint, path: &Path) -> Result<(), SceneError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_production_scene_names() {
        let config = SceneConfig::default();
        assert!(config.is_reference_object("Black & white"));
        assert!(config.is_reference_object("Outer frame"));
        assert!(!config.is_reference_object("white king"));
    }
}
