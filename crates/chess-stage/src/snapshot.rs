use std::fs;
use std::path::Path;

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use chess_stage_placer::{SceneError, SceneHost, Viewpoint};

/// Errors reading or writing scene snapshots.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One object in a scene snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub position: Point3<f64>,
    /// Axis-aligned bounds in world space; reference objects need them,
    /// pieces may omit them.
    #[serde(default)]
    pub bound_min: Option<Point3<f64>>,
    #[serde(default)]
    pub bound_max: Option<Point3<f64>>,
    #[serde(default)]
    pub hide_render: bool,
    #[serde(default)]
    pub hide_viewport: bool,
}

impl SceneObject {
    /// An object with no bounds of its own.
    pub fn at(name: impl Into<String>, position: Point3<f64>) -> SceneObject {
        SceneObject {
            name: name.into(),
            position,
            bound_min: None,
            bound_max: None,
            hide_render: false,
            hide_viewport: false,
        }
    }

    /// An object carrying an axis-aligned bounding box.
    pub fn with_bounds(
        name: impl Into<String>,
        bound_min: Point3<f64>,
        bound_max: Point3<f64>,
    ) -> SceneObject {
        SceneObject {
            name: name.into(),
            position: nalgebra::center(&bound_min, &bound_max),
            bound_min: Some(bound_min),
            bound_max: Some(bound_max),
            hide_render: false,
            hide_viewport: false,
        }
    }

    fn visible(&self) -> bool {
        !self.hide_render
    }
}

/// In-memory scene host backed by a JSON snapshot.
///
/// Stands in for the 3D application when exercising the pipeline: object
/// enumeration order is the snapshot order, and `render` writes the visible
/// scene state as JSON instead of an image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotScene {
    objects: Vec<SceneObject>,
}

impl SnapshotScene {
    pub fn new(objects: Vec<SceneObject>) -> SnapshotScene {
        SnapshotScene { objects }
    }

    /// Load a snapshot from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<SnapshotScene, SnapshotError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this snapshot to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn push(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    pub fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    fn object_mut(&mut self, name: &str) -> Result<&mut SceneObject, SceneError> {
        self.objects
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| SceneError::not_found(name))
    }

    /// Remove an object, e.g. to simulate external scene edits in tests.
    pub fn remove(&mut self, name: &str) -> Option<SceneObject> {
        let idx = self.objects.iter().position(|o| o.name == name)?;
        Some(self.objects.remove(idx))
    }
}

/// What `SnapshotScene::render` writes instead of an image.
#[derive(Serialize)]
struct RenderedFrame<'a> {
    view: Viewpoint,
    objects: Vec<&'a SceneObject>,
}

impl SceneHost for SnapshotScene {
    fn object_names(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.name.clone()).collect()
    }

    fn bounding_corners(&self, name: &str) -> Option<[Point3<f64>; 8]> {
        let object = self.object(name)?;
        let (min, max) = (object.bound_min?, object.bound_max?);
        let mut corners = [min; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            corner.x = if i & 1 == 0 { min.x } else { max.x };
            corner.y = if i & 2 == 0 { min.y } else { max.y };
            corner.z = if i & 4 == 0 { min.z } else { max.z };
        }
        Some(corners)
    }

    fn position(&self, name: &str) -> Option<Point3<f64>> {
        self.object(name).map(|o| o.position)
    }

    fn set_position(&mut self, name: &str, pos: Point3<f64>) -> Result<(), SceneError> {
        let object = self.object_mut(name)?;
        let delta: Vector3<f64> = pos - object.position;
        object.position = pos;
        if let Some(min) = object.bound_min.as_mut() {
            *min += delta;
        }
        if let Some(max) = object.bound_max.as_mut() {
            *max += delta;
        }
        Ok(())
    }

    fn set_hidden(&mut self, name: &str, hidden: bool) -> Result<(), SceneError> {
        let object = self.object_mut(name)?;
        object.hide_render = hidden;
        object.hide_viewport = hidden;
        Ok(())
    }

    fn render(&mut self, view: Viewpoint, path: &Path) -> Result<(), SceneError> {
        let render_failed = |message: String| SceneError::RenderFailed { message };
        let frame = RenderedFrame {
            view,
            objects: self.objects.iter().filter(|o| o.visible()).collect(),
        };
        let json =
            serde_json::to_string_pretty(&frame).map_err(|e| render_failed(e.to_string()))?;
        fs::write(path, json).map_err(|e| render_failed(e.to_string()))?;
        Ok(())
    }
}
