//! Scene assembly.
//!
//! Turns a wire-level [`SelectionRequest`] into validated geometry: an
//! [`ObjectSet`] with every position resolved, a primary [`Frame`] and an
//! optional secondary one. Feature tables and coordinate views are derived
//! from the assembled [`Scene`].
//!
//! # Example
//!
//! ```rust
//! use vantage_runtime::scene::{ObjectsSource, Scene, SceneConfig};
//! use vantage_types::SelectionRequest;
//!
//! let request: SelectionRequest = serde_json::from_str(
//!     r#"{"primary": {"position": [0, 0, -1], "forward": [0, 0, 1]}}"#,
//! ).unwrap();
//!
//! let scene = Scene::from_request(&request, &SceneConfig::default()).unwrap();
//! assert_eq!(scene.objects_source, ObjectsSource::FixedGrid);
//! assert_eq!(scene.objects.len(), 16);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use vantage_geometry::{
    DualObjectView, FeatureOptions, Frame, LocalObjectView, ObjectSet, Pose, Vec3,
    compute_features, dual_view, local_view,
};
use vantage_types::{
    FeatureTable, ObjectInput, PoseInput, ReferenceFrame, SelectError, SelectionRequest,
    VantageError,
};

/// Column x-offsets of the default grid, left to right.
const GRID_COLUMNS_X: [f64; 4] = [-0.15, -0.05, 0.05, 0.15];
/// Row z-offsets of the default grid, near to far as seen from `-Z`.
const GRID_ROWS_Z: [f64; 4] = [0.15, 0.05, -0.05, -0.15];

/// Static scene settings, injected once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Positions used for objects that arrive without one.
    pub fallback_grid: BTreeMap<String, Vec3>,
    pub primary: FeatureOptions,
    pub secondary: FeatureOptions,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fallback_grid: default_grid(),
            primary: FeatureOptions::default(),
            secondary: FeatureOptions {
                fov_degrees: None,
                compute_side: true,
                reachable_default: Some(true),
            },
        }
    }
}

/// The 4×4 table grid at a 10 cm pitch, ids `obj_<row><col>`.
pub fn default_grid() -> BTreeMap<String, Vec3> {
    let mut grid = BTreeMap::new();
    for (row, z) in GRID_ROWS_Z.iter().enumerate() {
        for (col, x) in GRID_COLUMNS_X.iter().enumerate() {
            grid.insert(format!("obj_{row}{col}"), Vec3::new(*x, 0.0, *z));
        }
    }
    grid
}

/// Where the object positions of a scene came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectsSource {
    /// The request listed no objects; the whole grid was used.
    FixedGrid,
    /// Explicit positions, with grid lookups for the rest.
    RequestWithFallback,
}

/// Resolve the object list of a request against the fallback grid.
///
/// # Errors
///
/// - [`VantageError::MissingObjectPosition`] listing, in request order, every
///   id that has neither an explicit position nor a grid entry.
/// - [`VantageError::NonFiniteCoordinate`] for a NaN or infinite position.
pub fn resolve_objects(
    requested: Option<&[ObjectInput]>,
    grid: &BTreeMap<String, Vec3>,
) -> Result<(ObjectSet, ObjectsSource), VantageError> {
    let requested = match requested {
        Some(list) if !list.is_empty() => list,
        _ => return Ok((grid.clone(), ObjectsSource::FixedGrid)),
    };

    let mut objects = ObjectSet::new();
    let mut missing = Vec::new();
    for object in requested {
        let position = match object.position {
            Some(p) => Some(Vec3::from(p)),
            None => grid.get(&object.id).copied(),
        };
        match position {
            Some(p) if !p.is_finite() => {
                return Err(VantageError::NonFiniteCoordinate(format!("object {}", object.id)));
            }
            Some(p) => {
                objects.insert(object.id.clone(), p);
            }
            None => missing.push(object.id.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(VantageError::MissingObjectPosition(missing));
    }
    Ok((objects, ObjectsSource::RequestWithFallback))
}

fn pose_from_input(input: &PoseInput, what: &str) -> Result<Pose, VantageError> {
    let origin = Vec3::from(input.position);
    let forward = Vec3::from(input.forward);
    let up = input.up.map(Vec3::from);

    let finite = origin.is_finite() && forward.is_finite() && up.is_none_or(Vec3::is_finite);
    if !finite {
        return Err(VantageError::NonFiniteCoordinate(format!("{what} pose")));
    }

    let pose = Pose::new(origin, forward);
    Ok(match up {
        Some(up) => pose.with_up(up),
        None => pose,
    })
}

/// One validated snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub objects: ObjectSet,
    pub objects_source: ObjectsSource,
    pub primary: Frame,
    pub secondary: Option<Frame>,
    primary_options: FeatureOptions,
    secondary_options: FeatureOptions,
}

impl Scene {
    /// Assemble a scene from a request.
    ///
    /// A `fov_deg` on the primary pose overrides the configured primary FOV.
    pub fn from_request(request: &SelectionRequest, config: &SceneConfig) -> Result<Self, VantageError> {
        let (objects, objects_source) =
            resolve_objects(request.objects.as_deref(), &config.fallback_grid)?;

        let primary = Frame::from_pose(&pose_from_input(&request.primary, "primary")?);
        let secondary = request
            .secondary
            .as_ref()
            .map(|input| pose_from_input(input, "secondary").map(|p| Frame::from_pose(&p)))
            .transpose()?;

        let mut primary_options = config.primary;
        if let Some(fov) = request.primary.fov_deg {
            if !fov.is_finite() {
                return Err(VantageError::NonFiniteCoordinate("primary fov_deg".to_string()));
            }
            primary_options.fov_degrees = Some(fov);
        }

        Ok(Self {
            objects,
            objects_source,
            primary,
            secondary,
            primary_options,
            secondary_options: config.secondary,
        })
    }

    pub fn frame(&self, reference: ReferenceFrame) -> Option<&Frame> {
        match reference {
            ReferenceFrame::Primary => Some(&self.primary),
            ReferenceFrame::Secondary => self.secondary.as_ref(),
        }
    }

    /// Frames this scene can express positions in. Primary is always first.
    pub fn available_frames(&self) -> Vec<ReferenceFrame> {
        let mut frames = vec![ReferenceFrame::Primary];
        if self.secondary.is_some() {
            frames.push(ReferenceFrame::Secondary);
        }
        frames
    }

    /// Features of every object in every available frame.
    pub fn feature_table(&self) -> FeatureTable {
        let mut table = FeatureTable::new();
        let per_frame = [
            (ReferenceFrame::Primary, Some(&self.primary), &self.primary_options),
            (ReferenceFrame::Secondary, self.secondary.as_ref(), &self.secondary_options),
        ];
        for (reference, frame, options) in per_frame {
            let Some(frame) = frame else { continue };
            for (id, feature) in compute_features(frame, &self.objects, options) {
                table.entry(id).or_default().insert(reference, feature);
            }
        }
        table
    }

    /// Rounded positions of every object in one frame's axes.
    ///
    /// # Errors
    ///
    /// [`SelectError::FrameUnavailable`] when the frame is not part of the
    /// scene.
    pub fn local_view(&self, reference: ReferenceFrame) -> Result<Vec<LocalObjectView>, VantageError> {
        let frame = self
            .frame(reference)
            .ok_or(SelectError::FrameUnavailable(reference))?;
        Ok(local_view(frame, &self.objects))
    }

    /// Unrounded world and per-frame positions of every object.
    pub fn dual_view(&self) -> Vec<DualObjectView> {
        dual_view(&self.primary, self.secondary.as_ref(), &self.objects)
    }
}
