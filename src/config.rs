//! Tunables for the interaction engine.

use crate::error::EditorError;
use crate::geometry::Size;
use crate::path::{DEFAULT_CURVATURE, DEFAULT_CUT_SAMPLES, DEFAULT_MIN_OFFSET};
use serde::{Deserialize, Serialize};

/// Engine configuration.
///
/// Missing fields take their defaults when deserializing, so a host can
/// override just the values it cares about:
///
/// ```
/// use graph_gesture_core::EditorConfig;
///
/// let config = EditorConfig::from_json(r#"{ "snap_distance": 12.0 }"#).unwrap();
/// assert_eq!(config.snap_distance, 12.0);
/// assert_eq!(config.cut_samples, 24);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum pointer distance at which an anchor attracts a link
    pub snap_distance: f32,
    /// Control point offset as a fraction of anchor distance
    pub bezier_curvature: f32,
    /// Minimum control point offset
    pub bezier_min_offset: f32,
    /// Segments used to flatten curves for cut testing
    pub cut_samples: usize,
    /// Pick radius of edge endpoint handles
    pub handle_radius: f32,
    /// Maximum pointer distance from a curve that counts as pressing the edge
    pub edge_hit_distance: f32,
    /// Replaces every node's dimensions when set (graph flavors with fixed sizes)
    pub node_size: Option<Size>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_distance: 20.0,
            bezier_curvature: DEFAULT_CURVATURE,
            bezier_min_offset: DEFAULT_MIN_OFFSET,
            cut_samples: DEFAULT_CUT_SAMPLES,
            handle_radius: 8.0,
            edge_hit_distance: 6.0,
            node_size: None,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON configuration and check its ranges.
    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        let non_negative = [
            ("snap_distance", self.snap_distance),
            ("bezier_curvature", self.bezier_curvature),
            ("bezier_min_offset", self.bezier_min_offset),
            ("handle_radius", self.handle_radius),
            ("edge_hit_distance", self.edge_hit_distance),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(EditorError::Config(format!("{} must be >= 0, got {}", name, value)));
            }
        }
        if self.cut_samples == 0 {
            return Err(EditorError::Config("cut_samples must be > 0".into()));
        }
        if let Some(size) = self.node_size {
            if !(size.width > 0.0 && size.height > 0.0) {
                return Err(EditorError::Config("node_size must be positive".into()));
            }
        }
        Ok(())
    }

    pub fn with_snap_distance(mut self, distance: f32) -> Self {
        self.snap_distance = distance;
        self
    }

    pub fn with_bezier(mut self, curvature: f32, min_offset: f32) -> Self {
        self.bezier_curvature = curvature;
        self.bezier_min_offset = min_offset;
        self
    }

    pub fn with_cut_samples(mut self, samples: usize) -> Self {
        self.cut_samples = samples;
        self
    }

    pub fn with_handle_radius(mut self, radius: f32) -> Self {
        self.handle_radius = radius;
        self
    }

    pub fn with_edge_hit_distance(mut self, distance: f32) -> Self {
        self.edge_hit_distance = distance;
        self
    }

    pub fn with_node_size(mut self, size: Size) -> Self {
        self.node_size = Some(size);
        self
    }
}
