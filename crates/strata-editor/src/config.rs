use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_renderer::camera::{Camera, CameraSettings};

use crate::error::EditorError;
use crate::workshop::{Workshop, WorkshopSettings};

/// Editor settings, read from a JSON file. Every field has a default, so
/// `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub database_dir: PathBuf,
    pub database_label: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// World loaded at startup; the default world when unset.
    pub initial_world: Option<String>,
    /// Frames rendered by a headless run.
    pub frames: u32,
    /// Simulated time between headless frames, in milliseconds.
    pub frame_interval_ms: f64,
    pub camera: CameraSettings,
    pub workshop: WorkshopSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            database_dir: PathBuf::from("data/worlds"),
            database_label: "worldDatabase".to_string(),
            canvas_width: 1280.0,
            canvas_height: 720.0,
            initial_world: None,
            frames: 1,
            frame_interval_ms: 1000.0 / 60.0,
            camera: CameraSettings::default(),
            workshop: WorkshopSettings::default(),
        }
    }
}

impl EditorConfig {
    pub fn load(path: &Path) -> Result<Self, EditorError> {
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text).map_err(EditorError::Config)?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn camera(&self) -> Camera {
        Camera::new(self.canvas_width, self.canvas_height, self.camera)
    }

    pub fn workshop(&self) -> Workshop {
        Workshop::new(self.workshop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.workshop.close_polyline_threshold, 20.0);
        assert_eq!(config.workshop.grid.spacing, 50.0);
        assert_eq!(config.camera.distance, 1000.0);
    }

    #[test]
    fn test_partial_overrides() {
        let config: EditorConfig = serde_json::from_str(
            r#"{
                "database_label": "mine",
                "workshop": { "grid": { "snap": true } },
                "camera": { "distance": 250 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.database_label, "mine");
        assert!(config.workshop.grid.snap);
        assert_eq!(config.workshop.grid.spacing, 50.0);
        assert_eq!(config.camera().distance(), 250.0);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strata.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(EditorError::Config(_))));
        assert!(matches!(
            EditorConfig::load(&dir.path().join("missing.json")),
            Err(EditorError::Io(_))
        ));
    }
}
