//! Editor settings

use serde::{Deserialize, Serialize};

use crate::error::{EditorError, EditorResult};

/// Largest accepted spawn half-width
pub const MAX_SPAWN_EXTENT: f32 = 1.0e4;
/// Largest accepted number of grid cells per side
pub const MAX_GRID_DIVISIONS: u32 = 1000;

/// Initial camera placement and projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Eye position in world space
    pub position: [f32; 3],
    /// Point the camera orbits around
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 3.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Where new and duplicated shapes appear
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Half-width of the square spawn region on the X/Y axes
    pub extent: f32,
    /// X offset applied to duplicates
    pub duplicate_offset: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            extent: 2.0,
            duplicate_offset: 1.0,
        }
    }
}

/// Selection behaviour
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// Clear the selection when a click hits no selectable object
    pub deselect_on_miss: bool,
}

/// Grid display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub visible: bool,
    /// Side length of the grid square
    pub size: f32,
    /// Number of cells per side
    pub divisions: u32,
    /// Grid line opacity (0.0 - 1.0)
    pub opacity: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            visible: true,
            size: 10.0,
            divisions: 10,
            opacity: 0.6,
        }
    }
}

/// Axis display settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSettings {
    pub visible: bool,
    pub length: f32,
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            visible: true,
            length: 5.0,
        }
    }
}

/// Transform gizmo handle sizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoSettings {
    /// Length of the translate/scale handles
    pub length: f32,
    /// Radius of the rotate rings
    pub ring_radius: f32,
    /// Max distance between the pointer ray and a handle to grab it
    pub pick_threshold: f32,
}

impl Default for GizmoSettings {
    fn default() -> Self {
        Self {
            length: 1.5,
            ring_radius: 1.2,
            pick_threshold: 0.15,
        }
    }
}

/// Viewport settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Background color RGB
    pub background_color: [u8; 3],
    /// Size assumed until the host reports one
    pub initial_size: [f32; 2],
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            background_color: [30, 30, 35],
            initial_size: [1280.0, 720.0],
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    pub camera: CameraSettings,
    pub spawn: SpawnSettings,
    pub selection: SelectionSettings,
    pub grid: GridSettings,
    pub axes: AxisSettings,
    pub gizmo: GizmoSettings,
    pub viewport: ViewportSettings,
}

impl EditorSettings {
    /// Parse and validate settings; missing fields take their defaults
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let settings: Self = serde_json::from_str(json).map_err(|e| EditorError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would break spawning, projection or picking
    pub fn validate(&self) -> EditorResult<()> {
        fn check(ok: bool, what: &str) -> EditorResult<()> {
            if ok {
                Ok(())
            } else {
                Err(EditorError::Settings(format!("invalid {what}")))
            }
        }
        fn positive(v: f32) -> bool {
            v.is_finite() && v > 0.0
        }

        let camera = &self.camera;
        check(
            camera.position.iter().chain(&camera.target).all(|v| v.is_finite())
                && camera.position != camera.target,
            "camera.position/target",
        )?;
        check(positive(camera.near) && camera.far.is_finite() && camera.far > camera.near, "camera.near/far")?;
        check(
            camera.fov_degrees.is_finite() && camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0,
            "camera.fov_degrees",
        )?;

        check(
            self.spawn.extent.is_finite() && (0.0..=MAX_SPAWN_EXTENT).contains(&self.spawn.extent),
            "spawn.extent",
        )?;
        check(self.spawn.duplicate_offset.is_finite(), "spawn.duplicate_offset")?;

        check(positive(self.grid.size), "grid.size")?;
        check((1..=MAX_GRID_DIVISIONS).contains(&self.grid.divisions), "grid.divisions")?;
        check(positive(self.axes.length), "axes.length")?;

        let gizmo = &self.gizmo;
        check(
            positive(gizmo.length) && positive(gizmo.ring_radius) && positive(gizmo.pick_threshold),
            "gizmo",
        )
    }

    pub fn to_json(&self) -> EditorResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| EditorError::Settings(e.to_string()))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl EditorSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "scene-editor", "scene-editor")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from the config directory, or return defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("Ignoring settings at {}: {e}", path.display());
                }
                Self::default()
            }
        }
    }

    pub fn load_from(path: &std::path::Path) -> EditorResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| EditorError::Settings(e.to_string()))?;
        Self::from_json(&json)
    }

    /// Save settings to the config directory
    pub fn save(&self) -> EditorResult<()> {
        let path = Self::config_path()
            .ok_or_else(|| EditorError::Settings("no config directory".into()))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &std::path::Path) -> EditorResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| EditorError::Settings(e.to_string()))?;
        }
        std::fs::write(path, self.to_json()?).map_err(|e| EditorError::Settings(e.to_string()))
    }
}
