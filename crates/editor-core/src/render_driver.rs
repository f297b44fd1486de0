use glam::Vec2;
use serde::Serialize;

use crate::error::{EditorError, EditorResult};
use crate::state::settings::CameraSettings;
use crate::viewport::camera::OrbitCamera;

/// Per-tick frame description handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameInfo {
    pub frame: u64,
    pub width: f32,
    pub height: f32,
    /// Column-major view-projection matrix
    pub view_projection: [f32; 16],
    pub eye: [f32; 3],
    /// Scene version at the time of the tick
    pub scene_version: u64,
}

/// Camera and viewport owner, ticked once per display refresh
pub struct RenderDriver {
    camera: OrbitCamera,
    size: Vec2,
    frame: u64,
    /// Orbit controls are suspended while a gizmo drag is in progress
    orbit_enabled: bool,
}

impl RenderDriver {
    /// Driver with an initial viewport size.
    /// Unusable sizes fall back to 1x1 until the host reports a real one.
    pub fn new(settings: &CameraSettings, width: f32, height: f32) -> Self {
        let size = if validate_size(width, height).is_ok() {
            Vec2::new(width, height)
        } else {
            tracing::warn!("Ignoring initial viewport size {width}x{height}");
            Vec2::ONE
        };
        Self {
            camera: OrbitCamera::new(settings, size.x / size.y),
            size,
            frame: 0,
            orbit_enabled: true,
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Update the viewport and the camera aspect. Rejected sizes leave state untouched.
    pub fn resize(&mut self, width: f32, height: f32) -> EditorResult<()> {
        validate_size(width, height)?;
        if self.size != Vec2::new(width, height) {
            tracing::debug!("Viewport resized to {width}x{height}");
        }
        self.size = Vec2::new(width, height);
        self.camera.aspect = width / height;
        Ok(())
    }

    /// Advance one frame
    pub fn tick(&mut self, scene_version: u64) -> FrameInfo {
        self.frame += 1;
        FrameInfo {
            frame: self.frame,
            width: self.size.x,
            height: self.size.y,
            view_projection: self.camera.view_projection().to_cols_array(),
            eye: self.camera.eye_position().to_array(),
            scene_version,
        }
    }

    /// Viewport pixels to normalized device coordinates (+Y up)
    pub fn ndc_from_screen(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x / self.size.x * 2.0 - 1.0, -(y / self.size.y) * 2.0 + 1.0)
    }

    pub fn orbit_enabled(&self) -> bool {
        self.orbit_enabled
    }

    pub fn set_orbit_enabled(&mut self, enabled: bool) {
        self.orbit_enabled = enabled;
    }

    pub fn orbit(&mut self, dx: f32, dy: f32) {
        if self.orbit_enabled {
            self.camera.rotate(dx, dy);
        }
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        if self.orbit_enabled {
            self.camera.pan(dx, dy);
        }
    }

    pub fn zoom(&mut self, delta: f32) {
        if self.orbit_enabled {
            self.camera.zoom(delta);
        }
    }
}

fn validate_size(width: f32, height: f32) -> EditorResult<()> {
    if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
        Ok(())
    } else {
        Err(EditorError::InvalidViewport { width, height })
    }
}
