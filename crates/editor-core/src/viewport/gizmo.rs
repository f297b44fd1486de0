use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use shared::{ObjectId, TransformMode};

use super::camera::OrbitCamera;
use super::mesh::LineMeshData;
use super::picking::{ray_segment_closest, Ray};
use crate::state::settings::GizmoSettings;

/// Screen pixels to radians for rotate drags
const ROTATE_SENSITIVITY: f32 = 0.01;
const RING_SEGMENTS: usize = 48;

const RED: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
const GREEN: [f32; 4] = [0.2, 0.8, 0.2, 1.0];
const BLUE: [f32; 4] = [0.2, 0.3, 0.9, 1.0];
const HIGHLIGHT: [f32; 4] = [1.0, 0.85, 0.1, 1.0];

/// Which axis a gizmo handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    /// Component index into `[x, y, z]` arrays
    pub fn index(self) -> usize {
        match self {
            GizmoAxis::X => 0,
            GizmoAxis::Y => 1,
            GizmoAxis::Z => 2,
        }
    }

    pub fn direction(self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }

    fn color(self) -> [f32; 4] {
        match self {
            GizmoAxis::X => RED,
            GizmoAxis::Y => GREEN,
            GizmoAxis::Z => BLUE,
        }
    }
}

/// State of the transform gizmo
#[derive(Debug, Default)]
pub struct GizmoState {
    /// Object the gizmo is attached to
    pub attached: Option<ObjectId>,
    pub mode: TransformMode,
    /// Currently dragged axis
    pub active_axis: Option<GizmoAxis>,
    /// Whether a gizmo drag is in progress
    pub dragging: bool,
}

impl GizmoState {
    pub fn attach(&mut self, id: &str, mode: TransformMode) {
        self.end_drag();
        self.attached = Some(id.to_string());
        self.mode = mode;
    }

    pub fn detach(&mut self) {
        self.end_drag();
        self.attached = None;
    }

    pub fn begin_drag(&mut self, axis: GizmoAxis) {
        self.active_axis = Some(axis);
        self.dragging = true;
    }

    pub fn end_drag(&mut self) {
        self.active_axis = None;
        self.dragging = false;
    }
}

/// Rotate ring around `axis`, as a closed polyline
fn ring_points(center: Vec3, axis: GizmoAxis, radius: f32) -> Vec<Vec3> {
    (0..=RING_SEGMENTS)
        .map(|i| {
            let (s, c) = (i as f32 / RING_SEGMENTS as f32 * TAU).sin_cos();
            let offset = match axis {
                GizmoAxis::X => Vec3::new(0.0, c, s),
                GizmoAxis::Y => Vec3::new(c, 0.0, s),
                GizmoAxis::Z => Vec3::new(c, s, 0.0),
            };
            center + offset * radius
        })
        .collect()
}

/// Test if a ray hits one of the gizmo handles for the given mode.
/// Returns the axis whose handle passes closest, within the pick threshold.
pub fn gizmo_hit_test(
    ray: &Ray,
    center: Vec3,
    mode: TransformMode,
    settings: &GizmoSettings,
) -> Option<GizmoAxis> {
    let mut best: Option<(GizmoAxis, f32)> = None;

    for axis in GizmoAxis::ALL {
        let dist = match mode {
            TransformMode::Translate | TransformMode::Scale => {
                ray_segment_closest(ray, center, center + axis.direction() * settings.length).0
            }
            TransformMode::Rotate => ring_points(center, axis, settings.ring_radius)
                .windows(2)
                .map(|w| ray_segment_closest(ray, w[0], w[1]).0)
                .fold(f32::MAX, f32::min),
        };

        if dist < settings.pick_threshold && best.is_none_or(|(_, d)| dist < d) {
            best = Some((axis, dist));
        }
    }

    best.map(|(axis, _)| axis)
}

/// Convert a pointer drag (pixels) into an amount along one gizmo axis.
///
/// Translate and scale project the drag onto the axis as drawn on screen,
/// so one world unit equals the on-screen length of a unit axis vector.
/// Rotate maps the drag to radians.
pub fn drag_amount(
    camera: &OrbitCamera,
    center: Vec3,
    axis: GizmoAxis,
    mode: TransformMode,
    screen_delta: Vec2,
    viewport: Vec2,
) -> f32 {
    if mode == TransformMode::Rotate {
        return (screen_delta.x - screen_delta.y) * ROTATE_SENSITIVITY;
    }

    let to_pixels = |ndc: Vec2| Vec2::new((ndc.x + 1.0) * 0.5 * viewport.x, (1.0 - ndc.y) * 0.5 * viewport.y);
    let (Some(p0), Some(p1)) = (
        camera.project(center),
        camera.project(center + axis.direction()),
    ) else {
        return 0.0;
    };

    let screen_axis = to_pixels(p1) - to_pixels(p0);
    let screen_axis_len = screen_axis.length();
    if screen_axis_len < 1.0 {
        return 0.0;
    }

    screen_delta.dot(screen_axis / screen_axis_len) / screen_axis_len
}

/// Build gizmo line mesh at the given center point.
pub fn build_gizmo_lines(
    center: Vec3,
    mode: TransformMode,
    active: Option<GizmoAxis>,
    settings: &GizmoSettings,
) -> LineMeshData {
    let mut lines = LineMeshData::default();
    let length = settings.length;
    let tick = length * 0.15;

    for axis in GizmoAxis::ALL {
        let color = if active == Some(axis) { HIGHLIGHT } else { axis.color() };
        let dir = axis.direction();
        let tip = center + dir * length;
        // A perpendicular used for arrowheads and end caps
        let side = match axis {
            GizmoAxis::Y => Vec3::X,
            _ => Vec3::Y,
        };

        match mode {
            TransformMode::Translate => {
                lines.push_segment(center, tip, color);
                lines.push_segment(tip, tip - dir * tick + side * tick * 0.5, color);
                lines.push_segment(tip, tip - dir * tick - side * tick * 0.5, color);
            }
            TransformMode::Scale => {
                lines.push_segment(center, tip, color);
                let half = side * tick * 0.5;
                lines.push_segment(tip - half, tip + half, color);
                lines.push_segment(tip - half - dir * tick, tip + half - dir * tick, color);
                lines.push_segment(tip - half, tip - half - dir * tick, color);
                lines.push_segment(tip + half, tip + half - dir * tick, color);
            }
            TransformMode::Rotate => {
                for w in ring_points(center, axis, settings.ring_radius).windows(2) {
                    lines.push_segment(w[0], w[1], color);
                }
            }
        }
    }

    lines
}
