//! Factory functions for test data, plus a backend double that records
//! every gizmo call it receives.

use shared::{Color, ObjectId, SceneObject, ShapeKind, Transform, TransformMode};

use crate::backend::{GraphicsBackend, MeshBackend, PickCandidate, RayHit};
use crate::viewport::gizmo::GizmoState;
use crate::viewport::picking::Ray;

// ── Object factories ────────────────────────────────────────────

/// Create a selectable object with identity rotation and unit scale.
pub fn object_at(id: &str, kind: ShapeKind, position: [f32; 3]) -> SceneObject {
    SceneObject {
        id: id.to_string(),
        name: kind.label().to_string(),
        kind,
        transform: Transform::at(position),
        color: Color::WHITE,
        selectable: true,
    }
}

/// Create an object that rays hit but picking never returns.
pub fn locked_object_at(id: &str, kind: ShapeKind, position: [f32; 3]) -> SceneObject {
    SceneObject {
        selectable: false,
        ..object_at(id, kind, position)
    }
}

// ── Recording backend ───────────────────────────────────────────

/// A gizmo call observed by [`RecordingBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Attach(ObjectId, TransformMode),
    Detach,
    SetMode(TransformMode),
}

/// Ray casts against real meshes; logs gizmo calls in order.
#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
    meshes: MeshBackend,
    gizmo: GizmoState,
}

impl RecordingBackend {
    /// Number of attachments currently held (0 or 1 when used correctly)
    pub fn attachment_count(&self) -> usize {
        let mut attached = 0usize;
        for call in &self.calls {
            match call {
                BackendCall::Attach(..) => attached += 1,
                BackendCall::Detach => attached = 0,
                BackendCall::SetMode(_) => {}
            }
        }
        attached
    }
}

impl GraphicsBackend for RecordingBackend {
    fn raycast(&self, ray: &Ray, candidates: &[PickCandidate<'_>]) -> Vec<RayHit> {
        self.meshes.raycast(ray, candidates)
    }

    fn gizmo(&self) -> &GizmoState {
        &self.gizmo
    }

    fn gizmo_mut(&mut self) -> &mut GizmoState {
        &mut self.gizmo
    }

    fn attach_gizmo(&mut self, id: &str, mode: TransformMode) {
        self.calls.push(BackendCall::Attach(id.to_string(), mode));
        self.gizmo.attach(id, mode);
    }

    fn detach_gizmo(&mut self) {
        self.calls.push(BackendCall::Detach);
        self.gizmo.detach();
    }

    fn set_gizmo_mode(&mut self, mode: TransformMode) {
        self.calls.push(BackendCall::SetMode(mode));
        self.gizmo.mode = mode;
    }
}
