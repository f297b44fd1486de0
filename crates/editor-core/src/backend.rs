//! Graphics capabilities the editor needs from its host: ray casting and a
//! transform gizmo that can be attached to one object at a time.

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use shared::{ObjectId, SceneHelper, SceneObject, ShapeKind, TransformMode};

use crate::viewport::gizmo::GizmoState;
use crate::viewport::mesh::{shape_mesh, transform_matrix, MeshData};
use crate::viewport::picking::{ray_aabb, ray_ground_square, ray_mesh, ray_segment_closest, Aabb, Ray};

/// Max ray distance to an axis line that still counts as a hit
const AXIS_PICK_THRESHOLD: f32 = 0.1;

/// Something a ray may hit
#[derive(Debug, Clone, Copy)]
pub enum PickCandidate<'a> {
    Object(&'a SceneObject),
    Helper(&'a SceneHelper),
}

/// What a ray hit
#[derive(Debug, Clone, PartialEq)]
pub enum PickTarget {
    Object(ObjectId),
    Grid,
    Axes,
}

impl PickTarget {
    pub fn into_object(self) -> Option<ObjectId> {
        match self {
            PickTarget::Object(id) => Some(id),
            PickTarget::Grid | PickTarget::Axes => None,
        }
    }
}

/// A single ray intersection
#[derive(Debug, Clone, PartialEq)]
pub struct RayHit {
    pub target: PickTarget,
    /// Distance from the ray origin
    pub distance: f32,
    pub selectable: bool,
}

pub trait GraphicsBackend {
    /// Intersect the ray with every candidate.
    /// Hits are ordered nearest first; an empty list means nothing was hit.
    fn raycast(&self, ray: &Ray, candidates: &[PickCandidate<'_>]) -> Vec<RayHit>;

    fn gizmo(&self) -> &GizmoState;

    fn gizmo_mut(&mut self) -> &mut GizmoState;

    /// Attach the transform gizmo to an object
    fn attach_gizmo(&mut self, id: &str, mode: TransformMode) {
        self.gizmo_mut().attach(id, mode);
    }

    fn detach_gizmo(&mut self) {
        self.gizmo_mut().detach();
    }

    fn set_gizmo_mode(&mut self, mode: TransformMode) {
        self.gizmo_mut().mode = mode;
    }

    fn gizmo_target(&self) -> Option<&str> {
        self.gizmo().attached.as_deref()
    }
}

/// CPU ray casting against the same meshes the renderer draws
pub struct MeshBackend {
    /// Local-space geometry and bounds per shape kind
    meshes: HashMap<ShapeKind, (MeshData, Aabb)>,
    gizmo: GizmoState,
}

impl Default for MeshBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBackend {
    pub fn new() -> Self {
        let meshes = ShapeKind::ALL
            .into_iter()
            .map(|kind| {
                let mesh = shape_mesh(kind, [1.0; 3]);
                let aabb = Aabb::from_mesh(&mesh);
                (kind, (mesh, aabb))
            })
            .collect();
        Self {
            meshes,
            gizmo: GizmoState::default(),
        }
    }

    /// Ray distance to an object's surface.
    /// The ray is moved into object space, which keeps its parameter intact.
    fn hit_object(&self, ray: &Ray, object: &SceneObject) -> Option<f32> {
        let (mesh, aabb) = self.meshes.get(&object.kind)?;
        let model = transform_matrix(&object.transform);
        if model.determinant().abs() < f32::EPSILON {
            return None;
        }
        let inv: Mat4 = model.inverse();
        let local = Ray {
            origin: inv.transform_point3(ray.origin),
            direction: inv.transform_vector3(ray.direction),
        };

        ray_aabb(&local, aabb)?;
        ray_mesh(&local, mesh)
    }

    fn hit_helper(ray: &Ray, helper: &SceneHelper) -> Option<f32> {
        match helper {
            SceneHelper::Grid { size, .. } => ray_ground_square(ray, size * 0.5),
            SceneHelper::Axes { length } => [Vec3::X, Vec3::Y, Vec3::Z]
                .into_iter()
                .map(|axis| ray_segment_closest(ray, Vec3::ZERO, axis * *length))
                .filter(|(dist, _)| *dist < AXIS_PICK_THRESHOLD)
                .map(|(_, t)| t)
                .min_by(f32::total_cmp),
        }
    }
}

impl GraphicsBackend for MeshBackend {
    fn raycast(&self, ray: &Ray, candidates: &[PickCandidate<'_>]) -> Vec<RayHit> {
        let mut hits: Vec<RayHit> = candidates
            .iter()
            .filter_map(|candidate| match candidate {
                PickCandidate::Object(object) => self.hit_object(ray, object).map(|distance| RayHit {
                    target: PickTarget::Object(object.id.clone()),
                    distance,
                    selectable: object.selectable,
                }),
                PickCandidate::Helper(helper) => Self::hit_helper(ray, helper).map(|distance| RayHit {
                    target: match helper {
                        SceneHelper::Grid { .. } => PickTarget::Grid,
                        SceneHelper::Axes { .. } => PickTarget::Axes,
                    },
                    distance,
                    selectable: false,
                }),
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn gizmo(&self) -> &GizmoState {
        &self.gizmo
    }

    fn gizmo_mut(&mut self) -> &mut GizmoState {
        &mut self.gizmo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::object_at;

    fn ray_down_z(x: f32, y: f32) -> Ray {
        Ray { origin: Vec3::new(x, y, 10.0), direction: Vec3::NEG_Z }
    }

    #[test]
    fn test_raycast_orders_nearest_first() {
        let backend = MeshBackend::new();
        let far = object_at("far", ShapeKind::Cube, [0.0, 0.0, -3.0]);
        let near = object_at("near", ShapeKind::Cube, [0.0, 0.0, 2.0]);
        let candidates = [PickCandidate::Object(&far), PickCandidate::Object(&near)];

        let hits = backend.raycast(&ray_down_z(0.0, 0.0), &candidates);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].target, PickTarget::Object("near".into()));
        assert!((hits[0].distance - 7.5).abs() < 1e-4);
        assert!((hits[1].distance - 12.5).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_respects_transform() {
        let backend = MeshBackend::new();
        let mut obj = object_at("a", ShapeKind::Cube, [3.0, 0.0, 0.0]);
        obj.transform.scale = [4.0, 1.0, 1.0];
        let candidates = [PickCandidate::Object(&obj)];

        // Scaled cube spans x in [1, 5]
        assert_eq!(backend.raycast(&ray_down_z(1.5, 0.0), &candidates).len(), 1);
        assert!(backend.raycast(&ray_down_z(0.5, 0.0), &candidates).is_empty());

        let hit = &backend.raycast(&ray_down_z(4.5, 0.2), &candidates)[0];
        assert!((hit.distance - 9.5).abs() < 1e-4);
    }

    #[test]
    fn test_raycast_every_shape_through_center() {
        let backend = MeshBackend::new();
        for kind in ShapeKind::ALL {
            let obj = object_at("a", kind, [0.0; 3]);
            let hits = backend.raycast(&ray_down_z(0.01, 0.01), &[PickCandidate::Object(&obj)]);
            assert_eq!(hits.len(), 1, "{kind:?} not hit");
        }
    }

    #[test]
    fn test_helpers_hit_but_not_selectable() {
        let backend = MeshBackend::new();
        let grid = SceneHelper::Grid { size: 10.0, divisions: 10 };
        let axes = SceneHelper::Axes { length: 5.0 };
        let candidates = [PickCandidate::Helper(&grid), PickCandidate::Helper(&axes)];

        let down = Ray { origin: Vec3::new(2.0, 5.0, 0.02), direction: Vec3::NEG_Y };
        let hits = backend.raycast(&down, &candidates);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| !h.selectable));
        assert!(hits.iter().all(|h| h.target.clone().into_object().is_none()));
    }

    #[test]
    fn test_degenerate_scale_never_hit() {
        let backend = MeshBackend::new();
        let mut obj = object_at("a", ShapeKind::Sphere, [0.0; 3]);
        obj.transform.scale = [0.0, 1.0, 1.0];
        assert!(backend.raycast(&ray_down_z(0.0, 0.0), &[PickCandidate::Object(&obj)]).is_empty());
    }

    #[test]
    fn test_gizmo_capabilities() {
        let mut backend = MeshBackend::new();
        assert!(backend.gizmo_target().is_none());
        backend.attach_gizmo("a", TransformMode::Translate);
        assert_eq!(backend.gizmo_target(), Some("a"));
        backend.set_gizmo_mode(TransformMode::Scale);
        assert_eq!(backend.gizmo().mode, TransformMode::Scale);
        backend.detach_gizmo();
        assert!(backend.gizmo_target().is_none());
    }
}
