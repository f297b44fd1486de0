use glam::{Vec2, Vec3};
use shared::ObjectId;

use super::camera::OrbitCamera;
use super::mesh::{MeshData, MESH_STRIDE};
use crate::backend::GraphicsBackend;
use crate::state::scene::SceneStore;

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of every vertex in the mesh
    pub fn from_mesh(data: &MeshData) -> Self {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);

        for v in data.vertices.chunks_exact(MESH_STRIDE) {
            let p = Vec3::new(v[0], v[1], v[2]);
            min = min.min(p);
            max = max.max(p);
        }

        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the ray parameter of the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = ray.direction.recip();
    let t1 = (aabb.min - ray.origin) * inv_dir;
    let t2 = (aabb.max - ray.origin) * inv_dir;

    let tmin = t1.min(t2).max_element();
    let tmax = t1.max(t2).min_element();

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection (two-sided).
/// Returns the ray parameter of the hit, or None.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Parallel to the triangle plane
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON).then_some(t)
}

/// Nearest triangle hit of a ray against a mesh, as a ray parameter
pub fn ray_mesh(ray: &Ray, mesh: &MeshData) -> Option<f32> {
    (0..mesh.triangle_count())
        .filter_map(|tri| {
            let [v0, v1, v2] = mesh.triangle(tri);
            ray_triangle_intersect(ray, v0, v1, v2)
        })
        .min_by(f32::total_cmp)
}

/// Hit of a ray against the y = 0 plane inside `|x|, |z| <= half_extent`
pub fn ray_ground_square(ray: &Ray, half_extent: f32) -> Option<f32> {
    if ray.direction.y.abs() < 1e-7 {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t <= 0.0 {
        return None;
    }
    let p = ray.at(t);
    (p.x.abs() <= half_extent && p.z.abs() <= half_extent).then_some(t)
}

/// Closest approach between a ray and a line segment.
/// Returns `(distance, ray_parameter)`; the ray parameter is never negative.
pub fn ray_segment_closest(ray: &Ray, start: Vec3, end: Vec3) -> (f32, f32) {
    let u = ray.direction;
    let v = end - start;
    let w = ray.origin - start;

    let a = u.dot(u);
    let b = u.dot(v);
    let c = v.dot(v);
    let d = u.dot(w);
    let e = v.dot(w);
    let denom = a * c - b * b;

    let (sc, tc) = if denom < 1e-7 {
        // Nearly parallel
        (0.0, if c > 0.0 { e / c } else { 0.0 })
    } else {
        ((b * e - c * d) / denom, (a * e - b * d) / denom)
    };

    let tc = tc.clamp(0.0, 1.0);
    let sc = sc.max(0.0);

    let closest_ray = ray.origin + u * sc;
    let closest_segment = start + v * tc;
    ((closest_ray - closest_segment).length(), sc)
}

/// Resolve a normalized device coordinate to the nearest selectable object.
///
/// Every object and helper is offered to the backend; hits come back nearest
/// first and non-selectable ones (grid, axes, locked objects) are skipped.
pub fn pick<B: GraphicsBackend + ?Sized>(
    camera: &OrbitCamera,
    ndc: Vec2,
    store: &SceneStore,
    backend: &B,
) -> Option<ObjectId> {
    let ray = camera.ray_from_ndc(ndc);
    let hits = backend.raycast(&ray, &store.pick_candidates());

    hits.into_iter()
        .find(|hit| hit.selectable)
        .and_then(|hit| hit.target.into_object())
}
