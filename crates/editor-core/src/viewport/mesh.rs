//! CPU-side geometry for the five spawnable shapes plus grid/axes lines.

use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use shared::{ObjectId, SceneObject, ShapeKind, Transform};

/// Floats per mesh vertex: position(3) + normal(3) + color(3)
pub const MESH_STRIDE: usize = 9;
/// Floats per line vertex: position(3) + color(4)
pub const LINE_STRIDE: usize = 7;

const SPHERE_SECTORS: u32 = 32;
const SPHERE_RINGS: u32 = 32;
const CYLINDER_SEGMENTS: u32 = 32;
const PYRAMID_SIDES: u32 = 4;

/// Interleaved triangle mesh `[pos.xyz, normal.xyz, color.rgb]`
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / MESH_STRIDE
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * MESH_STRIDE;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }

    /// Corner positions of a triangle
    pub fn triangle(&self, tri: usize) -> [Vec3; 3] {
        let i = &self.indices[tri * 3..tri * 3 + 3];
        [
            self.position(i[0] as usize),
            self.position(i[1] as usize),
            self.position(i[2] as usize),
        ]
    }
}

/// Interleaved line list `[pos.xyz, color.rgba]`, two vertices per segment
#[derive(Clone, Debug, Default)]
pub struct LineMeshData {
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / LINE_STRIDE
    }

    pub fn push_segment(&mut self, a: Vec3, b: Vec3, color: [f32; 4]) {
        for p in [a, b] {
            self.vertices.extend_from_slice(&[p.x, p.y, p.z]);
            self.vertices.extend_from_slice(&color);
        }
    }
}

/// Model matrix for an object transform (scale, then XYZ rotation, then translation)
pub fn transform_matrix(t: &Transform) -> Mat4 {
    let [rx, ry, rz] = t.rotation;
    Mat4::from_scale_rotation_translation(
        Vec3::from(t.scale),
        Quat::from_euler(EulerRot::XYZ, rx, ry, rz),
        Vec3::from(t.position),
    )
}

/// Local-space geometry for a shape kind
pub fn shape_mesh(kind: ShapeKind, color: [f32; 3]) -> MeshData {
    match kind {
        ShapeKind::Cube => cube(1.0, 1.0, 1.0, color),
        ShapeKind::Sphere => sphere(0.5, SPHERE_RINGS, SPHERE_SECTORS, color),
        ShapeKind::Cylinder => cylinder(0.5, 1.0, CYLINDER_SEGMENTS, color),
        ShapeKind::Plane => plane(2.0, 2.0, color),
        ShapeKind::Pyramid => cone(0.5, 1.0, PYRAMID_SIDES, color),
    }
}

/// One object to draw: which shared shape mesh, where and in what color.
/// Renderers upload `shape_mesh` once per kind and reuse it for every object.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectDraw {
    pub id: ObjectId,
    pub kind: ShapeKind,
    pub model: Mat4,
    pub color: [f32; 3],
}

impl ObjectDraw {
    pub fn of(object: &SceneObject) -> Self {
        Self {
            id: object.id.clone(),
            kind: object.kind,
            model: transform_matrix(&object.transform),
            color: object.color.to_f32(),
        }
    }

    /// Matrix for transforming local normals into world space
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(self.model).inverse().transpose()
    }
}

// ── Primitives ───────────────────────────────────────────────

struct MeshBuilder {
    mesh: MeshData,
    color: [f32; 3],
}

impl MeshBuilder {
    fn new(color: [f32; 3]) -> Self {
        Self {
            mesh: MeshData::default(),
            color,
        }
    }

    fn vertex(&mut self, p: Vec3, n: Vec3) -> u32 {
        let index = self.mesh.vertex_count() as u32;
        self.mesh.vertices.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z]);
        self.mesh.vertices.extend_from_slice(&self.color);
        index
    }

    fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.mesh.indices.extend_from_slice(&[a, b, c]);
    }

    /// Flat quad with counter-clockwise corners
    fn quad(&mut self, corners: [Vec3; 4], normal: Vec3) {
        let [a, b, c, d] = corners.map(|p| self.vertex(p, normal));
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    /// Triangle fan closing a ring at height `y`
    fn disc(&mut self, radius: f32, y: f32, segments: u32, normal: Vec3) {
        let center = self.vertex(Vec3::new(0.0, y, 0.0), normal);
        let first = center + 1;
        for i in 0..segments {
            let (s, c) = (i as f32 * TAU / segments as f32).sin_cos();
            self.vertex(Vec3::new(radius * c, y, radius * s), normal);
        }
        for i in 0..segments {
            let (a, b) = (first + i, first + (i + 1) % segments);
            if normal.y > 0.0 {
                self.triangle(center, b, a);
            } else {
                self.triangle(center, a, b);
            }
        }
    }

    fn finish(self) -> MeshData {
        self.mesh
    }
}

pub fn cube(w: f32, h: f32, d: f32, color: [f32; 3]) -> MeshData {
    let half = Vec3::new(w, h, d) * 0.5;
    let mut b = MeshBuilder::new(color);

    for normal in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
        // Two in-plane axes so that u x v == normal
        let u = normal.any_orthonormal_vector();
        let v = normal.cross(u);
        let center = normal * half;
        let eu = u * half;
        let ev = v * half;
        b.quad(
            [center - eu - ev, center + eu - ev, center + eu + ev, center - eu + ev],
            normal,
        );
    }

    b.finish()
}

pub fn sphere(radius: f32, rings: u32, sectors: u32, color: [f32; 3]) -> MeshData {
    let mut b = MeshBuilder::new(color);

    for r in 0..=rings {
        let (sp, cp) = (PI * r as f32 / rings as f32).sin_cos();
        for s in 0..=sectors {
            let (st, ct) = (TAU * s as f32 / sectors as f32).sin_cos();
            let n = Vec3::new(sp * ct, cp, sp * st);
            b.vertex(n * radius, n);
        }
    }

    let row = sectors + 1;
    for r in 0..rings {
        for s in 0..sectors {
            let i0 = r * row + s;
            let i2 = i0 + row;
            b.triangle(i0, i2, i0 + 1);
            b.triangle(i0 + 1, i2, i2 + 1);
        }
    }

    b.finish()
}

pub fn cylinder(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let hh = height * 0.5;
    let mut b = MeshBuilder::new(color);

    for i in 0..segments {
        let (s0, c0) = (i as f32 * TAU / segments as f32).sin_cos();
        let (s1, c1) = ((i + 1) as f32 * TAU / segments as f32).sin_cos();
        let n0 = Vec3::new(c0, 0.0, s0);
        let n1 = Vec3::new(c1, 0.0, s1);

        let a = b.vertex(Vec3::new(radius * c0, -hh, radius * s0), n0);
        let bb = b.vertex(Vec3::new(radius * c1, -hh, radius * s1), n1);
        let c = b.vertex(Vec3::new(radius * c1, hh, radius * s1), n1);
        let d = b.vertex(Vec3::new(radius * c0, hh, radius * s0), n0);
        b.triangle(a, c, bb);
        b.triangle(a, d, c);
    }

    b.disc(radius, hh, segments, Vec3::Y);
    b.disc(radius, -hh, segments, Vec3::NEG_Y);
    b.finish()
}

/// Cone with `segments` sides; four sides gives the pyramid shape
pub fn cone(radius: f32, height: f32, segments: u32, color: [f32; 3]) -> MeshData {
    let hh = height * 0.5;
    let slope = radius / height;
    let mut b = MeshBuilder::new(color);

    for i in 0..segments {
        let (s0, c0) = (i as f32 * TAU / segments as f32).sin_cos();
        let (s1, c1) = ((i + 1) as f32 * TAU / segments as f32).sin_cos();
        let n0 = Vec3::new(c0, slope, s0).normalize();
        let n1 = Vec3::new(c1, slope, s1).normalize();

        let apex = b.vertex(Vec3::new(0.0, hh, 0.0), (n0 + n1).normalize());
        let p0 = b.vertex(Vec3::new(radius * c0, -hh, radius * s0), n0);
        let p1 = b.vertex(Vec3::new(radius * c1, -hh, radius * s1), n1);
        b.triangle(apex, p1, p0);
    }

    b.disc(radius, -hh, segments, Vec3::NEG_Y);
    b.finish()
}

/// Flat rectangle in the XY plane facing +Z
pub fn plane(w: f32, h: f32, color: [f32; 3]) -> MeshData {
    let (hw, hh) = (w * 0.5, h * 0.5);
    let mut b = MeshBuilder::new(color);
    b.quad(
        [
            Vec3::new(-hw, -hh, 0.0),
            Vec3::new(hw, -hh, 0.0),
            Vec3::new(hw, hh, 0.0),
            Vec3::new(-hw, hh, 0.0),
        ],
        Vec3::Z,
    );
    b.finish()
}

// ── Grid and axes ────────────────────────────────────────────

/// Square grid of `size` units with `divisions` cells per side on the XZ plane
pub fn grid(size: f32, divisions: u32, opacity: f32) -> LineMeshData {
    let mut lines = LineMeshData::default();
    let cell = size / divisions.max(1) as f32;
    let extent = size * 0.5;
    let line_color = [0.35_f32, 0.35, 0.35, opacity];
    let center_color = [0.55_f32, 0.55, 0.55, opacity];

    for i in 0..=divisions {
        let f = -extent + i as f32 * cell;
        let color = if f.abs() < cell * 0.5 { center_color } else { line_color };
        lines.push_segment(Vec3::new(f, 0.0, -extent), Vec3::new(f, 0.0, extent), color);
        lines.push_segment(Vec3::new(-extent, 0.0, f), Vec3::new(extent, 0.0, f), color);
    }

    lines
}

pub fn axes(length: f32) -> LineMeshData {
    let mut lines = LineMeshData::default();
    lines.push_segment(Vec3::ZERO, Vec3::X * length, [0.9, 0.2, 0.2, 1.0]);
    lines.push_segment(Vec3::ZERO, Vec3::Y * length, [0.2, 0.8, 0.2, 1.0]);
    lines.push_segment(Vec3::ZERO, Vec3::Z * length, [0.2, 0.3, 0.9, 1.0]);
    lines
}
