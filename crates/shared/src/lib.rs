use serde::{Deserialize, Serialize};

/// Unique identifier of an object in the scene
pub type ObjectId = String;

/// Primitive shape kinds the editor can spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Cube,
    Sphere,
    Cylinder,
    Plane,
    Pyramid,
}

impl ShapeKind {
    /// Every kind, in toolbar order
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::Cube,
        ShapeKind::Sphere,
        ShapeKind::Cylinder,
        ShapeKind::Plane,
        ShapeKind::Pyramid,
    ];

    /// Lowercase identifier used by buttons and commands
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Cube => "cube",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Plane => "plane",
            ShapeKind::Pyramid => "pyramid",
        }
    }

    /// Capitalized label for display
    pub fn label(&self) -> &'static str {
        match self {
            ShapeKind::Cube => "Cube",
            ShapeKind::Sphere => "Sphere",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Plane => "Plane",
            ShapeKind::Pyramid => "Pyramid",
        }
    }

    /// Parse an identifier (case-insensitive). Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// Transform gizmo operation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl TransformMode {
    pub fn name(&self) -> &'static str {
        match self {
            TransformMode::Translate => "translate",
            TransformMode::Rotate => "rotate",
            TransformMode::Scale => "scale",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            TransformMode::Translate,
            TransformMode::Rotate,
            TransformMode::Scale,
        ]
        .into_iter()
        .find(|mode| mode.name().eq_ignore_ascii_case(name.trim()))
    }
}

/// 24-bit RGB material color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255]);

    /// Build from a packed 0xRRGGBB value (upper byte ignored)
    pub fn from_hex(hex: u32) -> Self {
        Self([
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        ])
    }

    /// Packed 0xRRGGBB value
    pub fn to_hex(&self) -> u32 {
        let [r, g, b] = self.0;
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }

    /// Components scaled to 0.0..=1.0 for vertex colors
    pub fn to_f32(&self) -> [f32; 3] {
        let [r, g, b] = self.0;
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }
}

/// Object transform: position, Euler XYZ rotation (radians) and scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// A renderable, optionally pickable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ShapeKind,
    #[serde(default)]
    pub transform: Transform,
    pub color: Color,
    #[serde(default = "default_true")]
    pub selectable: bool,
}

fn default_true() -> bool {
    true
}

/// Fixed scene furniture. Hit by rays, never selectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneHelper {
    /// Ground grid on the XZ plane, centered at the origin
    Grid { size: f32, divisions: u32 },
    /// X/Y/Z axis indicator starting at the origin
    Axes { length: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_kind_from_name() {
        assert_eq!(ShapeKind::from_name("cube"), Some(ShapeKind::Cube));
        assert_eq!(ShapeKind::from_name("Pyramid"), Some(ShapeKind::Pyramid));
        assert_eq!(ShapeKind::from_name(" sphere "), Some(ShapeKind::Sphere));
        assert_eq!(ShapeKind::from_name("torus"), None);
        assert_eq!(ShapeKind::from_name(""), None);
    }

    #[test]
    fn test_shape_kind_names_unique() {
        for kind in ShapeKind::ALL {
            assert_eq!(ShapeKind::from_name(kind.name()), Some(kind));
            assert_eq!(ShapeKind::from_name(kind.label()), Some(kind));
        }
    }

    #[test]
    fn test_shape_kind_serde() {
        let json = serde_json::to_string(&ShapeKind::Cylinder).unwrap();
        assert_eq!(json, r#""cylinder""#);
        let back: ShapeKind = serde_json::from_str(r#""plane""#).unwrap();
        assert_eq!(back, ShapeKind::Plane);
    }

    #[test]
    fn test_transform_mode_from_name() {
        assert_eq!(TransformMode::from_name("rotate"), Some(TransformMode::Rotate));
        assert_eq!(TransformMode::from_name("SCALE"), Some(TransformMode::Scale));
        assert_eq!(TransformMode::from_name("skew"), None);
        assert_eq!(TransformMode::default(), TransformMode::Translate);
    }

    #[test]
    fn test_color_hex() {
        let c = Color::from_hex(0x12AB34);
        assert_eq!(c.0, [0x12, 0xAB, 0x34]);
        assert_eq!(c.to_hex(), 0x12AB34);
        assert_eq!(Color::from_hex(0xFF00_0000).to_hex(), 0);
        assert_eq!(Color::WHITE.to_f32(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, [0.0; 3]);
        assert_eq!(t.rotation, [0.0; 3]);
        assert_eq!(t.scale, [1.0; 3]);
        assert_eq!(Transform::at([1.0, 2.0, 3.0]).scale, [1.0; 3]);
    }

    #[test]
    fn test_scene_object_defaults() {
        let json = r#"{"id": "a", "name": "Cube", "kind": "cube", "color": [255, 0, 0]}"#;
        let obj: SceneObject = serde_json::from_str(json).unwrap();
        assert!(obj.selectable);
        assert_eq!(obj.transform, Transform::new());
        assert_eq!(obj.color, Color([255, 0, 0]));
    }

    #[test]
    fn test_scene_helper_serde() {
        let grid = SceneHelper::Grid { size: 10.0, divisions: 10 };
        let json = serde_json::to_string(&grid).unwrap();
        assert!(json.contains(r#""type":"grid""#));
        let back: SceneHelper = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
