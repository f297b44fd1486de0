use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::{Color, SceneObject, ShapeKind, Transform};

use crate::state::settings::MAX_SPAWN_EXTENT;

/// Non-finite or negative extents spawn at the origin; huge ones are capped
fn usable_extent(extent: f32) -> f32 {
    if extent.is_finite() {
        extent.clamp(0.0, MAX_SPAWN_EXTENT)
    } else {
        0.0
    }
}

/// Builds new shapes with a random color and a random spot near the origin
pub struct ShapeFactory {
    rng: StdRng,
    /// Spawn positions fall in `[-extent, extent)` on X and Y
    extent: f32,
}

impl ShapeFactory {
    pub fn new(extent: f32) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            extent: usable_extent(extent),
        }
    }

    /// Deterministic factory for reproducible scenes
    pub fn with_seed(extent: f32, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            extent: usable_extent(extent),
        }
    }

    pub fn spawn(&mut self, kind: ShapeKind) -> SceneObject {
        let color = Color::from_hex(self.rng.gen_range(0..=0xFF_FFFF));
        let position = if self.extent > 0.0 {
            [
                self.rng.gen_range(-self.extent..self.extent),
                self.rng.gen_range(-self.extent..self.extent),
                0.0,
            ]
        } else {
            [0.0; 3]
        };

        SceneObject {
            id: uuid::Uuid::new_v4().to_string(),
            name: kind.label().to_string(),
            kind,
            transform: Transform::at(position),
            color,
            selectable: true,
        }
    }
}
