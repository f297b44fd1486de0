//! Scene store: spawned objects plus fixed furniture

use glam::Vec3;
use shared::{ObjectId, SceneHelper, SceneObject, TransformMode};

use crate::backend::PickCandidate;
use crate::viewport::gizmo::GizmoAxis;

/// Smallest scale a gizmo drag can reach
const MIN_SCALE: f32 = 0.01;

/// Objects in the scene, in insertion order
#[derive(Default)]
pub struct SceneStore {
    objects: Vec<SceneObject>,
    helpers: Vec<SceneHelper>,
    /// Monotonically increasing version counter for cache invalidation
    version: u64,
}

impl SceneStore {
    /// Store pre-populated with the ground grid and axis indicator
    pub fn with_helpers(helpers: impl IntoIterator<Item = SceneHelper>) -> Self {
        Self {
            helpers: helpers.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Current version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of spawned objects (helpers excluded)
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn helpers(&self) -> &[SceneHelper] {
        &self.helpers
    }

    pub fn get(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Mutable access; only a hit counts as a mutation
    pub fn get_mut(&mut self, id: &str) -> Option<&mut SceneObject> {
        let object = self.objects.iter_mut().find(|o| o.id == id)?;
        self.version += 1;
        Some(object)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Register an object and return its id.
    /// An object with the same id is replaced in place.
    pub fn add(&mut self, object: SceneObject) -> ObjectId {
        let id = object.id.clone();
        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(existing) => *existing = object,
            None => self.objects.push(object),
        }
        self.version += 1;
        id
    }

    /// Remove an object by ID
    pub fn remove(&mut self, id: &str) -> Option<SceneObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        self.version += 1;
        Some(self.objects.remove(index))
    }

    /// Everything a ray may hit: objects first, then helpers
    pub fn pick_candidates(&self) -> Vec<PickCandidate<'_>> {
        self.objects
            .iter()
            .map(PickCandidate::Object)
            .chain(self.helpers.iter().map(PickCandidate::Helper))
            .collect()
    }

    /// Apply a gizmo drag amount along one axis
    pub fn apply_transform_delta(
        &mut self,
        id: &str,
        mode: TransformMode,
        axis: GizmoAxis,
        amount: f32,
    ) -> bool {
        let Some(object) = self.get_mut(id) else {
            return false;
        };
        let i = axis.index();
        let t = &mut object.transform;
        match mode {
            TransformMode::Translate => t.position[i] += amount,
            TransformMode::Rotate => t.rotation[i] += amount,
            TransformMode::Scale => t.scale[i] = (t.scale[i] + amount).max(MIN_SCALE),
        }
        true
    }

    /// World position of an object (gizmo center)
    pub fn position_of(&self, id: &str) -> Option<Vec3> {
        self.get(id).map(|o| Vec3::from(o.transform.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::object_at;
    use shared::ShapeKind;

    #[test]
    fn test_add_and_remove() {
        let mut store = SceneStore::default();
        let id = store.add(object_at("a", ShapeKind::Cube, [0.0; 3]));
        assert_eq!(id, "a");
        assert_eq!(store.len(), 1);
        assert!(store.contains("a"));

        let removed = store.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(store.is_empty());
        assert!(store.remove("a").is_none());
    }

    #[test]
    fn test_version_bumps_on_mutation() {
        let mut store = SceneStore::default();
        let v0 = store.version();
        store.add(object_at("a", ShapeKind::Cube, [0.0; 3]));
        assert!(store.version() > v0);
        let v1 = store.version();
        store.remove("missing");
        assert_eq!(store.version(), v1);
    }

    #[test]
    fn test_helpers_not_counted() {
        let store = SceneStore::with_helpers([
            SceneHelper::Grid { size: 10.0, divisions: 10 },
            SceneHelper::Axes { length: 5.0 },
        ]);
        assert_eq!(store.len(), 0);
        assert_eq!(store.helpers().len(), 2);
        assert_eq!(store.pick_candidates().len(), 2);
    }

    #[test]
    fn test_apply_transform_delta() {
        let mut store = SceneStore::default();
        store.add(object_at("a", ShapeKind::Cube, [1.0, 0.0, 0.0]));

        assert!(store.apply_transform_delta("a", TransformMode::Translate, GizmoAxis::Y, 2.0));
        assert!(store.apply_transform_delta("a", TransformMode::Rotate, GizmoAxis::Z, 0.5));
        assert!(store.apply_transform_delta("a", TransformMode::Scale, GizmoAxis::X, -5.0));

        let t = &store.get("a").unwrap().transform;
        assert_eq!(t.position, [1.0, 2.0, 0.0]);
        assert_eq!(t.rotation, [0.0, 0.0, 0.5]);
        assert_eq!(t.scale, [MIN_SCALE, 1.0, 1.0]);

        assert!(!store.apply_transform_delta("b", TransformMode::Translate, GizmoAxis::X, 1.0));
    }

    #[test]
    fn test_get_mut_miss_keeps_version() {
        let mut store = SceneStore::default();
        store.add(object_at("a", ShapeKind::Cube, [0.0; 3]));
        let v = store.version();

        assert!(store.get_mut("missing").is_none());
        assert!(!store.apply_transform_delta("missing", TransformMode::Translate, GizmoAxis::X, 1.0));
        assert_eq!(store.version(), v);

        assert!(store.get_mut("a").is_some());
        assert!(store.version() > v);
    }

    #[test]
    fn test_add_existing_id_replaces() {
        let mut store = SceneStore::default();
        store.add(object_at("a", ShapeKind::Cube, [0.0; 3]));
        store.add(object_at("b", ShapeKind::Cube, [2.0, 0.0, 0.0]));
        store.add(object_at("a", ShapeKind::Sphere, [5.0, 0.0, 0.0]));

        assert_eq!(store.len(), 2);
        assert_eq!(store.objects()[0].id, "a");
        assert_eq!(store.get("a").unwrap().kind, ShapeKind::Sphere);
        assert!(store.remove("a").is_some());
        assert!(!store.contains("a"));
    }
}
