//! Generational scene graph with recursive ray casting.

use crate::object::{ObjectId, SceneObject, Transform};
use crate::ray::{Ray, RayHit};
use crate::shape::Shape;
use glam::Mat4;
use thiserror::Error;
use tracing::debug;

/// Errors raised by structural scene edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    /// The handle no longer refers to a live object.
    #[error("object {0} is not part of the scene")]
    StaleObject(ObjectId),
}

/// Source of pickable objects for interaction routing.
pub trait SceneProvider {
    /// Every intersection of `ray` with the scene, nearest first.
    fn intersect(&self, ray: &Ray) -> Vec<RayHit>;

    /// Resolve a handle, or `None` once the object is gone.
    fn object(&self, id: ObjectId) -> Option<&SceneObject>;
}

#[derive(Debug)]
struct Node {
    object: SceneObject,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owner of every object in the scene.
#[derive(Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    roots: Vec<ObjectId>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level object.
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        shape: Option<Shape>,
    ) -> ObjectId {
        let id = self.insert(name.into(), transform, shape, None);
        self.roots.push(id);
        id
    }

    /// Add an object under `parent`; its transform is relative to the parent.
    pub fn spawn_child(
        &mut self,
        parent: ObjectId,
        name: impl Into<String>,
        transform: Transform,
        shape: Option<Shape>,
    ) -> Result<ObjectId, SceneError> {
        if self.node(parent).is_none() {
            return Err(SceneError::StaleObject(parent));
        }
        let id = self.insert(name.into(), transform, shape, Some(parent));
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        Ok(id)
    }

    /// Remove an object and its whole subtree. Returns the removed object itself.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let node = self.take(id)?;
        match node.parent {
            Some(parent) => {
                if let Some(parent) = self.node_mut(parent) {
                    parent.children.retain(|child| *child != id);
                }
            }
            None => self.roots.retain(|root| *root != id),
        }

        let mut pending = node.children;
        while let Some(child) = pending.pop() {
            if let Some(removed) = self.take(child) {
                pending.extend(removed.children);
            }
        }
        debug!(object = %id, name = %node.object.name, "removed object");
        Some(node.object)
    }

    /// Borrow a live object.
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.node(id).map(|node| &node.object)
    }

    /// Mutably borrow a live object.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.node_mut(id).map(|node| &mut node.object)
    }

    /// First live object with the given name, in slot order.
    pub fn find_by_name(&self, name: &str) -> Option<ObjectId> {
        self.iter().find(|obj| obj.name == name).map(|obj| obj.id)
    }

    /// Top-level objects in insertion order.
    pub fn roots(&self) -> &[ObjectId] {
        &self.roots
    }

    /// Direct children of an object.
    pub fn children(&self, id: ObjectId) -> &[ObjectId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of an object, if it has one.
    pub fn parent(&self, id: ObjectId) -> Option<ObjectId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Every live object in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.slots
            .iter()
            .filter_map(|slot| slot.node.as_ref().map(|node| &node.object))
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Local-to-world matrix of an object.
    pub fn world_matrix(&self, id: ObjectId) -> Option<Mat4> {
        let node = self.node(id)?;
        let local = node.object.transform.matrix();
        match node.parent {
            Some(parent) => Some(self.world_matrix(parent)? * local),
            None => Some(local),
        }
    }

    /// Every intersection of `ray` with the scene, nearest first.
    ///
    /// The whole graph is traversed from the roots, so children of shape-less groups
    /// are still tested.
    pub fn intersect(&self, ray: &Ray) -> Vec<RayHit> {
        let mut hits = Vec::new();
        let mut stack: Vec<(ObjectId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|root| (*root, Mat4::IDENTITY))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            let world = parent_world * node.object.transform.matrix();

            if let Some(shape) = &node.object.shape {
                let local = ray.transformed(&world.inverse());
                if let Some(t) = shape.ray_intersection(&local) {
                    hits.push(RayHit {
                        object: id,
                        distance: t,
                        point: ray.at(t),
                    });
                }
            }

            stack.extend(node.children.iter().rev().map(|child| (*child, world)));
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn insert(
        &mut self,
        name: String,
        transform: Transform,
        shape: Option<Shape>,
        parent: Option<ObjectId>,
    ) -> ObjectId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = ObjectId {
            index,
            generation: slot.generation,
        };
        slot.node = Some(Node {
            object: SceneObject {
                id,
                name,
                transform,
                shape,
                color: None,
            },
            parent,
            children: Vec::new(),
        });
        id
    }

    fn take(&mut self, id: ObjectId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    fn node(&self, id: ObjectId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, id: ObjectId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }
}

impl SceneProvider for Scene {
    fn intersect(&self, ray: &Ray) -> Vec<RayHit> {
        Scene::intersect(self, ray)
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn cube_at(scene: &mut Scene, name: &str, z: f32) -> ObjectId {
        scene.spawn(name, Transform::at(Vec3::new(0.0, 0.0, z)), Some(Shape::cube(1.0)))
    }

    #[test]
    fn hits_are_sorted_nearest_first() {
        let mut scene = Scene::new();
        let far = cube_at(&mut scene, "far", -10.0);
        let near = cube_at(&mut scene, "near", -5.0);

        let hits = scene.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].object, near);
        assert_eq!(hits[1].object, far);
        assert!((hits[0].distance - 4.5).abs() < 1e-4);
    }

    #[test]
    fn children_are_hit_through_parent_transform() {
        let mut scene = Scene::new();
        let group = scene.spawn("group", Transform::at(Vec3::new(0.0, 0.0, -10.0)), None);
        let child = scene
            .spawn_child(group, "child", Transform::at(Vec3::new(3.0, 0.0, 0.0)), Some(Shape::cube(1.0)))
            .unwrap();

        let hits = scene.intersect(&Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::NEG_Z));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].object, child);
        assert!((hits[0].point.z + 9.5).abs() < 1e-4);
    }

    #[test]
    fn rotated_cube_is_hit_on_its_corner() {
        let mut scene = Scene::new();
        let cube = scene.spawn(
            "cube",
            Transform::at(Vec3::new(0.0, 0.0, -5.0))
                .with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_4, 0.0)),
            Some(Shape::cube(1.0)),
        );
        let hits = scene.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert_eq!(hits[0].object, cube);
        // The corner sits sqrt(0.5) in front of the centre.
        assert!((hits[0].distance - (5.0 - 0.5f32.sqrt())).abs() < 1e-3);
    }

    #[test]
    fn removed_handles_go_stale() {
        let mut scene = Scene::new();
        let a = cube_at(&mut scene, "a", -5.0);
        let removed = scene.remove(a).unwrap();
        assert_eq!(removed.name, "a");
        assert!(scene.get(a).is_none());
        assert!(scene.remove(a).is_none());

        // Slot is recycled with a new generation.
        let b = cube_at(&mut scene, "b", -5.0);
        assert_eq!(b.index(), a.index());
        assert_ne!(b, a);
        assert!(scene.get(a).is_none());
        assert_eq!(scene.get(b).map(|o| o.name()), Some("b"));
    }

    #[test]
    fn removing_parent_removes_subtree() {
        let mut scene = Scene::new();
        let group = scene.spawn("group", Transform::default(), None);
        let child = scene.spawn_child(group, "child", Transform::default(), None).unwrap();
        let grandchild = scene
            .spawn_child(child, "grandchild", Transform::default(), None)
            .unwrap();

        scene.remove(group);
        assert!(scene.get(child).is_none());
        assert!(scene.get(grandchild).is_none());
        assert!(scene.is_empty());
        assert_eq!(scene.len(), 0);
    }

    #[test]
    fn spawn_child_of_stale_parent_fails() {
        let mut scene = Scene::new();
        let group = scene.spawn("group", Transform::default(), None);
        scene.remove(group);
        let err = scene
            .spawn_child(group, "orphan", Transform::default(), None)
            .unwrap_err();
        assert_eq!(err, SceneError::StaleObject(group));
    }

    #[test]
    fn find_by_name_and_world_matrix() {
        let mut scene = Scene::new();
        let group = scene.spawn("group", Transform::at(Vec3::X), None);
        let child = scene
            .spawn_child(group, "Tetra", Transform::at(Vec3::Y), None)
            .unwrap();

        assert_eq!(scene.find_by_name("Tetra"), Some(child));
        assert_eq!(scene.parent(child), Some(group));
        assert_eq!(scene.children(group), &[child]);
        let world = scene.world_matrix(child).unwrap();
        assert!((world.transform_point3(Vec3::ZERO) - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }
}
