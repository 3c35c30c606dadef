//! Scene objects and their handles.

use crate::shape::Shape;
use glam::{EulerRot, Mat4, Quat, Vec3};
use std::fmt;

/// Generational handle to an object owned by a [`crate::Scene`].
///
/// Handles are plain identities: copying one never keeps the object alive, and a
/// handle whose object was removed no longer resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl ObjectId {
    /// Slot index inside the owning scene.
    pub fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Local transform of an object relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation.
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Identity transform translated to `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder: set the Euler rotation.
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder: set the scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion.
    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Local-to-parent matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// A named node of the scene graph.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub(crate) id: ObjectId,
    /// Human-readable name used to route interaction handlers. Empty for anonymous
    /// objects such as stars.
    pub name: String,
    /// Transform relative to the parent (or the world for roots).
    pub transform: Transform,
    /// Pickable geometry in local space. Groups and lights have none.
    pub shape: Option<Shape>,
    /// Base colour as `0xRRGGBB`, if any.
    pub color: Option<u32>,
}

impl SceneObject {
    /// Handle of this object.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Name of this object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether rays can hit this object.
    pub fn is_pickable(&self) -> bool {
        self.shape.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transform_is_identity() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_matrix_translates() {
        let t = Transform::at(Vec3::new(1.0, 2.0, 3.0)).with_scale(Vec3::splat(2.0));
        let p = t.matrix().transform_point3(Vec3::ONE);
        assert!((p - Vec3::new(3.0, 4.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn object_id_display() {
        let id = ObjectId {
            index: 4,
            generation: 2,
        };
        assert_eq!(id.to_string(), "4v2");
    }
}
