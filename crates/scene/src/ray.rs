//! Rays, hits and the primitive slab test.

use crate::object::ObjectId;
use glam::{Mat4, Vec2, Vec3};

/// Half-line in world (or local) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Direction. World-space rays are normalised so that the ray parameter is a
    /// distance.
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalising `direction`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t`.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Map the ray into the space described by `inverse` without renormalising, so a
    /// parameter found in that space is the same parameter on the original ray.
    pub fn transformed(&self, inverse: &Mat4) -> Self {
        Self {
            origin: inverse.transform_point3(self.origin),
            direction: inverse.transform_vector3(self.direction),
        }
    }
}

/// One intersection between a ray and a scene object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Object that was hit.
    pub object: ObjectId,
    /// Distance from the ray origin.
    pub distance: f32,
    /// World-space hit point.
    pub point: Vec3,
}

/// Something that can turn a normalised device coordinate into a world-space ray.
pub trait Viewpoint {
    /// Ray from the eye through `ndc` (each axis in [-1, 1], +Y up).
    fn ray_through(&self, ndc: Vec2) -> Ray;
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the box.
    pub min: Vec3,
    /// Maximum corner of the box.
    pub max: Vec3,
}

impl Aabb {
    /// Create an AABB from min and max corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from center position and size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// Smallest box containing every point, or `None` for an empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |aabb, p| {
            Self::new(aabb.min.min(p), aabb.max.max(p))
        }))
    }

    /// Parameter of the first intersection with `ray`, if any.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = ray.direction.recip();

        let t1 = (self.min - ray.origin) * inv_dir;
        let t2 = (self.max - ray.origin) * inv_dir;

        let tmin = t1.min(t2).max_element();
        let tmax = t1.max(t2).min_element();

        // Entire box behind the origin
        if tmax < 0.0 {
            return None;
        }

        if tmin > tmax {
            return None;
        }

        // Origin inside the box
        let t = if tmin < 0.0 { tmax } else { tmin };

        Some(t)
    }
}
