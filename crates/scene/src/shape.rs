//! Pickable geometry and the builders for the portfolio meshes.

use crate::ray::{Aabb, Ray};
use glam::Vec3;
use std::f32::consts::TAU;
use std::sync::Arc;

const EPSILON: f32 = 1e-7;

/// Triangle in local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First corner.
    pub a: Vec3,
    /// Second corner.
    pub b: Vec3,
    /// Third corner.
    pub c: Vec3,
}

impl Triangle {
    /// Create a triangle from its corners.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Möller–Trumbore test. Both faces are hit.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<f32> {
        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;
        let h = ray.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.a;
        let u = inv_det * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = inv_det * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(q);
        (t >= 0.0).then_some(t)
    }
}

/// Local-space geometry a ray can hit.
#[derive(Debug, Clone)]
pub enum Shape {
    /// Box centred on the origin.
    Cuboid {
        /// Edge lengths.
        size: Vec3,
    },
    /// Sphere centred on the origin.
    Sphere {
        /// Radius.
        radius: f32,
    },
    /// Arbitrary triangle soup.
    Mesh {
        /// Triangles, shared between clones.
        triangles: Arc<[Triangle]>,
        /// Bounds used to reject rays before the per-triangle test.
        bounds: Aabb,
    },
}

impl Shape {
    /// Cube with edge length `size`.
    pub fn cube(size: f32) -> Self {
        Shape::Cuboid {
            size: Vec3::splat(size),
        }
    }

    /// Sphere with the given radius.
    pub fn sphere(radius: f32) -> Self {
        Shape::Sphere { radius }
    }

    /// Triangle mesh; bounds are computed from the corners.
    pub fn mesh(triangles: Vec<Triangle>) -> Self {
        let bounds = Aabb::enclosing(triangles.iter().flat_map(|t| [t.a, t.b, t.c]))
            .unwrap_or(Aabb::new(Vec3::ZERO, Vec3::ZERO));
        Shape::Mesh {
            triangles: triangles.into(),
            bounds,
        }
    }

    /// Nearest non-negative ray parameter at which `ray` (in local space) meets the
    /// shape.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<f32> {
        match self {
            Shape::Cuboid { size } => Aabb::from_center_size(Vec3::ZERO, *size).ray_intersection(ray),
            Shape::Sphere { radius } => ray_sphere(ray, *radius),
            Shape::Mesh { triangles, bounds } => {
                bounds.ray_intersection(ray)?;
                triangles
                    .iter()
                    .filter_map(|tri| tri.ray_intersection(ray))
                    .min_by(f32::total_cmp)
            }
        }
    }
}

fn ray_sphere(ray: &Ray, radius: f32) -> Option<f32> {
    let a = ray.direction.length_squared();
    if a < EPSILON {
        return None;
    }
    let b = 2.0 * ray.origin.dot(ray.direction);
    let c = ray.origin.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }

    let root = disc.sqrt();
    let near = (-b - root) / (2.0 * a);
    let far = (-b + root) / (2.0 * a);
    if far < 0.0 {
        None
    } else if near < 0.0 {
        Some(far)
    } else {
        Some(near)
    }
}

/// Regular tetrahedron inscribed in a sphere of `radius`.
pub fn tetrahedron(radius: f32) -> Vec<Triangle> {
    let v = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ]
    .map(|p| p.normalize() * radius);

    [[2, 1, 0], [0, 3, 2], [1, 3, 0], [2, 3, 1]]
        .iter()
        .map(|&[a, b, c]| Triangle::new(v[a], v[b], v[c]))
        .collect()
}

/// (p, q) torus knot tube, swept along the knot curve.
pub fn torus_knot(
    radius: f32,
    tube: f32,
    tubular_segments: u32,
    radial_segments: u32,
    p: u32,
    q: u32,
) -> Vec<Triangle> {
    let (p, q) = (p as f32, q as f32);
    let ring = radial_segments as usize + 1;
    let mut vertices = Vec::with_capacity(ring * (tubular_segments as usize + 1));

    for j in 0..=tubular_segments {
        let u = j as f32 / tubular_segments as f32 * p * TAU;
        let p1 = knot_curve(u, p, q, radius);
        let p2 = knot_curve(u + 0.01, p, q, radius);

        let tangent = p2 - p1;
        let bitangent = tangent.cross(p2 + p1).normalize();
        let normal = bitangent.cross(tangent).normalize();

        for i in 0..=radial_segments {
            let v = i as f32 / radial_segments as f32 * TAU;
            let cx = -tube * v.cos();
            let cy = tube * v.sin();
            vertices.push(p1 + normal * cx + bitangent * cy);
        }
    }

    let mut triangles = Vec::with_capacity(2 * (tubular_segments * radial_segments) as usize);
    for j in 1..=tubular_segments as usize {
        for i in 1..=radial_segments as usize {
            let a = ring * (j - 1) + (i - 1);
            let b = ring * j + (i - 1);
            let c = ring * j + i;
            let d = ring * (j - 1) + i;
            triangles.push(Triangle::new(vertices[a], vertices[b], vertices[d]));
            triangles.push(Triangle::new(vertices[b], vertices[c], vertices[d]));
        }
    }
    triangles
}

fn knot_curve(u: f32, p: f32, q: f32, radius: f32) -> Vec3 {
    let qu_over_p = q / p * u;
    let cs = qu_over_p.cos();
    Vec3::new(
        radius * (2.0 + cs) * 0.5 * u.cos(),
        radius * (2.0 + cs) * u.sin() * 0.5,
        radius * qu_over_p.sin() * 0.5,
    )
}
