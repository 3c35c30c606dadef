#![warn(missing_docs)]
//! Scene graph and ray casting for the portfolio scene.
//!
//! Objects live in a generational slot table owned by [`Scene`]. Anything outside the
//! scene (routers, handlers) refers to them through [`ObjectId`] handles, which stop
//! resolving once the object is removed.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use portfolio_scene::{Ray, Scene, Shape, Transform};
//!
//! let mut scene = Scene::new();
//! scene.spawn("gitcube", Transform::at(Vec3::new(0.0, 0.0, -5.0)), Some(Shape::cube(1.0)));
//!
//! let hits = scene.intersect(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));
//! assert_eq!(hits.len(), 1);
//! ```

mod graph;
mod object;
mod ray;
mod shape;

pub use graph::{Scene, SceneError, SceneProvider};
pub use object::{ObjectId, SceneObject, Transform};
pub use ray::{Aabb, Ray, RayHit, Viewpoint};
pub use shape::{tetrahedron, torus_knot, Shape, Triangle};
