//! Property-based tests for scene ray casting
//!
//! - Hits come back nearest first
//! - A ray aimed at a cube's centre always hits it, whatever its rotation
//! - Removed objects never show up in hits

use glam::Vec3;
use portfolio_scene::{Ray, Scene, Shape, Transform};
use proptest::prelude::*;

fn position() -> impl Strategy<Value = Vec3> {
    (-40.0f32..40.0, -40.0f32..40.0, -80.0f32..-5.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn rotation() -> impl Strategy<Value = Vec3> {
    (0.0f32..6.3, 0.0f32..6.3, 0.0f32..6.3).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

proptest! {
    /// Property: intersections are sorted by distance
    ///
    /// However the cubes are scattered, a cast returns its hits in non-decreasing
    /// distance order.
    #[test]
    fn hits_are_nearest_first(
        cubes in prop::collection::vec((position(), 0.5f32..6.0), 1..16),
        aim in position(),
    ) {
        let mut scene = Scene::new();
        for (i, (at, size)) in cubes.iter().enumerate() {
            scene.spawn(format!("cube{i}"), Transform::at(*at), Some(Shape::cube(*size)));
        }

        let hits = scene.intersect(&Ray::new(Vec3::ZERO, aim));
        for pair in hits.windows(2) {
            prop_assert!(pair[0].distance <= pair[1].distance);
        }
    }

    /// Property: a rotated cube is hit through its centre
    ///
    /// The reported distance is never beyond the centre, and never closer than the
    /// centre minus half the cube's diagonal.
    #[test]
    fn rotated_cube_is_hit_through_its_centre(at in position(), rot in rotation(), size in 0.5f32..4.0) {
        let mut scene = Scene::new();
        let id = scene.spawn("cube", Transform::at(at).with_rotation(rot), Some(Shape::cube(size)));

        let hits = scene.intersect(&Ray::new(Vec3::ZERO, at));
        prop_assert_eq!(hits.len(), 1);
        prop_assert_eq!(hits[0].object, id);

        let centre = at.length();
        let half_diagonal = size * 3f32.sqrt() / 2.0;
        prop_assert!(hits[0].distance <= centre + 1e-3);
        prop_assert!(hits[0].distance >= centre - half_diagonal - 1e-3);
    }

    /// Property: removal hides an object from casts
    #[test]
    fn removed_objects_are_never_hit(at in position(), remove_first in any::<bool>()) {
        let mut scene = Scene::new();
        let first = scene.spawn("a", Transform::at(at), Some(Shape::sphere(1.0)));
        let second = scene.spawn("b", Transform::at(at * 1.5), Some(Shape::sphere(1.0)));
        let (gone, kept) = if remove_first { (first, second) } else { (second, first) };

        prop_assert!(scene.remove(gone).is_some());
        let hits = scene.intersect(&Ray::new(Vec3::ZERO, at));
        prop_assert!(hits.iter().all(|hit| hit.object != gone));
        prop_assert!(hits.iter().any(|hit| hit.object == kept));
    }
}
