//! A small fixed scene with known screen positions.

use glam::{Vec2, Vec3};
use portfolio_camera::Camera;
use portfolio_scene::{tetrahedron, ObjectId, Scene, Shape, Transform};

/// Viewport every stage is laid out for, in pixels.
pub const STAGE_VIEWPORT: (u32, u32) = (800, 600);

/// Camera at the origin looking down -Z at a row of named objects:
///
/// - `Tetra` (tetrahedron) on the left, `gitcube` in the middle, `SocialOcto` on the
///   right, all ten units away.
/// - an unnamed star above `gitcube`.
/// - `near` directly in front of `far`, below `gitcube`.
///
/// The top-left corner of the viewport sees nothing.
#[derive(Debug)]
pub struct Stage {
    /// The scene.
    pub scene: Scene,
    /// The camera, aspect matched to [`STAGE_VIEWPORT`].
    pub camera: Camera,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    /// Build the fixture.
    pub fn new() -> Self {
        let mut scene = Scene::new();
        scene.spawn(
            "Tetra",
            Transform::at(Vec3::new(-3.0, 0.0, -10.0)),
            Some(Shape::mesh(tetrahedron(1.0))),
        );
        scene.spawn("gitcube", Transform::at(Vec3::new(0.0, 0.0, -10.0)), Some(Shape::cube(1.0)));
        scene.spawn("SocialOcto", Transform::at(Vec3::new(3.0, 0.0, -10.0)), Some(Shape::cube(1.0)));
        scene.spawn("", Transform::at(Vec3::new(0.0, 3.0, -10.0)), Some(Shape::sphere(0.5)));
        scene.spawn("near", Transform::at(Vec3::new(0.0, -3.0, -8.0)), Some(Shape::cube(1.0)));
        scene.spawn("far", Transform::at(Vec3::new(0.0, -3.0, -12.0)), Some(Shape::cube(4.0)));

        let mut camera = Camera::default();
        camera.set_aspect(STAGE_VIEWPORT.0, STAGE_VIEWPORT.1);
        Self { scene, camera }
    }

    /// Handle of the first object called `name`.
    ///
    /// Panics if the fixture has no such object.
    pub fn id(&self, name: &str) -> ObjectId {
        self.scene
            .find_by_name(name)
            .unwrap_or_else(|| panic!("stage has no object named '{name}'"))
    }

    /// Pixel position of an object's centre.
    pub fn pixel_of(&self, name: &str) -> (f32, f32) {
        let id = self.id(name);
        let centre = self
            .scene
            .world_matrix(id)
            .map(|m| m.transform_point3(Vec3::ZERO))
            .unwrap_or(Vec3::ZERO);
        let ndc = self.camera.view_projection_matrix().project_point3(centre);
        ndc_to_pixel(Vec2::new(ndc.x, ndc.y))
    }

    /// Pixel position that sees no object.
    pub fn empty_pixel(&self) -> (f32, f32) {
        (1.0, 1.0)
    }
}

fn ndc_to_pixel(ndc: Vec2) -> (f32, f32) {
    let (w, h) = STAGE_VIEWPORT;
    ((ndc.x + 1.0) * 0.5 * w as f32, (1.0 - ndc.y) * 0.5 * h as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_scene::Viewpoint;

    fn ray_at(stage: &Stage, (x, y): (f32, f32)) -> Vec<ObjectId> {
        let (w, h) = STAGE_VIEWPORT;
        let ndc = Vec2::new(x / w as f32 * 2.0 - 1.0, -(y / h as f32) * 2.0 + 1.0);
        stage
            .scene
            .intersect(&stage.camera.ray_through(ndc))
            .into_iter()
            .map(|hit| hit.object)
            .collect()
    }

    #[test]
    fn named_objects_are_under_their_pixels() {
        let stage = Stage::new();
        for name in ["Tetra", "gitcube", "SocialOcto"] {
            let hits = ray_at(&stage, stage.pixel_of(name));
            assert_eq!(hits.first(), Some(&stage.id(name)), "{name}");
        }
    }

    #[test]
    fn near_occludes_far() {
        let stage = Stage::new();
        let hits = ray_at(&stage, stage.pixel_of("near"));
        assert_eq!(hits, vec![stage.id("near"), stage.id("far")]);
    }

    #[test]
    fn empty_pixel_sees_nothing() {
        let stage = Stage::new();
        assert!(ray_at(&stage, stage.empty_pixel()).is_empty());
    }
}
