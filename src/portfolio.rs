//! The portfolio page: its scene, the per-frame animation and the link routers.

use crate::actions::{Action, ActionQueue};
use crate::config::{PortfolioConfig, SceneConfig};
use glam::{Vec2, Vec3};
use portfolio_camera::Camera;
use portfolio_interaction::{Dispatch, EventKind, InteractionRouter, PointerSource, Viewport};
use portfolio_scene::{tetrahedron, torus_knot, ObjectId, Scene, SceneObject, Shape, Transform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

pub const TETRA: &str = "Tetra";
pub const SOCIAL_OCTO: &str = "SocialOcto";
pub const GITCUBE: &str = "gitcube";
pub const TORUS_KNOT: &str = "THX_T";

/// Handles of the objects the animation turns every frame.
#[derive(Debug, Clone, Copy)]
struct Spinners {
    tetra: ObjectId,
    social_octo: ObjectId,
    gitcube: ObjectId,
}

/// One handler call, attributed to the router that made it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedDispatch {
    /// Position of the router in [`Portfolio::routers`].
    pub router: usize,
    /// Category and object of the call.
    pub dispatch: Dispatch,
    /// Name of the object the handler received.
    pub name: String,
}

/// What a single frame did.
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    pub frame: u64,
    pub dispatches: Vec<RoutedDispatch>,
    pub actions: Vec<Action>,
}

pub struct Portfolio {
    pub scene: Scene,
    pub camera: Camera,
    routers: Vec<InteractionRouter>,
    spinners: Spinners,
    actions: ActionQueue,
    viewport: Viewport,
    scroll_top: f32,
    page_length: f32,
    frame: u64,
}

impl Portfolio {
    /// Build the page and subscribe its routers to `source`.
    pub fn new(config: &PortfolioConfig, source: &PointerSource) -> Self {
        let (scene, spinners) = build_scene(&config.scene);
        let viewport = Viewport::new(config.scene.viewport_width, config.scene.viewport_height);
        let mut camera = Camera::default();
        camera.set_aspect(viewport.width, viewport.height);

        let actions = ActionQueue::new();
        let routers = wire_routers(config, source, &actions);
        info!(
            objects = scene.len(),
            routers = routers.len(),
            "portfolio scene ready"
        );

        Self {
            scene,
            camera,
            routers,
            spinners,
            actions,
            viewport,
            scroll_top: 0.0,
            page_length: config.scene.page_length.max(0.0),
            frame: 0,
        }
    }

    /// The page's routers in resolve order.
    pub fn routers(&self) -> &[InteractionRouter] {
        &self.routers
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Current document top relative to the viewport, zero or negative.
    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_aspect(width, height);
    }

    /// Scroll the page so its top sits at `top` and move the camera with it.
    pub fn scroll_to(&mut self, top: f32) {
        self.scroll_top = top.clamp(-self.page_length, 0.0);
        self.camera.follow_scroll(self.scroll_top);
        debug!(top = self.scroll_top, camera = ?self.camera.position, "scrolled");
    }

    /// Scroll by a wheel delta in pixels; positive moves back towards the top.
    pub fn scroll_by(&mut self, pixels: f32) {
        self.scroll_to(self.scroll_top + pixels);
    }

    /// Pixel position of the centre of the first object called `name`.
    pub fn pixel_of(&self, name: &str) -> Option<(f32, f32)> {
        let id = self.scene.find_by_name(name)?;
        let centre = self.scene.world_matrix(id)?.transform_point3(Vec3::ZERO);
        let ndc = self.camera.view_projection_matrix().project_point3(centre);
        if ndc.z.abs() > 1.0 {
            return None;
        }
        let ndc = Vec2::new(ndc.x, ndc.y);
        Some((
            (ndc.x + 1.0) * 0.5 * self.viewport.width as f32,
            (1.0 - ndc.y) * 0.5 * self.viewport.height as f32,
        ))
    }

    /// Resolve every router, then advance the animation by one step.
    pub fn frame(&mut self) -> FrameOutcome {
        let mut dispatches = Vec::new();
        for (index, router) in self.routers.iter_mut().enumerate() {
            for dispatch in router.resolve(&self.scene, &self.camera) {
                let name = self
                    .scene
                    .get(dispatch.object)
                    .map(|obj| obj.name.clone())
                    .unwrap_or_default();
                dispatches.push(RoutedDispatch {
                    router: index,
                    dispatch,
                    name,
                });
            }
        }

        self.animate();
        self.frame += 1;
        FrameOutcome {
            frame: self.frame,
            dispatches,
            actions: self.actions.drain(),
        }
    }

    fn animate(&mut self) {
        let Spinners {
            tetra,
            social_octo,
            gitcube,
        } = self.spinners;
        if let Some(obj) = self.scene.get_mut(tetra) {
            obj.transform.rotation.x += 0.02;
            obj.transform.rotation.y += 0.02;
        }
        if let Some(obj) = self.scene.get_mut(gitcube) {
            obj.transform.rotation.y += 0.01;
        }
        if let Some(obj) = self.scene.get_mut(social_octo) {
            obj.transform.rotation.z += 0.01;
            obj.transform.rotation.x += 0.01;
        }
    }
}

fn build_scene(config: &SceneConfig) -> (Scene, Spinners) {
    let mut scene = Scene::new();

    // Blue and red point lights around the tetrahedron.
    for (position, color) in [
        (Vec3::new(20.0, 5.0, -15.0), 0x0366fc),
        (Vec3::new(1.0, -10.0, -25.0), 0xfc0b03),
    ] {
        let light = scene.spawn("", Transform::at(position), None);
        if let Some(obj) = scene.get_mut(light) {
            obj.color = Some(color);
        }
    }

    let tetra = scene.spawn(
        TETRA,
        Transform::at(Vec3::new(15.0, 0.0, -20.0)),
        Some(Shape::mesh(tetrahedron(5.0))),
    );
    let social_octo = scene.spawn(
        SOCIAL_OCTO,
        Transform::at(Vec3::new(-10.0, -6.0, 1.0)),
        Some(Shape::cube(1.0)),
    );
    let gitcube = scene.spawn(
        GITCUBE,
        Transform::at(Vec3::new(-24.0, -23.0, 20.0)),
        Some(Shape::cube(1.0)),
    );
    let knot = scene.spawn(
        TORUS_KNOT,
        Transform::at(Vec3::new(-20.0, -40.0, 10.0)),
        Some(Shape::mesh(torus_knot(10.0, 3.0, 100, 16, 2, 3))),
    );
    if let Some(obj) = scene.get_mut(knot) {
        obj.color = Some(0xdb2342);
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let half = config.star_spread.abs() / 2.0;
    for _ in 0..config.star_count {
        let position = if half > 0.0 {
            Vec3::new(
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            )
        } else {
            Vec3::ZERO
        };
        let star = scene.spawn("", Transform::at(position), Some(Shape::sphere(0.25)));
        if let Some(obj) = scene.get_mut(star) {
            obj.color = Some(rng.gen_range(0..0x100_0000));
        }
    }

    (
        scene,
        Spinners {
            tetra,
            social_octo,
            gitcube,
        },
    )
}

fn wire_routers(
    config: &PortfolioConfig,
    source: &PointerSource,
    actions: &ActionQueue,
) -> Vec<InteractionRouter> {
    let open_link = |url: &str| {
        let queue = actions.clone();
        let url = url.to_string();
        move |obj: &SceneObject| {
            info!("{} clicked!", obj.name);
            queue.push(Action::OpenUrl { url: url.clone() });
        }
    };

    let mut github = InteractionRouter::with_config(source, &config.interaction);
    github.add_handler(GITCUBE, EventKind::Click, open_link(&config.links.github));

    // The sound handler shares the LinkedIn router; the third router stays empty.
    let mut social = InteractionRouter::with_config(source, &config.interaction);
    social.add_handler(SOCIAL_OCTO, EventKind::Click, open_link(&config.links.linkedin));
    let queue = actions.clone();
    let sound = config.links.sound.clone();
    social.add_handler(TETRA, EventKind::Click, move |obj: &SceneObject| {
        info!("{} clicked!", obj.name);
        queue.push(Action::PlaySound {
            path: sound.clone(),
        });
    });

    let tetra = InteractionRouter::with_config(source, &config.interaction);

    vec![github, social, tetra]
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_interaction::RawPointerEvent;

    fn quiet_config() -> PortfolioConfig {
        let mut cfg = PortfolioConfig::default();
        cfg.scene.star_count = 0;
        cfg
    }

    #[test]
    fn scene_holds_landmarks_lights_and_stars() {
        let mut cfg = PortfolioConfig::default();
        cfg.scene.star_count = 25;
        cfg.scene.seed = Some(3);
        let page = Portfolio::new(&cfg, &PointerSource::new());

        for name in [TETRA, SOCIAL_OCTO, GITCUBE, TORUS_KNOT] {
            assert!(page.scene.find_by_name(name).is_some(), "{name}");
        }
        assert_eq!(page.scene.len(), 4 + 2 + 25);
        let lights = page.scene.iter().filter(|o| !o.is_pickable()).count();
        assert_eq!(lights, 2);
        for star in page.scene.iter().filter(|o| o.name.is_empty() && o.is_pickable()) {
            assert!(star.transform.position.abs().max_element() <= 250.0);
            assert!(star.color.is_some_and(|c| c < 0x100_0000));
        }
    }

    #[test]
    fn seeded_starfields_repeat() {
        let mut cfg = PortfolioConfig::default();
        cfg.scene.star_count = 10;
        cfg.scene.seed = Some(11);
        let positions = |page: &Portfolio| -> Vec<Vec3> {
            page.scene.iter().map(|o| o.transform.position).collect()
        };
        let a = Portfolio::new(&cfg, &PointerSource::new());
        let b = Portfolio::new(&cfg, &PointerSource::new());
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn frames_spin_the_landmarks() {
        let mut page = Portfolio::new(&quiet_config(), &PointerSource::new());
        for _ in 0..10 {
            page.frame();
        }
        let rotation = |name| {
            let id = page.scene.find_by_name(name).unwrap();
            page.scene.get(id).unwrap().transform.rotation
        };
        assert!((rotation(TETRA) - Vec3::new(0.2, 0.2, 0.0)).length() < 1e-4);
        assert!((rotation(GITCUBE) - Vec3::new(0.0, 0.1, 0.0)).length() < 1e-4);
        assert!((rotation(SOCIAL_OCTO) - Vec3::new(0.1, 0.0, 0.1)).length() < 1e-4);
        assert_eq!(rotation(TORUS_KNOT), Vec3::ZERO);
        assert_eq!(page.frame_count(), 10);
    }

    #[test]
    fn scrolling_moves_the_camera_within_the_page() {
        let mut page = Portfolio::new(&quiet_config(), &PointerSource::new());
        page.scroll_to(-500.0);
        assert!((page.camera.position - Vec3::new(-5.0, -5.0, 5.0)).length() < 1e-4);

        page.scroll_by(1000.0);
        assert_eq!(page.scroll_top(), 0.0);
        page.scroll_to(-1.0e9);
        assert_eq!(page.scroll_top(), -4000.0);
    }

    #[test]
    fn clicking_tetra_queues_the_sound_on_the_second_router() {
        let source = PointerSource::new();
        let mut page = Portfolio::new(&quiet_config(), &source);
        let (x, y) = page.pixel_of(TETRA).unwrap();

        source.emit(&RawPointerEvent::Moved {
            x,
            y,
            viewport: page.viewport(),
        });
        source.emit(&RawPointerEvent::Clicked);
        let outcome = page.frame();

        assert_eq!(outcome.dispatches.len(), 1);
        assert_eq!(outcome.dispatches[0].router, 1);
        assert_eq!(outcome.dispatches[0].name, TETRA);
        assert_eq!(
            outcome.actions,
            vec![Action::PlaySound {
                path: "stonk sound effect.mp3".into()
            }]
        );
    }

    #[test]
    fn routers_are_wired_like_the_page() {
        let page = Portfolio::new(&quiet_config(), &PointerSource::new());
        let routers = page.routers();
        assert_eq!(routers.len(), 3);
        assert_eq!(routers[0].handlers().len(EventKind::Click), 1);
        assert!(routers[0].handlers().contains(EventKind::Click, GITCUBE));
        assert_eq!(routers[1].handlers().len(EventKind::Click), 2);
        assert!(routers[1].handlers().contains(EventKind::Click, SOCIAL_OCTO));
        assert!(routers[1].handlers().contains(EventKind::Click, TETRA));
        assert!(routers[2].handlers().is_empty());
    }

    #[test]
    fn objects_behind_the_camera_have_no_pixel() {
        let page = Portfolio::new(&quiet_config(), &PointerSource::new());
        // gitcube sits at z = 20, behind a camera looking down -Z from the origin.
        assert_eq!(page.pixel_of(GITCUBE), None);
        assert_eq!(page.pixel_of("nobody"), None);
    }
}
