#![warn(missing_docs)]
//! Pointer-to-mesh interaction routing.
//!
//! An [`InteractionRouter`] listens to a [`PointerSource`], keeps only the latest raw
//! notification, and once per frame casts a ray through the pointer to synthesise
//! `click`, `dblclick`, `contextmenu`, `mousedown`, `mouseup`, `mouseenter` and
//! `mouseleave` events for named scene objects.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use portfolio_camera::Camera;
//! use portfolio_interaction::{EventKind, InteractionRouter, PointerSource, RawPointerEvent, Viewport};
//! use portfolio_scene::{Scene, Shape, Transform};
//!
//! let mut scene = Scene::new();
//! scene.spawn("gitcube", Transform::at(Vec3::new(0.0, 0.0, -5.0)), Some(Shape::cube(1.0)));
//! let camera = Camera::default();
//!
//! let source = PointerSource::new();
//! let mut router = InteractionRouter::new(&source);
//! router.add_handler("gitcube", EventKind::Click, |obj| println!("{} clicked", obj.name));
//!
//! source.emit(&RawPointerEvent::Moved { x: 400.0, y: 300.0, viewport: Viewport::new(800, 600) });
//! source.emit(&RawPointerEvent::Clicked);
//!
//! // In your frame loop:
//! let fired = router.resolve(&scene, &camera);
//! assert_eq!(fired.len(), 1);
//! ```

mod config;
mod event;
mod registry;
mod router;
mod source;

pub use config::{DuplicatePolicy, InteractionConfig};
pub use event::{EventKind, PointerKind, RawPointerEvent, UnknownEventKind, Viewport};
pub use registry::{Handler, HandlerTable};
pub use router::{Dispatch, InteractionRouter};
pub use source::{PendingPointer, PointerSource, Subscription};
