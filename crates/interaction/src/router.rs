//! Frame-driven resolution of buffered pointer input into mesh events.

use crate::config::InteractionConfig;
use crate::event::{EventKind, PointerKind, RawPointerEvent};
use crate::registry::HandlerTable;
use crate::source::{PendingPointer, PointerSource, Subscription};
use portfolio_scene::{ObjectId, SceneObject, SceneProvider, Viewpoint};
use std::str::FromStr;
use tracing::{debug, trace};

/// One handler invocation performed by [`InteractionRouter::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dispatch {
    /// Category that fired.
    pub kind: EventKind,
    /// Object passed to the handler.
    pub object: ObjectId,
}

/// Turns raw pointer notifications plus a scene ray cast into per-mesh events.
///
/// Raw notifications only fill a single-slot buffer; nothing is cast or dispatched
/// until the host calls [`InteractionRouter::resolve`], once per frame, on the
/// thread that owns the scene.
///
/// Hover and press memory are [`ObjectId`]s into the caller's scene. A remembered
/// object that has since been removed is treated as absent.
#[derive(Debug)]
pub struct InteractionRouter {
    subscription: Subscription,
    handlers: HandlerTable,
    last_hovered: Option<ObjectId>,
    last_pressed: Option<ObjectId>,
}

impl InteractionRouter {
    /// Subscribe a router to `source` with default configuration.
    pub fn new(source: &PointerSource) -> Self {
        Self::with_config(source, &InteractionConfig::default())
    }

    /// Subscribe a router to `source`. The subscription ends when the router drops.
    pub fn with_config(source: &PointerSource, config: &InteractionConfig) -> Self {
        Self::from_subscription(source.subscribe(), config)
    }

    /// A router fed only through [`InteractionRouter::notify`].
    pub fn detached(config: &InteractionConfig) -> Self {
        Self::from_subscription(Subscription::detached(), config)
    }

    fn from_subscription(subscription: Subscription, config: &InteractionConfig) -> Self {
        Self {
            subscription,
            handlers: HandlerTable::new(config.duplicate_policy),
            last_hovered: None,
            last_pressed: None,
        }
    }

    /// Register `handler` for `kind` events on objects named `mesh_name`.
    ///
    /// Returns `false` if the registration was refused.
    pub fn add_handler<F>(&mut self, mesh_name: &str, kind: EventKind, handler: F) -> bool
    where
        F: FnMut(&SceneObject) + 'static,
    {
        self.handlers.add(mesh_name, kind, Box::new(handler))
    }

    /// Register by DOM-style category name. Unknown names are dropped.
    pub fn add_handler_named<F>(&mut self, mesh_name: &str, kind: &str, handler: F) -> bool
    where
        F: FnMut(&SceneObject) + 'static,
    {
        match EventKind::from_str(kind) {
            Ok(kind) => self.add_handler(mesh_name, kind, handler),
            Err(err) => {
                debug!("{err}; registration for '{mesh_name}' dropped");
                false
            }
        }
    }

    /// Feed a raw notification directly, bypassing the pointer source.
    pub fn notify(&self, event: &RawPointerEvent) -> bool {
        self.subscription.record(event)
    }

    /// Resolve the buffered notification against `scene` as seen from `viewpoint`.
    ///
    /// Does nothing unless a notification arrived since the last call. The buffer is
    /// emptied before any handler runs, so notifications emitted by handlers are kept
    /// for the next frame.
    pub fn resolve<S, V>(&mut self, scene: &S, viewpoint: &V) -> Vec<Dispatch>
    where
        S: SceneProvider + ?Sized,
        V: Viewpoint + ?Sized,
    {
        let Some((kind, ndc)) = self.subscription.take() else {
            return Vec::new();
        };

        let ray = viewpoint.ray_through(ndc);
        let target = scene
            .intersect(&ray)
            .first()
            .and_then(|hit| scene.object(hit.object));
        trace!(?kind, ?ndc, target = ?target.map(|obj| obj.name.as_str()), "resolving");

        let mut fired = Vec::new();
        match (target, kind) {
            (Some(target), PointerKind::Motion) => self.hover(scene, target, &mut fired),
            (Some(target), kind) => self.press(target, kind, &mut fired),
            (None, PointerKind::Motion) => self.exit(scene, &mut fired),
            (None, _) => {}
        }
        fired
    }

    /// Object the pointer was last determined to be over.
    pub fn last_hovered(&self) -> Option<ObjectId> {
        self.last_hovered
    }

    /// Object under the pointer at the last unmatched press.
    pub fn last_pressed(&self) -> Option<ObjectId> {
        self.last_pressed
    }

    /// Buffered, not yet resolved, pointer state.
    pub fn pending(&self) -> PendingPointer {
        self.subscription.snapshot()
    }

    /// Whether a notification is waiting for the next resolve.
    pub fn is_dirty(&self) -> bool {
        self.pending().is_dirty()
    }

    /// Registered handlers.
    pub fn handlers(&self) -> &HandlerTable {
        &self.handlers
    }

    fn hover<S>(&mut self, scene: &S, target: &SceneObject, fired: &mut Vec<Dispatch>)
    where
        S: SceneProvider + ?Sized,
    {
        // Leave is checked on every motion, not only when a new object is entered.
        if let Some(previous) = self.hovered_object(scene) {
            if previous.id() != target.id() {
                self.fire(EventKind::MouseLeave, previous, fired);
            }
        }

        if self.last_hovered != Some(target.id())
            && self.handlers.contains(EventKind::MouseEnter, &target.name)
        {
            self.last_hovered = Some(target.id());
            self.fire(EventKind::MouseEnter, target, fired);
        }
    }

    fn press(&mut self, target: &SceneObject, kind: PointerKind, fired: &mut Vec<Dispatch>) {
        if kind == PointerKind::Click && self.last_pressed == Some(target.id()) {
            self.fire(EventKind::MouseUp, target, fired);
            self.last_pressed = None;
        }

        if kind == PointerKind::Press {
            self.last_pressed = Some(target.id());
        }

        if let Some(event) = kind.event_kind() {
            self.fire(event, target, fired);
        }
    }

    fn exit<S>(&mut self, scene: &S, fired: &mut Vec<Dispatch>)
    where
        S: SceneProvider + ?Sized,
    {
        if let Some(previous) = self.hovered_object(scene) {
            if self.fire(EventKind::MouseLeave, previous, fired) {
                self.last_hovered = None;
            }
        }
    }

    fn hovered_object<'s, S>(&mut self, scene: &'s S) -> Option<&'s SceneObject>
    where
        S: SceneProvider + ?Sized,
    {
        let id = self.last_hovered?;
        let object = scene.object(id);
        if object.is_none() {
            debug!(object = %id, "hovered object left the scene");
            self.last_hovered = None;
        }
        object
    }

    fn fire(&mut self, kind: EventKind, target: &SceneObject, fired: &mut Vec<Dispatch>) -> bool {
        let matched = self.handlers.dispatch(kind, target);
        if matched {
            fired.push(Dispatch {
                kind,
                object: target.id(),
            });
        }
        matched
    }
}
