//! Per-category handler lists with first-match-wins dispatch.

use crate::config::DuplicatePolicy;
use crate::event::EventKind;
use portfolio_scene::SceneObject;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

/// Callback invoked with the object an event was routed to.
pub type Handler = Box<dyn FnMut(&SceneObject)>;

struct Registration {
    mesh_name: String,
    handler: Handler,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("mesh_name", &self.mesh_name)
            .finish_non_exhaustive()
    }
}

/// Ordered registrations for every [`EventKind`].
///
/// Dispatch invokes the first registration, in insertion order, whose mesh name
/// equals the target's name. Later registrations for the same name and category can
/// never fire; [`DuplicatePolicy`] decides whether they are accepted at all.
#[derive(Debug, Default)]
pub struct HandlerTable {
    lists: [Vec<Registration>; EventKind::COUNT],
    policy: DuplicatePolicy,
}

impl HandlerTable {
    /// Empty table with the given duplicate policy.
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            lists: Default::default(),
            policy,
        }
    }

    /// Append a registration. Returns `false` if it was refused: empty mesh names
    /// never match anything, and duplicates are refused under
    /// [`DuplicatePolicy::Reject`].
    pub fn add(&mut self, mesh_name: &str, kind: EventKind, handler: Handler) -> bool {
        if mesh_name.is_empty() {
            warn!("Ignoring {kind} handler with an empty mesh name");
            return false;
        }

        let list = &mut self.lists[kind.index()];
        if list.iter().any(|reg| reg.mesh_name == mesh_name) {
            match self.policy {
                DuplicatePolicy::Accept => {}
                DuplicatePolicy::Warn => {
                    warn!("Duplicate {kind} handler for '{mesh_name}' will never fire");
                }
                DuplicatePolicy::Reject => {
                    warn!("Rejecting duplicate {kind} handler for '{mesh_name}'");
                    return false;
                }
            }
        }

        list.push(Registration {
            mesh_name: mesh_name.to_string(),
            handler,
        });
        true
    }

    /// Number of registrations for a category.
    pub fn len(&self, kind: EventKind) -> usize {
        self.lists[kind.index()].len()
    }

    /// Whether no handler is registered at all.
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }

    /// Whether a registration for `mesh_name` exists in `kind`.
    pub fn contains(&self, kind: EventKind, mesh_name: &str) -> bool {
        self.lists[kind.index()]
            .iter()
            .any(|reg| reg.mesh_name == mesh_name)
    }

    /// Invoke the first matching handler. Returns whether one matched.
    ///
    /// A panicking handler is contained and logged; it still counts as matched.
    pub fn dispatch(&mut self, kind: EventKind, target: &SceneObject) -> bool {
        let Some(reg) = self.lists[kind.index()]
            .iter_mut()
            .find(|reg| reg.mesh_name == target.name)
        else {
            return false;
        };

        debug!(event = %kind, mesh = %target.name, object = %target.id(), "dispatching");
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| (reg.handler)(target))) {
            error!(
                "{kind} handler for '{}' panicked: {}",
                target.name,
                panic_message(payload.as_ref())
            );
        }
        true
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
