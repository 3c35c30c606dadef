//! Platform pointer source and the per-router single-slot buffer it writes into.

use crate::event::{PointerKind, RawPointerEvent};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::trace;

/// Latest unresolved pointer state of one router.
///
/// Only the most recent notification survives: every write overwrites the pending
/// kind, and motion also overwrites the position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PendingPointer {
    ndc: Vec2,
    kind: Option<PointerKind>,
}

impl PendingPointer {
    /// Record a raw notification. Returns `false` if it was ignored.
    pub fn record(&mut self, event: &RawPointerEvent) -> bool {
        let Some(kind) = PointerKind::from_raw(event) else {
            return false;
        };

        if let RawPointerEvent::Moved { x, y, viewport } = *event {
            match viewport.to_ndc(x, y) {
                Some(ndc) => self.ndc = ndc,
                None => {
                    trace!(?viewport, "ignoring motion in zero-sized viewport");
                    return false;
                }
            }
        }

        self.kind = Some(kind);
        true
    }

    /// Take the pending kind, leaving the position in place.
    pub fn take(&mut self) -> Option<(PointerKind, Vec2)> {
        self.kind.take().map(|kind| (kind, self.ndc))
    }

    /// Whether a notification is waiting to be resolved.
    pub fn is_dirty(&self) -> bool {
        self.kind.is_some()
    }

    /// Last known pointer position in normalised device coordinates.
    pub fn ndc(&self) -> Vec2 {
        self.ndc
    }

    /// Kind waiting to be resolved.
    pub fn kind(&self) -> Option<PointerKind> {
        self.kind
    }
}

type Slot = Rc<RefCell<PendingPointer>>;

#[derive(Debug, Default)]
struct Subscribers {
    next_id: u64,
    slots: Vec<(u64, Slot)>,
}

/// Fan-out point for raw pointer notifications.
///
/// The host feeds platform events into [`PointerSource::emit`]; every live
/// [`Subscription`] receives a copy. Cloning the source shares the subscriber list.
#[derive(Debug, Clone, Default)]
pub struct PointerSource {
    subscribers: Rc<RefCell<Subscribers>>,
}

impl PointerSource {
    /// Create a source with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new buffer. It stays attached until the subscription is dropped.
    pub fn subscribe(&self) -> Subscription {
        let mut subscribers = self.subscribers.borrow_mut();
        let id = subscribers.next_id;
        subscribers.next_id += 1;

        let slot = Slot::default();
        subscribers.slots.push((id, Rc::clone(&slot)));
        Subscription {
            id,
            slot,
            source: Rc::downgrade(&self.subscribers),
        }
    }

    /// Deliver a notification to every subscriber.
    pub fn emit(&self, event: &RawPointerEvent) {
        for (_, slot) in &self.subscribers.borrow().slots {
            slot.borrow_mut().record(event);
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().slots.len()
    }
}

/// Scoped attachment to a [`PointerSource`]. Dropping it detaches the buffer.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    slot: Slot,
    source: Weak<RefCell<Subscribers>>,
}

impl Subscription {
    /// A buffer fed only through [`Subscription::record`].
    pub fn detached() -> Self {
        Self {
            id: 0,
            slot: Slot::default(),
            source: Weak::new(),
        }
    }

    /// Write a notification straight into this buffer.
    pub fn record(&self, event: &RawPointerEvent) -> bool {
        self.slot.borrow_mut().record(event)
    }

    /// Take the pending notification.
    pub fn take(&self) -> Option<(PointerKind, Vec2)> {
        self.slot.borrow_mut().take()
    }

    /// Copy of the buffered state.
    pub fn snapshot(&self) -> PendingPointer {
        *self.slot.borrow()
    }

    /// Whether the source this was created from still exists.
    pub fn is_attached(&self) -> bool {
        self.source.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(source) = self.source.upgrade() {
            source.borrow_mut().slots.retain(|(id, _)| *id != self.id);
        }
    }
}
