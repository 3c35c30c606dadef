//! Raw pointer notifications and the synthetic event categories derived from them.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Category a handler can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Press and release completed (fired on release).
    Click,
    /// Second click in quick succession.
    #[serde(rename = "dblclick")]
    DoubleClick,
    /// Context menu requested (usually the secondary button).
    #[serde(rename = "contextmenu")]
    ContextMenu,
    /// Button pressed over the mesh.
    #[serde(rename = "mousedown")]
    MouseDown,
    /// Click released over the same mesh that was pressed.
    #[serde(rename = "mouseup")]
    MouseUp,
    /// Pointer moved onto the mesh.
    #[serde(rename = "mouseenter")]
    MouseEnter,
    /// Pointer moved off the mesh.
    #[serde(rename = "mouseleave")]
    MouseLeave,
}

impl EventKind {
    /// Number of categories.
    pub const COUNT: usize = 7;

    /// Every category, in registration-table order.
    pub const ALL: [EventKind; Self::COUNT] = [
        EventKind::Click,
        EventKind::DoubleClick,
        EventKind::ContextMenu,
        EventKind::MouseDown,
        EventKind::MouseUp,
        EventKind::MouseEnter,
        EventKind::MouseLeave,
    ];

    /// DOM-style name (`"click"`, `"dblclick"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::DoubleClick => "dblclick",
            EventKind::ContextMenu => "contextmenu",
            EventKind::MouseDown => "mousedown",
            EventKind::MouseUp => "mouseup",
            EventKind::MouseEnter => "mouseenter",
            EventKind::MouseLeave => "mouseleave",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category name that does not map to any [`EventKind`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown interaction event kind '{0}'")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert a pixel position (origin top-left, +Y down) to normalised device
    /// coordinates (+Y up). `None` for a zero-sized viewport.
    pub fn to_ndc(self, x: f32, y: f32) -> Option<Vec2> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(Vec2::new(
            (x / self.width as f32) * 2.0 - 1.0,
            -(y / self.height as f32) * 2.0 + 1.0,
        ))
    }
}

/// Platform-level pointer notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawPointerEvent {
    /// Pointer moved to pixel `(x, y)` inside `viewport`.
    Moved {
        /// Horizontal pixel position.
        x: f32,
        /// Vertical pixel position, top is zero.
        y: f32,
        /// Viewport the position is relative to.
        viewport: Viewport,
    },
    /// A button went down.
    Pressed,
    /// A button went up. Routers do not listen to this on its own; the completed
    /// press arrives as [`RawPointerEvent::Clicked`].
    Released,
    /// Primary button press and release completed.
    Clicked,
    /// Second click in quick succession.
    DoubleClicked,
    /// Context menu requested.
    ContextMenu,
    /// Wheel scrolled. Ignored by routers.
    Wheel {
        /// Scroll amount in lines.
        delta: f32,
    },
}

/// Kind of the notification waiting in a router's single-slot buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Pointer moved.
    Motion,
    /// Button pressed.
    Press,
    /// Click completed.
    Click,
    /// Double click.
    DoubleClick,
    /// Context menu.
    ContextMenu,
}

impl PointerKind {
    /// Buffered kind for a raw notification, or `None` for notifications routers
    /// ignore.
    pub fn from_raw(event: &RawPointerEvent) -> Option<Self> {
        match event {
            RawPointerEvent::Moved { .. } => Some(PointerKind::Motion),
            RawPointerEvent::Pressed => Some(PointerKind::Press),
            RawPointerEvent::Clicked => Some(PointerKind::Click),
            RawPointerEvent::DoubleClicked => Some(PointerKind::DoubleClick),
            RawPointerEvent::ContextMenu => Some(PointerKind::ContextMenu),
            RawPointerEvent::Released | RawPointerEvent::Wheel { .. } => None,
        }
    }

    /// Handler category dispatched directly for this kind. Motion has none; it
    /// produces enter/leave transitions instead.
    pub fn event_kind(self) -> Option<EventKind> {
        match self {
            PointerKind::Motion => None,
            PointerKind::Press => Some(EventKind::MouseDown),
            PointerKind::Click => Some(EventKind::Click),
            PointerKind::DoubleClick => Some(EventKind::DoubleClick),
            PointerKind::ContextMenu => Some(EventKind::ContextMenu),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_kind_names_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>(), Ok(kind));
        }
        assert_eq!(
            "mousemove".parse::<EventKind>(),
            Err(UnknownEventKind("mousemove".to_string()))
        );
    }

    #[test]
    fn table_indices_are_dense() {
        for (i, kind) in EventKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn ndc_corners_and_center() {
        let vp = Viewport::new(800, 600);
        assert_eq!(vp.to_ndc(0.0, 0.0), Some(Vec2::new(-1.0, 1.0)));
        assert_eq!(vp.to_ndc(800.0, 600.0), Some(Vec2::new(1.0, -1.0)));
        assert_eq!(vp.to_ndc(400.0, 300.0), Some(Vec2::ZERO));
        assert_eq!(Viewport::new(0, 600).to_ndc(1.0, 1.0), None);
    }

    #[test]
    fn ignored_raw_events() {
        assert_eq!(PointerKind::from_raw(&RawPointerEvent::Released), None);
        assert_eq!(PointerKind::from_raw(&RawPointerEvent::Wheel { delta: 1.0 }), None);
        assert_eq!(
            PointerKind::from_raw(&RawPointerEvent::Clicked),
            Some(PointerKind::Click)
        );
    }

    #[test]
    fn press_dispatches_mousedown() {
        assert_eq!(PointerKind::Press.event_kind(), Some(EventKind::MouseDown));
        assert_eq!(PointerKind::Motion.event_kind(), None);
    }

    #[test]
    fn raw_events_use_internal_type_tag() {
        let wrapper: Wrapper = toml::from_str(
            "event = { type = \"moved\", x = 1.0, y = 2.0, viewport = { width = 4, height = 3 } }",
        )
        .unwrap();
        assert_eq!(
            wrapper.event,
            RawPointerEvent::Moved {
                x: 1.0,
                y: 2.0,
                viewport: Viewport::new(4, 3)
            }
        );

        let wrapper: Wrapper = toml::from_str("event = { type = \"double_clicked\" }").unwrap();
        assert_eq!(wrapper.event, RawPointerEvent::DoubleClicked);
    }

    #[derive(Deserialize)]
    struct Wrapper {
        event: RawPointerEvent,
    }
}
