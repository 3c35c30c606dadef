#![warn(missing_docs)]
//! Translation of winit window events into raw pointer notifications.
//!
//! winit reports bare button transitions; the click, double-click and context-menu
//! notifications routers expect are synthesised here.

use portfolio_interaction::{PointerSource, RawPointerEvent, Viewport};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::trace;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Thresholds for recognising a double click.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClickTiming {
    /// Longest gap between two clicks, in milliseconds.
    pub double_click_ms: u64,
    /// Furthest the pointer may move between the clicks, in pixels.
    pub double_click_slop: f32,
}

impl Default for ClickTiming {
    fn default() -> Self {
        Self {
            double_click_ms: 500,
            double_click_slop: 4.0,
        }
    }
}

impl ClickTiming {
    fn window(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}

/// Pointer state tracked across window events.
#[derive(Debug)]
pub struct PointerTranslator {
    timing: ClickTiming,
    viewport: Viewport,
    cursor: (f32, f32),
    primary_down: bool,
    secondary_down: bool,
    last_click: Option<(Instant, (f32, f32))>,
}

impl PointerTranslator {
    /// Create a translator for a window of the given size.
    pub fn new(viewport: Viewport, timing: ClickTiming) -> Self {
        Self {
            timing,
            viewport,
            cursor: (0.0, 0.0),
            primary_down: false,
            secondary_down: false,
            last_click: None,
        }
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Last cursor position in pixels.
    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    /// Translate one window event. Most events produce nothing.
    pub fn handle_event(&mut self, event: &WindowEvent, now: Instant) -> Vec<RawPointerEvent> {
        match event {
            WindowEvent::Resized(size) => {
                self.resized(size.width, size.height);
                Vec::new()
            }
            WindowEvent::CursorMoved { position, .. } => {
                vec![self.cursor_moved(position.x as f32, position.y as f32)]
            }
            WindowEvent::MouseInput { state, button, .. } => self.button(*button, *state, now),
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_x, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                vec![RawPointerEvent::Wheel { delta }]
            }
            _ => Vec::new(),
        }
    }

    /// Translate and deliver straight to `source`.
    pub fn forward(&mut self, event: &WindowEvent, now: Instant, source: &PointerSource) {
        for raw in self.handle_event(event, now) {
            trace!(?raw, "pointer notification");
            source.emit(&raw);
        }
    }

    /// Track a window resize.
    pub fn resized(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Track cursor motion.
    pub fn cursor_moved(&mut self, x: f32, y: f32) -> RawPointerEvent {
        self.cursor = (x, y);
        RawPointerEvent::Moved {
            x,
            y,
            viewport: self.viewport,
        }
    }

    /// Track a button transition.
    pub fn button(
        &mut self,
        button: MouseButton,
        state: ElementState,
        now: Instant,
    ) -> Vec<RawPointerEvent> {
        match (button, state) {
            (MouseButton::Left, ElementState::Pressed) => {
                self.primary_down = true;
                vec![RawPointerEvent::Pressed]
            }
            (MouseButton::Left, ElementState::Released) => {
                if !std::mem::take(&mut self.primary_down) {
                    return vec![RawPointerEvent::Released];
                }
                let mut out = vec![RawPointerEvent::Released, RawPointerEvent::Clicked];
                if self.completes_double_click(now) {
                    self.last_click = None;
                    out.push(RawPointerEvent::DoubleClicked);
                } else {
                    self.last_click = Some((now, self.cursor));
                }
                out
            }
            (MouseButton::Right, ElementState::Pressed) => {
                self.secondary_down = true;
                vec![RawPointerEvent::Pressed]
            }
            (MouseButton::Right, ElementState::Released) => {
                if std::mem::take(&mut self.secondary_down) {
                    vec![RawPointerEvent::Released, RawPointerEvent::ContextMenu]
                } else {
                    vec![RawPointerEvent::Released]
                }
            }
            (_, ElementState::Pressed) => vec![RawPointerEvent::Pressed],
            (_, ElementState::Released) => vec![RawPointerEvent::Released],
        }
    }

    fn completes_double_click(&self, now: Instant) -> bool {
        let Some((at, (x, y))) = self.last_click else {
            return false;
        };
        let dx = self.cursor.0 - x;
        let dy = self.cursor.1 - y;
        now.saturating_duration_since(at) <= self.timing.window()
            && (dx * dx + dy * dy).sqrt() <= self.timing.double_click_slop
    }
}
