//! Side effects requested by mesh handlers.
//!
//! Handlers run inside a router's resolve and only queue what they want done; the
//! frame loop performs the queued actions afterwards.

use crate::audio::SoundPlayer;
use anyhow::{Context, Result};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    OpenUrl { url: String },
    PlaySound { path: String },
}

/// Queue shared between handlers and the frame loop.
#[derive(Debug, Clone, Default)]
pub struct ActionQueue {
    pending: Rc<RefCell<Vec<Action>>>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, action: Action) {
        self.pending.borrow_mut().push(action);
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<Action> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

/// Performs actions on the host system.
#[derive(Debug, Default)]
pub struct ActionSink {
    open_urls: bool,
    sounds: SoundPlayer,
    performed: usize,
}

impl ActionSink {
    pub fn new(open_urls: bool) -> Self {
        Self {
            open_urls,
            sounds: SoundPlayer::new(),
            performed: 0,
        }
    }

    /// Number of actions handled so far.
    pub fn performed(&self) -> usize {
        self.performed
    }

    pub fn perform(&mut self, action: &Action) -> Result<()> {
        self.performed += 1;
        match action {
            Action::OpenUrl { url } if self.open_urls => {
                info!(%url, "opening link");
                open::that(url).with_context(|| format!("failed to open {url}"))?;
            }
            Action::OpenUrl { url } => info!(%url, "link requested (opening disabled)"),
            Action::PlaySound { path } => self.sounds.play(path)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drains_in_order_and_empties() {
        let queue = ActionQueue::new();
        let handle = queue.clone();
        handle.push(Action::PlaySound { path: "a.mp3".into() });
        handle.push(Action::OpenUrl { url: "https://example.com".into() });

        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.drain(),
            vec![
                Action::PlaySound { path: "a.mp3".into() },
                Action::OpenUrl { url: "https://example.com".into() },
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn disabled_sink_only_counts() {
        let mut sink = ActionSink::new(false);
        sink.perform(&Action::OpenUrl { url: "https://example.com".into() })
            .unwrap();
        sink.perform(&Action::OpenUrl { url: "https://example.org".into() })
            .unwrap();
        assert_eq!(sink.performed(), 2);
    }

    #[cfg(feature = "rodio_backend")]
    #[test]
    fn missing_sound_fails_the_action() {
        let mut sink = ActionSink::new(true);
        let err = sink
            .perform(&Action::PlaySound { path: "/definitely/missing.mp3".into() })
            .unwrap_err();
        assert!(format!("{err:#}").contains("missing.mp3"));
    }

    #[cfg(not(feature = "rodio_backend"))]
    #[test]
    fn sounds_are_only_logged_without_a_backend() {
        let mut sink = ActionSink::new(false);
        sink.perform(&Action::PlaySound { path: "a.mp3".into() }).unwrap();
        assert_eq!(sink.performed(), 1);
    }

    #[test]
    fn actions_serialize_with_a_tag() {
        let json = serde_json::to_string(&Action::OpenUrl { url: "u".into() }).unwrap();
        assert_eq!(json, r#"{"action":"open_url","url":"u"}"#);
    }
}
