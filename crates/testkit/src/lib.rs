#![warn(missing_docs)]
//! Fixture scenes and handler recorders for interaction tests.

mod stage;

pub use stage::{Stage, STAGE_VIEWPORT};

use portfolio_scene::{ObjectId, SceneObject};
use std::cell::RefCell;
use std::rc::Rc;

/// One recorded handler call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedCall {
    /// Label given to the recorder that fired.
    pub tag: String,
    /// Object the handler received.
    pub object: ObjectId,
    /// Name of that object.
    pub name: String,
}

/// Shared, ordered log of handler calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<LoggedCall>>>,
}

impl CallLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler closure that appends a call tagged `tag`.
    pub fn recorder(&self, tag: &str) -> impl FnMut(&SceneObject) + 'static {
        let calls = Rc::clone(&self.calls);
        let tag = tag.to_string();
        move |obj: &SceneObject| {
            calls.borrow_mut().push(LoggedCall {
                tag: tag.clone(),
                object: obj.id(),
                name: obj.name.clone(),
            })
        }
    }

    /// Tags in call order.
    pub fn tags(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.tag.clone()).collect()
    }

    /// Every recorded call.
    pub fn calls(&self) -> Vec<LoggedCall> {
        self.calls.borrow().clone()
    }

    /// Number of calls recorded with `tag`.
    pub fn count(&self, tag: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.tag == tag).count()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
