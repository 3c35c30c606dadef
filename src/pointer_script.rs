//! Scripted pointer input for headless runs.
//!
//! A script is a JSON file with a list of steps:
//!
//! ```json
//! { "steps": [
//!     { "point_at": "Tetra" },
//!     { "pointer": { "type": "clicked" } },
//!     { "frames": 2 },
//!     { "scroll_to": -500.0 }
//! ] }
//! ```

use portfolio_interaction::RawPointerEvent;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read pointer script {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse pointer script {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("pointer script {0} contains no steps")]
    Empty(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    /// Deliver a raw notification.
    Pointer(RawPointerEvent),
    /// Move the pointer over the centre of the named object.
    PointAt(String),
    /// Scroll the page so its top sits at this offset.
    ScrollTo(f32),
    /// Render this many frames.
    Frames(u32),
}

#[derive(Debug, Deserialize)]
struct PointerScriptFile {
    steps: Vec<ScriptStep>,
}

#[derive(Debug, Clone)]
pub struct PointerScript {
    steps: Vec<ScriptStep>,
}

impl PointerScript {
    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let contents = fs::read_to_string(path).map_err(|source| ScriptError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: PointerScriptFile =
            serde_json::from_str(&contents).map_err(|source| ScriptError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if file.steps.is_empty() {
            return Err(ScriptError::Empty(path.to_path_buf()));
        }
        Ok(Self { steps: file.steps })
    }

    pub fn from_steps(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfolio_interaction::Viewport;

    fn write_script(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("portfolio3d-script-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn parses_every_step_kind() {
        let path = write_script(
            "all.json",
            r#"{ "steps": [
                { "pointer": { "type": "moved", "x": 10, "y": 20,
                               "viewport": { "width": 800, "height": 600 } } },
                { "pointer": { "type": "double_clicked" } },
                { "point_at": "gitcube" },
                { "scroll_to": -250.5 },
                { "frames": 3 }
            ] }"#,
        );
        let script = PointerScript::from_path(&path).unwrap();
        assert_eq!(
            script.steps(),
            &[
                ScriptStep::Pointer(RawPointerEvent::Moved {
                    x: 10.0,
                    y: 20.0,
                    viewport: Viewport::new(800, 600),
                }),
                ScriptStep::Pointer(RawPointerEvent::DoubleClicked),
                ScriptStep::PointAt("gitcube".into()),
                ScriptStep::ScrollTo(-250.5),
                ScriptStep::Frames(3),
            ]
        );
    }

    #[test]
    fn rejects_empty_and_malformed_scripts() {
        let empty = write_script("empty.json", r#"{ "steps": [] }"#);
        assert!(matches!(
            PointerScript::from_path(&empty),
            Err(ScriptError::Empty(_))
        ));

        let broken = write_script("broken.json", r#"{ "steps": [ { "teleport": 1 } ] }"#);
        assert!(matches!(
            PointerScript::from_path(&broken),
            Err(ScriptError::Parse { .. })
        ));

        let missing = std::env::temp_dir().join("portfolio3d-no-such-script.json");
        assert!(matches!(
            PointerScript::from_path(&missing),
            Err(ScriptError::Read { .. })
        ));
    }
}
