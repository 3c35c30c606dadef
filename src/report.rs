use crate::actions::Action;
use crate::portfolio::FrameOutcome;
use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// One line of the dispatch log.
#[derive(Debug, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum ReportRecord<'a> {
    Dispatch {
        frame: u64,
        router: usize,
        kind: &'static str,
        object: String,
        name: &'a str,
    },
    Action {
        frame: u64,
        #[serde(flatten)]
        action: &'a Action,
    },
}

/// Writes what each frame did as newline-delimited JSON.
pub struct DispatchLog {
    out: BufWriter<File>,
}

impl DispatchLog {
    /// Create a log at `path`, creating parent directories if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
        })
    }

    pub fn write_frame(&mut self, outcome: &FrameOutcome) -> Result<()> {
        for routed in &outcome.dispatches {
            self.write(&ReportRecord::Dispatch {
                frame: outcome.frame,
                router: routed.router,
                kind: routed.dispatch.kind.as_str(),
                object: routed.dispatch.object.to_string(),
                name: &routed.name,
            })?;
        }
        for action in &outcome.actions {
            self.write(&ReportRecord::Action {
                frame: outcome.frame,
                action,
            })?;
        }
        Ok(())
    }

    fn write(&mut self, record: &ReportRecord<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
