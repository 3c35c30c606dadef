use crate::actions::{Action, ActionSink};
use crate::config::PortfolioConfig;
use crate::pointer_script::{PointerScript, ScriptStep};
use crate::portfolio::{FrameOutcome, Portfolio};
use crate::report::DispatchLog;
use anyhow::Result;
use portfolio_interaction::{PointerSource, RawPointerEvent};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct HeadlessConfig {
    pub portfolio: PortfolioConfig,
    pub script: Option<PointerScript>,
    /// Frames to run after the script is exhausted.
    pub trailing_frames: u32,
    pub report: Option<PathBuf>,
}

/// Totals gathered over a headless run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    /// Dispatch counts keyed by `(category, object name)`.
    pub dispatches: BTreeMap<(String, String), usize>,
    pub actions: Vec<Action>,
}

impl RunSummary {
    fn record(&mut self, outcome: &FrameOutcome) {
        self.frames = outcome.frame;
        for routed in &outcome.dispatches {
            *self
                .dispatches
                .entry((routed.dispatch.kind.to_string(), routed.name.clone()))
                .or_default() += 1;
        }
        self.actions.extend(outcome.actions.iter().cloned());
    }

    pub fn count(&self, kind: &str, name: &str) -> usize {
        self.dispatches
            .get(&(kind.to_string(), name.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frames: {}", self.frames)?;
        if self.dispatches.is_empty() {
            writeln!(f, "dispatches: none")?;
        }
        for ((kind, name), count) in &self.dispatches {
            writeln!(f, "  {kind:<12} {name:<12} x{count}")?;
        }
        for action in &self.actions {
            match action {
                Action::OpenUrl { url } => writeln!(f, "  open {url}")?,
                Action::PlaySound { path } => writeln!(f, "  play {path}")?,
            }
        }
        Ok(())
    }
}

/// Build the page, replay the script against it and summarise what fired.
pub fn run(cfg: HeadlessConfig) -> Result<RunSummary> {
    let source = PointerSource::new();
    let mut page = Portfolio::new(&cfg.portfolio, &source);
    let mut sink = ActionSink::new(cfg.portfolio.links.open_urls);
    let mut log = cfg.report.as_ref().map(DispatchLog::create).transpose()?;
    let mut summary = RunSummary::default();

    let mut step_frame = |page: &mut Portfolio| -> Result<()> {
        let outcome = page.frame();
        for action in &outcome.actions {
            if let Err(err) = sink.perform(action) {
                warn!("{err:#}");
            }
        }
        if let Some(log) = log.as_mut() {
            log.write_frame(&outcome)?;
        }
        summary.record(&outcome);
        Ok(())
    };

    let steps = cfg.script.as_ref().map(PointerScript::steps).unwrap_or(&[]);
    for step in steps {
        debug!(?step, "script step");
        match step {
            ScriptStep::Pointer(event) => {
                if let RawPointerEvent::Wheel { delta } = event {
                    page.scroll_by(delta * cfg.portfolio.scene.pixels_per_line);
                }
                source.emit(event);
            }
            ScriptStep::PointAt(name) => match page.pixel_of(name) {
                Some((x, y)) => source.emit(&RawPointerEvent::Moved {
                    x,
                    y,
                    viewport: page.viewport(),
                }),
                None => warn!("'{name}' is not on screen; step skipped"),
            },
            ScriptStep::ScrollTo(top) => page.scroll_to(*top),
            ScriptStep::Frames(count) => {
                for _ in 0..*count {
                    step_frame(&mut page)?;
                }
            }
        }
    }
    for _ in 0..cfg.trailing_frames {
        step_frame(&mut page)?;
    }

    if let Some(log) = log {
        log.finish()?;
    }
    Ok(summary)
}
