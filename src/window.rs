//! Interactive mode: a desktop window whose pointer drives the page routers.
//!
//! Nothing is drawn; the window only supplies real pointer input, and the
//! resulting actions are performed exactly as in headless runs.

use crate::actions::ActionSink;
use crate::config::PortfolioConfig;
use crate::portfolio::Portfolio;
use anyhow::Result;
use portfolio_input::PointerTranslator;
use portfolio_interaction::{PointerSource, RawPointerEvent, Viewport};
use std::time::Instant;
use tracing::{info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

pub fn run(config: PortfolioConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let window = WindowBuilder::new()
        .with_title("portfolio3d")
        .with_inner_size(PhysicalSize::new(
            config.scene.viewport_width,
            config.scene.viewport_height,
        ))
        .build(&event_loop)?;

    let source = PointerSource::new();
    let mut page = Portfolio::new(&config, &source);
    let size = window.inner_size();
    page.resize(size.width, size.height);
    let mut translator = PointerTranslator::new(Viewport::new(size.width, size.height), config.input);
    let mut sink = ActionSink::new(config.links.open_urls);
    let pixels_per_line = config.scene.pixels_per_line;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, window_id } if window_id == window.id() => match event {
            WindowEvent::CloseRequested => {
                info!(frames = page.frame_count(), "window closed");
                elwt.exit();
            }
            WindowEvent::Resized(size) => {
                page.resize(size.width, size.height);
                translator.resized(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let outcome = page.frame();
                for action in &outcome.actions {
                    if let Err(err) = sink.perform(action) {
                        warn!("{err:#}");
                    }
                }
            }
            other => {
                for raw in translator.handle_event(&other, Instant::now()) {
                    if let RawPointerEvent::Wheel { delta } = raw {
                        page.scroll_by(delta * pixels_per_line);
                    }
                    source.emit(&raw);
                }
            }
        },
        Event::AboutToWait => window.request_redraw(),
        _ => {}
    })?;

    Ok(())
}
