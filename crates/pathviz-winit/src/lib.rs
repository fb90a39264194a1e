//! Winit graphical backend for pathviz.
//!
//! Renders the grid as solid coloured squares in a native window using:
//! - [`winit`] for window creation and input events
//! - [`softbuffer`] for CPU-based pixel rendering
//!
//! The driver owns the event loop and pumps it on demand
//! ([`EventLoopExtPumpEvents`]), so the single-threaded [`pathviz_core::App`]
//! loop and an in-progress search can both reach the window between steps.
//! Pumping is available on Windows, macOS, Linux (X11 and Wayland) and
//! Android.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pathviz_winit::{WinitConfig, WinitDriver};
//!
//! let driver = WinitDriver::new(WinitConfig::default());
//! // let mut app = pathviz_core::App::new(my_model, driver);
//! // app.run().unwrap();
//! ```

mod input;
mod renderer;

use std::error::Error;
use std::num::NonZeroU32;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window, WindowId},
};

use pathviz_core::{Context, Driver, Grid, Msg, Screen};

use input::MouseTracker;
use renderer::GridRenderer;

/// How many pump rounds [`WinitDriver::init`] waits for the window.
const INIT_PUMPS: usize = 100;

/// Whether input drained mid-search asks to quit.
fn quit_requested(msgs: &[Msg]) -> bool {
    msgs.iter().any(Msg::is_quit)
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the winit driver.
#[derive(Clone, Debug)]
pub struct WinitConfig {
    /// Window title.
    pub title: String,
    /// Inner window width and height in physical pixels.
    pub size: u32,
}

impl Default for WinitConfig {
    fn default() -> Self {
        Self {
            title: "pathviz".into(),
            size: 800,
        }
    }
}

// ---------------------------------------------------------------------------
// WinitDriver
// ---------------------------------------------------------------------------

/// Winit-based graphical driver.
pub struct WinitDriver {
    event_loop: Option<EventLoop<()>>,
    handler: Handler,
    quit_pending: bool,
}

impl WinitDriver {
    pub fn new(config: WinitConfig) -> Self {
        Self {
            event_loop: None,
            handler: Handler {
                config,
                state: None,
                queue: Vec::new(),
                mouse: MouseTracker::default(),
                close_requested: false,
                error: None,
            },
            quit_pending: false,
        }
    }

    fn pump(&mut self, timeout: Duration) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };
        if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(timeout), &mut self.handler)
        {
            log::debug!("event loop exited with code {code}");
            self.handler.close_requested = true;
        }
    }
}

impl Screen for WinitDriver {
    fn repaint(&mut self, grid: &Grid) {
        if let Some(state) = self.handler.state.as_mut() {
            state.renderer.draw(grid);
            state.present();
        }
    }

    fn yield_frame(&mut self, grid: &Grid) -> ControlFlow<()> {
        self.repaint(grid);
        self.pump(Duration::ZERO);
        let drained = std::mem::take(&mut self.handler.queue);
        if self.handler.close_requested || quit_requested(&drained) {
            self.quit_pending = true;
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }
}

impl Driver for WinitDriver {
    fn init(&mut self) -> Result<(), Box<dyn Error>> {
        let mut event_loop = EventLoop::new()?;
        for _ in 0..INIT_PUMPS {
            let status =
                event_loop.pump_app_events(Some(Duration::from_millis(10)), &mut self.handler);
            if matches!(status, PumpStatus::Exit(_))
                || self.handler.state.is_some()
                || self.handler.error.is_some()
            {
                break;
            }
        }
        self.event_loop = Some(event_loop);

        if let Some(e) = self.handler.error.take() {
            return Err(e.into());
        }
        if self.handler.state.is_none() {
            return Err("window was not created".into());
        }
        log::info!(
            "opened {0}x{0} window \"{1}\"",
            self.handler.config.size,
            self.handler.config.title
        );
        Ok(())
    }

    fn poll_msgs(&mut self, ctx: &Context, timeout: Duration) -> Result<Vec<Msg>, Box<dyn Error>> {
        if ctx.is_done() {
            return Ok(Vec::new());
        }
        self.pump(timeout);
        let mut msgs = std::mem::take(&mut self.handler.queue);
        if self.handler.close_requested || self.quit_pending {
            msgs.push(Msg::Quit);
        }
        Ok(msgs)
    }

    fn close(&mut self) {
        self.handler.state = None;
        self.event_loop = None;
    }
}

// ---------------------------------------------------------------------------
// Handler (ApplicationHandler)
// ---------------------------------------------------------------------------

struct Handler {
    config: WinitConfig,
    state: Option<WinitState>,
    queue: Vec<Msg>,
    mouse: MouseTracker,
    close_requested: bool,
    error: Option<String>,
}

struct WinitState {
    window: Arc<Window>,
    surface: softbuffer::Surface<Arc<Window>, Arc<Window>>,
    renderer: GridRenderer,
    pixel_width: u32,
    pixel_height: u32,
}

impl WinitState {
    fn resize(&mut self, width: u32, height: u32) {
        self.pixel_width = width;
        self.pixel_height = height;
        let w = NonZeroU32::new(width).unwrap_or(NonZeroU32::MIN);
        let h = NonZeroU32::new(height).unwrap_or(NonZeroU32::MIN);
        if let Err(e) = self.surface.resize(w, h) {
            log::warn!("surface resize failed: {e}");
        }
    }

    /// Blit the renderer's pixels to the window.
    fn present(&mut self) {
        let (width, height) = (self.pixel_width as usize, self.pixel_height as usize);
        if width == 0 || height == 0 {
            return;
        }
        let mut buf = match self.surface.buffer_mut() {
            Ok(b) => b,
            Err(e) => {
                log::warn!("no surface buffer: {e}");
                return;
            }
        };
        self.renderer.blit_to_buffer(&mut buf, width, height);
        if let Err(e) = buf.present() {
            log::warn!("present failed: {e}");
        }
    }
}

impl Handler {
    fn create_state(&self, event_loop: &ActiveEventLoop) -> Result<WinitState, Box<dyn Error>> {
        let size = self.config.size;
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(size, size))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let context = softbuffer::Context::new(window.clone())?;
        let surface = softbuffer::Surface::new(&context, window.clone())?;

        let inner = window.inner_size();
        let mut state = WinitState {
            window,
            surface,
            renderer: GridRenderer::new(),
            pixel_width: 0,
            pixel_height: 0,
        };
        state.resize(inner.width, inner.height);
        Ok(state)
    }
}

impl ApplicationHandler for Handler {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        match self.create_state(event_loop) {
            Ok(state) => self.state = Some(state),
            Err(e) => {
                log::error!("failed to open window: {e}");
                self.error = Some(e.to_string());
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(state) = self.state.as_mut() {
                    state.resize(width, height);
                    state.window.request_redraw();
                }
            }

            WindowEvent::RedrawRequested => {
                if let Some(state) = self.state.as_mut() {
                    state.present();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(msg) = input::translate_keyboard(&event) {
                    self.queue.push(msg);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(msg) = self.mouse.button(state, button) {
                    self.queue.push(msg);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let msg = self.mouse.moved(position);
                self.queue.push(msg);
            }

            _ => {}
        }
    }
}
