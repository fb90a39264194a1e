//! The application loop: [`Model`], [`Screen`], [`Driver`], [`Effect`],
//! [`App`].
//!
//! The loop is single-threaded. A model that runs a long computation (such
//! as a search) receives the [`Screen`] handle in [`Model::update`] and
//! calls [`Screen::yield_frame`] between steps; that is also where the
//! driver drains pending input, so a quit request can interrupt the
//! computation.

use std::error::Error;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::grid::Grid;
use crate::messages::Msg;

// ---------------------------------------------------------------------------
// Context (cancellation token)
// ---------------------------------------------------------------------------

/// A simple cooperative-cancellation token backed by an [`AtomicBool`].
#[derive(Clone, Debug)]
pub struct Context {
    done: Arc<AtomicBool>,
}

impl Context {
    /// Create a new, non-cancelled context.
    pub fn new() -> Self {
        Self {
            done: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Relaxed)
    }

    /// Request cancellation.
    #[inline]
    pub fn cancel(&self) {
        self.done.store(true, Ordering::Relaxed);
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Effect
// ---------------------------------------------------------------------------

/// A side-effect returned by [`Model::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// The grid changed and should be repainted.
    Redraw,
    /// Signal the application loop to stop.
    End,
}

// ---------------------------------------------------------------------------
// Screen / Model / Driver
// ---------------------------------------------------------------------------

/// An explicit handle to the rendering surface.
pub trait Screen {
    /// Draw `grid`. Pending input stays queued for the next poll.
    fn repaint(&mut self, grid: &Grid);

    /// Draw `grid` from inside a long computation and drain the input that
    /// arrived meanwhile, discarding everything but quit requests.
    ///
    /// Returns `Break` if the user asked to quit; the driver must then
    /// report [`Msg::Quit`] from its next [`Driver::poll_msgs`].
    fn yield_frame(&mut self, grid: &Grid) -> ControlFlow<()>;
}

/// The application model.
pub trait Model {
    /// Process a message, optionally returning a side-effect.
    fn update(&mut self, msg: Msg, screen: &mut dyn Screen) -> Option<Effect>;

    /// The grid to render.
    fn grid(&self) -> &Grid;
}

/// Back-end driver (e.g. terminal, native window).
pub trait Driver: Screen {
    /// Initialise the back-end.
    fn init(&mut self) -> Result<(), Box<dyn Error>>;

    /// Wait up to `timeout` for input and return the messages that arrived.
    /// Implementations should return promptly once `ctx.is_done()`.
    fn poll_msgs(&mut self, ctx: &Context, timeout: Duration) -> Result<Vec<Msg>, Box<dyn Error>>;

    /// Clean up / restore the terminal or window.
    fn close(&mut self);
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// How long [`App::run`] waits for input per iteration.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(16);

/// The main application runner.
pub struct App<M: Model, D: Driver> {
    model: M,
    driver: D,
    poll_timeout: Duration,
}

impl<M: Model, D: Driver> App<M, D> {
    pub fn new(model: M, driver: D) -> Self {
        Self {
            model,
            driver,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Set the per-iteration input timeout (builder).
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Consume the app, returning the model and driver.
    pub fn into_parts(self) -> (M, D) {
        (self.model, self.driver)
    }

    /// Run the loop until the model returns [`Effect::End`].
    ///
    /// 1. Initialises the driver and paints the first frame.
    /// 2. Sends `Msg::Init` through the model.
    /// 3. Loops: update → repaint (if asked) → poll.
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        self.driver.init()?;

        let ctx = Context::new();
        self.driver.repaint(self.model.grid());
        let mut pending = vec![Msg::Init];

        while !ctx.is_done() {
            let mut needs_draw = false;
            for msg in pending.drain(..) {
                match self.model.update(msg, &mut self.driver) {
                    Some(Effect::End) => {
                        ctx.cancel();
                        break;
                    }
                    Some(Effect::Redraw) => needs_draw = true,
                    None => {}
                }
            }
            if ctx.is_done() {
                break;
            }

            if needs_draw {
                self.driver.repaint(self.model.grid());
            }

            pending = match self.driver.poll_msgs(&ctx, self.poll_timeout) {
                Ok(msgs) => msgs,
                Err(e) => {
                    ctx.cancel();
                    self.driver.close();
                    return Err(e);
                }
            };
        }

        log::debug!("application loop finished");
        self.driver.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Pos;
    use crate::messages::Key;
    use std::collections::VecDeque;

    struct ScriptDriver {
        script: VecDeque<Vec<Msg>>,
        repaints: usize,
        closed: bool,
    }

    impl ScriptDriver {
        fn new(script: Vec<Vec<Msg>>) -> Self {
            Self {
                script: script.into(),
                repaints: 0,
                closed: false,
            }
        }
    }

    impl Screen for ScriptDriver {
        fn repaint(&mut self, _grid: &Grid) {
            self.repaints += 1;
        }

        fn yield_frame(&mut self, grid: &Grid) -> ControlFlow<()> {
            self.repaint(grid);
            ControlFlow::Continue(())
        }
    }

    impl Driver for ScriptDriver {
        fn init(&mut self) -> Result<(), Box<dyn Error>> {
            Ok(())
        }

        fn poll_msgs(&mut self, _ctx: &Context, _t: Duration) -> Result<Vec<Msg>, Box<dyn Error>> {
            Ok(self.script.pop_front().unwrap_or_else(|| vec![Msg::Quit]))
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    struct Painter {
        grid: Grid,
        seen: Vec<Msg>,
    }

    impl Model for Painter {
        fn update(&mut self, msg: Msg, _screen: &mut dyn Screen) -> Option<Effect> {
            self.seen.push(msg.clone());
            match msg {
                Msg::Quit => Some(Effect::End),
                Msg::KeyDown { key: Key::Char(_) } => {
                    self.grid.set_state(Pos::new(0, 0), crate::CellState::Barrier);
                    Some(Effect::Redraw)
                }
                _ => None,
            }
        }

        fn grid(&self) -> &Grid {
            &self.grid
        }
    }

    #[test]
    fn run_delivers_init_then_script_and_stops_on_quit() {
        let model = Painter {
            grid: Grid::new(2, 1),
            seen: Vec::new(),
        };
        let driver = ScriptDriver::new(vec![
            vec![Msg::key(Key::Char('a'))],
            vec![],
            vec![Msg::Quit, Msg::key(Key::Char('b'))],
        ]);
        let mut app = App::new(model, driver).with_poll_timeout(Duration::ZERO);
        app.run().unwrap();
        let (model, driver) = app.into_parts();

        assert_eq!(
            model.seen,
            vec![Msg::Init, Msg::key(Key::Char('a')), Msg::Quit]
        );
        // Initial paint plus one for the redraw effect.
        assert_eq!(driver.repaints, 2);
        assert!(driver.closed);
        assert!(model.grid.at(Pos::new(0, 0)).unwrap().is_barrier());
    }

    #[test]
    fn context_cancel() {
        let ctx = Context::new();
        let other = ctx.clone();
        assert!(!ctx.is_done());
        other.cancel();
        assert!(ctx.is_done());
    }
}
