//! The interactive grid editor: places endpoints and barriers from mouse
//! input and runs the search on request.

use std::ops::ControlFlow;
use std::time::Duration;

use pathviz_core::{CellState, Effect, Grid, Key, Model, MouseAction, Msg, Point, Pos, Screen};
use pathviz_paths::Outcome;

use crate::config::VizConfig;

pub struct Editor {
    grid: Grid,
    start: Option<Pos>,
    end: Option<Pos>,
    step_delay: Duration,
}

impl Editor {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            start: None,
            end: None,
            step_delay: Duration::ZERO,
        }
    }

    pub fn from_config(config: &VizConfig) -> Self {
        Self::new(Grid::new(config.rows, config.cell_width())).with_step_delay(config.step_delay())
    }

    /// Pause after every search step (builder).
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    pub fn start(&self) -> Option<Pos> {
        self.start
    }

    pub fn end(&self) -> Option<Pos> {
        self.end
    }

    /// Left click: the first free click places the start, the next the end,
    /// and later clicks lay barriers. Returns whether anything changed.
    pub fn place(&mut self, pos: Pos) -> bool {
        let Some(state) = self.grid.state(pos) else {
            return false;
        };
        if self.start.is_none() && self.end != Some(pos) {
            self.grid.set_state(pos, CellState::Start);
            self.start = Some(pos);
            log::debug!("start placed at {pos}");
        } else if self.end.is_none() && self.start != Some(pos) {
            self.grid.set_state(pos, CellState::End);
            self.end = Some(pos);
            log::debug!("end placed at {pos}");
        } else if self.start != Some(pos) && self.end != Some(pos) && state != CellState::Barrier {
            self.grid.set_state(pos, CellState::Barrier);
        } else {
            return false;
        }
        true
    }

    /// Right click: empty the cell, forgetting it as an endpoint.
    pub fn erase(&mut self, pos: Pos) -> bool {
        let Some(state) = self.grid.state(pos) else {
            return false;
        };
        if self.start == Some(pos) {
            self.start = None;
        }
        if self.end == Some(pos) {
            self.end = None;
        }
        if state == CellState::Empty {
            return false;
        }
        self.grid.set_state(pos, CellState::Empty);
        true
    }

    /// Empty every cell and forget both endpoints.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.start = None;
        self.end = None;
        log::info!("grid reset");
    }

    /// Run the search, repainting through `screen` after every step.
    ///
    /// Returns `None` when an endpoint is missing. Marks from the previous
    /// run are cleared first.
    pub fn run_search(&mut self, screen: &mut dyn Screen) -> Option<Outcome> {
        let (Some(start), Some(end)) = (self.start, self.end) else {
            log::warn!("place both a start and an end before searching");
            return None;
        };

        self.grid.clear_search();
        self.grid.refresh_neighbors();
        log::info!("searching from {start} to {end}");

        let delay = self.step_delay;
        let outcome = pathviz_paths::run(&mut self.grid, start, end, |grid| {
            let flow = screen.yield_frame(grid);
            if flow.is_continue() && !delay.is_zero() {
                std::thread::sleep(delay);
            }
            flow
        });

        match outcome {
            Outcome::Found => log::info!(
                "path found: {} cells between start and end",
                self.grid.count(CellState::Path)
            ),
            Outcome::Unreachable => log::info!(
                "no path; {} cells explored",
                self.grid.count(CellState::Closed)
            ),
            Outcome::Cancelled => log::info!("search cancelled"),
        }
        Some(outcome)
    }

    fn cell_at(&self, p: Point) -> Option<Pos> {
        self.grid.pos_at_pixel(p)
    }
}

impl Model for Editor {
    fn update(&mut self, msg: Msg, screen: &mut dyn Screen) -> Option<Effect> {
        match msg {
            Msg::Init => {
                log::info!(
                    "{0}x{0} grid ready: left click places start, end, then barriers; \
                     right click erases; space searches; r resets; c clears; q quits",
                    self.grid.size()
                );
                None
            }
            Msg::Quit => Some(Effect::End),
            msg if msg.is_quit() => Some(Effect::End),
            Msg::KeyDown { key: Key::Space } => match self.run_search(screen)? {
                Outcome::Cancelled => Some(Effect::End),
                _ => Some(Effect::Redraw),
            },
            Msg::KeyDown { key: Key::Char('r') } => {
                self.reset();
                Some(Effect::Redraw)
            }
            Msg::KeyDown { key: Key::Char('c') } => {
                self.grid.clear_search();
                Some(Effect::Redraw)
            }
            Msg::Mouse { action, pos } => {
                let cell = self.cell_at(pos)?;
                let changed = match action {
                    MouseAction::Main => self.place(cell),
                    MouseAction::Secondary => self.erase(cell),
                    MouseAction::Release | MouseAction::Move => false,
                };
                changed.then_some(Effect::Redraw)
            }
            Msg::KeyDown { .. } => None,
        }
    }

    fn grid(&self) -> &Grid {
        &self.grid
    }
}

/// A [`Screen`] that draws nothing, for running searches headless.
#[derive(Debug, Default)]
pub struct NullScreen;

impl Screen for NullScreen {
    fn repaint(&mut self, _grid: &Grid) {}

    fn yield_frame(&mut self, _grid: &Grid) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}
