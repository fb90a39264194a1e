//! Crossterm terminal driver for pathviz.
//!
//! Provides a [`CrosstermDriver`] that implements [`pathviz_core::Driver`].
//! Each grid cell is drawn as two blank terminal columns on a background of
//! the cell's state colour. Mouse positions are reported in the grid's pixel
//! space, so the editor's pixel-to-cell mapping works unchanged.

use std::error::Error;
use std::io::{self, Write};
use std::ops::ControlFlow;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute, queue,
    style::{Color as CtColor, Print, ResetColor, SetBackgroundColor},
    terminal::{self, ClearType},
};

use pathviz_core::{CellState, Color, Context, Driver, Grid, Key, MouseAction, Msg, Point, Screen};

/// Terminal columns per grid cell.
const COLS_PER_CELL: u16 = 2;

/// Maps a [`pathviz_core::Color`] to a [`crossterm::style::Color`].
fn to_ct_color(c: Color) -> CtColor {
    CtColor::Rgb {
        r: c.r(),
        g: c.g(),
        b: c.b(),
    }
}

/// Maps a crossterm [`KeyCode`] to a pathviz [`Key`].
fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

/// Converts a terminal cell coordinate to the top-left pixel of the grid
/// cell drawn there.
fn to_pixel(column: u16, row: u16, cell_width: u32) -> Point {
    let w = cell_width.max(1) as i32;
    Point::new((column / COLS_PER_CELL) as i32 * w, row as i32 * w)
}

fn translate_key(ev: KeyEvent) -> Option<Msg> {
    if ev.kind != KeyEventKind::Press {
        return None;
    }
    // Raw mode swallows the interrupt signal.
    if ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Msg::Quit);
    }
    to_key(ev.code).map(Msg::key)
}

fn translate_mouse(me: MouseEvent, cell_width: u32) -> Option<Msg> {
    let action = match me.kind {
        MouseEventKind::Down(MouseButton::Left) | MouseEventKind::Drag(MouseButton::Left) => {
            MouseAction::Main
        }
        MouseEventKind::Down(MouseButton::Right) | MouseEventKind::Drag(MouseButton::Right) => {
            MouseAction::Secondary
        }
        MouseEventKind::Up(MouseButton::Left | MouseButton::Right) => MouseAction::Release,
        MouseEventKind::Moved => MouseAction::Move,
        _ => return None,
    };
    Some(Msg::Mouse {
        action,
        pos: to_pixel(me.column, me.row, cell_width),
    })
}

/// A terminal back-end for pathviz using crossterm.
pub struct CrosstermDriver {
    mouse_enabled: bool,
    /// Grid cell width, learned on repaint; scales mouse positions.
    cell_width: u32,
    /// State each cell was last drawn with, to skip unchanged cells.
    drawn: Vec<Option<CellState>>,
    quit_pending: bool,
}

impl CrosstermDriver {
    /// Create a new driver.
    pub fn new() -> Self {
        Self {
            mouse_enabled: true,
            cell_width: 1,
            drawn: Vec::new(),
            quit_pending: false,
        }
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    fn translate(&mut self, ev: Event) -> Option<Msg> {
        match ev {
            Event::Key(key) => translate_key(key),
            Event::Mouse(me) => translate_mouse(me, self.cell_width),
            Event::Resize(w, h) => {
                log::debug!("terminal resized to {w}x{h}");
                // Force a full redraw on the next repaint.
                self.drawn.clear();
                let mut stdout = io::stdout();
                let _ = execute!(stdout, terminal::Clear(ClearType::All));
                None
            }
            _ => None,
        }
    }

    fn draw(&mut self, grid: &Grid) -> io::Result<()> {
        self.cell_width = grid.cell_width();
        if self.drawn.len() != grid.len() {
            self.drawn.clear();
            self.drawn.resize(grid.len(), None);
        }

        let mut out = io::stdout().lock();
        let mut dirty = false;
        for (i, cell) in grid.iter().enumerate() {
            let state = cell.state();
            if self.drawn[i] == Some(state) {
                continue;
            }
            let p = cell.pos();
            queue!(
                out,
                cursor::MoveTo(p.col as u16 * COLS_PER_CELL, p.row as u16),
                SetBackgroundColor(to_ct_color(state.color())),
                Print("  ")
            )?;
            self.drawn[i] = Some(state);
            dirty = true;
        }
        if dirty {
            queue!(out, ResetColor)?;
            out.flush()?;
        }
        Ok(())
    }
}

impl Default for CrosstermDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen for CrosstermDriver {
    fn repaint(&mut self, grid: &Grid) {
        if let Err(e) = self.draw(grid) {
            log::warn!("terminal draw failed: {e}");
        }
    }

    fn yield_frame(&mut self, grid: &Grid) -> ControlFlow<()> {
        self.repaint(grid);
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    log::warn!("terminal poll failed: {e}");
                    break;
                }
            }
            let ev = match event::read() {
                Ok(ev) => ev,
                Err(e) => {
                    log::warn!("terminal read failed: {e}");
                    break;
                }
            };
            if self.translate(ev).is_some_and(|m| m.is_quit()) {
                self.quit_pending = true;
            }
        }
        if self.quit_pending {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

impl Driver for CrosstermDriver {
    fn init(&mut self) -> Result<(), Box<dyn Error>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        self.drawn.clear();
        log::info!("terminal driver ready");
        Ok(())
    }

    fn poll_msgs(&mut self, ctx: &Context, timeout: Duration) -> Result<Vec<Msg>, Box<dyn Error>> {
        if self.quit_pending {
            return Ok(vec![Msg::Quit]);
        }
        let mut msgs = Vec::new();
        if ctx.is_done() || !event::poll(timeout)? {
            return Ok(msgs);
        }
        loop {
            let ev = event::read()?;
            if let Some(m) = self.translate(ev) {
                msgs.push(m);
            }
            if ctx.is_done() || !event::poll(Duration::ZERO)? {
                break;
            }
        }
        Ok(msgs)
    }

    fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(stdout, ResetColor, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn keys() {
        let press = |code| translate_key(KeyEvent::new(code, KeyModifiers::NONE));
        assert_eq!(press(KeyCode::Char(' ')), Some(Msg::key(Key::Space)));
        assert_eq!(press(KeyCode::Char('r')), Some(Msg::key(Key::Char('r'))));
        assert_eq!(press(KeyCode::Esc), Some(Msg::key(Key::Escape)));
        assert_eq!(press(KeyCode::Tab), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate_key(ev), Some(Msg::Quit));
    }

    #[test]
    fn quit_keys_are_recognised_mid_search() {
        let press = |code| translate_key(KeyEvent::new(code, KeyModifiers::NONE));
        assert!(press(KeyCode::Char('q')).is_some_and(|m| m.is_quit()));
        assert!(press(KeyCode::Esc).is_some_and(|m| m.is_quit()));
        assert!(!press(KeyCode::Char(' ')).is_some_and(|m| m.is_quit()));
    }

    #[test]
    fn key_release_is_ignored() {
        let mut ev = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        ev.kind = KeyEventKind::Release;
        assert_eq!(translate_key(ev), None);
    }

    #[test]
    fn mouse_maps_to_grid_pixels() {
        // Columns 6 and 7 both belong to grid column 3.
        let down = translate_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 7, 2), 16);
        assert_eq!(down, Some(Msg::mouse(MouseAction::Main, 48, 32)));

        let drag = translate_mouse(mouse(MouseEventKind::Drag(MouseButton::Right), 6, 0), 16);
        assert_eq!(drag, Some(Msg::mouse(MouseAction::Secondary, 48, 0)));

        let up = translate_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 0, 1), 16);
        assert_eq!(up, Some(Msg::mouse(MouseAction::Release, 0, 16)));

        let wheel = translate_mouse(mouse(MouseEventKind::ScrollUp, 0, 0), 16);
        assert_eq!(wheel, None);
    }

    #[test]
    fn pixel_round_trip_through_grid() {
        let grid = Grid::new(10, 8);
        let p = to_pixel(9, 5, grid.cell_width());
        assert_eq!(grid.pos_at_pixel(p), Some(pathviz_core::Pos::new(5, 4)));
    }
}
