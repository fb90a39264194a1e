//! The [`Grid`] type: an owning N×N matrix of [`Cell`]s.
//!
//! Cells are stored row-major in a flat `Vec`; the flat index
//! `row * size + col` is a stable identity for the lifetime of the grid and
//! is what the search engine keys its bookkeeping on.

use std::fmt;

use thiserror::Error;

use crate::cell::{Cell, CellState, traversable_neighbors};
use crate::geom::{Point, Pos};

/// Default number of rows (and columns).
pub const DEFAULT_SIZE: usize = 50;

/// Errors produced by [`Grid::parse`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseGridError {
    #[error("layout has no rows")]
    Empty,
    #[error("layout is not square: row {row} has {len} cells, expected {expected}")]
    NotSquare { row: usize, len: usize, expected: usize },
    #[error("unknown glyph {glyph:?} at {pos}")]
    UnknownGlyph { glyph: char, pos: Pos },
    #[error("second start cell at {0}")]
    DuplicateStart(Pos),
    #[error("second end cell at {0}")]
    DuplicateEnd(Pos),
}

/// A grid parsed from text, with the start and end cells it names.
#[derive(Debug, Clone)]
pub struct ParsedGrid {
    pub grid: Grid,
    pub start: Option<Pos>,
    pub end: Option<Pos>,
}

/// A square grid of cells, `size` × `size`, each `cell_width` pixels wide.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cell_width: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a `size`×`size` grid of empty cells.
    ///
    /// # Panics
    ///
    /// If `size` is zero.
    pub fn new(size: usize, cell_width: u32) -> Self {
        assert!(size > 0, "grid size must be positive");
        let cells = (0..size * size)
            .map(|i| Cell::new(Pos::new(i / size, i % size)))
            .collect();
        Self {
            size,
            cell_width: cell_width.max(1),
            cells,
        }
    }

    /// Create a grid that fills a square surface `width` pixels across.
    /// Each cell is `width / size` pixels wide.
    pub fn with_pixel_width(size: usize, width: u32) -> Self {
        let gap = width / size.max(1) as u32;
        Self::new(size, gap)
    }

    /// Number of rows, which is also the number of columns.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Width (and height) of one cell in pixels.
    #[inline]
    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    /// Width (and height) of the whole grid in pixels.
    #[inline]
    pub fn pixel_width(&self) -> u32 {
        self.cell_width * self.size as u32
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`; a grid has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    pub fn contains(&self, p: Pos) -> bool {
        p.row < self.size && p.col < self.size
    }

    /// Flat index of `p`, or `None` if it is out of bounds.
    #[inline]
    pub fn index(&self, p: Pos) -> Option<usize> {
        self.contains(p).then(|| p.row * self.size + p.col)
    }

    /// Position of the flat index `idx`.
    #[inline]
    pub fn pos(&self, idx: usize) -> Pos {
        Pos::new(idx / self.size, idx % self.size)
    }

    #[inline]
    pub fn at(&self, p: Pos) -> Option<&Cell> {
        self.index(p).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn at_mut(&mut self, p: Pos) -> Option<&mut Cell> {
        self.index(p).map(|i| &mut self.cells[i])
    }

    /// Look up a cell by row and column.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.at(Pos::new(row, col))
    }

    /// State of the cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn state(&self, p: Pos) -> Option<CellState> {
        self.at(p).map(Cell::state)
    }

    /// Set the state of the cell at `p`. No-op if `p` is out of bounds.
    pub fn set_state(&mut self, p: Pos, state: CellState) {
        if let Some(c) = self.at_mut(p) {
            c.set_state(state);
        }
    }

    /// Row-major iterator over all cells.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Row-major mutable iterator over all cells.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Cell> {
        self.cells.iter_mut()
    }

    /// Recompute every cell's neighbour cache from the current barriers.
    pub fn refresh_neighbors(&mut self) {
        let lists: Vec<Vec<Pos>> = self
            .cells
            .iter()
            .map(|c| traversable_neighbors(c.pos(), self))
            .collect();
        for (cell, list) in self.cells.iter_mut().zip(lists) {
            cell.set_neighbors(list);
        }
        log::debug!("refreshed neighbour caches for {} cells", self.cells.len());
    }

    /// Reset every cell to [`CellState::Empty`].
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(Cell::reset);
    }

    /// Turn open, closed and path cells back to empty, keeping the start,
    /// end and barriers.
    pub fn clear_search(&mut self) {
        for c in &mut self.cells {
            if matches!(
                c.state(),
                CellState::Open | CellState::Closed | CellState::Path
            ) {
                c.reset();
            }
        }
    }

    /// Number of cells currently in `state`.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|c| c.state() == state).count()
    }

    /// Map a pixel coordinate to the cell containing it.
    ///
    /// The caller guarantees `0 <= p < pixel_width()` on both axes; use
    /// [`pos_at_pixel`](Grid::pos_at_pixel) when that is not known.
    #[inline]
    pub fn pixel_to_pos(&self, p: Point) -> Pos {
        let w = self.cell_width as i32;
        Pos::new((p.y / w) as usize, (p.x / w) as usize)
    }

    /// Like [`pixel_to_pos`](Grid::pixel_to_pos), but `None` outside the grid.
    pub fn pos_at_pixel(&self, p: Point) -> Option<Pos> {
        let limit = self.pixel_width() as i32;
        if p.x < 0 || p.y < 0 || p.x >= limit || p.y >= limit {
            return None;
        }
        Some(self.pixel_to_pos(p))
    }

    /// Top-left pixel of the cell at `p`.
    #[inline]
    pub fn pixel_origin(&self, p: Pos) -> Point {
        let w = self.cell_width as i32;
        Point::new(p.col as i32 * w, p.row as i32 * w)
    }

    /// Build a grid from an ASCII layout, one line per row.
    ///
    /// Glyphs: `.` empty, `#` barrier, `S` start, `E` end, `o` open,
    /// `x` closed, `*` path. Surrounding whitespace and blank lines are
    /// ignored. Cells are one pixel wide.
    pub fn parse(text: &str) -> Result<ParsedGrid, ParseGridError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let size = rows.len();
        if size == 0 {
            return Err(ParseGridError::Empty);
        }

        let mut grid = Grid::new(size, 1);
        let mut start = None;
        let mut end = None;
        for (r, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != size {
                return Err(ParseGridError::NotSquare {
                    row: r,
                    len,
                    expected: size,
                });
            }
            for (c, glyph) in line.chars().enumerate() {
                let pos = Pos::new(r, c);
                let state = state_for_glyph(glyph)
                    .ok_or(ParseGridError::UnknownGlyph { glyph, pos })?;
                match state {
                    CellState::Start if start.is_some() => {
                        return Err(ParseGridError::DuplicateStart(pos));
                    }
                    CellState::End if end.is_some() => {
                        return Err(ParseGridError::DuplicateEnd(pos));
                    }
                    CellState::Start => start = Some(pos),
                    CellState::End => end = Some(pos),
                    _ => {}
                }
                grid.set_state(pos, state);
            }
        }
        Ok(ParsedGrid { grid, start, end })
    }
}

fn state_for_glyph(glyph: char) -> Option<CellState> {
    Some(match glyph {
        '.' => CellState::Empty,
        '#' => CellState::Barrier,
        'S' => CellState::Start,
        'E' => CellState::End,
        'o' => CellState::Open,
        'x' => CellState::Closed,
        '*' => CellState::Path,
        _ => return None,
    })
}

fn glyph_for_state(state: CellState) -> char {
    match state {
        CellState::Empty => '.',
        CellState::Barrier => '#',
        CellState::Start => 'S',
        CellState::End => 'E',
        CellState::Open => 'o',
        CellState::Closed => 'x',
        CellState::Path => '*',
    }
}

impl fmt::Display for Grid {
    /// Renders the layout with the glyphs accepted by [`Grid::parse`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.size) {
            for c in row {
                write!(f, "{}", glyph_for_state(c.state()))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_new_layout() {
        let g = Grid::new(4, 10);
        assert_eq!(g.len(), 16);
        assert_eq!(g.pixel_width(), 40);
        for (i, c) in g.iter().enumerate() {
            assert_eq!(c.pos(), g.pos(i));
            assert_eq!(g.index(c.pos()), Some(i));
            assert!(c.is_empty());
        }
        assert!(g.at(Pos::new(4, 0)).is_none());
        assert!(g.get(0, 4).is_none());
    }

    #[test]
    fn with_pixel_width_divides() {
        let g = Grid::with_pixel_width(50, 800);
        assert_eq!(g.size(), 50);
        assert_eq!(g.cell_width(), 16);
    }

    #[test]
    fn pixel_mapping() {
        let g = Grid::new(5, 16);
        assert_eq!(g.pixel_to_pos(Point::new(0, 0)), Pos::new(0, 0));
        assert_eq!(g.pixel_to_pos(Point::new(15, 15)), Pos::new(0, 0));
        assert_eq!(g.pixel_to_pos(Point::new(16, 0)), Pos::new(0, 1));
        assert_eq!(g.pixel_to_pos(Point::new(33, 70)), Pos::new(4, 2));
        assert_eq!(g.pixel_origin(Pos::new(4, 2)), Point::new(32, 64));
    }

    #[test]
    fn pos_at_pixel_rejects_outside() {
        let g = Grid::new(5, 16);
        assert_eq!(g.pos_at_pixel(Point::new(79, 79)), Some(Pos::new(4, 4)));
        assert_eq!(g.pos_at_pixel(Point::new(80, 0)), None);
        assert_eq!(g.pos_at_pixel(Point::new(0, -1)), None);
    }

    #[test]
    fn refresh_excludes_barriers_everywhere() {
        let mut g = Grid::parse(
            "...
             .#.
             ...",
        )
        .unwrap()
        .grid;
        g.refresh_neighbors();
        let wall = Pos::new(1, 1);
        for c in g.iter() {
            assert!(!c.neighbors().contains(&wall), "{} lists the wall", c.pos());
        }
        assert_eq!(
            g.at(Pos::new(0, 1)).unwrap().neighbors(),
            &[Pos::new(0, 0), Pos::new(0, 2)]
        );
    }

    #[test]
    fn neighbor_cache_is_a_snapshot() {
        let mut g = Grid::new(3, 1);
        g.refresh_neighbors();
        g.set_state(Pos::new(1, 0), CellState::Barrier);
        // Not refreshed yet: still lists the new barrier.
        assert!(g.at(Pos::new(0, 0)).unwrap().neighbors().contains(&Pos::new(1, 0)));
        g.refresh_neighbors();
        assert!(!g.at(Pos::new(0, 0)).unwrap().neighbors().contains(&Pos::new(1, 0)));
    }

    #[test]
    fn reset_and_clear_search() {
        let mut g = Grid::parse(
            "So#
             x*.
             ..E",
        )
        .unwrap()
        .grid;
        g.clear_search();
        assert_eq!(g.to_string(), "S.#\n...\n..E\n");
        g.reset();
        assert_eq!(g.count(CellState::Empty), 9);
    }

    #[test]
    fn parse_reports_endpoints() {
        let parsed = Grid::parse("S.\n.E").unwrap();
        assert_eq!(parsed.start, Some(Pos::new(0, 0)));
        assert_eq!(parsed.end, Some(Pos::new(1, 1)));
        assert!(parsed.grid.at(Pos::new(1, 1)).unwrap().is_end());
    }

    #[test]
    fn parse_errors() {
        assert_eq!(Grid::parse("  \n").unwrap_err(), ParseGridError::Empty);
        assert_eq!(
            Grid::parse("..\n.").unwrap_err(),
            ParseGridError::NotSquare {
                row: 1,
                len: 1,
                expected: 2
            }
        );
        assert_eq!(
            Grid::parse(".?\n..").unwrap_err(),
            ParseGridError::UnknownGlyph {
                glyph: '?',
                pos: Pos::new(0, 1)
            }
        );
        assert_eq!(
            Grid::parse("SS\n..").unwrap_err(),
            ParseGridError::DuplicateStart(Pos::new(0, 1))
        );
        assert_eq!(
            Grid::parse("E.\n.E").unwrap_err(),
            ParseGridError::DuplicateEnd(Pos::new(1, 1))
        );
    }

    #[test]
    #[should_panic]
    fn zero_size_panics() {
        let _ = Grid::new(0, 1);
    }
}
