//! The [`Cell`] type: one grid location with a classification state and a
//! cached neighbour list.

use crate::geom::Pos;
use crate::grid::Grid;

/// Classification of a cell. Drives both traversal and rendering.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Empty,
    /// Discovered, waiting in the frontier.
    Open,
    /// Fully expanded.
    Closed,
    Barrier,
    Start,
    End,
    Path,
}

/// A single grid location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pos: Pos,
    state: CellState,
    neighbors: Vec<Pos>,
}

impl Cell {
    /// Create an empty cell at `pos` with no cached neighbours.
    #[inline]
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            state: CellState::Empty,
            neighbors: Vec::new(),
        }
    }

    #[inline]
    pub fn pos(&self) -> Pos {
        self.pos
    }

    #[inline]
    pub fn state(&self) -> CellState {
        self.state
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state == CellState::Empty
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == CellState::Open
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.state == CellState::Closed
    }

    #[inline]
    pub fn is_barrier(&self) -> bool {
        self.state == CellState::Barrier
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        self.state == CellState::Start
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.state == CellState::End
    }

    #[inline]
    pub fn is_path(&self) -> bool {
        self.state == CellState::Path
    }

    #[inline]
    pub fn set_state(&mut self, state: CellState) {
        self.state = state;
    }

    #[inline]
    pub fn reset(&mut self) {
        self.state = CellState::Empty;
    }

    #[inline]
    pub fn make_open(&mut self) {
        self.state = CellState::Open;
    }

    #[inline]
    pub fn make_closed(&mut self) {
        self.state = CellState::Closed;
    }

    #[inline]
    pub fn make_barrier(&mut self) {
        self.state = CellState::Barrier;
    }

    #[inline]
    pub fn make_start(&mut self) {
        self.state = CellState::Start;
    }

    #[inline]
    pub fn make_end(&mut self) {
        self.state = CellState::End;
    }

    #[inline]
    pub fn make_path(&mut self) {
        self.state = CellState::Path;
    }

    /// Cached traversable neighbours, as of the last refresh.
    #[inline]
    pub fn neighbors(&self) -> &[Pos] {
        &self.neighbors
    }

    /// Recompute the neighbour cache against `grid`: the in-bounds cardinal
    /// cells that are not barriers, ordered down, up, left, right.
    ///
    /// `grid` is normally the grid owning this cell; see
    /// [`Grid::refresh_neighbors`] for the bulk version.
    pub fn update_neighbors(&mut self, grid: &Grid) {
        self.neighbors = traversable_neighbors(self.pos, grid);
    }

    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<Pos>) {
        self.neighbors = neighbors;
    }
}

pub(crate) fn traversable_neighbors(pos: Pos, grid: &Grid) -> Vec<Pos> {
    pos.neighbors_4(grid.size())
        .filter(|&p| grid.at(p).is_some_and(|c| !c.is_barrier()))
        .collect()
}
