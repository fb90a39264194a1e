use std::ops::ControlFlow;

use log::{debug, trace};
use pathviz_core::{CellState, Grid, Pos};

use crate::distance::manhattan;
use crate::frontier::{Frontier, NO_PARENT, Node, UNREACHABLE};

/// Final result of a search run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// The end cell was reached and the path has been marked.
    Found,
    /// The frontier emptied without reaching the end cell.
    Unreachable,
    /// The step callback asked to stop.
    Cancelled,
}

impl Outcome {
    #[inline]
    pub fn is_found(self) -> bool {
        self == Outcome::Found
    }
}

/// One unit of progress reported by [`AstarSearch::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// A cell was taken from the frontier and its neighbours relaxed.
    Expanded(Pos),
    /// A cell on the reconstructed path was marked.
    PathMarked(Pos),
    /// The search finished successfully.
    Found,
    /// The search finished without reaching the end.
    Exhausted,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Expanding,
    Tracing { cursor: usize },
    Done,
}

/// Incremental A* search from `start` to `end` over a [`Grid`].
///
/// The search reads each cell's cached neighbour list, so the grid's
/// neighbour caches must be refreshed (see [`Grid::refresh_neighbors`])
/// before the first [`step`](AstarSearch::step). Every step mutates cell
/// states: discovered cells become [`Open`](CellState::Open), expanded cells
/// [`Closed`](CellState::Closed), and the final route
/// [`Path`](CellState::Path). The start and end cells keep their states:
/// the end cell enters the frontier like any other but is never painted
/// Open, so its marker stays visible for the whole run.
pub struct AstarSearch {
    size: usize,
    start: usize,
    end: usize,
    end_pos: Pos,
    nodes: Vec<Node>,
    frontier: Frontier,
    pending_close: Option<usize>,
    phase: Phase,
    outcome: Option<Outcome>,
    expanded: Vec<Pos>,
    nbuf: Vec<Pos>,
}

impl AstarSearch {
    /// Prepare a search on `grid`. If `start` or `end` is outside the grid
    /// the search is already finished as [`Outcome::Unreachable`].
    pub fn new(grid: &Grid, start: Pos, end: Pos) -> Self {
        let len = grid.len();
        let mut search = Self {
            size: grid.size(),
            start: NO_PARENT,
            end: NO_PARENT,
            end_pos: end,
            nodes: vec![Node::default(); len],
            frontier: Frontier::new(len),
            pending_close: None,
            phase: Phase::Done,
            outcome: Some(Outcome::Unreachable),
            expanded: Vec::new(),
            nbuf: Vec::with_capacity(4),
        };

        let (Some(si), Some(ei)) = (grid.index(start), grid.index(end)) else {
            debug!("astar: endpoint outside the {0}x{0} grid", grid.size());
            return search;
        };

        search.start = si;
        search.end = ei;
        search.phase = Phase::Expanding;
        search.outcome = None;

        let h = manhattan(start, end);
        search.nodes[si] = Node {
            g: 0,
            f: h,
            parent: NO_PARENT,
        };
        search.frontier.push(si, h);
        debug!("astar: {start} -> {end}, heuristic {h}");
        search
    }

    /// Advance by one callback-visible unit of work.
    ///
    /// Once finished, further calls keep returning the terminal step.
    pub fn step(&mut self, grid: &mut Grid) -> Step {
        debug_assert_eq!(grid.size(), self.size, "grid changed size mid-search");
        match self.phase {
            Phase::Done => match self.outcome {
                Some(Outcome::Found) => Step::Found,
                _ => Step::Exhausted,
            },
            Phase::Tracing { cursor } => self.trace(grid, cursor),
            Phase::Expanding => self.expand(grid),
        }
    }

    fn expand(&mut self, grid: &mut Grid) -> Step {
        // The previous expansion is finalised only now, so that the step
        // callback saw it as it was while being expanded.
        if let Some(ci) = self.pending_close.take() {
            grid.set_state(grid.pos(ci), CellState::Closed);
        }

        let Some(entry) = self.frontier.pop() else {
            self.finish(Outcome::Unreachable);
            return Step::Exhausted;
        };
        let ci = entry.idx;

        if ci == self.end {
            return self.trace(grid, ci);
        }

        let cp = grid.pos(ci);
        let current_g = self.nodes[ci].g;
        self.expanded.push(cp);
        trace!("astar: expand {cp} g={current_g} f={}", entry.f);

        let mut nbuf = std::mem::take(&mut self.nbuf);
        nbuf.clear();
        if let Some(cell) = grid.at(cp) {
            nbuf.extend_from_slice(cell.neighbors());
        }

        for &np in nbuf.iter() {
            let Some(ni) = grid.index(np) else {
                continue;
            };
            let tentative_g = current_g + 1;
            let n = &mut self.nodes[ni];
            if tentative_g >= n.g {
                continue;
            }
            n.g = tentative_g;
            n.f = tentative_g + manhattan(np, self.end_pos);
            n.parent = ci;

            if !self.frontier.contains(ni) {
                self.frontier.push(ni, n.f);
                if ni != self.end {
                    grid.set_state(np, CellState::Open);
                }
            }
        }
        self.nbuf = nbuf;

        if ci != self.start {
            self.pending_close = Some(ci);
        }
        Step::Expanded(cp)
    }

    /// Mark the predecessor of `cursor` as path, or finish once it is the
    /// start cell.
    fn trace(&mut self, grid: &mut Grid, cursor: usize) -> Step {
        let pred = self.nodes[cursor].parent;
        if pred == NO_PARENT || pred == self.start {
            self.finish(Outcome::Found);
            return Step::Found;
        }
        let pp = grid.pos(pred);
        grid.set_state(pp, CellState::Path);
        self.phase = Phase::Tracing { cursor: pred };
        Step::PathMarked(pp)
    }

    fn finish(&mut self, outcome: Outcome) {
        self.phase = Phase::Done;
        self.outcome = Some(outcome);
        debug!(
            "astar: {outcome:?} after {} expansions, {} left in frontier",
            self.expanded.len(),
            self.frontier.len()
        );
    }

    /// Drive the search to completion, calling `on_step` after every
    /// expansion and every path marking. Returning `Break` from `on_step`
    /// abandons the search; cells keep whatever state they reached.
    pub fn run<F>(&mut self, grid: &mut Grid, mut on_step: F) -> Outcome
    where
        F: FnMut(&Grid) -> ControlFlow<()>,
    {
        loop {
            match self.step(grid) {
                Step::Expanded(_) | Step::PathMarked(_) => {
                    if on_step(grid).is_break() {
                        // The step that was just reported still completes.
                        if let Some(ci) = self.pending_close.take() {
                            grid.set_state(grid.pos(ci), CellState::Closed);
                        }
                        self.finish(Outcome::Cancelled);
                        return Outcome::Cancelled;
                    }
                }
                Step::Found => return Outcome::Found,
                Step::Exhausted => return self.outcome.unwrap_or(Outcome::Unreachable),
            }
        }
    }

    /// The outcome, once the search has finished.
    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Done)
    }

    /// Best known cost from the start to `p`, or `None` if not reached.
    pub fn g_score(&self, p: Pos) -> Option<u32> {
        let i = self.index(p)?;
        let g = self.nodes[i].g;
        (g != UNREACHABLE).then_some(g)
    }

    /// Estimated total cost through `p`, or `None` if not reached.
    pub fn f_score(&self, p: Pos) -> Option<u32> {
        let i = self.index(p)?;
        let f = self.nodes[i].f;
        (f != UNREACHABLE).then_some(f)
    }

    /// Predecessor of `p` on its best known route.
    pub fn came_from(&self, p: Pos) -> Option<Pos> {
        let i = self.index(p)?;
        let parent = self.nodes[i].parent;
        (parent != NO_PARENT).then(|| self.pos(parent))
    }

    /// Cells in the order they were expanded. The end cell is not included.
    #[inline]
    pub fn expanded(&self) -> &[Pos] {
        &self.expanded
    }

    /// The route from start to end, both included, once found.
    pub fn path(&self) -> Option<Vec<Pos>> {
        if self.outcome != Some(Outcome::Found) {
            return None;
        }
        let mut path = Vec::new();
        let mut ci = self.end;
        while ci != NO_PARENT {
            path.push(self.pos(ci));
            ci = self.nodes[ci].parent;
        }
        path.reverse();
        Some(path)
    }

    #[inline]
    fn index(&self, p: Pos) -> Option<usize> {
        (p.row < self.size && p.col < self.size).then(|| p.row * self.size + p.col)
    }

    #[inline]
    fn pos(&self, idx: usize) -> Pos {
        Pos::new(idx / self.size, idx % self.size)
    }
}

/// Run A* from `start` to `end`, calling `on_step` after every expansion and
/// every path marking.
///
/// The grid's neighbour caches must have been refreshed against the current
/// barriers.
pub fn run<F>(grid: &mut Grid, start: Pos, end: Pos, on_step: F) -> Outcome
where
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    AstarSearch::new(grid, start, end).run(grid, on_step)
}

/// Like [`run`], reporting only whether the end was reached.
pub fn search<F>(grid: &mut Grid, start: Pos, end: Pos, on_step: F) -> bool
where
    F: FnMut(&Grid) -> ControlFlow<()>,
{
    run(grid, start, end, on_step).is_found()
}
