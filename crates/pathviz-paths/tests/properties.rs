//! Property tests for the A* engine: optimality on open grids and on random
//! barrier layouts, closed-set bookkeeping on failure, and determinism.

use std::collections::VecDeque;
use std::ops::ControlFlow;

use pathviz_core::{CellState, Grid, Pos};
use pathviz_paths::{AstarSearch, Outcome, manhattan, run};
use proptest::prelude::*;

fn go(_: &Grid) -> ControlFlow<()> {
    ControlFlow::Continue(())
}

/// Unit-cost breadth-first distance, used as an oracle.
fn bfs_distance(grid: &Grid, start: Pos, end: Pos) -> Option<usize> {
    let n = grid.size();
    let mut dist = vec![usize::MAX; n * n];
    let mut queue = VecDeque::new();
    dist[grid.index(start)?] = 0;
    queue.push_back(start);
    while let Some(p) = queue.pop_front() {
        if p == end {
            return Some(dist[grid.index(p)?]);
        }
        let d = dist[grid.index(p)?];
        for q in p.neighbors_4(n) {
            let qi = grid.index(q)?;
            if grid.at(q)?.is_barrier() || dist[qi] != usize::MAX {
                continue;
            }
            dist[qi] = d + 1;
            queue.push_back(q);
        }
    }
    None
}

/// A grid with random barriers and distinct start/end cells.
fn layout() -> impl Strategy<Value = (Grid, Pos, Pos)> {
    (2usize..12)
        .prop_flat_map(|n| {
            (
                Just(n),
                proptest::collection::vec(proptest::bool::weighted(0.3), n * n),
                0..n * n,
                0..n * n,
            )
        })
        .prop_filter("start and end must differ", |(_, _, s, e)| s != e)
        .prop_map(|(n, walls, s, e)| {
            let mut grid = Grid::new(n, 1);
            for (i, wall) in walls.into_iter().enumerate() {
                if wall {
                    grid.set_state(grid.pos(i), CellState::Barrier);
                }
            }
            let (start, end) = (grid.pos(s), grid.pos(e));
            grid.set_state(start, CellState::Start);
            grid.set_state(end, CellState::End);
            grid.refresh_neighbors();
            (grid, start, end)
        })
}

fn open_layout() -> impl Strategy<Value = (usize, Pos, Pos)> {
    (2usize..16)
        .prop_flat_map(|n| (Just(n), 0..n, 0..n, 0..n, 0..n))
        .prop_filter("start and end must differ", |(_, r1, c1, r2, c2)| {
            (r1, c1) != (r2, c2)
        })
        .prop_map(|(n, r1, c1, r2, c2)| (n, Pos::new(r1, c1), Pos::new(r2, c2)))
}

proptest! {
    #[test]
    fn open_grid_path_has_manhattan_length((n, start, end) in open_layout()) {
        let mut grid = Grid::new(n, 1);
        grid.set_state(start, CellState::Start);
        grid.set_state(end, CellState::End);
        grid.refresh_neighbors();

        let mut search = AstarSearch::new(&grid, start, end);
        prop_assert_eq!(search.run(&mut grid, go), Outcome::Found);
        let expected = manhattan(start, end) as usize;
        prop_assert_eq!(grid.count(CellState::Path), expected - 1);
        prop_assert_eq!(search.g_score(end), Some(expected as u32));
    }

    #[test]
    fn matches_breadth_first_oracle((mut grid, start, end) in layout()) {
        let oracle = bfs_distance(&grid, start, end);
        let mut search = AstarSearch::new(&grid, start, end);
        let outcome = search.run(&mut grid, go);

        match oracle {
            Some(d) => {
                prop_assert_eq!(outcome, Outcome::Found);
                let path = search.path().unwrap();
                prop_assert_eq!(path.len(), d + 1);
                prop_assert_eq!(path[0], start);
                prop_assert_eq!(*path.last().unwrap(), end);
                for w in path.windows(2) {
                    prop_assert_eq!(manhattan(w[0], w[1]), 1);
                }
                for p in &path[1..path.len() - 1] {
                    prop_assert!(grid.at(*p).unwrap().is_path());
                }
                prop_assert_eq!(grid.count(CellState::Path), d - 1);
            }
            None => {
                prop_assert_eq!(outcome, Outcome::Unreachable);
                prop_assert_eq!(grid.count(CellState::Path), 0);
                prop_assert_eq!(grid.count(CellState::Open), 0);
                // Everything expanded, bar the start, ends up closed.
                for p in &search.expanded()[1..] {
                    prop_assert!(grid.at(*p).unwrap().is_closed());
                }
            }
        }
        prop_assert!(grid.at(start).unwrap().is_start());
        prop_assert!(grid.at(end).unwrap().is_end());
    }

    #[test]
    fn rerun_is_deterministic((mut grid, start, end) in layout()) {
        let original = grid.clone();
        let mut first = AstarSearch::new(&grid, start, end);
        let first_outcome = first.run(&mut grid, go);
        let first_state = grid.to_string();

        let mut grid = original;
        let mut second = AstarSearch::new(&grid, start, end);
        prop_assert_eq!(second.run(&mut grid, go), first_outcome);
        prop_assert_eq!(first.expanded(), second.expanded());
        prop_assert_eq!(first.path(), second.path());
        prop_assert_eq!(first_state, grid.to_string());
    }

    #[test]
    fn barriers_are_never_touched((mut grid, start, end) in layout()) {
        let walls = grid.count(CellState::Barrier);
        run(&mut grid, start, end, go);
        prop_assert_eq!(grid.count(CellState::Barrier), walls);
    }
}

#[test]
fn enclosed_end_leaves_reachable_cells_closed() {
    let parsed = Grid::parse(
        "S....
         .....
         ..###
         ..#E#
         ..###",
    )
    .unwrap();
    let mut grid = parsed.grid;
    grid.refresh_neighbors();
    let (start, end) = (parsed.start.unwrap(), parsed.end.unwrap());

    assert_eq!(run(&mut grid, start, end, go), Outcome::Unreachable);
    for cell in grid.iter() {
        assert!(
            matches!(
                cell.state(),
                CellState::Closed | CellState::Empty | CellState::Barrier | CellState::Start | CellState::End
            ),
            "{} left as {:?}",
            cell.pos(),
            cell.state()
        );
    }
    // 25 cells - 8 walls - end - start.
    assert_eq!(grid.count(CellState::Closed), 15);
}
