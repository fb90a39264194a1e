//! Instrumented A* search over a [`pathviz_core::Grid`].
//!
//! The engine expands cells in order of `f = g + h`, with `h` the
//! [`manhattan`] distance to the goal and unit cost per move. Ties on `f` are
//! broken by insertion order, so a given layout always expands the same way.
//!
//! Progress is observable in two ways:
//!
//! - [`search`] / [`run`] drive the whole search and call back after every
//!   expansion and every path marking, letting the caller repaint.
//! - [`AstarSearch::step`] advances one unit at a time for callers that own
//!   their own loop.
//!
//! ```
//! use std::ops::ControlFlow;
//! use pathviz_core::Grid;
//!
//! let parsed = Grid::parse("S#.\n.#.\n..E").unwrap();
//! let mut grid = parsed.grid;
//! grid.refresh_neighbors();
//! let mut frames = 0;
//! let found = pathviz_paths::search(
//!     &mut grid,
//!     parsed.start.unwrap(),
//!     parsed.end.unwrap(),
//!     |_| {
//!         frames += 1;
//!         ControlFlow::Continue(())
//!     },
//! );
//! assert!(found);
//! assert!(frames > 0);
//! ```

mod astar;
mod distance;
mod frontier;

pub use astar::{AstarSearch, Outcome, Step, run, search};
pub use distance::manhattan;

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn outcome_round_trip() {
        let json = serde_json::to_string(&Outcome::Unreachable).unwrap();
        let back: Outcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Outcome::Unreachable);
    }

    #[test]
    fn step_carries_position() {
        let step = Step::PathMarked(pathviz_core::Pos::new(2, 3));
        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(json, r#"{"PathMarked":{"row":2,"col":3}}"#);
    }
}
