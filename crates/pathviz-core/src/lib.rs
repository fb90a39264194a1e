//! **pathviz-core**: data model and application loop for the pathviz
//! A* visualizer.
//!
//! This crate provides the types shared by the search engine and the
//! presentation backends: grid positions, [`Cell`]s with their
//! classification state, the owning [`Grid`], input messages, and the
//! single-threaded [`App`] loop with its [`Model`] / [`Driver`] seams.

pub mod app;
pub mod cell;
pub mod geom;
pub mod grid;
pub mod messages;
pub mod style;

pub use app::{App, Context, Driver, Effect, Model, Screen};
pub use cell::{Cell, CellState};
pub use geom::{Point, Pos};
pub use grid::{DEFAULT_SIZE, Grid, ParseGridError, ParsedGrid};
pub use messages::*;
pub use style::{Color, GRID_LINE};
