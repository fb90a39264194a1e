//! Interactive A* visualizer shared by the window and terminal front ends.
//!
//! Mouse: left click places the start, then the end, then barriers (drag to
//! paint); right click erases. Keys: space searches, `c` clears the search
//! marks, `r` resets the grid, `q` or Escape quits.

pub mod config;
mod editor;
pub mod error;

pub use config::{DEFAULT_CONFIG_FILE, MAX_ROWS, VizConfig};
pub use editor::{Editor, NullScreen};
pub use error::{Result, VizError};

use pathviz_core::{App, Driver};

/// Build an [`Editor`] from `config` and run it on `driver` until the user
/// quits.
pub fn run_with<D: Driver>(config: &VizConfig, driver: D) -> Result<()> {
    let editor = Editor::from_config(config);
    let mut app = App::new(editor, driver);
    app.run()?;
    Ok(())
}

/// Resolve the configuration from the first command-line argument.
pub fn config_from_args() -> Result<VizConfig> {
    VizConfig::discover(std::env::args_os().nth(1).map(Into::into))
}
