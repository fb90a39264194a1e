//! Terminal A* visualizer using crossterm.
//!
//! Each cell takes two columns, so the terminal needs `2 * rows` columns.
//! Logs go to stderr; redirect it to keep the screen clean.
//!
//! Run: cargo run --bin pathviz-term [-- config.toml] 2>pathviz.log

use pathviz_crossterm::CrosstermDriver;
use pathviz_visualizer::{Result, config_from_args, run_with};

fn run() -> Result<()> {
    let config = config_from_args()?;
    run_with(&config, CrosstermDriver::new())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
