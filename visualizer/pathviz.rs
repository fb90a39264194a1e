//! Graphical A* visualizer using winit + softbuffer.
//!
//! Run: cargo run --bin pathviz [-- config.toml]

use pathviz_visualizer::{Result, VizConfig, config_from_args, run_with};
use pathviz_winit::{WinitConfig, WinitDriver};

fn run() -> Result<()> {
    let config: VizConfig = config_from_args()?;
    let driver = WinitDriver::new(WinitConfig {
        title: config.title.clone(),
        size: config.pixel_width(),
    });
    run_with(&config, driver)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
