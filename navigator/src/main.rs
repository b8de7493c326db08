//! This is the terminal front-end of the DevToolbox Navigator. It is normally started by the
//! `devtoolbox` launcher from `bin/navigator` and offers:
//! * Python installers for each supported architecture,
//! * a searchable catalog of popular pip libraries, installed with `pip install`,
//! * installers for common desktop applications,
//! * information about the package.
//!
//! The terminal belongs to the interface, so the log goes to `navigator.log` next to the
//! executable. Set `RUST_LOG` to change its verbosity.

mod tui;

use anyhow::Result;
use log::LevelFilter;
use std::fs::OpenOptions;
use toolbox::config::Paths;

fn main() -> Result<()> {
    let paths = Paths::locate();
    init_logging(&paths);

    log::info!("Navigator -- MIT LICENSE");
    log::info!("Starting...");
    log::debug!("installed in {}, executables in {}", paths.root().display(), paths.bin().display());
    tui::launch(paths)
}

fn init_logging(paths: &Paths) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .parse_default_env();

    let log_file = paths.log_file("navigator");
    match OpenOptions::new().create(true).append(true).open(&log_file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // without a writable log file, stay silent rather than draw over the interface
        Err(_) => {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.init();
}
