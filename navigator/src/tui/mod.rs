mod dialog;
mod input;
mod jobs;
mod navigator_view;
mod state;
mod utility;

use self::state::ExitSignal;
use anyhow::Result;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use std::io;
use toolbox::{config::Paths, Catalog};
use tui::backend::CrosstermBackend;

type Backend = tui::backend::CrosstermBackend<io::Stdout>;
type Terminal = tui::Terminal<Backend>;
type Frame<'a> = tui::Frame<'a, Backend>;

pub fn launch(paths: Paths) -> Result<()> {
    // load before touching the terminal, so a broken catalog is reported on a sane screen
    let catalog = Catalog::builtin()?;

    // setup terminal environment
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut term = Terminal::new(backend)?;

    // start the business logic
    let result = navigator_view::navigator_view(&mut term, catalog, paths);

    // display error if one occurred
    if let Err(e) = result {
        if !e.is::<ExitSignal>() {
            log::error!("{e:#}");
            if let Err(fatal) = dialog::fatal(&mut term, e.to_string()) {
                log::error!("could not show the error message: {fatal}");
            }
        }
    }

    // restore terminal environment
    terminal::disable_raw_mode()?;
    crossterm::execute!(term.backend_mut(), LeaveAlternateScreen)?;
    term.show_cursor()?;

    log::info!("Stopped");
    Ok(())
}
