//! This is the entry point of the DevToolbox program. Run without a command it points out the
//! missing command and opens the Navigator, the terminal interface found at `bin/navigator`.
//! Commands are not implemented yet and are rejected with exit code 2.

use std::{env, io, process};
use toolbox::{
    launcher::{self, Launcher},
    spawn::ProcessSpawner,
};

fn main() {
    env_logger::init();

    let mut args = env::args();
    let program_name = launcher::program_name(args.next().as_deref());
    let args: Vec<String> = args.collect();

    let stdout = io::stdout();
    let code = Launcher::new(program_name, stdout.lock(), ProcessSpawner).run(&args);

    process::exit(code)
}
