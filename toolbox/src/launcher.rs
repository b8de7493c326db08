//! The entry point logic of the `devtoolbox` executable.
//!
//! Without a command the launcher prints a usage hint and starts the Navigator. No commands are
//! implemented yet, so any command is reported as such and rejected with [EXIT_USAGE].

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    result::*,
    spawn::Spawner,
};

/// Location of the Navigator executable, relative to the working directory.
pub const NAVIGATOR: &str = "bin/navigator";

/// Program name used in the usage hint when none can be derived from the invocation.
pub const DEFAULT_PROGRAM_NAME: &str = "devtoolbox";

/// Exit code of a successful run.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when a command was given, since none is implemented.
pub const EXIT_USAGE: i32 = 2;

/// Returns the path of the Navigator executable including the host's executable suffix.
pub fn navigator_path() -> PathBuf {
    PathBuf::from(format!("{NAVIGATOR}{}", std::env::consts::EXE_SUFFIX))
}

/// Derives the program name shown in the usage hint from `argv[0]`.
pub fn program_name(argv0: Option<&str>) -> String {
    argv0
        .and_then(|arg| Path::new(arg).file_stem())
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or(DEFAULT_PROGRAM_NAME)
        .to_owned()
}

/// Writes diagnostics to `out` and starts the Navigator through `spawner`.
pub struct Launcher<W: Write, S: Spawner> {
    program_name: String,
    out: W,
    spawner: S,
}

impl<W: Write, S: Spawner> Launcher<W, S> {
    pub fn new(program_name: String, out: W, spawner: S) -> Self {
        Launcher { program_name, out, spawner }
    }

    /// Runs the launcher for the given arguments, excluding the program name, and returns the
    /// process exit code.
    ///
    /// Neither a failure to write the diagnostics nor a failure to start the Navigator changes
    /// the exit code; both are only logged.
    pub fn run(&mut self, args: &[String]) -> i32 {
        let usage = format!("Usage: {} <command>", self.program_name);

        match args.first() {
            None => {
                self.report(&["E: No command line arguments provided.", &usage, "Opening Navigator..."]);

                if let Err(e) = self.spawner.spawn(&navigator_path(), &[]) {
                    log::warn!("{e}");
                }
                EXIT_SUCCESS
            }
            Some(command) => {
                log::debug!("rejecting command '{command}' with {} argument(s)", args.len() - 1);
                let notice = format!("E: Command '{command}' is not implemented.");
                self.report(&[&notice, &usage]);
                EXIT_USAGE
            }
        }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.out
    }

    /// Writes lines to `out`, logging instead of returning a failure.
    fn report(&mut self, lines: &[&str]) {
        if let Err(e) = self.write_lines(lines) {
            log::warn!("{e}");
        }
    }

    fn write_lines(&mut self, lines: &[&str]) -> Result<()> {
        for line in lines {
            writeln!(self.out, "{line}").map_err(Error::Output)?;
        }
        self.out.flush().map_err(Error::Output)
    }
}

#[cfg(test)]
mod tests {
    use std::{ffi::OsStr, io};

    use super::*;
    use crate::spawn::tests::RecordingSpawner;

    fn launch(args: &[&str]) -> (i32, String, RecordingSpawner) {
        let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        let mut spawner = RecordingSpawner::default();
        let mut launcher = Launcher::new("DevToolbox".to_owned(), Vec::new(), &mut spawner);
        let code = launcher.run(&args);
        let out = String::from_utf8(launcher.into_output()).unwrap();
        (code, out, spawner)
    }

    #[test]
    fn no_arguments() {
        let (code, out, spawner) = launch(&[]);

        assert_eq!(code, 0);
        assert_eq!(out, concat!(
            "E: No command line arguments provided.\n",
            "Usage: DevToolbox <command>\n",
            "Opening Navigator...\n",
        ));
        assert_eq!(spawner.launches.len(), 1);
        assert_eq!(spawner.launches[0].0, navigator_path());
        assert!(spawner.launches[0].1.is_empty());
    }

    #[test]
    fn command_is_not_implemented() {
        let data = [
            (vec!["init"], "init"),
            (vec!["cat-file", "-p", "abc"], "cat-file"),
            (vec![""], ""),
        ];

        for (args, command) in data {
            let (code, out, spawner) = launch(&args);

            assert_eq!(code, EXIT_USAGE);
            assert_eq!(out, format!(
                "E: Command '{command}' is not implemented.\nUsage: DevToolbox <command>\n"
            ));
            assert!(spawner.launches.is_empty());
        }
    }

    #[test]
    fn spawn_failure_is_ignored() {
        struct Failing(usize);

        impl Spawner for Failing {
            fn spawn(&mut self, program: &Path, _: &[&OsStr]) -> Result<()> {
                self.0 += 1;
                let e = io::Error::new(io::ErrorKind::NotFound, "not found");
                Err(Error::Spawn(e, program.display().to_string()))
            }
        }

        let mut failing = Failing(0);
        let mut launcher = Launcher::new("DevToolbox".to_owned(), Vec::new(), &mut failing);
        assert_eq!(launcher.run(&[]), EXIT_SUCCESS);
        drop(launcher);
        assert_eq!(failing.0, 1);
    }

    #[test]
    fn unwritable_output_still_opens_navigator() {
        struct Full;

        impl Write for Full {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "No space left on device"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let data = [(vec![], EXIT_SUCCESS, 1), (vec!["init".to_owned()], EXIT_USAGE, 0)];

        for (args, expected, launches) in data {
            let mut spawner = RecordingSpawner::default();
            let mut launcher = Launcher::new("DevToolbox".to_owned(), Full, &mut spawner);
            assert_eq!(launcher.run(&args), expected);
            drop(launcher);
            assert_eq!(spawner.launches.len(), launches);
        }
    }

    #[test]
    fn program_names() {
        let data = [
            (Some("devtoolbox"), "devtoolbox"),
            (Some("/opt/toolbox/bin/DevToolbox"), "DevToolbox"),
            (Some("C:\\toolbox\\DevToolbox.exe"), if cfg!(windows) { "DevToolbox" } else { "C:\\toolbox\\DevToolbox" }),
            (Some(""), DEFAULT_PROGRAM_NAME),
            (None, DEFAULT_PROGRAM_NAME),
        ];

        for (argv0, expected) in data {
            assert_eq!(program_name(argv0), expected);
        }
    }

    #[test]
    fn navigator_path_has_host_suffix() {
        let path = navigator_path();
        assert!(path.starts_with("bin"));
        assert_eq!(path.extension().is_some(), !std::env::consts::EXE_SUFFIX.is_empty());
    }
}
