//! Starts external programs without waiting for them.

use std::{
    ffi::OsStr,
    path::Path,
    process::{Command, Stdio},
};

use crate::result::*;

/// Starts a program and returns as soon as the child process exists.
///
/// The child is never waited on. Implementations other than [ProcessSpawner] exist to observe
/// launches in tests.
pub trait Spawner {
    fn spawn(&mut self, program: &Path, args: &[&OsStr]) -> Result<()>;
}

impl<S: Spawner + ?Sized> Spawner for &mut S {
    fn spawn(&mut self, program: &Path, args: &[&OsStr]) -> Result<()> {
        (**self).spawn(program, args)
    }
}

/// Spawns real child processes that inherit the environment, working directory and standard
/// streams of the caller.
#[derive(Default, Clone, Copy)]
pub struct ProcessSpawner;

impl Spawner for ProcessSpawner {
    fn spawn(&mut self, program: &Path, args: &[&OsStr]) -> Result<()> {
        Command::new(program)
            .args(args)
            .spawn()
            .map(|child| log::debug!("started '{}' as pid {}", program.display(), child.id()))
            .map_err(|e| Error::Spawn(e, program.display().to_string()))
    }
}

/// Spawns child processes detached from the caller's standard streams, for programs started
/// while a terminal UI owns the screen.
#[derive(Default, Clone, Copy)]
pub struct QuietSpawner;

impl Spawner for QuietSpawner {
    fn spawn(&mut self, program: &Path, args: &[&OsStr]) -> Result<()> {
        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|child| log::debug!("started '{}' as pid {}", program.display(), child.id()))
            .map_err(|e| Error::Spawn(e, program.display().to_string()))
    }
}

/// Opens a file with the host's default handler, e.g. runs a downloaded installer.
pub fn open(spawner: &mut dyn Spawner, file: &Path) -> Result<()> {
    let (program, prefix) = opener();
    let mut args: Vec<&OsStr> = prefix.iter().map(OsStr::new).collect();
    args.push(file.as_os_str());
    spawner.spawn(Path::new(program), &args)
}

/// Returns the default opener of the host and the arguments preceding the file to open.
fn opener() -> (&'static str, &'static [&'static str]) {
    // the empty string is the window title consumed by `start`
    const START: &[&str] = &["/C", "start", ""];
    const NONE: &[&str] = &[];

    if cfg!(windows) {
        ("cmd", START)
    } else if cfg!(target_os = "macos") {
        ("open", NONE)
    } else {
        ("xdg-open", NONE)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use super::*;

    /// Records every launch instead of starting processes.
    #[derive(Default)]
    pub struct RecordingSpawner {
        pub launches: Vec<(PathBuf, Vec<String>)>,
    }

    impl Spawner for RecordingSpawner {
        fn spawn(&mut self, program: &Path, args: &[&OsStr]) -> Result<()> {
            let args = args.iter()
                .map(|arg| arg.to_string_lossy().into_owned())
                .collect();
            self.launches.push((program.to_owned(), args));
            Ok(())
        }
    }

    #[test]
    fn open_passes_file_last() {
        let mut spawner = RecordingSpawner::default();
        open(&mut spawner, Path::new("downloads/python/python-3.13.7-amd64.exe")).unwrap();

        let (program, args) = &spawner.launches[0];
        let (expected_program, prefix) = opener();
        assert_eq!(program, Path::new(expected_program));
        assert_eq!(&args[..prefix.len()], prefix);
        assert_eq!(args.last().unwrap(), "downloads/python/python-3.13.7-amd64.exe");
    }

    #[test]
    fn missing_program_is_spawn_error() {
        let result = ProcessSpawner.spawn(Path::new("./definitely/not/here"), &[]);
        assert!(matches!(result, Err(Error::Spawn(..))));
    }
}
