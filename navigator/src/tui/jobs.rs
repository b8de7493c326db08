//! Downloads and installs running in the background while the interface stays responsive.

use std::{
    path::PathBuf,
    process::{Command, Stdio},
    sync::Arc,
    thread::{self, JoinHandle},
};

use toolbox::{
    download::{self, Progress},
    spawn::{self, QuietSpawner, Spawner},
    Error,
};
use super::utility::format_bytes;

/// A download or install started by the user.
pub struct Job {
    label: String,
    progress: Option<Arc<Progress>>,
    handle: JoinHandle<toolbox::Result<String>>,
}

impl Job {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Describes how far the job got, e.g. `1.5 MiB / 25.0 MiB`.
    pub fn status(&self) -> String {
        match &self.progress {
            Some(progress) => match progress.total() {
                Some(total) => format!(
                    "{} / {}",
                    format_bytes(progress.received()),
                    format_bytes(total)
                ),
                None => format_bytes(progress.received()),
            },
            None => "running".to_owned(),
        }
    }

    /// Completed fraction, when known.
    pub fn ratio(&self) -> Option<f64> {
        self.progress.as_ref().and_then(|progress| progress.ratio())
    }
}

/// Outcome of a finished job: a success message or the error that ended it.
pub struct Finished {
    pub label: String,
    pub result: Result<String, String>,
}

/// Background jobs. Downloaded installers are opened through `S`.
pub struct Jobs<S = QuietSpawner> {
    running: Vec<Job>,
    spawner: S,
}

impl<S> Jobs<S>
where
    S: Spawner + Clone + Send + 'static,
{
    pub fn new(spawner: S) -> Self {
        Jobs { running: Vec::new(), spawner }
    }

    pub fn running(&self) -> &[Job] {
        &self.running
    }

    /// Downloads `url` into `dir` and opens the file with the host's default handler once it is
    /// complete.
    pub fn download(&mut self, label: String, url: String, dir: PathBuf) {
        let progress = Arc::new(Progress::new());
        let shared = Arc::clone(&progress);
        let mut spawner = self.spawner.clone();

        log::info!("starting job '{label}'");
        let handle = thread::spawn(move || {
            let path = download::download(&url, &dir, &shared)?;
            if let Err(e) = spawn::open(&mut spawner, &path) {
                log::warn!("{e}");
            }
            Ok(format!("Saved to {}", path.display()))
        });

        self.running.push(Job { label, progress: Some(progress), handle });
    }

    /// Runs `pip install <library>`.
    pub fn pip_install(&mut self, library: String) {
        let label = format!("pip install {library}");

        log::info!("starting job '{label}'");
        let handle = thread::spawn(move || {
            let mut pip = Command::new("pip");
            pip.args(["install", library.as_str()]);
            run_quietly(&mut pip, format!("pip install {library}"))?;
            Ok(format!("Installed {library}"))
        });

        self.running.push(Job { label, progress: None, handle });
    }

    /// Removes and returns all jobs that have ended.
    pub fn finished(&mut self) -> Vec<Finished> {
        let (done, running) = self.running
            .drain(..)
            .partition::<Vec<Job>, _>(|job| job.handle.is_finished());
        self.running = running;

        done.into_iter()
            .map(|job| {
                let result = match job.handle.join() {
                    Ok(Ok(msg)) => Ok(msg),
                    Ok(Err(e)) => Err(e.to_string()),
                    Err(_) => Err("The job stopped unexpectedly. This is a bug, please report it.".to_owned()),
                };
                match &result {
                    Ok(_) => log::info!("job '{}' finished", job.label),
                    Err(e) => log::error!("job '{}' failed: {e}", job.label),
                }
                Finished { label: job.label, result }
            })
            .collect()
    }
}

/// Runs a command to completion with its standard streams detached from the interface.
fn run_quietly(command: &mut Command, label: String) -> toolbox::Result<()> {
    let program = command.get_program().to_string_lossy().into_owned();
    let status = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| Error::Spawn(e, program))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::Exit(label, status))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        ffi::OsStr,
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        path::Path,
        sync::Mutex,
        time::{Duration, Instant},
    };

    use super::*;

    /// Records the files opened by finished downloads.
    #[derive(Clone, Default)]
    struct Opened(Arc<Mutex<Vec<(PathBuf, Vec<PathBuf>)>>>);

    impl Spawner for Opened {
        fn spawn(&mut self, program: &Path, args: &[&OsStr]) -> toolbox::Result<()> {
            let args = args.iter().map(PathBuf::from).collect();
            self.0.lock().unwrap().push((program.to_owned(), args));
            Ok(())
        }
    }

    /// Answers a single request on a loopback port with `body` and returns the base URL.
    fn serve_once(body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            write!(stream, "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n", body.len()).unwrap();
            stream.write_all(body).unwrap();
        });
        format!("http://{address}")
    }

    fn wait_for<S>(jobs: &mut Jobs<S>) -> Vec<Finished>
    where
        S: Spawner + Clone + Send + 'static,
    {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let finished = jobs.finished();
            if !finished.is_empty() || Instant::now() > deadline {
                break finished;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn downloaded_installer_is_opened() {
        let opened = Opened::default();
        let mut jobs = Jobs::new(opened.clone());
        let dir = tempfile::tempdir().unwrap();
        let base = serve_once(b"MZ installer");
        jobs.download("Python".to_owned(), format!("{base}/python-3.13.7-amd64.exe"), dir.path().to_owned());

        let finished = wait_for(&mut jobs);
        let saved = dir.path().join("python-3.13.7-amd64.exe");
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].result, Ok(format!("Saved to {}", saved.display())));
        assert_eq!(std::fs::read(&saved).unwrap(), b"MZ installer");

        let launches = opened.0.lock().unwrap();
        assert_eq!(launches.len(), 1);
        assert_eq!(launches[0].1.last(), Some(&saved));
    }

    #[test]
    fn failed_download_is_not_opened() {
        let opened = Opened::default();
        let mut jobs = Jobs::new(opened.clone());
        let dir = tempfile::tempdir().unwrap();
        jobs.download("Broken".to_owned(), "https://example.org/".to_owned(), dir.path().to_owned());

        assert_eq!(jobs.running().len(), 1);
        assert_eq!(jobs.running()[0].label(), "Broken");

        let finished = wait_for(&mut jobs);
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].label, "Broken");
        assert!(finished[0].result.as_ref().unwrap_err().contains("https://example.org/"));
        assert!(jobs.running().is_empty());
        assert!(opened.0.lock().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_exit_error() {
        let mut command = Command::new("sh");
        command.args(["-c", "exit 3"]);

        match run_quietly(&mut command, "pip install numpy".to_owned()) {
            Err(Error::Exit(label, status)) => {
                assert_eq!(label, "pip install numpy");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("expected exit error, got {other:?}"),
        }
    }

    #[test]
    fn missing_command_is_spawn_error() {
        let mut command = Command::new("./definitely/not/here");
        let result = run_quietly(&mut command, "missing".to_owned());
        assert!(matches!(result, Err(Error::Spawn(..))));
    }

    #[test]
    fn status_without_progress() {
        let job = Job {
            label: "pip install numpy".to_owned(),
            progress: None,
            handle: thread::spawn(|| Ok(String::new())),
        };

        assert_eq!(job.status(), "running");
        assert_eq!(job.ratio(), None);
    }
}
