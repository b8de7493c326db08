//! Streams installers from HTTP mirrors to disk.

use std::{
    fs::{self, File},
    io::{BufWriter, Read, Write},
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
};

use crate::result::*;

/// Size of the chunks a response body is copied in.
const CHUNK_SIZE: usize = 1024;

/// Byte counters of a running download, shared between the downloading thread and observers.
#[derive(Debug, Default)]
pub struct Progress {
    received: AtomicU64,
    total: AtomicU64,
    total_known: AtomicBool,
}

impl Progress {
    pub fn new() -> Self {
        Progress::default()
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    /// Returns the expected size of the download if the server announced one.
    pub fn total(&self) -> Option<u64> {
        if self.total_known.load(Ordering::Acquire) {
            Some(self.total.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Returns the completed fraction in `0.0..=1.0`, if the total is known.
    pub fn ratio(&self) -> Option<f64> {
        self.total().map(|total| {
            if total == 0 {
                1.0
            } else {
                (self.received() as f64 / total as f64).min(1.0)
            }
        })
    }

    fn set_total(&self, total: u64) {
        self.total.store(total, Ordering::Relaxed);
        self.total_known.store(true, Ordering::Release);
    }

    fn add(&self, n: usize) {
        self.received.fetch_add(n as u64, Ordering::Relaxed);
    }
}

/// Returns the last path segment of a URL, ignoring any query or fragment.
///
/// # Errors
/// * [`Error::InvalidUrl`] if the URL ends without a file name.
pub fn file_name(url: &str) -> Result<&str> {
    let path = url
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(url);
    let host_end = path.find("://").map(|i| i + 3).unwrap_or(0);

    match path[host_end..].split_once('/') {
        Some((_, rest)) => rest
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .ok_or_else(|| Error::InvalidUrl(url.to_owned())),
        None => Err(Error::InvalidUrl(url.to_owned())),
    }
}

/// Downloads `url` into the folder `dir`, naming the file after the last segment of the URL.
/// The folder is created if it does not exist.
///
/// # Errors
/// * [`Error::InvalidUrl`] if no file name can be derived from the URL.
/// * [`Error::Status`] if the server responds with anything but `200 OK`.
/// * [`Error::Http`] on transport errors.
/// * [`Error::IO`] if the folder or file cannot be written.
pub fn download(url: &str, dir: &Path, progress: &Progress) -> Result<PathBuf> {
    let path = dir.join(file_name(url)?);

    fs::create_dir_all(dir)
        .map_err(|e| Error::IO(e, dir.to_owned()))?;

    log::info!("downloading {url} to {}", path.display());
    let response = ureq::get(url)
        .call()
        .map_err(|e| match e {
            ureq::Error::Status(code, _) => Error::Status { url: url.to_owned(), code },
            ureq::Error::Transport(transport) => Error::Http(url.to_owned(), transport.to_string()),
        })?;

    if response.status() != 200 {
        return Err(Error::Status { url: url.to_owned(), code: response.status() });
    }

    if let Some(total) = response.header("Content-Length").and_then(|len| len.parse().ok()) {
        progress.set_total(total);
    }

    let file = File::create(&path)
        .map_err(|e| Error::IO(e, path.clone()))?;

    // a truncated installer must not be left behind under its final name
    if let Err(e) = copy_body(response.into_reader(), file, url, &path, progress) {
        if let Err(remove) = fs::remove_file(&path) {
            log::warn!("could not remove partial download {}: {remove}", path.display());
        }
        return Err(e);
    }

    log::info!("downloaded {} bytes to {}", progress.received(), path.display());
    Ok(path)
}

/// Copies a response body into `file` chunk by chunk, publishing each chunk to `progress`.
fn copy_body(mut reader: impl Read, file: File, url: &str, path: &Path, progress: &Progress) -> Result<()> {
    let mut writer = BufWriter::new(file);
    let mut chunk = [0; CHUNK_SIZE];

    loop {
        let n = reader.read(&mut chunk)
            .map_err(|e| Error::Http(url.to_owned(), e.to_string()))?;
        if n == 0 {
            break;
        }
        writer.write_all(&chunk[..n])
            .map_err(|e| Error::IO(e, path.to_owned()))?;
        progress.add(n);
    }
    writer.flush()
        .map_err(|e| Error::IO(e, path.to_owned()))
}
