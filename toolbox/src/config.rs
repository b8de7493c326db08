//! Locations of files the toolbox reads and writes.
//!
//! There are no configuration files. Everything is placed relative to the installation root,
//! the folder containing `bin/`.

use std::{env, path::{Path, PathBuf}};

use crate::catalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    root: PathBuf,
    bin: PathBuf,
}

impl Paths {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        let bin = root.join("bin");
        Paths { root, bin }
    }

    /// Derives the installation root from the location of the running executable, which is
    /// expected at `<root>/bin/<executable>`. Falls back to the working directory.
    pub fn locate() -> Self {
        let bin = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_owned));

        match bin {
            Some(bin) => {
                let root = bin.parent().unwrap_or(&bin).to_owned();
                Paths { root, bin }
            }
            None => Paths::new("."),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding the executables.
    pub fn bin(&self) -> &Path {
        &self.bin
    }

    pub fn downloads(&self) -> PathBuf {
        self.root.join("downloads")
    }

    pub fn python_downloads(&self) -> PathBuf {
        self.downloads().join("python")
    }

    /// Download folder of an application, named after it in portable form.
    pub fn application_downloads(&self, name: &str) -> PathBuf {
        self.downloads().join(catalog::folder_name(name))
    }

    /// Log file of an executable, placed next to it.
    pub fn log_file(&self, program: &str) -> PathBuf {
        self.bin.join(format!("{program}.log"))
    }
}
