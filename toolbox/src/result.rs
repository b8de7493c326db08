//! Defines the [Error](crate::result::Error) and [Result] types that may be returned by the
//! toolbox API.

use std::{path::PathBuf, io, process::ExitStatus, result};

use thiserror::Error;

/// Contains all errors and their respective messages.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported architecture: {0}")]
    UnsupportedArch(String),

    #[error("Cannot derive a file name from '{0}'")]
    InvalidUrl(String),

    #[error("Download of {url} failed with status code: {code}")]
    Status { url: String, code: u16 },

    #[error("Download of {0} failed: {1}")]
    Http(String, String),

    #[error("{1}: {0}")]
    IO(io::Error, PathBuf),

    #[error("Could not start '{1}': {0}")]
    Spawn(io::Error, String),

    #[error("'{0}' failed with {1}")]
    Exit(String, ExitStatus),

    #[error("Built-in catalog '{1}' is corrupt. This is a bug, please report it: {0}")]
    JSON(serde_json::Error, &'static str),

    #[error("Could not write output: {0}")]
    Output(io::Error),
}

/// Result type using the toolbox [Error](crate::result::Error) enum.
pub type Result<T> = result::Result<T, Error>;
