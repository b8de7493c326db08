//! Defines the DevToolbox back-end API shared by the `devtoolbox` launcher and the `navigator`
//! terminal interface.
//!
//! * [launcher] implements the entry point: with no command it prints a usage hint and starts
//!   the Navigator through a [Spawner](spawn::Spawner), without waiting for it.
//! * [catalog] holds the libraries and applications the Navigator offers, and the Python
//!   installer for each [Arch](arch::Arch).
//! * [download] streams installers to disk while publishing [Progress](download::Progress) to
//!   other threads.
//! * [config] places downloads and logs relative to the installation root.

pub mod arch;
pub mod catalog;
pub mod config;
pub mod download;
pub mod launcher;
pub mod package;
pub mod result;
pub mod spawn;

pub use self::{
    arch::Arch,
    catalog::Catalog,
    result::{Error, Result},
};
