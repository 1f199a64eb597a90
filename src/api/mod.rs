use std::path::PathBuf;

use thiserror::Error;

use crate::{
    cli::command_handlers::{do_clean, do_lock},
    converter::{ConvertError, JsonDependencyLockConverter},
    flock,
    model::{DependencyLock, LockDifference, ModelError, ParseError},
};

mod builder;

pub use builder::DepsLockBuilder;

pub struct DepsLock {
    converter: JsonDependencyLockConverter,
    root: PathBuf,
    report_file_name: PathBuf,
    lock_file_name: PathBuf,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LockMode {
    /// Verify that the lock file is up to date. This mode should be normally used on CI.
    Locked,
    /// Update the lock file if necessary.
    Update,
    /// Recreate the lock file from scratch.
    Recreate,
}

#[derive(Error, Debug)]
pub enum LockError {
    #[error("Error while parsing: {0}")]
    Parse(#[from] ParseError),
    #[error("Error while building the lock: {0}")]
    Model(#[from] ModelError),
    #[error("Error while writing the lock file: {0}")]
    Convert(#[from] ConvertError),
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Could not lock the lock file: {0}")]
    FileLock(#[from] flock::Error),
    #[error("Lock file {} does not exist", .0.display())]
    MissingLockFile(PathBuf),
    #[error("Lock file is out of date: {}", describe(.0))]
    OutOfDate(Vec<LockDifference>),
}

fn describe(differences: &[LockDifference]) -> String {
    differences
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl DepsLock {
    pub fn builder() -> DepsLockBuilder {
        DepsLockBuilder::default()
    }

    /// Creates, updates or verifies the lock file based on the resolution report
    pub fn lock(&self, lock_mode: LockMode) -> Result<DependencyLock, LockError> {
        do_lock(
            lock_mode,
            &self.converter,
            &self.root,
            &self.report_file_name,
            &self.lock_file_name,
        )
    }

    /// Delete the lock file
    pub fn clean(&self) -> Result<(), LockError> {
        do_clean(&self.root, &self.lock_file_name)
    }
}
