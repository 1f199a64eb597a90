use std::{env, path::PathBuf};

use crate::{converter::JsonDependencyLockConverter, DepsLock, LockError};

pub const DEFAULT_REPORT_FILE_NAME: &str = "dependencies.toml";
pub const DEFAULT_LOCK_FILE_NAME: &str = "dependencies.lock";

#[derive(Default)]
pub struct DepsLockBuilder {
    // All other paths are relative to `root`
    root: Option<PathBuf>,
    report_file_name: Option<PathBuf>,
    lock_file_name: Option<PathBuf>,
}

impl DepsLockBuilder {
    /// Project root directory.
    ///
    /// Defaults to the current directory.
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Name of the resolution report written by the build.
    ///
    /// Defaults to `dependencies.toml`.
    pub fn report_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_file_name = Some(path.into());
        self
    }

    /// Name of the lock file.
    ///
    /// Defaults to `dependencies.lock`.
    pub fn lock_file_name(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_file_name = Some(path.into());
        self
    }

    pub fn try_build(self) -> Result<DepsLock, LockError> {
        let Self {
            root,
            report_file_name,
            lock_file_name,
        } = self;
        let root = match root {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let report_file_name =
            report_file_name.unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_FILE_NAME));

        let lock_file_name =
            lock_file_name.unwrap_or_else(|| PathBuf::from(DEFAULT_LOCK_FILE_NAME));

        Ok(DepsLock {
            converter: JsonDependencyLockConverter::new(),
            root,
            report_file_name,
            lock_file_name,
        })
    }
}
