use std::{
    ffi::OsString,
    fs::File,
    io,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use fs4::fs_std::FileExt;
use log::debug;
use thiserror::Error;

const LOCK_TIMEOUT: Duration = Duration::from_secs(300);

/// Exclusive advisory lock guarding writes to a lock file.
///
/// The lock is taken on a `<lock file>.guard` sibling and released on drop.
pub struct FileLock {
    _file: File,
}

#[derive(Error, Debug)]
#[error(transparent)]
pub struct Error(#[from] std::io::Error);

impl FileLock {
    pub fn for_lock_file(lock_file: &Path) -> Result<Self, Error> {
        Self::with_timeout(lock_file, LOCK_TIMEOUT)
    }

    fn with_timeout(lock_file: &Path, timeout: Duration) -> Result<Self, Error> {
        let path = guard_path(lock_file);
        let file = File::create(&path)?;
        let start = Instant::now();
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(true) => return Ok(Self { _file: file }),
                Ok(false) => {}
                Err(error)
                    if error.raw_os_error() == fs4::lock_contended_error().raw_os_error() => {}
                Err(error) => return Err(error.into()),
            }
            if start.elapsed() >= timeout {
                return Err(io::Error::new(
                    io::ErrorKind::WouldBlock,
                    format!("timed out waiting for a lock on {}", path.display()),
                )
                .into());
            }
            debug!("Failed to acquire a lock on {}, retrying", path.display());
            std::thread::sleep(Duration::from_secs(1));
        }
    }
}

fn guard_path(lock_file: &Path) -> PathBuf {
    let mut name = lock_file
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".guard");
    lock_file.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn guard_sits_next_to_lock_file() {
        assert_eq!(
            guard_path(Path::new("build/dependencies.lock")),
            PathBuf::from("build/dependencies.lock.guard")
        );
    }

    #[test]
    fn lock_can_be_taken_again_after_release() {
        let dir = tempfile::tempdir().unwrap();
        let lock_file = dir.path().join("dependencies.lock");
        drop(FileLock::for_lock_file(&lock_file).unwrap());
        let _again = FileLock::for_lock_file(&lock_file).unwrap();
        assert!(dir.path().join("dependencies.lock.guard").exists());
    }

    #[test]
    fn held_lock_is_contended() {
        let dir = tempfile::tempdir().unwrap();
        let lock_file = dir.path().join("dependencies.lock");
        let _held = FileLock::for_lock_file(&lock_file).unwrap();

        let other = File::open(guard_path(&lock_file)).unwrap();
        assert!(!FileExt::try_lock_exclusive(&other).unwrap());
    }

    #[test]
    fn waiting_for_held_lock_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let lock_file = dir.path().join("dependencies.lock");
        let _held = FileLock::for_lock_file(&lock_file).unwrap();

        let error = FileLock::with_timeout(&lock_file, Duration::ZERO)
            .err()
            .unwrap();
        assert_eq!(error.0.kind(), io::ErrorKind::WouldBlock);
    }
}
