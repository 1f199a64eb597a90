use log::{debug, info};

use crate::{
    api::{LockError, LockMode},
    converter::DependencyLockConverter,
    flock::FileLock,
    model::{report::ResolutionReport, DependencyLock},
};
use std::path::Path;

/// Handler to lock command
/// Builds the lock from the resolution report, then verifies, updates or
/// recreates the lock file depending on `lock_mode`
pub fn do_lock<C: DependencyLockConverter>(
    lock_mode: LockMode,
    converter: &C,
    root: &Path,
    report_file_name: &Path,
    lock_file_name: &Path,
) -> Result<DependencyLock, LockError> {
    let lock = ResolutionReport::from_file(&root.join(report_file_name))?.into_lock()?;

    let lock_file_path = root.join(lock_file_name);

    let old_lock = match (lock_mode, lock_file_path.exists()) {
        (LockMode::Locked, false) => return Err(LockError::MissingLockFile(lock_file_path)),

        (LockMode::Locked, true) => {
            debug!("Verifying lockfile...");
            let old_lock = load_lock_file(converter, &lock_file_path)?;
            let differences = lock.differences(&old_lock);
            if !differences.is_empty() {
                return Err(LockError::OutOfDate(differences));
            }
            debug!("Lockfile is up to date");
            return Ok(lock);
        }

        (LockMode::Update, true) => {
            debug!("Updating lockfile...");
            Some(load_lock_file(converter, &lock_file_path)?)
        }

        (LockMode::Update, false) | (LockMode::Recreate, _) => {
            debug!("Generating lockfile...");
            None
        }
    };

    debug!("Generated lockfile: {:?}", lock);

    if old_lock.is_some_and(|old_lock| old_lock == lock) {
        debug!("Lockfile is up to date");
    } else {
        let text = converter.convert(&lock)?;
        let _guard = FileLock::for_lock_file(&lock_file_path)?;
        std::fs::write(&lock_file_path, text)?;
        info!("Wrote lockfile to {}", lock_file_path.display());
    }

    Ok(lock)
}

/// Handler to clean command
pub fn do_clean(root: &Path, lock_file_name: &Path) -> Result<(), LockError> {
    let lock_file_path = root.join(lock_file_name);

    info!("Removing lockfile {}.", lock_file_path.display());
    match std::fs::remove_file(&lock_file_path) {
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!("{} is already removed, nothing to do", lock_file_path.display());
            Ok(())
        }
        otherwise => otherwise,
    }?;

    Ok(())
}

fn load_lock_file<C: DependencyLockConverter>(
    converter: &C,
    path: &Path,
) -> Result<DependencyLock, LockError> {
    debug!("Reading lockfile {}", path.display());
    let text = std::fs::read_to_string(path)?;
    Ok(converter.parse(&text)?)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::{converter::JsonDependencyLockConverter, model::LockDifference};

    use super::*;

    use pretty_assertions::assert_eq;

    const REPORT: &str = r#"
[[records]]
project = ":app"
configuration = "compile"
module = "junit:junit"
requested = "4.+"
selected = "4.12"
"#;

    fn workspace(report: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("dependencies.toml"), report).unwrap();
        dir
    }

    fn lock(dir: &Path, lock_mode: LockMode) -> Result<DependencyLock, LockError> {
        do_lock(
            lock_mode,
            &JsonDependencyLockConverter::new(),
            dir,
            Path::new("dependencies.toml"),
            Path::new("dependencies.lock"),
        )
    }

    #[test]
    fn update_writes_lock_file() {
        let dir = workspace(REPORT);
        let lock = lock(dir.path(), LockMode::Update).unwrap();

        let written = fs::read_to_string(dir.path().join("dependencies.lock")).unwrap();
        assert_eq!(written, JsonDependencyLockConverter::new().convert(&lock).unwrap());
        assert!(written.contains("\"lockedVersion\": \"4.12\""));
    }

    #[test]
    fn update_leaves_equal_lock_file_alone() {
        let dir = workspace(REPORT);
        lock(dir.path(), LockMode::Update).unwrap();
        let lock_file = dir.path().join("dependencies.lock");
        let written = fs::read_to_string(&lock_file).unwrap();
        // Same content, different bytes: an untouched file keeps them.
        let reformatted = written.replace("\n", "\r\n");
        fs::write(&lock_file, &reformatted).unwrap();

        lock(dir.path(), LockMode::Update).unwrap();
        assert_eq!(fs::read_to_string(&lock_file).unwrap(), reformatted);

        lock(dir.path(), LockMode::Recreate).unwrap();
        assert_eq!(fs::read_to_string(&lock_file).unwrap(), written);
    }

    #[test]
    fn locked_requires_lock_file() {
        let dir = workspace(REPORT);
        assert!(matches!(
            lock(dir.path(), LockMode::Locked),
            Err(LockError::MissingLockFile(_))
        ));
    }

    #[test]
    fn locked_accepts_up_to_date_lock_file() {
        let dir = workspace(REPORT);
        let written = lock(dir.path(), LockMode::Update).unwrap();
        assert_eq!(lock(dir.path(), LockMode::Locked).unwrap(), written);
    }

    #[test]
    fn locked_rejects_drift() {
        let dir = workspace(REPORT);
        lock(dir.path(), LockMode::Update).unwrap();
        fs::write(
            dir.path().join("dependencies.toml"),
            REPORT.replace("4.12", "4.13"),
        )
        .unwrap();

        match lock(dir.path(), LockMode::Locked) {
            Err(LockError::OutOfDate(differences)) => assert_eq!(
                differences,
                vec![LockDifference::ConfigurationChanged {
                    project: ":app".to_owned(),
                    configuration: "compile".to_owned()
                }]
            ),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn update_rejects_unsupported_lock_file() {
        let dir = workspace(REPORT);
        fs::write(
            dir.path().join("dependencies.lock"),
            r#"{ "lockFileVersion": "2.0", "projects": [] }"#,
        )
        .unwrap();
        assert!(matches!(
            lock(dir.path(), LockMode::Update),
            Err(LockError::Parse(_))
        ));
        lock(dir.path(), LockMode::Recreate).unwrap();
    }

    #[test]
    fn clean_removes_lock_file() {
        let dir = workspace(REPORT);
        lock(dir.path(), LockMode::Update).unwrap();
        do_clean(dir.path(), Path::new("dependencies.lock")).unwrap();
        assert!(!dir.path().join("dependencies.lock").exists());
        do_clean(dir.path(), Path::new("dependencies.lock")).unwrap();
    }
}
