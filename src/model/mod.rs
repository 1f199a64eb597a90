use thiserror::Error;

pub mod diff;
pub mod lock;
pub mod module_id;
pub mod ordered;
pub mod report;

pub use diff::LockDifference;
pub use lock::{ConfigurationLock, DependencyLock, DependencyVersion, ProjectLock};
pub use module_id::ModuleId;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing key `{0}` while parsing")]
    MissingKey(String),
    #[error("Unsupported lock file version {0}")]
    UnsupportedLockFileVersion(serde_json::Value),
    #[error(transparent)]
    Model(#[from] ModelError),
}
