use std::{collections::HashMap, path::PathBuf};

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Settings read from `DEPSLOCK_*` environment variables.
pub struct DepsLockConfig {
    pub report_file: Option<PathBuf>,
    pub lock_file: Option<PathBuf>,
}

impl DepsLockConfig {
    pub fn load() -> anyhow::Result<Self> {
        let raw_config = RawConfig::load(None)?;

        Ok(Self {
            report_file: raw_config.report.file,
            lock_file: raw_config.lock.file,
        })
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    report: ReportConfig,
    #[serde(default)]
    lock: LockConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct ReportConfig {
    file: Option<PathBuf>,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct LockConfig {
    file: Option<PathBuf>,
}

impl RawConfig {
    fn load(env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(
                Environment::with_prefix("DEPSLOCK")
                    .separator("_")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
