use std::{fmt::Display, io};

use thiserror::Error;

use crate::model::{DependencyLock, ParseError};

mod formatter;
pub mod json;
mod sink;

pub use json::JsonDependencyLockConverter;

/// Schema version written to and required from every lock file.
pub const LOCK_FILE_VERSION: &str = "1.0";

pub const USER_NOTICE: &str =
    "This is an auto-generated file and is not meant to be edited manually!";

/// Turns a [`DependencyLock`] into lock file text and back.
pub trait DependencyLockConverter {
    fn convert(&self, lock: &DependencyLock) -> Result<String, ConvertError>;

    fn parse(&self, text: &str) -> Result<DependencyLock, ParseError>;
}

/// Part of the document being written when a failure happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Header,
    Project {
        path: String,
    },
    Configuration {
        project: String,
        name: String,
    },
    Footer,
    Flush,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Header => f.write_str("header"),
            Stage::Project { path } => write!(f, "project {}", path),
            Stage::Configuration { project, name } => {
                write!(f, "configuration {} of project {}", name, project)
            }
            Stage::Footer => f.write_str("footer"),
            Stage::Flush => f.write_str("final flush"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error while writing lock file {stage}: {source}")]
    EncodingIO {
        stage: Stage,
        #[source]
        source: io::Error,
    },
    #[error("Error while serializing lock file {stage}: {source}")]
    Json {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },
}

impl ConvertError {
    fn from_json(stage: Stage, error: serde_json::Error) -> ConvertError {
        if error.is_io() {
            ConvertError::EncodingIO {
                stage,
                source: error.into(),
            }
        } else {
            ConvertError::Json {
                stage,
                source: error,
            }
        }
    }

    pub fn stage(&self) -> &Stage {
        match self {
            ConvertError::EncodingIO { stage, .. } | ConvertError::Json { stage, .. } => stage,
        }
    }
}
