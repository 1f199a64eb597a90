use std::{
    cell::RefCell,
    io::{self, Write},
};

use serde::{
    ser::{SerializeSeq, SerializeStruct},
    Deserialize, Serialize, Serializer,
};
use serde_json::Value;

use crate::model::{
    ConfigurationLock, DependencyLock, DependencyVersion, ModuleId, ParseError, ProjectLock,
};

use super::{
    formatter::LockFileFormatter, sink::Sink, ConvertError, DependencyLockConverter, Stage,
    LOCK_FILE_VERSION, USER_NOTICE,
};

/// Reads and writes the JSON lock file format.
///
/// Output is byte-for-byte stable: projects in insertion order, configurations
/// sorted by name, dependency records in the order they were added.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDependencyLockConverter;

impl JsonDependencyLockConverter {
    pub fn new() -> JsonDependencyLockConverter {
        JsonDependencyLockConverter
    }

    /// Streams the lock document into `writer` and returns it once flushed.
    pub fn write_to<W: Write>(&self, lock: &DependencyLock, writer: W) -> Result<W, ConvertError> {
        let mut sink = Sink::new(writer);
        let cursor = Cursor::default();
        {
            let mut serializer =
                serde_json::Serializer::with_formatter(&mut sink, LockFileFormatter::new());
            LockDocument {
                lock,
                cursor: &cursor,
            }
            .serialize(&mut serializer)
            .map_err(|err| ConvertError::from_json(cursor.stage(), err))?;
        }
        sink.finish().map_err(|source| ConvertError::EncodingIO {
            stage: Stage::Flush,
            source,
        })
    }
}

impl DependencyLockConverter for JsonDependencyLockConverter {
    fn convert(&self, lock: &DependencyLock) -> Result<String, ConvertError> {
        let output = self.write_to(lock, Vec::new())?;
        String::from_utf8(output).map_err(|err| ConvertError::EncodingIO {
            stage: Stage::Flush,
            source: io::Error::new(io::ErrorKind::InvalidData, err),
        })
    }

    fn parse(&self, text: &str) -> Result<DependencyLock, ParseError> {
        let mut document = serde_json::from_str::<serde_json::Map<String, Value>>(text)?;
        match document.remove("lockFileVersion") {
            Some(Value::String(version)) if version == LOCK_FILE_VERSION => {}
            Some(other) => return Err(ParseError::UnsupportedLockFileVersion(other)),
            None => return Err(ParseError::MissingKey("lockFileVersion".to_owned())),
        }
        document.remove("_comment");
        let content = serde_json::from_value::<LockFileContent>(Value::Object(document))?;
        content.into_lock()
    }
}

/// Remembers which part of the document is being written.
#[derive(Default)]
struct Cursor {
    stage: RefCell<Stage>,
}

impl Cursor {
    fn enter(&self, stage: Stage) {
        *self.stage.borrow_mut() = stage;
    }

    fn stage(&self) -> Stage {
        self.stage.borrow().clone()
    }
}

struct LockDocument<'a> {
    lock: &'a DependencyLock,
    cursor: &'a Cursor,
}

impl Serialize for LockDocument<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.cursor.enter(Stage::Header);
        let mut document = serializer.serialize_struct("DependencyLock", 3)?;
        document.serialize_field("_comment", USER_NOTICE)?;
        document.serialize_field("lockFileVersion", LOCK_FILE_VERSION)?;
        document.serialize_field(
            "projects",
            &Projects {
                lock: self.lock,
                cursor: self.cursor,
            },
        )?;
        document.end()
    }
}

struct Projects<'a> {
    lock: &'a DependencyLock,
    cursor: &'a Cursor,
}

impl Serialize for Projects<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut projects = serializer.serialize_seq(None)?;
        for (path, project) in self.lock.projects() {
            projects.serialize_element(&Project {
                path,
                project,
                cursor: self.cursor,
            })?;
        }
        self.cursor.enter(Stage::Footer);
        projects.end()
    }
}

struct Project<'a> {
    path: &'a str,
    project: &'a ProjectLock,
    cursor: &'a Cursor,
}

impl Serialize for Project<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.cursor.enter(Stage::Project {
            path: self.path.to_owned(),
        });
        let mut project = serializer.serialize_struct("ProjectLock", 2)?;
        project.serialize_field("path", self.path)?;
        project.serialize_field("configurations", &Configurations { project: self })?;
        project.end()
    }
}

struct Configurations<'a> {
    project: &'a Project<'a>,
}

impl Serialize for Configurations<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut configurations = serializer.serialize_seq(None)?;
        for (name, configuration) in self.project.project.sorted_configurations() {
            configurations.serialize_element(&Configuration {
                project: self.project.path,
                name,
                configuration,
                cursor: self.project.cursor,
            })?;
        }
        self.project.cursor.enter(Stage::Project {
            path: self.project.path.to_owned(),
        });
        configurations.end()
    }
}

struct Configuration<'a> {
    project: &'a str,
    name: &'a str,
    configuration: &'a ConfigurationLock,
    cursor: &'a Cursor,
}

impl Serialize for Configuration<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.cursor.enter(Stage::Configuration {
            project: self.project.to_owned(),
            name: self.name.to_owned(),
        });
        let mut configuration = serializer.serialize_struct("ConfigurationLock", 2)?;
        configuration.serialize_field("name", self.name)?;
        configuration.serialize_field(
            "dependencies",
            &Dependencies {
                configuration: self.configuration,
            },
        )?;
        configuration.end()
    }
}

struct Dependencies<'a> {
    configuration: &'a ConfigurationLock,
}

impl Serialize for Dependencies<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(
            self.configuration
                .records()
                .map(|(module, version)| LockedDependency { module, version }),
        )
    }
}

struct LockedDependency<'a> {
    module: &'a ModuleId,
    version: &'a DependencyVersion,
}

impl Serialize for LockedDependency<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut dependency = serializer.serialize_struct("LockedDependency", 3)?;
        dependency.serialize_field("moduleId", self.module)?;
        dependency.serialize_field("requestedVersion", &self.version.requested_version)?;
        dependency.serialize_field("lockedVersion", &self.version.selected_version)?;
        dependency.end()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LockFileContent {
    projects: Vec<LockedProject>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LockedProject {
    path: String,
    configurations: Vec<LockedConfiguration>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct LockedConfiguration {
    name: String,
    dependencies: Vec<LockedDependencyEntry>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
struct LockedDependencyEntry {
    module_id: String,
    requested_version: String,
    locked_version: String,
}

impl LockFileContent {
    fn into_lock(self) -> Result<DependencyLock, ParseError> {
        let mut lock = DependencyLock::new();
        for project in self.projects {
            lock.add_project(&project.path)?;
            for configuration in project.configurations {
                lock.add_configuration(&project.path, &configuration.name)?;
                for dependency in configuration.dependencies {
                    lock.add_record(
                        &project.path,
                        &configuration.name,
                        dependency.module_id.parse()?,
                        dependency.requested_version,
                        dependency.locked_version,
                    )?;
                }
            }
        }
        Ok(lock)
    }
}
