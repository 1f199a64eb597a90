use std::{fmt::Display, str::FromStr, sync::OnceLock};

use regex_lite::Regex;
use serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer};

use super::ModelError;

/// Identifies a dependency independently of its version.
///
/// The `group:name` form produced by [`Display`] is the only textual
/// projection: it is what ends up in lock files and what [`FromStr`] reads back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId {
    group: String,
    name: String,
}

fn module_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<group>[^:]*):(?P<name>[^:]+)$").expect("module id pattern is valid")
    })
}

impl ModuleId {
    /// The group may be empty, the name may not. Neither may contain `:`.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Result<ModuleId, ModelError> {
        let group = group.into();
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::InvalidInput(format!(
                "module name must not be empty (group `{}`)",
                group
            )));
        }
        if group.contains(':') || name.contains(':') {
            return Err(ModelError::InvalidInput(format!(
                "module group and name must not contain `:` (got `{}` and `{}`)",
                group, name
            )));
        }
        Ok(ModuleId { group, name })
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

impl FromStr for ModuleId {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let captures = module_id_pattern().captures(value).ok_or_else(|| {
            ModelError::InvalidInput(format!("`{}` is not a `group:name` module id", value))
        })?;
        let group = captures.name("group").map_or("", |m| m.as_str());
        let name = captures.name("name").map_or("", |m| m.as_str());
        ModuleId::new(group, name)
    }
}

impl Serialize for ModuleId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModuleId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ModuleIdVisitor;

        impl<'de> Visitor<'de> for ModuleIdVisitor {
            type Value = ModuleId;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a `group:name` string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(ModuleIdVisitor)
    }
}
