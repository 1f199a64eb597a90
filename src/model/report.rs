use std::path::Path;

use log::{debug, error};
use serde::Deserialize;

use super::{DependencyLock, ModelError, ModuleId, ParseError};

/// Output of a dependency resolution pass, as written by the build tool.
///
/// Records are replayed in file order, so the report decides the order of
/// projects and of modules within each configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolutionReport {
    /// Configurations that must appear in the lock even without dependencies.
    #[serde(default)]
    pub configurations: Vec<DeclaredConfiguration>,
    #[serde(default)]
    pub records: Vec<ResolvedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclaredConfiguration {
    pub project: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedRecord {
    pub project: String,
    pub configuration: String,
    pub module: ModuleId,
    pub requested: String,
    pub selected: String,
}

impl ResolutionReport {
    pub fn from_file(path: &Path) -> Result<ResolutionReport, ParseError> {
        debug!("Reading resolution report {}", path.display());
        let contents = std::fs::read_to_string(path)?;

        let report = ResolutionReport::from_toml_str(&contents);
        if let Err(err) = &report {
            error!(
                "Could not read resolution report {} due to err {err}",
                path.display()
            )
        }
        report
    }

    pub fn from_toml_str(data: &str) -> Result<ResolutionReport, ParseError> {
        Ok(toml::from_str(data)?)
    }

    pub fn into_lock(self) -> Result<DependencyLock, ModelError> {
        let mut lock = DependencyLock::new();
        for declared in self.configurations {
            lock.add_configuration(&declared.project, &declared.name)?;
        }
        for record in self.records {
            lock.add_record(
                &record.project,
                &record.configuration,
                record.module,
                record.requested,
                record.selected,
            )?;
        }
        Ok(lock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn load_report() {
        let text = r#"
[[configurations]]
project = ":app"
name = "annotationProcessor"

[[records]]
project = ":app"
configuration = "compile"
module = "com.google.guava:guava"
requested = "19.0"
selected = "19.0"

[[records]]
project = ":app"
configuration = "compile"
module = "com.google.guava:guava"
requested = "[18.0,20.0)"
selected = "19.0"
"#;
        let report = ResolutionReport::from_toml_str(text).unwrap();
        assert_eq!(
            report.configurations,
            vec![DeclaredConfiguration {
                project: ":app".to_owned(),
                name: "annotationProcessor".to_owned()
            }]
        );
        assert_eq!(report.records.len(), 2);

        let lock = report.into_lock().unwrap();
        let app = lock.project(":app").unwrap();
        assert!(app.configuration("annotationProcessor").unwrap().is_empty());
        assert_eq!(
            app.configuration("compile").unwrap().records().count(),
            2,
            "both guava records are kept"
        );
    }

    #[test]
    fn empty_report_is_empty_lock() {
        let lock = ResolutionReport::from_toml_str("")
            .unwrap()
            .into_lock()
            .unwrap();
        assert!(lock.is_empty());
    }

    #[test]
    fn reject_invalid_module() {
        let text = r#"
[[records]]
project = ":app"
configuration = "compile"
module = "guava"
requested = "19.0"
selected = "19.0"
"#;
        assert!(matches!(
            ResolutionReport::from_toml_str(text),
            Err(ParseError::Toml(_))
        ));
    }

    #[test]
    fn reject_blank_project() {
        let text = r#"
[[records]]
project = ""
configuration = "compile"
module = "com.google.guava:guava"
requested = "19.0"
selected = "19.0"
"#;
        let report = ResolutionReport::from_toml_str(text).unwrap();
        assert!(matches!(
            report.into_lock(),
            Err(ModelError::InvalidInput(_))
        ));
    }
}
