use std::fmt::Display;

use super::DependencyLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockDifference {
    ProjectAdded {
        project: String,
    },
    ProjectRemoved {
        project: String,
    },
    ProjectOrderChanged,
    ConfigurationAdded {
        project: String,
        configuration: String,
    },
    ConfigurationRemoved {
        project: String,
        configuration: String,
    },
    ConfigurationChanged {
        project: String,
        configuration: String,
    },
}

impl Display for LockDifference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LockDifference::ProjectAdded { project } => write!(f, "project {} was added", project),
            LockDifference::ProjectRemoved { project } => {
                write!(f, "project {} was removed", project)
            }
            LockDifference::ProjectOrderChanged => f.write_str("project order changed"),
            LockDifference::ConfigurationAdded {
                project,
                configuration,
            } => write!(f, "configuration {} of {} was added", configuration, project),
            LockDifference::ConfigurationRemoved {
                project,
                configuration,
            } => write!(f, "configuration {} of {} was removed", configuration, project),
            LockDifference::ConfigurationChanged {
                project,
                configuration,
            } => write!(
                f,
                "locked versions of configuration {} of {} changed",
                configuration, project
            ),
        }
    }
}

impl DependencyLock {
    /// Lists what changed from `previous` to `self`.
    ///
    /// Empty exactly when both locks are equal.
    pub fn differences(&self, previous: &DependencyLock) -> Vec<LockDifference> {
        let mut differences = Vec::new();

        for (path, project) in self.projects() {
            let Some(previous_project) = previous.project(path) else {
                differences.push(LockDifference::ProjectAdded {
                    project: path.to_owned(),
                });
                continue;
            };
            for (name, configuration) in project.sorted_configurations() {
                match previous_project.configuration(name) {
                    None => differences.push(LockDifference::ConfigurationAdded {
                        project: path.to_owned(),
                        configuration: name.to_owned(),
                    }),
                    Some(previous_configuration) if previous_configuration != configuration => {
                        differences.push(LockDifference::ConfigurationChanged {
                            project: path.to_owned(),
                            configuration: name.to_owned(),
                        })
                    }
                    Some(_) => {}
                }
            }
            for (name, _) in previous_project.sorted_configurations() {
                if project.configuration(name).is_none() {
                    differences.push(LockDifference::ConfigurationRemoved {
                        project: path.to_owned(),
                        configuration: name.to_owned(),
                    });
                }
            }
        }

        for (path, _) in previous.projects() {
            if self.project(path).is_none() {
                differences.push(LockDifference::ProjectRemoved {
                    project: path.to_owned(),
                });
            }
        }

        if differences.is_empty() && self != previous {
            differences.push(LockDifference::ProjectOrderChanged);
        }

        differences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn lock(records: &[(&str, &str, &str, &str)]) -> DependencyLock {
        let mut lock = DependencyLock::new();
        for (project, configuration, module, version) in records {
            lock.add_record(
                project,
                configuration,
                module.parse().unwrap(),
                *version,
                *version,
            )
            .unwrap();
        }
        lock
    }

    #[test]
    fn no_differences_for_equal_locks() {
        let current = lock(&[(":app", "compile", "junit:junit", "4.12")]);
        assert_eq!(current.differences(&current.clone()), vec![]);
    }

    #[test]
    fn reports_changed_added_and_removed() {
        let previous = lock(&[
            (":app", "compile", "junit:junit", "4.11"),
            (":app", "runtime", "junit:junit", "4.11"),
            (":old", "compile", "junit:junit", "4.11"),
        ]);
        let current = lock(&[
            (":app", "compile", "junit:junit", "4.12"),
            (":app", "testRuntime", "junit:junit", "4.12"),
            (":new", "compile", "junit:junit", "4.12"),
        ]);

        assert_eq!(
            current.differences(&previous),
            vec![
                LockDifference::ConfigurationChanged {
                    project: ":app".to_owned(),
                    configuration: "compile".to_owned()
                },
                LockDifference::ConfigurationAdded {
                    project: ":app".to_owned(),
                    configuration: "testRuntime".to_owned()
                },
                LockDifference::ConfigurationRemoved {
                    project: ":app".to_owned(),
                    configuration: "runtime".to_owned()
                },
                LockDifference::ProjectAdded {
                    project: ":new".to_owned()
                },
                LockDifference::ProjectRemoved {
                    project: ":old".to_owned()
                },
            ]
        );
    }

    #[test]
    fn reports_project_reordering() {
        let previous = lock(&[(":a", "compile", "x:x", "1"), (":b", "compile", "x:x", "1")]);
        let current = lock(&[(":b", "compile", "x:x", "1"), (":a", "compile", "x:x", "1")]);
        assert_eq!(
            current.differences(&previous),
            vec![LockDifference::ProjectOrderChanged]
        );
    }

    #[test]
    fn display_names_project_and_configuration() {
        let difference = LockDifference::ConfigurationChanged {
            project: ":app".to_owned(),
            configuration: "compile".to_owned(),
        };
        assert_eq!(
            difference.to_string(),
            "locked versions of configuration compile of :app changed"
        );
    }
}
