use super::{ordered::OrderedMap, ModelError, ModuleId};

/// One resolution outcome for a module within a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyVersion {
    pub requested_version: String,
    pub selected_version: String,
}

impl DependencyVersion {
    pub fn new(
        requested_version: impl Into<String>,
        selected_version: impl Into<String>,
    ) -> DependencyVersion {
        DependencyVersion {
            requested_version: requested_version.into(),
            selected_version: selected_version.into(),
        }
    }
}

/// Locked modules of a single configuration, in the order resolution first
/// reported them. A module keeps every record added for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationLock {
    modules: OrderedMap<ModuleId, Vec<DependencyVersion>>,
}

impl ConfigurationLock {
    fn push(&mut self, module: ModuleId, version: DependencyVersion) {
        self.modules.get_or_insert_with(module, Vec::new).push(version);
    }

    pub fn modules(&self) -> impl Iterator<Item = (&ModuleId, &[DependencyVersion])> {
        self.modules
            .iter()
            .map(|(module, versions)| (module, versions.as_slice()))
    }

    /// Every record, grouped by module in first-seen order.
    pub fn records(&self) -> impl Iterator<Item = (&ModuleId, &DependencyVersion)> {
        self.modules
            .iter()
            .flat_map(|(module, versions)| versions.iter().map(move |version| (module, version)))
    }

    pub fn versions(&self, module: &ModuleId) -> Option<&[DependencyVersion]> {
        self.modules.get(module).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Configurations of one project.
///
/// Configurations are stored as they arrive; consumers that need a stable
/// order use [`ProjectLock::sorted_configurations`]. Two projects are equal
/// when they hold the same set of configurations.
#[derive(Debug, Clone, Default)]
pub struct ProjectLock {
    configurations: OrderedMap<String, ConfigurationLock>,
}

impl ProjectLock {
    /// Configurations in insertion order.
    pub fn configurations(&self) -> impl Iterator<Item = (&str, &ConfigurationLock)> {
        self.configurations
            .iter()
            .map(|(name, configuration)| (name.as_str(), configuration))
    }

    /// Configurations sorted by name.
    pub fn sorted_configurations(&self) -> Vec<(&str, &ConfigurationLock)> {
        self.configurations
            .sorted()
            .into_iter()
            .map(|(name, configuration)| (name.as_str(), configuration))
            .collect()
    }

    pub fn configuration(&self, name: &str) -> Option<&ConfigurationLock> {
        self.configurations.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }
}

impl PartialEq for ProjectLock {
    fn eq(&self, other: &Self) -> bool {
        self.sorted_configurations() == other.sorted_configurations()
    }
}

impl Eq for ProjectLock {}

/// Resolved dependency versions of a build, per project and configuration.
///
/// Filled by a single writer, then handed by reference to a converter.
/// Projects keep the order in which they were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyLock {
    projects: OrderedMap<String, ProjectLock>,
}

impl DependencyLock {
    pub fn new() -> DependencyLock {
        DependencyLock::default()
    }

    pub fn add_project(&mut self, project: &str) -> Result<&mut ProjectLock, ModelError> {
        require_identifier("project path", project)?;
        Ok(self
            .projects
            .get_or_insert_with(project.to_owned(), ProjectLock::default))
    }

    pub fn add_configuration(
        &mut self,
        project: &str,
        configuration: &str,
    ) -> Result<&mut ConfigurationLock, ModelError> {
        require_identifier("configuration name", configuration)?;
        let project = self.add_project(project)?;
        Ok(project
            .configurations
            .get_or_insert_with(configuration.to_owned(), ConfigurationLock::default))
    }

    /// Appends a record, creating the project and configuration on first use.
    pub fn add_record(
        &mut self,
        project: &str,
        configuration: &str,
        module: ModuleId,
        requested_version: impl Into<String>,
        selected_version: impl Into<String>,
    ) -> Result<(), ModelError> {
        self.add_configuration(project, configuration)?.push(
            module,
            DependencyVersion::new(requested_version, selected_version),
        );
        Ok(())
    }

    /// Projects in insertion order.
    pub fn projects(&self) -> impl Iterator<Item = (&str, &ProjectLock)> {
        self.projects
            .iter()
            .map(|(path, project)| (path.as_str(), project))
    }

    pub fn project(&self, path: &str) -> Option<&ProjectLock> {
        self.projects.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

fn require_identifier(kind: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        Err(ModelError::InvalidInput(format!("{} must not be empty", kind)))
    } else {
        Ok(())
    }
}
