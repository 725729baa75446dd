//! Test-only helpers for building throwaway projects.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::io::config::{Project, ScaffoldConfig};
use crate::io::index::ProjectIndex;
use crate::io::templates::TemplateStore;
use crate::scaffold::GenerationRequest;

/// Owned list of names from string literals.
pub fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// A project rooted in a temp directory with the default config.
pub struct TestProject {
    dir: TempDir,
    pub project: Project,
}

impl TestProject {
    /// Empty project: no config file, no templates.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp dir")?;
        let project = Project::new(dir.path(), ScaffoldConfig::default());
        Ok(Self { dir, project })
    }

    /// Project with the built-in templates installed.
    pub fn with_default_templates() -> Result<Self> {
        let project = Self::new()?;
        TemplateStore::from_project(&project.project).install_defaults(false)?;
        Ok(project)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Request generating `manager` with `states` into the project root.
    pub fn request(&self, manager: &str, states: &[&str]) -> GenerationRequest {
        GenerationRequest {
            manager: manager.to_string(),
            states: names(states),
            destination: self.path().to_path_buf(),
            emit_transitions: true,
            force: false,
        }
    }

    pub fn index(&self) -> Result<ProjectIndex> {
        ProjectIndex::from_project(&self.project)
    }

    /// Write `contents` to `rel` under the project root, creating parents.
    pub fn write(&self, rel: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create directory {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.path().join(rel);
        fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))
    }
}
