//! Existence oracle: which source artifacts already exist in the project.
//!
//! The index is a snapshot of file stems taken by walking the project root.
//! Generation checks names against the snapshot taken before the request and
//! refreshes it once the request has written its files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use super::config::Project;

/// Lookup used to avoid overwriting or duplicating generated artifacts.
pub trait ArtifactIndex {
    /// True if a source artifact whose file stem equals `name` exists.
    /// Implementations should answer `true` when they cannot tell.
    fn exists(&self, name: &str) -> bool;

    /// Pick up files written since the index was built.
    fn refresh(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ArtifactIndex for HashSet<String> {
    fn exists(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Filesystem-backed index of every `*.<extension>` file under a root.
#[derive(Debug, Clone)]
pub struct ProjectIndex {
    root: PathBuf,
    extension: String,
    exclude: Vec<String>,
    stems: HashSet<String>,
    uncertain: bool,
}

impl ProjectIndex {
    pub fn scan(root: impl Into<PathBuf>, extension: &str, exclude: &[String]) -> Result<Self> {
        let mut index = Self {
            root: root.into(),
            extension: extension.to_string(),
            exclude: exclude.to_vec(),
            stems: HashSet::new(),
            uncertain: false,
        };
        index.rebuild()?;
        Ok(index)
    }

    pub fn from_project(project: &Project) -> Result<Self> {
        Self::scan(
            &project.root,
            &project.config.extension,
            &project.config.index.exclude,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of distinct artifact names seen.
    pub fn len(&self) -> usize {
        self.stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stems.is_empty()
    }

    /// True if part of the tree could not be read; every lookup then
    /// reports existence.
    pub fn is_uncertain(&self) -> bool {
        self.uncertain
    }

    fn rebuild(&mut self) -> Result<()> {
        if !self.root.is_dir() {
            bail!("project root {} is not a directory", self.root.display());
        }
        let mut stems = HashSet::new();
        let mut uncertain = false;

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_skipped_dir(entry));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(error = %err, "project index incomplete; treating every name as existing");
                    uncertain = true;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                stems.insert(stem.to_string_lossy().into_owned());
            }
        }

        debug!(
            root = %self.root.display(),
            artifacts = stems.len(),
            uncertain,
            "project index built"
        );
        self.stems = stems;
        self.uncertain = uncertain;
        Ok(())
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }
        is_skipped_dir_name(&entry.file_name().to_string_lossy(), &self.exclude)
    }
}

/// Directory names the walk never descends into.
pub fn is_skipped_dir_name(name: &str, exclude: &[String]) -> bool {
    name.starts_with('.') || exclude.iter().any(|excluded| excluded == name)
}

/// Fail unless `dir` lies under the project root and outside every
/// directory the walk skips.
///
/// `dir` must be absolute with symlinks already resolved; it need not exist.
pub fn check_indexed_dir(project: &Project, dir: &Path) -> Result<()> {
    let root = project
        .root
        .canonicalize()
        .with_context(|| format!("resolve project root {}", project.root.display()))?;
    let relative = dir.strip_prefix(&root).map_err(|_| {
        anyhow!(
            "{} is outside the project root {}",
            dir.display(),
            root.display()
        )
    })?;
    for component in relative.components() {
        let name = component.as_os_str().to_string_lossy();
        if is_skipped_dir_name(&name, &project.config.index.exclude) {
            bail!(
                "{} is inside `{name}`, which the project index does not scan",
                dir.display()
            );
        }
    }
    Ok(())
}

impl ArtifactIndex for ProjectIndex {
    fn exists(&self, name: &str) -> bool {
        self.uncertain || self.stems.contains(name)
    }

    fn refresh(&mut self) -> Result<()> {
        self.rebuild()
    }
}
