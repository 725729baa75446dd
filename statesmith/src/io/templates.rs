//! Template store: named template files under the configured directory.
//!
//! A missing template file is an absence (`Ok(None)`), not an error. The
//! manager and state templates are required by the generator; the transition
//! and bootstrap fragments fall back to the built-in defaults when the
//! directory does not override them.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::debug;

use super::artifact::write_atomic;
use super::config::{Project, TemplateFiles};

const MANAGER_DEFAULT: &str = include_str!("defaults/StateManagerTemplate.txt");
const STATE_DEFAULT: &str = include_str!("defaults/StateTemplate.txt");
const TRANSITION_DEFAULT: &str = include_str!("defaults/TransitionTemplate.txt");
const BOOTSTRAP_DEFAULT: &str = include_str!("defaults/InitialStateTemplate.txt");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Manager,
    State,
    Transition,
    Bootstrap,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 4] = [
        TemplateKind::Manager,
        TemplateKind::State,
        TemplateKind::Transition,
        TemplateKind::Bootstrap,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Manager => "manager",
            TemplateKind::State => "state",
            TemplateKind::Transition => "transition",
            TemplateKind::Bootstrap => "bootstrap",
        }
    }

    /// Configured file name for this kind.
    pub fn file_name(self, files: &TemplateFiles) -> &str {
        match self {
            TemplateKind::Manager => &files.manager,
            TemplateKind::State => &files.state,
            TemplateKind::Transition => &files.transition,
            TemplateKind::Bootstrap => &files.bootstrap,
        }
    }

    /// Built-in text shipped with the binary.
    pub fn builtin(self) -> &'static str {
        match self {
            TemplateKind::Manager => MANAGER_DEFAULT,
            TemplateKind::State => STATE_DEFAULT,
            TemplateKind::Transition => TRANSITION_DEFAULT,
            TemplateKind::Bootstrap => BOOTSTRAP_DEFAULT,
        }
    }

    /// Whether the generator refuses to run without a file for this kind.
    pub fn is_required(self) -> bool {
        matches!(self, TemplateKind::Manager | TemplateKind::State)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "path", rename_all = "snake_case")]
pub enum TemplateSource {
    File(PathBuf),
    Builtin,
}

/// Loaded template text. Never modified after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub kind: TemplateKind,
    pub source: TemplateSource,
    pub text: String,
}

/// How a template kind resolves right now, for `statesmith templates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateStatus {
    pub kind: TemplateKind,
    pub path: PathBuf,
    /// `None` when a required template is missing.
    pub resolved: Option<TemplateSource>,
}

#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
    files: TemplateFiles,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>, files: TemplateFiles) -> Self {
        Self {
            root: root.into(),
            files,
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self::new(project.template_dir(), project.config.templates.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, kind: TemplateKind) -> PathBuf {
        self.root.join(kind.file_name(&self.files))
    }

    /// Read the template file for `kind`; `Ok(None)` if it does not exist.
    pub fn load(&self, kind: TemplateKind) -> Result<Option<Template>> {
        let path = self.path_for(kind);
        match fs::read_to_string(&path) {
            Ok(text) => {
                debug!(kind = kind.as_str(), path = %path.display(), "template loaded");
                Ok(Some(Template {
                    kind,
                    source: TemplateSource::File(path),
                    text,
                }))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(kind = kind.as_str(), path = %path.display(), "template missing");
                Ok(None)
            }
            Err(err) => {
                Err(err).with_context(|| format!("read {} template {}", kind.as_str(), path.display()))
            }
        }
    }

    /// Load a template the caller cannot proceed without.
    pub fn load_required(&self, kind: TemplateKind) -> Result<Template> {
        match self.load(kind)? {
            Some(template) => Ok(template),
            None => bail!(
                "{} template not found at {} (run `statesmith init` to install the defaults)",
                kind.as_str(),
                self.path_for(kind).display()
            ),
        }
    }

    /// Load a fragment template, falling back to the built-in text.
    pub fn load_fragment(&self, kind: TemplateKind) -> Result<Template> {
        Ok(self.load(kind)?.unwrap_or_else(|| Template {
            kind,
            source: TemplateSource::Builtin,
            text: kind.builtin().to_string(),
        }))
    }

    pub fn status(&self) -> Result<Vec<TemplateStatus>> {
        TemplateKind::ALL
            .into_iter()
            .map(|kind| {
                let resolved = match self.load(kind)? {
                    Some(template) => Some(template.source),
                    None if kind.is_required() => None,
                    None => Some(TemplateSource::Builtin),
                };
                Ok(TemplateStatus {
                    kind,
                    path: self.path_for(kind),
                    resolved,
                })
            })
            .collect()
    }

    /// Write the built-in templates into the store directory.
    ///
    /// Existing files are kept unless `force` is set. Returns the paths written.
    pub fn install_defaults(&self, force: bool) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for kind in TemplateKind::ALL {
            let path = self.path_for(kind);
            if path.exists() && !force {
                debug!(path = %path.display(), "template exists, keeping");
                continue;
            }
            write_atomic(&path, kind.builtin())?;
            written.push(path);
        }
        Ok(written)
    }
}
