//! Project configuration stored in `statesmith.toml` at the project root.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::artifact::write_atomic;

pub const CONFIG_FILE: &str = "statesmith.toml";

/// Scaffolding configuration (TOML).
///
/// Edited by humans; missing fields fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScaffoldConfig {
    /// Template directory, relative to the project root unless absolute.
    pub template_dir: PathBuf,

    /// Extension of generated source files, without the leading dot.
    pub extension: String,

    pub templates: TemplateFiles,
    pub index: IndexConfig,
    pub patch: PatchConfig,
}

/// File names of each template inside `template_dir`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateFiles {
    pub manager: String,
    pub state: String,
    pub transition: String,
    pub bootstrap: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory names never walked when looking for existing artifacts.
    /// Hidden directories are always skipped.
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PatchConfig {
    /// Line marker new transition methods are inserted above. Empty disables
    /// the marker and always uses the last closing brace.
    pub marker: String,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            template_dir: PathBuf::from(".statesmith/templates"),
            extension: "cs".to_string(),
            templates: TemplateFiles::default(),
            index: IndexConfig::default(),
            patch: PatchConfig::default(),
        }
    }
}

impl Default for TemplateFiles {
    fn default() -> Self {
        Self {
            manager: "StateManagerTemplate.txt".to_string(),
            state: "StateTemplate.txt".to_string(),
            transition: "TransitionTemplate.txt".to_string(),
            bootstrap: "InitialStateTemplate.txt".to_string(),
        }
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            exclude: ["target", "Library", "Temp", "obj", "bin"]
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            marker: "// statesmith:transitions".to_string(),
        }
    }
}

impl ScaffoldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.template_dir.as_os_str().is_empty() {
            return Err(anyhow!("template_dir must not be empty"));
        }
        if self.extension.trim().is_empty() {
            return Err(anyhow!("extension must not be empty"));
        }
        if self.extension.starts_with('.') || self.extension.contains(['/', '\\']) {
            return Err(anyhow!(
                "extension must be a bare suffix like \"cs\" (got '{}')",
                self.extension
            ));
        }
        for (field, value) in [
            ("templates.manager", &self.templates.manager),
            ("templates.state", &self.templates.state),
            ("templates.transition", &self.templates.transition),
            ("templates.bootstrap", &self.templates.bootstrap),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow!("{field} must not be empty"));
            }
        }
        Ok(())
    }

    /// Marker used by the patcher, if enabled.
    pub fn marker(&self) -> Option<&str> {
        Some(self.patch.marker.as_str()).filter(|marker| !marker.trim().is_empty())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ScaffoldConfig::default()`.
pub fn load_config(path: &Path) -> Result<ScaffoldConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = ScaffoldConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ScaffoldConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ScaffoldConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    if !buf.ends_with('\n') {
        buf.push('\n');
    }
    write_atomic(path, &buf)
}

/// A project root with its configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: ScaffoldConfig,
}

impl Project {
    pub fn new(root: impl Into<PathBuf>, config: ScaffoldConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Load the project at `root`, reading `config_path` or
    /// `<root>/statesmith.toml` when none is given.
    pub fn open(root: impl Into<PathBuf>, config_path: Option<&Path>) -> Result<Self> {
        let root = root.into();
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| Self::default_config_path(&root));
        let config = load_config(&config_path)?;
        Ok(Self { root, config })
    }

    pub fn default_config_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Resolve `path` against the project root unless it is absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn template_dir(&self) -> PathBuf {
        self.resolve(&self.config.template_dir)
    }

    /// File name of a generated artifact, e.g. `Player.cs`.
    pub fn artifact_file_name(&self, name: &str) -> String {
        format!("{name}.{}", self.config.extension)
    }
}
