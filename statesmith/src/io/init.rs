//! `statesmith init`: config, default templates and runtime support files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::info;

use super::artifact::write_atomic;
use super::config::{Project, ScaffoldConfig, write_config};
use super::templates::TemplateStore;

const RUNTIME_STATE: &str = include_str!("defaults/IState.cs");
const RUNTIME_MANAGER: &str = include_str!("defaults/StateManager.cs");

/// Options for `init_project`.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Overwrite an existing config and templates.
    pub force: bool,
    /// Also write the `IState`/`StateManager` runtime sources here
    /// (relative to the project root unless absolute).
    pub runtime_dir: Option<PathBuf>,
}

/// Files written by `init_project`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InitOutcome {
    pub config: Option<PathBuf>,
    pub templates: Vec<PathBuf>,
    pub runtime: Vec<PathBuf>,
}

/// Set up `root` for scaffolding.
///
/// Fails if `config_path` already exists unless `options.force` is set.
/// Template files that already exist are kept unless forced.
pub fn init_project(root: &Path, config_path: &Path, options: &InitOptions) -> Result<InitOutcome> {
    if !root.is_dir() {
        return Err(anyhow!(
            "statesmith init: project root {} is not a directory",
            root.display()
        ));
    }
    if config_path.exists() && !options.force {
        return Err(anyhow!(
            "statesmith init: {} already exists (use --force to overwrite)",
            config_path.display()
        ));
    }

    let config = ScaffoldConfig::default();
    write_config(config_path, &config)
        .with_context(|| format!("write {}", config_path.display()))?;
    let project = Project::new(root, config);
    let mut outcome = InitOutcome {
        config: Some(config_path.to_path_buf()),
        ..InitOutcome::default()
    };

    let store = TemplateStore::from_project(&project);
    outcome.templates = store.install_defaults(options.force)?;

    if let Some(runtime_dir) = &options.runtime_dir {
        let runtime_dir = project.resolve(runtime_dir);
        for (name, contents) in [("IState.cs", RUNTIME_STATE), ("StateManager.cs", RUNTIME_MANAGER)] {
            let path = runtime_dir.join(name);
            if path.exists() && !options.force {
                continue;
            }
            write_atomic(&path, contents)?;
            outcome.runtime.push(path);
        }
    }

    info!(
        root = %root.display(),
        templates = outcome.templates.len(),
        runtime = outcome.runtime.len(),
        "project initialised"
    );
    Ok(outcome)
}
