//! Orchestration for `statesmith patch` and `statesmith add-state`.
//!
//! Patching re-reads the manager file from disk every time; there is no
//! in-memory model of previously generated files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::fragments::{render_fragment, transition_method_name};
use crate::core::insert::{PatchPlan, plan_transition_patch};
use crate::core::names::check_identifier;
use crate::core::render::{MANAGER_NAME, PlaceholderMap, STATE_NAME};
use crate::core::types::{ArtifactKind, PatchOutcome, Skip, SkipReason};
use crate::io::artifact::write_atomic;
use crate::io::config::Project;
use crate::io::index::ArtifactIndex;
use crate::io::templates::{TemplateKind, TemplateStore};
use crate::scaffold::render_checked;

/// One "add state to an existing manager" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRequest {
    pub manager_path: PathBuf,
    pub state: String,
    pub emit_transition: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AddStateOutcome {
    /// The manager file does not exist; nothing was written.
    ManagerNotFound,
    Applied {
        /// State file written, if it did not already exist.
        state_file: Option<PathBuf>,
        skipped: Vec<Skip>,
        /// Transition patch result, if a transition was requested.
        transition: Option<PatchOutcome>,
    },
}

/// Insert `TransitionTo<state>` into the manager at `manager_path`.
///
/// Re-running with the same state is a no-op that reports `AlreadyExists`.
pub fn add_transition(project: &Project, manager_path: &Path, state: &str) -> Result<PatchOutcome> {
    check_identifier("state name", state).map_err(|msg| anyhow!(msg))?;
    let manager_path = project.resolve(manager_path);
    if !manager_path.is_file() {
        warn!(path = %manager_path.display(), "state manager file not found");
        return Ok(PatchOutcome::FileNotFound);
    }

    let text = fs::read_to_string(&manager_path)
        .with_context(|| format!("read {}", manager_path.display()))?;
    let manager = manager_name(&manager_path)?;
    let fragment = TemplateStore::from_project(project).load_fragment(TemplateKind::Transition)?;
    let block = render_fragment(&fragment.text, state, &manager);

    match plan_transition_patch(&text, state, &block, project.config.marker()) {
        PatchPlan::AlreadyPresent => {
            warn!(
                method = %transition_method_name(state),
                path = %manager_path.display(),
                "transition already present, skipping"
            );
            Ok(PatchOutcome::AlreadyExists)
        }
        PatchPlan::NoInsertionPoint => Err(anyhow!(
            "{} has no insertion point (no closing brace or marker)",
            manager_path.display()
        )),
        PatchPlan::Insert { text, point } => {
            debug!(offset = point.offset(), ?point, "inserting transition");
            write_atomic(&manager_path, &text)?;
            info!(
                method = %transition_method_name(state),
                path = %manager_path.display(),
                "transition added"
            );
            Ok(PatchOutcome::Success)
        }
    }
}

/// Add a state file next to an existing manager and optionally a transition.
///
/// A state that already exists in the project is reported as skipped and
/// neither its file nor the manager is touched.
pub fn add_state<I: ArtifactIndex + ?Sized>(
    project: &Project,
    request: &PatchRequest,
    index: &mut I,
) -> Result<AddStateOutcome> {
    check_identifier("state name", &request.state).map_err(|msg| anyhow!(msg))?;
    let manager_path = project.resolve(&request.manager_path);
    if !manager_path.is_file() {
        warn!(path = %manager_path.display(), "state manager file not found");
        return Ok(AddStateOutcome::ManagerNotFound);
    }
    let manager = manager_name(&manager_path)?;
    let state_template = TemplateStore::from_project(project).load_required(TemplateKind::State)?;

    let folder = manager_path
        .parent()
        .with_context(|| format!("manager path missing parent {}", manager_path.display()))?;
    let path = folder.join(project.artifact_file_name(&request.state));
    if index.exists(&request.state) || path.exists() {
        let skip = Skip::new(&request.state, ArtifactKind::StateFile, SkipReason::Exists);
        warn!(name = %skip.name, "state already exists, nothing added");
        return Ok(AddStateOutcome::Applied {
            state_file: None,
            skipped: vec![skip],
            transition: None,
        });
    }

    let map = PlaceholderMap::new()
        .with(STATE_NAME, request.state.as_str())
        .with(MANAGER_NAME, manager.as_str());
    write_atomic(&path, &render_checked(&state_template, &map))?;
    info!(path = %path.display(), "state generated");

    let transition = if request.emit_transition {
        Some(add_transition(project, &manager_path, &request.state)?)
    } else {
        None
    };

    if let Err(err) = index.refresh() {
        warn!(error = %format!("{err:#}"), "project index refresh failed");
    }

    Ok(AddStateOutcome::Applied {
        state_file: Some(path),
        skipped: Vec::new(),
        transition,
    })
}

fn manager_name(manager_path: &Path) -> Result<String> {
    manager_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("cannot derive manager name from {}", manager_path.display()))
}
