//! Orchestration for `statesmith new`: one manager file plus one file per state.
//!
//! Configuration problems (bad names, bad destination, missing templates)
//! are reported before anything is written. Name conflicts are not errors:
//! the affected artifact is skipped and listed in the outcome. The request is
//! not transactional across files; each file is written atomically on its own.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::core::fragments::{render_fragment, render_fragments};
use crate::core::names::check_identifier;
use crate::core::plan::plan_scaffold;
use crate::core::render::{
    FIRST_STATE_NAME, INITIAL_STATE_SETUP, MANAGER_NAME, PlaceholderMap, STATE_NAME, TRANSITIONS,
    render, unresolved_placeholders,
};
use crate::core::types::{ArtifactKind, Skip, SkipReason};
use crate::io::artifact::{create_dir, write_atomic};
use crate::io::config::Project;
use crate::io::index::{ArtifactIndex, check_indexed_dir};
use crate::io::templates::{Template, TemplateKind, TemplateStore};

/// First-state placeholder value when the request names no states.
pub const FIRST_STATE_FALLBACK: &str = "InitialState";

/// One "create manager" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub manager: String,
    /// State names in request order; the first one is the initial state.
    pub states: Vec<String>,
    /// Existing directory the `<manager>/` folder is created in.
    pub destination: PathBuf,
    pub emit_transitions: bool,
    /// Overwrite an existing manager file. State files are never overwritten.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScaffoldOutcome {
    pub folder: PathBuf,
    /// Files written, manager first.
    pub written: Vec<PathBuf>,
    pub skipped: Vec<Skip>,
}

/// Generate the manager and its state files for `request`.
///
/// `index` is consulted once per name before any write and refreshed after
/// the last write. A file already present in the manager folder counts as
/// existing even if the index missed it. An existing manager is skipped
/// unless `request.force` is set.
pub fn generate_manager_and_states<I: ArtifactIndex + ?Sized>(
    project: &Project,
    request: &GenerationRequest,
    index: &mut I,
) -> Result<ScaffoldOutcome> {
    validate_request(request)?;
    let destination = project.resolve(&request.destination);
    if !destination.is_dir() {
        return Err(anyhow!(
            "destination {} is not an existing directory",
            destination.display()
        ));
    }
    let canonical = destination
        .canonicalize()
        .with_context(|| format!("resolve destination {}", destination.display()))?;
    check_indexed_dir(project, &canonical.join(&request.manager))?;

    let store = TemplateStore::from_project(project);
    let manager_template = store.load_required(TemplateKind::Manager)?;
    let state_template = store.load_required(TemplateKind::State)?;
    let transition_template = store.load_fragment(TemplateKind::Transition)?;
    let bootstrap_template = store.load_fragment(TemplateKind::Bootstrap)?;

    let folder = destination.join(&request.manager);
    let exists = |name: &str| {
        index.exists(name) || folder.join(project.artifact_file_name(name)).exists()
    };

    let manager = request.manager.as_str();
    let manager_path = folder.join(project.artifact_file_name(manager));
    let mut skipped = Vec::new();
    let write_manager = if exists(manager) && !request.force {
        skipped.push(Skip::new(manager, ArtifactKind::Manager, SkipReason::Exists));
        false
    } else {
        true
    };

    let plan = plan_scaffold(&request.states, request.emit_transitions, exists);
    skipped.extend(plan.skipped);
    for skip in &skipped {
        warn!(name = %skip.name, artifact = skip.artifact.as_str(), reason = ?skip.reason, "skipping artifact");
    }

    create_dir(&folder)?;
    let mut written = Vec::new();

    if write_manager {
        let transitions = render_fragments(
            &transition_template.text,
            plan.transitions.iter().map(String::as_str),
            manager,
        );
        let bootstrap = plan
            .bootstrap
            .as_deref()
            .map(|state| render_fragment(&bootstrap_template.text, state, manager))
            .unwrap_or_default();
        let first_state = request
            .states
            .first()
            .map_or(FIRST_STATE_FALLBACK, String::as_str);

        let manager_map = PlaceholderMap::new()
            .with(MANAGER_NAME, manager)
            .with(FIRST_STATE_NAME, first_state)
            .with(TRANSITIONS, transitions)
            .with(INITIAL_STATE_SETUP, bootstrap);
        write_atomic(&manager_path, &render_checked(&manager_template, &manager_map))?;
        info!(path = %manager_path.display(), forced = request.force, "state manager generated");
        written.push(manager_path);
    }

    for state in &plan.state_files {
        let state_map = PlaceholderMap::new()
            .with(STATE_NAME, state.as_str())
            .with(MANAGER_NAME, manager);
        let state_path = folder.join(project.artifact_file_name(state));
        write_atomic(&state_path, &render_checked(&state_template, &state_map))?;
        info!(path = %state_path.display(), "state generated");
        written.push(state_path);
    }

    if let Err(err) = index.refresh() {
        warn!(error = %format!("{err:#}"), "project index refresh failed");
    }

    Ok(ScaffoldOutcome {
        folder,
        written,
        skipped,
    })
}

fn validate_request(request: &GenerationRequest) -> Result<()> {
    check_identifier("manager name", &request.manager).map_err(|msg| anyhow!(msg))?;
    for state in &request.states {
        check_identifier("state name", state).map_err(|msg| anyhow!(msg))?;
        if *state == request.manager {
            return Err(anyhow!("state name `{state}` must differ from the manager name"));
        }
    }
    if request.destination.as_os_str().is_empty() {
        return Err(anyhow!("destination must not be empty"));
    }
    Ok(())
}

/// Render and log any `{{...}}` tokens the map did not cover.
pub(crate) fn render_checked(template: &Template, map: &PlaceholderMap) -> String {
    let rendered = render(&template.text, map);
    let unresolved = unresolved_placeholders(&rendered);
    if !unresolved.is_empty() {
        warn!(
            template = template.kind.as_str(),
            tokens = ?unresolved,
            "template left placeholders unresolved"
        );
    } else {
        debug!(template = template.kind.as_str(), "template rendered");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestProject, names};
    use std::collections::HashSet;

    #[test]
    fn empty_manager_name_is_rejected_before_any_write() {
        let project = TestProject::with_default_templates().expect("project");
        let request = project.request("", &["Idle"]);

        let err = generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .unwrap_err();
        assert!(err.to_string().contains("manager name must not be empty"));
    }

    #[test]
    fn missing_destination_is_rejected() {
        let project = TestProject::with_default_templates().expect("project");
        let mut request = project.request("Player", &["Idle"]);
        request.destination = PathBuf::from("Assets/Missing");

        let err = generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .unwrap_err();
        assert!(err.to_string().contains("not an existing directory"));
        assert!(!project.path().join("Assets").exists());
    }

    #[test]
    fn empty_state_list_uses_fallback_first_state() {
        let project = TestProject::with_default_templates().expect("project");
        let request = project.request("Boss", &[]);

        let outcome = generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .expect("generate");

        assert_eq!(outcome.written, vec![project.path().join("Boss/Boss.cs")]);
        let manager = project.read("Boss/Boss.cs").expect("read");
        assert!(manager.contains("\"InitialState\""));
        assert!(!manager.contains("TransitionTo"));
        assert!(!manager.contains("Start()"));
        assert!(!manager.contains("{{"));
    }

    #[test]
    fn existing_state_is_skipped_with_warning_and_not_overwritten() {
        let project = TestProject::with_default_templates().expect("project");
        let request = project.request("Player", &["Idle", "Run"]);
        let mut index: HashSet<String> = names(&["Run"]).into_iter().collect();

        let outcome =
            generate_manager_and_states(&project.project, &request, &mut index).expect("generate");

        assert_eq!(
            outcome.written,
            vec![
                project.path().join("Player/Player.cs"),
                project.path().join("Player/Idle.cs"),
            ]
        );
        assert!(
            outcome
                .skipped
                .contains(&Skip::new("Run", ArtifactKind::StateFile, SkipReason::Exists))
        );
        let manager = project.read("Player/Player.cs").expect("read");
        assert!(manager.contains("TransitionToIdle"));
        assert!(!manager.contains("TransitionToRun"));
    }

    #[test]
    fn transitions_can_be_disabled() {
        let project = TestProject::with_default_templates().expect("project");
        let mut request = project.request("Player", &["Idle", "Run"]);
        request.emit_transitions = false;

        generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .expect("generate");

        let manager = project.read("Player/Player.cs").expect("read");
        assert!(!manager.contains("TransitionTo"));
        assert!(manager.contains("SetState(new Idle(this));"));
    }

    #[test]
    fn invalid_state_name_is_rejected() {
        let project = TestProject::with_default_templates().expect("project");
        let request = project.request("Player", &["Idle", "../Escape"]);

        let err = generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .unwrap_err();
        assert!(err.to_string().contains("must be an identifier"));
        assert!(!project.path().join("Player").exists());
    }

    #[test]
    fn state_named_like_manager_is_rejected() {
        let project = TestProject::with_default_templates().expect("project");
        let request = project.request("Idle", &["Idle"]);

        let err = generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .unwrap_err();
        assert!(err.to_string().contains("must differ from the manager name"));
        assert!(!project.path().join("Idle").exists());
    }

    #[test]
    fn destination_outside_project_is_rejected() {
        let project = TestProject::with_default_templates().expect("project");
        let outside = tempfile::tempdir().expect("outside");
        let mut request = project.request("Player", &["Idle"]);
        request.destination = outside.path().to_path_buf();

        let err = generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .unwrap_err();
        assert!(err.to_string().contains("outside the project root"));
        assert!(!outside.path().join("Player").exists());
    }

    #[test]
    fn destination_in_unscanned_directory_is_rejected() {
        let project = TestProject::with_default_templates().expect("project");
        project.write("Library/keep.txt", "").expect("write");
        let mut request = project.request("Player", &["Idle"]);
        request.destination = PathBuf::from("Library");

        let err = generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .unwrap_err();
        assert!(err.to_string().contains("does not scan"));
        assert!(!project.path().join("Library/Player").exists());
    }

    #[test]
    fn file_in_manager_folder_is_kept_even_if_index_misses_it() {
        let project = TestProject::with_default_templates().expect("project");
        project.write("Player/Idle.cs", "// hand edited").expect("write");
        let request = project.request("Player", &["Idle", "Run"]);

        let outcome = generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .expect("generate");

        assert_eq!(project.read("Player/Idle.cs").expect("read"), "// hand edited");
        assert!(
            outcome
                .skipped
                .contains(&Skip::new("Idle", ArtifactKind::StateFile, SkipReason::Exists))
        );
        assert!(!outcome.written.contains(&project.path().join("Player/Idle.cs")));
    }

    #[test]
    fn existing_manager_is_kept_unless_forced() {
        let project = TestProject::with_default_templates().expect("project");
        project.write("Player/Player.cs", "// patched by hand").expect("write");
        let mut request = project.request("Player", &["Idle"]);

        let outcome = generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .expect("generate");
        assert_eq!(outcome.written, vec![project.path().join("Player/Idle.cs")]);
        assert_eq!(
            outcome.skipped,
            vec![Skip::new("Player", ArtifactKind::Manager, SkipReason::Exists)]
        );
        assert_eq!(project.read("Player/Player.cs").expect("read"), "// patched by hand");

        request.force = true;
        let outcome = generate_manager_and_states(&project.project, &request, &mut HashSet::<String>::new())
            .expect("forced");
        assert_eq!(outcome.written, vec![project.path().join("Player/Player.cs")]);
        let manager = project.read("Player/Player.cs").expect("read");
        assert!(manager.contains("public class Player : StateManager"));
        assert!(
            outcome
                .skipped
                .contains(&Skip::new("Idle", ArtifactKind::StateFile, SkipReason::Exists))
        );
    }
}
