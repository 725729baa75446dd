use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use statesmith::core::types::{PatchOutcome, Skip};
use statesmith::exit_codes;
use statesmith::io::config::Project;
use statesmith::io::index::{ArtifactIndex, ProjectIndex};
use statesmith::io::init::{InitOptions, init_project};
use statesmith::io::templates::{TemplateSource, TemplateStore};
use statesmith::logging;
use statesmith::patch::{AddStateOutcome, PatchRequest, add_state, add_transition};
use statesmith::scaffold::{GenerationRequest, generate_manager_and_states};

#[derive(Parser)]
#[command(
    name = "statesmith",
    version,
    about = "Scaffold state managers and states from text templates"
)]
struct Cli {
    /// Project root (defaults to the current directory).
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Config file (defaults to `<project>/statesmith.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print command outcomes as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write `statesmith.toml` and the default templates.
    Init {
        /// Overwrite existing config and templates.
        #[arg(short, long)]
        force: bool,
        /// Also write the `IState`/`StateManager` runtime sources into DIR.
        #[arg(long, value_name = "DIR")]
        runtime: Option<PathBuf>,
    },
    /// Generate a state manager and one file per state.
    New {
        /// Manager class name.
        manager: String,
        /// State name; repeat for more states. The first is the initial state.
        #[arg(short, long = "state", value_name = "STATE")]
        states: Vec<String>,
        /// Directory the `<MANAGER>/` folder is created in (defaults to the project root).
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,
        /// Do not generate `TransitionTo<State>` methods.
        #[arg(long)]
        no_transitions: bool,
        /// Regenerate the manager file if it already exists.
        #[arg(short, long)]
        force: bool,
    },
    /// Add a state file next to an existing manager, plus its transition.
    AddState {
        manager_file: PathBuf,
        state: String,
        /// Only write the state file.
        #[arg(long)]
        no_transition: bool,
    },
    /// Insert `TransitionTo<STATE>` into an existing manager.
    Patch { manager_file: PathBuf, state: String },
    /// Print whether an artifact with NAME exists in the project.
    Exists { name: String },
    /// Show where each template resolves from.
    Templates,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let root = match &cli.project {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("read current directory")?,
    };

    let config = cli.config.as_deref();
    let open = || Project::open(&root, config);
    match cli.command {
        Command::Init { force, runtime } => cmd_init(&root, config, force, runtime, cli.json),
        Command::New {
            manager,
            states,
            dest,
            no_transitions,
            force,
        } => cmd_new(
            &open()?,
            manager,
            states,
            dest,
            no_transitions,
            force,
            cli.json,
        ),
        Command::AddState {
            manager_file,
            state,
            no_transition,
        } => cmd_add_state(&open()?, manager_file, state, no_transition, cli.json),
        Command::Patch {
            manager_file,
            state,
        } => cmd_patch(&open()?, &manager_file, &state, cli.json),
        Command::Exists { name } => cmd_exists(&open()?, &name, cli.json),
        Command::Templates => cmd_templates(&open()?, cli.json),
    }
}

fn cmd_init(
    root: &Path,
    config: Option<&Path>,
    force: bool,
    runtime_dir: Option<PathBuf>,
    json: bool,
) -> Result<i32> {
    let config_path = config
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Project::default_config_path(root));
    let outcome = init_project(root, &config_path, &InitOptions { force, runtime_dir })?;
    if json {
        print_json(&outcome)?;
    } else {
        for path in outcome
            .config
            .iter()
            .chain(&outcome.templates)
            .chain(&outcome.runtime)
        {
            println!("wrote {}", path.display());
        }
    }
    Ok(exit_codes::OK)
}

fn cmd_new(
    project: &Project,
    manager: String,
    states: Vec<String>,
    dest: Option<PathBuf>,
    no_transitions: bool,
    force: bool,
    json: bool,
) -> Result<i32> {
    let request = GenerationRequest {
        manager,
        states,
        destination: dest.unwrap_or_else(|| project.root.clone()),
        emit_transitions: !no_transitions,
        force,
    };
    let mut index = ProjectIndex::from_project(project).context("index project")?;
    let outcome = generate_manager_and_states(project, &request, &mut index)?;
    if json {
        print_json(&outcome)?;
    } else {
        for path in &outcome.written {
            println!("wrote {}", path.display());
        }
        print_skips(&outcome.skipped);
    }
    Ok(exit_codes::OK)
}

fn cmd_add_state(
    project: &Project,
    manager_file: PathBuf,
    state: String,
    no_transition: bool,
    json: bool,
) -> Result<i32> {
    let request = PatchRequest {
        manager_path: manager_file,
        state,
        emit_transition: !no_transition,
    };
    let mut index = ProjectIndex::from_project(project).context("index project")?;
    let outcome = add_state(project, &request, &mut index)?;
    if json {
        print_json(&outcome)?;
    }
    match outcome {
        AddStateOutcome::ManagerNotFound => {
            if !json {
                eprintln!(
                    "state manager not found: {}",
                    project.resolve(&request.manager_path).display()
                );
            }
            Ok(exit_codes::NOT_FOUND)
        }
        AddStateOutcome::Applied {
            state_file,
            skipped,
            transition,
        } => {
            if !json {
                if let Some(path) = state_file {
                    println!("wrote {}", path.display());
                }
                print_skips(&skipped);
                if let Some(transition) = transition {
                    print_patch(&request.manager_path, &request.state, transition);
                }
            }
            Ok(match transition {
                Some(PatchOutcome::FileNotFound) => exit_codes::NOT_FOUND,
                _ => exit_codes::OK,
            })
        }
    }
}

fn cmd_patch(project: &Project, manager_file: &Path, state: &str, json: bool) -> Result<i32> {
    let outcome = add_transition(project, manager_file, state)?;
    if json {
        print_json(&outcome)?;
    } else {
        print_patch(manager_file, state, outcome);
    }
    Ok(match outcome {
        PatchOutcome::FileNotFound => exit_codes::NOT_FOUND,
        PatchOutcome::Success | PatchOutcome::AlreadyExists => exit_codes::OK,
    })
}

fn cmd_exists(project: &Project, name: &str, json: bool) -> Result<i32> {
    let index = ProjectIndex::from_project(project).context("index project")?;
    let exists = index.exists(name);
    if json {
        print_json(&serde_json::json!({ "name": name, "exists": exists }))?;
    } else {
        println!("{exists}");
    }
    Ok(exit_codes::OK)
}

fn cmd_templates(project: &Project, json: bool) -> Result<i32> {
    let statuses = TemplateStore::from_project(project).status()?;
    if json {
        print_json(&statuses)?;
        return Ok(exit_codes::OK);
    }
    for status in &statuses {
        let resolved = match &status.resolved {
            Some(TemplateSource::File(path)) => path.display().to_string(),
            Some(TemplateSource::Builtin) => "built-in default".to_string(),
            None => format!("missing ({})", status.path.display()),
        };
        println!("{}: {}", status.kind.as_str(), resolved);
    }
    Ok(exit_codes::OK)
}

fn print_patch(manager_file: &Path, state: &str, outcome: PatchOutcome) {
    match outcome {
        PatchOutcome::Success => {
            println!("added TransitionTo{state} to {}", manager_file.display());
        }
        PatchOutcome::AlreadyExists => {
            println!(
                "TransitionTo{state} already present in {}",
                manager_file.display()
            );
        }
        PatchOutcome::FileNotFound => {
            eprintln!("state manager not found: {}", manager_file.display());
        }
    }
}

fn print_skips(skipped: &[Skip]) {
    for skip in skipped {
        eprintln!("warning: {skip}");
    }
}

/// Serialize `value` to pretty-printed JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{payload}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_new_with_states() {
        let cli = Cli::parse_from([
            "statesmith", "new", "Player", "-s", "Idle", "--state", "Run", "--dest", "Assets",
        ]);
        match cli.command {
            Command::New {
                manager,
                states,
                dest,
                no_transitions,
                force,
            } => {
                assert_eq!(manager, "Player");
                assert_eq!(states, vec!["Idle", "Run"]);
                assert_eq!(dest, Some(PathBuf::from("Assets")));
                assert!(!no_transitions);
                assert!(!force);
            }
            _ => panic!("expected new"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["statesmith", "patch", "Player/Player.cs", "Jump", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Patch { .. }));
    }

    #[test]
    fn parse_init_force() {
        let cli = Cli::parse_from(["statesmith", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Command::Init {
                force: true,
                runtime: None
            }
        ));
    }
}
