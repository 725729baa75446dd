//! Decide which artifacts a generation request will produce.
//!
//! Existence is checked against whatever snapshot the caller passes in;
//! within one request the first occurrence of a name wins and later
//! occurrences are skipped as duplicates.

use std::collections::HashSet;

use super::types::{ArtifactKind, Skip, SkipReason};

/// Artifacts to emit for one manager, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaffoldPlan {
    /// States that get a `TransitionTo<State>` method.
    pub transitions: Vec<String>,
    /// State referenced by the initial-state bootstrap, if any.
    pub bootstrap: Option<String>,
    /// States that get their own file.
    pub state_files: Vec<String>,
    pub skipped: Vec<Skip>,
}

pub fn plan_scaffold(
    states: &[String],
    emit_transitions: bool,
    exists: impl Fn(&str) -> bool,
) -> ScaffoldPlan {
    let mut plan = ScaffoldPlan::default();
    let mut seen: HashSet<&str> = HashSet::new();

    for (position, state) in states.iter().enumerate() {
        let name = state.as_str();
        let reason = if !seen.insert(name) {
            Some(SkipReason::Duplicate)
        } else if exists(name) {
            Some(SkipReason::Exists)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                if emit_transitions {
                    plan.skipped
                        .push(Skip::new(name, ArtifactKind::Transition, reason));
                }
                if position == 0 {
                    plan.skipped
                        .push(Skip::new(name, ArtifactKind::Bootstrap, reason));
                }
                plan.skipped
                    .push(Skip::new(name, ArtifactKind::StateFile, reason));
            }
            None => {
                if emit_transitions {
                    plan.transitions.push(state.clone());
                }
                if position == 0 {
                    plan.bootstrap = Some(state.clone());
                }
                plan.state_files.push(state.clone());
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn fresh_names_produce_every_artifact() {
        let plan = plan_scaffold(&names(&["Idle", "Run"]), true, |_| false);
        assert_eq!(plan.transitions, names(&["Idle", "Run"]));
        assert_eq!(plan.bootstrap.as_deref(), Some("Idle"));
        assert_eq!(plan.state_files, names(&["Idle", "Run"]));
        assert!(plan.skipped.is_empty());
    }

    #[test]
    fn existing_first_state_skips_bootstrap_transition_and_file() {
        let plan = plan_scaffold(&names(&["Idle", "Run"]), true, |name| name == "Idle");

        assert_eq!(plan.transitions, names(&["Run"]));
        assert_eq!(plan.bootstrap, None);
        assert_eq!(plan.state_files, names(&["Run"]));
        assert_eq!(
            plan.skipped,
            vec![
                Skip::new("Idle", ArtifactKind::Transition, SkipReason::Exists),
                Skip::new("Idle", ArtifactKind::Bootstrap, SkipReason::Exists),
                Skip::new("Idle", ArtifactKind::StateFile, SkipReason::Exists),
            ]
        );
    }

    #[test]
    fn duplicate_names_are_generated_once() {
        let plan = plan_scaffold(&names(&["Idle", "Run", "Idle"]), true, |_| false);

        assert_eq!(plan.transitions, names(&["Idle", "Run"]));
        assert_eq!(plan.state_files, names(&["Idle", "Run"]));
        assert_eq!(
            plan.skipped,
            vec![
                Skip::new("Idle", ArtifactKind::Transition, SkipReason::Duplicate),
                Skip::new("Idle", ArtifactKind::StateFile, SkipReason::Duplicate),
            ]
        );
    }

    #[test]
    fn transitions_disabled_still_bootstraps_first_state() {
        let plan = plan_scaffold(&names(&["Idle", "Run"]), false, |_| false);
        assert!(plan.transitions.is_empty());
        assert_eq!(plan.bootstrap.as_deref(), Some("Idle"));
        assert_eq!(plan.state_files.len(), 2);
    }

    #[test]
    fn empty_request_plans_nothing() {
        assert_eq!(plan_scaffold(&[], true, |_| true), ScaffoldPlan::default());
    }
}
