//! Outcome types shared by the scaffold generator and the patcher.
//!
//! Soft results (skips, already-applied patches) are values, not errors, so
//! callers can keep going and report them together at the end.

use std::fmt;

use serde::Serialize;

/// Which generated artifact a skip refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The `<Manager>.<ext>` file.
    Manager,
    /// A `<State>.<ext>` file.
    StateFile,
    /// A `TransitionTo<State>` method in the manager.
    Transition,
    /// The initial-state bootstrap block in the manager.
    Bootstrap,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Manager => "state manager",
            ArtifactKind::StateFile => "state file",
            ArtifactKind::Transition => "transition",
            ArtifactKind::Bootstrap => "initial state setup",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// An artifact with this name already exists in the project.
    Exists,
    /// The name appeared earlier in the same request.
    Duplicate,
}

/// An artifact that was deliberately not generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skip {
    pub name: String,
    pub artifact: ArtifactKind,
    pub reason: SkipReason,
}

impl Skip {
    pub fn new(name: &str, artifact: ArtifactKind, reason: SkipReason) -> Self {
        Self {
            name: name.to_string(),
            artifact,
            reason,
        }
    }
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            SkipReason::Exists => write!(
                f,
                "'{}' already exists in the project; skipped {}",
                self.name,
                self.artifact.as_str()
            ),
            SkipReason::Duplicate => write!(
                f,
                "'{}' is listed more than once; skipped duplicate {}",
                self.name,
                self.artifact.as_str()
            ),
        }
    }
}

/// Result of inserting a transition method into a manager file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOutcome {
    /// The method was inserted and the file rewritten.
    Success,
    /// The method name was already present; nothing was written.
    AlreadyExists,
    /// The manager file does not exist.
    FileNotFound,
}
