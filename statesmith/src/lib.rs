//! Template-driven scaffolding for state machines.
//!
//! Generates a state manager source file plus one file per state from flat
//! `{{Name}}` templates, and patches new transition methods into managers it
//! generated earlier. The architecture keeps a strict split:
//!
//! - **[`core`]**: Pure, deterministic logic (placeholder rendering, planning,
//!   insertion points). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config, template files, the
//!   project index, atomic writes).
//!
//! Orchestration modules ([`scaffold`], [`patch`]) combine the two to
//! implement the CLI commands. [`machine`] is the runtime state machine the
//! generated code models.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod machine;
pub mod patch;
pub mod scaffold;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
