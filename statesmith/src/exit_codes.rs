//! Stable exit codes for statesmith CLI commands.

/// Command succeeded. Skipped artifacts and already-present transitions
/// still count as success.
pub const OK: i32 = 0;
/// Invalid configuration, names or destination, missing templates, or any
/// other error.
pub const INVALID: i32 = 1;
/// The manager file to patch does not exist.
pub const NOT_FOUND: i32 = 2;
