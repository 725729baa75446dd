//! Identifier checks for manager and state names.

use std::sync::LazyLock;

use regex::Regex;

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Check that `name` can be used both as a class name and as a file stem.
///
/// Returns a human-readable reason on failure; `what` names the field
/// (e.g. "manager name") in the message.
pub fn check_identifier(what: &str, name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{what} must not be empty"));
    }
    if !IDENTIFIER_RE.is_match(name) {
        return Err(format!(
            "{what} '{name}' must be an identifier ([A-Za-z_][A-Za-z0-9_]*)"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_class_names() {
        for name in ["Player", "Idle", "_Hidden", "State2", "jump_state"] {
            assert!(check_identifier("state name", name).is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_empty_and_path_like_names() {
        let err = check_identifier("manager name", "").unwrap_err();
        assert!(err.contains("must not be empty"));

        for name in ["2Fast", "../Evil", "Run Fast", "a/b", "Dotted.Name"] {
            let err = check_identifier("state name", name).unwrap_err();
            assert!(err.contains("must be an identifier"), "{name}: {err}");
        }
    }
}
