//! Flat `{{Name}}` placeholder substitution.
//!
//! There is no template language here: a token is replaced verbatim by its
//! mapped value, and anything that repeats is concatenated by the caller
//! before rendering.

use std::sync::LazyLock;

use regex::{Captures, Regex};

pub const MANAGER_NAME: &str = "StateManagerName";
pub const FIRST_STATE_NAME: &str = "FirstStateName";
pub const TRANSITIONS: &str = "Transitions";
pub const INITIAL_STATE_SETUP: &str = "InitialStateSetup";
pub const STATE_NAME: &str = "StateName";

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

/// Ordered placeholder name → replacement text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`PlaceholderMap::insert`].
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set `name` to `value`, keeping the original position if `name` was
    /// already present.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The literal token for a placeholder name, e.g. `{{StateName}}`.
pub fn token(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// Replace every mapped token in `template`.
///
/// Substitution is a single pass over the template: replacement text is
/// never rescanned, so a value that itself contains `{{...}}` is emitted as-is.
/// Tokens with no entry in `map` are left untouched.
pub fn render(template: &str, map: &PlaceholderMap) -> String {
    TOKEN_RE
        .replace_all(template, |caps: &Captures<'_>| match map.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Names of `{{Name}}` tokens still present in `text`, first occurrence order.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in TOKEN_RE.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }
    names
}
