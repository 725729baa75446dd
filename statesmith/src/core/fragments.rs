//! Per-state fragments rendered into the manager body.

use super::render::{MANAGER_NAME, PlaceholderMap, STATE_NAME, render};

pub const TRANSITION_PREFIX: &str = "TransitionTo";

/// Name of the generated method that switches to `state`.
pub fn transition_method_name(state: &str) -> String {
    format!("{TRANSITION_PREFIX}{state}")
}

/// Render a state-scoped fragment (transition method or bootstrap).
pub fn render_fragment(template: &str, state: &str, manager: &str) -> String {
    let map = PlaceholderMap::new()
        .with(STATE_NAME, state)
        .with(MANAGER_NAME, manager);
    render(template, &map)
}

/// Render one fragment per state and concatenate them in order.
pub fn render_fragments<'a>(
    template: &str,
    states: impl IntoIterator<Item = &'a str>,
    manager: &str,
) -> String {
    states
        .into_iter()
        .map(|state| render_fragment(template, state, manager))
        .collect()
}
