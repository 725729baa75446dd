//! Text-position insertion of transition methods into a manager file.
//!
//! This is a textual heuristic, not a structural edit. Generated manager
//! files carry an insertion marker line; files without one fall back to the
//! last `}` in the file, which assumes the type body's closing brace is the
//! last brace character.

use super::fragments::transition_method_name;

/// Where a block will be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// Start of the line holding the insertion marker.
    Marker(usize),
    /// Byte offset of the last `}` in the file.
    LastBrace(usize),
}

impl InsertionPoint {
    pub fn offset(self) -> usize {
        match self {
            InsertionPoint::Marker(offset) | InsertionPoint::LastBrace(offset) => offset,
        }
    }
}

/// Pure patch decision for one transition method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchPlan {
    /// The method name already appears in the text.
    AlreadyPresent,
    /// Neither the marker nor a closing brace was found.
    NoInsertionPoint,
    /// Patched text, with the point the block went in at.
    Insert { text: String, point: InsertionPoint },
}

/// Locate the insertion point: the marker line if `marker` is set and
/// present, otherwise the last closing brace.
pub fn find_insertion_point(text: &str, marker: Option<&str>) -> Option<InsertionPoint> {
    if let Some(marker) = marker.filter(|marker| !marker.trim().is_empty()) {
        if let Some(found) = text.rfind(marker) {
            let line_start = text[..found].rfind('\n').map_or(0, |newline| newline + 1);
            return Some(InsertionPoint::Marker(line_start));
        }
    }
    text.rfind('}').map(InsertionPoint::LastBrace)
}

/// Insert `block` at `point`, leaving every other byte of `text` unchanged.
pub fn insert_at(text: &str, point: InsertionPoint, block: &str) -> String {
    let offset = point.offset();
    let mut patched = String::with_capacity(text.len() + block.len());
    patched.push_str(&text[..offset]);
    patched.push_str(block);
    patched.push_str(&text[offset..]);
    patched
}

/// Decide how to add the `TransitionTo<state>` method rendered as `block`.
///
/// Presence is a plain substring search for the method name.
pub fn plan_transition_patch(
    text: &str,
    state: &str,
    block: &str,
    marker: Option<&str>,
) -> PatchPlan {
    if text.contains(&transition_method_name(state)) {
        return PatchPlan::AlreadyPresent;
    }
    match find_insertion_point(text, marker) {
        Some(point) => PatchPlan::Insert {
            text: insert_at(text, point, block),
            point,
        },
        None => PatchPlan::NoInsertionPoint,
    }
}
