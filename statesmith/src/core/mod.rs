//! Deterministic, pure logic for rendering and patching.
//!
//! Core modules must be free of I/O side effects. They operate on strings and
//! in-memory plans so the generator and patcher can be tested without a
//! filesystem.

pub mod fragments;
pub mod insert;
pub mod names;
pub mod plan;
pub mod render;
pub mod types;
