//! I/O helpers: configuration, template files, the project index and
//! artifact writes.

pub mod artifact;
pub mod config;
pub mod index;
pub mod init;
pub mod templates;
