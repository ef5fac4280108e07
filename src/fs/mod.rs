//! Filesystem utilities for playrun.
//!
//! Manifests and reports are replaced atomically so an interrupted run never
//! leaves a half-written file behind.

pub mod atomic;

pub use atomic::{atomic_write_file, write_json_pretty};
