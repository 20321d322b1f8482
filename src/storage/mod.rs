//! State storage for Grain.
//!
//! This module provides persistence for the application state, with a
//! file-based backend (plus backups) and an in-memory backend for tests.

pub mod file;
pub mod memory;
pub mod traits;

pub use file::FileStateStore;
pub use memory::MemoryStateStore;
pub use traits::StateStore;
