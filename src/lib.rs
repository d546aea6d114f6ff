//! Workspace facade for the shared cube server.
//!
//! The crates are re-exported so the cross-crate tests under `tests/` can
//! reach every layer through one dependency.

pub use client;
pub use server;
pub use shared;
