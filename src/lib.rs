//! # taskboard
//!
//! Client-side state layer for the task board service: authentication,
//! board and task caches, and the HTTP plumbing between them and the
//! remote `/api`.
//!
//! DESIGN
//! ======
//! The remote server owns every user, board, and task. This crate mirrors
//! the slices a single user is looking at and keeps those mirrors honest:
//! each mutation is sent first and reconciled into the local cache only
//! after the server acknowledges it. Stores are plain values built with
//! their collaborators (`ApiClient`, `KeyValueStore`) passed in, so tests
//! construct fresh instances against an in-memory fake server.

pub mod config;
pub mod error;
pub mod net;
pub mod state;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_helpers;
