//! Client-side state containers.
//!
//! DESIGN
//! ======
//! State is split by concern so views depend on small focused models:
//! `auth` owns the session, `board` mirrors the server's boards and tasks,
//! and `columns`, `route`, and `workspace` are pure helpers over them.

pub mod auth;
pub mod board;
pub mod columns;
pub mod route;
pub mod workspace;

pub use auth::AuthStore;
pub use board::BoardStore;
pub use columns::{StatusColumns, group_by_status};
pub use route::{Route, guard};
pub use workspace::{OpenOutcome, route_after_delete, validate_name};
