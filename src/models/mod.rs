//! Domain models for minder.
//!
//! Two record types only: [`Project`] and [`Task`], in a one-to-many
//! relationship owned by the project. Identity is the SQLite rowid;
//! timestamps are UTC.

mod project;
mod task;

pub use project::*;
pub use task::*;
