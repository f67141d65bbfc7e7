//! minder: an interactive project and task tracker for the terminal.
//!
//! A small REPL over a local SQLite database. The command set is
//! context-sensitive: `create-project` and a project listing at the top
//! level; `mktask`, a task listing, and `done` once a project has been
//! entered with `cd`.

pub mod db;
pub mod models;
pub mod render;
pub mod shell;
