use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A unit of work belonging to one project.
///
/// Tasks are created from inside a project context and never move between
/// projects. `completed` starts false and is flipped by the `done` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
