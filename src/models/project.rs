use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A project grouping related tasks.
///
/// Projects are the top-level organizational unit and the only entity the
/// shell can "enter". Names are user-supplied and not required to be unique;
/// lookups by name take the oldest match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
