mod schema;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use crate::models::*;

/// Persistence gateway over a single SQLite connection.
///
/// The shell is single-threaded, so no locking is layered on top of what
/// SQLite itself provides. Rows carry a `deleted_at` column that this
/// application never sets; every query filters it out.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        tracing::debug!("opening database at {}", path.display());
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    pub fn open_default() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "minder")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("minder.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        schema::run_migrations(&self.conn)
    }

    // ============================================================
    // Project operations
    // ============================================================

    pub fn create_project(&self, name: &str) -> Result<Project> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO projects (name, created_at, updated_at) VALUES (?, ?, ?)",
            (name, now.to_rfc3339(), now.to_rfc3339()),
        )?;

        Ok(Project {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn all_projects(&self) -> Result<Vec<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM projects WHERE deleted_at IS NULL ORDER BY name",
        )?;

        let projects = stmt
            .query_map([], |row| {
                Ok(Project {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: parse_datetime(row.get::<_, String>(2)?),
                    updated_at: parse_datetime(row.get::<_, String>(3)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(projects)
    }

    pub fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM projects WHERE id = ? AND deleted_at IS NULL",
        )?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Project {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: parse_datetime(row.get::<_, String>(2)?),
                updated_at: parse_datetime(row.get::<_, String>(3)?),
            }))
        } else {
            Ok(None)
        }
    }

    /// Look up a project by exact name. Names are not unique; the oldest
    /// match wins.
    pub fn find_project_by_name(&self, name: &str) -> Result<Option<Project>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, created_at, updated_at
             FROM projects WHERE name = ? AND deleted_at IS NULL ORDER BY id LIMIT 1",
        )?;

        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            Ok(Some(Project {
                id: row.get(0)?,
                name: row.get(1)?,
                created_at: parse_datetime(row.get::<_, String>(2)?),
                updated_at: parse_datetime(row.get::<_, String>(3)?),
            }))
        } else {
            Ok(None)
        }
    }

    /// Project names for tab completion, name-ordered.
    pub fn project_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM projects WHERE deleted_at IS NULL ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    // ============================================================
    // Task operations
    // ============================================================

    pub fn create_task(&self, project_id: i64, name: &str, description: &str) -> Result<Task> {
        // Verify project exists
        self.get_project(project_id)?
            .ok_or_else(|| anyhow::anyhow!("Project not found"))?;

        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO tasks (project_id, name, description, completed, created_at, updated_at)
             VALUES (?, ?, ?, 0, ?, ?)",
            (
                project_id,
                name,
                description,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Task {
            id: self.conn.last_insert_rowid(),
            project_id,
            name: name.to_string(),
            description: description.to_string(),
            completed: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn tasks_for_project(&self, project_id: i64) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, name, description, completed, created_at, updated_at
             FROM tasks WHERE project_id = ? AND deleted_at IS NULL ORDER BY id",
        )?;

        let tasks = stmt
            .query_map([project_id], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    name: row.get(2)?,
                    description: row.get(3)?,
                    completed: row.get::<_, i32>(4)? != 0,
                    created_at: parse_datetime(row.get::<_, String>(5)?),
                    updated_at: parse_datetime(row.get::<_, String>(6)?),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    pub fn task_count(&self, project_id: i64) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE project_id = ? AND deleted_at IS NULL",
            [project_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Task names for tab completion, insertion-ordered.
    pub fn task_names(&self, project_id: i64) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM tasks WHERE project_id = ? AND deleted_at IS NULL ORDER BY id",
        )?;
        let names = stmt
            .query_map([project_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Mark the oldest task with this exact name completed. Returns false
    /// when no task matches.
    pub fn complete_task(&self, project_id: i64, name: &str) -> Result<bool> {
        let now = Utc::now();
        let rows = self.conn.execute(
            "UPDATE tasks SET completed = 1, updated_at = ? WHERE id IN (
                SELECT id FROM tasks
                WHERE project_id = ? AND name = ? AND deleted_at IS NULL
                ORDER BY id LIMIT 1
            )",
            (now.to_rfc3339(), project_id, name),
        )?;
        Ok(rows > 0)
    }
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
