/// Task model and owner-scoped database operations
///
/// Tasks are the core records of the system. Every query in this module
/// filters by `(id, owner)`: a task belonging to another user is
/// indistinguishable from a task that does not exist, which is what prevents
/// cross-user enumeration.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_priority AS ENUM ('Low', 'Medium', 'High');
///
/// CREATE TABLE tasks (
///     id VARCHAR(24) PRIMARY KEY,
///     owner VARCHAR(24) NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     priority task_priority NOT NULL DEFAULT 'Medium',
///     due_date TIMESTAMPTZ,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Wire shape
///
/// Serialized with the field names the original clients expect:
/// `{_id, title, description, priority, dueDate, completed, owner,
/// createdAt, updatedAt}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::id::RecordId;

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Priority as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Inbound encoding of the `completed` flag
///
/// Older clients send `"Yes"`, `"true"`, or `1` where current ones send a
/// plain boolean. This type is the only place those encodings are accepted;
/// [`CompletedFlag::normalize`] is the single conversion point and the stored
/// and outbound representation is always a boolean.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CompletedFlag {
    /// Plain JSON boolean
    Bool(bool),

    /// Numeric encoding: 1 is true, anything else false
    Number(i64),

    /// Textual encoding: "Yes" and "true" are true, anything else false
    Text(String),
}

impl CompletedFlag {
    /// Normalizes a boundary encoding to a boolean
    ///
    /// `true`, `1`, `"Yes"`, and `"true"` map to true; everything else maps
    /// to false.
    pub fn normalize(&self) -> bool {
        match self {
            CompletedFlag::Bool(b) => *b,
            CompletedFlag::Number(n) => *n == 1,
            CompletedFlag::Text(s) => s == "Yes" || s == "true",
        }
    }
}

/// Task row as stored and as serialized to the wire
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier
    #[serde(rename = "_id")]
    pub id: RecordId,

    /// Short title, never empty
    pub title: String,

    /// Longer description, never empty
    pub description: String,

    /// Priority, defaults to Medium
    pub priority: Priority,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Completion status
    pub completed: bool,

    /// Owning user, set at creation and immutable thereafter
    pub owner: RecordId,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// `owner` always comes from the authenticated identity, never from the
/// request payload.
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub owner: RecordId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
}

/// Input for partially updating a task
///
/// Only `Some` fields replace stored values. `due_date` distinguishes
/// "leave unchanged" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
}

impl UpdateTask {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.completed.is_none()
    }
}

impl Task {
    /// Creates a new task owned by `data.owner`
    ///
    /// The identifier is generated server-side.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (id, owner, title, description, priority, due_date, completed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, priority, due_date, completed, owner,
                      created_at, updated_at
            "#,
        )
        .bind(RecordId::generate())
        .bind(data.owner)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.due_date)
        .bind(data.completed)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks owned by `owner`, newest-created-first
    ///
    /// A fresh query per call; there is no cursor or pagination.
    pub async fn list_for_owner(pool: &PgPool, owner: &RecordId) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, due_date, completed, owner,
                   created_at, updated_at
            FROM tasks
            WHERE owner = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task by `(id, owner)`
    ///
    /// Returns `None` both when the task does not exist and when it belongs
    /// to a different owner.
    pub async fn find_owned(
        pool: &PgPool,
        id: &RecordId,
        owner: &RecordId,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, due_date, completed, owner,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND owner = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Partially updates a task owned by `owner`
    ///
    /// Builds the UPDATE from the fields present in `data`; absent fields
    /// keep their stored values. `updated_at` is bumped on every call.
    ///
    /// # Returns
    ///
    /// The updated row, or `None` when `(id, owner)` matches nothing.
    pub async fn update_owned(
        pool: &PgPool,
        id: &RecordId,
        owner: &RecordId,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_owned(pool, id, owner).await;
        }

        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }
        if data.completed.is_some() {
            bind_count += 1;
            query.push_str(&format!(", completed = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND owner = $2 \
             RETURNING id, title, description, priority, due_date, completed, owner, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(owner);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }
        if let Some(completed) = data.completed {
            q = q.bind(completed);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task owned by `owner`
    ///
    /// # Returns
    ///
    /// True if a row was deleted, false when `(id, owner)` matches nothing.
    pub async fn delete_owned(
        pool: &PgPool,
        id: &RecordId,
        owner: &RecordId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_wire_encoding() {
        assert_eq!(serde_json::to_string(&Priority::Low).unwrap(), "\"Low\"");
        assert_eq!(
            serde_json::to_string(&Priority::Medium).unwrap(),
            "\"Medium\""
        );
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"High\"");

        let p: Priority = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(p, Priority::High);
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
    }

    #[test]
    fn test_completed_flag_truthy_encodings() {
        for raw in ["true", "1", "\"Yes\"", "\"true\""] {
            let flag: CompletedFlag = serde_json::from_str(raw).unwrap();
            assert!(flag.normalize(), "{} should normalize to true", raw);
        }
    }

    #[test]
    fn test_completed_flag_falsy_encodings() {
        for raw in ["false", "0", "\"No\"", "\"false\"", "\"yes\"", "\"\""] {
            let flag: CompletedFlag = serde_json::from_str(raw).unwrap();
            assert!(!flag.normalize(), "{} should normalize to false", raw);
        }
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());

        let update = UpdateTask {
            completed: Some(true),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_task_wire_shape() {
        let task = Task {
            id: RecordId::parse("5f8d0d55b54764421b715f01").unwrap(),
            title: "T".to_string(),
            description: "D".to_string(),
            priority: Priority::Medium,
            due_date: None,
            completed: false,
            owner: RecordId::parse("5f8d0d55b54764421b715f00").unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["_id"], "5f8d0d55b54764421b715f01");
        assert_eq!(json["priority"], "Medium");
        assert_eq!(json["completed"], false);
        assert!(json["dueDate"].is_null());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("due_date").is_none());
        assert!(json.get("id").is_none());
    }

    // Integration tests for database operations require a running database
}
