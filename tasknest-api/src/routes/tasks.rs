/// Task endpoints
///
/// All five operations run behind the access guard and scope every store
/// call to the verified identity. The task identifier in the path is
/// format-checked before any query, and a task owned by someone else is
/// answered exactly like a task that does not exist.
///
/// # Endpoints
///
/// - `GET /api/tasks` - All tasks of the logged-in user, newest first
/// - `POST /api/tasks` - Create a task
/// - `GET /api/tasks/:id` - One owned task
/// - `PUT /api/tasks/:id` - Partial update of an owned task
/// - `DELETE /api/tasks/:id` - Delete an owned task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tasknest_shared::auth::guard::AuthUser;
use tasknest_shared::models::id::RecordId;
use tasknest_shared::models::task::{CompletedFlag, CreateTask, Priority, Task, UpdateTask};

/// Create request
///
/// `title` and `description` are required but modeled as options so the
/// handler can answer missing fields with the contract's validation message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<String>,
    pub completed: Option<CompletedFlag>,
}

/// Partial update request
///
/// `due_date` distinguishes an absent key (leave unchanged) from an explicit
/// `null` (clear the stored date).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    #[serde(deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
    pub completed: Option<CompletedFlag>,
}

/// Response carrying a single task
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    pub message: String,
    pub task: Task,
}

/// Response carrying the owner's task list
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub success: bool,
    pub tasks: Vec<Task>,
}

/// Bare success envelope
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// Wraps a present value so `Option<Option<T>>` can tell "absent" from
/// "null"
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Validates the path identifier before it reaches the store
fn parse_task_id(raw: &str) -> ApiResult<RecordId> {
    RecordId::parse(raw).map_err(|_| ApiError::BadRequest("Invalid task ID format.".to_string()))
}

/// Parses a due date from its wire form
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (taken as
/// midnight UTC).
fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(Utc.from_utc_datetime(&midnight));
    }

    None
}

/// Create a new task
///
/// The owner is always the verified identity; nothing in the payload can
/// assign a task to someone else.
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Authorization: Bearer <token>
///
/// {"title": "T", "description": "D", "priority": "High",
///  "dueDate": "2026-09-01", "completed": "Yes"}
/// ```
///
/// # Errors
///
/// - `400`: empty title or description, or an unparseable due date
pub async fn create_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let (title, description) = match (req.title, req.description) {
        (Some(title), Some(description)) if !title.is_empty() && !description.is_empty() => {
            (title, description)
        }
        _ => {
            return Err(ApiError::BadRequest(
                "Title and description are required fields.".to_string(),
            ))
        }
    };

    let due_date = match req.due_date {
        Some(raw) => Some(
            parse_due_date(&raw)
                .ok_or_else(|| ApiError::BadRequest("Invalid due date format.".to_string()))?,
        ),
        None => None,
    };

    let task = Task::create(
        &state.db,
        CreateTask {
            owner: identity.id,
            title,
            description,
            priority: req.priority.unwrap_or_default(),
            due_date,
            completed: req.completed.map(|c| c.normalize()).unwrap_or(false),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            success: true,
            message: "Task created successfully.".to_string(),
            task,
        }),
    ))
}

/// List all tasks of the logged-in user, newest-created-first
///
/// # Endpoint
///
/// ```text
/// GET /api/tasks
/// Authorization: Bearer <token>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
) -> ApiResult<Json<TaskListResponse>> {
    let tasks = Task::list_for_owner(&state.db, &identity.id).await?;

    Ok(Json(TaskListResponse {
        success: true,
        tasks,
    }))
}

/// Get one task by id
///
/// # Endpoint
///
/// ```text
/// GET /api/tasks/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `400`: malformed identifier
/// - `404`: no such task owned by this identity (a foreign owner's task is
///   indistinguishable)
pub async fn get_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = parse_task_id(&id)?;

    let task = Task::find_owned(&state.db, &task_id, &identity.id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Task not found or unauthorized access.".to_string())
        })?;

    Ok(Json(TaskResponse {
        success: true,
        message: "Task fetched successfully.".to_string(),
        task,
    }))
}

/// Partially update one task
///
/// Included fields go through the same validation as creation: an included
/// empty title or description is rejected, an included due date must parse,
/// and `completed` is normalized from its boundary encodings.
///
/// # Endpoint
///
/// ```text
/// PUT /api/tasks/:id
/// Authorization: Bearer <token>
///
/// {"priority": "Low"}
/// ```
///
/// # Errors
///
/// - `400`: malformed identifier or invalid included field
/// - `404`: no such task owned by this identity
pub async fn update_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let task_id = parse_task_id(&id)?;

    if matches!(&req.title, Some(t) if t.is_empty())
        || matches!(&req.description, Some(d) if d.is_empty())
    {
        return Err(ApiError::BadRequest(
            "Title and description are required fields.".to_string(),
        ));
    }

    let due_date = match req.due_date {
        Some(Some(raw)) => Some(Some(
            parse_due_date(&raw)
                .ok_or_else(|| ApiError::BadRequest("Invalid due date format.".to_string()))?,
        )),
        Some(None) => Some(None),
        None => None,
    };

    let update = UpdateTask {
        title: req.title,
        description: req.description,
        priority: req.priority,
        due_date,
        completed: req.completed.map(|c| c.normalize()),
    };

    let task = Task::update_owned(&state.db, &task_id, &identity.id, update)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("Task not found or you are not authorized to update it.".to_string())
        })?;

    Ok(Json(TaskResponse {
        success: true,
        message: "Task updated successfully.".to_string(),
        task,
    }))
}

/// Delete one task
///
/// # Endpoint
///
/// ```text
/// DELETE /api/tasks/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `400`: malformed identifier
/// - `404`: no such task owned by this identity
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(identity): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let task_id = parse_task_id(&id)?;

    let deleted = Task::delete_owned(&state.db, &task_id, &identity.id).await?;
    if !deleted {
        return Err(ApiError::NotFound(
            "Task not found or you are not authorized to delete it.".to_string(),
        ));
    }

    Ok(Json(MessageResponse {
        success: true,
        message: "Task deleted successfully.".to_string(),
    }))
}
