use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use taskmaster_core::engine::{self, TaskFilter};
use taskmaster_core::models::{
    CreateTaskInput, CreateTimeEntryInput, Task, TaskPriority, TaskStatus, TimeEntry,
    UpdateTaskInput,
};
use taskmaster_core::store::BulkStatusOutcome;
use taskmaster_core::Backend;

use super::{sentinel, validated, ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    search: Option<String>,
    status: Option<String>,
    priority: Option<String>,
    project: Option<String>,
    assignee: Option<String>,
}

impl TaskListQuery {
    fn into_filter(self) -> Result<TaskFilter, ApiError> {
        let status = sentinel(self.status.as_deref())
            .map(|raw| {
                TaskStatus::parse(raw)
                    .ok_or_else(|| ApiError::Invalid(format!("unknown status: {raw}")))
            })
            .transpose()?;
        let priority = sentinel(self.priority.as_deref())
            .map(|raw| {
                TaskPriority::parse(raw)
                    .ok_or_else(|| ApiError::Invalid(format!("unknown priority: {raw}")))
            })
            .transpose()?;
        let project_id = sentinel(self.project.as_deref())
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| ApiError::Invalid(format!("invalid project id: {raw}")))
            })
            .transpose()?;
        let assignee = sentinel(self.assignee.as_deref())
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| ApiError::Invalid(format!("invalid assignee id: {raw}")))
            })
            .transpose()?;
        Ok(TaskFilter {
            search: self.search,
            status,
            priority,
            project_id,
            assignee,
        })
    }
}

pub async fn list(
    State(backend): State<Backend>,
    Query(query): Query<TaskListQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let filter = query.into_filter()?;
    let tasks = backend.list_tasks().await?;
    Ok(Json(engine::filter_tasks(&tasks, &filter)))
}

pub async fn get_by_id(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    Ok(Json(backend.get_task(id).await?))
}

pub async fn create(
    State(backend): State<Backend>,
    Json(input): Json<CreateTaskInput>,
) -> ApiResult<Json<Task>> {
    validated(input.validate())?;
    Ok(Json(backend.create_task(&input).await?))
}

pub async fn update(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTaskInput>,
) -> ApiResult<Json<Task>> {
    validated(input.validate())?;
    Ok(Json(backend.update_task(id, &input).await?))
}

pub async fn remove(State(backend): State<Backend>, Path(id): Path<i64>) -> ApiResult<Json<bool>> {
    backend.delete_task(id).await?;
    Ok(Json(true))
}

#[derive(Debug, Deserialize)]
pub struct SetStatusBody {
    pub status: TaskStatus,
}

pub async fn set_status(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(body): Json<SetStatusBody>,
) -> ApiResult<Json<Task>> {
    Ok(Json(backend.set_status(id, body.status).await?))
}

#[derive(Debug, Deserialize)]
pub struct BulkStatusBody {
    pub ids: Vec<i64>,
    pub status: TaskStatus,
}

pub async fn bulk_status(
    State(backend): State<Backend>,
    Json(body): Json<BulkStatusBody>,
) -> ApiResult<Json<BulkStatusOutcome>> {
    let outcome = backend.bulk_update_status(&body.ids, body.status).await?;
    Ok(Json(outcome))
}

pub async fn list_time(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<TimeEntry>>> {
    Ok(Json(backend.entries_for_task(id).await?))
}

pub async fn add_time(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(input): Json<CreateTimeEntryInput>,
) -> ApiResult<Json<Task>> {
    validated(input.validate())?;
    Ok(Json(backend.add_time_entry(id, &input).await?))
}
