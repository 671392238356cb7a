use axum::extract::{Path, State};
use axum::Json;
use taskmaster_core::engine::{self, ProjectProgress};
use taskmaster_core::models::{CreateProjectInput, Project, Task, UpdateProjectInput};
use taskmaster_core::Backend;

use super::{validated, ApiResult};

pub async fn list(State(backend): State<Backend>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(backend.list_projects().await?))
}

pub async fn get_by_id(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Project>> {
    Ok(Json(backend.get_project(id).await?))
}

pub async fn create(
    State(backend): State<Backend>,
    Json(input): Json<CreateProjectInput>,
) -> ApiResult<Json<Project>> {
    validated(input.validate())?;
    Ok(Json(backend.create_project(&input).await?))
}

pub async fn update(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateProjectInput>,
) -> ApiResult<Json<Project>> {
    validated(input.validate())?;
    Ok(Json(backend.update_project(id, &input).await?))
}

/// Deleting a project never deletes or reassigns its tasks.
pub async fn remove(State(backend): State<Backend>, Path(id): Path<i64>) -> ApiResult<Json<bool>> {
    backend.delete_project(id).await?;
    Ok(Json(true))
}

pub async fn tasks(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(backend.tasks_by_project(id).await?))
}

pub async fn progress(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectProgress>> {
    let (project, tasks) = tokio::try_join!(backend.get_project(id), backend.list_tasks())?;
    Ok(Json(engine::project_progress(&project, &tasks)))
}
