use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use taskmaster_core::engine::{
    self, CalendarCell, DailyProductivity, PriorityCounts, ProjectProgress, StatusCounts,
};
use taskmaster_core::models::Task;
use taskmaster_core::Backend;

use super::{ApiError, ApiResult};

/// Headline numbers for the dashboard and analytics pages, derived in one
/// pass over the full task collection.
#[derive(Debug, Serialize)]
pub struct MetricsSummary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub in_progress_tasks: usize,
    pub overdue_tasks: usize,
    pub completion_rate: f64,
    pub total_tracked_time: f64,
    pub average_time_per_completed: f64,
    pub tracked_task_count: usize,
    pub status_counts: StatusCounts,
    pub priority_counts: PriorityCounts,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    /// Reference day for overdue detection; defaults to the current day.
    today: Option<NaiveDate>,
}

pub async fn summary(
    State(backend): State<Backend>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<MetricsSummary>> {
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let tasks = backend.list_tasks().await?;
    let status_counts = engine::status_counts(&tasks);
    Ok(Json(MetricsSummary {
        total_tasks: tasks.len(),
        completed_tasks: status_counts.completed,
        in_progress_tasks: status_counts.in_progress,
        overdue_tasks: engine::overdue_count(&tasks, today),
        completion_rate: engine::completion_rate(&tasks),
        total_tracked_time: engine::total_tracked_time(&tasks),
        average_time_per_completed: engine::average_time_per_completed(&tasks),
        tracked_task_count: engine::tracked_task_count(&tasks),
        status_counts,
        priority_counts: engine::priority_counts(&tasks),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProductivityQuery {
    #[serde(default = "default_days")]
    days: u32,
    reference: Option<NaiveDate>,
}

fn default_days() -> u32 {
    7
}

pub async fn productivity(
    State(backend): State<Backend>,
    Query(query): Query<ProductivityQuery>,
) -> ApiResult<Json<Vec<DailyProductivity>>> {
    if query.days == 0 || query.days > 366 {
        return Err(ApiError::Invalid(
            "days must be between 1 and 366".to_string(),
        ));
    }
    let reference = query.reference.unwrap_or_else(|| Utc::now().date_naive());
    let tasks = backend.list_tasks().await?;
    let series = engine::productivity_series(&tasks, query.days, reference).collect();
    Ok(Json(series))
}

/// Projects with derived progress, best first. Task and project
/// collections load concurrently; neither is assumed first.
pub async fn project_rankings(
    State(backend): State<Backend>,
) -> ApiResult<Json<Vec<ProjectProgress>>> {
    let (projects, tasks) = tokio::try_join!(backend.list_projects(), backend.list_tasks())?;
    Ok(Json(engine::rank_projects(&projects, &tasks)))
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    today: Option<NaiveDate>,
}

pub async fn month(
    State(backend): State<Backend>,
    Path((year, month)): Path<(i32, u32)>,
    Query(query): Query<CalendarQuery>,
) -> ApiResult<Json<Vec<CalendarCell>>> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::Invalid(format!("month out of range: {month}")));
    }
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let tasks = backend.list_tasks().await?;
    Ok(Json(engine::month_grid(year, month, &tasks, today)))
}

#[derive(Debug, Default, Deserialize)]
pub struct WeekQuery {
    anchor: Option<NaiveDate>,
}

pub async fn week(
    State(backend): State<Backend>,
    Query(query): Query<WeekQuery>,
) -> ApiResult<Json<Vec<Task>>> {
    let anchor = query.anchor.unwrap_or_else(|| Utc::now().date_naive());
    let tasks = backend.list_tasks().await?;
    Ok(Json(engine::week_slice(anchor, &tasks)))
}
