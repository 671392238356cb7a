use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use taskmaster_core::models::{TimeEntry, UpdateTimeEntryInput};
use taskmaster_core::Backend;

use super::{validated, ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct TimeRangeQuery {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

/// Without a range, every entry; with both bounds, entries whose start day
/// falls within `[start, end]` inclusive.
pub async fn list(
    State(backend): State<Backend>,
    Query(query): Query<TimeRangeQuery>,
) -> ApiResult<Json<Vec<TimeEntry>>> {
    let entries = match (query.start, query.end) {
        (Some(start), Some(end)) => backend.entries_in_range(start, end).await?,
        (None, None) => backend.list_time_entries().await?,
        _ => {
            return Err(ApiError::Invalid(
                "start and end must be supplied together".into(),
            ))
        }
    };
    Ok(Json(entries))
}

pub async fn update(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateTimeEntryInput>,
) -> ApiResult<Json<TimeEntry>> {
    validated(input.validate())?;
    Ok(Json(backend.update_time_entry(id, &input).await?))
}

pub async fn remove(State(backend): State<Backend>, Path(id): Path<i64>) -> ApiResult<Json<bool>> {
    backend.delete_time_entry(id).await?;
    Ok(Json(true))
}
