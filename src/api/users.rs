use axum::extract::{Path, State};
use axum::Json;
use taskmaster_core::models::User;
use taskmaster_core::Backend;

use super::ApiResult;

pub async fn list(State(backend): State<Backend>) -> Json<Vec<User>> {
    Json(backend.list_users())
}

pub async fn get_by_id(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> ApiResult<Json<User>> {
    Ok(Json(backend.get_user(id)?))
}
