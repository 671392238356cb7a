use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use taskmaster_core::models::{
    Client, ClientQuery, ClientStatus, CreateClientInput, UpdateClientInput,
};
use taskmaster_core::Backend;

use super::{sentinel, validated, ApiError, ApiResult};

#[derive(Debug, Default, Deserialize)]
pub struct ClientListQuery {
    search: Option<String>,
    status: Option<String>,
}

pub async fn list(
    State(backend): State<Backend>,
    Query(query): Query<ClientListQuery>,
) -> ApiResult<Json<Vec<Client>>> {
    let status = sentinel(query.status.as_deref())
        .map(|raw| {
            ClientStatus::parse(raw)
                .ok_or_else(|| ApiError::Invalid(format!("unknown client status: {raw}")))
        })
        .transpose()?;
    let query = ClientQuery {
        search: query.search,
        status,
    };
    Ok(Json(backend.list_clients(&query).await?))
}

pub async fn get_by_id(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Client>> {
    Ok(Json(backend.get_client(id).await?))
}

pub async fn create(
    State(backend): State<Backend>,
    Json(input): Json<CreateClientInput>,
) -> ApiResult<Json<Client>> {
    validated(input.validate())?;
    Ok(Json(backend.create_client(&input).await?))
}

pub async fn update(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateClientInput>,
) -> ApiResult<Json<Client>> {
    validated(input.validate())?;
    Ok(Json(backend.update_client(id, &input).await?))
}

pub async fn remove(State(backend): State<Backend>, Path(id): Path<i64>) -> ApiResult<Json<bool>> {
    backend.delete_client(id).await?;
    Ok(Json(true))
}
