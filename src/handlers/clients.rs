// src/handlers/clients.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, models::clients::Client};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 2, max = 50, message = "O nome deve ter entre 2 e 50 caracteres."))]
    #[schema(example = "Luciana")]
    pub first_name: String,

    #[validate(length(min = 2, max = 50, message = "O sobrenome deve ter entre 2 e 50 caracteres."))]
    #[schema(example = "Pereyra")]
    pub last_name: String,

    pub document: Option<String>,
    pub phone: Option<String>,

    #[validate(email(message = "E-mail inválido."))]
    pub email: Option<String>,

    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClientListQuery {
    pub search: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/clients",
    tag = "Clients",
    request_body = CreateClientPayload,
    responses((status = 201, description = "Cliente criado", body = Client))
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let client = app_state
        .client_service
        .create(
            &payload.first_name,
            &payload.last_name,
            payload.document.as_deref(),
            payload.phone.as_deref(),
            payload.email.as_deref(),
            payload.address.as_deref(),
            payload.notes.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    get,
    path = "/api/clients",
    tag = "Clients",
    responses((status = 200, description = "Lista de clientes", body = [Client]))
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    Query(query): Query<ClientListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.client_service.list(query.search.as_deref()).await?;
    Ok((StatusCode::OK, Json(clients)))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    tag = "Clients",
    responses(
        (status = 200, description = "Cliente", body = Client),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn get_client(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.get(&app_state.db_pool, id).await?;
    Ok((StatusCode::OK, Json(client)))
}
